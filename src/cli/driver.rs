use anyhow::{Context, Result};
use indexmap::IndexMap;
use jsm_common::diagnostics::{Diagnostic, diagnostic_codes};
use jsm_common::limits::MAX_REFERENCE_DEPTH;
use jsm_libs::{default_set_for, get_set, load_set, profile_for};
use jsm_surface::{
    CapabilityProfile, DeclarationSet, GlobalTypeSurface, Mode, ModeConfig, Pipeline, PipelineOptions, SetKind,
    Stage, SurfaceError, parse_declaration_set,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::cli::args::{CliArgs, Emit};
use crate::cli::config::{
    ResolvedConfig, SetSource, load_config, parse_mode, resolve_config, resolve_config_path,
};

/// Everything one `jsm` invocation produced.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// Errors and warnings, in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
    /// Text for stdout.
    pub output: String,
    /// Source text of every set that was read, keyed by the file name its
    /// diagnostics carry.
    pub sources: Vec<(String, String)>,
    pub written: Option<PathBuf>,
}

impl RunOutcome {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn exit_code(&self) -> i32 {
        if self.has_errors() { 1 } else { 0 }
    }
}

/// The result of running the surface pipeline for one configuration.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub mode: Mode,
    /// Furthest stage reached.
    pub stage: Stage,
    pub surface: Option<Arc<GlobalTypeSurface>>,
    pub diagnostics: Vec<Diagnostic>,
    pub sources: Vec<(String, String)>,
    /// Ids of the installed sets, references first.
    pub installed: Vec<String>,
}

/// Run one invocation. I/O and configuration file problems are returned as
/// errors; surface defects are reported in [`RunOutcome::diagnostics`].
pub fn run(args: &CliArgs, cwd: &Path) -> Result<RunOutcome> {
    if args.list_sets {
        return Ok(RunOutcome { output: list_sets(), ..RunOutcome::default() });
    }

    let config = resolve_effective_config(args, cwd)?;

    if args.show_config {
        let output = serde_json::to_string_pretty(&config).context("failed to serialize configuration")?;
        return Ok(RunOutcome { output: output + "\n", ..RunOutcome::default() });
    }

    if args.profile {
        let profile = profile_for(config.mode).exclude(config.extra_exclusions.iter().cloned());
        let output = match args.emit {
            Some(Emit::Json) => serde_json::to_string_pretty(&profile).context("failed to serialize profile")? + "\n",
            _ => format_profile(&profile),
        };
        return Ok(RunOutcome { output, ..RunOutcome::default() });
    }

    let result = build(&config)?;
    let mut outcome = RunOutcome {
        diagnostics: result.diagnostics,
        sources: result.sources,
        ..RunOutcome::default()
    };
    let Some(surface) = result.surface else {
        return Ok(outcome);
    };

    let text = emit_surface(&surface, args.emit.unwrap_or(Emit::Dts), args.pretty)?;
    match args.out.as_ref() {
        Some(out) => {
            let path = if out.is_absolute() { out.clone() } else { cwd.join(out) };
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create output directory {}", parent.display()))?;
            }
            std::fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "surface written");
            outcome.written = Some(path);
        }
        None => outcome.output = text,
    }
    Ok(outcome)
}

/// Config file (if any) with command-line overrides applied.
pub fn resolve_effective_config(args: &CliArgs, cwd: &Path) -> Result<ResolvedConfig> {
    let config_path = resolve_config_path(cwd, args.project.as_deref())?;
    let mut resolved = match config_path.as_deref() {
        Some(path) => {
            debug!(path = %path.display(), "loading jsmconfig");
            let config = load_config(path)?;
            let base_dir = path.parent().unwrap_or(cwd);
            resolve_config(&config, base_dir)?
        }
        None => ResolvedConfig::default(),
    };

    if let Some(mode) = args.mode.as_deref() {
        resolved.mode = parse_mode(mode)?;
    }
    if let Some(sets) = args.sets.as_ref() {
        resolved.sets = sets
            .iter()
            .filter(|set| !set.trim().is_empty())
            .map(|set| SetSource::parse(set, cwd))
            .collect();
    }
    for root in &args.set_roots {
        resolved.set_roots.push(if root.is_absolute() { root.clone() } else { cwd.join(root) });
    }
    for name in &args.exclusions {
        if !resolved.extra_exclusions.contains(name) {
            resolved.extra_exclusions.push(name.clone());
        }
    }
    if args.no_index_audit {
        resolved.index_audit = false;
    }

    Ok(resolved)
}

/// Load the configured sets and run them through the pipeline up to
/// `Published`.
#[tracing::instrument(level = "debug", skip_all, fields(mode = %config.mode))]
pub fn build(config: &ResolvedConfig) -> Result<BuildResult> {
    let mut loader = SetLoader::new(scan_set_roots(&config.set_roots)?);

    let requested: Vec<SetSource> = if config.sets.is_empty() {
        default_set_for(config.mode)
            .map(|set| SetSource::Id(set.id.to_string()))
            .into_iter()
            .collect()
    } else {
        config.sets.clone()
    };
    for source in &requested {
        loader.load(source, 0)?;
    }

    let mut result = BuildResult {
        mode: config.mode,
        stage: Stage::Unconfigured,
        surface: None,
        diagnostics: Vec::new(),
        installed: loader.sets.iter().map(|set| set.id.clone()).collect(),
        sources: std::mem::take(&mut loader.sources),
    };

    let load_error = if !loader.syntax_errors.is_empty() {
        Some(SurfaceError::Syntax(loader.syntax_errors))
    } else if !loader.config_errors.is_empty() {
        Some(SurfaceError::Configuration(loader.config_errors))
    } else {
        None
    };
    if let Some(error) = load_error {
        result.diagnostics = error.diagnostics().to_vec();
        return Ok(result);
    }

    let options = PipelineOptions {
        index_audit: config.index_audit,
        extra_exclusions: config.extra_exclusions.clone(),
    };
    let built = Pipeline::new()
        .with_sets(loader.sets)
        .with_options(options)
        .select_mode(&ModeConfig::new(config.mode))
        .map(|selected| selected.merge())
        .and_then(|merged| merged.validate(&profile_for(config.mode)));

    match built {
        Ok(validated) => {
            result.diagnostics.extend(validated.warnings().iter().cloned());
            let surface = validated.publish();
            result.stage = Stage::Published;
            result.surface = Some(surface);
        }
        Err(error) => {
            debug!(%error, "surface build failed");
            result.stage = error.stage();
            result.diagnostics.extend(error.diagnostics().iter().cloned());
        }
    }
    Ok(result)
}

pub fn emit_surface(surface: &GlobalTypeSurface, emit: Emit, pretty: bool) -> Result<String> {
    Ok(match emit {
        Emit::Dts => surface.to_declaration_text(),
        Emit::Json => surface.to_json(pretty).context("failed to serialize surface")? + "\n",
    })
}

fn list_sets() -> String {
    let mut out = String::new();
    for embedded in jsm_libs::all_sets() {
        let description = match load_set(embedded.id) {
            Ok(set) => {
                let kind = match set.kind {
                    SetKind::Base => "base".to_string(),
                    SetKind::Mode(mode) => format!("mode {mode}"),
                };
                let deprecated = if set.deprecated { ", deprecated" } else { "" };
                format!("{} ({kind}{deprecated})", set.label())
            }
            Err(error) => format!("{} ({error})", embedded.id),
        };
        let _ = writeln!(out, "{:<12} {:<20} {}", embedded.id, embedded.file_name, description);
    }
    out
}

fn format_profile(profile: &CapabilityProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "mode: {}", profile.mode);
    let _ = writeln!(out, "required ({}):", profile.required.len());
    for requirement in &profile.required {
        let _ = writeln!(out, "  {requirement}");
    }
    let _ = writeln!(out, "excluded ({}):", profile.excluded.len());
    for name in &profile.excluded {
        let _ = writeln!(out, "  {name}");
    }
    out
}

/// Index `<id>.d.ts` files under `roots` by id. Earlier roots win; within a
/// root the first file in path order wins.
pub fn scan_set_roots(roots: &[PathBuf]) -> Result<IndexMap<String, PathBuf>> {
    let mut found = IndexMap::new();
    for root in roots {
        if !root.is_dir() {
            anyhow::bail!("set root is not a directory: {}", root.display());
        }
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.with_context(|| format!("failed to scan set root {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(id) = entry.file_name().to_str().and_then(|name| name.strip_suffix(".d.ts")) else {
                continue;
            };
            if found.contains_key(id) {
                warn!(id, path = %entry.path().display(), "set id already provided by another file, skipping");
                continue;
            }
            found.insert(id.to_string(), entry.into_path());
        }
    }
    debug!(sets = found.len(), "scanned set roots");
    Ok(found)
}

/// Loads sets and everything they reference, references first, each id
/// once. Defects are collected so every broken set is reported together.
struct SetLoader {
    roots: IndexMap<String, PathBuf>,
    sets: Vec<DeclarationSet>,
    /// Installed set id to the file that provided it.
    seen_ids: FxHashMap<String, String>,
    seen_files: FxHashSet<PathBuf>,
    sources: Vec<(String, String)>,
    syntax_errors: Vec<Diagnostic>,
    config_errors: Vec<Diagnostic>,
}

impl SetLoader {
    fn new(roots: IndexMap<String, PathBuf>) -> Self {
        SetLoader {
            roots,
            sets: Vec::new(),
            seen_ids: FxHashMap::default(),
            seen_files: FxHashSet::default(),
            sources: Vec::new(),
            syntax_errors: Vec::new(),
            config_errors: Vec::new(),
        }
    }

    fn load(&mut self, source: &SetSource, depth: usize) -> Result<()> {
        if depth > MAX_REFERENCE_DEPTH {
            warn!(?source, depth, "reference chain too deep, not following further");
            return Ok(());
        }
        match source {
            SetSource::Id(id) => {
                if self.seen_ids.contains_key(id) {
                    return Ok(());
                }
                if let Some(path) = self.roots.get(id).cloned() {
                    return self.load_file(&path, depth);
                }
                self.load_embedded(id, depth)
            }
            SetSource::File(path) => self.load_file(path, depth),
        }
    }

    fn load_embedded(&mut self, id: &str, depth: usize) -> Result<()> {
        let Some(embedded) = get_set(id) else {
            self.config_errors
                .push(Diagnostic::global(diagnostic_codes::UNKNOWN_DECLARATION_SET, &[id]));
            return Ok(());
        };
        if !self.seen_files.insert(PathBuf::from(embedded.file_name)) {
            return Ok(());
        }
        self.sources.push((embedded.file_name.to_string(), embedded.content.to_string()));
        match load_set(id) {
            Ok(set) => self.install(set, depth),
            Err(error) => {
                self.syntax_errors.extend(error.diagnostics().iter().cloned());
                Ok(())
            }
        }
    }

    fn load_file(&mut self, path: &Path, depth: usize) -> Result<()> {
        if !self.seen_files.insert(path.to_path_buf()) {
            return Ok(());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read declaration set: {}", path.display()))?;
        let file_name = path.to_string_lossy().into_owned();
        let parsed = parse_declaration_set(&file_name, &text);
        self.sources.push((file_name, text));
        match parsed {
            Ok(set) => self.install(set, depth),
            Err(diagnostics) => {
                self.syntax_errors.extend(diagnostics);
                Ok(())
            }
        }
    }

    fn install(&mut self, set: DeclarationSet, depth: usize) -> Result<()> {
        if let Some(first) = self.seen_ids.get(&set.id) {
            warn!(id = %set.id, first = %first, second = %set.file, "set id provided twice");
            self.config_errors.push(Diagnostic::global(
                diagnostic_codes::DUPLICATE_SET_ID,
                &[set.id.as_str(), first.as_str(), set.file.as_str()],
            ));
            return Ok(());
        }
        self.seen_ids.insert(set.id.clone(), set.file.clone());
        for reference in &set.references {
            self.load(&SetSource::Id(reference.clone()), depth + 1)?;
        }
        debug!(set = %set.label(), "installed declaration set");
        self.sets.push(set);
        Ok(())
    }
}
