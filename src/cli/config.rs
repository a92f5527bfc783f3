//! `jsmconfig.json` loading.
//!
//! The file is JSON with comments and trailing commas. `extends` chains are
//! followed base-first; values in the extending file win. Relative paths are
//! resolved against the directory of the file that names them.

use anyhow::{Context, Result, anyhow, bail};
use jsm_common::diagnostics::{Diagnostic, diagnostic_codes};
use jsm_surface::Mode;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "jsmconfig.json";

/// Accepts both `true` and `"true"`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{}'. Expected true, false, 'true', or 'false'",
                s
            ))),
        },
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JsmConfig {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    /// Catalog ids, ids found under `setRoots`, or paths to `.d.ts` files.
    #[serde(default)]
    pub declaration_sets: Option<Vec<String>>,
    #[serde(default)]
    pub set_roots: Option<Vec<String>>,
    #[serde(default)]
    pub additional_exclusions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub index_audit: Option<bool>,
}

/// Where a declaration set comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum SetSource {
    /// An id, looked up in the set roots first and then in the embedded catalog.
    Id(String),
    File(PathBuf),
}

impl SetSource {
    /// Anything that looks like a path is a file; everything else is an id.
    pub fn parse(value: &str, base_dir: &Path) -> SetSource {
        let value = value.trim();
        if value.ends_with(".d.ts") || value.contains('/') || value.contains('\\') {
            SetSource::File(join_relative(base_dir, value))
        } else {
            SetSource::Id(value.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub mode: Mode,
    /// Empty means the catalog defaults for `mode`.
    pub sets: Vec<SetSource>,
    pub set_roots: Vec<PathBuf>,
    pub extra_exclusions: Vec<String>,
    pub index_audit: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        ResolvedConfig {
            mode: Mode::Js,
            sets: Vec::new(),
            set_roots: Vec::new(),
            extra_exclusions: Vec::new(),
            index_audit: true,
        }
    }
}

pub fn parse_mode(value: &str) -> Result<Mode> {
    value.parse::<Mode>().map_err(|_| {
        let diagnostic =
            Diagnostic::global(diagnostic_codes::UNKNOWN_MODE, &[value, &Mode::expected_list()]);
        anyhow!(diagnostic.message_text)
    })
}

/// Turn a (merged) config into concrete settings. `base_dir` anchors any
/// relative paths that are still relative.
pub fn resolve_config(config: &JsmConfig, base_dir: &Path) -> Result<ResolvedConfig> {
    let mut resolved = ResolvedConfig::default();

    if let Some(mode) = config.mode.as_deref() {
        resolved.mode = parse_mode(mode)?;
    }
    if let Some(sets) = config.declaration_sets.as_ref() {
        resolved.sets = sets.iter().map(|set| SetSource::parse(set, base_dir)).collect();
    }
    if let Some(roots) = config.set_roots.as_ref() {
        resolved.set_roots = roots.iter().map(|root| join_relative(base_dir, root)).collect();
    }
    if let Some(exclusions) = config.additional_exclusions.as_ref() {
        resolved.extra_exclusions = exclusions.clone();
    }
    if let Some(index_audit) = config.index_audit {
        resolved.index_audit = index_audit;
    }

    Ok(resolved)
}

pub fn parse_config(source: &str) -> Result<JsmConfig> {
    let stripped = strip_jsonc(source);
    let normalized = remove_trailing_commas(&stripped);
    let config = serde_json::from_str(&normalized).context("failed to parse jsmconfig JSON")?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<JsmConfig> {
    let mut visited = HashSet::new();
    load_config_inner(path, &mut visited)
}

fn load_config_inner(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<JsmConfig> {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        bail!("jsmconfig extends cycle detected at {}", canonical.display());
    }

    let source =
        std::fs::read_to_string(path).with_context(|| format!("failed to read jsmconfig: {}", path.display()))?;
    let mut config =
        parse_config(&source).with_context(|| format!("failed to parse jsmconfig: {}", path.display()))?;
    let base_dir = path.parent().ok_or_else(|| anyhow!("jsmconfig has no parent directory"))?;
    anchor_paths(&mut config, base_dir);

    if let Some(extends) = config.extends.take() {
        let base_path = resolve_extends_path(path, &extends)?;
        let base_config = load_config_inner(&base_path, visited)?;
        config = merge_configs(base_config, config);
    }

    visited.remove(&canonical);
    Ok(config)
}

/// Rewrite relative set paths and roots so they survive merging with
/// configs from other directories.
fn anchor_paths(config: &mut JsmConfig, base_dir: &Path) {
    if let Some(sets) = config.declaration_sets.as_mut() {
        for set in sets.iter_mut() {
            if let SetSource::File(path) = SetSource::parse(set, base_dir) {
                *set = path.to_string_lossy().into_owned();
            }
        }
    }
    if let Some(roots) = config.set_roots.as_mut() {
        for root in roots.iter_mut() {
            *root = join_relative(base_dir, root.as_str()).to_string_lossy().into_owned();
        }
    }
}

fn resolve_extends_path(current_path: &Path, extends: &str) -> Result<PathBuf> {
    let base_dir = current_path
        .parent()
        .ok_or_else(|| anyhow!("jsmconfig has no parent directory"))?;
    let mut candidate = PathBuf::from(extends);
    if candidate.extension().is_none() {
        candidate.set_extension("json");
    }

    Ok(join_relative(base_dir, &candidate))
}

fn merge_configs(base: JsmConfig, child: JsmConfig) -> JsmConfig {
    JsmConfig {
        extends: None,
        mode: child.mode.or(base.mode),
        declaration_sets: child.declaration_sets.or(base.declaration_sets),
        set_roots: child.set_roots.or(base.set_roots),
        additional_exclusions: match (base.additional_exclusions, child.additional_exclusions) {
            (Some(mut base), Some(child)) => {
                for name in child {
                    if !base.contains(&name) {
                        base.push(name);
                    }
                }
                Some(base)
            }
            (base, child) => child.or(base),
        },
        index_audit: child.index_audit.or(base.index_audit),
    }
}

/// `jsmconfig.json` in `cwd`, if present.
pub fn find_config(cwd: &Path) -> Option<PathBuf> {
    let candidate = cwd.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// `--project` may name the config file or the directory holding it.
pub fn resolve_config_path(cwd: &Path, project: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(project) = project else {
        return Ok(find_config(cwd));
    };

    let mut candidate = join_relative(cwd, project);
    if candidate.is_dir() {
        candidate = candidate.join(CONFIG_FILE_NAME);
    }

    if !candidate.exists() {
        bail!("jsmconfig not found at {}", candidate.display());
    }
    if !candidate.is_file() {
        bail!("project path is not a file: {}", candidate.display());
    }

    Ok(Some(candidate))
}

fn join_relative(base_dir: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() { path.to_path_buf() } else { base_dir.join(path) }
}

fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;

    while let Some(ch) = chars.next() {
        if in_line_comment {
            if ch == '\n' {
                in_line_comment = false;
                out.push(ch);
            }
            continue;
        }

        if in_block_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_block_comment = false;
            } else if ch == '\n' {
                out.push(ch);
            }
            continue;
        }

        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match (ch, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(ch);
            }
            ('/', Some('/')) => {
                chars.next();
                in_line_comment = true;
            }
            ('/', Some('*')) => {
                chars.next();
                in_block_comment = true;
            }
            _ => out.push(ch),
        }
    }

    out
}

fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
        } else if ch == ',' {
            let next = chars.clone().find(|c| !c.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }

        out.push(ch);
    }

    out
}
