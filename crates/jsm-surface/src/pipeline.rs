//! The surface lifecycle as a typestate pipeline.
//!
//! `Unconfigured → ModeSelected → Merged → Validated → Published`. Each
//! stage is its own type, so a surface cannot be published without passing
//! validation. A failed validation leaves the surface at `Merged` and
//! returns every defect found in that stage.

use jsm_common::diagnostics::{Diagnostic, diagnostic_codes};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::audit::audit_index_types;
use crate::capability::{CapabilityProfile, check_exclusions, coverage_diagnostics, validate_coverage};
use crate::decl::{DeclarationSet, Declarations};
use crate::error::SurfaceError;
use crate::merge::merge_sets;
use crate::mode::{Mode, ModeConfig, Selection, select_mode};
use crate::registry::SurfaceRegistry;
use crate::surface::{GlobalTypeSurface, SetInfo};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    Unconfigured,
    ModeSelected,
    Merged,
    Validated,
    Published,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Unconfigured => "unconfigured",
            Stage::ModeSelected => "mode-selected",
            Stage::Merged => "merged",
            Stage::Validated => "validated",
            Stage::Published => "published",
        })
    }
}

#[derive(Clone, Debug)]
pub struct PipelineOptions {
    /// Run the index type consistency audit during validation.
    pub index_audit: bool,
    /// Names excluded in addition to the profile's own list.
    pub extra_exclusions: Vec<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions { index_audit: true, extra_exclusions: Vec::new() }
    }
}

/// `Unconfigured`: installed declaration sets, no mode yet.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    installed: Vec<DeclarationSet>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline::default()
    }

    #[must_use]
    pub fn with_set(mut self, set: DeclarationSet) -> Self {
        self.installed.push(set);
        self
    }

    #[must_use]
    pub fn with_sets(mut self, sets: impl IntoIterator<Item = DeclarationSet>) -> Self {
        self.installed.extend(sets);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn stage(&self) -> Stage {
        Stage::Unconfigured
    }

    pub fn installed(&self) -> &[DeclarationSet] {
        &self.installed
    }

    #[tracing::instrument(level = "debug", skip(self), fields(installed = self.installed.len()))]
    pub fn select_mode(self, config: &ModeConfig) -> Result<ModeSelected, SurfaceError> {
        let selection = select_mode(config, &self.installed)?;
        Ok(ModeSelected { selection, options: self.options })
    }
}

/// `ModeSelected`: the base set and exactly one mode set.
#[derive(Clone, Debug)]
pub struct ModeSelected {
    selection: Selection,
    options: PipelineOptions,
}

impl ModeSelected {
    pub fn stage(&self) -> Stage {
        Stage::ModeSelected
    }

    pub fn mode(&self) -> Mode {
        self.selection.mode()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Merging never fails outright; conflicts are carried to validation.
    #[tracing::instrument(level = "debug", skip(self), fields(mode = %self.mode()))]
    pub fn merge(self) -> MergedSurface {
        let sets = self.selection.sets();
        let merged = merge_sets(&sets);

        let mut warnings = Vec::new();
        for set in sets {
            if set.deprecated {
                warn!(set = %set.label(), "declaration set is deprecated");
                warnings.push(Diagnostic::from_code(
                    set.file.clone(),
                    0,
                    0,
                    diagnostic_codes::DEPRECATED_DECLARATION_SET,
                    &[&set.id],
                ));
            }
        }

        let set_infos = sets
            .iter()
            .map(|set| SetInfo { id: set.id.clone(), version: set.version.clone(), deprecated: set.deprecated })
            .collect();

        debug!(
            types = merged.value.types.len(),
            values = merged.value.values.len(),
            conflicts = merged.conflicts.len(),
            "merged declaration sets"
        );
        MergedSurface {
            mode: self.selection.mode(),
            sets: set_infos,
            declarations: merged.value,
            conflicts: merged.conflicts,
            warnings,
            options: self.options,
        }
    }
}

/// `Merged`: one namespace, not yet checked against the mode's profile.
#[derive(Clone, Debug)]
pub struct MergedSurface {
    mode: Mode,
    sets: Vec<SetInfo>,
    declarations: Declarations,
    conflicts: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
    options: PipelineOptions,
}

impl MergedSurface {
    pub fn stage(&self) -> Stage {
        Stage::Merged
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }

    pub fn conflicts(&self) -> &[Diagnostic] {
        &self.conflicts
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Check merge conflicts, then coverage, exclusions and index
    /// consistency. Merge conflicts stop validation before the profile
    /// checks run; otherwise every profile defect is reported.
    #[tracing::instrument(level = "debug", skip_all, fields(mode = %self.mode))]
    pub fn validate(self, profile: &CapabilityProfile) -> Result<ValidatedSurface, SurfaceError> {
        if !self.conflicts.is_empty() {
            return Err(SurfaceError::Merge(self.conflicts));
        }

        let profile = profile.clone().exclude(self.options.extra_exclusions.iter().cloned());
        let mut diagnostics = Vec::new();
        if profile.mode != self.mode {
            diagnostics.push(Diagnostic::global(
                diagnostic_codes::MODE_MISMATCH,
                &[profile.mode.as_str(), "profile", self.mode.as_str()],
            ));
        }
        if let Err(missing) = validate_coverage(&profile, &self.declarations) {
            diagnostics.extend(coverage_diagnostics(&profile, &missing));
        }
        diagnostics.extend(check_exclusions(&profile, &self.declarations));
        if self.options.index_audit {
            diagnostics.extend(audit_index_types(&self.declarations));
        }

        if !diagnostics.is_empty() {
            debug!(defects = diagnostics.len(), "validation failed");
            return Err(SurfaceError::Validation(diagnostics));
        }

        Ok(ValidatedSurface {
            surface: GlobalTypeSurface::new(self.mode, self.sets, self.declarations),
            warnings: self.warnings,
        })
    }
}

/// `Validated`: ready to publish.
#[derive(Clone, Debug)]
pub struct ValidatedSurface {
    surface: GlobalTypeSurface,
    warnings: Vec<Diagnostic>,
}

impl ValidatedSurface {
    pub fn stage(&self) -> Stage {
        Stage::Validated
    }

    pub fn surface(&self) -> &GlobalTypeSurface {
        &self.surface
    }

    /// Non-fatal diagnostics, such as deprecated sets.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// `Published`: the surface becomes shared and read-only.
    pub fn publish(self) -> Arc<GlobalTypeSurface> {
        info!(mode = %self.surface.mode(), fingerprint = self.surface.fingerprint(), "surface published");
        Arc::new(self.surface)
    }

    /// Publish into `registry`; fails if it already holds a surface.
    pub fn publish_to(self, registry: &SurfaceRegistry) -> Result<Arc<GlobalTypeSurface>, SurfaceError> {
        registry.publish(self.publish())
    }
}

/// Run the whole pipeline for one configuration.
pub fn build_surface(
    config: &ModeConfig,
    installed: Vec<DeclarationSet>,
    profile: &CapabilityProfile,
    options: PipelineOptions,
) -> Result<ValidatedSurface, SurfaceError> {
    Pipeline::new()
        .with_sets(installed)
        .with_options(options)
        .select_mode(config)?
        .merge()
        .validate(profile)
}
