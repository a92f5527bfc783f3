use jsm_common::{DefectKind, Diagnostic};
use thiserror::Error;

use crate::pipeline::Stage;

/// Why a global type surface could not be produced or published.
///
/// Every variant except `AlreadyPublished` carries all the diagnostics found
/// in the stage that failed.
#[derive(Debug, Clone, Error)]
pub enum SurfaceError {
    #[error("invalid mode configuration ({} defect(s))", .0.len())]
    Configuration(Vec<Diagnostic>),
    #[error("declaration set has syntax errors ({} defect(s))", .0.len())]
    Syntax(Vec<Diagnostic>),
    #[error("declaration sets do not merge ({} conflict(s))", .0.len())]
    Merge(Vec<Diagnostic>),
    #[error("merged surface failed validation ({} defect(s))", .0.len())]
    Validation(Vec<Diagnostic>),
    #[error("a global type surface has already been published")]
    AlreadyPublished,
}

impl SurfaceError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            SurfaceError::Configuration(diagnostics)
            | SurfaceError::Syntax(diagnostics)
            | SurfaceError::Merge(diagnostics)
            | SurfaceError::Validation(diagnostics) => diagnostics,
            SurfaceError::AlreadyPublished => &[],
        }
    }

    /// The pipeline stage the failure leaves the surface in.
    pub fn stage(&self) -> Stage {
        match self {
            SurfaceError::Configuration(_) | SurfaceError::Syntax(_) => Stage::Unconfigured,
            SurfaceError::Merge(_) | SurfaceError::Validation(_) => Stage::Merged,
            SurfaceError::AlreadyPublished => Stage::Validated,
        }
    }

    pub fn has_kind(&self, kind: DefectKind) -> bool {
        self.diagnostics().iter().any(|d| d.kind() == kind)
    }

    pub fn has_code(&self, code: u32) -> bool {
        self.diagnostics().iter().any(|d| d.code == code)
    }
}
