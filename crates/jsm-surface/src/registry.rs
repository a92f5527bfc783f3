//! Where published surfaces live.
//!
//! The process-wide slot is set once per run and never changes. Tools that
//! reload declaration sets use a [`SurfaceRegistry`] instead: `replace`
//! swaps in a newly built surface while readers keep the `Arc` they hold.

use once_cell::sync::OnceCell;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::error::SurfaceError;
use crate::surface::GlobalTypeSurface;

static GLOBAL_SURFACE: OnceCell<Arc<GlobalTypeSurface>> = OnceCell::new();

/// Publish the surface for this process. Only the first call succeeds.
pub fn publish_global(surface: Arc<GlobalTypeSurface>) -> Result<Arc<GlobalTypeSurface>, SurfaceError> {
    GLOBAL_SURFACE
        .set(Arc::clone(&surface))
        .map_err(|_| SurfaceError::AlreadyPublished)?;
    debug!(mode = %surface.mode(), "global surface published");
    Ok(surface)
}

/// The process-wide surface, if one has been published.
pub fn global() -> Option<Arc<GlobalTypeSurface>> {
    GLOBAL_SURFACE.get().cloned()
}

#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    current: RwLock<Option<Arc<GlobalTypeSurface>>>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        SurfaceRegistry::default()
    }

    /// Store the first surface; fails if one is already stored.
    pub fn publish(&self, surface: Arc<GlobalTypeSurface>) -> Result<Arc<GlobalTypeSurface>, SurfaceError> {
        let mut current = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        if current.is_some() {
            return Err(SurfaceError::AlreadyPublished);
        }
        *current = Some(Arc::clone(&surface));
        Ok(surface)
    }

    /// Swap in a rebuilt surface, returning the one it replaces.
    pub fn replace(&self, surface: Arc<GlobalTypeSurface>) -> Option<Arc<GlobalTypeSurface>> {
        let mut current = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        debug!(mode = %surface.mode(), "surface replaced");
        current.replace(surface)
    }

    pub fn current(&self) -> Option<Arc<GlobalTypeSurface>> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
