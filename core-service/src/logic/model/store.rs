//! Process-wide artifact cache.
//!
//! Loaded lazily on first use; replaced only by `reload`. Readers hold an
//! `Arc` to whichever artifact was current when they asked, so a reload never
//! changes a prediction already in flight.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use super::artifact::load_artifact;
use super::pipeline::FittedPipeline;
use crate::error::CoreResult;

pub struct ArtifactStore {
    path: PathBuf,
    current: RwLock<Option<Arc<FittedPipeline>>>,
}

impl ArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    /// Cached artifact, loading it on first call
    pub fn get(&self) -> CoreResult<Arc<FittedPipeline>> {
        if let Some(pipeline) = self.current.read().as_ref() {
            return Ok(Arc::clone(pipeline));
        }

        let mut guard = self.current.write();
        // Another caller may have loaded it while we waited
        if let Some(pipeline) = guard.as_ref() {
            return Ok(Arc::clone(pipeline));
        }

        let loaded = Arc::new(load_artifact(&self.path)?);
        *guard = Some(Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Re-read the artifact from disk. On failure the previous artifact stays.
    pub fn reload(&self) -> CoreResult<Arc<FittedPipeline>> {
        let loaded = Arc::new(load_artifact(&self.path)?);
        *self.current.write() = Some(Arc::clone(&loaded));
        log::info!("Model artifact reloaded from {}", self.path.display());
        Ok(loaded)
    }
}
