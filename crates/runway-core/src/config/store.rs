use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::error::Result;

use super::EstimatorConfig;

/// Holds the configuration snapshot used for the next frame.
///
/// Readers take an `Arc` for the duration of one frame, so a concurrent
/// [`ConfigStore::replace`] never changes the settings mid-frame.
#[derive(Debug, Default)]
pub struct ConfigStore {
    current: RwLock<Arc<EstimatorConfig>>,
}

impl ConfigStore {
    /// Validate `config` and wrap it as the initial snapshot.
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            current: RwLock::new(Arc::new(config)),
        })
    }

    pub fn snapshot(&self) -> Arc<EstimatorConfig> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in a new snapshot. Invalid configs are rejected and the
    /// previous snapshot stays active.
    pub fn replace(&self, config: EstimatorConfig) -> Result<()> {
        config.validate()?;
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(config);
        info!("Estimator configuration replaced");
        Ok(())
    }
}
