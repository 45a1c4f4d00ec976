//! Read → clean → filter, as one object built per dataset.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::info;

use crate::cleaning::clean;
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::filter::{self, FilterParams};
use crate::models::OrderRecord;
use crate::source::read_orders;

/// Identity of the dataset file at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStamp {
    pub path: PathBuf,
    pub modified: SystemTime,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    dataset_path: PathBuf,
}

impl Pipeline {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            dataset_path: config.dataset_path.clone(),
        }
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    /// Current (path, modification time) of the dataset.
    pub fn source_stamp(&self) -> Result<SourceStamp> {
        let modified = std::fs::metadata(&self.dataset_path)
            .and_then(|m| m.modified())
            .map_err(|e| DashboardError::SourceRead {
                path: self.dataset_path.clone(),
                reason: e.to_string(),
            })?;
        Ok(SourceStamp {
            path: self.dataset_path.clone(),
            modified,
        })
    }

    /// Read and clean the whole dataset.
    pub fn load(&self) -> Result<Vec<OrderRecord>> {
        let raw = read_orders(&self.dataset_path)?;
        clean(&raw)
    }

    /// Full per-interaction run: load, clean, then apply `params`.
    #[tracing::instrument(skip_all, fields(date_limit = %params.date_limit))]
    pub fn run(&self, params: &FilterParams) -> Result<Vec<OrderRecord>> {
        let canonical = self.load()?;
        let filtered = filter::apply(&canonical, params);
        info!(
            canonical = canonical.len(),
            filtered = filtered.len(),
            "Pipeline run complete"
        );
        Ok(filtered)
    }
}
