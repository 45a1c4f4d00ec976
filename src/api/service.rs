//! Shared page service behind the REST handlers.
//!
//! Holds the pipeline and a memo of the cleaned dataset keyed on the file's
//! path and modification time.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::filter::{self, FilterParams};
use crate::models::OrderRecord;
use crate::pages::{self, Page, PageKind};
use crate::pipeline::{Pipeline, SourceStamp};

#[derive(Debug)]
struct CachedOrders {
    stamp: SourceStamp,
    orders: Arc<Vec<OrderRecord>>,
}

pub struct DashboardService {
    config: DashboardConfig,
    pipeline: Pipeline,
    cached_orders: Arc<RwLock<Option<CachedOrders>>>,
}

impl DashboardService {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            pipeline: Pipeline::new(&config),
            config,
            cached_orders: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Cleaned dataset, re-read only when the file on disk changed. The read
    /// runs on the blocking pool.
    pub async fn canonical_orders(&self) -> Result<Arc<Vec<OrderRecord>>> {
        let stamp = self.pipeline.source_stamp()?;

        // Check cache first
        {
            let cache = self.cached_orders.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.stamp == stamp {
                    return Ok(cached.orders.clone());
                }
                warn!(
                    path = %stamp.path.display(),
                    "Dataset changed on disk, reloading"
                );
            }
        }

        let pipeline = self.pipeline.clone();
        let orders = tokio::task::spawn_blocking(move || pipeline.load())
            .await
            .map_err(|e| DashboardError::SourceRead {
                path: stamp.path.clone(),
                reason: format!("load task failed: {}", e),
            })??;
        let orders = Arc::new(orders);
        info!(rows = orders.len(), "Loaded canonical orders");

        // Update cache
        {
            let mut cache = self.cached_orders.write().await;
            *cache = Some(CachedOrders {
                stamp,
                orders: orders.clone(),
            });
        }

        Ok(orders)
    }

    /// Filter the cached dataset and build one page from it.
    pub async fn page(&self, kind: PageKind, params: &FilterParams) -> Result<Page> {
        let canonical = self.canonical_orders().await?;
        let filtered = filter::apply(&canonical, params);
        pages::render(kind, &filtered)
    }
}
