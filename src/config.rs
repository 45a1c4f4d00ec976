//! Dashboard configuration: dataset location and sidebar defaults.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::filter::{default_date_limit, FilterParams};
use crate::models::TRAFFIC_LEVELS;

pub const DATASET_ENV: &str = "DASHBOARD_DATASET";
pub const LOGO_ENV: &str = "DASHBOARD_LOGO";

pub const DEFAULT_DATASET: &str = "dataset/train.csv";
pub const DEFAULT_LOGO: &str = "logo.png";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardConfig {
    pub dataset_path: PathBuf,
    /// Sidebar logo; only passed through to the renderer.
    pub logo_path: PathBuf,
    /// Lower end of the date slider.
    pub date_min: NaiveDate,
    /// Upper end of the date slider.
    pub date_max: NaiveDate,
    pub default_date_limit: NaiveDate,
    pub traffic_options: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            logo_path: PathBuf::from(DEFAULT_LOGO),
            date_min: NaiveDate::from_ymd_opt(2022, 2, 11).unwrap_or_default(),
            date_max: NaiveDate::from_ymd_opt(2022, 4, 6).unwrap_or_default(),
            default_date_limit: default_date_limit(),
            traffic_options: TRAFFIC_LEVELS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl DashboardConfig {
    /// Defaults, with paths overridden from the environment when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var(DATASET_ENV) {
            config.dataset_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var(LOGO_ENV) {
            config.logo_path = PathBuf::from(path);
        }
        config
    }

    pub fn with_dataset(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = path.into();
        self
    }

    /// Filter state before the user touches the sidebar.
    pub fn default_filters(&self) -> FilterParams {
        FilterParams::new(
            self.default_date_limit,
            self.traffic_options.iter().cloned().collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_sidebar() {
        let config = DashboardConfig::default();
        assert_eq!(config.dataset_path, PathBuf::from("dataset/train.csv"));
        assert_eq!(config.date_min.to_string(), "2022-02-11");
        assert_eq!(config.date_max.to_string(), "2022-04-06");
        assert_eq!(config.default_filters(), FilterParams::default());
    }

    #[test]
    fn test_with_dataset() {
        let config = DashboardConfig::default().with_dataset("/tmp/orders.csv");
        assert_eq!(config.dataset_path, PathBuf::from("/tmp/orders.csv"));
    }
}
