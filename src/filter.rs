//! Filter stage: date upper bound and traffic-level membership.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::models::{OrderRecord, TRAFFIC_LEVELS};

/// User-selected filter state for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Orders on or after this date are dropped.
    pub date_limit: NaiveDate,
    /// Accepted `Road_traffic_density` values.
    pub traffic: BTreeSet<String>,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            date_limit: default_date_limit(),
            traffic: TRAFFIC_LEVELS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Initial position of the date slider.
pub fn default_date_limit() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 4, 13).unwrap_or_default()
}

impl FilterParams {
    pub fn new(date_limit: NaiveDate, traffic: BTreeSet<String>) -> Self {
        Self { date_limit, traffic }
    }

    /// Parse a comma-separated traffic selection such as `"Low,Jam"`.
    ///
    /// Only the four known levels are accepted. An empty string selects
    /// nothing, which is a valid (empty) filter.
    pub fn parse_traffic(list: &str) -> Result<BTreeSet<String>> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|level| {
                if TRAFFIC_LEVELS.contains(&level) {
                    Ok(level.to_string())
                } else {
                    Err(DashboardError::InvalidFilter(format!(
                        "unknown traffic level '{}', expected one of {}",
                        level,
                        TRAFFIC_LEVELS.join(", ")
                    )))
                }
            })
            .collect()
    }

    /// True when `order` passes both predicates.
    pub fn accepts(&self, order: &OrderRecord) -> bool {
        order.order_date < self.date_limit && self.traffic.contains(&order.road_traffic_density)
    }
}

/// Keep the orders accepted by `params`, preserving their order.
pub fn apply(orders: &[OrderRecord], params: &FilterParams) -> Vec<OrderRecord> {
    let filtered: Vec<OrderRecord> = orders
        .iter()
        .filter(|o| params.accepts(o))
        .cloned()
        .collect();

    debug!(
        before = orders.len(),
        after = filtered.len(),
        date_limit = %params.date_limit,
        "Applied filters"
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{date, OrderBuilder};

    fn traffic(levels: &[&str]) -> BTreeSet<String> {
        levels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_date_limit_is_exclusive() {
        let orders = vec![
            OrderBuilder::new("a").on(date(2022, 3, 1)).build(),
            OrderBuilder::new("b").on(date(2022, 3, 2)).build(),
            OrderBuilder::new("c").on(date(2022, 3, 3)).build(),
        ];
        let params = FilterParams::new(date(2022, 3, 2), traffic(&TRAFFIC_LEVELS));

        let kept = apply(&orders, &params);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "a");
    }

    #[test]
    fn test_both_predicates_must_hold_and_order_is_kept() {
        let orders = vec![
            OrderBuilder::new("1").traffic("Jam").build(),
            OrderBuilder::new("2").traffic("Low").build(),
            OrderBuilder::new("3").traffic("Jam").on(date(2022, 5, 1)).build(),
            OrderBuilder::new("4").traffic("High").build(),
            OrderBuilder::new("5").traffic("Jam").build(),
        ];
        let params = FilterParams::new(date(2022, 4, 1), traffic(&["Jam", "High"]));

        let ids: Vec<String> = apply(&orders, &params).into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["1", "4", "5"]);
    }

    #[test]
    fn test_empty_selection_gives_empty_result() {
        let orders = vec![OrderBuilder::new("1").build()];
        let params = FilterParams::new(date(2022, 4, 1), BTreeSet::new());
        assert!(apply(&orders, &params).is_empty());
    }

    #[test]
    fn test_parse_traffic() {
        assert_eq!(
            FilterParams::parse_traffic("Low, Jam").unwrap(),
            traffic(&["Low", "Jam"])
        );
        assert!(FilterParams::parse_traffic("").unwrap().is_empty());

        let err = FilterParams::parse_traffic("Low,Gridlock").unwrap_err();
        assert_eq!(err.kind(), "invalid_filter");
    }

    #[test]
    fn test_default_selects_everything() {
        let params = FilterParams::default();
        assert_eq!(params.traffic.len(), 4);
        assert_eq!(params.date_limit, date(2022, 4, 13));
    }
}
