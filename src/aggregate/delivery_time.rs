//! Delivery-time aggregations for the restaurants page.

use serde::{Deserialize, Serialize};

use super::{mean, DerivedTable, GroupKey, GroupSpec, Metric, Reduction};
use crate::distance::round2;
use crate::error::{DashboardError, Result};
use crate::models::OrderRecord;

/// Statistic picked by [`festival_delivery_time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FestivalStat {
    Mean,
    Std,
}

impl FestivalStat {
    fn column(&self) -> &'static str {
        match self {
            FestivalStat::Mean => "avg_time",
            FestivalStat::Std => "std_time",
        }
    }
}

fn time_stats(keys: Vec<GroupKey>) -> GroupSpec {
    GroupSpec::new(keys)
        .reduce(Reduction::Mean(Metric::TimeTaken, "avg_time"))
        .reduce(Reduction::Std(Metric::TimeTaken, "std_time"))
}

/// Mean or standard deviation of delivery time for orders whose festival
/// flag equals `festival`, rounded to 2 decimals.
pub fn festival_delivery_time(
    orders: &[OrderRecord],
    festival: &str,
    stat: FestivalStat,
) -> Result<f64> {
    let table = time_stats(vec![GroupKey::Festival]).evaluate(orders);

    let row = (0..table.len())
        .find(|&i| table.text_key(i, 0) == Some(festival))
        .ok_or_else(|| DashboardError::empty_group(format!("festival '{}'", festival)))?;

    let value = table
        .value(row, stat.column())
        .ok_or_else(|| DashboardError::empty_group(format!("festival '{}'", festival)))?;
    Ok(round2(value))
}

/// Mean/std delivery time per city (bar chart with error bars).
pub fn time_by_city(orders: &[OrderRecord]) -> DerivedTable {
    time_stats(vec![GroupKey::City]).evaluate(orders)
}

/// Mean/std delivery time per (city, order type).
pub fn time_by_city_and_order_type(orders: &[OrderRecord]) -> DerivedTable {
    time_stats(vec![GroupKey::City, GroupKey::OrderType]).evaluate(orders)
}

/// Sunburst feed: mean/std time per (city, traffic) plus the colour scale
/// midpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunburstTable {
    pub table: DerivedTable,
    /// Unweighted mean of the group standard deviations; groups without a
    /// deviation (a single order) are left out.
    pub color_midpoint: f64,
}

pub fn time_by_city_and_traffic(orders: &[OrderRecord]) -> SunburstTable {
    let table = time_stats(vec![GroupKey::City, GroupKey::TrafficDensity]).evaluate(orders);
    let deviations: Vec<f64> = table
        .column("std_time")
        .into_iter()
        .filter(|v| !v.is_nan())
        .collect();

    SunburstTable {
        color_midpoint: mean(&deviations),
        table,
    }
}

/// Number of distinct delivery people.
pub fn unique_couriers(orders: &[OrderRecord]) -> usize {
    GroupSpec::new(vec![GroupKey::DeliveryPerson])
        .evaluate(orders)
        .len()
}
