//! Delivery-person aggregations: ratings, rankings and fleet overview.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{DerivedRow, DerivedTable, GroupKey, GroupSpec, Metric, Reduction};
use crate::models::{CityCategory, OrderRecord};

/// Rows kept per city by [`top_couriers`].
pub const TOP_COURIERS_PER_CITY: usize = 10;

/// Ranking direction for [`top_couriers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speed {
    /// Lowest mean delivery time first.
    Fastest,
    /// Highest mean delivery time first.
    Slowest,
}

/// Mean rating per delivery person.
pub fn mean_rating_per_courier(orders: &[OrderRecord]) -> DerivedTable {
    GroupSpec::new(vec![GroupKey::DeliveryPerson])
        .reduce(Reduction::Mean(Metric::Rating, "Delivery_person_Ratings"))
        .evaluate(orders)
}

/// Mean and standard deviation of ratings per traffic level.
pub fn rating_by_traffic(orders: &[OrderRecord]) -> DerivedTable {
    rating_stats(GroupKey::TrafficDensity).evaluate(orders)
}

/// Mean and standard deviation of ratings per weather condition.
pub fn rating_by_weather(orders: &[OrderRecord]) -> DerivedTable {
    rating_stats(GroupKey::Weather).evaluate(orders)
}

fn rating_stats(key: GroupKey) -> GroupSpec {
    GroupSpec::new(vec![key])
        .reduce(Reduction::Mean(Metric::Rating, "delivery_mean"))
        .reduce(Reduction::Std(Metric::Rating, "delivery_std"))
}

/// Ten fastest (or slowest) delivery people of each city by mean delivery
/// time, concatenated Metropolitan, Urban, Semi-Urban.
///
/// Cities missing from `orders` contribute no rows; orders from cities
/// outside the three categories are ignored. Ties go to the lower id.
pub fn top_couriers(orders: &[OrderRecord], speed: Speed) -> DerivedTable {
    let by_courier = GroupSpec::new(vec![GroupKey::City, GroupKey::DeliveryPerson])
        .reduce(Reduction::Mean(Metric::TimeTaken, "Time_taken(min)"))
        .evaluate(orders);

    let DerivedTable {
        key_columns,
        value_columns,
        rows,
    } = by_courier;

    let mut ranked = Vec::new();
    for city in CityCategory::ALL {
        let mut in_city: Vec<DerivedRow> = rows
            .iter()
            .filter(|r| r.keys[0].as_text().and_then(CityCategory::from_label) == Some(city))
            .cloned()
            .collect();

        in_city.sort_by(|a, b| {
            let by_time = a.values[0].total_cmp(&b.values[0]);
            let by_time = match speed {
                Speed::Fastest => by_time,
                Speed::Slowest => by_time.reverse(),
            };
            match by_time {
                Ordering::Equal => a.keys[1].cmp(&b.keys[1]),
                other => other,
            }
        });
        in_city.truncate(TOP_COURIERS_PER_CITY);
        ranked.extend(in_city);
    }

    DerivedTable {
        key_columns,
        value_columns,
        rows: ranked,
    }
}

/// Headline fleet numbers for the couriers page; `None` when no orders are
/// left after filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourierOverview {
    pub oldest_age: u32,
    pub youngest_age: u32,
    pub best_vehicle_condition: i32,
    pub worst_vehicle_condition: i32,
}

pub fn courier_overview(orders: &[OrderRecord]) -> Option<CourierOverview> {
    let table = GroupSpec::new(vec![])
        .reduce(Reduction::Max(Metric::Age, "oldest"))
        .reduce(Reduction::Min(Metric::Age, "youngest"))
        .reduce(Reduction::Max(Metric::VehicleCondition, "best"))
        .reduce(Reduction::Min(Metric::VehicleCondition, "worst"))
        .evaluate(orders);

    let row = table.rows.first()?;

    Some(CourierOverview {
        oldest_age: row.values[0] as u32,
        youngest_age: row.values[1] as u32,
        best_vehicle_condition: row.values[2] as i32,
        worst_vehicle_condition: row.values[3] as i32,
    })
}
