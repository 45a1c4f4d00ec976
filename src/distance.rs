//! Great-circle distance between restaurant and delivery location.

use crate::aggregate::{DerivedTable, GroupKey, GroupSpec, Metric, Reduction};
use crate::error::{DashboardError, Result};
use crate::models::{Coordinate, OrderRecord};

/// Mean Earth radius in kilometres (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Haversine distance in kilometres.
pub fn haversine(a: Coordinate, b: Coordinate) -> f64 {
    let to_rad = |deg: f64| deg.to_radians();
    let dlat = to_rad(b.latitude - a.latitude);
    let dlon = to_rad(b.longitude - a.longitude);
    let h = (dlat / 2.0).sin().powi(2)
        + to_rad(a.latitude).cos() * to_rad(b.latitude).cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Distance travelled for one order.
pub fn order_distance(order: &OrderRecord) -> f64 {
    haversine(order.restaurant, order.delivery_location)
}

/// Each order paired with its `distance` value.
pub fn with_distances(orders: &[OrderRecord]) -> Vec<(&OrderRecord, f64)> {
    orders.iter().map(|o| (o, order_distance(o))).collect()
}

/// Mean delivery distance over all orders, rounded to 2 decimals.
pub fn mean_distance(orders: &[OrderRecord]) -> Result<f64> {
    if orders.is_empty() {
        return Err(DashboardError::empty_group("delivery distance"));
    }
    let total: f64 = with_distances(orders).iter().map(|(_, d)| d).sum();
    Ok(round2(total / orders.len() as f64))
}

/// Mean delivery distance per city (columns `City`, `distance`).
pub fn distance_by_city(orders: &[OrderRecord]) -> DerivedTable {
    GroupSpec::new(vec![GroupKey::City])
        .reduce(Reduction::Mean(Metric::Distance, "distance"))
        .evaluate(orders)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::OrderBuilder;

    const BANGALORE: Coordinate = Coordinate { latitude: 12.9716, longitude: 77.5946 };
    const MYSORE: Coordinate = Coordinate { latitude: 12.2958, longitude: 76.6394 };

    #[test]
    fn test_zero_for_same_point() {
        assert_eq!(haversine(BANGALORE, BANGALORE), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let there = haversine(BANGALORE, MYSORE);
        let back = haversine(MYSORE, BANGALORE);
        assert!((there - back).abs() < 1e-9);
        // Roughly 128 km as the crow flies.
        assert!((there - 128.0).abs() < 0.5, "got {}", there);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = haversine(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_mean_distance_rounds() {
        let orders = vec![
            OrderBuilder::new("1")
                .route(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0))
                .build(),
            OrderBuilder::new("2")
                .route(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.0))
                .build(),
        ];
        assert_eq!(mean_distance(&orders).unwrap(), 55.6);
    }

    #[test]
    fn test_mean_distance_of_nothing_is_error() {
        assert!(matches!(mean_distance(&[]), Err(DashboardError::EmptyGroup { .. })));
    }

    #[test]
    fn test_by_city_uses_same_row_distance() {
        let orders = vec![
            OrderBuilder::new("1").city("Urban").route(BANGALORE, MYSORE).build(),
            OrderBuilder::new("2").city("Urban").route(MYSORE, BANGALORE).build(),
            OrderBuilder::new("3").city("Semi-Urban").route(BANGALORE, BANGALORE).build(),
        ];
        let table = distance_by_city(&orders);

        assert_eq!(table.len(), 2);
        assert_eq!(table.text_key(0, 0), Some("Semi-Urban"));
        assert_eq!(table.value(0, "distance"), Some(0.0));
        let urban = table.value(1, "distance").unwrap();
        assert!((urban - haversine(BANGALORE, MYSORE)).abs() < 1e-9);
    }
}
