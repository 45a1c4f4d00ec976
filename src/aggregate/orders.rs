//! Order-volume aggregations for the company page.

use chrono::NaiveDate;

use super::{DerivedTable, GroupKey, GroupSpec, Metric, Reduction};
use crate::error::{DashboardError, Result};
use crate::models::OrderRecord;

/// Sunday-based week of the year, zero padded (`%U`).
pub fn week_of_year(date: NaiveDate) -> String {
    date.format("%U").to_string()
}

/// Order count per order date.
pub fn orders_per_day(orders: &[OrderRecord]) -> DerivedTable {
    GroupSpec::new(vec![GroupKey::OrderDate])
        .reduce(Reduction::Count("ID"))
        .evaluate(orders)
}

/// Order count per traffic level and its share of all orders
/// (`ID`, `entregas_perc`).
pub fn traffic_order_share(orders: &[OrderRecord]) -> DerivedTable {
    GroupSpec::new(vec![GroupKey::TrafficDensity])
        .reduce(Reduction::Count("ID"))
        .reduce(Reduction::Share("entregas_perc"))
        .evaluate(orders)
}

/// Order count per (city, traffic level).
pub fn orders_by_city_and_traffic(orders: &[OrderRecord]) -> DerivedTable {
    GroupSpec::new(vec![GroupKey::City, GroupKey::TrafficDensity])
        .reduce(Reduction::Count("ID"))
        .evaluate(orders)
}

/// Order count per week of year.
pub fn orders_per_week(orders: &[OrderRecord]) -> DerivedTable {
    GroupSpec::new(vec![GroupKey::WeekOfYear])
        .reduce(Reduction::Count("ID"))
        .evaluate(orders)
}

/// Orders per active delivery person, per week.
///
/// Columns: `ID` (orders), `Delivery_person_ID` (distinct couriers) and
/// `order_by_deliver`. A week without couriers has no defined ratio and
/// fails the computation.
pub fn orders_per_courier_per_week(orders: &[OrderRecord]) -> Result<DerivedTable> {
    let mut table = GroupSpec::new(vec![GroupKey::WeekOfYear])
        .reduce(Reduction::Count("ID"))
        .reduce(Reduction::UniqueCouriers("Delivery_person_ID"))
        .evaluate(orders);

    let ratios = table
        .rows
        .iter()
        .map(|row| {
            let (orders, couriers) = (row.values[0], row.values[1]);
            if couriers == 0.0 {
                return Err(DashboardError::empty_group(format!(
                    "delivery people in week {}",
                    row.keys[0]
                )));
            }
            Ok(orders / couriers)
        })
        .collect::<Result<Vec<f64>>>()?;

    table.push_column("order_by_deliver", ratios);
    Ok(table)
}

/// Median delivery location per (city, traffic level), one map marker each.
pub fn delivery_map_markers(orders: &[OrderRecord]) -> DerivedTable {
    GroupSpec::new(vec![GroupKey::City, GroupKey::TrafficDensity])
        .reduce(Reduction::Median(Metric::DeliveryLatitude, "Delivery_location_latitude"))
        .reduce(Reduction::Median(Metric::DeliveryLongitude, "Delivery_location_longitude"))
        .evaluate(orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{date, OrderBuilder};
    use crate::models::Coordinate;

    #[test]
    fn test_week_numbers_start_on_sunday() {
        // 2022-01-01 was a Saturday: still week 00.
        assert_eq!(week_of_year(date(2022, 1, 1)), "00");
        assert_eq!(week_of_year(date(2022, 1, 2)), "01");
        assert_eq!(week_of_year(date(2022, 3, 19)), "11");
        assert_eq!(week_of_year(date(2022, 3, 20)), "12");
    }

    #[test]
    fn test_orders_per_day() {
        let orders = vec![
            OrderBuilder::new("1").on(date(2022, 3, 2)).build(),
            OrderBuilder::new("2").on(date(2022, 3, 1)).build(),
            OrderBuilder::new("3").on(date(2022, 3, 2)).build(),
        ];
        let table = orders_per_day(&orders);

        assert_eq!(table.key(0, 0).and_then(|k| k.as_date()), Some(date(2022, 3, 1)));
        assert_eq!(table.column("ID"), vec![1.0, 2.0]);
    }

    #[test]
    fn test_traffic_shares_sum_to_one() {
        let levels = ["Low", "Medium", "High", "Jam", "Low", "Jam", "Jam"];
        let orders: Vec<OrderRecord> = levels
            .iter()
            .enumerate()
            .map(|(i, t)| OrderBuilder::new(&i.to_string()).traffic(t).build())
            .collect();
        let table = traffic_order_share(&orders);

        let total: f64 = table.column("entregas_perc").iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(table.text_key(1, 0), Some("Jam"));
        assert_eq!(table.value(1, "ID"), Some(3.0));
    }

    #[test]
    fn test_city_and_traffic_counts() {
        let orders = vec![
            OrderBuilder::new("1").city("Urban").traffic("Low").build(),
            OrderBuilder::new("2").city("Urban").traffic("Low").build(),
            OrderBuilder::new("3").city("Semi-Urban").traffic("Jam").build(),
        ];
        let table = orders_by_city_and_traffic(&orders);

        assert_eq!(table.key_columns, vec!["City", "Road_traffic_density"]);
        assert_eq!(table.text_key(0, 0), Some("Semi-Urban"));
        assert_eq!(table.column("ID"), vec![1.0, 2.0]);
    }

    #[test]
    fn test_orders_per_courier_per_week() {
        let orders = vec![
            OrderBuilder::new("1").on(date(2022, 3, 14)).courier("A").build(),
            OrderBuilder::new("2").on(date(2022, 3, 15)).courier("A").build(),
            OrderBuilder::new("3").on(date(2022, 3, 16)).courier("B").build(),
            OrderBuilder::new("4").on(date(2022, 3, 16)).courier("A").build(),
            OrderBuilder::new("5").on(date(2022, 3, 21)).courier("C").build(),
        ];
        let table = orders_per_courier_per_week(&orders).unwrap();

        assert_eq!(table.text_key(0, 0), Some("11"));
        assert_eq!(table.value(0, "ID"), Some(4.0));
        assert_eq!(table.value(0, "Delivery_person_ID"), Some(2.0));
        assert_eq!(table.value(0, "order_by_deliver"), Some(2.0));
        assert_eq!(table.value(1, "order_by_deliver"), Some(1.0));
        assert_eq!(orders_per_week(&orders).column("ID"), vec![4.0, 1.0]);
    }

    #[test]
    fn test_map_markers_take_median_location() {
        let origin = Coordinate::new(12.0, 77.0);
        let orders = vec![
            OrderBuilder::new("1").route(origin, Coordinate::new(13.0, 78.0)).build(),
            OrderBuilder::new("2").route(origin, Coordinate::new(13.2, 78.4)).build(),
            OrderBuilder::new("3").route(origin, Coordinate::new(19.0, 70.0)).build(),
        ];
        let table = delivery_map_markers(&orders);

        assert_eq!(table.len(), 1);
        assert_eq!(table.value(0, "Delivery_location_latitude"), Some(13.2));
        assert_eq!(table.value(0, "Delivery_location_longitude"), Some(78.0));
    }
}
