//! Group-by/aggregate engine and the dashboard's named aggregations.
//!
//! Every aggregation is described as a [`GroupSpec`]: the key columns to
//! group on and the reductions to compute per group. Evaluating a spec over
//! the filtered orders yields a [`DerivedTable`] whose rows come out in
//! ascending key order.

pub mod couriers;
pub mod delivery_time;
pub mod orders;

use std::collections::BTreeMap;
use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::distance::order_distance;
use crate::models::OrderRecord;

pub use couriers::{
    courier_overview, mean_rating_per_courier, rating_by_traffic, rating_by_weather, top_couriers,
    CourierOverview, Speed, TOP_COURIERS_PER_CITY,
};
pub use delivery_time::{
    festival_delivery_time, time_by_city, time_by_city_and_order_type, time_by_city_and_traffic,
    unique_couriers, FestivalStat, SunburstTable,
};
pub use orders::{
    delivery_map_markers, orders_by_city_and_traffic, orders_per_courier_per_week, orders_per_day,
    orders_per_week, traffic_order_share, week_of_year,
};

// ============================================================================
// Keys, metrics, reductions
// ============================================================================

/// Column an aggregation can group on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    City,
    TrafficDensity,
    Festival,
    Weather,
    OrderType,
    OrderDate,
    WeekOfYear,
    DeliveryPerson,
}

impl GroupKey {
    pub fn column(&self) -> &'static str {
        match self {
            GroupKey::City => "City",
            GroupKey::TrafficDensity => "Road_traffic_density",
            GroupKey::Festival => "Festival",
            GroupKey::Weather => "Weatherconditions",
            GroupKey::OrderType => "Type_of_order",
            GroupKey::OrderDate => "Order_Date",
            GroupKey::WeekOfYear => "week_of_year",
            GroupKey::DeliveryPerson => "Delivery_person_ID",
        }
    }

    fn extract(&self, order: &OrderRecord) -> KeyValue {
        match self {
            GroupKey::City => KeyValue::Text(order.city.clone()),
            GroupKey::TrafficDensity => KeyValue::Text(order.road_traffic_density.clone()),
            GroupKey::Festival => KeyValue::Text(order.festival.clone()),
            GroupKey::Weather => KeyValue::Text(order.weather_conditions.clone()),
            GroupKey::OrderType => KeyValue::Text(order.type_of_order.clone()),
            GroupKey::OrderDate => KeyValue::Date(order.order_date),
            GroupKey::WeekOfYear => KeyValue::Text(week_of_year(order.order_date)),
            GroupKey::DeliveryPerson => KeyValue::Text(order.delivery_person_id.clone()),
        }
    }
}

/// One grouping value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum KeyValue {
    Text(String),
    Date(NaiveDate),
}

impl KeyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            KeyValue::Text(s) => Some(s),
            KeyValue::Date(_) => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            KeyValue::Date(d) => Some(*d),
            KeyValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for KeyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyValue::Text(s) => f.write_str(s),
            KeyValue::Date(d) => write!(f, "{}", d),
        }
    }
}

/// Numeric column a reduction can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    TimeTaken,
    Rating,
    Distance,
    DeliveryLatitude,
    DeliveryLongitude,
    Age,
    VehicleCondition,
}

impl Metric {
    fn extract(&self, order: &OrderRecord) -> f64 {
        match self {
            Metric::TimeTaken => order.time_taken_min as f64,
            Metric::Rating => order.delivery_person_rating,
            Metric::Distance => order_distance(order),
            Metric::DeliveryLatitude => order.delivery_location.latitude,
            Metric::DeliveryLongitude => order.delivery_location.longitude,
            Metric::Age => order.delivery_person_age as f64,
            Metric::VehicleCondition => order.vehicle_condition as f64,
        }
    }
}

/// Per-group reduction; the `&'static str` is the output column name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reduction {
    /// Number of orders in the group.
    Count(&'static str),
    /// Orders in the group as a fraction of all orders evaluated.
    Share(&'static str),
    /// Distinct delivery people in the group.
    UniqueCouriers(&'static str),
    Mean(Metric, &'static str),
    /// Sample standard deviation (n - 1).
    Std(Metric, &'static str),
    Median(Metric, &'static str),
    Min(Metric, &'static str),
    Max(Metric, &'static str),
}

impl Reduction {
    pub fn column(&self) -> &'static str {
        match *self {
            Reduction::Count(c)
            | Reduction::Share(c)
            | Reduction::UniqueCouriers(c)
            | Reduction::Mean(_, c)
            | Reduction::Std(_, c)
            | Reduction::Median(_, c)
            | Reduction::Min(_, c)
            | Reduction::Max(_, c) => c,
        }
    }

    fn apply(&self, group: &[&OrderRecord], total: usize) -> f64 {
        let values = |metric: &Metric| -> Vec<f64> {
            group
                .iter()
                .map(|o| metric.extract(o))
                .filter(|v| !v.is_nan())
                .collect()
        };

        match self {
            Reduction::Count(_) => group.len() as f64,
            Reduction::Share(_) => group.len() as f64 / total as f64,
            Reduction::UniqueCouriers(_) => group
                .iter()
                .map(|o| o.delivery_person_id.as_str())
                .collect::<HashSet<_>>()
                .len() as f64,
            Reduction::Mean(m, _) => mean(&values(m)),
            Reduction::Std(m, _) => sample_std(&values(m)),
            Reduction::Median(m, _) => median(values(m)),
            Reduction::Min(m, _) => values(m).into_iter().fold(f64::NAN, f64::min),
            Reduction::Max(m, _) => values(m).into_iter().fold(f64::NAN, f64::max),
        }
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

// ============================================================================
// Group spec
// ============================================================================

/// Declarative group-by: key columns plus the reductions to run per group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpec {
    pub keys: Vec<GroupKey>,
    pub reductions: Vec<Reduction>,
}

impl GroupSpec {
    pub fn new(keys: Vec<GroupKey>) -> Self {
        Self {
            keys,
            reductions: Vec::new(),
        }
    }

    pub fn reduce(mut self, reduction: Reduction) -> Self {
        self.reductions.push(reduction);
        self
    }

    /// Group `orders` and reduce each group. Rows are sorted by key.
    pub fn evaluate(&self, orders: &[OrderRecord]) -> DerivedTable {
        let mut groups: BTreeMap<Vec<KeyValue>, Vec<&OrderRecord>> = BTreeMap::new();
        for order in orders {
            let key = self.keys.iter().map(|k| k.extract(order)).collect();
            groups.entry(key).or_default().push(order);
        }

        let rows = groups
            .into_iter()
            .map(|(keys, members)| DerivedRow {
                keys,
                values: self
                    .reductions
                    .iter()
                    .map(|r| r.apply(&members, orders.len()))
                    .collect(),
            })
            .collect();

        DerivedTable {
            key_columns: self.keys.iter().map(|k| k.column().to_string()).collect(),
            value_columns: self.reductions.iter().map(|r| r.column().to_string()).collect(),
            rows,
        }
    }
}

// ============================================================================
// Derived table
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRow {
    pub keys: Vec<KeyValue>,
    pub values: Vec<f64>,
}

/// Output of an aggregation: named key columns, named value columns, rows.
///
/// Serializes as `{ "columns": [..], "records": [..] }` with one object per
/// row, see [`DerivedTable::to_records`].
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTable {
    pub key_columns: Vec<String>,
    pub value_columns: Vec<String>,
    pub rows: Vec<DerivedRow>,
}

impl DerivedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn key(&self, row: usize, key: usize) -> Option<&KeyValue> {
        self.rows.get(row)?.keys.get(key)
    }

    pub fn text_key(&self, row: usize, key: usize) -> Option<&str> {
        self.key(row, key)?.as_text()
    }

    pub fn value_index(&self, column: &str) -> Option<usize> {
        self.value_columns.iter().position(|c| c == column)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<f64> {
        let idx = self.value_index(column)?;
        self.rows.get(row)?.values.get(idx).copied()
    }

    /// Every value of one column, in row order.
    pub fn column(&self, column: &str) -> Vec<f64> {
        match self.value_index(column) {
            Some(idx) => self.rows.iter().map(|r| r.values[idx]).collect(),
            None => Vec::new(),
        }
    }

    /// Append a value column computed from each row.
    pub(crate) fn push_column(&mut self, name: &str, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.value_columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.values.push(value);
        }
    }

    /// Rows as JSON objects keyed by column name. Non-finite values become
    /// `null`.
    pub fn to_records(&self) -> Vec<serde_json::Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut record = serde_json::Map::new();
                for (name, key) in self.key_columns.iter().zip(&row.keys) {
                    record.insert(name.clone(), serde_json::json!(key));
                }
                for (name, value) in self.value_columns.iter().zip(&row.values) {
                    let value = serde_json::Number::from_f64(*value)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null);
                    record.insert(name.clone(), value);
                }
                serde_json::Value::Object(record)
            })
            .collect()
    }
}

impl Serialize for DerivedTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let columns: Vec<&str> = self
            .key_columns
            .iter()
            .chain(&self.value_columns)
            .map(String::as_str)
            .collect();

        let mut state = serializer.serialize_struct("DerivedTable", 2)?;
        state.serialize_field("columns", &columns)?;
        state.serialize_field("records", &self.to_records())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::OrderBuilder;

    fn sample() -> Vec<OrderRecord> {
        vec![
            OrderBuilder::new("1").city("Urban").traffic("Low").minutes(10).build(),
            OrderBuilder::new("2").city("Metropolitian").traffic("Jam").minutes(30).build(),
            OrderBuilder::new("3").city("Urban").traffic("Jam").minutes(20).build(),
            OrderBuilder::new("4")
                .city("Urban")
                .traffic("Low")
                .minutes(30)
                .courier("OTHER")
                .build(),
        ]
    }

    #[test]
    fn test_groups_are_key_sorted() {
        let table = GroupSpec::new(vec![GroupKey::City])
            .reduce(Reduction::Count("ID"))
            .evaluate(&sample());

        assert_eq!(table.key_columns, vec!["City"]);
        assert_eq!(table.text_key(0, 0), Some("Metropolitian"));
        assert_eq!(table.text_key(1, 0), Some("Urban"));
        assert_eq!(table.column("ID"), vec![1.0, 3.0]);
    }

    #[test]
    fn test_mean_std_median() {
        let table = GroupSpec::new(vec![GroupKey::City])
            .reduce(Reduction::Mean(Metric::TimeTaken, "avg_time"))
            .reduce(Reduction::Std(Metric::TimeTaken, "std_time"))
            .reduce(Reduction::Median(Metric::TimeTaken, "median_time"))
            .evaluate(&sample());

        // Urban: 10, 20, 30
        assert_eq!(table.value(1, "avg_time"), Some(20.0));
        assert_eq!(table.value(1, "std_time"), Some(10.0));
        assert_eq!(table.value(1, "median_time"), Some(20.0));
        // A single order has no sample deviation.
        assert!(table.value(0, "std_time").unwrap().is_nan());
    }

    #[test]
    fn test_share_and_unique_couriers() {
        let table = GroupSpec::new(vec![GroupKey::TrafficDensity])
            .reduce(Reduction::Share("share"))
            .reduce(Reduction::UniqueCouriers("couriers"))
            .evaluate(&sample());

        assert_eq!(table.column("share"), vec![0.5, 0.5]);
        // Jam: one courier; Low: COURIER01 and OTHER.
        assert_eq!(table.column("couriers"), vec![1.0, 2.0]);
    }

    #[test]
    fn test_nan_values_are_skipped() {
        let orders = vec![
            OrderBuilder::new("1").rating(4.0).build(),
            OrderBuilder::new("2").rating(f64::NAN).build(),
            OrderBuilder::new("3").rating(5.0).build(),
        ];
        let table = GroupSpec::new(vec![])
            .reduce(Reduction::Mean(Metric::Rating, "mean"))
            .reduce(Reduction::Min(Metric::Rating, "min"))
            .reduce(Reduction::Max(Metric::Rating, "max"))
            .evaluate(&orders);

        assert_eq!(table.len(), 1);
        assert_eq!(table.value(0, "mean"), Some(4.5));
        assert_eq!(table.value(0, "min"), Some(4.0));
        assert_eq!(table.value(0, "max"), Some(5.0));
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        let table = GroupSpec::new(vec![GroupKey::City])
            .reduce(Reduction::Count("ID"))
            .evaluate(&[]);
        assert!(table.is_empty());
        assert_eq!(table.value_columns, vec!["ID"]);
    }

    #[test]
    fn test_records_use_column_names() {
        let table = GroupSpec::new(vec![GroupKey::City])
            .reduce(Reduction::Std(Metric::TimeTaken, "std_time"))
            .evaluate(&sample());
        let records = table.to_records();

        assert_eq!(records[0]["City"], "Metropolitian");
        assert!(records[0]["std_time"].is_null());
        assert_eq!(records[1]["std_time"], 10.0);
    }
}
