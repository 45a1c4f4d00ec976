//! Cleaning pipeline: raw CSV rows into canonical orders.
//!
//! The steps run in a fixed order and later steps rely on the earlier ones:
//!
//! 1. drop rows whose gating columns hold the `NaN` sentinel
//! 2. coerce age, rating and multiple-deliveries to numbers
//! 3. trim every text column
//! 4. parse the order date
//! 5. extract the minutes from the time-taken column
//!
//! [`clean`] is pure and idempotent over [`OrderRecord::to_raw`] output.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{DashboardError, Result};
use crate::models::{Coordinate, OrderRecord, RawOrderRecord, ORDER_DATE_FORMAT};

/// Missing-value markers used by the source file. Two columns carry a
/// trailing space after the marker; both spellings count everywhere.
pub const MISSING_SENTINELS: [&str; 2] = ["NaN", "NaN "];

/// Text before the minutes in the time-taken column.
pub const TIME_TAKEN_DELIMITER: &str = "(min) ";

/// Run the full cleaning pipeline over `raw`.
///
/// Each step runs over the whole table before the next one starts, so with
/// several bad rows the error reported is the one from the earliest step.
pub fn clean(raw: &[RawOrderRecord]) -> Result<Vec<OrderRecord>> {
    let kept: Vec<(usize, &RawOrderRecord)> = raw
        .iter()
        .enumerate()
        .filter(|(_, record)| !is_gated(record))
        .map(|(i, record)| (i + 1, record))
        .collect();
    debug!(rows = raw.len(), kept = kept.len(), "Gated missing values");

    let numbers = kept
        .iter()
        .map(|&(line, record)| NumericColumns::coerce(line, record))
        .collect::<Result<Vec<_>>>()?;

    let dates = kept
        .iter()
        .map(|&(line, record)| parse_order_date(line, &record.order_date))
        .collect::<Result<Vec<_>>>()?;

    let minutes = kept
        .iter()
        .map(|&(line, record)| extract_time_taken(line, &record.time_taken))
        .collect::<Result<Vec<_>>>()?;

    let orders: Vec<OrderRecord> = kept
        .iter()
        .zip(numbers)
        .zip(dates)
        .zip(minutes)
        .map(|(((&(_, record), numbers), order_date), time_taken_min)| {
            canonical_order(record, numbers, order_date, time_taken_min)
        })
        .collect();

    let gated = raw.len() - orders.len();
    info!(rows = raw.len(), gated, kept = orders.len(), "Cleaned order table");
    Ok(orders)
}

/// True when any gating column holds a missing-value sentinel.
///
/// Comparison is exact and happens before trimming.
pub fn is_gated(record: &RawOrderRecord) -> bool {
    [
        &record.delivery_person_age,
        &record.multiple_deliveries,
        &record.road_traffic_density,
        &record.city,
        &record.festival,
    ]
    .iter()
    .any(|value| MISSING_SENTINELS.contains(&value.as_str()))
}

/// Columns coerced to numbers before any text is touched.
struct NumericColumns {
    age: u32,
    rating: f64,
    multiple_deliveries: u32,
}

impl NumericColumns {
    fn coerce(line: usize, record: &RawOrderRecord) -> Result<Self> {
        Ok(Self {
            age: parse_number(line, "Delivery_person_Age", &record.delivery_person_age, "integer")?,
            rating: parse_number(
                line,
                "Delivery_person_Ratings",
                &record.delivery_person_ratings,
                "float",
            )?,
            multiple_deliveries: parse_number(
                line,
                "multiple_deliveries",
                &record.multiple_deliveries,
                "integer",
            )?,
        })
    }
}

/// Assemble one order from its coerced values, trimming every text column.
fn canonical_order(
    record: &RawOrderRecord,
    numbers: NumericColumns,
    order_date: NaiveDate,
    time_taken_min: u32,
) -> OrderRecord {
    OrderRecord {
        id: record.id.trim().to_string(),
        delivery_person_id: record.delivery_person_id.trim().to_string(),
        delivery_person_age: numbers.age,
        delivery_person_rating: numbers.rating,
        restaurant: Coordinate::new(record.restaurant_latitude, record.restaurant_longitude),
        delivery_location: Coordinate::new(
            record.delivery_location_latitude,
            record.delivery_location_longitude,
        ),
        order_date,
        time_ordered: record.time_ordered.trim().to_string(),
        time_order_picked: record.time_order_picked.trim().to_string(),
        weather_conditions: record.weather_conditions.trim().to_string(),
        road_traffic_density: record.road_traffic_density.trim().to_string(),
        vehicle_condition: record.vehicle_condition,
        type_of_order: record.type_of_order.trim().to_string(),
        type_of_vehicle: record.type_of_vehicle.trim().to_string(),
        multiple_deliveries: numbers.multiple_deliveries,
        festival: record.festival.trim().to_string(),
        city: record.city.trim().to_string(),
        time_taken_min,
    }
}

fn parse_number<T: std::str::FromStr>(
    line: usize,
    column: &'static str,
    value: &str,
    expected: &'static str,
) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| DashboardError::TypeCoercion {
        line,
        column,
        value: value.to_string(),
        expected,
    })
}

/// Parse a `DD-MM-YYYY` order date.
pub fn parse_order_date(line: usize, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ORDER_DATE_FORMAT).map_err(|_| {
        DashboardError::DateParse {
            line,
            value: value.to_string(),
        }
    })
}

/// Minutes from a `"(min) 24"` style field. A bare integer is accepted so
/// that already-clean data passes through unchanged.
pub fn extract_time_taken(line: usize, value: &str) -> Result<u32> {
    let digits = match value.split_once(TIME_TAKEN_DELIMITER) {
        Some((_, minutes)) => minutes,
        None => value,
    };

    let parsed = digits.trim().parse::<u32>();
    debug!(line, value, ok = parsed.is_ok(), "Extracted time taken");
    parsed.map_err(|_| DashboardError::TimeParse {
        line,
        value: value.to_string(),
    })
}
