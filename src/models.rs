use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Layout of the `Order_Date` column.
pub const ORDER_DATE_FORMAT: &str = "%d-%m-%Y";

/// Raw record from CSV ingestion, one field per source column.
///
/// Text columns are kept exactly as stored (padding and `NaN` sentinels
/// included); only the columns the file stores as plain numbers are decoded.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawOrderRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Delivery_person_ID")]
    pub delivery_person_id: String,
    #[serde(rename = "Delivery_person_Age")]
    pub delivery_person_age: String,
    #[serde(rename = "Delivery_person_Ratings")]
    pub delivery_person_ratings: String,
    #[serde(rename = "Restaurant_latitude")]
    pub restaurant_latitude: f64,
    #[serde(rename = "Restaurant_longitude")]
    pub restaurant_longitude: f64,
    #[serde(rename = "Delivery_location_latitude")]
    pub delivery_location_latitude: f64,
    #[serde(rename = "Delivery_location_longitude")]
    pub delivery_location_longitude: f64,
    #[serde(rename = "Order_Date")]
    pub order_date: String,
    #[serde(rename = "Time_Orderd")]
    pub time_ordered: String,
    #[serde(rename = "Time_Order_picked")]
    pub time_order_picked: String,
    #[serde(rename = "Weatherconditions")]
    pub weather_conditions: String,
    #[serde(rename = "Road_traffic_density")]
    pub road_traffic_density: String,
    #[serde(rename = "Vehicle_condition")]
    pub vehicle_condition: i32,
    #[serde(rename = "Type_of_order")]
    pub type_of_order: String,
    #[serde(rename = "Type_of_vehicle")]
    pub type_of_vehicle: String,
    #[serde(rename = "multiple_deliveries")]
    pub multiple_deliveries: String,
    #[serde(rename = "Festival")]
    pub festival: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Time_taken(min)")]
    pub time_taken: String,
}

/// Header names of the source file, in file order.
pub const SOURCE_COLUMNS: [&str; 20] = [
    "ID",
    "Delivery_person_ID",
    "Delivery_person_Age",
    "Delivery_person_Ratings",
    "Restaurant_latitude",
    "Restaurant_longitude",
    "Delivery_location_latitude",
    "Delivery_location_longitude",
    "Order_Date",
    "Time_Orderd",
    "Time_Order_picked",
    "Weatherconditions",
    "Road_traffic_density",
    "Vehicle_condition",
    "Type_of_order",
    "Type_of_vehicle",
    "multiple_deliveries",
    "Festival",
    "City",
    "Time_taken(min)",
];

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Canonical order, the output of the cleaning pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    pub delivery_person_id: String,
    pub delivery_person_age: u32,
    pub delivery_person_rating: f64,
    pub restaurant: Coordinate,
    pub delivery_location: Coordinate,
    pub order_date: NaiveDate,
    pub time_ordered: String,
    pub time_order_picked: String,
    pub weather_conditions: String,
    pub road_traffic_density: String,
    pub vehicle_condition: i32,
    pub type_of_order: String,
    pub type_of_vehicle: String,
    pub multiple_deliveries: u32,
    pub festival: String,
    pub city: String,
    pub time_taken_min: u32,
}

impl OrderRecord {
    /// Render the order back into source form, with a bare integer time
    /// taken and the date in `DD-MM-YYYY`.
    pub fn to_raw(&self) -> RawOrderRecord {
        RawOrderRecord {
            id: self.id.clone(),
            delivery_person_id: self.delivery_person_id.clone(),
            delivery_person_age: self.delivery_person_age.to_string(),
            delivery_person_ratings: self.delivery_person_rating.to_string(),
            restaurant_latitude: self.restaurant.latitude,
            restaurant_longitude: self.restaurant.longitude,
            delivery_location_latitude: self.delivery_location.latitude,
            delivery_location_longitude: self.delivery_location.longitude,
            order_date: self.order_date.format(ORDER_DATE_FORMAT).to_string(),
            time_ordered: self.time_ordered.clone(),
            time_order_picked: self.time_order_picked.clone(),
            weather_conditions: self.weather_conditions.clone(),
            road_traffic_density: self.road_traffic_density.clone(),
            vehicle_condition: self.vehicle_condition,
            type_of_order: self.type_of_order.clone(),
            type_of_vehicle: self.type_of_vehicle.clone(),
            multiple_deliveries: self.multiple_deliveries.to_string(),
            festival: self.festival.clone(),
            city: self.city.clone(),
            time_taken: self.time_taken_min.to_string(),
        }
    }
}

/// Road traffic levels offered by the traffic filter.
pub const TRAFFIC_LEVELS: [&str; 4] = ["Low", "Medium", "High", "Jam"];

/// City category, in the order the courier rankings are concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CityCategory {
    Metropolitan,
    Urban,
    SemiUrban,
}

impl CityCategory {
    pub const ALL: [CityCategory; 3] = [
        CityCategory::Metropolitan,
        CityCategory::Urban,
        CityCategory::SemiUrban,
    ];

    /// Match a trimmed `City` value. The dataset spells the first category
    /// "Metropolitian"; the dictionary spelling is accepted as well.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Metropolitian" | "Metropolitan" => Some(CityCategory::Metropolitan),
            "Urban" => Some(CityCategory::Urban),
            "Semi-Urban" => Some(CityCategory::SemiUrban),
            _ => None,
        }
    }

    /// Label as it appears in the dataset.
    pub fn label(&self) -> &'static str {
        match self {
            CityCategory::Metropolitan => "Metropolitian",
            CityCategory::Urban => "Urban",
            CityCategory::SemiUrban => "Semi-Urban",
        }
    }
}
