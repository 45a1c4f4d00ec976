//! Canonical order builders shared by unit tests.

use chrono::NaiveDate;

use crate::models::{Coordinate, OrderRecord};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub struct OrderBuilder {
    order: OrderRecord,
}

impl OrderBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            order: OrderRecord {
                id: id.to_string(),
                delivery_person_id: "COURIER01".to_string(),
                delivery_person_age: 30,
                delivery_person_rating: 4.5,
                restaurant: Coordinate::new(12.9716, 77.5946),
                delivery_location: Coordinate::new(13.0016, 77.6246),
                order_date: date(2022, 3, 10),
                time_ordered: "10:00:00".to_string(),
                time_order_picked: "10:10:00".to_string(),
                weather_conditions: "conditions Sunny".to_string(),
                road_traffic_density: "Low".to_string(),
                vehicle_condition: 1,
                type_of_order: "Meal".to_string(),
                type_of_vehicle: "motorcycle".to_string(),
                multiple_deliveries: 0,
                festival: "No".to_string(),
                city: "Urban".to_string(),
                time_taken_min: 20,
            },
        }
    }

    pub fn courier(mut self, id: &str) -> Self {
        self.order.delivery_person_id = id.to_string();
        self
    }

    pub fn city(mut self, city: &str) -> Self {
        self.order.city = city.to_string();
        self
    }

    pub fn traffic(mut self, traffic: &str) -> Self {
        self.order.road_traffic_density = traffic.to_string();
        self
    }

    pub fn weather(mut self, weather: &str) -> Self {
        self.order.weather_conditions = weather.to_string();
        self
    }

    pub fn festival(mut self, festival: &str) -> Self {
        self.order.festival = festival.to_string();
        self
    }

    pub fn order_type(mut self, kind: &str) -> Self {
        self.order.type_of_order = kind.to_string();
        self
    }

    pub fn on(mut self, order_date: NaiveDate) -> Self {
        self.order.order_date = order_date;
        self
    }

    pub fn minutes(mut self, minutes: u32) -> Self {
        self.order.time_taken_min = minutes;
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.order.delivery_person_rating = rating;
        self
    }

    pub fn age(mut self, age: u32) -> Self {
        self.order.delivery_person_age = age;
        self
    }

    pub fn vehicle_condition(mut self, condition: i32) -> Self {
        self.order.vehicle_condition = condition;
        self
    }

    pub fn route(mut self, restaurant: Coordinate, delivery: Coordinate) -> Self {
        self.order.restaurant = restaurant;
        self.order.delivery_location = delivery;
        self
    }

    pub fn build(self) -> OrderRecord {
        self.order
    }
}
