//! Synthetic data generator for the food-delivery order dataset
//!
//! Writes a `train.csv` in the raw source layout: padded text columns,
//! `NaN ` sentinels in the gating columns and `(min) N` delivery times.
//!
//! Usage:
//!   cargo run --release --bin generate_synthetic -- [OPTIONS]
//!
//! Options:
//!   --rows <N>           Orders to generate (default: 5000)
//!   --missing-rate <F>   Probability a row carries a NaN sentinel (default: 0.03)
//!   --couriers <N>       Delivery people per restaurant hub (default: 3)
//!   --seed <N>           Random seed for reproducibility (optional)
//!   --output <PATH>      Output CSV path (default: dataset/train.csv)

use chrono::{Duration, NaiveDate, NaiveTime};
use clap::Parser;
use csv::WriterBuilder;
use curry_dashboard::models::{RawOrderRecord, ORDER_DATE_FORMAT};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::error::Error;
use std::path::PathBuf;

/// Synthetic data generator for the order dataset
#[derive(Parser, Debug)]
#[command(name = "generate_synthetic")]
#[command(about = "Generate a synthetic delivery order CSV in the raw source layout")]
struct Args {
    /// Number of orders to generate
    #[arg(long, default_value = "5000")]
    rows: usize,

    /// Probability that a row has a NaN sentinel in one gating column
    #[arg(long, default_value = "0.03")]
    missing_rate: f64,

    /// Delivery people per restaurant hub
    #[arg(long, default_value = "3")]
    couriers: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV path
    #[arg(long, default_value = "dataset/train.csv")]
    output: PathBuf,
}

/// Restaurant hub: courier id prefix, coordinates and city category.
struct Hub {
    code: &'static str,
    latitude: f64,
    longitude: f64,
    city: &'static str,
}

const HUBS: [Hub; 8] = [
    Hub { code: "BANGRES", latitude: 12.9716, longitude: 77.5946, city: "Metropolitian" },
    Hub { code: "CHENRES", latitude: 13.0827, longitude: 80.2707, city: "Metropolitian" },
    Hub { code: "HYDRES", latitude: 17.3850, longitude: 78.4867, city: "Metropolitian" },
    Hub { code: "PUNERES", latitude: 18.5204, longitude: 73.8567, city: "Urban" },
    Hub { code: "JAPRES", latitude: 26.9124, longitude: 75.7873, city: "Urban" },
    Hub { code: "INDORES", latitude: 22.7196, longitude: 75.8577, city: "Urban" },
    Hub { code: "MYSRES", latitude: 12.2958, longitude: 76.6394, city: "Semi-Urban" },
    Hub { code: "GOARES", latitude: 15.4909, longitude: 73.8278, city: "Semi-Urban" },
];

const WEATHER: [&str; 6] = [
    "conditions Sunny",
    "conditions Stormy",
    "conditions Sandstorms",
    "conditions Cloudy",
    "conditions Fog",
    "conditions Windy",
];
const TRAFFIC: [&str; 4] = ["Low ", "Medium ", "High ", "Jam "];
const ORDER_TYPES: [&str; 4] = ["Snack ", "Meal ", "Drinks ", "Buffet "];
const VEHICLES: [&str; 3] = ["motorcycle ", "scooter ", "electric_scooter "];

/// Minutes added to the base delivery time per traffic level.
const TRAFFIC_DELAY: [u32; 4] = [0, 5, 9, 14];

fn first_order_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 2, 11).unwrap_or_default()
}

/// Days covered by the dataset (2022-02-11 through 2022-04-06).
const ORDER_DAYS: i64 = 55;

fn courier_id(hub: &Hub, index: usize) -> String {
    format!("{}{:02}DEL{:02} ", hub.code, index / 3 + 1, index % 3 + 1)
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Build one raw order.
fn generate_order(index: usize, args: &Args, rng: &mut impl Rng) -> RawOrderRecord {
    let hub = &HUBS[rng.gen_range(0..HUBS.len())];
    let courier = rng.gen_range(0..args.couriers.max(1));

    let traffic_idx = rng.gen_range(0..TRAFFIC.len());
    let festival = rng.gen_bool(0.02);
    let multiple_deliveries: u32 = rng.gen_range(0..=3);

    let order_date = first_order_date() + Duration::days(rng.gen_range(0..ORDER_DAYS));
    let ordered = NaiveTime::from_hms_opt(rng.gen_range(8..23), rng.gen_range(0..60), 0)
        .unwrap_or_default();
    let picked = ordered + Duration::minutes(*[5, 10, 15].choose(rng).unwrap_or(&10));

    let minutes = 12
        + TRAFFIC_DELAY[traffic_idx]
        + multiple_deliveries * 4
        + if festival { 18 } else { 0 }
        + rng.gen_range(0..14);

    let mut record = RawOrderRecord {
        id: format!("0x{:04x} ", 0x4000 + index),
        delivery_person_id: courier_id(hub, courier),
        delivery_person_age: rng.gen_range(20..=39).to_string(),
        delivery_person_ratings: format!("{:.1}", rng.gen_range(3.5..=5.0)),
        restaurant_latitude: hub.latitude,
        restaurant_longitude: hub.longitude,
        delivery_location_latitude: hub.latitude + rng.gen_range(0.01..0.12),
        delivery_location_longitude: hub.longitude + rng.gen_range(0.01..0.12),
        order_date: order_date.format(ORDER_DATE_FORMAT).to_string(),
        time_ordered: format_time(ordered),
        time_order_picked: format_time(picked),
        weather_conditions: WEATHER[rng.gen_range(0..WEATHER.len())].to_string(),
        road_traffic_density: TRAFFIC[traffic_idx].to_string(),
        vehicle_condition: rng.gen_range(0..=2),
        type_of_order: ORDER_TYPES[rng.gen_range(0..ORDER_TYPES.len())].to_string(),
        type_of_vehicle: VEHICLES[rng.gen_range(0..VEHICLES.len())].to_string(),
        multiple_deliveries: multiple_deliveries.to_string(),
        festival: (if festival { "Yes " } else { "No " }).to_string(),
        city: format!("{} ", hub.city),
        time_taken: format!("(min) {}", minutes),
    };

    if rng.gen::<f64>() < args.missing_rate {
        match rng.gen_range(0..5) {
            0 => record.delivery_person_age = "NaN ".to_string(),
            1 => record.multiple_deliveries = "NaN ".to_string(),
            2 => record.road_traffic_density = "NaN ".to_string(),
            3 => record.city = "NaN ".to_string(),
            _ => record.festival = "NaN ".to_string(),
        }
    }

    record
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    println!("🔧 Synthetic Order Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Output:           {}", args.output.display());
    println!("Rows:             {}", args.rows);
    println!("Missing rate:     {:.1}%", args.missing_rate * 100.0);
    println!("Couriers per hub: {}", args.couriers);
    if let Some(seed) = args.seed {
        println!("Random seed:      {}", seed);
    }
    println!();

    // Initialize RNG
    let mut rng: StdRng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    // Ensure output directory exists
    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(&args.output)?;

    let mut gated = 0usize;
    for i in 0..args.rows {
        let record = generate_order(i, &args, &mut rng);
        if curry_dashboard::cleaning::is_gated(&record) {
            gated += 1;
        }
        writer.serialize(&record)?;

        // Progress indicator
        if (i + 1) % 10000 == 0 {
            println!("   Generated {}/{} orders...", i + 1, args.rows);
        }
    }

    writer.flush()?;

    println!("\n✅ Generation complete!");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Orders written:    {:>8}", args.rows);
    println!("With sentinels:    {:>8}", gated);
    println!("Output file:       {}", args.output.display());

    Ok(())
}
