//! REST API Server for the Curry Company dashboard
//!
//! Usage:
//!   ./target/release/api_server [options]
//!
//! Options:
//!   --port PORT       Port to listen on (default: 8080)
//!   --dataset PATH    Order CSV (default: dataset/train.csv, env DASHBOARD_DATASET)
//!
//! REST endpoints:
//!   GET /api/v1/health              - Health check
//!   GET /api/v1/filters             - Date slider bounds and traffic options
//!   GET /api/v1/pages/:page         - company, couriers or restaurants
//!                                     (?date_limit=YYYY-MM-DD&traffic=Low,Jam)

use anyhow::Result;
use clap::Parser;
use curry_dashboard::api::{create_router, DashboardService};
use curry_dashboard::config::{DashboardConfig, DATASET_ENV};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "api_server")]
#[command(about = "Serve the dashboard pages as JSON")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Order CSV path
    #[arg(long, env = DATASET_ENV)]
    dataset: Option<PathBuf>,
}

fn print_banner(port: u16, config: &DashboardConfig) {
    println!("============================================================");
    println!("         CURRY COMPANY DASHBOARD API SERVER");
    println!("============================================================");
    println!();
    println!("  Port:     {}", port);
    println!("  REST:     http://localhost:{}/api/v1/", port);
    println!("  Dataset:  {}", config.dataset_path.display());
    println!();
    println!("REST Endpoints:");
    println!("  GET /api/v1/health              Health check");
    println!("  GET /api/v1/filters             Filter options");
    println!("  GET /api/v1/pages/company       Company view");
    println!("  GET /api/v1/pages/couriers      Couriers view");
    println!("  GET /api/v1/pages/restaurants   Restaurants view");
    println!();
    println!("============================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let args = Args::parse();

    let mut config = DashboardConfig::from_env();
    if let Some(path) = args.dataset {
        config = config.with_dataset(path);
    }

    print_banner(args.port, &config);

    let service = Arc::new(DashboardService::new(config));
    let app = create_router(service);

    let addr: SocketAddr = format!("0.0.0.0:{}", args.port).parse()?;
    tracing::info!("Starting REST server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
