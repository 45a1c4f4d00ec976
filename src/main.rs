//! Dashboard CLI - renders the marketplace pages to the console
//!
//! Run: ./target/release/dashboard [page] [--date-limit YYYY-MM-DD] [--traffic Low,Jam]
//! Pages: all, company, couriers, restaurants

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use curry_dashboard::aggregate::DerivedTable;
use curry_dashboard::config::{DashboardConfig, DATASET_ENV};
use curry_dashboard::pages::{self, Page, PageKind, Panel};
use curry_dashboard::{FilterParams, Pipeline};
use std::path::PathBuf;
use tracing::info;

/// Curry Company marketplace dashboard
#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(about = "Render the company, couriers and restaurants pages for a filter")]
struct Args {
    /// Page to render: all, company, couriers, restaurants
    #[arg(default_value = "all")]
    page: String,

    /// Order CSV path
    #[arg(long, env = DATASET_ENV)]
    dataset: Option<PathBuf>,

    /// Keep orders strictly before this date (YYYY-MM-DD)
    #[arg(long)]
    date_limit: Option<NaiveDate>,

    /// Comma-separated traffic levels to keep
    #[arg(long)]
    traffic: Option<String>,

    /// Rows shown per table
    #[arg(long, default_value = "15")]
    rows: usize,

    /// Print the pages as JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn print_section_header(title: &str) {
    println!("\n{}", "═".repeat(80));
    println!("  {}", title);
    println!("{}\n", "═".repeat(80));
}

fn print_subsection(title: &str) {
    println!("\n{}", title);
    println!("{}", "─".repeat(70));
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn print_table(table: &DerivedTable, max_rows: usize) {
    let header: Vec<&str> = table
        .key_columns
        .iter()
        .chain(&table.value_columns)
        .map(String::as_str)
        .collect();
    let header: Vec<String> = header.iter().map(|h| format!("{:>22}", h)).collect();
    println!("  {}", header.join(" "));
    println!("  {}", "─".repeat(23 * header.len()));

    for row in table.rows.iter().take(max_rows) {
        let cells: Vec<String> = row
            .keys
            .iter()
            .map(|k| format!("{:>22}", k.to_string()))
            .chain(row.values.iter().map(|v| format!("{:>22}", format_value(*v))))
            .collect();
        println!("  {}", cells.join(" "));
    }
    if table.len() > max_rows {
        println!("  ... {} more rows", table.len() - max_rows);
    }
}

fn print_page(page: &Page, max_rows: usize) {
    print_section_header(&format!("{} ({} orders)", page.title, page.orders));

    for section in &page.sections {
        print_subsection(section.title);
        for panel in &section.panels {
            match panel {
                Panel::Metric { label, value } => {
                    let value = value.map(format_value).unwrap_or_else(|| "-".to_string());
                    println!("  {:40} {:>12}", label, value);
                }
                Panel::Chart { title, kind, table, .. } => {
                    println!("\n  {} [{:?}]", title, kind);
                    print_table(table, max_rows);
                }
                Panel::Table { title, table } => {
                    println!("\n  {}", title);
                    print_table(table, max_rows);
                }
            }
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let kinds: Vec<PageKind> = match args.page.as_str() {
        "all" => PageKind::ALL.to_vec(),
        other => match other.parse() {
            Ok(kind) => vec![kind],
            Err(_) => bail!(
                "Unknown page: {} (available: all, company, couriers, restaurants)",
                other
            ),
        },
    };

    let mut config = DashboardConfig::from_env();
    if let Some(path) = args.dataset {
        config = config.with_dataset(path);
    }

    let mut params = config.default_filters();
    if let Some(limit) = args.date_limit {
        params.date_limit = limit;
    }
    if let Some(list) = &args.traffic {
        params.traffic = FilterParams::parse_traffic(list)?;
    }

    let pipeline = Pipeline::new(&config);
    info!(dataset = %pipeline.dataset_path().display(), "Rendering dashboard");

    let orders = pipeline
        .run(&params)
        .with_context(|| format!("running pipeline over {}", pipeline.dataset_path().display()))?;

    for kind in kinds {
        let page = pages::render(kind, &orders)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&page)?);
        } else {
            print_page(&page, args.rows);
        }
    }

    Ok(())
}
