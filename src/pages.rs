//! The three dashboard pages, assembled from filtered orders.
//!
//! A page is a list of sections, each holding charts, headline metrics or
//! plain tables. Charts carry the derived table plus the column roles the
//! renderer should bind; drawing them is left to the renderer.

use std::str::FromStr;

use serde::Serialize;

use crate::aggregate::{
    courier_overview, delivery_map_markers, festival_delivery_time, mean_rating_per_courier,
    orders_by_city_and_traffic, orders_per_courier_per_week, orders_per_day, orders_per_week,
    rating_by_traffic, rating_by_weather, time_by_city, time_by_city_and_order_type,
    time_by_city_and_traffic, top_couriers, traffic_order_share, unique_couriers, CourierOverview,
    DerivedTable, FestivalStat, Speed,
};
use crate::distance::{distance_by_city, mean_distance};
use crate::error::{DashboardError, Result};
use crate::models::OrderRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Company,
    Couriers,
    Restaurants,
}

impl PageKind {
    pub const ALL: [PageKind; 3] = [PageKind::Company, PageKind::Couriers, PageKind::Restaurants];

    pub fn slug(&self) -> &'static str {
        match self {
            PageKind::Company => "company",
            PageKind::Couriers => "couriers",
            PageKind::Restaurants => "restaurants",
        }
    }
}

impl FromStr for PageKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        PageKind::ALL
            .into_iter()
            .find(|p| p.slug() == s)
            .ok_or_else(|| DashboardError::InvalidFilter(format!("unknown page '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    Scatter,
    Sunburst,
    GroupedBarError,
    PointMap,
}

/// Column roles for a chart. Unset roles are omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_midpoint: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Panel {
    Chart {
        title: &'static str,
        kind: ChartKind,
        bindings: Bindings,
        table: DerivedTable,
    },
    /// `value` is `None` when there is nothing to measure, rendered as `null`.
    Metric {
        label: &'static str,
        value: Option<f64>,
    },
    Table {
        title: &'static str,
        table: DerivedTable,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub panels: Vec<Panel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub kind: PageKind,
    pub title: &'static str,
    /// Orders left after filtering.
    pub orders: usize,
    pub sections: Vec<Section>,
}

/// Build `kind` from already filtered orders.
pub fn render(kind: PageKind, orders: &[OrderRecord]) -> Result<Page> {
    match kind {
        PageKind::Company => company(orders),
        PageKind::Couriers => couriers(orders),
        PageKind::Restaurants => restaurants(orders),
    }
}

fn chart(title: &'static str, kind: ChartKind, bindings: Bindings, table: DerivedTable) -> Panel {
    Panel::Chart {
        title,
        kind,
        bindings,
        table,
    }
}

pub fn company(orders: &[OrderRecord]) -> Result<Page> {
    let management = Section {
        title: "Management",
        panels: vec![
            chart(
                "Orders by Day",
                ChartKind::Bar,
                Bindings { x: Some("Order_Date"), y: Some("ID"), ..Default::default() },
                orders_per_day(orders),
            ),
            chart(
                "Traffic Order Share",
                ChartKind::Pie,
                Bindings {
                    values: Some("entregas_perc"),
                    names: Some("Road_traffic_density"),
                    ..Default::default()
                },
                traffic_order_share(orders),
            ),
            chart(
                "Traffic Order City",
                ChartKind::Scatter,
                Bindings {
                    x: Some("City"),
                    y: Some("Road_traffic_density"),
                    size: Some("ID"),
                    color: Some("City"),
                    ..Default::default()
                },
                orders_by_city_and_traffic(orders),
            ),
        ],
    };

    let tactical = Section {
        title: "Tactical",
        panels: vec![
            chart(
                "Orders by Week",
                ChartKind::Line,
                Bindings { x: Some("week_of_year"), y: Some("ID"), ..Default::default() },
                orders_per_week(orders),
            ),
            chart(
                "Orders Share by Week",
                ChartKind::Line,
                Bindings {
                    x: Some("week_of_year"),
                    y: Some("order_by_deliver"),
                    ..Default::default()
                },
                orders_per_courier_per_week(orders)?,
            ),
        ],
    };

    let geographic = Section {
        title: "Geographic",
        panels: vec![chart(
            "Country Maps",
            ChartKind::PointMap,
            Bindings {
                latitude: Some("Delivery_location_latitude"),
                longitude: Some("Delivery_location_longitude"),
                path: vec!["City", "Road_traffic_density"],
                ..Default::default()
            },
            delivery_map_markers(orders),
        )],
    };

    Ok(Page {
        kind: PageKind::Company,
        title: "Marketplace - Company View",
        orders: orders.len(),
        sections: vec![management, tactical, geographic],
    })
}

pub fn couriers(orders: &[OrderRecord]) -> Result<Page> {
    let overview = courier_overview(orders);
    let stat = |pick: fn(&CourierOverview) -> f64| overview.as_ref().map(pick);

    let metrics = Section {
        title: "Overall Metrics",
        panels: vec![
            Panel::Metric {
                label: "Oldest courier",
                value: stat(|o| o.oldest_age as f64),
            },
            Panel::Metric {
                label: "Youngest courier",
                value: stat(|o| o.youngest_age as f64),
            },
            Panel::Metric {
                label: "Best vehicle condition",
                value: stat(|o| o.best_vehicle_condition as f64),
            },
            Panel::Metric {
                label: "Worst vehicle condition",
                value: stat(|o| o.worst_vehicle_condition as f64),
            },
        ],
    };

    let ratings = Section {
        title: "Ratings",
        panels: vec![
            Panel::Table {
                title: "Average rating per courier",
                table: mean_rating_per_courier(orders),
            },
            Panel::Table {
                title: "Average rating by traffic",
                table: rating_by_traffic(orders),
            },
            Panel::Table {
                title: "Average rating by weather",
                table: rating_by_weather(orders),
            },
        ],
    };

    let speed = Section {
        title: "Delivery Speed",
        panels: vec![
            Panel::Table {
                title: "Fastest couriers",
                table: top_couriers(orders, Speed::Fastest),
            },
            Panel::Table {
                title: "Slowest couriers",
                table: top_couriers(orders, Speed::Slowest),
            },
        ],
    };

    Ok(Page {
        kind: PageKind::Couriers,
        title: "Marketplace - Couriers View",
        orders: orders.len(),
        sections: vec![metrics, ratings, speed],
    })
}

pub fn restaurants(orders: &[OrderRecord]) -> Result<Page> {
    let metrics = Section {
        title: "Overall Metrics",
        panels: vec![
            Panel::Metric {
                label: "Unique couriers",
                value: Some(unique_couriers(orders) as f64),
            },
            Panel::Metric {
                label: "Average delivery distance",
                value: Some(mean_distance(orders)?),
            },
            Panel::Metric {
                label: "Avg delivery time with festival",
                value: Some(festival_delivery_time(orders, "Yes", FestivalStat::Mean)?),
            },
            Panel::Metric {
                label: "Std delivery time with festival",
                value: Some(festival_delivery_time(orders, "Yes", FestivalStat::Std)?),
            },
            Panel::Metric {
                label: "Avg delivery time without festival",
                value: Some(festival_delivery_time(orders, "No", FestivalStat::Mean)?),
            },
            Panel::Metric {
                label: "Std delivery time without festival",
                value: Some(festival_delivery_time(orders, "No", FestivalStat::Std)?),
            },
        ],
    };

    let by_city = Section {
        title: "Delivery Time by City",
        panels: vec![
            chart(
                "Average time per city",
                ChartKind::GroupedBarError,
                Bindings {
                    x: Some("City"),
                    y: Some("avg_time"),
                    error: Some("std_time"),
                    ..Default::default()
                },
                time_by_city(orders),
            ),
            Panel::Table {
                title: "Time per city and order type",
                table: time_by_city_and_order_type(orders),
            },
        ],
    };

    let sunburst = time_by_city_and_traffic(orders);
    let distribution = Section {
        title: "Time Distribution",
        panels: vec![
            chart(
                "Average distance per city",
                ChartKind::Pie,
                Bindings { values: Some("distance"), names: Some("City"), ..Default::default() },
                distance_by_city(orders),
            ),
            chart(
                "Time per city and traffic",
                ChartKind::Sunburst,
                Bindings {
                    path: vec!["City", "Road_traffic_density"],
                    values: Some("avg_time"),
                    color: Some("std_time"),
                    color_midpoint: Some(sunburst.color_midpoint),
                    ..Default::default()
                },
                sunburst.table,
            ),
        ],
    };

    Ok(Page {
        kind: PageKind::Restaurants,
        title: "Marketplace - Restaurants View",
        orders: orders.len(),
        sections: vec![metrics, by_city, distribution],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{date, OrderBuilder};

    fn orders() -> Vec<OrderRecord> {
        vec![
            OrderBuilder::new("1").city("Urban").traffic("Low").festival("No").minutes(20).build(),
            OrderBuilder::new("2")
                .city("Urban")
                .traffic("Jam")
                .festival("Yes")
                .minutes(45)
                .courier("B")
                .build(),
            OrderBuilder::new("3")
                .city("Metropolitian")
                .traffic("Jam")
                .festival("No")
                .minutes(30)
                .on(date(2022, 3, 20))
                .build(),
            OrderBuilder::new("4")
                .city("Semi-Urban")
                .traffic("High")
                .festival("Yes")
                .minutes(50)
                .courier("C")
                .build(),
        ]
    }

    fn panel_count(page: &Page) -> usize {
        page.sections.iter().map(|s| s.panels.len()).sum()
    }

    #[test]
    fn test_every_page_renders() {
        let orders = orders();
        for kind in PageKind::ALL {
            let page = render(kind, &orders).unwrap();
            assert_eq!(page.kind, kind);
            assert_eq!(page.orders, 4);
            assert_eq!(page.sections.len(), 3);
        }
        assert_eq!(panel_count(&company(&orders).unwrap()), 6);
        assert_eq!(panel_count(&couriers(&orders).unwrap()), 9);
        assert_eq!(panel_count(&restaurants(&orders).unwrap()), 10);
    }

    #[test]
    fn test_restaurants_needs_both_festival_values() {
        let no_festival: Vec<OrderRecord> = orders()
            .into_iter()
            .filter(|o| o.festival == "No")
            .collect();
        let err = restaurants(&no_festival).unwrap_err();
        assert_eq!(err.kind(), "empty_group");
    }

    #[test]
    fn test_couriers_page_renders_without_orders() {
        let page = couriers(&[]).unwrap();
        assert_eq!(page.orders, 0);
        assert_eq!(panel_count(&page), 9);

        let json = serde_json::to_value(&page).unwrap();
        let oldest = &json["sections"][0]["panels"][0];
        assert_eq!(oldest["label"], "Oldest courier");
        assert!(oldest["value"].is_null());
        assert_eq!(json["sections"][1]["panels"][0]["table"]["records"], serde_json::json!([]));
    }

    #[test]
    fn test_page_slugs() {
        assert_eq!("couriers".parse::<PageKind>().unwrap(), PageKind::Couriers);
        assert!("drivers".parse::<PageKind>().is_err());
    }

    #[test]
    fn test_chart_json_shape() {
        let page = company(&orders()).unwrap();
        let json = serde_json::to_value(&page).unwrap();
        let first = &json["sections"][0]["panels"][0];

        assert_eq!(first["type"], "chart");
        assert_eq!(first["kind"], "bar");
        assert_eq!(first["bindings"]["x"], "Order_Date");
        assert!(first["bindings"].get("error").is_none());
        assert_eq!(first["table"]["columns"], serde_json::json!(["Order_Date", "ID"]));
        assert_eq!(first["table"]["records"][0]["Order_Date"], "2022-03-10");
        assert_eq!(first["table"]["records"][0]["ID"], 3.0);
        assert_eq!(json["kind"], "company");
    }
}
