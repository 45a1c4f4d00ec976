//! REST API handlers for the dashboard pages.
//!
//! These handlers use the shared DashboardService.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::service::DashboardService;
use crate::error::DashboardError;
use crate::filter::FilterParams;
use crate::pages::{Page, PageKind};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FiltersResponse {
    pub date_min: NaiveDate,
    pub date_max: NaiveDate,
    pub default_date_limit: NaiveDate,
    pub traffic_options: Vec<String>,
    pub logo_path: PathBuf,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

impl From<DashboardError> for ErrorResponse {
    fn from(e: DashboardError) -> Self {
        Self {
            kind: e.kind().to_string(),
            error: e.to_string(),
        }
    }
}

fn error_status(e: &DashboardError) -> StatusCode {
    match e {
        DashboardError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
        DashboardError::EmptyGroup { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DashboardError::SourceRead { .. }
        | DashboardError::TypeCoercion { .. }
        | DashboardError::DateParse { .. }
        | DashboardError::TimeParse { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(e: DashboardError) -> ApiError {
    if matches!(error_status(&e), StatusCode::INTERNAL_SERVER_ERROR) {
        tracing::error!(kind = e.kind(), "Page request failed: {}", e);
    }
    (error_status(&e), Json(ErrorResponse::from(e)))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Sidebar state; missing fields fall back to the configured defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// `YYYY-MM-DD`
    pub date_limit: Option<String>,
    /// Comma-separated traffic levels.
    pub traffic: Option<String>,
}

impl PageQuery {
    fn into_params(self, defaults: FilterParams) -> Result<FilterParams, DashboardError> {
        let date_limit = match self.date_limit {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                DashboardError::InvalidFilter(format!("date_limit {:?} is not YYYY-MM-DD", raw))
            })?,
            None => defaults.date_limit,
        };
        let traffic = match self.traffic {
            Some(list) => FilterParams::parse_traffic(&list)?,
            None => defaults.traffic,
        };
        Ok(FilterParams::new(date_limit, traffic))
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub type AppState = Arc<DashboardService>;

/// GET /api/v1/health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /api/v1/filters
pub async fn get_filters(State(service): State<AppState>) -> Json<FiltersResponse> {
    let config = service.config();
    Json(FiltersResponse {
        date_min: config.date_min,
        date_max: config.date_max,
        default_date_limit: config.default_date_limit,
        traffic_options: config.traffic_options.clone(),
        logo_path: config.logo_path.clone(),
    })
}

/// GET /api/v1/pages/:page
pub async fn get_page(
    State(service): State<AppState>,
    Path(page): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page>, ApiError> {
    let kind: PageKind = page.parse().map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Page not found: {}", page),
                kind: "unknown_page".to_string(),
            }),
        )
    })?;

    let params = query
        .into_params(service.config().default_filters())
        .map_err(api_error)?;

    service.page(kind, &params).await.map(Json).map_err(api_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> FilterParams {
        FilterParams::default()
    }

    #[test]
    fn test_empty_query_uses_defaults() {
        let params = PageQuery::default().into_params(defaults()).unwrap();
        assert_eq!(params, FilterParams::default());
    }

    #[test]
    fn test_query_overrides() {
        let query = PageQuery {
            date_limit: Some("2022-03-01".to_string()),
            traffic: Some("Low,Jam".to_string()),
        };
        let params = query.into_params(defaults()).unwrap();
        assert_eq!(params.date_limit.to_string(), "2022-03-01");
        assert_eq!(params.traffic.len(), 2);
    }

    #[test]
    fn test_bad_date_is_invalid_filter() {
        let query = PageQuery {
            date_limit: Some("01-03-2022".to_string()),
            traffic: None,
        };
        let err = query.into_params(defaults()).unwrap_err();
        assert_eq!(error_status(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            error_status(&DashboardError::EmptyGroup { group: "x".into() }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            error_status(&DashboardError::TimeParse { line: 2, value: "x".into() }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
