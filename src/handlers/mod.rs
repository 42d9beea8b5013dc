pub mod analytics;
pub mod categories;
pub mod goals;
pub mod transactions;

use axum::response::Json;
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::date_utils::PeriodFilterable;
use crate::state::AppState;
use crate::VERSION;

/// Success envelope shared by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Json<Self> {
        Json(Self { data })
    }
}

/// `?period=month&as_of=2024-03-15`
#[derive(Debug, Default, Deserialize)]
pub struct PeriodParams {
    pub period: Option<String>,
    pub as_of: Option<String>,
}

impl PeriodFilterable for PeriodParams {
    fn period(&self) -> Option<&String> {
        self.period.as_ref()
    }

    fn as_of(&self) -> Option<&String> {
        self.as_of.as_ref()
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        // Transactions
        .route(
            "/api/transactions",
            get(transactions::index).post(transactions::create),
        )
        .route(
            "/api/transactions/:id",
            get(transactions::show)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        // Aggregates
        .route("/api/summary", get(analytics::summary))
        .route("/api/monthly-data", get(analytics::monthly_data))
        .route("/api/reports/monthly", get(analytics::monthly_report))
        .route("/api/forecast", get(analytics::forecast))
        // Categories
        .route(
            "/api/categories",
            get(categories::index).post(categories::create),
        )
        .route("/api/categories/breakdown", get(analytics::category_breakdown))
        .route(
            "/api/categories/:id",
            get(categories::show)
                .put(categories::update)
                .delete(categories::delete),
        )
        // Goals
        .route("/api/goals", get(goals::index).post(goals::create))
        .route(
            "/api/goals/:id",
            get(goals::show).put(goals::update).delete(goals::delete),
        )
        // Health check
        .route("/health", get(health))
        .route("/api/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: VERSION,
        timestamp: Utc::now().to_rfc3339(),
    })
}
