use axum::extract::{Query, State};
use axum::response::Json;
use chrono::NaiveDate;
use serde::Serialize;

use crate::date_utils::{Period, PeriodFilterable};
use crate::db::queries::categories;
use crate::db::Ledger;
use crate::error::AppResult;
use crate::handlers::{ApiResponse, PeriodParams};
use crate::services::analytics::{
    self, CategoryBreakdown, EssentialSplit, FinancialSummary, Forecast, MonthlyReport,
    MonthlyTrendPoint,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub period: &'static str,
    pub label: &'static str,
    pub as_of: NaiveDate,
    #[serde(flatten)]
    pub summary: FinancialSummary,
    pub transaction_count: usize,
    pub essential_split: EssentialSplit,
    pub forecast: Forecast,
}

/// Everything the dashboard cards need for one period.
pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<ApiResponse<SummaryResponse>>> {
    let ledger = state.ledger().list()?;
    let period = params.resolve_period();
    let today = params.resolve_today()?;

    let in_period = analytics::filter_by_period(&ledger, period, today);
    let summary = analytics::compute_summary(&in_period);

    Ok(ApiResponse::new(SummaryResponse {
        period: period.as_str(),
        label: period.label(),
        as_of: today,
        transaction_count: in_period.len(),
        essential_split: analytics::compute_essential_split(&summary),
        forecast: analytics::compute_forecast(&summary),
        summary,
    }))
}

pub async fn monthly_data(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<ApiResponse<Vec<MonthlyTrendPoint>>>> {
    let ledger = state.ledger().list()?;
    let series = analytics::build_monthly_series(&ledger, params.resolve_today()?);
    Ok(ApiResponse::new(analytics::with_trend_lines(&series)))
}

pub async fn monthly_report(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<ApiResponse<MonthlyReport>>> {
    let ledger = state.ledger().list()?;
    let series = analytics::build_monthly_series(&ledger, params.resolve_today()?);
    Ok(ApiResponse::new(analytics::build_report(&series)))
}

pub async fn forecast(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<ApiResponse<Forecast>>> {
    let ledger = state.ledger().list()?;
    let summary = analytics::compute_period_summary(
        &ledger,
        params.resolve_period(),
        params.resolve_today()?,
    );
    Ok(ApiResponse::new(analytics::compute_forecast(&summary)))
}

/// Spending per category. Without `period` the whole ledger is used.
pub async fn category_breakdown(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<ApiResponse<Vec<CategoryBreakdown>>>> {
    let ledger = state.ledger().list()?;
    let category_list = {
        let conn = state.db.get()?;
        categories::list_categories(&conn)?
    };

    let period = params
        .period
        .as_deref()
        .map(Period::parse)
        .unwrap_or(Period::All);
    let in_period = analytics::filter_by_period(&ledger, period, params.resolve_today()?);

    Ok(ApiResponse::new(analytics::build_category_breakdown(
        &in_period,
        &category_list,
    )))
}
