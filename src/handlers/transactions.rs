use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use tracing::info;

use crate::date_utils::{Period, PeriodFilterable};
use crate::db::Ledger;
use crate::error::{AppError, AppResult};
use crate::handlers::{ApiResponse, PeriodParams};
use crate::json_utils::{amount_to_cents, deserialize_some, parse_date};
use crate::models::{NewTransaction, Transaction, TransactionType};
use crate::services::analytics;
use crate::state::AppState;

/// Body of `POST /api/transactions`. `amount` is a decimal currency value.
#[derive(Debug, Deserialize)]
pub struct TransactionPayload {
    pub date: String,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, alias = "isEssential")]
    pub is_essential: Option<bool>,
    #[serde(default, alias = "paymentMethod")]
    pub payment_method: String,
}

/// Body of `PUT /api/transactions/:id`; absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionPatch {
    pub date: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    #[serde(default, alias = "isEssential", deserialize_with = "deserialize_some")]
    pub is_essential: Option<Option<bool>>,
    #[serde(alias = "paymentMethod")]
    pub payment_method: Option<String>,
}

fn parse_type(s: &str) -> AppResult<TransactionType> {
    TransactionType::parse(s.trim())
        .ok_or_else(|| AppError::Validation(format!("Unknown transaction type '{}'", s)))
}

fn parse_transaction_date(s: &str) -> AppResult<chrono::NaiveDate> {
    parse_date(s).ok_or_else(|| AppError::Validation(format!("Invalid date '{}'", s)))
}

/// Normalize and check a record before it reaches the ledger. Aggregation
/// assumes everything stored passed through here.
fn validate(mut transaction: NewTransaction) -> AppResult<NewTransaction> {
    transaction.description = transaction.description.trim().to_string();
    transaction.category = transaction.category.trim().to_string();
    transaction.payment_method = transaction.payment_method.trim().to_string();

    if transaction.description.is_empty() {
        return Err(AppError::Validation("Description is required".into()));
    }
    if transaction.amount_cents < 0 {
        return Err(AppError::Validation("Amount must not be negative".into()));
    }
    // Only expenses carry an essential flag.
    if transaction.transaction_type == TransactionType::Income {
        transaction.is_essential = None;
    }

    Ok(transaction)
}

impl TransactionPayload {
    fn into_new_transaction(self) -> AppResult<NewTransaction> {
        validate(NewTransaction {
            date: parse_transaction_date(&self.date)?,
            description: self.description,
            amount_cents: amount_to_cents("Amount", self.amount).map_err(AppError::Validation)?,
            transaction_type: parse_type(&self.transaction_type)?,
            category: self.category,
            is_essential: self.is_essential,
            payment_method: self.payment_method,
        })
    }
}

impl TransactionPatch {
    fn apply(self, existing: &Transaction) -> AppResult<NewTransaction> {
        let mut merged = NewTransaction::from(existing);

        if let Some(date) = self.date {
            merged.date = parse_transaction_date(&date)?;
        }
        if let Some(description) = self.description {
            merged.description = description;
        }
        if let Some(amount) = self.amount {
            merged.amount_cents = amount_to_cents("Amount", amount).map_err(AppError::Validation)?;
        }
        if let Some(transaction_type) = self.transaction_type {
            merged.transaction_type = parse_type(&transaction_type)?;
        }
        if let Some(category) = self.category {
            merged.category = category;
        }
        if let Some(is_essential) = self.is_essential {
            merged.is_essential = is_essential;
        }
        if let Some(payment_method) = self.payment_method {
            merged.payment_method = payment_method;
        }

        validate(merged)
    }
}

/// Ledger newest first. Without `period` nothing is filtered out.
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<ApiResponse<Vec<Transaction>>>> {
    let ledger = state.ledger().list()?;

    let period = params
        .period
        .as_deref()
        .map(Period::parse)
        .unwrap_or(Period::All);
    let transactions = analytics::filter_by_period(&ledger, period, params.resolve_today()?);

    Ok(ApiResponse::new(transactions))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Transaction>>> {
    Ok(ApiResponse::new(state.ledger().get(id)?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<TransactionPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<Transaction>>)> {
    let new_transaction = payload.into_new_transaction()?;
    let created = state.ledger().create(&new_transaction)?;
    info!(transaction_id = created.id, "Transaction recorded");
    Ok((StatusCode::CREATED, ApiResponse::new(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<TransactionPatch>,
) -> AppResult<Json<ApiResponse<Transaction>>> {
    let ledger = state.ledger();
    let existing = ledger.get(id)?;
    let merged = patch.apply(&existing)?;
    Ok(ApiResponse::new(ledger.update(id, &merged)?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Transaction>>> {
    let deleted = state.ledger().delete(id)?;
    info!(transaction_id = id, "Transaction removed");
    Ok(ApiResponse::new(deleted))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(transaction_type: &str, amount: f64) -> TransactionPayload {
        TransactionPayload {
            date: "2024-03-01".into(),
            description: "  Supermercado ".into(),
            amount,
            transaction_type: transaction_type.into(),
            category: "Alimentação".into(),
            is_essential: Some(true),
            payment_method: "Crédito".into(),
        }
    }

    #[test]
    fn test_payload_is_normalized() {
        let t = payload("expense", 42.5).into_new_transaction().unwrap();
        assert_eq!(t.description, "Supermercado");
        assert_eq!(t.amount_cents, 4250);
        assert_eq!(t.is_essential, Some(true));
    }

    #[test]
    fn test_income_drops_essential_flag() {
        let t = payload("income", 10.0).into_new_transaction().unwrap();
        assert_eq!(t.is_essential, None);
    }

    #[test]
    fn test_rejects_malformed_records() {
        assert!(matches!(
            payload("expense", -1.0).into_new_transaction(),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            payload("transfer", 1.0).into_new_transaction(),
            Err(AppError::Validation(_))
        ));
        let mut bad_date = payload("expense", 1.0);
        bad_date.date = "yesterday".into();
        assert!(matches!(
            bad_date.into_new_transaction(),
            Err(AppError::Validation(_))
        ));
    }
}
