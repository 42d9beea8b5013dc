use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::db::queries::categories;
use crate::error::{AppError, AppResult};
use crate::handlers::ApiResponse;
use crate::models::{Category, NewCategory, TransactionType, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl CategoryPayload {
    fn into_new_category(self) -> AppResult<NewCategory> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".into()));
        }
        let category_type = TransactionType::parse(self.category_type.trim()).ok_or_else(|| {
            AppError::Validation(format!("Unknown category type '{}'", self.category_type))
        })?;

        Ok(NewCategory {
            name,
            category_type,
            color: self
                .color
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.into()),
            icon: self
                .icon
                .filter(|i| !i.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY_ICON.into()),
        })
    }
}

/// Name and type form a unique pair; a clash is the caller's mistake.
fn map_constraint(e: rusqlite::Error, name: &str) -> AppError {
    match e {
        rusqlite::Error::SqliteFailure(ref err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            AppError::Validation(format!("Category '{}' already exists", name))
        }
        other => AppError::Database(other),
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Category {} not found", id))
}

pub async fn index(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let conn = state.db.get()?;
    Ok(ApiResponse::new(categories::list_categories(&conn)?))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let conn = state.db.get()?;
    let category = categories::get_category(&conn, id)?.ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::new(category))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let new_category = payload.into_new_category()?;
    let conn = state.db.get()?;

    let id = categories::create_category(&conn, &new_category)
        .map_err(|e| map_constraint(e, &new_category.name))?;
    let created = categories::get_category(&conn, id)?
        .ok_or_else(|| AppError::Internal(format!("Category {} vanished after insert", id)))?;

    Ok((StatusCode::CREATED, ApiResponse::new(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryPayload>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let new_category = payload.into_new_category()?;
    let conn = state.db.get()?;

    let updated = categories::update_category(&conn, id, &new_category)
        .map_err(|e| map_constraint(e, &new_category.name))?;
    if !updated {
        return Err(not_found(id));
    }

    let category = categories::get_category(&conn, id)?.ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::new(category))
}

/// Transactions keep their free-text label; they simply fall back to the
/// default color afterwards.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let conn = state.db.get()?;
    let category = categories::get_category(&conn, id)?.ok_or_else(|| not_found(id))?;
    categories::delete_category(&conn, id)?;
    Ok(ApiResponse::new(category))
}
