use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::date_utils::PeriodFilterable;
use crate::db::queries::goals;
use crate::error::{AppError, AppResult};
use crate::handlers::{ApiResponse, PeriodParams};
use crate::json_utils::{amount_to_cents, parse_date};
use crate::models::{Goal, NewGoal};
use crate::services::goals::{goal_progress, goals_overview, GoalProgress, GoalsOverview};
use crate::state::AppState;

const DEFAULT_GOAL_ICON: &str = "🎯";
const DEFAULT_GOAL_COLOR: &str = "#7cb342";

#[derive(Debug, Deserialize)]
pub struct GoalPayload {
    pub name: String,
    pub target: f64,
    #[serde(default)]
    pub current: f64,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub deadline: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct GoalPatch {
    pub name: Option<String>,
    pub target: Option<f64>,
    pub current: Option<f64>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub deadline: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GoalWithProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: GoalProgress,
}

#[derive(Debug, Serialize)]
pub struct GoalsResponse {
    pub goals: Vec<GoalWithProgress>,
    pub overview: GoalsOverview,
}

fn validate(mut goal: NewGoal) -> AppResult<NewGoal> {
    goal.name = goal.name.trim().to_string();
    if goal.name.is_empty() {
        return Err(AppError::Validation("Goal name is required".into()));
    }
    if goal.target_cents <= 0 {
        return Err(AppError::Validation("Target must be greater than zero".into()));
    }
    if goal.icon.trim().is_empty() {
        goal.icon = DEFAULT_GOAL_ICON.into();
    }
    if goal.color.trim().is_empty() {
        goal.color = DEFAULT_GOAL_COLOR.into();
    }
    Ok(goal)
}

fn parse_deadline(s: &str) -> AppResult<chrono::NaiveDate> {
    parse_date(s).ok_or_else(|| AppError::Validation(format!("Invalid deadline '{}'", s)))
}

impl GoalPayload {
    fn into_new_goal(self) -> AppResult<NewGoal> {
        validate(NewGoal {
            name: self.name,
            target_cents: amount_to_cents("Target", self.target).map_err(AppError::Validation)?,
            current_cents: amount_to_cents("Current", self.current)
                .map_err(AppError::Validation)?,
            icon: self.icon.unwrap_or_default(),
            color: self.color.unwrap_or_default(),
            deadline: parse_deadline(&self.deadline)?,
        })
    }
}

impl GoalPatch {
    fn apply(self, existing: &Goal) -> AppResult<NewGoal> {
        let mut merged = NewGoal::from(existing);
        if let Some(name) = self.name {
            merged.name = name;
        }
        if let Some(target) = self.target {
            merged.target_cents = amount_to_cents("Target", target).map_err(AppError::Validation)?;
        }
        if let Some(current) = self.current {
            merged.current_cents =
                amount_to_cents("Current", current).map_err(AppError::Validation)?;
        }
        if let Some(icon) = self.icon {
            merged.icon = icon;
        }
        if let Some(color) = self.color {
            merged.color = color;
        }
        if let Some(deadline) = self.deadline {
            merged.deadline = parse_deadline(&deadline)?;
        }
        validate(merged)
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Goal {} not found", id))
}

/// Goals by nearest deadline, each with its progress as of `as_of` (or today).
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<ApiResponse<GoalsResponse>>> {
    let conn = state.db.get()?;
    let goal_list = goals::list_goals(&conn)?;
    let today = params.resolve_today()?;

    let overview = goals_overview(&goal_list);
    let goals = goal_list
        .into_iter()
        .map(|goal| GoalWithProgress {
            progress: goal_progress(&goal, today),
            goal,
        })
        .collect();

    Ok(ApiResponse::new(GoalsResponse { goals, overview }))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<ApiResponse<GoalWithProgress>>> {
    let conn = state.db.get()?;
    let goal = goals::get_goal(&conn, id)?.ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::new(GoalWithProgress {
        progress: goal_progress(&goal, params.resolve_today()?),
        goal,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<GoalPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<Goal>>)> {
    let new_goal = payload.into_new_goal()?;
    let conn = state.db.get()?;
    let id = goals::create_goal(&conn, &new_goal)?;
    let created = goals::get_goal(&conn, id)?
        .ok_or_else(|| AppError::Internal(format!("Goal {} vanished after insert", id)))?;
    Ok((StatusCode::CREATED, ApiResponse::new(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<GoalPatch>,
) -> AppResult<Json<ApiResponse<Goal>>> {
    let conn = state.db.get()?;
    let existing = goals::get_goal(&conn, id)?.ok_or_else(|| not_found(id))?;
    let merged = patch.apply(&existing)?;
    goals::update_goal(&conn, id, &merged)?;
    let goal = goals::get_goal(&conn, id)?.ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::new(goal))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Goal>>> {
    let conn = state.db.get()?;
    let goal = goals::get_goal(&conn, id)?.ok_or_else(|| not_found(id))?;
    goals::delete_goal(&conn, id)?;
    Ok(ApiResponse::new(goal))
}
