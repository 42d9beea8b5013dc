use crate::models::Goal;
use crate::services::analytics::saturating_sum;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    /// Saved share of the target, one decimal, not capped at 100.
    pub percent: f64,
    pub remaining_cents: i64,
    /// Negative once the deadline has passed.
    pub days_remaining: i64,
    pub completed: bool,
}

pub fn goal_progress(goal: &Goal, today: NaiveDate) -> GoalProgress {
    let percent = if goal.target_cents > 0 {
        (goal.current_cents as f64 / goal.target_cents as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };

    GoalProgress {
        percent,
        remaining_cents: goal.target_cents.saturating_sub(goal.current_cents).max(0),
        days_remaining: (goal.deadline - today).num_days(),
        completed: goal.current_cents >= goal.target_cents,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoalsOverview {
    pub total_saved_cents: i64,
    pub total_target_cents: i64,
    pub percent: f64,
    pub completed_count: usize,
}

pub fn goals_overview(goals: &[Goal]) -> GoalsOverview {
    let total_saved_cents = saturating_sum(goals.iter().map(|g| g.current_cents));
    let total_target_cents = saturating_sum(goals.iter().map(|g| g.target_cents));
    let percent = if total_target_cents > 0 {
        (total_saved_cents as f64 / total_target_cents as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };

    GoalsOverview {
        total_saved_cents,
        total_target_cents,
        percent,
        completed_count: goals
            .iter()
            .filter(|g| g.current_cents >= g.target_cents)
            .count(),
    }
}
