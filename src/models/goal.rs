use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub target_cents: i64,
    pub current_cents: i64,
    pub icon: String,
    pub color: String,
    pub deadline: NaiveDate,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub name: String,
    pub target_cents: i64,
    pub current_cents: i64,
    pub icon: String,
    pub color: String,
    pub deadline: NaiveDate,
}

impl From<&Goal> for NewGoal {
    fn from(g: &Goal) -> Self {
        Self {
            name: g.name.clone(),
            target_cents: g.target_cents,
            current_cents: g.current_cents,
            icon: g.icon.clone(),
            color: g.color.clone(),
            deadline: g.deadline,
        }
    }
}
