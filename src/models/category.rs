use serde::{Deserialize, Serialize};

use crate::models::transaction::TransactionType;

pub const DEFAULT_CATEGORY_COLOR: &str = "#78909c";
pub const DEFAULT_CATEGORY_ICON: &str = "MoreHorizontal";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
    pub color: String,
    pub icon: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub category_type: TransactionType,
    pub color: String,
    pub icon: String,
}
