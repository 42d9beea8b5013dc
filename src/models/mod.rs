pub mod category;
pub mod goal;
pub mod transaction;

pub use category::{Category, NewCategory, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON};
pub use goal::{Goal, NewGoal};
pub use transaction::{NewTransaction, Transaction, TransactionType};
