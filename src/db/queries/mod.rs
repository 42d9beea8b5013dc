pub mod categories;
pub mod goals;
pub mod transactions;
