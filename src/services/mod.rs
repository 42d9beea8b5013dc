pub mod analytics;
pub mod goals;
