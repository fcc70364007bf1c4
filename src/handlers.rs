pub mod analytics;
pub mod charts;
pub mod health;
