pub mod analytics;
pub mod chart;
pub mod sales;
