pub mod aggregator;
pub mod analytics_service;
pub mod chart_renderer;
pub mod chart_service;
pub mod glyphs;
pub mod sales_feed;
