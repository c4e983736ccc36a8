pub mod api;
pub mod persistence;
pub mod scraper;
