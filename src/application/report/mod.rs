pub mod artifacts;
pub mod message;
pub mod series;

pub use artifacts::{write_prices, write_series};
pub use message::compose_message;
pub use series::{merge_series, SeriesBuilder};
