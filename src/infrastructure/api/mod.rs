pub mod error;
pub mod price_client;
pub mod telegram;

pub use error::ApiClientError;
pub use price_client::PriceClient;
pub use telegram::TelegramNotifier;
