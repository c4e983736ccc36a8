pub mod error;
pub mod fetcher;
pub mod retry;
pub mod sources;
pub mod transport;

pub use error::ScrapeError;
pub use fetcher::PageFetcher;
pub use retry::{Attempt, RetryHandler};
pub use sources::{BitcoinRichList, EtherscanAccounts, EtherscanTokenHolders, HolderSource};
pub use transport::{HttpTransport, PageTransport};
