pub mod chain;
pub mod series;
pub mod wallet;

pub use chain::{Chain, PricedChain, TokenContract};
pub use series::{HourlyCohortRow, MergedPoint};
pub use wallet::{OwnerType, SnapshotRecord, WalletObservation};
