pub mod batch;
pub mod chain_ingestor;

pub use batch::batch_update;
pub use chain_ingestor::ChainIngestor;
