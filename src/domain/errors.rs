use std::io;

use thiserror::Error;

use crate::domain::models::Chain;
use crate::infrastructure::api::ApiClientError;
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::scraper::ScrapeError;

/// Failure of one chain's ingestion task
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("[{chain}] scrape failed: {source}")]
    Scrape {
        chain: Chain,
        #[source]
        source: ScrapeError,
    },
    #[error("[{chain}] commit failed: {source}")]
    Db {
        chain: Chain,
        #[source]
        source: DbError,
    },
    #[error("[{chain}] ingestion task did not complete: {message}")]
    Join { chain: Chain, message: String },
}

impl IngestError {
    pub fn chain(&self) -> Chain {
        match self {
            IngestError::Scrape { chain, .. }
            | IngestError::Db { chain, .. }
            | IngestError::Join { chain, .. } => *chain,
        }
    }
}

/// Error type surfaced by the binary
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("Database error: {0}")]
    Db(#[from] DbError),
    #[error("API error: {0}")]
    Api(#[from] ApiClientError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error_names_chain() {
        let err = IngestError::Scrape {
            chain: Chain::Bitcoin,
            source: ScrapeError::Status(503),
        };
        assert_eq!(err.chain(), Chain::Bitcoin);
        assert!(err.to_string().starts_with("[bitcoin] scrape failed"));

        let app: AppError = err.into();
        assert!(app.to_string().contains("bitcoin"));
    }
}
