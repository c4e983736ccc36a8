use thiserror::Error;

/// Error type for holder page scraping
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network failure or timeout
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The explorer answered with a non-success status
    #[error("Status code error: {0}")]
    Status(u16),
    /// Page markup could not be read as a holder table
    #[error("Source format error: {0}")]
    SourceFormat(String),
    /// Fewer rows than a full page; usually throttling or a layout change
    #[error("Incomplete page: {got} of {expected} rows")]
    Incomplete { got: usize, expected: usize },
    /// Every attempt for a page failed
    #[error("{url} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<ScrapeError>,
    },
}
