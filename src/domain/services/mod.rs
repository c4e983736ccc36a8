pub mod cohort_analytics;
pub mod deduplicator;
pub mod window_summary;

pub use cohort_analytics::{
    build_hourly_rows, classify, compute_peaks, CohortParams, HoldingKey, Peak, PeakCohort,
};
pub use deduplicator::dedupe_run;
pub use window_summary::{analyze, render, summarize_windows, AssetClass, AssetDelta, WindowSummary};
