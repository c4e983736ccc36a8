//! Cohort analytics over stored balance snapshots.
//!
//! Two passes per series:
//! 1. freeze a peak per classifiable holding (wallet and asset) from the lookback interval
//!    `[now - 61d, now - 1h)`;
//! 2. judge every snapshot of the 31 day reporting window against that peak and
//!    bucket the result by hour.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, DurationRound, Utc};

use crate::domain::models::{HourlyCohortRow, OwnerType, SnapshotRecord};

pub const PEAK_LOOKBACK_DAYS: i64 = 61;
pub const RECENT_EXCLUSION_HOURS: i64 = 1;
pub const REPORTING_WINDOW_DAYS: i64 = 31;
/// Absorbs float noise when deciding a balance went above its peak
pub const PEAK_EPSILON: f64 = 1.0;

/// Windowing and tolerance used by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohortParams {
    pub peak_lookback: Duration,
    pub recent_exclusion: Duration,
    pub reporting_window: Duration,
    pub epsilon: f64,
}

impl Default for CohortParams {
    fn default() -> Self {
        Self {
            peak_lookback: Duration::days(PEAK_LOOKBACK_DAYS),
            recent_exclusion: Duration::hours(RECENT_EXCLUSION_HOURS),
            reporting_window: Duration::days(REPORTING_WINDOW_DAYS),
            epsilon: PEAK_EPSILON,
        }
    }
}

impl CohortParams {
    /// Oldest snapshot either pass can look at
    pub fn history_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.peak_lookback.max(self.reporting_window)
    }
}

/// Highest balance a wallet reached in the lookback interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub value: f64,
    /// Earliest time the wallet sat at that value
    pub observed_at: DateTime<Utc>,
}

/// Where a snapshot lands relative to its wallet's peak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakCohort {
    /// At or below the peak
    Holding,
    /// More than epsilon above the peak
    ExceedingPeak,
    /// Above the peak but within epsilon
    Neither,
}

/// Compare one balance against a frozen peak
pub fn classify(value: f64, peak: f64, epsilon: f64) -> PeakCohort {
    if value <= peak {
        PeakCohort::Holding
    } else if value > peak + epsilon {
        PeakCohort::ExceedingPeak
    } else {
        PeakCohort::Neither
    }
}

/// Wallets that get a peak: not contracts and not in a named owner cohort
fn is_peak_tracked(record: &SnapshotRecord) -> bool {
    !record.is_contract && record.owner_type == OwnerType::Unknown
}

/// One asset held by one wallet. Each holding is judged against its own peak.
pub type HoldingKey<'a> = (i32, &'a str);

fn holding_key(record: &SnapshotRecord) -> HoldingKey<'_> {
    (record.whale_id, record.symbol.as_str())
}

/// First pass: peak per holding over `[now - lookback, now - exclusion)`.
///
/// A holding whose balance never moved in that interval is illiquid and gets
/// no peak.
pub fn compute_peaks<'a>(
    records: &'a [SnapshotRecord],
    now: DateTime<Utc>,
    params: &CohortParams,
) -> HashMap<HoldingKey<'a>, Peak> {
    let start = now - params.peak_lookback;
    let end = now - params.recent_exclusion;

    // peak plus the lowest balance seen
    let mut ranges: HashMap<HoldingKey<'a>, (Peak, f64)> = HashMap::new();
    for record in records {
        if !is_peak_tracked(record) || record.captured_at <= start || record.captured_at >= end {
            continue;
        }
        let (peak, low) = ranges.entry(holding_key(record)).or_insert((
            Peak {
                value: record.value,
                observed_at: record.captured_at,
            },
            record.value,
        ));
        if record.value > peak.value {
            *peak = Peak {
                value: record.value,
                observed_at: record.captured_at,
            };
        } else if record.value == peak.value && record.captured_at < peak.observed_at {
            peak.observed_at = record.captured_at;
        }
        *low = low.min(record.value);
    }

    ranges
        .into_iter()
        .filter(|(_, (peak, low))| peak.value > *low)
        .map(|(key, (peak, _))| (key, peak))
        .collect()
}

fn truncate_to_hour(at: DateTime<Utc>) -> DateTime<Utc> {
    at.duration_trunc(Duration::hours(1)).unwrap_or(at)
}

/// Second pass: classify every snapshot in the reporting window and sum per hour.
///
/// Exchange, stake and wrap wallets are summed into their own totals, burn wallets
/// are skipped, and a tracked holding only counts once a snapshot is newer than the
/// observation its peak came from.
pub fn build_hourly_rows(
    records: &[SnapshotRecord],
    now: DateTime<Utc>,
    params: &CohortParams,
) -> Vec<HourlyCohortRow> {
    let peaks = compute_peaks(records, now, params);
    let window_start = now - params.reporting_window;

    let mut rows: BTreeMap<DateTime<Utc>, HourlyCohortRow> = BTreeMap::new();
    for record in records {
        if record.captured_at <= window_start || record.owner_type == OwnerType::Burn {
            continue;
        }

        let hour = truncate_to_hour(record.captured_at);
        let row = rows
            .entry(hour)
            .or_insert_with(|| HourlyCohortRow::empty(hour));

        match record.owner_type {
            OwnerType::Exchange => row.exchange += record.value,
            OwnerType::Stake => row.stake += record.value,
            OwnerType::Wrap => row.wrap += record.value,
            _ if !is_peak_tracked(record) => {}
            _ => {
                let Some(peak) = peaks.get(&holding_key(record)) else {
                    continue;
                };
                if record.captured_at <= peak.observed_at {
                    continue;
                }
                match classify(record.value, peak.value, params.epsilon) {
                    PeakCohort::Holding => {
                        row.holding += record.value;
                        row.holding_count += 1;
                    }
                    PeakCohort::ExceedingPeak => {
                        row.exceeding_peak += record.value;
                        row.exceeding_peak_count += 1;
                    }
                    PeakCohort::Neither => {}
                }
            }
        }
    }

    rows.into_values().collect()
}
