use chrono::{DateTime, Utc};
use serde::Serialize;

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

fn is_zero_count(value: &u32) -> bool {
    *value == 0
}

/// Cohort totals for one chain (or the USD aggregate) within one captured hour.
///
/// The serialized field names are the ones the dashboard reads. Snapshots at or
/// below the wallet's prior peak go to `holding` ("diamond hands"); snapshots more
/// than one unit above it go to `exceeding_peak` ("paper hands").
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HourlyCohortRow {
    #[serde(skip)]
    pub hour: DateTime<Utc>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exchange: f64,
    #[serde(skip_serializing_if = "is_zero")]
    pub wrap: f64,
    #[serde(skip_serializing_if = "is_zero")]
    pub stake: f64,
    #[serde(rename = "diamond_hands", skip_serializing_if = "is_zero")]
    pub holding: f64,
    #[serde(rename = "paper_hands", skip_serializing_if = "is_zero")]
    pub exceeding_peak: f64,
    #[serde(rename = "diamond_hands_count", skip_serializing_if = "is_zero_count")]
    pub holding_count: u32,
    #[serde(rename = "paper_hands_count", skip_serializing_if = "is_zero_count")]
    pub exceeding_peak_count: u32,
}

impl HourlyCohortRow {
    pub fn empty(hour: DateTime<Utc>) -> Self {
        Self {
            hour,
            ..Default::default()
        }
    }
}

/// The three parallel series aligned on one hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MergedPoint {
    #[serde(rename = "date", with = "chrono::serde::ts_seconds")]
    pub hour: DateTime<Utc>,
    pub eth: HourlyCohortRow,
    pub btc: HourlyCohortRow,
    pub usd: HourlyCohortRow,
}
