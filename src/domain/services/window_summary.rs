//! Look-back window comparisons over the merged hourly series.

use crate::domain::models::{HourlyCohortRow, MergedPoint, PricedChain};
use crate::domain::models::Chain;

/// A fixed look-back expressed in hourly points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub label: &'static str,
    pub hours: usize,
}

pub const REPORT_WINDOWS: [ReportWindow; 5] = [
    ReportWindow { label: "1h", hours: 1 },
    ReportWindow { label: "4h", hours: 4 },
    ReportWindow { label: "24h", hours: 24 },
    ReportWindow { label: "7d", hours: 168 },
    ReportWindow { label: "30d", hours: 720 },
];

/// Percent changes below this are not reported
pub const MIN_REPORTED_PERCENT: f64 = 0.1;

/// Direction in which exchange balances count.
///
/// Volatile assets moving onto exchanges are read as selling pressure, so the
/// exchange delta is subtracted from net flow. Stable assets moving onto exchanges
/// are read as buying power, so it is added. The percent figure uses the opposite
/// sign in each case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    Volatile,
    Stable,
}

impl AssetClass {
    fn net_flow_exchange_sign(&self) -> f64 {
        match self {
            AssetClass::Volatile => -1.0,
            AssetClass::Stable => 1.0,
        }
    }

    fn percent_exchange_sign(&self) -> f64 {
        -self.net_flow_exchange_sign()
    }
}

/// Change of one asset between two points
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssetDelta {
    /// Net flow in asset units (USD for the stable aggregate)
    pub net_flow: f64,
    /// Percent change of the tracked balance, when it could be computed
    pub percent: Option<f64>,
}

/// Compare two rows of one asset. `None` when the older row has no exchange
/// total, which means the series was not captured yet at that point.
pub fn analyze(now: &HourlyCohortRow, old: &HourlyCohortRow, class: AssetClass) -> Option<AssetDelta> {
    if old.exchange == 0.0 {
        return None;
    }

    let net_flow = (now.holding - old.holding)
        + (now.stake - old.stake)
        + class.net_flow_exchange_sign() * (now.exchange - old.exchange);

    let sign = class.percent_exchange_sign();
    let tracked_now = now.holding + now.stake + sign * now.exchange;
    let tracked_old = old.holding + old.stake + sign * old.exchange;
    let average = (tracked_now + tracked_old) / 2.0;
    let percent = (average != 0.0).then(|| 100.0 * (tracked_now - tracked_old) / average);

    Some(AssetDelta { net_flow, percent })
}

/// Summary of one look-back window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSummary {
    pub window: ReportWindow,
    /// Net flow across every asset, in USD
    pub net_flow_usd: f64,
    /// Per-asset percent lines, already formatted
    pub lines: Vec<String>,
}

impl WindowSummary {
    pub fn header(&self) -> String {
        let amount = format_usd_amount(self.net_flow_usd.abs());
        if self.net_flow_usd > 0.0 {
            format!("*{}*: *+${}*", self.window.label, amount)
        } else if self.net_flow_usd < 0.0 {
            format!("*{}*: `-${}`", self.window.label, amount)
        } else {
            format!("*{}*:", self.window.label)
        }
    }
}

fn percent_line(symbol: &str, percent: f64) -> Option<String> {
    if percent.abs() < MIN_REPORTED_PERCENT || !percent.is_finite() {
        return None;
    }
    let value = if percent > 0.0 {
        format!("*+{:.2}%*", percent)
    } else {
        format!("`{:.2}%`", percent)
    };
    Some(format!("\t`{}`: {}", symbol, value))
}

fn chain_row(point: &MergedPoint, chain: Chain) -> &HourlyCohortRow {
    match chain {
        Chain::Bitcoin => &point.btc,
        Chain::Ethereum => &point.eth,
    }
}

/// Compare the latest point with the point `hours` earlier for every window the
/// series is long enough for. Windows with no baseline for any asset are left out.
pub fn summarize_windows(points: &[MergedPoint], prices: &[PricedChain]) -> Vec<WindowSummary> {
    let Some(latest) = points.last() else {
        return Vec::new();
    };

    let mut summaries = Vec::new();
    for window in REPORT_WINDOWS {
        if points.len() < window.hours + 1 {
            continue;
        }
        let prior = &points[points.len() - 1 - window.hours];

        let mut net_flow_usd = 0.0;
        let mut lines = Vec::new();
        let mut has_baseline = false;

        let assets = prices
            .iter()
            .map(|priced| {
                (
                    priced.symbol,
                    chain_row(latest, priced.chain),
                    chain_row(prior, priced.chain),
                    AssetClass::Volatile,
                    priced.price,
                )
            })
            .chain(std::iter::once((
                "USD",
                &latest.usd,
                &prior.usd,
                AssetClass::Stable,
                1.0,
            )));

        for (symbol, now, old, class, price) in assets {
            let Some(delta) = analyze(now, old, class) else {
                continue;
            };
            has_baseline = true;
            net_flow_usd += delta.net_flow * price;
            if let Some(line) = delta.percent.and_then(|p| percent_line(symbol, p)) {
                lines.push(line);
            }
        }

        if has_baseline {
            summaries.push(WindowSummary {
                window,
                net_flow_usd,
                lines,
            });
        }
    }
    summaries
}

/// Markdown body: each window header followed by its asset lines
pub fn render(summaries: &[WindowSummary]) -> String {
    let mut out = Vec::new();
    for summary in summaries {
        out.push(summary.header());
        out.extend(summary.lines.iter().cloned());
    }
    out.join("\n")
}

/// `1234567.0` -> `1.23M`; amounts under a thousand render empty
pub fn format_usd_amount(abs: f64) -> String {
    let (scaled, suffix) = if abs >= 1_000_000_000.0 {
        (abs / 1_000_000_000.0, "B")
    } else if abs >= 1_000_000.0 {
        (abs / 1_000_000.0, "M")
    } else if abs >= 1_000.0 {
        (abs / 1_000.0, "K")
    } else {
        return String::new();
    };
    format!("{}{}", group_thousands(&format!("{:.2}", scaled)), suffix)
}

fn group_thousands(number: &str) -> String {
    let (int_part, frac_part) = number.split_once('.').unwrap_or((number, ""));
    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(number.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }
    if frac_part.is_empty() {
        grouped
    } else {
        format!("{}.{}", grouped, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn hour(i: usize) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 2, 1, 0, 0, 0).unwrap() + Duration::hours(i as i64)
    }

    fn row(exchange: f64, holding: f64, stake: f64) -> HourlyCohortRow {
        HourlyCohortRow {
            exchange,
            holding,
            stake,
            ..Default::default()
        }
    }

    fn series(len: usize, f: impl Fn(usize) -> (HourlyCohortRow, HourlyCohortRow, HourlyCohortRow)) -> Vec<MergedPoint> {
        (0..len)
            .map(|i| {
                let (eth, btc, usd) = f(i);
                MergedPoint { hour: hour(i), eth, btc, usd }
            })
            .collect()
    }

    fn prices() -> Vec<PricedChain> {
        vec![
            PricedChain::new(Chain::Bitcoin, 40_000.0),
            PricedChain::new(Chain::Ethereum, 3_000.0),
        ]
    }

    #[test]
    fn test_volatile_exchange_inflow_is_negative_flow() {
        let old = row(100.0, 1000.0, 50.0);
        let now = row(110.0, 1000.0, 50.0);
        let delta = analyze(&now, &old, AssetClass::Volatile).unwrap();

        assert_eq!(delta.net_flow, -10.0);
        // tracked balance adds exchange for volatile assets: 1150 -> 1160
        let expected = 100.0 * 10.0 / 1155.0;
        assert!((delta.percent.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_stable_exchange_inflow_is_positive_flow() {
        let old = row(100.0, 1000.0, 0.0);
        let now = row(110.0, 1000.0, 0.0);
        let delta = analyze(&now, &old, AssetClass::Stable).unwrap();

        assert_eq!(delta.net_flow, 10.0);
        // tracked balance subtracts exchange for stable assets: 900 -> 890
        let expected = 100.0 * -10.0 / 895.0;
        assert!((delta.percent.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_zero_prior_exchange_has_no_baseline() {
        let old = row(0.0, 1000.0, 10.0);
        let now = row(500.0, 9000.0, 10.0);
        assert_eq!(analyze(&now, &old, AssetClass::Volatile), None);
        assert_eq!(analyze(&now, &old, AssetClass::Stable), None);
    }

    #[test]
    fn test_window_needs_window_plus_one_points() {
        let flat = |_: usize| (row(10.0, 100.0, 0.0), row(10.0, 100.0, 0.0), row(10.0, 0.0, 0.0));

        let summaries = summarize_windows(&series(4, flat), &prices());
        let labels: Vec<_> = summaries.iter().map(|s| s.window.label).collect();
        assert_eq!(labels, vec!["1h"]);

        let summaries = summarize_windows(&series(5, flat), &prices());
        let labels: Vec<_> = summaries.iter().map(|s| s.window.label).collect();
        assert_eq!(labels, vec!["1h", "4h"]);
    }

    #[test]
    fn test_window_without_any_baseline_is_omitted() {
        let points = series(2, |i| {
            let exchange = if i == 0 { 0.0 } else { 50.0 };
            (row(exchange, 100.0, 0.0), row(exchange, 100.0, 0.0), row(exchange, 0.0, 0.0))
        });
        assert!(summarize_windows(&points, &prices()).is_empty());
    }

    #[test]
    fn test_net_flow_priced_and_summed() {
        let points = series(2, |i| {
            let i = i as f64;
            (
                row(100.0, 1000.0 + 10.0 * i, 0.0), // +10 ETH held
                row(200.0 + 1.0 * i, 500.0, 0.0),   // +1 BTC onto exchanges
                row(1_000_000.0 + 5_000.0 * i, 0.0, 0.0), // +5k USD onto exchanges
            )
        });
        let summaries = summarize_windows(&points, &prices());
        assert_eq!(summaries.len(), 1);

        let expected = 10.0 * 3_000.0 - 1.0 * 40_000.0 + 5_000.0;
        assert!((summaries[0].net_flow_usd - expected).abs() < 1e-6);
        assert_eq!(summaries[0].header(), "*1h*: `-$5.00K`");
    }

    #[test]
    fn test_small_percent_changes_not_listed() {
        let points = series(2, |i| {
            let i = i as f64;
            (row(100.0, 100_000.0 + i, 0.0), row(100.0, 100_000.0, 0.0), row(100.0, 0.0, 0.0))
        });
        let summaries = summarize_windows(&points, &prices());
        assert!(summaries[0].lines.is_empty());
    }

    #[test]
    fn test_render_lines() {
        let summary = WindowSummary {
            window: REPORT_WINDOWS[2],
            net_flow_usd: 2_345_678.0,
            lines: vec!["\t`ETH`: *+1.50%*".into(), "\t`BTC`: `-0.20%`".into()],
        };
        assert_eq!(
            render(&[summary]),
            "*24h*: *+$2.35M*\n\t`ETH`: *+1.50%*\n\t`BTC`: `-0.20%`"
        );
    }

    #[test]
    fn test_percent_line_format() {
        assert_eq!(percent_line("ETH", 1.5).as_deref(), Some("\t`ETH`: *+1.50%*"));
        assert_eq!(percent_line("USD", -0.25).as_deref(), Some("\t`USD`: `-0.25%`"));
        assert_eq!(percent_line("BTC", 0.05), None);
    }

    #[test]
    fn test_format_usd_amount() {
        assert_eq!(format_usd_amount(999.0), "");
        assert_eq!(format_usd_amount(1_500.0), "1.50K");
        assert_eq!(format_usd_amount(12_340_000.0), "12.34M");
        assert_eq!(format_usd_amount(1_234_000_000_000.0), "1,234.00B");
    }
}
