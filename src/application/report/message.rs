use crate::domain::models::{MergedPoint, PricedChain};
use crate::domain::services::window_summary::{render, summarize_windows};

/// `BTC: 43.2K, ETH: 3.1K`
fn price_line(prices: &[PricedChain]) -> String {
    prices
        .iter()
        .map(|p| format!("{}: {:.1}K", p.symbol, p.price / 1000.0))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Markdown report: linked price line, blank line, then the window summaries
pub fn compose_message(points: &[MergedPoint], prices: &[PricedChain], report_url: &str) -> String {
    let summary = render(&summarize_windows(points, prices));
    format!("[{}]({})\n\n{}", price_line(prices), report_url, summary)
}
