//! Collapses repeated addresses across the pages of one run.
//!
//! Holder listings shift while they are being paged through, so one address can
//! show up on two pages. Only the last sighting in fetch order is kept.

use std::collections::HashMap;

use crate::domain::models::WalletObservation;

/// Keep one observation per address, the last one seen; output follows the
/// order in which each surviving observation was fetched.
pub fn dedupe_run(observations: Vec<WalletObservation>) -> Vec<WalletObservation> {
    let mut last_seen: HashMap<String, usize> = HashMap::with_capacity(observations.len());
    for (index, observation) in observations.iter().enumerate() {
        last_seen.insert(observation.address.clone(), index);
    }

    observations
        .into_iter()
        .enumerate()
        .filter(|(index, observation)| last_seen.get(&observation.address) == Some(index))
        .map(|(_, observation)| observation)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Chain;

    fn obs(address: &str, balance: f64) -> WalletObservation {
        WalletObservation::new(Chain::Ethereum, "ETH", address, None, balance, false)
    }

    #[test]
    fn test_later_sighting_wins() {
        let result = dedupe_run(vec![obs("0xa", 10.0), obs("0xb", 5.0), obs("0xa", 12.0)]);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].address, "0xb");
        assert_eq!(result[1].address, "0xa");
        assert_eq!(result[1].balance, 12.0);
    }

    #[test]
    fn test_earlier_duplicate_removed_not_zeroed() {
        let result = dedupe_run(vec![obs("0xa", 10.0), obs("0xa", 3.0), obs("0xa", 7.0)]);

        assert_eq!(result, vec![obs("0xa", 7.0)]);
        let total: f64 = result.iter().map(|w| w.balance).sum();
        assert_eq!(total, 7.0);
    }

    #[test]
    fn test_unique_input_unchanged() {
        let input = vec![obs("0xa", 1.0), obs("0xb", 2.0), obs("0xc", 3.0)];
        assert_eq!(dedupe_run(input.clone()), input);
    }

    #[test]
    fn test_empty_run() {
        assert!(dedupe_run(Vec::new()).is_empty());
    }
}
