use tokio::task::JoinHandle;

use super::chain_ingestor::ChainIngestor;
use crate::domain::errors::IngestError;
use crate::domain::models::Chain;
use crate::infrastructure::persistence::RunReceipt;
use crate::utils::logging;

/// Run one task per chain concurrently.
///
/// A failing chain does not cancel the others: every task is awaited, then the
/// first error (in chain order) is returned.
pub async fn batch_update(ingestors: Vec<ChainIngestor>) -> Result<Vec<RunReceipt>, IngestError> {
    let tasks: Vec<(Chain, JoinHandle<Result<Vec<RunReceipt>, IngestError>>)> = ingestors
        .into_iter()
        .map(|ingestor| {
            let chain = ingestor.chain();
            (chain, tokio::spawn(async move { ingestor.run().await }))
        })
        .collect();

    let mut receipts = Vec::new();
    let mut first_error = None;
    for (chain, task) in tasks {
        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => Err(IngestError::Join {
                chain,
                message: e.to_string(),
            }),
        };

        match outcome {
            Ok(chain_receipts) => receipts.extend(chain_receipts),
            Err(e) => {
                logging::log_error(&format!("{}", e));
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(receipts),
    }
}
