//! Bounded fan-out of view-count increments.
//!
//! Ids are processed in batch rounds of at most `batch_size`. Increments within
//! a round run concurrently and every one of them settles before the next round
//! starts. One id failing never affects another.

use std::future::Future;

use futures::future::join_all;
use serde::Serialize;

/// Default number of increments dispatched per batch round.
pub const DEFAULT_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IncrementOutcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncrementResult {
    pub id: String,
    pub outcome: IncrementOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncrementSummary {
    pub success_count: usize,
    pub failed_count: usize,
    pub results: Vec<IncrementResult>,
}

impl IncrementSummary {
    fn from_results(results: Vec<IncrementResult>) -> Self {
        let success_count = results
            .iter()
            .filter(|r| r.outcome == IncrementOutcome::Success)
            .count();
        Self {
            success_count,
            failed_count: results.len() - success_count,
            results,
        }
    }
}

/// Run `increment` once per id and collect one result per id, in input order.
///
/// A `batch_size` of zero is treated as one.
pub async fn increment_many<F, Fut, E>(
    ids: Vec<String>,
    batch_size: usize,
    increment: F,
) -> IncrementSummary
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    let mut results = Vec::with_capacity(ids.len());

    for round in ids.chunks(batch_size.max(1)) {
        let settled = join_all(round.iter().map(|id| {
            let fut = increment(id.clone());
            async move { (id.clone(), fut.await) }
        }))
        .await;

        results.extend(settled.into_iter().map(|(id, result)| match result {
            Ok(()) => IncrementResult {
                id,
                outcome: IncrementOutcome::Success,
                error: None,
            },
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "view increment failed");
                IncrementResult {
                    id,
                    outcome: IncrementOutcome::Failure,
                    error: Some(e.to_string()),
                }
            }
        }));
    }

    IncrementSummary::from_results(results)
}
