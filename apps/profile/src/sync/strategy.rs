//! Ordered fallback strategies for updating a single profile entry.

use std::fmt;
use std::future::Future;

use tracing::{debug, error, warn};

use crate::errors::SyncError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStrategy {
    /// Targeted endpoint for the one entry.
    Direct,
    /// Fetch the whole profile, splice the entry by id, push the whole profile back.
    General,
}

impl fmt::Display for UpdateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateStrategy::Direct => f.write_str("direct"),
            UpdateStrategy::General => f.write_str("general"),
        }
    }
}

/// Tried in this order; the first success wins.
pub const UPDATE_STRATEGIES: [UpdateStrategy; 2] = [UpdateStrategy::Direct, UpdateStrategy::General];

/// Runs `attempt` for each strategy in order, stopping at the first success.
///
/// Returns the strategy that succeeded, or `StrategiesExhausted` with every
/// failure once the list runs out.
pub async fn run_in_order<F, Fut>(
    label: &str,
    strategies: &[UpdateStrategy],
    mut attempt: F,
) -> Result<UpdateStrategy, SyncError>
where
    F: FnMut(UpdateStrategy) -> Fut,
    Fut: Future<Output = Result<(), SyncError>>,
{
    let mut failures = Vec::with_capacity(strategies.len());

    for &strategy in strategies {
        match attempt(strategy).await {
            Ok(()) => {
                debug!("{label}: {strategy} update succeeded");
                return Ok(strategy);
            }
            Err(e) => {
                warn!("{label}: {strategy} update failed: {e}");
                failures.push(format!("{strategy}: {e}"));
            }
        }
    }

    error!("{label}: all {} update strategies failed", strategies.len());
    Err(SyncError::StrategiesExhausted { failures })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let mut tried = Vec::new();
        let winner = run_in_order("education e1", &UPDATE_STRATEGIES, |s| {
            tried.push(s);
            async { Ok(()) }
        })
        .await
        .unwrap();
        assert_eq!(winner, UpdateStrategy::Direct);
        assert_eq!(tried, vec![UpdateStrategy::Direct]);
    }

    #[tokio::test]
    async fn test_falls_through_to_general() {
        let winner = run_in_order("education e1", &UPDATE_STRATEGIES, |s| async move {
            match s {
                UpdateStrategy::Direct => Err(SyncError::Rejected("404".to_string())),
                UpdateStrategy::General => Ok(()),
            }
        })
        .await
        .unwrap();
        assert_eq!(winner, UpdateStrategy::General);
    }

    #[tokio::test]
    async fn test_exhausted_reports_every_failure() {
        let err = run_in_order("education e1", &UPDATE_STRATEGIES, |_| async {
            Err(SyncError::Rejected("down".to_string()))
        })
        .await
        .unwrap_err();
        match err {
            SyncError::StrategiesExhausted { failures } => {
                assert_eq!(failures.len(), 2);
                assert!(failures[0].starts_with("direct"));
                assert!(failures[1].starts_with("general"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
