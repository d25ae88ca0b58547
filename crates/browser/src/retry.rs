//! Bounded polling with fixed backoff.
//!
//! Steps that depend on asynchronous client-side rendering are retried a
//! fixed number of times with a fixed delay; steps that depend on static
//! page structure are not retried (see [`crate::script`]).

use std::time::Duration;

use tracing::debug;

/// Retry budget for one polled operation.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Total attempts, including the first. Clamped to at least 1.
    pub attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl PollPolicy {
    #[must_use]
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }
}

/// Failure of a polled operation. The cause of the final attempt is always
/// carried, so the failure path never loses its reason.
#[derive(Debug, thiserror::Error)]
#[error("gave up after {attempts} attempts: {last}")]
pub struct PollError<E: std::error::Error> {
    pub attempts: u32,
    #[source]
    pub last: E,
}

/// Run `op` until it succeeds or the attempt budget is spent.
///
/// The operation receives the 1-based attempt number. Exactly
/// `policy.attempts` attempts are made, no more, no fewer; the delay is
/// slept between attempts only (not after the last).
pub async fn poll<T, E, F, Fut>(policy: PollPolicy, mut op: F) -> Result<T, PollError<E>>
where
    E: std::error::Error,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= attempts => {
                return Err(PollError {
                    attempts: attempt,
                    last: e,
                });
            },
            Err(e) => {
                debug!(attempt, max = attempts, error = %e, "poll attempt failed, retrying");
            },
        }
        tokio::time::sleep(policy.delay).await;
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("not ready")]
    struct NotReady;

    #[tokio::test]
    async fn succeeds_on_later_attempt() {
        let calls = AtomicU32::new(0);
        let result = poll(PollPolicy::new(5, Duration::from_millis(1)), |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n >= 3 {
                    Ok(n)
                } else {
                    Err(NotReady)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_is_exact_and_carries_cause() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = poll(PollPolicy::new(20, Duration::from_millis(0)), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(NotReady) }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts, 20);
        assert_eq!(calls.load(Ordering::SeqCst), 20);
        assert_eq!(err.last.to_string(), "not ready");
    }

    #[tokio::test]
    async fn zero_attempts_still_runs_once() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = poll(PollPolicy::new(0, Duration::from_millis(0)), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(NotReady) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
