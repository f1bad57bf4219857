use std::future::Future;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::error::Result;

/// Retry policy for session connect: the hub may still be registering nodes
/// when the test starts, so this budget is deliberately generous.
pub const CONNECT_RETRY: RetryPolicy = RetryPolicy::new(
    12,
    Duration::from_millis(30_100),
    Duration::from_millis(300),
);

/// Retry policy for the individual test steps (page open, link click,
/// title check).
pub const STEP_RETRY: RetryPolicy = RetryPolicy::new(
    7,
    Duration::from_millis(20_100),
    Duration::from_millis(300),
);

/// Bounded retry with a fixed wait between attempts.
///
/// An operation is retried until it succeeds, `max_attempts` attempts have
/// failed, or `max_total_delay` has elapsed since the first attempt,
/// whichever comes first. The last failure is surfaced unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub max_total_delay: Duration,
    pub wait_fixed: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, max_total_delay: Duration, wait_fixed: Duration) -> Self {
        Self {
            max_attempts,
            max_total_delay,
            wait_fixed,
        }
    }

    /// Run `op` under this policy. `what` labels the operation in retry logs.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let started = Instant::now();
        let mut attempt: u32 = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_attempts
                        || started.elapsed() >= self.max_total_delay
                    {
                        return Err(err);
                    }
                    warn!(what, attempt, error = %err, "attempt failed, retrying");
                    attempt += 1;
                    tokio::time::sleep(self.wait_fixed).await;
                }
            }
        }
    }
}
