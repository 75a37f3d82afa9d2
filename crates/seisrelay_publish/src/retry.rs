//! Retry-with-backoff executor for fallible async operations.
//!
//! There is no maximum attempt count; only the wall-clock ceiling bounds
//! the retries. Sleep durations grow geometrically with a uniform jitter
//! factor so concurrent deliveries do not hammer the sink in lockstep.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// Jitter factor bounds, drawn uniformly per sleep.
pub const JITTER_MIN: f64 = 0.75;
pub const JITTER_MAX: f64 = 1.25;

/// Backoff parameters for [`retry_with_backoff`].
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Sleep before the first retry (scaled by growth and jitter).
    pub base: Duration,

    /// Geometric growth factor applied per attempt.
    pub growth: f64,

    /// Wall-clock budget measured from the first attempt; once exceeded the
    /// last error is returned as permanent.
    pub ceiling: Duration,
}

impl RetryPolicy {
    /// Production delivery policy: 500 ms base, 1.5x growth, 60 s budget.
    pub const DEFAULT: Self = Self {
        base: Duration::from_millis(500),
        growth: 1.5,
        ceiling: Duration::from_secs(60),
    };

    /// Sleep duration for the given attempt (0-indexed) and jitter factor:
    /// `base * growth^attempt * jitter`.
    pub fn delay_for_attempt(&self, attempt: u32, jitter: f64) -> Duration {
        let secs = self.base.as_secs_f64() * self.growth.powi(attempt as i32) * jitter;
        Duration::from_secs_f64(secs)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn draw_jitter() -> f64 {
    rand::thread_rng().gen_range(JITTER_MIN..JITTER_MAX)
}

/// Execute `operation` until it succeeds or the policy's wall-clock ceiling
/// is exceeded, sleeping with jittered geometric backoff between attempts.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if start.elapsed() > policy.ceiling {
                    warn!(attempts = attempt + 1, "Retry budget exceeded");
                    return Err(error);
                }

                let delay = policy.delay_for_attempt(attempt, draw_jitter());
                debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying after backoff");
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
