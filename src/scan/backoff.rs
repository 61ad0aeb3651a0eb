//! Exponential backoff with jitter for server retries.

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;

/// Delay before retry number `attempt` (1-based).
pub(crate) fn retry_delay(attempt: u32, config: &RetryConfig) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = config.base_delay_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(config.max_delay_ms);

    // Jitter of 0 to 10% keeps simultaneous retries from re-aligning.
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}
