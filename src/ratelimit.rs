//! Token-bucket rate limiting for upstream API calls.

use std::time::Duration;
use tokio::{
    sync::Mutex,
    time::{
        sleep_until,
        Instant,
    },
};
use tokio_util::sync::CancellationToken;

/// The wait was abandoned because the caller's cancellation token fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rate limiter wait cancelled")]
pub struct Cancelled;

/// Token bucket with a fixed refill rate and a burst size of one.
///
/// [`acquire`](RateLimiter::acquire) blocks until the caller's slot comes
/// up; slots are handed out in request order, so admission is fair across
/// concurrent tasks. Cancelling a blocked wait abandons only that caller.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Instant>,
}

impl RateLimiter {
    pub fn new(per_second: u32) -> Self {
        let per_second = per_second.max(1);
        Self {
            interval: Duration::from_secs_f64(1.0 / f64::from(per_second)),
            next_slot: Mutex::new(Instant::now()),
        }
    }

    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), Cancelled> {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = (*next).max(now);
            *next = slot + self.interval;
            slot
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(Cancelled),
            _ = sleep_until(slot) => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn spaces_grants_at_the_configured_rate() {
        let limiter = RateLimiter::new(2);
        let cancel = CancellationToken::new();

        let started = Instant::now();
        for _ in 0..3 {
            limiter.acquire(&cancel).await.unwrap();
        }
        let elapsed = started.elapsed();

        // burst of one, then one grant every 500ms
        assert!(elapsed >= Duration::from_millis(999), "elapsed {elapsed:?}");
        assert!(elapsed <= Duration::from_millis(1100), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_wait_leaves_other_waiters_alone() {
        let limiter = Arc::new(RateLimiter::new(1));
        let doomed = CancellationToken::new();
        let live = CancellationToken::new();

        limiter.acquire(&live).await.unwrap();

        let blocked = tokio::spawn({
            let limiter = Arc::clone(&limiter);
            let doomed = doomed.clone();
            async move { limiter.acquire(&doomed).await }
        });
        tokio::task::yield_now().await;
        doomed.cancel();
        assert_eq!(blocked.await.unwrap(), Err(Cancelled));

        // the limiter still grants slots to callers with a live token
        limiter.acquire(&live).await.unwrap();
    }

    #[tokio::test]
    async fn pre_cancelled_token_fails_immediately() {
        let limiter = RateLimiter::new(100);
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(limiter.acquire(&cancel).await, Err(Cancelled));
    }
}
