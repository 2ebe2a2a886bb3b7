//! Request throttling
//!
//! All requests go through a [`RateLimiter`] that enforces three rules at once:
//!
//! - a reservoir of permits, refilled to a fixed amount on a fixed wall-clock
//!   interval (a fixed window, independent of consumption);
//! - a minimum spacing between the start of two dispatches;
//! - at most one request in flight.
//!
//! A caller waits for whichever rule is most restrictive. Waiters are admitted
//! in the order they asked, because the slot is a fair (FIFO) async mutex that
//! stays locked for the whole request.

use crate::error::{SdkError, SdkResult};
use once_cell::sync::Lazy;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Default reservoir size
pub const DEFAULT_RESERVOIR: u32 = 100;

/// Default refresh interval of the reservoir
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Default minimum time between dispatch starts
pub const DEFAULT_MIN_TIME: Duration = Duration::from_millis(333);

static SHARED: Lazy<Arc<RateLimiter>> =
    Lazy::new(|| Arc::new(RateLimiter::new(RateLimitConfig::default())));

/// Throttling configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Permits available when the limiter is created
    pub reservoir: u32,

    /// Permits the reservoir is reset to on every refresh
    pub refresh_amount: u32,

    /// Interval between refreshes
    pub refresh_interval: Duration,

    /// Minimum time between the start of two dispatches
    pub min_time: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            reservoir: DEFAULT_RESERVOIR,
            refresh_amount: DEFAULT_RESERVOIR,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            min_time: DEFAULT_MIN_TIME,
        }
    }
}

impl RateLimitConfig {
    /// Create a configuration with the default budget
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reservoir size and refresh amount
    pub fn with_reservoir(mut self, permits: u32) -> Self {
        self.reservoir = permits;
        self.refresh_amount = permits;
        self
    }

    /// Set the refresh interval
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Set the minimum spacing between dispatches
    pub fn with_min_time(mut self, min_time: Duration) -> Self {
        self.min_time = min_time;
        self
    }

    /// Reject budgets that would eventually stall every caller
    pub fn validate(&self) -> SdkResult<()> {
        if self.refresh_interval.is_zero() {
            return Err(SdkError::config("Refresh interval must be positive"));
        }

        if self.refresh_amount == 0 {
            return Err(SdkError::config("Refresh amount must be positive"));
        }

        Ok(())
    }
}

#[derive(Debug)]
struct Slot {
    reservoir: u32,
    window_start: Instant,
    last_dispatch: Option<Instant>,
}

impl Slot {
    /// Roll the window forward to `now`, refilling the reservoir once if at
    /// least one boundary was crossed.
    fn refresh(&mut self, now: Instant, config: &RateLimitConfig) {
        let interval = config.refresh_interval;
        if interval.is_zero() {
            self.reservoir = config.refresh_amount;
            return;
        }

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < interval {
            return;
        }

        let windows = (elapsed.as_nanos() / interval.as_nanos()) as u32;
        self.window_start += interval * windows;
        self.reservoir = config.refresh_amount;
    }
}

/// Throttle shared by every request of one or more clients
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    slot: Mutex<Slot>,
}

impl RateLimiter {
    /// Create a limiter; the first refresh window starts now
    pub fn new(config: RateLimitConfig) -> Self {
        let slot = Slot {
            reservoir: config.reservoir,
            window_start: Instant::now(),
            last_dispatch: None,
        };

        Self {
            config,
            slot: Mutex::new(slot),
        }
    }

    /// The process-wide limiter with the default budget
    pub fn shared() -> Arc<RateLimiter> {
        SHARED.clone()
    }

    /// The configuration of this limiter
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Permits left in the current window
    ///
    /// Reads the same slot that [`schedule`](Self::schedule) holds, so this
    /// resolves only after every queued and in-flight request has finished.
    pub async fn remaining(&self) -> u32 {
        let mut slot = self.slot.lock().await;
        slot.refresh(Instant::now(), &self.config);
        slot.reservoir
    }

    /// Run `task` once a permit is granted.
    ///
    /// The slot is held until `task` completes, so no other scheduled task
    /// starts while this one is in flight. A task that never completes blocks
    /// every later caller.
    pub async fn schedule<F, Fut, T>(&self, task: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut slot = self.slot.lock().await;
        self.acquire(&mut slot).await;
        task().await
    }

    async fn acquire(&self, slot: &mut Slot) {
        loop {
            let now = Instant::now();
            slot.refresh(now, &self.config);

            if slot.reservoir == 0 {
                let refill_at = slot.window_start + self.config.refresh_interval;
                trace!(wait = ?(refill_at - now), "Reservoir exhausted, waiting for refresh");
                sleep_until(refill_at).await;
                continue;
            }

            if let Some(last) = slot.last_dispatch {
                let ready_at = last + self.config.min_time;
                if now < ready_at {
                    trace!(wait = ?(ready_at - now), "Spacing requests");
                    sleep_until(ready_at).await;
                    continue;
                }
            }

            slot.reservoir -= 1;
            slot.last_dispatch = Some(now);
            return;
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.reservoir, 100);
        assert_eq!(config.refresh_amount, 100);
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.min_time, Duration::from_millis(333));
    }

    #[test]
    fn test_config_validation() {
        assert!(RateLimitConfig::default().validate().is_ok());
        assert!(RateLimitConfig::new().with_reservoir(0).validate().is_err());
        assert!(RateLimitConfig::new()
            .with_refresh_interval(Duration::ZERO)
            .validate()
            .is_err());

        // A full first window does not make up for never refilling.
        let mut no_refill = RateLimitConfig::new().with_reservoir(5);
        no_refill.refresh_amount = 0;
        assert!(matches!(no_refill.validate(), Err(SdkError::ConfigError { .. })));

        // Starting empty is fine as long as the window refills.
        let mut starts_empty = RateLimitConfig::new();
        starts_empty.reservoir = 0;
        assert!(starts_empty.validate().is_ok());
    }

    #[test]
    fn test_shared_is_single_instance() {
        assert!(Arc::ptr_eq(&RateLimiter::shared(), &RateLimiter::shared()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_two_in_flight() {
        let limiter = Arc::new(RateLimiter::default());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let starts: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));

        let tasks: Vec<_> = (0..3)
            .map(|_| {
                let limiter = limiter.clone();
                let in_flight = in_flight.clone();
                let peak = peak.clone();
                let starts = starts.clone();
                tokio::spawn(async move {
                    limiter
                        .schedule(|| async {
                            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                            peak.fetch_max(now, Ordering::SeqCst);
                            starts.lock().await.push(Instant::now());
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            in_flight.fetch_sub(1, Ordering::SeqCst);
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);

        let starts = starts.lock().await;
        assert_eq!(starts.len(), 3);
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= DEFAULT_MIN_TIME);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_request_delays_next_start() {
        let limiter = RateLimiter::default();
        let began = Instant::now();

        limiter
            .schedule(|| tokio::time::sleep(Duration::from_secs(2)))
            .await;
        let second = limiter.schedule(|| async { Instant::now() }).await;

        // Spacing is measured from the first start, which is long past.
        assert!(second - began >= Duration::from_secs(2));
        assert!(second - began < Duration::from_secs(2) + DEFAULT_MIN_TIME);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reservoir_waits_for_refresh() {
        let config = RateLimitConfig::new()
            .with_reservoir(2)
            .with_refresh_interval(Duration::from_secs(10))
            .with_min_time(Duration::ZERO);
        let limiter = RateLimiter::new(config);
        let began = Instant::now();

        limiter.schedule(|| async {}).await;
        limiter.schedule(|| async {}).await;
        assert_eq!(limiter.remaining().await, 0);

        let third = limiter.schedule(|| async { Instant::now() }).await;
        assert!(third - began >= Duration::from_secs(10));
        assert_eq!(limiter.remaining().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_is_fixed_window() {
        let config = RateLimitConfig::new()
            .with_reservoir(5)
            .with_refresh_interval(Duration::from_secs(10))
            .with_min_time(Duration::ZERO);
        let limiter = RateLimiter::new(config);

        tokio::time::sleep(Duration::from_secs(9)).await;
        limiter.schedule(|| async {}).await;
        assert_eq!(limiter.remaining().await, 4);

        // The window boundary is at 10s regardless of when permits were used.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(limiter.remaining().await, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_waits_for_in_flight_request() {
        let limiter = Arc::new(RateLimiter::default());
        let began = Instant::now();

        let running = limiter.clone();
        let task = tokio::spawn(async move {
            running
                .schedule(|| tokio::time::sleep(Duration::from_secs(2)))
                .await
        });
        tokio::task::yield_now().await;

        let remaining = limiter.remaining().await;
        assert!(began.elapsed() >= Duration::from_secs(2));
        assert_eq!(remaining, DEFAULT_RESERVOIR - 1);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_fifo_admission() {
        let limiter = Arc::new(RateLimiter::default());
        let order: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));

        let mut tasks = Vec::new();
        for i in 0..4 {
            let limiter = limiter.clone();
            let order = order.clone();
            tasks.push(tokio::spawn(async move {
                limiter.schedule(|| async { order.lock().await.push(i) }).await
            }));
            // Let the task reach the queue before spawning the next one.
            tokio::task::yield_now().await;
        }

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(*order.lock().await, vec![0, 1, 2, 3]);
    }
}
