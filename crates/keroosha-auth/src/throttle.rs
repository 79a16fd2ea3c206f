//! Per-user throttle for confirmation and password-reset code requests.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use keroosha_core::UserId;
use keroosha_core::config::AuthConfig;
use keroosha_core::traits::{Clock, SystemClock};
use keroosha_core::{ErrorCode, OpResult};

/// Remembers when each user last received a code.
///
/// The map is process-local. Without a sweeper, entries live for the
/// lifetime of the process; [`ConfirmationThrottle::sweep`] drops entries
/// whose window has passed.
#[derive(Debug)]
pub struct ConfirmationThrottle {
    last_issued: DashMap<UserId, DateTime<Utc>>,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl ConfirmationThrottle {
    /// Creates a throttle with the given window, using the wall clock.
    pub fn new(window: Duration) -> Self {
        Self::with_clock(window, Arc::new(SystemClock))
    }

    /// Creates a throttle driven by `clock`.
    pub fn with_clock(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            last_issued: DashMap::new(),
            window,
            clock,
        }
    }

    /// Creates a throttle from auth configuration.
    pub fn from_config(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_clock(config.throttle_window(), clock)
    }

    /// Minimum time between two issuances for one user.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records an issuance for `user_id` unless one happened within the window.
    ///
    /// The check and the write happen under the entry's shard lock, so two
    /// concurrent calls for the same user cannot both succeed.
    pub fn try_acquire(&self, user_id: UserId) -> OpResult<()> {
        let now = self.clock.now();
        match self.last_issued.entry(user_id) {
            Entry::Occupied(mut entry) => {
                if now - *entry.get() <= self.window {
                    debug!(%user_id, "Confirmation request throttled");
                    return Err(ErrorCode::UserConfirmationEmailSentTooOften);
                }
                entry.insert(now);
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
            }
        }
        Ok(())
    }

    /// Removes entries whose window has elapsed. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let before = self.last_issued.len();
        self.last_issued.retain(|_, issued| now - *issued <= self.window);
        before.saturating_sub(self.last_issued.len())
    }

    /// Number of tracked users.
    pub fn len(&self) -> usize {
        self.last_issued.len()
    }

    /// Whether no user is tracked.
    pub fn is_empty(&self) -> bool {
        self.last_issued.is_empty()
    }

    /// Runs [`ConfirmationThrottle::sweep`] every `interval` until the handle is aborted.
    pub fn spawn_sweeper(self: Arc<Self>, interval: StdDuration) -> JoinHandle<()> {
        info!(interval_secs = interval.as_secs(), "Starting confirmation throttle sweeper");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let removed = self.sweep();
                if removed > 0 {
                    debug!(removed, "Swept stale throttle entries");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keroosha_core::traits::ManualClock;

    fn throttle() -> (ConfirmationThrottle, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (
            ConfirmationThrottle::with_clock(Duration::seconds(60), clock.clone()),
            clock,
        )
    }

    #[test]
    fn test_second_request_inside_window_is_rejected() {
        let (throttle, clock) = throttle();
        let user = UserId(1);
        assert!(throttle.try_acquire(user).is_ok());
        clock.advance(Duration::seconds(30));
        assert_eq!(
            throttle.try_acquire(user),
            Err(ErrorCode::UserConfirmationEmailSentTooOften)
        );
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let (throttle, clock) = throttle();
        let user = UserId(1);
        throttle.try_acquire(user).unwrap();
        clock.advance(Duration::seconds(60));
        assert!(throttle.try_acquire(user).is_err());
        clock.advance(Duration::milliseconds(1));
        assert!(throttle.try_acquire(user).is_ok());
    }

    #[test]
    fn test_rejection_does_not_extend_window() {
        let (throttle, clock) = throttle();
        let user = UserId(4);
        throttle.try_acquire(user).unwrap();
        clock.advance(Duration::seconds(59));
        assert!(throttle.try_acquire(user).is_err());
        clock.advance(Duration::seconds(2));
        assert!(throttle.try_acquire(user).is_ok());
    }

    #[test]
    fn test_users_are_independent() {
        let (throttle, _) = throttle();
        assert!(throttle.try_acquire(UserId(1)).is_ok());
        assert!(throttle.try_acquire(UserId(2)).is_ok());
        assert!(throttle.try_acquire(UserId(1)).is_err());
    }

    #[test]
    fn test_sweep_drops_stale_entries() {
        let (throttle, clock) = throttle();
        throttle.try_acquire(UserId(1)).unwrap();
        clock.advance(Duration::seconds(45));
        throttle.try_acquire(UserId(2)).unwrap();
        clock.advance(Duration::seconds(20));

        assert_eq!(throttle.sweep(), 1);
        assert_eq!(throttle.len(), 1);
        assert!(throttle.try_acquire(UserId(1)).is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_for_one_user_pass_once() {
        let throttle = Arc::new(ConfirmationThrottle::new(Duration::seconds(60)));
        let mut handles = Vec::new();
        for _ in 0..32 {
            let throttle = throttle.clone();
            handles.push(tokio::spawn(async move { throttle.try_acquire(UserId(9)).is_ok() }));
        }

        let mut passed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                passed += 1;
            }
        }
        assert_eq!(passed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_runs_periodically() {
        let clock = Arc::new(ManualClock::default());
        let throttle = Arc::new(ConfirmationThrottle::with_clock(
            Duration::seconds(60),
            clock.clone(),
        ));
        throttle.try_acquire(UserId(1)).unwrap();
        clock.advance(Duration::seconds(120));

        let handle = throttle.clone().spawn_sweeper(StdDuration::from_secs(10));
        tokio::time::sleep(StdDuration::from_secs(11)).await;
        assert!(throttle.is_empty());
        handle.abort();
    }
}
