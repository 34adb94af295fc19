// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-flight session refresh.
//!
//! When a request comes back 401 the client asks [`SessionManager`] to
//! recover the session. The first caller becomes the leader and performs the
//! one refresh call; every caller arriving while it is in flight is queued
//! and woken with the leader's outcome. A failed refresh raises a single
//! "session expired" notification until the next successful login or session
//! check re-arms it.

use std::mem;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bierzmo_core::BierzmoError;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Message shown to the user when the session cannot be recovered.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Performs the actual session refresh call.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self) -> Result<(), BierzmoError>;
}

/// Receives the user-visible "session expired" notification.
pub trait ExpiryNotifier: Send + Sync {
    fn session_expired(&self, message: &str, reason: &str);
}

/// Default notifier: emits the notification as a `warn!` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl ExpiryNotifier for TracingNotifier {
    fn session_expired(&self, message: &str, reason: &str) {
        warn!(reason, "{message}");
    }
}

/// Outcome handed to queued requests. The error is carried as text so that
/// every waiter can build its own `SessionExpired`.
type RefreshOutcome = Result<(), String>;

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    pending: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Owns the refresh-in-flight flag, the pending request queue and the
/// notification latch. One instance per [`crate::ApiClient`].
pub struct SessionManager {
    state: Mutex<RefreshState>,
    expiry_notified: AtomicBool,
    refreshes: AtomicU64,
    notifier: Arc<dyn ExpiryNotifier>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("refreshing", &self.is_refreshing())
            .field("pending", &self.pending_len())
            .field("refreshes", &self.refresh_count())
            .field("expiry_notified", &self.expiry_notified.load(Ordering::SeqCst))
            .finish()
    }
}

enum Turn {
    Leader,
    Follower(oneshot::Receiver<RefreshOutcome>),
}

impl SessionManager {
    pub fn new(notifier: Arc<dyn ExpiryNotifier>) -> Self {
        Self {
            state: Mutex::new(RefreshState::default()),
            expiry_notified: AtomicBool::new(false),
            refreshes: AtomicU64::new(0),
            notifier,
        }
    }

    /// Recovers the session after a 401.
    ///
    /// Returns `Ok(())` when the caller should replay its request, or
    /// [`BierzmoError::SessionExpired`] when the refresh failed.
    pub async fn handle_unauthorized(
        &self,
        refresher: &dyn TokenRefresher,
    ) -> Result<(), BierzmoError> {
        // Check-and-set happens under a sync lock with no await in between.
        let turn = {
            let mut state = self.lock_state();
            if state.in_flight {
                let (tx, rx) = oneshot::channel();
                state.pending.push(tx);
                debug!(pending = state.pending.len(), "refresh in flight, queueing request");
                Turn::Follower(rx)
            } else {
                state.in_flight = true;
                Turn::Leader
            }
        };

        match turn {
            Turn::Follower(rx) => match rx.await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(reason)) => Err(BierzmoError::session_expired(reason)),
                Err(_) => Err(BierzmoError::session_expired("session refresh was abandoned")),
            },
            Turn::Leader => self.lead_refresh(refresher).await,
        }
    }

    async fn lead_refresh(&self, refresher: &dyn TokenRefresher) -> Result<(), BierzmoError> {
        let guard = InFlightGuard {
            manager: self,
            settled: false,
        };
        let attempt = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(attempt, "refreshing session");

        match refresher.refresh().await {
            Ok(()) => {
                let woken = guard.settle(Ok(()));
                info!(replayed = woken, "session refreshed");
                Ok(())
            }
            Err(err) => {
                let reason = err.to_string();
                let rejected = guard.settle(Err(reason.clone()));
                warn!(rejected, error = %reason, "session refresh failed");
                self.notify_expired(&reason);
                Err(BierzmoError::session_expired(reason))
            }
        }
    }

    /// Raises the session-expired notification unless it already fired in
    /// this episode.
    pub fn notify_expired(&self, reason: &str) {
        if !self.expiry_notified.swap(true, Ordering::SeqCst) {
            self.notifier.session_expired(SESSION_EXPIRED_MESSAGE, reason);
        } else {
            debug!(reason, "session expiry already notified");
        }
    }

    /// Re-arms the notification after a successful login or session check.
    pub fn mark_authenticated(&self) {
        self.expiry_notified.store(false, Ordering::SeqCst);
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock_state().in_flight
    }

    pub fn pending_len(&self) -> usize {
        self.lock_state().pending.len()
    }

    /// Number of refresh calls started since construction.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::SeqCst)
    }

    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        // Every critical section leaves the state consistent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Clears the in-flight flag and wakes every queued request in
    /// registration order. Returns how many were woken.
    fn settle(&self, outcome: RefreshOutcome) -> usize {
        let waiters = {
            let mut state = self.lock_state();
            state.in_flight = false;
            mem::take(&mut state.pending)
        };
        let count = waiters.len();
        for waiter in waiters {
            // A waiter whose future was dropped has nobody to tell.
            let _ = waiter.send(outcome.clone());
        }
        count
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(Arc::new(TracingNotifier))
    }
}

/// Settles the refresh even when the leader's future is dropped mid-flight,
/// so queued requests are never stranded.
struct InFlightGuard<'a> {
    manager: &'a SessionManager,
    settled: bool,
}

impl InFlightGuard<'_> {
    fn settle(mut self, outcome: RefreshOutcome) -> usize {
        self.settled = true;
        self.manager.settle(outcome)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let rejected = self
                .manager
                .settle(Err("session refresh was abandoned".to_string()));
            warn!(rejected, "session refresh abandoned before completion");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Refresher that waits for a signal before answering.
    struct GatedRefresher {
        calls: AtomicUsize,
        gate: tokio::sync::Notify,
        succeed: bool,
    }

    impl GatedRefresher {
        fn new(succeed: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: tokio::sync::Notify::new(),
                succeed,
            }
        }
    }

    #[async_trait]
    impl TokenRefresher for GatedRefresher {
        async fn refresh(&self) -> Result<(), BierzmoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            if self.succeed {
                Ok(())
            } else {
                Err(BierzmoError::Api {
                    status: 401,
                    message: "refresh token expired".into(),
                })
            }
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        count: AtomicUsize,
    }

    impl ExpiryNotifier for CountingNotifier {
        fn session_expired(&self, _message: &str, _reason: &str) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn wait_for_pending(manager: &SessionManager, n: usize) {
        for _ in 0..100 {
            if manager.pending_len() == n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("expected {n} pending requests, got {}", manager.pending_len());
    }

    #[tokio::test]
    async fn concurrent_failures_share_one_refresh() {
        let manager = Arc::new(SessionManager::default());
        let refresher = Arc::new(GatedRefresher::new(true));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let manager = manager.clone();
            let refresher = refresher.clone();
            handles.push(tokio::spawn(async move {
                manager.handle_unauthorized(refresher.as_ref()).await
            }));
        }

        wait_for_pending(&manager, 3).await;
        assert!(manager.is_refreshing());
        refresher.gate.notify_one();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(manager.refresh_count(), 1);
        assert!(!manager.is_refreshing());
        assert_eq!(manager.pending_len(), 0);
    }

    #[tokio::test]
    async fn failed_refresh_rejects_all_and_notifies_once() {
        let notifier = Arc::new(CountingNotifier::default());
        let manager = Arc::new(SessionManager::new(notifier.clone()));
        let refresher = Arc::new(GatedRefresher::new(false));

        let mut handles = Vec::new();
        for _ in 0..3 {
            let manager = manager.clone();
            let refresher = refresher.clone();
            handles.push(tokio::spawn(async move {
                manager.handle_unauthorized(refresher.as_ref()).await
            }));
        }

        wait_for_pending(&manager, 2).await;
        refresher.gate.notify_one();

        for handle in handles {
            let err = handle.await.unwrap().unwrap_err();
            assert!(matches!(err, BierzmoError::SessionExpired { .. }), "got {err:?}");
            assert!(err.to_string().contains("refresh token expired"));
        }
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn repeated_failures_notify_once_until_rearmed() {
        let notifier = Arc::new(CountingNotifier::default());
        let manager = SessionManager::new(notifier.clone());
        let refresher = GatedRefresher::new(false);

        for _ in 0..3 {
            refresher.gate.notify_one();
            assert!(manager.handle_unauthorized(&refresher).await.is_err());
        }
        assert_eq!(manager.refresh_count(), 3);
        assert_eq!(notifier.count.load(Ordering::SeqCst), 1);

        manager.mark_authenticated();
        refresher.gate.notify_one();
        assert!(manager.handle_unauthorized(&refresher).await.is_err());
        assert_eq!(notifier.count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dropped_leader_releases_waiters() {
        let manager = Arc::new(SessionManager::default());
        let refresher = Arc::new(GatedRefresher::new(true));

        let leader = {
            let manager = manager.clone();
            let refresher = refresher.clone();
            tokio::spawn(async move { manager.handle_unauthorized(refresher.as_ref()).await })
        };
        // Let the leader claim the in-flight slot.
        while !manager.is_refreshing() {
            tokio::task::yield_now().await;
        }

        let follower = {
            let manager = manager.clone();
            let refresher = refresher.clone();
            tokio::spawn(async move { manager.handle_unauthorized(refresher.as_ref()).await })
        };
        wait_for_pending(&manager, 1).await;

        leader.abort();
        let err = follower.await.unwrap().unwrap_err();
        assert!(err.to_string().contains("abandoned"));
        assert!(!manager.is_refreshing());
    }

    #[tokio::test]
    async fn next_episode_starts_a_fresh_refresh() {
        let manager = SessionManager::default();
        let refresher = GatedRefresher::new(true);

        refresher.gate.notify_one();
        manager.handle_unauthorized(&refresher).await.unwrap();
        refresher.gate.notify_one();
        manager.handle_unauthorized(&refresher).await.unwrap();

        assert_eq!(refresher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn default_notifier_logs_the_expiry() {
        let manager = SessionManager::default();
        let refresher = GatedRefresher::new(false);

        refresher.gate.notify_one();
        assert!(manager.handle_unauthorized(&refresher).await.is_err());
        assert!(logs_contain(SESSION_EXPIRED_MESSAGE));
        assert!(logs_contain("session refresh failed"));
    }
}
