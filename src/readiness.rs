//! Mini-app SDK readiness.
//!
//! The Farcaster SDK is not initialized by this service. Readiness is a
//! two-state value that starts [`Phase::Pending`] and settles exactly once:
//!
//! ```text
//!            complete()                 delay elapsed
//! Pending ──────────────► Ready(Initialized)
//!    │
//!    └──────────────────────────────────► Ready(Disabled)
//! ```
//!
//! The timer path is the degraded one. It reports `isReady: true` together
//! with the advisory [`INTEGRATION_DISABLED`] message; consumers must not
//! treat that message as a blocking error.
//!
//! Consumers read a snapshot with [`Readiness::state`] or follow changes
//! through a `watch` receiver from [`Readiness::subscribe`]. Reading and
//! subscribing never re-arm the timer. Dropping the [`Readiness`] aborts a
//! pending timer, so nothing is published after teardown.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Advisory published when the timer settles readiness.
pub const INTEGRATION_DISABLED: &str = "Farcaster integration temporarily disabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyMode {
    /// A real initialization finished.
    Initialized,
    /// The timer fired first; the integration is inert.
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Ready(ReadyMode),
}

impl Phase {
    pub fn is_ready(&self) -> bool {
        matches!(self, Phase::Ready(_))
    }

    pub fn state(&self) -> ReadinessState {
        match self {
            Phase::Pending => ReadinessState {
                is_ready: false,
                error: None,
            },
            Phase::Ready(ReadyMode::Initialized) => ReadinessState {
                is_ready: true,
                error: None,
            },
            Phase::Ready(ReadyMode::Disabled) => ReadinessState {
                is_ready: true,
                error: Some(INTEGRATION_DISABLED.to_string()),
            },
        }
    }
}

/// What consumers see: `{ "isReady": bool, "error": string | null }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessState {
    pub is_ready: bool,
    pub error: Option<String>,
}

/// A mounted readiness value and its pending timer.
#[derive(Debug)]
pub struct Readiness {
    tx: Arc<watch::Sender<Phase>>,
    timer: Option<JoinHandle<()>>,
}

impl Readiness {
    /// Start pending and schedule the disabled-integration transition after
    /// `delay`. Must be called inside a tokio runtime.
    pub fn mount(delay: Duration) -> Self {
        let (tx, _) = watch::channel(Phase::Pending);
        let tx = Arc::new(tx);

        let timer_tx = Arc::clone(&tx);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if settle(&timer_tx, ReadyMode::Disabled) {
                info!("{INTEGRATION_DISABLED}, reporting ready");
            }
        });

        debug!("Readiness mounted, settling in {delay:?}");
        Self {
            tx,
            timer: Some(timer),
        }
    }

    /// Settle as genuinely initialized. Ignored once already ready.
    ///
    /// Takes `&self` so a handle shared behind `Arc` can complete it. A timer
    /// still pending afterwards finds the phase settled and does nothing.
    pub fn complete(&self) {
        if settle(&self.tx, ReadyMode::Initialized) {
            info!("Integration initialized");
        }
    }

    pub fn phase(&self) -> Phase {
        *self.tx.borrow()
    }

    pub fn state(&self) -> ReadinessState {
        self.phase().state()
    }

    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.tx.subscribe()
    }

    /// Tear down explicitly. Same as dropping.
    pub fn unmount(self) {}
}

impl Drop for Readiness {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// Move `Pending` to `Ready(mode)`. Returns false if already settled.
fn settle(tx: &watch::Sender<Phase>, mode: ReadyMode) -> bool {
    tx.send_if_modified(|phase| {
        if *phase == Phase::Pending {
            *phase = Phase::Ready(mode);
            true
        } else {
            false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Instant, sleep};

    const DELAY: Duration = Duration::from_millis(100);

    #[tokio::test(start_paused = true)]
    async fn starts_pending() {
        let readiness = Readiness::mount(DELAY);
        assert_eq!(
            readiness.state(),
            ReadinessState {
                is_ready: false,
                error: None
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn still_pending_just_before_delay() {
        let readiness = Readiness::mount(DELAY);
        sleep(Duration::from_millis(99)).await;
        assert_eq!(readiness.phase(), Phase::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn settles_disabled_after_delay() {
        let start = Instant::now();
        let readiness = Readiness::mount(DELAY);
        let mut rx = readiness.subscribe();

        rx.changed().await.unwrap();
        assert!(start.elapsed() >= DELAY);
        assert_eq!(*rx.borrow_and_update(), Phase::Ready(ReadyMode::Disabled));
        assert_eq!(
            readiness.state(),
            ReadinessState {
                is_ready: true,
                error: Some(INTEGRATION_DISABLED.to_string()),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn transitions_exactly_once() {
        let readiness = Readiness::mount(DELAY);
        let mut rx = readiness.subscribe();
        rx.changed().await.unwrap();
        rx.borrow_and_update();

        sleep(Duration::from_secs(3600)).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(readiness.phase(), Phase::Ready(ReadyMode::Disabled));
    }

    #[tokio::test(start_paused = true)]
    async fn subscribing_does_not_rearm_timer() {
        let readiness = Readiness::mount(DELAY);
        sleep(Duration::from_millis(60)).await;
        let _late = readiness.subscribe();
        sleep(Duration::from_millis(41)).await;
        assert!(readiness.phase().is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_before_delay_publishes_nothing() {
        let readiness = Readiness::mount(DELAY);
        let rx = readiness.subscribe();

        sleep(Duration::from_millis(50)).await;
        readiness.unmount();
        sleep(Duration::from_millis(500)).await;

        assert_eq!(*rx.borrow(), Phase::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn complete_wins_over_timer() {
        let readiness = Readiness::mount(DELAY);
        let mut rx = readiness.subscribe();
        readiness.complete();
        assert_eq!(
            readiness.state(),
            ReadinessState {
                is_ready: true,
                error: None
            }
        );
        rx.borrow_and_update();

        sleep(Duration::from_millis(500)).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(readiness.phase(), Phase::Ready(ReadyMode::Initialized));
    }

    #[tokio::test(start_paused = true)]
    async fn complete_through_shared_handle() {
        let readiness = Arc::new(Readiness::mount(DELAY));
        let shared = Arc::clone(&readiness);
        tokio::spawn(async move { shared.complete() }).await.unwrap();

        assert_eq!(readiness.phase(), Phase::Ready(ReadyMode::Initialized));
        sleep(Duration::from_millis(500)).await;
        assert_eq!(readiness.state().error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn complete_after_timer_is_ignored() {
        let readiness = Readiness::mount(DELAY);
        sleep(Duration::from_millis(150)).await;
        readiness.complete();
        assert_eq!(readiness.phase(), Phase::Ready(ReadyMode::Disabled));
    }

    #[test]
    fn state_serializes_camel_case() {
        let json = serde_json::to_value(Phase::Pending.state()).unwrap();
        assert_eq!(json, serde_json::json!({ "isReady": false, "error": null }));
    }
}
