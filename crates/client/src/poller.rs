//! Confirmation status poller.
//!
//! After the checkout handshake completes client-side, payment capture is
//! confirmed asynchronously by webhook. This poller watches the booking
//! status on a fixed interval until it reaches a terminal state, a
//! wall-clock cutoff elapses, or the caller cancels (e.g. the status view
//! is closed).

use std::time::Duration;

use gatherly_core::BookingStatus;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::api::types::StatusSnapshot;
use crate::error::ApiError;

/// Poll timing. Defaults match the booking backend's webhook latency
/// envelope: one fetch every 2.5 seconds, give up after 90 seconds.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub cutoff: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2_500),
            cutoff: Duration::from_secs(90),
        }
    }
}

/// How a polling run ended.
#[derive(Debug)]
pub enum PollOutcome {
    /// The booking reached CONFIRMED.
    Confirmed(StatusSnapshot),
    /// The booking reached a terminal state other than CONFIRMED
    /// (CANCELLED, EXPIRED, REFUNDED, FAILED).
    Ended {
        status: BookingStatus,
        snapshot: StatusSnapshot,
    },
    /// The cutoff elapsed with the booking still pending. The booking may
    /// yet confirm server-side; the caller should suggest checking back.
    TimedOut,
    /// A status fetch failed.
    Failed(ApiError),
    /// The caller cancelled via [`Canceller`].
    Cancelled,
}

/// Cancellation handle for an in-flight [`poll_status`] run.
#[derive(Debug, Clone)]
pub struct Canceller(watch::Sender<bool>);

impl Canceller {
    /// Stop the polling run. Idempotent.
    pub fn cancel(&self) {
        let _ = self.0.send(true);
    }
}

/// Create a linked canceller and the receiver [`poll_status`] takes.
#[must_use]
pub fn cancel_pair() -> (Canceller, watch::Receiver<bool>) {
    let (tx, rx) = watch::channel(false);
    (Canceller(tx), rx)
}

/// Poll `fetch` until the booking settles.
///
/// The first fetch happens immediately. A terminal status is sticky: the
/// run ends on the first terminal snapshot and never fetches again. The
/// cutoff is checked against wall-clock time since the run started, so a
/// slow backend cannot extend the run indefinitely. Cancellation is
/// honored both between polls and mid-fetch: cancelling drops any
/// in-flight status request.
#[instrument(skip_all, fields(interval = ?policy.interval, cutoff = ?policy.cutoff))]
pub async fn poll_status<F, Fut>(
    mut fetch: F,
    policy: PollPolicy,
    mut cancel: watch::Receiver<bool>,
) -> PollOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<StatusSnapshot, ApiError>>,
{
    let started = Instant::now();

    loop {
        let snapshot = tokio::select! {
            result = fetch() => match result {
                Ok(snapshot) => snapshot,
                Err(e) => return PollOutcome::Failed(e),
            },
            () = cancelled(&mut cancel) => return PollOutcome::Cancelled,
        };
        debug!(status = %snapshot.status, "status fetched");

        match snapshot.status {
            BookingStatus::Confirmed => return PollOutcome::Confirmed(snapshot),
            status if status.is_terminal() => {
                return PollOutcome::Ended { status, snapshot };
            }
            _ => {}
        }

        if started.elapsed() >= policy.cutoff {
            return PollOutcome::TimedOut;
        }

        tokio::select! {
            () = tokio::time::sleep(policy.interval) => {}
            () = cancelled(&mut cancel) => return PollOutcome::Cancelled,
        }
    }
}

/// Resolves when cancellation is requested. Pends forever if the canceller
/// was dropped without firing, so a dropped handle never aborts the run.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}
