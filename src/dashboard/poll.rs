//! Background quote polling.
//!
//! The poll loop is a plain future wrapped in [`futures_util::future::abortable`].
//! Cancelling the [`PollHandle`] aborts the future at its next suspension
//! point, so a quote batch still in flight is dropped before it can write to
//! the store.

use futures_util::future::{AbortHandle, Abortable};
use std::future::Future;
use std::time::Duration;

use super::Dashboard;

/// Cancels a running poll loop. Dropping the handle cancels too.
#[derive(Debug)]
pub struct PollHandle {
    abort: AbortHandle,
}

impl PollHandle {
    pub fn cancel(&self) {
        if !self.abort.is_aborted() {
            tracing::info!("Quote polling cancelled");
        }
        self.abort.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

/// The poll loop, to be driven by whatever executor the host uses.
pub type Poller<F> = Abortable<F>;

pub(crate) fn poller(dashboard: Dashboard) -> (Poller<impl Future<Output = ()>>, PollHandle) {
    let interval = dashboard.poll_interval;
    let run = async move {
        tracing::info!(interval_secs = interval.as_secs(), "Quote polling started");
        loop {
            sleep(interval).await;
            if let Err(e) = dashboard.refresh_instruments().await {
                tracing::warn!("Scheduled quote refresh failed: {}", e);
            }
        }
    };
    let (abort, registration) = AbortHandle::new_pair();
    (Abortable::new(run, registration), PollHandle { abort })
}

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}

#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
async fn sleep(duration: Duration) {
    futures_timer::Delay::new(duration).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::Aborted;

    #[tokio::test]
    async fn test_cancel_resolves_aborted() {
        let dashboard = Dashboard::builder()
            .poll_interval(Duration::from_secs(3600))
            .build()
            .unwrap();
        let (poll, handle) = poller(dashboard);
        assert!(!handle.is_cancelled());

        let task = tokio::spawn(poll);
        handle.cancel();
        assert!(handle.is_cancelled());
        assert!(matches!(task.await.unwrap(), Err(Aborted)));
    }

    #[tokio::test]
    async fn test_drop_cancels() {
        let dashboard = Dashboard::builder()
            .poll_interval(Duration::from_secs(3600))
            .build()
            .unwrap();
        let (poll, handle) = poller(dashboard);
        drop(handle);
        assert!(matches!(poll.await, Err(Aborted)));
    }
}
