use super::dispatcher::{BatchDispatcher, FlushOutcome};
use crate::sender::Transport;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Shortest tick period; tokio's interval refuses a zero period.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Owns the periodic flush task started by [`BatchDispatcher::start`].
#[derive(Debug)]
pub struct DispatchHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl DispatchHandle {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the task and waits for it to exit. A cycle already in flight is
    /// allowed to finish first.
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(e) = self.task.await {
            error!(error = %e, "Dispatch task ended abnormally");
        }
    }
}

impl<T: Transport + 'static> BatchDispatcher<T> {
    /// Spawns the scheduled task: a flush every `interval`, plus an early
    /// flush whenever [`request_flush`](Self::request_flush) is called.
    pub fn start(self: &Arc<Self>) -> DispatchHandle {
        let token = CancellationToken::new();
        let dispatcher = Arc::clone(self);
        let cancelled = token.clone();
        let task = tokio::spawn(async move { dispatcher.run(cancelled).await });
        DispatchHandle { token, task }
    }

    async fn run(&self, token: CancellationToken) {
        let configured = self.config().interval;
        let period = configured.max(MIN_INTERVAL);
        if period != configured {
            warn!(
                interval_ms = period.as_millis() as u64,
                "Dispatch interval below minimum, clamping"
            );
        }
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            batch_size = self.config().batch_size,
            interval_ms = period.as_millis() as u64,
            enabled = self.config().enabled,
            "Dispatch task started"
        );

        loop {
            tokio::select! {
                biased;
                () = token.cancelled() => break,
                _ = ticker.tick() => {}
                () = self.trigger.notified() => {}
            }

            if let FlushOutcome::Completed(summary) = self.flush().await {
                debug!(?summary, "Scheduled flush completed");
            }
        }

        info!(
            pending = self.buffer().pending_count(),
            "Dispatch task stopped"
        );
    }
}
