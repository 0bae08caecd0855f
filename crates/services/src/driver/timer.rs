use std::time::Duration;

use flash_core::deck::{RevealScheduler, TimerToken};
use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::AbortHandle;

use super::runtime::Command;

/// Delivers auto reveals as commands on the driver's own queue.
///
/// Holds only a weak sender so a pending timer never keeps the driver alive.
pub(crate) struct TokioRevealScheduler {
    commands: WeakUnboundedSender<Command>,
    pending: Option<(TimerToken, AbortHandle)>,
}

impl TokioRevealScheduler {
    pub(crate) fn new(commands: WeakUnboundedSender<Command>) -> Self {
        Self {
            commands,
            pending: None,
        }
    }

    fn abort_pending(&mut self) {
        if let Some((_, handle)) = self.pending.take() {
            handle.abort();
        }
    }
}

impl RevealScheduler for TokioRevealScheduler {
    fn schedule(&mut self, token: TimerToken, delay: Duration) {
        self.abort_pending();
        let commands = self.commands.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = commands.upgrade() {
                let _ = tx.send(Command::RevealFired(token));
            }
        });
        log::debug!("auto reveal {} scheduled in {delay:?}", token.value());
        self.pending = Some((token, handle.abort_handle()));
    }

    fn cancel(&mut self, token: TimerToken) {
        if self.pending.as_ref().is_some_and(|(t, _)| *t == token) {
            self.abort_pending();
            log::debug!("auto reveal {} cancelled", token.value());
        }
    }
}

impl Drop for TokioRevealScheduler {
    fn drop(&mut self) {
        self.abort_pending();
    }
}
