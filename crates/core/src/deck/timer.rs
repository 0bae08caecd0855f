use std::fmt;
use std::time::Duration;

/// Identifies one scheduled auto reveal.
///
/// Tokens are never reused within a timer, so a fire carrying an old token
/// can always be told apart from the one currently pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Host-side delivery of delayed reveals.
///
/// Implementations arrange for `DeckEngine::fire_reveal(token)` to be called
/// after `delay` on the same execution context that mutates the engine.
pub trait RevealScheduler: Send {
    fn schedule(&mut self, token: TimerToken, delay: Duration);

    /// Best-effort stop of a scheduled delivery. A fire that still arrives
    /// afterwards is rejected by the token check.
    fn cancel(&mut self, token: TimerToken);
}

/// Scheduler that delivers nothing; the owner fires pending tokens by hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualScheduler;

impl RevealScheduler for ManualScheduler {
    fn schedule(&mut self, _token: TimerToken, _delay: Duration) {}

    fn cancel(&mut self, _token: TimerToken) {}
}

/// Single-shot, cancelable auto reveal. At most one token is pending at a time.
pub struct RevealTimer {
    backend: Box<dyn RevealScheduler>,
    pending: Option<TimerToken>,
    next: u64,
}

impl RevealTimer {
    #[must_use]
    pub fn new(backend: Box<dyn RevealScheduler>) -> Self {
        Self {
            backend,
            pending: None,
            next: 0,
        }
    }

    /// Timer with no host delivery; see [`ManualScheduler`].
    #[must_use]
    pub fn manual() -> Self {
        Self::new(Box::new(ManualScheduler))
    }

    /// Cancel whatever is pending and start a new countdown.
    pub fn schedule(&mut self, delay: Duration) -> TimerToken {
        self.cancel();
        let token = TimerToken(self.next);
        self.next = self.next.wrapping_add(1);
        self.pending = Some(token);
        self.backend.schedule(token, delay);
        token
    }

    /// No-op when nothing is pending.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            self.backend.cancel(token);
        }
    }

    #[must_use]
    pub fn pending(&self) -> Option<TimerToken> {
        self.pending
    }

    /// Consume the pending token if `token` is it.
    ///
    /// Returns false for stale or already-consumed tokens.
    pub fn take_if_pending(&mut self, token: TimerToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

impl fmt::Debug for RevealTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealTimer")
            .field("pending", &self.pending)
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}
