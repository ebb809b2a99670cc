use std::time::{Duration, Instant};

use tracing::trace;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

struct Pending<T> {
    value: T,
    due: Instant,
}

/// A cancellable scheduled delivery of the most recent value.
///
/// Every `schedule` replaces whatever was pending and restarts the quiet interval,
/// so at most one value is ever waiting. The owner drives it by calling `poll`
/// from its event loop.
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn schedule(&mut self, value: T, now: Instant) {
        if self.pending.is_some() {
            trace!("Debounce: superseding pending value");
        }
        self.pending = Some(Pending {
            value,
            due: now + self.delay,
        });
    }

    /// Hands out the pending value once its quiet interval has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if now >= p.due => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Hands out the pending value right away.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Time left until the pending value fires, zero if already due.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline().map(|due| due.saturating_duration_since(now))
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
