//! Coalescing of bursty browser events.
//!
//! Both types only keep state; the caller owns the timer. The scroll path arms
//! a single-shot timeout whenever [`Throttle::offer`] returns `true` and calls
//! [`Throttle::fire`] from it. The resize path arms a timeout for every
//! [`Debounce::offer`] and hands the returned ticket back to [`Debounce::fire`].

/// Trailing-edge throttle: while a run is armed, new events only replace the
/// pending value; the armed run applies the latest one.
#[derive(Debug)]
pub struct Throttle<T> {
    armed: bool,
    pending: Option<T>,
}

impl<T> Default for Throttle<T> {
    fn default() -> Self {
        Self { armed: false, pending: None }
    }
}

impl<T> Throttle<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value`. Returns `true` when the caller has to arm the timer.
    pub fn offer(&mut self, value: T) -> bool {
        self.pending = Some(value);
        if self.armed {
            false
        } else {
            self.armed = true;
            true
        }
    }

    /// Timer callback. Disarms and yields the most recent value.
    pub fn fire(&mut self) -> Option<T> {
        self.armed = false;
        self.pending.take()
    }
}

/// Trailing-edge debounce: only the last event of a burst is applied, once
/// the burst has been quiet for the full delay.
#[derive(Debug)]
pub struct Debounce<T> {
    ticket: u64,
    pending: Option<T>,
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self { ticket: 0, pending: None }
    }
}

impl<T> Debounce<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` and returns the ticket the caller's timer must present.
    pub fn offer(&mut self, value: T) -> u64 {
        self.ticket += 1;
        self.pending = Some(value);
        self.ticket
    }

    /// Yields the value only for the newest ticket; stale timers get `None`.
    pub fn fire(&mut self, ticket: u64) -> Option<T> {
        if ticket == self.ticket {
            self.pending.take()
        } else {
            None
        }
    }
}
