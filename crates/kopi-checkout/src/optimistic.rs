//! # Optimistic Updates
//!
//! Shows a change before the server confirms it, and undoes it if the
//! server refuses.
//!
//! ```text
//!            apply(next)               confirm(server value)
//!  confirmed ──────────► tentative ─────────────────────────► confirmed'
//!      ▲                     │
//!      └─────── rollback() ──┘   (snapshot restored)
//! ```

/// A value with at most one pending tentative change.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimistic<T> {
    current: T,
    snapshot: Option<T>,
}

impl<T> Optimistic<T> {
    pub fn new(value: T) -> Self {
        Optimistic {
            current: value,
            snapshot: None,
        }
    }

    /// The value to display: tentative if pending, else confirmed.
    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn is_pending(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Shows `next` tentatively.
    ///
    /// Applying again while pending replaces the tentative value but keeps
    /// the original snapshot.
    pub fn apply(&mut self, next: T) {
        let previous = std::mem::replace(&mut self.current, next);
        if self.snapshot.is_none() {
            self.snapshot = Some(previous);
        }
    }

    /// Replaces the tentative value with what the server confirmed.
    pub fn confirm(&mut self, confirmed: T) {
        self.current = confirmed;
        self.snapshot = None;
    }

    /// Keeps the tentative value as confirmed.
    pub fn commit(&mut self) {
        self.snapshot = None;
    }

    /// Restores the value from before the first pending `apply`.
    pub fn rollback(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.current = snapshot;
        }
    }

    pub fn into_inner(self) -> T {
        self.current
    }
}
