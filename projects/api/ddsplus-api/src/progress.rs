//! Progress reporting and cooperative cancellation.
//!
//! The encode pipeline calls [`ProgressSink::report`] once per finished level and polls
//! [`ProgressSink::is_cancelled`] before the first level, after every row of blocks and
//! after every level.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};

/// What the encoder should do after a progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressAction {
    /// Keep going.
    #[default]
    Continue,
    /// Stop before the next level.
    Cancel,
}

/// How a save ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Every level was written.
    Completed,
    /// The save was cancelled. The output holds the header and a whole number of levels.
    Cancelled,
}

/// Receives progress updates from a save.
pub trait ProgressSink {
    /// Called after each level is written, with the percentage of the output written so far.
    ///
    /// Values never decrease, and the last report is exactly `100.0`.
    fn report(&mut self, percent: f64) -> ProgressAction;

    /// Polled between levels and block rows. Returning `true` stops the save once the
    /// current level has been written.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Ignores progress and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    #[inline]
    fn report(&mut self, _percent: f64) -> ProgressAction {
        ProgressAction::Continue
    }
}

/// A callback receiving the percentage, returning `true` to continue and `false` to cancel.
impl<F: FnMut(f64) -> bool> ProgressSink for F {
    #[inline]
    fn report(&mut self, percent: f64) -> ProgressAction {
        if self(percent) {
            ProgressAction::Continue
        } else {
            ProgressAction::Cancel
        }
    }
}

/// A cancellation flag that can be shared with, and set from, other threads.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl ProgressSink for CancellationToken {
    #[inline]
    fn report(&mut self, _percent: f64) -> ProgressAction {
        if CancellationToken::is_cancelled(self) {
            ProgressAction::Cancel
        } else {
            ProgressAction::Continue
        }
    }

    #[inline]
    fn is_cancelled(&self) -> bool {
        CancellationToken::is_cancelled(self)
    }
}

/// Forwards progress to `sink` while also honouring a [`CancellationToken`].
#[derive(Debug, Clone)]
pub struct CancellableProgress<P> {
    sink: P,
    token: CancellationToken,
}

impl<P: ProgressSink> CancellableProgress<P> {
    /// Combines `sink` with `token`.
    pub fn new(sink: P, token: CancellationToken) -> Self {
        Self { sink, token }
    }
}

impl<P: ProgressSink> ProgressSink for CancellableProgress<P> {
    fn report(&mut self, percent: f64) -> ProgressAction {
        match self.sink.report(percent) {
            ProgressAction::Continue if !self.token.is_cancelled() => ProgressAction::Continue,
            _ => ProgressAction::Cancel,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.sink.is_cancelled()
    }
}
