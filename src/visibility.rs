//! Visibility sources: how a session learns that a candidate is near the viewport.
//!
//! [`ObservedSource`] wraps the host's detection capability and reports
//! asynchronously through the session's [`crate::session::BatchSink`].
//! [`ImmediateSource`] is the fallback for hosts without the capability: it
//! reports every candidate as visible the moment it is observed, so a session
//! degrades to loading everything at once without a second code path.

#[cfg(test)]
#[path = "visibility_test.rs"]
mod visibility_test;

use crate::consts::IMMEDIATE_RATIO;

/// One reported intersection change.
#[derive(Debug, Clone)]
pub struct IntersectionEntry<C> {
    pub candidate: C,
    /// Visible fraction of the candidate. Negative readings are invalid.
    pub ratio: f64,
}

impl<C> IntersectionEntry<C> {
    #[must_use]
    pub fn new(candidate: C, ratio: f64) -> Self {
        Self { candidate, ratio }
    }
}

/// Host-provided visibility detection capability.
pub trait Observer<C> {
    fn observe(&mut self, candidate: &C);
    fn unobserve(&mut self, candidate: &C);
    /// Stop all observation. Callbacks must not fire afterwards.
    fn disconnect(&mut self);
}

/// What a session subscribes candidates to.
pub trait VisibilitySource<C> {
    /// Start watching `candidate`. An entry returned here is treated exactly
    /// like one delivered later through the batch callback.
    fn observe(&mut self, candidate: &C) -> Option<IntersectionEntry<C>>;

    fn unobserve(&mut self, candidate: &C);

    /// Tear down the subscription. Calling it again is a no-op.
    fn disconnect(&mut self);

    /// Whether a live host subscription exists.
    fn is_subscribed(&self) -> bool;
}

/// Source backed by the host's detection capability.
#[derive(Debug)]
pub struct ObservedSource<O> {
    observer: O,
    connected: bool,
}

impl<O> ObservedSource<O> {
    #[must_use]
    pub fn new(observer: O) -> Self {
        Self { observer, connected: true }
    }
}

impl<C, O: Observer<C>> VisibilitySource<C> for ObservedSource<O> {
    fn observe(&mut self, candidate: &C) -> Option<IntersectionEntry<C>> {
        if self.connected {
            self.observer.observe(candidate);
        }
        None
    }

    fn unobserve(&mut self, candidate: &C) {
        if self.connected {
            self.observer.unobserve(candidate);
        }
    }

    fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        self.connected = false;
        self.observer.disconnect();
    }

    fn is_subscribed(&self) -> bool {
        self.connected
    }
}

/// Fallback source: every candidate is visible as soon as it is observed.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateSource;

impl<C: Clone> VisibilitySource<C> for ImmediateSource {
    fn observe(&mut self, candidate: &C) -> Option<IntersectionEntry<C>> {
        Some(IntersectionEntry::new(candidate.clone(), IMMEDIATE_RATIO))
    }

    fn unobserve(&mut self, _candidate: &C) {}

    fn disconnect(&mut self) {}

    fn is_subscribed(&self) -> bool {
        false
    }
}
