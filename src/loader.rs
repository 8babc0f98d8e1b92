//! Owner of the current session.
//!
//! Re-initializing a [`Loader`] disposes the previous session before the new
//! one subscribes anything, so two overlapping subscriptions never watch the
//! same document. The loader value is the only place the current session is
//! recorded; whoever owns the loader owns the supersession contract.

#[cfg(test)]
#[path = "loader_test.rs"]
mod loader_test;

use crate::candidate::Candidate;
use crate::config::LoaderConfig;
use crate::session::{BatchSink, Runtime, Session};
use crate::visibility::{ImmediateSource, ObservedSource, Observer, VisibilitySource};

/// The environment a loader runs in: markup query, detection capability,
/// fetch primitive and executor.
pub trait Host {
    type Candidate: Candidate;
    type Observer: Observer<Self::Candidate> + 'static;

    /// Every element currently carrying the lazy class.
    fn candidates(&self, config: &LoaderConfig) -> Vec<Self::Candidate>;

    /// Build a detection observer whose callback feeds `sink`, or `None` when
    /// the host has no detection capability.
    fn observer(&self, config: &LoaderConfig, sink: BatchSink<Self::Candidate>) -> Option<Self::Observer>;

    fn runtime(&self) -> Runtime;
}

pub struct Loader<H: Host> {
    host: H,
    config: LoaderConfig,
    current: Option<Session<H::Candidate>>,
}

impl<H: Host> Loader<H> {
    #[must_use]
    pub fn new(host: H, config: LoaderConfig) -> Self {
        Self { host, config, current: None }
    }

    /// Supersede the current session (if any) and start a new one over the
    /// candidates present right now.
    pub fn init(&mut self) -> &Session<H::Candidate> {
        self.dispose();

        let sink = BatchSink::new();
        let source: Box<dyn VisibilitySource<H::Candidate>> = match self.host.observer(&self.config, sink.clone()) {
            Some(observer) => Box::new(ObservedSource::new(observer)),
            None => {
                log::info!("lazyload: visibility detection unavailable, loading all candidates now");
                Box::new(ImmediateSource)
            }
        };
        let candidates = self.host.candidates(&self.config);
        let session = Session::start(candidates, source, self.host.runtime(), self.config.clone());
        sink.bind(&session);
        self.current.insert(session)
    }

    /// Dispose the current session without starting another.
    pub fn dispose(&mut self) {
        if let Some(previous) = self.current.take() {
            previous.dispose();
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Session<H::Candidate>> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<H: Host> Drop for Loader<H> {
    fn drop(&mut self) {
        self.dispose();
    }
}
