//! The viewport load controller for one batch of candidates.
//!
//! A [`Session`] subscribes every unhandled candidate to a visibility source,
//! counts down as candidates become visible, and tears the subscription down
//! once the count reaches zero. Each visible candidate is resolved at most
//! once: its locator is fetched on the host's executor and, on success, the
//! image is applied to its content element.
//!
//! All state lives behind `Rc<RefCell<..>>` and is only touched from the
//! single thread that delivers visibility batches and fetch completions.
//! Borrows are never held across a call that could re-enter the session.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use futures::task::{LocalSpawn, LocalSpawnExt};

use crate::candidate::{Applied, Candidate, CandidateKey, CandidateState, StateMap, apply_presentation, locator_of};
use crate::config::LoaderConfig;
use crate::fetch::Fetch;
use crate::visibility::{IntersectionEntry, VisibilitySource};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle of a session. `Drained` and `Disposed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Subscribed and waiting for visibility batches.
    Active,
    /// Every candidate became visible; the subscription is gone.
    Drained,
    /// Superseded by a newer session before draining.
    Disposed,
}

/// Where resolution work runs: the fetch primitive and the executor its
/// futures are spawned on.
#[derive(Clone)]
pub struct Runtime {
    pub fetch: Rc<dyn Fetch>,
    pub spawner: Rc<dyn LocalSpawn>,
}

impl Runtime {
    #[must_use]
    pub fn new(fetch: impl Fetch + 'static, spawner: impl LocalSpawn + 'static) -> Self {
        Self { fetch: Rc::new(fetch), spawner: Rc::new(spawner) }
    }
}

struct SessionState<C> {
    phase: Phase,
    /// Subscribed candidates that have not been reported visible yet.
    pending: HashSet<CandidateKey>,
    source: Box<dyn VisibilitySource<C>>,
}

struct Shared<C> {
    id: u64,
    state: RefCell<SessionState<C>>,
    states: RefCell<StateMap>,
    config: LoaderConfig,
    runtime: Runtime,
}

/// Handle to a live controller session. Clones share the same session.
pub struct Session<C: Candidate> {
    shared: Rc<Shared<C>>,
}

impl<C: Candidate> Clone for Session<C> {
    fn clone(&self) -> Self {
        Self { shared: Rc::clone(&self.shared) }
    }
}

impl<C: Candidate> Session<C> {
    /// Subscribe `candidates` to `source` and begin counting down.
    ///
    /// Candidates already carrying the handled class are skipped, as are
    /// duplicates. Entries the source reports synchronously (the immediate
    /// fallback) are processed before this returns; their fetches are only
    /// spawned, never awaited.
    pub fn start(
        candidates: Vec<C>,
        source: Box<dyn VisibilitySource<C>>,
        runtime: Runtime,
        config: LoaderConfig,
    ) -> Self {
        let session = Self {
            shared: Rc::new(Shared {
                id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
                state: RefCell::new(SessionState { phase: Phase::Active, pending: HashSet::new(), source }),
                states: RefCell::new(StateMap::new()),
                config,
                runtime,
            }),
        };

        let total = candidates.len();
        let mut immediate = Vec::new();
        {
            let mut state = session.shared.state.borrow_mut();
            let mut states = session.shared.states.borrow_mut();
            let handled_class = &session.shared.config.classes.handled;
            for candidate in candidates {
                let key = candidate.key();
                if candidate.is_handled(handled_class) {
                    states.set(key, CandidateState::Handled);
                    continue;
                }
                if !state.pending.insert(key) {
                    continue;
                }
                if let Some(entry) = state.source.observe(&candidate) {
                    immediate.push(entry);
                } else {
                    states.set(key, CandidateState::Subscribed);
                }
            }
            log::debug!(
                "lazyload session {}: {} of {total} candidates pending, subscribed={}",
                session.shared.id,
                state.pending.len(),
                state.source.is_subscribed()
            );
        }

        session.handle_batch(immediate);
        session
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    /// Number of subscribed candidates not yet reported visible.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.shared.state.borrow().pending.len()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.shared.state.borrow().phase
    }

    /// Whether the session still holds a live host subscription.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.shared.state.borrow().source.is_subscribed()
    }

    #[must_use]
    pub fn state_of(&self, key: CandidateKey) -> CandidateState {
        self.shared.states.borrow().get(key)
    }

    /// Process one visibility callback batch, in the order reported.
    ///
    /// Entries with a negative (or NaN) ratio are discarded, as are entries
    /// for candidates this session is not waiting on. Every other entry
    /// decrements the outstanding count, unsubscribes its candidate and starts
    /// resolving it. The subscription is torn down once nothing is
    /// outstanding. Batches reaching a drained or disposed session are ignored.
    pub fn handle_batch(&self, entries: Vec<IntersectionEntry<C>>) {
        let mut visible = Vec::new();
        let drained = {
            let mut state = self.shared.state.borrow_mut();
            if state.phase != Phase::Active {
                if !entries.is_empty() {
                    log::debug!(
                        "lazyload session {}: ignoring {} entries after {:?}",
                        self.shared.id,
                        entries.len(),
                        state.phase
                    );
                }
                return;
            }
            for entry in entries {
                if entry.ratio.is_nan() || entry.ratio < 0.0 {
                    continue;
                }
                if !state.pending.remove(&entry.candidate.key()) {
                    continue;
                }
                state.source.unobserve(&entry.candidate);
                visible.push(entry.candidate);
            }
            state.pending.is_empty()
        };

        for candidate in visible {
            self.resolve(candidate);
        }

        if drained {
            self.teardown();
        }
    }

    /// Disconnect the subscription and mark the session drained.
    ///
    /// Has no effect unless the session is still active.
    pub fn teardown(&self) {
        let mut state = self.shared.state.borrow_mut();
        if state.phase != Phase::Active {
            return;
        }
        state.phase = Phase::Drained;
        state.source.disconnect();
        log::debug!("lazyload session {}: drained", self.shared.id);
    }

    /// Supersede this session: disconnect its subscription and ignore any
    /// later batches. Fetches already in flight still complete and apply.
    pub fn dispose(&self) {
        let mut state = self.shared.state.borrow_mut();
        if state.phase == Phase::Disposed {
            return;
        }
        state.phase = Phase::Disposed;
        state.source.disconnect();

        let mut states = self.shared.states.borrow_mut();
        for key in state.pending.drain() {
            states.set(key, CandidateState::Unhandled);
        }
        log::debug!("lazyload session {}: disposed", self.shared.id);
    }

    /// Downgrade to a handle that does not keep the session alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakSession<C> {
        WeakSession { shared: Rc::downgrade(&self.shared) }
    }

    /// Start loading one visible candidate.
    fn resolve(&self, candidate: C) {
        let shared = &self.shared;
        let key = candidate.key();
        let Some(locator) = locator_of(&candidate, &shared.config.locator_attribute) else {
            shared.states.borrow_mut().set(key, CandidateState::Unhandled);
            log::debug!("lazyload session {}: candidate {} has no locator", shared.id, key.0);
            return;
        };

        shared.states.borrow_mut().set(key, CandidateState::Loading);
        let pending_fetch = shared.runtime.fetch.fetch(&locator);
        let task_shared = Rc::clone(shared);
        let task_locator = locator.clone();
        let task = async move {
            match pending_fetch.await {
                Ok(()) => task_shared.finish(&candidate, &task_locator),
                Err(err) => {
                    task_shared.states.borrow_mut().set(key, CandidateState::Unhandled);
                    log::warn!("lazyload session {}: {err}", task_shared.id);
                }
            }
        };

        if let Err(err) = shared.runtime.spawner.spawn_local(task) {
            shared.states.borrow_mut().set(key, CandidateState::Unhandled);
            log::warn!("lazyload session {}: could not schedule {locator}: {err}", shared.id);
        }
    }
}

impl<C: Candidate> Shared<C> {
    fn finish(&self, candidate: &C, locator: &str) {
        let key = candidate.key();
        match apply_presentation(candidate, locator, &self.config.classes) {
            Applied::Applied | Applied::AlreadyHandled => {
                self.states.borrow_mut().set(key, CandidateState::Handled);
            }
            Applied::NoContent => {
                self.states.borrow_mut().set(key, CandidateState::Unhandled);
                log::debug!("lazyload session {}: candidate {} has no content element", self.id, key.0);
            }
        }
    }
}

/// Non-owning session handle.
pub struct WeakSession<C: Candidate> {
    shared: Weak<Shared<C>>,
}

impl<C: Candidate> Clone for WeakSession<C> {
    fn clone(&self) -> Self {
        Self { shared: Weak::clone(&self.shared) }
    }
}

impl<C: Candidate> WeakSession<C> {
    #[must_use]
    pub fn upgrade(&self) -> Option<Session<C>> {
        self.shared.upgrade().map(|shared| Session { shared })
    }
}

/// Delivery channel from a host detection callback to a session.
///
/// The host observer has to exist before the session that owns it, so the
/// callback captures a sink that is bound to the session afterwards. The sink
/// holds the session weakly; batches arriving before binding or after the
/// session is gone are dropped.
pub struct BatchSink<C: Candidate> {
    target: Rc<RefCell<Option<WeakSession<C>>>>,
}

impl<C: Candidate> Clone for BatchSink<C> {
    fn clone(&self) -> Self {
        Self { target: Rc::clone(&self.target) }
    }
}

impl<C: Candidate> Default for BatchSink<C> {
    fn default() -> Self {
        Self { target: Rc::new(RefCell::new(None)) }
    }
}

impl<C: Candidate> BatchSink<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, session: &Session<C>) {
        *self.target.borrow_mut() = Some(session.downgrade());
    }

    pub fn deliver(&self, entries: Vec<IntersectionEntry<C>>) {
        let session = self.target.borrow().as_ref().and_then(WeakSession::upgrade);
        match session {
            Some(session) => session.handle_batch(entries),
            None => log::debug!("lazyload: dropping {} entries for unbound sink", entries.len()),
        }
    }
}
