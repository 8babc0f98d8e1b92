//! Candidate elements and their per-session load state.
//!
//! A candidate is a live element owned by the surrounding document. The
//! controller only reads its locator and mutates its classes and the style of
//! its content descendant. The handled class on the element is the durable
//! record that survives session replacement; [`StateMap`] is the controller's
//! own view, keyed by stable element identity.

#[cfg(test)]
#[path = "candidate_test.rs"]
mod candidate_test;

use std::collections::HashMap;

use crate::config::MarkerClasses;

/// Stable identity of a candidate element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateKey(pub u64);

/// The descendant that receives the loaded image.
pub trait ContentTarget {
    /// Use `locator` as the element's background image.
    fn set_background_image(&self, locator: &str);
    fn add_class(&self, class: &str);
}

/// A host element eligible for deferred loading.
pub trait Candidate: Clone + 'static {
    type Content: ContentTarget;

    fn key(&self) -> CandidateKey;

    /// The resource locator stored in `attribute`, if present.
    fn locator(&self, attribute: &str) -> Option<String>;

    fn is_handled(&self, class: &str) -> bool;

    fn mark_handled(&self, class: &str);

    /// First descendant carrying `class`.
    fn content(&self, class: &str) -> Option<Self::Content>;
}

/// Read a candidate's locator, treating an empty attribute as absent.
pub fn locator_of<C: Candidate>(candidate: &C, attribute: &str) -> Option<String> {
    candidate.locator(attribute).filter(|locator| !locator.is_empty())
}

/// Controller-side lifecycle of one candidate.
///
/// `Unhandled -> Subscribed -> Loading -> Handled` with a visibility source
/// that observes, `Unhandled -> Loading -> Handled` with the immediate one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateState {
    Unhandled,
    Subscribed,
    Loading,
    Handled,
}

/// Side mapping from candidate identity to lifecycle state.
#[derive(Debug, Default)]
pub struct StateMap {
    states: HashMap<CandidateKey, CandidateState>,
}

impl StateMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State of `key`; candidates never seen are `Unhandled`.
    #[must_use]
    pub fn get(&self, key: CandidateKey) -> CandidateState {
        self.states.get(&key).copied().unwrap_or(CandidateState::Unhandled)
    }

    pub fn set(&mut self, key: CandidateKey, state: CandidateState) {
        self.states.insert(key, state);
    }
}

/// Outcome of [`apply_presentation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Background and transition class set, candidate marked handled.
    Applied,
    /// Another session got there first; nothing was touched.
    AlreadyHandled,
    /// The candidate has no content descendant; nothing was touched.
    NoContent,
}

/// Apply a loaded resource to a candidate.
///
/// The handled class is checked again here rather than only at subscription
/// time, so two sessions racing on the same element apply it at most once.
pub fn apply_presentation<C: Candidate>(candidate: &C, locator: &str, classes: &MarkerClasses) -> Applied {
    if candidate.is_handled(&classes.handled) {
        return Applied::AlreadyHandled;
    }
    let Some(content) = candidate.content(&classes.content) else {
        return Applied::NoContent;
    };
    candidate.mark_handled(&classes.handled);
    content.set_background_image(locator);
    content.add_class(&classes.transition);
    Applied::Applied
}

/// CSS `url()` value for `locator`, quoted so spaces and parentheses survive.
/// Line breaks become CSS hex escapes; a raw one would end the string.
#[must_use]
pub fn css_url(locator: &str) -> String {
    let mut escaped = String::with_capacity(locator.len() + 2);
    for ch in locator.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\A "),
            '\r' => escaped.push_str("\\D "),
            '\x0c' => escaped.push_str("\\C "),
            _ => escaped.push(ch),
        }
    }
    format!("url(\"{escaped}\")")
}
