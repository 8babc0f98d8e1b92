//! Candidate adapters over live DOM elements.
//!
//! Keys are stamped onto elements; see [`crate::identity`] for how copied
//! stamps are told apart.

use std::sync::atomic::{AtomicU64, Ordering};

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::candidate::{Candidate, CandidateKey, ContentTarget, css_url};
use crate::consts::KEY_ATTRIBUTE;
use crate::identity::{KeyAssignment, assign_keys, parse_stamp};

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

fn next_key() -> u64 {
    NEXT_KEY.fetch_add(1, Ordering::Relaxed)
}

fn stamp_of(element: &Element) -> Option<u64> {
    parse_stamp(element.get_attribute(KEY_ATTRIBUTE).as_deref())
}

#[derive(Debug, Clone)]
pub struct DomCandidate {
    element: Element,
    key: CandidateKey,
}

impl DomCandidate {
    /// Wrap every element of one query, giving each a distinct key.
    #[must_use]
    pub fn from_query(elements: Vec<Element>) -> Vec<Self> {
        let stamps = elements.iter().map(stamp_of).collect::<Vec<_>>();
        let assignments = assign_keys(&stamps, next_key);
        elements
            .into_iter()
            .zip(assignments)
            .map(|(element, assignment)| Self::assigned(element, assignment))
            .collect()
    }

    /// Wrap an element reported by the observer. Observed elements were
    /// stamped by [`DomCandidate::from_query`], so their stamp is their key.
    #[must_use]
    pub fn from_element(element: Element) -> Self {
        let assignment = match stamp_of(&element) {
            Some(stamp) => KeyAssignment::Reuse(CandidateKey(stamp)),
            None => KeyAssignment::Stamp(CandidateKey(next_key())),
        };
        Self::assigned(element, assignment)
    }

    fn assigned(element: Element, assignment: KeyAssignment) -> Self {
        if let KeyAssignment::Stamp(key) = assignment
            && let Err(err) = element.set_attribute(KEY_ATTRIBUTE, &key.0.to_string())
        {
            log::warn!("lazyload: could not stamp candidate key {}: {err:?}", key.0);
        }
        Self { element, key: assignment.key() }
    }

    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }
}

#[derive(Debug, Clone)]
pub struct DomContent(HtmlElement);

impl ContentTarget for DomContent {
    fn set_background_image(&self, locator: &str) {
        if let Err(err) = self.0.style().set_property("background-image", &css_url(locator)) {
            log::warn!("lazyload: could not set background for {locator}: {err:?}");
        }
    }

    fn add_class(&self, class: &str) {
        if let Err(err) = self.0.class_list().add_1(class) {
            log::warn!("lazyload: could not add class {class}: {err:?}");
        }
    }
}

impl Candidate for DomCandidate {
    type Content = DomContent;

    fn key(&self) -> CandidateKey {
        self.key
    }

    fn locator(&self, attribute: &str) -> Option<String> {
        self.element.get_attribute(attribute)
    }

    fn is_handled(&self, class: &str) -> bool {
        self.element.class_list().contains(class)
    }

    fn mark_handled(&self, class: &str) {
        if let Err(err) = self.element.class_list().add_1(class) {
            log::warn!("lazyload: could not mark candidate {} handled: {err:?}", self.key.0);
        }
    }

    fn content(&self, class: &str) -> Option<DomContent> {
        let found = match self.element.query_selector(&format!(".{class}")) {
            Ok(found) => found?,
            Err(err) => {
                log::warn!("lazyload: content query failed for candidate {}: {err:?}", self.key.0);
                return None;
            }
        };
        match found.dyn_into::<HtmlElement>() {
            Ok(content) => Some(DomContent(content)),
            Err(_) => {
                log::debug!("lazyload: content of candidate {} is not an HTML element", self.key.0);
                None
            }
        }
    }
}
