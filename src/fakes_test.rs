//! In-memory host doubles shared by the unit tests.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;

use crate::candidate::{Candidate, CandidateKey, ContentTarget};
use crate::error::FetchError;
use crate::fetch::Fetch;
use crate::visibility::Observer;

// =============================================================
// Candidates
// =============================================================

#[derive(Debug, Default)]
pub struct ContentData {
    pub background: Option<String>,
    pub background_writes: usize,
    pub classes: Vec<String>,
}

#[derive(Debug, Default)]
struct ElementData {
    attributes: HashMap<String, String>,
    classes: BTreeSet<String>,
    content: Option<Rc<RefCell<ContentData>>>,
}

#[derive(Clone, Debug)]
pub struct FakeCandidate {
    key: CandidateKey,
    data: Rc<RefCell<ElementData>>,
}

impl FakeCandidate {
    /// Candidate with a content descendant and an optional `data-src`.
    pub fn new(key: u64, locator: Option<&str>) -> Self {
        let candidate = Self::without_content(key, locator);
        candidate.data.borrow_mut().content = Some(Rc::new(RefCell::new(ContentData::default())));
        candidate
    }

    pub fn without_content(key: u64, locator: Option<&str>) -> Self {
        let mut data = ElementData::default();
        data.classes.insert("js-lazy-image".to_owned());
        if let Some(locator) = locator {
            data.attributes.insert("data-src".to_owned(), locator.to_owned());
        }
        Self { key: CandidateKey(key), data: Rc::new(RefCell::new(data)) }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.data.borrow().classes.contains(class)
    }

    pub fn handled(&self) -> bool {
        self.has_class("js-lazy-image--handled")
    }

    pub fn background(&self) -> Option<String> {
        self.content_data(|c| c.background.clone()).flatten()
    }

    pub fn background_writes(&self) -> usize {
        self.content_data(|c| c.background_writes).unwrap_or(0)
    }

    pub fn content_classes(&self) -> Vec<String> {
        self.content_data(|c| c.classes.clone()).unwrap_or_default()
    }

    fn content_data<T>(&self, f: impl FnOnce(&ContentData) -> T) -> Option<T> {
        let data = self.data.borrow();
        data.content.as_ref().map(|c| f(&c.borrow()))
    }
}

#[derive(Clone, Debug)]
pub struct FakeContent(Rc<RefCell<ContentData>>);

impl ContentTarget for FakeContent {
    fn set_background_image(&self, locator: &str) {
        let mut data = self.0.borrow_mut();
        data.background = Some(format!("url({locator})"));
        data.background_writes += 1;
    }

    fn add_class(&self, class: &str) {
        self.0.borrow_mut().classes.push(class.to_owned());
    }
}

impl Candidate for FakeCandidate {
    type Content = FakeContent;

    fn key(&self) -> CandidateKey {
        self.key
    }

    fn locator(&self, attribute: &str) -> Option<String> {
        self.data.borrow().attributes.get(attribute).cloned()
    }

    fn is_handled(&self, class: &str) -> bool {
        self.has_class(class)
    }

    fn mark_handled(&self, class: &str) {
        self.data.borrow_mut().classes.insert(class.to_owned());
    }

    fn content(&self, class: &str) -> Option<FakeContent> {
        if class != "js-lazy-image-content" {
            return None;
        }
        self.data.borrow().content.clone().map(FakeContent)
    }
}

// =============================================================
// Observer
// =============================================================

/// Ordered record of every call made on any observer sharing the log.
#[derive(Debug, Default)]
pub struct ObserverLog {
    pub events: Vec<String>,
}

impl ObserverLog {
    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.events.iter().filter(|e| e.starts_with(prefix)).count()
    }
}

#[derive(Clone, Debug)]
pub struct FakeObserver {
    pub name: &'static str,
    pub log: Rc<RefCell<ObserverLog>>,
}

impl FakeObserver {
    pub fn new(name: &'static str, log: &Rc<RefCell<ObserverLog>>) -> Self {
        Self { name, log: Rc::clone(log) }
    }
}

impl Observer<FakeCandidate> for FakeObserver {
    fn observe(&mut self, candidate: &FakeCandidate) {
        self.log.borrow_mut().events.push(format!("{}:observe:{}", self.name, candidate.key().0));
    }

    fn unobserve(&mut self, candidate: &FakeCandidate) {
        self.log.borrow_mut().events.push(format!("{}:unobserve:{}", self.name, candidate.key().0));
    }

    fn disconnect(&mut self) {
        self.log.borrow_mut().events.push(format!("{}:disconnect", self.name));
    }
}

// =============================================================
// Fetch
// =============================================================

#[derive(Debug, Default)]
pub struct FetchLog {
    pub requested: Vec<String>,
    pub failing: HashSet<String>,
    pub gated: bool,
    pending: Vec<(String, oneshot::Sender<Result<(), FetchError>>)>,
}

/// Fetch double. Completes on first poll unless gated, in which case each
/// request waits for [`FakeFetch::release`].
#[derive(Clone, Debug, Default)]
pub struct FakeFetch {
    pub log: Rc<RefCell<FetchLog>>,
}

impl FakeFetch {
    pub fn gated() -> Self {
        let fetch = Self::default();
        fetch.log.borrow_mut().gated = true;
        fetch
    }

    pub fn fail(&self, locator: &str) {
        self.log.borrow_mut().failing.insert(locator.to_owned());
    }

    pub fn requested(&self) -> Vec<String> {
        self.log.borrow().requested.clone()
    }

    /// Complete every gated request.
    pub fn release(&self) {
        let pending = std::mem::take(&mut self.log.borrow_mut().pending);
        for (locator, tx) in pending {
            let result = self.result_for(&locator);
            tx.send(result).expect("receiver alive");
        }
    }

    fn result_for(&self, locator: &str) -> Result<(), FetchError> {
        if self.log.borrow().failing.contains(locator) {
            Err(FetchError::Failed { locator: locator.to_owned() })
        } else {
            Ok(())
        }
    }
}

impl Fetch for FakeFetch {
    fn fetch(&self, locator: &str) -> LocalBoxFuture<'static, Result<(), FetchError>> {
        self.log.borrow_mut().requested.push(locator.to_owned());
        if self.log.borrow().gated {
            let (tx, rx) = oneshot::channel();
            self.log.borrow_mut().pending.push((locator.to_owned(), tx));
            return rx
                .map(|result| result.unwrap_or_else(|_| Err(FetchError::Host("cancelled".to_owned()))))
                .boxed_local();
        }
        futures::future::ready(self.result_for(locator)).boxed_local()
    }
}
