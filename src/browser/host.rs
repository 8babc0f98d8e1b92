//! The browser as a [`Host`]: document query, capability detection, fetch
//! and executor.

use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use wasm_bindgen::JsValue;
use web_sys::{Document, Window};

use super::dom::DomCandidate;
use super::observer::DomObserver;
use super::preload::ImagePreloader;
use crate::config::LoaderConfig;
use crate::loader::Host;
use crate::session::{BatchSink, Runtime};

/// Runs futures on the browser's microtask queue.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

pub struct BrowserHost {
    window: Window,
    document: Document,
}

impl BrowserHost {
    /// Bind to the current window, or `None` outside a document context.
    #[must_use]
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    /// Whether the host exposes `IntersectionObserver`.
    #[must_use]
    pub fn supports_intersection_observer(&self) -> bool {
        js_sys::Reflect::has(&self.window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
    }
}

impl Host for BrowserHost {
    type Candidate = DomCandidate;
    type Observer = DomObserver;

    fn candidates(&self, config: &LoaderConfig) -> Vec<DomCandidate> {
        let collection = self.document.get_elements_by_class_name(&config.classes.lazy);
        // The collection is live; snapshot it before anything mutates classes.
        let elements = (0..collection.length()).filter_map(|index| collection.item(index)).collect();
        DomCandidate::from_query(elements)
    }

    fn observer(&self, config: &LoaderConfig, sink: BatchSink<DomCandidate>) -> Option<DomObserver> {
        if !self.supports_intersection_observer() {
            return None;
        }
        match DomObserver::new(config, sink) {
            Ok(observer) => Some(observer),
            Err(err) => {
                log::warn!("lazyload: IntersectionObserver construction failed: {err:?}");
                None
            }
        }
    }

    fn runtime(&self) -> Runtime {
        Runtime::new(ImagePreloader, BrowserSpawner)
    }
}
