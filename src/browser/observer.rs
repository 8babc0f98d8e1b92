//! `IntersectionObserver` as the detection capability.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::dom::DomCandidate;
use crate::config::LoaderConfig;
use crate::session::BatchSink;
use crate::visibility::{IntersectionEntry, Observer};

type Callback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// An observer plus the callback it invokes. The closure must outlive the
/// observer's registrations, so dropping disconnects before the closure is
/// freed.
pub struct DomObserver {
    observer: IntersectionObserver,
    _callback: Callback,
}

impl DomObserver {
    /// Create an observer configured from `config` that forwards every
    /// callback batch to `sink`.
    ///
    /// # Errors
    ///
    /// Returns the JS exception if the observer cannot be constructed (for
    /// example an unparsable root margin).
    pub fn new(config: &LoaderConfig, sink: BatchSink<DomCandidate>) -> Result<Self, JsValue> {
        let callback: Callback = Closure::new(move |entries: js_sys::Array, _observer: IntersectionObserver| {
            let batch = entries
                .iter()
                .filter_map(|value| match value.dyn_into::<IntersectionObserverEntry>() {
                    Ok(entry) => Some(IntersectionEntry::new(
                        DomCandidate::from_element(entry.target()),
                        entry.intersection_ratio(),
                    )),
                    Err(_) => None,
                })
                .collect::<Vec<_>>();
            sink.deliver(batch);
        });

        let options = IntersectionObserverInit::new();
        options.set_root_margin(&config.root_margin.to_string());
        options.set_threshold(&JsValue::from_f64(config.threshold));
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        Ok(Self { observer, _callback: callback })
    }
}

impl Observer<DomCandidate> for DomObserver {
    fn observe(&mut self, candidate: &DomCandidate) {
        self.observer.observe(candidate.element());
    }

    fn unobserve(&mut self, candidate: &DomCandidate) {
        self.observer.unobserve(candidate.element());
    }

    fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}

impl Drop for DomObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
