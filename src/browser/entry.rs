//! JS entry point.
//!
//! ```js
//! import init, { LazyLoader } from "./lazyload.js";
//! await init();
//! const loader = new LazyLoader();
//! loader.init();      // after each render that adds candidates
//! ```

use wasm_bindgen::prelude::*;

use super::host::BrowserHost;
use crate::config::LoaderConfig;
use crate::loader::Loader;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::debug!("lazyload: console logger installed");
    }
}

/// Owns the current loading session for the page.
#[wasm_bindgen]
pub struct LazyLoader {
    inner: Loader<BrowserHost>,
}

impl LazyLoader {
    fn build(config: LoaderConfig) -> Result<LazyLoader, JsError> {
        let host = BrowserHost::new().ok_or_else(|| JsError::new("lazyload needs a window with a document"))?;
        Ok(Self { inner: Loader::new(host, config) })
    }
}

#[wasm_bindgen]
impl LazyLoader {
    /// Loader with the default markers, `50px 0px` margin and 1% threshold.
    ///
    /// # Errors
    ///
    /// Fails outside a window with a document.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<LazyLoader, JsError> {
        Self::build(LoaderConfig::default())
    }

    /// Loader configured from a JSON object; missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Fails on invalid config or outside a window with a document.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<LazyLoader, JsError> {
        let config = LoaderConfig::from_json(json).map_err(|err| JsError::new(&err.to_string()))?;
        Self::build(config)
    }

    /// Supersede any previous session and start loading the candidates now
    /// in the document.
    pub fn init(&mut self) {
        let session = self.inner.init();
        log::debug!("lazyload: session {} started with {} outstanding", session.id(), session.outstanding());
    }

    /// Candidates still waiting to become visible in the current session.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.inner.current().map_or(0, |session| session.outstanding())
    }

    /// Stop observing without starting a new session.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }
}
