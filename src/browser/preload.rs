//! Image preloading: the fetch primitive in the browser.
//!
//! An off-document `<img>` is pointed at the locator; its `load` or `error`
//! event settles the fetch. Once it has loaded, the same locator used as a
//! CSS background is served from the browser's cache.

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::HtmlImageElement;

use crate::error::FetchError;
use crate::fetch::Fetch;

#[derive(Debug, Default, Clone, Copy)]
pub struct ImagePreloader;

impl Fetch for ImagePreloader {
    fn fetch(&self, locator: &str) -> LocalBoxFuture<'static, Result<(), FetchError>> {
        preload(locator.to_owned()).boxed_local()
    }
}

type Settle = Rc<RefCell<Option<oneshot::Sender<bool>>>>;

fn settle_with(settle: &Settle, loaded: bool) -> Closure<dyn FnMut()> {
    let settle = Rc::clone(settle);
    Closure::new(move || {
        if let Some(tx) = settle.borrow_mut().take() {
            if tx.send(loaded).is_err() {
                log::debug!("lazyload: preload settled after its waiter went away");
            }
        }
    })
}

async fn preload(locator: String) -> Result<(), FetchError> {
    let image = HtmlImageElement::new().map_err(|err| FetchError::Host(format!("{err:?}")))?;
    let (tx, rx) = oneshot::channel();
    let settle: Settle = Rc::new(RefCell::new(Some(tx)));
    let on_load = settle_with(&settle, true);
    let on_error = settle_with(&settle, false);

    image.set_onload(Some(on_load.as_ref().unchecked_ref()));
    image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    image.set_src(&locator);

    let outcome = rx.await;
    image.set_onload(None);
    image.set_onerror(None);
    drop((on_load, on_error));

    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => Err(FetchError::Failed { locator }),
        Err(_) => Err(FetchError::Host(format!("preload of {locator} was abandoned"))),
    }
}
