//! Fetch primitive: retrieve a resource so it can be displayed.
//!
//! The session only awaits the result. Futures run on whatever single-threaded
//! executor the host hands the session as a [`futures::task::LocalSpawn`].

use futures::future::LocalBoxFuture;

use crate::error::FetchError;

pub trait Fetch {
    /// Resolve once `locator` is retrievable for display.
    fn fetch(&self, locator: &str) -> LocalBoxFuture<'static, Result<(), FetchError>>;
}
