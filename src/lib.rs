//! Viewport-triggered deferred loading of background images.
//!
//! Candidate elements carry a lazy marker class and a resource locator in a
//! data attribute. A [`session::Session`] subscribes each unhandled candidate
//! to a visibility source, starts the real load once the candidate approaches
//! the viewport, and tears the subscription down when every candidate has
//! been resolved. Hosts without a visibility-detection capability fall back to
//! loading everything immediately.
//!
//! The core is host-agnostic and testable without a browser. The `browser`
//! feature binds it to `web-sys` and exports a `LazyLoader` class to JS.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`loader`] | Owns the current session; re-initialization supersedes it |
//! | [`session`] | Per-batch controller: outstanding count, teardown, resolution |
//! | [`visibility`] | Visibility source abstraction (observed or immediate) |
//! | [`candidate`] | Candidate element traits and the per-candidate state map |
//! | [`identity`] | Candidate key assignment for stamped elements |
//! | [`fetch`] | Fetch primitive abstraction |
//! | [`config`] | Loader configuration, root margin parsing, validation |
//! | [`error`] | Error types |
//! | [`consts`] | Default marker names and operating parameters |
//! | `browser` | `web-sys` adapters and the JS entry point (feature `browser`) |

#[cfg(feature = "browser")]
pub mod browser;
pub mod candidate;
pub mod config;
pub mod consts;
pub mod error;
#[cfg(test)]
#[path = "fakes_test.rs"]
mod fakes;
pub mod fetch;
pub mod identity;
pub mod loader;
pub mod session;
pub mod visibility;
