//! `web-sys` bindings for the loader core.
//!
//! | Module | Role |
//! |--------|------|
//! | [`dom`] | `Element` adapters for candidates and their content descendant |
//! | [`observer`] | `IntersectionObserver` wrapper feeding a [`crate::session::BatchSink`] |
//! | [`preload`] | Image preloading as the fetch primitive |
//! | [`host`] | Document query, capability detection and the `spawn_local` executor |
//! | [`entry`] | The `LazyLoader` class exported to JS |

pub mod dom;
pub mod entry;
pub mod host;
pub mod observer;
pub mod preload;
