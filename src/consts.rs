//! Default marker names and operating parameters.

// ── Markup ──────────────────────────────────────────────────────

/// Class carried by every deferred-load candidate.
pub const LAZY_CLASS: &str = "js-lazy-image";

/// Class recorded on a candidate once its resource has been applied.
pub const HANDLED_CLASS: &str = "js-lazy-image--handled";

/// Class of the descendant that receives the background image.
pub const CONTENT_CLASS: &str = "js-lazy-image-content";

/// Transition class added to the content element after the image is applied.
pub const TRANSITION_CLASS: &str = "fade-in";

/// Data attribute holding the resource locator.
pub const LOCATOR_ATTRIBUTE: &str = "data-src";

/// Data attribute used to stamp a stable identity onto candidate elements.
pub const KEY_ATTRIBUTE: &str = "data-lazy-key";

// ── Visibility ──────────────────────────────────────────────────

/// Pre-trigger margin: 50px above and below the viewport, none sideways.
pub const DEFAULT_ROOT_MARGIN: &str = "50px 0px";

/// Fraction of the candidate that must be visible to trigger its load (1%).
pub const DEFAULT_THRESHOLD: f64 = 0.01;

/// Ratio reported by the immediate source for every candidate.
pub const IMMEDIATE_RATIO: f64 = 1.0;
