//! Loader configuration: visibility parameters and marker names.
//!
//! All fields are optional in the JSON form and fall back to the defaults in
//! [`crate::consts`]. `from_json` validates after deserializing so a config
//! that reaches a session is always usable.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::fmt;

use serde::Deserialize;

use crate::consts::{
    CONTENT_CLASS, DEFAULT_THRESHOLD, HANDLED_CLASS, LAZY_CLASS, LOCATOR_ATTRIBUTE,
    TRANSITION_CLASS,
};
use crate::error::ConfigError;

/// A single root margin component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::MarginLength(raw.to_owned());
        let (number, make): (&str, fn(f64) -> Self) = if let Some(n) = raw.strip_suffix("px") {
            (n, Self::Px)
        } else if let Some(n) = raw.strip_suffix('%') {
            (n, Self::Percent)
        } else if raw == "0" {
            ("0", Self::Px)
        } else {
            return Err(invalid());
        };
        let value: f64 = number.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        Ok(make(value))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// Margin grown around the viewport before intersections are computed.
///
/// Parsed from CSS margin shorthand: one to four lengths, expanded the same
/// way `margin` expands them.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl RootMargin {
    /// Parse a CSS margin shorthand such as `"50px 0px"`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MarginArity`] for zero or more than four values
    /// and [`ConfigError::MarginLength`] for a component that is not a length.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let parts = raw
            .split_whitespace()
            .map(Length::parse)
            .collect::<Result<Vec<_>, _>>()?;
        let (top, right, bottom, left) = match parts.as_slice() {
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            other => return Err(ConfigError::MarginArity(other.len())),
        };
        Ok(Self { top, right, bottom, left })
    }
}

impl TryFrom<String> for RootMargin {
    type Error = ConfigError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self {
            top: Length::Px(50.0),
            right: Length::Px(0.0),
            bottom: Length::Px(50.0),
            left: Length::Px(0.0),
        }
    }
}

/// Renders the canonical four-value form handed to the detection capability.
impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

/// Class names that mark candidates and their state in the markup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkerClasses {
    /// Selects candidate elements.
    pub lazy: String,
    /// Durable "already resolved" flag on the candidate.
    pub handled: String,
    /// Selects the descendant that receives the image.
    pub content: String,
    /// Added to the content element once the image is applied.
    pub transition: String,
}

impl Default for MarkerClasses {
    fn default() -> Self {
        Self {
            lazy: LAZY_CLASS.to_owned(),
            handled: HANDLED_CLASS.to_owned(),
            content: CONTENT_CLASS.to_owned(),
            transition: TRANSITION_CLASS.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderConfig {
    pub root_margin: RootMargin,
    /// Minimum visible fraction of a candidate that triggers its load.
    pub threshold: f64,
    pub classes: MarkerClasses,
    /// Attribute the resource locator is read from.
    pub locator_attribute: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root_margin: RootMargin::default(),
            threshold: DEFAULT_THRESHOLD,
            classes: MarkerClasses::default(),
            locator_attribute: LOCATOR_ATTRIBUTE.to_owned(),
        }
    }
}

impl LoaderConfig {
    /// Deserialize and validate a JSON config. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the JSON is malformed or fails [`Self::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the threshold range and that every marker name is set.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::Threshold(self.threshold));
        }
        let names = [
            ("lazy class", &self.classes.lazy),
            ("handled class", &self.classes.handled),
            ("content class", &self.classes.content),
            ("transition class", &self.classes.transition),
            ("locator attribute", &self.locator_attribute),
        ];
        for (label, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyName(label));
            }
        }
        Ok(())
    }
}

