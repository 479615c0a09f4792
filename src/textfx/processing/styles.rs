//! Style macros
//!
//!     `<style="Title">...</style>` is replaced in place by the style's opening and closing
//!     text, which is then processed like any other source text.

use serde::Deserialize;
use std::collections::HashMap;

/// Opening and closing text substituted for a style tag pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Style {
    pub opening: String,
    pub closing: String,
}

impl Style {
    pub fn new(opening: impl Into<String>, closing: impl Into<String>) -> Self {
        Self {
            opening: opening.into(),
            closing: closing.into(),
        }
    }
}

/// Name -> style lookup.
pub trait StyleLookup {
    fn style(&self, name: &str) -> Option<&Style>;
}

#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: HashMap<String, Style>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, name: impl Into<String>, style: Style) -> Self {
        self.insert(name, style);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, style: Style) {
        self.styles.insert(name.into(), style);
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl StyleLookup for StyleSheet {
    fn style(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }
}

impl FromIterator<(String, Style)> for StyleSheet {
    fn from_iter<I: IntoIterator<Item = (String, Style)>>(iter: I) -> Self {
        Self {
            styles: iter.into_iter().collect(),
        }
    }
}
