// src/patch.rs
//! Flat text patcher: an ordered list of regex substitutions folded over a document.
//!
//! Rules are pure `(text) -> text` steps, so each one can be checked on a fixed
//! string in isolation. Replacements use `regex` syntax (`$1`, `${name}`).

use std::borrow::Cow;

use regex::Regex;

use crate::split::{Result, SplitError};

#[derive(Clone, Debug)]
pub struct Rule {
    pattern: Regex,
    replacement: String,
}

impl Rule {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| SplitError::Pattern {
            pattern: s!(pattern),
            reason: e.to_string(),
        })?;
        Ok(Self { pattern, replacement: s!(replacement) })
    }

    /// Match `needle` literally.
    pub fn literal(needle: &str, replacement: &str) -> Result<Self> {
        // `$` in a literal replacement must not expand capture groups.
        Self::new(&regex::escape(needle), &replacement.replace('$', "$$"))
    }

    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern.replace_all(text, self.replacement.as_str())
    }
}

/// Apply `rules` in order; each rule sees the previous rule's output.
pub fn apply(text: &str, rules: &[Rule]) -> String {
    rules
        .iter()
        .fold(s!(text), |acc, rule| rule.apply(&acc).into_owned())
}
