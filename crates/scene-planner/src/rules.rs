//! Ordered keyword rule tables.
//!
//! A table is a list of `(keywords, value)` rules evaluated top to bottom;
//! the first rule with any keyword present in the text wins. Tables are plain
//! data so they can be loaded from config and tested apart from the engine.

use serde::{Deserialize, Serialize};

/// Case-insensitive substring test against any keyword.
pub fn contains_any(text: &str, keywords: &[String]) -> bool {
    let text = text.to_lowercase();
    keywords
        .iter()
        .any(|kw| !kw.is_empty() && text.contains(&kw.to_lowercase()))
}

/// One rule: fires when any keyword appears in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule<T> {
    pub keywords: Vec<String>,
    pub value: T,
}

impl<T> KeywordRule<T> {
    /// Creates a rule from string slices.
    pub fn new(keywords: &[&str], value: T) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            value,
        }
    }

    /// Checks whether any keyword appears in the text.
    pub fn matches(&self, text: &str) -> bool {
        contains_any(text, &self.keywords)
    }
}

/// First-match-wins list of keyword rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable<T> {
    rules: Vec<KeywordRule<T>>,
}

impl<T> Default for RuleTable<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> RuleTable<T> {
    /// Creates a table from rules in priority order.
    pub fn new(rules: Vec<KeywordRule<T>>) -> Self {
        Self { rules }
    }

    /// Returns the value of the first matching rule.
    pub fn first_match(&self, text: &str) -> Option<&T> {
        self.rules.iter().find(|r| r.matches(text)).map(|r| &r.value)
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[KeywordRule<T>] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
