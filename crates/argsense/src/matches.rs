use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::option::OptionType;

/// Outcome of a parse: observed flags plus values per option.
///
/// Values keep the argv order they were read in; options are listed in the
/// order they first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Matches {
    flags: BTreeSet<String>,
    options: IndexMap<String, Vec<String>>,
}

impl Matches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.contains(key)
    }

    pub fn has_option(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Whether `key` was seen, looking in flags or options depending on `ty`.
    pub fn exists(&self, ty: OptionType, key: &str) -> bool {
        match ty {
            OptionType::Flag => self.has_flag(key),
            OptionType::Value | OptionType::Switch => self.has_option(key),
        }
    }

    /// All values recorded for `key`.
    pub fn values(&self, key: &str) -> Option<&[String]> {
        self.options.get(key).map(|v| v.as_slice())
    }

    /// The first value recorded for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.options
            .get(key)
            .and_then(|v| v.first().map(|s| s.as_str()))
    }

    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(|s| s.as_str())
    }

    pub fn options(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.options.is_empty()
    }
}

impl Matches {
    pub(crate) fn insert_flag(&mut self, key: &str) {
        self.flags.insert(key.to_string());
    }

    pub(crate) fn push_value(&mut self, key: &str, value: &str) {
        self.options
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }
}
