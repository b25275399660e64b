use std::collections::BTreeSet;

use thiserror::Error;

/// Failure produced while parsing argv against a [`Schema`](crate::Schema).
///
/// Every variant renders to the exact user-facing message through `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A bare value appeared where an option key was expected.
    #[error("unexpected parameter: '{0}'")]
    UnexpectedParameter(String),

    /// A `-` token appeared while an option was still collecting values.
    #[error("unexpected option: '{0}'")]
    UnexpectedOption(String),

    #[error("unknown option specified: '{option}'{}", did_you_mean(.suggestion))]
    UnknownOption {
        option: String,
        suggestion: Option<String>,
    },

    #[error("invalid {desc}: {value} (should be {})", join_alternatives(.allowed))]
    InvalidSwitchValue {
        desc: String,
        value: String,
        allowed: Vec<String>,
    },

    /// argv ended while an option was waiting for its value.
    #[error("parameter not specified for option '{0}'")]
    MissingParam(String),

    #[error("not enough values given for option '{option}' (requires {min}, given {given})")]
    NotEnoughValues {
        option: String,
        min: usize,
        given: usize,
    },

    #[error("--{0} is required")]
    OptionIsRequired(String),
}

impl ParseError {
    pub fn unknown_option(option: impl Into<String>, suggestion: Option<String>) -> Self {
        Self::UnknownOption {
            option: option.into(),
            suggestion,
        }
    }

    pub fn invalid_switch_value(
        desc: impl Into<String>,
        value: impl Into<String>,
        allowed: &BTreeSet<String>,
    ) -> Self {
        Self::InvalidSwitchValue {
            desc: desc.into(),
            value: value.into(),
            allowed: allowed.iter().cloned().collect(),
        }
    }

    pub fn not_enough_values(option: impl Into<String>, min: usize, given: usize) -> Self {
        Self::NotEnoughValues {
            option: option.into(),
            min,
            given,
        }
    }

    /// The rendered, human-readable message.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Contract violations detected while building a [`Schema`](crate::Schema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("option key must not be empty")]
    EmptyKey,

    #[error("option key must not begin with '-': '{0}'")]
    KeyStartsWithDash(String),

    #[error("option '--{0}' is already defined")]
    DuplicateKey(String),

    #[error("short key '-{short}' maps to both '{existing}' and '{key}'")]
    DuplicateShortKey {
        short: char,
        existing: String,
        key: String,
    },

    #[error("short key for '--{0}' must be a printable character other than '-'")]
    InvalidShortKey(String),

    #[error("option '--{key}' requires at least {min} values but accepts at most {max}")]
    InvalidRange { key: String, min: usize, max: usize },

    #[error("switch '--{0}' has no allowed values")]
    EmptyAllowedValues(String),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '--{s}'?)"),
        None => String::new(),
    }
}

/// Join `["a", "b", "c"]` as `a, b or c`.
pub(crate) fn join_alternatives(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}
