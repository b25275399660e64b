use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{ParseError, SchemaError};

/// The three shapes an option can take, without their data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionType {
    Flag,
    Value,
    Switch,
}

/// What an option accepts after its key.
///
/// `max == 0` means the option takes any number of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OptionKind {
    Flag,
    Value {
        min: usize,
        max: usize,
    },
    Switch {
        min: usize,
        max: usize,
        allowed: BTreeSet<String>,
    },
}

/// Ordering of schema entries. Long keys are unique within a schema, so
/// the key settles every tie.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct SortKey {
    option_type: OptionType,
    optional: bool,
    min: usize,
    max: usize,
    key: String,
}

impl SortKey {
    pub(crate) fn key(&self) -> &str {
        &self.key
    }
}

/// Schema entry for a single option, keyed by its long name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionDesc {
    key: String,
    #[serde(flatten)]
    kind: OptionKind,
    optional: bool,
    desc: String,
}

impl OptionDesc {
    /// A flag. Flags are always optional.
    pub fn flag(key: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: OptionKind::Flag,
            optional: true,
            desc: desc.into(),
        }
    }

    pub fn value(
        min: usize,
        max: usize,
        key: impl Into<String>,
        desc: impl Into<String>,
        optional: bool,
    ) -> Self {
        Self {
            key: key.into(),
            kind: OptionKind::Value { min, max },
            optional,
            desc: desc.into(),
        }
    }

    pub fn switch<I, S>(
        min: usize,
        max: usize,
        key: impl Into<String>,
        allowed: I,
        desc: impl Into<String>,
        optional: bool,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            kind: OptionKind::Switch {
                min,
                max,
                allowed: allowed.into_iter().map(Into::into).collect(),
            },
            optional,
            desc: desc.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> &OptionKind {
        &self.kind
    }

    pub fn option_type(&self) -> OptionType {
        match self.kind {
            OptionKind::Flag => OptionType::Flag,
            OptionKind::Value { .. } => OptionType::Value,
            OptionKind::Switch { .. } => OptionType::Switch,
        }
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn min_values(&self) -> usize {
        match self.kind {
            OptionKind::Flag => 0,
            OptionKind::Value { min, .. } | OptionKind::Switch { min, .. } => min,
        }
    }

    /// Upper bound on values; `0` means unbounded.
    pub fn max_values(&self) -> usize {
        match self.kind {
            OptionKind::Flag => 0,
            OptionKind::Value { max, .. } | OptionKind::Switch { max, .. } => max,
        }
    }

    /// Permitted values for a switch; `None` for every other kind.
    pub fn allowed_values(&self) -> Option<&BTreeSet<String>> {
        match &self.kind {
            OptionKind::Switch { allowed, .. } => Some(allowed),
            _ => None,
        }
    }

    /// Whether `value` may be recorded for this option.
    ///
    /// Only switches restrict their values, and only by exact match.
    pub fn accepts(&self, value: &str) -> bool {
        match &self.kind {
            OptionKind::Switch { allowed, .. } => allowed.contains(value),
            _ => true,
        }
    }

    /// Position of this option in usage, help and required checks: kind
    /// first, then required before optional, then value counts, then key.
    pub(crate) fn sort_key(&self) -> SortKey {
        SortKey {
            option_type: self.option_type(),
            optional: self.optional,
            min: self.min_values(),
            max: self.max_values(),
            key: self.key.clone(),
        }
    }

    pub(crate) fn invalid_switch_value(&self, value: &str) -> ParseError {
        let allowed = self.allowed_values().cloned().unwrap_or_default();
        ParseError::invalid_switch_value(&self.desc, value, &allowed)
    }

    pub(crate) fn validate(&self) -> Result<(), SchemaError> {
        if self.key.is_empty() {
            return Err(SchemaError::EmptyKey);
        }
        if self.key.starts_with('-') {
            return Err(SchemaError::KeyStartsWithDash(self.key.clone()));
        }
        let (min, max) = (self.min_values(), self.max_values());
        if max > 0 && min > max {
            return Err(SchemaError::InvalidRange {
                key: self.key.clone(),
                min,
                max,
            });
        }
        if let OptionKind::Switch { allowed, .. } = &self.kind {
            if allowed.is_empty() {
                return Err(SchemaError::EmptyAllowedValues(self.key.clone()));
            }
        }
        Ok(())
    }
}
