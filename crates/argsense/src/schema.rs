use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use std::time::Duration;

use crate::error::{ParseError, ParseResult, SchemaError};
use crate::matches::Matches;
use crate::option::{OptionDesc, OptionKind, SortKey};
use crate::suggest::Suggester;

/// Registry of the options a program accepts.
///
/// Options are looked up by long name. Usage/help output and required-option
/// checks walk them flags first, then values, then switches, with required
/// options ahead of optional ones and fewer values ahead of more. Single
/// character short names map onto long names.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    program: String,
    options: BTreeMap<String, OptionDesc>,
    order: BTreeSet<SortKey>,
    short_keys: BTreeMap<char, String>,
}

impl Schema {
    /// Create an empty schema. `program` is shown in the usage line (usually argv[0]).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Options in display order.
    pub fn options(&self) -> impl Iterator<Item = &OptionDesc> {
        self.order
            .iter()
            .filter_map(|sort_key| self.options.get(sort_key.key()))
    }

    /// Register a flag (an option that takes no values).
    pub fn add_flag(
        &mut self,
        key: impl Into<String>,
        short: Option<char>,
        desc: impl Into<String>,
    ) -> Result<&mut Self, SchemaError> {
        self.add_option(OptionDesc::flag(key, desc), short)
    }

    /// Register a free-form value option taking `min..=max` values (`max == 0`: unbounded).
    pub fn add_value(
        &mut self,
        min: usize,
        max: usize,
        key: impl Into<String>,
        short: Option<char>,
        desc: impl Into<String>,
        optional: bool,
    ) -> Result<&mut Self, SchemaError> {
        self.add_option(OptionDesc::value(min, max, key, desc, optional), short)
    }

    /// Register an option whose values must come from `allowed`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_switch<I, S>(
        &mut self,
        min: usize,
        max: usize,
        key: impl Into<String>,
        short: Option<char>,
        allowed: I,
        desc: impl Into<String>,
        optional: bool,
    ) -> Result<&mut Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_option(
            OptionDesc::switch(min, max, key, allowed, desc, optional),
            short,
        )
    }

    pub fn add_option(
        &mut self,
        option: OptionDesc,
        short: Option<char>,
    ) -> Result<&mut Self, SchemaError> {
        option.validate()?;
        if self.options.contains_key(option.key()) {
            return Err(SchemaError::DuplicateKey(option.key().to_string()));
        }
        if let Some(c) = short {
            if c == '-' || c.is_whitespace() || c.is_control() {
                return Err(SchemaError::InvalidShortKey(option.key().to_string()));
            }
            if let Some(existing) = self.short_keys.get(&c) {
                return Err(SchemaError::DuplicateShortKey {
                    short: c,
                    existing: existing.clone(),
                    key: option.key().to_string(),
                });
            }
            self.short_keys.insert(c, option.key().to_string());
        }

        tracing::trace!(key = option.key(), ?short, "registered option");
        self.order.insert(option.sort_key());
        self.options.insert(option.key().to_string(), option);
        Ok(self)
    }

    /// Remove an option together with its short name.
    pub fn remove_option(&mut self, key: &str) -> Option<OptionDesc> {
        let removed = self.options.remove(key)?;
        self.order.remove(&removed.sort_key());
        self.short_keys.retain(|_, long| long != key);
        Some(removed)
    }

    /// Resolve a long name, or a short name when `key` is a single character.
    pub fn find(&self, key: &str) -> Option<&OptionDesc> {
        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(long) = self.short_keys.get(&c) {
                return self.options.get(long);
            }
        }
        self.options.get(key)
    }

    /// The short name registered for the long name `key`, if any.
    pub fn short_key(&self, key: &str) -> Option<char> {
        self.short_keys
            .iter()
            .find(|(_, long)| long.as_str() == key)
            .map(|(c, _)| *c)
    }

    /// Find the option whose long name is the closest spelling of `key`.
    pub fn find_suggestion(&self, key: &str, timeout: Duration) -> Option<&OptionDesc> {
        let suggester = Suggester::new(self.options.keys().cloned()).with_timeout(timeout);
        let suggestion = suggester.one_correction(key)?;
        tracing::debug!(key, %suggestion, "found suggestion for unknown option");
        self.options.get(&suggestion)
    }

    /// Check that every non-optional option appears in `matches`.
    ///
    /// Reports the first missing option in display order.
    pub fn check_required_options(&self, matches: &Matches) -> ParseResult<()> {
        for option in self.options() {
            if !option.is_optional() && !matches.exists(option.option_type(), option.key()) {
                return Err(ParseError::OptionIsRequired(option.key().to_string()));
            }
        }
        Ok(())
    }

    /// One-line usage, e.g. `usage: prog --path <file path> [--foo]`.
    pub fn usage(&self) -> String {
        let mut out = format!("usage: {}", self.program);
        for option in self.options() {
            out.push(' ');
            if option.is_optional() {
                out.push('[');
            }
            out.push_str("--");
            out.push_str(option.key());
            match option.kind() {
                OptionKind::Flag => {}
                OptionKind::Value { .. } => {
                    out.push_str(&format!(" <{}>", option.desc()));
                }
                OptionKind::Switch { allowed, .. } => {
                    out.push_str(&format!(" <{}>", join_values(allowed)));
                }
            }
            if option.is_optional() {
                out.push(']');
            }
        }
        out.push('\n');
        out
    }

    /// Usage line, a blank line, then one aligned row per option.
    pub fn help(&self) -> String {
        let rows: Vec<(String, &str)> = self
            .options()
            .map(|option| {
                let mut left = format!("--{}", option.key());
                if let Some(c) = self.short_key(option.key()) {
                    left.push_str(&format!(", -{c}"));
                }
                (left, option.desc())
            })
            .collect();
        let key_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
        let desc_width = rows.iter().map(|(_, d)| d.chars().count()).max().unwrap_or(0);

        let mut out = self.usage();
        out.push('\n');
        for (left, desc) in rows {
            out.push_str(&format!("{left:>key_width$}  {desc:>desc_width$}\n"));
        }
        out
    }

    pub fn write_usage<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.usage().as_bytes())
    }

    pub fn write_help<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.help().as_bytes())
    }

    pub fn print_usage(&self) -> io::Result<()> {
        self.write_usage(&mut io::stdout().lock())
    }

    pub fn print_help(&self) -> io::Result<()> {
        self.write_help(&mut io::stdout().lock())
    }
}

fn join_values(values: &BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join("|")
}
