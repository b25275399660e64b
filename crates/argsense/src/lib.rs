//! Declarative command-line option parsing with "did you mean" suggestions.
//!
//! A [`Schema`] declares the options a program accepts:
//! - flags, which take no values
//! - value options, which take free-form strings
//! - switches, whose values must come from a fixed set
//!
//! An [`OptionParser`] walks argv against the schema and fills a [`Matches`].
//! When a key is unknown, the closest long name within two edits is attached
//! to the error (see [`suggest::Suggester`]).
//!
//! # Example
//!
//! ```
//! use argsense::{Matches, OptionParser, Schema};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut schema = Schema::new("prog");
//! schema
//!     .add_value(1, 1, "path", Some('p'), "file path", false)?
//!     .add_switch(1, 1, "version", Some('v'), ["1", "2", "3"], "file version", true)?
//!     .add_flag("verbose", None, "print more")?;
//!
//! let argv = ["prog", "-p", "test.txt", "--verbose"];
//! let mut matches = Matches::new();
//! OptionParser::new(&schema).parse(&argv, &mut matches)?;
//! schema.check_required_options(&matches)?;
//!
//! assert_eq!(matches.first("path"), Some("test.txt"));
//! assert!(matches.has_flag("verbose"));
//!
//! let err = OptionParser::new(&schema)
//!     .parse_matches(&["prog", "--pth", "x"])
//!     .unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "unknown option specified: '--pth' (did you mean '--path'?)"
//! );
//! # Ok(()) }
//! ```

mod error;
mod matches;
mod option;
mod parser;
mod schema;
pub mod suggest;

pub use error::{ParseError, ParseResult, SchemaError};
pub use matches::Matches;
pub use option::{OptionDesc, OptionKind, OptionType};
pub use parser::OptionParser;
pub use schema::Schema;
pub use suggest::Suggester;
