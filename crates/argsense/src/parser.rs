use std::time::Duration;

use crate::error::{ParseError, ParseResult};
use crate::matches::Matches;
use crate::option::{OptionDesc, OptionType};
use crate::schema::Schema;
use crate::suggest::DEFAULT_SEARCH_TIMEOUT;

/// Parses argv against a borrowed [`Schema`].
///
/// Grammar: every key is `-k` or `--key`, followed by the values its option
/// accepts. Values never begin with `-`; a `-` token always starts a new key.
#[derive(Debug, Clone, Copy)]
pub struct OptionParser<'s> {
    schema: &'s Schema,
    suggestion_timeout: Duration,
}

#[derive(Debug, Clone, Copy)]
enum State<'s> {
    Key,
    Value { option: &'s OptionDesc, read: usize },
}

impl<'s> OptionParser<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            suggestion_timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }

    /// Time allowed for the did-you-mean search on an unknown key.
    pub fn with_suggestion_timeout(mut self, timeout: Duration) -> Self {
        self.suggestion_timeout = timeout;
        self
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Parse `argv` into `matches`. `argv[0]` is the program name and is skipped.
    ///
    /// On error, `matches` keeps everything recorded before the failing token.
    /// Required options are not checked here; see
    /// [`Schema::check_required_options`].
    pub fn parse<S: AsRef<str>>(&self, argv: &[S], matches: &mut Matches) -> ParseResult<()> {
        let args: Vec<&str> = argv.iter().skip(1).map(AsRef::as_ref).collect();
        let mut state = State::Key;

        for (i, &token) in args.iter().enumerate() {
            let next = args.get(i + 1).copied();
            let next_is_key = next.is_some_and(is_key_token);

            state = match state {
                State::Key => {
                    let option = self.resolve(token)?;
                    if option.option_type() == OptionType::Flag {
                        tracing::trace!(key = option.key(), "flag");
                        matches.insert_flag(option.key());
                        State::Key
                    } else {
                        tracing::trace!(key = option.key(), "expecting values");
                        State::Value { option, read: 0 }
                    }
                }
                State::Value { option, read } => {
                    if is_key_token(token) {
                        return Err(ParseError::UnexpectedOption(token.to_string()));
                    }
                    let read = read + 1;
                    if !option.accepts(token) {
                        return Err(option.invalid_switch_value(token));
                    }
                    if read < option.min_values() && (next.is_none() || next_is_key) {
                        return Err(ParseError::not_enough_values(
                            option.key(),
                            option.min_values(),
                            read,
                        ));
                    }
                    matches.push_value(option.key(), token);

                    let full = option.max_values() > 0 && read == option.max_values();
                    if full || next_is_key || next.is_none() {
                        State::Key
                    } else {
                        State::Value { option, read }
                    }
                }
            };
        }

        if let State::Value { option, read } = state {
            if option.min_values() > 1 {
                return Err(ParseError::not_enough_values(
                    option.key(),
                    option.min_values(),
                    read,
                ));
            }
            let last = args.last().copied().unwrap_or_default();
            return Err(ParseError::MissingParam(last.to_string()));
        }

        Ok(())
    }

    /// Parse into a fresh [`Matches`], discarding partial results on error.
    pub fn parse_matches<S: AsRef<str>>(&self, argv: &[S]) -> ParseResult<Matches> {
        let mut matches = Matches::new();
        self.parse(argv, &mut matches)?;
        Ok(matches)
    }

    fn resolve(&self, token: &str) -> ParseResult<&'s OptionDesc> {
        let key = strip_key(token)?;
        if let Some(option) = self.schema.find(key) {
            return Ok(option);
        }

        tracing::debug!(token, "unknown option, searching for a suggestion");
        let suggestion = self
            .schema
            .find_suggestion(key, self.suggestion_timeout)
            .map(|option| option.key().to_string());
        Err(ParseError::unknown_option(token, suggestion))
    }
}

fn is_key_token(token: &str) -> bool {
    token.starts_with('-')
}

/// `-k` and `--key` both yield the text after the dashes.
fn strip_key(token: &str) -> ParseResult<&str> {
    let Some(rest) = token.strip_prefix('-') else {
        return Err(ParseError::UnexpectedParameter(token.to_string()));
    };
    Ok(rest.strip_prefix('-').unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        let mut schema = Schema::new("prog");
        schema
            .add_value(1, 1, "path", Some('p'), "file path", false)
            .unwrap()
            .add_value(1, 0, "something", None, "something else", false)
            .unwrap()
            .add_value(2, 3, "pair", None, "two or three", true)
            .unwrap()
            .add_switch(1, 2, "version", Some('v'), ["1", "2", "3"], "file version", true)
            .unwrap()
            .add_flag("foo", None, "foo description")
            .unwrap()
            .add_flag("bar", Some('b'), "bar description")
            .unwrap();
        schema
    }

    fn parse(schema: &Schema, args: &[&str]) -> (Matches, ParseResult<()>) {
        let mut argv = vec!["prog"];
        argv.extend_from_slice(args);
        let mut m = Matches::new();
        let res = OptionParser::new(schema).parse(&argv, &mut m);
        (m, res)
    }

    #[test]
    fn strip_key_accepts_one_or_two_dashes() {
        assert_eq!(strip_key("-p"), Ok("p"));
        assert_eq!(strip_key("--path"), Ok("path"));
        assert_eq!(strip_key("---x"), Ok("-x"));
        assert_eq!(strip_key("-"), Ok(""));
        assert_eq!(
            strip_key("path"),
            Err(ParseError::UnexpectedParameter("path".to_string()))
        );
    }

    #[test]
    fn empty_argv_is_ok() {
        let schema = schema();
        let (m, res) = parse(&schema, &[]);
        assert_eq!(res, Ok(()));
        assert!(m.is_empty());

        let none: [&str; 0] = [];
        assert_eq!(OptionParser::new(&schema).parse_matches(&none), Ok(Matches::new()));
    }

    #[test]
    fn short_and_long_keys_are_equivalent() {
        let schema = schema();
        let (long, _) = parse(&schema, &["--path", "a", "--bar"]);
        let (short, _) = parse(&schema, &["-p", "a", "-b"]);
        let (mixed, _) = parse(&schema, &["--p", "a", "-bar"]);
        assert_eq!(long, short);
        assert_eq!(long, mixed);
    }

    #[test]
    fn bare_value_in_key_position_fails() {
        let schema = schema();
        let (_, res) = parse(&schema, &["stray"]);
        assert_eq!(res, Err(ParseError::UnexpectedParameter("stray".to_string())));

        let (m, res) = parse(&schema, &["--path", "a", "b"]);
        assert_eq!(res, Err(ParseError::UnexpectedParameter("b".to_string())));
        assert_eq!(m.first("path"), Some("a"));
    }

    #[test]
    fn repeated_keys_append() {
        let schema = schema();
        let (m, res) = parse(&schema, &["--path", "a", "--foo", "-p", "b", "--foo"]);
        assert_eq!(res, Ok(()));
        assert_eq!(m.values("path"), Some(&["a".to_string(), "b".to_string()][..]));
        assert_eq!(m.flags().collect::<Vec<_>>(), vec!["foo"]);
    }

    #[test]
    fn unbounded_option_yields_to_next_key() {
        let schema = schema();
        let (m, res) = parse(&schema, &["--something", "a", "b", "c", "--foo"]);
        assert_eq!(res, Ok(()));
        assert_eq!(m.values("something").map(|v| v.len()), Some(3));
        assert!(m.has_flag("foo"));
    }

    #[test]
    fn bounded_option_stops_at_max() {
        let schema = schema();
        let (m, res) = parse(&schema, &["--pair", "a", "b", "c", "d"]);
        assert_eq!(res, Err(ParseError::UnexpectedParameter("d".to_string())));
        assert_eq!(m.values("pair").map(|v| v.len()), Some(3));
    }

    #[test]
    fn bounded_option_yields_once_min_is_met() {
        let schema = schema();
        let (m, res) = parse(&schema, &["--pair", "a", "b", "--foo"]);
        assert_eq!(res, Ok(()));
        assert_eq!(m.values("pair").map(|v| v.len()), Some(2));
    }

    #[test]
    fn too_few_values_before_next_key() {
        let schema = schema();
        let (m, res) = parse(&schema, &["--pair", "a", "--foo"]);
        assert_eq!(res, Err(ParseError::not_enough_values("pair", 2, 1)));
        assert!(!m.has_option("pair"));
        assert!(!m.has_flag("foo"));
    }

    #[test]
    fn key_directly_after_key_is_unexpected() {
        let schema = schema();
        let (_, res) = parse(&schema, &["--path", "--foo"]);
        assert_eq!(res, Err(ParseError::UnexpectedOption("--foo".to_string())));
    }

    #[test]
    fn dangling_key_reports_missing_param() {
        let schema = schema();
        let (_, res) = parse(&schema, &["--foo", "-p"]);
        assert_eq!(res, Err(ParseError::MissingParam("-p".to_string())));
    }

    #[test]
    fn dangling_key_with_min_above_one_reports_count() {
        let schema = schema();
        let (_, res) = parse(&schema, &["--pair"]);
        assert_eq!(res, Err(ParseError::not_enough_values("pair", 2, 0)));
    }

    #[test]
    fn invalid_switch_value_is_not_recorded() {
        let schema = schema();
        let (m, res) = parse(&schema, &["--version", "1", "4"]);
        assert_eq!(
            res.unwrap_err().message(),
            "invalid file version: 4 (should be 1, 2 or 3)"
        );
        assert_eq!(m.values("version"), Some(&["1".to_string()][..]));
    }

    #[test]
    fn unknown_key_carries_suggestion() {
        let schema = schema();
        let (_, res) = parse(&schema, &["--vesion", "1"]);
        assert_eq!(
            res,
            Err(ParseError::unknown_option("--vesion", Some("version".to_string())))
        );

        let (_, res) = parse(&schema, &["-x"]);
        assert_eq!(res, Err(ParseError::unknown_option("-x", None)));
    }

    #[test]
    fn parse_is_deterministic() {
        let schema = schema();
        let args = ["--something", "a", "b", "-v", "2", "3", "--bar", "--path", "x"];
        let first = parse(&schema, &args);
        let second = parse(&schema, &args);
        assert_eq!(first, second);
        assert_eq!(first.1, Ok(()));
    }
}
