use std::collections::BTreeSet;
use std::time::Duration;

use argsense::{Matches, OptionParser, OptionType, ParseError, Schema, Suggester};

fn demo_schema() -> Schema {
    let mut schema = Schema::new("prog");
    schema
        .add_value(1, 1, "path", Some('p'), "file path", false)
        .unwrap()
        .add_value(1, 0, "something", None, "something else", false)
        .unwrap()
        .add_switch(1, 1, "version", Some('v'), ["1", "2", "3"], "file version", true)
        .unwrap()
        .add_flag("foo", None, "foo description")
        .unwrap()
        .add_flag("bar", Some('b'), "bar description")
        .unwrap();
    schema
}

fn argv(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn full_command_line_parses() {
    let schema = demo_schema();
    let mut m = Matches::new();
    let res = OptionParser::new(&schema).parse(
        &argv("prog --path test.txt --something a b c --foo -b"),
        &mut m,
    );
    assert_eq!(res, Ok(()));
    assert_eq!(m.flags().collect::<Vec<_>>(), vec!["bar", "foo"]);
    assert_eq!(m.values("path"), Some(&["test.txt".to_string()][..]));
    assert_eq!(
        m.values("something"),
        Some(&["a".to_string(), "b".to_string(), "c".to_string()][..])
    );
    assert_eq!(schema.check_required_options(&m), Ok(()));
}

#[test]
fn missing_required_option_is_reported_after_parse() {
    let schema = demo_schema();
    let mut m = Matches::new();
    let res = OptionParser::new(&schema).parse(&argv("prog --something a b"), &mut m);
    assert_eq!(res, Ok(()));
    let err = schema.check_required_options(&m).unwrap_err();
    assert_eq!(err.message(), "--path is required");
}

#[test]
fn required_options_follow_display_order() {
    let schema = demo_schema();
    let err = schema.check_required_options(&Matches::new()).unwrap_err();
    assert_eq!(err, ParseError::OptionIsRequired("something".to_string()));
    assert_eq!(
        schema.usage(),
        "usage: prog [--bar] [--foo] --something <something else> --path <file path> [--version <1|2|3>]\n"
    );
}

#[test]
fn misspelled_key_gets_suggestion() {
    let schema = demo_schema();
    let err = OptionParser::new(&schema)
        .parse_matches(&argv("prog --pth test.txt"))
        .unwrap_err();
    assert_eq!(
        err.message(),
        "unknown option specified: '--pth' (did you mean '--path'?)"
    );
}

#[test]
fn key_without_value_reports_missing_param() {
    let schema = demo_schema();
    let err = OptionParser::new(&schema)
        .parse_matches(&argv("prog --path"))
        .unwrap_err();
    assert_eq!(err.message(), "parameter not specified for option '--path'");
}

#[test]
fn switch_rejects_unlisted_value() {
    let schema = demo_schema();
    let err = OptionParser::new(&schema)
        .parse_matches(&argv("prog --version 4 --path x"))
        .unwrap_err();
    assert_eq!(err.message(), "invalid file version: 4 (should be 1, 2 or 3)");
}

#[test]
fn key_without_enough_values_reports_count() {
    let mut schema = Schema::new("prog");
    schema
        .add_value(2, 2, "path", Some('p'), "file path", false)
        .unwrap();
    let err = OptionParser::new(&schema)
        .parse_matches(&argv("prog --path"))
        .unwrap_err();
    assert_eq!(
        err,
        ParseError::NotEnoughValues {
            option: "path".to_string(),
            min: 2,
            given: 0
        }
    );
    assert_eq!(
        err.message(),
        "not enough values given for option 'path' (requires 2, given 0)"
    );
}

#[test]
fn partial_matches_survive_errors() {
    let schema = demo_schema();
    let mut m = Matches::new();
    let res = OptionParser::new(&schema).parse(&argv("prog --foo --path x --nope"), &mut m);
    assert!(matches!(res, Err(ParseError::UnknownOption { .. })));
    assert!(m.has_flag("foo"));
    assert_eq!(m.first("path"), Some("x"));
}

#[test]
fn successful_parse_conforms_to_schema() {
    let schema = demo_schema();
    let m = OptionParser::new(&schema)
        .parse_matches(&argv("prog -v 3 --something x y -p f --something z"))
        .unwrap();
    for (key, values) in m.options() {
        let option = schema.find(key).expect("every recorded key is in the schema");
        assert_ne!(option.option_type(), OptionType::Flag);
        assert!(values.len() >= option.min_values());
        if option.max_values() > 0 {
            assert!(values.len() <= option.max_values());
        }
        for v in values {
            assert!(option.accepts(v));
        }
    }
}

#[test]
fn suggester_scenarios() {
    let suggester = Suggester::new(["gone", "one", "two", "three"]);
    assert_eq!(suggester.one_correction("there").as_deref(), Some("three"));
    assert!(suggester.corrections("there").contains("three"));
    assert_eq!(suggester.corrections("onf"), set(&["gone", "one"]));

    let empty = Suggester::new(Vec::<String>::new());
    assert!(empty.corrections("there").is_empty());
    assert!(empty.one_correction("there").is_none());
}

#[test]
fn suggestion_timeout_is_configurable() {
    let schema = demo_schema();
    let err = OptionParser::new(&schema)
        .with_suggestion_timeout(Duration::from_millis(50))
        .parse_matches(&argv("prog --verison 1"))
        .unwrap_err();
    assert_eq!(
        err,
        ParseError::unknown_option("--verison", Some("version".to_string()))
    );
}
