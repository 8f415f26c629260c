use super::*;
use crate::ErrorKind;
use facet_testhelpers::test;

fn driver() -> Driver {
    Driver::new(Options::new("user:/tests/toml"), KeySet::new())
}

fn bare(text: &str) -> Event {
    Event::SimpleKey(Scalar::verbatim(ScalarKind::Bare, text).at_line(1))
}

fn value(kind: ScalarKind, text: &str) -> Event {
    Event::Value(Scalar::verbatim(kind, text).at_line(1))
}

fn comment(text: &str) -> Event {
    Event::Comment(Scalar::new(
        ScalarKind::Comment,
        text,
        format!("#{text}"),
        Location::at_line(1),
    ))
}

fn feed(driver: &mut Driver, events: Vec<Event>) {
    for event in events {
        driver.event(event).unwrap();
    }
}

#[test]
fn test_hex_value_keeps_source_spelling() {
    let mut d = driver();
    feed(
        &mut d,
        vec![
            Event::EnterDocument,
            Event::EnterKey,
            bare("a"),
            Event::ExitKey,
            value(ScalarKind::Hex, "0x1A"),
            Event::ExitKeyValue,
            Event::ExitDocument,
        ],
    );
    let keys = d.finish().unwrap();
    insta::assert_snapshot!(keys.dump(), @r##"
    user:/tests/toml/a = "26"
      order: 0
      origvalue: "0x1A"
      type: "unsigned_long_long"
    "##);
}

#[test]
fn test_inline_comment_reaches_emitted_array() {
    let mut d = driver();
    feed(
        &mut d,
        vec![
            Event::EnterDocument,
            Event::EnterKey,
            bare("a"),
            Event::ExitKey,
            Event::EnterArray,
            Event::EnterArrayElement,
            value(ScalarKind::Decimal, "1"),
            Event::ExitArrayElement,
            Event::EnterArrayElement,
            value(ScalarKind::Decimal, "2"),
            Event::ExitArrayElement,
            Event::ExitArray,
            Event::ExitKeyValue,
            comment(" c"),
            Event::ExitInlineCommentAfterPair,
            Event::ExitDocument,
        ],
    );
    let keys = d.finish().unwrap();
    insta::assert_snapshot!(keys.dump(), @r##"
    user:/tests/toml/a
      order: 0
      array: "#1"
      inline: " c"
    user:/tests/toml/a/#0 = "1"
      type: "long_long"
    user:/tests/toml/a/#1 = "2"
      type: "long_long"
    "##);
}

#[test]
fn test_root_frame_is_never_popped() {
    let mut d = driver();
    d.event(Event::EnterDocument).unwrap();
    let err = d.event(Event::ExitKeyValue).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Internal);
    assert_eq!(d.finish().unwrap_err(), err);
}

#[test]
fn test_first_error_latches() {
    let mut d = driver();
    feed(
        &mut d,
        vec![
            Event::EnterDocument,
            Event::EnterKey,
            bare("a"),
            Event::ExitKey,
            value(ScalarKind::Decimal, "1"),
            Event::ExitKeyValue,
        ],
    );
    let appended = d.sink().len();
    assert!(d.sink().get("user:/tests/toml/a").is_some());

    let err = d
        .event(Event::SyntaxError {
            message: "unexpected '='".to_string(),
            location: Location::new(4, 3, 4, 4),
        })
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntactic);
    assert_eq!(err.line(), 4);

    // later events, even broken ones, are ignored
    d.event(Event::ExitKeyValue).unwrap();
    d.event(value(ScalarKind::Bare, "oops")).unwrap();

    // a complete pair after the error never reaches the sink
    feed(
        &mut d,
        vec![
            Event::EnterKey,
            bare("b"),
            Event::ExitKey,
            value(ScalarKind::Decimal, "2"),
            Event::ExitKeyValue,
        ],
    );
    assert_eq!(d.sink().len(), appended);
    assert!(d.sink().get("user:/tests/toml/b").is_none());
    assert!(
        d.sink()
            .lookup(&KeyName::parse("user:/tests/toml/b"))
            .is_none()
    );

    assert_eq!(d.error(), Some(&err));
    assert_eq!(d.finish().unwrap_err(), err);
}

#[test]
fn test_error_location_defaults_to_last_scalar() {
    let mut d = driver();
    feed(
        &mut d,
        vec![
            Event::EnterDocument,
            Event::EnterKey,
            Event::SimpleKey(Scalar::verbatim(ScalarKind::Bare, "a").at_line(7)),
            Event::ExitKey,
        ],
    );
    let err = d
        .event(Event::Value(Scalar::verbatim(ScalarKind::Bare, "b").at_line(7)))
        .unwrap_err();
    assert_eq!(err.to_string(), "semantic error on line 7: Malformed input: Found a bare string value, which is not allowed. Consider adding quotations around the string.");
}

#[test]
fn test_nodes_held_only_while_needed() {
    let mut d = driver();
    assert_eq!(d.live_nodes(), 1);
    feed(
        &mut d,
        vec![
            Event::EnterDocument,
            Event::EnterKey,
            bare("a"),
            Event::ExitKey,
        ],
    );
    assert_eq!(d.live_nodes(), 2);
    feed(
        &mut d,
        vec![value(ScalarKind::Boolean, "true"), Event::ExitKeyValue],
    );
    // `a` stays alive as the previous pair, for an inline comment
    assert_eq!(d.live_nodes(), 2);
    feed(
        &mut d,
        vec![
            Event::EnterKey,
            bare("b"),
            Event::ExitKey,
            value(ScalarKind::Boolean, "false"),
            Event::ExitKeyValue,
        ],
    );
    assert_eq!(d.live_nodes(), 2);
    let keys = d.finish().unwrap();
    assert_eq!(keys.get("user:/tests/toml/a").and_then(Key::string), Some("1"));
    assert_eq!(keys.get("user:/tests/toml/b").and_then(Key::string), Some("0"));
}

#[test]
fn test_document_twice_is_internal() {
    let mut d = driver();
    d.event(Event::EnterDocument).unwrap();
    let err = d.event(Event::EnterDocument).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Internal);
}

#[test]
fn test_comment_event_must_carry_comment() {
    let mut d = driver();
    d.event(Event::EnterDocument).unwrap();
    let err = d
        .event(Event::Comment(Scalar::verbatim(ScalarKind::Basic, "x")))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Internal);
}

#[test]
fn test_array_limit() {
    let mut d = Driver::new(
        Options::new("user:/t").with_max_array_elements(1),
        KeySet::new(),
    );
    feed(
        &mut d,
        vec![
            Event::EnterDocument,
            Event::EnterKey,
            bare("a"),
            Event::ExitKey,
            Event::EnterArray,
            Event::EnterArrayElement,
            value(ScalarKind::Decimal, "1"),
            Event::ExitArrayElement,
        ],
    );
    let err = d.event(Event::EnterArrayElement).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Semantic);
    assert!(err.message.contains("maximum of 1 elements"), "{err}");
}

#[test]
fn test_integer_overflow_cites_source() {
    let mut d = driver();
    feed(
        &mut d,
        vec![
            Event::EnterDocument,
            Event::EnterKey,
            bare("big"),
            Event::ExitKey,
            value(ScalarKind::Decimal, "9_223_372_036_854_775_808"),
        ],
    );
    let err = d.event(Event::ExitKeyValue).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Semantic);
    assert!(err.message.contains("9_223_372_036_854_775_808"), "{err}");
}
