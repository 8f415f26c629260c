use facet_testhelpers::test;
use tomlkeys_driver::{ErrorKind, Event, Options, read, read_file};
use tomlkeys_scalar::Location;
use tomlkeys_testhelpers::{Replay, Script, Val};
use tomlkeys_tree::{Key, KeyName, KeySet, KeySink};

fn existing() -> KeySet {
    let mut sink = KeySet::new();
    let mut key = Key::new(KeyName::parse("user:/other/kept"));
    key.set_string("yes");
    sink.append(key);
    sink
}

#[test]
fn test_read_merges_on_success() {
    let mut sink = existing();
    read(
        Options::new("user:/app"),
        Script::new().pair("a", Val::int("1")).events(),
        &mut sink,
    )
    .unwrap();
    assert_eq!(sink.len(), 2);
    assert_eq!(sink.get("user:/app/a").and_then(Key::string), Some("1"));
}

#[test]
fn test_read_leaves_sink_untouched_on_error() {
    let mut sink = existing();
    let before = sink.clone();
    let err = read(
        Options::new("user:/app"),
        Script::new()
            .pair("a", Val::int("1"))
            .pair("b", Val::bare("nope"))
            .events(),
        &mut sink,
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Semantic);
    assert_eq!(sink, before);
}

#[test]
fn test_read_file_missing() {
    let mut sink = KeySet::new();
    let path = std::env::temp_dir().join("tomlkeys-driver-does-not-exist.toml");
    let err = read_file(
        &path,
        Options::default(),
        &mut Replay::new(Vec::new()),
        &mut sink,
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Resource);
    assert!(err.message.contains("tomlkeys-driver-does-not-exist.toml"), "{err}");
    assert!(sink.is_empty());
}

#[test]
fn test_read_file_runs_grammar() {
    let path = std::env::temp_dir().join(format!("tomlkeys-driver-{}.toml", std::process::id()));
    std::fs::write(&path, "name = \"x\"\n").unwrap();

    let mut grammar = Replay::new(Script::new().pair("name", Val::basic("x")).events());
    let mut sink = KeySet::new();
    let result = read_file(&path, Options::new("user:/file"), &mut grammar, &mut sink);
    std::fs::remove_file(&path).unwrap();

    result.unwrap();
    assert_eq!(sink.get("user:/file/name").and_then(Key::string), Some("x"));
}

#[test]
fn test_read_file_reports_grammar_error() {
    let path = std::env::temp_dir().join(format!("tomlkeys-driver-err-{}.toml", std::process::id()));
    std::fs::write(&path, "name = \n").unwrap();

    let mut grammar = Replay::new(vec![
        Event::EnterDocument,
        Event::SyntaxError {
            message: "expected a value".into(),
            location: Location::new(1, 8, 1, 8),
        },
    ]);
    let mut sink = KeySet::new();
    let result = read_file(&path, Options::default(), &mut grammar, &mut sink);
    let source = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let err = result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntactic);
    assert_eq!(err.line(), 1);
    let report = String::from_utf8(strip_ansi_escapes::strip(err.render("doc.toml", &source))).unwrap();
    assert!(report.contains("syntax error"), "{report}");
    assert!(report.contains("expected a value"), "{report}");
    assert!(sink.is_empty());
}
