//! Template grammar corner cases.

use waymark_foundation::{ErrorKind, Value};
use waymark_template::{CallableMap, compile_template, parse_literal, scan};

#[test]
fn node_blocks_split_on_markers() {
    let source = "\
## NODE start
First body.
## options
a: start
## NODE second
Second body.
";
    let blocks = scan(source).unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].name, "start");
    assert!(blocks[0].options.is_some());
    assert_eq!(blocks[1].name, "second");
    assert!(blocks[1].options.is_none());
}

#[test]
fn comments_and_blanks_are_dropped_from_options() {
    let source = "\
## NODE start
Body.
## OPTIONS

    # leading-whitespace comment
    a: start

    b: start
";
    let blocks = scan(source).unwrap();
    assert_eq!(blocks[0].options.as_ref().unwrap().len(), 2);
}

#[test]
fn malformed_option_lines_fail_compilation() {
    let source = "\
## NODE start
Body.
## OPTIONS
this line has no separator
";
    let err = compile_template(source, &CallableMap::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TemplateSyntax { line: 4, .. }));
}

#[test]
fn literals_cover_the_closed_set() {
    assert_eq!(parse_literal("17"), Value::Int(17));
    assert_eq!(parse_literal("-2.25"), Value::Float(-2.25));
    assert_eq!(parse_literal("True"), Value::Bool(true));
    assert_eq!(parse_literal("None"), Value::Nil);
    assert_eq!(parse_literal("bareword"), Value::from("bareword"));
    assert_eq!(parse_literal("'quoted words'"), Value::from("quoted words"));
}

#[test]
fn duplicate_node_names_are_fatal() {
    let source = "## NODE a\nx\n## NODE b\ny\n## NODE a\nz\n";
    let err = compile_template(source, &CallableMap::new()).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::DuplicateNode { line: 5, .. }
    ));
}

#[test]
fn unknown_callables_are_fatal() {
    let source = "## NODE a\nx\n## OPTIONS\ngo: vanish()\n";
    let err = compile_template(source, &CallableMap::new()).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnknownGotoCallable { line: 4, .. }
    ));
}
