//! Compiled templates driven through live menu sessions.

use std::sync::Arc;

use waymark_engine::{BufferSubject, InputOutcome, MenuSession, MenuState};
use waymark_foundation::{Context, MenuConfig, Value};
use waymark_template::{CallableMap, callable_fn, compile_template};

fn session_for(
    source: &str,
    callables: &CallableMap,
    subject: &mut BufferSubject,
) -> (MenuSession, InputOutcome) {
    let registry = Arc::new(compile_template(source, callables).unwrap());
    MenuSession::start(
        subject,
        registry,
        "start",
        MenuConfig::default(),
        Context::new(),
    )
    .unwrap()
}

#[test]
fn aliases_from_template_resolve_case_insensitively() {
    let source = "\
## NODE start
Pick.
## OPTIONS
next; n: Go to node Two -> node2
## NODE node2
You made it.
";
    for input in ["next", "n", "NEXT"] {
        let mut subject = BufferSubject::new(1);
        let (mut session, _) = session_for(source, &CallableMap::new(), &mut subject);
        let outcome = session.on_input(&mut subject, input).unwrap();
        assert!(
            matches!(outcome, InputOutcome::Closed { .. }),
            "input {input:?}"
        );
        assert_eq!(subject.last(), Some("You made it."), "input {input:?}");
    }
}

#[test]
fn pattern_lines_route_by_glob_then_regex() {
    let source = "\
## NODE start
Say something.
## OPTIONS
>: node2
> [0-9]+: countnode
> *: node3
## NODE node2
Empty.
## NODE countnode
Counted.
## NODE node3
Anything.
";
    for (input, expected) in [("", "Empty."), ("42", "Counted."), ("hello", "Anything.")] {
        let mut subject = BufferSubject::new(1);
        let (mut session, _) = session_for(source, &CallableMap::new(), &mut subject);
        session.on_input(&mut subject, input).unwrap();
        assert_eq!(subject.last(), Some(expected), "input {input:?}");
    }
}

#[test]
fn terminal_template_node_closes_the_session() {
    let source = "\
## NODE start
Done already.
";
    let mut subject = BufferSubject::new(1);
    let (session, outcome) = session_for(source, &CallableMap::new(), &mut subject);
    assert!(matches!(outcome, InputOutcome::Closed { .. }));
    assert_eq!(session.state(), MenuState::Closed);
    assert_eq!(subject.last(), Some("Done already."));
}

#[test]
fn callable_kwargs_arrive_as_parsed_literals() {
    let source = "\
## NODE start
Pick.
## OPTIONS
go: travel(distance=12, mode='on foot', fast=True)
## NODE camp
Camped.
";
    let mut callables = CallableMap::new();
    callables.insert(
        "travel".to_string(),
        callable_fn(|_, _, kwargs| {
            assert_eq!(kwargs.get_int("distance"), Some(12));
            assert_eq!(kwargs.get_str("mode"), Some("on foot"));
            assert_eq!(kwargs.get("fast"), Some(&Value::Bool(true)));
            Ok(Some("camp".to_string()))
        }),
    );
    let mut subject = BufferSubject::new(1);
    let (mut session, _) = session_for(source, &callables, &mut subject);
    session.on_input(&mut subject, "go").unwrap();
    assert_eq!(subject.last(), Some("Camped."));
}

#[test]
fn callable_returning_none_reruns_the_node() {
    let source = "\
## NODE start
Still here.
## OPTIONS
wait: linger()
";
    let mut callables = CallableMap::new();
    callables.insert(
        "linger".to_string(),
        callable_fn(|_, _, _| Ok(None)),
    );
    let mut subject = BufferSubject::new(1);
    let (mut session, _) = session_for(source, &callables, &mut subject);
    for _ in 0..3 {
        let outcome = session.on_input(&mut subject, "wait").unwrap();
        assert_eq!(outcome, InputOutcome::Continue);
        assert_eq!(session.node_name(), "start");
    }
}

#[test]
fn auto_numbered_template_options() {
    let source = "\
## NODE start
Pick by number.
## OPTIONS
: First -> one
: Second -> two
## NODE one
Got one.
## NODE two
Got two.
";
    let mut subject = BufferSubject::new(1);
    let (mut session, _) = session_for(source, &CallableMap::new(), &mut subject);
    let render = subject.sent.first().unwrap();
    assert!(render.contains("1: First"));
    assert!(render.contains("2: Second"));
    session.on_input(&mut subject, "2").unwrap();
    assert_eq!(subject.last(), Some("Got two."));
}

#[test]
fn template_default_key_catches_everything_else() {
    let source = "\
## NODE start
Anything else leaves.
## OPTIONS
stay: start
_default: out
## NODE out
Gone.
";
    let mut subject = BufferSubject::new(1);
    let (mut session, _) = session_for(source, &CallableMap::new(), &mut subject);
    session.on_input(&mut subject, "stay").unwrap();
    assert_eq!(session.state(), MenuState::Active);
    session.on_input(&mut subject, "wander off").unwrap();
    assert_eq!(subject.last(), Some("Gone."));
}

#[test]
fn one_registry_serves_many_sessions() {
    let source = "\
## NODE start
Shared.
## OPTIONS
done: end
## NODE end
Over.
";
    let registry = Arc::new(compile_template(source, &CallableMap::new()).unwrap());
    let mut first = BufferSubject::new(1);
    let mut second = BufferSubject::new(2);
    let (mut s1, _) = MenuSession::start(
        &mut first,
        registry.clone(),
        "start",
        MenuConfig::default(),
        Context::new(),
    )
    .unwrap();
    let (mut s2, _) = MenuSession::start(
        &mut second,
        registry,
        "start",
        MenuConfig::default(),
        Context::new(),
    )
    .unwrap();
    s1.on_input(&mut first, "done").unwrap();
    // The second session is untouched by the first one's transition.
    assert_eq!(s2.state(), MenuState::Active);
    s2.on_input(&mut second, "done").unwrap();
    assert_eq!(s2.state(), MenuState::Closed);
}
