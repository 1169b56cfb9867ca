//! Menu session walks through multi-node graphs.

use std::sync::Arc;

use waymark_engine::{
    BufferSubject, Goto, GotoResult, InputOutcome, MenuSession, MenuState, NodeOutput,
    NodeRegistry, OptionRecord, goto_fn, node_fn,
};
use waymark_foundation::{Context, MenuConfig, MergeMode};

/// A three-node graph: start -> middle -> end, with a context counter
/// incremented by a goto-callable on each hop.
fn hop_registry() -> Arc<NodeRegistry> {
    let hop = |target: &'static str| {
        Goto::Call(goto_fn(move |_, _, ctx| {
            let hops = ctx.get_int("hops").unwrap_or(0) + 1;
            Ok(GotoResult::NodeWith(
                target.to_string(),
                ctx.insert("hops", hops),
            ))
        }))
    };
    let mut registry = NodeRegistry::new();
    registry
        .register("start", {
            let goto = hop("middle");
            node_fn(move |_, _, _| {
                Ok(NodeOutput::new(
                    "At the start.",
                    vec![OptionRecord::named(["on"], None, goto.clone())],
                ))
            })
        })
        .unwrap();
    registry
        .register("middle", {
            let goto = hop("end");
            node_fn(move |_, _, ctx| {
                Ok(NodeOutput::new(
                    format!("Middle, hops={}.", ctx.get_int("hops").unwrap_or(0)),
                    vec![OptionRecord::named(["on"], None, goto.clone())],
                ))
            })
        })
        .unwrap();
    registry
        .register(
            "end",
            node_fn(|_, _, ctx| {
                Ok(NodeOutput::terminal(format!(
                    "Done after {} hops.",
                    ctx.get_int("hops").unwrap_or(0)
                )))
            }),
        )
        .unwrap();
    Arc::new(registry)
}

#[test]
fn context_threads_across_transitions() {
    let mut subject = BufferSubject::new(1);
    let (mut session, _) = MenuSession::start(
        &mut subject,
        hop_registry(),
        "start",
        MenuConfig::default().with_merge_mode(MergeMode::Union),
        Context::new(),
    )
    .unwrap();

    session.on_input(&mut subject, "on").unwrap();
    assert!(subject.last().unwrap().contains("Middle, hops=1."));

    let outcome = session.on_input(&mut subject, "on").unwrap();
    assert!(matches!(outcome, InputOutcome::Closed { .. }));
    assert_eq!(subject.last(), Some("Done after 2 hops."));
}

#[test]
fn start_input_reaches_the_start_node() {
    let mut registry = NodeRegistry::new();
    registry
        .register(
            "start",
            node_fn(|_, raw, _| {
                Ok(NodeOutput::new(
                    format!("You arrived via '{raw}'."),
                    vec![OptionRecord::named(["ok"], None, Goto::Node("start".into()))],
                ))
            }),
        )
        .unwrap();
    let mut subject = BufferSubject::new(1);
    MenuSession::start(
        &mut subject,
        Arc::new(registry),
        "start",
        MenuConfig::default().with_start_input("teleport"),
        Context::new(),
    )
    .unwrap();
    assert!(subject.last().unwrap().contains("You arrived via 'teleport'."));
}

#[test]
fn repeated_stay_never_advances() {
    let mut registry = NodeRegistry::new();
    registry
        .register(
            "loop",
            node_fn(|_, _, _| {
                Ok(NodeOutput::new(
                    "Looping.",
                    vec![OptionRecord::named(
                        ["again"],
                        None,
                        Goto::Call(goto_fn(|_, _, _| Ok(GotoResult::Stay))),
                    )],
                ))
            }),
        )
        .unwrap();
    registry
        .register("other", node_fn(|_, _, _| Ok(NodeOutput::terminal("?"))))
        .unwrap();
    let mut subject = BufferSubject::new(1);
    let (mut session, _) = MenuSession::start(
        &mut subject,
        Arc::new(registry),
        "loop",
        MenuConfig::default(),
        Context::new(),
    )
    .unwrap();
    for _ in 0..10 {
        let outcome = session.on_input(&mut subject, "again").unwrap();
        assert_eq!(outcome, InputOutcome::Continue);
        assert_eq!(session.node_name(), "loop");
        assert_eq!(session.state(), MenuState::Active);
    }
}

#[test]
fn single_option_record_walks_to_terminal() {
    let mut registry = NodeRegistry::new();
    registry
        .register(
            "start",
            node_fn(|_, _, _| {
                Ok(NodeOutput::new(
                    "One way out.",
                    vec![OptionRecord::auto("Leave", Goto::Node("end".into()))],
                ))
            }),
        )
        .unwrap();
    registry
        .register("end", node_fn(|_, _, _| Ok(NodeOutput::terminal("Out."))))
        .unwrap();
    let mut subject = BufferSubject::new(1);
    let (mut session, _) = MenuSession::start(
        &mut subject,
        Arc::new(registry),
        "start",
        MenuConfig::default(),
        Context::new(),
    )
    .unwrap();
    let outcome = session.on_input(&mut subject, "1").unwrap();
    assert!(matches!(outcome, InputOutcome::Closed { .. }));
}

#[test]
fn exit_action_can_be_cleared() {
    let mut registry = NodeRegistry::new();
    registry
        .register("start", node_fn(|_, _, _| Ok(NodeOutput::terminal("Bye."))))
        .unwrap();
    let mut subject = BufferSubject::new(1);
    let (_, outcome) = MenuSession::start(
        &mut subject,
        Arc::new(registry),
        "start",
        MenuConfig::default().with_exit_action(None),
        Context::new(),
    )
    .unwrap();
    assert_eq!(outcome, InputOutcome::Closed { exit_action: None });
}
