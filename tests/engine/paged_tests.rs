//! Paged selection driven through a full session.

use std::sync::Arc;

use waymark_engine::{
    BufferSubject, InputOutcome, ItemSource, MenuSession, NodeOutput, NodeRegistry,
    SelectionResolver, node_fn, paged_node,
};
use waymark_foundation::{Context, MenuConfig};

fn paged_registry(item_count: usize, page_size: usize) -> Arc<NodeRegistry> {
    let items = ItemSource::Static((1..=item_count).map(|i| format!("item-{i}")).collect());
    let inner = node_fn(|_, _, _| Ok(NodeOutput::new("Choose an item.", vec![])));
    let mut registry = NodeRegistry::new();
    registry
        .register(
            "list",
            paged_node(items, SelectionResolver::Node("picked".into()), page_size, inner),
        )
        .unwrap();
    registry
        .register(
            "picked",
            node_fn(|_, _, ctx| {
                Ok(NodeOutput::terminal(format!(
                    "You picked {}.",
                    ctx.get_str("selection").unwrap_or("nothing")
                )))
            }),
        )
        .unwrap();
    Arc::new(registry)
}

#[test]
fn first_page_shows_next_but_not_previous() {
    let mut subject = BufferSubject::new(1);
    MenuSession::start(
        &mut subject,
        paged_registry(25, 10),
        "list",
        MenuConfig::default(),
        Context::new(),
    )
    .unwrap();
    let render = subject.last().unwrap();
    assert!(render.contains("next page"));
    assert!(!render.contains("previous page"));
    assert!(render.contains("item-1"));
    assert!(render.contains("item-10"));
    assert!(!render.contains("item-11"));
}

#[test]
fn paging_twice_then_selecting_returns_the_absolute_item() {
    let mut subject = BufferSubject::new(1);
    let (mut session, _) = MenuSession::start(
        &mut subject,
        paged_registry(25, 10),
        "list",
        MenuConfig::default(),
        Context::new(),
    )
    .unwrap();

    session.on_input(&mut subject, "next page").unwrap();
    assert!(subject.last().unwrap().contains("item-11"));
    session.on_input(&mut subject, "n").unwrap();
    let render = subject.last().unwrap();
    assert!(render.contains("item-21"));
    assert!(!render.contains("next page"));

    // Option 1 on page three is the 21st item, not the 1st.
    let outcome = session.on_input(&mut subject, "1").unwrap();
    assert!(matches!(outcome, InputOutcome::Closed { .. }));
    assert_eq!(subject.last(), Some("You picked item-21."));
}

#[test]
fn paging_back_returns_to_the_first_page() {
    let mut subject = BufferSubject::new(1);
    let (mut session, _) = MenuSession::start(
        &mut subject,
        paged_registry(25, 10),
        "list",
        MenuConfig::default(),
        Context::new(),
    )
    .unwrap();
    session.on_input(&mut subject, "n").unwrap();
    session.on_input(&mut subject, "p").unwrap();
    let render = subject.last().unwrap();
    assert!(render.contains("item-1"));
    assert!(!render.contains("previous page"));
}

#[test]
fn out_of_range_number_is_an_invalid_choice() {
    let mut subject = BufferSubject::new(1);
    let (mut session, _) = MenuSession::start(
        &mut subject,
        paged_registry(5, 10),
        "list",
        MenuConfig::default(),
        Context::new(),
    )
    .unwrap();
    // "9" matches no option at all on a 5-item single page.
    session.on_input(&mut subject, "9").unwrap();
    assert!(subject.last().unwrap().contains("Choose an option"));
    assert_eq!(session.node_name(), "list");
}

#[test]
fn selection_callable_decides_the_target() {
    let items = ItemSource::Static(vec!["red".into(), "blue".into()]);
    let resolver = SelectionResolver::Call(Arc::new(|_, item, page| {
        assert_eq!(page.len(), 2);
        Ok(Some(if item == "red" { "warm" } else { "cold" }.to_string()))
    }));
    let inner = node_fn(|_, _, _| Ok(NodeOutput::new("Pick a color.", vec![])));
    let mut registry = NodeRegistry::new();
    registry
        .register("list", paged_node(items, resolver, 10, inner))
        .unwrap();
    registry
        .register("warm", node_fn(|_, _, _| Ok(NodeOutput::terminal("Warm."))))
        .unwrap();
    registry
        .register("cold", node_fn(|_, _, _| Ok(NodeOutput::terminal("Cold."))))
        .unwrap();

    let mut subject = BufferSubject::new(1);
    let (mut session, _) = MenuSession::start(
        &mut subject,
        Arc::new(registry),
        "list",
        MenuConfig::default(),
        Context::new(),
    )
    .unwrap();
    session.on_input(&mut subject, "2").unwrap();
    assert_eq!(subject.last(), Some("Cold."));
}
