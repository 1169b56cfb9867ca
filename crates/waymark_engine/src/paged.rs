//! Paged selection: wrapping a node with auto-generated, paginated
//! numeric options over an externally supplied item list.
//!
//! The wrapped producer keeps its own text and any extra options it
//! returns; the wrapper prepends one numbered option per item on the
//! current page plus `current`/`previous page`/`next page` navigation.
//! Paging state rides in the context-map, so it resets per session.

use std::sync::Arc;

use waymark_foundation::Result;

use crate::goto::{Goto, GotoFn, GotoResult, goto_fn};
use crate::node::{NodeOutput, NodeProducer, OptionRecord, Subject, node_fn};

/// Context key carrying the current page index.
pub const PAGE_INDEX_KEY: &str = "_page_index";

/// Context key the selected item is stored under when the resolver is a
/// node name.
pub const SELECTION_KEY: &str = "selection";

/// Where the full item list comes from.
///
/// Materialized once per node evaluation, so a generator must tolerate
/// being called repeatedly as the user pages around.
#[derive(Clone)]
pub enum ItemSource {
    /// A fixed list.
    Static(Vec<String>),
    /// A generator invoked on every evaluation.
    Generate(Arc<dyn Fn(&mut dyn Subject) -> Vec<String> + Send + Sync>),
}

impl ItemSource {
    fn materialize(&self, subject: &mut dyn Subject) -> Vec<String> {
        match self {
            Self::Static(items) => items.clone(),
            Self::Generate(func) => func(subject),
        }
    }
}

/// Where a selection goes.
#[derive(Clone)]
pub enum SelectionResolver {
    /// Go to the named node with the chosen item stored under
    /// [`SELECTION_KEY`].
    Node(String),
    /// Invoke `(subject, chosen_item, page_items)`; return the next node
    /// name, or `None` to re-run the list node.
    Call(Arc<dyn Fn(&mut dyn Subject, &str, &[String]) -> Result<Option<String>> + Send + Sync>),
}

/// Navigation goto: re-run the list node on another page.
fn page_goto(target: i64) -> GotoFn {
    goto_fn(move |_, _, ctx| Ok(GotoResult::StayWith(ctx.insert(PAGE_INDEX_KEY, target))))
}

/// Selection goto shared by every item option on the page.
///
/// The raw input is the absolute option number, which for item options is
/// the 1-based position within the current page.
fn select_goto(resolver: SelectionResolver, page: Vec<String>) -> GotoFn {
    goto_fn(move |subject, raw, ctx| {
        let choice = raw
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=page.len()).contains(n));
        let Some(choice) = choice else {
            subject.send("Invalid choice.");
            return Ok(GotoResult::Stay);
        };
        let item = &page[choice - 1];
        match &resolver {
            SelectionResolver::Node(name) => Ok(GotoResult::NodeWith(
                name.clone(),
                ctx.insert(SELECTION_KEY, item.as_str()),
            )),
            SelectionResolver::Call(func) => match func(subject, item, &page)? {
                Some(name) => Ok(GotoResult::Node(name)),
                None => Ok(GotoResult::Stay),
            },
        }
    })
}

/// Wraps `inner` with paginated numeric options over `items`.
///
/// Item options come first so their numbers line up with their on-page
/// position; navigation options and then `inner`'s own options follow.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn paged_node(
    items: ItemSource,
    resolver: SelectionResolver,
    page_size: usize,
    inner: NodeProducer,
) -> NodeProducer {
    let page_size = page_size.max(1);
    node_fn(move |subject, raw, ctx| {
        let all = items.materialize(subject);
        let npages = all.len().div_ceil(page_size);
        let page_index = usize::try_from(
            ctx.get_int(PAGE_INDEX_KEY)
                .unwrap_or(0)
                .clamp(0, npages.saturating_sub(1) as i64),
        )
        .unwrap_or(0);
        let page: Vec<String> = all
            .iter()
            .skip(page_index * page_size)
            .take(page_size)
            .cloned()
            .collect();

        let mut options = Vec::with_capacity(page.len() + 3);
        let select = Goto::Call(select_goto(resolver.clone(), page.clone()));
        for item in &page {
            options.push(OptionRecord::auto(item.clone(), select.clone()));
        }

        if npages > 1 {
            let position = format!("({}/{})", page_index + 1, npages);
            options.push(OptionRecord::named(
                ["current", "c"],
                Some(position.as_str()),
                Goto::Call(page_goto(page_index as i64)),
            ));
            if page_index > 0 {
                options.push(OptionRecord::named(
                    ["previous page", "p"],
                    None,
                    Goto::Call(page_goto(page_index as i64 - 1)),
                ));
            }
            if page_index + 1 < npages {
                options.push(OptionRecord::named(
                    ["next page", "n"],
                    None,
                    Goto::Call(page_goto(page_index as i64 + 1)),
                ));
            }
        }

        let inner_output = inner(subject, raw, ctx)?;
        if let Some(extra) = inner_output.options {
            options.extend(extra);
        }

        Ok(NodeOutput {
            text: inner_output.text,
            options: Some(options),
        })
    })
}
