//! A local REPL driving a template menu, for trying the system out
//! without a server in front of it.

use std::sync::Arc;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use waymark_engine::{Subject, SubjectId};
use waymark_foundation::{Context, Error, MenuConfig, Result};
use waymark_template::{CallableMap, callable_fn};

use crate::manager::{MenuManager, MenuSource};

/// A subject that prints straight to stdout.
struct StdoutSubject;

impl Subject for StdoutSubject {
    fn id(&self) -> SubjectId {
        SubjectId(0)
    }

    fn send(&mut self, text: &str) {
        println!("{text}\n");
    }
}

const DEMO_TEMPLATE: &str = r"
## NODE start

You stand at a weathered signpost where three roads meet.

## OPTIONS

    # the numbered option answers to '1' as well as its aliases
    north; n: Take the north road -> north_road
    shout: Shout into the valley -> shout()
    rest: Sit down for a while -> rest(minutes=10)
    leave: Leave the crossroads -> goodbye
    > who am i: identity
    >: start
    > *: confused()

## NODE north_road

The north road climbs into cold hills. After an hour you turn back.

## OPTIONS

    back: start

## NODE identity

A traveler, of course. The signpost offers no further opinion.

## OPTIONS

    >: start

## NODE goodbye

You leave the crossroads behind.
";

fn demo_callables() -> CallableMap {
    let mut callables = CallableMap::new();
    callables.insert(
        "shout".to_string(),
        callable_fn(|subject, _, _| {
            subject.send("Your voice echoes back, thinner each time.");
            Ok(None)
        }),
    );
    callables.insert(
        "rest".to_string(),
        callable_fn(|subject, _, kwargs| {
            let minutes = kwargs.get_int("minutes").unwrap_or(5);
            subject.send(&format!("You rest for {minutes} minutes."));
            Ok(None)
        }),
    );
    callables.insert(
        "confused".to_string(),
        callable_fn(|subject, raw, _| {
            subject.send(&format!("'{}' gets you nowhere.", raw.trim()));
            Ok(None)
        }),
    );
    callables
}

/// Runs the demo menu until the user quits or closes the input stream.
///
/// # Errors
/// Returns an error if the line editor cannot be initialized or a menu
/// transition fails fatally.
pub fn run() -> Result<()> {
    let manager = MenuManager::new().with_exit_handler(Arc::new(|subject, _action| {
        subject.send("You step away from the signpost.");
    }));
    let mut subject = StdoutSubject;

    manager.start(
        &mut subject,
        MenuSource::Template {
            source: DEMO_TEMPLATE.to_string(),
            callables: demo_callables(),
        },
        "start",
        MenuConfig::default(),
        Context::new(),
    )?;

    let mut editor = DefaultEditor::new()
        .map_err(|err| Error::internal(format!("line editor init failed: {err}")))?;

    while manager.has_session(subject.id()) {
        match editor.readline("> ") {
            Ok(line) => manager.deliver_input(&mut subject, &line)?,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                manager.force_close(&mut subject);
            }
            Err(err) => {
                manager.force_close(&mut subject);
                return Err(Error::internal(format!("line editor failed: {err}")));
            }
        }
    }
    Ok(())
}
