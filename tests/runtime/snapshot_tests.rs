//! Restart snapshots round-tripped through the manager.

use waymark_engine::{BufferSubject, Subject};
use waymark_foundation::{Context, MenuConfig};
use waymark_runtime::{MenuManager, MenuSnapshot, MenuSource};
use waymark_template::CallableMap;

const TEMPLATE: &str = "\
## NODE start
Welcome back.
## OPTIONS
onward: middle
## NODE middle
Midway.
## OPTIONS
done: end
## NODE end
Finished.
";

fn template_source() -> MenuSource {
    MenuSource::Template {
        source: TEMPLATE.to_string(),
        callables: CallableMap::new(),
    }
}

#[test]
fn snapshot_survives_serialization_and_restores() {
    let manager = MenuManager::new();
    let mut subject = BufferSubject::new(1);
    manager
        .start(
            &mut subject,
            template_source(),
            "start",
            MenuConfig::default().with_persistent(true),
            Context::new().insert("character", "ada"),
        )
        .unwrap();

    // Mid-session context mutations must not leak into the snapshot.
    manager.deliver_input(&mut subject, "onward").unwrap();
    let snapshot = manager.snapshot(subject.id()).unwrap();
    assert_eq!(snapshot.startnode, "start");
    assert_eq!(snapshot.context.get_str("character"), Some("ada"));

    // Simulate a restart: bytes out, process gone, bytes back in.
    let bytes = snapshot.to_bytes().unwrap();
    drop(manager);
    let restored = MenuSnapshot::from_bytes(&bytes).unwrap();

    let manager = MenuManager::new();
    let mut subject = BufferSubject::new(1);
    manager
        .restore_from_template(&mut subject, &restored, CallableMap::new())
        .unwrap();
    // The session replays from the start node, not from "middle".
    assert!(subject.last().unwrap().contains("Welcome back."));
    assert!(manager.has_session(subject.id()));
}

#[test]
fn non_persistent_sessions_have_no_snapshot() {
    let manager = MenuManager::new();
    let mut subject = BufferSubject::new(1);
    manager
        .start(
            &mut subject,
            template_source(),
            "start",
            MenuConfig::default(),
            Context::new(),
        )
        .unwrap();
    assert!(manager.snapshot(subject.id()).is_none());
}

#[test]
fn debug_mode_disables_snapshots() {
    let manager = MenuManager::new();
    let mut subject = BufferSubject::new(1);
    manager
        .start(
            &mut subject,
            template_source(),
            "start",
            MenuConfig::default().with_persistent(true).with_debug(true),
            Context::new(),
        )
        .unwrap();
    assert!(manager.snapshot(subject.id()).is_none());
}

#[test]
fn restore_with_explicit_source_reuses_config() {
    let manager = MenuManager::new();
    let mut subject = BufferSubject::new(1);
    let config = MenuConfig::default()
        .with_persistent(true)
        .with_start_input("returning");
    manager
        .start(
            &mut subject,
            template_source(),
            "start",
            config,
            Context::new(),
        )
        .unwrap();
    let snapshot = manager.snapshot(subject.id()).unwrap();
    assert_eq!(snapshot.config.start_input, "returning");

    let mut fresh = BufferSubject::new(2);
    manager
        .restore(&mut fresh, &snapshot, template_source())
        .unwrap();
    assert!(manager.has_session(fresh.id()));
}
