//! The session table: one menu session per connected subject.
//!
//! Sessions never share mutable state, so different subjects can be
//! served from different threads without coordination beyond this table's
//! lock. Input for one subject is strictly serialized: a line arriving
//! while that subject's previous line is still being processed is queued
//! and drained afterwards, never interleaved. The table lock is not held
//! while node producers or goto-callables run.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};
use waymark_engine::{
    InputOutcome, MenuSession, NodeProducer, NodeRegistry, Subject, SubjectId,
};
use waymark_foundation::{Context, Error, ErrorKind, MenuConfig, Result};
use waymark_template::{CallableMap, compile_template};

use crate::snapshot::MenuSnapshot;

/// Where a menu's node registry comes from.
pub enum MenuSource {
    /// A ready-made registry, shared across sessions.
    Registry(Arc<NodeRegistry>),
    /// A template string compiled with the given callable mapping.
    Template {
        /// The template source text.
        source: String,
        /// Callables referenced by the template's call expressions.
        callables: CallableMap,
    },
    /// A flat list of named producers; underscore-prefixed names are
    /// skipped as private helpers.
    Producers(Vec<(String, NodeProducer)>),
}

/// Follow-up dispatched against the subject after a session closes.
///
/// Receives the configured exit action name. What the name means (a
/// command to execute, usually) is the host's business.
pub type ExitHandler = Arc<dyn Fn(&mut dyn Subject, &str) + Send + Sync>;

struct SessionSlot {
    /// Taken out while an input event is being processed.
    session: Option<MenuSession>,
    queue: VecDeque<String>,
    in_flight: bool,
    snapshot: Option<MenuSnapshot>,
}

/// Owns every active menu session, keyed by subject identity.
#[derive(Default)]
pub struct MenuManager {
    sessions: Mutex<HashMap<SubjectId, SessionSlot>>,
    on_exit: Option<ExitHandler>,
}

impl MenuManager {
    /// Creates an empty manager with no exit handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the handler invoked with a closing session's exit action.
    #[must_use]
    pub fn with_exit_handler(mut self, handler: ExitHandler) -> Self {
        self.on_exit = Some(handler);
        self
    }

    /// Starts a menu for `subject`.
    ///
    /// A session already attached to the subject is dropped first without
    /// firing its exit action. If the start node turns out to be
    /// terminal, the menu displays it and closes immediately; no session
    /// is retained.
    ///
    /// # Errors
    /// Template compilation errors, an unknown start node, and start-node
    /// producer errors all fail the start; no session is created.
    pub fn start(
        &self,
        subject: &mut dyn Subject,
        source: MenuSource,
        startnode: &str,
        config: MenuConfig,
        initial_context: Context,
    ) -> Result<()> {
        let (registry, template_source) = match source {
            MenuSource::Registry(registry) => (registry, None),
            MenuSource::Template { source, callables } => {
                let registry = Arc::new(compile_template(&source, &callables)?);
                (registry, Some(source))
            }
            MenuSource::Producers(producers) => {
                (Arc::new(NodeRegistry::from_producers(producers)), None)
            }
        };

        let snapshot = config.snapshots_enabled().then(|| {
            MenuSnapshot::new(startnode, &config, &initial_context, template_source)
        });

        if self
            .lock_sessions()
            .remove(&subject.id())
            .is_some()
        {
            debug!(subject = %subject.id(), "replacing existing menu session");
        }

        let (session, outcome) =
            MenuSession::start(subject, registry, startnode, config, initial_context)?;

        match outcome {
            InputOutcome::Closed { exit_action } => {
                self.dispatch_exit(subject, exit_action.as_deref());
            }
            InputOutcome::Continue => {
                self.lock_sessions().insert(
                    subject.id(),
                    SessionSlot {
                        session: Some(session),
                        queue: VecDeque::new(),
                        in_flight: false,
                        snapshot,
                    },
                );
            }
        }
        Ok(())
    }

    /// Delivers one line of input for `subject`.
    ///
    /// If the subject's previous input is still in flight the line is
    /// queued and processed by the in-flight call; otherwise this call
    /// drains the queue to completion.
    ///
    /// # Errors
    /// Returns [`ErrorKind::SessionClosed`] if the subject has no active
    /// session. Errors from authored menu logic propagate after the
    /// session is restored to the table, still alive on its current node.
    pub fn deliver_input(&self, subject: &mut dyn Subject, line: &str) -> Result<()> {
        let id = subject.id();
        {
            let mut sessions = self.lock_sessions();
            let slot = sessions
                .get_mut(&id)
                .ok_or_else(|| Error::new(ErrorKind::SessionClosed))?;
            slot.queue.push_back(line.to_string());
            if slot.in_flight {
                return Ok(());
            }
            slot.in_flight = true;
        }

        let result = self.drain(subject, id);
        if let Some(slot) = self.lock_sessions().get_mut(&id) {
            slot.in_flight = false;
        }
        result
    }

    /// Processes queued input for one subject until the queue is empty or
    /// the session closes.
    fn drain(&self, subject: &mut dyn Subject, id: SubjectId) -> Result<()> {
        loop {
            let (mut session, line) = {
                let mut sessions = self.lock_sessions();
                let Some(slot) = sessions.get_mut(&id) else {
                    return Ok(());
                };
                let Some(line) = slot.queue.pop_front() else {
                    return Ok(());
                };
                let Some(session) = slot.session.take() else {
                    return Err(Error::internal("menu session already checked out"));
                };
                (session, line)
            };

            match session.on_input(subject, &line) {
                Ok(InputOutcome::Continue) => {
                    if let Some(slot) = self.lock_sessions().get_mut(&id) {
                        slot.session = Some(session);
                    }
                }
                Ok(InputOutcome::Closed { exit_action }) => {
                    let dropped = {
                        let mut sessions = self.lock_sessions();
                        sessions.remove(&id).map_or(0, |slot| slot.queue.len())
                    };
                    if dropped > 0 {
                        debug!(subject = %id, dropped, "menu closed with queued input");
                    }
                    self.dispatch_exit(subject, exit_action.as_deref());
                    return Ok(());
                }
                Err(err) => {
                    // The session survives authored errors; put it back
                    // so the subject can keep choosing.
                    warn!(subject = %id, error = %err, "menu input failed");
                    if let Some(slot) = self.lock_sessions().get_mut(&id) {
                        slot.session = Some(session);
                    }
                    return Err(err);
                }
            }
        }
    }

    /// Forces the subject's session closed, as an idle-timeout supervisor
    /// may do at any time. Fires the exit action. Returns true if a
    /// session was closed.
    pub fn force_close(&self, subject: &mut dyn Subject) -> bool {
        let slot = self.lock_sessions().remove(&subject.id());
        let Some(mut slot) = slot else {
            return false;
        };
        let exit_action = slot.session.as_mut().and_then(MenuSession::force_close);
        self.dispatch_exit(subject, exit_action.as_deref());
        true
    }

    /// Returns true if the subject has an active session.
    #[must_use]
    pub fn has_session(&self, id: SubjectId) -> bool {
        self.lock_sessions().contains_key(&id)
    }

    /// Number of active sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.lock_sessions().len()
    }

    /// The restart snapshot for one subject, if its session is
    /// persistent.
    #[must_use]
    pub fn snapshot(&self, id: SubjectId) -> Option<MenuSnapshot> {
        self.lock_sessions()
            .get(&id)
            .and_then(|slot| slot.snapshot.clone())
    }

    /// Restart snapshots for every persistent session.
    #[must_use]
    pub fn snapshots(&self) -> Vec<(SubjectId, MenuSnapshot)> {
        self.lock_sessions()
            .iter()
            .filter_map(|(id, slot)| slot.snapshot.clone().map(|snap| (*id, snap)))
            .collect()
    }

    /// Restarts a menu from a snapshot against a freshly supplied source.
    ///
    /// Only the configuration and the originally supplied context
    /// survive; the session starts over at its start node.
    ///
    /// # Errors
    /// Same contract as [`MenuManager::start`].
    pub fn restore(
        &self,
        subject: &mut dyn Subject,
        snapshot: &MenuSnapshot,
        source: MenuSource,
    ) -> Result<()> {
        self.start(
            subject,
            source,
            &snapshot.startnode,
            snapshot.config.clone(),
            snapshot.context.clone(),
        )
    }

    /// Restarts a template-based menu from a snapshot carrying its own
    /// template source.
    ///
    /// # Errors
    /// Returns an internal error if the snapshot has no template; then
    /// the [`MenuManager::start`] contract.
    pub fn restore_from_template(
        &self,
        subject: &mut dyn Subject,
        snapshot: &MenuSnapshot,
        callables: CallableMap,
    ) -> Result<()> {
        let Some(template) = snapshot.template.clone() else {
            return Err(Error::internal("snapshot carries no template source"));
        };
        self.restore(
            subject,
            snapshot,
            MenuSource::Template {
                source: template,
                callables,
            },
        )
    }

    fn dispatch_exit(&self, subject: &mut dyn Subject, action: Option<&str>) {
        if let (Some(handler), Some(action)) = (&self.on_exit, action) {
            handler(subject, action);
        }
    }

    fn lock_sessions(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<SubjectId, SessionSlot>> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
