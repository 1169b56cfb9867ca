//! The per-subject menu session state machine.
//!
//! A session lives in one of three states: `Active` (a node is displayed
//! and waiting for input), `Terminal` (the current node returned no
//! options; display then exit), and `Closed` (torn down). Each input event
//! runs matcher, goto resolution, and node evaluation to completion before
//! the session accepts anything else.

use std::sync::Arc;

use tracing::{debug, warn};
use waymark_foundation::{Context, Error, ErrorKind, MenuConfig, Result};

use crate::format::{DefaultFormatter, MenuFormatter};
use crate::goto::{Transition, resolve_goto};
use crate::matcher::CompiledOptions;
use crate::node::Subject;
use crate::registry::NodeRegistry;

/// Notice shown when input matches nothing on the current node.
const NOTICE_NO_MATCH: &str = "Choose an option or try 'help'.";

/// Notice shown when a goto-callable produced an unusable transition.
const NOTICE_BAD_TRANSITION: &str =
    "Error in menu transition. Make another choice or try 'help'.";

fn notice_node_missing(name: &str) -> String {
    format!(
        "Menu node '{name}' is either not implemented or caused an error. \
         Make another choice or try 'q' to abort."
    )
}

fn notice_node_error(name: &str) -> String {
    format!("Error in menu node '{name}'.")
}

/// Lifecycle states of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    /// A node is displayed; the session is waiting for input.
    Active,
    /// The current node returned no options; exiting.
    Terminal,
    /// Torn down. No further input is accepted.
    Closed,
}

/// What one input event did to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// The session is still active (transitioned, re-ran, or recovered
    /// from a matching failure).
    Continue,
    /// The session closed. The supervising layer should run the exit
    /// action, if one is configured.
    Closed {
        /// Follow-up action name from the session configuration.
        exit_action: Option<String>,
    },
}

/// Whether entering a node left the session open or ended it.
enum EnterOutcome {
    Open,
    Terminal,
}

/// One running menu session.
pub struct MenuSession {
    registry: Arc<NodeRegistry>,
    config: MenuConfig,
    formatter: Box<dyn MenuFormatter + Send + Sync>,
    state: MenuState,
    node_name: String,
    context: Context,
    compiled: CompiledOptions,
    help_text: String,
    last_render: String,
}

impl MenuSession {
    /// Starts a session and evaluates the start node once.
    ///
    /// The start node is fed `config.start_input` as its raw input, so it
    /// can branch on caller-supplied text as if a previous node had been
    /// answered.
    ///
    /// # Errors
    /// Returns [`ErrorKind::UnknownNode`] if `startnode` is not in the
    /// registry (fatal; no session is created). Errors from the start
    /// node's producer propagate the same way they do mid-session.
    pub fn start(
        subject: &mut dyn Subject,
        registry: Arc<NodeRegistry>,
        startnode: &str,
        config: MenuConfig,
        initial_context: Context,
    ) -> Result<(Self, InputOutcome)> {
        Self::start_with_formatter(
            subject,
            registry,
            startnode,
            config,
            initial_context,
            Box::new(DefaultFormatter),
        )
    }

    /// Starts a session with a custom formatter.
    ///
    /// # Errors
    /// Same contract as [`MenuSession::start`].
    pub fn start_with_formatter(
        subject: &mut dyn Subject,
        registry: Arc<NodeRegistry>,
        startnode: &str,
        config: MenuConfig,
        initial_context: Context,
        formatter: Box<dyn MenuFormatter + Send + Sync>,
    ) -> Result<(Self, InputOutcome)> {
        if !registry.contains(startnode) {
            return Err(Error::unknown_node(startnode));
        }

        let mut session = Self {
            registry,
            config,
            formatter,
            state: MenuState::Active,
            node_name: startnode.to_string(),
            context: initial_context.clone(),
            compiled: CompiledOptions::default(),
            help_text: String::new(),
            last_render: String::new(),
        };

        let start_input = session.config.start_input.clone();
        debug!(subject = %subject.id(), node = %startnode, "menu session starting");
        let outcome = match session.enter_node(subject, startnode, &start_input, initial_context)?
        {
            EnterOutcome::Open => InputOutcome::Continue,
            EnterOutcome::Terminal => session.close(subject),
        };
        Ok((session, outcome))
    }

    /// Handles one line of input.
    ///
    /// Resolution order: authored fixed keys, then enabled built-ins
    /// (`look`/`l`, `help`/`h`, `quit`/`q`/`exit`, `menudebug`), then
    /// pattern options, then the `_default` catch-all. Matching failures
    /// and invalid goto results re-render the node with a notice and keep
    /// the session alive; other errors from authored logic propagate to
    /// the supervisor.
    ///
    /// # Errors
    /// Returns [`ErrorKind::SessionClosed`] when called after close;
    /// [`ErrorKind::UnknownNode`] when a transition targets a missing
    /// node (the session stays on its current node); any error raised by
    /// authored producers or goto-callables.
    pub fn on_input(&mut self, subject: &mut dyn Subject, raw: &str) -> Result<InputOutcome> {
        if self.state != MenuState::Active {
            return Err(Error::new(ErrorKind::SessionClosed));
        }
        let cmd = raw.trim().to_lowercase();

        // Authored fixed keys shadow the built-ins; freeing an alias is
        // done by disabling the corresponding auto flag.
        if let Some(index) = self.compiled.match_exact(raw) {
            return self.take_option(subject, index, raw);
        }
        if self.config.auto_look && matches!(cmd.as_str(), "look" | "l") {
            subject.send(&self.last_render);
            return Ok(InputOutcome::Continue);
        }
        if self.config.auto_help && matches!(cmd.as_str(), "help" | "h") {
            subject.send(&self.help_text);
            return Ok(InputOutcome::Continue);
        }
        if self.config.auto_quit && matches!(cmd.as_str(), "quit" | "q" | "exit") {
            return Ok(self.close(subject));
        }
        if self.config.debug && cmd.strip_prefix("menudebug").is_some_and(|rest| {
            rest.is_empty() || rest.starts_with(' ')
        }) {
            let arg = cmd.strip_prefix("menudebug").unwrap_or("").trim().to_string();
            self.send_debug(subject, &arg);
            return Ok(InputOutcome::Continue);
        }
        if let Some(index) = self.compiled.match_free(raw) {
            return self.take_option(subject, index, raw);
        }

        debug!(node = %self.node_name, input = %cmd, "unmatched menu input");
        self.send_notice(subject, NOTICE_NO_MATCH);
        Ok(InputOutcome::Continue)
    }

    /// Forces the session to `Closed`, as an external supervisor (an idle
    /// timeout, a replacement menu) may do at any time.
    ///
    /// Returns the exit action if the session was still open.
    pub fn force_close(&mut self) -> Option<String> {
        if self.state == MenuState::Closed {
            return None;
        }
        debug!(node = %self.node_name, "menu session force-closed");
        self.state = MenuState::Closed;
        self.compiled = CompiledOptions::default();
        self.config.exit_action.clone()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> MenuState {
        self.state
    }

    /// Name of the node the session is on.
    #[must_use]
    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    /// The context in effect for the current node.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// The session configuration.
    #[must_use]
    pub const fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// The most recent full node render, as shown by `look`.
    #[must_use]
    pub fn last_render(&self) -> &str {
        &self.last_render
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Follows a matched option's goto.
    fn take_option(
        &mut self,
        subject: &mut dyn Subject,
        index: usize,
        raw: &str,
    ) -> Result<InputOutcome> {
        let goto = self
            .compiled
            .entry(index)
            .map(|entry| entry.goto.clone())
            .ok_or_else(|| Error::internal("matched option index out of range"))?;

        match resolve_goto(subject, &goto, raw, &self.context, self.config.merge_mode) {
            Ok(transition) => self.apply_transition(subject, transition, raw),
            Err(err) if err.is_recoverable() => {
                warn!(node = %self.node_name, error = %err, "goto produced an unusable result");
                self.send_notice(subject, NOTICE_BAD_TRANSITION);
                Ok(InputOutcome::Continue)
            }
            Err(err) => Err(err),
        }
    }

    /// Enters the transition's target, or re-runs the current node.
    fn apply_transition(
        &mut self,
        subject: &mut dyn Subject,
        transition: Transition,
        raw: &str,
    ) -> Result<InputOutcome> {
        let target = transition
            .target
            .unwrap_or_else(|| self.node_name.clone());
        match self.enter_node(subject, &target, raw, transition.context)? {
            EnterOutcome::Open => Ok(InputOutcome::Continue),
            EnterOutcome::Terminal => Ok(self.close(subject)),
        }
    }

    /// Evaluates a node and, on success, commits it as the current node.
    ///
    /// Session fields are only touched after the producer and option
    /// compilation succeed, so a failed transition leaves the session on
    /// its previous node.
    fn enter_node(
        &mut self,
        subject: &mut dyn Subject,
        name: &str,
        raw: &str,
        context: Context,
    ) -> Result<EnterOutcome> {
        let producer = match self.registry.resolve(name) {
            Ok(producer) => producer.clone(),
            Err(err) => {
                subject.send(&notice_node_missing(name));
                return Err(err);
            }
        };

        let output = match producer(subject, raw, &context) {
            Ok(output) => output,
            Err(err) => {
                subject.send(&notice_node_error(name));
                return Err(err);
            }
        };

        debug!(node = %name, terminal = output.is_terminal(), "entering menu node");
        let node_text = self.formatter.format_node_text(output.text.text());
        let help = output.text.help().map(|h| self.formatter.format_help_text(h));

        if output.is_terminal() {
            if !node_text.is_empty() {
                subject.send(&node_text);
            }
            self.node_name = name.to_string();
            self.context = context;
            self.state = MenuState::Terminal;
            return Ok(EnterOutcome::Terminal);
        }

        let options = output.options.unwrap_or_default();
        let compiled = match CompiledOptions::build(&options) {
            Ok(compiled) => compiled,
            Err(err) => {
                subject.send(&notice_node_error(name));
                return Err(err.with_context(
                    waymark_foundation::ErrorContext::new().with_node(name),
                ));
            }
        };

        let options_text = self.formatter.format_options(&compiled.visible());
        let render = self.formatter.format_node(&node_text, &options_text);
        subject.send(&render);

        self.help_text = help.unwrap_or_else(|| self.fallback_help());
        self.last_render = render;
        self.node_name = name.to_string();
        self.context = context;
        self.compiled = compiled;
        self.state = MenuState::Active;
        Ok(EnterOutcome::Open)
    }

    /// Tears the session down and reports the configured exit action.
    fn close(&mut self, _subject: &mut dyn Subject) -> InputOutcome {
        debug!(node = %self.node_name, "menu session closed");
        self.state = MenuState::Closed;
        self.compiled = CompiledOptions::default();
        InputOutcome::Closed {
            exit_action: self.config.exit_action.clone(),
        }
    }

    /// Generic help shown when the node carries no help text.
    fn fallback_help(&self) -> String {
        if self.config.auto_quit {
            "Commands: <menu option>, help, quit".to_string()
        } else {
            "Commands: <menu option>, help".to_string()
        }
    }

    /// Re-renders the current node with a notice appended.
    fn send_notice(&self, subject: &mut dyn Subject, notice: &str) {
        if self.last_render.is_empty() {
            subject.send(notice);
        } else {
            subject.send(&format!("{}\n\n{notice}", self.last_render));
        }
    }

    /// Dumps session state for the `menudebug` built-in.
    fn send_debug(&self, subject: &mut dyn Subject, arg: &str) {
        if !arg.is_empty() {
            let value = self
                .context
                .get(arg)
                .map_or_else(|| "<unset>".to_string(), |v| format!("{v}"));
            subject.send(&format!("MENU DEBUG {arg}: {value}"));
            return;
        }
        let mut entries: Vec<String> = self
            .context
            .iter()
            .map(|(k, v)| format!("  {k}: {v}"))
            .collect();
        entries.sort();
        let labels: Vec<String> = self
            .compiled
            .visible()
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        subject.send(&format!(
            "MENU DEBUG\n node: {}\n state: {:?}\n options: {}\n context:\n{}",
            self.node_name,
            self.state,
            labels.join(", "),
            entries.join("\n"),
        ));
    }
}

impl std::fmt::Debug for MenuSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuSession")
            .field("state", &self.state)
            .field("node", &self.node_name)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
