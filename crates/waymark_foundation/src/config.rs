//! Per-session menu configuration.

/// How an incoming context-map combines with the current one on re-runs
/// and `(node, context)` goto results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MergeMode {
    /// The incoming context replaces the current one wholesale.
    #[default]
    Replace,
    /// Incoming entries are layered over the current context.
    Union,
}

/// Configuration for one menu session.
///
/// Constructed with [`MenuConfig::default`] and adjusted through the
/// `with_*` setters.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MenuConfig {
    /// Allow `quit`, `q` or `exit` to leave the menu at any point.
    pub auto_quit: bool,
    /// Allow `look` or `l` to re-show the current node.
    pub auto_look: bool,
    /// Allow `help` or `h` to show the node help text.
    pub auto_help: bool,
    /// Context merge behavior for goto results carrying a context-map.
    pub merge_mode: MergeMode,
    /// Mark the session to survive a process restart.
    ///
    /// Ignored while `debug` is set.
    pub persistent: bool,
    /// Enable the `menudebug` input for dumping session state.
    pub debug: bool,
    /// Follow-up action name handed to the supervising layer on close.
    pub exit_action: Option<String>,
    /// Synthetic "previous input" string fed to the start node, letting it
    /// branch on caller-supplied text as if it were a user choice.
    pub start_input: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            auto_quit: true,
            auto_look: true,
            auto_help: true,
            merge_mode: MergeMode::default(),
            persistent: false,
            debug: false,
            exit_action: Some("look".to_string()),
            start_input: String::new(),
        }
    }
}

impl MenuConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the built-in quit aliases are active.
    #[must_use]
    pub const fn with_auto_quit(mut self, on: bool) -> Self {
        self.auto_quit = on;
        self
    }

    /// Sets whether the built-in look aliases are active.
    #[must_use]
    pub const fn with_auto_look(mut self, on: bool) -> Self {
        self.auto_look = on;
        self
    }

    /// Sets whether the built-in help aliases are active.
    #[must_use]
    pub const fn with_auto_help(mut self, on: bool) -> Self {
        self.auto_help = on;
        self
    }

    /// Sets the context merge mode.
    #[must_use]
    pub const fn with_merge_mode(mut self, mode: MergeMode) -> Self {
        self.merge_mode = mode;
        self
    }

    /// Marks the session to survive a restart.
    #[must_use]
    pub const fn with_persistent(mut self, on: bool) -> Self {
        self.persistent = on;
        self
    }

    /// Enables debug mode.
    #[must_use]
    pub const fn with_debug(mut self, on: bool) -> Self {
        self.debug = on;
        self
    }

    /// Sets (or clears) the exit action name.
    #[must_use]
    pub fn with_exit_action(mut self, action: Option<&str>) -> Self {
        self.exit_action = action.map(str::to_string);
        self
    }

    /// Sets the synthetic start-node input.
    #[must_use]
    pub fn with_start_input(mut self, input: impl Into<String>) -> Self {
        self.start_input = input.into();
        self
    }

    /// Returns true if restart snapshots should be taken for this session.
    ///
    /// Debug mode forces persistence off.
    #[must_use]
    pub const fn snapshots_enabled(&self) -> bool {
        self.persistent && !self.debug
    }
}
