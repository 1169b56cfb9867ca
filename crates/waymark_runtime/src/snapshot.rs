//! Restart snapshots for persistent menu sessions.
//!
//! A snapshot captures what is needed to restart a menu after a process
//! restart: the start node, the configuration, and the originally
//! supplied context. Context mutations made mid-session are deliberately
//! not captured; restoring replays the start node with the original
//! input.

use serde::{Deserialize, Serialize};
use waymark_foundation::{Context, Error, MenuConfig, Result};

/// Serializable restart state for one menu session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MenuSnapshot {
    /// The node the menu starts on.
    pub startnode: String,
    /// Full session configuration, including the synthetic start input.
    pub config: MenuConfig,
    /// The context originally supplied at start.
    pub context: Context,
    /// The template source, when the menu was compiled from one.
    /// Registry- and producer-based menus must be re-supplied by the
    /// host, since producers are closures.
    pub template: Option<String>,
}

impl MenuSnapshot {
    /// Captures a snapshot at session start.
    #[must_use]
    pub fn new(
        startnode: &str,
        config: &MenuConfig,
        context: &Context,
        template: Option<String>,
    ) -> Self {
        Self {
            startnode: startnode.to_string(),
            config: config.clone(),
            context: context.clone(),
            template,
        }
    }

    /// Encodes the snapshot as MessagePack bytes.
    ///
    /// # Errors
    /// Returns an internal error if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec(self)
            .map_err(|err| Error::internal(format!("snapshot encode failed: {err}")))
    }

    /// Decodes a snapshot from MessagePack bytes.
    ///
    /// # Errors
    /// Returns an internal error if the bytes do not decode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        rmp_serde::from_slice(bytes)
            .map_err(|err| Error::internal(format!("snapshot decode failed: {err}")))
    }
}
