//! Panel-location stores.
//!
//! A panel is a single control message the bot posts into a channel; the
//! store remembers where it lives (channel plus message identifier) so a
//! later command can find, edit, or replace it. At most one live panel per
//! guild per store.

use crate::engine::{StoreEngine, require_key};
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Location of the most recently posted panel message for a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    pub channel_id: String,
    pub message_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PanelDocument {
    #[serde(default)]
    guilds: HashMap<String, Panel>,
}

/// Guild-scoped store of panel message locations.
///
/// Each named instance persists to its own `<name>.json` file; the
/// constructors below cover the panels the bot actually posts.
pub struct PanelStore {
    engine: StoreEngine<PanelDocument>,
}

impl PanelStore {
    /// Store backing the booster-role control panel (`booster_role_config.json`).
    pub fn booster_role() -> Self {
        Self::named("booster_role_config")
    }

    /// Store backing the suggestion panel (`suggestion_config.json`).
    pub fn suggestions() -> Self {
        Self::named("suggestion_config")
    }

    /// Panel store with an arbitrary name under the resolved data directory.
    pub fn named(name: &str) -> Self {
        Self {
            engine: StoreEngine::new(name),
        }
    }

    /// Panel store rooted at an explicit directory (test isolation).
    pub fn in_dir(name: &str, dir: impl Into<PathBuf>) -> Self {
        Self {
            engine: StoreEngine::with_dir(name, dir),
        }
    }

    /// Returns the guild's panel location, both fields read atomically, or
    /// `None` if no panel has been recorded.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::Error::InvalidKey`] for an empty guild id,
    /// or [`crate::errors::Error::StorageUnavailable`] if the first load
    /// fails.
    pub async fn panel(&self, guild_id: &str) -> Result<Option<Panel>> {
        require_key("guild", guild_id)?;
        self.engine
            .read(|doc| doc.guilds.get(guild_id).cloned())
            .await
    }

    /// Records the guild's panel location, replacing any previous one, and
    /// persists before returning.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::Error::InvalidKey`] for an empty
    /// identifier, or [`crate::errors::Error::StorageUnavailable`] on a
    /// failed write (the previous location stays in effect).
    #[instrument(skip(self), fields(store = %self.engine.name()))]
    pub async fn set_panel(
        &self,
        guild_id: &str,
        channel_id: &str,
        message_id: &str,
    ) -> Result<()> {
        require_key("guild", guild_id)?;
        require_key("channel", channel_id)?;
        require_key("message", message_id)?;

        let panel = Panel {
            channel_id: channel_id.to_string(),
            message_id: message_id.to_string(),
        };
        self.engine
            .update(|doc| {
                doc.guilds.insert(guild_id.to_string(), panel);
            })
            .await?;
        info!(
            "Panel for guild {} now at channel {} message {}",
            guild_id, channel_id, message_id
        );
        Ok(())
    }

    /// Forgets the guild's panel. Clearing a guild that has none is a
    /// no-op, not an error (best-effort, like deleting an already-gone
    /// panel message). Returns whether a record was removed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::Error::StorageUnavailable`] on a failed
    /// write.
    #[instrument(skip(self), fields(store = %self.engine.name()))]
    pub async fn clear_panel(&self, guild_id: &str) -> Result<bool> {
        require_key("guild", guild_id)?;
        let removed = self
            .engine
            .update(|doc| doc.guilds.remove(guild_id).is_some())
            .await?;
        if removed {
            info!("Cleared panel for guild {}", guild_id);
        }
        Ok(removed)
    }
}
