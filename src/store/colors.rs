//! Per-guild embed colour store.
//!
//! A guild can pin the accent colour the bot uses for its embeds. Absence
//! means "use the bot default"; the store never fabricates one.

use crate::engine::{StoreEngine, require_key};
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ColorDocument {
    #[serde(default)]
    guilds: HashMap<String, u32>,
}

/// Guild-scoped store of embed colours (`0xRRGGBB` integers).
pub struct EmbedColorStore {
    engine: StoreEngine<ColorDocument>,
}

impl EmbedColorStore {
    /// Store under the resolved data directory (`embed_colors.json`).
    pub fn open() -> Self {
        Self {
            engine: StoreEngine::new("embed_colors"),
        }
    }

    /// Store rooted at an explicit directory (test isolation).
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            engine: StoreEngine::with_dir("embed_colors", dir),
        }
    }

    /// The guild's configured colour, or `None` for "use the default".
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::Error::InvalidKey`] for an empty guild id,
    /// or [`crate::errors::Error::StorageUnavailable`] if the first load
    /// fails.
    pub async fn color(&self, guild_id: &str) -> Result<Option<u32>> {
        require_key("guild", guild_id)?;
        self.engine
            .read(|doc| doc.guilds.get(guild_id).copied())
            .await
    }

    /// Sets or clears the guild's colour and persists before returning.
    /// `None` removes the entry so the guild falls back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::Error::InvalidKey`] for an empty guild id,
    /// or [`crate::errors::Error::StorageUnavailable`] on a failed write.
    #[instrument(skip(self))]
    pub async fn set_color(&self, guild_id: &str, color: Option<u32>) -> Result<()> {
        require_key("guild", guild_id)?;
        self.engine
            .update(|doc| match color {
                Some(value) => {
                    doc.guilds.insert(guild_id.to_string(), value);
                }
                None => {
                    doc.guilds.remove(guild_id);
                }
            })
            .await?;
        match color {
            Some(value) => info!("Set embed colour for guild {} to #{:06x}", guild_id, value),
            None => info!("Reset embed colour for guild {} to default", guild_id),
        }
        Ok(())
    }
}
