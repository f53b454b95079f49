//! Per-channel GIF-url overrides.
//!
//! The sacrifice panel shows a GIF that moderators can override per
//! channel. Clearing an override removes the channel entry outright and
//! drops the guild's sub-map once it is empty, so a later read can never
//! mistake a dangling `{}` for a real configuration.

use crate::engine::{StoreEngine, require_key};
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GifDocument {
    #[serde(default)]
    guilds: HashMap<String, HashMap<String, String>>,
}

/// Guild- and channel-scoped store of GIF urls.
pub struct GifStore {
    engine: StoreEngine<GifDocument>,
}

impl GifStore {
    /// Store backing the sacrifice panel GIFs (`sacrifice_config.json`).
    pub fn sacrifice() -> Self {
        Self::named("sacrifice_config")
    }

    /// GIF store with an arbitrary name under the resolved data directory.
    pub fn named(name: &str) -> Self {
        Self {
            engine: StoreEngine::new(name),
        }
    }

    /// GIF store rooted at an explicit directory (test isolation).
    pub fn in_dir(name: &str, dir: impl Into<PathBuf>) -> Self {
        Self {
            engine: StoreEngine::with_dir(name, dir),
        }
    }

    /// Returns the GIF url configured for the channel, or `None` if the
    /// channel (or the whole guild) has no override.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::Error::InvalidKey`] for an empty
    /// identifier, or [`crate::errors::Error::StorageUnavailable`] if the
    /// first load fails.
    pub async fn gif(&self, guild_id: &str, channel_id: &str) -> Result<Option<String>> {
        require_key("guild", guild_id)?;
        require_key("channel", channel_id)?;
        self.engine
            .read(|doc| {
                doc.guilds
                    .get(guild_id)
                    .and_then(|channels| channels.get(channel_id))
                    .cloned()
            })
            .await
    }

    /// All overrides for a guild, keyed by channel id. Empty map when the
    /// guild has none.
    pub async fn guild_gifs(&self, guild_id: &str) -> Result<HashMap<String, String>> {
        require_key("guild", guild_id)?;
        self.engine
            .read(|doc| doc.guilds.get(guild_id).cloned().unwrap_or_default())
            .await
    }

    /// Sets or clears the channel's GIF url and persists before returning.
    ///
    /// `None` is the clear sentinel: it removes the channel entry instead
    /// of storing anything, and garbage-collects the guild's sub-map once
    /// it is empty.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::Error::InvalidKey`] for an empty
    /// identifier, or [`crate::errors::Error::StorageUnavailable`] on a
    /// failed write (the previous value stays in effect).
    #[instrument(skip(self, url), fields(store = %self.engine.name()))]
    pub async fn set_gif(
        &self,
        guild_id: &str,
        channel_id: &str,
        url: Option<&str>,
    ) -> Result<()> {
        require_key("guild", guild_id)?;
        require_key("channel", channel_id)?;

        let stored = url.map(str::to_string);
        self.engine
            .update(|doc| match stored {
                Some(value) => {
                    doc.guilds
                        .entry(guild_id.to_string())
                        .or_default()
                        .insert(channel_id.to_string(), value);
                }
                None => {
                    if let Some(channels) = doc.guilds.get_mut(guild_id) {
                        channels.remove(channel_id);
                        if channels.is_empty() {
                            doc.guilds.remove(guild_id);
                        }
                    }
                }
            })
            .await?;

        match url {
            Some(_) => info!("Set GIF for guild {} channel {}", guild_id, channel_id),
            None => info!("Cleared GIF for guild {} channel {}", guild_id, channel_id),
        }
        Ok(())
    }
}
