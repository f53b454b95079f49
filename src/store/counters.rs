//! Join/leave counters and the leaderboard view over them.
//!
//! Counters only ever go up; an administrative reset is deliberately not
//! part of this surface. The per-guild records are persisted as a JSON
//! array rather than an object so first-seen insertion order survives a
//! reload, which is what makes the leaderboard tie-break deterministic.

use crate::engine::{StoreEngine, require_key};
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Which counter an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Join,
    Leave,
}

/// Join/leave tallies for one user within one guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCounters {
    pub user_id: String,
    #[serde(default)]
    pub joins: u64,
    #[serde(default)]
    pub leaves: u64,
}

impl UserCounters {
    fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            joins: 0,
            leaves: 0,
        }
    }

    /// The tally for the given counter kind.
    #[must_use]
    pub fn count(&self, kind: CounterKind) -> u64 {
        match kind {
            CounterKind::Join => self.joins,
            CounterKind::Leave => self.leaves,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CounterDocument {
    // Vec keeps first-seen order; guild member counts are small enough
    // that the linear lookup on increment does not matter.
    #[serde(default)]
    guilds: HashMap<String, Vec<UserCounters>>,
}

/// Guild-scoped join/leave counter store (`join_leave.json`).
pub struct JoinLeaveStore {
    engine: StoreEngine<CounterDocument>,
}

impl JoinLeaveStore {
    /// Store under the resolved data directory.
    pub fn open() -> Self {
        Self {
            engine: StoreEngine::new("join_leave"),
        }
    }

    /// Store rooted at an explicit directory (test isolation).
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            engine: StoreEngine::with_dir("join_leave", dir),
        }
    }

    /// Increments the named counter by exactly one, creating a zeroed
    /// record the first time a user is seen, and persists before
    /// returning. Returns the new tally.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::Error::InvalidKey`] for an empty
    /// identifier, or [`crate::errors::Error::StorageUnavailable`] on a
    /// failed write (the previous tally stays in effect).
    #[instrument(skip(self))]
    pub async fn increment(
        &self,
        guild_id: &str,
        user_id: &str,
        kind: CounterKind,
    ) -> Result<u64> {
        require_key("guild", guild_id)?;
        require_key("user", user_id)?;

        let tally = self
            .engine
            .update(|doc| {
                let entries = doc.guilds.entry(guild_id.to_string()).or_default();
                let idx = match entries.iter().position(|e| e.user_id == user_id) {
                    Some(idx) => idx,
                    None => {
                        entries.push(UserCounters::new(user_id));
                        entries.len() - 1
                    }
                };
                let entry = &mut entries[idx];
                match kind {
                    CounterKind::Join => {
                        entry.joins += 1;
                        entry.joins
                    }
                    CounterKind::Leave => {
                        entry.leaves += 1;
                        entry.leaves
                    }
                }
            })
            .await?;
        debug!(
            "Counter {:?} for user {} in guild {} is now {}",
            kind, user_id, guild_id, tally
        );
        Ok(tally)
    }

    /// The user's tallies, or `None` if the user was never counted in this
    /// guild.
    pub async fn counters(&self, guild_id: &str, user_id: &str) -> Result<Option<UserCounters>> {
        require_key("guild", guild_id)?;
        require_key("user", user_id)?;
        self.engine
            .read(|doc| {
                doc.guilds
                    .get(guild_id)
                    .and_then(|entries| entries.iter().find(|e| e.user_id == user_id))
                    .cloned()
            })
            .await
    }

    /// Top `limit` users of a guild, ranked descending by the selected
    /// counter. Ties keep first-seen order (stable sort), so repeated
    /// calls over unchanged data return the same ranking. An unknown
    /// guild or a zero limit yields an empty vec.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::Error::InvalidKey`] for an empty guild id,
    /// or [`crate::errors::Error::StorageUnavailable`] if the first load
    /// fails.
    pub async fn leaderboard(
        &self,
        guild_id: &str,
        kind: CounterKind,
        limit: usize,
    ) -> Result<Vec<UserCounters>> {
        self.leaderboard_filtered(guild_id, kind, limit, |_| true)
            .await
    }

    /// [`Self::leaderboard`] restricted to entries the predicate accepts.
    /// Filtering happens before the limit is applied.
    pub async fn leaderboard_filtered(
        &self,
        guild_id: &str,
        kind: CounterKind,
        limit: usize,
        predicate: impl Fn(&UserCounters) -> bool,
    ) -> Result<Vec<UserCounters>> {
        require_key("guild", guild_id)?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        self.engine
            .read(|doc| {
                let Some(entries) = doc.guilds.get(guild_id) else {
                    return Vec::new();
                };
                let mut ranked: Vec<UserCounters> = entries
                    .iter()
                    .filter(|entry| predicate(entry))
                    .cloned()
                    .collect();
                // sort_by is stable: equal counts keep insertion order.
                ranked.sort_by(|a, b| b.count(kind).cmp(&a.count(kind)));
                ranked.truncate(limit);
                ranked
            })
            .await
    }
}
