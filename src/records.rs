//! Aggregate per-player statistics and the stores that persist them.
//!
//! The on-disk document is `{ "players": { <name>: <stats> } }`. A whole
//! document is read and written at a time; updates happen only when a game
//! ends.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStats {
    pub pvp_wins: u32,
    pub pvp_losses: u32,
    pub pve_wins: u32,
    pub pve_losses: u32,
    pub best_win_streak: u32,
    pub current_win_streak: u32,
    pub shots: u32,
    pub hits: u32,
    /// Fewest turns needed for a win so far.
    pub fastest_win_turns: Option<u32>,
}

/// Result of one finished PVE match, as counted by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PveOutcome {
    pub won: bool,
    pub shots: u32,
    pub hits: u32,
    pub turns: u32,
}

impl PlayerStats {
    /// Hits per shot, 0 when no shot was ever taken.
    pub fn accuracy(&self) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            f64::from(self.hits) / f64::from(self.shots)
        }
    }

    pub fn apply_pve_result(&mut self, outcome: &PveOutcome) {
        if outcome.won {
            self.pve_wins += 1;
            self.current_win_streak += 1;
            self.best_win_streak = self.best_win_streak.max(self.current_win_streak);
            self.fastest_win_turns = Some(match self.fastest_win_turns {
                Some(prev) => prev.min(outcome.turns),
                None => outcome.turns,
            });
        } else {
            self.pve_losses += 1;
            self.current_win_streak = 0;
        }
        self.shots += outcome.shots;
        self.hits += outcome.hits;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Records {
    #[serde(default)]
    pub players: BTreeMap<String, PlayerStats>,
}

impl Records {
    /// Stats for `name`, inserting an empty entry for a new player.
    pub fn ensure_player(&mut self, name: &str) -> &mut PlayerStats {
        self.players.entry(name.to_string()).or_default()
    }

    pub fn get(&self, name: &str) -> Option<&PlayerStats> {
        self.players.get(name)
    }
}

/// Whole-document persistence for [`Records`].
#[async_trait::async_trait]
pub trait RecordsStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<Records>;
    async fn save(&self, records: &Records) -> anyhow::Result<()>;
}

/// Pretty-printed JSON file, replaced atomically on every save.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "records.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl RecordsStore for JsonFileStore {
    async fn load(&self) -> anyhow::Result<Records> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Records::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        if content.trim().is_empty() {
            return Ok(Records::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("parsing records in {}", self.path.display()))
    }

    async fn save(&self, records: &Records) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(records)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, data)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

/// Records kept in memory, for tests and ephemeral servers.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Records>,
}

impl MemoryStore {
    pub fn new(records: Records) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

#[async_trait::async_trait]
impl RecordsStore for MemoryStore {
    async fn load(&self) -> anyhow::Result<Records> {
        let records = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("records lock poisoned"))?;
        Ok(records.clone())
    }

    async fn save(&self, records: &Records) -> anyhow::Result<()> {
        let mut current = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("records lock poisoned"))?;
        *current = records.clone();
        Ok(())
    }
}
