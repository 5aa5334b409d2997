//! Best-score persistence
//!
//! Only one number survives between sessions: the best score ever reached.
//! Where it lives is up to the `HighScoreStore` implementation.

use serde::{Deserialize, Serialize};

use crate::error::Result;
#[cfg(target_arch = "wasm32")]
use crate::error::GameError;

/// The persisted best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    pub best: u64,
    /// Level reached on the best run
    #[serde(default)]
    pub level: u32,
}

impl HighScore {
    /// Record a finished run. Returns true if it beat the stored best.
    pub fn submit(&mut self, score: u64, level: u32) -> bool {
        if score > self.best {
            self.best = score;
            self.level = level;
            true
        } else {
            false
        }
    }

    /// Parse a stored value: either the JSON record or a bare number
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if let Ok(best) = raw.parse::<u64>() {
            return Ok(Self { best, level: 0 });
        }
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Somewhere to keep the best score between sessions
pub trait HighScoreStore {
    /// Read the stored best; a missing record is `HighScore::default()`
    fn load(&mut self) -> Result<HighScore>;
    fn save(&mut self, high_score: &HighScore) -> Result<()>;
}

/// In-memory store; counts writes
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub stored: Option<HighScore>,
    pub writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u64) -> Self {
        Self {
            stored: Some(HighScore { best, level: 0 }),
            writes: 0,
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<HighScore> {
        Ok(self.stored.unwrap_or_default())
    }

    fn save(&mut self, high_score: &HighScore) -> Result<()> {
        self.stored = Some(*high_score);
        self.writes += 1;
        Ok(())
    }
}

/// JSON file on disk (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for FileStore {
    fn load(&mut self) -> Result<HighScore> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let high_score = HighScore::parse(&raw)?;
                log::info!("Loaded high score {}", high_score.best);
                Ok(high_score)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score found, starting fresh");
                Ok(HighScore::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, high_score: &HighScore) -> Result<()> {
        // tmp -> rename
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, high_score.to_json()?)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("High score saved ({})", high_score.best);
        Ok(())
    }
}

/// Browser LocalStorage (wasm32 only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "edge_siege_highscore";

    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| GameError::Storage("LocalStorage unavailable".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&mut self) -> Result<HighScore> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(raw)) => {
                let high_score = HighScore::parse(&raw)?;
                log::info!("Loaded high score {}", high_score.best);
                Ok(high_score)
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Ok(HighScore::default())
            }
            Err(_) => Err(GameError::Storage("read failed".into())),
        }
    }

    fn save(&mut self, high_score: &HighScore) -> Result<()> {
        let storage = Self::storage()?;
        storage
            .set_item(Self::STORAGE_KEY, &high_score.to_json()?)
            .map_err(|_| GameError::Storage("write failed".into()))?;
        log::info!("High score saved ({})", high_score.best);
        Ok(())
    }
}
