//! Learner state store
//!
//! One JSON document per learner under a data directory
//! (`~/.progression/learners/` by default):
//!
//! ```text
//! learners/
//!   ada.json        <- ProgressionState
//!   ada.json.lock   <- held for a whole load -> mutate -> save cycle
//! ```
//!
//! The engine assumes a single writer per learner. The store provides it
//! across processes with an exclusive file lock per learner id.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::atomic_io::{lock_exclusive, write_atomic};
use crate::engine::{ProgressionEngine, ProgressionState};

const MAX_LEARNER_ID_LEN: usize = 64;

/// Directory of per-learner state files
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

/// Exclusive hold on one learner's state
///
/// Dropping the session releases the lock without saving.
pub struct LearnerSession<'s> {
    store: &'s StateStore,
    learner_id: String,
    state: ProgressionState,
    _lock: File,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default data directory (~/.progression/learners/)
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".progression")
            .join("learners")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn state_path(&self, learner_id: &str) -> PathBuf {
        self.dir.join(format!("{learner_id}.json"))
    }

    fn lock_path(&self, learner_id: &str) -> PathBuf {
        self.dir.join(format!("{learner_id}.json.lock"))
    }

    /// Lock a learner and load its state (a fresh state if none is stored yet)
    pub fn open<'s>(
        &'s self,
        learner_id: &str,
        engine: &ProgressionEngine,
    ) -> Result<LearnerSession<'s>> {
        validate_learner_id(learner_id)?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory: {}", self.dir.display()))?;

        let lock = lock_exclusive(&self.lock_path(learner_id))?;
        let state = self.read_state(learner_id, engine)?;

        Ok(LearnerSession {
            store: self,
            learner_id: learner_id.to_string(),
            state,
            _lock: lock,
        })
    }

    /// Read a learner's state without taking the lock
    ///
    /// For display only; mutate through [`StateStore::open`].
    pub fn peek(&self, learner_id: &str, engine: &ProgressionEngine) -> Result<ProgressionState> {
        validate_learner_id(learner_id)?;
        self.read_state(learner_id, engine)
    }

    /// Whether a state file exists for `learner_id`
    pub fn contains(&self, learner_id: &str) -> Result<bool> {
        validate_learner_id(learner_id)?;
        Ok(self.state_path(learner_id).exists())
    }

    /// Learner ids with a stored state, sorted
    pub fn learners(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read data directory: {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_learner_id(stem).is_ok() {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn read_state(&self, learner_id: &str, engine: &ProgressionEngine) -> Result<ProgressionState> {
        let path = self.state_path(learner_id);
        if !path.exists() {
            tracing::debug!("No stored state for {}, starting fresh", learner_id);
            return Ok(engine.new_state());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;
        let mut state: ProgressionState = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;
        state
            .revalidate(engine.levels(), engine.catalog())
            .with_context(|| format!("Invalid state for learner '{learner_id}'"))?;

        Ok(state)
    }

    fn write_state(&self, learner_id: &str, state: &ProgressionState) -> Result<()> {
        let content =
            serde_json::to_string_pretty(state).with_context(|| "Failed to serialize state")?;
        write_atomic(&self.state_path(learner_id), content.as_bytes())
    }
}

impl LearnerSession<'_> {
    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ProgressionState {
        &mut self.state
    }

    /// Persist the state and release the lock
    pub fn save(self) -> Result<()> {
        self.store.write_state(&self.learner_id, &self.state)?;
        tracing::debug!("Saved state for {}", self.learner_id);
        Ok(())
    }
}

/// Learner ids become file names: ASCII alphanumerics, '-' and '_' only
pub fn validate_learner_id(learner_id: &str) -> Result<()> {
    if learner_id.is_empty() || learner_id.len() > MAX_LEARNER_ID_LEN {
        bail!(
            "Learner id must be 1-{} characters, got {}",
            MAX_LEARNER_ID_LEN,
            learner_id.len()
        );
    }
    if let Some(c) = learner_id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        bail!("Invalid character {:?} in learner id '{}'", c, learner_id);
    }
    Ok(())
}
