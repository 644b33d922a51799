//! Applied-jobs ledger.
//!
//! A JSON array of job ids that have been applied to, kept sorted so the
//! file diffs cleanly. Read once and written once per run. Writes go through
//! a sibling temp file and a rename, and an unparseable ledger is never
//! overwritten.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::RunnerError;

pub const LEDGER_FILE: &str = "applied-jobs.json";

#[derive(Debug, Clone)]
pub struct AppliedLedger {
    path: PathBuf,
}

impl AppliedLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ledger at `{data_dir}/applied-jobs.json`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(LEDGER_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ids applied to so far. A missing or unreadable ledger is empty.
    pub async fn load(&self) -> BTreeSet<String> {
        match self.try_load().await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable ledger");
                BTreeSet::new()
            }
        }
    }

    /// Ids applied to so far; a missing ledger is empty, an unparseable one
    /// is an error.
    pub async fn try_load(&self) -> Result<BTreeSet<String>, RunnerError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => return Err(RunnerError::io(&self.path, e)),
        };
        serde_json::from_str(&content).map_err(|source| RunnerError::CorruptLedger {
            path: self.path.clone(),
            source,
        })
    }

    /// Union `ids` into the ledger and persist it. Returns the merged set.
    ///
    /// Fails without writing when the existing file cannot be read, so
    /// prior entries are never dropped.
    pub async fn merge<I>(&self, ids: I) -> Result<BTreeSet<String>, RunnerError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut merged = self.try_load().await?;
        let before = merged.len();
        merged.extend(ids);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RunnerError::io(parent, e))?;
        }
        let content = serde_json::to_string_pretty(&merged)?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, content)
            .await
            .map_err(|e| RunnerError::io(&staging, e))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| RunnerError::io(&self.path, e))?;

        debug!(added = merged.len() - before, total = merged.len(), "Saved applied jobs");
        Ok(merged)
    }
}
