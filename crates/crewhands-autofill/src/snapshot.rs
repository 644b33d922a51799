//! Page snapshots written to disk.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crewhands_protocols::Page;

/// Writes PNG snapshots under one directory. Snapshot failures are logged
/// and never affect the application attempt.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    dir: Option<PathBuf>,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Store that never writes.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Capture `page` as `{label}-{job_id}-{millis}.png`.
    pub async fn capture(&self, page: &dyn Page, label: &str, job_id: &str) -> Option<PathBuf> {
        let dir = self.dir.as_ref()?;
        let bytes = match page.snapshot().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(label, job_id, error = %e, "Failed to capture snapshot");
                return None;
            }
        };

        let path = dir.join(format!(
            "{}-{}-{}.png",
            label,
            sanitize(job_id),
            Utc::now().timestamp_millis()
        ));
        let written = async {
            tokio::fs::create_dir_all(dir).await?;
            tokio::fs::write(&path, &bytes).await
        };
        match written.await {
            Ok(()) => {
                debug!(path = %path.display(), "Saved snapshot");
                Some(path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to write snapshot");
                None
            }
        }
    }
}

fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewhands_protocols::page::fake::FakePage;

    #[tokio::test]
    async fn test_capture_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("shots"));
        let page = FakePage::new().route("https://example.com", "<p>form</p>");
        page.goto("https://example.com/apply").await.unwrap();

        let path = store.capture(&page, "before-submit", "abc/1").await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("before-submit-abc_1-"));
        assert!(name.ends_with(".png"));
        assert!(std::fs::read(&path).unwrap().starts_with(b"\x89PNG"));
    }

    #[tokio::test]
    async fn test_disabled_store_skips_page() {
        let page = FakePage::new();
        assert!(SnapshotStore::disabled().capture(&page, "error", "1").await.is_none());
        assert_eq!(page.snapshot_count(), 0);
    }

    #[tokio::test]
    async fn test_closed_page_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let page = FakePage::new();
        page.close().await.unwrap();
        assert!(SnapshotStore::new(dir.path()).capture(&page, "error", "1").await.is_none());
    }
}
