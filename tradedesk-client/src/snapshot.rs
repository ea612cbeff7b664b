//! Persisted session snapshot
//!
//! The durable, reload-surviving copy of credential + profile. One JSON file
//! under a fixed namespace directory; written only when both credential and
//! profile are present, cleared whenever either becomes absent. Only the
//! session store touches it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tradedesk_core::{Credential, DeskError, DeskResult, ErrorContext, UserProfile};
use tracing::{debug, info, warn};

const SNAPSHOT_FILE: &str = "auth-session.json";

/// Serialized session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub credential: Credential,
    pub profile: UserProfile,
    pub is_authenticated: bool,
    pub saved_at: chrono::DateTime<chrono::Utc>,
}

impl SessionSnapshot {
    pub fn new(credential: Credential, profile: UserProfile) -> Self {
        Self {
            credential,
            profile,
            is_authenticated: true,
            saved_at: chrono::Utc::now(),
        }
    }
}

/// File-backed snapshot storage
pub struct SnapshotStorage {
    storage_dir: PathBuf,
}

impl SnapshotStorage {
    /// Create storage rooted at the given directory, creating it if needed
    pub fn new<P: AsRef<Path>>(storage_dir: P) -> DeskResult<Self> {
        let storage_dir = storage_dir.as_ref().to_path_buf();

        std::fs::create_dir_all(&storage_dir).map_err(|e| DeskError::Storage {
            message: format!("Failed to create storage directory: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("snapshot_storage")
                .with_operation("create_dir")
                .with_metadata("dir", &storage_dir.display().to_string()),
        })?;

        info!("Snapshot storage initialized at: {}", storage_dir.display());

        Ok(Self { storage_dir })
    }

    /// Storage under the default namespace in the user's home directory
    pub fn default_location() -> DeskResult<Self> {
        let base = dirs::home_dir().ok_or_else(|| DeskError::Storage {
            message: "Could not determine home directory".to_string(),
            source: None,
            context: ErrorContext::new("snapshot_storage")
                .with_operation("default_location")
                .with_suggestion("Set an explicit storage_dir in the client config"),
        })?;
        Self::new(base.join(".tradedesk"))
    }

    fn snapshot_path(&self) -> PathBuf {
        self.storage_dir.join(SNAPSHOT_FILE)
    }

    /// Persist the snapshot, replacing any previous one
    pub fn save(&self, snapshot: &SessionSnapshot) -> DeskResult<()> {
        let path = self.snapshot_path();

        let json_data = serde_json::to_string_pretty(snapshot).map_err(DeskError::Serialization)?;

        std::fs::write(&path, json_data).map_err(|e| DeskError::Storage {
            message: format!("Failed to write snapshot: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("snapshot_storage")
                .with_operation("save")
                .with_metadata("path", &path.display().to_string()),
        })?;

        debug!("Saved session snapshot to {}", path.display());
        Ok(())
    }

    /// Load the snapshot if one exists. A missing file is `Ok(None)`; a
    /// corrupt file is treated as absent and removed.
    pub fn load(&self) -> DeskResult<Option<SessionSnapshot>> {
        let path = self.snapshot_path();

        if !path.exists() {
            return Ok(None);
        }

        let json_data = std::fs::read_to_string(&path).map_err(|e| DeskError::Storage {
            message: format!("Failed to read snapshot: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("snapshot_storage")
                .with_operation("load")
                .with_metadata("path", &path.display().to_string()),
        })?;

        match serde_json::from_str::<SessionSnapshot>(&json_data) {
            Ok(snapshot) => {
                debug!("Loaded session snapshot from {}", path.display());
                Ok(Some(snapshot))
            }
            Err(e) => {
                warn!(
                    "Discarding corrupt session snapshot at {}: {}",
                    path.display(),
                    e
                );
                self.clear()?;
                Ok(None)
            }
        }
    }

    /// Remove the snapshot. Idempotent.
    pub fn clear(&self) -> DeskResult<()> {
        let path = self.snapshot_path();

        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| DeskError::Storage {
                message: format!("Failed to remove snapshot: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("snapshot_storage")
                    .with_operation("clear")
                    .with_metadata("path", &path.display().to_string()),
            })?;
            debug!("Cleared session snapshot at {}", path.display());
        }

        Ok(())
    }

    /// Whether a snapshot file currently exists
    pub fn exists(&self) -> bool {
        self.snapshot_path().exists()
    }
}
