//! Document store: named JSON documents grouped by namespace.
//!
//! DESIGN
//! ======
//! Every saved drawing, genogram, or template is an opaque JSON value. The
//! store never interprets it. [`FsDocumentStore`] keeps one pretty-printed
//! file per document under `<root>/<namespace>/<name>.json`; directories are
//! created by an explicit [`DocumentStore::init`] call at startup.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

// =============================================================================
// TYPES
// =============================================================================

/// Document families. Each maps to one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Genograms,
    Templates,
    FloorPlans,
    BodyMaps,
}

impl Namespace {
    pub const ALL: [Self; 4] = [Self::Genograms, Self::Templates, Self::FloorPlans, Self::BodyMaps];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Genograms => "genograms",
            Self::Templates => "templates",
            Self::FloorPlans => "floor-plans",
            Self::BodyMaps => "body-maps",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| ns.as_str() == raw)
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid document name: {0:?}")]
    InvalidName(String),
    #[error("document not found: {namespace}/{name}")]
    NotFound { namespace: Namespace, name: String },
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Names are single path components: non-empty, no separators, no leading dot.
///
/// # Errors
///
/// Returns [`StoreError::InvalidName`] when `name` could escape its namespace
/// directory or is empty.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let bad = name.trim().is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(StoreError::InvalidName(name.to_owned()));
    }
    Ok(())
}

// =============================================================================
// TRAIT
// =============================================================================

#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create whatever backing structure the store needs. Idempotent.
    async fn init(&self) -> Result<(), StoreError>;

    /// Create or overwrite `name`.
    async fn save(&self, namespace: Namespace, name: &str, doc: &Value) -> Result<(), StoreError>;

    /// Sorted document names in `namespace`.
    async fn list(&self, namespace: Namespace) -> Result<Vec<String>, StoreError>;

    async fn load(&self, namespace: Namespace, name: &str) -> Result<Value, StoreError>;

    /// Remove `name`. Deleting a missing document succeeds.
    async fn delete(&self, namespace: Namespace, name: &str) -> Result<(), StoreError>;
}

// =============================================================================
// FILESYSTEM STORE
// =============================================================================

pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    fn dir(&self, namespace: Namespace) -> PathBuf {
        self.root.join(namespace.as_str())
    }

    fn path(&self, namespace: Namespace, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.dir(namespace).join(format!("{name}.json")))
    }
}

#[async_trait::async_trait]
impl DocumentStore for FsDocumentStore {
    async fn init(&self) -> Result<(), StoreError> {
        for namespace in Namespace::ALL {
            tokio::fs::create_dir_all(self.dir(namespace)).await?;
        }
        info!(root = %self.root.display(), "document store ready");
        Ok(())
    }

    async fn save(&self, namespace: Namespace, name: &str, doc: &Value) -> Result<(), StoreError> {
        let path = self.path(namespace, name)?;
        let body = serde_json::to_vec_pretty(doc)?;
        tokio::fs::create_dir_all(self.dir(namespace)).await?;
        tokio::fs::write(&path, body).await?;
        debug!(%namespace, %name, "document saved");
        Ok(())
    }

    async fn list(&self, namespace: Namespace) -> Result<Vec<String>, StoreError> {
        let mut entries = match tokio::fs::read_dir(self.dir(namespace)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn load(&self, namespace: Namespace, name: &str) -> Result<Value, StoreError> {
        let path = self.path(namespace, name)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound { namespace, name: name.to_owned() });
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn delete(&self, namespace: Namespace, name: &str) -> Result<(), StoreError> {
        let path = self.path(namespace, name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(%namespace, %name, "document deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
