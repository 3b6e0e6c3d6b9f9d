//! File-based EntityStore implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gotvalis_core::{Entity, EntityId};
use tokio::fs;
use tokio::sync::Mutex;

use crate::repository::{EffectScan, EntityStore, FieldDelta, RepositoryError, Result};

const FILE_PREFIX: &str = "entity_";
const FILE_SUFFIX: &str = ".json";

/// File-based implementation of [`EntityStore`].
///
/// Each entity lives in its own `entity_{id}.json` file, pretty-printed so
/// records can be inspected and edited by hand. Writes go to a temp file
/// followed by an atomic rename.
///
/// Read-modify-write calls (`upsert`, `increment_fields`, `delete`) are
/// serialized by an internal mutex.
pub struct FileEntityStore {
    base_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileEntityStore {
    /// Create a store rooted at `base_dir`, creating the directory if needed.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).await?;
        Ok(Self {
            base_dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn entity_path(&self, id: &EntityId) -> PathBuf {
        self.base_dir
            .join(format!("{FILE_PREFIX}{}{FILE_SUFFIX}", encode_id(id.as_str())))
    }

    async fn read_path(&self, path: &Path) -> Result<Option<Entity>> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let entity = serde_json::from_slice(&bytes).map_err(|e| {
            RepositoryError::CorruptedData(format!("{}: {}", path.display(), e))
        })?;
        Ok(Some(entity))
    }

    async fn write(&self, entity: &Entity) -> Result<()> {
        let path = self.entity_path(&entity.id);
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(entity)?;
        fs::write(&temp_path, bytes).await?;
        fs::rename(&temp_path, &path).await?;

        tracing::debug!(entity = %entity.id, version = entity.version, "saved entity to {}", path.display());
        Ok(())
    }

    async fn record_paths(&self) -> Result<Vec<(EntityId, PathBuf)>> {
        let mut records = Vec::new();
        let mut entries = fs::read_dir(&self.base_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(encoded) = filename
                    .strip_prefix(FILE_PREFIX)
                    .and_then(|s| s.strip_suffix(FILE_SUFFIX))
                && let Some(id) = decode_id(encoded)
            {
                records.push((EntityId::new(id), path));
            }
        }

        records.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(records)
    }
}

#[async_trait]
impl EntityStore for FileEntityStore {
    async fn get(&self, id: &EntityId) -> Result<Option<Entity>> {
        self.read_path(&self.entity_path(id)).await
    }

    async fn upsert(&self, entity: &Entity) -> Result<Entity> {
        let _guard = self.write_lock.lock().await;

        let previous = self
            .read_path(&self.entity_path(&entity.id))
            .await?
            .map_or(0, |stored| stored.version);
        let mut stored = entity.clone();
        stored.version = previous.max(entity.version) + 1;

        self.write(&stored).await?;
        Ok(stored)
    }

    async fn find_all_with_active_effects(&self) -> Result<Vec<Entity>> {
        Ok(self.scan_active_effects().await?.entities)
    }

    async fn scan_active_effects(&self) -> Result<EffectScan> {
        let mut scan = EffectScan::default();

        for (id, path) in self.record_paths().await? {
            match self.read_path(&path).await {
                Ok(Some(entity)) if !entity.effects.is_empty() => scan.entities.push(entity),
                Ok(_) => {}
                Err(err) => {
                    tracing::error!(entity = %id, error = %err, "unreadable entity record");
                    scan.unreadable.push(id);
                }
            }
        }

        Ok(scan)
    }

    async fn increment_fields(&self, id: &EntityId, deltas: &[FieldDelta]) -> Result<Entity> {
        let _guard = self.write_lock.lock().await;

        let mut entity = self
            .read_path(&self.entity_path(id))
            .await?
            .ok_or_else(|| RepositoryError::MissingEntity(id.clone()))?;
        for delta in deltas {
            delta.apply(&mut entity);
        }
        entity.version += 1;

        self.write(&entity).await?;
        Ok(entity)
    }

    async fn delete(&self, id: &EntityId) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        match fs::remove_file(self.entity_path(id)).await {
            Ok(()) => {
                tracing::debug!(entity = %id, "deleted entity record");
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn list_ids(&self) -> Result<Vec<EntityId>> {
        Ok(self
            .record_paths()
            .await?
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }
}

/// Keeps `[A-Za-z0-9_-]` and escapes every other byte as `%XX`.
fn encode_id(id: &str) -> String {
    let mut encoded = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

fn decode_id(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = encoded.get(i + 1..i + 3)?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(decoded).ok()
}
