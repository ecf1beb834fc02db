use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::message::ContactMessage;

/// Flat-file message store.
///
/// The whole collection is one JSON array in a single file, rewritten on
/// every mutation. Reads and writes both take the internal lock, so the
/// read-modify-write cycle cannot interleave across tasks and a reader
/// never observes a half-written file.
pub struct MessageStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl MessageStore {
    /// Create a store handle for the given file. The file itself is
    /// created lazily on the first append.
    pub fn open_at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Default store path: `<XDG data dir>/bestlook/messages.json`
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let data_dir = dirs::data_dir().ok_or(StoreError::NoDataDir)?.join("bestlook");
        Ok(data_dir.join("messages.json"))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a message, returning it as stored.
    ///
    /// Ids are millisecond clock readings, so two submissions landing in
    /// the same millisecond would collide; the stored id is bumped to the
    /// next free integer when that happens.
    pub async fn append(&self, message: ContactMessage) -> Result<ContactMessage, StoreError> {
        let _guard = self.lock.lock().await;
        let mut messages = self.read_lenient().await?;

        let mut message = message;
        while messages.iter().any(|m| m.id == message.id) {
            message.id = match message.id.parse::<u64>() {
                Ok(n) => (n + 1).to_string(),
                Err(_) => format!("{}-1", message.id),
            };
        }

        messages.push(message.clone());
        self.write_back(&messages).await?;
        Ok(message)
    }

    /// Read every stored message in storage order.
    ///
    /// An absent or unparsable file reads as the empty list; callers that
    /// want newest-first order sort by timestamp themselves.
    pub async fn list(&self) -> Result<Vec<ContactMessage>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read_lenient().await
    }

    /// Remove the message with the given id, if present.
    ///
    /// Errors with `NotFound` when the store file does not exist. An id
    /// that matches nothing is not an error; the file is rewritten as-is.
    pub async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut messages = self.read_strict().await?;
        messages.retain(|m| m.id != id);
        self.write_back(&messages).await
    }

    /// Replace the collection with the empty list.
    ///
    /// Errors with `NotFound` when the store file does not exist.
    pub async fn delete_all(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.read_strict().await?;
        self.write_back(&[]).await
    }

    /// Read the file, treating an absent or unparsable file as empty.
    /// Parse failures are logged; other IO errors propagate.
    async fn read_lenient(&self) -> Result<Vec<ContactMessage>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str(&content) {
            Ok(messages) => Ok(messages),
            Err(e) => {
                eprintln!(
                    "Warning: could not parse message store at {}: {}",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Read the file, erroring with `NotFound` when it is absent and
    /// propagating parse failures. Used by the delete paths, which must
    /// not silently rewrite a store they could not read.
    async fn read_strict(&self) -> Result<Vec<ContactMessage>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound)
            }
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_back(&self, messages: &[ContactMessage]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(messages)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
