//! Flat key → text storage behind the golden-master protocol.

use crate::error::{ApprovalError, ApprovalResult};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Storage for golden-master artifacts, addressed by file name.
pub trait GoldenStore {
    /// Make the store writable. Idempotent.
    fn ensure_ready(&self) -> ApprovalResult<()>;
    /// Whether an artifact exists under `key`.
    fn exists(&self, key: &str) -> ApprovalResult<bool>;
    /// Read an artifact as UTF-8 text.
    fn read(&self, key: &str) -> ApprovalResult<String>;
    /// Create or overwrite an artifact.
    fn write(&self, key: &str, content: &str) -> ApprovalResult<()>;
    /// Every key currently present, sorted.
    fn keys(&self) -> ApprovalResult<Vec<String>>;
    /// Human readable location of `key`, used in messages.
    fn location(&self, key: &str) -> String;
}

/// Artifacts stored as files in a single directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl GoldenStore for FsStore {
    fn ensure_ready(&self) -> ApprovalResult<()> {
        // One level only: a missing parent is the caller's configuration error.
        match fs::create_dir(&self.dir) {
            Ok(()) => {
                debug!(dir = %self.dir.display(), "created golden-master directory");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists && self.dir.is_dir() => Ok(()),
            Err(e) => Err(ApprovalError::io(self.dir.display().to_string(), e)),
        }
    }

    fn exists(&self, key: &str) -> ApprovalResult<bool> {
        let path = self.path(key);
        path.try_exists()
            .map_err(|e| ApprovalError::io(path.display().to_string(), e))
    }

    fn read(&self, key: &str) -> ApprovalResult<String> {
        let path = self.path(key);
        fs::read_to_string(&path).map_err(|e| ApprovalError::io(path.display().to_string(), e))
    }

    fn write(&self, key: &str, content: &str) -> ApprovalResult<()> {
        let path = self.path(key);
        fs::write(&path, content).map_err(|e| ApprovalError::io(path.display().to_string(), e))?;
        debug!(path = %path.display(), bytes = content.len(), "wrote artifact");
        Ok(())
    }

    fn keys(&self) -> ApprovalResult<Vec<String>> {
        let mut keys = Vec::new();
        if !self.dir.exists() {
            return Ok(keys);
        }

        let entries = fs::read_dir(&self.dir)
            .map_err(|e| ApprovalError::io(self.dir.display().to_string(), e))?;
        for entry in entries {
            let entry = entry.map_err(|e| ApprovalError::io(self.dir.display().to_string(), e))?;
            if !entry.path().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                keys.push(name.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn location(&self, key: &str) -> String {
        self.path(key).display().to_string()
    }
}

/// In-memory store, for exercising the protocol without touching disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    artifacts: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an artifact, e.g. a previously approved trace.
    pub fn with_artifact(self, key: impl Into<String>, content: impl Into<String>) -> Self {
        self.artifacts.borrow_mut().insert(key.into(), content.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.artifacts.borrow().get(key).cloned()
    }
}

impl GoldenStore for MemoryStore {
    fn ensure_ready(&self) -> ApprovalResult<()> {
        Ok(())
    }

    fn exists(&self, key: &str) -> ApprovalResult<bool> {
        Ok(self.artifacts.borrow().contains_key(key))
    }

    fn read(&self, key: &str) -> ApprovalResult<String> {
        self.get(key).ok_or_else(|| {
            ApprovalError::io(
                self.location(key),
                std::io::Error::new(ErrorKind::NotFound, "no such artifact"),
            )
        })
    }

    fn write(&self, key: &str, content: &str) -> ApprovalResult<()> {
        self.artifacts
            .borrow_mut()
            .insert(key.to_string(), content.to_string());
        Ok(())
    }

    fn keys(&self) -> ApprovalResult<Vec<String>> {
        Ok(self.artifacts.borrow().keys().cloned().collect())
    }

    fn location(&self, key: &str) -> String {
        format!("memory://{}", key)
    }
}
