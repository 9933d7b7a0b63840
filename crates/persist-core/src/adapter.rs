//! Storage adapters: named places where encoded save files live.
//!
//! An adapter only moves opaque bytes around. Encoding and decoding happen in
//! [`Persistence`](crate::persistence::Persistence), so any backend that can
//! store a blob under a string key can implement [`Adapter`].
//!
//! File paths are `/`-separated and carry no extension; adapters add their
//! own suffix (see [`LocalAdapter`]).

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path as FsPath, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::config::LocalAdapterConfig;
use crate::error::{PersistError, Result};

/// Backend trait for storing encoded state files.
pub trait Adapter: Send + Sync {
    fn name(&self) -> &str;

    /// Registry order; lower values are consulted first.
    fn priority(&self) -> i32 {
        0
    }

    /// Whether the adapter can currently be used.
    fn enabled(&self) -> bool {
        true
    }

    /// Paths of the stored files accepted by `predicate`, sorted.
    fn list(&self, predicate: &dyn Fn(&str) -> bool) -> Result<Vec<String>>;

    fn exists(&self, path: &str) -> bool;

    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Create or overwrite the file at `path`.
    fn write(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Rename `path` to `destination`, replacing any file already there.
    fn move_to(&self, path: &str, destination: &str) -> Result<()>;

    /// Copy `path` to `destination`, replacing any file already there.
    fn copy_to(&self, path: &str, destination: &str) -> Result<()>;

    /// Remove the file at `path`. Removing a missing file is not an error.
    fn delete(&self, path: &str) -> Result<()>;
}

/// Adapter that keeps files in memory. Useful for tests and for scratch
/// slots that must not touch the disk.
#[derive(Debug)]
pub struct MemoryAdapter {
    name: String,
    priority: i32,
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            files: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn files(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.files.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn files_mut(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.files.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Adapter for MemoryAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn list(&self, predicate: &dyn Fn(&str) -> bool) -> Result<Vec<String>> {
        Ok(self
            .files()
            .keys()
            .filter(|path| predicate(path))
            .cloned()
            .collect())
    }

    fn exists(&self, path: &str) -> bool {
        self.files().contains_key(path)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.files()
            .get(path)
            .cloned()
            .ok_or_else(|| PersistError::FileNotFound(path.to_string()))
    }

    fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        self.files_mut().insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn move_to(&self, path: &str, destination: &str) -> Result<()> {
        let mut files = self.files_mut();
        let data = files
            .remove(path)
            .ok_or_else(|| PersistError::FileNotFound(path.to_string()))?;
        files.insert(destination.to_string(), data);
        Ok(())
    }

    fn copy_to(&self, path: &str, destination: &str) -> Result<()> {
        let mut files = self.files_mut();
        let data = files
            .get(path)
            .cloned()
            .ok_or_else(|| PersistError::FileNotFound(path.to_string()))?;
        files.insert(destination.to_string(), data);
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.files_mut().remove(path);
        Ok(())
    }
}

/// Adapter that stores each file as `<directory>/<path><extension>` on the
/// local filesystem.
#[derive(Debug, Clone)]
pub struct LocalAdapter {
    config: LocalAdapterConfig,
}

impl LocalAdapter {
    pub fn new(config: LocalAdapterConfig) -> Self {
        Self { config }
    }

    pub fn directory(&self) -> &FsPath {
        &self.config.directory
    }

    pub fn extension(&self) -> &str {
        &self.config.extension
    }

    /// The filesystem location backing `path`.
    pub fn file_path(&self, path: &str) -> PathBuf {
        self.config
            .directory
            .join(format!("{path}{}", self.config.extension))
    }

    fn io_err(operation: &'static str, path: &str) -> impl FnOnce(io::Error) -> PersistError {
        let path = path.to_string();
        move |source| {
            if source.kind() == io::ErrorKind::NotFound {
                PersistError::FileNotFound(path)
            } else {
                PersistError::Io {
                    operation,
                    path,
                    source,
                }
            }
        }
    }

    fn ensure_parent(&self, target: &FsPath, operation: &'static str, path: &str) -> Result<()> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| PersistError::Io {
                operation,
                path: path.to_string(),
                source,
            })?;
        }
        Ok(())
    }

    // Depth-first walk collecting `/`-joined relative paths of files that end
    // with the extension.
    fn collect_files(&self, dir: &FsPath, prefix: &str, out: &mut Vec<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            let relative = if prefix.is_empty() {
                file_name.to_string()
            } else {
                format!("{prefix}/{file_name}")
            };
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                self.collect_files(&entry.path(), &relative, out)?;
            } else if let Some(stem) = relative.strip_suffix(self.config.extension.as_str()) {
                if !stem.is_empty() && !stem.ends_with('/') {
                    out.push(stem.to_string());
                }
            }
        }
        Ok(())
    }
}

impl Adapter for LocalAdapter {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn priority(&self) -> i32 {
        self.config.priority
    }

    fn list(&self, predicate: &dyn Fn(&str) -> bool) -> Result<Vec<String>> {
        let dir = &self.config.directory;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        self.collect_files(dir, "", &mut files)
            .map_err(|source| PersistError::Io {
                operation: "list",
                path: dir.display().to_string(),
                source,
            })?;
        files.retain(|path| predicate(path));
        files.sort();
        Ok(files)
    }

    fn exists(&self, path: &str) -> bool {
        self.file_path(path).is_file()
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        fs::read(self.file_path(path)).map_err(Self::io_err("read", path))
    }

    fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let target = self.file_path(path);
        self.ensure_parent(&target, "write", path)?;
        fs::write(&target, data).map_err(Self::io_err("write", path))
    }

    fn move_to(&self, path: &str, destination: &str) -> Result<()> {
        let target = self.file_path(destination);
        self.ensure_parent(&target, "move", path)?;
        fs::rename(self.file_path(path), &target).map_err(Self::io_err("move", path))
    }

    fn copy_to(&self, path: &str, destination: &str) -> Result<()> {
        // fs::copy onto its own source truncates the file.
        if path == destination {
            return if self.exists(path) {
                Ok(())
            } else {
                Err(PersistError::FileNotFound(path.to_string()))
            };
        }
        let target = self.file_path(destination);
        self.ensure_parent(&target, "copy", path)?;
        fs::copy(self.file_path(path), &target)
            .map(|_| ())
            .map_err(Self::io_err("copy", path))
    }

    fn delete(&self, path: &str) -> Result<()> {
        match fs::remove_file(self.file_path(path)) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other.map_err(Self::io_err("delete", path)),
        }
    }
}
