//! The persistence facade: adapters, codec and events behind one API.
//!
//! [`Persistence`] owns a registry of [`Adapter`]s ordered by priority and
//! addresses files through [`FileRef`]s (adapter name plus path). Reads
//! decode the stored bytes and check the root variant; writes encode and
//! store. Every successful file operation is reported to subscribers as a
//! [`PersistenceEvent`].
//!
//! ```
//! use persist_core::{FileRef, MemoryAdapter, Persistence, ObjectState, State};
//!
//! let mut persistence = Persistence::new();
//! persistence.register(MemoryAdapter::new("memory"));
//!
//! let slot = FileRef::new("memory", "slot1");
//! let root = State::Object(ObjectState::from_iter([("level", State::int(3))]));
//! persistence.write(&slot, &root).unwrap();
//!
//! let loaded: ObjectState = persistence.read(&slot).unwrap();
//! assert_eq!(loaded.get::<i32>("level"), Some(&3));
//! ```

use std::fmt;

use crate::adapter::Adapter;
use crate::decoder::decode;
use crate::encoder::encode;
use crate::error::{PersistError, Result};
use crate::persistable::{Deserializable, Serializable};
use crate::state::{State, StateVariant};

/// A file addressed by adapter name and adapter-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileRef {
    pub adapter: String,
    pub path: String,
}

impl FileRef {
    pub fn new(adapter: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            adapter: adapter.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.adapter, self.path)
    }
}

/// A completed file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceEvent {
    Read(FileRef),
    Written(FileRef),
    Moved { from: FileRef, to: FileRef },
    Copied { from: FileRef, to: FileRef },
    Deleted(FileRef),
}

type Listener = Box<dyn Fn(&PersistenceEvent) + Send + Sync>;

/// Adapter registry plus encode/decode for whole save files.
#[derive(Default)]
pub struct Persistence {
    adapters: Vec<Box<dyn Adapter>>,
    listeners: Vec<Listener>,
}

impl fmt::Debug for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persistence")
            .field(
                "adapters",
                &self.adapters.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Persistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an adapter. Adapters stay sorted by priority; equal priorities
    /// keep registration order.
    pub fn register(&mut self, adapter: impl Adapter + 'static) {
        self.adapters.push(Box::new(adapter));
        self.adapters.sort_by_key(|adapter| adapter.priority());
    }

    pub fn with_adapter(mut self, adapter: impl Adapter + 'static) -> Self {
        self.register(adapter);
        self
    }

    /// Call `listener` after every successful file operation.
    pub fn subscribe(&mut self, listener: impl Fn(&PersistenceEvent) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&self, event: PersistenceEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }

    pub fn adapters(&self) -> impl Iterator<Item = &dyn Adapter> + '_ {
        self.adapters.iter().map(|adapter| adapter.as_ref())
    }

    pub fn enabled_adapters(&self) -> impl Iterator<Item = &dyn Adapter> + '_ {
        self.adapters().filter(|adapter| adapter.enabled())
    }

    pub fn adapter(&self, name: &str) -> Result<&dyn Adapter> {
        self.adapters()
            .find(|adapter| adapter.name() == name)
            .ok_or_else(|| PersistError::AdapterNotFound(name.to_string()))
    }

    pub fn first_enabled_adapter(&self) -> Result<&dyn Adapter> {
        self.enabled_adapters()
            .next()
            .ok_or(PersistError::NoEnabledAdapter)
    }

    /// `path` in the first enabled adapter.
    pub fn default_file(&self, path: impl Into<String>) -> Result<FileRef> {
        let adapter = self.first_enabled_adapter()?;
        Ok(FileRef::new(adapter.name(), path))
    }

    /// Files accepted by `predicate` across all adapters, in priority order.
    pub fn list(&self, predicate: impl Fn(&str) -> bool) -> Result<Vec<FileRef>> {
        let mut files = Vec::new();
        for adapter in self.adapters() {
            for path in adapter.list(&predicate)? {
                files.push(FileRef::new(adapter.name(), path));
            }
        }
        Ok(files)
    }

    pub fn exists(&self, file: &FileRef) -> Result<bool> {
        Ok(self.adapter(&file.adapter)?.exists(&file.path))
    }

    /// Read and decode `file`, requiring its root to be a `T`.
    ///
    /// Fails with [`PersistError::TypeMismatch`] when the root holds another
    /// variant; use `State` as `T` to accept any root.
    pub fn read<T: StateVariant>(&self, file: &FileRef) -> Result<T> {
        let data = self.adapter(&file.adapter)?.read(&file.path)?;
        let state = decode(&data)?;
        let found = state.kind();
        let value = T::take(state).map_err(|_| PersistError::TypeMismatch {
            expected: T::NAME,
            found,
        })?;
        tracing::debug!(file = %file, bytes = data.len(), "read file");
        self.emit(PersistenceEvent::Read(file.clone()));
        Ok(value)
    }

    /// Read `file` and apply it to an existing object.
    pub fn read_into<C, D: Deserializable<C>>(
        &self,
        file: &FileRef,
        target: &mut D,
        context: &C,
    ) -> Result<()> {
        let state: State = self.read(file)?;
        target.deserialize(&state, context)
    }

    /// Encode `state` and store it in `file`.
    pub fn write(&self, file: &FileRef, state: &State) -> Result<()> {
        let adapter = self.adapter(&file.adapter)?;
        let data = encode(state)?;
        adapter.write(&file.path, &data)?;
        tracing::debug!(file = %file, bytes = data.len(), "wrote file");
        self.emit(PersistenceEvent::Written(file.clone()));
        Ok(())
    }

    /// Serialize `source` and store it in `file`.
    pub fn write_from<C, S: Serializable<C>>(
        &self,
        file: &FileRef,
        source: &S,
        context: &C,
    ) -> Result<()> {
        self.write(file, &source.serialize(context))
    }

    /// Move `from` to `to`. Within one adapter this is a rename; across
    /// adapters the bytes are copied and the source deleted.
    pub fn move_file(&self, from: &FileRef, to: &FileRef) -> Result<()> {
        let source = self.adapter(&from.adapter)?;
        if from.adapter == to.adapter {
            source.move_to(&from.path, &to.path)?;
        } else {
            let destination = self.adapter(&to.adapter)?;
            let data = source.read(&from.path)?;
            destination.write(&to.path, &data)?;
            source.delete(&from.path)?;
        }
        tracing::debug!(from = %from, to = %to, "moved file");
        self.emit(PersistenceEvent::Moved {
            from: from.clone(),
            to: to.clone(),
        });
        Ok(())
    }

    /// Copy `from` to `to`, leaving the source in place.
    pub fn copy_file(&self, from: &FileRef, to: &FileRef) -> Result<()> {
        let source = self.adapter(&from.adapter)?;
        if from.adapter == to.adapter {
            source.copy_to(&from.path, &to.path)?;
        } else {
            let destination = self.adapter(&to.adapter)?;
            let data = source.read(&from.path)?;
            destination.write(&to.path, &data)?;
        }
        tracing::debug!(from = %from, to = %to, "copied file");
        self.emit(PersistenceEvent::Copied {
            from: from.clone(),
            to: to.clone(),
        });
        Ok(())
    }

    pub fn delete(&self, file: &FileRef) -> Result<()> {
        self.adapter(&file.adapter)?.delete(&file.path)?;
        tracing::debug!(file = %file, "deleted file");
        self.emit(PersistenceEvent::Deleted(file.clone()));
        Ok(())
    }
}
