//! Typed, path-addressed reads and writes on a [`State`] tree.
//!
//! These combine [`Path`](crate::path::Path) evaluation with the typed
//! accessors of [`ListState`](crate::ListState) and
//! [`ObjectState`](crate::ObjectState). Every method accepts either a parsed
//! path or path text; text that fails to parse is always reported as
//! [`PersistError::PathFormat`], even from the `try_` variants.
//!
//! ```
//! use persist_core::{ListState, ObjectState, State};
//!
//! let mut root = State::Object(ObjectState::from_iter([
//!     ("name", State::string("Hero")),
//!     ("position", State::vector3(1.0, 2.0, 3.0)),
//!     ("inventory", State::List(ListState::from_iter([State::int(10), State::int(20)]))),
//! ]));
//!
//! assert_eq!(root.get_at_path::<i32>("inventory[1]").unwrap(), Some(20));
//! root.set_at_path("position.y", State::float(5.0)).unwrap();
//! assert_eq!(root.get_at_path::<f32>("position[1]").unwrap(), Some(5.0));
//! ```

use std::borrow::Cow;

use crate::error::Result;
use crate::path::AsPath;
use crate::state::{State, StateVariant};

fn cast_owned<T: StateVariant + Clone>(state: &State) -> Option<T> {
    T::cast(state).cloned()
}

impl State {
    /// The node at `path`, borrowed where possible.
    pub fn at_path(&self, path: impl AsPath) -> Result<Cow<'_, State>> {
        path.as_path()?.get(self)
    }

    /// The node at `path` as a `T`.
    ///
    /// Evaluation errors propagate. A node of a different variant is
    /// `Ok(None)`, not an error.
    pub fn get_at_path<T: StateVariant + Clone>(&self, path: impl AsPath) -> Result<Option<T>> {
        let node = self.at_path(path)?;
        Ok(cast_owned(&node))
    }

    /// Like [`get_at_path`](Self::get_at_path), but evaluation errors
    /// (shape mismatch, undefined field or item) become `Ok(None)`.
    pub fn try_get_at_path<T: StateVariant + Clone>(
        &self,
        path: impl AsPath,
    ) -> Result<Option<T>> {
        let path = path.as_path()?;
        match path.get(self) {
            Ok(node) => Ok(cast_owned(&node)),
            Err(err) if err.is_evaluation() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Store `value` at `path`. See [`Path::set`](crate::path::Path::set).
    pub fn set_at_path(&mut self, path: impl AsPath, value: impl Into<State>) -> Result<()> {
        path.as_path()?.set(self, value.into())
    }

    /// Like [`set_at_path`](Self::set_at_path), but evaluation errors become
    /// `Ok(false)`. Out-of-bounds list writes still fail.
    pub fn try_set_at_path(&mut self, path: impl AsPath, value: impl Into<State>) -> Result<bool> {
        let path = path.as_path()?;
        match path.set(self, value.into()) {
            Ok(()) => Ok(true),
            Err(err) if err.is_evaluation() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Items of type `T` in the list (or composite) at `path`.
    ///
    /// A node without a list view yields no items.
    pub fn get_all_items_at_path<T: StateVariant + Clone>(
        &self,
        path: impl AsPath,
    ) -> Result<Vec<T>> {
        self.get_all_items_at_path_where(path, |_: &T| true)
    }

    pub fn get_all_items_at_path_where<T, P>(
        &self,
        path: impl AsPath,
        mut predicate: P,
    ) -> Result<Vec<T>>
    where
        T: StateVariant + Clone,
        P: FnMut(&T) -> bool,
    {
        let node = self.at_path(path)?;
        Ok(node
            .items()
            .iter()
            .filter_map(|item| cast_owned::<T>(item))
            .filter(|item| predicate(item))
            .collect())
    }

    /// `(name, value)` pairs of type `T` in the object (or composite) at `path`.
    ///
    /// A node without an object view yields no fields.
    pub fn get_all_fields_at_path<T: StateVariant + Clone>(
        &self,
        path: impl AsPath,
    ) -> Result<Vec<(String, T)>> {
        self.get_all_fields_at_path_where(path, |_: &T| true)
    }

    pub fn get_all_fields_at_path_where<T, P>(
        &self,
        path: impl AsPath,
        mut predicate: P,
    ) -> Result<Vec<(String, T)>>
    where
        T: StateVariant + Clone,
        P: FnMut(&T) -> bool,
    {
        let node = self.at_path(path)?;
        Ok(node
            .fields()
            .iter()
            .filter_map(|(name, value)| cast_owned::<T>(value).map(|value| (name.to_string(), value)))
            .filter(|(_, value)| predicate(value))
            .collect())
    }

    pub fn get_all_keys_at_path<T: StateVariant + Clone>(
        &self,
        path: impl AsPath,
    ) -> Result<Vec<String>> {
        self.get_all_keys_at_path_where(path, |_: &T| true)
    }

    pub fn get_all_keys_at_path_where<T, P>(&self, path: impl AsPath, predicate: P) -> Result<Vec<String>>
    where
        T: StateVariant + Clone,
        P: FnMut(&T) -> bool,
    {
        let fields = self.get_all_fields_at_path_where(path, predicate)?;
        Ok(fields.into_iter().map(|(name, _)| name).collect())
    }

    pub fn get_all_values_at_path<T: StateVariant + Clone>(
        &self,
        path: impl AsPath,
    ) -> Result<Vec<T>> {
        self.get_all_values_at_path_where(path, |_: &T| true)
    }

    pub fn get_all_values_at_path_where<T, P>(&self, path: impl AsPath, predicate: P) -> Result<Vec<T>>
    where
        T: StateVariant + Clone,
        P: FnMut(&T) -> bool,
    {
        let fields = self.get_all_fields_at_path_where(path, predicate)?;
        Ok(fields.into_iter().map(|(_, value)| value).collect())
    }
}
