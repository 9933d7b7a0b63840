//! Ordered sequence of states.

use crate::error::{PersistError, Result};
use crate::object::ObjectState;
use crate::state::{State, StateVariant};

/// A list state. Owns its items exclusively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    items: Vec<State>,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, State> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, State> {
        self.items.iter_mut()
    }

    /// The item at `index` as a `T`, or `None` when the index is out of range
    /// or the item holds a different variant.
    pub fn get<T: StateVariant>(&self, index: usize) -> Option<&T> {
        self.items.get(index).and_then(T::cast)
    }

    pub fn get_mut<T: StateVariant>(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index).and_then(T::cast_mut)
    }

    /// Like [`get`](Self::get) but falls back to `default`.
    pub fn get_or<T: StateVariant + Clone>(&self, index: usize, default: T) -> T {
        self.get(index).cloned().unwrap_or(default)
    }

    /// All items holding a `T`, in order.
    pub fn get_all<'a, T: StateVariant + 'a>(&'a self) -> impl Iterator<Item = &'a T> + 'a {
        self.items.iter().filter_map(T::cast)
    }

    /// All items holding a `T` that satisfy `predicate`, in order.
    pub fn get_all_where<'a, T, P>(&'a self, mut predicate: P) -> impl Iterator<Item = &'a T> + 'a
    where
        T: StateVariant + 'a,
        P: FnMut(&T) -> bool + 'a,
    {
        self.get_all::<T>().filter(move |item| predicate(*item))
    }

    pub fn contains(&self, state: &State) -> bool {
        self.items.contains(state)
    }

    /// Replace the item at `index`.
    ///
    /// Fails with [`PersistError::OutOfBounds`] if `index >= len()`; use
    /// [`add`](Self::add) to grow the list.
    pub fn set(&mut self, index: usize, state: impl Into<State>) -> Result<()> {
        let len = self.items.len();
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = state.into();
                Ok(())
            }
            None => Err(PersistError::OutOfBounds { index, len }),
        }
    }

    /// Replace the item at `index` with an empty list and return it.
    pub fn set_new_list(&mut self, index: usize) -> Result<&mut ListState> {
        self.set(index, ListState::new())?;
        Ok(self.expect_variant(index))
    }

    /// Replace the item at `index` with an empty object and return it.
    pub fn set_new_object(&mut self, index: usize) -> Result<&mut ObjectState> {
        self.set(index, ObjectState::new())?;
        Ok(self.expect_variant(index))
    }

    pub fn add(&mut self, state: impl Into<State>) {
        self.items.push(state.into());
    }

    /// Append an empty list and return it for further building.
    pub fn add_new_list(&mut self) -> &mut ListState {
        self.add(ListState::new());
        let index = self.items.len() - 1;
        self.expect_variant(index)
    }

    /// Append an empty object and return it for further building.
    pub fn add_new_object(&mut self) -> &mut ObjectState {
        self.add(ObjectState::new());
        let index = self.items.len() - 1;
        self.expect_variant(index)
    }

    /// Remove and return the item at `index`, shifting later items down.
    pub fn remove(&mut self, index: usize) -> Result<State> {
        if index < self.items.len() {
            Ok(self.items.remove(index))
        } else {
            Err(PersistError::OutOfBounds {
                index,
                len: self.items.len(),
            })
        }
    }

    // Only called right after storing a `T` at `index`.
    fn expect_variant<T: StateVariant>(&mut self, index: usize) -> &mut T {
        match self.items.get_mut(index).and_then(T::cast_mut) {
            Some(value) => value,
            None => unreachable!("item {index} was just set to a {}", T::NAME),
        }
    }
}

impl FromIterator<State> for ListState {
    fn from_iter<I: IntoIterator<Item = State>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<State>> for ListState {
    fn from(items: Vec<State>) -> Self {
        Self { items }
    }
}

impl IntoIterator for ListState {
    type Item = State;
    type IntoIter = std::vec::IntoIter<State>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ListState {
    type Item = &'a State;
    type IntoIter = std::slice::Iter<'a, State>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
