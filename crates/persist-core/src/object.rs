//! Keyed mapping of unique string names to states.

use indexmap::IndexMap;

use crate::list::ListState;
use crate::state::{State, StateVariant};

/// An object state. Owns its field values exclusively.
///
/// Fields iterate in insertion order, but equality ignores order: two objects
/// are equal when they hold the same keys with equal values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectState {
    fields: IndexMap<String, State>,
}

impl ObjectState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, State> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, State> {
        self.fields.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &State> + '_ {
        self.fields.values()
    }

    /// The field `name` as a `T`, or `None` when absent or holding a
    /// different variant.
    pub fn get<T: StateVariant>(&self, name: &str) -> Option<&T> {
        self.fields.get(name).and_then(T::cast)
    }

    pub fn get_mut<T: StateVariant>(&mut self, name: &str) -> Option<&mut T> {
        self.fields.get_mut(name).and_then(T::cast_mut)
    }

    /// Like [`get`](Self::get) but falls back to `default`.
    pub fn get_or<T: StateVariant + Clone>(&self, name: &str, default: T) -> T {
        self.get(name).cloned().unwrap_or(default)
    }

    /// All `(name, value)` pairs whose value holds a `T`.
    pub fn get_all<'a, T: StateVariant + 'a>(&'a self) -> impl Iterator<Item = (&'a str, &'a T)> + 'a {
        self.fields
            .iter()
            .filter_map(|(name, value)| T::cast(value).map(|value| (name.as_str(), value)))
    }

    pub fn get_all_keys<'a, T: StateVariant + 'a>(&'a self) -> impl Iterator<Item = &'a str> + 'a {
        self.get_all::<T>().map(|(name, _)| name)
    }

    pub fn get_all_values<'a, T: StateVariant + 'a>(&'a self) -> impl Iterator<Item = &'a T> + 'a {
        self.get_all::<T>().map(|(_, value)| value)
    }

    pub fn get_all_where<'a, T, P>(
        &'a self,
        mut predicate: P,
    ) -> impl Iterator<Item = (&'a str, &'a T)> + 'a
    where
        T: StateVariant + 'a,
        P: FnMut(&T) -> bool + 'a,
    {
        self.get_all::<T>().filter(move |(_, value)| predicate(*value))
    }

    pub fn get_all_keys_where<'a, T, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a str> + 'a
    where
        T: StateVariant + 'a,
        P: FnMut(&T) -> bool + 'a,
    {
        self.get_all_where::<T, P>(predicate).map(|(name, _)| name)
    }

    pub fn get_all_values_where<'a, T, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a T> + 'a
    where
        T: StateVariant + 'a,
        P: FnMut(&T) -> bool + 'a,
    {
        self.get_all_where::<T, P>(predicate).map(|(_, value)| value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn contains_value(&self, state: &State) -> bool {
        self.fields.values().any(|value| value == state)
    }

    /// Insert or replace the field `name`, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, state: impl Into<State>) -> Option<State> {
        self.fields.insert(name.into(), state.into())
    }

    /// Set the field `name` to an empty list and return it.
    pub fn set_new_list(&mut self, name: impl Into<String>) -> &mut ListState {
        let slot = self.slot(name.into(), State::List(ListState::new()));
        match slot {
            State::List(list) => list,
            _ => unreachable!("field was just set to a list"),
        }
    }

    /// Set the field `name` to an empty object and return it.
    pub fn set_new_object(&mut self, name: impl Into<String>) -> &mut ObjectState {
        let slot = self.slot(name.into(), State::Object(ObjectState::new()));
        match slot {
            State::Object(object) => object,
            _ => unreachable!("field was just set to an object"),
        }
    }

    /// Remove the field `name`, keeping the order of the remaining fields.
    pub fn remove(&mut self, name: &str) -> Option<State> {
        self.fields.shift_remove(name)
    }

    fn slot(&mut self, name: String, state: State) -> &mut State {
        let entry = self.fields.entry(name);
        match entry {
            indexmap::map::Entry::Occupied(mut occupied) => {
                occupied.insert(state);
                occupied.into_mut()
            }
            indexmap::map::Entry::Vacant(vacant) => vacant.insert(state),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, State)> for ObjectState {
    fn from_iter<I: IntoIterator<Item = (K, State)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl IntoIterator for ObjectState {
    type Item = (String, State);
    type IntoIter = indexmap::map::IntoIter<String, State>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a ObjectState {
    type Item = (&'a String, &'a State);
    type IntoIter = indexmap::map::Iter<'a, String, State>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
