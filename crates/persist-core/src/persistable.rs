//! Mapping application objects to and from state trees.
//!
//! Types opt in by implementing [`Serializable`] and [`Deserializable`]. The
//! optional context parameter `C` carries whatever the mapping needs beyond
//! the object itself (an asset registry, a schema version, ...); it defaults
//! to `()`.
//!
//! Deserialization updates an existing value in place, so fields missing from
//! an older save keep their current values.

use crate::error::Result;
use crate::object::ObjectState;
use crate::state::State;

pub trait Serializable<C = ()> {
    fn serialize(&self, context: &C) -> State;
}

pub trait Deserializable<C = ()> {
    fn deserialize(&mut self, state: &State, context: &C) -> Result<()>;
}

/// Both directions of the mapping. Implemented automatically.
pub trait Persistable<C = ()>: Serializable<C> + Deserializable<C> {}

impl<C, T: Serializable<C> + Deserializable<C>> Persistable<C> for T {}

/// Serialize every value of a string-keyed collection into one object,
/// keyed the same way.
pub fn serialize_map<'a, C, K, T, I>(entries: I, context: &C) -> ObjectState
where
    I: IntoIterator<Item = (K, &'a T)>,
    K: Into<String>,
    T: Serializable<C> + 'a,
{
    entries
        .into_iter()
        .map(|(key, value)| (key, value.serialize(context)))
        .collect()
}

/// Deserialize each value of a string-keyed collection from the field with
/// the same key. Keys the object does not contain are skipped.
pub fn deserialize_map<'a, C, K, T, I>(entries: I, state: &ObjectState, context: &C) -> Result<()>
where
    I: IntoIterator<Item = (K, &'a mut T)>,
    K: AsRef<str>,
    T: Deserializable<C> + 'a,
{
    for (key, value) in entries {
        if let Some(field) = state.get::<State>(key.as_ref()) {
            value.deserialize(field, context)?;
        }
    }
    Ok(())
}
