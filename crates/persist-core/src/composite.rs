//! Fixed-shape numeric composites with two views over one set of fields.
//!
//! Every composite answers to an object view (`x`, `y`, `z`, `w` by name) and
//! a list view (`0`, `1`, `2`, `3` by position). Both views are thin adapters
//! over the same slot accessors, so there is only ever one copy of each
//! component.
//!
//! Writes through either view only accept the composite's component variant
//! (`Float` for float composites, `Int` for integer composites). Any other
//! value, an unknown name, or an out-of-range index leaves the composite
//! untouched.

use glam::{IVec2, IVec3, Quat, Vec2, Vec3};

use crate::state::{State, StateKind};

/// A numeric composite stored inline in a [`State`].
pub trait Composite: Copy {
    const KIND: StateKind;

    /// Component names in declared (and wire) order.
    const FIELDS: &'static [&'static str];

    /// The component at `index` as a state, or `None` past the last component.
    fn slot(&self, index: usize) -> Option<State>;

    /// Overwrite the component at `index`. Returns whether the write applied.
    fn set_slot(&mut self, index: usize, value: &State) -> bool;

    fn len(&self) -> usize {
        Self::FIELDS.len()
    }

    fn field_index(name: &str) -> Option<usize> {
        Self::FIELDS.iter().position(|field| *field == name)
    }

    fn field(&self, name: &str) -> Option<State> {
        Self::field_index(name).and_then(|index| self.slot(index))
    }

    fn set_field(&mut self, name: &str, value: &State) -> bool {
        match Self::field_index(name) {
            Some(index) => self.set_slot(index, value),
            None => false,
        }
    }

    fn slots(&self) -> Vec<State> {
        (0..self.len()).filter_map(|index| self.slot(index)).collect()
    }

    fn named_slots(&self) -> Vec<(&'static str, State)> {
        Self::FIELDS
            .iter()
            .enumerate()
            .filter_map(|(index, name)| self.slot(index).map(|value| (*name, value)))
            .collect()
    }
}

macro_rules! composite {
    ($ty:ty, $kind:ident, $variant:ident, [$($field:literal),+]) => {
        impl Composite for $ty {
            const KIND: StateKind = StateKind::$kind;
            const FIELDS: &'static [&'static str] = &[$($field),+];

            fn slot(&self, index: usize) -> Option<State> {
                self.to_array().get(index).map(|component| State::$variant(*component))
            }

            fn set_slot(&mut self, index: usize, value: &State) -> bool {
                let State::$variant(component) = value else {
                    return false;
                };
                let mut components = self.to_array();
                match components.get_mut(index) {
                    Some(slot) => {
                        *slot = *component;
                        *self = <$ty>::from_array(components);
                        true
                    }
                    None => false,
                }
            }
        }
    };
}

composite!(Vec2, Vector2, Float, ["x", "y"]);
composite!(Vec3, Vector3, Float, ["x", "y", "z"]);
composite!(IVec2, Vector2Int, Int, ["x", "y"]);
composite!(IVec3, Vector3Int, Int, ["x", "y", "z"]);
composite!(Quat, Quaternion, Float, ["x", "y", "z", "w"]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_share_backing_fields() {
        let mut v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.slot(0), Some(State::float(1.0)));
        assert_eq!(v.field("x"), Some(State::float(1.0)));

        assert!(v.set_field("y", &State::float(5.0)));
        assert_eq!(v.slot(1), Some(State::float(5.0)));

        assert!(v.set_slot(2, &State::float(9.0)));
        assert_eq!(v.field("z"), Some(State::float(9.0)));
        assert_eq!(v, Vec3::new(1.0, 5.0, 9.0));
    }

    #[test]
    fn wrong_variant_is_ignored() {
        let mut v = IVec2::new(4, 5);
        assert!(!v.set_field("x", &State::float(1.0)));
        assert!(!v.set_slot(1, &State::long(1)));
        assert!(!v.set_slot(7, &State::int(1)));
        assert!(!v.set_field("w", &State::int(1)));
        assert_eq!(v, IVec2::new(4, 5));
    }

    #[test]
    fn quaternion_fields_in_xyzw_order() {
        let q = Quat::from_xyzw(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q.len(), 4);
        assert_eq!(q.field("w"), Some(State::float(4.0)));
        assert_eq!(
            q.named_slots(),
            vec![
                ("x", State::float(1.0)),
                ("y", State::float(2.0)),
                ("z", State::float(3.0)),
                ("w", State::float(4.0)),
            ]
        );
    }

    #[test]
    fn integer_composite_slots_are_ints() {
        let v = IVec3::new(-1, 0, 1);
        assert_eq!(v.slots(), vec![State::int(-1), State::int(0), State::int(1)]);
        assert_eq!(v.slot(3), None);
    }
}
