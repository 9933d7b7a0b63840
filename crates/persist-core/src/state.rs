//! The `State` tree: a closed tagged union over every persistable value.
//!
//! A state is either a scalar (`Bool`, `Int`, `Long`, `Float`, `Double`,
//! `String`), a container (`List`, `Object`) that exclusively owns its
//! children, or a fixed-shape numeric composite (`Vector2`, `Vector3`,
//! `Vector2Int`, `Vector3Int`, `Quaternion`). Composites are both list-shaped
//! and object-shaped; see [`crate::composite`].
//!
//! Typed reads go through [`StateVariant`], which maps a Rust type to exactly
//! one variant. There is no implicit conversion between variants: an `Int`
//! never reads as a `Long` and a `Float` never reads as a `Double`.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use glam::{IVec2, IVec3, Quat, Vec2, Vec3};

use crate::composite::Composite;
use crate::error::{PersistError, Result};
use crate::list::ListState;
use crate::object::ObjectState;

/// A node of the persistent value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum State {
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    List(ListState),
    Object(ObjectState),
    Vector2(Vec2),
    Vector3(Vec3),
    Vector2Int(IVec2),
    Vector3Int(IVec3),
    Quaternion(Quat),
}

/// The discriminant of a [`State`], used in error messages and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Bool,
    Int,
    Long,
    Float,
    Double,
    String,
    List,
    Object,
    Vector2,
    Vector3,
    Vector2Int,
    Vector3Int,
    Quaternion,
}

impl StateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateKind::Bool => "bool",
            StateKind::Int => "int",
            StateKind::Long => "long",
            StateKind::Float => "float",
            StateKind::Double => "double",
            StateKind::String => "string",
            StateKind::List => "list",
            StateKind::Object => "object",
            StateKind::Vector2 => "vector2",
            StateKind::Vector3 => "vector3",
            StateKind::Vector2Int => "vector2int",
            StateKind::Vector3Int => "vector3int",
            StateKind::Quaternion => "quaternion",
        }
    }

    /// The container shape of states of this kind.
    pub fn shape(&self) -> Shape {
        match self {
            StateKind::List => Shape::List,
            StateKind::Object => Shape::Object,
            StateKind::Vector2
            | StateKind::Vector3
            | StateKind::Vector2Int
            | StateKind::Vector3Int
            | StateKind::Quaternion => Shape::Composite,
            _ => Shape::Scalar,
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which path segments may address a node.
///
/// `Composite` nodes answer to both `.name` and `[n]` segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Scalar,
    List,
    Object,
    Composite,
}

impl Shape {
    pub fn is_list_like(&self) -> bool {
        matches!(self, Shape::List | Shape::Composite)
    }

    pub fn is_object_like(&self) -> bool {
        matches!(self, Shape::Object | Shape::Composite)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Scalar => "scalar",
            Shape::List => "list",
            Shape::Object => "object",
            Shape::Composite => "composite",
        })
    }
}

/// Expands `$body` once per composite variant with `$c` bound to the payload.
macro_rules! match_composite {
    ($state:expr, $c:ident => $body:expr, _ => $other:expr) => {
        match $state {
            State::Vector2($c) => $body,
            State::Vector3($c) => $body,
            State::Vector2Int($c) => $body,
            State::Vector3Int($c) => $body,
            State::Quaternion($c) => $body,
            _ => $other,
        }
    };
}

impl State {
    pub fn bool(value: bool) -> Self {
        State::Bool(value)
    }

    pub fn int(value: i32) -> Self {
        State::Int(value)
    }

    pub fn long(value: i64) -> Self {
        State::Long(value)
    }

    pub fn float(value: f32) -> Self {
        State::Float(value)
    }

    pub fn double(value: f64) -> Self {
        State::Double(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        State::String(value.into())
    }

    pub fn vector2(x: f32, y: f32) -> Self {
        State::Vector2(Vec2::new(x, y))
    }

    pub fn vector3(x: f32, y: f32, z: f32) -> Self {
        State::Vector3(Vec3::new(x, y, z))
    }

    pub fn vector2_int(x: i32, y: i32) -> Self {
        State::Vector2Int(IVec2::new(x, y))
    }

    pub fn vector3_int(x: i32, y: i32, z: i32) -> Self {
        State::Vector3Int(IVec3::new(x, y, z))
    }

    /// Component-wise quaternion; the value is stored as given, not normalized.
    pub fn quaternion(x: f32, y: f32, z: f32, w: f32) -> Self {
        State::Quaternion(Quat::from_xyzw(x, y, z, w))
    }

    pub fn list() -> Self {
        State::List(ListState::new())
    }

    pub fn object() -> Self {
        State::Object(ObjectState::new())
    }

    /// Store an enum-like value by its display name.
    pub fn from_enum<T: fmt::Display>(value: &T) -> Self {
        State::String(value.to_string())
    }

    /// Parse a string state back into an enum-like value, falling back to
    /// `default` when the state is not a string or does not parse.
    pub fn to_enum<T: FromStr>(&self, default: T) -> T {
        match self {
            State::String(s) => s.parse().unwrap_or(default),
            _ => default,
        }
    }

    pub fn kind(&self) -> StateKind {
        match self {
            State::Bool(_) => StateKind::Bool,
            State::Int(_) => StateKind::Int,
            State::Long(_) => StateKind::Long,
            State::Float(_) => StateKind::Float,
            State::Double(_) => StateKind::Double,
            State::String(_) => StateKind::String,
            State::List(_) => StateKind::List,
            State::Object(_) => StateKind::Object,
            State::Vector2(_) => StateKind::Vector2,
            State::Vector3(_) => StateKind::Vector3,
            State::Vector2Int(_) => StateKind::Vector2Int,
            State::Vector3Int(_) => StateKind::Vector3Int,
            State::Quaternion(_) => StateKind::Quaternion,
        }
    }

    pub fn shape(&self) -> Shape {
        self.kind().shape()
    }

    /// Typed view of this state; `None` if it holds a different variant.
    pub fn cast<T: StateVariant>(&self) -> Option<&T> {
        T::cast(self)
    }

    pub fn cast_mut<T: StateVariant>(&mut self) -> Option<&mut T> {
        T::cast_mut(self)
    }

    pub fn as_list(&self) -> Option<&ListState> {
        self.cast()
    }

    pub fn as_list_mut(&mut self) -> Option<&mut ListState> {
        self.cast_mut()
    }

    pub fn as_object(&self) -> Option<&ObjectState> {
        self.cast()
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectState> {
        self.cast_mut()
    }

    /// Read the item at `index` through the list view.
    ///
    /// Lists return a borrowed child; composites produce their slot value.
    /// `Ok(None)` means the index is out of range.
    pub fn item(&self, index: usize) -> Result<Option<Cow<'_, State>>> {
        if let State::List(list) = self {
            return Ok(list.get::<State>(index).map(Cow::Borrowed));
        }
        match_composite!(self, c => Ok(c.slot(index).map(Cow::Owned)), _ => Err(PersistError::Shape {
            operation: "index an item",
            found: self.kind(),
        }))
    }

    /// Replace the item at `index` through the list view.
    ///
    /// Lists fail with [`PersistError::OutOfBounds`] for a missing index.
    /// Composites ignore out-of-range indices and values of the wrong variant.
    pub fn set_item(&mut self, index: usize, value: State) -> Result<()> {
        if let State::List(list) = self {
            return list.set(index, value);
        }
        let kind = self.kind();
        match_composite!(self, c => {
            c.set_slot(index, &value);
            Ok(())
        }, _ => Err(PersistError::Shape {
            operation: "set an item",
            found: kind,
        }))
    }

    /// Read the field `name` through the object view.
    ///
    /// `Ok(None)` means the object has no such field.
    pub fn field(&self, name: &str) -> Result<Option<Cow<'_, State>>> {
        if let State::Object(object) = self {
            return Ok(object.get::<State>(name).map(Cow::Borrowed));
        }
        match_composite!(self, c => Ok(c.field(name).map(Cow::Owned)), _ => Err(PersistError::Shape {
            operation: "access a field",
            found: self.kind(),
        }))
    }

    /// Upsert the field `name` through the object view.
    ///
    /// Composites ignore unknown names and values of the wrong variant.
    pub fn set_field(&mut self, name: &str, value: State) -> Result<()> {
        if let State::Object(object) = self {
            object.set(name, value);
            return Ok(());
        }
        let kind = self.kind();
        match_composite!(self, c => {
            c.set_field(name, &value);
            Ok(())
        }, _ => Err(PersistError::Shape {
            operation: "set a field",
            found: kind,
        }))
    }

    /// All items of the list view, in order. Empty for non-list-like states.
    pub fn items(&self) -> Vec<Cow<'_, State>> {
        if let State::List(list) = self {
            return list.iter().map(Cow::Borrowed).collect();
        }
        match_composite!(self, c => c.slots().into_iter().map(Cow::Owned).collect(), _ => Vec::new())
    }

    /// All `(name, value)` pairs of the object view. Empty for non-object-like states.
    pub fn fields(&self) -> Vec<(Cow<'_, str>, Cow<'_, State>)> {
        if let State::Object(object) = self {
            return object
                .iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), Cow::Borrowed(v)))
                .collect();
        }
        match_composite!(self, c => c
            .named_slots()
            .into_iter()
            .map(|(k, v)| (Cow::Borrowed(k), Cow::Owned(v)))
            .collect(), _ => Vec::new())
    }
}

/// A Rust type that corresponds to exactly one [`State`] variant.
///
/// Implemented for the payload type of every variant, plus `State` itself
/// (which matches anything).
pub trait StateVariant: Sized {
    /// Human-readable variant name, used in type-mismatch errors.
    const NAME: &'static str;

    fn cast(state: &State) -> Option<&Self>;

    fn cast_mut(state: &mut State) -> Option<&mut Self>;

    /// Unwrap an owned state, handing it back unchanged on a variant mismatch.
    fn take(state: State) -> std::result::Result<Self, State>;
}

impl StateVariant for State {
    const NAME: &'static str = "state";

    fn cast(state: &State) -> Option<&Self> {
        Some(state)
    }

    fn cast_mut(state: &mut State) -> Option<&mut Self> {
        Some(state)
    }

    fn take(state: State) -> std::result::Result<Self, State> {
        Ok(state)
    }
}

macro_rules! state_variant {
    ($($ty:ty => $variant:ident, $name:literal;)*) => {
        $(
            impl StateVariant for $ty {
                const NAME: &'static str = $name;

                fn cast(state: &State) -> Option<&Self> {
                    match state {
                        State::$variant(value) => Some(value),
                        _ => None,
                    }
                }

                fn cast_mut(state: &mut State) -> Option<&mut Self> {
                    match state {
                        State::$variant(value) => Some(value),
                        _ => None,
                    }
                }

                fn take(state: State) -> std::result::Result<Self, State> {
                    match state {
                        State::$variant(value) => Ok(value),
                        other => Err(other),
                    }
                }
            }

            impl From<$ty> for State {
                fn from(value: $ty) -> Self {
                    State::$variant(value)
                }
            }
        )*
    };
}

state_variant! {
    bool => Bool, "bool";
    i32 => Int, "int";
    i64 => Long, "long";
    f32 => Float, "float";
    f64 => Double, "double";
    String => String, "string";
    ListState => List, "list";
    ObjectState => Object, "object";
    Vec2 => Vector2, "vector2";
    Vec3 => Vector3, "vector3";
    IVec2 => Vector2Int, "vector2int";
    IVec3 => Vector3Int, "vector3int";
    Quat => Quaternion, "quaternion";
}

impl From<&str> for State {
    fn from(value: &str) -> Self {
        State::String(value.to_string())
    }
}
