//! Path language for addressing nodes inside a [`State`] tree.
//!
//! # Grammar
//!
//! ```text
//! path    := ε | ident segment*
//! segment := "." ident | "[" digits "]"
//! ident   := (alphanumeric | "_" | "-")+
//! ```
//!
//! `player.inventory[2].name` reads the field `player` of the root object,
//! then its field `inventory`, then item 2 of that list, then the field
//! `name`. The empty path addresses the root itself.
//!
//! # Representation
//!
//! A parsed [`Path`] is an immutable chain of segments. Each segment holds
//! its key plus a shared pointer to its parent segment, so extending a path
//! with [`Path::field`] or [`Path::index`] reuses the parent chain instead of
//! copying it. Evaluation walks the chain outermost-first without recursion.
//!
//! # Errors
//!
//! Parsing fails with [`PersistError::PathFormat`] before any tree access.
//! Evaluation fails with [`PersistError::ShapeMismatch`] when a field segment
//! meets a non-object or an index segment meets a non-list, and with
//! [`PersistError::UndefinedField`] / [`PersistError::UndefinedItem`] when the
//! addressed child does not exist.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{PersistError, Result};
use crate::state::{Shape, State};

/// The key of a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathKey {
    /// `.name`: object field access.
    Field(String),
    /// `[n]`: list item access.
    Index(usize),
}

impl PathKey {
    /// The shape a node must have for this key to address into it.
    pub fn expected_shape(&self) -> Shape {
        match self {
            PathKey::Field(_) => Shape::Object,
            PathKey::Index(_) => Shape::List,
        }
    }
}

#[derive(Debug)]
struct Segment {
    parent: Option<Arc<Segment>>,
    key: PathKey,
}

impl Drop for Segment {
    // Unlink uniquely-owned ancestors one at a time so long chains do not
    // overflow the stack.
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(segment) = parent {
            match Arc::try_unwrap(segment) {
                Ok(mut segment) => parent = segment.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// A parsed, immutable address into a state tree.
#[derive(Clone, Default)]
pub struct Path {
    leaf: Option<Arc<Segment>>,
    len: usize,
}

impl Path {
    /// The empty path, which addresses the root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse path text. See the [module docs](self) for the grammar.
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input).parse()
    }

    /// This path extended with a field access.
    pub fn field(&self, name: impl Into<String>) -> Self {
        self.push(PathKey::Field(name.into()))
    }

    /// This path extended with an item access.
    ///
    /// Calling this on the root path yields a path that evaluates against a
    /// list root but has no textual form the parser accepts.
    pub fn index(&self, index: usize) -> Self {
        self.push(PathKey::Index(index))
    }

    fn push(&self, key: PathKey) -> Self {
        Self {
            leaf: Some(Arc::new(Segment {
                parent: self.leaf.clone(),
                key,
            })),
            len: self.len + 1,
        }
    }

    /// The path without its last segment, or `None` for the root path.
    pub fn parent(&self) -> Option<Self> {
        self.leaf.as_ref().map(|leaf| Self {
            leaf: leaf.parent.clone(),
            len: self.len - 1,
        })
    }

    /// The key of the last segment, or `None` for the root path.
    pub fn key(&self) -> Option<&PathKey> {
        self.leaf.as_deref().map(|segment| &segment.key)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Segment keys from the outermost (first) to the innermost (last).
    pub fn keys(&self) -> Vec<&PathKey> {
        let mut keys = Vec::with_capacity(self.len);
        let mut cursor = self.leaf.as_deref();
        while let Some(segment) = cursor {
            keys.push(&segment.key);
            cursor = segment.parent.as_deref();
        }
        keys.reverse();
        keys
    }

    /// Evaluate this path as a getter.
    ///
    /// Returns a borrow of the addressed node, or an owned value when the path
    /// ends on a component of a composite.
    pub fn get<'a>(&self, root: &'a State) -> Result<Cow<'a, State>> {
        tracing::trace!(path = %self, "evaluating path getter");
        let mut current = Cow::Borrowed(root);
        for key in self.keys() {
            current = match current {
                Cow::Borrowed(state) => lookup(state, key)?,
                Cow::Owned(state) => Cow::Owned(lookup(&state, key)?.into_owned()),
            };
        }
        Ok(current)
    }

    /// Evaluate this path as a setter, storing `value` at the addressed slot.
    ///
    /// The parent chain is evaluated like a getter; the last segment then
    /// upserts an object field or replaces a list item. Replacing a list item
    /// past the end fails with [`PersistError::OutOfBounds`]. The empty path
    /// replaces the root.
    pub fn set(&self, root: &mut State, value: State) -> Result<()> {
        tracing::trace!(path = %self, kind = %value.kind(), "evaluating path setter");
        let keys = self.keys();
        let Some((leaf, parents)) = keys.split_last() else {
            *root = value;
            return Ok(());
        };

        let container = resolve_mut(root, parents, leaf)?;
        let found = container.kind();
        let result = match leaf {
            PathKey::Field(name) => container.set_field(name, value),
            PathKey::Index(index) => container.set_item(*index, value),
        };
        result.map_err(|err| match err {
            PersistError::Shape { .. } => PersistError::ShapeMismatch {
                expected: leaf.expected_shape(),
                found,
            },
            other => other,
        })
    }
}

/// Apply one getter step.
fn lookup<'a>(state: &'a State, key: &PathKey) -> Result<Cow<'a, State>> {
    let child = match key {
        PathKey::Field(name) => state.field(name),
        PathKey::Index(index) => state.item(*index),
    };
    match child {
        Ok(Some(child)) => Ok(child),
        Ok(None) => Err(match key {
            PathKey::Field(name) => PersistError::UndefinedField(name.clone()),
            PathKey::Index(index) => PersistError::UndefinedItem(*index),
        }),
        Err(_) => Err(PersistError::ShapeMismatch {
            expected: key.expected_shape(),
            found: state.kind(),
        }),
    }
}

/// Walk `parents` mutably and return the node the `leaf` key applies to.
fn resolve_mut<'a>(
    root: &'a mut State,
    parents: &[&PathKey],
    leaf: &PathKey,
) -> Result<&'a mut State> {
    let mut current = root;
    for (depth, key) in parents.iter().enumerate() {
        current = match (current, *key) {
            (State::Object(object), PathKey::Field(name)) => object
                .get_mut::<State>(name)
                .ok_or_else(|| PersistError::UndefinedField(name.clone()))?,
            (State::List(list), PathKey::Index(index)) => list
                .get_mut::<State>(*index)
                .ok_or(PersistError::UndefinedItem(*index))?,
            (other, key) => {
                // Either a shape mismatch, or a composite component. Components
                // are scalars, so whatever key comes next cannot address into them.
                let component = lookup(other, key)?;
                let next = parents.get(depth + 1).copied().unwrap_or(leaf);
                return Err(PersistError::ShapeMismatch {
                    expected: next.expected_shape(),
                    found: component.kind(),
                });
            }
        };
    }
    Ok(current)
}

impl FromStr for Path {
    type Err = PersistError;

    fn from_str(s: &str) -> Result<Self> {
        Path::parse(s)
    }
}

impl TryFrom<&str> for Path {
    type Error = PersistError;

    fn try_from(value: &str) -> Result<Self> {
        Path::parse(value)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys().into_iter().enumerate() {
            match key {
                PathKey::Field(name) if i == 0 => f.write_str(name)?,
                PathKey::Field(name) => write!(f, ".{name}")?,
                PathKey::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({:?})", self.to_string())
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.keys() == other.keys()
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.keys().hash(state);
    }
}

/// Anything that can be turned into a [`Path`]: parsed paths, or path text.
pub trait AsPath {
    fn as_path(&self) -> Result<Cow<'_, Path>>;
}

impl AsPath for Path {
    fn as_path(&self) -> Result<Cow<'_, Path>> {
        Ok(Cow::Borrowed(self))
    }
}

impl AsPath for str {
    fn as_path(&self) -> Result<Cow<'_, Path>> {
        Path::parse(self).map(Cow::Owned)
    }
}

impl AsPath for String {
    fn as_path(&self) -> Result<Cow<'_, Path>> {
        Path::parse(self).map(Cow::Owned)
    }
}

impl<T: AsPath + ?Sized> AsPath for &T {
    fn as_path(&self) -> Result<Cow<'_, Path>> {
        (**self).as_path()
    }
}

/// Single-pass scanner over the path text. Positions are character offsets.
struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    fn parse(mut self) -> Result<Path> {
        let mut path = Path::root();
        while let Some(&next) = self.chars.peek() {
            if self.position == 0 {
                path = path.field(self.identifier()?);
            } else if next == '.' {
                self.bump();
                path = path.field(self.identifier()?);
            } else if next == '[' {
                self.bump();
                path = path.index(self.index()?);
            } else {
                return Err(self.error(format!("found invalid character {next:?}")));
            }
        }
        Ok(path)
    }

    fn bump(&mut self) -> Option<char> {
        let next = self.chars.next();
        if next.is_some() {
            self.position += 1;
        }
        next
    }

    fn identifier(&mut self) -> Result<String> {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if !is_identifier_char(c) {
                break;
            }
            name.push(c);
            self.bump();
        }
        if name.is_empty() {
            return Err(match self.chars.peek() {
                Some(&c) => self.error(format!("expected field name but found {c:?}")),
                None => self.error("expected field name but found end of path".to_string()),
            });
        }
        Ok(name)
    }

    fn index(&mut self) -> Result<usize> {
        let start = self.position;
        let mut digits = String::new();
        while let Some(&c) = self.chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            self.bump();
        }
        if digits.is_empty() {
            return Err(match self.chars.peek() {
                Some(&c) => self.error(format!("expected index but found {c:?}")),
                None => self.error("unterminated '[': expected index".to_string()),
            });
        }
        let index = digits.parse::<usize>().map_err(|_| PersistError::PathFormat {
            position: start,
            message: format!("index {digits} is too large"),
        })?;
        match self.bump() {
            Some(']') => Ok(index),
            Some(c) => Err(PersistError::PathFormat {
                position: self.position - 1,
                message: format!("expected ']' but found {c:?}"),
            }),
            None => Err(self.error("unterminated '[': expected ']'".to_string())),
        }
    }

    fn error(&self, message: String) -> PersistError {
        PersistError::PathFormat {
            position: self.position,
            message,
        }
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}
