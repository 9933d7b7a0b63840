//! Error types for state tree, path, codec, and storage operations.

use crate::state::{Shape, StateKind};
use thiserror::Error;

/// Errors that can occur while manipulating, addressing, encoding, or storing states.
#[derive(Error, Debug)]
pub enum PersistError {
    /// The path text was malformed. `position` is the 0-based character offset.
    #[error("Path format error at position {position}: {message}")]
    PathFormat { position: usize, message: String },

    /// A path segment addressed a node of the wrong shape.
    #[error("Path evaluation error: expected {expected} state but found {found}")]
    ShapeMismatch { expected: Shape, found: StateKind },

    /// A field segment named a key the object does not contain.
    #[error("Path evaluation error: undefined field with name {0:?}")]
    UndefinedField(String),

    /// An index segment addressed an item the list does not contain.
    #[error("Path evaluation error: undefined item with index {0}")]
    UndefinedItem(usize),

    /// A list operation was called with an index outside the list.
    #[error("Index {index} is out of bounds for a list of length {len}")]
    OutOfBounds { index: usize, len: usize },

    /// A list operation was called on a non-list node, or vice versa.
    #[error("Cannot {operation} on a {found} state")]
    Shape {
        operation: &'static str,
        found: StateKind,
    },

    /// The state could not be encoded.
    #[error("Could not serialize the data: {0}")]
    Encode(String),

    /// The byte buffer was not a valid encoded state.
    /// Includes the byte offset where the error was detected.
    #[error("Could not deserialize the data at offset {offset}: {message}")]
    Decode { offset: usize, message: String },

    /// An extension block carried a type code no composite is registered for.
    #[error("Could not deserialize the data at offset {offset}: unsupported extension type {type_code}")]
    UnknownExtension { offset: usize, type_code: i8 },

    /// A JSON document could not be converted to or from a state.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON value has no state counterpart.
    #[error("Unsupported JSON value: {0}")]
    UnsupportedJson(String),

    /// A stored root state did not have the requested type.
    #[error("Could not cast the state: expected state of type {expected} but got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: StateKind,
    },

    #[error("Could not find a registered adapter with name {0}")]
    AdapterNotFound(String),

    #[error("Could not find an enabled registered adapter")]
    NoEnabledAdapter,

    #[error("File \"{0}\" does not exist")]
    FileNotFound(String),

    /// An adapter failed to access its backing store.
    #[error("Could not {operation} file \"{path}\": {source}")]
    Io {
        operation: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PersistError {
    /// Whether this error came from evaluating a path against a tree
    /// (shape mismatch or undefined field/item). The `try_*` path helpers
    /// swallow exactly these.
    pub fn is_evaluation(&self) -> bool {
        matches!(
            self,
            PersistError::ShapeMismatch { .. }
                | PersistError::UndefinedField(_)
                | PersistError::UndefinedItem(_)
        )
    }

    /// Whether this error was raised while parsing path text or decoding bytes.
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            PersistError::PathFormat { .. }
                | PersistError::Decode { .. }
                | PersistError::UnknownExtension { .. }
        )
    }
}

/// Convenience alias used throughout persist-core.
pub type Result<T> = std::result::Result<T, PersistError>;
