//! # persist-core
//!
//! Persistent application state as a typed value tree, addressed by a small
//! path language and stored in a compact MessagePack encoding.
//!
//! A [`State`] is a scalar, a container ([`ListState`], [`ObjectState`]) or a
//! numeric composite (vectors and quaternions) that answers both to field
//! names and to indices. [`Path`]s such as `player.inventory[2].name` read
//! and write nodes deep inside a tree, and the codec turns whole trees into
//! bytes and back.
//!
//! ## Quick start
//!
//! ```rust
//! use persist_core::{decode, encode, ObjectState, State};
//!
//! let mut root = State::Object(ObjectState::from_iter([
//!     ("name", State::string("Hero")),
//!     ("position", State::vector3(1.0, 2.0, 3.0)),
//! ]));
//! root.set_at_path("position.z", State::float(9.0)).unwrap();
//!
//! let bytes = encode(&root).unwrap();
//! let back = decode(&bytes).unwrap();
//! assert_eq!(back.get_at_path::<f32>("position[2]").unwrap(), Some(9.0));
//! ```
//!
//! ## Modules
//!
//! - [`state`]: the `State` enum, `StateKind`, typed downcasts
//! - [`list`] / [`object`]: container states
//! - [`composite`]: dual-view vectors and quaternions
//! - [`path`]: path parsing and evaluation
//! - [`query`]: typed path reads and writes on `State`
//! - [`encoder`] / [`decoder`] / [`codes`]: binary codec
//! - [`json`]: JSON bridge for tooling
//! - [`adapter`] / [`persistence`] / [`config`]: file storage
//! - [`persistable`]: object mapping traits
//! - [`error`]: error types

pub mod adapter;
pub mod codes;
pub mod composite;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod list;
pub mod object;
pub mod path;
pub mod persistable;
pub mod persistence;
pub mod query;
pub mod state;

pub use adapter::{Adapter, LocalAdapter, MemoryAdapter};
pub use composite::Composite;
pub use config::LocalAdapterConfig;
pub use decoder::decode;
pub use encoder::{encode, encode_into};
pub use error::{PersistError, Result};
pub use json::{from_json, from_json_str, to_json, to_json_pretty};
pub use list::ListState;
pub use object::ObjectState;
pub use path::{AsPath, Path, PathKey};
pub use persistable::{deserialize_map, serialize_map, Deserializable, Persistable, Serializable};
pub use persistence::{FileRef, Persistence, PersistenceEvent};
pub use state::{Shape, State, StateKind, StateVariant};
