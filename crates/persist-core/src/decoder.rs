//! State decoder: reads MessagePack bytes back into a [`State`] tree.
//!
//! Dispatch is on the marker byte of each value:
//!
//! - `int 64` / `uint 64` become `Long`; every narrower integer marker becomes
//!   `Int` (values that do not fit in an `i32` are rejected).
//! - `float 64` becomes `Double`, `float 32` becomes `Float`.
//! - `str`, `array` and `map` become `String`, `List` and `Object`. Map keys
//!   must be strings.
//! - `ext` blocks are looked up in [`crate::codes`]; an unregistered type code
//!   fails with [`PersistError::UnknownExtension`]. Integer components may use
//!   any integer marker that fits an `i32`, so compact payloads written by
//!   other MessagePack writers still load.
//!
//! # Key design decisions
//!
//! - **Offsets in errors**: the reader tracks its absolute position, including
//!   inside extension payloads, so every error names the byte where decoding
//!   stopped.
//! - **Strict framing**: trailing bytes after the root value and extension
//!   payloads that are not consumed exactly are errors, not ignored.
//! - **Bounded nesting**: containers deeper than [`MAX_DEPTH`] are rejected
//!   instead of recursing without limit on hostile input.

use std::fmt::Display;

use glam::{IVec2, IVec3, Quat, Vec2, Vec3};
use rmp::decode;
use rmp::Marker;

use crate::codes;
use crate::encoder::MAX_DEPTH;
use crate::error::{PersistError, Result};
use crate::list::ListState;
use crate::object::ObjectState;
use crate::state::{State, StateKind};

/// Decode a complete byte buffer into a state tree.
pub fn decode(bytes: &[u8]) -> Result<State> {
    let mut reader = Reader::new(bytes, 0);
    let state = reader.read_state(0)?;
    if !reader.rest.is_empty() {
        return Err(decode_err(
            reader.offset(),
            format!("{} trailing bytes after the root value", reader.rest.len()),
        ));
    }
    tracing::debug!(kind = %state.kind(), bytes = bytes.len(), "decoded state");
    Ok(state)
}

fn decode_err(offset: usize, err: impl Display) -> PersistError {
    PersistError::Decode {
        offset,
        message: err.to_string(),
    }
}

/// Cursor over a byte slice that knows its absolute position in the input.
struct Reader<'a> {
    rest: &'a [u8],
    /// Absolute offset one past the last byte of `rest`.
    end: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8], start: usize) -> Self {
        Self {
            rest: bytes,
            end: start + bytes.len(),
        }
    }

    fn offset(&self) -> usize {
        self.end - self.rest.len()
    }

    fn peek(&self) -> Result<Marker> {
        match self.rest.first() {
            Some(&byte) => Ok(Marker::from_u8(byte)),
            None => Err(decode_err(self.offset(), "unexpected end of data")),
        }
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        if self.rest.len() < len {
            return Err(decode_err(
                self.offset(),
                format!(
                    "truncated {what}: expected {len} bytes but only {} remain",
                    self.rest.len()
                ),
            ));
        }
        let (head, tail) = self.rest.split_at(len);
        self.rest = tail;
        Ok(head)
    }

    fn read_state(&mut self, depth: usize) -> Result<State> {
        let offset = self.offset();
        match self.peek()? {
            Marker::True | Marker::False => decode::read_bool(&mut self.rest)
                .map(State::Bool)
                .map_err(|e| decode_err(offset, e)),
            Marker::I64 | Marker::U64 => decode::read_int::<i64, _>(&mut self.rest)
                .map(State::Long)
                .map_err(|e| decode_err(offset, e)),
            Marker::FixPos(_)
            | Marker::FixNeg(_)
            | Marker::U8
            | Marker::U16
            | Marker::U32
            | Marker::I8
            | Marker::I16
            | Marker::I32 => self.read_i32().map(State::Int),
            Marker::F32 => self.read_f32().map(State::Float),
            Marker::F64 => decode::read_f64(&mut self.rest)
                .map(State::Double)
                .map_err(|e| decode_err(offset, e)),
            Marker::FixStr(_) | Marker::Str8 | Marker::Str16 | Marker::Str32 => {
                self.read_string().map(State::String)
            }
            Marker::FixArray(_) | Marker::Array16 | Marker::Array32 => {
                self.read_list(depth).map(State::List)
            }
            Marker::FixMap(_) | Marker::Map16 | Marker::Map32 => {
                self.read_object(depth).map(State::Object)
            }
            Marker::FixExt1
            | Marker::FixExt2
            | Marker::FixExt4
            | Marker::FixExt8
            | Marker::FixExt16
            | Marker::Ext8
            | Marker::Ext16
            | Marker::Ext32 => self.read_extension(),
            Marker::Null => Err(decode_err(offset, "nil has no state counterpart")),
            Marker::Bin8 | Marker::Bin16 | Marker::Bin32 => {
                Err(decode_err(offset, "binary data has no state counterpart"))
            }
            Marker::Reserved => Err(decode_err(offset, "reserved marker byte 0xc1")),
        }
    }

    fn read_i32(&mut self) -> Result<i32> {
        let offset = self.offset();
        decode::read_int::<i32, _>(&mut self.rest).map_err(|e| decode_err(offset, e))
    }

    fn read_f32(&mut self) -> Result<f32> {
        let offset = self.offset();
        decode::read_f32(&mut self.rest).map_err(|e| decode_err(offset, e))
    }

    fn read_string(&mut self) -> Result<String> {
        let offset = self.offset();
        let len = decode::read_str_len(&mut self.rest).map_err(|e| decode_err(offset, e))?;
        let bytes = self.take(len as usize, "string")?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| decode_err(offset, format!("invalid UTF-8 in string: {e}")))
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth >= MAX_DEPTH {
            return Err(decode_err(
                self.offset(),
                format!("nesting exceeds {MAX_DEPTH} levels"),
            ));
        }
        Ok(())
    }

    fn read_list(&mut self, depth: usize) -> Result<ListState> {
        self.check_depth(depth)?;
        let offset = self.offset();
        let len = decode::read_array_len(&mut self.rest).map_err(|e| decode_err(offset, e))?;
        // Every item is at least one byte, so a truncated count fails on the
        // first missing item rather than allocating up front.
        let mut list = ListState::new();
        for _ in 0..len {
            list.add(self.read_state(depth + 1)?);
        }
        Ok(list)
    }

    fn read_object(&mut self, depth: usize) -> Result<ObjectState> {
        self.check_depth(depth)?;
        let offset = self.offset();
        let len = decode::read_map_len(&mut self.rest).map_err(|e| decode_err(offset, e))?;
        let mut object = ObjectState::new();
        for _ in 0..len {
            let key_offset = self.offset();
            let name = match self.peek()? {
                Marker::FixStr(_) | Marker::Str8 | Marker::Str16 | Marker::Str32 => {
                    self.read_string()?
                }
                other => {
                    return Err(decode_err(
                        key_offset,
                        format!("object keys must be strings, found marker {other:?}"),
                    ))
                }
            };
            let value = self.read_state(depth + 1)?;
            object.set(name, value);
        }
        Ok(object)
    }

    fn read_extension(&mut self) -> Result<State> {
        let offset = self.offset();
        let meta = decode::read_ext_meta(&mut self.rest).map_err(|e| decode_err(offset, e))?;
        let unknown = PersistError::UnknownExtension {
            offset,
            type_code: meta.typeid,
        };
        let Some(kind) = codes::kind_for(meta.typeid) else {
            return Err(unknown);
        };
        let size = meta.size as usize;
        let start = self.offset();
        let mut payload = Reader::new(self.take(size, "extension payload")?, start);
        let state = match kind {
            StateKind::Vector2 => State::Vector2(Vec2::new(payload.read_f32()?, payload.read_f32()?)),
            StateKind::Vector3 => State::Vector3(Vec3::new(
                payload.read_f32()?,
                payload.read_f32()?,
                payload.read_f32()?,
            )),
            StateKind::Vector2Int => {
                State::Vector2Int(IVec2::new(payload.read_i32()?, payload.read_i32()?))
            }
            StateKind::Vector3Int => State::Vector3Int(IVec3::new(
                payload.read_i32()?,
                payload.read_i32()?,
                payload.read_i32()?,
            )),
            StateKind::Quaternion => State::Quaternion(Quat::from_xyzw(
                payload.read_f32()?,
                payload.read_f32()?,
                payload.read_f32()?,
                payload.read_f32()?,
            )),
            _ => return Err(unknown),
        };
        if !payload.rest.is_empty() {
            return Err(decode_err(
                payload.offset(),
                format!("{} unread bytes in {kind} extension payload", payload.rest.len()),
            ));
        }
        Ok(state)
    }
}
