//! State encoder: converts a [`State`] tree into MessagePack bytes.
//!
//! The wire format is plain MessagePack, so any MessagePack reader can walk
//! it. Each variant maps to one native type:
//!
//! | State        | MessagePack                                   |
//! |--------------|-----------------------------------------------|
//! | `Bool`       | `true` / `false`                              |
//! | `Int`        | `int 32` (always 5 bytes)                     |
//! | `Long`       | `int 64` (always 9 bytes)                     |
//! | `Float`      | `float 32`                                    |
//! | `Double`     | `float 64`                                    |
//! | `String`     | `str`                                         |
//! | `List`       | `array` header, then each item                |
//! | `Object`     | `map` header, then `str` key / value pairs    |
//! | composites   | `ext` with the type codes in [`crate::codes`] |
//!
//! Integer and float widths are never shrunk, which is what lets the decoder
//! tell `Int` from `Long` and `Float` from `Double`.
//!
//! A composite's extension payload is the concatenation of its components'
//! native encodings in declared order, e.g. a `Vector3` is
//! `ext(0x02, [f32 x][f32 y][f32 z])` with 15 payload bytes.

use std::fmt::Display;

use glam::{IVec2, IVec3, Quat, Vec2, Vec3};
use rmp::encode;

use crate::codes;
use crate::error::{PersistError, Result};
use crate::list::ListState;
use crate::object::ObjectState;
use crate::state::State;

/// Deepest container nesting the codec accepts, in either direction.
pub const MAX_DEPTH: usize = 512;

/// Encode a state tree into a new byte buffer.
pub fn encode(state: &State) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_into(state, &mut out)?;
    tracing::debug!(kind = %state.kind(), bytes = out.len(), "encoded state");
    Ok(out)
}

/// Append the encoding of `state` to `out`.
pub fn encode_into(state: &State, out: &mut Vec<u8>) -> Result<()> {
    write_state(out, state, 0)
}

fn encode_err(err: impl Display) -> PersistError {
    PersistError::Encode(err.to_string())
}

/// Top-level dispatch over every variant.
fn write_state(out: &mut Vec<u8>, state: &State, depth: usize) -> Result<()> {
    match state {
        State::Bool(value) => encode::write_bool(out, *value).map_err(encode_err),
        State::Int(value) => encode::write_i32(out, *value).map_err(encode_err),
        State::Long(value) => encode::write_i64(out, *value).map_err(encode_err),
        State::Float(value) => encode::write_f32(out, *value).map_err(encode_err),
        State::Double(value) => encode::write_f64(out, *value).map_err(encode_err),
        State::String(value) => encode::write_str(out, value).map_err(encode_err),
        State::List(list) => write_list(out, list, depth),
        State::Object(object) => write_object(out, object, depth),
        State::Vector2(v) => write_extension(out, codes::VECTOR2, |p| write_vector2(p, v)),
        State::Vector3(v) => write_extension(out, codes::VECTOR3, |p| write_vector3(p, v)),
        State::Vector2Int(v) => {
            write_extension(out, codes::VECTOR2_INT, |p| write_vector2_int(p, v))
        }
        State::Vector3Int(v) => {
            write_extension(out, codes::VECTOR3_INT, |p| write_vector3_int(p, v))
        }
        State::Quaternion(q) => write_extension(out, codes::QUATERNION, |p| write_quaternion(p, q)),
    }
}

fn container_len(len: usize) -> Result<u32> {
    u32::try_from(len)
        .map_err(|_| PersistError::Encode(format!("container of {len} entries is too large")))
}

fn check_depth(depth: usize) -> Result<()> {
    if depth >= MAX_DEPTH {
        return Err(PersistError::Encode(format!(
            "nesting exceeds {MAX_DEPTH} levels"
        )));
    }
    Ok(())
}

/// `array` header with the item count, then each item in order.
fn write_list(out: &mut Vec<u8>, list: &ListState, depth: usize) -> Result<()> {
    check_depth(depth)?;
    encode::write_array_len(out, container_len(list.len())?).map_err(encode_err)?;
    for item in list {
        write_state(out, item, depth + 1)?;
    }
    Ok(())
}

/// `map` header with the field count, then key/value pairs in insertion order.
fn write_object(out: &mut Vec<u8>, object: &ObjectState, depth: usize) -> Result<()> {
    check_depth(depth)?;
    encode::write_map_len(out, container_len(object.len())?).map_err(encode_err)?;
    for (name, value) in object {
        encode::write_str(out, name).map_err(encode_err)?;
        write_state(out, value, depth + 1)?;
    }
    Ok(())
}

/// Encode the payload into a scratch buffer first so the `ext` header can
/// carry its exact length.
fn write_extension(
    out: &mut Vec<u8>,
    type_code: i8,
    payload: impl FnOnce(&mut Vec<u8>) -> Result<()>,
) -> Result<()> {
    let mut buf = Vec::with_capacity(20);
    payload(&mut buf)?;
    encode::write_ext_meta(out, container_len(buf.len())?, type_code).map_err(encode_err)?;
    out.extend_from_slice(&buf);
    Ok(())
}

fn write_floats(out: &mut Vec<u8>, components: &[f32]) -> Result<()> {
    for component in components {
        encode::write_f32(out, *component).map_err(encode_err)?;
    }
    Ok(())
}

fn write_ints(out: &mut Vec<u8>, components: &[i32]) -> Result<()> {
    for component in components {
        encode::write_i32(out, *component).map_err(encode_err)?;
    }
    Ok(())
}

fn write_vector2(out: &mut Vec<u8>, v: &Vec2) -> Result<()> {
    write_floats(out, &v.to_array())
}

fn write_vector3(out: &mut Vec<u8>, v: &Vec3) -> Result<()> {
    write_floats(out, &v.to_array())
}

fn write_vector2_int(out: &mut Vec<u8>, v: &IVec2) -> Result<()> {
    write_ints(out, &v.to_array())
}

fn write_vector3_int(out: &mut Vec<u8>, v: &IVec3) -> Result<()> {
    write_ints(out, &v.to_array())
}

fn write_quaternion(out: &mut Vec<u8>, q: &Quat) -> Result<()> {
    write_floats(out, &q.to_array())
}
