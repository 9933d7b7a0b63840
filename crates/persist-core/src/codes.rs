//! MessagePack extension type codes for the composite states.
//!
//! These values are part of the save-file format. Changing one makes every
//! existing file that contains that composite unreadable.

use crate::state::StateKind;

pub const VECTOR2: i8 = 0x01;
pub const VECTOR3: i8 = 0x02;
pub const VECTOR2_INT: i8 = 0x04;
pub const VECTOR3_INT: i8 = 0x05;
pub const QUATERNION: i8 = 0x07;

/// The composite kind registered for `type_code`, if any.
pub fn kind_for(type_code: i8) -> Option<StateKind> {
    match type_code {
        VECTOR2 => Some(StateKind::Vector2),
        VECTOR3 => Some(StateKind::Vector3),
        VECTOR2_INT => Some(StateKind::Vector2Int),
        VECTOR3_INT => Some(StateKind::Vector3Int),
        QUATERNION => Some(StateKind::Quaternion),
        _ => None,
    }
}
