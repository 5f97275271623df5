//! Kicks module - SRS wall kick tables and rotation resolution
//!
//! Offsets are `(dcol, drow)` in board space: positive columns go right,
//! positive rows go down (the gravity direction).
//! Reference: https://tetris.wiki/SRS

use crate::geometry::Shape;
use crate::types::{PieceKind, Rotation};

/// Candidate offsets for one rotation transition, tried in order
pub type KickList = [(i32, i32); 5];

/// One [`KickList`] per adjacent transition, see [`get_kick_index`]
pub type KickTable = [KickList; 8];

/// Which kick table a piece uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickFamily {
    I,
    /// J, L, S, T, Z, and the O piece (whose rotation never collides)
    Other,
}

impl KickFamily {
    pub fn of(kind: PieceKind) -> Self {
        match kind {
            PieceKind::I => KickFamily::I,
            _ => KickFamily::Other,
        }
    }
}

/// JLSTZ kick table (also used by O)
const OTHER_KICKS: KickTable = [
    // 0->1
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 1->0
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1->2
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2->1
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 2->3
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 3->2
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 3->0
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 0->3
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
];

/// I piece kick table
const I_KICKS: KickTable = [
    // 0->1
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 1->0
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 1->2
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 2->1
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 2->3
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 3->2
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 3->0
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 0->3
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
];

pub fn get_kick_table(family: KickFamily) -> &'static KickTable {
    match family {
        KickFamily::I => &I_KICKS,
        KickFamily::Other => &OTHER_KICKS,
    }
}

/// Table row for a transition, or `None` for a 180° (or no-op) request.
fn get_kick_index(from: Rotation, to: Rotation) -> Option<usize> {
    use Rotation::*;
    match (from, to) {
        (North, East) => Some(0),
        (East, North) => Some(1),
        (East, South) => Some(2),
        (South, East) => Some(3),
        (South, West) => Some(4),
        (West, South) => Some(5),
        (West, North) => Some(6),
        (North, West) => Some(7),
        _ => None,
    }
}

/// Kick candidates for `(family, from -> to)`.
///
/// Only the eight adjacent transitions exist; anything else yields `None`.
pub fn get_kicks(family: KickFamily, from: Rotation, to: Rotation) -> Option<&'static KickList> {
    get_kick_index(from, to).map(|i| &get_kick_table(family)[i])
}

/// Try to rotate a piece with wall kicks
///
/// `is_valid(shape, col, row)` is the board's placement test. The rotated
/// shape is first tried at the unmodified origin, then at each kick offset.
/// Returns `Some((new_shape, new_rotation, offset))` for the first accepted
/// placement, `None` if every candidate collides.
pub fn try_rotate(
    kind: PieceKind,
    shape: &Shape,
    rotation: Rotation,
    col: i32,
    row: i32,
    clockwise: bool,
    is_valid: impl Fn(&Shape, i32, i32) -> bool,
) -> Option<(Shape, Rotation, (i32, i32))> {
    let new_rotation = rotation.rotate(clockwise);
    let new_shape = shape.rotated(clockwise);

    if is_valid(&new_shape, col, row) {
        return Some((new_shape, new_rotation, (0, 0)));
    }

    let kicks = get_kicks(KickFamily::of(kind), rotation, new_rotation)?;
    kicks
        .iter()
        .find(|&&(dc, dr)| is_valid(&new_shape, col + dc, row + dr))
        .map(|&offset| (new_shape, new_rotation, offset))
}
