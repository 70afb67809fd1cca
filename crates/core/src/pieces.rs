//! Pieces module - tetromino catalogue and pivot rotation
//!
//! Every shape is four offsets from the piece anchor plus a pivot index. The
//! pivot is index 1 for every shape, so some pieces (I, O) wobble when rotated
//! instead of spinning in place. There are no wall kicks: a blocked rotation
//! simply fails.

use crate::rng::PieceSource;
use crate::types::{Color, PieceKind, Point};

/// Offsets of the four minos relative to the piece anchor
pub type ShapeOffsets = [Point; 4];

/// Index of the offset used as the rotation centre
pub const PIVOT_INDEX: usize = 1;

/// Immutable catalogue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeTemplate {
    pub kind: PieceKind,
    pub offsets: ShapeOffsets,
    pub color: Color,
}

const fn p(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

/// The seven templates, in [`PieceKind::ALL`] order.
const CATALOG: [ShapeTemplate; 7] = [
    ShapeTemplate {
        kind: PieceKind::I,
        offsets: [p(0, 0), p(1, 0), p(2, 0), p(3, 0)],
        color: Color::CYAN,
    },
    ShapeTemplate {
        kind: PieceKind::O,
        offsets: [p(0, 0), p(1, 0), p(0, 1), p(1, 1)],
        color: Color::YELLOW,
    },
    ShapeTemplate {
        kind: PieceKind::T,
        offsets: [p(1, 0), p(0, 1), p(1, 1), p(2, 1)],
        color: Color::MAGENTA,
    },
    ShapeTemplate {
        kind: PieceKind::S,
        offsets: [p(1, 0), p(2, 0), p(0, 1), p(1, 1)],
        color: Color::GREEN,
    },
    ShapeTemplate {
        kind: PieceKind::Z,
        offsets: [p(0, 0), p(1, 0), p(1, 1), p(2, 1)],
        color: Color::RED,
    },
    ShapeTemplate {
        kind: PieceKind::J,
        offsets: [p(0, 0), p(0, 1), p(1, 1), p(2, 1)],
        color: Color::BLUE,
    },
    ShapeTemplate {
        kind: PieceKind::L,
        offsets: [p(2, 0), p(0, 1), p(1, 1), p(2, 1)],
        color: Color::ORANGE,
    },
];

/// Get the catalogue template for a piece kind
pub fn template(kind: PieceKind) -> &'static ShapeTemplate {
    match kind {
        PieceKind::I => &CATALOG[0],
        PieceKind::O => &CATALOG[1],
        PieceKind::T => &CATALOG[2],
        PieceKind::S => &CATALOG[3],
        PieceKind::Z => &CATALOG[4],
        PieceKind::J => &CATALOG[5],
        PieceKind::L => &CATALOG[6],
    }
}

/// Rotate offsets 90° clockwise about `offsets[pivot]`.
///
/// Each offset relative to the pivot maps `(dx, dy) -> (dy, -dx)`. The pivot
/// itself never moves, so four applications give back the input.
pub fn rotate_cw(offsets: &ShapeOffsets, pivot: usize) -> ShapeOffsets {
    let center = offsets[pivot];
    offsets.map(|o| {
        let rel = o - center;
        center + Point::new(rel.y, -rel.x)
    })
}

/// A mutable shape instance spawned from the catalogue.
///
/// This is a plain `Copy` value: rotating an instance never touches the
/// template it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub offsets: ShapeOffsets,
    pub pivot: usize,
    pub color: Color,
}

impl Tetromino {
    /// Fresh copy of the catalogue shape for `kind`
    pub fn new(kind: PieceKind) -> Self {
        let t = template(kind);
        Self {
            kind: t.kind,
            offsets: t.offsets,
            pivot: PIVOT_INDEX,
            color: t.color,
        }
    }

    /// Offsets after one clockwise rotation (does not mutate `self`)
    pub fn rotated_offsets(&self) -> ShapeOffsets {
        rotate_cw(&self.offsets, self.pivot)
    }

    /// Board cells covered when the offset origin sits at `anchor`
    pub fn world_cells(&self, anchor: Point) -> [Point; 4] {
        world_cells(anchor, &self.offsets)
    }
}

/// Translate offsets to board coordinates
pub fn world_cells(anchor: Point, offsets: &ShapeOffsets) -> [Point; 4] {
    offsets.map(|o| anchor + o)
}

/// Draw the next kind from `source` and return a fresh shape for it.
pub fn pick_random_shape(source: &mut impl PieceSource) -> Tetromino {
    Tetromino::new(source.next_kind())
}
