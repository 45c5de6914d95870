//! Compact coordinates for the corner state and their move tables.
//!
//! - Orientation coordinate: twists of UFR..DFL read as a base-3 number,
//!   most significant slot first. DBR's twist follows from the twist sum
//!   being 0 mod 3 and DBL is the untwisted reference. Range `0..729`.
//! - Permutation coordinate: Lehmer rank of the seven movable slots
//!   (everything but DBL, which F/R/U never move). Range `0..5040`.
//!
//! Both coordinates are 0 for the solved puzzle.

use thiserror::Error;

use crate::moves::{
    apply_ori, apply_perm, Corner, CornerOri, CornerPerm, Move, NUM_CORNERS, NUM_MOVES,
    TWIST_STATES,
};

/// Number of orientation coordinates (3^6).
pub const ORI_CASES: usize = 729;

/// Number of permutation coordinates (7!).
pub const PERM_CASES: usize = 5040;

/// Orientation coordinate, `0..ORI_CASES`.
pub type OriCoord = u16;

/// Permutation coordinate, `0..PERM_CASES`.
pub type PermCoord = u16;

/// Slots whose twist is stored in the orientation coordinate.
const FREE_TWIST_SLOTS: usize = 6;

/// Slots ranked by the permutation coordinate, in rank order.
const MOVABLE_SLOTS: [Corner; 7] = [
    Corner::Ufr,
    Corner::Ufl,
    Corner::Ubl,
    Corner::Ubr,
    Corner::Dfr,
    Corner::Dfl,
    Corner::Dbr,
];

/// Corner labels that can occupy the movable slots, ascending.
const MOVABLE_LABELS: [u8; 7] = [0, 1, 2, 3, 4, 5, 7];

/// Encodes an orientation vector.
///
/// Only the first six slots are read; the vector is assumed to satisfy the
/// twist-sum law.
pub fn encode_orientation(ori: &CornerOri) -> OriCoord {
    ori[..FREE_TWIST_SLOTS]
        .iter()
        .fold(0, |coord, &twist| coord * TWIST_STATES as u16 + twist as u16)
}

/// Decodes an orientation coordinate into a full orientation vector.
pub fn decode_orientation(mut coord: OriCoord) -> CornerOri {
    let states = TWIST_STATES as u16;
    let mut ori = [0u8; NUM_CORNERS];
    let mut twist_sum = 0u16;

    for slot in (0..FREE_TWIST_SLOTS).rev() {
        let twist = coord % states;
        ori[slot] = twist as u8;
        twist_sum += twist;
        coord /= states;
    }

    // DBR cancels the accumulated twist, DBL stays neutral
    ori[Corner::Dbr.slot()] = ((states - twist_sum % states) % states) as u8;
    ori[Corner::Dbl.slot()] = 0;
    ori
}

/// Encodes a permutation vector.
///
/// The DBL slot must hold the DBL corner; only the other seven slots are
/// ranked. For each ranked position, the number of earlier positions holding
/// a larger label is that position's factorial digit.
pub fn encode_permutation(perm: &CornerPerm) -> PermCoord {
    let labels = MOVABLE_SLOTS.map(|corner| perm[corner.slot()]);
    let mut coord: u16 = 0;

    for position in (1..labels.len()).rev() {
        let larger_before = labels[..position]
            .iter()
            .filter(|&&label| label > labels[position])
            .count() as u16;
        coord = (coord + larger_before) * position as u16;
    }

    coord
}

/// Decodes a permutation coordinate into a full permutation vector.
pub fn decode_permutation(mut coord: PermCoord) -> CornerPerm {
    let mut digits = [0u16; 7];
    for (position, digit) in digits.iter_mut().enumerate() {
        let base = position as u16 + 1;
        *digit = coord % base;
        coord /= base;
    }

    // fill from the last position: its digit counts the larger labels left
    // for the earlier positions
    let mut remaining = MOVABLE_LABELS.to_vec();
    let mut perm = [0u8; NUM_CORNERS];
    for position in (0..MOVABLE_SLOTS.len()).rev() {
        let pick = remaining.len() - 1 - digits[position] as usize;
        perm[MOVABLE_SLOTS[position].slot()] = remaining.remove(pick);
    }
    perm[Corner::Dbl.slot()] = Corner::Dbl as u8;
    perm
}

/// An invariant of the coordinate system that failed to hold.
///
/// Any of these means the tables are wrong and nothing built from them can be
/// trusted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordDefect {
    #[error("orientation coordinate {coord} does not survive decode/encode")]
    OrientationRoundTrip { coord: OriCoord },
    #[error("permutation coordinate {coord} does not survive decode/encode")]
    PermutationRoundTrip { coord: PermCoord },
    #[error("orientation coordinate {coord} is not restored by {mv} and its inverse")]
    OrientationInverse { coord: OriCoord, mv: Move },
    #[error("permutation coordinate {coord} is not restored by {mv} and its inverse")]
    PermutationInverse { coord: PermCoord, mv: Move },
}

/// Coordinate-level move tables: `table[coord][move] -> coord'`.
pub struct MoveTables {
    ori: Box<[[OriCoord; NUM_MOVES]]>,
    perm: Box<[[PermCoord; NUM_MOVES]]>,
}

impl MoveTables {
    /// Builds both tables by decoding every coordinate, applying every move
    /// and encoding the result.
    pub fn new() -> Self {
        let ori = (0..ORI_CASES as OriCoord)
            .map(|coord| {
                let vector = decode_orientation(coord);
                Move::ALL.map(|mv| {
                    let mut moved = vector;
                    apply_ori(&mut moved, mv);
                    encode_orientation(&moved)
                })
            })
            .collect();

        let perm = (0..PERM_CASES as PermCoord)
            .map(|coord| {
                let vector = decode_permutation(coord);
                Move::ALL.map(|mv| {
                    let mut moved = vector;
                    apply_perm(&mut moved, mv);
                    encode_permutation(&moved)
                })
            })
            .collect();

        Self { ori, perm }
    }

    /// Orientation coordinate after applying `mv`.
    #[inline(always)]
    pub fn apply_ori(&self, coord: OriCoord, mv: Move) -> OriCoord {
        self.ori[coord as usize][mv.index()]
    }

    /// Permutation coordinate after applying `mv`.
    #[inline(always)]
    pub fn apply_perm(&self, coord: PermCoord, mv: Move) -> PermCoord {
        self.perm[coord as usize][mv.index()]
    }

    /// Checks every bijection and every move/inverse round trip.
    pub fn self_test(&self) -> Result<(), CoordDefect> {
        for coord in 0..ORI_CASES as OriCoord {
            if encode_orientation(&decode_orientation(coord)) != coord {
                return Err(CoordDefect::OrientationRoundTrip { coord });
            }
        }

        for coord in 0..PERM_CASES as PermCoord {
            if encode_permutation(&decode_permutation(coord)) != coord {
                return Err(CoordDefect::PermutationRoundTrip { coord });
            }
        }

        for coord in 0..ORI_CASES as OriCoord {
            for mv in Move::ALL {
                if self.apply_ori(self.apply_ori(coord, mv), mv.inverse()) != coord {
                    return Err(CoordDefect::OrientationInverse { coord, mv });
                }
            }
        }

        for coord in 0..PERM_CASES as PermCoord {
            for mv in Move::ALL {
                if self.apply_perm(self.apply_perm(coord, mv), mv.inverse()) != coord {
                    return Err(CoordDefect::PermutationInverse { coord, mv });
                }
            }
        }

        Ok(())
    }
}

impl Default for MoveTables {
    fn default() -> Self {
        Self::new()
    }
}
