//! Conversion between facelet strings and corner coordinates.
//!
//! A cube string lists 24 tiles, four per face, in the order
//! `U1-U4 R1-R4 F1-F4 D1-D4 L1-L4 B1-B4`:
//!
//! ```text
//!          U1  U2
//!          U3  U4
//!  L1  L2  F1  F2  R1  R2  B1  B2
//!  L3  L4  F3  F4  R3  R4  B3  B4
//!          D1  D2
//!          D3  D4
//! ```
//!
//! Any six labels may be used (`UUUURRRRFFFFDDDDLLLLBBBB` and
//! `yyyyggggrrrrwwwwbbbboooo` are both solved cubes), case is ignored. The
//! DBL corner anchors the labeling: its tiles name the L, D and B faces, and
//! each opposite face gets the one label never seen on a corner with it.

use rustc_hash::FxHashMap;

use crate::coords::{encode_orientation, encode_permutation, OriCoord, PermCoord};
use crate::error::SolveError;
use crate::moves::{Corner, CornerOri, CornerPerm, NUM_CORNERS, TWIST_STATES};

/// Number of tiles in a cube string.
pub const NUM_TILES: usize = 24;

/// Tiles per face.
const TILES_PER_FACE: usize = 4;

/// The solved cube with canonical face letters.
pub const SOLVED_CUBE: &str = "UUUURRRRFFFFDDDDLLLLBBBB";

/// Canonical faces, in the order they appear in a cube string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Facet {
    U = 0,
    R = 1,
    F = 2,
    D = 3,
    L = 4,
    B = 5,
}

impl Facet {
    pub const ALL: [Facet; 6] = [Facet::U, Facet::R, Facet::F, Facet::D, Facet::L, Facet::B];

    pub const fn letter(self) -> char {
        match self {
            Facet::U => 'U',
            Facet::R => 'R',
            Facet::F => 'F',
            Facet::D => 'D',
            Facet::L => 'L',
            Facet::B => 'B',
        }
    }

    #[inline(always)]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

// tile positions, named by face then the two neighbouring faces
const U_BL: usize = 0;
const U_BR: usize = 1;
const U_FL: usize = 2;
const U_FR: usize = 3;
const R_FU: usize = 4;
const R_BU: usize = 5;
const R_FD: usize = 6;
const R_BD: usize = 7;
const F_UL: usize = 8;
const F_UR: usize = 9;
const F_DL: usize = 10;
const F_DR: usize = 11;
const D_FL: usize = 12;
const D_FR: usize = 13;
const D_BL: usize = 14;
const D_BR: usize = 15;
const L_BU: usize = 16;
const L_FU: usize = 17;
const L_DB: usize = 18;
const L_DF: usize = 19;
const B_UR: usize = 20;
const B_UL: usize = 21;
const B_DR: usize = 22;
const B_DL: usize = 23;

/// Tiles of each corner slot: the U/D tile first, then clockwise.
///
/// The position of the U/D sticker within a triplet is the corner's twist.
const CORNER_TILES: [[usize; 3]; NUM_CORNERS] = [
    [U_FR, R_FU, F_UR],
    [U_FL, F_UL, L_FU],
    [U_BL, L_BU, B_UL],
    [U_BR, B_UR, R_BU],
    [D_FR, F_DR, R_FD],
    [D_FL, L_DF, F_DL],
    [D_BL, B_DL, L_DB],
    [D_BR, R_BD, B_DR],
];

/// Faces of each corner in its home slot, in [`CORNER_TILES`] order.
const HOME_FACES: [[Facet; 3]; NUM_CORNERS] = [
    [Facet::U, Facet::R, Facet::F],
    [Facet::U, Facet::F, Facet::L],
    [Facet::U, Facet::L, Facet::B],
    [Facet::U, Facet::B, Facet::R],
    [Facet::D, Facet::F, Facet::R],
    [Facet::D, Facet::L, Facet::F],
    [Facet::D, Facet::B, Facet::L],
    [Facet::D, Facet::R, Facet::B],
];

/// Bitmask of the faces a corner shows.
const fn corner_mask(faces: [Facet; 3]) -> u8 {
    faces[0].bit() | faces[1].bit() | faces[2].bit()
}

/// Converts a cube string to its (orientation, permutation) coordinates.
pub fn translate(cube: &str) -> Result<(OriCoord, PermCoord), SolveError> {
    let tiles = normalize(cube)?;
    let (perm, ori) = read_corners(&tiles)?;
    Ok((encode_orientation(&ori), encode_permutation(&perm)))
}

/// Rewrites a cube string with canonical face letters.
pub fn canonicalize(cube: &str) -> Result<String, SolveError> {
    Ok(normalize(cube)?.iter().map(|facet| facet.letter()).collect())
}

/// Maps the caller's labels onto canonical faces.
fn normalize(cube: &str) -> Result<[Facet; NUM_TILES], SolveError> {
    let labels: Vec<char> = cube.chars().map(|c| c.to_ascii_uppercase()).collect();
    if labels.len() != NUM_TILES {
        return Err(SolveError::WrongLength {
            found: labels.len(),
        });
    }

    // small dense ids for the labels, so adjacency fits in a bitmask
    let mut ids: FxHashMap<char, usize> = FxHashMap::default();
    for &label in &labels {
        let next_id = ids.len();
        ids.entry(label).or_insert(next_id);
    }
    if ids.len() != Facet::ALL.len() {
        return Err(SolveError::InconsistentColoring);
    }

    // labels seen together on some corner
    let mut adjacent = [0u8; 6];
    for triplet in &CORNER_TILES {
        let mask = triplet
            .iter()
            .fold(0u8, |mask, &tile| mask | 1 << ids[&labels[tile]]);
        for &tile in triplet {
            adjacent[ids[&labels[tile]]] |= mask;
        }
    }

    let opposite = |label: char| -> Result<char, SolveError> {
        let id = ids[&label];
        let mut candidates = ids
            .iter()
            .filter(|&(_, &other)| adjacent[id] & (1 << other) == 0)
            .map(|(&other_label, _)| other_label);
        match (candidates.next(), candidates.next()) {
            (Some(found), None) => Ok(found),
            _ => Err(SolveError::InconsistentColoring),
        }
    };

    let left = labels[L_DB];
    let down = labels[D_BL];
    let back = labels[B_DL];
    let mapping: FxHashMap<char, Facet> = [
        (left, Facet::L),
        (down, Facet::D),
        (back, Facet::B),
        (opposite(left)?, Facet::R),
        (opposite(down)?, Facet::U),
        (opposite(back)?, Facet::F),
    ]
    .into_iter()
    .collect();
    if mapping.len() != Facet::ALL.len() {
        return Err(SolveError::InconsistentColoring);
    }

    let mut tiles = [Facet::U; NUM_TILES];
    let mut counts = [0usize; 6];
    for (tile, label) in tiles.iter_mut().zip(&labels) {
        let facet = *mapping.get(label).ok_or(SolveError::InconsistentColoring)?;
        counts[facet as usize] += 1;
        *tile = facet;
    }
    if counts.iter().any(|&count| count != TILES_PER_FACE) {
        return Err(SolveError::InconsistentColoring);
    }

    Ok(tiles)
}

/// Reads the corner in every slot and its twist.
fn read_corners(tiles: &[Facet; NUM_TILES]) -> Result<(CornerPerm, CornerOri), SolveError> {
    let mut perm = [0u8; NUM_CORNERS];
    let mut ori = [0u8; NUM_CORNERS];
    let mut placed = 0u8;

    for (slot, triplet) in CORNER_TILES.iter().enumerate() {
        let faces = triplet.map(|tile| tiles[tile]);

        let corner = HOME_FACES
            .iter()
            .position(|&home| corner_mask(home) == corner_mask(faces))
            .ok_or(SolveError::InvalidCorner { slot })?;
        if placed & (1 << corner) != 0 {
            return Err(SolveError::InvalidCorner { slot });
        }
        placed |= 1 << corner;

        let twist = faces
            .iter()
            .position(|&facet| facet == Facet::U || facet == Facet::D)
            .ok_or(SolveError::InvalidCorner { slot })?;

        perm[slot] = corner as u8;
        ori[slot] = twist as u8;
    }

    let twist_sum: u32 = ori.iter().map(|&twist| twist as u32).sum();
    if twist_sum % TWIST_STATES as u32 != 0 {
        return Err(SolveError::TwistedCorner);
    }
    debug_assert_eq!(perm[Corner::Dbl.slot()], Corner::Dbl as u8);

    Ok((perm, ori))
}

/// Draws the cube string of the given corner vectors with canonical letters.
pub fn render(perm: &CornerPerm, ori: &CornerOri) -> String {
    let mut tiles = [Facet::U; NUM_TILES];
    for (slot, triplet) in CORNER_TILES.iter().enumerate() {
        let faces = HOME_FACES[perm[slot] as usize];
        let twist = ori[slot] as usize;
        for (offset, &facet) in faces.iter().enumerate() {
            tiles[triplet[(twist + offset) % 3]] = facet;
        }
    }
    tiles.iter().map(|facet| facet.letter()).collect()
}
