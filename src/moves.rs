//! Face turns acting on the raw corner vectors.
//!
//! The puzzle state is two parallel 8-slot vectors: the permutation vector
//! holds, for every slot, the corner currently sitting there, and the
//! orientation vector holds that corner's twist. Only the F, R and U faces
//! are turned, so the DBL corner never moves and serves as the fixed frame
//! of reference.

use std::fmt;
use std::str::FromStr;

use crate::error::SolveError;

/// Number of corner slots.
pub const NUM_CORNERS: usize = 8;

/// Number of elementary moves (3 faces x 3 turn amounts).
pub const NUM_MOVES: usize = 9;

/// Number of twist states a corner can be in.
pub const TWIST_STATES: u8 = 3;

/// Corner identities per slot.
pub type CornerPerm = [u8; NUM_CORNERS];

/// Twist of the corner in each slot: 0 neutral, 1 clockwise, 2 anticlockwise.
pub type CornerOri = [u8; NUM_CORNERS];

/// Corner slots, named by the three faces that meet there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Corner {
    Ufr = 0,
    Ufl = 1,
    Ubl = 2,
    Ubr = 3,
    Dfr = 4,
    Dfl = 5,
    Dbl = 6,
    Dbr = 7,
}

impl Corner {
    /// Slot index of this corner.
    #[inline(always)]
    pub const fn slot(self) -> usize {
        self as usize
    }
}

/// Permutation vector of the solved puzzle.
pub const SOLVED_PERM: CornerPerm = [0, 1, 2, 3, 4, 5, 6, 7];

/// Orientation vector of the solved puzzle.
pub const SOLVED_ORI: CornerOri = [0; NUM_CORNERS];

/// The three turnable faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Front,
    Right,
    Up,
}

impl Face {
    /// The clockwise quarter turn of this face.
    const fn quarter_turn(self) -> &'static QuarterTurn {
        match self {
            Face::Front => &FRONT_TURN,
            Face::Right => &RIGHT_TURN,
            Face::Up => &UP_TURN,
        }
    }
}

/// A clockwise quarter turn as a 4-cycle of slots.
///
/// `cycle[i]` receives the corner from `cycle[(i + 1) % 4]`, and that corner
/// gains `twist[i]` (mod 3) on arrival.
struct QuarterTurn {
    cycle: [Corner; 4],
    twist: [u8; 4],
}

const FRONT_TURN: QuarterTurn = QuarterTurn {
    cycle: [Corner::Ufr, Corner::Ufl, Corner::Dfl, Corner::Dfr],
    twist: [1, 2, 1, 2],
};

const RIGHT_TURN: QuarterTurn = QuarterTurn {
    cycle: [Corner::Ufr, Corner::Dfr, Corner::Dbr, Corner::Ubr],
    twist: [2, 1, 2, 1],
};

const UP_TURN: QuarterTurn = QuarterTurn {
    cycle: [Corner::Ufr, Corner::Ubr, Corner::Ubl, Corner::Ufl],
    twist: [0, 0, 0, 0],
};

impl QuarterTurn {
    /// Cycles the slot contents, adding the twist delta when `twist` is set.
    #[inline]
    fn apply(&self, slots: &mut [u8; NUM_CORNERS], twist: bool) {
        let first = slots[self.cycle[0].slot()];
        for i in 0..4 {
            let source = if i == 3 {
                first
            } else {
                slots[self.cycle[i + 1].slot()]
            };
            slots[self.cycle[i].slot()] = if twist {
                (source + self.twist[i]) % TWIST_STATES
            } else {
                source
            };
        }
    }
}

/// One of the nine elementary moves: a face and a turn amount.
///
/// The discriminant is the 4-bit code stored in packed paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Move {
    F1 = 0,
    F2 = 1,
    F3 = 2,
    R1 = 3,
    R2 = 4,
    R3 = 5,
    U1 = 6,
    U2 = 7,
    U3 = 8,
}

impl Move {
    /// All moves, in code order.
    pub const ALL: [Move; NUM_MOVES] = [
        Move::F1,
        Move::F2,
        Move::F3,
        Move::R1,
        Move::R2,
        Move::R3,
        Move::U1,
        Move::U2,
        Move::U3,
    ];

    /// Looks a move up by its code.
    #[inline]
    pub const fn from_code(code: u8) -> Option<Move> {
        if (code as usize) < NUM_MOVES {
            Some(Move::ALL[code as usize])
        } else {
            None
        }
    }

    /// The 4-bit code of this move.
    #[inline(always)]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Column index of this move in the coordinate move tables.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn face(self) -> Face {
        match self {
            Move::F1 | Move::F2 | Move::F3 => Face::Front,
            Move::R1 | Move::R2 | Move::R3 => Face::Right,
            Move::U1 | Move::U2 | Move::U3 => Face::Up,
        }
    }

    /// Number of clockwise quarter turns: 1, 2 or 3.
    pub const fn quarter_turns(self) -> usize {
        (self as usize) % 3 + 1
    }

    /// The move undoing this one. Half turns undo themselves.
    pub const fn inverse(self) -> Move {
        match self {
            Move::F1 => Move::F3,
            Move::F2 => Move::F2,
            Move::F3 => Move::F1,
            Move::R1 => Move::R3,
            Move::R2 => Move::R2,
            Move::R3 => Move::R1,
            Move::U1 => Move::U3,
            Move::U2 => Move::U2,
            Move::U3 => Move::U1,
        }
    }

    /// Two-character display name, e.g. `R3`.
    pub const fn name(self) -> &'static str {
        match self {
            Move::F1 => "F1",
            Move::F2 => "F2",
            Move::F3 => "F3",
            Move::R1 => "R1",
            Move::R2 => "R2",
            Move::R3 => "R3",
            Move::U1 => "U1",
            Move::U2 => "U2",
            Move::U3 => "U3",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Move {
    type Err = SolveError;

    /// Parses a two-character token such as `u2`, ignoring case.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Move::ALL
            .into_iter()
            .find(|mv| mv.name().eq_ignore_ascii_case(token))
            .ok_or_else(|| SolveError::UnknownMove {
                token: token.to_string(),
            })
    }
}

/// Applies a move to a permutation vector in place.
pub fn apply_perm(perm: &mut CornerPerm, mv: Move) {
    let turn = mv.face().quarter_turn();
    for _ in 0..mv.quarter_turns() {
        turn.apply(perm, false);
    }
}

/// Applies a move to an orientation vector in place.
///
/// Corners leaving the U/D layers for the F or R face pick up a twist; the
/// twists of a half turn cancel out.
pub fn apply_ori(ori: &mut CornerOri, mv: Move) {
    let turn = mv.face().quarter_turn();
    for _ in 0..mv.quarter_turns() {
        turn.apply(ori, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_then_inverse_restores_solved() {
        for mv in Move::ALL {
            let mut perm = SOLVED_PERM;
            let mut ori = SOLVED_ORI;
            apply_perm(&mut perm, mv);
            apply_ori(&mut ori, mv);
            apply_perm(&mut perm, mv.inverse());
            apply_ori(&mut ori, mv.inverse());
            assert_eq!(perm, SOLVED_PERM, "{mv} then its inverse moved corners");
            assert_eq!(ori, SOLVED_ORI, "{mv} then its inverse twisted corners");
        }
    }

    #[test]
    fn test_inverse_is_an_involution() {
        for mv in Move::ALL {
            assert_eq!(mv.inverse().inverse(), mv);
            assert_eq!(mv.inverse().face(), mv.face());
        }
    }

    #[test]
    fn test_four_quarter_turns_are_identity() {
        for mv in [Move::F1, Move::R1, Move::U1] {
            let mut perm = SOLVED_PERM;
            let mut ori = SOLVED_ORI;
            for _ in 0..4 {
                apply_perm(&mut perm, mv);
                apply_ori(&mut ori, mv);
            }
            assert_eq!(perm, SOLVED_PERM, "{mv} has order > 4 on corners");
            assert_eq!(ori, SOLVED_ORI, "{mv} has order > 4 on twists");
        }
    }

    #[test]
    fn test_moves_never_touch_reference_corner() {
        for mv in Move::ALL {
            let mut perm = SOLVED_PERM;
            let mut ori = SOLVED_ORI;
            apply_perm(&mut perm, mv);
            apply_ori(&mut ori, mv);
            assert_eq!(perm[Corner::Dbl.slot()], Corner::Dbl as u8);
            assert_eq!(ori[Corner::Dbl.slot()], 0);
        }
    }

    #[test]
    fn test_twist_sum_is_preserved() {
        let mut ori = SOLVED_ORI;
        for mv in [Move::F1, Move::R3, Move::U1, Move::F2, Move::R1] {
            apply_ori(&mut ori, mv);
            let sum: u32 = ori.iter().map(|&twist| twist as u32).sum();
            assert_eq!(sum % 3, 0, "twist parity broken after {mv}");
        }
    }

    #[test]
    fn test_up_turn_cycles_top_layer() {
        let mut perm = SOLVED_PERM;
        apply_perm(&mut perm, Move::U1);
        // the UBR corner comes to the front-right slot
        assert_eq!(perm, [3, 0, 1, 2, 4, 5, 6, 7]);
    }

    #[test]
    fn test_right_turn_twists_corners() {
        let mut ori = SOLVED_ORI;
        apply_ori(&mut ori, Move::R1);
        assert_eq!(ori, [2, 0, 0, 1, 1, 0, 0, 2]);
    }

    #[test]
    fn test_parse_move_names() {
        for mv in Move::ALL {
            assert_eq!(mv.name().parse::<Move>().ok(), Some(mv));
            assert_eq!(mv.name().to_lowercase().parse::<Move>().ok(), Some(mv));
        }
        assert!("R4".parse::<Move>().is_err());
        assert!("L1".parse::<Move>().is_err());
        assert!("".parse::<Move>().is_err());
    }

    #[test]
    fn test_move_names() {
        let table = Move::ALL
            .iter()
            .map(|mv| format!("{mv} code={} inverse={}", mv.code(), mv.inverse()))
            .collect::<Vec<_>>()
            .join("\n");
        insta::assert_snapshot!(table);
    }

    #[test]
    fn test_codes_round_trip() {
        for mv in Move::ALL {
            assert_eq!(Move::from_code(mv.code()), Some(mv));
        }
        assert_eq!(Move::from_code(9), None);
        assert_eq!(Move::from_code(15), None);
    }
}
