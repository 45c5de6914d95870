//! The solution table: one packed path per combined state.
//!
//! Packed path layout (u64, low bits first):
//! - bits 0..4: number of moves in the path (the BFS depth)
//! - then one 4-bit move code per move, the first move to play lowest
//!
//! The solved state is the all-zero entry.

use std::iter::FusedIterator;

use crate::coords::{OriCoord, PermCoord, ORI_CASES, PERM_CASES};
use crate::moves::Move;

/// Number of combined (orientation, permutation) states.
pub const STATE_COUNT: usize = ORI_CASES * PERM_CASES;

/// Longest shortest path: every state is solvable in at most this many moves.
pub const MAX_DEPTH: usize = 11;

const FIELD_BITS: u32 = 4;
const FIELD_MASK: u64 = (1 << FIELD_BITS) - 1;

/// Index of a combined state: orientation-major, permutation-minor.
#[inline(always)]
pub const fn state_index(ori: OriCoord, perm: PermCoord) -> usize {
    ori as usize * PERM_CASES + perm as usize
}

/// A solving move sequence packed into a u64.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PackedPath(u64);

impl PackedPath {
    /// The entry of the solved state: no moves.
    pub const SOLVED: Self = Self(0);

    #[inline(always)]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline(always)]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Number of moves in the path.
    #[inline(always)]
    pub const fn depth(self) -> usize {
        (self.0 & FIELD_MASK) as usize
    }

    /// Path of a state reached by one more move from this one.
    ///
    /// `undo` is the move that leads back here, which becomes the first move
    /// of the new path.
    #[inline(always)]
    pub const fn extend(self, undo: Move) -> Self {
        let moves = self.0 >> FIELD_BITS;
        let depth = self.depth() as u64 + 1;
        Self((((moves << FIELD_BITS) | undo.code() as u64) << FIELD_BITS) | depth)
    }

    /// The moves solving this entry's state, in playing order.
    ///
    /// Iteration stops early on a code that is not a move; only entries built
    /// by the explorer (or validated on load) are meaningful here.
    pub fn moves(self) -> PathMoves {
        PathMoves {
            codes: self.0 >> FIELD_BITS,
            remaining: self.depth(),
        }
    }

    /// Checks that every move code in the path is a real move and that no
    /// bits are set beyond the last one.
    pub fn is_well_formed(self) -> bool {
        let depth = self.depth();
        if depth > MAX_DEPTH {
            return false;
        }
        let codes = self.0 >> FIELD_BITS;
        if codes >> (depth as u32 * FIELD_BITS) != 0 {
            return false;
        }
        (0..depth as u32).all(|i| {
            let code = (codes >> (i * FIELD_BITS)) & FIELD_MASK;
            Move::from_code(code as u8).is_some()
        })
    }
}

/// Iterator over the moves of a [`PackedPath`].
pub struct PathMoves {
    codes: u64,
    remaining: usize,
}

impl Iterator for PathMoves {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        if self.remaining == 0 {
            return None;
        }
        let Some(mv) = Move::from_code((self.codes & FIELD_MASK) as u8) else {
            self.remaining = 0;
            return None;
        };
        self.codes >>= FIELD_BITS;
        self.remaining -= 1;
        Some(mv)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl FusedIterator for PathMoves {}

/// Read-only table of packed paths for every combined state.
///
/// Once built it is never written again, so it can be shared freely between
/// threads.
pub struct ScrambleStore {
    paths: Box<[PackedPath]>,
}

impl ScrambleStore {
    /// Wraps a complete path array.
    ///
    /// # Panics
    ///
    /// If `paths` does not hold exactly one entry per combined state.
    pub fn from_paths(paths: Vec<PackedPath>) -> Self {
        assert_eq!(
            paths.len(),
            STATE_COUNT,
            "a scramble store needs one entry per combined state"
        );
        Self {
            paths: paths.into_boxed_slice(),
        }
    }

    /// All entries, orientation-major.
    pub fn paths(&self) -> &[PackedPath] {
        &self.paths
    }

    /// Packed path of the given state.
    #[inline]
    pub fn lookup(&self, ori: OriCoord, perm: PermCoord) -> PackedPath {
        self.paths[state_index(ori, perm)]
    }

    /// Unpacks an entry into its move sequence.
    pub fn decode(entry: PackedPath) -> Vec<Move> {
        entry.moves().collect()
    }

    /// The moves solving the given state.
    pub fn solve_coords(&self, ori: OriCoord, perm: PermCoord) -> Vec<Move> {
        Self::decode(self.lookup(ori, perm))
    }

    /// Number of states at each depth.
    pub fn depth_histogram(&self) -> [usize; MAX_DEPTH + 1] {
        let mut histogram = [0; MAX_DEPTH + 1];
        for entry in self.paths.iter() {
            if let Some(count) = histogram.get_mut(entry.depth()) {
                *count += 1;
            }
        }
        histogram
    }

    /// Human-readable depth distribution, one line per depth plus a total.
    pub fn depth_report(&self) -> String {
        let histogram = self.depth_histogram();
        let mut lines: Vec<String> = histogram
            .iter()
            .enumerate()
            .map(|(depth, count)| format!("depth {depth:>2}: {count:>9}"))
            .collect();
        lines.push(format!("total:    {:>9}", histogram.iter().sum::<usize>()));
        lines.join("\n")
    }

    /// Structural check of a table that did not come straight from the
    /// explorer.
    ///
    /// Returns the reason the table is rejected.
    pub fn validate(&self) -> Result<(), String> {
        if self.paths[0] != PackedPath::SOLVED {
            return Err("solved state has a non-empty path".to_string());
        }
        for (index, entry) in self.paths.iter().enumerate().skip(1) {
            if entry.depth() == 0 {
                return Err(format!("state {index} has no path"));
            }
            if !entry.is_well_formed() {
                return Err(format!("state {index} has a malformed path {:#x}", entry.raw()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solved_entry_is_empty() {
        assert_eq!(PackedPath::SOLVED.depth(), 0);
        assert_eq!(ScrambleStore::decode(PackedPath::SOLVED), Vec::<Move>::new());
        assert!(PackedPath::SOLVED.is_well_formed());
    }

    #[test]
    fn test_extend_puts_newest_move_first() {
        // solved -R1-> a -U2-> b; b is solved by U2 then R3
        let a = PackedPath::SOLVED.extend(Move::R3);
        let b = a.extend(Move::U2);
        assert_eq!(a.depth(), 1);
        assert_eq!(b.depth(), 2);
        assert_eq!(ScrambleStore::decode(a), vec![Move::R3]);
        assert_eq!(ScrambleStore::decode(b), vec![Move::U2, Move::R3]);
    }

    #[test]
    fn test_bit_layout() {
        let path = PackedPath::SOLVED.extend(Move::F1).extend(Move::U3);
        // depth 2, then U3 (code 8), then F1 (code 0)
        assert_eq!(path.raw(), 0x0_8_2);
        let path = path.extend(Move::R2);
        assert_eq!(path.raw(), 0x0_8_4_3);
    }

    #[test]
    fn test_eleven_moves_fit() {
        let mut path = PackedPath::SOLVED;
        for _ in 0..MAX_DEPTH {
            path = path.extend(Move::U3);
        }
        assert_eq!(path.depth(), MAX_DEPTH);
        assert!(path.is_well_formed());
        assert_eq!(path.moves().count(), MAX_DEPTH);
        assert!(path.moves().all(|mv| mv == Move::U3));
    }

    #[test]
    fn test_malformed_entries() {
        // depth 1 with an invalid move code
        assert!(!PackedPath::from_raw(0xF1).is_well_formed());
        // depth 1 with a stray code above the path
        assert!(!PackedPath::from_raw(0x301).is_well_formed());
        // depth beyond the longest path
        assert!(!PackedPath::from_raw(0x0C).is_well_formed());
        // decoding stops at a bad code
        assert_eq!(PackedPath::from_raw(0xF_3_2).moves().collect::<Vec<_>>(), vec![Move::R1]);
    }

    #[test]
    fn test_state_index_is_orientation_major() {
        assert_eq!(state_index(0, 0), 0);
        assert_eq!(state_index(0, 1), 1);
        assert_eq!(state_index(1, 0), PERM_CASES);
        assert_eq!(state_index(728, 5039), STATE_COUNT - 1);
    }

    #[test]
    fn test_validate_rejects_missing_paths() {
        let store = ScrambleStore::from_paths(vec![PackedPath::SOLVED; STATE_COUNT]);
        assert_eq!(store.validate(), Err("state 1 has no path".to_string()));
    }
}
