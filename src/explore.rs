//! Breadth-first exploration of every combined state.
//!
//! Key points:
//! - The frontier of every depth lives in one allocation sized for the whole
//!   state space, sliced into per-depth segments from [`DEPTH_SIZES`]
//! - Visited states are a bitset with a single check-and-set operation
//! - A state's packed path is its parent's path extended by the inverse of
//!   the move that reached it, so first visit fixes the shortest path

use std::time::Instant;

use log::{debug, info};

use crate::coords::{MoveTables, OriCoord, PermCoord};
use crate::moves::Move;
use crate::store::{state_index, PackedPath, ScrambleStore, MAX_DEPTH, STATE_COUNT};

/// Number of states first reached at each depth, from the solved state at
/// depth 0 out to the farthest states at [`MAX_DEPTH`].
pub const DEPTH_SIZES: [usize; MAX_DEPTH + 1] = [
    1, 9, 54, 321, 1847, 9992, 50136, 227536, 870072, 1887748, 623800, 2644,
];

/// A combined state waiting in a frontier.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
struct Node {
    ori: OriCoord,
    perm: PermCoord,
}

/// Frontier storage for all depths in one buffer.
///
/// Depth `d` owns `nodes[start..start + DEPTH_SIZES[d]]`. A trailing empty
/// segment lets the last depth be expanded like any other.
struct FrontierArena {
    nodes: Vec<Node>,
    /// `(start, capacity)` per depth.
    segments: [(usize, usize); MAX_DEPTH + 2],
}

impl FrontierArena {
    fn new() -> Self {
        let mut segments = [(0, 0); MAX_DEPTH + 2];
        let mut start = 0;
        for (segment, &size) in segments.iter_mut().zip(DEPTH_SIZES.iter()) {
            *segment = (start, size);
            start += size;
        }
        segments[MAX_DEPTH + 1] = (start, 0);

        Self {
            nodes: vec![Node::default(); start],
            segments,
        }
    }

    /// The frontier of `depth` (read) and the segment of `depth + 1` (write).
    fn split(&mut self, depth: usize) -> (&[Node], &mut [Node]) {
        let (start, capacity) = self.segments[depth];
        let (next_start, next_capacity) = self.segments[depth + 1];
        let (before, after) = self.nodes.split_at_mut(next_start);
        (
            &before[start..start + capacity],
            &mut after[..next_capacity],
        )
    }
}

/// One bit per combined state.
pub struct VisitedSet {
    words: Vec<u64>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self {
            words: vec![0; STATE_COUNT.div_ceil(64)],
        }
    }

    /// Marks `index` visited, returning `true` if it was not visited before.
    #[inline(always)]
    pub fn claim(&mut self, index: usize) -> bool {
        let word = &mut self.words[index / 64];
        let bit = 1u64 << (index % 64);
        let fresh = *word & bit == 0;
        *word |= bit;
        fresh
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Number of visited states.
    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }
}

impl Default for VisitedSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a full exploration.
pub struct Exploration {
    pub store: ScrambleStore,
    /// States discovered per depth.
    pub histogram: [usize; MAX_DEPTH + 1],
    pub visited: VisitedSet,
}

impl Exploration {
    /// True when every combined state was reached.
    pub fn is_exhaustive(&self) -> bool {
        self.visited.count() == STATE_COUNT
    }
}

/// Explores the whole state space from the solved state.
///
/// # Panics
///
/// If a depth discovers more states than [`DEPTH_SIZES`] allows, which means
/// the move tables do not describe this puzzle.
pub fn explore(tables: &MoveTables) -> Exploration {
    let start_time = Instant::now();

    let mut arena = FrontierArena::new();
    let mut visited = VisitedSet::new();
    let mut paths = vec![PackedPath::SOLVED; STATE_COUNT];
    let mut histogram = [0; MAX_DEPTH + 1];

    let solved = Node { ori: 0, perm: 0 };
    visited.claim(state_index(solved.ori, solved.perm));
    arena.nodes[arena.segments[0].0] = solved;
    histogram[0] = 1;

    for depth in 0..=MAX_DEPTH {
        let (frontier, next) = arena.split(depth);
        let frontier = &frontier[..histogram[depth]];
        let mut discovered = 0;

        for node in frontier {
            let parent = paths[state_index(node.ori, node.perm)];

            for mv in Move::ALL {
                let ori = tables.apply_ori(node.ori, mv);
                let perm = tables.apply_perm(node.perm, mv);
                let index = state_index(ori, perm);

                if visited.claim(index) {
                    assert!(
                        discovered < next.len(),
                        "depth {} holds more than {} states",
                        depth + 1,
                        next.len()
                    );
                    next[discovered] = Node { ori, perm };
                    paths[index] = parent.extend(mv.inverse());
                    discovered += 1;
                }
            }
        }

        debug!("depth {}: {} new states", depth + 1, discovered);
        if discovered == 0 {
            break;
        }
        histogram[depth + 1] = discovered;
    }

    info!(
        "Explored {} states in {:.2?}",
        visited.count(),
        start_time.elapsed()
    );

    Exploration {
        store: ScrambleStore::from_paths(paths),
        histogram,
        visited,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::PERM_CASES;
    use std::sync::OnceLock;

    fn exploration() -> &'static Exploration {
        static EXPLORATION: OnceLock<Exploration> = OnceLock::new();
        EXPLORATION.get_or_init(|| explore(&MoveTables::new()))
    }

    #[test]
    fn test_depth_sizes_cover_state_space() {
        assert_eq!(DEPTH_SIZES.iter().sum::<usize>(), STATE_COUNT);
    }

    #[test]
    fn test_arena_segments_are_contiguous() {
        let arena = FrontierArena::new();
        assert_eq!(arena.nodes.len(), STATE_COUNT);
        for depth in 0..=MAX_DEPTH {
            let (start, capacity) = arena.segments[depth];
            assert_eq!(capacity, DEPTH_SIZES[depth]);
            assert_eq!(arena.segments[depth + 1].0, start + capacity);
        }
        assert_eq!(arena.segments[MAX_DEPTH + 1], (STATE_COUNT, 0));
    }

    #[test]
    fn test_claim_is_check_and_set() {
        let mut visited = VisitedSet::new();
        assert!(!visited.contains(12345));
        assert!(visited.claim(12345));
        assert!(!visited.claim(12345));
        assert!(visited.contains(12345));
        assert!(visited.claim(STATE_COUNT - 1));
        assert_eq!(visited.count(), 2);
    }

    #[test]
    fn test_every_state_visited() {
        let exploration = exploration();
        assert!(exploration.is_exhaustive());
        assert_eq!(exploration.visited.count(), STATE_COUNT);
    }

    #[test]
    fn test_histogram_matches_depth_sizes() {
        let exploration = exploration();
        assert_eq!(exploration.histogram, DEPTH_SIZES);
        assert_eq!(exploration.store.depth_histogram(), DEPTH_SIZES);
    }

    #[test]
    fn test_paths_lead_back_to_solved() {
        let exploration = exploration();
        let tables = MoveTables::new();

        // sample states across the table, including the farthest ones
        for index in (0..STATE_COUNT).step_by(7919) {
            let entry = exploration.store.paths()[index];
            let mut ori = (index / PERM_CASES) as OriCoord;
            let mut perm = (index % PERM_CASES) as PermCoord;
            for mv in entry.moves() {
                ori = tables.apply_ori(ori, mv);
                perm = tables.apply_perm(perm, mv);
            }
            assert_eq!((ori, perm), (0, 0), "path of state {index} does not solve it");
            assert_eq!(entry.moves().count(), entry.depth());
        }
    }

    #[test]
    fn test_neighbors_differ_by_at_most_one() {
        let exploration = exploration();
        let tables = MoveTables::new();
        for index in (0..STATE_COUNT).step_by(104729) {
            let ori = (index / PERM_CASES) as OriCoord;
            let perm = (index % PERM_CASES) as PermCoord;
            let depth = exploration.store.lookup(ori, perm).depth();
            for mv in Move::ALL {
                let neighbor = exploration
                    .store
                    .lookup(tables.apply_ori(ori, mv), tables.apply_perm(perm, mv))
                    .depth();
                assert!(neighbor.abs_diff(depth) <= 1, "BFS depths jump at {index}");
            }
        }
    }
}
