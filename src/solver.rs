//! The solver: table lifecycle plus the string-level operations.

use std::path::Path;
use std::time::Instant;

use log::{info, warn};

use crate::coords::{
    decode_orientation, decode_permutation, MoveTables, OriCoord, PermCoord, ORI_CASES,
    PERM_CASES,
};
use crate::error::SolveError;
use crate::explore::explore;
use crate::facelets::{render, translate};
use crate::moves::{apply_ori, apply_perm, Move, SOLVED_ORI, SOLVED_PERM};
use crate::persistence;
use crate::store::ScrambleStore;

/// Owns a complete solution table and answers queries against it.
pub struct Solver {
    store: ScrambleStore,
}

impl Solver {
    /// Builds the table from scratch.
    ///
    /// # Panics
    ///
    /// If the coordinate tables fail their self-test. That is a defect in the
    /// move or coordinate definitions, not something a caller can recover
    /// from.
    pub fn build() -> Self {
        let start_time = Instant::now();
        let tables = MoveTables::new();
        if let Err(defect) = tables.self_test() {
            panic!("coordinate tables are defective: {defect}");
        }
        info!("Built move tables in {:.2?}", start_time.elapsed());

        let exploration = explore(&tables);
        Self {
            store: exploration.store,
        }
    }

    /// Loads the table from `path`, or builds it and saves it there when the
    /// file is missing or has the wrong length.
    ///
    /// A file of the right length whose entries fail validation is an error;
    /// it is never silently replaced.
    pub fn build_or_load(path: impl AsRef<Path>) -> Result<Self, SolveError> {
        let path = path.as_ref();
        match persistence::load(path) {
            Ok(store) => Ok(Self::from_store(store)),
            Err(SolveError::PersistenceUnavailable { source, .. }) => {
                info!("No usable table at {} ({source}), building", path.display());
                Ok(Self::build_and_save(path))
            }
            Err(e @ SolveError::TableSizeMismatch { .. }) => {
                warn!("{e}, rebuilding");
                Ok(Self::build_and_save(path))
            }
            Err(e) => Err(e),
        }
    }

    fn build_and_save(path: &Path) -> Self {
        let solver = Self::build();
        if let Err(e) = solver.save(path) {
            warn!("Keeping the table in memory only: {e}");
        }
        solver
    }

    /// Wraps an already loaded table.
    pub fn from_store(store: ScrambleStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ScrambleStore {
        &self.store
    }

    /// Writes the table to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SolveError> {
        persistence::save(&self.store, path.as_ref())
    }

    /// Shortest move sequence solving a cube string.
    pub fn solve(&self, cube: &str) -> Result<Vec<Move>, SolveError> {
        let (ori, perm) = translate(cube)?;
        Ok(self.solve_coords(ori, perm))
    }

    /// Shortest move sequence solving a combined state.
    pub fn solve_coords(&self, ori: OriCoord, perm: PermCoord) -> Vec<Move> {
        self.store.solve_coords(ori, perm)
    }
}

/// The sequence undoing `moves`.
pub fn invert(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|mv| mv.inverse()).collect()
}

/// Cube string reached by playing `moves` on a solved cube.
pub fn apply_sequence_to_solved(moves: &[Move]) -> String {
    let mut perm = SOLVED_PERM;
    let mut ori = SOLVED_ORI;
    for &mv in moves {
        apply_perm(&mut perm, mv);
        apply_ori(&mut ori, mv);
    }
    render(&perm, &ori)
}

/// Parses whitespace-separated move tokens.
pub fn parse_sequence(text: &str) -> Result<Vec<Move>, SolveError> {
    text.split_whitespace().map(str::parse).collect()
}

/// Formats moves as space-separated tokens.
pub fn format_sequence(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|mv| mv.name())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A uniformly random combined state.
pub fn random_state(rng: &mut fastrand::Rng) -> (OriCoord, PermCoord) {
    (
        rng.u16(..ORI_CASES as u16),
        rng.u16(..PERM_CASES as u16),
    )
}

/// A uniformly random solvable cube string.
pub fn random_cube(rng: &mut fastrand::Rng) -> String {
    let (ori, perm) = random_state(rng);
    render(&decode_permutation(perm), &decode_orientation(ori))
}

/// Random moves, never turning the same face twice in a row.
pub fn random_scramble(rng: &mut fastrand::Rng, length: usize) -> Vec<Move> {
    let mut moves: Vec<Move> = Vec::with_capacity(length);
    while moves.len() < length {
        let mv = Move::ALL[rng.usize(..Move::ALL.len())];
        if moves.last().is_some_and(|last| last.face() == mv.face()) {
            continue;
        }
        moves.push(mv);
    }
    moves
}
