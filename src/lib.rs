//! Pocket Cube Corner Solver Library
//!
//! Builds a complete table of shortest solutions for every state of a 2x2x2
//! cube and answers solve queries with a single lookup.
//!
//! Pipeline: face turns on raw corner vectors ([`moves`]) become coordinate
//! move tables ([`coords`]), a breadth-first search over all 3,674,160
//! coordinate pairs fills the packed-path table ([`explore`], [`store`]),
//! and cube strings are translated into coordinate pairs to query it
//! ([`facelets`]).

pub mod coords;
pub mod error;
pub mod explore;
pub mod facelets;
pub mod moves;
pub mod persistence;
pub mod solver;
pub mod store;

pub use error::SolveError;
pub use moves::Move;
pub use solver::{
    apply_sequence_to_solved, format_sequence, invert, parse_sequence, random_cube,
    random_scramble, Solver,
};
