//! Context-free path querying over edge-labeled graphs.
//!
//! Given a graph whose edges carry labels and a grammar in Chomsky Normal
//! Form, computes for every nonterminal `A` the pairs of vertices `(u, v)`
//! connected by a path whose labels spell a word derivable from `A`. The
//! computation is a monotone fixed point over boolean matrices.
//!
//! [`GlobalEngine`] derives all pairs. The [`SingleSourceSolver`]s restrict
//! the derivation to paths that start at a chosen set of vertices.

#![deny(
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod global;
pub mod grammar;
pub mod label_graph;
mod load;
pub mod matrix;
pub mod single_source;

pub use crate::config::{FixpointStats, SolverConfig};
pub use crate::error::{CfpqError, Result};
pub use crate::global::GlobalEngine;
pub use crate::grammar::{CnfGrammar, CnfGrammarBuilder, ComplexRule, Nonterminal, SimpleRule};
pub use crate::label_graph::LabelGraph;
pub use crate::matrix::BoolMatrix;
pub use crate::single_source::{
    BruteSolver, OptSolver, SingleSourceIndex, SingleSourceSolver, SolverKind,
};
