//! Reachability restricted to paths that start at chosen source vertices.
//!
//! Each nonterminal carries two matrices: its relation (`nonterms`), and a
//! diagonal matrix of source markers (`sources`). A marker `(j, j)` for `A`
//! means that rows of `A` starting at `j` must be derived. For a rule
//! `A → B C`, markers flow from `A` to `B`, and from the ends of `B`'s
//! matches to `C`:
//!
//! ```text
//! B_src += { (j, j) : (i, j) ∈ A_src }
//! tmp    = A_src · B
//! C_src += { (j, j) : (i, j) ∈ tmp }
//! A     += tmp · C
//! ```

mod brute;
mod opt;

use std::fmt;
use std::str::FromStr;

use log::trace;
use roaring::RoaringBitmap;

use crate::config::{FixpointStats, SolverConfig};
use crate::error::Result;
use crate::grammar::{CnfGrammar, ComplexRule, Nonterminal};
use crate::label_graph::LabelGraph;
use crate::matrix::BoolMatrix;

pub use self::brute::BruteSolver;
pub use self::opt::OptSolver;

/// Answers reachability queries from a set of source vertices.
///
/// A single solver must not serve two queries at once; `solve` takes
/// `&mut self` for that reason.
pub trait SingleSourceSolver {
    /// Returns the start nonterminal's relation restricted to rows in
    /// `sources`.
    fn solve(&mut self, sources: &[usize]) -> Result<BoolMatrix>;

    /// Returns the counters of the most recent successful query.
    fn last_stats(&self) -> Option<FixpointStats>;
}

/// Selects a [`SingleSourceSolver`] implementation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolverKind {
    /// Recomputes everything for every query.
    Brute,
    /// Keeps an index of derived relations across queries.
    Opt,
}

impl SolverKind {
    /// Creates a solver of this kind.
    pub fn build<'a>(
        self,
        graph: &'a LabelGraph<String>,
        grammar: &'a CnfGrammar,
        config: SolverConfig,
    ) -> Box<dyn SingleSourceSolver + 'a> {
        match self {
            SolverKind::Brute => Box::new(BruteSolver::new(graph, grammar).with_config(config)),
            SolverKind::Opt => Box::new(OptSolver::new(graph, grammar).with_config(config)),
        }
    }
}

impl FromStr for SolverKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "brute" => Ok(SolverKind::Brute),
            "opt" => Ok(SolverKind::Opt),
            other => Err(format!("unknown solver kind {:?}", other)),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolverKind::Brute => f.write_str("brute"),
            SolverKind::Opt => f.write_str("opt"),
        }
    }
}

/// Relations and source markers of every nonterminal.
#[derive(Clone, Debug)]
pub struct SingleSourceIndex<'a> {
    graph: &'a LabelGraph<String>,
    grammar: &'a CnfGrammar,
    nonterms: LabelGraph<Nonterminal>,
    sources: LabelGraph<Nonterminal>,
}

impl<'a> SingleSourceIndex<'a> {
    /// Creates an index with empty relations and no source markers.
    pub fn new(graph: &'a LabelGraph<String>, grammar: &'a CnfGrammar) -> Self {
        let size = graph.matrices_size();
        let mut nonterms = LabelGraph::with_size(size);
        let mut sources = LabelGraph::with_size(size);
        for nonterm in grammar.nonterms() {
            nonterms.matrix_mut(nonterm);
            sources.matrix_mut(nonterm);
        }
        SingleSourceIndex {
            graph,
            grammar,
            nonterms,
            sources,
        }
    }

    /// Unions the edge matrix of `a` into `A` for every rule `A → a`. Not
    /// restricted to any sources.
    pub fn init_simple_rules(&mut self) {
        let grammar = self.grammar;
        for rule in grammar.simple_rules() {
            self.nonterms
                .accumulate(rule.lhs, &self.graph[rule.terminal.as_str()]);
        }
    }

    /// Relations derived so far.
    pub fn nonterms(&self) -> &LabelGraph<Nonterminal> {
        &self.nonterms
    }

    /// Diagonal source markers.
    pub fn sources(&self) -> &LabelGraph<Nonterminal> {
        &self.sources
    }

    /// Returns the graph this index was built for.
    pub fn graph(&self) -> &'a LabelGraph<String> {
        self.graph
    }

    /// Returns the grammar this index was built for.
    pub fn grammar(&self) -> &'a CnfGrammar {
        self.grammar
    }

    /// Builds the diagonal matrix of `vertices`, checking that each one is a
    /// vertex of the graph.
    pub(crate) fn source_markers(&self, vertices: &[usize]) -> Result<BoolMatrix> {
        BoolMatrix::diagonal(self.graph.matrices_size(), vertices.iter().copied())
    }

    /// Applies complex rules until a whole pass changes neither a relation nor
    /// a source marker.
    ///
    /// Markers already present in `known` are never placed in this index, so
    /// derivations for them are not repeated.
    pub(crate) fn fixpoint(
        &mut self,
        known: Option<&LabelGraph<Nonterminal>>,
        config: &SolverConfig,
    ) -> Result<FixpointStats> {
        let grammar = self.grammar;
        let mut stats = FixpointStats::default();
        loop {
            config.check_deadline(stats.passes)?;
            let mut changed = false;
            for rule in grammar.complex_rules() {
                if self.apply(rule, known) {
                    changed = true;
                    stats.changing_applications += 1;
                }
            }
            stats.passes += 1;
            trace!(
                "single-source pass {}: {} pairs, {} markers",
                stats.passes,
                self.nonterms.total_nnz(),
                self.sources.total_nnz()
            );
            if !changed {
                return Ok(stats);
            }
        }
    }

    fn apply(&mut self, rule: &ComplexRule, known: Option<&LabelGraph<Nonterminal>>) -> bool {
        let ComplexRule { lhs, left, right } = *rule;

        let lhs_columns = self.sources[&lhs].nonempty_columns();
        let mut changed = update_sources(
            self.sources.matrix_mut(left),
            &lhs_columns,
            known.map(|known| &known[&left]),
        );

        let tmp = self.sources[&lhs].mxm(&self.nonterms[&left]);

        changed |= update_sources(
            self.sources.matrix_mut(right),
            &tmp.nonempty_columns(),
            known.map(|known| &known[&right]),
        );

        let derived = tmp.mxm(&self.nonterms[&right]);
        changed |= self.nonterms.accumulate(lhs, &derived);
        changed
    }
}

/// Marks `columns` on the diagonal of `dst`, then clears every marker that is
/// present in `known`. Returns `true` if the number of markers changed.
///
/// Marking must come first: clearing first would let a known marker back in.
fn update_sources(
    dst: &mut BoolMatrix,
    columns: &RoaringBitmap,
    known: Option<&BoolMatrix>,
) -> bool {
    let before = dst.nnz();
    dst.mark_diagonal(columns);
    if let Some(known) = known {
        dst.clear_diagonal_from(known);
    }
    dst.nnz() != before
}
