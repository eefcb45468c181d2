use log::debug;

use crate::config::{FixpointStats, SolverConfig};
use crate::error::Result;
use crate::grammar::CnfGrammar;
use crate::label_graph::LabelGraph;
use crate::matrix::BoolMatrix;

use super::{SingleSourceIndex, SingleSourceSolver};

/// Keeps the relations and source markers of past queries, so that a later
/// query only derives rows for sources that no earlier query has handled.
///
/// The persistent index is created along with the solver, grows with every
/// successful query and is never cleared. Every row of `index.nonterms()[A]`
/// that starts at a marker of `index.sources()[A]` is complete.
pub struct OptSolver<'a> {
    index: SingleSourceIndex<'a>,
    queried: BoolMatrix,
    config: SolverConfig,
    last_stats: Option<FixpointStats>,
}

impl<'a> OptSolver<'a> {
    /// Creates a solver with an empty index.
    pub fn new(graph: &'a LabelGraph<String>, grammar: &'a CnfGrammar) -> Self {
        let mut index = SingleSourceIndex::new(graph, grammar);
        index.init_simple_rules();
        OptSolver {
            index,
            queried: BoolMatrix::new(graph.matrices_size()),
            config: SolverConfig::default(),
            last_stats: None,
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the configuration used by later queries.
    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config;
    }

    /// The persistent index.
    pub fn index(&self) -> &SingleSourceIndex<'a> {
        &self.index
    }

    /// Returns the start nonterminal's relation restricted to every source
    /// queried so far.
    pub fn cumulative(&self) -> BoolMatrix {
        let start = self.index.grammar().start();
        self.index.nonterms[&start].restrict_rows(&self.queried)
    }
}

impl<'a> SingleSourceSolver for OptSolver<'a> {
    fn solve(&mut self, sources: &[usize]) -> Result<BoolMatrix> {
        let grammar = self.index.grammar();
        let start = grammar.start();
        let query = self.index.source_markers(sources)?;

        let mut cur_index = SingleSourceIndex::new(self.index.graph(), grammar);
        cur_index.nonterms = self.index.nonterms.clone();
        {
            // Mark new sources, then drop the ones already handled.
            let known = &self.index.sources[&start];
            let start_sources = cur_index.sources.matrix_mut(start);
            start_sources.accumulate(&query);
            start_sources.accumulate(known);
            start_sources.clear_diagonal_from(known);
        }
        let new_sources = cur_index.sources[&start].nnz();

        let stats = cur_index.fixpoint(Some(&self.index.sources), &self.config)?;

        for nonterm in grammar.nonterms() {
            self.index
                .nonterms
                .accumulate(nonterm, &cur_index.nonterms[&nonterm]);
            self.index
                .sources
                .accumulate(nonterm, &cur_index.sources[&nonterm]);
        }
        self.queried.accumulate(&query);

        let result = self.index.nonterms[&start].restrict_rows(&query);
        debug!(
            "opt query from {} sources ({} new): {} passes, {} pairs",
            query.nnz(),
            new_sources,
            stats.passes,
            result.nnz()
        );
        self.last_stats = Some(stats);
        Ok(result)
    }

    fn last_stats(&self) -> Option<FixpointStats> {
        self.last_stats
    }
}
