use log::debug;

use crate::config::{FixpointStats, SolverConfig};
use crate::error::Result;
use crate::grammar::CnfGrammar;
use crate::label_graph::LabelGraph;
use crate::matrix::BoolMatrix;

use super::{SingleSourceIndex, SingleSourceSolver};

/// Builds a fresh index for every query.
pub struct BruteSolver<'a> {
    graph: &'a LabelGraph<String>,
    grammar: &'a CnfGrammar,
    config: SolverConfig,
    last_stats: Option<FixpointStats>,
}

impl<'a> BruteSolver<'a> {
    /// Creates a solver over the given graph and grammar.
    pub fn new(graph: &'a LabelGraph<String>, grammar: &'a CnfGrammar) -> Self {
        BruteSolver {
            graph,
            grammar,
            config: SolverConfig::default(),
            last_stats: None,
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }
}

impl<'a> SingleSourceSolver for BruteSolver<'a> {
    fn solve(&mut self, sources: &[usize]) -> Result<BoolMatrix> {
        let start = self.grammar.start();
        let mut index = SingleSourceIndex::new(self.graph, self.grammar);
        let query = index.source_markers(sources)?;

        index.init_simple_rules();
        index.sources.accumulate(start, &query);

        let stats = index.fixpoint(None, &self.config)?;
        let result = index.nonterms[&start].restrict_rows(&query);
        debug!(
            "brute query from {} sources: {} passes, {} pairs",
            query.nnz(),
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
