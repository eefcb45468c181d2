//! All-pairs reachability for every nonterminal.

use log::{debug, trace};

use crate::config::{FixpointStats, SolverConfig};
use crate::error::Result;
use crate::grammar::{CnfGrammar, Nonterminal};
use crate::label_graph::LabelGraph;

/// Computes, for every nonterminal `A`, the matrix of vertex pairs `(u, v)`
/// connected by a path whose labels spell a word derivable from `A`.
pub struct GlobalEngine<'a> {
    graph: &'a LabelGraph<String>,
    grammar: &'a CnfGrammar,
    config: SolverConfig,
}

impl<'a> GlobalEngine<'a> {
    /// Creates an engine over the given graph and grammar.
    pub fn new(graph: &'a LabelGraph<String>, grammar: &'a CnfGrammar) -> Self {
        GlobalEngine {
            graph,
            grammar,
            config: SolverConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the initial matrices: `A` receives the edge matrix of `a` for
    /// every rule `A → a`. Every nonterminal gets an entry.
    pub fn init_simple_rules(&self) -> LabelGraph<Nonterminal> {
        let mut matrices = LabelGraph::with_size(self.graph.matrices_size());
        for nonterm in self.grammar.nonterms() {
            matrices.matrix_mut(nonterm);
        }
        for rule in self.grammar.simple_rules() {
            matrices.accumulate(rule.lhs, &self.graph[rule.terminal.as_str()]);
        }
        matrices
    }

    /// Computes the relation of every nonterminal.
    pub fn compute_all(&self) -> Result<LabelGraph<Nonterminal>> {
        self.compute_all_observed(|_, _| {}).map(|(matrices, _)| matrices)
    }

    /// Computes the relation of every nonterminal, calling `observe` with the
    /// pass number and the current matrices after every pass.
    pub fn compute_all_observed<F>(
        &self,
        observe: F,
    ) -> Result<(LabelGraph<Nonterminal>, FixpointStats)>
    where
        F: FnMut(usize, &LabelGraph<Nonterminal>),
    {
        let mut matrices = self.init_simple_rules();
        let stats = self.fixpoint(&mut matrices, observe)?;
        debug!(
            "global fixpoint: {} passes, start relation has {} pairs",
            stats.passes,
            matrices[&self.grammar.start()].nnz()
        );
        Ok((matrices, stats))
    }

    /// Applies complex rules to `matrices` until a whole pass changes nothing.
    ///
    /// Running this on matrices that already form a fixed point performs a
    /// single pass.
    pub fn run_fixpoint(&self, matrices: &mut LabelGraph<Nonterminal>) -> Result<FixpointStats> {
        self.fixpoint(matrices, |_, _| {})
    }

    fn fixpoint<F>(
        &self,
        matrices: &mut LabelGraph<Nonterminal>,
        mut observe: F,
    ) -> Result<FixpointStats>
    where
        F: FnMut(usize, &LabelGraph<Nonterminal>),
    {
        let mut stats = FixpointStats::default();
        loop {
            self.config.check_deadline(stats.passes)?;
            // Reset once per pass, never per rule.
            let mut changed = false;
            for rule in self.grammar.complex_rules() {
                let product = matrices[&rule.left].mxm(&matrices[&rule.right]);
                if matrices.accumulate(rule.lhs, &product) {
                    changed = true;
                    stats.changing_applications += 1;
                }
            }
            stats.passes += 1;
            trace!(
                "global pass {}: {} pairs in total",
                stats.passes,
                matrices.total_nnz()
            );
            observe(stats.passes, &*matrices);
            if !changed {
                return Ok(stats);
            }
        }
    }
}
