#![allow(dead_code)]

use std::collections::BTreeSet;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use cfpq::{BoolMatrix, CnfGrammar, LabelGraph, Nonterminal};

pub const BRACKETS: &str = "
# balanced brackets
start: S
S A S1
S A B
S1 S B
A a
B b
";

pub const TWO_BRACKETS: &str = "
S A S1
S A B
S C S2
S C D
S S S
S1 S B
S2 S D
A a
B b
C c
D d
";

pub const SQUARE: &str = "
S S S
S a
";

/// Only the marker of `X` changes in the first pass, the relation of `X` is
/// derived in the second.
pub const DELAYED: &str = "
start: S
X A B
S X D
A a
B b
D d
";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn grammar(text: &str) -> CnfGrammar {
    CnfGrammar::from_cnf_str(text).unwrap()
}

/// Two cycles sharing vertex `0`: one labeled `a` over the first half of the
/// vertices, one labeled `b` over vertex `0` and the second half.
pub fn worst_case_graph(num_vertices: usize) -> LabelGraph<String> {
    assert!(num_vertices >= 2);
    let mut graph = LabelGraph::with_size(num_vertices);
    let half = num_vertices / 2;
    for v in 0..half {
        graph.add_edge(v, "a".to_string(), (v + 1) % half).unwrap();
    }
    let mut b_cycle = vec![0];
    b_cycle.extend(half..num_vertices);
    for (i, &v) in b_cycle.iter().enumerate() {
        let next = b_cycle[(i + 1) % b_cycle.len()];
        graph.add_edge(v, "b".to_string(), next).unwrap();
    }
    graph
}

pub fn random_graph(
    seed: u64,
    num_vertices: usize,
    num_edges: usize,
    labels: &[&str],
) -> LabelGraph<String> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut graph = LabelGraph::with_size(num_vertices);
    for _ in 0..num_edges {
        let from = rng.gen_range(0..num_vertices);
        let to = rng.gen_range(0..num_vertices);
        let label = labels[rng.gen_range(0..labels.len())];
        graph.add_edge(from, label.to_string(), to).unwrap();
    }
    graph
}

/// Derives all `(A, u, v)` facts by joining sets of triples.
pub fn naive_relation(
    graph: &LabelGraph<String>,
    grammar: &CnfGrammar,
) -> BTreeSet<(Nonterminal, usize, usize)> {
    let mut facts = BTreeSet::new();
    for rule in grammar.simple_rules() {
        for (u, v) in &graph[rule.terminal.as_str()] {
            facts.insert((rule.lhs, u, v));
        }
    }
    loop {
        let mut derived = vec![];
        for rule in grammar.complex_rules() {
            for &(b, u, w) in &facts {
                if b != rule.left {
                    continue;
                }
                for &(c, w2, v) in &facts {
                    if c == rule.right && w2 == w && !facts.contains(&(rule.lhs, u, v)) {
                        derived.push((rule.lhs, u, v));
                    }
                }
            }
        }
        if derived.is_empty() {
            return facts;
        }
        facts.extend(derived);
    }
}

pub fn pairs_of(
    facts: &BTreeSet<(Nonterminal, usize, usize)>,
    nonterm: Nonterminal,
) -> Vec<(usize, usize)> {
    facts
        .iter()
        .filter(|&&(a, _, _)| a == nonterm)
        .map(|&(_, u, v)| (u, v))
        .collect()
}

pub fn restrict(matrix: &BoolMatrix, sources: &[usize]) -> Vec<(usize, usize)> {
    let mask = BoolMatrix::diagonal(matrix.size(), sources.iter().copied()).unwrap();
    matrix.restrict_rows(&mask).to_pairs()
}
