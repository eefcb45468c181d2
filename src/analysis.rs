//! Analysis of nonterminal usefulness.

use bit_matrix::BitMatrix;
use bit_vec::BitVec;

use crate::grammar::{CnfGrammar, Nonterminal};

/// Returns the direct derivation matrix: `(A, B)` is set when `A → B C` or
/// `A → C B`.
pub fn direct_derivation_matrix(grammar: &CnfGrammar) -> BitMatrix {
    let num_nonterms = grammar.num_nonterms();
    let mut derivation = BitMatrix::new(num_nonterms, num_nonterms);

    for rule in grammar.complex_rules() {
        derivation.set(rule.lhs.usize(), rule.left.usize(), true);
        derivation.set(rule.lhs.usize(), rule.right.usize(), true);
    }
    derivation
}

/// Returns the reachability matrix. Every nonterminal reaches itself.
pub fn reachability_matrix(grammar: &CnfGrammar) -> BitMatrix {
    let mut result = direct_derivation_matrix(grammar);
    result.transitive_closure();
    result.reflexive_closure();
    result
}

/// Returns the set of nonterminals that derive at least one terminal string.
pub fn productive_nonterms(grammar: &CnfGrammar) -> BitVec {
    let mut productive = BitVec::from_elem(grammar.num_nonterms(), false);
    for rule in grammar.simple_rules() {
        productive.set(rule.lhs.usize(), true);
    }
    let mut changed = true;
    while changed {
        changed = false;
        for rule in grammar.complex_rules() {
            if !productive[rule.lhs.usize()]
                && productive[rule.left.usize()]
                && productive[rule.right.usize()]
            {
                productive.set(rule.lhs.usize(), true);
                changed = true;
            }
        }
    }
    productive
}

/// Contains the information about usefulness of the grammar's nonterminals.
/// Useful nonterminals are both reachable from the start and productive.
///
/// Useless nonterminals never contribute to the start relation, though the
/// engines still compute their matrices.
pub struct Usefulness {
    reachable: BitVec,
    productive: BitVec,
}

impl Usefulness {
    /// Analyzes usefulness of the grammar's nonterminals.
    pub fn new(grammar: &CnfGrammar) -> Self {
        let reachability = reachability_matrix(grammar);
        let reachable = reachability
            .iter_row(grammar.start().usize())
            .collect::<BitVec>();
        Usefulness {
            reachable,
            productive: productive_nonterms(grammar),
        }
    }

    /// Checks whether a nonterminal is reachable from the start.
    pub fn reachable(&self, nonterm: Nonterminal) -> bool {
        self.reachable[nonterm.usize()]
    }

    /// Checks whether a nonterminal derives at least one terminal string.
    pub fn productive(&self, nonterm: Nonterminal) -> bool {
        self.productive[nonterm.usize()]
    }

    /// Checks whether all nonterminals are useful.
    pub fn all_useful(&self) -> bool {
        self.reachable.all() && self.productive.all()
    }

    /// Iterates over nonterminals that are unreachable or unproductive.
    pub fn useless_nonterms(&self) -> impl Iterator<Item = Nonterminal> + '_ {
        self.reachable
            .iter()
            .zip(self.productive.iter())
            .enumerate()
            .filter(|&(_, (reachable, productive))| !(reachable && productive))
            .map(|(i, _)| Nonterminal::from(i))
    }
}
