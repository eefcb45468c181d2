//! Grammars in Chomsky Normal Form.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CfpqError, Result};

/// A nonterminal symbol, identified by its position among the grammar's
/// nonterminals.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
pub struct Nonterminal(u32);

impl Nonterminal {
    /// Returns the dense index of this nonterminal.
    pub fn usize(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for Nonterminal {
    fn from(index: usize) -> Self {
        Nonterminal(index as u32)
    }
}

/// A rule of the form `A → a`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SimpleRule {
    /// The rule's left-hand side.
    pub lhs: Nonterminal,
    /// The edge label matched by the rule.
    pub terminal: String,
}

/// A rule of the form `A → B C`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ComplexRule {
    /// The rule's left-hand side `A`.
    pub lhs: Nonterminal,
    /// The first right-hand side nonterminal `B`.
    pub left: Nonterminal,
    /// The second right-hand side nonterminal `C`.
    pub right: Nonterminal,
}

/// A context-free grammar in Chomsky Normal Form.
///
/// Immutable once built. Every production has either exactly one terminal
/// or exactly two nonterminals on its right-hand side.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CnfGrammar {
    names: Vec<String>,
    by_name: BTreeMap<String, Nonterminal>,
    start: Nonterminal,
    simple_rules: Vec<SimpleRule>,
    complex_rules: Vec<ComplexRule>,
}

/// Collects nonterminals and productions, then validates them into a
/// [`CnfGrammar`].
#[derive(Clone, Debug, Default)]
pub struct CnfGrammarBuilder {
    names: Vec<String>,
    by_name: BTreeMap<String, Nonterminal>,
    start: Option<Nonterminal>,
    simple_rules: Vec<SimpleRule>,
    complex_rules: Vec<ComplexRule>,
}

/// Adds alternatives for one left-hand side.
pub struct RuleBuilder<'a> {
    lhs: Nonterminal,
    grammar: &'a mut CnfGrammarBuilder,
}

impl CnfGrammar {
    /// Starts building a grammar.
    pub fn builder() -> CnfGrammarBuilder {
        CnfGrammarBuilder::new()
    }

    /// Returns the start nonterminal.
    pub fn start(&self) -> Nonterminal {
        self.start
    }

    /// Returns the number of nonterminals.
    pub fn num_nonterms(&self) -> usize {
        self.names.len()
    }

    /// Iterates over all nonterminals.
    pub fn nonterms(&self) -> impl Iterator<Item = Nonterminal> {
        (0..self.names.len()).map(Nonterminal::from)
    }

    /// Returns the name of a nonterminal.
    pub fn name(&self, nonterm: Nonterminal) -> &str {
        &self.names[nonterm.usize()]
    }

    /// Looks up a nonterminal by name.
    pub fn nonterm(&self, name: &str) -> Option<Nonterminal> {
        self.by_name.get(name).copied()
    }

    /// Rules of the form `A → a`, in the order they were added.
    pub fn simple_rules(&self) -> &[SimpleRule] {
        &self.simple_rules[..]
    }

    /// Rules of the form `A → B C`, in the order they were added.
    pub fn complex_rules(&self) -> &[ComplexRule] {
        &self.complex_rules[..]
    }
}

impl CnfGrammarBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a nonterminal, or returns the existing one of the same name.
    pub fn nonterm(&mut self, name: &str) -> Nonterminal {
        if let Some(&existing) = self.by_name.get(name) {
            return existing;
        }
        let nonterm = Nonterminal::from(self.names.len());
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), nonterm);
        nonterm
    }

    /// Declares several nonterminals at once.
    pub fn nonterms<const N: usize>(&mut self, names: [&str; N]) -> [Nonterminal; N] {
        names.map(|name| self.nonterm(name))
    }

    /// Looks up a declared nonterminal by name.
    pub fn lookup(&self, name: &str) -> Option<Nonterminal> {
        self.by_name.get(name).copied()
    }

    /// Designates the start nonterminal.
    pub fn start(&mut self, start: Nonterminal) -> &mut Self {
        self.start = Some(start);
        self
    }

    /// Starts adding alternatives for `lhs`.
    pub fn rule(&mut self, lhs: Nonterminal) -> RuleBuilder<'_> {
        RuleBuilder { lhs, grammar: self }
    }

    /// Checks the collected productions and builds the grammar.
    pub fn build(self) -> Result<CnfGrammar> {
        let num_nonterms = self.names.len();
        let declared = |nonterm: Nonterminal| nonterm.usize() < num_nonterms;
        let start = match self.start {
            Some(start) if declared(start) => start,
            Some(start) => {
                return Err(CfpqError::grammar(
                    0,
                    format!("start symbol {:?} is not a nonterminal", start),
                ))
            }
            None => return Err(CfpqError::grammar(0, "no start symbol")),
        };
        for rule in &self.simple_rules {
            if !declared(rule.lhs) {
                return Err(CfpqError::grammar(
                    0,
                    format!("undeclared nonterminal {:?}", rule.lhs),
                ));
            }
            if rule.terminal.is_empty() || rule.terminal.contains(char::is_whitespace) {
                return Err(CfpqError::grammar(
                    0,
                    format!("invalid terminal {:?}", rule.terminal),
                ));
            }
        }
        for rule in &self.complex_rules {
            for nonterm in [rule.lhs, rule.left, rule.right] {
                if !declared(nonterm) {
                    return Err(CfpqError::grammar(
                        0,
                        format!("undeclared nonterminal {:?}", nonterm),
                    ));
                }
            }
        }
        Ok(CnfGrammar {
            names: self.names,
            by_name: self.by_name,
            start,
            simple_rules: self.simple_rules,
            complex_rules: self.complex_rules,
        })
    }
}

impl<'a> RuleBuilder<'a> {
    /// Switches to adding alternatives for another left-hand side.
    pub fn rule(self, lhs: Nonterminal) -> Self {
        RuleBuilder {
            lhs,
            grammar: self.grammar,
        }
    }

    /// Adds `lhs → terminal`.
    pub fn terminal<T: Into<String>>(self, terminal: T) -> Self {
        self.grammar.simple_rules.push(SimpleRule {
            lhs: self.lhs,
            terminal: terminal.into(),
        });
        self
    }

    /// Adds `lhs → left right`.
    pub fn pair(self, left: Nonterminal, right: Nonterminal) -> Self {
        self.grammar.complex_rules.push(ComplexRule {
            lhs: self.lhs,
            left,
            right,
        });
        self
    }
}

/// Writes the grammar in the text format accepted by
/// [`CnfGrammar::from_cnf_str`](crate::CnfGrammar::from_cnf_str).
impl fmt::Display for CnfGrammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "start: {}", self.name(self.start))?;
        for rule in &self.simple_rules {
            writeln!(f, "{} {}", self.name(rule.lhs), rule.terminal)?;
        }
        for rule in &self.complex_rules {
            writeln!(
                f,
                "{} {} {}",
                self.name(rule.lhs),
                self.name(rule.left),
                self.name(rule.right)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_brackets() {
        let mut builder = CnfGrammar::builder();
        let [s, s1, a, b] = builder.nonterms(["S", "S1", "A", "B"]);
        builder
            .rule(s)
            .pair(a, s1)
            .pair(a, b)
            .rule(s1)
            .pair(s, b)
            .rule(a)
            .terminal("a")
            .rule(b)
            .terminal("b");
        builder.start(s);
        let grammar = builder.build().unwrap();

        assert_eq!(grammar.start(), s);
        assert_eq!(grammar.num_nonterms(), 4);
        assert_eq!(grammar.complex_rules().len(), 3);
        assert_eq!(grammar.simple_rules()[1].terminal, "b");
        assert_eq!(grammar.nonterm("S1"), Some(s1));
        assert_eq!(grammar.name(b), "B");
    }

    #[test]
    fn test_missing_start() {
        let mut builder = CnfGrammar::builder();
        let a = builder.nonterm("A");
        builder.rule(a).terminal("a");
        assert!(matches!(
            builder.build(),
            Err(CfpqError::GrammarFormat { .. })
        ));
    }

    #[test]
    fn test_foreign_start() {
        let mut builder = CnfGrammar::builder();
        let a = builder.nonterm("A");
        builder.rule(a).terminal("a");
        builder.start(Nonterminal::from(7));
        assert!(builder.build().is_err());
    }
}
