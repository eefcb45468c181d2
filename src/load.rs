//! Loads graphs from edge lists and grammars from CNF production lists.

use std::fs;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

use crate::analysis::Usefulness;
use crate::error::{CfpqError, Result};
use crate::grammar::{CnfGrammar, CnfGrammarBuilder};
use crate::label_graph::LabelGraph;

const START_DIRECTIVE: &str = "start:";

/// Iterates over one-indexed lines, skipping blank lines and `#` comments.
fn content_lines(text: &str) -> impl Iterator<Item = (u32, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i as u32 + 1, line.trim()))
        .filter(|&(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn parse_vertex(token: &str, line: u32) -> Result<usize> {
    token
        .parse()
        .map_err(|_| CfpqError::graph(line, format!("invalid vertex {:?}", token)))
}

impl LabelGraph<String> {
    /// Parses an edge list with one `<from> <label> <to>` triple per line.
    ///
    /// The matrices are sized one greater than the largest vertex seen.
    pub fn from_edge_list(text: &str) -> Result<Self> {
        let mut edges = vec![];
        let mut max_vertex: Option<usize> = None;
        for (line, content) in content_lines(text) {
            let tokens: Vec<&str> = content.split_whitespace().collect();
            let [from, label, to] = tokens[..] else {
                return Err(CfpqError::graph(
                    line,
                    format!("expected `<from> <label> <to>`, found {} tokens", tokens.len()),
                ));
            };
            let from = parse_vertex(from, line)?;
            let to = parse_vertex(to, line)?;
            max_vertex = max_vertex.max(Some(from.max(to)));
            edges.push((from, label.to_string(), to));
        }

        let mut graph = LabelGraph::with_size(max_vertex.map_or(0, |v| v.saturating_add(1)));
        for (from, label, to) in edges {
            graph.add_edge(from, label, to)?;
        }
        debug!(
            "loaded graph: {} vertices, {} labels, {} edges",
            graph.matrices_size(),
            graph.labels().count(),
            graph.total_nnz()
        );
        Ok(graph)
    }

    /// Reads an edge list from `reader`.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::from_edge_list(&text)
    }

    /// Reads an edge list from a file.
    pub fn from_txt<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_edge_list(&fs::read_to_string(path)?)
    }
}

impl CnfGrammar {
    /// Parses a list of CNF productions.
    ///
    /// Each line is either `A a` (a simple rule with terminal `a`), `A B C`
    /// (a complex rule), or `start: S`. Without a `start:` line, the start is
    /// the left-hand side of the first production.
    pub fn from_cnf_str(text: &str) -> Result<Self> {
        let mut builder = CnfGrammarBuilder::new();
        let mut start_directive: Option<(u32, String)> = None;
        let mut first_lhs = None;
        let mut terminals = vec![];

        for (line, content) in content_lines(text) {
            if let Some(name) = content.strip_prefix(START_DIRECTIVE) {
                let name = name.trim();
                if name.is_empty() || name.contains(char::is_whitespace) {
                    return Err(CfpqError::grammar(line, "expected `start: <nonterminal>`"));
                }
                if start_directive.is_some() {
                    return Err(CfpqError::grammar(line, "start symbol designated twice"));
                }
                start_directive = Some((line, name.to_string()));
                continue;
            }
            let tokens: Vec<&str> = content.split_whitespace().collect();
            match tokens[..] {
                [lhs, terminal] => {
                    let lhs = builder.nonterm(lhs);
                    first_lhs.get_or_insert(lhs);
                    builder.rule(lhs).terminal(terminal);
                    terminals.push((line, terminal));
                }
                [lhs, left, right] => {
                    let [lhs, left, right] = builder.nonterms([lhs, left, right]);
                    first_lhs.get_or_insert(lhs);
                    builder.rule(lhs).pair(left, right);
                }
                _ => {
                    return Err(CfpqError::grammar(
                        line,
                        format!(
                            "expected `A a` or `A B C`, found {} symbols",
                            tokens.len()
                        ),
                    ))
                }
            }
        }

        for (line, terminal) in terminals {
            if builder.lookup(terminal).is_some() {
                return Err(CfpqError::grammar(
                    line,
                    format!("{} is a nonterminal, unit rules are not in CNF", terminal),
                ));
            }
        }

        let start = match start_directive {
            Some((line, name)) => builder.lookup(&name).ok_or_else(|| {
                CfpqError::grammar(line, format!("start symbol {} is not a nonterminal", name))
            })?,
            None => first_lhs.ok_or_else(|| CfpqError::grammar(0, "grammar has no productions"))?,
        };
        builder.start(start);
        let grammar = builder.build()?;

        let usefulness = Usefulness::new(&grammar);
        for nonterm in usefulness.useless_nonterms() {
            warn!(
                "nonterminal {} is {}",
                grammar.name(nonterm),
                if usefulness.reachable(nonterm) {
                    "unproductive"
                } else {
                    "unreachable from the start"
                }
            );
        }
        debug!(
            "loaded grammar: {} nonterminals, {} simple rules, {} complex rules",
            grammar.num_nonterms(),
            grammar.simple_rules().len(),
            grammar.complex_rules().len()
        );
        Ok(grammar)
    }

    /// Reads a list of CNF productions from a file.
    pub fn from_cnf<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_cnf_str(&fs::read_to_string(path)?)
    }
}
