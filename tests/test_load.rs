mod support;

use std::io::Cursor;

use test_case::test_case;

use cfpq::analysis::Usefulness;
use cfpq::{CfpqError, CnfGrammar, LabelGraph};

#[test]
fn test_load_edge_list() {
    let text = "# comment\n0 a 1\n\n1 b 5\n  5 a 0  \n";
    let graph = LabelGraph::from_edge_list(text).unwrap();

    assert_eq!(graph.matrices_size(), 6);
    assert_eq!(graph["a"].to_pairs(), vec![(0, 1), (5, 0)]);
    assert_eq!(graph["b"].to_pairs(), vec![(1, 5)]);
    assert!(graph["c"].is_empty());
    assert_eq!(graph.labels().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn test_load_empty_edge_list() {
    let graph = LabelGraph::from_reader(Cursor::new("")).unwrap();
    assert_eq!(graph.matrices_size(), 0);
    assert_eq!(graph.total_nnz(), 0);
}

#[test_case("0 a\n" ; "missing target")]
#[test_case("0 a 1\n1 b x\n" ; "non-numeric vertex")]
#[test_case("0 a 1 2\n" ; "extra token")]
#[test_case("-1 a 2\n" ; "negative vertex")]
fn test_malformed_edge_list(text: &str) {
    assert!(matches!(
        LabelGraph::from_edge_list(text),
        Err(CfpqError::GraphFormat { .. })
    ));
}

#[test]
fn test_graph_error_line() {
    match LabelGraph::from_edge_list("0 a 1\n\n1 b\n") {
        Err(CfpqError::GraphFormat { line, .. }) => assert_eq!(line, 3),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_load_brackets() {
    let grammar = support::grammar(support::BRACKETS);

    assert_eq!(grammar.name(grammar.start()), "S");
    assert_eq!(grammar.num_nonterms(), 4);
    assert_eq!(grammar.simple_rules().len(), 2);
    assert_eq!(grammar.complex_rules().len(), 3);
    let rule = grammar.complex_rules()[2];
    assert_eq!(grammar.name(rule.lhs), "S1");
    assert_eq!(grammar.name(rule.left), "S");
    assert_eq!(grammar.name(rule.right), "B");
    assert!(Usefulness::new(&grammar).all_useful());
}

#[test]
fn test_explicit_start() {
    let grammar = support::grammar("A a\nB A A\nstart: B\n");
    assert_eq!(grammar.name(grammar.start()), "B");
}

#[test]
fn test_display_reloads() {
    let grammar = support::grammar(support::TWO_BRACKETS);
    let text = grammar.to_string();
    let reloaded = CnfGrammar::from_cnf_str(&text).unwrap();
    assert_eq!(reloaded.to_string(), text);
    assert_eq!(reloaded.num_nonterms(), grammar.num_nonterms());
}

#[test_case("" ; "empty")]
#[test_case("S\n" ; "single symbol")]
#[test_case("S A B C\n" ; "long rule")]
#[test_case("S A\nA a\n" ; "unit rule")]
#[test_case("start: T\nS a\n" ; "undeclared start")]
#[test_case("start: S\nstart: S\nS a\n" ; "two starts")]
#[test_case("start:\nS a\n" ; "blank start")]
fn test_malformed_grammar(text: &str) {
    assert!(matches!(
        CnfGrammar::from_cnf_str(text),
        Err(CfpqError::GrammarFormat { .. })
    ));
}

#[test]
fn test_grammar_error_line() {
    match CnfGrammar::from_cnf_str("S A B\n# fine\nA a b c\n") {
        Err(CfpqError::GrammarFormat { line, .. }) => assert_eq!(line, 3),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_useless_nonterms() {
    let grammar = support::grammar("S A B\nA a\nB B B\nC a\n");
    let usefulness = Usefulness::new(&grammar);
    let names: Vec<_> = usefulness
        .useless_nonterms()
        .map(|nonterm| grammar.name(nonterm))
        .collect();

    assert_eq!(names, vec!["S", "B", "C"]);
    assert!(usefulness.reachable(grammar.nonterm("B").unwrap()));
    assert!(!usefulness.productive(grammar.nonterm("B").unwrap()));
    assert!(!usefulness.reachable(grammar.nonterm("C").unwrap()));
}
