use anyhow::anyhow;
use rdfobject::consts::{RDF_FIRST, RDF_NIL, RDF_REST};
use rdfobject::{string_to_term, Quad, RdfListMaterializer, Term};
use std::convert::Infallible;

fn quad(s: &str, p: &str, o: &str) -> Quad {
    Quad::new(string_to_term(s), string_to_term(p), string_to_term(o))
}

fn import(quads: Vec<Quad>) -> RdfListMaterializer {
    let mut materializer = RdfListMaterializer::new();
    materializer
        .import(quads.into_iter().map(Ok::<_, Infallible>))
        .unwrap();
    materializer
}

fn l(n: u8) -> Term {
    Term::named_node(format!("http://example.org/l{}", n))
}

fn literals(values: &[&str]) -> Option<Vec<Term>> {
    Some(values.iter().map(|v| Term::literal(*v)).collect())
}

#[test]
fn test_empty_stream_has_no_lists() {
    let materializer = import(vec![]);
    assert!(materializer.roots().is_empty());
    assert_eq!(materializer.get_list(&l(0)), None);
}

#[test]
fn test_valid_list() {
    let materializer = import(vec![
        quad(
            "http://example.org/listResource",
            "http://example.org/listPredicate",
            "http://example.org/l0",
        ),
        quad("http://example.org/l0", RDF_FIRST, "\"A\""),
        quad("http://example.org/l0", RDF_REST, "http://example.org/l1"),
        quad("http://example.org/l1", RDF_FIRST, "\"B\""),
        quad("http://example.org/l1", RDF_REST, "http://example.org/l2"),
        quad("http://example.org/l2", RDF_FIRST, "\"C\""),
        quad("http://example.org/l2", RDF_REST, RDF_NIL),
    ]);
    assert_eq!(materializer.roots(), vec![l(0), l(1), l(2)]);
    assert_eq!(materializer.get_list(&l(0)), literals(&["A", "B", "C"]));
    assert_eq!(materializer.get_list(&l(1)), literals(&["B", "C"]));
    assert_eq!(materializer.get_list(&l(2)), literals(&["C"]));
}

#[test]
fn test_valid_out_of_order_list() {
    let materializer = import(vec![
        quad("http://example.org/l2", RDF_REST, RDF_NIL),
        quad(
            "http://example.org/listResource",
            "http://example.org/listPredicate",
            "http://example.org/l0",
        ),
        quad("http://example.org/l0", RDF_REST, "http://example.org/l1"),
        quad("http://example.org/l1", RDF_FIRST, "\"B\""),
        quad("http://example.org/l1", RDF_REST, "http://example.org/l2"),
        quad("http://example.org/l0", RDF_FIRST, "\"A\""),
        quad("http://example.org/l2", RDF_FIRST, "\"C\""),
    ]);
    assert_eq!(materializer.roots(), vec![l(2), l(0), l(1)]);
    assert_eq!(materializer.get_list(&l(0)), literals(&["A", "B", "C"]));
    assert_eq!(materializer.get_list(&l(1)), literals(&["B", "C"]));
    assert_eq!(materializer.get_list(&l(2)), literals(&["C"]));
}

#[test]
fn test_incomplete_list() {
    let materializer = import(vec![
        quad(
            "http://example.org/listResource",
            "http://example.org/listPredicate",
            "http://example.org/l0",
        ),
        quad("http://example.org/l0", RDF_FIRST, "\"A\""),
    ]);
    assert!(materializer.roots().is_empty());
    assert_eq!(materializer.get_list(&l(0)), None);
}

#[test]
fn test_stream_error_propagates() {
    let mut materializer = RdfListMaterializer::new();
    let source = vec![
        Ok(quad("http://example.org/l0", RDF_FIRST, "\"A\"")),
        Err(anyhow!("parse failure")),
    ];
    let err = materializer.import(source).unwrap_err();
    assert_eq!(err.to_string(), "parse failure");
}
