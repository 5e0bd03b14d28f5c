//! Reconstructs RDF lists from `rdf:first`/`rdf:rest` quads that may arrive in any
//! order.
//!
//! Chain links are recorded per subject while the stream is consumed; a list is
//! only materialized once the stream has ended, so the order in which the links
//! of a list arrive does not matter.

use crate::codec::{string_to_term, term_to_string};
use crate::consts::{RDF_FIRST_TERM, RDF_NIL_TERM, RDF_REST_TERM};
use crate::stream::{broadcast, QuadSink};
use crate::term::{Quad, Term};
use anyhow::Result;
use indexmap::IndexMap;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq)]
struct ChainLink {
    first: Option<Term>,
    rest: Option<Term>,
}

impl ChainLink {
    fn is_complete(&self) -> bool {
        self.first.is_some() && self.rest.is_some()
    }
}

/// Collects list chain links from a quad stream and materializes them into term
/// sequences.
#[derive(Debug, Default)]
pub struct RdfListMaterializer {
    // keyed by encoded subject, in order of first discovery
    chains: IndexMap<String, ChainLink>,
}

impl RdfListMaterializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the whole source as the only consumer.
    pub fn import<I, E>(&mut self, source: I) -> Result<()>
    where
        I: IntoIterator<Item = std::result::Result<Quad, E>>,
        E: Into<anyhow::Error>,
    {
        let sink: &mut dyn QuadSink = self;
        broadcast(source, &mut [sink])?;
        Ok(())
    }

    /// Returns the list starting at `root`, or `None` if `root` does not start a
    /// complete chain terminated by `rdf:nil`.
    pub fn get_list(&self, root: &Term) -> Option<Vec<Term>> {
        let mut items = Vec::new();
        let mut visited = HashSet::new();
        let mut key = term_to_string(root);
        loop {
            if !visited.insert(key.clone()) {
                // a chain that loops back on itself never reaches rdf:nil
                return None;
            }
            let link = self.chains.get(&key)?;
            let (first, rest) = match (&link.first, &link.rest) {
                (Some(first), Some(rest)) => (first, rest),
                _ => return None,
            };
            items.push(first.clone());
            if rest == &*RDF_NIL_TERM {
                return Some(items);
            }
            key = term_to_string(rest);
        }
    }

    /// All terms that have both an `rdf:first` and an `rdf:rest`, in the order
    /// they were first seen. Every link of a list is a root of its own suffix.
    pub fn roots(&self) -> Vec<Term> {
        self.chains
            .iter()
            .filter(|(_, link)| link.is_complete())
            .map(|(key, _)| string_to_term(key))
            .collect()
    }

    fn add_link(&mut self, subject: &Term, object: &Term, is_first: bool) {
        let link = self.chains.entry(term_to_string(subject)).or_default();
        if is_first {
            link.first = Some(object.clone());
        } else {
            link.rest = Some(object.clone());
        }
    }
}

impl QuadSink for RdfListMaterializer {
    fn on_quad(&mut self, quad: &Quad) {
        if quad.predicate == *RDF_FIRST_TERM {
            self.add_link(&quad.subject, &quad.object, true);
        } else if quad.predicate == *RDF_REST_TERM {
            self.add_link(&quad.subject, &quad.object, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{RDF_FIRST, RDF_NIL, RDF_REST};
    use std::convert::Infallible;

    fn quad(s: &str, p: &str, o: &str) -> Quad {
        Quad::new(string_to_term(s), string_to_term(p), string_to_term(o))
    }

    fn ok(quads: Vec<Quad>) -> impl Iterator<Item = std::result::Result<Quad, Infallible>> {
        quads.into_iter().map(Ok)
    }

    #[test]
    fn test_self_referencing_chain_is_not_a_list() {
        let mut m = RdfListMaterializer::new();
        m.import(ok(vec![
            quad("http://example.org/l0", RDF_FIRST, "\"A\""),
            quad("http://example.org/l0", RDF_REST, "http://example.org/l0"),
        ]))
        .unwrap();
        assert_eq!(m.roots(), vec![Term::named_node("http://example.org/l0")]);
        assert_eq!(m.get_list(&Term::named_node("http://example.org/l0")), None);
    }

    #[test]
    fn test_later_links_overwrite_earlier_ones() {
        let mut m = RdfListMaterializer::new();
        m.import(ok(vec![
            quad("_:l0", RDF_FIRST, "\"A\""),
            quad("_:l0", RDF_FIRST, "\"B\""),
            quad("_:l0", RDF_REST, RDF_NIL),
        ]))
        .unwrap();
        assert_eq!(
            m.get_list(&Term::blank_node("l0")),
            Some(vec![Term::literal("B")])
        );
    }

    #[test]
    fn test_dangling_rest_hides_whole_list() {
        let mut m = RdfListMaterializer::new();
        m.import(ok(vec![
            quad("_:l0", RDF_FIRST, "\"A\""),
            quad("_:l0", RDF_REST, "_:l1"),
            quad("_:l1", RDF_FIRST, "\"B\""),
        ]))
        .unwrap();
        assert_eq!(m.roots(), vec![Term::blank_node("l0")]);
        assert_eq!(m.get_list(&Term::blank_node("l0")), None);
    }
}
