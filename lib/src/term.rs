//! Defines the `Term` and `Quad` types the loader consumes, along with conversions
//! to and from the oxigraph model.
//!
//! Quads are generalized: any kind of term may appear in any position, so that
//! streams produced by lenient parsers (blank node predicates, literal subjects)
//! can still be loaded as resources.

use crate::codec::term_to_string;
use crate::consts::{RDF_LANG_STRING, XSD_STRING};
use anyhow::{anyhow, Result};
use oxigraph::model::{
    BlankNode, GraphName, Literal, NamedNode, NamedOrBlankNode, Quad as OxQuad, Term as OxTerm,
};
use std::fmt;

/// An RDF term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// IRI node.
    NamedNode(String),
    /// Blank node label, without the `_:` prefix.
    BlankNode(String),
    /// Literal; `datatype` is always set. The constructors use `rdf:langString` when a
    /// language is present and keep the tag as given.
    Literal {
        value: String,
        datatype: String,
        language: Option<String>,
    },
    /// Query variable name, without the `?` prefix.
    Variable(String),
    DefaultGraph,
}

impl Term {
    pub fn named_node(iri: impl Into<String>) -> Self {
        Term::NamedNode(iri.into())
    }

    pub fn blank_node(label: impl Into<String>) -> Self {
        Term::BlankNode(label.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    /// A plain `xsd:string` literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: XSD_STRING.to_string(),
            language: None,
        }
    }

    pub fn lang_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: RDF_LANG_STRING.to_string(),
            language: Some(language.into()),
        }
    }

    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// Returns the term type name, e.g. "NamedNode" or "Literal".
    pub fn term_type(&self) -> &'static str {
        match self {
            Term::NamedNode(_) => "NamedNode",
            Term::BlankNode(_) => "BlankNode",
            Term::Literal { .. } => "Literal",
            Term::Variable(_) => "Variable",
            Term::DefaultGraph => "DefaultGraph",
        }
    }

    /// The IRI, blank node label, literal value or variable name of this term.
    pub fn value(&self) -> &str {
        match self {
            Term::NamedNode(v) | Term::BlankNode(v) | Term::Variable(v) => v,
            Term::Literal { value, .. } => value,
            Term::DefaultGraph => "",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", term_to_string(self))
    }
}

/// A generalized quad.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    pub graph: Term,
}

impl Quad {
    /// Creates a quad in the default graph.
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self::new_in_graph(subject, predicate, object, Term::DefaultGraph)
    }

    pub fn new_in_graph(subject: Term, predicate: Term, object: Term, graph: Term) -> Self {
        Quad {
            subject,
            predicate,
            object,
            graph,
        }
    }
}

// ---------------- Oxigraph helpers ----------------

impl From<OxTerm> for Term {
    fn from(term: OxTerm) -> Self {
        match term {
            OxTerm::NamedNode(n) => Term::NamedNode(n.into_string()),
            OxTerm::BlankNode(b) => Term::BlankNode(b.into_string()),
            OxTerm::Literal(l) => literal_from_oxigraph(&l),
            #[allow(unreachable_patterns)]
            other => Term::NamedNode(other.to_string()),
        }
    }
}

impl From<NamedOrBlankNode> for Term {
    fn from(node: NamedOrBlankNode) -> Self {
        match node {
            NamedOrBlankNode::NamedNode(n) => Term::NamedNode(n.into_string()),
            NamedOrBlankNode::BlankNode(b) => Term::BlankNode(b.into_string()),
        }
    }
}

impl From<GraphName> for Term {
    fn from(graph: GraphName) -> Self {
        match graph {
            GraphName::NamedNode(n) => Term::NamedNode(n.into_string()),
            GraphName::BlankNode(b) => Term::BlankNode(b.into_string()),
            GraphName::DefaultGraph => Term::DefaultGraph,
        }
    }
}

impl From<OxQuad> for Quad {
    fn from(quad: OxQuad) -> Self {
        Quad {
            subject: quad.subject.into(),
            predicate: Term::NamedNode(quad.predicate.into_string()),
            object: quad.object.into(),
            graph: quad.graph_name.into(),
        }
    }
}

fn literal_from_oxigraph(l: &Literal) -> Term {
    match l.language() {
        Some(lang) => Term::lang_literal(l.value(), lang),
        None => Term::typed_literal(l.value(), l.datatype().as_str()),
    }
}

fn named_or_blank_to_oxigraph(term: &Term) -> Result<NamedOrBlankNode> {
    match term {
        Term::NamedNode(iri) => Ok(NamedNode::new(iri.as_str())?.into()),
        Term::BlankNode(label) => Ok(BlankNode::new(label.as_str())?.into()),
        other => Err(anyhow!(
            "{} {} cannot be used as an oxigraph subject",
            other.term_type(),
            other
        )),
    }
}

/// Converts a term into an oxigraph term, failing for variables and the default graph.
pub fn to_oxigraph_term(term: &Term) -> Result<OxTerm> {
    match term {
        Term::NamedNode(iri) => Ok(NamedNode::new(iri.as_str())?.into()),
        Term::BlankNode(label) => Ok(BlankNode::new(label.as_str())?.into()),
        Term::Literal {
            value,
            datatype,
            language,
        } => Ok(match language {
            Some(lang) => Literal::new_language_tagged_literal(value.as_str(), lang.as_str())?,
            None if datatype == XSD_STRING => Literal::new_simple_literal(value.as_str()),
            None => Literal::new_typed_literal(value.as_str(), NamedNode::new(datatype.as_str())?),
        }
        .into()),
        other => Err(anyhow!("{} terms have no oxigraph equivalent", other.term_type())),
    }
}

/// Converts a generalized quad into an oxigraph quad, failing when a position holds
/// a term kind oxigraph does not allow there.
pub fn to_oxigraph_quad(quad: &Quad) -> Result<OxQuad> {
    let subject = named_or_blank_to_oxigraph(&quad.subject)?;
    let predicate = match &quad.predicate {
        Term::NamedNode(iri) => NamedNode::new(iri.as_str())?,
        other => {
            return Err(anyhow!(
                "{} {} cannot be used as an oxigraph predicate",
                other.term_type(),
                other
            ))
        }
    };
    let object = to_oxigraph_term(&quad.object)?;
    let graph_name = match &quad.graph {
        Term::DefaultGraph => GraphName::DefaultGraph,
        other => match named_or_blank_to_oxigraph(other)? {
            NamedOrBlankNode::NamedNode(n) => GraphName::NamedNode(n),
            NamedOrBlankNode::BlankNode(b) => GraphName::BlankNode(b),
        },
    };
    Ok(OxQuad::new(subject, predicate, object, graph_name))
}
