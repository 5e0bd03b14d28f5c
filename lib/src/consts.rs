//! Defines IRIs and constant terms for the RDF and RDFS vocabulary entries that
//! the loader, the list materializer and the serializer treat specially.

use crate::term::Term;
use lazy_static::lazy_static;

// rdf
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
// rdfs
pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
// xsd
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Predicates followed by type checks, in the order they are consulted.
pub const TYPE_PREDICATES: [&str; 2] = [RDF_TYPE, RDFS_SUBCLASS_OF];

lazy_static! {
    pub static ref RDF_FIRST_TERM: Term = Term::named_node(RDF_FIRST);
    pub static ref RDF_REST_TERM: Term = Term::named_node(RDF_REST);
    pub static ref RDF_NIL_TERM: Term = Term::named_node(RDF_NIL);
}
