//! Canonical string encoding of terms, used as the interning key of resources and
//! as the key of the URI-indexed property store.
//!
//! The encoding follows the usual rdf-string conventions:
//!
//! | term          | encoding                                   |
//! |---------------|--------------------------------------------|
//! | named node    | `http://example.org/a`                     |
//! | blank node    | `_:b0`                                     |
//! | variable      | `?x`                                       |
//! | default graph | (empty string)                             |
//! | literal       | `"abc"`, `"abc"@en`, `"1"^^http://...#int` |
//!
//! Named nodes whose IRI is empty or begins with one of the sigils used by the
//! other kinds (`"`, `_`, `?`, `<`) are written as `<iri>` so no two terms share
//! an encoding. A language-tagged literal whose datatype is not `rdf:langString`
//! keeps its datatype as `"abc"@en^^http://...`. Language tags are kept as given.
//! Language tags and datatype IRIs must not contain `"`, and tags must not
//! contain `^^`.

use crate::consts::{RDF_LANG_STRING, XSD_STRING};
use crate::term::Term;

fn needs_brackets(iri: &str) -> bool {
    matches!(iri.chars().next(), None | Some('"' | '_' | '?' | '<'))
}

/// Encodes a term into its canonical string form.
pub fn term_to_string(term: &Term) -> String {
    match term {
        Term::NamedNode(iri) if needs_brackets(iri) => format!("<{}>", iri),
        Term::NamedNode(iri) => iri.clone(),
        Term::BlankNode(label) => format!("_:{}", label),
        Term::Variable(name) => format!("?{}", name),
        Term::DefaultGraph => String::new(),
        Term::Literal {
            value,
            datatype,
            language,
        } => match language {
            Some(lang) if datatype == RDF_LANG_STRING => format!("\"{}\"@{}", value, lang),
            Some(lang) => format!("\"{}\"@{}^^{}", value, lang, datatype),
            None if datatype == XSD_STRING => format!("\"{}\"", value),
            None => format!("\"{}\"^^{}", value, datatype),
        },
    }
}

/// Decodes a string produced by [`term_to_string`] back into its term.
///
/// Strings that are not in canonical form are still accepted: anything that does
/// not look like a literal, blank node, variable or bracketed IRI is read as a
/// named node.
pub fn string_to_term(value: &str) -> Term {
    if value.is_empty() {
        return Term::DefaultGraph;
    }
    if let Some(label) = value.strip_prefix("_:") {
        return Term::BlankNode(label.to_string());
    }
    if let Some(name) = value.strip_prefix('?') {
        return Term::Variable(name.to_string());
    }
    if value.starts_with('"') {
        return literal_from_string(value);
    }
    if value.len() >= 2 && value.starts_with('<') && value.ends_with('>') {
        return Term::NamedNode(value[1..value.len() - 1].to_string());
    }
    Term::NamedNode(value.to_string())
}

fn literal_from_string(value: &str) -> Term {
    // the lexical form may itself contain quotes, so the closing quote is the last one
    let end = match value.rfind('"') {
        Some(end) if end > 0 => end,
        _ => return Term::literal(&value[1..]),
    };
    let lexical = &value[1..end];
    let suffix = &value[end + 1..];
    if let Some(tagged) = suffix.strip_prefix('@') {
        let (lang, datatype) = match tagged.split_once("^^") {
            Some((lang, datatype)) => (lang, datatype),
            None => (tagged, RDF_LANG_STRING),
        };
        Term::Literal {
            value: lexical.to_string(),
            datatype: datatype.to_string(),
            language: Some(lang.to_string()),
        }
    } else if let Some(datatype) = suffix.strip_prefix("^^") {
        Term::typed_literal(lexical, datatype)
    } else {
        Term::literal(lexical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_kinds() {
        assert_eq!(
            term_to_string(&Term::named_node("http://example.org/s")),
            "http://example.org/s"
        );
        assert_eq!(
            term_to_string(&Term::blank_node("http://example.org/o")),
            "_:http://example.org/o"
        );
        assert_eq!(term_to_string(&Term::variable("x")), "?x");
        assert_eq!(term_to_string(&Term::DefaultGraph), "");
        assert_eq!(term_to_string(&Term::literal("value1")), "\"value1\"");
        assert_eq!(term_to_string(&Term::lang_literal("a", "en")), "\"a\"@en");
        assert_eq!(
            term_to_string(&Term::typed_literal(
                "1",
                "http://www.w3.org/2001/XMLSchema#integer"
            )),
            "\"1\"^^http://www.w3.org/2001/XMLSchema#integer"
        );
    }

    #[test]
    fn test_decode_inverts_encode() {
        let terms = vec![
            Term::named_node("http://example.org/s"),
            Term::named_node(""),
            Term::named_node("_not_a_blank"),
            Term::named_node("\"quoted"),
            Term::named_node("<bracketed>"),
            Term::named_node("?query"),
            Term::blank_node("b0"),
            Term::variable("v"),
            Term::DefaultGraph,
            Term::literal(""),
            Term::literal("say \"hi\""),
            Term::lang_literal("chat", "fr"),
            Term::typed_literal("true", "http://www.w3.org/2001/XMLSchema#boolean"),
        ];
        for term in terms {
            let encoded = term_to_string(&term);
            assert_eq!(string_to_term(&encoded), term, "roundtrip of {:?}", encoded);
        }
    }

    #[test]
    fn test_distinct_terms_do_not_collide() {
        let a = term_to_string(&Term::named_node("_:b0"));
        let b = term_to_string(&Term::blank_node("b0"));
        assert_ne!(a, b);
        let c = term_to_string(&Term::named_node("\"x\""));
        let d = term_to_string(&Term::literal("x"));
        assert_ne!(c, d);
        let e = term_to_string(&Term::named_node(""));
        let f = term_to_string(&Term::DefaultGraph);
        assert_ne!(e, f);
    }

    #[test]
    fn test_tagged_literal_keeps_datatype() {
        let odd = Term::Literal {
            value: "a".to_string(),
            datatype: "http://example.org/dt".to_string(),
            language: Some("en".to_string()),
        };
        let plain = Term::lang_literal("a", "en");
        assert_eq!(term_to_string(&odd), "\"a\"@en^^http://example.org/dt");
        assert_ne!(term_to_string(&odd), term_to_string(&plain));
        assert_eq!(string_to_term(&term_to_string(&odd)), odd);
        assert_eq!(string_to_term(&term_to_string(&plain)), plain);
    }

    #[test]
    fn test_language_tag_case_is_kept() {
        let upper = Term::lang_literal("a", "EN");
        assert_eq!(term_to_string(&upper), "\"a\"@EN");
        assert_eq!(string_to_term("\"a\"@EN"), upper);
        assert_ne!(term_to_string(&upper), term_to_string(&Term::lang_literal("a", "en")));
    }

    #[test]
    fn test_decode_lenient_input() {
        assert_eq!(string_to_term("\"abc"), Term::literal("abc"));
        assert_eq!(string_to_term("ex:a"), Term::named_node("ex:a"));
    }
}
