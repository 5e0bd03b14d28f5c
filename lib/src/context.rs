//! A JSON-LD context subset used to expand short names into full IRIs and to
//! compact IRIs back for display.
//!
//! Supported: term definitions as strings, `null` (disabled terms), or objects
//! with `@id`/`@prefix`; `@vocab`; `@base`; arrays of contexts merged in order;
//! and remote contexts referenced by URL. Everything else a full JSON-LD
//! processor does with a context (containers, reverse properties, scoped
//! contexts) is ignored.

use crate::errors::ContextError;
use indexmap::IndexMap;
use log::debug;
use reqwest::header::ACCEPT;
use serde_json::Value;

/// Maximum depth of remote context inclusion.
pub const MAX_CONTEXT_RECURSION: usize = 8;

#[derive(Debug, Clone, PartialEq)]
enum TermDefinition {
    /// Mapped to `null`: the term must never resolve.
    Disabled,
    Iri {
        id: String,
        /// Defined by a plain string rather than an expanded term definition.
        simple: bool,
        prefix: Option<bool>,
    },
}

impl TermDefinition {
    fn parse(key: &str, value: &Value) -> Result<Self, ContextError> {
        match value {
            Value::Null => Ok(TermDefinition::Disabled),
            Value::String(id) => Ok(TermDefinition::Iri {
                id: id.clone(),
                simple: true,
                prefix: None,
            }),
            Value::Object(map) => {
                let prefix = match map.get("@prefix") {
                    None => None,
                    Some(Value::Bool(b)) => Some(*b),
                    Some(other) => {
                        return Err(ContextError::new(format!(
                            "Found an invalid @prefix boolean in a context term: '{}': '{}'",
                            key, other
                        )))
                    }
                };
                match map.get("@id") {
                    Some(Value::Null) => Ok(TermDefinition::Disabled),
                    Some(Value::String(id)) => Ok(TermDefinition::Iri {
                        id: id.clone(),
                        simple: false,
                        prefix,
                    }),
                    // no @id: the term maps onto itself and may be expanded later
                    None => Ok(TermDefinition::Iri {
                        id: key.to_string(),
                        simple: false,
                        prefix,
                    }),
                    Some(other) => Err(ContextError::new(format!(
                        "Found an invalid @id in a context term: '{}': '{}'",
                        key, other
                    ))),
                }
            }
            other => Err(ContextError::new(format!(
                "Found an invalid term value: '{}': '{}'",
                key, other
            ))),
        }
    }

    fn id(&self) -> Option<&str> {
        match self {
            TermDefinition::Disabled => None,
            TermDefinition::Iri { id, .. } => Some(id),
        }
    }
}

/// A resolved (normalized) context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    terms: IndexMap<String, TermDefinition>,
    vocab: Option<String>,
    base: Option<String>,
}

fn is_potential_keyword(term: &str) -> bool {
    term.len() > 1
        && term.starts_with('@')
        && term[1..].chars().all(|c| c.is_ascii_alphabetic())
}

fn is_compact_iri(term: &str) -> bool {
    !term.starts_with('#') && term.find(':').map(|pos| pos > 0).unwrap_or(false)
}

fn ends_with_gen_delim(iri: &str) -> bool {
    matches!(
        iri.chars().last(),
        Some(':' | '/' | '?' | '#' | '[' | ']' | '@')
    )
}

fn resolve_relative(iri: &str, base: &str) -> String {
    match url::Url::parse(base).and_then(|base| base.join(iri)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => iri.to_string(),
    }
}

fn fetch_remote_context(url: &str, offline: bool) -> Result<Value, ContextError> {
    if offline {
        return Err(ContextError::new(format!(
            "Failed to fetch context from {} while offline",
            url
        )));
    }
    debug!("Fetching remote context: {}", url);
    let client = reqwest::blocking::Client::new();
    let resp = client
        .get(url)
        .header(ACCEPT, "application/ld+json, application/json")
        .send()
        .map_err(|e| ContextError::new(format!("Failed to fetch context from {}: {}", url, e)))?;
    if !resp.status().is_success() {
        return Err(ContextError::new(format!(
            "Failed to fetch context from {}: status {}",
            url,
            resp.status()
        )));
    }
    resp.json::<Value>()
        .map_err(|e| ContextError::new(format!("Failed to parse context from {}: {}", url, e)))
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and normalizes a context specification.
    ///
    /// Strings are treated as URLs of remote context documents; with `offline`
    /// set, any remote reference fails.
    pub fn parse(spec: &Value, offline: bool) -> Result<Self, ContextError> {
        let mut context = Context::default();
        context.merge(spec, offline, 0)?;
        context.normalize();
        debug!(
            "Parsed context with {} terms (vocab: {:?}, base: {:?})",
            context.terms.len(),
            context.vocab,
            context.base
        );
        Ok(context)
    }

    fn merge(&mut self, spec: &Value, offline: bool, depth: usize) -> Result<(), ContextError> {
        match spec {
            Value::Null => {
                *self = Context::default();
                Ok(())
            }
            Value::Array(items) => {
                for item in items {
                    self.merge(item, offline, depth)?;
                }
                Ok(())
            }
            Value::String(url) => {
                if depth >= MAX_CONTEXT_RECURSION {
                    return Err(ContextError::new(format!(
                        "Detected overflow during context inclusion: {}",
                        url
                    )));
                }
                let document = fetch_remote_context(url, offline)?;
                let inner = document.get("@context").ok_or_else(|| {
                    ContextError::new(format!("Missing @context in remote context at {}", url))
                })?;
                self.merge(inner, offline, depth + 1)
            }
            Value::Object(map) => {
                if let Some(inner) = map.get("@context") {
                    return self.merge(inner, offline, depth);
                }
                for (key, value) in map {
                    match key.as_str() {
                        "@vocab" => self.vocab = Self::parse_keyword_iri(key, value)?,
                        "@base" => self.base = Self::parse_keyword_iri(key, value)?,
                        k if is_potential_keyword(k) => {
                            debug!("Ignoring context keyword {}", k);
                        }
                        _ => {
                            let definition = TermDefinition::parse(key, value)?;
                            self.terms.insert(key.clone(), definition);
                        }
                    }
                }
                Ok(())
            }
            other => Err(ContextError::new(format!(
                "Tried parsing a context that is not a string, array or object, but got {}",
                other
            ))),
        }
    }

    fn parse_keyword_iri(key: &str, value: &Value) -> Result<Option<String>, ContextError> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            other => Err(ContextError::new(format!(
                "Found an invalid {} IRI: {}",
                key, other
            ))),
        }
    }

    /// Expands compact IRIs used as term values (`"myP": "ex:p"`) against the
    /// other definitions, until no definition changes.
    fn normalize(&mut self) {
        for _ in 0..=self.terms.len() {
            let mut changed = false;
            let keys: Vec<String> = self.terms.keys().cloned().collect();
            for key in keys {
                let id = match self.terms.get(&key).and_then(|d| d.id()) {
                    Some(id) => id.to_string(),
                    None => continue,
                };
                let expanded = match self.expand_prefixed(&id) {
                    Some(expanded) if expanded != id => expanded,
                    _ => continue,
                };
                if let Some(TermDefinition::Iri { id, .. }) = self.terms.get_mut(&key) {
                    *id = expanded;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        if let Some(vocab) = self.vocab.clone() {
            if let Some(expanded) = self.expand_prefixed(&vocab) {
                self.vocab = Some(expanded);
            }
        }
    }

    /// Returns the prefix of a compact IRI when that prefix is a defined, enabled term.
    fn prefix_of<'t>(&self, term: &'t str) -> Option<(&'t str, &'t str)> {
        if term.starts_with('#') {
            return None;
        }
        let pos = term.find(':')?;
        let (prefix, rest) = (&term[..pos], &term[pos + 1..]);
        // suffixes starting with // are absolute IRIs, and _ is the blank node prefix
        if rest.starts_with("//") || prefix == "_" {
            return None;
        }
        match self.terms.get(prefix) {
            Some(TermDefinition::Iri { .. }) => Some((prefix, rest)),
            _ => None,
        }
    }

    fn expand_prefixed(&self, term: &str) -> Option<String> {
        let (prefix, suffix) = self.prefix_of(term)?;
        match self.terms.get(prefix)? {
            TermDefinition::Iri {
                id,
                simple,
                prefix: prefix_flag,
            } => {
                let usable = if *simple {
                    id.starts_with('_') || ends_with_gen_delim(id)
                } else {
                    id.starts_with('_')
                        || prefix_flag.unwrap_or(false)
                        || self.terms.contains_key(term)
                };
                if usable {
                    Some(format!("{}{}", id, suffix))
                } else {
                    // treat the term as an absolute IRI
                    Some(term.to_string())
                }
            }
            TermDefinition::Disabled => None,
        }
    }

    /// Expands a term to a full IRI.
    ///
    /// With `vocab`, term definitions and `@vocab` apply (property and type
    /// positions); without it, only prefixes and `@base` do (identifier
    /// positions). Returns `None` when the term is disabled in this context.
    /// Terms nothing applies to are returned unchanged.
    pub fn expand_term(&self, term: &str, vocab: bool) -> Option<String> {
        let definition = self.terms.get(term);
        if let Some(TermDefinition::Disabled) = definition {
            return None;
        }
        if vocab {
            if let Some(TermDefinition::Iri { id, .. }) = definition {
                if id != term {
                    return Some(id.clone());
                }
            }
        }
        if let Some(expanded) = self.expand_prefixed(term) {
            return Some(expanded);
        }
        let plain = !is_potential_keyword(term) && !is_compact_iri(term);
        if vocab {
            if let (Some(v), true) = (&self.vocab, plain) {
                if !v.contains(':') {
                    if let Some(base) = &self.base {
                        return Some(format!("{}{}", resolve_relative(v, base), term));
                    }
                }
                return Some(format!("{}{}", v, term));
            }
        } else if let (Some(base), true) = (&self.base, plain) {
            return Some(resolve_relative(term, base));
        }
        Some(term.to_string())
    }

    /// Compacts an IRI using the shortest matching prefix, or a term or `@vocab`
    /// when `vocab` is set. IRIs nothing applies to are returned unchanged.
    pub fn compact_iri(&self, iri: &str, vocab: bool) -> String {
        if vocab {
            if let Some(v) = &self.vocab {
                if let Some(rest) = iri.strip_prefix(v.as_str()) {
                    if !rest.is_empty() && self.terms.get(rest).is_none() {
                        return rest.to_string();
                    }
                }
            }
        }
        let mut shortest: Option<String> = None;
        for (key, definition) in &self.terms {
            let id = match definition.id() {
                Some(id) if !id.is_empty() => id,
                _ => continue,
            };
            let suffix = match iri.strip_prefix(id) {
                Some(suffix) => suffix,
                None => continue,
            };
            if suffix.is_empty() {
                if vocab {
                    return key.clone();
                }
                continue;
            }
            let prefixable = match definition {
                TermDefinition::Iri {
                    simple: true, id, ..
                } => id.starts_with('_') || ends_with_gen_delim(id),
                TermDefinition::Iri { prefix, .. } => prefix.unwrap_or(false),
                TermDefinition::Disabled => false,
            };
            if !prefixable {
                continue;
            }
            let candidate = format!("{}:{}", key, suffix);
            if shortest
                .as_ref()
                .map(|s| s.len() > candidate.len())
                .unwrap_or(true)
            {
                shortest = Some(candidate);
            }
        }
        shortest.unwrap_or_else(|| iri.to_string())
    }

    /// Returns true if the term is explicitly mapped to `null`.
    pub fn is_disabled(&self, term: &str) -> bool {
        matches!(self.terms.get(term), Some(TermDefinition::Disabled))
    }

    pub fn vocab(&self) -> Option<&str> {
        self.vocab.as_deref()
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.vocab.is_none() && self.base.is_none()
    }
}
