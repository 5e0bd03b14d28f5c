//! Loads quad streams and compacted JSON-like values into a [`Registry`] of linked
//! resources.

use crate::codec::string_to_term;
use crate::config::LoaderConfig;
use crate::consts::{RDF_NIL_TERM, RDF_TYPE};
use crate::context::Context;
use crate::errors::ContextError;
use crate::list::RdfListMaterializer;
use crate::properties::PropertyWrite;
use crate::resource::{Registry, ResourceId};
use crate::stream::{broadcast, QuadSink};
use crate::term::{Quad, Term};
use anyhow::{anyhow, Error, Result};
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde_json::{Number, Value};
use std::convert::Infallible;

#[derive(Debug, Clone)]
enum ContextState {
    Resolved,
    Failed(ContextError),
}

/// A value accepted by [`RdfObjectLoader::create_compacted_resource`].
///
/// Mirrors JSON, with objects keeping their key order, plus two passthrough
/// variants for existing resources and terms.
#[derive(Debug, Clone, PartialEq)]
pub enum CompactedValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<CompactedValue>),
    Object(IndexMap<String, CompactedValue>),
    Resource(ResourceId),
    Term(Term),
}

impl CompactedValue {
    /// An empty object, which describes a fresh blank node resource.
    pub fn object() -> Self {
        CompactedValue::Object(IndexMap::new())
    }

    /// Adds an entry to an object value; other values are returned unchanged.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CompactedValue>) -> Self {
        if let CompactedValue::Object(map) = &mut self {
            map.insert(key.into(), value.into());
        }
        self
    }

    fn into_items(self) -> Vec<CompactedValue> {
        match self {
            CompactedValue::Array(items) => items,
            other => vec![other],
        }
    }
}

impl From<Value> for CompactedValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CompactedValue::Null,
            Value::Bool(b) => CompactedValue::Bool(b),
            Value::Number(n) => CompactedValue::Number(n),
            Value::String(s) => CompactedValue::String(s),
            Value::Array(items) => {
                CompactedValue::Array(items.into_iter().map(CompactedValue::from).collect())
            }
            Value::Object(map) => CompactedValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, CompactedValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for CompactedValue {
    fn from(value: &str) -> Self {
        CompactedValue::String(value.to_string())
    }
}

impl From<String> for CompactedValue {
    fn from(value: String) -> Self {
        CompactedValue::String(value)
    }
}

impl From<bool> for CompactedValue {
    fn from(value: bool) -> Self {
        CompactedValue::Bool(value)
    }
}

impl From<i64> for CompactedValue {
    fn from(value: i64) -> Self {
        CompactedValue::Number(value.into())
    }
}

impl From<ResourceId> for CompactedValue {
    fn from(value: ResourceId) -> Self {
        CompactedValue::Resource(value)
    }
}

impl From<Term> for CompactedValue {
    fn from(value: Term) -> Self {
        CompactedValue::Term(value)
    }
}

impl<T: Into<CompactedValue>> From<Vec<T>> for CompactedValue {
    fn from(values: Vec<T>) -> Self {
        CompactedValue::Array(values.into_iter().map(Into::into).collect())
    }
}

/// Takes streams or arrays of RDF quads and loads them as linked resources.
pub struct RdfObjectLoader {
    config: LoaderConfig,
    resources: Registry,
    context_state: ContextState,
}

impl RdfObjectLoader {
    /// Creates a loader and resolves its context.
    ///
    /// A context that fails to resolve does not fail construction; the loader
    /// falls back to an empty context and every later [`RdfObjectLoader::import`]
    /// reports the failure after its pass.
    pub fn new(config: LoaderConfig) -> Self {
        let (context, context_state) = match Context::parse(&config.context, config.offline) {
            Ok(context) => (context, ContextState::Resolved),
            Err(err) => {
                warn!("Could not resolve loader context: {}", err);
                (Context::new(), ContextState::Failed(err))
            }
        };
        RdfObjectLoader {
            config,
            resources: Registry::with_context(context),
            context_state,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn normalize_lists(&self) -> bool {
        self.config.normalize_lists
    }

    pub fn context(&self) -> &Context {
        self.resources.context()
    }

    /// The error the context failed with, if any.
    pub fn context_error(&self) -> Option<&ContextError> {
        match &self.context_state {
            ContextState::Resolved => None,
            ContextState::Failed(err) => Some(err),
        }
    }

    /// Replaces the context, clearing any earlier resolution failure.
    pub fn set_context(&mut self, context: Context) {
        self.resources.set_context(context);
        self.context_state = ContextState::Resolved;
    }

    pub fn resources(&self) -> &Registry {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Registry {
        &mut self.resources
    }

    pub fn into_resources(self) -> Registry {
        self.resources
    }

    /// Get the resource for the given term, creating it if it does not exist.
    pub fn get_or_make_resource(&mut self, term: Term) -> ResourceId {
        self.resources.get_or_make_resource(term)
    }

    /// Imports the given stream of quads.
    ///
    /// Resources are created and linked for all terms of the stream. When list
    /// normalization is enabled, objects equal to `rdf:nil` get an empty list
    /// and every complete `rdf:first`/`rdf:rest` chain is attached as the list of
    /// its head. A stream error aborts the import; a context that failed to
    /// resolve is reported once the stream has been fully imported.
    pub fn import<I, E>(&mut self, source: I) -> Result<()>
    where
        I: IntoIterator<Item = std::result::Result<Quad, E>>,
        E: Into<Error>,
    {
        let normalize_lists = self.config.normalize_lists;
        let mut materializer = RdfListMaterializer::new();
        let mut edges = EdgeBuilder {
            resources: &mut self.resources,
            normalize_lists,
        };
        let count = if normalize_lists {
            let mut sinks: [&mut dyn QuadSink; 2] = [&mut edges, &mut materializer];
            broadcast(source, &mut sinks)?
        } else {
            let mut sinks: [&mut dyn QuadSink; 1] = [&mut edges];
            broadcast(source, &mut sinks)?
        };

        if normalize_lists {
            self.attach_lists(&materializer);
        }
        info!(
            "Imported {} quads, registry holds {} resources",
            count,
            self.resources.len()
        );

        match &self.context_state {
            ContextState::Resolved => Ok(()),
            ContextState::Failed(err) => Err(Error::new(err.clone())),
        }
    }

    /// Imports the given array of quads.
    pub fn import_array(&mut self, quads: &[Quad]) -> Result<()> {
        self.import(quads.iter().cloned().map(Ok::<_, Infallible>))
    }

    fn attach_lists(&mut self, materializer: &RdfListMaterializer) {
        for root in materializer.roots() {
            let items = match materializer.get_list(&root) {
                Some(items) => items,
                None => {
                    debug!("Skipping list at {} that does not end in rdf:nil", root);
                    continue;
                }
            };
            let Some(root_id) = self.resources.find(&root) else {
                continue;
            };
            let list = items
                .into_iter()
                .map(|item| self.resources.get_or_make_resource(item))
                .collect();
            self.resources.resource_mut(root_id).set_list(Some(list));
        }
    }

    /// Creates a resource for the given compacted value.
    ///
    /// - A string is expanded through the context (without vocab) and decoded as
    ///   a term; a disabled string becomes a fresh blank node.
    /// - A boolean or number becomes a plain literal of its textual form.
    /// - A resource or term is returned or interned as-is.
    /// - An object describes one resource. Its `@id` names it, or it is a fresh
    ///   blank node. `@type` values are added as `rdf:type`, `list` is its RDF
    ///   list, other keys starting with `@` are ignored, and any remaining key is
    ///   a shortcut property whose values are created recursively.
    ///
    /// Nested arrays are flattened one level into the values of a key; `null`
    /// entries are skipped.
    pub fn create_compacted_resource(
        &mut self,
        value: impl Into<CompactedValue>,
    ) -> Result<ResourceId> {
        match value.into() {
            CompactedValue::Null => Err(anyhow!("Cannot create a resource from null")),
            CompactedValue::Array(_) => Err(anyhow!(
                "Cannot create a single resource from an array, use create_compacted_resources"
            )),
            CompactedValue::String(s) => {
                let term = match self.resources.context().expand_term(&s, false) {
                    Some(expanded) if !expanded.is_empty() => string_to_term(&expanded),
                    _ => self.resources.fresh_blank_node(),
                };
                Ok(self.resources.get_or_make_resource(term))
            }
            CompactedValue::Bool(b) => Ok(self.make_literal(&b.to_string())),
            CompactedValue::Number(n) => Ok(self.make_literal(&n.to_string())),
            CompactedValue::Resource(id) => Ok(id),
            CompactedValue::Term(term) => Ok(self.resources.get_or_make_resource(term)),
            CompactedValue::Object(map) => self.create_object_resource(map),
        }
    }

    /// Creates resources for every entry of an array, or a single resource for
    /// any other value.
    pub fn create_compacted_resources(
        &mut self,
        value: impl Into<CompactedValue>,
    ) -> Result<Vec<ResourceId>> {
        match value.into() {
            CompactedValue::Array(items) => items
                .into_iter()
                .map(|item| self.create_compacted_resource(item))
                .collect(),
            other => Ok(vec![self.create_compacted_resource(other)?]),
        }
    }

    fn make_literal(&mut self, lexical: &str) -> ResourceId {
        self.resources
            .get_or_make_resource(string_to_term(&format!("\"{}\"", lexical)))
    }

    fn create_object_resource(
        &mut self,
        map: IndexMap<String, CompactedValue>,
    ) -> Result<ResourceId> {
        let expanded_id = match map.get("@id") {
            Some(CompactedValue::String(id)) => self.resources.context().expand_term(id, false),
            _ => None,
        };
        let term = match expanded_id {
            Some(expanded) if !expanded.is_empty() => Term::NamedNode(expanded),
            _ => self.resources.fresh_blank_node(),
        };
        let resource = self.resources.get_or_make_resource(term);

        for (key, value) in map {
            if key == "@type" {
                for sub_value in value.into_items() {
                    let type_resource = match sub_value {
                        CompactedValue::Null => continue,
                        CompactedValue::String(name) => {
                            let term = match self.resources.context().expand_term(&name, true) {
                                Some(expanded) => Term::NamedNode(expanded),
                                None => self.resources.fresh_blank_node(),
                            };
                            self.resources.get_or_make_resource(term)
                        }
                        other => self.create_compacted_resource(other)?,
                    };
                    self.resources
                        .properties_mut(resource)
                        .get_all_mut(RDF_TYPE)?
                        .push(type_resource);
                }
            } else if key.starts_with('@') {
                continue;
            } else if key == "list" {
                let mut list = Vec::new();
                for sub_value in value.into_items() {
                    if sub_value != CompactedValue::Null {
                        list.push(self.create_compacted_resource(sub_value)?);
                    }
                }
                self.resources.resource_mut(resource).set_list(Some(list));
            } else {
                for sub_value in value.into_items() {
                    if sub_value == CompactedValue::Null {
                        continue;
                    }
                    let object = self.create_compacted_resource(sub_value)?;
                    self.resources
                        .properties_mut(resource)
                        .get_all_mut(&key)?
                        .push(object);
                }
            }
        }
        Ok(resource)
    }
}

impl Default for RdfObjectLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

/// Stream consumer that interns the terms of each quad and links them.
struct EdgeBuilder<'a> {
    resources: &'a mut Registry,
    normalize_lists: bool,
}

impl QuadSink for EdgeBuilder<'_> {
    fn on_quad(&mut self, quad: &Quad) {
        let subject = self.resources.get_or_make_resource(quad.subject.clone());
        let predicate = self.resources.get_or_make_resource(quad.predicate.clone());
        let object = self.resources.get_or_make_resource(quad.object.clone());
        if self.normalize_lists && quad.object == *RDF_NIL_TERM {
            self.resources.resource_mut(object).set_list(Some(Vec::new()));
        }
        self.resources.add_property(subject, predicate, object);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::PropertyRead;
    use serde_json::json;

    #[test]
    fn test_compacted_value_keeps_key_order() {
        let value = CompactedValue::from(json!({ "b": 1, "a": [true, null] }));
        let CompactedValue::Object(map) = value else {
            panic!("expected an object");
        };
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(
            map["a"],
            CompactedValue::Array(vec![CompactedValue::Bool(true), CompactedValue::Null])
        );
    }

    #[test]
    fn test_scalars_become_literals() {
        let mut loader = RdfObjectLoader::default();
        let id = loader.create_compacted_resource(json!(12)).unwrap();
        assert_eq!(loader.resources()[id].term(), &Term::literal("12"));
        let id = loader.create_compacted_resource(json!(false)).unwrap();
        assert_eq!(loader.resources()[id].term(), &Term::literal("false"));
    }

    #[test]
    fn test_array_is_rejected_as_single_resource() {
        let mut loader = RdfObjectLoader::default();
        assert!(loader.create_compacted_resource(json!(["a"])).is_err());
        let ids = loader
            .create_compacted_resources(json!(["\"a\"", "\"b\""]))
            .unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_object_built_with_entries() {
        let mut loader = RdfObjectLoader::default();
        let value = CompactedValue::object()
            .with("@id", "http://example.org/s")
            .with("http://example.org/p", "\"o\"");
        let s = loader.create_compacted_resource(value).unwrap();
        let resources = loader.resources();
        assert_eq!(resources[s].term(), &Term::named_node("http://example.org/s"));
        let o = resources.properties(s).get_all("http://example.org/p").unwrap()[0];
        assert_eq!(resources[o].term(), &Term::literal("o"));
        // entries on a non-object value are ignored
        assert_eq!(CompactedValue::from(true).with("a", 1i64), CompactedValue::Bool(true));
    }
}
