//! Defines `Resource`, the interned graph node, and `Registry`, the arena that owns
//! every resource of one loading session.
//!
//! Resources refer to each other through [`ResourceId`] indices into the registry
//! rather than through references, so cyclic graphs need no special ownership.
//! Within one registry there is exactly one resource per term, where terms are
//! compared by their [`term_to_string`] encoding.

use crate::codec::term_to_string;
use crate::consts::TYPE_PREDICATES;
use crate::context::Context;
use crate::properties::{PropertyRead, ShortcutProperties, SingularProperties};
use crate::term::Term;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::cell::Cell;
use std::collections::HashSet;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Index of a resource inside the [`Registry`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(usize);

/// Properties of a resource keyed by the encoded predicate term.
pub type PropertyIndex = IndexMap<String, Vec<ResourceId>>;

/// Read-only shortcut view over the properties of one resource.
pub type Properties<'a> = ShortcutProperties<'a, &'a PropertyIndex>;
/// Mutable shortcut view over the properties of one resource.
pub type PropertiesMut<'a> = ShortcutProperties<'a, &'a mut PropertyIndex>;

/// A node of the object graph: one term plus its outgoing property links and an
/// optional RDF list payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    term: Term,
    predicates: Vec<ResourceId>,
    properties_uri: PropertyIndex,
    list: Option<Vec<ResourceId>>,
}

impl Resource {
    fn new(term: Term) -> Self {
        Resource {
            term,
            predicates: Vec::new(),
            properties_uri: IndexMap::new(),
            list: None,
        }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    /// "NamedNode", "BlankNode", "Literal", "Variable" or "DefaultGraph".
    pub fn term_type(&self) -> &'static str {
        self.term.term_type()
    }

    /// The URI, blank node label, literal value or variable name of this resource.
    pub fn value(&self) -> &str {
        self.term.value()
    }

    /// Predicates of every property added through [`Registry::add_property`], in
    /// order, duplicates included.
    pub fn predicates(&self) -> &[ResourceId] {
        &self.predicates
    }

    pub fn properties_uri(&self) -> &PropertyIndex {
        &self.properties_uri
    }

    /// The list this resource denotes. `Some(&[])` is the empty list, `None`
    /// means the resource is not a list.
    pub fn list(&self) -> Option<&[ResourceId]> {
        self.list.as_deref()
    }

    pub fn set_list(&mut self, list: Option<Vec<ResourceId>>) {
        self.list = list;
    }

    pub fn is_empty_list(&self) -> bool {
        matches!(&self.list, Some(list) if list.is_empty())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Owns all resources of one session and interns them by term.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    resources: Vec<Resource>,
    index: IndexMap<String, ResourceId>,
    context: Context,
    blank_counter: Cell<usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry whose shortcut views resolve names through `context`.
    pub fn with_context(context: Context) -> Self {
        Registry {
            context,
            ..Self::default()
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub(crate) fn set_context(&mut self, context: Context) {
        self.context = context;
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Returns the resource for `term`, creating it if it does not exist yet.
    pub fn get_or_make_resource(&mut self, term: Term) -> ResourceId {
        let key = term_to_string(&term);
        if let Some(id) = self.index.get(&key) {
            return *id;
        }
        let id = ResourceId(self.resources.len());
        self.resources.push(Resource::new(term));
        self.index.insert(key, id);
        id
    }

    /// Looks up the resource for `term` without creating it.
    pub fn find(&self, term: &Term) -> Option<ResourceId> {
        self.index.get(&term_to_string(term)).copied()
    }

    pub fn resource(&self, id: ResourceId) -> &Resource {
        &self.resources[id.0]
    }

    pub fn resource_mut(&mut self, id: ResourceId) -> &mut Resource {
        &mut self.resources[id.0]
    }

    /// All resources with their encoded term, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ResourceId)> + '_ {
        self.index.iter().map(|(key, id)| (key.as_str(), *id))
    }

    /// Mints a blank node whose label is not used by any resource of this registry.
    pub fn fresh_blank_node(&self) -> Term {
        loop {
            let n = self.blank_counter.get();
            self.blank_counter.set(n + 1);
            let term = Term::blank_node(format!("b{}", n));
            if self.find(&term).is_none() {
                return term;
            }
        }
    }

    /// Links `object` to `subject` under the IRI of `predicate`.
    ///
    /// Nothing is deduplicated: adding the same link twice stores it twice.
    pub fn add_property(&mut self, subject: ResourceId, predicate: ResourceId, object: ResourceId) {
        let key = term_to_string(&self[predicate].term);
        let resource = &mut self[subject];
        resource.properties_uri.entry(key).or_default().push(object);
        resource.predicates.push(predicate);
    }

    /// Checks if the resource is of the given type.
    ///
    /// This is true if the resource is `ty` itself, or if following `rdf:type` and
    /// `rdfs:subClassOf` links from it reaches `ty`. Cycles in those links are
    /// tolerated.
    pub fn is_a(&self, id: ResourceId, ty: &Term) -> bool {
        let mut visited = HashSet::new();
        self.is_a_visit(id, ty, &mut visited)
    }

    /// Like [`Registry::is_a`], with the type given as a name resolved through the
    /// context. Disabled names are never matched.
    pub fn is_a_named(&self, id: ResourceId, name: &str) -> bool {
        match self.context.expand_term(name, true) {
            Some(iri) => self.is_a(id, &Term::NamedNode(iri)),
            None => false,
        }
    }

    fn is_a_visit(&self, id: ResourceId, ty: &Term, visited: &mut HashSet<ResourceId>) -> bool {
        if !visited.insert(id) {
            return false;
        }
        let resource = &self[id];
        if resource.term == *ty {
            return true;
        }
        TYPE_PREDICATES
            .iter()
            .filter_map(|predicate| resource.properties_uri.get(*predicate))
            .flatten()
            .any(|super_type| self.is_a_visit(*super_type, ty, visited))
    }

    /// Properties of a resource by shortcut name.
    pub fn properties(&self, id: ResourceId) -> Properties<'_> {
        ShortcutProperties::new(&self.resources[id.0].properties_uri, &self.context)
    }

    pub fn properties_mut(&mut self, id: ResourceId) -> PropertiesMut<'_> {
        ShortcutProperties::new(&mut self.resources[id.0].properties_uri, &self.context)
    }

    /// First property values of a resource by shortcut name.
    pub fn property(&self, id: ResourceId) -> SingularProperties<Properties<'_>> {
        SingularProperties::new(self.properties(id))
    }

    pub fn property_mut(&mut self, id: ResourceId) -> SingularProperties<PropertiesMut<'_>> {
        SingularProperties::new(self.properties_mut(id))
    }

    /// Creates a convenient JSON representation of a resource.
    ///
    /// A resource without properties and list becomes its encoded term; anything
    /// else becomes an object with `@id`, and `properties` and `list` when present.
    /// A resource met again while it is being projected is written as its
    /// encoded term.
    pub fn to_json(&self, id: ResourceId) -> Value {
        let mut path = HashSet::new();
        self.to_json_visit(id, &mut path)
    }

    fn to_json_visit(&self, id: ResourceId, path: &mut HashSet<ResourceId>) -> Value {
        let resource = &self[id];
        let key = term_to_string(&resource.term);
        let properties = self.properties(id);
        let names = properties.names();
        if (names.is_empty() && resource.list.is_none()) || !path.insert(id) {
            return Value::String(key);
        }

        let mut record = Map::new();
        record.insert("@id".to_string(), Value::String(key));
        if !names.is_empty() {
            let mut projected = Map::new();
            for name in names {
                let values = properties.get_all(&name).unwrap_or(&[]);
                let values = values
                    .iter()
                    .map(|value| self.to_json_visit(*value, path))
                    .collect();
                projected.insert(name, Value::Array(values));
            }
            record.insert("properties".to_string(), Value::Object(projected));
        }
        if let Some(list) = &resource.list {
            let items = list
                .iter()
                .map(|item| self.to_json_visit(*item, path))
                .collect();
            record.insert("list".to_string(), Value::Array(items));
        }
        path.remove(&id);
        Value::Object(record)
    }
}

impl Index<ResourceId> for Registry {
    type Output = Resource;

    fn index(&self, id: ResourceId) -> &Resource {
        &self.resources[id.0]
    }
}

impl IndexMut<ResourceId> for Registry {
    fn index_mut(&mut self, id: ResourceId) -> &mut Resource {
        &mut self.resources[id.0]
    }
}
