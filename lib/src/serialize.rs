//! Turns a resource graph back into quads.

use crate::codec::string_to_term;
use crate::consts::{RDF_FIRST, RDF_FIRST_TERM, RDF_NIL_TERM, RDF_REST, RDF_REST_TERM};
use crate::resource::{Registry, ResourceId};
use crate::term::{Quad, Term};
use std::collections::HashSet;

impl Registry {
    /// Serializes the graph reachable from `root` into default-graph quads.
    ///
    /// Each resource is visited once, so cyclic graphs terminate. Objects that are
    /// empty lists are written as `rdf:nil`. A resource with a non-empty list is
    /// written as an `rdf:first`/`rdf:rest` chain whose first link is the resource
    /// itself and whose further links are fresh blank nodes.
    pub fn to_quads(&self, root: ResourceId) -> Vec<Quad> {
        let mut quads = Vec::new();
        let mut visited = HashSet::new();
        self.emit_resource(root, &mut quads, &mut visited);
        quads
    }

    fn emit_resource(
        &self,
        id: ResourceId,
        quads: &mut Vec<Quad>,
        visited: &mut HashSet<ResourceId>,
    ) {
        if !visited.insert(id) {
            return;
        }
        let resource = &self[id];
        let list = resource.list().filter(|list| !list.is_empty());

        for (key, objects) in resource.properties_uri() {
            // the chain below already carries the list
            if list.is_some() && (key == RDF_FIRST || key == RDF_REST) {
                continue;
            }
            let predicate = string_to_term(key);
            for object in objects {
                quads.push(Quad::new(
                    resource.term().clone(),
                    predicate.clone(),
                    self.object_term(*object),
                ));
                self.emit_resource(*object, quads, visited);
            }
        }

        if let Some(items) = list {
            self.emit_list(resource.term().clone(), items, quads, visited);
        }
    }

    fn emit_list(
        &self,
        head: Term,
        items: &[ResourceId],
        quads: &mut Vec<Quad>,
        visited: &mut HashSet<ResourceId>,
    ) {
        let mut link = head;
        for (i, item) in items.iter().enumerate() {
            quads.push(Quad::new(
                link.clone(),
                RDF_FIRST_TERM.clone(),
                self.object_term(*item),
            ));
            self.emit_resource(*item, quads, visited);
            let next = if i + 1 == items.len() {
                RDF_NIL_TERM.clone()
            } else {
                self.fresh_blank_node()
            };
            quads.push(Quad::new(link, RDF_REST_TERM.clone(), next.clone()));
            link = next;
        }
    }

    fn object_term(&self, id: ResourceId) -> Term {
        let resource = &self[id];
        if resource.is_empty_list() {
            RDF_NIL_TERM.clone()
        } else {
            resource.term().clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_object_becomes_nil() {
        let mut registry = Registry::new();
        let s = registry.get_or_make_resource(Term::named_node("http://example.org/s"));
        let p = registry.get_or_make_resource(Term::named_node("http://example.org/p"));
        let o = registry.get_or_make_resource(Term::blank_node("empty"));
        registry.resource_mut(o).set_list(Some(vec![]));
        registry.add_property(s, p, o);

        assert_eq!(
            registry.to_quads(s),
            vec![Quad::new(
                Term::named_node("http://example.org/s"),
                Term::named_node("http://example.org/p"),
                RDF_NIL_TERM.clone(),
            )]
        );
    }
}
