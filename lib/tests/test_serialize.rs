use rdfobject::consts::{RDF_FIRST, RDF_NIL, RDF_REST};
use rdfobject::{string_to_term, Quad, RdfObjectLoader, Registry, ResourceId, Term};

fn quad(s: &str, p: &str, o: &str) -> Quad {
    Quad::new(string_to_term(s), string_to_term(p), string_to_term(o))
}

fn resource(registry: &mut Registry, term: &str) -> ResourceId {
    registry.get_or_make_resource(string_to_term(term))
}

fn link(registry: &mut Registry, s: ResourceId, p: &str, o: ResourceId) {
    let p = resource(registry, p);
    registry.add_property(s, p, o);
}

#[test]
fn test_empty_resource() {
    let mut registry = Registry::new();
    let r = resource(&mut registry, "_:r");
    assert!(registry.to_quads(r).is_empty());
}

#[test]
fn test_raw_properties() {
    let mut registry = Registry::new();
    let r = resource(&mut registry, "_:r");
    for i in 1..=3 {
        let o = resource(&mut registry, &format!("\"o{}\"", i));
        link(&mut registry, r, &format!("ex:p{}", i), o);
    }
    assert_eq!(
        registry.to_quads(r),
        vec![
            quad("_:r", "ex:p1", "\"o1\""),
            quad("_:r", "ex:p2", "\"o2\""),
            quad("_:r", "ex:p3", "\"o3\""),
        ]
    );
}

#[test]
fn test_nested_resources() {
    let mut registry = Registry::new();
    let sub = resource(&mut registry, "ex:s");
    let o2 = resource(&mut registry, "\"o2\"");
    link(&mut registry, sub, "ex:p2", o2);
    let r = resource(&mut registry, "_:r");
    link(&mut registry, r, "ex:p1", sub);
    assert_eq!(
        registry.to_quads(r),
        vec![quad("_:r", "ex:p1", "ex:s"), quad("ex:s", "ex:p2", "\"o2\"")]
    );
}

#[test]
fn test_empty_list_is_nil() {
    let mut registry = Registry::new();
    let list = resource(&mut registry, "_:list");
    registry.resource_mut(list).set_list(Some(vec![]));
    let r = resource(&mut registry, "_:r");
    link(&mut registry, r, "ex:p1", list);
    assert_eq!(registry.to_quads(r), vec![quad("_:r", "ex:p1", RDF_NIL)]);
}

#[test]
fn test_list_of_size_one() {
    let mut registry = Registry::new();
    let list = resource(&mut registry, "_:list");
    let a = resource(&mut registry, "\"a\"");
    registry.resource_mut(list).set_list(Some(vec![a]));
    let r = resource(&mut registry, "_:r");
    link(&mut registry, r, "ex:p1", list);
    assert_eq!(
        registry.to_quads(r),
        vec![
            quad("_:r", "ex:p1", "_:list"),
            quad("_:list", RDF_FIRST, "\"a\""),
            quad("_:list", RDF_REST, RDF_NIL),
        ]
    );
}

#[test]
fn test_list_of_size_two() {
    let mut registry = Registry::new();
    let list = resource(&mut registry, "_:list");
    let a = resource(&mut registry, "\"a\"");
    let b = resource(&mut registry, "\"b\"");
    registry.resource_mut(list).set_list(Some(vec![a, b]));
    let r = resource(&mut registry, "_:r");
    link(&mut registry, r, "ex:p1", list);
    assert_eq!(
        registry.to_quads(r),
        vec![
            quad("_:r", "ex:p1", "_:list"),
            quad("_:list", RDF_FIRST, "\"a\""),
            quad("_:list", RDF_REST, "_:b0"),
            quad("_:b0", RDF_FIRST, "\"b\""),
            quad("_:b0", RDF_REST, RDF_NIL),
        ]
    );
}

#[test]
fn test_list_with_nested_resources() {
    let mut registry = Registry::new();
    let list = resource(&mut registry, "_:list");
    let a = resource(&mut registry, "ex:a");
    let o2 = resource(&mut registry, "\"o2\"");
    link(&mut registry, a, "ex:p2", o2);
    registry.resource_mut(list).set_list(Some(vec![a]));
    let r = resource(&mut registry, "_:r");
    link(&mut registry, r, "ex:p1", list);
    assert_eq!(
        registry.to_quads(r),
        vec![
            quad("_:r", "ex:p1", "_:list"),
            quad("_:list", RDF_FIRST, "ex:a"),
            quad("ex:a", "ex:p2", "\"o2\""),
            quad("_:list", RDF_REST, RDF_NIL),
        ]
    );
}

#[test]
fn test_cyclic_resources() {
    let mut registry = Registry::new();
    let s1 = resource(&mut registry, "ex:s1");
    let s2 = resource(&mut registry, "ex:s2");
    link(&mut registry, s1, "ex:p1", s2);
    link(&mut registry, s2, "ex:p2", s1);
    assert_eq!(
        registry.to_quads(s1),
        vec![quad("ex:s1", "ex:p1", "ex:s2"), quad("ex:s2", "ex:p2", "ex:s1")]
    );
}

#[test]
fn test_indirect_cyclic_resources() {
    let mut registry = Registry::new();
    let s1 = resource(&mut registry, "ex:s1");
    let s2 = resource(&mut registry, "ex:s2");
    let s3 = resource(&mut registry, "ex:s3");
    link(&mut registry, s1, "ex:p1", s2);
    link(&mut registry, s2, "ex:p2", s3);
    link(&mut registry, s3, "ex:p3", s1);
    assert_eq!(
        registry.to_quads(s1),
        vec![
            quad("ex:s1", "ex:p1", "ex:s2"),
            quad("ex:s2", "ex:p2", "ex:s3"),
            quad("ex:s3", "ex:p3", "ex:s1"),
        ]
    );
}

#[test]
fn test_loaded_list_round_trips() {
    let input = vec![
        quad("http://example.org/s", "http://example.org/p", "_:l0"),
        quad("_:l0", RDF_FIRST, "\"A\""),
        quad("_:l0", RDF_REST, "_:l1"),
        quad("_:l1", RDF_FIRST, "\"B\""),
        quad("_:l1", RDF_REST, "_:l2"),
        quad("_:l2", RDF_FIRST, "\"C\""),
        quad("_:l2", RDF_REST, RDF_NIL),
    ];
    let mut loader = RdfObjectLoader::default();
    loader.import_array(&input).unwrap();
    let s = loader
        .resources()
        .find(&Term::named_node("http://example.org/s"))
        .unwrap();
    let output = loader.resources().to_quads(s);
    assert_eq!(output.len(), input.len());
    assert_eq!(output[0], input[0]);

    let mut reloaded = RdfObjectLoader::default();
    reloaded.import_array(&output).unwrap();
    let head = reloaded.resources().find(&Term::blank_node("l0")).unwrap();
    let items: Vec<Term> = reloaded.resources()[head]
        .list()
        .unwrap()
        .iter()
        .map(|item| reloaded.resources()[*item].term().clone())
        .collect();
    assert_eq!(items, vec![Term::literal("A"), Term::literal("B"), Term::literal("C")]);
}

#[test]
fn test_loaded_empty_list_round_trips() {
    let input = vec![quad("http://example.org/s", "http://example.org/p", RDF_NIL)];
    let mut loader = RdfObjectLoader::default();
    loader.import_array(&input).unwrap();
    let s = loader
        .resources()
        .find(&Term::named_node("http://example.org/s"))
        .unwrap();
    assert_eq!(loader.resources().to_quads(s), input);
}
