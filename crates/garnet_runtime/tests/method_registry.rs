mod common;

use common::*;
use garnet_runtime::{Binding, CoreMethodProvider, MethodProvider, MethodRegistry};
use pretty_assertions::assert_eq;

#[test]
fn hash_registry_matches_the_documented_method_list() {
    let (rt, _env) = setup();
    let mut reg = MethodRegistry::new();
    CoreMethodProvider.install(rt.core(), &mut reg);

    let mut instance = reg.names(rt.core().hash, Binding::Instance);
    let mut expected = [
        "[]", "[]=", "delete", "size", "length", "keys", "values", "each", "inspect", "to_s",
        "==", "key?", "has_key?", "include?", "sort", "default", "default=",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect::<Vec<_>>();
    instance.sort();
    expected.sort();
    assert_eq!(instance, expected);

    assert_eq!(reg.names(rt.core().hash, Binding::Singleton), vec!["new", "[]"]);
}

#[test]
fn every_registered_method_is_reachable_by_dispatch() {
    let (mut rt, _env) = setup();
    let mut reg = MethodRegistry::new();
    CoreMethodProvider.install(rt.core(), &mut reg);

    let samples = [
        (rt.core().integer, rt.make_integer(1)),
        (rt.core().float, rt.make_float(1.5)),
        (rt.core().string, rt.make_string("s")),
        (rt.core().array, rt.make_array(Vec::new())),
        (rt.core().hash, rt.make_hash()),
        (rt.core().symbol, rt.intern("sym")),
        (rt.core().nil_class, rt.nil()),
    ];
    for (class, sample) in samples {
        let names = reg.names(class, Binding::Instance);
        assert!(!names.is_empty(), "{} registers nothing", rt.class_name(class));
        for name in names {
            assert!(rt.respond_to(sample, &name), "{}#{name}", rt.class_name(class));
        }
        for name in reg.names(class, Binding::Singleton) {
            assert!(rt.respond_to(class, &name), "{}.{name}", rt.class_name(class));
        }
    }
}
