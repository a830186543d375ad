mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use garnet_runtime::{ErrorClass, Flow, Method, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn hash_of(rt: &mut garnet_runtime::Runtime, env: &garnet_runtime::EnvRef, args: &[Value]) -> Value {
    let hash_class = rt.core().hash;
    rt.send(env, hash_class, "[]", args, None).unwrap()
}

#[test]
fn square_new_with_pairs_inspects_in_insertion_order() {
    let (mut rt, env) = setup();
    let a = rt.make_string("a");
    let b = rt.make_string("b");
    let one = int(&mut rt, 1);
    let two = int(&mut rt, 2);
    let h = hash_of(&mut rt, &env, &[a, one, b, two]);
    assert_eq!(inspect(&mut rt, &env, h), r#"{"a"=>1, "b"=>2}"#);
}

#[test]
fn square_new_rejects_odd_argument_count() {
    let (mut rt, env) = setup();
    let args = [int(&mut rt, 1), int(&mut rt, 2), int(&mut rt, 3)];
    let hash_class = rt.core().hash;
    let err = rt.send(&env, hash_class, "[]", &args, None).unwrap_err();
    assert!(err.is(ErrorClass::ArgumentError));
    assert_eq!(err.message, "odd number of arguments for Hash");
}

#[test]
fn square_new_forms() {
    let (mut rt, env) = setup();
    let empty = hash_of(&mut rt, &env, &[]);
    assert_eq!(inspect(&mut rt, &env, empty), "{}");

    let same = hash_of(&mut rt, &env, &[empty]);
    assert_eq!(same, empty);

    let full_pair = ints(&mut rt, &[1, 2]);
    let half_pair = ints(&mut rt, &[3]);
    let pairs = rt.make_array(vec![full_pair, half_pair]);
    let h = hash_of(&mut rt, &env, &[pairs]);
    assert_eq!(inspect(&mut rt, &env, h), "{1=>2, 3=>nil}");
}

#[test]
fn square_new_validates_pair_elements() {
    let (mut rt, env) = setup();
    let hash_class = rt.core().hash;

    let not_pairs = ints(&mut rt, &[1]);
    let err = rt.send(&env, hash_class, "[]", &[not_pairs], None).unwrap_err();
    assert_eq!(err.message, "wrong element in array to Hash[]");

    let triple = ints(&mut rt, &[1, 2, 3]);
    let wrapped = rt.make_array(vec![triple]);
    let err = rt.send(&env, hash_class, "[]", &[wrapped], None).unwrap_err();
    assert!(err.is(ErrorClass::ArgumentError));
    assert_eq!(err.message, "invalid number of elements (3 for 1..2)");
}

#[test]
fn reinsert_updates_value_in_place() {
    let (mut rt, env) = setup();
    let h = rt.make_hash();
    for k in [1, 2, 3] {
        let key = int(&mut rt, k);
        let value = int(&mut rt, k * 10);
        rt.hash_put(&env, h, key, value).unwrap();
    }
    let key = int(&mut rt, 1);
    let value = int(&mut rt, 99);
    rt.hash_put(&env, h, key, value).unwrap();
    assert_eq!(inspect(&mut rt, &env, h), "{1=>99, 2=>20, 3=>30}");
    assert_eq!(rt.hash_len(h), 3);
}

#[test]
fn adding_a_key_during_each_fails_and_leaves_hash_unchanged() {
    let (mut rt, env) = setup();
    let h = rt.make_hash();
    let k = int(&mut rt, 1);
    rt.hash_put(&env, h, k, k).unwrap();

    let adder = block(&rt, &env, 2, move |rt, env, _self, _args, _block| {
        let key = rt.make_integer(2);
        rt.hash_put(env, h, key, key)?;
        Ok(Flow::Normal(key))
    });
    let err = rt.send(&env, h, "each", &[], Some(&adder)).unwrap_err();
    assert!(err.is(ErrorClass::ArgumentError));
    assert_eq!(err.message, "can't add a new key into hash during iteration");
    assert_eq!(rt.hash_len(h), 1);

    // The guard is released once the traversal unwinds.
    assert!(!rt.hash_table(h).unwrap().is_iterating());
    let key = int(&mut rt, 2);
    rt.hash_put(&env, h, key, key).unwrap();
    assert_eq!(rt.hash_len(h), 2);
}

#[test]
fn updating_an_existing_key_during_each_is_allowed() {
    let (mut rt, env) = setup();
    let h = rt.make_hash();
    let k = int(&mut rt, 1);
    rt.hash_put(&env, h, k, k).unwrap();
    let updater = block(&rt, &env, 2, move |rt, env, _self, args, _block| {
        let value = rt.make_integer(5);
        rt.hash_put(env, h, args[0], value)?;
        Ok(Flow::Normal(value))
    });
    rt.send(&env, h, "each", &[], Some(&updater)).unwrap();
    assert_eq!(inspect(&mut rt, &env, h), "{1=>5}");
}

#[test]
fn removing_during_each_skips_removed_entries() {
    let (mut rt, env) = setup();
    let h = rt.make_hash();
    for k in 1..=4 {
        let key = int(&mut rt, k);
        rt.hash_put(&env, h, key, key).unwrap();
    }
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    let remover = block(&rt, &env, 2, move |rt, env, _self, args, _block| {
        let k = rt.as_integer(args[0]).unwrap();
        log.borrow_mut().push(k);
        if k == 1 {
            let two = rt.make_integer(2);
            rt.hash_remove(env, h, two)?;
        }
        if k == 3 {
            // Removing the entry being visited.
            rt.hash_remove(env, h, args[0])?;
        }
        Ok(Flow::Normal(args[1]))
    });
    let result = rt.send(&env, h, "each", &[], Some(&remover)).unwrap();
    assert_eq!(result, h);
    assert_eq!(*seen.borrow(), vec![1, 3, 4]);
    assert_eq!(inspect(&mut rt, &env, h), "{1=>1, 4=>4}");
}

#[test]
fn break_from_each_returns_break_value_and_clears_guard() {
    let (mut rt, env) = setup();
    let h = rt.make_hash();
    for k in 1..=3 {
        let key = int(&mut rt, k);
        rt.hash_put(&env, h, key, key).unwrap();
    }
    let breaker = block(&rt, &env, 2, |rt, _env, _self, args, _block| {
        if rt.as_integer(args[0]) == Some(2) {
            let marker = rt.make_string("stopped");
            return Ok(Flow::Break(marker));
        }
        Ok(Flow::Normal(args[1]))
    });
    let result = rt.send(&env, h, "each", &[], Some(&breaker)).unwrap();
    assert_eq!(rt.as_str(result), Some("stopped"));
    assert!(!rt.hash_table(h).unwrap().is_iterating());
}

#[test]
fn nested_each_keeps_insertion_blocked_until_outermost_ends() {
    let (mut rt, env) = setup();
    let h = rt.make_hash();
    let k = int(&mut rt, 1);
    rt.hash_put(&env, h, k, k).unwrap();
    let inner = identity_block(&rt, &env);
    let outer = block(&rt, &env, 2, move |rt, env, _self, _args, _block| {
        rt.hash_each(env, h, Some(&inner))?;
        assert!(rt.hash_table(h).unwrap().is_iterating());
        let key = rt.make_integer(2);
        let err = rt.hash_put(env, h, key, key).unwrap_err();
        assert!(err.is(ErrorClass::ArgumentError));
        Ok(Flow::Normal(key))
    });
    rt.hash_each(&env, h, Some(&outer)).unwrap();
    assert!(!rt.hash_table(h).unwrap().is_iterating());
}

#[test]
fn each_without_block_raises_local_jump_error() {
    let (mut rt, env) = setup();
    let h = rt.make_hash();
    let err = rt.send(&env, h, "each", &[], None).unwrap_err();
    assert!(err.is(ErrorClass::LocalJumpError));
    assert_eq!(err.message, "no block given");
}

#[test]
fn default_value_and_default_block() {
    let (mut rt, env) = setup();
    let hash_class = rt.core().hash;
    let five = int(&mut rt, 5);
    let with_value = rt.send(&env, hash_class, "new", &[five], None).unwrap();
    let missing = int(&mut rt, 42);
    let got = rt.send(&env, with_value, "[]", &[missing], None).unwrap();
    assert_eq!(rt.as_integer(got), Some(5));
    assert_eq!(rt.hash_len(with_value), 0);

    // Hash.new { |hash, key| hash[key] = key + key }
    let filler = block(&rt, &env, 2, |rt, env, _self, args, _block| {
        let doubled = rt.send(env, args[1], "+", &[args[1]], None)?;
        rt.send(env, args[0], "[]=", &[args[1], doubled], None)?;
        Ok(Flow::Normal(doubled))
    });
    let with_block = rt.send(&env, hash_class, "new", &[], Some(&filler)).unwrap();
    let key = int(&mut rt, 21);
    let got = rt.send(&env, with_block, "[]", &[key], None).unwrap();
    assert_eq!(rt.as_integer(got), Some(42));
    assert_eq!(inspect(&mut rt, &env, with_block), "{21=>42}");

    let plain = rt.make_hash();
    let got = rt.send(&env, plain, "[]", &[key], None).unwrap();
    assert!(rt.is_nil(got));
}

#[test]
fn default_value_and_block_are_mutually_exclusive() {
    let (mut rt, env) = setup();
    let hash_class = rt.core().hash;
    let one = int(&mut rt, 1);
    let b = identity_block(&rt, &env);
    let err = rt.send(&env, hash_class, "new", &[one], Some(&b)).unwrap_err();
    assert!(err.is(ErrorClass::ArgumentError));
    assert_eq!(err.message, "wrong number of arguments (given 1, expected 0)");
}

#[test]
fn break_in_default_block_is_a_local_jump_error() {
    let (mut rt, env) = setup();
    let breaker = block(&rt, &env, 2, |rt, _env, _self, _args, _block| Ok(Flow::Break(rt.nil())));
    let h = rt.hash_new(&env, None, Some(&breaker)).unwrap();
    let key = int(&mut rt, 1);
    let err = rt.hash_get_or_default(&env, h, key).unwrap_err();
    assert!(err.is(ErrorClass::LocalJumpError));
    assert_eq!(err.message, "break from proc-closure");
}

#[test]
fn equality_compares_size_then_values() {
    let (mut rt, env) = setup();
    let (a, b, c) = (rt.make_string("a"), rt.make_string("b"), rt.make_string("c"));
    let (one, two) = (int(&mut rt, 1), int(&mut rt, 2));
    let left = hash_of(&mut rt, &env, &[a, one, b, two]);
    let right = hash_of(&mut rt, &env, &[b, two, a, one]);
    let eq = rt.send(&env, left, "==", &[right], None).unwrap();
    assert!(rt.truthy(eq));

    let different = hash_of(&mut rt, &env, &[a, one, b, one]);
    assert!(!rt.hash_equals(&env, left, different).unwrap());
    let bigger = hash_of(&mut rt, &env, &[a, one, b, two, c, two]);
    assert!(!rt.hash_equals(&env, left, bigger).unwrap());
    let not_hash = int(&mut rt, 1);
    assert!(!rt.hash_equals(&env, left, not_hash).unwrap());
}

#[test]
fn keys_values_delete_and_sort() {
    let (mut rt, env) = setup();
    let args: Vec<Value> = [3, 30, 1, 10, 2, 20].iter().map(|&i| rt.make_integer(i)).collect();
    let h = hash_of(&mut rt, &env, &args);
    let keys = rt.send(&env, h, "keys", &[], None).unwrap();
    assert_eq!(int_items(&rt, keys), vec![3, 1, 2]);
    let values = rt.send(&env, h, "values", &[], None).unwrap();
    assert_eq!(int_items(&rt, values), vec![30, 10, 20]);

    let sorted = rt.send(&env, h, "sort", &[], None).unwrap();
    assert_eq!(inspect(&mut rt, &env, sorted), "[[1, 10], [2, 20], [3, 30]]");

    let one = int(&mut rt, 1);
    let removed = rt.send(&env, h, "delete", &[one], None).unwrap();
    assert_eq!(rt.as_integer(removed), Some(10));
    let again = rt.send(&env, h, "delete", &[one], None).unwrap();
    assert!(rt.is_nil(again));
    let has = rt.send(&env, h, "key?", &[one], None).unwrap();
    assert!(!rt.truthy(has));
    let size = rt.send(&env, h, "size", &[], None).unwrap();
    assert_eq!(rt.as_integer(size), Some(2));
}

#[test]
fn frozen_hash_rejects_mutation() {
    let (mut rt, env) = setup();
    let h = rt.make_hash();
    rt.send(&env, h, "freeze", &[], None).unwrap();
    let k = int(&mut rt, 1);
    let err = rt.send(&env, h, "[]=", &[k, k], None).unwrap_err();
    assert!(err.is(ErrorClass::FrozenError));
    assert_eq!(err.message, "can't modify frozen Hash");
}

/// Keys are matched by hash code alone: an object whose `hash` collides with an Integer's
/// reads and overwrites that Integer's entry. This is a known limitation of the table.
#[test]
fn positive_and_negative_zero_are_the_same_key() {
    let (mut rt, env) = setup();
    let zero = rt.make_float(0.0);
    let neg_zero = rt.make_float(-0.0);
    let h0 = rt.send(&env, zero, "hash", &[], None).unwrap();
    let h1 = rt.send(&env, neg_zero, "hash", &[], None).unwrap();
    assert_eq!(rt.as_integer(h0), rt.as_integer(h1));

    let hash_class = rt.core().hash;
    let h = rt.send(&env, hash_class, "new", &[], None).unwrap();
    let one = int(&mut rt, 1);
    rt.send(&env, h, "[]=", &[zero, one], None).unwrap();
    let found = rt.send(&env, h, "[]", &[neg_zero], None).unwrap();
    assert_eq!(found, one);

    let half = rt.make_float(0.5);
    let h2 = rt.send(&env, half, "hash", &[], None).unwrap();
    assert_ne!(rt.as_integer(h2), rt.as_integer(h0));
}

#[test]
fn colliding_hash_codes_alias_distinct_keys() {
    let (mut rt, env) = setup();
    let object = rt.object_class();
    let collider_class = rt.subclass(&env, object, "Collider").unwrap();
    rt.define_method(
        collider_class,
        "hash",
        Method::compiled(|rt, _env, _recv, _args, _block| Ok(rt.make_integer(7))),
    );
    let collider = rt.send(&env, collider_class, "new", &[], None).unwrap();

    let h = rt.make_hash();
    let seven = int(&mut rt, 7);
    let stored = rt.make_string("integer seven");
    rt.hash_put(&env, h, seven, stored).unwrap();

    let got = rt.hash_get(&env, h, collider).unwrap();
    assert_eq!(got, Some(stored));
    let other = rt.make_string("collider");
    rt.hash_put(&env, h, collider, other).unwrap();
    assert_eq!(rt.hash_len(h), 1);
    assert_eq!(rt.hash_get(&env, h, seven).unwrap(), Some(other));
}

#[derive(Debug, Clone)]
enum Op {
    Put(i64),
    Remove(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0i64..8).prop_map(Op::Put),
        1 => (0i64..8).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn each_visits_live_keys_in_first_insertion_order(ops in proptest::collection::vec(op_strategy(), 0..48)) {
        let (mut rt, env) = setup();
        let h = rt.make_hash();
        let mut model: Vec<i64> = Vec::new();
        for op in &ops {
            match *op {
                Op::Put(k) => {
                    let key = rt.make_integer(k);
                    rt.hash_put(&env, h, key, key).unwrap();
                    if !model.contains(&k) {
                        model.push(k);
                    }
                }
                Op::Remove(k) => {
                    let key = rt.make_integer(k);
                    let removed = rt.hash_remove(&env, h, key).unwrap();
                    prop_assert_eq!(removed.is_some(), model.contains(&k));
                    model.retain(|&m| m != k);
                }
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let recorder = block(&rt, &env, 2, move |rt, _env, _self, args, _block| {
            log.borrow_mut().push(rt.as_integer(args[0]).unwrap());
            Ok(Flow::Normal(args[1]))
        });
        rt.hash_each(&env, h, Some(&recorder)).unwrap();
        prop_assert_eq!(seen.borrow().clone(), model.clone());
        prop_assert_eq!(rt.hash_len(h), model.len());
    }
}
