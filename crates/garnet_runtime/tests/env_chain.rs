mod common;

use common::*;
use garnet_runtime::{Env, ErrorClass, Flow, FrameLabel, Method};
use pretty_assertions::assert_eq;

#[test]
fn assign_updates_the_nearest_existing_binding() {
    let (mut rt, env) = setup();
    let zero = int(&mut rt, 0);
    env.define("count", zero);

    let inner = Env::new_child(Some(&env), Some(&env));
    let innermost = Env::new_child(Some(&inner), Some(&inner));
    let five = int(&mut rt, 5);
    innermost.assign("count", five);

    assert_eq!(env.lookup("count"), Some(five));
    assert!(inner.local_names().is_empty());
    assert!(innermost.local_names().is_empty());
}

#[test]
fn assign_creates_a_local_when_nothing_is_bound() {
    let (mut rt, env) = setup();
    let inner = Env::new_child(Some(&env), Some(&env));
    let one = int(&mut rt, 1);
    inner.assign("fresh", one);
    assert_eq!(inner.local_names(), vec!["fresh".to_string()]);
    assert_eq!(env.lookup("fresh"), None);
}

#[test]
fn define_shadows_outer_bindings() {
    let (mut rt, env) = setup();
    let outer_value = int(&mut rt, 1);
    let inner_value = int(&mut rt, 2);
    env.define("x", outer_value);
    let inner = Env::new_child(Some(&env), Some(&env));
    inner.define("x", inner_value);

    assert_eq!(inner.lookup("x"), Some(inner_value));
    assert_eq!(env.lookup("x"), Some(outer_value));
    assert!(inner.is_defined("x"));
    assert!(!inner.is_defined("y"));
}

#[test]
fn method_frames_do_not_see_caller_locals() {
    let (mut rt, env) = setup();
    let one = int(&mut rt, 1);
    env.define("secret", one);
    let frame = Env::new_method_frame(&env, "peek", None);
    assert_eq!(frame.lookup("secret"), None);
    assert!(frame.caller().is_some());
    assert_eq!(frame.label(), &FrameLabel::Method("peek".into()));
}

#[test]
fn blocks_close_over_their_creation_frame() {
    let (mut rt, env) = setup();
    let zero = int(&mut rt, 0);
    env.define("total", zero);
    let items = ints(&mut rt, &[1, 2, 3, 4]);

    // items.each { |n| total = total + n }
    let adder = block(&rt, &env, 1, |rt, env, _self, args, _block| {
        let total = env.lookup("total").unwrap();
        let sum = rt.send(env, total, "+", &[args[0]], None)?;
        env.assign("total", sum);
        Ok(Flow::Normal(sum))
    });
    rt.send(&env, items, "each", &[], Some(&adder)).unwrap();

    let total = env.lookup("total").unwrap();
    assert_eq!(rt.as_integer(total), Some(10));
}

#[test]
fn block_locals_stay_inside_the_block_frame() {
    let (mut rt, env) = setup();
    let items = ints(&mut rt, &[1]);
    let scribbler = block(&rt, &env, 1, |_rt, env, _self, args, _block| {
        env.assign("scratch", args[0]);
        Ok(Flow::Normal(args[0]))
    });
    rt.send(&env, items, "each", &[], Some(&scribbler)).unwrap();
    assert_eq!(env.lookup("scratch"), None);
}

#[test]
fn frame_labels_render_for_backtraces() {
    let (_rt, env) = setup();
    let method = Env::new_method_frame(&env, "run", None);
    let block_frame = Env::new_block_frame(&method, &method);
    let nested_block = Env::new_block_frame(&block_frame, &block_frame);
    let top_block = Env::new_block_frame(&env, &env);

    assert_eq!(env.label().to_string(), "<main>");
    assert_eq!(method.label().to_string(), "in 'run'");
    assert_eq!(block_frame.label().to_string(), "block in 'run'");
    assert_eq!(nested_block.label().to_string(), "block in 'run'");
    assert_eq!(top_block.label().to_string(), "block in <main>");
    assert_eq!(
        nested_block.backtrace(),
        vec!["block in 'run'", "block in 'run'", "in 'run'", "<main>"]
    );
}

#[test]
fn yield_finds_the_block_of_the_enclosing_method() {
    let (mut rt, env) = setup();
    let given = identity_block(&rt, &env);
    let method = Env::new_method_frame(&env, "wrap", Some(given.clone()));
    let inside = Env::new_block_frame(&method, &method);
    let found = inside.block().unwrap();
    assert!(std::rc::Rc::ptr_eq(&found, &given));
    assert!(env.block().is_none());

    let forty_two = int(&mut rt, 42);
    let flow = rt.run_block_from_env(&inside, &[forty_two]).unwrap();
    assert_eq!(flow, Flow::Normal(forty_two));
}

#[test]
fn rescuing_flag_is_per_frame() {
    let (_rt, env) = setup();
    let child = Env::new_child(Some(&env), Some(&env));
    child.set_rescuing(true);
    assert!(child.is_rescuing());
    assert!(child.flags().rescuing);
    assert!(!env.is_rescuing());
    child.set_rescuing(false);
    assert!(!child.is_rescuing());
}

#[test]
fn lookup_name_resolves_each_namespace() {
    let (mut rt, env) = setup();
    let main = rt.main_object();

    let hash_class = rt.lookup_name(&env, main, "Hash").unwrap();
    assert_eq!(hash_class, rt.core().hash);
    let err = rt.lookup_name(&env, main, "Missing").unwrap_err();
    assert!(err.is(ErrorClass::NameError));
    assert_eq!(err.message, "uninitialized constant Missing");

    let unset_global = rt.lookup_name(&env, main, "$unset").unwrap();
    assert!(rt.is_nil(unset_global));
    let one = int(&mut rt, 1);
    rt.global_set("$answer", one);
    assert_eq!(rt.lookup_name(&env, main, "$answer").unwrap(), one);

    let unset_ivar = rt.lookup_name(&env, main, "@name").unwrap();
    assert!(rt.is_nil(unset_ivar));
    rt.ivar_set(&env, main, "@name", one).unwrap();
    assert_eq!(rt.lookup_name(&env, main, "@name").unwrap(), one);

    let err = rt.lookup_name(&env, main, "ghost").unwrap_err();
    assert!(err.is(ErrorClass::NameError));
    assert_eq!(err.message, "undefined local variable or method 'ghost' for main");
    env.define("ghost", one);
    assert_eq!(rt.lookup_name(&env, main, "ghost").unwrap(), one);
}

#[test]
fn defined_describes_what_a_name_refers_to() {
    let (mut rt, env) = setup();
    let main = rt.main_object();
    let one = int(&mut rt, 1);

    assert_eq!(rt.defined(&env, main, "Object"), Some("constant"));
    assert_eq!(rt.defined(&env, main, "Nowhere"), None);

    assert_eq!(rt.defined(&env, main, "$g"), None);
    rt.global_set("$g", one);
    assert_eq!(rt.defined(&env, main, "$g"), Some("global-variable"));
    let nil = rt.nil();
    rt.global_set("$g", nil);
    assert_eq!(rt.defined(&env, main, "$g"), None);

    assert_eq!(rt.defined(&env, main, "@iv"), None);
    rt.ivar_set(&env, main, "@iv", nil).unwrap();
    assert_eq!(rt.defined(&env, main, "@iv"), Some("instance-variable"));

    env.define("local", one);
    assert_eq!(rt.defined(&env, main, "local"), Some("local-variable"));
    assert_eq!(rt.defined(&env, main, "inspect"), Some("method"));
    assert_eq!(rt.defined(&env, main, "nothing_here"), None);

    let described = rt.defined_obj(&env, main, "local");
    assert_eq!(rt.as_str(described), Some("local-variable"));
    let missing = rt.defined_obj(&env, main, "nothing_here");
    assert!(rt.is_nil(missing));
}

#[test]
fn compiled_method_frames_start_empty() {
    let (mut rt, env) = setup();
    let one = int(&mut rt, 1);
    env.define("outside", one);
    let object = rt.object_class();
    let probe = rt.subclass(&env, object, "Probe").unwrap();
    rt.define_method(
        probe,
        "visible?",
        Method::compiled(|rt, env, _recv, _args, _block| {
            let seen = env.is_defined("outside");
            Ok(rt.bool_value(seen))
        }),
    );
    let obj = rt.send(&env, probe, "new", &[], None).unwrap();
    let seen = rt.send(&env, obj, "visible?", &[], None).unwrap();
    assert!(!rt.truthy(seen));
}
