use garnet_core::{DiagnosticKind, ErrorClass};

use super::MethodRegistry;
use super::common::*;
use crate::Runtime;
use crate::core::{BlockRef, EnvRef, Value};
use crate::errors::EvalResult;
use crate::runtime::CoreObjects;

pub(super) fn install(core: &CoreObjects, registry: &mut MethodRegistry) {
    // Class's superclass chain ends at itself, so classes get these directly.
    for class in [core.object, core.class] {
        registry.register(class, "==", eq);
        registry.register(class, "!=", not_eq);
        registry.register(class, "hash", hash);
        registry.register(class, "class", class_of);
        registry.register(class, "is_a?", is_a);
        registry.register(class, "kind_of?", is_a);
        registry.register(class, "respond_to?", respond_to);
        registry.register(class, "nil?", is_nil);
        registry.register(class, "freeze", freeze);
        registry.register(class, "frozen?", is_frozen);
        registry.register(class, "object_id", object_id);
    }
    registry.register(core.object, "inspect", inspect);
    registry.register(core.object, "to_s", inspect);
    registry.register(core.object, "initialize", initialize);
}

fn inspect(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let s = default_inspect(rt, recv);
    string_result(rt, &s)
}

fn initialize(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 0)?;
    Ok(recv)
}

fn eq(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    Ok(rt.bool_value(recv == args[0]))
}

fn not_eq(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    let equal = rt.values_equal(env, recv, args[0])?;
    Ok(rt.bool_value(!equal))
}

fn hash(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    Ok(rt.make_integer(identity_hash(recv)))
}

fn class_of(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    Ok(rt.class_of(recv))
}

fn is_a(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    if !rt.is_class(args[0]) {
        return Err(rt.error(
            env,
            DiagnosticKind::Raw(ErrorClass::TypeError, "class or module required".into()),
        ));
    }
    Ok(rt.bool_value(rt.is_a(recv, args[0])))
}

fn respond_to(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    rt.check_arity(env, args.len(), 1, Some(2))?;
    let name = expect_name(rt, env, args[0])?;
    Ok(rt.bool_value(rt.respond_to(recv, &name)))
}

fn is_nil(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    Ok(rt.bool_value(rt.is_nil(recv)))
}

fn freeze(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    rt.freeze(recv);
    Ok(recv)
}

fn is_frozen(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    Ok(rt.bool_value(rt.is_frozen(recv)))
}

fn object_id(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    Ok(rt.make_integer(identity_hash(recv)))
}
