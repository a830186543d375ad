use super::MethodRegistry;
use super::common::*;
use crate::Runtime;
use crate::core::{BlockRef, EnvRef, Value};
use crate::errors::EvalResult;
use crate::runtime::CoreObjects;

pub(super) fn install(core: &CoreObjects, registry: &mut MethodRegistry) {
    registry.register_singleton(core.hash, "new", new);
    registry.register_singleton(core.hash, "[]", square_new);

    registry.register(core.hash, "[]", get);
    registry.register(core.hash, "[]=", set);
    registry.register(core.hash, "delete", delete);
    registry.register(core.hash, "size", size);
    registry.register(core.hash, "length", size);
    registry.register(core.hash, "keys", keys);
    registry.register(core.hash, "values", values);
    registry.register(core.hash, "each", each);
    registry.register(core.hash, "inspect", inspect);
    registry.register(core.hash, "to_s", inspect);
    registry.register(core.hash, "==", eq);
    registry.register(core.hash, "key?", has_key);
    registry.register(core.hash, "has_key?", has_key);
    registry.register(core.hash, "include?", has_key);
    registry.register(core.hash, "sort", sort);
    registry.register(core.hash, "default", default);
    registry.register(core.hash, "default=", set_default);
}

/// `Hash.new(default = nil) { |hash, key| ... }`
fn new(rt: &mut Runtime, env: &EnvRef, _recv: Value, args: &[Value], block: Option<&BlockRef>) -> EvalResult {
    rt.check_arity(env, args.len(), 0, Some(1))?;
    rt.hash_new(env, args.first().copied(), block)
}

fn square_new(rt: &mut Runtime, env: &EnvRef, _recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    rt.hash_square_new(env, args)
}

fn get(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    rt.hash_get_or_default(env, recv, args[0])
}

fn set(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 2)?;
    rt.hash_put(env, recv, args[0], args[1])?;
    Ok(args[1])
}

fn delete(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    Ok(rt.hash_remove(env, recv, args[0])?.unwrap_or(rt.nil()))
}

fn size(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let n = rt.hash_len(recv);
    Ok(rt.make_integer(n as i64))
}

fn keys(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let keys = rt.hash_table(recv).map(|t| t.keys()).unwrap_or_default();
    Ok(rt.make_array(keys))
}

fn values(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let values = rt.hash_table(recv).map(|t| t.values()).unwrap_or_default();
    Ok(rt.make_array(values))
}

fn each(rt: &mut Runtime, env: &EnvRef, recv: Value, _args: &[Value], block: Option<&BlockRef>) -> EvalResult {
    rt.hash_each(env, recv, block)
}

fn inspect(rt: &mut Runtime, env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let s = rt.hash_inspect(env, recv)?;
    string_result(rt, &s)
}

fn eq(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    let equal = rt.hash_equals(env, recv, args[0])?;
    Ok(rt.bool_value(equal))
}

fn has_key(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    let found = rt.hash_get(env, recv, args[0])?.is_some();
    Ok(rt.bool_value(found))
}

/// `[key, value]` pairs sorted with `<=>`.
fn sort(rt: &mut Runtime, env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let mut pairs: Vec<Value> = rt
        .hash_pairs(recv)
        .into_iter()
        .map(|(k, v)| rt.make_array(vec![k, v]))
        .collect();
    rt.sort_values(env, &mut pairs)?;
    Ok(rt.make_array(pairs))
}

fn default(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let value = rt.hash_table(recv).and_then(|t| t.default_value);
    Ok(value.unwrap_or(rt.nil()))
}

/// Setting a default value drops any default block.
fn set_default(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    rt.check_frozen(env, recv)?;
    if let Some(table) = rt.hash_table_mut(recv) {
        table.default_value = Some(args[0]);
        table.default_block = None;
    }
    Ok(args[0])
}
