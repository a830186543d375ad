use std::cmp::Ordering;

use super::MethodRegistry;
use super::common::*;
use crate::Runtime;
use crate::core::{BlockRef, EnvRef, Value};
use crate::errors::EvalResult;
use crate::runtime::CoreObjects;

pub(super) fn install(core: &CoreObjects, registry: &mut MethodRegistry) {
    registry.register(core.integer, "hash", hash);
    registry.register(core.integer, "inspect", to_s);
    registry.register(core.integer, "to_s", to_s);
    registry.register(core.integer, "==", eq);
    registry.register(core.integer, "<=>", cmp);
    registry.register(core.integer, "+", add);
    registry.register(core.integer, "-", sub);
}

fn int_of(rt: &Runtime, v: Value) -> i64 {
    rt.as_integer(v).unwrap_or_default()
}

/// Equal integers hash equally, whatever object holds them.
fn hash(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let i = int_of(rt, recv);
    Ok(rt.make_integer(i))
}

fn to_s(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let mut buf = itoa::Buffer::new();
    let s = buf.format(int_of(rt, recv));
    string_result(rt, s)
}

fn numeric_cmp(rt: &Runtime, i: i64, other: Value) -> Option<Ordering> {
    if let Some(j) = rt.as_integer(other) {
        return Some(i.cmp(&j));
    }
    rt.as_float(other).and_then(|f| (i as f64).partial_cmp(&f))
}

fn eq(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    let equal = numeric_cmp(rt, int_of(rt, recv), args[0]) == Some(Ordering::Equal);
    Ok(rt.bool_value(equal))
}

fn cmp(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    match numeric_cmp(rt, int_of(rt, recv), args[0]) {
        Some(ord) => Ok(rt.make_integer(ord as i64)),
        None => Ok(rt.nil()),
    }
}

fn add(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    let i = int_of(rt, recv);
    if let Some(f) = rt.as_float(args[0]) {
        return Ok(rt.make_float(i as f64 + f));
    }
    let j = expect_integer(rt, env, args[0])?;
    Ok(rt.make_integer(i.wrapping_add(j)))
}

fn sub(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    let i = int_of(rt, recv);
    if let Some(f) = rt.as_float(args[0]) {
        return Ok(rt.make_float(i as f64 - f));
    }
    let j = expect_integer(rt, env, args[0])?;
    Ok(rt.make_integer(i.wrapping_sub(j)))
}
