use std::cmp::Ordering;

use super::MethodRegistry;
use super::common::*;
use crate::Runtime;
use crate::core::{BlockRef, EnvRef, Value};
use crate::errors::EvalResult;
use crate::run_block_or_break;
use crate::runtime::CoreObjects;

pub(super) fn install(core: &CoreObjects, registry: &mut MethodRegistry) {
    registry.register(core.array, "inspect", inspect);
    registry.register(core.array, "to_s", inspect);
    registry.register(core.array, "==", eq);
    registry.register(core.array, "<=>", cmp);
    registry.register(core.array, "hash", hash);
    registry.register(core.array, "size", size);
    registry.register(core.array, "length", size);
    registry.register(core.array, "each", each);
    registry.register(core.array, "to_ary", to_ary);
    registry.register(core.array, "to_a", to_ary);
    registry.register(core.array, "sort", sort);
    registry.register(core.array, "<<", push);
    registry.register(core.array, "push", push);
    registry.register(core.array, "[]", index);
}

fn items_of(rt: &Runtime, v: Value) -> Vec<Value> {
    rt.array(v).map(<[Value]>::to_vec).unwrap_or_default()
}

fn inspect(rt: &mut Runtime, env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let mut out = String::from("[");
    for (i, item) in items_of(rt, recv).into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&rt.inspect(env, item)?);
    }
    out.push(']');
    string_result(rt, &out)
}

fn eq(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    let Some(other) = rt.array(args[0]).map(<[Value]>::to_vec) else {
        return Ok(rt.false_value());
    };
    let mine = items_of(rt, recv);
    if mine.len() != other.len() {
        return Ok(rt.false_value());
    }
    for (a, b) in mine.into_iter().zip(other) {
        if !rt.values_equal(env, a, b)? {
            return Ok(rt.false_value());
        }
    }
    Ok(rt.true_value())
}

/// Element-wise `<=>`, then length. Nil when the other side is not an Array.
fn cmp(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    let Some(other) = rt.array(args[0]).map(<[Value]>::to_vec) else {
        return Ok(rt.nil());
    };
    let mine = items_of(rt, recv);
    for (&a, &b) in mine.iter().zip(&other) {
        let ord = rt.compare(env, a, b)?;
        if ord != Ordering::Equal {
            return Ok(rt.make_integer(ord as i64));
        }
    }
    let ord = mine.len().cmp(&other.len());
    Ok(rt.make_integer(ord as i64))
}

fn hash(rt: &mut Runtime, env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let mut h: i64 = 7;
    for item in items_of(rt, recv) {
        h = h.wrapping_mul(31).wrapping_add(rt.hash_code(env, item)?);
    }
    Ok(rt.make_integer(h))
}

fn size(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let n = rt.array_len(recv).unwrap_or_default();
    Ok(rt.make_integer(n as i64))
}

/// Owns its block: a break from it ends the loop and becomes the result.
fn each(rt: &mut Runtime, env: &EnvRef, recv: Value, _args: &[Value], block: Option<&BlockRef>) -> EvalResult {
    let mut i = 0;
    while let Some(item) = rt.array_get(recv, i) {
        run_block_or_break!(rt, env, block, &[item]);
        i += 1;
    }
    Ok(recv)
}

fn to_ary(_rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    Ok(recv)
}

fn sort(rt: &mut Runtime, env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let mut items = items_of(rt, recv);
    rt.sort_values(env, &mut items)?;
    Ok(rt.make_array(items))
}

fn push(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    for &item in args {
        rt.array_push(env, recv, item)?;
    }
    Ok(recv)
}

fn index(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    let i = expect_integer(rt, env, args[0])?;
    let len = rt.array_len(recv).unwrap_or_default() as i64;
    let i = if i < 0 { len + i } else { i };
    if (0..len).contains(&i) {
        Ok(rt.array_get(recv, i as usize).unwrap_or(rt.nil()))
    } else {
        Ok(rt.nil())
    }
}
