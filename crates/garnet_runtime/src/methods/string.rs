use std::fmt::Write as _;

use super::MethodRegistry;
use super::common::*;
use crate::Runtime;
use crate::core::{BlockRef, EnvRef, Payload, Value};
use crate::errors::EvalResult;
use crate::runtime::CoreObjects;

pub(super) fn install(core: &CoreObjects, registry: &mut MethodRegistry) {
    registry.register(core.string, "hash", hash);
    registry.register(core.string, "inspect", inspect);
    registry.register(core.string, "to_s", to_s);
    registry.register(core.string, "==", eq);
    registry.register(core.string, "<=>", cmp);
    registry.register(core.string, "<<", append);
    registry.register(core.string, "size", size);
}

fn str_of(rt: &Runtime, v: Value) -> &str {
    rt.as_str(v).unwrap_or_default()
}

fn hash(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let h = hash_str(str_of(rt, recv));
    Ok(rt.make_integer(h))
}

/// Double-quoted, with control characters and quotes escaped.
pub(super) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{1b}' => out.push_str("\\e"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn inspect(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let quoted = quote(str_of(rt, recv));
    string_result(rt, &quoted)
}

fn to_s(_rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    Ok(recv)
}

fn eq(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    let equal = rt.as_str(args[0]).is_some_and(|other| other == str_of(rt, recv));
    Ok(rt.bool_value(equal))
}

fn cmp(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    match rt.as_str(args[0]).map(|other| str_of(rt, recv).cmp(other)) {
        Some(ord) => Ok(rt.make_integer(ord as i64)),
        None => Ok(rt.nil()),
    }
}

fn append(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    rt.check_frozen(env, recv)?;
    let tail = match rt.as_str(args[0]) {
        Some(s) => s.to_string(),
        None => rt.inspect(env, args[0])?,
    };
    if let Payload::String(s) = &mut rt.heap.get_mut(recv.id()).payload {
        s.push_str(&tail);
    }
    Ok(recv)
}

fn size(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let n = str_of(rt, recv).chars().count();
    Ok(rt.make_integer(n as i64))
}
