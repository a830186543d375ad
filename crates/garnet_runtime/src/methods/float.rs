use super::MethodRegistry;
use super::common::*;
use crate::Runtime;
use crate::core::{BlockRef, EnvRef, Value};
use crate::errors::EvalResult;
use crate::runtime::CoreObjects;

pub(super) fn install(core: &CoreObjects, registry: &mut MethodRegistry) {
    registry.register(core.float, "hash", hash);
    registry.register(core.float, "inspect", to_s);
    registry.register(core.float, "to_s", to_s);
    registry.register(core.float, "==", eq);
}

fn float_of(rt: &Runtime, v: Value) -> f64 {
    rt.as_float(v).unwrap_or_default()
}

fn hash(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let f = float_of(rt, recv);
    // -0.0 == 0.0, so both share a hash.
    let bits = if f == 0.0 { 0 } else { f.to_bits() as i64 };
    Ok(rt.make_integer(bits))
}

fn to_s(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let f = float_of(rt, recv);
    if f.is_infinite() {
        return string_result(rt, if f > 0.0 { "Infinity" } else { "-Infinity" });
    }
    let mut buf = ryu::Buffer::new();
    let s = buf.format(f).to_string();
    string_result(rt, &s)
}

fn eq(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    let f = float_of(rt, recv);
    let other = match rt.as_integer(args[0]) {
        Some(i) => Some(i as f64),
        None => rt.as_float(args[0]),
    };
    Ok(rt.bool_value(other == Some(f)))
}
