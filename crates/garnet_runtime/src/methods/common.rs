use garnet_core::DiagnosticKind;

use crate::Runtime;
use crate::core::{EnvRef, Value, fast_hasher};
use crate::errors::EvalResult;

/// Arity check for a method taking exactly `n` arguments.
pub fn validate_arity(rt: &Runtime, env: &EnvRef, args: &[Value], n: usize) -> EvalResult<()> {
    rt.check_arity(env, args.len(), n, Some(n))
}

pub fn expect_integer(rt: &Runtime, env: &EnvRef, v: Value) -> EvalResult<i64> {
    rt.as_integer(v).ok_or_else(|| {
        rt.error(
            env,
            DiagnosticKind::NoImplicitConversion {
                from: rt.class_name_of(v).to_string(),
                into: "Integer".into(),
            },
        )
    })
}

/// Method name given as a Symbol or a String.
pub fn expect_name(rt: &Runtime, env: &EnvRef, v: Value) -> EvalResult<String> {
    if let Some(name) = rt.symbol_name(v) {
        return Ok(name.to_string());
    }
    rt.as_str(v)
        .map(str::to_string)
        .ok_or_else(|| rt.wrong_type(env, v, "Symbol"))
}

#[inline]
pub fn identity_hash(v: Value) -> i64 {
    v.id().index() as i64
}

/// Content hash for string-like payloads; stable for the process.
pub fn hash_str(s: &str) -> i64 {
    fast_hasher().hash_one(s) as i64
}

/// `#<ClassName>`
pub fn default_inspect(rt: &Runtime, v: Value) -> String {
    format!("#<{}>", rt.class_name_of(v))
}

pub fn string_result(rt: &mut Runtime, s: &str) -> EvalResult {
    Ok(rt.make_string(s))
}
