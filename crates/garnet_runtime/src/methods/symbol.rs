use garnet_core::{DiagnosticKind, ErrorClass};

use super::MethodRegistry;
use super::common::*;
use crate::Runtime;
use crate::core::{Block, BlockRef, EnvRef, Value};
use crate::errors::EvalResult;
use crate::runtime::{CoreObjects, Flow};

pub(super) fn install(core: &CoreObjects, registry: &mut MethodRegistry) {
    registry.register(core.symbol, "hash", hash);
    registry.register(core.symbol, "inspect", inspect);
    registry.register(core.symbol, "to_s", to_s);
    registry.register(core.symbol, "==", eq);
    registry.register(core.symbol, "to_proc", to_proc);
}

fn name_of(rt: &Runtime, v: Value) -> String {
    rt.symbol_name(v).unwrap_or_default().to_string()
}

// Symbols are interned, so identity is equality.
fn hash(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    Ok(rt.make_integer(identity_hash(recv)))
}

fn inspect(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let s = format!(":{}", name_of(rt, recv));
    string_result(rt, &s)
}

fn to_s(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let s = name_of(rt, recv);
    string_result(rt, &s)
}

fn eq(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 1)?;
    Ok(rt.bool_value(recv == args[0]))
}

/// `:name.to_proc` sends `name` to its first argument with the rest as arguments.
fn to_proc(rt: &mut Runtime, env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let selector = name_of(rt, recv);
    let block = Block::new(env, recv, 1, move |rt, env, _self, args, block| {
        let Some((&receiver, rest)) = args.split_first() else {
            let msg = "no receiver given".to_string();
            return Err(rt.error(env, DiagnosticKind::Raw(ErrorClass::ArgumentError, msg)));
        };
        rt.send(env, receiver, &selector, rest, block).map(Flow::Normal)
    });
    Ok(rt.make_proc(block))
}
