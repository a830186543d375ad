use super::MethodRegistry;
use super::common::*;
use crate::Runtime;
use crate::core::{BlockRef, EnvRef, Value};
use crate::errors::EvalResult;
use crate::runtime::CoreObjects;

pub(super) fn install(core: &CoreObjects, registry: &mut MethodRegistry) {
    registry.register(core.class, "new", new);
    registry.register(core.class, "allocate", allocate);
    registry.register(core.class, "name", name);
    registry.register(core.class, "inspect", name);
    registry.register(core.class, "to_s", name);
    registry.register(core.class, "superclass", superclass);
}

/// `allocate`, then `initialize` with the same arguments and block.
fn new(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], block: Option<&BlockRef>) -> EvalResult {
    let obj = rt.allocate(env, recv)?;
    if rt.respond_to(obj, "initialize") {
        rt.send(env, obj, "initialize", args, block)?;
    } else {
        validate_arity(rt, env, args, 0)?;
    }
    Ok(obj)
}

fn allocate(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 0)?;
    rt.allocate(env, recv)
}

fn name(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let name = rt.class_name(recv).to_string();
    string_result(rt, &name)
}

fn superclass(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    Ok(rt.superclass(recv).unwrap_or(rt.nil()))
}
