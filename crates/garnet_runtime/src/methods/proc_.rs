use super::MethodRegistry;
use crate::Runtime;
use crate::core::{BlockRef, EnvRef, Value};
use crate::errors::EvalResult;
use crate::runtime::CoreObjects;

pub(super) fn install(core: &CoreObjects, registry: &mut MethodRegistry) {
    registry.register(core.proc_class, "call", call);
    registry.register(core.proc_class, "[]", call);
    registry.register(core.proc_class, "to_proc", to_proc);
}

/// Nothing owns a proc invoked this way, so a break inside it raises LocalJumpError.
fn call(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    rt.call_proc(env, recv, args)
}

fn to_proc(_rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    Ok(recv)
}
