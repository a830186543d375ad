use super::MethodRegistry;
use super::common::*;
use crate::Runtime;
use crate::core::{BlockRef, EnvRef, Value};
use crate::errors::EvalResult;
use crate::runtime::CoreObjects;

pub(super) fn install(core: &CoreObjects, registry: &mut MethodRegistry) {
    registry.register(core.nil_class, "inspect", nil_inspect);
    registry.register(core.nil_class, "to_s", nil_to_s);
    registry.register(core.nil_class, "to_a", nil_to_a);
    registry.register(core.true_class, "inspect", literal);
    registry.register(core.true_class, "to_s", literal);
    registry.register(core.true_class, "!", not);
    registry.register(core.false_class, "inspect", literal);
    registry.register(core.false_class, "to_s", literal);
    registry.register(core.false_class, "!", not);
    registry.register(core.nil_class, "!", not);
}

fn nil_inspect(rt: &mut Runtime, _env: &EnvRef, _recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    string_result(rt, "nil")
}

fn nil_to_s(rt: &mut Runtime, _env: &EnvRef, _recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    string_result(rt, "")
}

fn nil_to_a(rt: &mut Runtime, _env: &EnvRef, _recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    Ok(rt.make_array(Vec::new()))
}

fn literal(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let s = if rt.truthy(recv) { "true" } else { "false" };
    string_result(rt, s)
}

fn not(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    validate_arity(rt, env, args, 0)?;
    Ok(rt.bool_value(!rt.truthy(recv)))
}
