use super::MethodRegistry;
use super::common::*;
use crate::Runtime;
use crate::core::{BlockRef, EnvRef, Payload, Value};
use crate::errors::EvalResult;
use crate::runtime::CoreObjects;

pub(super) fn install(core: &CoreObjects, registry: &mut MethodRegistry) {
    registry.register(core.exception, "initialize", initialize);
    registry.register(core.exception, "message", message);
    registry.register(core.exception, "to_s", message);
    registry.register(core.exception, "inspect", inspect);
    registry.register(core.exception, "backtrace", backtrace);
}

/// A missing message reads as the class name.
fn message_of(rt: &Runtime, v: Value) -> String {
    match rt.exception_data(v) {
        Some(data) if !data.message.is_empty() => data.message.clone(),
        _ => rt.class_name_of(v).to_string(),
    }
}

fn initialize(rt: &mut Runtime, env: &EnvRef, recv: Value, args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    rt.check_arity(env, args.len(), 0, Some(1))?;
    let message = match args.first() {
        Some(&m) if !rt.is_nil(m) => match rt.as_str(m) {
            Some(s) => s.to_string(),
            None => rt.inspect(env, m)?,
        },
        _ => String::new(),
    };
    if let Payload::Exception(data) = &mut rt.heap.get_mut(recv.id()).payload {
        data.message = message;
    }
    Ok(recv)
}

fn message(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let s = message_of(rt, recv);
    string_result(rt, &s)
}

/// `#<ArgumentError: message>`, or just the class name without a message.
fn inspect(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let class_name = rt.class_name_of(recv).to_string();
    let message = message_of(rt, recv);
    let s = if message == class_name {
        class_name
    } else {
        format!("#<{}: {}>", class_name, message)
    };
    string_result(rt, &s)
}

fn backtrace(rt: &mut Runtime, _env: &EnvRef, recv: Value, _args: &[Value], _block: Option<&BlockRef>) -> EvalResult {
    let frames = rt
        .exception_data(recv)
        .map(|data| data.backtrace.clone())
        .unwrap_or_default();
    if frames.is_empty() {
        return Ok(rt.nil());
    }
    let lines: Vec<Value> = frames.iter().map(|f| rt.make_string(f)).collect();
    Ok(rt.make_array(lines))
}
