#![allow(dead_code)]

use garnet_runtime::{Block, BlockRef, EnvRef, EvalResult, Flow, Runtime, Value};

pub fn setup() -> (Runtime, EnvRef) {
    let rt = Runtime::new();
    let env = rt.main_env();
    (rt, env)
}

pub fn int(rt: &mut Runtime, i: i64) -> Value {
    rt.make_integer(i)
}

pub fn ints(rt: &mut Runtime, items: &[i64]) -> Value {
    let values = items.iter().map(|&i| rt.make_integer(i)).collect();
    rt.make_array(values)
}

pub fn int_items(rt: &Runtime, array: Value) -> Vec<i64> {
    rt.array(array)
        .unwrap()
        .iter()
        .map(|&v| rt.as_integer(v).unwrap())
        .collect()
}

pub fn inspect(rt: &mut Runtime, env: &EnvRef, v: Value) -> String {
    rt.inspect(env, v).unwrap()
}

/// Block whose body is a plain Rust closure.
pub fn block<F>(rt: &Runtime, env: &EnvRef, params: usize, body: F) -> BlockRef
where
    F: Fn(&mut Runtime, &EnvRef, Value, &[Value], Option<&BlockRef>) -> EvalResult<Flow> + 'static,
{
    Block::new(env, rt.main_object(), params, body)
}

/// Block that returns its first argument.
pub fn identity_block(rt: &Runtime, env: &EnvRef) -> BlockRef {
    block(rt, env, 1, |rt, _env, _self, args, _block| {
        Ok(Flow::Normal(args.first().copied().unwrap_or(rt.nil())))
    })
}
