//! Blocks and procs.

use std::fmt;
use std::rc::Rc;

use super::env::EnvRef;
use super::value::Value;
use crate::Runtime;
use crate::errors::EvalResult;
use crate::runtime::Flow;

/// Block body: `(runtime, block frame, self, args, enclosing block) -> flow`.
pub type BlockBody = Rc<dyn Fn(&mut Runtime, &EnvRef, Value, &[Value], Option<&BlockRef>) -> EvalResult<Flow>>;

pub type BlockRef = Rc<Block>;

/// A closure: the frame it was created in, its `self` and its body.
pub struct Block {
    pub env: EnvRef,
    pub self_value: Value,
    /// Number of declared parameters, used to decide auto-splatting of a single argument.
    pub params: usize,
    pub body: BlockBody,
}

impl Block {
    pub fn new<F>(env: &EnvRef, self_value: Value, params: usize, body: F) -> BlockRef
    where
        F: Fn(&mut Runtime, &EnvRef, Value, &[Value], Option<&BlockRef>) -> EvalResult<Flow> + 'static,
    {
        Rc::new(Self {
            env: env.clone(),
            self_value,
            params,
            body: Rc::new(body),
        })
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("self_value", &self.self_value)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
