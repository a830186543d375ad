//! Runtime configuration and control-flow types.

use crate::core::Value;

/// Runtime configuration options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Nested dispatches allowed before `SystemStackError` is raised.
    pub max_call_depth: usize,
    /// Initial object capacity of the heap.
    pub heap_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 10_000,
            heap_capacity: 1024,
        }
    }
}

/// Outcome of running a block body.
///
/// `Break` asks the method that owns the block to stop and return the carried value.
/// Frames that only pass a block's result along hand the `Break` back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Normal(Value),
    Break(Value),
}

impl Flow {
    pub fn value(self) -> Value {
        match self {
            Flow::Normal(v) | Flow::Break(v) => v,
        }
    }

    pub fn is_break(self) -> bool {
        matches!(self, Flow::Break(_))
    }
}

/// Run a block from the method that owns it: a break ends the method with the break value.
#[macro_export]
macro_rules! run_block_or_break {
    ($rt:expr, $env:expr, $block:expr, $args:expr) => {
        match $rt.run_block($env, $block, $args, None)? {
            $crate::Flow::Normal(v) => v,
            $crate::Flow::Break(v) => return Ok(v),
        }
    };
}

/// Inside a block body: pass a break from a nested block straight back to our caller.
#[macro_export]
macro_rules! forward_break {
    ($flow:expr) => {
        match $flow {
            $crate::Flow::Normal(v) => v,
            brk @ $crate::Flow::Break(_) => return Ok(brk),
        }
    };
}
