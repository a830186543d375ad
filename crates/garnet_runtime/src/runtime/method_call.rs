//! Selector resolution, method invocation and block execution.

use std::cmp::Ordering;

use garnet_core::{DiagnosticKind, ErrorClass};
use smallvec::SmallVec;

use crate::core::{BlockRef, Env, EnvRef, Method, Value};
use crate::errors::{EvalResult, RuntimeError};

use super::config::Flow;
use super::core::Runtime;
use super::stack::ensure_sufficient_stack;

impl Runtime {
    /// Resolve `selector` for `receiver`.
    ///
    /// A class receiver first searches the class-level methods of its own superclass chain;
    /// every receiver then searches the instance methods along the chain of its class.
    /// The first match wins.
    pub fn find_method(&self, receiver: Value, selector: &str) -> Option<Method> {
        if self.is_class(receiver) {
            let found = self.ancestors(receiver).find_map(|class| {
                self.class_data(class)?
                    .singleton_methods
                    .get(selector)
                    .cloned()
            });
            if found.is_some() {
                return found;
            }
        }
        self.ancestors(self.class_of(receiver))
            .find_map(|class| self.class_data(class)?.methods.get(selector).cloned())
    }

    pub fn respond_to(&self, receiver: Value, selector: &str) -> bool {
        self.find_method(receiver, selector).is_some()
    }

    #[tracing::instrument(level = "trace", skip(self, env, receiver, args, block))]
    pub fn send(
        &mut self,
        env: &EnvRef,
        receiver: Value,
        selector: &str,
        args: &[Value],
        block: Option<&BlockRef>,
    ) -> EvalResult {
        match self.find_method(receiver, selector) {
            Some(method) => self.invoke(env, receiver, selector, &method, args, block),
            None => self.method_missing(env, receiver, selector, args, block),
        }
    }

    fn invoke(
        &mut self,
        env: &EnvRef,
        receiver: Value,
        selector: &str,
        method: &Method,
        args: &[Value],
        block: Option<&BlockRef>,
    ) -> EvalResult {
        self.enter_call(env)?;
        let result = ensure_sufficient_stack(|| match method {
            Method::Native(f) => f(self, env, receiver, args, block),
            Method::Compiled(body) => {
                let frame = Env::new_method_frame(env, selector, block.cloned());
                body(self, &frame, receiver, args, block)
            }
        });
        self.call_depth -= 1;
        result
    }

    fn enter_call(&mut self, env: &EnvRef) -> EvalResult<()> {
        if self.call_depth >= self.config.max_call_depth {
            return Err(self.error(env, DiagnosticKind::StackTooDeep));
        }
        self.call_depth += 1;
        Ok(())
    }

    fn method_missing(
        &mut self,
        env: &EnvRef,
        receiver: Value,
        selector: &str,
        args: &[Value],
        block: Option<&BlockRef>,
    ) -> EvalResult {
        let Some(hook) = self.find_method(receiver, "method_missing") else {
            let class_name = self.class_name_of(receiver).to_string();
            return Err(self.error(
                env,
                DiagnosticKind::NoMethod {
                    selector: selector.to_string(),
                    class_name,
                },
            ));
        };
        tracing::debug!(selector, "dispatching to method_missing");
        let mut full: SmallVec<[Value; 4]> = SmallVec::with_capacity(args.len() + 1);
        full.push(self.intern(selector));
        full.extend_from_slice(args);
        self.invoke(env, receiver, "method_missing", &hook, &full, block)
    }

    /// Run `block` in a new frame that closes over the block's captured frame and
    /// records `env` as its caller.
    #[tracing::instrument(level = "trace", skip_all, fields(args = args.len()))]
    pub fn run_block(
        &mut self,
        env: &EnvRef,
        block: Option<&BlockRef>,
        args: &[Value],
        enclosing: Option<&BlockRef>,
    ) -> EvalResult<Flow> {
        let Some(block) = block else {
            return Err(self.error(env, DiagnosticKind::NoBlockGiven));
        };
        self.enter_call(env)?;
        let frame = Env::new_block_frame(&block.env, env);
        let result = ensure_sufficient_stack(|| {
            (block.body)(self, &frame, block.self_value, args, enclosing)
        });
        self.call_depth -= 1;
        result
    }

    /// `yield`: run the block passed to the nearest enclosing method.
    pub fn run_block_from_env(&mut self, env: &EnvRef, args: &[Value]) -> EvalResult<Flow> {
        let block = env.block();
        self.run_block(env, block.as_ref(), args, None)
    }

    /// Run a block that nothing owns. A break there has nowhere to go.
    pub fn run_block_without_break(
        &mut self,
        env: &EnvRef,
        block: Option<&BlockRef>,
        args: &[Value],
    ) -> EvalResult {
        match self.run_block(env, block, args, None)? {
            Flow::Normal(v) => Ok(v),
            Flow::Break(_) => Err(self.error(env, DiagnosticKind::BreakFromProcClosure)),
        }
    }

    pub fn call_proc(&mut self, env: &EnvRef, proc_value: Value, args: &[Value]) -> EvalResult {
        let Some(block) = self.proc_block(proc_value) else {
            return Err(self.wrong_type(env, proc_value, "Proc"));
        };
        self.run_block_without_break(env, Some(&block), args)
    }

    /// Convert `value` into a Proc: procs pass through, anything else goes through `to_proc`.
    pub fn to_proc(&mut self, env: &EnvRef, value: Value) -> EvalResult {
        if self.proc_block(value).is_some() {
            return Ok(value);
        }
        if self.respond_to(value, "to_proc") {
            let converted = self.send(env, value, "to_proc", &[], None)?;
            if self.proc_block(converted).is_some() {
                return Ok(converted);
            }
        }
        Err(self.wrong_type(env, value, "Proc"))
    }

    pub(crate) fn wrong_type(&self, env: &EnvRef, value: Value, expected: &str) -> RuntimeError {
        let actual = self.class_name_of(value).to_string();
        self.error(
            env,
            DiagnosticKind::WrongArgumentType {
                actual,
                expected: expected.to_string(),
            },
        )
    }

    // ------------------------------------------------------------------
    // Dispatched conveniences used by native methods
    // ------------------------------------------------------------------

    /// `value.inspect` as a Rust string.
    pub fn inspect(&mut self, env: &EnvRef, value: Value) -> EvalResult<String> {
        let repr = self.send(env, value, "inspect", &[], None)?;
        match self.as_str(repr) {
            Some(s) => Ok(s.to_string()),
            None => Err(self.error(
                env,
                DiagnosticKind::NoImplicitConversion {
                    from: self.class_name_of(repr).to_string(),
                    into: "String".into(),
                },
            )),
        }
    }

    /// `a == b`, by dispatch.
    pub fn values_equal(&mut self, env: &EnvRef, a: Value, b: Value) -> EvalResult<bool> {
        if a == b {
            return Ok(true);
        }
        let result = self.send(env, a, "==", &[b], None)?;
        Ok(self.truthy(result))
    }

    /// `a <=> b`, by dispatch. Incomparable values raise ArgumentError.
    pub fn compare(&mut self, env: &EnvRef, a: Value, b: Value) -> EvalResult<Ordering> {
        let result = self.send(env, a, "<=>", &[b], None)?;
        match self.as_integer(result) {
            Some(n) => Ok(n.cmp(&0)),
            None => {
                let msg = format!(
                    "comparison of {} with {} failed",
                    self.class_name_of(a),
                    self.class_name_of(b)
                );
                Err(self.error(env, DiagnosticKind::Raw(ErrorClass::ArgumentError, msg)))
            }
        }
    }

    /// Sort `items` in place by `<=>`. The first failing comparison is returned.
    pub fn sort_values(&mut self, env: &EnvRef, items: &mut [Value]) -> EvalResult<()> {
        // Insertion sort: each comparison is a dispatched call that may fail.
        for i in 1..items.len() {
            let mut j = i;
            while j > 0 && self.compare(env, items[j - 1], items[j])? == Ordering::Greater {
                items.swap(j - 1, j);
                j -= 1;
            }
        }
        Ok(())
    }
}
