//! Class payload and method table entries.

use std::fmt;
use std::rc::Rc;

use super::block::BlockRef;
use super::env::EnvRef;
use super::heap::ObjectId;
use super::value::{FastHashMap, Value, ValueType, fast_map_new};
use crate::Runtime;
use crate::errors::EvalResult;

/// Native method: `(runtime, caller env, self, args, block) -> value`.
pub type NativeFn = fn(&mut Runtime, &EnvRef, Value, &[Value], Option<&BlockRef>) -> EvalResult;

/// Body produced by the code generator. It runs inside a fresh method frame.
pub type CompiledFn = Rc<dyn Fn(&mut Runtime, &EnvRef, Value, &[Value], Option<&BlockRef>) -> EvalResult>;

#[derive(Clone)]
pub enum Method {
    Native(NativeFn),
    Compiled(CompiledFn),
}

impl Method {
    pub fn compiled<F>(body: F) -> Self
    where
        F: Fn(&mut Runtime, &EnvRef, Value, &[Value], Option<&BlockRef>) -> EvalResult + 'static,
    {
        Method::Compiled(Rc::new(body))
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Native(_) => f.write_str("Method::Native"),
            Method::Compiled(_) => f.write_str("Method::Compiled"),
        }
    }
}

pub struct ClassData {
    pub name: String,
    /// `None` for the root of the hierarchy. The root metaclass names itself here.
    pub superclass: Option<ObjectId>,
    /// Payload shape of instances created by `allocate`.
    pub instance_type: ValueType,
    pub methods: FastHashMap<String, Method>,
    pub singleton_methods: FastHashMap<String, Method>,
    pub constants: FastHashMap<String, Value>,
}

impl ClassData {
    pub fn new(name: &str, superclass: Option<ObjectId>, instance_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            superclass,
            instance_type,
            methods: fast_map_new(),
            singleton_methods: fast_map_new(),
            constants: fast_map_new(),
        }
    }
}
