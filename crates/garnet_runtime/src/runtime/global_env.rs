//! Process-wide registry: interned symbols, global variables and bootstrap singletons.
//!
//! There is exactly one per `Runtime`, created before any user code runs and handed to
//! every component through the runtime rather than reached through static state.

use crate::core::{FastHashMap, ObjectId, Value, fast_map_new, fast_map_with_capacity};

pub struct GlobalEnv {
    symbols: FastHashMap<String, Value>,
    globals: FastHashMap<String, Value>,
    object_class: ObjectId,
    nil_obj: Value,
    true_obj: Value,
    false_obj: Value,
}

impl GlobalEnv {
    /// Built by bootstrap once the singletons exist.
    pub fn new(object_class: ObjectId, nil_obj: Value, true_obj: Value, false_obj: Value) -> Self {
        Self {
            symbols: fast_map_with_capacity(64),
            globals: fast_map_new(),
            object_class,
            nil_obj,
            true_obj,
            false_obj,
        }
    }

    pub fn get_symbol(&self, name: &str) -> Option<Value> {
        self.symbols.get(name).copied()
    }

    pub fn add_symbol(&mut self, name: &str, value: Value) {
        self.symbols.insert(name.to_string(), value);
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn global_get(&self, name: &str) -> Option<Value> {
        self.globals.get(name).copied()
    }

    pub fn global_set(&mut self, name: &str, value: Value) {
        self.globals.insert(name.to_string(), value);
    }

    pub fn object_class(&self) -> ObjectId {
        self.object_class
    }

    pub fn nil_obj(&self) -> Value {
        self.nil_obj
    }

    pub fn true_obj(&self) -> Value {
        self.true_obj
    }

    pub fn false_obj(&self) -> Value {
        self.false_obj
    }
}
