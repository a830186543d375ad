//! Native methods of the core classes.
//!
//! Each submodule contributes the methods of one class (or a family of small classes)
//! to a `MethodRegistry`, which installs them into the class method tables.

use crate::Runtime;
use crate::core::{NativeFn, Value};
use crate::runtime::CoreObjects;

mod array;
mod bool;
mod class;
mod common;
mod exception;
mod float;
mod hash;
mod int;
mod object;
mod proc_;
mod string;
mod symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Found on instances of the class.
    Instance,
    /// Found on the class itself and its subclasses.
    Singleton,
}

pub struct MethodRegistry {
    entries: Vec<(Value, Binding, String, NativeFn)>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, class: Value, name: &str, fun: NativeFn) {
        self.entries
            .push((class, Binding::Instance, name.to_string(), fun));
    }

    pub fn register_singleton(&mut self, class: Value, name: &str, fun: NativeFn) {
        self.entries
            .push((class, Binding::Singleton, name.to_string(), fun));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names registered for `class`, in registration order.
    pub fn names(&self, class: Value, binding: Binding) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(c, b, _, _)| *c == class && *b == binding)
            .map(|(_, _, n, _)| n.clone())
            .collect()
    }

    pub fn install_into(self, rt: &mut Runtime) {
        let count = self.entries.len();
        for (class, binding, name, fun) in self.entries {
            match binding {
                Binding::Instance => rt.define_native(class, &name, fun),
                Binding::Singleton => rt.define_singleton_native(class, &name, fun),
            }
        }
        tracing::trace!(count, "native methods installed");
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub trait MethodProvider {
    fn install(&self, core: &CoreObjects, registry: &mut MethodRegistry);
}

/// Methods of the classes created at bootstrap.
pub struct CoreMethodProvider;

impl MethodProvider for CoreMethodProvider {
    fn install(&self, core: &CoreObjects, registry: &mut MethodRegistry) {
        object::install(core, registry);
        class::install(core, registry);
        bool::install(core, registry);
        int::install(core, registry);
        float::install(core, registry);
        string::install(core, registry);
        symbol::install(core, registry);
        array::install(core, registry);
        hash::install(core, registry);
        proc_::install(core, registry);
        exception::install(core, registry);
    }
}
