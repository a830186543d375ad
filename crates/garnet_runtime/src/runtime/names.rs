//! Name resolution across the constant, global, instance-variable and local namespaces.

use garnet_core::{DiagnosticKind, NameKind, classify_name};

use crate::core::{EnvRef, Value};
use crate::errors::EvalResult;

use super::core::Runtime;

impl Runtime {
    /// Resolve `name` as seen from code running in `env` with `self_value` as `self`.
    pub fn lookup_name(&mut self, env: &EnvRef, self_value: Value, name: &str) -> EvalResult {
        match classify_name(name) {
            NameKind::Constant => self.const_get(self_value, name).ok_or_else(|| {
                self.error(env, DiagnosticKind::UninitializedConstant(name.to_string()))
            }),
            NameKind::Global => Ok(self.global_get(name)),
            NameKind::InstanceVariable => Ok(self.ivar_get(self_value, name)),
            NameKind::Local => env
                .lookup(name)
                .ok_or_else(|| self.error(env, DiagnosticKind::UndefinedLocal(name.to_string()))),
        }
    }

    /// What `defined?(name)` reports, or `None` when the name means nothing here.
    pub fn defined(&self, env: &EnvRef, receiver: Value, name: &str) -> Option<&'static str> {
        match classify_name(name) {
            NameKind::Constant => self.const_get(receiver, name).map(|_| "constant"),
            NameKind::Global => {
                let value = self.global_get(name);
                (!self.is_nil(value)).then_some("global-variable")
            }
            NameKind::InstanceVariable => self
                .heap
                .get(receiver.id())
                .ivar(name)
                .map(|_| "instance-variable"),
            NameKind::Local if env.is_defined(name) => Some("local-variable"),
            NameKind::Local => self.respond_to(receiver, name).then_some("method"),
        }
    }

    /// `defined?` as a value: the description String, or nil.
    pub fn defined_obj(&mut self, env: &EnvRef, receiver: Value, name: &str) -> Value {
        match self.defined(env, receiver, name) {
            Some(description) => self.make_string(description),
            None => self.nil(),
        }
    }
}
