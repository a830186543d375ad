//! Garnet object runtime.
//!
//! The support layer a compiled Ruby-like program runs against: heap objects and their
//! classes, method dispatch with blocks and single-level `break`, the lexical environment
//! chain, an insertion-ordered hash table and the parameter binder.

#![allow(clippy::collapsible_if)]
#![allow(clippy::new_without_default)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::len_zero)]

pub mod core;
pub mod errors;
mod methods;
mod runtime;

// Re-exports from core/
pub use self::core::heap;
pub use self::core::value::{FastHashMap, Payload, Value, ValueType};
pub use self::core::env::{Env, EnvFlags, EnvRef, FrameLabel, Scope};
pub use self::core::block::{Block, BlockRef};
pub use self::core::class::{ClassData, Method, NativeFn};
pub use self::core::hash::HashTable;

pub use errors::{EvalResult, RuntimeError, format_backtrace};
pub use garnet_core::{DiagnosticKind, ErrorClass};

pub use methods::{Binding, CoreMethodProvider, MethodProvider, MethodRegistry};

// Runtime structs and enums
pub use runtime::Ancestors;
pub use runtime::CoreObjects;
pub use runtime::Flow;
pub use runtime::GlobalEnv;
pub use runtime::Runtime;
pub use runtime::RuntimeConfig;
pub use runtime::{NativeArg, PositionalParam};
