//! Runtime module - the object runtime context.
//!
//! The `Runtime` struct owns the heap, the global registry and the configuration; its
//! behavior is split across submodules by concern.

mod binder;
mod bootstrap;
mod config;
mod global_env;
mod hash_ops;
mod method_call;
mod names;
mod stack;

pub use binder::{NativeArg, PositionalParam};
pub use bootstrap::CoreObjects;
pub use config::{Flow, RuntimeConfig};
pub use global_env::GlobalEnv;

// The main Runtime implementation is in core.rs
mod core;
pub use self::core::{Ancestors, Runtime};
