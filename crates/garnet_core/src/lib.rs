//! Core types for the garnet object runtime.
//!
//! This crate contains the fundamental types that are independent of the runtime:
//! - `ObjectId` - Handle to heap-allocated objects
//! - `DiagnosticKind` / `ErrorClass` - The error taxonomy raised by the runtime
//! - Name classification helpers (constants, globals, instance variables)

pub mod diagnostic;
pub mod gc;
pub mod names;

pub use diagnostic::{DiagnosticKind, DiagnosticsFormatter, ErrorClass};
pub use gc::ObjectId;
pub use names::{NameKind, classify_name, is_constant_name, is_global_name, is_ivar_name};
