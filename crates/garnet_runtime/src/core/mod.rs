//! Core runtime infrastructure.
//!
//! This module contains the fundamental types and systems for the runtime:
//! - `Value` - Handle to a heap object, and the payload variants objects store
//! - `Heap` - Arena that owns every object
//! - `ClassData` / `Method` - Class payload and method table entries
//! - `Env` - Lexical environment chain
//! - `Block` - Closures
//! - `HashTable` - Insertion-ordered hash table

pub mod block;
pub mod class;
pub mod env;
pub mod hash;
pub mod heap;
pub mod value;

pub use block::{Block, BlockBody, BlockRef};
pub use class::{ClassData, CompiledFn, Method, NativeFn};
pub use env::{Env, EnvFlags, EnvRef, FrameLabel, Scope};
pub use hash::{HashEntry, HashTable};
pub use heap::{Heap, HeapObject, ObjectId};
pub use value::*;
