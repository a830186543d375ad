//! Runtime value representation.
//!
//! A `Value` is a copyable handle to an object living in the runtime heap. Behavior is
//! determined by the object's class, never by the handle; the payload variant only
//! describes how the object's content is stored.

use ahash::RandomState;
use hashbrown::HashMap;
use std::fmt;
use std::hash::Hash;

use super::block::BlockRef;
use super::class::ClassData;
use super::hash::HashTable;
use super::heap::ObjectId;

// ============================================================================
// HashMap helpers
// ============================================================================

pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;

pub fn fast_hasher() -> RandomState {
    RandomState::with_seeds(0, 0, 0, 0)
}

pub fn fast_map_new<K: Eq + Hash, V>() -> FastHashMap<K, V> {
    HashMap::with_hasher(fast_hasher())
}

pub fn fast_map_with_capacity<K: Eq + Hash, V>(cap: usize) -> FastHashMap<K, V> {
    HashMap::with_capacity_and_hasher(cap, fast_hasher())
}

// ============================================================================
// Value handle
// ============================================================================

/// Reference to a heap object. Equality is object identity.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Value(pub(crate) ObjectId);

impl Value {
    #[inline(always)]
    pub fn id(self) -> ObjectId {
        self.0
    }

    #[inline(always)]
    pub fn from_id(id: ObjectId) -> Self {
        Self(id)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.0)
    }
}

// ============================================================================
// Payload
// ============================================================================

/// Storage shape of a heap object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Class,
    Array,
    String,
    Integer,
    Float,
    Hash,
    Proc,
    Symbol,
    Nil,
    True,
    False,
    Exception,
    Io,
    VoidPointer,
    Other,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Class => "Class",
            ValueType::Array => "Array",
            ValueType::String => "String",
            ValueType::Integer => "Integer",
            ValueType::Float => "Float",
            ValueType::Hash => "Hash",
            ValueType::Proc => "Proc",
            ValueType::Symbol => "Symbol",
            ValueType::Nil => "NilClass",
            ValueType::True => "TrueClass",
            ValueType::False => "FalseClass",
            ValueType::Exception => "Exception",
            ValueType::Io => "IO",
            ValueType::VoidPointer => "VoidP",
            ValueType::Other => "Object",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ExceptionData {
    pub message: String,
    pub backtrace: Vec<String>,
}

pub enum Payload {
    Class(Box<ClassData>),
    Array(Vec<Value>),
    String(String),
    Integer(i64),
    Float(f64),
    Hash(Box<HashTable>),
    Proc(BlockRef),
    Symbol(String),
    Nil,
    True,
    False,
    Exception(Box<ExceptionData>),
    Io(i32),
    VoidPointer(usize),
    Other,
}

impl Payload {
    pub fn value_type(&self) -> ValueType {
        match self {
            Payload::Class(_) => ValueType::Class,
            Payload::Array(_) => ValueType::Array,
            Payload::String(_) => ValueType::String,
            Payload::Integer(_) => ValueType::Integer,
            Payload::Float(_) => ValueType::Float,
            Payload::Hash(_) => ValueType::Hash,
            Payload::Proc(_) => ValueType::Proc,
            Payload::Symbol(_) => ValueType::Symbol,
            Payload::Nil => ValueType::Nil,
            Payload::True => ValueType::True,
            Payload::False => ValueType::False,
            Payload::Exception(_) => ValueType::Exception,
            Payload::Io(_) => ValueType::Io,
            Payload::VoidPointer(_) => ValueType::VoidPointer,
            Payload::Other => ValueType::Other,
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Class(c) => write!(f, "Class({})", c.name),
            Payload::Array(v) => write!(f, "Array(len={})", v.len()),
            Payload::String(s) => write!(f, "String({:?})", s),
            Payload::Integer(i) => write!(f, "Integer({})", i),
            Payload::Float(x) => write!(f, "Float({})", x),
            Payload::Hash(h) => write!(f, "Hash(len={})", h.len()),
            Payload::Proc(_) => write!(f, "Proc"),
            Payload::Symbol(s) => write!(f, "Symbol({})", s),
            Payload::Nil => write!(f, "Nil"),
            Payload::True => write!(f, "True"),
            Payload::False => write!(f, "False"),
            Payload::Exception(e) => write!(f, "Exception({:?})", e.message),
            Payload::Io(fd) => write!(f, "Io({})", fd),
            Payload::VoidPointer(p) => write!(f, "VoidPointer({:#x})", p),
            Payload::Other => write!(f, "Other"),
        }
    }
}
