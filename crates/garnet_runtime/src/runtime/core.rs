use garnet_core::{DiagnosticKind, ErrorClass};

use crate::core::{
    BlockRef, ClassData, Env, EnvRef, ExceptionData, HashTable, Heap, HeapObject, Method,
    NativeFn, ObjectId, Payload, Value, ValueType,
};
use crate::errors::{EvalResult, RuntimeError};
use crate::methods::{CoreMethodProvider, MethodProvider, MethodRegistry};

use super::bootstrap::{CoreObjects, create_core_objects};
use super::config::RuntimeConfig;
use super::global_env::GlobalEnv;

pub struct Runtime {
    pub(crate) heap: Heap,
    pub(crate) globals: GlobalEnv,
    pub(crate) config: RuntimeConfig,
    pub(crate) core: CoreObjects,
    pub(crate) call_depth: usize,
    main_env: EnvRef,
    main_obj: Value,
}

/// Superclass chain walker. Stops after the root metaclass, whose superclass is itself.
pub struct Ancestors<'a> {
    heap: &'a Heap,
    next: Option<ObjectId>,
}

impl Iterator for Ancestors<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let current = self.next?;
        self.next = match &self.heap.get(current).payload {
            Payload::Class(data) => data.superclass.filter(|s| *s != current),
            _ => None,
        };
        Some(Value::from_id(current))
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let mut heap = Heap::with_capacity(config.heap_capacity);
        let (core, globals) = create_core_objects(&mut heap);
        let main_obj = Value::from_id(heap.alloc(HeapObject::new(core.object.id(), Payload::Other)));
        let mut rt = Self {
            heap,
            globals,
            config,
            core,
            call_depth: 0,
            main_env: Env::root(),
            main_obj,
        };
        rt.install_methods(&CoreMethodProvider);
        rt
    }

    /// Register every method a provider supplies.
    pub fn install_methods(&mut self, provider: &dyn MethodProvider) {
        let mut registry = MethodRegistry::new();
        provider.install(&self.core, &mut registry);
        registry.install_into(self);
    }

    /// Explicit end of life: reports heap statistics, then drops every object.
    pub fn teardown(self) {
        for (ty, count) in self.heap.memory_stats() {
            tracing::debug!(kind = ty.name(), count, "heap objects at teardown");
        }
        tracing::debug!(
            objects = self.heap.len(),
            symbols = self.globals.symbol_count(),
            "runtime teardown"
        );
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn globals(&self) -> &GlobalEnv {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut GlobalEnv {
        &mut self.globals
    }

    pub fn core(&self) -> &CoreObjects {
        &self.core
    }

    /// Top-level frame.
    pub fn main_env(&self) -> EnvRef {
        self.main_env.clone()
    }

    /// Top-level `self`.
    pub fn main_object(&self) -> Value {
        self.main_obj
    }

    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    /// Build an error raised from `env`, carrying its backtrace.
    pub fn error(&self, env: &EnvRef, kind: DiagnosticKind) -> RuntimeError {
        RuntimeError::with_backtrace(kind, env.backtrace())
    }

    // ------------------------------------------------------------------
    // Singletons
    // ------------------------------------------------------------------

    #[inline]
    pub fn nil(&self) -> Value {
        self.globals.nil_obj()
    }

    #[inline]
    pub fn true_value(&self) -> Value {
        self.globals.true_obj()
    }

    #[inline]
    pub fn false_value(&self) -> Value {
        self.globals.false_obj()
    }

    #[inline]
    pub fn bool_value(&self, b: bool) -> Value {
        if b { self.globals.true_obj() } else { self.globals.false_obj() }
    }

    #[inline]
    pub fn is_nil(&self, v: Value) -> bool {
        v == self.globals.nil_obj()
    }

    /// Only `nil` and `false` are falsy.
    #[inline]
    pub fn truthy(&self, v: Value) -> bool {
        v != self.globals.nil_obj() && v != self.globals.false_obj()
    }

    pub fn object_class(&self) -> Value {
        Value::from_id(self.globals.object_class())
    }

    pub fn error_class(&self, class: ErrorClass) -> Value {
        self.core.errors.get(&class).copied().unwrap_or(self.core.exception)
    }

    // ------------------------------------------------------------------
    // Allocation
    // ------------------------------------------------------------------

    pub(crate) fn alloc_object(&mut self, class: Value, payload: Payload) -> Value {
        Value::from_id(self.heap.alloc(HeapObject::new(class.id(), payload)))
    }

    /// New instance of `class`, shaped by the class's instance variant.
    pub fn allocate(&mut self, env: &EnvRef, class: Value) -> EvalResult {
        let Some(data) = self.class_data(class) else {
            let actual = self.class_name_of(class).to_string();
            return Err(self.error(
                env,
                DiagnosticKind::WrongArgumentType {
                    actual,
                    expected: "Class".into(),
                },
            ));
        };
        let payload = match data.instance_type {
            ValueType::Other => Payload::Other,
            ValueType::Array => Payload::Array(Vec::new()),
            ValueType::String => Payload::String(String::new()),
            ValueType::Hash => Payload::Hash(Box::default()),
            ValueType::Exception => Payload::Exception(Box::default()),
            _ => {
                let msg = format!("allocator undefined for {}", data.name);
                return Err(self.error(env, DiagnosticKind::Raw(ErrorClass::TypeError, msg)));
            }
        };
        Ok(self.alloc_object(class, payload))
    }

    pub fn make_integer(&mut self, i: i64) -> Value {
        self.alloc_object(self.core.integer, Payload::Integer(i))
    }

    pub fn make_float(&mut self, f: f64) -> Value {
        self.alloc_object(self.core.float, Payload::Float(f))
    }

    pub fn make_string(&mut self, s: &str) -> Value {
        self.alloc_object(self.core.string, Payload::String(s.to_string()))
    }

    pub fn make_array(&mut self, items: Vec<Value>) -> Value {
        self.alloc_object(self.core.array, Payload::Array(items))
    }

    pub fn make_hash(&mut self) -> Value {
        self.alloc_object(self.core.hash, Payload::Hash(Box::default()))
    }

    pub fn make_proc(&mut self, block: BlockRef) -> Value {
        self.alloc_object(self.core.proc_class, Payload::Proc(block))
    }

    pub fn make_void_ptr(&mut self, ptr: usize) -> Value {
        self.alloc_object(self.core.void_p, Payload::VoidPointer(ptr))
    }

    pub fn make_io(&mut self, fd: i32) -> Value {
        self.alloc_object(self.core.io, Payload::Io(fd))
    }

    pub fn make_exception(&mut self, class: Value, message: &str, backtrace: Vec<String>) -> Value {
        let data = ExceptionData {
            message: message.to_string(),
            backtrace,
        };
        self.alloc_object(class, Payload::Exception(Box::new(data)))
    }

    /// Exception object for a raised error, for a rescue mechanism to bind.
    pub fn exception_value(&mut self, err: &RuntimeError) -> Value {
        let class = self.error_class(err.class);
        self.make_exception(class, &err.message, err.backtrace.clone())
    }

    /// Unique Symbol for `name`.
    pub fn intern(&mut self, name: &str) -> Value {
        if let Some(sym) = self.globals.get_symbol(name) {
            return sym;
        }
        let sym = self.alloc_object(self.core.symbol, Payload::Symbol(name.to_string()));
        self.globals.add_symbol(name, sym);
        sym
    }

    // ------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------

    #[inline]
    pub fn class_of(&self, v: Value) -> Value {
        Value::from_id(self.heap.get(v.id()).class)
    }

    pub fn is_class(&self, v: Value) -> bool {
        matches!(self.heap.get(v.id()).payload, Payload::Class(_))
    }

    pub fn class_data(&self, class: Value) -> Option<&ClassData> {
        match &self.heap.get(class.id()).payload {
            Payload::Class(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn class_data_mut(&mut self, class: Value) -> Option<&mut ClassData> {
        match &mut self.heap.get_mut(class.id()).payload {
            Payload::Class(data) => Some(data),
            _ => None,
        }
    }

    pub fn class_name(&self, class: Value) -> &str {
        self.class_data(class).map_or("", |c| c.name.as_str())
    }

    pub fn class_name_of(&self, v: Value) -> &str {
        self.class_name(self.class_of(v))
    }

    /// Declared superclass. The root metaclass answers itself.
    pub fn superclass(&self, class: Value) -> Option<Value> {
        self.class_data(class)
            .and_then(|c| c.superclass)
            .map(Value::from_id)
    }

    pub fn ancestors(&self, class: Value) -> Ancestors<'_> {
        Ancestors {
            heap: &self.heap,
            next: self.is_class(class).then_some(class.id()),
        }
    }

    pub fn is_a(&self, v: Value, class: Value) -> bool {
        self.ancestors(self.class_of(v)).any(|c| c == class)
    }

    /// Create a class under `superclass`, inheriting its instance variant, and bind it as
    /// a constant of `Object`.
    pub fn subclass(&mut self, env: &EnvRef, superclass: Value, name: &str) -> EvalResult {
        let Some(parent) = self.class_data(superclass) else {
            let actual = self.class_name_of(superclass).to_string();
            return Err(self.error(
                env,
                DiagnosticKind::WrongArgumentType {
                    actual,
                    expected: "Class".into(),
                },
            ));
        };
        let data = ClassData::new(name, Some(superclass.id()), parent.instance_type);
        let class = self.alloc_object(self.core.class, Payload::Class(Box::new(data)));
        self.const_set(self.core.object, name, class);
        Ok(class)
    }

    /// Install an instance method. Ignored when `class` is not a class.
    pub fn define_method(&mut self, class: Value, name: &str, method: Method) {
        if let Some(data) = self.class_data_mut(class) {
            data.methods.insert(name.to_string(), method);
        }
    }

    pub fn define_native(&mut self, class: Value, name: &str, f: NativeFn) {
        self.define_method(class, name, Method::Native(f));
    }

    /// Install a class-level method, visible on `class` and its subclasses.
    pub fn define_singleton_method(&mut self, class: Value, name: &str, method: Method) {
        if let Some(data) = self.class_data_mut(class) {
            data.singleton_methods.insert(name.to_string(), method);
        }
    }

    pub fn define_singleton_native(&mut self, class: Value, name: &str, f: NativeFn) {
        self.define_singleton_method(class, name, Method::Native(f));
    }

    // ------------------------------------------------------------------
    // Constants, instance variables, freezing
    // ------------------------------------------------------------------

    /// Look a constant up from `scope` (a class, or any object's class), then in `Object`.
    pub fn const_get(&self, scope: Value, name: &str) -> Option<Value> {
        let start = if self.is_class(scope) {
            scope
        } else {
            self.class_of(scope)
        };
        self.ancestors(start)
            .chain(std::iter::once(self.core.object))
            .find_map(|class| self.class_data(class)?.constants.get(name).copied())
    }

    pub fn const_set(&mut self, class: Value, name: &str, value: Value) {
        if let Some(data) = self.class_data_mut(class) {
            data.constants.insert(name.to_string(), value);
        }
    }

    /// Unset instance variables read as nil.
    pub fn ivar_get(&self, obj: Value, name: &str) -> Value {
        self.heap.get(obj.id()).ivar(name).unwrap_or(self.globals.nil_obj())
    }

    pub fn ivar_set(&mut self, env: &EnvRef, obj: Value, name: &str, value: Value) -> EvalResult<()> {
        self.check_frozen(env, obj)?;
        self.heap.get_mut(obj.id()).set_ivar(name, value);
        Ok(())
    }

    pub fn freeze(&mut self, v: Value) {
        self.heap.get_mut(v.id()).frozen = true;
    }

    pub fn is_frozen(&self, v: Value) -> bool {
        self.heap.get(v.id()).frozen
    }

    pub fn check_frozen(&self, env: &EnvRef, v: Value) -> EvalResult<()> {
        if self.is_frozen(v) {
            let class_name = self.class_name_of(v).to_string();
            return Err(self.error(env, DiagnosticKind::Frozen(class_name)));
        }
        Ok(())
    }

    /// Global variable; unset globals read as nil.
    pub fn global_get(&self, name: &str) -> Value {
        self.globals.global_get(name).unwrap_or(self.globals.nil_obj())
    }

    pub fn global_set(&mut self, name: &str, value: Value) {
        self.globals.global_set(name, value);
    }

    // ------------------------------------------------------------------
    // Payload access
    // ------------------------------------------------------------------

    #[inline]
    pub fn value_type(&self, v: Value) -> ValueType {
        self.heap.get(v.id()).value_type()
    }

    pub fn as_integer(&self, v: Value) -> Option<i64> {
        match self.heap.get(v.id()).payload {
            Payload::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self, v: Value) -> Option<f64> {
        match self.heap.get(v.id()).payload {
            Payload::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_str(&self, v: Value) -> Option<&str> {
        match &self.heap.get(v.id()).payload {
            Payload::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn symbol_name(&self, v: Value) -> Option<&str> {
        match &self.heap.get(v.id()).payload {
            Payload::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_array(&self, v: Value) -> bool {
        matches!(self.heap.get(v.id()).payload, Payload::Array(_))
    }

    pub fn array(&self, v: Value) -> Option<&[Value]> {
        match &self.heap.get(v.id()).payload {
            Payload::Array(items) => Some(items),
            _ => None,
        }
    }

    pub(crate) fn array_mut(&mut self, v: Value) -> Option<&mut Vec<Value>> {
        match &mut self.heap.get_mut(v.id()).payload {
            Payload::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn array_len(&self, v: Value) -> Option<usize> {
        self.array(v).map(<[Value]>::len)
    }

    pub fn array_get(&self, v: Value, index: usize) -> Option<Value> {
        self.array(v).and_then(|items| items.get(index).copied())
    }

    pub fn array_push(&mut self, env: &EnvRef, v: Value, item: Value) -> EvalResult<()> {
        self.check_frozen(env, v)?;
        if let Some(items) = self.array_mut(v) {
            items.push(item);
        }
        Ok(())
    }

    pub fn is_hash(&self, v: Value) -> bool {
        matches!(self.heap.get(v.id()).payload, Payload::Hash(_))
    }

    pub fn hash_table(&self, v: Value) -> Option<&HashTable> {
        match &self.heap.get(v.id()).payload {
            Payload::Hash(table) => Some(table),
            _ => None,
        }
    }

    pub(crate) fn hash_table_mut(&mut self, v: Value) -> Option<&mut HashTable> {
        match &mut self.heap.get_mut(v.id()).payload {
            Payload::Hash(table) => Some(table),
            _ => None,
        }
    }

    pub fn proc_block(&self, v: Value) -> Option<BlockRef> {
        match &self.heap.get(v.id()).payload {
            Payload::Proc(block) => Some(block.clone()),
            _ => None,
        }
    }

    pub fn void_ptr(&self, v: Value) -> Option<usize> {
        match self.heap.get(v.id()).payload {
            Payload::VoidPointer(p) => Some(p),
            _ => None,
        }
    }

    pub fn exception_data(&self, v: Value) -> Option<&ExceptionData> {
        match &self.heap.get(v.id()).payload {
            Payload::Exception(data) => Some(data),
            _ => None,
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
