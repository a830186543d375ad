//! Core class graph created before any user code runs.

use garnet_core::ErrorClass;

use crate::core::{ClassData, FastHashMap, Heap, HeapObject, Payload, Value, ValueType, fast_map_new};

use super::global_env::GlobalEnv;

/// Handles to the classes the runtime itself needs to name.
#[derive(Debug, Clone)]
pub struct CoreObjects {
    /// Root metaclass. Its class and its superclass are itself.
    pub class: Value,
    pub object: Value,
    pub nil_class: Value,
    pub true_class: Value,
    pub false_class: Value,
    pub integer: Value,
    pub float: Value,
    pub string: Value,
    pub symbol: Value,
    pub array: Value,
    pub hash: Value,
    pub proc_class: Value,
    pub io: Value,
    pub void_p: Value,
    pub exception: Value,
    pub errors: FastHashMap<ErrorClass, Value>,
}

struct Builder<'a> {
    heap: &'a mut Heap,
    metaclass: Value,
    created: Vec<(String, Value)>,
}

impl Builder<'_> {
    fn class(&mut self, name: &str, superclass: Option<Value>, instance_type: ValueType) -> Value {
        let data = ClassData::new(name, superclass.map(Value::id), instance_type);
        let id = self
            .heap
            .alloc(HeapObject::new(self.metaclass.id(), Payload::Class(Box::new(data))));
        let class = Value::from_id(id);
        self.created.push((name.to_string(), class));
        class
    }

    fn instance(&mut self, class: Value, payload: Payload) -> Value {
        Value::from_id(self.heap.alloc(HeapObject::new(class.id(), payload)))
    }
}

/// Build the class graph into `heap`. The singletons are handed to the returned `GlobalEnv`.
pub(crate) fn create_core_objects(heap: &mut Heap) -> (CoreObjects, GlobalEnv) {
    // The metaclass is its own class and its own superclass.
    let class_id = heap.next_id();
    heap.alloc(HeapObject::new(
        class_id,
        Payload::Class(Box::new(ClassData::new("Class", Some(class_id), ValueType::Class))),
    ));
    let metaclass = Value::from_id(class_id);

    let mut b = Builder {
        heap: &mut *heap,
        metaclass,
        created: vec![("Class".to_string(), metaclass)],
    };

    let object = b.class("Object", None, ValueType::Other);
    let nil_class = b.class("NilClass", Some(object), ValueType::Nil);
    let true_class = b.class("TrueClass", Some(object), ValueType::True);
    let false_class = b.class("FalseClass", Some(object), ValueType::False);
    let integer = b.class("Integer", Some(object), ValueType::Integer);
    let float = b.class("Float", Some(object), ValueType::Float);
    let string = b.class("String", Some(object), ValueType::String);
    let symbol = b.class("Symbol", Some(object), ValueType::Symbol);
    let array = b.class("Array", Some(object), ValueType::Array);
    let hash = b.class("Hash", Some(object), ValueType::Hash);
    let proc_class = b.class("Proc", Some(object), ValueType::Proc);
    let io = b.class("IO", Some(object), ValueType::Io);
    let void_p = b.class("VoidP", Some(object), ValueType::VoidPointer);
    let exception = b.class("Exception", Some(object), ValueType::Exception);

    // ErrorClass::ALL lists every superclass before its subclasses.
    let mut errors: FastHashMap<ErrorClass, Value> = fast_map_new();
    for class in ErrorClass::ALL {
        let superclass = match class.superclass_name() {
            "Exception" => exception,
            name => errors
                .iter()
                .find(|(c, _)| c.name() == name)
                .map_or(exception, |(_, v)| *v),
        };
        let value = b.class(class.name(), Some(superclass), ValueType::Exception);
        errors.insert(class, value);
    }

    let nil = b.instance(nil_class, Payload::Nil);
    let true_value = b.instance(true_class, Payload::True);
    let false_value = b.instance(false_class, Payload::False);

    let created = std::mem::take(&mut b.created);
    if let Payload::Class(data) = &mut heap.get_mut(object.id()).payload {
        for (name, class) in &created {
            data.constants.insert(name.clone(), *class);
        }
    }

    let globals = GlobalEnv::new(object.id(), nil, true_value, false_value);

    tracing::debug!(classes = created.len(), "core classes created");

    let core = CoreObjects {
        class: metaclass,
        object,
        nil_class,
        true_class,
        false_class,
        integer,
        float,
        string,
        symbol,
        array,
        hash,
        proc_class,
        io,
        void_p,
        exception,
        errors,
    };
    (core, globals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classes_hang_off_their_parents() {
        let mut heap = Heap::new();
        let (core, globals) = create_core_objects(&mut heap);
        let superclass_of = |v: Value| match &heap.get(v.id()).payload {
            Payload::Class(c) => c.superclass.map(Value::from_id),
            _ => None,
        };
        let no_method = core.errors[&ErrorClass::NoMethodError];
        assert_eq!(superclass_of(no_method), Some(core.errors[&ErrorClass::NameError]));
        assert_eq!(
            superclass_of(core.errors[&ErrorClass::StandardError]),
            Some(core.exception)
        );
        assert_eq!(superclass_of(core.class), Some(core.class));
        assert_eq!(heap.get(globals.nil_obj().id()).class, core.nil_class.id());
        assert_eq!(globals.object_class(), core.object.id());
    }
}
