//! Managed heap.
//!
//! Objects are allocated into an arena and addressed by `ObjectId`. The heap only
//! allocates; reclamation belongs to the collector service and is not modelled here, so
//! every id stays valid until the heap itself is dropped.

use super::value::{FastHashMap, Payload, Value, ValueType, fast_map_new};

pub use garnet_core::ObjectId;

pub struct HeapObject {
    /// Class that defines this object's behavior. The root metaclass points at itself.
    pub class: ObjectId,
    pub payload: Payload,
    pub ivars: Option<Box<FastHashMap<String, Value>>>,
    pub frozen: bool,
}

impl HeapObject {
    pub fn new(class: ObjectId, payload: Payload) -> Self {
        Self {
            class,
            payload,
            ivars: None,
            frozen: false,
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.payload.value_type()
    }

    pub fn ivar(&self, name: &str) -> Option<Value> {
        self.ivars.as_ref().and_then(|m| m.get(name).copied())
    }

    pub fn set_ivar(&mut self, name: &str, value: Value) {
        self.ivars
            .get_or_insert_with(|| Box::new(fast_map_new()))
            .insert(name.to_string(), value);
    }
}

pub struct Heap {
    objects: Vec<HeapObject>,
}

impl Heap {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            objects: Vec::with_capacity(cap),
        }
    }

    /// Allocate a managed object on the heap.
    pub fn alloc(&mut self, obj: HeapObject) -> ObjectId {
        let id = self.objects.len();
        self.objects.push(obj);
        ObjectId(id)
    }

    /// Id the next allocation will receive. Used to build the self-referential root class.
    pub(crate) fn next_id(&self) -> ObjectId {
        ObjectId(self.objects.len())
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> &HeapObject {
        &self.objects[id.0]
    }

    #[inline]
    pub fn get_mut(&mut self, id: ObjectId) -> &mut HeapObject {
        &mut self.objects[id.0]
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Count live objects per storage shape.
    pub fn memory_stats(&self) -> Vec<(ValueType, usize)> {
        let mut counts: FastHashMap<ValueType, usize> = fast_map_new();
        for obj in &self.objects {
            *counts.entry(obj.value_type()).or_insert(0) += 1;
        }
        let mut out: Vec<_> = counts.into_iter().collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.name().cmp(b.0.name())));
        out
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}
