//! Insertion-ordered hash table.
//!
//! Entries live in an arena and double as nodes of a circular doubly linked list that
//! records insertion order. The index maps a key's hash code to its entry slot; the hash
//! code is the only thing compared, so two distinct keys with the same hash code share a
//! slot.
//!
//! Computing hash codes is a dispatched call and therefore the runtime's job; every
//! operation here takes the precomputed code.

use garnet_core::DiagnosticKind;

use super::block::BlockRef;
use super::value::{FastHashMap, Value, fast_map_new};

#[derive(Clone, Debug)]
pub struct HashEntry {
    pub key: Value,
    pub value: Value,
    /// Hash code computed once at insertion.
    pub hash: i64,
    prev: usize,
    next: usize,
    /// Insertion sequence number; increases along the list from the head.
    seq: u64,
    /// Unlinked from the list. The slot is kept for traversals still positioned on it.
    pub removed: bool,
}

pub struct HashTable {
    entries: Vec<HashEntry>,
    free: Vec<usize>,
    index: FastHashMap<i64, usize>,
    head: Option<usize>,
    next_seq: u64,
    iterating: u32,
    pub default_value: Option<Value>,
    pub default_block: Option<BlockRef>,
}

impl HashTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            index: fast_map_new(),
            head: None,
            next_seq: 0,
            iterating: 0,
            default_value: None,
            default_block: None,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn is_iterating(&self) -> bool {
        self.iterating > 0
    }

    pub fn begin_iteration(&mut self) {
        self.iterating += 1;
    }

    pub fn end_iteration(&mut self) {
        self.iterating = self.iterating.saturating_sub(1);
    }

    pub fn find(&self, hash: i64) -> Option<usize> {
        self.index.get(&hash).copied()
    }

    pub fn get(&self, hash: i64) -> Option<Value> {
        self.find(hash).map(|slot| self.entries[slot].value)
    }

    /// Store `value` under `hash`. An existing entry keeps its position in the order.
    /// Adding a new entry while a traversal is running is rejected before anything changes.
    pub fn insert(&mut self, hash: i64, key: Value, value: Value) -> Result<(), DiagnosticKind> {
        if let Some(slot) = self.find(hash) {
            self.entries[slot].value = value;
            return Ok(());
        }
        if self.is_iterating() {
            return Err(DiagnosticKind::HashInsertDuringIteration);
        }
        let slot = self.append(hash, key, value);
        self.index.insert(hash, slot);
        Ok(())
    }

    fn append(&mut self, hash: i64, key: Value, value: Value) -> usize {
        let seq = self.next_seq;
        self.next_seq += 1;
        let mut entry = HashEntry {
            key,
            value,
            hash,
            prev: 0,
            next: 0,
            seq,
            removed: false,
        };
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.entries.push(entry.clone());
                self.entries.len() - 1
            }
        };
        match self.head {
            Some(first) => {
                // <first> ... <last> <new> -|
                // ^__________________________|
                let last = self.entries[first].prev;
                entry.prev = last;
                entry.next = first;
                self.entries[slot] = entry;
                self.entries[first].prev = slot;
                self.entries[last].next = slot;
            }
            None => {
                entry.prev = slot;
                entry.next = slot;
                self.entries[slot] = entry;
                self.head = Some(slot);
            }
        }
        slot
    }

    /// Remove the entry stored under `hash`. Allowed during traversal.
    pub fn remove(&mut self, hash: i64) -> Option<Value> {
        let slot = self.index.remove(&hash)?;
        self.unlink(slot);
        self.free.push(slot);
        Some(self.entries[slot].value)
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let e = &self.entries[slot];
            (e.prev, e.next)
        };
        self.entries[slot].removed = true;
        if next == slot {
            self.head = None;
            return;
        }
        if self.head == Some(slot) {
            self.head = Some(next);
        }
        // The removed node keeps its own links so a cursor resting on it can move on.
        self.entries[prev].next = next;
        self.entries[next].prev = prev;
    }

    pub fn first(&self) -> Option<usize> {
        self.head
    }

    /// Slot after `slot` in insertion order, or `None` once the list wraps around.
    pub fn successor(&self, slot: usize) -> Option<usize> {
        let mut current = slot;
        loop {
            let entry = &self.entries[current];
            let next = entry.next;
            if next == current || self.entries[next].seq <= entry.seq {
                return None;
            }
            if !self.entries[next].removed {
                return Some(next);
            }
            current = next;
        }
    }

    pub fn entry(&self, slot: usize) -> &HashEntry {
        &self.entries[slot]
    }

    /// Live `(key, value)` pairs in insertion order.
    pub fn pairs(&self) -> Vec<(Value, Value)> {
        let mut out = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let e = &self.entries[slot];
            out.push((e.key, e.value));
            cursor = self.successor(slot);
        }
        out
    }

    pub fn keys(&self) -> Vec<Value> {
        self.pairs().into_iter().map(|(k, _)| k).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.pairs().into_iter().map(|(_, v)| v).collect()
    }
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::heap::ObjectId;

    fn v(n: usize) -> Value {
        Value::from_id(ObjectId(n))
    }

    fn keys_of(t: &HashTable) -> Vec<usize> {
        t.keys().into_iter().map(|k| k.id().0).collect()
    }

    #[test]
    fn reinsert_keeps_position() {
        let mut t = HashTable::new();
        t.insert(1, v(1), v(10)).unwrap();
        t.insert(2, v(2), v(20)).unwrap();
        t.insert(1, v(1), v(11)).unwrap();
        assert_eq!(keys_of(&t), vec![1, 2]);
        assert_eq!(t.get(1), Some(v(11)));
    }

    #[test]
    fn freed_slot_is_reused_at_the_tail() {
        let mut t = HashTable::new();
        for i in 1..=3 {
            t.insert(i as i64, v(i), v(i)).unwrap();
        }
        assert_eq!(t.remove(1), Some(v(1)));
        t.insert(4, v(4), v(4)).unwrap();
        assert_eq!(keys_of(&t), vec![2, 3, 4]);
        assert_eq!(t.entries.len(), 3);
    }

    #[test]
    fn insert_during_iteration_leaves_table_untouched() {
        let mut t = HashTable::new();
        t.insert(1, v(1), v(1)).unwrap();
        t.begin_iteration();
        assert_eq!(
            t.insert(2, v(2), v(2)),
            Err(DiagnosticKind::HashInsertDuringIteration)
        );
        assert!(t.insert(1, v(1), v(5)).is_ok());
        t.end_iteration();
        assert_eq!(t.len(), 1);
        assert_eq!(keys_of(&t), vec![1]);
    }

    #[test]
    fn cursor_on_removed_head_still_advances() {
        let mut t = HashTable::new();
        for i in 1..=3 {
            t.insert(i as i64, v(i), v(i)).unwrap();
        }
        let head = t.first().unwrap();
        t.remove(1);
        let next = t.successor(head).unwrap();
        assert_eq!(t.entry(next).key, v(2));
        t.remove(3);
        assert_eq!(t.successor(next), None);
    }

    #[test]
    fn removing_last_entry_empties_list() {
        let mut t = HashTable::new();
        t.insert(7, v(7), v(7)).unwrap();
        let slot = t.first().unwrap();
        t.remove(7);
        assert!(t.first().is_none());
        assert_eq!(t.successor(slot), None);
        assert!(t.is_empty());
    }
}
