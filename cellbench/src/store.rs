//! Storage layouts for operand and result collections.
//!
//! A [`Store`] is one container kind holding one cell shape, indexed by a
//! [`LogicalKey`]. The runner only talks to this trait, so every layout goes
//! through the same generation and compute loops.
//!
//! # Implementations
//!
//! | Store                              | Container | Ownership |
//! |------------------------------------|-----------|-----------|
//! | `Vec<Cell<PAD>>`                   | sequence  | inline    |
//! | `Vec<Box<Cell<PAD>>>`              | sequence  | boxed     |
//! | `HashMap<K, Cell<PAD>>`            | map       | inline    |
//! | `HashMap<K, Box<Cell<PAD>>>`       | map       | boxed     |
//! | `Arena<Vec<usize>, C>`             | sequence  | arena     |
//! | `Arena<HashMap<K, usize>, C>`      | map       | arena     |
//!
//! Boxed stores allocate a fresh record on every [`Store::put`], and each box
//! is owned by exactly one slot. Arena stores keep their records in one
//! [`slab::Slab`] and hold slab keys instead of pointers.

use std::collections::HashMap;
use std::mem;

use slab::Slab;

use crate::cell::{Cell, Record};
use crate::key::LogicalKey;

// =============================================================================
// Layout descriptors
// =============================================================================

/// How a collection is allocated before it is filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sizing {
    /// Reserve room for every element up front.
    Presized,
    /// Start empty and grow while filling. Growth lands inside the timed phase.
    Growable,
}

/// Container kind of a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    Sequence,
    Map,
}

/// How a slot refers to its record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Record stored in the slot.
    Inline,
    /// Slot owns a heap allocation holding the record.
    Boxed,
    /// Slot holds a key into a backing slab.
    Arena,
}

// =============================================================================
// Store trait
// =============================================================================

/// A collection of records addressed by `K`.
///
/// Keys arrive in logical-index order. Sequence stores rely on that: putting
/// key `entries()` appends, putting an existing key overwrites, anything past
/// the end panics.
pub trait Store<K: LogicalKey>: Sized {
    const CONTAINER: Container;
    const OWNERSHIP: Ownership;

    /// Size of the record shape held by this store.
    const RECORD_BYTES: usize;

    /// Estimated bytes per element: stored key + indirection + record.
    const ELEMENT_BYTES: usize;

    /// Creates an empty store meant to hold `capacity` elements.
    fn allocate(capacity: usize, sizing: Sizing) -> Self;

    /// Writes a freshly constructed record holding `value` under `key`.
    fn put(&mut self, key: K, value: f64);

    /// Payload under `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` was never put.
    fn load(&self, key: K) -> f64;

    fn lookup(&self, key: K) -> Option<f64>;

    /// Payload of the existing record under `key`, for in-place updates.
    fn lookup_mut(&mut self, key: K) -> Option<&mut f64>;

    fn entries(&self) -> usize;

    /// Rust type of the layout, for reports.
    fn describe() -> String;
}

const POINTER_BYTES: usize = mem::size_of::<usize>();

#[inline]
fn reserve_for(capacity: usize, sizing: Sizing) -> usize {
    match sizing {
        Sizing::Presized => capacity,
        Sizing::Growable => 0,
    }
}

// =============================================================================
// Sequences
// =============================================================================

impl<const PAD: usize> Store<usize> for Vec<Cell<PAD>> {
    const CONTAINER: Container = Container::Sequence;
    const OWNERSHIP: Ownership = Ownership::Inline;
    const RECORD_BYTES: usize = <Cell<PAD> as Record>::SIZE;
    const ELEMENT_BYTES: usize = <Cell<PAD> as Record>::SIZE;

    fn allocate(capacity: usize, sizing: Sizing) -> Self {
        Vec::with_capacity(reserve_for(capacity, sizing))
    }

    #[inline]
    fn put(&mut self, key: usize, value: f64) {
        let cell = Cell::new(value);
        if key == self.len() {
            self.push(cell);
        } else {
            self[key] = cell;
        }
    }

    #[inline]
    fn load(&self, key: usize) -> f64 {
        self[key].value()
    }

    fn lookup(&self, key: usize) -> Option<f64> {
        self.as_slice().get(key).map(|cell| cell.value())
    }

    #[inline]
    fn lookup_mut(&mut self, key: usize) -> Option<&mut f64> {
        self.as_mut_slice().get_mut(key).map(|cell| cell.value_mut())
    }

    fn entries(&self) -> usize {
        self.len()
    }

    fn describe() -> String {
        format!("Vec<{}>", <Cell<PAD> as Record>::LABEL)
    }
}

impl<const PAD: usize> Store<usize> for Vec<Box<Cell<PAD>>> {
    const CONTAINER: Container = Container::Sequence;
    const OWNERSHIP: Ownership = Ownership::Boxed;
    const RECORD_BYTES: usize = <Cell<PAD> as Record>::SIZE;
    const ELEMENT_BYTES: usize = mem::size_of::<Box<Cell<PAD>>>() + <Cell<PAD> as Record>::SIZE;

    fn allocate(capacity: usize, sizing: Sizing) -> Self {
        Vec::with_capacity(reserve_for(capacity, sizing))
    }

    #[inline]
    fn put(&mut self, key: usize, value: f64) {
        let cell = Box::new(Cell::new(value));
        if key == self.len() {
            self.push(cell);
        } else {
            self[key] = cell;
        }
    }

    #[inline]
    fn load(&self, key: usize) -> f64 {
        self[key].value()
    }

    fn lookup(&self, key: usize) -> Option<f64> {
        self.as_slice().get(key).map(|cell| cell.value())
    }

    #[inline]
    fn lookup_mut(&mut self, key: usize) -> Option<&mut f64> {
        self.as_mut_slice().get_mut(key).map(|cell| cell.value_mut())
    }

    fn entries(&self) -> usize {
        self.len()
    }

    fn describe() -> String {
        format!("Vec<Box<{}>>", <Cell<PAD> as Record>::LABEL)
    }
}

// =============================================================================
// Maps
// =============================================================================

impl<K: LogicalKey, const PAD: usize> Store<K> for HashMap<K, Cell<PAD>> {
    const CONTAINER: Container = Container::Map;
    const OWNERSHIP: Ownership = Ownership::Inline;
    const RECORD_BYTES: usize = <Cell<PAD> as Record>::SIZE;
    const ELEMENT_BYTES: usize = mem::size_of::<K>() + <Cell<PAD> as Record>::SIZE;

    fn allocate(capacity: usize, sizing: Sizing) -> Self {
        HashMap::with_capacity(reserve_for(capacity, sizing))
    }

    #[inline]
    fn put(&mut self, key: K, value: f64) {
        self.insert(key, Cell::new(value));
    }

    #[inline]
    fn load(&self, key: K) -> f64 {
        self[&key].value()
    }

    fn lookup(&self, key: K) -> Option<f64> {
        self.get(&key).map(|cell| cell.value())
    }

    #[inline]
    fn lookup_mut(&mut self, key: K) -> Option<&mut f64> {
        self.get_mut(&key).map(|cell| cell.value_mut())
    }

    fn entries(&self) -> usize {
        self.len()
    }

    fn describe() -> String {
        format!("HashMap<{}, {}>", K::LABEL, <Cell<PAD> as Record>::LABEL)
    }
}

impl<K: LogicalKey, const PAD: usize> Store<K> for HashMap<K, Box<Cell<PAD>>> {
    const CONTAINER: Container = Container::Map;
    const OWNERSHIP: Ownership = Ownership::Boxed;
    const RECORD_BYTES: usize = <Cell<PAD> as Record>::SIZE;
    const ELEMENT_BYTES: usize =
        mem::size_of::<K>() + mem::size_of::<Box<Cell<PAD>>>() + <Cell<PAD> as Record>::SIZE;

    fn allocate(capacity: usize, sizing: Sizing) -> Self {
        HashMap::with_capacity(reserve_for(capacity, sizing))
    }

    #[inline]
    fn put(&mut self, key: K, value: f64) {
        self.insert(key, Box::new(Cell::new(value)));
    }

    #[inline]
    fn load(&self, key: K) -> f64 {
        self[&key].value()
    }

    fn lookup(&self, key: K) -> Option<f64> {
        self.get(&key).map(|cell| cell.value())
    }

    #[inline]
    fn lookup_mut(&mut self, key: K) -> Option<&mut f64> {
        self.get_mut(&key).map(|cell| cell.value_mut())
    }

    fn entries(&self) -> usize {
        self.len()
    }

    fn describe() -> String {
        format!("HashMap<{}, Box<{}>>", K::LABEL, <Cell<PAD> as Record>::LABEL)
    }
}

// =============================================================================
// Arena
// =============================================================================

/// Maps keys to slab keys for an [`Arena`].
pub trait SlotIndex<K: LogicalKey>: Sized {
    const CONTAINER: Container;

    /// Bytes per entry spent on the stored key and the slab key.
    const SLOT_BYTES: usize;

    fn allocate(capacity: usize, sizing: Sizing) -> Self;

    fn slot(&self, key: K) -> Option<usize>;

    fn bind(&mut self, key: K, slot: usize);

    fn bound(&self) -> usize;

    fn describe() -> String;
}

impl SlotIndex<usize> for Vec<usize> {
    const CONTAINER: Container = Container::Sequence;
    const SLOT_BYTES: usize = POINTER_BYTES;

    fn allocate(capacity: usize, sizing: Sizing) -> Self {
        Vec::with_capacity(reserve_for(capacity, sizing))
    }

    #[inline]
    fn slot(&self, key: usize) -> Option<usize> {
        self.as_slice().get(key).copied()
    }

    #[inline]
    fn bind(&mut self, key: usize, slot: usize) {
        if key == self.len() {
            self.push(slot);
        } else {
            self[key] = slot;
        }
    }

    fn bound(&self) -> usize {
        self.len()
    }

    fn describe() -> String {
        "Vec<usize>".to_string()
    }
}

impl<K: LogicalKey> SlotIndex<K> for HashMap<K, usize> {
    const CONTAINER: Container = Container::Map;
    const SLOT_BYTES: usize = mem::size_of::<K>() + POINTER_BYTES;

    fn allocate(capacity: usize, sizing: Sizing) -> Self {
        HashMap::with_capacity(reserve_for(capacity, sizing))
    }

    #[inline]
    fn slot(&self, key: K) -> Option<usize> {
        self.get(&key).copied()
    }

    #[inline]
    fn bind(&mut self, key: K, slot: usize) {
        self.insert(key, slot);
    }

    fn bound(&self) -> usize {
        self.len()
    }

    fn describe() -> String {
        format!("HashMap<{}, usize>", K::LABEL)
    }
}

/// Records in one slab, addressed through a [`SlotIndex`].
///
/// Each slab entry is referenced by exactly one index slot. Putting an
/// existing key overwrites its record instead of taking a new slab entry.
#[derive(Debug)]
pub struct Arena<M, C> {
    cells: Slab<C>,
    slots: M,
}

impl<M, C> Arena<M, C> {
    /// Slab entries in use.
    pub fn cells(&self) -> usize {
        self.cells.len()
    }

    /// Reserved slab entries.
    pub fn capacity(&self) -> usize {
        self.cells.capacity()
    }
}

impl<K, M, C> Store<K> for Arena<M, C>
where
    K: LogicalKey,
    M: SlotIndex<K>,
    C: Record,
{
    const CONTAINER: Container = M::CONTAINER;
    const OWNERSHIP: Ownership = Ownership::Arena;
    const RECORD_BYTES: usize = C::SIZE;
    const ELEMENT_BYTES: usize = M::SLOT_BYTES + C::SIZE;

    fn allocate(capacity: usize, sizing: Sizing) -> Self {
        Self {
            cells: Slab::with_capacity(reserve_for(capacity, sizing)),
            slots: M::allocate(capacity, sizing),
        }
    }

    #[inline]
    fn put(&mut self, key: K, value: f64) {
        let cell = C::new(value);
        match self.slots.slot(key) {
            Some(slot) => self.cells[slot] = cell,
            None => {
                let slot = self.cells.insert(cell);
                self.slots.bind(key, slot);
            }
        }
    }

    #[inline]
    fn load(&self, key: K) -> f64 {
        match self.slots.slot(key) {
            Some(slot) => self.cells[slot].value(),
            None => panic!("no record for {key:?}"),
        }
    }

    fn lookup(&self, key: K) -> Option<f64> {
        let slot = self.slots.slot(key)?;
        self.cells.get(slot).map(|cell| cell.value())
    }

    #[inline]
    fn lookup_mut(&mut self, key: K) -> Option<&mut f64> {
        let slot = self.slots.slot(key)?;
        self.cells.get_mut(slot).map(|cell| cell.value_mut())
    }

    fn entries(&self) -> usize {
        self.slots.bound()
    }

    fn describe() -> String {
        format!("Slab<{}> + {}", C::LABEL, M::describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Cell8, Cell32, Cell88};
    use crate::key::Key;

    fn fill<K: LogicalKey, S: Store<K>>(count: usize, sizing: Sizing) -> S {
        let mut store = S::allocate(count, sizing);
        for i in 0..K::populated(count) {
            store.put(K::from_index(i, count), i as f64);
        }
        store
    }

    #[test]
    fn vec_appends_then_overwrites() {
        let mut store = <Vec<Cell32> as Store<usize>>::allocate(4, Sizing::Presized);
        assert_eq!(store.entries(), 0);
        assert!(store.capacity() >= 4);

        store.put(0, 1.0);
        store.put(1, 2.0);
        store.put(0, 3.0);

        assert_eq!(store.entries(), 2);
        assert_eq!(store.load(0), 3.0);
        assert_eq!(store.lookup(1), Some(2.0));
        assert_eq!(store.lookup(2), None);
    }

    #[test]
    #[should_panic]
    fn vec_rejects_gap() {
        let mut store = <Vec<Cell8> as Store<usize>>::allocate(4, Sizing::Presized);
        store.put(2, 1.0);
    }

    #[test]
    fn growable_starts_unreserved() {
        let store = <Vec<Box<Cell88>> as Store<usize>>::allocate(1000, Sizing::Growable);
        assert_eq!(store.capacity(), 0);

        let store = <Vec<Box<Cell88>> as Store<usize>>::allocate(1000, Sizing::Presized);
        assert!(store.capacity() >= 1000);
    }

    #[test]
    fn boxed_vec_updates_in_place() {
        let mut store: Vec<Box<Cell88>> = fill::<usize, _>(8, Sizing::Presized);
        let before: *const Cell88 = &*store[3];

        if let Some(value) = store.lookup_mut(3) {
            *value = 42.0;
        }

        assert_eq!(store.load(3), 42.0);
        assert!(std::ptr::eq(before, &*store[3]));
    }

    #[test]
    fn maps_hold_every_key() {
        let count = 255 * 2 + 10;
        let store: HashMap<Key, Box<Cell32>> = fill::<Key, _>(count, Sizing::Presized);
        assert_eq!(store.entries(), 510);
        for i in 0..510 {
            assert_eq!(store.load(Key::from_index(i, count)), i as f64);
        }
        assert_eq!(store.lookup(Key::new(0, 2)), None);

        let store: HashMap<usize, Cell32> = fill::<usize, _>(100, Sizing::Growable);
        assert_eq!(store.entries(), 100);
        assert_eq!(store.lookup(99), Some(99.0));
    }

    #[test]
    fn arena_reuses_slot_on_overwrite() {
        let mut store: Arena<Vec<usize>, Cell88> = fill::<usize, _>(16, Sizing::Presized);
        assert_eq!(store.cells(), 16);
        assert!(store.capacity() >= 16);

        Store::<usize>::put(&mut store, 5, -1.0);
        assert_eq!(store.cells(), 16);
        assert_eq!(Store::<usize>::load(&store, 5), -1.0);
        assert_eq!(Store::<usize>::entries(&store), 16);
    }

    #[test]
    fn arena_map_uses_flat_index() {
        let count = 255 * 3;
        let store: Arena<HashMap<Key, usize>, Cell88> = fill::<Key, _>(count, Sizing::Presized);
        assert_eq!(store.cells(), count);
        for i in 0..count {
            assert_eq!(
                Store::<Key>::lookup(&store, Key::from_index(i, count)),
                Some(i as f64)
            );
        }
    }

    #[test]
    fn describe_names_the_layout() {
        assert_eq!(<Vec<Cell88> as Store<usize>>::describe(), "Vec<Cell88>");
        assert_eq!(
            <Vec<Box<Cell88>> as Store<usize>>::describe(),
            "Vec<Box<Cell88>>"
        );
        assert_eq!(
            <HashMap<Key, Box<Cell32>> as Store<Key>>::describe(),
            "HashMap<Key, Box<Cell32>>"
        );
        assert_eq!(
            <Arena<HashMap<Key, usize>, Cell88> as Store<Key>>::describe(),
            "Slab<Cell88> + HashMap<Key, usize>"
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn element_bytes() {
        assert_eq!(<Vec<Cell8> as Store<usize>>::ELEMENT_BYTES, 8);
        assert_eq!(<Vec<Box<Cell88>> as Store<usize>>::ELEMENT_BYTES, 96);
        assert_eq!(<HashMap<usize, Box<Cell32>> as Store<usize>>::ELEMENT_BYTES, 48);
        assert_eq!(<HashMap<Key, Cell88> as Store<Key>>::ELEMENT_BYTES, 104);
        assert_eq!(<HashMap<Key, Box<Cell88>> as Store<Key>>::ELEMENT_BYTES, 112);
        assert_eq!(<Arena<Vec<usize>, Cell88> as Store<usize>>::ELEMENT_BYTES, 96);
    }
}
