//! Object Storage
//!
//! `SlotStorage<T>` is a sparse array that maps object slot indices to
//! data. For a few hundred objects the flat layout is simpler than
//! anything cleverer, and iteration order is slot order, which keeps the
//! frame update deterministic.

use super::entity::ObjectId;

/// Sparse storage indexed by `ObjectId::index()`.
pub struct SlotStorage<T> {
    data: Vec<Option<T>>,
}

impl<T> SlotStorage<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    fn ensure_capacity(&mut self, index: usize) {
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
    }

    /// Insert a value, replacing any existing one in the slot.
    pub fn insert(&mut self, id: ObjectId, value: T) {
        let idx = id.index() as usize;
        self.ensure_capacity(idx);
        self.data[idx] = Some(value);
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<T> {
        self.data.get_mut(id.index() as usize).and_then(|slot| slot.take())
    }

    pub fn get(&self, id: ObjectId) -> Option<&T> {
        self.data.get(id.index() as usize).and_then(|opt| opt.as_ref())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> {
        self.data.get_mut(id.index() as usize).and_then(|opt| opt.as_mut())
    }

    /// Iterate over all (slot index, value) pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(idx, opt)| opt.as_ref().map(|v| (idx as u32, v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .filter_map(|(idx, opt)| opt.as_mut().map(|v| (idx as u32, v)))
    }

    /// Take every value out, leaving the storage empty.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.data.drain(..).flatten()
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|opt| opt.is_some()).count()
    }
}

impl<T> Default for SlotStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}
