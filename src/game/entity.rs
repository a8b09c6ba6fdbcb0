//! Object Ids with Generational Indices
//!
//! Game objects are addressed by `ObjectId`, an index plus a generation:
//! - Each slot has a generation counter
//! - When an object is despawned, its slot can be reused
//! - The generation increments on reuse, invalidating old ids
//!
//! A stale id (for example a box that was already cleaned up) never
//! matches an object that later took over the slot.

/// A unique identifier for a game object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

impl ObjectId {
    /// Should only be called by `ObjectAllocator`.
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index (for storage access).
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Allocates and tracks object lifetimes.
#[derive(Debug, Default)]
pub struct ObjectAllocator {
    /// Generation counter for each slot
    generations: Vec<u32>,
    /// Free slots available for reuse (LIFO)
    free_indices: Vec<u32>,
    /// Whether each slot currently holds a live id
    alive: Vec<bool>,
    alive_count: u32,
}

impl ObjectAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> ObjectId {
        self.alive_count += 1;

        if let Some(index) = self.free_indices.pop() {
            // Generation was already bumped on free
            self.alive[index as usize] = true;
            ObjectId::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.alive.push(true);
            ObjectId::new(index, 0)
        }
    }

    /// Free an id, making its slot available for reuse.
    /// Returns true if the id was alive and is now freed.
    pub fn free(&mut self, id: ObjectId) -> bool {
        if !self.is_alive(id) {
            return false;
        }

        self.generations[id.index as usize] += 1;
        self.alive[id.index as usize] = false;
        self.free_indices.push(id.index);
        self.alive_count -= 1;
        true
    }

    pub fn is_alive(&self, id: ObjectId) -> bool {
        let idx = id.index as usize;
        idx < self.generations.len() && self.generations[idx] == id.generation
    }

    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }

    /// Id currently occupying a slot, if any.
    pub fn id_at(&self, index: u32) -> Option<ObjectId> {
        let generation = *self.generations.get(index as usize)?;
        let alive = *self.alive.get(index as usize)?;
        alive.then_some(ObjectId::new(index, generation))
    }
}
