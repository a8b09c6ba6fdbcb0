//! Game World
//!
//! The World owns everything that lives in a scene:
//! - Object allocation and lifetime tracking
//! - The objects themselves, in slot order
//! - The physics backend their bodies live in
//! - Deferred despawn (objects are never torn down mid-update)
//!
//! One frame is `classify_contacts` → `update` → `step` → `flush_despawns`,
//! which `Runtime::tick` drives.

use std::time::Duration;

use crate::config::ContactSettings;
use crate::input::InputSnapshot;
use crate::physics::PhysicsWorld;
use super::components::Frame;
use super::contact;
use super::entity::{ObjectAllocator, ObjectId};
use super::object::{GameObject, ObjectKind};
use super::storage::SlotStorage;

pub struct GameWorld<P: PhysicsWorld> {
    physics: P,
    objects: SlotStorage<GameObject>,
    ids: ObjectAllocator,
    /// Objects queued for despawn at end of frame
    despawn_queue: Vec<ObjectId>,
    pixels_per_meter: f32,
}

impl<P: PhysicsWorld> GameWorld<P> {
    pub fn new(physics: P, pixels_per_meter: f32) -> Self {
        Self {
            physics,
            objects: SlotStorage::new(),
            ids: ObjectAllocator::new(),
            despawn_queue: Vec::new(),
            pixels_per_meter,
        }
    }

    // =========================================================================
    // Object Management
    // =========================================================================

    /// Add an object and give it its bodies.
    pub fn spawn(&mut self, mut object: GameObject) -> ObjectId {
        object.attach(&mut self.physics, self.pixels_per_meter);
        let id = self.ids.allocate();
        tracing::debug!(?id, kind = ?object.state().kind, "spawned object");
        self.objects.insert(id, object);
        id
    }

    /// Queue an object for despawn at end of frame.
    pub fn despawn(&mut self, id: ObjectId) {
        if self.is_alive(id) && !self.despawn_queue.contains(&id) {
            self.despawn_queue.push(id);
        }
    }

    /// Remove an object and its bodies right away.
    /// Prefer `despawn()` while a frame is running.
    pub fn despawn_immediate(&mut self, id: ObjectId) -> Option<GameObject> {
        if !self.ids.free(id) {
            return None;
        }
        let mut object = self.objects.remove(id)?;
        object.release(&mut self.physics);
        tracing::debug!(?id, "despawned object");
        Some(object)
    }

    /// Process all queued despawns. Call at end of frame.
    pub fn flush_despawns(&mut self) {
        let queue = std::mem::take(&mut self.despawn_queue);
        for id in queue {
            self.despawn_immediate(id);
        }
    }

    /// Remove every object.
    pub fn clear(&mut self) {
        for mut object in self.objects.drain() {
            object.release(&mut self.physics);
        }
        self.ids = ObjectAllocator::new();
        self.despawn_queue.clear();
    }

    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.ids.is_alive(id)
    }

    pub fn object_count(&self) -> u32 {
        self.ids.alive_count()
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        if !self.is_alive(id) {
            return None;
        }
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        if !self.is_alive(id) {
            return None;
        }
        self.objects.get_mut(id)
    }

    /// Objects in slot order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &GameObject)> {
        let ids = &self.ids;
        self.objects
            .iter()
            .filter_map(move |(index, object)| ids.id_at(index).map(|id| (id, object)))
    }

    /// First player-controlled object.
    pub fn player(&self) -> Option<(ObjectId, &GameObject)> {
        self.objects().find(|(_, o)| o.state().kind == ObjectKind::Player)
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn pixels_per_meter(&self) -> f32 {
        self.pixels_per_meter
    }

    // =========================================================================
    // Frame Phases
    // =========================================================================

    /// Derive every moving object's contact flags from the physics contacts
    /// of its bodies.
    pub fn classify_contacts(&mut self, settings: &ContactSettings) {
        for (_, object) in self.objects.iter_mut() {
            let state = object.state();
            if state.kind == ObjectKind::Static {
                continue;
            }
            let Some(body) = state.body() else { continue };
            let mut contacts = self.physics.contacts(body);
            if let Some(secondary) = state.secondary() {
                contacts.extend(self.physics.contacts(secondary.body));
            }
            let flags = contact::classify(&contacts, settings);
            object.state_mut().set_contact_flags(flags);
        }
    }

    /// Run every object's components once.
    pub fn update(&mut self, input: &InputSnapshot, now: Duration) {
        let mut frame = Frame {
            physics: &mut self.physics,
            input,
            now,
            pixels_per_meter: self.pixels_per_meter,
        };
        for (_, object) in self.objects.iter_mut() {
            object.update(&mut frame);
        }
    }

    /// Advance the physics simulation.
    pub fn step(&mut self, dt: f32) {
        self.physics.step(dt);
    }
}
