//! Handles and construction descriptors shared by every physics backend.

use macroquad::math::Vec2;

/// Non-owning reference to a rigid body inside a `PhysicsWorld`.
///
/// Index plus generation, so a handle to a removed body never aliases a
/// body that later reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    pub fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn into_raw_parts(self) -> (u32, u32) {
        (self.index, self.generation)
    }
}

/// Non-owning reference to a joint inside a `PhysicsWorld`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointHandle {
    index: u32,
    generation: u32,
}

impl JointHandle {
    pub fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn into_raw_parts(self) -> (u32, u32) {
        (self.index, self.generation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves (floors, slopes)
    Static,
    /// Fully simulated
    Dynamic,
}

/// Collision shape, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Cuboid { half_extents: Vec2 },
    Ball { radius: f32 },
}

/// Everything needed to create a body with a single collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub position: Vec2,
    pub angle: f32,
    pub shape: ColliderShape,
    pub density: f32,
    pub friction: f32,
    /// Lock rotation (characters stay upright)
    pub fixed_rotation: bool,
}

impl BodyDesc {
    pub fn new(kind: BodyKind, position: Vec2, shape: ColliderShape) -> Self {
        Self {
            kind,
            position,
            angle: 0.0,
            shape,
            density: 1.0,
            friction: 0.3,
            fixed_rotation: false,
        }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }
}

/// A motorized revolute joint between two bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointDesc {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Anchor in `body_a` local space (meters)
    pub anchor_a: Vec2,
    /// Anchor in `body_b` local space (meters)
    pub anchor_b: Vec2,
    /// Maximum torque the motor may use to hold its target speed
    pub motor_max_torque: f32,
    pub motor_enabled: bool,
}

/// One contact between a queried body and something else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit surface normal pointing toward the queried body
    pub normal: Vec2,
    /// The other body is dynamic
    pub other_dynamic: bool,
}
