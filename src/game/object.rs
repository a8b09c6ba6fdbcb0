//! Game Objects
//!
//! A `GameObject` is an ordered list of components plus the state they
//! share (`ObjectState`). Composition is fixed at construction.
//!
//! Components receive the state, never the object, so they can't reach
//! each other and the object can hand out disjoint borrows: the component
//! list is iterated mutably while the state is passed alongside.
//!
//! Physics bodies belong to the `PhysicsWorld`. An object only keeps
//! handles, creates its bodies in `attach` and must give them back with
//! `release`; nothing is cleaned up implicitly.

use std::f32::consts::PI;

use macroquad::color::Color;
use macroquad::math::{vec2, Vec2};
use thiserror::Error;

use crate::physics::{BodyDesc, BodyHandle, BodyKind, ColliderShape, JointDesc, JointHandle, PhysicsWorld};
use super::components::{Component, Frame, PhysicsComponent};

/// Torque the foot motor may use to hold the character in place.
const FOOT_MOTOR_TORQUE: f32 = 1000.0;

#[derive(Debug, Error, PartialEq)]
pub enum ObjectError {
    #[error("dimensions must be positive and finite, got {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },
    #[error("position must be finite")]
    InvalidPosition,
}

/// Coarse type tag, taken from the physics component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Player,
    Box,
    Static,
}

/// Contact classification, produced outside the components and consumed
/// by them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactFlags {
    pub on_ground: bool,
    pub on_slope: bool,
    pub on_dynamic_body: bool,
}

/// Character animation clips. The discriminant is the sprite row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Animation {
    #[default]
    Idle = 0,
    WalkRight = 1,
    WalkLeft = 2,
    IdleRight = 3,
    IdleLeft = 4,
    Air = 5,
}

impl Animation {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Animation::Idle => "idle",
            Animation::WalkRight => "walk-right",
            Animation::WalkLeft => "walk-left",
            Animation::IdleRight => "idle-right",
            Animation::IdleLeft => "idle-left",
            Animation::Air => "air",
        }
    }
}

/// Per-frame controls of a character.
///
/// `key_left`/`key_right` are a one-frame channel: the input component sets
/// them, the player physics component reads and clears them in the same
/// frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    pub key_left: bool,
    pub key_right: bool,
    pub animation: Animation,
}

impl ControlState {
    pub(crate) fn drain_keys(&mut self) {
        self.key_left = false;
        self.key_right = false;
    }
}

/// A second body hinged to the primary one (the character's foot).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryBody {
    pub body: BodyHandle,
    pub joint: JointHandle,
}

/// Initial placement, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Center; defaults to the origin
    pub position: Option<Vec2>,
    pub size: Vec2,
    /// Radians
    pub angle: f32,
}

impl Geometry {
    pub fn new(size: Vec2) -> Self {
        Self { position: None, size, angle: 0.0 }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = Some(position);
        self
    }

    pub fn rotated(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }
}

/// How an object looks and which bodies it needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box {
        fill: Color,
        outline: Color,
        outline_thickness: f32,
    },
    /// Upper block on a round foot
    Capsule {
        fill: Color,
        outline: Color,
        foot_radius: f32,
    },
}

impl Shape {
    pub fn red_box() -> Self {
        Shape::Box {
            fill: Color::from_rgba(255, 0, 0, 255),
            outline: Color::from_rgba(100, 0, 0, 255),
            outline_thickness: 2.0,
        }
    }

    pub fn ground() -> Self {
        Shape::Box {
            fill: Color::from_rgba(70, 74, 86, 255),
            outline: Color::from_rgba(40, 42, 50, 255),
            outline_thickness: 2.0,
        }
    }

    /// Capsule sized for the given dimensions.
    pub fn capsule(size: Vec2) -> Self {
        Shape::Capsule {
            fill: Color::from_rgba(80, 200, 120, 255),
            outline: Color::from_rgba(20, 90, 40, 255),
            foot_radius: (size.x / 2.0).min(size.y / 3.0),
        }
    }
}

/// State shared by all components of one object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectState {
    pub kind: ObjectKind,
    /// Center in pixels. Follows the body once one exists.
    pub position: Vec2,
    /// Radians. Follows the body once one exists.
    pub angle: f32,
    pub flags: ContactFlags,
    dimensions: Vec2,
    body: Option<BodyHandle>,
    secondary: Option<SecondaryBody>,
    /// Primary body center relative to `position`, in pixels
    body_offset: Vec2,
    control: Option<ControlState>,
}

impl ObjectState {
    pub fn dimensions(&self) -> Vec2 {
        self.dimensions
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn secondary(&self) -> Option<SecondaryBody> {
        self.secondary
    }

    pub fn body_offset(&self) -> Vec2 {
        self.body_offset
    }

    pub fn control(&self) -> Option<&ControlState> {
        self.control.as_ref()
    }

    /// Character controls, if this object is controllable.
    pub fn control_mut(&mut self) -> Option<&mut ControlState> {
        self.control.as_mut()
    }

    pub fn set_contact_flags(&mut self, flags: ContactFlags) {
        self.flags = flags;
    }

    /// Copy the primary body's transform into the object, converting to
    /// pixels.
    pub(crate) fn sync_from_body(&mut self, physics: &dyn PhysicsWorld, pixels_per_meter: f32) {
        let Some(body) = self.body else { return };
        if let Some(position) = physics.position(body) {
            self.position = position * pixels_per_meter - self.body_offset;
        }
        if let Some(angle) = physics.angle(body) {
            self.angle = angle;
        }
    }
}

pub struct GameObject {
    state: ObjectState,
    shape: Shape,
    components: Vec<Component>,
}

impl GameObject {
    /// Create an object. Fails on non-positive or non-finite dimensions.
    pub fn new(geometry: Geometry, shape: Shape, components: Vec<Component>) -> Result<Self, ObjectError> {
        let size = geometry.size;
        if !(size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(ObjectError::InvalidDimensions { width: size.x, height: size.y });
        }
        let position = geometry.position.unwrap_or(Vec2::ZERO);
        if !(position.is_finite() && geometry.angle.is_finite()) {
            return Err(ObjectError::InvalidPosition);
        }

        let kind = components
            .iter()
            .find_map(|c| match c {
                Component::Physics(p) => Some(p.object_kind()),
                _ => None,
            })
            .unwrap_or(ObjectKind::Box);
        let control = matches!(shape, Shape::Capsule { .. }).then(ControlState::default);

        Ok(Self {
            state: ObjectState {
                kind,
                position,
                angle: geometry.angle,
                flags: ContactFlags::default(),
                dimensions: size,
                body: None,
                secondary: None,
                body_offset: Vec2::ZERO,
                control,
            },
            shape,
            components,
        })
    }

    /// A rectangular object.
    pub fn boxed(geometry: Geometry, shape: Shape, components: Vec<Component>) -> Result<Self, ObjectError> {
        Self::new(geometry, shape, components)
    }

    /// A controllable character: upper block hinged to a round foot.
    pub fn character_capsule(geometry: Geometry, components: Vec<Component>) -> Result<Self, ObjectError> {
        Self::new(geometry, Shape::capsule(geometry.size), components)
    }

    pub fn state(&self) -> &ObjectState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ObjectState {
        &mut self.state
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn is_attached(&self) -> bool {
        self.state.body.is_some()
    }

    /// Run every component once, in registration order.
    pub fn update(&mut self, frame: &mut Frame<'_>) {
        for component in &mut self.components {
            component.update(frame, &mut self.state);
        }
    }

    fn body_kind(&self) -> Option<BodyKind> {
        self.components.iter().find_map(|c| match c {
            Component::Physics(PhysicsComponent::Static) => Some(BodyKind::Static),
            Component::Physics(_) => Some(BodyKind::Dynamic),
            _ => None,
        })
    }

    /// Register this object's bodies with the physics world.
    ///
    /// Objects without a physics component get no body. Attaching twice is
    /// a no-op.
    pub fn attach(&mut self, physics: &mut dyn PhysicsWorld, pixels_per_meter: f32) {
        if self.is_attached() {
            return;
        }
        let Some(kind) = self.body_kind() else { return };

        let ppm = pixels_per_meter;
        let position = self.state.position;
        let size = self.state.dimensions;

        match self.shape {
            Shape::Box { .. } => {
                let desc = BodyDesc::new(
                    kind,
                    position / ppm,
                    ColliderShape::Cuboid { half_extents: size / 2.0 / ppm },
                )
                .with_angle(self.state.angle);
                self.state.body = Some(physics.create_body(&desc));
                self.state.body_offset = Vec2::ZERO;
            }
            Shape::Capsule { foot_radius, .. } => {
                let r = foot_radius;
                // Upper block stops `r` above the bottom; the foot fills the rest
                let upper_offset = vec2(0.0, -r / 2.0);
                let foot_offset = vec2(0.0, size.y / 2.0 - r);
                let upper = BodyDesc::new(
                    kind,
                    (position + upper_offset) / ppm,
                    ColliderShape::Cuboid { half_extents: vec2(size.x / 2.0, (size.y - r) / 2.0) / ppm },
                )
                .with_fixed_rotation(true);
                let foot = BodyDesc::new(kind, (position + foot_offset) / ppm, ColliderShape::Ball { radius: r / ppm });

                let body = physics.create_body(&upper);
                let foot_body = physics.create_body(&foot);
                let joint = physics.create_revolute_joint(&JointDesc {
                    body_a: body,
                    body_b: foot_body,
                    anchor_a: (foot_offset - upper_offset) / ppm,
                    anchor_b: Vec2::ZERO,
                    motor_max_torque: FOOT_MOTOR_TORQUE,
                    motor_enabled: true,
                });
                if let Some(joint) = joint {
                    physics.set_joint_limits(joint, -PI, PI);
                    self.state.secondary = Some(SecondaryBody { body: foot_body, joint });
                } else {
                    tracing::warn!("foot joint rejected, character runs without a foot");
                    physics.destroy_body(foot_body);
                }
                self.state.body = Some(body);
                self.state.body_offset = upper_offset;
            }
        }
        tracing::debug!(kind = ?self.state.kind, ?position, "attached object");
    }

    /// Remove this object's joint and bodies from the physics world.
    pub fn release(&mut self, physics: &mut dyn PhysicsWorld) {
        if let Some(secondary) = self.state.secondary.take() {
            physics.destroy_joint(secondary.joint);
            physics.destroy_body(secondary.body);
        }
        if let Some(body) = self.state.body.take() {
            physics.destroy_body(body);
        }
    }
}
