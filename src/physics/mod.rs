//! Physics Seam
//!
//! Game objects talk to the rigid-body engine only through `PhysicsWorld`.
//! The engine owns bodies and joints; objects hold copyable handles and are
//! responsible for removing what they created.
//!
//! Units: meters, radians, y pointing down (same orientation as the screen).
//!
//! Operations on an unknown or already-removed handle are no-ops, and
//! queries on one return `None`. A missing body is an expected state for an
//! object that has not been attached yet or was already torn down.

mod body;
mod rapier;
#[cfg(test)]
pub(crate) mod testing;

pub use body::*;
pub use rapier::RapierPhysics;

use macroquad::math::Vec2;

/// Rigid-body dynamics as seen by game objects.
pub trait PhysicsWorld {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle;
    fn destroy_body(&mut self, body: BodyHandle);
    fn create_revolute_joint(&mut self, desc: &JointDesc) -> Option<JointHandle>;
    fn destroy_joint(&mut self, joint: JointHandle);

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2>;
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2);
    /// Force for the next step only; cleared by `step`.
    fn apply_force_to_center(&mut self, body: BodyHandle, force: Vec2);
    fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2, point: Vec2);

    fn mass(&self, body: BodyHandle) -> Option<f32>;
    fn gravity_scale(&self, body: BodyHandle) -> Option<f32>;
    fn set_gravity_scale(&mut self, body: BodyHandle, scale: f32);
    /// Friction of the body's colliders.
    fn friction(&self, body: BodyHandle) -> Option<f32>;
    fn set_friction(&mut self, body: BodyHandle, friction: f32);

    fn set_joint_motor_enabled(&mut self, joint: JointHandle, enabled: bool);
    fn set_joint_limits(&mut self, joint: JointHandle, lower: f32, upper: f32);

    /// Body origin in world space.
    fn position(&self, body: BodyHandle) -> Option<Vec2>;
    /// Center of mass in world space.
    fn world_center(&self, body: BodyHandle) -> Option<Vec2>;
    fn angle(&self, body: BodyHandle) -> Option<f32>;

    /// Active contacts touching the body. Empty for unknown bodies.
    fn contacts(&self, body: BodyHandle) -> Vec<Contact>;

    /// Advance the simulation by `dt` seconds.
    fn step(&mut self, dt: f32);

    fn body_count(&self) -> usize;
    fn joint_count(&self) -> usize;
}
