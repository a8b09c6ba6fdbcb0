//! In-memory physics double for unit tests.
//!
//! Stores just enough body and joint state to answer queries, and records
//! every mutating call so tests can assert on exactly what a component did.

use macroquad::math::Vec2;

use super::{BodyDesc, BodyHandle, BodyKind, Contact, JointDesc, JointHandle, PhysicsWorld};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Call {
    SetVelocity(BodyHandle, Vec2),
    Force(BodyHandle, Vec2),
    Impulse(BodyHandle, Vec2, Vec2),
    GravityScale(BodyHandle, f32),
    Friction(BodyHandle, f32),
    Motor(JointHandle, bool),
    Limits(JointHandle, f32, f32),
    Step(f32),
}

#[derive(Debug, Clone)]
pub struct MockBody {
    pub desc: BodyDesc,
    pub position: Vec2,
    pub angle: f32,
    pub velocity: Vec2,
    pub mass: f32,
    pub gravity_scale: f32,
    pub friction: f32,
    pub contacts: Vec<Contact>,
    force: Vec2,
}

#[derive(Debug, Clone, Copy)]
pub struct MockJoint {
    pub desc: JointDesc,
    pub motor_enabled: bool,
    pub limits: Option<(f32, f32)>,
}

#[derive(Default)]
pub struct RecordingPhysics {
    bodies: Vec<(u32, Option<MockBody>)>,
    joints: Vec<(u32, Option<MockJoint>)>,
    calls: Vec<Call>,
}

impl RecordingPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn body(&self, body: BodyHandle) -> Option<&MockBody> {
        let (index, generation) = body.into_raw_parts();
        match self.bodies.get(index as usize) {
            Some((gen, Some(b))) if *gen == generation => Some(b),
            _ => None,
        }
    }

    pub fn body_mut(&mut self, body: BodyHandle) -> Option<&mut MockBody> {
        let (index, generation) = body.into_raw_parts();
        match self.bodies.get_mut(index as usize) {
            Some((gen, Some(b))) if *gen == generation => Some(b),
            _ => None,
        }
    }

    pub fn joint(&self, joint: JointHandle) -> Option<&MockJoint> {
        let (index, generation) = joint.into_raw_parts();
        match self.joints.get(index as usize) {
            Some((gen, Some(j))) if *gen == generation => Some(j),
            _ => None,
        }
    }

    fn joint_mut(&mut self, joint: JointHandle) -> Option<&mut MockJoint> {
        let (index, generation) = joint.into_raw_parts();
        match self.joints.get_mut(index as usize) {
            Some((gen, Some(j))) if *gen == generation => Some(j),
            _ => None,
        }
    }

    /// Forces applied to a body since the last `clear_calls`.
    pub fn forces(&self, body: BodyHandle) -> Vec<Vec2> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Force(b, f) if *b == body => Some(*f),
                _ => None,
            })
            .collect()
    }

    /// Impulses applied to a body since the last `clear_calls`.
    pub fn impulses(&self, body: BodyHandle) -> Vec<(Vec2, Vec2)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Impulse(b, i, p) if *b == body => Some((*i, *p)),
                _ => None,
            })
            .collect()
    }
}

impl PhysicsWorld for RecordingPhysics {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let body = MockBody {
            desc: *desc,
            position: desc.position,
            angle: desc.angle,
            velocity: Vec2::ZERO,
            mass: 1.0,
            gravity_scale: 1.0,
            friction: desc.friction,
            contacts: Vec::new(),
            force: Vec2::ZERO,
        };
        // Reuse a free slot with a bumped generation
        if let Some(index) = self.bodies.iter().position(|(_, b)| b.is_none()) {
            let slot = &mut self.bodies[index];
            slot.0 += 1;
            slot.1 = Some(body);
            return BodyHandle::from_raw_parts(index as u32, slot.0);
        }
        self.bodies.push((0, Some(body)));
        BodyHandle::from_raw_parts(self.bodies.len() as u32 - 1, 0)
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        if self.body(body).is_none() {
            return;
        }
        let (index, _) = body.into_raw_parts();
        self.bodies[index as usize].1 = None;
        // Joints go with their bodies, like a real engine
        for (_, joint) in &mut self.joints {
            if joint.is_some_and(|j| j.desc.body_a == body || j.desc.body_b == body) {
                *joint = None;
            }
        }
    }

    fn create_revolute_joint(&mut self, desc: &JointDesc) -> Option<JointHandle> {
        self.body(desc.body_a)?;
        self.body(desc.body_b)?;
        self.joints.push((
            0,
            Some(MockJoint {
                desc: *desc,
                motor_enabled: desc.motor_enabled,
                limits: None,
            }),
        ));
        Some(JointHandle::from_raw_parts(self.joints.len() as u32 - 1, 0))
    }

    fn destroy_joint(&mut self, joint: JointHandle) {
        if self.joint(joint).is_some() {
            let (index, _) = joint.into_raw_parts();
            self.joints[index as usize].1 = None;
        }
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.body(body).map(|b| b.velocity)
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.body_mut(body) {
            b.velocity = velocity;
            self.calls.push(Call::SetVelocity(body, velocity));
        }
    }

    fn apply_force_to_center(&mut self, body: BodyHandle, force: Vec2) {
        if let Some(b) = self.body_mut(body) {
            b.force += force;
            self.calls.push(Call::Force(body, force));
        }
    }

    fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2, point: Vec2) {
        if let Some(b) = self.body_mut(body) {
            b.velocity += impulse / b.mass;
            self.calls.push(Call::Impulse(body, impulse, point));
        }
    }

    fn mass(&self, body: BodyHandle) -> Option<f32> {
        self.body(body).map(|b| b.mass)
    }

    fn gravity_scale(&self, body: BodyHandle) -> Option<f32> {
        self.body(body).map(|b| b.gravity_scale)
    }

    fn set_gravity_scale(&mut self, body: BodyHandle, scale: f32) {
        if let Some(b) = self.body_mut(body) {
            b.gravity_scale = scale;
            self.calls.push(Call::GravityScale(body, scale));
        }
    }

    fn friction(&self, body: BodyHandle) -> Option<f32> {
        self.body(body).map(|b| b.friction)
    }

    fn set_friction(&mut self, body: BodyHandle, friction: f32) {
        if let Some(b) = self.body_mut(body) {
            b.friction = friction;
            self.calls.push(Call::Friction(body, friction));
        }
    }

    fn set_joint_motor_enabled(&mut self, joint: JointHandle, enabled: bool) {
        if let Some(j) = self.joint_mut(joint) {
            j.motor_enabled = enabled;
            self.calls.push(Call::Motor(joint, enabled));
        }
    }

    fn set_joint_limits(&mut self, joint: JointHandle, lower: f32, upper: f32) {
        if let Some(j) = self.joint_mut(joint) {
            j.limits = Some((lower, upper));
            self.calls.push(Call::Limits(joint, lower, upper));
        }
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.body(body).map(|b| b.position)
    }

    fn world_center(&self, body: BodyHandle) -> Option<Vec2> {
        self.position(body)
    }

    fn angle(&self, body: BodyHandle) -> Option<f32> {
        self.body(body).map(|b| b.angle)
    }

    fn contacts(&self, body: BodyHandle) -> Vec<Contact> {
        self.body(body).map(|b| b.contacts.clone()).unwrap_or_default()
    }

    fn step(&mut self, dt: f32) {
        for (_, body) in &mut self.bodies {
            if let Some(b) = body.as_mut().filter(|b| b.desc.kind == BodyKind::Dynamic) {
                b.velocity += b.force / b.mass * dt;
                b.position += b.velocity * dt;
                b.force = Vec2::ZERO;
            }
        }
        self.calls.push(Call::Step(dt));
    }

    fn body_count(&self) -> usize {
        self.bodies.iter().filter(|(_, b)| b.is_some()).count()
    }

    fn joint_count(&self) -> usize {
        self.joints.iter().filter(|(_, j)| j.is_some()).count()
    }
}
