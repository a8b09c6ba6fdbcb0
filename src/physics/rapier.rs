//! rapier2d backend

use macroquad::math::{vec2, Vec2};
use rapier2d::prelude::{
    CCDSolver, ColliderBuilder, ColliderHandle, ColliderSet, DefaultBroadPhase,
    ImpulseJointHandle, ImpulseJointSet, IntegrationParameters, IslandManager, JointAxesMask,
    JointAxis, MultibodyJointSet, NarrowPhase, PhysicsPipeline, Point, QueryPipeline, Real,
    RevoluteJointBuilder, RigidBody, RigidBodyBuilder, RigidBodyHandle, RigidBodySet, Vector,
};

use super::{BodyDesc, BodyHandle, BodyKind, ColliderShape, Contact, JointDesc, JointHandle, PhysicsWorld};

/// Damping of the foot motor's velocity target. High enough that an
/// enabled motor locks the foot, capped by the joint's max torque.
const MOTOR_DAMPING: Real = 1.0e4;

/// A complete rapier simulation: sets, pipeline and solver state.
pub struct RapierPhysics {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl RapierPhysics {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: Vector::new(gravity.x, gravity.y),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    fn body(&self, body: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(to_rapier_body(body))
    }

    fn body_mut(&mut self, body: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(to_rapier_body(body))
    }

    fn colliders_of(&self, body: BodyHandle) -> Vec<ColliderHandle> {
        self.body(body)
            .map(|rb| rb.colliders().to_vec())
            .unwrap_or_default()
    }
}

fn to_rapier_body(body: BodyHandle) -> RigidBodyHandle {
    let (index, generation) = body.into_raw_parts();
    RigidBodyHandle::from_raw_parts(index, generation)
}

fn from_rapier_body(handle: RigidBodyHandle) -> BodyHandle {
    let (index, generation) = handle.into_raw_parts();
    BodyHandle::from_raw_parts(index, generation)
}

fn to_rapier_joint(joint: JointHandle) -> ImpulseJointHandle {
    let (index, generation) = joint.into_raw_parts();
    ImpulseJointHandle::from_raw_parts(index, generation)
}

fn from_rapier_joint(handle: ImpulseJointHandle) -> JointHandle {
    let (index, generation) = handle.into_raw_parts();
    JointHandle::from_raw_parts(index, generation)
}

impl PhysicsWorld for RapierPhysics {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let mut builder = match desc.kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
        }
        .translation(Vector::new(desc.position.x, desc.position.y))
        .rotation(desc.angle);
        if desc.fixed_rotation {
            builder = builder.lock_rotations();
        }
        let handle = self.bodies.insert(builder.build());

        let collider = match desc.shape {
            ColliderShape::Cuboid { half_extents } => ColliderBuilder::cuboid(half_extents.x, half_extents.y),
            ColliderShape::Ball { radius } => ColliderBuilder::ball(radius),
        }
        .density(desc.density)
        .friction(desc.friction)
        .build();
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);

        tracing::trace!(?handle, kind = ?desc.kind, "created body");
        from_rapier_body(handle)
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        // Removing a body also removes its colliders and attached joints
        let removed = self.bodies.remove(
            to_rapier_body(body),
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        if removed.is_none() {
            tracing::trace!(?body, "destroy_body on unknown handle");
        }
    }

    fn create_revolute_joint(&mut self, desc: &JointDesc) -> Option<JointHandle> {
        let body_a = to_rapier_body(desc.body_a);
        let body_b = to_rapier_body(desc.body_b);
        if self.bodies.get(body_a).is_none() || self.bodies.get(body_b).is_none() {
            return None;
        }

        let joint = RevoluteJointBuilder::new()
            .local_anchor1(Point::new(desc.anchor_a.x, desc.anchor_a.y))
            .local_anchor2(Point::new(desc.anchor_b.x, desc.anchor_b.y))
            .contacts_enabled(false)
            .motor_velocity(0.0, MOTOR_DAMPING)
            .motor_max_force(desc.motor_max_torque)
            .build();
        let handle = self.impulse_joints.insert(body_a, body_b, joint, true);
        if !desc.motor_enabled {
            self.set_joint_motor_enabled(from_rapier_joint(handle), false);
        }
        Some(from_rapier_joint(handle))
    }

    fn destroy_joint(&mut self, joint: JointHandle) {
        self.impulse_joints.remove(to_rapier_joint(joint), true);
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.body(body).map(|rb| vec2(rb.linvel().x, rb.linvel().y))
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(rb) = self.body_mut(body) {
            rb.set_linvel(Vector::new(velocity.x, velocity.y), true);
        }
    }

    fn apply_force_to_center(&mut self, body: BodyHandle, force: Vec2) {
        if let Some(rb) = self.body_mut(body) {
            rb.add_force(Vector::new(force.x, force.y), true);
        }
    }

    fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2, point: Vec2) {
        if let Some(rb) = self.body_mut(body) {
            rb.apply_impulse_at_point(Vector::new(impulse.x, impulse.y), Point::new(point.x, point.y), true);
        }
    }

    fn mass(&self, body: BodyHandle) -> Option<f32> {
        self.body(body).map(|rb| rb.mass())
    }

    fn gravity_scale(&self, body: BodyHandle) -> Option<f32> {
        self.body(body).map(|rb| rb.gravity_scale())
    }

    fn set_gravity_scale(&mut self, body: BodyHandle, scale: f32) {
        if let Some(rb) = self.body_mut(body) {
            rb.set_gravity_scale(scale, true);
        }
    }

    fn friction(&self, body: BodyHandle) -> Option<f32> {
        let first = *self.body(body)?.colliders().first()?;
        self.colliders.get(first).map(|c| c.friction())
    }

    fn set_friction(&mut self, body: BodyHandle, friction: f32) {
        for handle in self.colliders_of(body) {
            if let Some(collider) = self.colliders.get_mut(handle) {
                collider.set_friction(friction);
            }
        }
    }

    fn set_joint_motor_enabled(&mut self, joint: JointHandle, enabled: bool) {
        if let Some(joint) = self.impulse_joints.get_mut(to_rapier_joint(joint)) {
            joint.data.motor_axes.set(JointAxesMask::ANG_X, enabled);
        }
    }

    fn set_joint_limits(&mut self, joint: JointHandle, lower: f32, upper: f32) {
        if let Some(joint) = self.impulse_joints.get_mut(to_rapier_joint(joint)) {
            joint.data.set_limits(JointAxis::AngX, [lower, upper]);
        }
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.body(body).map(|rb| vec2(rb.translation().x, rb.translation().y))
    }

    fn world_center(&self, body: BodyHandle) -> Option<Vec2> {
        self.body(body).map(|rb| {
            let com = rb.center_of_mass();
            vec2(com.x, com.y)
        })
    }

    fn angle(&self, body: BodyHandle) -> Option<f32> {
        self.body(body).map(|rb| rb.rotation().angle())
    }

    fn contacts(&self, body: BodyHandle) -> Vec<Contact> {
        let mut contacts = Vec::new();
        for collider in self.colliders_of(body) {
            for pair in self.narrow_phase.contact_pairs_with(collider) {
                if !pair.has_any_active_contact {
                    continue;
                }
                // Manifold normals point from collider1 toward collider2
                let (sign, other) = if pair.collider1 == collider {
                    (-1.0, pair.collider2)
                } else {
                    (1.0, pair.collider1)
                };
                let other_dynamic = self
                    .colliders
                    .get(other)
                    .and_then(|c| c.parent())
                    .and_then(|parent| self.bodies.get(parent))
                    .map(|rb| rb.is_dynamic())
                    .unwrap_or(false);

                for manifold in &pair.manifolds {
                    if manifold.points.is_empty() {
                        continue;
                    }
                    let n = manifold.data.normal * sign;
                    contacts.push(Contact {
                        normal: vec2(n.x, n.y),
                        other_dynamic,
                    });
                }
            }
        }
        contacts
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        // Forces only last one step
        for (_, rb) in self.bodies.iter_mut() {
            rb.reset_forces(false);
        }
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }
}
