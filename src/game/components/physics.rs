//! Physics components
//!
//! Keep an object's transform in step with its body. The player variant
//! also chooses friction, gravity and the foot motor from the contact flags
//! and the keys the input component reported this frame.

use std::f32::consts::PI;

use crate::config::PlayerTuning;
use crate::game::object::{Animation, ContactFlags, ObjectKind, ObjectState, SecondaryBody};
use crate::physics::{BodyHandle, PhysicsWorld};
use super::Frame;

pub enum PhysicsComponent {
    /// Immovable geometry (floors, slopes)
    Static,
    /// A simulated body with constant friction
    Dynamic { friction: f32 },
    /// A controllable character
    Player(PlayerPhysics),
}

impl PhysicsComponent {
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            PhysicsComponent::Static => ObjectKind::Static,
            PhysicsComponent::Dynamic { .. } => ObjectKind::Box,
            PhysicsComponent::Player(_) => ObjectKind::Player,
        }
    }

    pub fn update(&mut self, frame: &mut Frame<'_>, owner: &mut ObjectState) {
        match self {
            PhysicsComponent::Static => owner.sync_from_body(&*frame.physics, frame.pixels_per_meter),
            PhysicsComponent::Dynamic { friction } => sync_dynamic(frame, owner, *friction),
            PhysicsComponent::Player(player) => player.update(frame, owner),
        }
    }
}

/// Shared tail of every dynamic body update: apply friction, then copy the
/// body's transform back into the object.
fn sync_dynamic(frame: &mut Frame<'_>, owner: &mut ObjectState, friction: f32) {
    if let Some(body) = owner.body() {
        frame.physics.set_friction(body, friction);
    }
    owner.sync_from_body(&*frame.physics, frame.pixels_per_meter);
}

/// Pick the character animation.
///
/// Airborne characters always play `Air`. On the ground a walk clip needs
/// both the key and actual motion (faster than `dead_zone`, m/s) in that
/// direction; a held key alone only turns the idle pose.
pub fn select_animation(flags: ContactFlags, key_left: bool, key_right: bool, vx: f32, dead_zone: f32) -> Animation {
    let moving_left = vx < -dead_zone;
    let moving_right = vx > dead_zone;
    if !flags.on_ground {
        Animation::Air
    } else if key_left && moving_left {
        Animation::WalkLeft
    } else if key_right && moving_right {
        Animation::WalkRight
    } else if key_right {
        Animation::IdleRight
    } else if key_left {
        Animation::IdleLeft
    } else {
        Animation::Idle
    }
}

/// Friction for the primary body.
pub fn select_friction(flags: ContactFlags, key_left: bool, key_right: bool, tuning: &PlayerTuning) -> f32 {
    if flags.on_dynamic_body {
        tuning.dynamic_body_friction
    } else if !flags.on_ground {
        tuning.air_friction
    } else if key_left || key_right {
        tuning.ground_friction
    } else {
        tuning.idle_ground_friction
    }
}

#[derive(Debug, Clone)]
pub struct PlayerPhysics {
    tuning: PlayerTuning,
}

impl PlayerPhysics {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    pub fn update(&mut self, frame: &mut Frame<'_>, owner: &mut ObjectState) {
        let (key_left, key_right) = owner
            .control()
            .map(|c| (c.key_left, c.key_right))
            .unwrap_or((false, false));

        let mut friction = self.tuning.air_friction;
        if let Some(body) = owner.body() {
            if let Some(velocity) = frame.physics.linear_velocity(body) {
                let flags = owner.flags;
                let dead_zone = self.tuning.moving_dead_zone_px / frame.pixels_per_meter;
                let animation = select_animation(flags, key_left, key_right, velocity.x, dead_zone);
                friction = select_friction(flags, key_left, key_right, &self.tuning);

                if let Some(secondary) = owner.secondary() {
                    self.update_foot(frame.physics, secondary, flags, key_left || key_right, friction);
                }
                self.update_gravity(frame.physics, body, flags);

                if let Some(control) = owner.control_mut() {
                    control.animation = animation;
                }
            }
        }

        // Keys only ever live for one frame
        if let Some(control) = owner.control_mut() {
            control.drain_keys();
        }
        sync_dynamic(frame, owner, friction);
    }

    fn update_foot(
        &self,
        physics: &mut dyn PhysicsWorld,
        foot: SecondaryBody,
        flags: ContactFlags,
        moving: bool,
        friction: f32,
    ) {
        if flags.on_slope {
            physics.set_gravity_scale(foot.body, self.tuning.slope_gravity_scale);
            let foot_friction = if moving {
                self.tuning.slope_moving_friction
            } else {
                self.tuning.slope_idle_friction
            };
            physics.set_friction(foot.body, foot_friction);
        } else {
            physics.set_joint_limits(foot.joint, -PI, PI);
            physics.set_gravity_scale(foot.body, 1.0);
            physics.set_friction(foot.body, friction);
        }
        // Slopes always brake with the motor; flat ground only when idle
        physics.set_joint_motor_enabled(foot.joint, flags.on_slope || !moving);
    }

    fn update_gravity(&self, physics: &mut dyn PhysicsWorld, body: BodyHandle, flags: ContactFlags) {
        let scale = if flags.on_slope { self.tuning.slope_gravity_scale } else { 1.0 };
        physics.set_gravity_scale(body, scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::components::Component;
    use crate::game::object::{GameObject, Geometry, Shape};
    use crate::input::InputSnapshot;
    use crate::physics::testing::{Call, RecordingPhysics};
    use macroquad::math::vec2;
    use proptest::prelude::*;
    use std::time::Duration;

    const PPM: f32 = 30.0;

    fn flags(on_ground: bool, on_slope: bool, on_dynamic_body: bool) -> ContactFlags {
        ContactFlags { on_ground, on_slope, on_dynamic_body }
    }

    fn character(physics: &mut RecordingPhysics) -> GameObject {
        let mut object = GameObject::character_capsule(
            Geometry::new(vec2(30.0, 60.0)).at(vec2(150.0, 150.0)),
            vec![PhysicsComponent::Player(PlayerPhysics::new(PlayerTuning::default())).into()],
        )
        .unwrap();
        object.attach(physics, PPM);
        object
    }

    fn run(object: &mut GameObject, physics: &mut RecordingPhysics) {
        let snapshot = InputSnapshot::EMPTY;
        let mut frame = Frame {
            physics,
            input: &snapshot,
            now: Duration::ZERO,
            pixels_per_meter: PPM,
        };
        object.update(&mut frame);
    }

    #[test]
    fn test_animation_table() {
        let ground = flags(true, false, false);
        let dz = 8.0 / PPM;
        assert_eq!(select_animation(flags(false, false, false), false, true, 5.0, dz), Animation::Air);
        assert_eq!(select_animation(ground, false, true, 1.0, dz), Animation::WalkRight);
        assert_eq!(select_animation(ground, true, false, -1.0, dz), Animation::WalkLeft);
        // Key held but not moving yet, or pushed the other way
        assert_eq!(select_animation(ground, false, true, 0.0, dz), Animation::IdleRight);
        assert_eq!(select_animation(ground, true, false, 1.0, dz), Animation::IdleLeft);
        assert_eq!(select_animation(ground, true, true, -1.0, dz), Animation::WalkLeft);
        // Drifting with no keys stays neutral
        assert_eq!(select_animation(ground, false, false, 1.0, dz), Animation::Idle);
        assert_eq!(select_animation(ground, false, false, 0.1, dz), Animation::Idle);
    }

    #[test]
    fn test_friction_table() {
        let t = PlayerTuning::default();
        assert_eq!(select_friction(flags(false, false, false), true, false, &t), 0.0);
        assert_eq!(select_friction(flags(false, false, true), true, false, &t), 0.45);
        assert_eq!(select_friction(flags(true, false, true), false, false, &t), 0.45);
        assert_eq!(select_friction(flags(true, false, false), true, false, &t), 0.95);
        assert_eq!(select_friction(flags(true, true, false), false, false, &t), 15.0);
    }

    #[test]
    fn test_idle_on_flat_ground() {
        let mut physics = RecordingPhysics::new();
        let mut object = character(&mut physics);
        object.state_mut().flags = flags(true, false, false);
        physics.clear_calls();

        run(&mut object, &mut physics);

        let state = object.state();
        let body = state.body().unwrap();
        let foot = state.secondary().unwrap();
        assert_eq!(physics.friction(body), Some(15.0));
        assert_eq!(physics.gravity_scale(body), Some(1.0));
        assert_eq!(physics.gravity_scale(foot.body), Some(1.0));
        assert!(physics.joint(foot.joint).unwrap().motor_enabled);
        assert_eq!(physics.joint(foot.joint).unwrap().limits, Some((-PI, PI)));
        assert_eq!(state.control().unwrap().animation, Animation::Idle);
    }

    #[test]
    fn test_airborne_with_right_key_plays_air() {
        let mut physics = RecordingPhysics::new();
        let mut object = character(&mut physics);
        object.state_mut().flags = flags(false, false, false);
        object.state_mut().control_mut().unwrap().key_right = true;
        let body = object.state().body().unwrap();
        physics.body_mut(body).unwrap().velocity = vec2(3.0, 0.0);

        run(&mut object, &mut physics);

        assert_eq!(object.state().control().unwrap().animation, Animation::Air);
        assert_eq!(physics.friction(body), Some(0.0));
        assert_eq!(physics.gravity_scale(body), Some(1.0));
    }

    #[test]
    fn test_walking_right_on_slope() {
        let mut physics = RecordingPhysics::new();
        let mut object = character(&mut physics);
        object.state_mut().flags = flags(true, true, false);
        object.state_mut().control_mut().unwrap().key_right = true;
        let body = object.state().body().unwrap();
        physics.body_mut(body).unwrap().velocity = vec2(1.0, 0.0);

        run(&mut object, &mut physics);

        let state = object.state();
        let body = state.body().unwrap();
        let foot = state.secondary().unwrap();
        assert_eq!(physics.friction(body), Some(0.95));
        assert_eq!(physics.gravity_scale(body), Some(0.2));
        assert_eq!(physics.gravity_scale(foot.body), Some(0.2));
        assert_eq!(physics.friction(foot.body), Some(0.0));
        assert!(physics.joint(foot.joint).unwrap().motor_enabled);
        assert_eq!(state.control().unwrap().animation, Animation::WalkRight);
        assert!(!state.control().unwrap().key_right);
    }

    #[test]
    fn test_idle_on_slope_brakes_foot() {
        let mut physics = RecordingPhysics::new();
        let mut object = character(&mut physics);
        object.state_mut().flags = flags(true, true, false);

        run(&mut object, &mut physics);

        let foot = object.state().secondary().unwrap();
        assert_eq!(physics.friction(foot.body), Some(200.0));
        assert!(physics.joint(foot.joint).unwrap().motor_enabled);
    }

    #[test]
    fn test_walking_on_flat_ground_releases_motor() {
        let mut physics = RecordingPhysics::new();
        let mut object = character(&mut physics);
        object.state_mut().flags = flags(true, false, false);
        object.state_mut().control_mut().unwrap().key_left = true;
        let body = object.state().body().unwrap();
        physics.body_mut(body).unwrap().velocity = vec2(-1.0, 0.0);
        physics.clear_calls();

        run(&mut object, &mut physics);

        let foot = object.state().secondary().unwrap();
        assert!(!physics.joint(foot.joint).unwrap().motor_enabled);
        assert!(physics.calls().contains(&Call::Limits(foot.joint, -PI, PI)));
        assert_eq!(object.state().control().unwrap().animation, Animation::WalkLeft);
    }

    #[test]
    fn test_syncs_transform_in_pixels() {
        let mut physics = RecordingPhysics::new();
        let mut object = character(&mut physics);
        let body = object.state().body().unwrap();
        let offset = object.state().body_offset();
        physics.body_mut(body).unwrap().position = vec2(10.0, 4.0);

        run(&mut object, &mut physics);

        assert_eq!(object.state().position, vec2(300.0, 120.0) - offset);
    }

    #[test]
    fn test_dynamic_box_applies_its_friction() {
        let mut physics = RecordingPhysics::new();
        let mut object = GameObject::boxed(
            Geometry::new(vec2(30.0, 30.0)),
            Shape::red_box(),
            vec![Component::Physics(PhysicsComponent::Dynamic { friction: 0.6 })],
        )
        .unwrap();
        object.attach(&mut physics, PPM);

        run(&mut object, &mut physics);

        assert_eq!(physics.friction(object.state().body().unwrap()), Some(0.6));
    }

    proptest! {
        #[test]
        fn prop_airborne_always_plays_air(
            on_slope: bool,
            on_dynamic_body: bool,
            key_left: bool,
            key_right: bool,
            vx in -50.0f32..50.0,
        ) {
            let t = PlayerTuning::default();
            prop_assert_eq!(select_animation(flags(false, on_slope, on_dynamic_body), key_left, key_right, vx, 0.25), Animation::Air);
            prop_assert_eq!(select_friction(flags(false, on_slope, false), key_left, key_right, &t), t.air_friction);
        }

        #[test]
        fn prop_friction_is_pure(on_ground: bool, on_slope: bool, on_dynamic_body: bool, key_left: bool, key_right: bool) {
            let t = PlayerTuning::default();
            let f = flags(on_ground, on_slope, on_dynamic_body);
            let first = select_friction(f, key_left, key_right, &t);
            prop_assert_eq!(first, select_friction(f, key_left, key_right, &t));
            prop_assert!([t.air_friction, t.dynamic_body_friction, t.ground_friction, t.idle_ground_friction].contains(&first));
        }

        #[test]
        fn prop_keys_drained_after_update(on_ground: bool, on_slope: bool, key_left: bool, key_right: bool, attached: bool) {
            let mut physics = RecordingPhysics::new();
            let mut object = GameObject::character_capsule(
                Geometry::new(vec2(30.0, 60.0)),
                vec![PhysicsComponent::Player(PlayerPhysics::new(PlayerTuning::default())).into()],
            )
            .unwrap();
            if attached {
                object.attach(&mut physics, PPM);
            }
            object.state_mut().flags = flags(on_ground, on_slope, false);
            {
                let control = object.state_mut().control_mut().unwrap();
                control.key_left = key_left;
                control.key_right = key_right;
            }

            run(&mut object, &mut physics);

            let control = object.state().control().unwrap();
            prop_assert!(!control.key_left && !control.key_right);
        }
    }
}
