//! Scene descriptions
//!
//! A scene is a flat list of objects in pixel space, stored as RON. Objects
//! are spawned in file order, which is also their update and draw order.

use std::fs;
use std::path::Path;

use macroquad::math::{vec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PlayerTuning;
use crate::game::{
    GameObject, GameWorld, Geometry, GraphicsComponent, ObjectError, ObjectId, PhysicsComponent, PlayerInput,
    PlayerPhysics, Shape,
};
use crate::physics::PhysicsWorld;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("object {index}: {source}")]
    Object {
        index: usize,
        #[source]
        source: ObjectError,
    },
    #[error("object {index}: characters must be dynamic")]
    StaticCharacter { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectShape {
    Box,
    Character,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Motion {
    Static,
    #[default]
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDesc {
    pub shape: ObjectShape,
    #[serde(default)]
    pub motion: Motion,
    /// Center, pixels
    pub position: [f32; 2],
    /// Width and height, pixels
    pub size: [f32; 2],
    /// Degrees
    #[serde(default)]
    pub angle: f32,
    /// Friction of dynamic boxes
    #[serde(default = "default_friction")]
    pub friction: f32,
}

fn default_friction() -> f32 {
    0.3
}

impl ObjectDesc {
    pub fn ground(position: Vec2, size: Vec2, angle: f32) -> Self {
        Self {
            shape: ObjectShape::Box,
            motion: Motion::Static,
            position: position.to_array(),
            size: size.to_array(),
            angle,
            friction: default_friction(),
        }
    }

    pub fn crate_box(position: Vec2, size: Vec2) -> Self {
        Self {
            shape: ObjectShape::Box,
            motion: Motion::Dynamic,
            position: position.to_array(),
            size: size.to_array(),
            angle: 0.0,
            friction: default_friction(),
        }
    }

    pub fn character(position: Vec2) -> Self {
        Self {
            shape: ObjectShape::Character,
            motion: Motion::Dynamic,
            position: position.to_array(),
            size: [30.0, 60.0],
            angle: 0.0,
            friction: default_friction(),
        }
    }

    /// A dynamic box of random size somewhere along the top of the screen.
    pub fn random_box(rng: &mut impl Rng, screen_width: f32) -> Self {
        let side: f32 = rng.gen_range(16.0..48.0);
        let margin = side.max(screen_width * 0.1);
        let x = rng.gen_range(margin..(screen_width - margin).max(margin + 1.0));
        let mut desc = Self::crate_box(vec2(x, side), vec2(side, side));
        desc.angle = rng.gen_range(-30.0f32..30.0);
        desc
    }

    /// Build the object this entry describes.
    pub fn build(&self, tuning: &PlayerTuning) -> Result<GameObject, ObjectError> {
        let geometry = Geometry::new(Vec2::from_array(self.size))
            .at(Vec2::from_array(self.position))
            .rotated(self.angle.to_radians());
        match (self.shape, self.motion) {
            (ObjectShape::Box, Motion::Static) => GameObject::boxed(
                geometry,
                Shape::ground(),
                vec![PhysicsComponent::Static.into(), GraphicsComponent::Plain.into()],
            ),
            (ObjectShape::Box, Motion::Dynamic) => GameObject::boxed(
                geometry,
                Shape::red_box(),
                vec![
                    PhysicsComponent::Dynamic { friction: self.friction }.into(),
                    GraphicsComponent::Plain.into(),
                ],
            ),
            (ObjectShape::Character, _) => GameObject::character_capsule(
                geometry,
                vec![
                    PlayerInput::new(*tuning).into(),
                    PhysicsComponent::Player(PlayerPhysics::new(*tuning)).into(),
                    GraphicsComponent::animated().into(),
                ],
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDesc {
    pub objects: Vec<ObjectDesc>,
}

impl SceneDesc {
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    pub fn from_ron(s: &str) -> Result<Self, SceneError> {
        Ok(ron::from_str(s)?)
    }

    /// The built-in level: a floor, a ramp, a ledge, a few boxes and the
    /// player.
    pub fn demo(width: f32, height: f32) -> Self {
        let floor_y = height - 20.0;
        Self {
            objects: vec![
                ObjectDesc::ground(vec2(width / 2.0, floor_y), vec2(width, 40.0), 0.0),
                ObjectDesc::ground(vec2(width * 0.7, floor_y - 60.0), vec2(360.0, 20.0), -20.0),
                ObjectDesc::ground(vec2(width * 0.25, floor_y - 180.0), vec2(220.0, 20.0), 0.0),
                ObjectDesc::crate_box(vec2(width * 0.4, floor_y - 60.0), vec2(40.0, 40.0)),
                ObjectDesc::crate_box(vec2(width * 0.4, floor_y - 120.0), vec2(30.0, 30.0)),
                ObjectDesc::crate_box(vec2(width * 0.2, floor_y - 230.0), vec2(24.0, 24.0)),
                ObjectDesc::character(vec2(width * 0.1, floor_y - 80.0)),
            ],
        }
    }

    /// Just a character, for headless runs.
    pub fn player_only(position: Vec2) -> Self {
        Self { objects: vec![ObjectDesc::character(position)] }
    }

    /// Build and spawn every object. Nothing is spawned if any entry is
    /// invalid.
    pub fn spawn<P: PhysicsWorld>(
        &self,
        world: &mut GameWorld<P>,
        tuning: &PlayerTuning,
    ) -> Result<Vec<ObjectId>, SceneError> {
        let mut objects = Vec::with_capacity(self.objects.len());
        for (index, desc) in self.objects.iter().enumerate() {
            if desc.shape == ObjectShape::Character && desc.motion == Motion::Static {
                return Err(SceneError::StaticCharacter { index });
            }
            let object = desc.build(tuning).map_err(|source| SceneError::Object { index, source })?;
            objects.push(object);
        }
        Ok(objects.into_iter().map(|object| world.spawn(object)).collect())
    }
}
