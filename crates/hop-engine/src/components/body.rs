use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::area::AreaComp;
use super::transform::PosComp;
use super::Component;
use crate::api::types::{CompId, EntityId};

pub const DEFAULT_JUMP_FORCE: f32 = 480.0;
pub const DEFAULT_MAX_VEL: f32 = 960.0;

/// Optional overrides for a [`BodyComp`], e.g. from level JSON.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BodyConf {
    #[serde(default)]
    pub jump_force: Option<f32>,
    #[serde(default)]
    pub max_vel: Option<f32>,
}

/// Gravity-driven platformer body.
///
/// Integration and landing are done by the physics system; this holds the
/// per-body state. `cur_platform` is a weak handle: it is dropped as soon as
/// the platform stops existing or stops touching the body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyComp {
    pub jump_force: f32,
    pub max_vel: f32,
    pub(crate) velocity_y: f32,
    pub(crate) grounded: bool,
    pub(crate) cur_platform: Option<EntityId>,
    pub(crate) last_platform_pos: Option<Vec2>,
}

impl BodyComp {
    pub const ID: CompId = "body";

    pub fn new() -> Self {
        Self::from_conf(BodyConf::default())
    }

    pub fn from_conf(conf: BodyConf) -> Self {
        Self {
            jump_force: conf.jump_force.unwrap_or(DEFAULT_JUMP_FORCE),
            max_vel: conf.max_vel.unwrap_or(DEFAULT_MAX_VEL),
            velocity_y: 0.0,
            grounded: false,
            cur_platform: None,
            last_platform_pos: None,
        }
    }

    pub fn with_jump_force(mut self, force: f32) -> Self {
        self.jump_force = force;
        self
    }

    pub fn with_max_vel(mut self, max_vel: f32) -> Self {
        self.max_vel = max_vel;
        self
    }

    /// Launch upward. No-op unless grounded.
    pub fn jump(&mut self, force: Option<f32>) -> bool {
        if !self.grounded {
            return false;
        }
        self.velocity_y = -force.unwrap_or(self.jump_force);
        self.leave_ground();
        true
    }

    pub fn grounded(&self) -> bool {
        self.grounded
    }

    pub fn falling(&self) -> bool {
        self.velocity_y > 0.0 && !self.grounded
    }

    pub fn velocity_y(&self) -> f32 {
        self.velocity_y
    }

    pub fn cur_platform(&self) -> Option<EntityId> {
        self.cur_platform
    }

    pub(crate) fn land(&mut self, platform: EntityId, platform_pos: Vec2) -> bool {
        let was_grounded = self.grounded;
        self.velocity_y = 0.0;
        self.grounded = true;
        self.cur_platform = Some(platform);
        self.last_platform_pos = Some(platform_pos);
        !was_grounded
    }

    pub(crate) fn leave_ground(&mut self) {
        self.grounded = false;
        self.cur_platform = None;
        self.last_platform_pos = None;
    }
}

impl Default for BodyComp {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for BodyComp {
    fn id(&self) -> CompId {
        Self::ID
    }

    fn requires(&self) -> &'static [CompId] {
        &[PosComp::ID, AreaComp::ID]
    }

    fn inspect(&self) -> Option<String> {
        Some(format!(
            "body: vel_y {:.1}{}",
            self.velocity_y,
            if self.grounded { " grounded" } else { "" }
        ))
    }
}
