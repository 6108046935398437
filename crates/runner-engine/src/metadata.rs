//! Entity metadata attached to every physics body.
//!
//! Each body in the [`PhysicsWorld`](crate::physics::PhysicsWorld) carries
//! exactly one [`EntityMetadata`] in the world's side table. The variant tag
//! decides which contact rules apply to the body and never changes after the
//! body is created.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{
    ENEMY_LINEAR_VELOCITY, FLYING_ENEMY_Y, RUNNING_LONG_ENEMY_Y, RUNNING_SHORT_ENEMY_Y,
};

// ---------------------------------------------------------------------------
// Vector types
// ---------------------------------------------------------------------------

/// 2D position in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// World x.
    pub x: f32,
    /// World y.
    pub y: f32,
}

/// 2D velocity in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    /// World units per second along x.
    pub dx: f32,
    /// World units per second along y.
    pub dy: f32,
}

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// The tag of an [`EntityMetadata`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Ground,
    Runner,
    Enemy,
}

// ---------------------------------------------------------------------------
// EnemyVariant
// ---------------------------------------------------------------------------

/// The fixed palette of obstacles. Each variant has its own size, spawn
/// height, and texture regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyVariant {
    RunningSmall,
    RunningWide,
    RunningLong,
    RunningBig,
    FlyingSmall,
    FlyingWide,
}

impl EnemyVariant {
    /// Every variant, in palette order.
    pub const ALL: [EnemyVariant; 6] = [
        EnemyVariant::RunningSmall,
        EnemyVariant::RunningWide,
        EnemyVariant::RunningLong,
        EnemyVariant::RunningBig,
        EnemyVariant::FlyingSmall,
        EnemyVariant::FlyingWide,
    ];

    /// Pick a variant uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Body size `(width, height)` in world units.
    pub fn size(self) -> (f32, f32) {
        match self {
            EnemyVariant::RunningSmall | EnemyVariant::FlyingSmall => (1.0, 1.0),
            EnemyVariant::RunningWide | EnemyVariant::FlyingWide => (2.0, 1.0),
            EnemyVariant::RunningLong => (1.0, 2.0),
            EnemyVariant::RunningBig => (2.0, 2.0),
        }
    }

    /// Center height at which this variant spawns.
    pub fn spawn_y(self) -> f32 {
        match self {
            EnemyVariant::RunningSmall | EnemyVariant::RunningWide => RUNNING_SHORT_ENEMY_Y,
            EnemyVariant::RunningLong | EnemyVariant::RunningBig => RUNNING_LONG_ENEMY_Y,
            EnemyVariant::FlyingSmall | EnemyVariant::FlyingWide => FLYING_ENEMY_Y,
        }
    }

    /// Whether the runner must dodge (rather than jump) to avoid it.
    pub fn is_flying(self) -> bool {
        matches!(self, EnemyVariant::FlyingSmall | EnemyVariant::FlyingWide)
    }

    /// Animation frames in the texture atlas.
    pub fn texture_regions(self) -> &'static [&'static str] {
        match self {
            EnemyVariant::RunningSmall => &["ladyBug_walk1", "ladyBug_walk2"],
            EnemyVariant::RunningWide => &["worm_walk1", "worm_walk2"],
            EnemyVariant::RunningLong => &["barnacle_bite1", "barnacle_bite2"],
            EnemyVariant::RunningBig => &["spider_walk1", "spider_walk2"],
            EnemyVariant::FlyingSmall => &["bee_fly1", "bee_fly2"],
            EnemyVariant::FlyingWide => &["fly_fly1", "fly_fly2"],
        }
    }
}

// ---------------------------------------------------------------------------
// EntityMetadata
// ---------------------------------------------------------------------------

/// Per-body payload distinguishing ground, runner, and enemy bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityMetadata {
    Ground {
        width: f32,
        height: f32,
    },
    /// Runner gameplay state lives in [`PlayerActor`](crate::player::PlayerActor).
    Runner {
        width: f32,
        height: f32,
    },
    Enemy {
        width: f32,
        height: f32,
        linear_velocity: Velocity,
        variant: EnemyVariant,
    },
}

impl EntityMetadata {
    /// Metadata for an enemy of the given variant, moving at the standard
    /// scroll velocity.
    pub fn enemy(variant: EnemyVariant) -> Self {
        let (width, height) = variant.size();
        EntityMetadata::Enemy {
            width,
            height,
            linear_velocity: Velocity {
                dx: ENEMY_LINEAR_VELOCITY.0,
                dy: ENEMY_LINEAR_VELOCITY.1,
            },
            variant,
        }
    }

    /// The tag, used by contact rules.
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityMetadata::Ground { .. } => EntityKind::Ground,
            EntityMetadata::Runner { .. } => EntityKind::Runner,
            EntityMetadata::Enemy { .. } => EntityKind::Enemy,
        }
    }

    /// Current box width.
    pub fn width(&self) -> f32 {
        match *self {
            EntityMetadata::Ground { width, .. }
            | EntityMetadata::Runner { width, .. }
            | EntityMetadata::Enemy { width, .. } => width,
        }
    }

    /// Current box height.
    pub fn height(&self) -> f32 {
        match *self {
            EntityMetadata::Ground { height, .. }
            | EntityMetadata::Runner { height, .. }
            | EntityMetadata::Enemy { height, .. } => height,
        }
    }

    /// The enemy variant, if this is an enemy.
    pub fn variant(&self) -> Option<EnemyVariant> {
        match *self {
            EntityMetadata::Enemy { variant, .. } => Some(variant),
            _ => None,
        }
    }

    /// Replace the dimensions, keeping the tag and kind-specific fields.
    pub(crate) fn set_size(&mut self, new_width: f32, new_height: f32) {
        match self {
            EntityMetadata::Ground { width, height }
            | EntityMetadata::Runner { width, height }
            | EntityMetadata::Enemy { width, height, .. } => {
                *width = new_width;
                *height = new_height;
            }
        }
    }
}
