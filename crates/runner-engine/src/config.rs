//! World tuning constants and the validated stage configuration.
//!
//! Geometry is expressed in world units (meters). The renderer-facing scale
//! is [`StageConfig::world_to_screen`]; with the defaults the 25 x 15 world
//! viewport maps onto an 800 x 480 screen.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// World tuning
// ---------------------------------------------------------------------------

/// Gravity applied to every dynamic body (world units / s^2).
pub const WORLD_GRAVITY: (f32, f32) = (0.0, -10.0);

/// Ground box center height.
pub const GROUND_Y: f32 = 0.0;
/// Ground box height. The ground's top surface sits at `GROUND_Y + GROUND_HEIGHT / 2`.
pub const GROUND_HEIGHT: f32 = 2.0;

/// Runner start x (center).
pub const RUNNER_X: f32 = 2.0;
/// Runner start y (center), standing on the ground.
pub const RUNNER_Y: f32 = GROUND_Y + GROUND_HEIGHT;
/// Standing runner width.
pub const RUNNER_WIDTH: f32 = 1.0;
/// Standing runner height.
pub const RUNNER_HEIGHT: f32 = 2.0;
/// Runner collider density.
pub const RUNNER_DENSITY: f32 = 0.5;
/// Gravity multiplier for the runner.
pub const RUNNER_GRAVITY_SCALE: f32 = 3.0;
/// Center of the lying (dodging) collision box. Its bottom rests on the ground.
pub const RUNNER_DODGE_X: f32 = 2.0;
/// Center y of the lying box.
pub const RUNNER_DODGE_Y: f32 = 1.5;
/// Impulse applied on jump.
pub const RUNNER_JUMPING_IMPULSE: (f32, f32) = (0.0, 13.0);
/// Angular impulse that tumbles a hit runner.
pub const RUNNER_HIT_ANGULAR_IMPULSE: f32 = 10.0;

/// Enemy collider density.
pub const ENEMY_DENSITY: f32 = RUNNER_DENSITY;
/// Scroll velocity of every enemy.
pub const ENEMY_LINEAR_VELOCITY: (f32, f32) = (-10.0, 0.0);
/// Center y of one-unit-tall ground enemies.
pub const RUNNING_SHORT_ENEMY_Y: f32 = 1.5;
/// Center y of two-unit-tall ground enemies.
pub const RUNNING_LONG_ENEMY_Y: f32 = 2.0;
/// Center y of flying enemies.
pub const FLYING_ENEMY_Y: f32 = 3.0;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors produced while loading or validating a [`StageConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed into a config.
    #[error("failed to parse stage config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the simulation cannot run with.
    #[error("invalid stage config field '{field}': {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// StageConfig
// ---------------------------------------------------------------------------

/// Runtime configuration for a [`GameStage`](crate::stage::GameStage).
///
/// Every field has a default, so a JSON document only needs to name the
/// fields it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Physics sub-step in seconds. Must be positive and finite.
    pub fixed_step: f64,
    /// Upper bound on a single frame delta fed to the accumulator.
    pub max_frame_delta: f64,
    /// Screen pixels per world unit.
    pub world_to_screen: f32,
    /// Viewport width in world units.
    pub viewport_width: f32,
    /// Viewport height in world units.
    pub viewport_height: f32,
    /// Seconds a dodge persists after the pointer is released.
    pub dodge_delay: f64,
    /// Horizontal spawn position of new enemies.
    pub enemy_spawn_x: f32,
    /// Seed for the enemy-variant RNG.
    pub seed: u64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            fixed_step: 1.0 / 300.0,
            max_frame_delta: 0.25,
            world_to_screen: 32.0,
            viewport_width: 25.0,
            viewport_height: 15.0,
            dodge_delay: 0.5,
            enemy_spawn_x: 25.0,
            seed: 0x5eed,
        }
    }
}

impl StageConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field is usable by the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_step > 0.0 && self.fixed_step.is_finite()) {
            return Err(invalid(
                "fixed_step",
                format!("must be positive and finite, got {}", self.fixed_step),
            ));
        }
        if !(self.max_frame_delta >= self.fixed_step && self.max_frame_delta.is_finite()) {
            return Err(invalid(
                "max_frame_delta",
                format!(
                    "must be finite and at least fixed_step ({}), got {}",
                    self.fixed_step, self.max_frame_delta
                ),
            ));
        }
        if !(self.world_to_screen > 0.0 && self.world_to_screen.is_finite()) {
            return Err(invalid(
                "world_to_screen",
                format!("must be positive and finite, got {}", self.world_to_screen),
            ));
        }
        if !(self.viewport_width > 0.0 && self.viewport_width.is_finite()) {
            return Err(invalid(
                "viewport_width",
                format!("must be positive and finite, got {}", self.viewport_width),
            ));
        }
        if !(self.viewport_height > 0.0 && self.viewport_height.is_finite()) {
            return Err(invalid(
                "viewport_height",
                format!("must be positive and finite, got {}", self.viewport_height),
            ));
        }
        if !(self.dodge_delay >= 0.0 && self.dodge_delay.is_finite()) {
            return Err(invalid(
                "dodge_delay",
                format!("must be non-negative and finite, got {}", self.dodge_delay),
            ));
        }
        if !(self.enemy_spawn_x > RUNNER_X && self.enemy_spawn_x.is_finite()) {
            return Err(invalid(
                "enemy_spawn_x",
                format!(
                    "must be finite and right of the runner ({RUNNER_X}), got {}",
                    self.enemy_spawn_x
                ),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
