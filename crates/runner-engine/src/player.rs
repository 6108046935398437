//! The runner's gameplay state machine.
//!
//! ```text
//!             jump()                 landed()
//!   Running ---------> Jumping ------------------> Running
//!      |  ^
//!      |  | stop_dodge()
//!      v  |
//!    Dodging
//!
//!   any --hit()--> Hit   (permanent for the session)
//! ```
//!
//! Intents act on the runner body through the [`PhysicsWorld`]: a jump is an
//! upward impulse, a dodge swaps the standing collision box for a lying one.
//! Once hit, the runner ignores every intent.

use serde::Serialize;
use tracing::{debug, info};

use crate::actor::{ActorStatus, GameActor};
use crate::config::{
    RUNNER_DODGE_X, RUNNER_DODGE_Y, RUNNER_HEIGHT, RUNNER_HIT_ANGULAR_IMPULSE,
    RUNNER_JUMPING_IMPULSE, RUNNER_WIDTH, RUNNER_X, RUNNER_Y,
};
use crate::metadata::Position;
use crate::physics::{BodyHandle, PhysicsWorld};

/// Coarse state for animation selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayerState {
    Running,
    Jumping,
    Dodging,
    Hit,
}

/// The runner's actor plus its gameplay flags.
#[derive(Debug, Clone)]
pub struct PlayerActor {
    actor: GameActor,
    hit: bool,
    dodging: bool,
    jumping: bool,
}

impl PlayerActor {
    /// Wrap the runner actor; starts running, not hit.
    pub fn new(actor: GameActor) -> Self {
        Self {
            actor,
            hit: false,
            dodging: false,
            jumping: false,
        }
    }

    /// Jump if standing on the ground and not dodging.
    ///
    /// Returns `true` if the jump impulse was applied.
    pub fn jump(&mut self, world: &mut PhysicsWorld) -> bool {
        if self.jumping || self.dodging || self.hit {
            return false;
        }
        world.apply_impulse(self.body(), RUNNER_JUMPING_IMPULSE);
        self.jumping = true;
        debug!("runner jumped");
        true
    }

    /// Crouch into the lying collision box.
    ///
    /// Returns whether the runner is dodging afterwards: `true` for a new
    /// dodge or one already in progress, `false` if the runner is airborne
    /// or hit.
    pub fn dodge(&mut self, world: &mut PhysicsWorld) -> bool {
        if self.jumping || self.hit {
            return false;
        }
        if !self.dodging {
            world.reshape_box(
                self.body(),
                RUNNER_HEIGHT,
                RUNNER_WIDTH,
                Position {
                    x: RUNNER_DODGE_X,
                    y: RUNNER_DODGE_Y,
                },
            );
            self.dodging = true;
            debug!("runner dodging");
        }
        true
    }

    /// Stand back up from a dodge.
    ///
    /// The flag is always cleared; the body is only restored upright when the
    /// runner has not been hit, so a hit runner keeps tumbling.
    pub fn stop_dodge(&mut self, world: &mut PhysicsWorld) {
        if !self.dodging {
            return;
        }
        self.dodging = false;
        if !self.hit {
            world.reshape_box(
                self.body(),
                RUNNER_WIDTH,
                RUNNER_HEIGHT,
                Position {
                    x: RUNNER_X,
                    y: RUNNER_Y,
                },
            );
            debug!("runner stopped dodging");
        }
    }

    /// Mark the runner as hit. Idempotent.
    pub fn hit(&mut self, world: &mut PhysicsWorld) {
        if self.hit {
            return;
        }
        self.hit = true;
        world.apply_torque_impulse(self.body(), RUNNER_HIT_ANGULAR_IMPULSE);
        info!("runner hit");
    }

    /// The runner touched the ground.
    pub fn landed(&mut self) {
        self.jumping = false;
    }

    /// Refresh the screen rectangle from the body.
    pub fn act(&mut self, world: &PhysicsWorld, world_to_screen: f32) -> ActorStatus {
        self.actor.act(world, world_to_screen)
    }

    /// Touched an enemy; game over.
    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// Lying box is active.
    pub fn is_dodging(&self) -> bool {
        self.dodging
    }

    /// Airborne since a jump, until the next ground contact.
    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    /// Not jumping.
    pub fn is_grounded(&self) -> bool {
        !self.jumping
    }

    /// Coarse state, hit taking precedence.
    pub fn state(&self) -> PlayerState {
        if self.hit {
            PlayerState::Hit
        } else if self.jumping {
            PlayerState::Jumping
        } else if self.dodging {
            PlayerState::Dodging
        } else {
            PlayerState::Running
        }
    }

    /// The runner body.
    pub fn body(&self) -> BodyHandle {
        self.actor.body()
    }

    /// The underlying actor, for rendering.
    pub fn actor(&self) -> &GameActor {
        &self.actor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StageConfig;
    use crate::factory;

    fn setup() -> (PhysicsWorld, PlayerActor) {
        let config = StageConfig::default();
        let mut world = factory::create_world();
        factory::create_ground(&mut world, &config);
        let body = factory::create_runner(&mut world);
        // Settle contacts and mass properties before any intent.
        for _ in 0..10 {
            world.step(config.fixed_step);
        }
        let actor = GameActor::new(body, &world, config.world_to_screen);
        (world, PlayerActor::new(actor))
    }

    #[test]
    fn starts_running() {
        let (_, player) = setup();
        assert_eq!(player.state(), PlayerState::Running);
        assert!(player.is_grounded());
        assert!(!player.is_hit());
    }

    #[test]
    fn jump_applies_upward_velocity() {
        let (mut world, mut player) = setup();
        assert!(player.jump(&mut world));
        assert_eq!(player.state(), PlayerState::Jumping);
        world.step(1.0 / 300.0);
        assert!(world.velocity(player.body()).unwrap().dy > 0.0);
    }

    #[test]
    fn cannot_double_jump() {
        let (mut world, mut player) = setup();
        assert!(player.jump(&mut world));
        assert!(!player.jump(&mut world));
    }

    #[test]
    fn landed_returns_to_running() {
        let (mut world, mut player) = setup();
        player.jump(&mut world);
        player.landed();
        assert_eq!(player.state(), PlayerState::Running);
    }

    #[test]
    fn dodge_lies_runner_down() {
        let (mut world, mut player) = setup();
        assert!(player.dodge(&mut world));
        assert_eq!(player.state(), PlayerState::Dodging);
        let meta = world.metadata(player.body()).unwrap();
        assert_eq!((meta.width(), meta.height()), (RUNNER_HEIGHT, RUNNER_WIDTH));
    }

    #[test]
    fn repeated_dodge_is_still_dodging() {
        let (mut world, mut player) = setup();
        assert!(player.dodge(&mut world));
        assert!(player.dodge(&mut world));
        assert!(player.is_dodging());
    }

    #[test]
    fn stop_dodge_restores_standing_box() {
        let (mut world, mut player) = setup();
        player.dodge(&mut world);
        player.stop_dodge(&mut world);
        assert!(!player.is_dodging());
        let meta = world.metadata(player.body()).unwrap();
        assert_eq!((meta.width(), meta.height()), (RUNNER_WIDTH, RUNNER_HEIGHT));
        assert_eq!(
            world.position(player.body()),
            Some(Position {
                x: RUNNER_X,
                y: RUNNER_Y
            })
        );
    }

    #[test]
    fn no_jump_while_dodging_and_no_dodge_while_jumping() {
        let (mut world, mut player) = setup();
        player.dodge(&mut world);
        assert!(!player.jump(&mut world));
        player.stop_dodge(&mut world);

        player.jump(&mut world);
        assert!(!player.dodge(&mut world));
        assert!(!player.is_dodging());
    }

    #[test]
    fn intents_are_noops_once_hit() {
        let (mut world, mut player) = setup();
        player.hit(&mut world);
        assert!(!player.jump(&mut world));
        assert!(!player.dodge(&mut world));
        assert_eq!(player.state(), PlayerState::Hit);
        assert!(!player.is_dodging());
        assert!(!player.is_jumping());
    }

    #[test]
    fn hit_is_idempotent() {
        let (mut world, mut player) = setup();
        player.hit(&mut world);
        let spin = world.angular_velocity(player.body()).unwrap();
        assert!(spin > 0.0, "hit should spin the runner");
        player.hit(&mut world);
        assert!(player.is_hit());
        assert_eq!(world.angular_velocity(player.body()).unwrap(), spin);
    }

    #[test]
    fn landed_does_not_clear_hit() {
        let (mut world, mut player) = setup();
        player.jump(&mut world);
        player.hit(&mut world);
        player.landed();
        assert!(player.is_hit());
        assert_eq!(player.state(), PlayerState::Hit);
    }

    #[test]
    fn stop_dodge_after_hit_clears_flag_only() {
        let (mut world, mut player) = setup();
        player.dodge(&mut world);
        player.hit(&mut world);
        player.stop_dodge(&mut world);
        assert!(!player.is_dodging());
        let meta = world.metadata(player.body()).unwrap();
        assert_eq!(meta.height(), RUNNER_WIDTH, "hit runner keeps its lying box");
    }
}
