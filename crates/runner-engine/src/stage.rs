//! The simulation stage: world ownership, frame loop, spawning, contacts,
//! and input.
//!
//! [`GameStage::act`] runs once per rendered frame:
//!
//! 1. The stage clock advances by the frame delta and due timers fire
//!    (the deferred stop-dodge).
//! 2. Every actor re-reads its body; actors whose body was destroyed are
//!    dropped.
//! 3. The out-of-bounds sweep destroys enemies that left the viewport,
//!    spawning a replacement for each while the runner is not hit.
//! 4. The fixed-timestep accumulator decides how many physics sub-steps to
//!    run; after each sub-step the contacts are interpreted.
//!
//! Input arrives between frames through the pointer methods. Everything runs
//! on the caller's thread; nothing blocks.
//!
//! # Example
//!
//! ```
//! use runner_engine::prelude::*;
//!
//! let mut stage = GameStage::new(StageConfig::default());
//! stage.on_pointer_down(400.0, 240.0);
//! stage.on_pointer_drag(400.0, 200.0); // swipe up
//! assert!(stage.runner().is_jumping());
//!
//! for _ in 0..60 {
//!     stage.act(1.0 / 60.0);
//! }
//! assert_eq!(stage.runner_count(), 1);
//! ```

use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing::{debug, info, trace, warn};

use crate::actor::{ActorStatus, ActorView, GameActor};
use crate::config::{ConfigError, StageConfig};
use crate::contact::{
    classify_contact, dispatch_contacts, ContactListener, ContactOutcome, ContactParty,
};
use crate::factory;
use crate::input::{GestureDecoder, Intent};
use crate::metadata::{EntityKind, EntityMetadata, Position};
use crate::physics::{BodyHandle, PhysicsWorld};
use crate::player::PlayerActor;
use crate::schedule::Scheduler;
use crate::snapshot::{FrameSnapshot, RunnerStatus};
use crate::timestep::FixedTimestep;

/// Deferred work the stage runs at frame boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageTask {
    StopDodge,
}

/// Whether a body has left the playable area.
///
/// Bodies travel leftward, so a body is out once its right edge passes
/// `x = 0`. Only enemies are ever swept: the ground never moves and the
/// runner must outlive every frame.
pub fn is_out_of_bounds(metadata: &EntityMetadata, center: Position) -> bool {
    match metadata.kind() {
        EntityKind::Enemy => center.x + metadata.width() / 2.0 < 0.0,
        EntityKind::Ground | EntityKind::Runner => false,
    }
}

// ---------------------------------------------------------------------------
// GameStage
// ---------------------------------------------------------------------------

/// Owns the physics world and drives one game session.
pub struct GameStage {
    config: StageConfig,
    world: PhysicsWorld,
    timestep: FixedTimestep,
    scheduler: Scheduler<StageTask>,
    gestures: GestureDecoder,
    rng: Pcg64,
    ground: BodyHandle,
    runner: PlayerActor,
    /// Ground and enemy actors, in creation order.
    actors: Vec<GameActor>,
    clock: f64,
    frame: u64,
    enemies_spawned: u64,
}

impl GameStage {
    /// Build the world: ground, runner, and the first enemy, then settle it
    /// with one physics step.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`StageConfig::validate`]. Use
    /// [`try_new`](Self::try_new) for configs from untrusted sources.
    pub fn new(config: StageConfig) -> Self {
        match Self::try_new(config) {
            Ok(stage) => stage,
            Err(e) => panic!("invalid stage config: {e}"),
        }
    }

    /// Build the world, rejecting an invalid config.
    pub fn try_new(config: StageConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let scale = config.world_to_screen;
        let mut world = factory::create_world();
        let ground = factory::create_ground(&mut world, &config);
        let runner_body = factory::create_runner(&mut world);
        let runner = PlayerActor::new(GameActor::new(runner_body, &world, scale));
        let actors = vec![GameActor::new(ground, &world, scale)];

        let mut stage = Self {
            timestep: FixedTimestep::new(config.fixed_step, config.max_frame_delta),
            scheduler: Scheduler::new(),
            gestures: GestureDecoder::new(),
            rng: Pcg64::seed_from_u64(config.seed),
            world,
            ground,
            runner,
            actors,
            clock: 0.0,
            frame: 0,
            enemies_spawned: 0,
            config,
        };
        stage.spawn_enemy();

        // The resting ground contact must be reported before any input.
        // Not counted in sim time.
        let contacts = stage.world.step(stage.config.fixed_step);
        dispatch_contacts(&mut stage, &contacts);

        info!(
            fixed_step = stage.config.fixed_step,
            seed = stage.config.seed,
            "stage ready"
        );
        Ok(stage)
    }

    // -- frame loop ---------------------------------------------------------

    /// Advance one rendered frame of `delta` seconds.
    pub fn act(&mut self, delta: f64) {
        self.frame += 1;
        if delta.is_finite() && delta > 0.0 {
            self.clock += delta;
        }

        self.run_due_tasks();
        self.sync_actors();
        self.sweep_out_of_bounds();

        let steps = self.timestep.advance(delta);
        for _ in 0..steps {
            let contacts = self.world.step(self.timestep.step());
            dispatch_contacts(self, &contacts);
        }
        trace!(frame = self.frame, steps, "frame done");
    }

    fn run_due_tasks(&mut self) {
        for task in self.scheduler.drain_due(self.clock) {
            match task {
                StageTask::StopDodge => self.runner.stop_dodge(&mut self.world),
            }
        }
    }

    fn sync_actors(&mut self) {
        let scale = self.config.world_to_screen;
        if self.runner.act(&self.world, scale) == ActorStatus::Removed {
            warn!(body = %self.runner.body(), "runner body missing from world");
        }

        let world = &self.world;
        self.actors.retain_mut(|actor| match actor.act(world, scale) {
            ActorStatus::Live => true,
            ActorStatus::Removed => {
                debug!(body = %actor.body(), kind = ?actor.kind(), "actor removed");
                false
            }
        });
    }

    /// Destroy every enemy that left the viewport.
    ///
    /// Expired bodies are collected first and destroyed after the scan.
    /// Each one is replaced before it is destroyed unless the runner is hit.
    fn sweep_out_of_bounds(&mut self) {
        let expired: Vec<BodyHandle> = self
            .world
            .bodies()
            .into_iter()
            .filter(|&body| match (self.world.metadata(body), self.world.position(body)) {
                (Some(metadata), Some(center)) => is_out_of_bounds(metadata, center),
                _ => false,
            })
            .collect();

        for body in expired {
            if !self.runner.is_hit() {
                self.spawn_enemy();
            }
            self.world.destroy_body(body);
            debug!(%body, "destroyed out-of-bounds enemy");
        }
    }

    fn spawn_enemy(&mut self) -> BodyHandle {
        let body = factory::create_enemy(&mut self.world, &self.config, &mut self.rng);
        self.actors
            .push(GameActor::new(body, &self.world, self.config.world_to_screen));
        self.enemies_spawned += 1;
        body
    }

    // -- input --------------------------------------------------------------

    /// A pointer went down at screen `(x, y)`.
    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        self.gestures.pointer_down(x, y);
    }

    /// A vertical drag becomes a dodge (downward) or jump (upward).
    pub fn on_pointer_drag(&mut self, x: f32, y: f32) {
        if let Some(intent) = self.gestures.pointer_drag(x, y) {
            self.apply_intent(intent);
        }
    }

    /// The pointer was released; a dodge ends after `dodge_delay`.
    pub fn on_pointer_up(&mut self, x: f32, y: f32) {
        self.gestures.pointer_up(x, y);
        self.release_dodge();
    }

    /// Forward an intent to the runner.
    ///
    /// An accepted dodge cancels any pending stop-dodge, so a timer from an
    /// earlier release cannot end this dodge early.
    pub fn apply_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Jump => {
                self.runner.jump(&mut self.world);
            }
            Intent::Dodge => {
                if self.runner.dodge(&mut self.world) {
                    self.scheduler.cancel(StageTask::StopDodge);
                }
            }
        }
    }

    /// Schedule the end of the current dodge `dodge_delay` seconds from now.
    /// No-op when the runner is not dodging.
    pub fn release_dodge(&mut self) {
        if self.runner.is_dodging() {
            let due = self.clock + self.config.dodge_delay;
            self.scheduler.schedule(StageTask::StopDodge, due);
            debug!(due, "stop-dodge scheduled");
        }
    }

    // -- accessors ----------------------------------------------------------

    /// The runner and its gameplay flags.
    pub fn runner(&self) -> &PlayerActor {
        &self.runner
    }

    /// Game over: the runner was hit.
    pub fn is_game_over(&self) -> bool {
        self.runner.is_hit()
    }

    /// The physics world.
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Mutable access to the physics world.
    ///
    /// Use sparingly: intents should go through the input methods. Direct
    /// access is meant for setup and testing.
    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    /// The ground body.
    pub fn ground(&self) -> BodyHandle {
        self.ground
    }

    /// Ground and enemy actors. The runner's actor is [`runner`](Self::runner).
    pub fn actors(&self) -> &[GameActor] {
        &self.actors
    }

    /// Live actors including the runner.
    pub fn actor_count(&self) -> usize {
        self.actors.len() + 1
    }

    /// Render views for every live actor, runner last.
    pub fn views(&self) -> Vec<ActorView> {
        self.actors
            .iter()
            .map(GameActor::view)
            .chain(std::iter::once(self.runner.actor().view()))
            .collect()
    }

    /// Live enemy bodies.
    pub fn enemy_count(&self) -> usize {
        self.world.count_kind(EntityKind::Enemy)
    }

    /// Live runner bodies; always one.
    pub fn runner_count(&self) -> usize {
        self.world.count_kind(EntityKind::Runner)
    }

    /// Enemies created since setup, including the first.
    pub fn enemies_spawned(&self) -> u64 {
        self.enemies_spawned
    }

    /// Wall-clock seconds fed to [`act`](Self::act).
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Frames acted so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Physics sub-steps taken so far.
    pub fn steps_taken(&self) -> u64 {
        self.timestep.steps_taken()
    }

    /// Whether a released dodge is waiting to end.
    pub fn is_stop_dodge_pending(&self) -> bool {
        self.scheduler.is_pending(StageTask::StopDodge)
    }

    /// The validated config this stage runs with.
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Everything the renderer and UI read for the current frame.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame: self.frame,
            clock: self.clock,
            sim_time: self.timestep.sim_time(),
            runner: RunnerStatus::from(&self.runner),
            actors: self.views(),
        }
    }
}

impl ContactListener for GameStage {
    fn begin_contact(&mut self, a: ContactParty, b: ContactParty) {
        match classify_contact(a.kind, b.kind) {
            Some(ContactOutcome::RunnerHit) => self.runner.hit(&mut self.world),
            Some(ContactOutcome::RunnerLanded) => self.runner.landed(),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::EnemyVariant;

    #[test]
    fn setup_creates_one_of_each() {
        let stage = GameStage::new(StageConfig::default());
        assert_eq!(stage.runner_count(), 1);
        assert_eq!(stage.enemy_count(), 1);
        assert_eq!(stage.world().count_kind(EntityKind::Ground), 1);
        assert_eq!(stage.actor_count(), 3);
        assert_eq!(stage.enemies_spawned(), 1);
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        let config = StageConfig {
            fixed_step: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            GameStage::try_new(config),
            Err(ConfigError::Invalid { field: "fixed_step", .. })
        ));
    }

    #[test]
    #[should_panic(expected = "invalid stage config")]
    fn new_panics_on_invalid_config() {
        let _ = GameStage::new(StageConfig {
            world_to_screen: -1.0,
            ..Default::default()
        });
    }

    #[test]
    fn out_of_bounds_uses_right_edge() {
        let enemy = EntityMetadata::enemy(EnemyVariant::RunningWide);
        assert!(!is_out_of_bounds(&enemy, Position { x: -0.9, y: 1.5 }));
        assert!(is_out_of_bounds(&enemy, Position { x: -1.1, y: 1.5 }));
    }

    #[test]
    fn ground_and_runner_never_out_of_bounds() {
        let far_left = Position { x: -100.0, y: 0.0 };
        assert!(!is_out_of_bounds(
            &EntityMetadata::Ground {
                width: 25.0,
                height: 2.0
            },
            far_left
        ));
        assert!(!is_out_of_bounds(
            &EntityMetadata::Runner {
                width: 1.0,
                height: 2.0
            },
            far_left
        ));
    }

    #[test]
    fn act_consumes_fixed_steps() {
        let mut stage = GameStage::new(StageConfig::default());
        for _ in 0..10 {
            stage.act(1.0 / 60.0);
        }
        assert_eq!(stage.frame_count(), 10);
        // 10 frames at 60 Hz over 300 Hz steps: ~50 steps.
        assert!((49..=50).contains(&stage.steps_taken()), "{}", stage.steps_taken());
    }

    #[test]
    fn begin_contact_runner_enemy_hits_in_either_order() {
        let mut stage = GameStage::new(StageConfig::default());
        let runner = ContactParty {
            body: stage.runner().body(),
            kind: EntityKind::Runner,
        };
        let enemy_body = stage.actors()[1].body();
        let enemy = ContactParty {
            body: enemy_body,
            kind: EntityKind::Enemy,
        };
        stage.begin_contact(enemy, runner);
        assert!(stage.is_game_over());

        let mut stage = GameStage::new(StageConfig::default());
        stage.begin_contact(runner, enemy);
        assert!(stage.is_game_over());
    }

    #[test]
    fn begin_contact_runner_ground_lands() {
        let mut stage = GameStage::new(StageConfig::default());
        stage.apply_intent(Intent::Jump);
        assert!(stage.runner().is_jumping());

        let ground = ContactParty {
            body: stage.ground(),
            kind: EntityKind::Ground,
        };
        let runner = ContactParty {
            body: stage.runner().body(),
            kind: EntityKind::Runner,
        };
        stage.begin_contact(ground, runner);
        assert!(!stage.runner().is_jumping());
    }

    #[test]
    fn end_contact_changes_nothing() {
        let mut stage = GameStage::new(StageConfig::default());
        let runner = ContactParty {
            body: stage.runner().body(),
            kind: EntityKind::Runner,
        };
        let enemy = ContactParty {
            body: stage.actors()[1].body(),
            kind: EntityKind::Enemy,
        };
        stage.end_contact(runner, enemy);
        assert!(!stage.is_game_over());
    }

    #[test]
    fn release_without_dodge_schedules_nothing() {
        let mut stage = GameStage::new(StageConfig::default());
        stage.on_pointer_down(0.0, 0.0);
        stage.on_pointer_up(0.0, 0.0);
        assert!(!stage.is_stop_dodge_pending());
    }

    #[test]
    fn new_dodge_cancels_pending_stop() {
        let mut stage = GameStage::new(StageConfig::default());
        stage.apply_intent(Intent::Dodge);
        stage.release_dodge();
        assert!(stage.is_stop_dodge_pending());

        stage.apply_intent(Intent::Dodge);
        assert!(!stage.is_stop_dodge_pending());
        for _ in 0..60 {
            stage.act(1.0 / 60.0);
        }
        assert!(stage.runner().is_dodging(), "cancelled timer must not end the new dodge");
    }

    #[test]
    fn rejected_dodge_keeps_pending_stop() {
        let mut stage = GameStage::new(StageConfig::default());
        stage.apply_intent(Intent::Dodge);
        stage.release_dodge();
        stage.runner.hit(&mut stage.world);

        stage.apply_intent(Intent::Dodge);
        assert!(stage.is_stop_dodge_pending());
    }
}
