//! Presentation mirrors of physics bodies.
//!
//! A [`GameActor`] never owns or mutates its body. Every frame it reads the
//! body's center and metadata size and recomputes a screen-space rectangle.
//! When the metadata lookup fails the world has destroyed the body, and the
//! actor reports [`ActorStatus::Removed`] so the stage drops it.

use serde::Serialize;

use crate::metadata::{EnemyVariant, EntityKind};
use crate::physics::{BodyHandle, PhysicsWorld};

/// Axis-aligned rectangle in screen pixels; `(x, y)` is the lower-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScreenRect {
    /// Left edge in pixels.
    pub x: f32,
    /// Bottom edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

/// Outcome of [`GameActor::act`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorStatus {
    Live,
    /// The body is gone; drop this actor.
    Removed,
}

/// Non-owning view of one body.
#[derive(Debug, Clone)]
pub struct GameActor {
    body: BodyHandle,
    kind: EntityKind,
    variant: Option<EnemyVariant>,
    rect: ScreenRect,
    rotation: f32,
}

impl GameActor {
    /// Wrap a freshly created body and compute its first rectangle.
    ///
    /// # Panics
    ///
    /// Panics if `body` is not live in `world`; actors are created right
    /// after their body.
    pub fn new(body: BodyHandle, world: &PhysicsWorld, world_to_screen: f32) -> Self {
        let Some(metadata) = world.metadata(body) else {
            panic!("actor created for destroyed body {body}");
        };
        let mut actor = Self {
            body,
            kind: metadata.kind(),
            variant: metadata.variant(),
            rect: ScreenRect::default(),
            rotation: 0.0,
        };
        actor.act(world, world_to_screen);
        actor
    }

    /// Refresh the rectangle from the body, or report that it is gone.
    pub fn act(&mut self, world: &PhysicsWorld, world_to_screen: f32) -> ActorStatus {
        let (Some(metadata), Some(center)) = (world.metadata(self.body), world.position(self.body))
        else {
            return ActorStatus::Removed;
        };
        let (width, height) = (metadata.width(), metadata.height());
        self.rect = ScreenRect {
            x: world_to_screen * (center.x - width / 2.0),
            y: world_to_screen * (center.y - height / 2.0),
            width: world_to_screen * width,
            height: world_to_screen * height,
        };
        self.rotation = world.rotation(self.body).unwrap_or(0.0);
        ActorStatus::Live
    }

    /// The mirrored body.
    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// Metadata tag of the body, fixed at creation.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The visual variant, for enemies.
    pub fn variant(&self) -> Option<EnemyVariant> {
        self.variant
    }

    /// Rectangle as of the last [`act`](Self::act).
    pub fn rect(&self) -> ScreenRect {
        self.rect
    }

    /// Read-only snapshot for the renderer.
    pub fn view(&self) -> ActorView {
        ActorView {
            body: self.body,
            kind: self.kind,
            rect: self.rect,
            rotation: self.rotation,
            variant: self.variant,
            texture_regions: self
                .variant
                .map(|v| v.texture_regions().to_vec())
                .unwrap_or_default(),
        }
    }
}

/// What a renderer needs to draw one actor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorView {
    /// Body this view was taken from.
    pub body: BodyHandle,
    /// Ground, runner, or enemy.
    pub kind: EntityKind,
    /// Screen-space rectangle.
    pub rect: ScreenRect,
    /// Body rotation in radians.
    pub rotation: f32,
    /// Enemy palette entry; `None` for ground and runner.
    pub variant: Option<EnemyVariant>,
    /// Atlas regions to animate, empty for non-enemies.
    pub texture_regions: Vec<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StageConfig, RUNNER_HEIGHT, RUNNER_WIDTH, RUNNER_X, RUNNER_Y};
    use crate::factory;

    #[test]
    fn rect_is_scaled_from_center_and_size() {
        let mut world = factory::create_world();
        let runner = factory::create_runner(&mut world);
        let actor = GameActor::new(runner, &world, 32.0);

        let rect = actor.rect();
        assert_eq!(rect.x, 32.0 * (RUNNER_X - RUNNER_WIDTH / 2.0));
        assert_eq!(rect.y, 32.0 * (RUNNER_Y - RUNNER_HEIGHT / 2.0));
        assert_eq!(rect.width, 32.0 * RUNNER_WIDTH);
        assert_eq!(rect.height, 32.0 * RUNNER_HEIGHT);
        assert_eq!(actor.kind(), EntityKind::Runner);
        assert_eq!(actor.variant(), None);
    }

    #[test]
    fn rect_follows_moving_body() {
        let config = StageConfig::default();
        let mut world = factory::create_world();
        let enemy =
            factory::create_enemy_variant(&mut world, &config, EnemyVariant::FlyingSmall);
        let mut actor = GameActor::new(enemy, &world, config.world_to_screen);
        let before = actor.rect();

        for _ in 0..30 {
            world.step(config.fixed_step);
        }
        assert_eq!(actor.act(&world, config.world_to_screen), ActorStatus::Live);
        assert!(actor.rect().x < before.x, "enemy actor should move left");
        assert_eq!(actor.rect().y, before.y);
    }

    #[test]
    fn actor_reports_removed_after_body_destroyed() {
        let config = StageConfig::default();
        let mut world = factory::create_world();
        let enemy = factory::create_enemy_variant(&mut world, &config, EnemyVariant::RunningBig);
        let mut actor = GameActor::new(enemy, &world, config.world_to_screen);
        let last = actor.rect();

        world.destroy_body(enemy);
        assert_eq!(actor.act(&world, config.world_to_screen), ActorStatus::Removed);
        // The last known rectangle is left untouched.
        assert_eq!(actor.rect(), last);
    }

    #[test]
    fn enemy_view_carries_variant_textures() {
        let config = StageConfig::default();
        let mut world = factory::create_world();
        let enemy = factory::create_enemy_variant(&mut world, &config, EnemyVariant::FlyingWide);
        let view = GameActor::new(enemy, &world, config.world_to_screen).view();
        assert_eq!(view.kind, EntityKind::Enemy);
        assert_eq!(view.variant, Some(EnemyVariant::FlyingWide));
        assert_eq!(view.texture_regions, vec!["fly_fly1", "fly_fly2"]);
    }

    #[test]
    #[should_panic(expected = "actor created for destroyed body")]
    fn actor_for_dead_body_panics() {
        let mut world = factory::create_world();
        let runner = factory::create_runner(&mut world);
        world.destroy_body(runner);
        let _ = GameActor::new(runner, &world, 32.0);
    }
}
