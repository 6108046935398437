//! Builders for the physics world and its three kinds of bodies.
//!
//! Geometry and materials come from the constants in [`crate::config`];
//! only the viewport width and the enemy spawn point are configurable.

use rand::Rng;
use tracing::debug;

use crate::config::{
    StageConfig, ENEMY_DENSITY, GROUND_HEIGHT, GROUND_Y, RUNNER_DENSITY, RUNNER_GRAVITY_SCALE,
    RUNNER_HEIGHT, RUNNER_WIDTH, RUNNER_X, RUNNER_Y, WORLD_GRAVITY,
};
use crate::metadata::{EnemyVariant, EntityMetadata, Position};
use crate::physics::{BodyDesc, BodyHandle, BodyType, PhysicsWorld};

/// An empty world with the game's gravity.
pub fn create_world() -> PhysicsWorld {
    PhysicsWorld::new(WORLD_GRAVITY.0, WORLD_GRAVITY.1)
}

/// The static ground strip spanning the viewport's full width.
pub fn create_ground(world: &mut PhysicsWorld, config: &StageConfig) -> BodyHandle {
    let width = config.viewport_width;
    let desc = BodyDesc::new(
        BodyType::Static,
        Position {
            x: width / 2.0,
            y: GROUND_Y,
        },
        width,
        GROUND_HEIGHT,
    );
    let body = world.create_body(
        &desc,
        EntityMetadata::Ground {
            width,
            height: GROUND_HEIGHT,
        },
    );
    debug!(%body, width, "created ground");
    body
}

/// The runner, standing on the ground at its start point.
///
/// Zero restitution keeps it from bouncing on landing; it never sleeps so
/// intents always act on an awake body.
pub fn create_runner(world: &mut PhysicsWorld) -> BodyHandle {
    let mut desc = BodyDesc::new(
        BodyType::Dynamic,
        Position {
            x: RUNNER_X,
            y: RUNNER_Y,
        },
        RUNNER_WIDTH,
        RUNNER_HEIGHT,
    );
    desc.density = RUNNER_DENSITY;
    desc.gravity_scale = RUNNER_GRAVITY_SCALE;
    desc.restitution = 0.0;
    desc.can_sleep = false;

    let body = world.create_body(
        &desc,
        EntityMetadata::Runner {
            width: RUNNER_WIDTH,
            height: RUNNER_HEIGHT,
        },
    );
    debug!(%body, "created runner");
    body
}

/// An enemy of a random variant entering from the right edge.
pub fn create_enemy<R: Rng + ?Sized>(
    world: &mut PhysicsWorld,
    config: &StageConfig,
    rng: &mut R,
) -> BodyHandle {
    create_enemy_variant(world, config, EnemyVariant::random(rng))
}

/// An enemy of a specific variant entering from the right edge, moving left
/// at constant velocity.
///
/// # Panics
///
/// Panics if the configured spawn point is not a positive, finite x.
pub fn create_enemy_variant(
    world: &mut PhysicsWorld,
    config: &StageConfig,
    variant: EnemyVariant,
) -> BodyHandle {
    let spawn_x = config.enemy_spawn_x;
    assert!(
        spawn_x > 0.0 && spawn_x.is_finite(),
        "enemy spawn x must be positive and finite, got {spawn_x}"
    );

    let metadata = EntityMetadata::enemy(variant);
    let (width, height) = variant.size();
    let mut desc = BodyDesc::new(
        BodyType::Kinematic,
        Position {
            x: spawn_x,
            y: variant.spawn_y(),
        },
        width,
        height,
    );
    desc.density = ENEMY_DENSITY;
    if let EntityMetadata::Enemy {
        linear_velocity, ..
    } = &metadata
    {
        desc.velocity = *linear_velocity;
    }

    let body = world.create_body(&desc, metadata);
    debug!(%body, ?variant, "spawned enemy");
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENEMY_LINEAR_VELOCITY;
    use crate::metadata::EntityKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn ground_spans_viewport() {
        let config = StageConfig::default();
        let mut world = create_world();
        let ground = create_ground(&mut world, &config);
        let meta = world.metadata(ground).unwrap();
        assert_eq!(meta.kind(), EntityKind::Ground);
        assert_eq!(meta.width(), config.viewport_width);
        let pos = world.position(ground).unwrap();
        assert_eq!(pos.x - meta.width() / 2.0, 0.0);
    }

    #[test]
    fn runner_starts_at_start_point() {
        let mut world = create_world();
        let runner = create_runner(&mut world);
        assert_eq!(world.metadata(runner).unwrap().kind(), EntityKind::Runner);
        assert_eq!(
            world.position(runner),
            Some(Position {
                x: RUNNER_X,
                y: RUNNER_Y
            })
        );
    }

    #[test]
    fn runner_stays_on_ground() {
        let config = StageConfig::default();
        let mut world = create_world();
        create_ground(&mut world, &config);
        let runner = create_runner(&mut world);
        for _ in 0..300 {
            world.step(config.fixed_step);
        }
        let pos = world.position(runner).unwrap();
        assert!((pos.y - RUNNER_Y).abs() < 0.05, "runner drifted to y={}", pos.y);
    }

    #[test]
    fn enemy_spawns_at_right_edge_moving_left() {
        let config = StageConfig::default();
        let mut world = create_world();
        let mut rng = Pcg64::seed_from_u64(1);
        let enemy = create_enemy(&mut world, &config, &mut rng);

        let meta = world.metadata(enemy).unwrap().clone();
        let variant = meta.variant().expect("enemy metadata carries a variant");
        let pos = world.position(enemy).unwrap();
        assert_eq!(pos.x, config.enemy_spawn_x);
        assert_eq!(pos.y, variant.spawn_y());

        let vel = world.velocity(enemy).unwrap();
        assert_eq!((vel.dx, vel.dy), ENEMY_LINEAR_VELOCITY);
    }

    #[test]
    fn every_variant_can_spawn() {
        let config = StageConfig::default();
        let mut world = create_world();
        for variant in EnemyVariant::ALL {
            let enemy = create_enemy_variant(&mut world, &config, variant);
            assert_eq!(world.metadata(enemy).unwrap().variant(), Some(variant));
        }
        assert_eq!(world.count_kind(EntityKind::Enemy), EnemyVariant::ALL.len());
    }

    #[test]
    #[should_panic(expected = "enemy spawn x must be positive")]
    fn invalid_spawn_bounds_panic() {
        let config = StageConfig {
            enemy_spawn_x: f32::NAN,
            ..Default::default()
        };
        let mut world = create_world();
        create_enemy_variant(&mut world, &config, EnemyVariant::RunningSmall);
    }
}
