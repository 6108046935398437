//! rapier2d physics world with an entity-metadata side table.
//!
//! The [`PhysicsWorld`] owns every rigid body for its whole lifetime. Callers
//! refer to bodies through [`BodyHandle`]s, which are generational: once a
//! body is destroyed its handle never resolves again, even if rapier reuses
//! the slot. Each body carries exactly one [`EntityMetadata`] stored in a
//! side table keyed by handle; a handle whose metadata lookup returns `None`
//! belongs to a destroyed body.
//!
//! Each call to [`PhysicsWorld::step`]:
//!
//! 1. Advances rapier by the given dt.
//! 2. Collects collision start/stop events through a crossbeam channel.
//! 3. Resolves both colliders to bodies and metadata tags, and returns the
//!    pairs as [`ContactEvent`]s in a stable order.

use std::collections::HashMap;
use std::fmt;

use rapier2d::prelude::*;
use serde::Serialize;

use crate::contact::{ContactEvent, ContactParty, ContactPhase};
use crate::metadata::{EntityKind, EntityMetadata, Position, Velocity};

// ---------------------------------------------------------------------------
// BodyHandle
// ---------------------------------------------------------------------------

/// Opaque, copyable reference to a rigid body owned by a [`PhysicsWorld`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

impl BodyHandle {
    /// `(index, generation)` of the underlying rapier handle.
    pub fn raw_parts(self) -> (u32, u32) {
        self.0.into_raw_parts()
    }
}

impl From<RigidBodyHandle> for BodyHandle {
    fn from(handle: RigidBodyHandle) -> Self {
        Self(handle)
    }
}

impl fmt::Debug for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (index, generation) = self.raw_parts();
        write!(f, "BodyHandle({index}v{generation})")
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (index, generation) = self.raw_parts();
        write!(f, "{index}v{generation}")
    }
}

impl Serialize for BodyHandle {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw_parts().serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Body descriptors
// ---------------------------------------------------------------------------

/// How rapier treats a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Simulated by the solver and affected by gravity (the runner).
    Dynamic,
    /// Moves at its set velocity, unaffected by gravity or contacts (enemies).
    Kinematic,
    /// Immovable (the ground).
    Static,
}

/// Everything needed to build one box-shaped body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    /// Dynamic, kinematic, or static.
    pub body_type: BodyType,
    /// Center of the box.
    pub position: Position,
    /// Initial linear velocity.
    pub velocity: Velocity,
    /// Full box width.
    pub width: f32,
    /// Full box height.
    pub height: f32,
    /// Collider density; mass follows from the box area.
    pub density: f32,
    /// Collider friction coefficient.
    pub friction: f32,
    /// 0.0 = no bounce.
    pub restitution: f32,
    /// Gravity multiplier, dynamic bodies only.
    pub gravity_scale: f32,
    /// Whether rapier may put the body to sleep.
    pub can_sleep: bool,
}

impl BodyDesc {
    /// A box of the given type and size with neutral material settings.
    pub fn new(body_type: BodyType, position: Position, width: f32, height: f32) -> Self {
        Self {
            body_type,
            position,
            velocity: Velocity { dx: 0.0, dy: 0.0 },
            width,
            height,
            density: 1.0,
            friction: 0.5,
            restitution: 0.0,
            gravity_scale: 1.0,
            can_sleep: true,
        }
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// A rapier2d simulation plus the body -> metadata side table.
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    metadata: HashMap<RigidBodyHandle, EntityMetadata>,
}

impl PhysicsWorld {
    /// Create an empty world with the given gravity vector.
    pub fn new(gravity_x: f32, gravity_y: f32) -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![gravity_x, gravity_y],
            integration_params: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            metadata: HashMap::new(),
        }
    }

    /// Insert a box body with one collider and attach its metadata.
    pub fn create_body(&mut self, desc: &BodyDesc, metadata: EntityMetadata) -> BodyHandle {
        let translation = vector![desc.position.x, desc.position.y];
        let linvel = vector![desc.velocity.dx, desc.velocity.dy];
        let rb = match desc.body_type {
            BodyType::Dynamic => RigidBodyBuilder::dynamic()
                .translation(translation)
                .linvel(linvel)
                .gravity_scale(desc.gravity_scale)
                .can_sleep(desc.can_sleep)
                .build(),
            BodyType::Kinematic => RigidBodyBuilder::kinematic_velocity_based()
                .translation(translation)
                .linvel(linvel)
                .build(),
            BodyType::Static => RigidBodyBuilder::fixed().translation(translation).build(),
        };
        let handle = self.rigid_body_set.insert(rb);

        let collider = ColliderBuilder::cuboid(desc.width / 2.0, desc.height / 2.0)
            .density(desc.density)
            .friction(desc.friction)
            .restitution(desc.restitution)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        self.metadata.insert(handle, metadata);
        BodyHandle(handle)
    }

    /// Remove a body, its collider, and its metadata.
    ///
    /// Returns the metadata the body carried, or `None` if the handle was
    /// already destroyed.
    pub fn destroy_body(&mut self, body: BodyHandle) -> Option<EntityMetadata> {
        let metadata = self.metadata.remove(&body.0)?;
        self.rigid_body_set.remove(
            body.0,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        Some(metadata)
    }

    /// The metadata of a live body; `None` once the body is destroyed.
    pub fn metadata(&self, body: BodyHandle) -> Option<&EntityMetadata> {
        self.metadata.get(&body.0)
    }

    /// Center of the body.
    pub fn position(&self, body: BodyHandle) -> Option<Position> {
        self.rigid_body_set.get(body.0).map(|rb| {
            let t = rb.translation();
            Position { x: t.x, y: t.y }
        })
    }

    /// Linear velocity of the body.
    pub fn velocity(&self, body: BodyHandle) -> Option<Velocity> {
        self.rigid_body_set.get(body.0).map(|rb| {
            let v = rb.linvel();
            Velocity { dx: v.x, dy: v.y }
        })
    }

    /// Angular velocity in radians per second.
    pub fn angular_velocity(&self, body: BodyHandle) -> Option<f32> {
        self.rigid_body_set.get(body.0).map(|rb| rb.angvel())
    }

    /// Body rotation in radians.
    pub fn rotation(&self, body: BodyHandle) -> Option<f32> {
        self.rigid_body_set.get(body.0).map(|rb| rb.rotation().angle())
    }

    /// Handles of all live bodies, ordered by handle.
    ///
    /// The result is a copy, so callers may destroy bodies while walking it.
    pub fn bodies(&self) -> Vec<BodyHandle> {
        let mut handles: Vec<BodyHandle> = self.metadata.keys().copied().map(BodyHandle).collect();
        handles.sort_by_key(|h| h.raw_parts());
        handles
    }

    /// Number of live bodies.
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Number of live bodies tagged with `kind`.
    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.metadata.values().filter(|m| m.kind() == kind).count()
    }

    /// Apply an instantaneous linear impulse at the center of mass.
    pub fn apply_impulse(&mut self, body: BodyHandle, impulse: (f32, f32)) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.apply_impulse(vector![impulse.0, impulse.1], true);
        }
    }

    /// Apply an instantaneous angular impulse.
    pub fn apply_torque_impulse(&mut self, body: BodyHandle, impulse: f32) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.apply_torque_impulse(impulse, true);
        }
    }

    /// Teleport a body, keeping its velocity and rotation.
    pub fn set_translation(&mut self, body: BodyHandle, position: Position) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.set_translation(vector![position.x, position.y], true);
        }
    }

    /// Replace a body's collision box, moving it upright to `center`.
    ///
    /// The metadata dimensions follow the new box; the metadata tag does not
    /// change.
    pub fn reshape_box(&mut self, body: BodyHandle, width: f32, height: f32, center: Position) {
        let Some(rb) = self.rigid_body_set.get_mut(body.0) else {
            return;
        };
        rb.set_position(Isometry::new(vector![center.x, center.y], 0.0), true);
        rb.set_angvel(0.0, true);

        for collider in rb.colliders().to_vec() {
            if let Some(collider) = self.collider_set.get_mut(collider) {
                collider.set_shape(SharedShape::cuboid(width / 2.0, height / 2.0));
            }
        }
        if let Some(metadata) = self.metadata.get_mut(&body.0) {
            metadata.set_size(width, height);
        }
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Returns the contacts that began or ended during the step. Contacts
    /// involving a collider that no longer belongs to a live body are
    /// dropped.
    pub fn step(&mut self, dt: f64) -> Vec<ContactEvent> {
        assert!(
            dt > 0.0 && dt.is_finite(),
            "physics step must be positive and finite, got {dt}"
        );
        self.integration_params.dt = dt as Real;

        let (collision_send, collision_recv) =
            rapier2d::crossbeam::channel::unbounded::<CollisionEvent>();
        let (force_send, _force_recv) =
            rapier2d::crossbeam::channel::unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &event_handler,
        );

        let mut contacts = Vec::new();
        while let Ok(event) = collision_recv.try_recv() {
            let (phase, h1, h2) = match event {
                CollisionEvent::Started(h1, h2, _) => (ContactPhase::Begin, h1, h2),
                CollisionEvent::Stopped(h1, h2, _) => (ContactPhase::End, h1, h2),
            };
            if let (Some(a), Some(b)) = (self.party_for(h1), self.party_for(h2)) {
                contacts.push(ContactEvent { phase, a, b });
            }
        }

        // Channel delivery order is not stable across runs.
        contacts.sort_by_key(|c| {
            let a = c.a.body.raw_parts();
            let b = c.b.body.raw_parts();
            (c.phase == ContactPhase::Begin, a.min(b), a.max(b))
        });
        contacts
    }

    fn party_for(&self, collider: ColliderHandle) -> Option<ContactParty> {
        let body = self.collider_set.get(collider)?.parent()?;
        let kind = self.metadata.get(&body)?.kind();
        Some(ContactParty {
            body: BodyHandle(body),
            kind,
        })
    }
}
