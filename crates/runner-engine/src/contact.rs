//! Contact events and their gameplay meaning.
//!
//! The [`PhysicsWorld`](crate::physics::PhysicsWorld) reports every pair of
//! bodies whose colliders started or stopped touching during a step as a
//! [`ContactEvent`]. A [`ContactListener`] receives those events; the stage
//! is the only listener and turns begin-contacts into runner transitions via
//! [`classify_contact`].

use crate::metadata::EntityKind;
use crate::physics::BodyHandle;

/// One side of a contact: the body and its metadata tag at the time of the
/// step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactParty {
    /// The body whose collider touched.
    pub body: BodyHandle,
    /// Its metadata tag.
    pub kind: EntityKind,
}

/// Whether the colliders began or stopped touching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Begin,
    End,
}

/// A contact between two bodies detected during a physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    /// Began or ended.
    pub phase: ContactPhase,
    /// First party, in rapier's order.
    pub a: ContactParty,
    /// Second party.
    pub b: ContactParty,
}

/// Gameplay consequence of a begin-contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// The runner touched an enemy.
    RunnerHit,
    /// The runner touched the ground.
    RunnerLanded,
}

/// Classify a begin-contact between two body kinds.
///
/// Order-independent: `(Runner, Enemy)` and `(Enemy, Runner)` both yield
/// [`ContactOutcome::RunnerHit`]. Pairs that do not involve the runner are
/// ignored.
pub fn classify_contact(a: EntityKind, b: EntityKind) -> Option<ContactOutcome> {
    match (a, b) {
        (EntityKind::Runner, EntityKind::Enemy) | (EntityKind::Enemy, EntityKind::Runner) => {
            Some(ContactOutcome::RunnerHit)
        }
        (EntityKind::Runner, EntityKind::Ground) | (EntityKind::Ground, EntityKind::Runner) => {
            Some(ContactOutcome::RunnerLanded)
        }
        _ => None,
    }
}

/// Receiver of contact events produced by a physics step.
pub trait ContactListener {
    /// Two bodies started touching.
    fn begin_contact(&mut self, a: ContactParty, b: ContactParty);

    /// Two bodies stopped touching.
    fn end_contact(&mut self, _a: ContactParty, _b: ContactParty) {}
}

/// Deliver a step's events to a listener, in order.
pub fn dispatch_contacts<L: ContactListener + ?Sized>(listener: &mut L, events: &[ContactEvent]) {
    for event in events {
        match event.phase {
            ContactPhase::Begin => listener.begin_contact(event.a, event.b),
            ContactPhase::End => listener.end_contact(event.a, event.b),
        }
    }
}
