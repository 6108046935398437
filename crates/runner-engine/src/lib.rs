//! Runner Engine -- simulation core of a side-scrolling avoidance game.
//!
//! A rapier2d world holds three kinds of bodies: the static ground, the
//! player-controlled runner, and enemies that scroll in from the right. The
//! [`GameStage`](stage::GameStage) steps that world on a fixed timestep,
//! replaces enemies that leave the screen, and turns collisions into runner
//! state changes (hit, landed). Swipe gestures drive the runner: up to jump,
//! down to dodge.
//!
//! The crate does no rendering. Each frame it exposes screen-space
//! rectangles for every live body and the runner's flags; see
//! [`FrameSnapshot`](snapshot::FrameSnapshot).
//!
//! # Quick Start
//!
//! ```
//! use runner_engine::prelude::*;
//!
//! let mut stage = GameStage::new(StageConfig::default());
//!
//! // The host forwards pointer events and frame deltas.
//! stage.on_pointer_down(400.0, 200.0);
//! stage.on_pointer_drag(400.0, 230.0); // swipe down: dodge
//! stage.on_pointer_up(400.0, 230.0);
//! assert!(stage.runner().is_dodging());
//!
//! for _ in 0..60 {
//!     stage.act(1.0 / 60.0);
//! }
//! assert!(!stage.runner().is_dodging());
//!
//! for view in stage.views() {
//!     let _ = (view.kind, view.rect, view.variant);
//! }
//! ```

#![deny(unsafe_code)]

pub mod actor;
pub mod config;
pub mod contact;
pub mod factory;
pub mod input;
pub mod metadata;
pub mod physics;
pub mod player;
pub mod schedule;
pub mod snapshot;
pub mod stage;
pub mod timestep;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for hosting a stage.
pub mod prelude {
    pub use crate::actor::{ActorStatus, ActorView, GameActor, ScreenRect};
    pub use crate::config::{ConfigError, StageConfig};
    pub use crate::contact::{
        classify_contact, ContactEvent, ContactListener, ContactOutcome, ContactParty,
        ContactPhase,
    };
    pub use crate::input::{GestureDecoder, Intent};
    pub use crate::metadata::{EnemyVariant, EntityKind, EntityMetadata, Position, Velocity};
    pub use crate::physics::{BodyHandle, PhysicsWorld};
    pub use crate::player::{PlayerActor, PlayerState};
    pub use crate::snapshot::{FrameSnapshot, RunnerStatus};
    pub use crate::stage::{GameStage, StageTask};
    pub use crate::timestep::FixedTimestep;
}
