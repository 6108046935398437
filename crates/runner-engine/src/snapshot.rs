//! Per-frame snapshot handed to renderers and UI.
//!
//! A [`FrameSnapshot`] is a plain, serializable copy of what the outside
//! world may read: every live actor's screen rectangle and visual variant,
//! and the runner's state flags. Nothing in it points back into the stage.

use serde::Serialize;

use crate::actor::ActorView;
use crate::player::{PlayerActor, PlayerState};

/// Runner flags for animation selection and the game-over signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunnerStatus {
    /// Coarse state for animation.
    pub state: PlayerState,
    /// Game over.
    pub is_hit: bool,
    /// Lying box active.
    pub is_dodging: bool,
    /// Airborne after a jump.
    pub is_jumping: bool,
    /// Not jumping.
    pub is_grounded: bool,
}

impl From<&PlayerActor> for RunnerStatus {
    fn from(player: &PlayerActor) -> Self {
        Self {
            state: player.state(),
            is_hit: player.is_hit(),
            is_dodging: player.is_dodging(),
            is_jumping: player.is_jumping(),
            is_grounded: player.is_grounded(),
        }
    }
}

/// The readable state of one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    /// Frames acted so far.
    pub frame: u64,
    /// Wall-clock seconds fed to the stage.
    pub clock: f64,
    /// Simulated seconds (`steps * fixed_step`).
    pub sim_time: f64,
    /// Runner flags.
    pub runner: RunnerStatus,
    /// Every live actor, runner last.
    pub actors: Vec<ActorView>,
}

impl FrameSnapshot {
    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::StageConfig;
    use crate::metadata::EntityKind;
    use crate::stage::GameStage;

    #[test]
    fn snapshot_lists_every_actor_with_runner_last() {
        let stage = GameStage::new(StageConfig::default());
        let snap = stage.snapshot();
        assert_eq!(snap.actors.len(), stage.actor_count());
        assert_eq!(snap.actors.last().map(|a| a.kind), Some(EntityKind::Runner));
        assert_eq!(snap.actors[0].kind, EntityKind::Ground);
        assert!(!snap.runner.is_hit);
        assert!(snap.runner.is_grounded);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut stage = GameStage::new(StageConfig::default());
        stage.act(1.0 / 60.0);
        let json = stage.snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["frame"], 1);
        assert_eq!(value["runner"]["state"], "Running");
        let actors = value["actors"].as_array().unwrap();
        assert_eq!(actors.len(), 3);
        let enemy = actors
            .iter()
            .find(|a| a["kind"] == "Enemy")
            .expect("enemy actor in snapshot");
        assert!(enemy["variant"].is_string());
        assert_eq!(enemy["texture_regions"].as_array().unwrap().len(), 2);
    }
}
