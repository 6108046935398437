//! Swipe-gesture decoding.
//!
//! The host forwards raw pointer events in screen coordinates (y grows
//! downward). A drag compares the new touch point against the previous one:
//! moving down the screen asks the runner to dodge, moving up asks it to
//! jump.

use serde::{Deserialize, Serialize};

/// A movement request for the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Jump,
    Dodge,
}

/// Tracks the last touch point between pointer events.
#[derive(Debug, Clone, Default)]
pub struct GestureDecoder {
    last_touch: Option<(f32, f32)>,
}

impl GestureDecoder {
    /// A decoder with no touch recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// A pointer went down; the drag baseline starts here.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.last_touch = Some((x, y));
    }

    /// The pointer moved. Returns the intent implied by the vertical motion
    /// since the last event, if any.
    ///
    /// A drag with no prior pointer-down only sets the baseline.
    pub fn pointer_drag(&mut self, x: f32, y: f32) -> Option<Intent> {
        let previous = self.last_touch.replace((x, y));
        let (_, last_y) = previous?;
        let dy = y - last_y;
        if dy > 0.0 {
            Some(Intent::Dodge)
        } else if dy < 0.0 {
            Some(Intent::Jump)
        } else {
            None
        }
    }

    /// The pointer was released.
    pub fn pointer_up(&mut self, x: f32, y: f32) {
        self.last_touch = Some((x, y));
    }

    /// Baseline for the next drag.
    pub fn last_touch(&self) -> Option<(f32, f32)> {
        self.last_touch
    }
}
