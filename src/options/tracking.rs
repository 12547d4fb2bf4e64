use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-tick step sizes and channel blend times.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Tracking", inline)]
#[serde(default)]
pub struct TrackingOptions {
    /// Frames per tick while acquiring a target.
    #[schemars(title = "Tracking Step", range(min = 1, max = 20))]
    pub track_step: u16,
    /// Frames per tick when easing back to neutral outside tracking.
    #[schemars(title = "Rest Step", range(min = 1, max = 20))]
    pub rest_step: u16,
    /// Frames per tick when resetting ahead of a retract.
    #[schemars(title = "Reset Step", range(min = 1, max = 20))]
    pub reset_step: u16,
    /// Blend duration for the translation channels, in seconds.
    #[schemars(skip)]
    pub translate_blend: f32,
    /// Blend duration for the rotation channels, in seconds.
    #[schemars(skip)]
    pub rotate_blend: f32,
}

impl Default for TrackingOptions {
    fn default() -> Self {
        Self {
            track_step: 2,
            rest_step: 1,
            reset_step: 2,
            translate_blend: 0.5,
            rotate_blend: 1.0,
        }
    }
}
