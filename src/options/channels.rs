use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::frames::Axis;

/// Animation channel names on the host model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct ChannelOptions {
    /// Deploy/stow channel, played forward to extend.
    pub extend: String,
    /// Lateral translation along the tube's X axis.
    pub translate_x: String,
    /// Lateral translation along the tube's Y axis.
    pub translate_y: String,
    /// Tip rotation about the X axis.
    pub rotate_x: String,
    /// Tip rotation about the Y axis.
    pub rotate_y: String,
}

impl ChannelOptions {
    /// Channel that drives the given axis.
    #[must_use]
    pub fn for_axis(&self, axis: Axis) -> &str {
        match axis {
            Axis::TranslateX => &self.translate_x,
            Axis::TranslateY => &self.translate_y,
            Axis::RotateX => &self.rotate_x,
            Axis::RotateY => &self.rotate_y,
        }
    }
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            extend: "Extend".to_owned(),
            translate_x: "TranslateXAxis".to_owned(),
            translate_y: "TranslateYAxis".to_owned(),
            rotate_x: "RotateXAxis".to_owned(),
            rotate_y: "RotateYAxis".to_owned(),
        }
    }
}
