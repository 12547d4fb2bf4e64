use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Base transform name used when none is configured.
pub const DEFAULT_BASE_TRANSFORM: &str = "DockBase";

/// Physical travel limits of the flexible stage.
///
/// These never change at runtime; they fix the scale between physical
/// displacement and frame index (see [`crate::frames::FrameScale`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Mechanism", inline)]
#[serde(default)]
pub struct MechanismOptions {
    /// Maximum lateral travel of the tip, in meters.
    #[schemars(title = "Max Translation", range(min = 0.01, max = 5.0), extend("step" = 0.01))]
    pub max_translate: f32,
    /// Maximum angular deflection of the tip, in degrees.
    #[schemars(title = "Max Rotation", range(min = 0.5, max = 90.0), extend("step" = 0.5))]
    pub max_rotate: f32,
    /// Name of the host transform whose up axis defines "down" for the
    /// lateral angle.
    #[schemars(skip)]
    pub base_transform: String,
}

impl Default for MechanismOptions {
    fn default() -> Self {
        Self {
            max_translate: 0.5,
            max_rotate: 15.0,
            base_transform: DEFAULT_BASE_TRANSFORM.to_owned(),
        }
    }
}
