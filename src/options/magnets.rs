use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::host::MagneticParameters;

/// Magnetic-assist values applied while the tube is deployed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Magnets", inline)]
#[serde(default)]
pub struct MagnetOptions {
    /// Attraction force while deployed.
    #[schemars(title = "Force", range(min = 0.0, max = 5.0), extend("step" = 0.05))]
    pub active_force: f32,
    /// Attraction torque while deployed.
    #[schemars(title = "Torque", range(min = 0.0, max = 5.0), extend("step" = 0.05))]
    pub active_torque: f32,
    /// Capture range while deployed.
    #[schemars(title = "Range", range(min = 0.1, max = 5.0), extend("step" = 0.05))]
    pub active_range: f32,
    /// Distance the ports must separate before they may re-engage.
    #[schemars(skip)]
    pub active_re_engage: f32,
}

impl MagnetOptions {
    /// Active parameters with force and torque zeroed when the user has
    /// switched magnets off.
    #[must_use]
    pub fn active(&self, magnets_enabled: bool) -> MagneticParameters {
        let (force, torque) = if magnets_enabled {
            (self.active_force, self.active_torque)
        } else {
            (0.0, 0.0)
        };
        MagneticParameters {
            force,
            torque,
            range: self.active_range,
            re_engage_distance: self.active_re_engage,
        }
    }
}

impl Default for MagnetOptions {
    fn default() -> Self {
        Self {
            active_force: 0.1,
            active_torque: 0.1,
            active_range: 1.0,
            active_re_engage: 1.5,
        }
    }
}
