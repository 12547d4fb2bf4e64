//! Mechanism configuration with TOML support.
//!
//! Travel limits, magnet values, tracking rates and channel names are
//! consolidated here. Options serialize to/from TOML so a host can ship one
//! file per mechanism variant.

mod channels;
mod magnets;
mod mechanism;
mod tracking;

use std::path::Path;

pub use channels::ChannelOptions;
pub use magnets::MagnetOptions;
pub use mechanism::{MechanismOptions, DEFAULT_BASE_TRANSFORM};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use tracking::TrackingOptions;

use crate::error::FlexDockError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[mechanism]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Travel limits.
    pub mechanism: MechanismOptions,
    /// Magnetic-assist values used while deployed.
    pub magnets: MagnetOptions,
    /// Step sizes and blend times.
    pub tracking: TrackingOptions,
    /// Host animation channel names.
    #[schemars(skip)]
    pub channels: ChannelOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Fails on I/O, TOML syntax, or options that do not validate.
    pub fn load(path: &Path) -> Result<Self, FlexDockError> {
        let content = std::fs::read_to_string(path)?;
        let options: Self = toml::from_str(&content)
            .map_err(|e| FlexDockError::OptionsParse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), FlexDockError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FlexDockError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(FlexDockError::Io)
    }

    /// Reject limits and rates that would make the frame mapping degenerate.
    ///
    /// # Errors
    ///
    /// Returns [`FlexDockError::InvalidOptions`] naming the first bad field.
    pub fn validate(&self) -> Result<(), FlexDockError> {
        let m = &self.mechanism;
        if !(m.max_translate.is_finite() && m.max_translate > 0.0) {
            return Err(FlexDockError::InvalidOptions(format!(
                "max_translate must be positive, got {}",
                m.max_translate
            )));
        }
        if !(m.max_rotate.is_finite() && m.max_rotate > 0.0) {
            return Err(FlexDockError::InvalidOptions(format!(
                "max_rotate must be positive, got {}",
                m.max_rotate
            )));
        }
        let t = &self.tracking;
        if t.track_step == 0 || t.rest_step == 0 || t.reset_step == 0 {
            return Err(FlexDockError::InvalidOptions(
                "tracking steps must be at least one frame".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[mechanism]
max_translate = 0.75
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.mechanism.max_translate, 0.75);
        // Everything else should be default
        assert_eq!(opts.mechanism.max_rotate, 15.0);
        assert_eq!(opts.magnets.active_re_engage, 1.5);
        assert_eq!(opts.tracking.track_step, 2);
        assert_eq!(opts.channels.extend, "Extend");
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let mut opts = Options::default();
        assert!(opts.validate().is_ok());

        opts.mechanism.max_rotate = 0.0;
        assert!(matches!(
            opts.validate(),
            Err(FlexDockError::InvalidOptions(_))
        ));

        opts.mechanism.max_rotate = 10.0;
        opts.tracking.rest_step = 0;
        assert!(opts.validate().is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join("flexdock-options-test");
        let path = dir.join("tube.toml");
        let mut opts = Options::default();
        opts.magnets.active_force = 0.4;
        opts.save(&path).unwrap();

        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn disabled_magnets_zero_force_and_torque_only() {
        let magnets = MagnetOptions::default();
        let off = magnets.active(false);
        assert_eq!(off.force, 0.0);
        assert_eq!(off.torque, 0.0);
        assert_eq!(off.range, 1.0);
        assert_eq!(off.re_engage_distance, 1.5);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("mechanism"));
        assert!(props.contains_key("magnets"));
        assert!(props.contains_key("tracking"));
        assert!(!props.contains_key("channels"));

        let mechanism = &props["mechanism"]["properties"];
        assert!(mechanism.get("max_translate").is_some());
        assert!(mechanism.get("base_transform").is_none());
    }
}
