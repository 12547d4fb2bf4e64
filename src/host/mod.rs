//! Capability traits the host simulation implements.
//!
//! The mechanism never reaches into the host directly: poses, docking
//! lifecycle, magnet fields and animation playback all go through
//! [`DockingHost`] and [`AnimationPlayer`]. Writes aimed at the paired
//! mechanism are expressed as [`CounterpartCommand`] messages so that each
//! side only ever mutates state it owns.

mod docking_state;

use glam::Quat;
use serde::{Deserialize, Serialize};

pub use docking_state::DockingState;

use crate::geometry::Pose;

/// Attraction parameters of a docking port.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagneticParameters {
    /// Attraction force applied inside capture range.
    pub force: f32,
    /// Attraction torque applied inside capture range.
    pub torque: f32,
    /// Distance at which attraction starts.
    pub range: f32,
    /// Separation required before the port may capture again.
    pub re_engage_distance: f32,
}

impl MagneticParameters {
    /// Copy with force and torque replaced.
    #[must_use]
    pub fn with_force_torque(self, force: f32, torque: f32) -> Self {
        Self {
            force,
            torque,
            ..self
        }
    }
}

impl Default for MagneticParameters {
    /// Stock rigid-port values.
    fn default() -> Self {
        Self {
            force: 2.0,
            torque: 2.0,
            range: 0.5,
            re_engage_distance: 1.0,
        }
    }
}

/// Opaque handle naming the port on the other side of a docking
/// relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CounterpartId(pub u64);

/// Read-only snapshot of the paired port, taken once per query.
#[derive(Debug, Clone, PartialEq)]
pub struct Counterpart {
    /// Identity of the paired port.
    pub id: CounterpartId,
    /// Connector transform, if the host could resolve it.
    pub connector: Option<Pose>,
    /// The paired port's own docking lifecycle state.
    pub state: DockingState,
    /// The paired port's current attraction parameters.
    pub magnets: MagneticParameters,
    /// `Some(deployed)` when the paired port is itself a flexible mechanism,
    /// `None` for a rigid port.
    pub flexible_deployed: Option<bool>,
}

impl Counterpart {
    /// Whether the paired port is a flexible mechanism that is currently
    /// deployed (and will therefore do the tracking itself).
    #[must_use]
    pub fn is_deployed_flexible(&self) -> bool {
        self.flexible_deployed == Some(true)
    }
}

/// Message asking the paired port to change its own attraction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CounterpartCommand {
    /// Replace all four parameters.
    SetMagnets(MagneticParameters),
    /// Replace force and torque only; range and re-engage stay as they are.
    SetForceTorque {
        /// New attraction force.
        force: f32,
        /// New attraction torque.
        torque: f32,
    },
}

impl CounterpartCommand {
    /// Result of applying this command to `current`.
    #[must_use]
    pub fn apply(self, current: MagneticParameters) -> MagneticParameters {
        match self {
            Self::SetMagnets(params) => params,
            Self::SetForceTorque { force, torque } => {
                current.with_force_torque(force, torque)
            }
        }
    }
}

/// Vessel-side services a flexible mechanism needs from its host.
///
/// Pose queries return `None` when the host cannot resolve the transform;
/// the mechanism degrades to neutral targets instead of failing.
pub trait DockingHost {
    /// This port's connector (node) transform.
    fn connector(&self) -> Option<Pose>;

    /// Base transform with the given name; its negated up axis is the
    /// "down" reference for the lateral angle.
    fn base(&self, name: &str) -> Option<Pose>;

    /// Translation reference frame rigidly attached to the moving tip.
    fn translation_reference(&self) -> Option<Pose>;

    /// Re-orient the translation reference frame. Children of that frame
    /// (including the rotation reference) are expected to follow.
    fn set_translation_reference_rotation(&mut self, rotation: Quat);

    /// Rotation reference frame rigidly attached to the moving tip.
    fn rotation_reference(&self) -> Option<Pose>;

    /// Current docking lifecycle state of this port.
    fn docking_state(&self) -> DockingState;

    /// Advance this port's docking state. Only used by the dominance
    /// handshake.
    fn set_docking_state(&mut self, state: DockingState);

    /// Snapshot of the port currently paired with this one, if any.
    fn counterpart(&self) -> Option<Counterpart>;

    /// Deliver a parameter change to the paired port.
    fn send_to_counterpart(
        &mut self,
        id: CounterpartId,
        command: CounterpartCommand,
    );

    /// This port's own attraction parameters.
    fn magnets(&self) -> MagneticParameters;

    /// Replace this port's own attraction parameters.
    fn set_magnets(&mut self, params: MagneticParameters);
}

/// Named-channel animation playback on the host model.
///
/// Calls naming a channel the model does not have must be silently ignored.
pub trait AnimationPlayer {
    /// Whether the model carries the named channel.
    fn has_channel(&self, channel: &str) -> bool;

    /// Set playback speed (negative plays backward, zero freezes).
    fn set_speed(&mut self, channel: &str, speed: f32);

    /// Jump the channel to a normalized time in `[0, 1]`.
    fn set_time(&mut self, channel: &str, normalized_time: f32);

    /// Fade the channel in to full weight over `duration` seconds.
    fn blend(&mut self, channel: &str, duration: f32);

    /// Start the channel as a one-shot clip (no wrap) at full weight.
    fn play_once(&mut self, channel: &str);

    /// Whether the channel is currently advancing or held by a blend.
    fn is_playing(&self, channel: &str) -> bool;

    /// Stop the channel.
    fn stop(&mut self, channel: &str);
}
