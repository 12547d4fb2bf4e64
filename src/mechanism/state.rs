use std::fmt;

use crate::host::DockingState;

/// Deploy lifecycle owned by the mechanism itself.
///
/// Extension playback is tracked separately (see
/// [`FlexMechanism::is_moving`](super::FlexMechanism::is_moving)) because
/// the extend channel can still be running while the phase has already
/// flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Tube retracted.
    #[default]
    Stowed,
    /// Tube extended and under live control.
    Deployed,
    /// Retract requested mid-acquisition; driving all axes to neutral
    /// before the stow animation may start.
    Resetting,
}

impl Phase {
    /// Whether the tube counts as deployed for control and magnet purposes.
    #[must_use]
    pub fn is_deployed(self) -> bool {
        matches!(self, Self::Deployed | Self::Resetting)
    }
}

/// Externally observable mechanism state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MechanismState {
    /// Retracted and idle.
    Stowed,
    /// Extend channel playing forward.
    Extending,
    /// Deployed with no acquisition in progress; holding rest.
    TrackingFree,
    /// Deployed and following a counterpart.
    TrackingEngaged,
    /// Docked; holding the stored pose.
    Mated,
    /// Extend channel playing backward.
    Retracting,
    /// Converging to neutral before stowing.
    Resetting,
}

impl MechanismState {
    /// Derive the observable state from the phase, extension playback and
    /// the host's docking state.
    #[must_use]
    pub fn derive(phase: Phase, moving: bool, docking: &DockingState) -> Self {
        match phase {
            Phase::Resetting => Self::Resetting,
            Phase::Stowed if moving => Self::Retracting,
            Phase::Stowed => Self::Stowed,
            Phase::Deployed if moving => Self::Extending,
            Phase::Deployed if docking.is_docked() => Self::Mated,
            Phase::Deployed if docking.is_acquiring() => Self::TrackingEngaged,
            Phase::Deployed => Self::TrackingFree,
        }
    }
}

/// One-line status shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Extend channel playing in either direction.
    Moving,
    /// Port still attached to its carrier.
    PreAttached,
    /// Ports mated.
    Docked,
    /// Acquiring as the docker.
    Acquiring,
    /// Acquiring as the dockee.
    AcquiringDockee,
    /// Deployed, no acquisition.
    Deployed,
    /// Stowed, no acquisition.
    Retracted,
}

impl Status {
    /// Status for the given flags and docking state. Playback takes
    /// precedence, then the docking state, then the deploy flag.
    #[must_use]
    pub fn derive(moving: bool, deployed: bool, docking: &DockingState) -> Self {
        if moving {
            return Self::Moving;
        }
        match docking {
            DockingState::PreAttached => Self::PreAttached,
            d if d.is_docked() => Self::Docked,
            DockingState::Acquire => Self::Acquiring,
            DockingState::AcquireDockee => Self::AcquiringDockee,
            _ if deployed => Self::Deployed,
            _ => Self::Retracted,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Moving => "Moving",
            Self::PreAttached => "Pre-attached",
            Self::Docked => "Docked",
            Self::Acquiring => "Acquiring",
            Self::AcquiringDockee => "Acquiring (dockee)",
            Self::Deployed => "Deployed",
            Self::Retracted => "Retracted",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resetting_wins_over_everything() {
        let state = MechanismState::derive(
            Phase::Resetting,
            true,
            &DockingState::DockedDocker,
        );
        assert_eq!(state, MechanismState::Resetting);
    }

    #[test]
    fn deployed_state_follows_docking() {
        let derive =
            |d: DockingState| MechanismState::derive(Phase::Deployed, false, &d);
        assert_eq!(derive(DockingState::Ready), MechanismState::TrackingFree);
        assert_eq!(derive(DockingState::Acquire), MechanismState::TrackingEngaged);
        assert_eq!(
            derive(DockingState::AcquireDockee),
            MechanismState::TrackingEngaged
        );
        assert_eq!(derive(DockingState::DockedDockee), MechanismState::Mated);
    }

    #[test]
    fn playback_direction_follows_phase() {
        let ready = DockingState::Ready;
        assert_eq!(
            MechanismState::derive(Phase::Deployed, true, &ready),
            MechanismState::Extending
        );
        assert_eq!(
            MechanismState::derive(Phase::Stowed, true, &ready),
            MechanismState::Retracting
        );
    }

    #[test]
    fn status_precedence() {
        assert_eq!(
            Status::derive(true, true, &DockingState::DockedDocker),
            Status::Moving
        );
        assert_eq!(
            Status::derive(false, false, &DockingState::DockedSameVessel),
            Status::Docked
        );
        assert_eq!(
            Status::derive(false, true, &DockingState::Disabled),
            Status::Deployed
        );
        assert_eq!(
            Status::derive(false, false, &DockingState::Unknown("Odd".into())),
            Status::Retracted
        );
        assert_eq!(Status::AcquiringDockee.to_string(), "Acquiring (dockee)");
    }
}
