//! Docking lifecycle states as reported by the host.

use std::fmt::{self, Display};

/// Lifecycle state of a docking port.
///
/// Hosts report these as strings; anything unrecognized is carried verbatim
/// in [`DockingState::Unknown`] and treated as inert.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DockingState {
    /// Attached to another part in the editor sense; cannot dock.
    PreAttached,
    /// Docking disabled.
    Disabled,
    /// Idle, free to acquire.
    Ready,
    /// Backing off after an undock.
    Disengage,
    /// Acquiring a target as the active (docker) side.
    Acquire,
    /// Acquiring a target as the passive (dockee) side.
    AcquireDockee,
    /// Docked to another port on the same vessel.
    DockedSameVessel,
    /// Docked as the active side.
    DockedDocker,
    /// Docked as the passive side.
    DockedDockee,
    /// A state string this crate does not know.
    Unknown(String),
}

impl DockingState {
    /// Parse a host state string. Never fails.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "PreAttached" => Self::PreAttached,
            "Disabled" => Self::Disabled,
            "Ready" => Self::Ready,
            "Disengage" => Self::Disengage,
            "Acquire" => Self::Acquire,
            "Acquire (dockee)" => Self::AcquireDockee,
            "Docked (same vessel)" => Self::DockedSameVessel,
            "Docked (docker)" => Self::DockedDocker,
            "Docked (dockee)" => Self::DockedDockee,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// Host string for this state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::PreAttached => "PreAttached",
            Self::Disabled => "Disabled",
            Self::Ready => "Ready",
            Self::Disengage => "Disengage",
            Self::Acquire => "Acquire",
            Self::AcquireDockee => "Acquire (dockee)",
            Self::DockedSameVessel => "Docked (same vessel)",
            Self::DockedDocker => "Docked (docker)",
            Self::DockedDockee => "Docked (dockee)",
            Self::Unknown(s) => s,
        }
    }

    /// Any of the docked variants.
    #[must_use]
    pub fn is_docked(&self) -> bool {
        matches!(
            self,
            Self::DockedSameVessel | Self::DockedDocker | Self::DockedDockee
        )
    }

    /// Either side of target acquisition.
    #[must_use]
    pub fn is_acquiring(&self) -> bool {
        matches!(self, Self::Acquire | Self::AcquireDockee)
    }
}

impl From<&str> for DockingState {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl Display for DockingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_strings() {
        assert_eq!(DockingState::parse("Acquire (dockee)"), DockingState::AcquireDockee);
        assert_eq!(DockingState::from("Docked (docker)"), DockingState::DockedDocker);
        assert_eq!(
            DockingState::parse("Warp Drive"),
            DockingState::Unknown("Warp Drive".to_owned())
        );
    }

    #[test]
    fn host_strings_survive_display() {
        for s in ["PreAttached", "Ready", "Docked (same vessel)", "Acquire"] {
            assert_eq!(DockingState::parse(s).to_string(), s);
        }
    }

    #[test]
    fn classification() {
        assert!(DockingState::DockedSameVessel.is_docked());
        assert!(!DockingState::Acquire.is_docked());
        assert!(DockingState::AcquireDockee.is_acquiring());
        assert!(!DockingState::Ready.is_acquiring());
        assert!(!DockingState::Unknown(String::new()).is_acquiring());
    }
}
