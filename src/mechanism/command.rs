//! Bound actions and which of them a UI should offer.

use std::fmt;
use std::str::FromStr;

/// User-triggerable mechanism action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MechanismCommand {
    /// Extend the tube.
    Deploy,
    /// Retract the tube (after centering if mid-acquisition).
    Retract,
    /// Deploy when stowed, retract when deployed.
    Toggle,
    /// Switch magnetic assist on or off.
    ToggleMagnets,
}

impl MechanismCommand {
    /// Action-group name this command is bound to.
    #[must_use]
    pub fn action_name(self) -> &'static str {
        match self {
            Self::Deploy => "Deploy Tube",
            Self::Retract => "Retract Tube",
            Self::Toggle => "Toggle Tube",
            Self::ToggleMagnets => "Toggle Magnets",
        }
    }
}

impl fmt::Display for MechanismCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_name())
    }
}

/// Action name that matches no [`MechanismCommand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCommandError(pub String);

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mechanism command: {:?}", self.0)
    }
}

impl std::error::Error for ParseCommandError {}

impl FromStr for MechanismCommand {
    type Err = ParseCommandError;

    /// Accepts the action-group names and their short forms, ignoring case
    /// and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deploy tube" | "deploy" => Ok(Self::Deploy),
            "retract tube" | "retract" => Ok(Self::Retract),
            "toggle tube" | "toggle" => Ok(Self::Toggle),
            "toggle magnets" | "magnets" => Ok(Self::ToggleMagnets),
            _ => Err(ParseCommandError(s.to_owned())),
        }
    }
}

/// Which of Deploy/Retract a UI should currently offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandAvailability {
    /// Deploy may be offered.
    pub deploy: bool,
    /// Retract may be offered.
    pub retract: bool,
}

impl CommandAvailability {
    /// Neither command offered.
    pub const NONE: Self = Self {
        deploy: false,
        retract: false,
    };

    /// Whether `command` should be offered. Magnet toggling is always
    /// available.
    #[must_use]
    pub fn allows(self, command: MechanismCommand) -> bool {
        match command {
            MechanismCommand::Deploy => self.deploy,
            MechanismCommand::Retract => self.retract,
            MechanismCommand::Toggle => self.deploy || self.retract,
            MechanismCommand::ToggleMagnets => true,
        }
    }
}
