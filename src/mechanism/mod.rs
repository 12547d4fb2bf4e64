//! The per-instance flexible docking state machine.
//!
//! A host drives [`FlexMechanism`] with two calls per tick: [`update`]
//! reconciles magnets and the dominance handshake, [`late_update`] picks one
//! control law and writes channel positions. User actions arrive through
//! [`deploy`], [`retract`], [`toggle`], [`toggle_magnets`] or [`execute`].
//!
//! [`update`]: FlexMechanism::update
//! [`late_update`]: FlexMechanism::late_update
//! [`deploy`]: FlexMechanism::deploy
//! [`retract`]: FlexMechanism::retract
//! [`toggle`]: FlexMechanism::toggle
//! [`toggle_magnets`]: FlexMechanism::toggle_magnets
//! [`execute`]: FlexMechanism::execute

mod command;
mod magnets;
mod persist;
mod state;

pub use command::{CommandAvailability, MechanismCommand, ParseCommandError};
pub use magnets::{MagnetCoordinator, Outbox};
pub use persist::PersistedState;
pub use state::{MechanismState, Phase, Status};

use crate::error::FlexDockError;
use crate::frames::{normalized_time, Axis, AxisFrames};
use crate::host::{
    AnimationPlayer, CounterpartCommand, DockingHost, DockingState,
    MagneticParameters,
};
use crate::options::Options;
use crate::solver::{Solution, TargetSolver};

/// Read-out of the mechanism for UI panels and logs.
#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    /// User-facing status line.
    pub status: Status,
    /// Observable state.
    pub state: MechanismState,
    /// Last lateral angle, degrees.
    pub theta_degrees: f32,
    /// Last lateral distance, clamped to the travel limit.
    pub distance: f32,
    /// Frames last written to the channels.
    pub current: AxisFrames,
    /// Frames the tracker is heading for.
    pub target: AxisFrames,
    /// Own attraction force.
    pub magnetic_force: f32,
    /// Own attraction torque.
    pub magnetic_torque: f32,
    /// Magnetic assist switched on.
    pub magnets_enabled: bool,
}

/// Flexible docking mechanism.
#[derive(Debug)]
pub struct FlexMechanism {
    options: Options,
    solver: TargetSolver,
    phase: Phase,
    moving: bool,
    set_rest: bool,
    engaging_dominant: bool,
    magnets_enabled: bool,
    docking: DockingState,
    current: AxisFrames,
    target: AxisFrames,
    own_cached: MagneticParameters,
    coordinator: MagnetCoordinator,
    solution: Option<Solution>,
}

impl FlexMechanism {
    /// Bring a mechanism up on its host, restoring `saved` state.
    ///
    /// The host's current magnet parameters are cached as the stowed
    /// values. A mechanism saved deployed snaps to the extended pose; one
    /// saved while docked also snaps to its stored target frames.
    ///
    /// # Errors
    ///
    /// Returns [`FlexDockError::InvalidOptions`] if `options` fail
    /// validation.
    pub fn start<H, P>(
        options: Options,
        saved: &PersistedState,
        host: &mut H,
        player: &mut P,
    ) -> Result<Self, FlexDockError>
    where
        H: DockingHost + ?Sized,
        P: AnimationPlayer + ?Sized,
    {
        options.validate()?;
        let own_cached = host.magnets();
        let mut mechanism = Self {
            solver: TargetSolver::from_options(&options.mechanism),
            options,
            phase: Phase::Stowed,
            moving: false,
            set_rest: false,
            engaging_dominant: false,
            magnets_enabled: saved.magnets_enabled,
            docking: host.docking_state(),
            current: AxisFrames::NEUTRAL,
            target: saved.targets.clamped(),
            own_cached,
            coordinator: MagnetCoordinator::new(),
            solution: None,
        };

        if !mechanism.magnets_enabled {
            host.set_magnets(own_cached.with_force_torque(0.0, 0.0));
        }

        if saved.deployed {
            mechanism.play_extension(player, 1.0, 1.0);
            mechanism.set_rest = true;
            mechanism.phase = Phase::Deployed;
            host.set_magnets(
                mechanism.options.magnets.active(mechanism.magnets_enabled),
            );
            if mechanism.docking.is_docked() {
                mechanism.current = mechanism.target;
                mechanism.hold_mated(player);
            }
        }

        log::info!(
            "flex mechanism started ({}, {})",
            if saved.deployed { "deployed" } else { "stowed" },
            mechanism.docking
        );
        Ok(mechanism)
    }

    // -- Per-tick passes ----------------------------------------------------

    /// First pass of a tick: magnet bookkeeping, the dominance handshake and
    /// extension playback tracking.
    pub fn update<H, P>(&mut self, host: &mut H, player: &P)
    where
        H: DockingHost + ?Sized,
        P: AnimationPlayer + ?Sized,
    {
        self.docking = host.docking_state();
        let counterpart = host.counterpart();

        for (id, command) in self.coordinator.observe(
            counterpart.as_ref(),
            self.phase.is_deployed(),
            self.magnets_enabled,
            &self.options.magnets,
        ) {
            host.send_to_counterpart(id, command);
        }

        if let Some(other) = &counterpart {
            if self.engaging_dominant
                && other.state == DockingState::AcquireDockee
            {
                log::debug!("counterpart yielded, asserting acquire");
                self.engaging_dominant = false;
                self.set_docking_state(host, DockingState::Acquire);
            }
        }

        if !player.is_playing(&self.options.channels.extend) {
            self.moving = false;
        }
    }

    /// Second pass of a tick: run one control law and write the channels.
    pub fn late_update<H, P>(&mut self, host: &mut H, player: &mut P)
    where
        H: DockingHost + ?Sized,
        P: AnimationPlayer + ?Sized,
    {
        if !self.phase.is_deployed() || self.moving {
            return;
        }

        if self.phase == Phase::Resetting {
            self.rest(player, self.options.tracking.reset_step);
            if self.current.is_neutral() {
                self.stow(host, player);
            }
            return;
        }

        self.docking = host.docking_state();
        match self.docking.clone() {
            DockingState::PreAttached
            | DockingState::Disabled
            | DockingState::Unknown(_) => {}
            DockingState::DockedSameVessel
            | DockingState::DockedDocker
            | DockingState::DockedDockee => self.hold_mated(player),
            DockingState::Acquire => self.track(host, player),
            DockingState::AcquireDockee => self.acquire_as_dockee(host, player),
            DockingState::Ready | DockingState::Disengage => {
                self.rest_if_latched(player);
            }
        }
    }

    // -- Commands -----------------------------------------------------------

    /// Extend the tube. Cancels a pending reset-before-retract, reverses a
    /// running retraction, and is a no-op when already deployed.
    pub fn deploy<H, P>(&mut self, host: &mut H, player: &mut P)
    where
        H: DockingHost + ?Sized,
        P: AnimationPlayer + ?Sized,
    {
        match self.phase {
            Phase::Resetting => {
                log::info!("deploy requested mid-reset, resuming tracking");
                self.phase = Phase::Deployed;
            }
            Phase::Deployed => {}
            Phase::Stowed => {
                log::info!("deploying");
                self.play_extension(player, 1.0, 0.0);
                self.set_rest = true;
                self.phase = Phase::Deployed;
                host.set_magnets(self.options.magnets.active(self.magnets_enabled));
            }
        }
    }

    /// Retract the tube. Mid-acquisition the axes are first walked back to
    /// neutral; otherwise the tube stows immediately.
    pub fn retract<H, P>(&mut self, host: &mut H, player: &mut P)
    where
        H: DockingHost + ?Sized,
        P: AnimationPlayer + ?Sized,
    {
        if self.phase != Phase::Deployed {
            return;
        }
        self.docking = host.docking_state();
        if self.docking.is_acquiring() && !self.current.is_neutral() {
            log::info!("retract requested mid-acquisition, centering first");
            self.phase = Phase::Resetting;
        } else {
            self.stow(host, player);
        }
    }

    /// Deploy when stowed, retract when deployed. A pending reset counts as
    /// stowed, so toggling during it cancels the retract.
    pub fn toggle<H, P>(&mut self, host: &mut H, player: &mut P)
    where
        H: DockingHost + ?Sized,
        P: AnimationPlayer + ?Sized,
    {
        if self.phase == Phase::Deployed {
            self.retract(host, player);
        } else {
            self.deploy(host, player);
        }
    }

    /// Switch magnetic assist on or off, mirroring force and torque onto the
    /// counterpart.
    pub fn toggle_magnets<H>(&mut self, host: &mut H)
    where
        H: DockingHost + ?Sized,
    {
        self.magnets_enabled = !self.magnets_enabled;
        let (force, torque) = match (self.magnets_enabled, self.phase.is_deployed()) {
            (false, _) => (0.0, 0.0),
            (true, true) => (
                self.options.magnets.active_force,
                self.options.magnets.active_torque,
            ),
            (true, false) => (self.own_cached.force, self.own_cached.torque),
        };
        log::info!(
            "magnets {}",
            if self.magnets_enabled { "enabled" } else { "disabled" }
        );

        host.set_magnets(host.magnets().with_force_torque(force, torque));
        if let Some(other) = host.counterpart() {
            host.send_to_counterpart(
                other.id,
                CounterpartCommand::SetForceTorque { force, torque },
            );
        }
    }

    /// Run a bound action.
    pub fn execute<H, P>(
        &mut self,
        command: MechanismCommand,
        host: &mut H,
        player: &mut P,
    ) where
        H: DockingHost + ?Sized,
        P: AnimationPlayer + ?Sized,
    {
        log::debug!("executing {command}");
        match command {
            MechanismCommand::Deploy => self.deploy(host, player),
            MechanismCommand::Retract => self.retract(host, player),
            MechanismCommand::Toggle => self.toggle(host, player),
            MechanismCommand::ToggleMagnets => self.toggle_magnets(host),
        }
    }

    // -- Queries ------------------------------------------------------------

    /// Deploy lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the tube counts as deployed (including a pending reset).
    #[must_use]
    pub fn is_deployed(&self) -> bool {
        self.phase.is_deployed()
    }

    /// Whether the extend channel is animating.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Whether magnetic assist is switched on.
    #[must_use]
    pub fn magnets_enabled(&self) -> bool {
        self.magnets_enabled
    }

    /// Whether this side is waiting for the counterpart to yield dominance.
    #[must_use]
    pub fn is_engaging_dominant(&self) -> bool {
        self.engaging_dominant
    }

    /// Observable state as of the last tick or command.
    #[must_use]
    pub fn state(&self) -> MechanismState {
        MechanismState::derive(self.phase, self.moving, &self.docking)
    }

    /// User-facing status line.
    #[must_use]
    pub fn status(&self) -> Status {
        Status::derive(self.moving, self.phase.is_deployed(), &self.docking)
    }

    /// Which of Deploy/Retract a UI should offer right now.
    #[must_use]
    pub fn availability(&self) -> CommandAvailability {
        if self.docking == DockingState::PreAttached || self.docking.is_docked() {
            return CommandAvailability::NONE;
        }
        let retract = self.phase == Phase::Deployed;
        CommandAvailability {
            deploy: !retract,
            retract,
        }
    }

    /// Frames last written to the channels.
    #[must_use]
    pub fn current_frames(&self) -> AxisFrames {
        self.current
    }

    /// Frames the tracker is heading for.
    #[must_use]
    pub fn target_frames(&self) -> AxisFrames {
        self.target
    }

    /// Last solver output, if the last tracking pass produced one.
    #[must_use]
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Part description for editor tooltips.
    #[must_use]
    pub fn info(&self) -> String {
        format!(
            "Max translation: {:.2}m\nMax rotation: {:.2}°",
            self.options.mechanism.max_translate, self.options.mechanism.max_rotate
        )
    }

    /// Snapshot for UI panels and logs.
    pub fn telemetry<H>(&self, host: &H) -> Telemetry
    where
        H: DockingHost + ?Sized,
    {
        let magnets = host.magnets();
        let (theta_degrees, distance) = self.solution.map_or((0.0, 0.0), |s| {
            (s.lateral.theta_degrees(), s.lateral.distance)
        });
        Telemetry {
            status: self.status(),
            state: self.state(),
            theta_degrees,
            distance,
            current: self.current,
            target: self.target,
            magnetic_force: magnets.force,
            magnetic_torque: magnets.torque,
            magnets_enabled: self.magnets_enabled,
        }
    }

    /// Fields to persist across a save/load cycle.
    #[must_use]
    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            deployed: self.phase.is_deployed(),
            magnets_enabled: self.magnets_enabled,
            targets: self.target,
        }
    }

    // -- Control laws -------------------------------------------------------

    fn acquire_as_dockee<H, P>(&mut self, host: &mut H, player: &mut P)
    where
        H: DockingHost + ?Sized,
        P: AnimationPlayer + ?Sized,
    {
        let Some(other) = host.counterpart() else {
            self.rest_if_latched(player);
            return;
        };
        if other.is_deployed_flexible() {
            self.rest_if_latched(player);
            return;
        }
        if other.state == DockingState::Acquire {
            log::debug!("counterpart acquiring, taking dominance");
            self.engaging_dominant = true;
            self.set_docking_state(host, DockingState::Acquire);
            self.rest_if_latched(player);
            return;
        }
        self.track(host, player);
    }

    fn track<H, P>(&mut self, host: &mut H, player: &mut P)
    where
        H: DockingHost + ?Sized,
        P: AnimationPlayer + ?Sized,
    {
        let solution = self.solver.solve(host, &mut self.target);
        let degraded = solution.is_none_or(|s| s.deflection.is_none());
        let was_whole = self.solution.is_some_and(|s| s.deflection.is_some());
        if degraded && was_whole {
            log::warn!("port geometry unresolved, centering affected axes");
        }
        self.solution = solution;

        let next = self
            .current
            .stepped_toward(&self.target, self.options.tracking.track_step.into());
        self.write_frames(player, next);
    }

    fn hold_mated<P>(&mut self, player: &mut P)
    where
        P: AnimationPlayer + ?Sized,
    {
        self.write_frames(player, self.target);
    }

    fn rest_if_latched<P>(&mut self, player: &mut P)
    where
        P: AnimationPlayer + ?Sized,
    {
        if self.set_rest {
            self.rest(player, self.options.tracking.rest_step);
        }
    }

    fn rest<P>(&mut self, player: &mut P, step: u16)
    where
        P: AnimationPlayer + ?Sized,
    {
        self.target = AxisFrames::NEUTRAL;
        let next = self.current.stepped_toward(&AxisFrames::NEUTRAL, step.into());
        self.write_frames(player, next);
    }

    fn stow<H, P>(&mut self, host: &mut H, player: &mut P)
    where
        H: DockingHost + ?Sized,
        P: AnimationPlayer + ?Sized,
    {
        log::info!("stowing");
        self.set_rest = false;
        for axis in Axis::ALL {
            player.stop(self.options.channels.for_axis(axis));
        }
        self.play_extension(player, -1.0, 1.0);
        self.phase = Phase::Stowed;

        let restored = if self.magnets_enabled {
            self.own_cached
        } else {
            self.own_cached.with_force_torque(0.0, 0.0)
        };
        host.set_magnets(restored);
    }

    // -- Host plumbing ------------------------------------------------------

    fn set_docking_state<H>(&mut self, host: &mut H, state: DockingState)
    where
        H: DockingHost + ?Sized,
    {
        host.set_docking_state(state.clone());
        self.docking = state;
    }

    /// Drive the extend channel. Only restarts the clip when it is not
    /// already running, so a call mid-playback just changes direction.
    fn play_extension<P>(&mut self, player: &mut P, speed: f32, time: f32)
    where
        P: AnimationPlayer + ?Sized,
    {
        let extend = &self.options.channels.extend;
        if !player.has_channel(extend) {
            return;
        }
        player.set_speed(extend, speed);
        if !player.is_playing(extend) {
            player.set_time(extend, time);
            player.play_once(extend);
            self.moving = true;
        }
    }

    /// Write all four axes and remember them as the current frames.
    fn write_frames<P>(&mut self, player: &mut P, frames: AxisFrames)
    where
        P: AnimationPlayer + ?Sized,
    {
        let tracking = &self.options.tracking;
        for axis in Axis::ALL {
            let channel = self.options.channels.for_axis(axis);
            let blend = if axis.is_translation() {
                tracking.translate_blend
            } else {
                tracking.rotate_blend
            };
            player.set_speed(channel, 0.0);
            player.set_time(channel, normalized_time(frames[axis]));
            player.blend(channel, blend);
        }
        self.current = frames;
    }
}
