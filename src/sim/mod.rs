//! Standalone host for tests and the demo binary.
//!
//! [`SimHost`] keeps poses, docking state and magnet parameters in plain
//! fields; [`SimAnimator`] advances named channels on an explicit tick.
//! [`SimRig`] bundles one mechanism with both so a test can step it the way
//! a host simulation would.

mod animator;

use glam::Quat;
use rustc_hash::FxHashMap;

pub use animator::{SimAnimator, SimChannel};

use crate::geometry::Pose;
use crate::host::{
    Counterpart, CounterpartCommand, CounterpartId, DockingHost,
    DockingState, MagneticParameters,
};
use crate::mechanism::FlexMechanism;
use crate::options::DEFAULT_BASE_TRANSFORM;

/// A port on another vessel the simulated host can pair with.
#[derive(Debug, Clone, PartialEq)]
pub struct SimPeer {
    /// Connector transform, `None` to simulate an unresolved node.
    pub connector: Option<Pose>,
    /// Docking lifecycle state of the peer.
    pub state: DockingState,
    /// Attraction parameters of the peer.
    pub magnets: MagneticParameters,
    /// `Some(deployed)` for a flexible peer, `None` for a rigid one.
    pub flexible_deployed: Option<bool>,
}

impl SimPeer {
    /// Rigid port with stock magnets at `connector`.
    #[must_use]
    pub fn rigid(connector: Pose) -> Self {
        Self {
            connector: Some(connector),
            state: DockingState::AcquireDockee,
            magnets: MagneticParameters::default(),
            flexible_deployed: None,
        }
    }
}

/// In-memory [`DockingHost`].
#[derive(Debug, Clone)]
pub struct SimHost {
    /// This port's connector.
    pub connector: Option<Pose>,
    /// Base transform.
    pub base: Option<Pose>,
    /// Name the base transform answers to.
    pub base_name: String,
    /// Translation reference frame on the tip.
    pub translation_reference: Option<Pose>,
    /// Rotation reference orientation relative to the translation
    /// reference, `None` when the rotation reference is unresolved.
    pub rotation_local: Option<Quat>,
    /// This port's docking state.
    pub state: DockingState,
    /// This port's attraction parameters.
    pub magnets: MagneticParameters,
    peers: FxHashMap<CounterpartId, SimPeer>,
    attached: Option<CounterpartId>,
    sent: Vec<(CounterpartId, CounterpartCommand)>,
}

impl SimHost {
    /// Host with every transform at the origin and no counterpart.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: Some(Pose::IDENTITY),
            base: Some(Pose::IDENTITY),
            base_name: DEFAULT_BASE_TRANSFORM.to_owned(),
            translation_reference: Some(Pose::IDENTITY),
            rotation_local: Some(Quat::IDENTITY),
            state: DockingState::Ready,
            magnets: MagneticParameters::default(),
            peers: FxHashMap::default(),
            attached: None,
            sent: Vec::new(),
        }
    }

    /// Register a peer port. Replaces any peer with the same id.
    pub fn add_peer(&mut self, id: CounterpartId, peer: SimPeer) {
        let _ = self.peers.insert(id, peer);
    }

    /// Pair with a registered peer.
    pub fn attach(&mut self, id: CounterpartId) {
        self.attached = Some(id);
    }

    /// Drop the current pairing.
    pub fn detach(&mut self) {
        self.attached = None;
    }

    /// Registered peer by id.
    #[must_use]
    pub fn peer(&self, id: CounterpartId) -> Option<&SimPeer> {
        self.peers.get(&id)
    }

    /// Mutable registered peer by id.
    pub fn peer_mut(&mut self, id: CounterpartId) -> Option<&mut SimPeer> {
        self.peers.get_mut(&id)
    }

    /// Every command delivered to a peer so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> &[(CounterpartId, CounterpartCommand)] {
        &self.sent
    }
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

impl DockingHost for SimHost {
    fn connector(&self) -> Option<Pose> {
        self.connector
    }

    fn base(&self, name: &str) -> Option<Pose> {
        if name == self.base_name {
            self.base
        } else {
            None
        }
    }

    fn translation_reference(&self) -> Option<Pose> {
        self.translation_reference
    }

    fn set_translation_reference_rotation(&mut self, rotation: Quat) {
        if let Some(reference) = self.translation_reference.as_mut() {
            reference.rotation = rotation;
        }
    }

    fn rotation_reference(&self) -> Option<Pose> {
        let reference = self.translation_reference?;
        let local = self.rotation_local?;
        Some(reference.with_rotation(reference.rotation * local))
    }

    fn docking_state(&self) -> DockingState {
        self.state.clone()
    }

    fn set_docking_state(&mut self, state: DockingState) {
        self.state = state;
    }

    fn counterpart(&self) -> Option<Counterpart> {
        let id = self.attached?;
        let peer = self.peers.get(&id)?;
        Some(Counterpart {
            id,
            connector: peer.connector,
            state: peer.state.clone(),
            magnets: peer.magnets,
            flexible_deployed: peer.flexible_deployed,
        })
    }

    fn send_to_counterpart(
        &mut self,
        id: CounterpartId,
        command: CounterpartCommand,
    ) {
        if let Some(peer) = self.peers.get_mut(&id) {
            peer.magnets = command.apply(peer.magnets);
        }
        self.sent.push((id, command));
    }

    fn magnets(&self) -> MagneticParameters {
        self.magnets
    }

    fn set_magnets(&mut self, params: MagneticParameters) {
        self.magnets = params;
    }
}

/// One mechanism wired to a simulated host and animator.
#[derive(Debug)]
pub struct SimRig {
    /// The mechanism under test.
    pub mechanism: FlexMechanism,
    /// Its host.
    pub host: SimHost,
    /// Its animation player.
    pub animator: SimAnimator,
}

impl SimRig {
    /// Advance the animator, then run both mechanism passes once.
    pub fn tick(&mut self) {
        self.animator.tick();
        self.mechanism.update(&mut self.host, &self.animator);
        self.mechanism.late_update(&mut self.host, &mut self.animator);
    }

    /// Run `ticks` ticks.
    pub fn run(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Tick until `done` holds or `limit` ticks have elapsed. Returns the
    /// number of ticks taken, or `None` if the limit was hit.
    pub fn run_until(
        &mut self,
        limit: usize,
        mut done: impl FnMut(&Self) -> bool,
    ) -> Option<usize> {
        for taken in 0..=limit {
            if done(self) {
                return Some(taken);
            }
            self.tick();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn commands_reach_the_addressed_peer() {
        let mut host = SimHost::new();
        let id = CounterpartId(7);
        host.add_peer(id, SimPeer::rigid(Pose::IDENTITY));
        host.attach(id);

        host.send_to_counterpart(
            id,
            CounterpartCommand::SetForceTorque {
                force: 0.0,
                torque: 0.0,
            },
        );
        let peer = host.peer(id).unwrap();
        assert_eq!(peer.magnets.force, 0.0);
        assert_eq!(peer.magnets.range, 0.5);
        assert_eq!(host.sent().len(), 1);
    }

    #[test]
    fn rotation_reference_follows_translation_reference() {
        let mut host = SimHost::new();
        host.rotation_local = Some(Quat::from_rotation_x(0.1));
        let turned = Quat::from_rotation_y(1.0);
        host.set_translation_reference_rotation(turned);

        let rotation = host.rotation_reference().unwrap().rotation;
        let expected = turned * Quat::from_rotation_x(0.1);
        assert!(rotation.angle_between(expected) < 1.0e-5);
    }

    #[test]
    fn detached_host_has_no_counterpart() {
        let mut host = SimHost::new();
        let id = CounterpartId(1);
        host.add_peer(id, SimPeer::rigid(Pose::looking(Vec3::Z, -Vec3::Z, Vec3::Y)));
        host.attach(id);
        assert!(host.counterpart().is_some());
        host.detach();
        assert!(host.counterpart().is_none());
        assert!(host.peer(id).is_some());
    }
}
