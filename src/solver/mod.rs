//! Port geometry to target frames.
//!
//! The solver looks at where the counterpart connector sits relative to the
//! tube tip and produces the four frame indices the tracker should drive
//! toward: a lateral offset for the translating stage and a pitch/yaw
//! deflection for the rotating stage.

mod deflection;

use glam::Vec3;

pub use deflection::{clamp_deflection, Deflection};

use crate::frames::{offset_to_frame, AxisFrames, FrameScale};
use crate::geometry::{self, look_rotation, Pose};
use crate::host::DockingHost;
use crate::options::{MechanismOptions, DEFAULT_BASE_TRANSFORM};

/// Off-axis displacement of the counterpart connector, seen from the
/// translation reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LateralOffset {
    /// Signed angle from the base "down" axis to the displacement, radians.
    pub theta: f32,
    /// Length of the displacement, clamped to the travel limit.
    pub distance: f32,
}

impl LateralOffset {
    /// Lateral angle in degrees.
    #[must_use]
    pub fn theta_degrees(&self) -> f32 {
        self.theta.to_degrees()
    }
}

/// Everything one solver pass worked out, kept for telemetry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Lateral offset that drove the translation targets.
    pub lateral: LateralOffset,
    /// Clamped deflection that drove the rotation targets, if the rotation
    /// reference was available.
    pub deflection: Option<Deflection>,
}

/// Converts port geometry into target frames for one mechanism.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSolver {
    max_translate: f32,
    max_rotate: f32,
    translate_scale: FrameScale,
    rotate_scale: FrameScale,
    base_transform: String,
}

impl TargetSolver {
    /// Solver for a mechanism with the given travel limits (meters,
    /// degrees).
    #[must_use]
    pub fn new(max_translate: f32, max_rotate: f32) -> Self {
        Self {
            max_translate,
            max_rotate,
            translate_scale: FrameScale::new(max_translate),
            rotate_scale: FrameScale::new(max_rotate),
            base_transform: DEFAULT_BASE_TRANSFORM.to_owned(),
        }
    }

    /// Same solver, reading "down" from the named base transform.
    #[must_use]
    pub fn with_base_transform(mut self, name: &str) -> Self {
        name.clone_into(&mut self.base_transform);
        self
    }

    /// Solver built from mechanism options.
    #[must_use]
    pub fn from_options(options: &MechanismOptions) -> Self {
        Self::new(options.max_translate, options.max_rotate)
            .with_base_transform(&options.base_transform)
    }

    /// Recompute `targets` from live host geometry.
    ///
    /// Without a counterpart every axis goes neutral. When any transform the
    /// translation step needs is missing, only the translation targets go
    /// neutral and the rotation targets keep their previous values. When
    /// the rotation reference alone is missing, translation goes neutral and
    /// rotation stays at the neutral value written by the translation step.
    pub fn solve<H>(
        &self,
        host: &mut H,
        targets: &mut AxisFrames,
    ) -> Option<Solution>
    where
        H: DockingHost + ?Sized,
    {
        let Some(counterpart) = host.counterpart() else {
            *targets = AxisFrames::NEUTRAL;
            return None;
        };

        let (Some(_), Some(reference), Some(base), Some(other)) = (
            host.connector(),
            host.translation_reference(),
            host.base(&self.base_transform),
            counterpart.connector,
        ) else {
            log::debug!("translation transforms unresolved, centering");
            targets.neutral_translation();
            return None;
        };

        // Face the counterpart so the reference frame never goes stale.
        let facing = look_rotation(-other.forward(), other.up());
        host.set_translation_reference_rotation(facing);
        let reference = reference.with_rotation(facing);

        let lateral =
            self.lateral_offset(&reference, -base.up(), other.position);
        self.apply_translation(&lateral, targets);
        targets.neutral_rotation();

        let Some(rotation_reference) = host.rotation_reference() else {
            log::debug!("rotation reference unresolved, centering");
            targets.neutral_translation();
            return Some(Solution {
                lateral,
                deflection: None,
            });
        };

        let deflection =
            self.apply_rotation(&rotation_reference, reference.forward(), targets);
        Some(Solution {
            lateral,
            deflection: Some(deflection),
        })
    }

    /// Off-axis displacement of `target` from the forward line of
    /// `reference`, measured against the `down` axis.
    #[must_use]
    pub fn lateral_offset(
        &self,
        reference: &Pose,
        down: Vec3,
        target: Vec3,
    ) -> LateralOffset {
        let front = reference.forward();
        let line = target - reference.position;
        let on_axis = reference.position + geometry::project(line, front);
        let off_axis = target - on_axis;

        LateralOffset {
            theta: geometry::signed_angle(down, off_axis, front),
            distance: off_axis.length().min(self.max_translate),
        }
    }

    /// Write the translation targets for a lateral offset.
    ///
    /// The displacement is doubled before conversion so the tip reaches its
    /// travel limit across the whole frame sweep.
    pub fn apply_translation(
        &self,
        lateral: &LateralOffset,
        targets: &mut AxisFrames,
    ) {
        let x = lateral.distance * lateral.theta.sin() * -1.0 * 2.0;
        let y = lateral.distance * lateral.theta.cos() * -1.0 * 2.0;

        targets.translate_x = self.translate_scale.to_frame(x);
        targets.translate_y = self.translate_scale.to_frame(y);
    }

    /// Write the rotation targets for the deflection between the rotation
    /// reference and `dir`. Returns the clamped deflection.
    pub fn apply_rotation(
        &self,
        rotation_reference: &Pose,
        dir: Vec3,
        targets: &mut AxisFrames,
    ) -> Deflection {
        let raw = Deflection::between(rotation_reference, dir);
        let clamped = raw.clamped(self.max_rotate);

        let x = clamped.pitch * -2.0;
        let y = clamped.yaw * -2.0;

        targets.rotate_x = offset_to_frame(self.rotate_scale.saturated_offset(x));
        targets.rotate_y = offset_to_frame(self.rotate_scale.saturated_offset(y));
        clamped
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;
    use crate::frames::{MAX_FRAME, NEUTRAL_FRAME};
    use crate::host::{CounterpartId, DockingState};
    use crate::sim::{SimHost, SimPeer};

    const PEER: CounterpartId = CounterpartId(1);

    /// Peer connector at `position`, facing back toward the origin.
    fn host_with_peer_at(position: Vec3) -> SimHost {
        let mut host = SimHost::new();
        host.add_peer(
            PEER,
            SimPeer::rigid(Pose::looking(position, -Vec3::Z, Vec3::Y)),
        );
        host.attach(PEER);
        host
    }

    #[test]
    fn counterpart_dead_ahead_is_neutral() {
        let solver = TargetSolver::new(0.5, 15.0);
        let mut host = host_with_peer_at(Vec3::new(0.0, 0.0, 5.0));
        let mut targets = AxisFrames {
            translate_x: 3,
            translate_y: 4,
            rotate_x: 5,
            rotate_y: 6,
        };

        let solution = solver.solve(&mut host, &mut targets).unwrap();
        assert_eq!(targets, AxisFrames::NEUTRAL);
        assert_eq!(solution.lateral.distance, 0.0);
    }

    #[test]
    fn reference_is_turned_to_face_counterpart() {
        let solver = TargetSolver::new(0.5, 15.0);
        let mut host = host_with_peer_at(Vec3::new(0.0, 0.0, 5.0));
        host.translation_reference =
            Some(Pose::looking(Vec3::ZERO, Vec3::X, Vec3::Y));
        let mut targets = AxisFrames::NEUTRAL;

        let _ = solver.solve(&mut host, &mut targets);
        let reference = host.translation_reference.unwrap();
        assert!((reference.forward() - Vec3::Z).length() < 1.0e-5);
    }

    #[test]
    fn lateral_distance_over_limit_saturates_at_limit_frame() {
        // Scale of exactly one unit per frame keeps the arithmetic exact.
        let solver = TargetSolver::new(100.0, 15.0);
        let mut host = host_with_peer_at(Vec3::new(0.0, -150.0, 50.0));
        let mut targets = AxisFrames::NEUTRAL;

        let solution = solver.solve(&mut host, &mut targets).unwrap();
        assert_eq!(solution.lateral.distance, 100.0);
        assert!(solution.lateral.theta.abs() < 1.0e-5);
        assert_eq!(targets.translate_x, NEUTRAL_FRAME);
        assert_eq!(targets.translate_y, 0);
    }

    #[test]
    fn sideways_offset_drives_x_with_sign() {
        let solver = TargetSolver::new(100.0, 15.0);
        let mut right = AxisFrames::NEUTRAL;
        let mut left = AxisFrames::NEUTRAL;

        let mut host = host_with_peer_at(Vec3::new(25.0, 0.0, 50.0));
        let _ = solver.solve(&mut host, &mut right);
        let mut host = host_with_peer_at(Vec3::new(-25.0, 0.0, 50.0));
        let _ = solver.solve(&mut host, &mut left);

        assert!((right.translate_x - NEUTRAL_FRAME).abs() >= 49);
        assert_eq!(
            right.translate_x - NEUTRAL_FRAME,
            -(left.translate_x - NEUTRAL_FRAME)
        );
        assert!((right.translate_y - NEUTRAL_FRAME).abs() <= 1);
    }

    #[test]
    fn missing_counterpart_centers_everything() {
        let solver = TargetSolver::new(0.5, 15.0);
        let mut host = SimHost::new();
        let mut targets = AxisFrames {
            translate_x: 0,
            translate_y: 0,
            rotate_x: MAX_FRAME,
            rotate_y: MAX_FRAME,
        };
        assert!(solver.solve(&mut host, &mut targets).is_none());
        assert_eq!(targets, AxisFrames::NEUTRAL);
    }

    #[test]
    fn missing_translation_reference_keeps_rotation_targets() {
        let solver = TargetSolver::new(0.5, 15.0);
        let mut host = host_with_peer_at(Vec3::new(0.3, 0.0, 5.0));
        host.translation_reference = None;
        let mut targets = AxisFrames {
            translate_x: 10,
            translate_y: 20,
            rotate_x: 30,
            rotate_y: 40,
        };

        assert!(solver.solve(&mut host, &mut targets).is_none());
        assert_eq!(targets.translate_x, NEUTRAL_FRAME);
        assert_eq!(targets.translate_y, NEUTRAL_FRAME);
        assert_eq!(targets.rotate_x, 30);
        assert_eq!(targets.rotate_y, 40);
    }

    #[test]
    fn missing_rotation_reference_centers_all_axes() {
        let solver = TargetSolver::new(0.5, 15.0);
        let mut host = host_with_peer_at(Vec3::new(0.3, 0.0, 5.0));
        host.rotation_local = None;
        let mut targets = AxisFrames {
            translate_x: 10,
            translate_y: 20,
            rotate_x: 30,
            rotate_y: 40,
        };

        let solution = solver.solve(&mut host, &mut targets).unwrap();
        assert!(solution.deflection.is_none());
        assert_eq!(targets, AxisFrames::NEUTRAL);
    }

    #[test]
    fn tilted_tip_deflects_rotation_axes() {
        let solver = TargetSolver::new(0.5, 15.0);
        let mut host = host_with_peer_at(Vec3::new(0.0, 0.0, 5.0));
        host.rotation_local = Some(Quat::from_rotation_x(5.0_f32.to_radians()));
        let mut targets = AxisFrames::NEUTRAL;

        let solution = solver.solve(&mut host, &mut targets).unwrap();
        let deflection = solution.deflection.unwrap();
        assert!((deflection.pitch.abs() - 5.0).abs() < 1.0e-3);
        assert!(deflection.yaw.abs() < 1.0e-3);
        assert_ne!(targets.rotate_x, NEUTRAL_FRAME);
        assert_eq!(targets.rotate_y, NEUTRAL_FRAME);
    }

    #[test]
    fn tilt_past_limit_saturates_rotate_frame() {
        // A 25 degree limit makes one frame exactly a quarter degree.
        let solver = TargetSolver::new(0.5, 25.0);
        let mut host = host_with_peer_at(Vec3::new(0.0, 0.0, 5.0));
        host.rotation_local = Some(Quat::from_rotation_x(40.0_f32.to_radians()));
        let mut targets = AxisFrames::NEUTRAL;

        let solution = solver.solve(&mut host, &mut targets).unwrap();
        let deflection = solution.deflection.unwrap();
        assert_eq!(deflection.pitch, 25.0);
        assert!(deflection.yaw.abs() < 1.0e-3);
        assert_eq!(targets.rotate_x, 0);
        assert_eq!(targets.rotate_y, NEUTRAL_FRAME);
    }

    #[test]
    fn combined_tilt_past_limit_keeps_direction() {
        let solver = TargetSolver::new(0.5, 15.0);
        let mut host = host_with_peer_at(Vec3::new(0.0, 0.0, 5.0));
        let tilt = Quat::from_rotation_y(-24.0_f32.to_radians())
            * Quat::from_rotation_x(18.0_f32.to_radians());
        host.rotation_local = Some(tilt);
        let raw = Deflection::between(&host.rotation_reference().unwrap(), Vec3::Z);
        assert!(raw.magnitude() > 15.0);
        let mut targets = AxisFrames::NEUTRAL;

        let solution = solver.solve(&mut host, &mut targets).unwrap();
        let clamped = solution.deflection.unwrap();
        assert!((clamped.magnitude() - 15.0).abs() < 1.0e-3);
        assert!((clamped.yaw / clamped.pitch - raw.yaw / raw.pitch).abs() < 1.0e-3);
        assert_ne!(targets.rotate_x, NEUTRAL_FRAME);
        assert_ne!(targets.rotate_y, NEUTRAL_FRAME);
    }

    #[test]
    fn base_is_looked_up_by_configured_name() {
        let mut host = host_with_peer_at(Vec3::new(0.0, -0.3, 5.0));
        host.base_name = "TubeBase".to_owned();
        let mut targets = AxisFrames::NEUTRAL;

        let stock = TargetSolver::new(0.5, 15.0);
        assert!(stock.solve(&mut host, &mut targets).is_none());
        assert_eq!(targets, AxisFrames::NEUTRAL);

        let options = MechanismOptions {
            base_transform: "TubeBase".to_owned(),
            ..MechanismOptions::default()
        };
        let named = TargetSolver::from_options(&options);
        assert!(named.solve(&mut host, &mut targets).is_some());
        assert!(targets.translate_y < NEUTRAL_FRAME);
    }

    #[test]
    fn docking_state_does_not_affect_geometry() {
        let solver = TargetSolver::new(0.5, 15.0);
        let mut host = host_with_peer_at(Vec3::new(0.0, 0.0, 5.0));
        host.state = DockingState::DockedDocker;
        let mut targets = AxisFrames::NEUTRAL;
        assert!(solver.solve(&mut host, &mut targets).is_some());
    }
}
