//! Rigid poses and the handful of vector helpers the solver needs.
//!
//! Frames follow the host convention: local `+Z` is forward, `+Y` is up and
//! `+X` is right.

use glam::{Mat3, Quat, Vec3};

/// Local forward axis.
pub const FORWARD: Vec3 = Vec3::Z;
/// Local up axis.
pub const UP: Vec3 = Vec3::Y;
/// Local right axis.
pub const RIGHT: Vec3 = Vec3::X;

/// Squared length below which a vector is treated as zero.
const DEGENERATE_LENGTH_SQ: f32 = 1.0e-12;

/// World-space position and orientation of a transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World-space origin.
    pub position: Vec3,
    /// World-space orientation.
    pub rotation: Quat,
}

impl Pose {
    /// Pose at the origin with no rotation.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Pose from position and rotation.
    #[must_use]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose at `position` whose forward axis points along `forward` with its
    /// up axis as close to `up` as possible.
    #[must_use]
    pub fn looking(position: Vec3, forward: Vec3, up: Vec3) -> Self {
        Self::new(position, look_rotation(forward, up))
    }

    /// World-space forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * FORWARD
    }

    /// World-space up direction.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.rotation * UP
    }

    /// World-space right direction.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.rotation * RIGHT
    }

    /// Same position, new orientation.
    #[must_use]
    pub fn with_rotation(self, rotation: Quat) -> Self {
        Self { rotation, ..self }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotation taking local forward onto `forward` and local up as close to `up`
/// as the two allow.
///
/// A zero `forward` yields the identity; an `up` parallel to `forward` picks
/// an arbitrary perpendicular up.
#[must_use]
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let f = forward.normalize_or_zero();
    if f == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut right = up.cross(f);
    if right.length_squared() < DEGENERATE_LENGTH_SQ {
        right = f.any_orthonormal_vector();
    }
    let right = right.normalize();
    let true_up = f.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, true_up, f)).normalize()
}

/// Component of `v` along `onto`. Zero when `onto` is degenerate.
#[must_use]
pub fn project(v: Vec3, onto: Vec3) -> Vec3 {
    let len_sq = onto.length_squared();
    if len_sq < DEGENERATE_LENGTH_SQ {
        return Vec3::ZERO;
    }
    onto * (v.dot(onto) / len_sq)
}

/// Unsigned angle between two vectors, in radians. Zero if either vector
/// is degenerate.
#[must_use]
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    a.cross(b).length().atan2(a.dot(b))
}

/// Angle from `from` to `to` in radians, signed by which side of `axis` the
/// turn falls on. A turn exactly in the plane counts as positive.
#[must_use]
pub fn signed_angle(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    let angle = angle_between(from, to);
    if axis.dot(from.cross(to)) < 0.0 {
        -angle
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1.0e-5
    }

    #[test]
    fn identity_axes() {
        let pose = Pose::IDENTITY;
        assert_eq!(pose.forward(), Vec3::Z);
        assert_eq!(pose.up(), Vec3::Y);
        assert_eq!(pose.right(), Vec3::X);
    }

    #[test]
    fn look_rotation_aligns_forward_and_up() {
        let q = look_rotation(Vec3::new(0.0, 0.0, -3.0), Vec3::Y);
        assert!(close(q * FORWARD, -Vec3::Z));
        assert!(close(q * UP, Vec3::Y));
        assert!(close(q * RIGHT, -Vec3::X));

        let q = look_rotation(Vec3::X, Vec3::new(0.0, 1.0, 0.3));
        assert!(close(q * FORWARD, Vec3::X));
        // Up is orthogonalized against forward
        assert!((q * UP).dot(Vec3::X).abs() < 1.0e-5);
    }

    #[test]
    fn look_rotation_survives_parallel_up() {
        let q = look_rotation(Vec3::Y, Vec3::Y);
        assert!(close(q * FORWARD, Vec3::Y));
        assert!(q.is_normalized());
        assert_eq!(look_rotation(Vec3::ZERO, Vec3::Y), Quat::IDENTITY);
    }

    #[test]
    fn project_onto_axis() {
        let v = Vec3::new(1.0, 2.0, 5.0);
        assert_eq!(project(v, Vec3::Z * 2.0), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(project(v, Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn signed_angle_uses_axis_side() {
        let down = -Vec3::Y;
        let a = signed_angle(down, Vec3::X, Vec3::Z);
        let b = signed_angle(down, -Vec3::X, Vec3::Z);
        assert!((a - FRAC_PI_2).abs() < 1.0e-6);
        assert!((b + FRAC_PI_2).abs() < 1.0e-6);
        assert_eq!(signed_angle(down, down * 4.0, Vec3::Z), 0.0);
        assert_eq!(angle_between(Vec3::ZERO, Vec3::X), 0.0);
    }
}
