use glam::Vec3;

use crate::geometry::Pose;

/// Pitch/yaw deflection of a direction from a reference frame, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Deflection {
    /// Angle in the reference's up/forward plane.
    pub pitch: f32,
    /// Angle in the reference's right/forward plane.
    pub yaw: f32,
}

impl Deflection {
    /// Deflection of `dir` as seen from `reference`.
    ///
    /// Both angles are measured against the same forward component.
    #[must_use]
    pub fn between(reference: &Pose, dir: Vec3) -> Self {
        let ahead = reference.forward().dot(dir);
        Self {
            pitch: reference.up().dot(dir).atan2(ahead).to_degrees(),
            yaw: reference.right().dot(dir).atan2(ahead).to_degrees(),
        }
    }

    /// Magnitude of the (pitch, yaw) vector.
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        self.pitch.hypot(self.yaw)
    }

    /// This deflection limited to `limit` degrees of combined magnitude.
    #[must_use]
    pub fn clamped(self, limit: f32) -> Self {
        let (pitch, yaw) = clamp_deflection(self.pitch, self.yaw, limit);
        Self { pitch, yaw }
    }
}

/// Limit the (pitch, yaw) vector to `limit`, keeping its direction.
///
/// Vectors already inside the limit come back unchanged.
#[must_use]
pub fn clamp_deflection(pitch: f32, yaw: f32, limit: f32) -> (f32, f32) {
    if pitch.hypot(yaw) <= limit {
        return (pitch, yaw);
    }
    let heading = yaw.atan2(pitch);
    (limit * heading.cos(), limit * heading.sin())
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;

    #[test]
    fn inside_limit_is_untouched() {
        assert_eq!(clamp_deflection(3.0, -4.0, 15.0), (3.0, -4.0));
        assert_eq!(clamp_deflection(0.0, 0.0, 15.0), (0.0, 0.0));
    }

    #[test]
    fn over_limit_keeps_direction() {
        let (pitch, yaw) = clamp_deflection(30.0, 40.0, 15.0);
        assert!((pitch.hypot(yaw) - 15.0).abs() < 1.0e-4);
        assert!((yaw / pitch - 4.0 / 3.0).abs() < 1.0e-4);
        assert!((pitch - 9.0).abs() < 1.0e-4);
        assert!((yaw - 12.0).abs() < 1.0e-4);
    }

    #[test]
    fn over_limit_on_one_axis() {
        let (pitch, yaw) = clamp_deflection(-40.0, 0.0, 10.0);
        assert!((pitch + 10.0).abs() < 1.0e-4);
        assert!(yaw.abs() < 1.0e-4);
    }

    #[test]
    fn aligned_direction_has_no_deflection() {
        let d = Deflection::between(&Pose::IDENTITY, Vec3::Z);
        assert_eq!(d, Deflection::default());
    }

    #[test]
    fn yaw_follows_right_axis() {
        let reference =
            Pose::new(Vec3::ZERO, Quat::from_rotation_y(-10.0_f32.to_radians()));
        let d = Deflection::between(&reference, Vec3::Z);
        assert!(d.pitch.abs() < 1.0e-3);
        assert!((d.yaw.abs() - 10.0).abs() < 1.0e-3);
        assert!((d.magnitude() - 10.0).abs() < 1.0e-3);
    }
}
