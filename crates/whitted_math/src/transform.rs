// Transform utilities for Mat3/Mat4
//
// Small helpers on top of glam used by the intersection code and by the
// geometry builders. glam::Mat4 already provides transform_point3() and
// transform_vector3().

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

/// Determinants with a smaller magnitude are treated as singular.
pub const DETERMINANT_EPSILON: f32 = 1e-10;

/// Extension trait for Mat3 to solve small linear systems.
pub trait Mat3Ext {
    /// Solve `self * x = rhs` for `x`.
    ///
    /// Returns `None` when the matrix is singular or nearly so.
    fn solve(&self, rhs: Vec3) -> Option<Vec3>;
}

impl Mat3Ext for Mat3 {
    fn solve(&self, rhs: Vec3) -> Option<Vec3> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < DETERMINANT_EPSILON {
            return None;
        }

        // Cramer's rule: replace one column at a time with the right-hand side.
        let x = Mat3::from_cols(rhs, self.y_axis, self.z_axis).determinant() / det;
        let y = Mat3::from_cols(self.x_axis, rhs, self.z_axis).determinant() / det;
        let z = Mat3::from_cols(self.x_axis, self.y_axis, rhs).determinant() / det;
        Some(Vec3::new(x, y, z))
    }
}

/// Rotation matrix from yaw (about Y), pitch (about X) and roll (about Z),
/// given in degrees as `(pitch, yaw, roll)` = `(x, y, z)`.
///
/// Roll is applied first, then pitch, then yaw.
pub fn yaw_pitch_roll_degrees(angles: Vec3) -> Mat4 {
    let radians = Vec3::new(
        angles.x.to_radians(),
        angles.y.to_radians(),
        angles.z.to_radians(),
    );
    Mat4::from_quat(Quat::from_euler(
        EulerRot::YXZ,
        radians.y,
        radians.x,
        radians.z,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_solve_identity() {
        let rhs = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Mat3::IDENTITY.solve(rhs), Some(rhs));
    }

    #[test]
    fn test_solve_general_system() {
        let m = Mat3::from_cols(
            Vec3::new(2.0, 0.0, 1.0),
            Vec3::new(1.0, 3.0, 0.0),
            Vec3::new(0.0, 1.0, 4.0),
        );
        let x = Vec3::new(1.0, -2.0, 0.5);
        let rhs = m * x;

        let solved = m.solve(rhs).expect("matrix is invertible");
        assert!(approx_eq(solved, x));
    }

    #[test]
    fn test_solve_singular() {
        // Two identical columns.
        let m = Mat3::from_cols(Vec3::X, Vec3::X, Vec3::Z);
        assert!(m.solve(Vec3::ONE).is_none());
    }

    #[test]
    fn test_yaw_pitch_roll_identity() {
        let mat = yaw_pitch_roll_degrees(Vec3::ZERO);
        assert!(approx_eq(mat.transform_vector3(Vec3::Y), Vec3::Y));
    }

    #[test]
    fn test_yaw_pitch_roll_single_axes() {
        // Yaw of 90 degrees turns +Z into +X.
        let yaw = yaw_pitch_roll_degrees(Vec3::new(0.0, 90.0, 0.0));
        assert!(approx_eq(yaw.transform_vector3(Vec3::Z), Vec3::X));

        // Pitch of 90 degrees turns +Y into +Z.
        let pitch = yaw_pitch_roll_degrees(Vec3::new(90.0, 0.0, 0.0));
        assert!(approx_eq(pitch.transform_vector3(Vec3::Y), Vec3::Z));

        // Roll of 90 degrees turns +X into +Y.
        let roll = yaw_pitch_roll_degrees(Vec3::new(0.0, 0.0, 90.0));
        assert!(approx_eq(roll.transform_vector3(Vec3::X), Vec3::Y));
    }
}
