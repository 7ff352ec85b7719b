// Re-export glam for convenience
pub use glam::*;

// Whitted math types
mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::{yaw_pitch_roll_degrees, Mat3Ext, DETERMINANT_EPSILON};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_reflect() {
        let incoming = Vec3::new(1.0, -1.0, 0.0);
        let normal = Vec3::Y;
        let reflected = incoming - 2.0 * incoming.dot(normal) * normal;
        assert_eq!(reflected, Vec3::new(1.0, 1.0, 0.0));
    }
}
