//! Shape trait and Hit record for ray-primitive intersection.

use whitted_math::{Aabb, Ray, Vec3};

use crate::Material;

/// Distance a hit point is pulled back along the ray so that secondary rays
/// do not re-hit the surface they start on.
pub const HIT_EPSILON: f32 = 1e-4;

/// Padding added to primitive bounds so slab tests never clip a surface hit.
pub const BOUNDS_PADDING: f32 = 1e-4;

/// Record of a ray-primitive intersection.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    /// Point of intersection (after the epsilon adjustment)
    pub position: Vec3,
    /// Surface normal at intersection (always points against the ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
    /// Ray parameter of `position` along the unit-length ray direction
    pub lambda: f32,
    /// Whether the ray arrived on the side the geometric normal points to
    pub front_face: bool,
}

impl<'a> Hit<'a> {
    /// Build a hit at `lambda` along `ray`, orienting `outward_normal`.
    ///
    /// The stored normal always opposes the ray direction, so we track
    /// whether we hit the front or back face separately.
    pub fn resolve(ray: &Ray, lambda: f32, outward_normal: Vec3, material: &'a Material) -> Self {
        let front_face = ray.direction().dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            position: ray.at(lambda),
            normal,
            material,
            lambda,
            front_face,
        }
    }
}

/// Capability shared by every primitive kind.
pub trait Shape {
    /// Axis-aligned bounds of the primitive.
    fn bounds(&self) -> Aabb;

    /// Representative point used to sort primitives during BVH builds.
    fn centroid(&self) -> Vec3;

    /// Nearest intersection in front of the ray origin, if any.
    ///
    /// Implementations normalize the ray first, so `lambda` is a distance.
    fn try_intersect(&self, ray: &Ray) -> Option<Hit<'_>>;

    fn material(&self) -> &Material;
}

/// Normalize a ray for intersection, rejecting zero directions.
#[inline]
pub(crate) fn unit_ray(ray: &Ray) -> Option<Ray> {
    let ray = ray.normalized();
    if ray.direction() == Vec3::ZERO {
        None
    } else {
        Some(ray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_front_face() {
        let material = Material::default();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let hit = Hit::resolve(&ray, 4.0, Vec3::Z, &material);

        assert!(hit.front_face);
        assert_eq!(hit.normal, Vec3::Z);
        assert_eq!(hit.position, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_resolve_back_face_flips_normal() {
        let material = Material::default();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let hit = Hit::resolve(&ray, 1.0, Vec3::Z, &material);

        assert!(!hit.front_face);
        assert_eq!(hit.normal, -Vec3::Z);
        assert!(hit.normal.dot(ray.direction()) < 0.0);
    }

    #[test]
    fn test_unit_ray() {
        let ray = Ray::new(Vec3::ONE, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(unit_ray(&ray).map(|r| r.direction()), Some(Vec3::Y));
        assert!(unit_ray(&Ray::new(Vec3::ONE, Vec3::ZERO)).is_none());
    }
}
