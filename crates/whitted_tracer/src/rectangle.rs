//! Bounded planar rectangle primitive.

use whitted_math::{Aabb, Ray, Vec3};

use crate::hit::{unit_ray, Hit, Shape, BOUNDS_PADDING, HIT_EPSILON};
use crate::{Material, Plane};

/// A flat rectangle centered at `position`.
///
/// `width` and `height` are full-length edge vectors; the hit test projects
/// onto them and compares against half their lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    position: Vec3,
    normal: Vec3,
    width: Vec3,
    height: Vec3,
    material: Material,
}

impl Rectangle {
    /// Rectangle from its center and two edge vectors.
    ///
    /// The normal is `width × height`.
    pub fn new(position: Vec3, width: Vec3, height: Vec3, material: Material) -> Self {
        let normal = width.cross(height).normalize_or_zero();
        if normal == Vec3::ZERO {
            log::warn!("rectangle at {position} has no area and will never be hit");
        }
        Self {
            position,
            normal,
            width,
            height,
            material,
        }
    }

    /// Rectangle facing `normal`, oriented so its height runs along `up`
    /// projected onto the rectangle's plane.
    pub fn facing(
        position: Vec3,
        normal: Vec3,
        up: Vec3,
        width: f32,
        height: f32,
        material: Material,
    ) -> Self {
        let normal = normal.normalize_or_zero();
        let width_dir = up.cross(normal).normalize_or_zero();
        let height_dir = normal.cross(width_dir);
        Self::new(position, width_dir * width, height_dir * height, material)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn corners(&self) -> [Vec3; 4] {
        let hw = self.width * 0.5;
        let hh = self.height * 0.5;
        [
            self.position - hw - hh,
            self.position + hw - hh,
            self.position + hw + hh,
            self.position - hw + hh,
        ]
    }

    /// True if `offset` (relative to the center) lies within both half-extents.
    fn within_extents(&self, offset: Vec3) -> bool {
        let within = |edge: Vec3| {
            let half = edge.length() * 0.5;
            offset.dot(edge.normalize_or_zero()).abs() <= half
        };
        within(self.width) && within(self.height)
    }
}

impl Shape for Rectangle {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.corners()).padded(BOUNDS_PADDING)
    }

    fn centroid(&self) -> Vec3 {
        self.position
    }

    fn try_intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        let ray = unit_ray(ray)?;
        let (lambda, cosine) = Plane::crossing(self.position, self.normal, &ray)?;
        if lambda <= 0.0 || !self.within_extents(ray.at(lambda) - self.position) {
            return None;
        }

        // Entering the half-space the normal points into is pulled back,
        // leaving it is pushed through.
        let lambda = if cosine < 0.0 {
            lambda - HIT_EPSILON
        } else {
            lambda + HIT_EPSILON
        };
        Some(Hit::resolve(&ray, lambda, self.normal, &self.material))
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> Rectangle {
        // 4 wide along X, 2 high along Y, facing +Z
        Rectangle::new(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Material::default(),
        )
    }

    #[test]
    fn test_rectangle_normal() {
        assert_eq!(panel().normal(), Vec3::Z);
    }

    #[test]
    fn test_rectangle_hit_inside() {
        let ray = Ray::new(Vec3::new(1.9, 0.9, 0.0), -Vec3::Z);
        let rect = panel();
        let hit = rect.try_intersect(&ray).expect("inside the extents");

        assert!(hit.front_face);
        assert!((hit.lambda - 5.0).abs() < 0.001);
        assert!(hit.lambda < 5.0);
    }

    #[test]
    fn test_rectangle_miss_outside() {
        let beyond_width = Ray::new(Vec3::new(2.1, 0.0, 0.0), -Vec3::Z);
        assert!(panel().try_intersect(&beyond_width).is_none());

        let beyond_height = Ray::new(Vec3::new(0.0, -1.1, 0.0), -Vec3::Z);
        assert!(panel().try_intersect(&beyond_height).is_none());
    }

    #[test]
    fn test_rectangle_exit_pushes_through() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
        let rect = panel();
        let hit = rect.try_intersect(&ray).expect("back side is hit");

        assert!(!hit.front_face);
        assert_eq!(hit.normal, -Vec3::Z);
        assert!(hit.lambda > 5.0);
    }

    #[test]
    fn test_rectangle_grazing_misses() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, -5.0), Vec3::X);
        assert!(panel().try_intersect(&ray).is_none());
    }

    #[test]
    fn test_rectangle_facing() {
        let rect = Rectangle::facing(Vec3::ZERO, Vec3::Z, Vec3::Y, 4.0, 2.0, Material::default());
        assert!((rect.normal() - Vec3::Z).length() < 1e-6);

        let bounds = rect.bounds();
        assert!((bounds.extent().y - 2.0).abs() < 1e-3);
        assert!((bounds.extent().x - 4.0).abs() < 1e-3);
    }
}
