//! Infinite plane primitive.

use whitted_math::{yaw_pitch_roll_degrees, Aabb, Ray, Vec3};

use crate::hit::{unit_ray, Hit, Shape, BOUNDS_PADDING, HIT_EPSILON};
use crate::Material;

/// Rays closer than this to parallel (|D·N|) do not hit a plane.
pub const GRAZING_EPSILON: f32 = 1e-6;

/// An infinite plane through `position` with unit `normal`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    position: Vec3,
    normal: Vec3,
    material: Material,
}

impl Plane {
    pub fn new(position: Vec3, normal: Vec3, material: Material) -> Self {
        let unit = normal.normalize_or_zero();
        if unit == Vec3::ZERO {
            log::warn!("plane at {position} has a zero normal and will never be hit");
        }
        Self {
            position,
            normal: unit,
            material,
        }
    }

    /// Plane whose normal is `(0, -1, 0)` rotated by pitch/yaw/roll degrees
    /// (`x`, `y`, `z` of `rotation_degrees`).
    pub fn from_rotation(position: Vec3, rotation_degrees: Vec3, material: Material) -> Self {
        let normal = yaw_pitch_roll_degrees(rotation_degrees).transform_vector3(-Vec3::Y);
        Self::new(position, normal, material)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Ray parameter where the line of `ray` meets the plane.
    ///
    /// `None` for grazing rays; the sign is not checked. Also returns the
    /// cosine `D·N` so callers can tell which side the ray comes from.
    pub(crate) fn crossing(position: Vec3, normal: Vec3, ray: &Ray) -> Option<(f32, f32)> {
        let denominator = ray.direction().dot(normal);
        if denominator.abs() < GRAZING_EPSILON {
            return None;
        }
        let lambda = normal.dot(position - ray.origin()) / denominator;
        Some((lambda, denominator))
    }
}

impl Shape for Plane {
    /// Unbounded, except along the normal axis for axis-aligned planes.
    fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::UNIVERSE;
        for axis in 0..3 {
            if (self.normal[axis].abs() - 1.0).abs() < f32::EPSILON {
                bounds.min[axis] = self.position[axis] - BOUNDS_PADDING;
                bounds.max[axis] = self.position[axis] + BOUNDS_PADDING;
            }
        }
        bounds
    }

    fn centroid(&self) -> Vec3 {
        self.position
    }

    fn try_intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        let ray = unit_ray(ray)?;
        let (lambda, _) = Self::crossing(self.position, self.normal, &ray)?;
        if lambda <= 0.0 {
            return None;
        }

        Some(Hit::resolve(
            &ray,
            lambda - HIT_EPSILON,
            self.normal,
            &self.material,
        ))
    }

    fn material(&self) -> &Material {
        &self.material
    }
}
