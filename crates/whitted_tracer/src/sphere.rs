//! Sphere primitive for ray tracing.

use whitted_math::{Aabb, Ray, Vec3};

use crate::hit::{unit_ray, Hit, Shape, BOUNDS_PADDING, HIT_EPSILON};
use crate::Material;

/// A sphere primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero; a sphere
    /// without a positive radius is never hit.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        let clamped = radius.max(0.0);
        if clamped == 0.0 {
            log::warn!("sphere at {center} has radius {radius} and will never be hit");
        }
        Self {
            center,
            radius: clamped,
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Shape for Sphere {
    fn bounds(&self) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        Aabb::new(self.center - rvec, self.center + rvec).padded(BOUNDS_PADDING)
    }

    fn centroid(&self) -> Vec3 {
        self.center
    }

    fn try_intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        if self.radius <= 0.0 {
            return None;
        }
        let ray = unit_ray(ray)?;

        // |O + tD - C|^2 = r^2 with |D| = 1
        let oc = self.center - ray.origin();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let near = h - sqrtd;
        let far = h + sqrtd;

        // Entering: pull the hit back towards the origin. Exiting (origin inside
        // the sphere): push it just past the surface.
        let (root, lambda) = if near > 0.0 {
            (near, near - HIT_EPSILON)
        } else if far > 0.0 {
            (far, far + HIT_EPSILON)
        } else {
            return None;
        };

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(Hit::resolve(&ray, lambda, outward_normal, &self.material))
    }

    fn material(&self) -> &Material {
        &self.material
    }
}
