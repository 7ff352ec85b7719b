//! Closed set of primitive kinds stored in a scene.

use std::fmt;

use whitted_math::{Aabb, Ray, Vec3};

use crate::hit::{unit_ray, Hit, Shape};
use crate::{Material, Plane, Rectangle, Sphere, Triangle};

/// Any primitive the tracer can intersect.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Sphere(Sphere),
    Triangle(Triangle),
    Plane(Plane),
    Rectangle(Rectangle),
}

/// Discriminant of a [`Primitive`], used for scene statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Sphere,
    Triangle,
    Plane,
    Rectangle,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 4] = [
        PrimitiveKind::Sphere,
        PrimitiveKind::Triangle,
        PrimitiveKind::Plane,
        PrimitiveKind::Rectangle,
    ];
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::Sphere => "sphere",
            PrimitiveKind::Triangle => "triangle",
            PrimitiveKind::Plane => "plane",
            PrimitiveKind::Rectangle => "rectangle",
        };
        f.write_str(name)
    }
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Sphere(_) => PrimitiveKind::Sphere,
            Primitive::Triangle(_) => PrimitiveKind::Triangle,
            Primitive::Plane(_) => PrimitiveKind::Plane,
            Primitive::Rectangle(_) => PrimitiveKind::Rectangle,
        }
    }

    #[inline]
    fn shape(&self) -> &dyn Shape {
        match self {
            Primitive::Sphere(s) => s,
            Primitive::Triangle(t) => t,
            Primitive::Plane(p) => p,
            Primitive::Rectangle(r) => r,
        }
    }
}

impl Shape for Primitive {
    fn bounds(&self) -> Aabb {
        self.shape().bounds()
    }

    fn centroid(&self) -> Vec3 {
        self.shape().centroid()
    }

    fn try_intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        self.shape().try_intersect(ray)
    }

    fn material(&self) -> &Material {
        self.shape().material()
    }
}

impl From<Sphere> for Primitive {
    fn from(s: Sphere) -> Self {
        Primitive::Sphere(s)
    }
}

impl From<Triangle> for Primitive {
    fn from(t: Triangle) -> Self {
        Primitive::Triangle(t)
    }
}

impl From<Plane> for Primitive {
    fn from(p: Plane) -> Self {
        Primitive::Plane(p)
    }
}

impl From<Rectangle> for Primitive {
    fn from(r: Rectangle) -> Self {
        Primitive::Rectangle(r)
    }
}

/// Brute-force nearest hit over every primitive.
///
/// Ties keep the earliest primitive in slice order.
pub fn nearest_hit_linear<'a>(primitives: &'a [Primitive], ray: &Ray) -> Option<Hit<'a>> {
    let ray = unit_ray(ray)?;
    let mut best: Option<Hit<'a>> = None;

    for primitive in primitives {
        if let Some(hit) = primitive.try_intersect(&ray) {
            if best.map_or(true, |b| hit.lambda < b.lambda) {
                best = Some(hit);
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primitives() -> Vec<Primitive> {
        vec![
            Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, Material::default()).into(),
            Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, Material::new(Vec3::X)).into(),
            Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, Material::default()).into(),
        ]
    }

    #[test]
    fn test_nearest_hit_linear_picks_closest() {
        let prims = primitives();
        let hit = nearest_hit_linear(&prims, &Ray::new(Vec3::ZERO, -Vec3::Z)).expect("hits");

        assert!((hit.lambda - 4.0).abs() < 1e-3);
        assert_eq!(hit.material.diffuse_color, Vec3::X);
    }

    #[test]
    fn test_nearest_hit_linear_plane() {
        let prims = primitives();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 1.0));
        let hit = nearest_hit_linear(&prims, &ray).expect("floor");

        assert_eq!(hit.normal, Vec3::Y);
        assert!((hit.lambda - 2f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn test_nearest_hit_linear_empty_and_zero_dir() {
        assert!(nearest_hit_linear(&[], &Ray::new(Vec3::ZERO, Vec3::X)).is_none());
        assert!(nearest_hit_linear(&primitives(), &Ray::new(Vec3::ZERO, Vec3::ZERO)).is_none());
    }

    #[test]
    fn test_primitive_kind() {
        let prims = primitives();
        assert_eq!(prims[0].kind(), PrimitiveKind::Sphere);
        assert_eq!(prims[2].kind(), PrimitiveKind::Plane);
        assert_eq!(PrimitiveKind::Rectangle.to_string(), "rectangle");
    }
}
