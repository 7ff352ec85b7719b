//! Triangle primitive for ray tracing.
//!
//! The ray is written as `O + λD = P + τV + μW` (with `P` the triangle origin
//! and `V`, `W` its edges) and the resulting 3×3 system is solved directly.

use whitted_math::{Aabb, Mat3, Mat3Ext, Ray, Vec3};

use crate::hit::{unit_ray, Hit, Shape, BOUNDS_PADDING, HIT_EPSILON};
use crate::Material;

/// A triangle spanned by two edges from an origin vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    origin: Vec3,
    edge_v: Vec3,
    edge_w: Vec3,
    /// Pre-computed face normal (unit length, or zero for degenerate triangles)
    normal: Vec3,
    material: Material,
}

/// Solution of the ray/triangle system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barycentric {
    /// Distance along the unit-length ray direction
    pub lambda: f32,
    /// Weight of `edge_v`
    pub tau: f32,
    /// Weight of `edge_w`
    pub mu: f32,
}

impl Barycentric {
    /// True when the solution lies in front of the ray and inside the triangle.
    pub fn is_inside(&self) -> bool {
        self.lambda > 0.0 && self.tau >= 0.0 && self.mu >= 0.0 && self.tau + self.mu <= 1.0
    }
}

impl Triangle {
    /// Create a triangle from an origin vertex and two edges.
    ///
    /// The front face is the side from which `origin, origin + v, origin + w`
    /// appear counter-clockwise.
    pub fn new(origin: Vec3, edge_v: Vec3, edge_w: Vec3, material: Material) -> Self {
        let normal = edge_v.cross(edge_w).normalize_or_zero();
        if normal == Vec3::ZERO {
            log::warn!("degenerate triangle at {origin}: edges {edge_v} and {edge_w} are parallel");
        }
        Self {
            origin,
            edge_v,
            edge_w,
            normal,
            material,
        }
    }

    /// Create a triangle with a pre-computed normal (e.g. from an imported mesh).
    pub fn with_normal(
        origin: Vec3,
        edge_v: Vec3,
        edge_w: Vec3,
        normal: Vec3,
        material: Material,
    ) -> Self {
        Self {
            origin,
            edge_v,
            edge_w,
            normal: normal.normalize_or_zero(),
            material,
        }
    }

    /// Create a triangle from three vertices.
    pub fn from_vertices(a: Vec3, b: Vec3, c: Vec3, material: Material) -> Self {
        Self::new(a, b - a, c - a, material)
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [
            self.origin,
            self.origin + self.edge_v,
            self.origin + self.edge_w,
        ]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Solve for the ray parameter and edge weights.
    ///
    /// Returns `None` when the system is singular (ray parallel to the
    /// triangle, or a degenerate triangle). The result is not range-checked.
    pub fn solve(&self, ray: &Ray) -> Option<Barycentric> {
        let ray = unit_ray(ray)?;
        let a = Mat3::from_cols(ray.direction(), -self.edge_v, -self.edge_w);
        let x = a.solve(self.origin - ray.origin())?;

        Some(Barycentric {
            lambda: x.x,
            tau: x.y,
            mu: x.z,
        })
    }
}

impl Shape for Triangle {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices()).padded(BOUNDS_PADDING)
    }

    fn centroid(&self) -> Vec3 {
        self.origin + (self.edge_v + self.edge_w) / 3.0
    }

    fn try_intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        let ray = unit_ray(ray)?;
        let solution = self.solve(&ray)?;
        if !solution.is_inside() {
            return None;
        }

        // Back-face hits get the flipped normal so refraction through
        // double-sided sheets bends the right way.
        Some(Hit::resolve(
            &ray,
            solution.lambda - HIT_EPSILON,
            self.normal,
            &self.material,
        ))
    }

    fn material(&self) -> &Material {
        &self.material
    }
}
