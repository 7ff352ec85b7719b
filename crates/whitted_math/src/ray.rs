use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// The direction is not required to be unit length. Intersection code works on
/// [`Ray::normalized`] so that ray parameters are distances.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray with a unit-length direction.
    ///
    /// A zero direction is left as is (`normalize_or_zero`), which every
    /// intersection routine then reports as a miss.
    #[inline]
    pub fn normalized(&self) -> Ray {
        Ray::new(self.origin, self.direction.normalize_or_zero())
    }

    /// The same direction, starting `distance` further along the ray.
    #[inline]
    pub fn advanced(&self, distance: f32) -> Ray {
        Ray::new(self.at(distance), self.direction)
    }
}
