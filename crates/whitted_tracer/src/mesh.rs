//! Triangle meshes for boxes and thick walls.
//!
//! Both helpers emit 12 triangles whose front faces point away from the box
//! center, so refraction through closed solids sees consistent normals.

use whitted_math::{yaw_pitch_roll_degrees, Vec3};

use crate::{Material, Triangle};

/// Cube of edge length `side` centered at `position`, rotated about its
/// center by pitch/yaw/roll degrees (`x`, `y`, `z` of `rotation_degrees`).
pub fn cuboid(position: Vec3, side: f32, rotation_degrees: Vec3, material: Material) -> Vec<Triangle> {
    let rotation = yaw_pitch_roll_degrees(rotation_degrees);
    let axes = [
        rotation.transform_vector3(Vec3::X),
        rotation.transform_vector3(Vec3::Y),
        rotation.transform_vector3(Vec3::Z),
    ];
    oriented_box(position, axes, Vec3::splat(side * 0.5), material)
}

/// Wall of `width` × `height` facing `normal`, extruded `thickness` along it
/// (half to each side of `center`). The height runs along `up` projected onto
/// the wall.
pub fn slab(
    center: Vec3,
    normal: Vec3,
    up: Vec3,
    width: f32,
    height: f32,
    thickness: f32,
    material: Material,
) -> Vec<Triangle> {
    let normal = normal.normalize_or_zero();
    let width_dir = up.cross(normal).normalize_or_zero();
    if width_dir == Vec3::ZERO {
        log::warn!("slab at {center}: up {up} is parallel to normal {normal}");
    }
    let height_dir = normal.cross(width_dir);

    oriented_box(
        center,
        [width_dir, height_dir, normal],
        Vec3::new(width, height, thickness) * 0.5,
        material,
    )
}

/// Box spanned by a right-handed orthonormal frame with per-axis half extents.
fn oriented_box(center: Vec3, axes: [Vec3; 3], half: Vec3, material: Material) -> Vec<Triangle> {
    let scaled = [axes[0] * half.x, axes[1] * half.y, axes[2] * half.z];

    // (face axis, u, v) with u × v pointing along the face normal.
    const FACES: [(usize, usize, usize); 3] = [(0, 1, 2), (1, 2, 0), (2, 0, 1)];

    let mut triangles = Vec::with_capacity(12);
    for (n, u, v) in FACES {
        for sign in [1.0f32, -1.0] {
            let face_center = center + scaled[n] * sign;
            // Swapping u and v on the negative face keeps the winding outward.
            let (u, v) = if sign > 0.0 {
                (scaled[u], scaled[v])
            } else {
                (scaled[v], scaled[u])
            };

            let a = face_center - u - v;
            let b = face_center + u - v;
            let c = face_center + u + v;
            let d = face_center - u + v;
            triangles.push(Triangle::from_vertices(a, b, c, material));
            triangles.push(Triangle::from_vertices(a, c, d, material));
        }
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::Shape;

    fn assert_outward(triangles: &[Triangle], center: Vec3) {
        assert_eq!(triangles.len(), 12);
        for tri in triangles {
            let outward = tri.centroid() - center;
            assert!(
                outward.dot(tri.normal()) > 0.0,
                "normal {} points into the box",
                tri.normal()
            );
        }
    }

    #[test]
    fn test_cuboid_normals_point_outward() {
        let center = Vec3::new(1.0, 2.0, -3.0);
        let cube = cuboid(center, 2.0, Vec3::ZERO, Material::default());
        assert_outward(&cube, center);

        let rotated = cuboid(center, 2.0, Vec3::new(30.0, 45.0, 10.0), Material::default());
        assert_outward(&rotated, center);
    }

    #[test]
    fn test_cuboid_extent() {
        let cube = cuboid(Vec3::ZERO, 2.0, Vec3::ZERO, Material::default());
        for tri in &cube {
            for v in tri.vertices() {
                assert!((v.abs() - Vec3::ONE).abs().max_element() < 1e-6);
            }
        }
    }

    #[test]
    fn test_slab_dimensions() {
        let center = Vec3::new(0.0, 0.0, -5.0);
        let wall = slab(center, Vec3::Z, Vec3::Y, 4.0, 2.0, 0.5, Material::default());
        assert_outward(&wall, center);

        let (min, max) = wall.iter().flat_map(|t| t.vertices()).fold(
            (Vec3::INFINITY, Vec3::NEG_INFINITY),
            |(lo, hi), v| (lo.min(v), hi.max(v)),
        );
        let size = max - min;
        assert!((size - Vec3::new(4.0, 2.0, 0.5)).abs().max_element() < 1e-5);
    }
}
