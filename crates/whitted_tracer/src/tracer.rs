//! Recursive Whitted shading.
//!
//! Local Phong-style lighting with shadow rays that pass through transparent
//! occluders, plus one reflection and one refraction ray per hit, bounded by
//! the recursion depth.

use whitted_math::{Ray, Vec3};

use crate::hit::HIT_EPSILON;
use crate::material::refractive_index;
use crate::{Color, Hit, Scene};

/// Shadow rays give up once less than this fraction of light gets through.
pub const SHADOW_CUTOFF: f32 = 0.01;

/// Step taken past a transparent occluder before the shadow ray continues.
const SHADOW_STEP: f32 = 10.0 * HIT_EPSILON;

/// Distance a refracted ray starts inside the surface it crosses.
const REFRACTION_OFFSET: f32 = 5.0 * HIT_EPSILON;

/// Light reaching a point from a light source after passing occluders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transmission {
    /// Fraction of light that arrives, in `[0, 1]`
    pub factor: f32,
    /// Tint picked up from colored occluders
    pub color: Color,
}

impl Transmission {
    pub const CLEAR: Transmission = Transmission {
        factor: 1.0,
        color: Color::ONE,
    };

    pub const BLOCKED: Transmission = Transmission {
        factor: 0.0,
        color: Color::ZERO,
    };

    pub fn is_blocked(&self) -> bool {
        self.factor <= 0.0
    }
}

/// Color seen along `ray`.
///
/// `depth` counts bounces taken so far; past `max_depth` the background is
/// returned without tracing.
pub fn trace_ray(ray: &Ray, scene: &Scene, depth: u32, max_depth: u32) -> Color {
    if depth > max_depth {
        return scene.background;
    }

    let direction = ray.direction().normalize_or_zero();
    let Some(hit) = scene.nearest_hit(ray) else {
        return scene.background;
    };

    let reflection_dir = reflect(direction, hit.normal).normalize_or_zero();
    let direct = direct_light(scene, &hit, reflection_dir, max_depth);

    let material = hit.material;
    let (n1, n2) = if hit.front_face {
        (refractive_index::VACUUM, material.refraction_index)
    } else {
        (material.refraction_index, refractive_index::VACUUM)
    };
    let cos_theta = (-direction).dot(hit.normal).abs();
    let fresnel = schlick(cos_theta, n1, n2);
    let effective_reflectivity = material.reflectivity * fresnel;

    let refracted = if material.is_transparent() {
        refract(direction, hit.normal, n1 / n2)
    } else {
        None
    };
    let total_internal_reflection = material.is_transparent() && refracted.is_none();

    let reflection = if effective_reflectivity > 0.0 || total_internal_reflection {
        trace_ray(
            &Ray::new(hit.position, reflection_dir),
            scene,
            depth + 1,
            max_depth,
        )
    } else {
        Color::ZERO
    };

    if total_internal_reflection {
        return reflection;
    }

    let mut color = direct;
    if effective_reflectivity > 0.0 {
        color = color.lerp(reflection, effective_reflectivity);
    }

    if let Some(refraction_dir) = refracted {
        let refraction_ray = Ray::new(
            hit.position + refraction_dir * REFRACTION_OFFSET,
            refraction_dir,
        );
        let refraction = trace_ray(&refraction_ray, scene, depth + 1, max_depth);
        color = color.lerp(refraction, material.transparency * (1.0 - fresnel));
    }

    color
}

/// Ambient, emissive and per-light diffuse + specular terms at a hit.
fn direct_light(scene: &Scene, hit: &Hit<'_>, reflection_dir: Vec3, max_depth: u32) -> Color {
    let material = hit.material;
    let mut color = scene.ambient.contribution(material.ambient_color) + material.emissive_color;

    for light in scene.lights() {
        let to_light = light.position - hit.position;
        let distance = to_light.length();
        let light_dir = to_light.normalize_or_zero();

        let diffuse = light_dir.dot(hit.normal);
        if diffuse <= 0.0 {
            continue;
        }

        let shadow = shadow_transmission(scene, hit.position, light.position, max_depth);
        if shadow.is_blocked() {
            continue;
        }

        let specular = reflection_dir.dot(light_dir).max(0.0).powf(material.shininess);
        let attenuation = light.attenuation.factor(distance);

        color += light.color
            * shadow.color
            * shadow.factor
            * attenuation
            * (material.diffuse_color * diffuse + material.specular_color * specular);
    }

    color
}

/// Follow a shadow ray from `point` to `light_position` through transparent
/// occluders.
///
/// Each occluder surface scales the light by its transparency and tints it
/// towards its diffuse color. An opaque surface blocks the light outright.
/// At most `max_depth` surfaces are visited; with `max_depth == 0` no
/// shadow ray is cast and the light is unoccluded.
pub fn shadow_transmission(
    scene: &Scene,
    point: Vec3,
    light_position: Vec3,
    max_depth: u32,
) -> Transmission {
    let to_light = light_position - point;
    let distance = to_light.length();
    let direction = to_light.normalize_or_zero();
    if direction == Vec3::ZERO {
        return Transmission::CLEAR;
    }

    let mut ray = Ray::new(point, direction);
    let mut covered = 0.0;
    let mut transmission = Transmission::CLEAR;

    for _ in 0..max_depth {
        let Some(hit) = scene.nearest_hit(&ray) else {
            break;
        };
        if covered + hit.lambda > distance {
            break;
        }

        let material = hit.material;
        if !material.is_transparent() {
            return Transmission::BLOCKED;
        }

        let tint = 1.0 - material.transparency;
        transmission.factor *= material.transparency;
        transmission.color *= Color::splat(1.0 - tint) + material.diffuse_color * tint;
        if transmission.factor < SHADOW_CUTOFF {
            return Transmission::BLOCKED;
        }

        covered += hit.lambda + SHADOW_STEP;
        ray = Ray::new(hit.position + direction * SHADOW_STEP, direction);
    }

    transmission
}

/// Mirror `direction` about `normal`.
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}

/// Refract unit `direction` through a surface with unit `normal` facing the
/// incoming ray, where `eta = n1 / n2`.
///
/// `None` on total internal reflection.
pub fn refract(direction: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = (-direction).dot(normal);
    let sin_t2 = eta * eta * (1.0 - cos_i * cos_i);
    if sin_t2 >= 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin_t2).sqrt();
    Some((eta * direction + (eta * cos_i - cos_t) * normal).normalize_or_zero())
}

/// Schlick's approximation of Fresnel reflectance.
#[inline]
pub fn schlick(cos_theta: f32, n1: f32, n2: f32) -> f32 {
    let r0 = ((n1 - n2) / (n1 + n2)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos_theta).powi(5)
}
