//! Surface material for Whitted-style shading.

use serde::{Deserialize, Serialize};
use whitted_math::Vec3;

/// Color type alias (linear RGB, components may exceed 1).
pub type Color = Vec3;

/// Refractive indices of common media.
pub mod refractive_index {
    pub const VACUUM: f32 = 1.0;
    pub const AIR: f32 = 1.000_293;
    pub const ICE: f32 = 1.31;
    pub const WATER: f32 = 1.333;
    pub const GLASS: f32 = 1.5;
    pub const DIAMOND: f32 = 2.42;
    /// Large enough that Schlick's reflectance is ~1 at every angle.
    pub const MIRROR: f32 = 1.0e6;
}

/// Lowest refractive index accepted; keeps `n1 / n2` finite.
const MIN_REFRACTION_INDEX: f32 = 1e-3;

/// Material properties consumed by the tracer.
///
/// - `reflectivity` and `transparency` are in `[0, 1]`
/// - `shininess` is a Phong exponent, `>= 0`
/// - `refraction_index` is `> 0`
///
/// Deserialized materials go through the same clamps as the builders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "MaterialFields")]
pub struct Material {
    pub diffuse_color: Color,
    pub specular_color: Color,
    pub ambient_color: Color,
    pub emissive_color: Color,
    pub reflectivity: f32,
    pub shininess: f32,
    pub transparency: f32,
    pub refraction_index: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Color::splat(0.5))
    }
}

/// Unchecked serialized form of [`Material`]; missing fields take the
/// default material's values.
#[derive(Deserialize)]
#[serde(default)]
struct MaterialFields {
    diffuse_color: Color,
    specular_color: Color,
    ambient_color: Color,
    emissive_color: Color,
    reflectivity: f32,
    shininess: f32,
    transparency: f32,
    refraction_index: f32,
}

impl Default for MaterialFields {
    fn default() -> Self {
        let m = Material::default();
        Self {
            diffuse_color: m.diffuse_color,
            specular_color: m.specular_color,
            ambient_color: m.ambient_color,
            emissive_color: m.emissive_color,
            reflectivity: m.reflectivity,
            shininess: m.shininess,
            transparency: m.transparency,
            refraction_index: m.refraction_index,
        }
    }
}

impl From<MaterialFields> for Material {
    fn from(f: MaterialFields) -> Self {
        Self {
            diffuse_color: f.diffuse_color,
            ..Material::default()
        }
        .with_specular(f.specular_color, f.shininess)
        .with_ambient(f.ambient_color)
        .with_emissive(f.emissive_color)
        .with_reflectivity(f.reflectivity)
        .with_transparency(f.transparency)
        .with_refraction_index(f.refraction_index)
    }
}

impl Material {
    /// Matte material: the ambient response follows the diffuse color,
    /// no highlights, opaque, not reflective.
    pub fn new(diffuse_color: Color) -> Self {
        Self {
            diffuse_color,
            specular_color: Color::ZERO,
            ambient_color: diffuse_color,
            emissive_color: Color::ZERO,
            reflectivity: 0.0,
            shininess: 0.0,
            transparency: 0.0,
            refraction_index: refractive_index::VACUUM,
        }
    }

    /// A black, fully reflective surface with a near-total Fresnel response.
    pub fn mirror() -> Self {
        Self {
            ambient_color: Color::ZERO,
            ..Self::new(Color::ZERO)
        }
        .with_reflectivity(1.0)
        .with_refraction_index(refractive_index::MIRROR)
    }

    /// Clear glass-like dielectric with the given tint and index.
    pub fn glass(tint: Color, refraction_index: f32) -> Self {
        Self::new(tint)
            .with_transparency(1.0)
            .with_reflectivity(1.0)
            .with_refraction_index(refraction_index)
    }

    pub fn with_specular(mut self, color: Color, shininess: f32) -> Self {
        self.specular_color = color;
        self.shininess = shininess.max(0.0);
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess.max(0.0);
        self
    }

    pub fn with_ambient(mut self, color: Color) -> Self {
        self.ambient_color = color;
        self
    }

    pub fn with_emissive(mut self, color: Color) -> Self {
        self.emissive_color = color;
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self
    }

    pub fn with_transparency(mut self, transparency: f32) -> Self {
        self.transparency = transparency.clamp(0.0, 1.0);
        self
    }

    pub fn with_refraction_index(mut self, index: f32) -> Self {
        self.refraction_index = index.max(MIN_REFRACTION_INDEX);
        self
    }

    /// True if any light passes through the surface.
    pub fn is_transparent(&self) -> bool {
        self.transparency > 0.0
    }

    /// Check if this material is emissive.
    pub fn is_emissive(&self) -> bool {
        self.emissive_color.length_squared() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_material_defaults() {
        let m = Material::new(Color::new(1.0, 0.0, 0.0));
        assert_eq!(m.ambient_color, m.diffuse_color);
        assert_eq!(m.specular_color, Color::ZERO);
        assert!(!m.is_transparent());
        assert!(!m.is_emissive());
        assert_eq!(m.refraction_index, 1.0);
    }

    #[test]
    fn test_builders_clamp_ranges() {
        let m = Material::default()
            .with_reflectivity(1.5)
            .with_transparency(-0.2)
            .with_shininess(-3.0)
            .with_refraction_index(0.0);

        assert_eq!(m.reflectivity, 1.0);
        assert_eq!(m.transparency, 0.0);
        assert_eq!(m.shininess, 0.0);
        assert!(m.refraction_index > 0.0);
    }

    #[test]
    fn test_mirror_and_glass() {
        let mirror = Material::mirror();
        assert_eq!(mirror.reflectivity, 1.0);
        assert_eq!(mirror.diffuse_color, Color::ZERO);
        assert_eq!(mirror.ambient_color, Color::ZERO);

        let glass = Material::glass(Color::ONE, refractive_index::GLASS);
        assert!(glass.is_transparent());
        assert_eq!(glass.refraction_index, 1.5);
    }

    #[test]
    fn test_material_from_json_fills_defaults() {
        let m: Material = serde_json::from_str(
            r#"{ "diffuse_color": [0.1, 0.2, 0.3], "transparency": 0.5 }"#,
        )
        .expect("valid material json");

        assert_eq!(m.diffuse_color, Color::new(0.1, 0.2, 0.3));
        assert_eq!(m.transparency, 0.5);
        assert_eq!(m.refraction_index, 1.0);
    }

    #[test]
    fn test_material_from_json_is_clamped() {
        let m: Material = serde_json::from_str(
            r#"{ "reflectivity": 5.0, "transparency": -1.0, "shininess": -2.0, "refraction_index": 0.0 }"#,
        )
        .expect("valid material json");

        assert_eq!(m.reflectivity, 1.0);
        assert_eq!(m.transparency, 0.0);
        assert_eq!(m.shininess, 0.0);
        assert!(m.refraction_index > 0.0);

        let glass = Material::glass(Color::new(0.9, 1.0, 0.9), refractive_index::GLASS);
        let json = serde_json::to_string(&glass).expect("serializes");
        let back: Material = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, glass);
    }
}
