//! Point lights and the ambient term.

use serde::{Deserialize, Serialize};
use whitted_math::Vec3;

use crate::Color;

/// Quadratic distance falloff `1 / (a·d² + b·d + c)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attenuation {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl Attenuation {
    /// No falloff with distance.
    pub const NONE: Attenuation = Attenuation {
        a: 0.0,
        b: 0.0,
        c: 1.0,
    };

    pub fn new(a: f32, b: f32, c: f32) -> Self {
        Self { a, b, c }
    }

    /// Light scale at `distance`. A non-positive denominator yields 0.
    pub fn factor(&self, distance: f32) -> f32 {
        let denom = self.a * distance * distance + self.b * distance + self.c;
        if denom > 0.0 {
            1.0 / denom
        } else {
            0.0
        }
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self::NONE
    }
}

/// A point light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    pub color: Color,
    #[serde(default)]
    pub attenuation: Attenuation,
}

impl Light {
    /// Point light without distance falloff.
    pub fn point(position: Vec3, color: Color) -> Self {
        Self {
            position,
            color,
            attenuation: Attenuation::NONE,
        }
    }

    pub fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.attenuation = attenuation;
        self
    }
}

/// Uniform ambient light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl AmbientLight {
    /// White ambient light of the given intensity.
    pub fn new(intensity: f32) -> Self {
        Self {
            color: Color::ONE,
            intensity,
        }
    }

    /// Ambient contribution for a surface with the given ambient color.
    pub fn contribution(&self, ambient_color: Color) -> Color {
        self.color * self.intensity * ambient_color
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self::new(0.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attenuation_factor() {
        assert_eq!(Attenuation::NONE.factor(123.0), 1.0);

        let quadratic = Attenuation::new(1.0, 0.0, 0.0);
        assert_eq!(quadratic.factor(2.0), 0.25);

        let mixed = Attenuation::new(0.5, 1.0, 2.0);
        // 0.5 * 4 + 2 + 2 = 6
        assert!((mixed.factor(2.0) - 1.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_attenuation_degenerate_is_dark() {
        let broken = Attenuation::new(0.0, 0.0, 0.0);
        assert_eq!(broken.factor(1.0), 0.0);
    }

    #[test]
    fn test_ambient_contribution() {
        let ambient = AmbientLight::new(0.5);
        let c = ambient.contribution(Color::new(1.0, 0.5, 0.0));
        assert_eq!(c, Color::new(0.5, 0.25, 0.0));
    }

    #[test]
    fn test_light_from_json() {
        let light: Light =
            serde_json::from_str(r#"{ "position": [0, 10, 0], "color": [1, 1, 1] }"#)
                .expect("valid light json");
        assert_eq!(light.attenuation, Attenuation::NONE);
        assert_eq!(light.position, Vec3::new(0.0, 10.0, 0.0));
    }
}
