//! Pinhole camera for ray generation.

use std::f32::consts::TAU;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use whitted_math::{Ray, Vec3};

/// Plain camera description, as read from scene files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            fov: 60.0,
            image_width: 800,
            image_height: 450,
            samples_per_pixel: 1,
        }
    }
}

/// Camera for generating rays into the scene.
///
/// The view basis is recomputed by every builder method, so a camera is
/// always ready to generate rays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CameraSettings", into = "CameraSettings")]
pub struct Camera {
    settings: CameraSettings,

    // Cached view basis
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    view_width: f32,
    view_height: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::from(CameraSettings::default())
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.settings.image_width = width;
        self.settings.image_height = height;
        self.initialize();
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, position: Vec3, look_at: Vec3, up: Vec3) -> Self {
        self.settings.position = position;
        self.settings.look_at = look_at;
        self.settings.up = up;
        self.initialize();
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.settings.fov = fov;
        self.initialize();
        self
    }

    /// Set samples per pixel. With more than one, samples are jittered
    /// within the pixel.
    pub fn with_samples(mut self, samples: u32) -> Self {
        self.settings.samples_per_pixel = samples;
        self
    }

    fn initialize(&mut self) {
        let s = &self.settings;
        self.forward = (s.look_at - s.position).normalize_or_zero();
        self.right = self.forward.cross(s.up).normalize_or_zero();
        self.up = self.right.cross(self.forward).normalize_or_zero();
        if self.right == Vec3::ZERO {
            log::warn!(
                "camera at {} looking at {} has no usable up vector",
                s.position,
                s.look_at
            );
        }

        let aspect = s.image_width as f32 / s.image_height.max(1) as f32;
        self.view_height = 2.0 * (s.fov.to_radians() / 2.0).tan();
        self.view_width = self.view_height * aspect;
    }

    /// Ray through image-plane coordinates `(px, py)`, measured in pixels from
    /// the top-left corner.
    pub fn ray_through(&self, px: f32, py: f32) -> Ray {
        let w = self.settings.image_width as f32;
        let h = self.settings.image_height as f32;
        let x_world = (px - w / 2.0) * (self.view_width / w);
        let y_world = (h / 2.0 - py) * (self.view_height / h);

        let direction = self.forward + self.right * x_world + self.up * y_world;
        Ray::new(self.settings.position, direction.normalize_or_zero())
    }

    /// Sample rays for pixel `(x, y)`.
    ///
    /// One ray through the pixel center for a single sample; otherwise
    /// `samples_per_pixel` rays at uniformly jittered positions inside the
    /// pixel, drawn from `rng`.
    pub fn rays_for_pixel(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Vec<Ray> {
        let (x, y) = (x as f32, y as f32);
        match self.settings.samples_per_pixel {
            0 => Vec::new(),
            1 => vec![self.ray_through(x + 0.5, y + 0.5)],
            n => (0..n)
                .map(|_| {
                    let dx: f32 = rng.gen();
                    let dy: f32 = rng.gen();
                    self.ray_through(x + dx, y + dy)
                })
                .collect(),
        }
    }

    /// Image-plane coordinates of a world point, or `None` if the point is
    /// behind the camera. Inverse of [`Camera::ray_through`].
    pub fn project(&self, point: Vec3) -> Option<(f32, f32)> {
        let offset = point - self.settings.position;
        let depth = offset.dot(self.forward);
        if depth <= 0.0 {
            return None;
        }

        let x_world = offset.dot(self.right) / depth;
        let y_world = offset.dot(self.up) / depth;
        let w = self.settings.image_width as f32;
        let h = self.settings.image_height as f32;
        Some((
            x_world * w / self.view_width + w / 2.0,
            h / 2.0 - y_world * h / self.view_height,
        ))
    }

    /// Tracking shot: `frames` cameras evenly spaced on a horizontal circle
    /// of `radius` around the look-at point, at this camera's height.
    pub fn orbit(&self, frames: usize, radius: f32) -> Vec<Camera> {
        let center = self.settings.look_at;
        let step = TAU / frames.max(1) as f32;

        (0..frames)
            .map(|i| {
                let angle = i as f32 * step;
                let position = Vec3::new(
                    center.x + radius * angle.cos(),
                    self.settings.position.y,
                    center.z + radius * angle.sin(),
                );
                self.clone().with_position(position, center, self.settings.up)
            })
            .collect()
    }

    pub fn position(&self) -> Vec3 {
        self.settings.position
    }

    pub fn look_at(&self) -> Vec3 {
        self.settings.look_at
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn fov(&self) -> f32 {
        self.settings.fov
    }

    pub fn image_width(&self) -> u32 {
        self.settings.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.settings.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.settings.samples_per_pixel
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl From<CameraSettings> for Camera {
    fn from(settings: CameraSettings) -> Self {
        let mut camera = Self {
            settings,
            forward: -Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
            view_width: 0.0,
            view_height: 0.0,
        };
        camera.initialize();
        camera
    }
}

impl From<Camera> for CameraSettings {
    fn from(camera: Camera) -> Self {
        camera.settings
    }
}
