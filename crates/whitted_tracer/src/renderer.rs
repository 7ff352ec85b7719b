//! Row-parallel renderer.
//!
//! Rows are traced independently on the rayon pool:
//! - Every `row_stride`-th row is traced, the rows between repeat it
//! - Each pixel averages its camera samples
//! - Sample jitter comes from a per-row seeded generator

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use whitted_math::Interval;

use crate::error::{RenderError, Result};
use crate::{trace_ray, Color, Scene};

/// Progress callback, called with the completed fraction in `(0, 1]`.
pub type Progress<'a> = &'a (dyn Fn(f32) + Sync);

/// Destination for rendered pixels (linear RGB).
pub trait FrameSink {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set(&mut self, x: u32, y: u32, color: Color);
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let to_byte = |c: f32| (255.0 * Interval::UNIT.clamp(linear_to_gamma(c))) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }
}

impl FrameSink for ImageBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set(&mut self, x: u32, y: u32, color: Color) {
        ImageBuffer::set(self, x, y, color);
    }
}

/// Render a single pixel: the mean color of its camera samples.
pub fn render_pixel(scene: &Scene, x: u32, y: u32, rng: &mut dyn RngCore) -> Color {
    let rays = scene.camera.rays_for_pixel(x, y, rng);
    if rays.is_empty() {
        return scene.background;
    }

    let max_depth = scene.settings.max_recursion_depth;
    let sum: Color = rays
        .iter()
        .map(|ray| trace_ray(ray, scene, 0, max_depth))
        .sum();
    sum / rays.len() as f32
}

/// Render the scene to a new image sized from its camera.
pub fn render(scene: &Scene, progress: Option<Progress<'_>>) -> Result<ImageBuffer> {
    let mut image = ImageBuffer::new(scene.camera.image_width(), scene.camera.image_height());
    render_into(scene, &mut image, progress)?;
    Ok(image)
}

/// Render the scene into `sink`.
///
/// Fails if the settings are invalid, the sink does not match the camera
/// resolution, or the BVH is missing or stale.
pub fn render_into(
    scene: &Scene,
    sink: &mut dyn FrameSink,
    progress: Option<Progress<'_>>,
) -> Result<()> {
    validate(scene, sink)?;
    if scene.bvh().is_none() {
        return Err(RenderError::BvhNotBuilt);
    }

    let width = scene.camera.image_width();
    let height = scene.camera.image_height();
    let stride = scene.settings.row_stride;
    let seed = scene.settings.seed;

    log::info!("Rendering {}", scene.summary());
    let start = Instant::now();

    let traced_rows: Vec<u32> = (0..height).step_by(stride as usize).collect();
    let total = traced_rows.len();
    let completed = AtomicUsize::new(0);

    let rows: Vec<(u32, Vec<Color>)> = traced_rows
        .into_par_iter()
        .map(|y| {
            let mut rng = StdRng::seed_from_u64(row_seed(seed, y));
            let row = (0..width)
                .map(|x| render_pixel(scene, x, y, &mut rng))
                .collect();

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(report) = progress {
                report(done as f32 / total as f32);
            }
            (y, row)
        })
        .collect();

    for (y, row) in rows {
        // Skipped rows repeat the traced row above them.
        let last = (y + stride).min(height);
        for fill_y in y..last {
            for (x, color) in row.iter().enumerate() {
                sink.set(x as u32, fill_y, *color);
            }
        }
    }

    log::info!(
        "Rendered {}x{} ({} traced rows) in {:.2?}",
        width,
        height,
        total,
        start.elapsed()
    );
    Ok(())
}

fn validate(scene: &Scene, sink: &dyn FrameSink) -> Result<()> {
    scene.settings.validate()?;

    let camera = &scene.camera;
    if camera.image_width() == 0 || camera.image_height() == 0 {
        return Err(RenderError::InvalidSettings(format!(
            "image size must be non-zero, got {}x{}",
            camera.image_width(),
            camera.image_height()
        )));
    }
    if camera.samples_per_pixel() == 0 {
        return Err(RenderError::InvalidSettings(
            "samples_per_pixel must be at least 1".to_string(),
        ));
    }
    if sink.width() != camera.image_width() || sink.height() != camera.image_height() {
        return Err(RenderError::InvalidSettings(format!(
            "frame sink is {}x{} but the camera renders {}x{}",
            sink.width(),
            sink.height(),
            camera.image_width(),
            camera.image_height()
        )));
    }
    Ok(())
}

/// Decorrelate per-row seeds so neighbouring rows do not share jitter.
#[inline]
fn row_seed(seed: u64, row: u32) -> u64 {
    seed ^ (row as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
