//! Scene container: primitives, lights, camera and render settings.

use std::collections::BTreeMap;
use std::fmt;

use whitted_math::Ray;

use crate::error::Result;
use crate::renderer::{self, FrameSink, ImageBuffer, Progress};
use crate::{
    nearest_hit_linear, AmbientLight, Bvh, Camera, Color, Hit, Light, Primitive, PrimitiveKind,
    RenderSettings,
};

/// Everything needed to render one image.
///
/// Populate it, call [`Scene::build_bvh`], then render. Adding primitives
/// after the build drops the BVH; it has to be built again.
#[derive(Debug, Default)]
pub struct Scene {
    primitives: Vec<Primitive>,
    lights: Vec<Light>,
    pub ambient: AmbientLight,
    pub camera: Camera,
    pub background: Color,
    pub settings: RenderSettings,
    bvh: Option<Bvh>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            ..Self::default()
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_ambient(mut self, ambient: AmbientLight) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Add a primitive, invalidating any built BVH.
    pub fn add_primitive(&mut self, primitive: impl Into<Primitive>) {
        self.invalidate_bvh();
        self.primitives.push(primitive.into());
    }

    /// Add many primitives at once, e.g. the triangles of a mesh.
    pub fn add_primitives<P, I>(&mut self, primitives: I)
    where
        P: Into<Primitive>,
        I: IntoIterator<Item = P>,
    {
        self.invalidate_bvh();
        self.primitives.extend(primitives.into_iter().map(Into::into));
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    fn invalidate_bvh(&mut self) {
        if self.bvh.take().is_some() {
            log::debug!("primitive added after BVH build; BVH must be rebuilt");
        }
    }

    /// Build (or rebuild) the BVH over the current primitives.
    pub fn build_bvh(&mut self) -> &Bvh {
        self.bvh.insert(Bvh::new(&self.primitives))
    }

    /// The BVH, if it is built and current.
    pub fn bvh(&self) -> Option<&Bvh> {
        self.bvh.as_ref()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Closest hit along `ray`: through the BVH when one is built,
    /// otherwise by scanning every primitive. Both give the same answer.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        match &self.bvh {
            Some(bvh) => bvh.nearest_hit(&self.primitives, ray),
            None => nearest_hit_linear(&self.primitives, ray),
        }
    }

    pub fn summary(&self) -> SceneSummary {
        let mut primitive_counts = BTreeMap::new();
        for primitive in &self.primitives {
            *primitive_counts.entry(primitive.kind()).or_insert(0) += 1;
        }

        SceneSummary {
            width: self.camera.image_width(),
            height: self.camera.image_height(),
            primitive_counts,
            lights: self.lights.len(),
            samples_per_pixel: self.camera.samples_per_pixel(),
            row_stride: self.settings.row_stride,
            max_recursion_depth: self.settings.max_recursion_depth,
            bvh_depth: self.bvh.as_ref().map(Bvh::depth),
        }
    }

    /// Render into a new [`ImageBuffer`] sized from the camera.
    pub fn render(&self, progress: Option<Progress<'_>>) -> Result<ImageBuffer> {
        renderer::render(self, progress)
    }

    /// Render into a caller-supplied sink.
    pub fn render_into(&self, sink: &mut dyn FrameSink, progress: Option<Progress<'_>>) -> Result<()> {
        renderer::render_into(self, sink, progress)
    }
}

/// Scene statistics for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub width: u32,
    pub height: u32,
    pub primitive_counts: BTreeMap<PrimitiveKind, usize>,
    pub lights: usize,
    pub samples_per_pixel: u32,
    pub row_stride: u32,
    pub max_recursion_depth: u32,
    pub bvh_depth: Option<usize>,
}

impl SceneSummary {
    pub fn count(&self, kind: PrimitiveKind) -> usize {
        self.primitive_counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_primitives(&self) -> usize {
        self.primitive_counts.values().sum()
    }
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} image", self.width, self.height)?;
        for kind in PrimitiveKind::ALL {
            write!(f, ", {} {}s", self.count(kind), kind)?;
        }
        write!(
            f,
            ", {} lights, {} spp, row stride {}, max depth {}",
            self.lights, self.samples_per_pixel, self.row_stride, self.max_recursion_depth
        )?;
        match self.bvh_depth {
            Some(depth) => write!(f, ", BVH depth {depth}"),
            None => write!(f, ", no BVH"),
        }
    }
}
