//! Whitted-style recursive ray tracer.
//!
//! Spheres, triangles, planes and rectangles are indexed by a median-split
//! BVH; each pixel is shaded with local lighting, shadow rays through
//! transparent occluders, and Fresnel-weighted reflection and refraction.
//! Rows render in parallel on the rayon pool.

mod bvh;
mod camera;
mod error;
mod hit;
mod light;
mod material;
pub mod mesh;
mod plane;
mod primitive;
mod rectangle;
mod renderer;
mod scene;
mod settings;
mod sphere;
mod tracer;
mod triangle;

pub use bvh::{Bvh, BvhNode, LEAF_MAX_SIZE};
pub use camera::{Camera, CameraSettings};
pub use error::{RenderError, Result};
pub use hit::{Hit, Shape, BOUNDS_PADDING, HIT_EPSILON};
pub use light::{AmbientLight, Attenuation, Light};
pub use material::{refractive_index, Color, Material};
pub use plane::{Plane, GRAZING_EPSILON};
pub use primitive::{nearest_hit_linear, Primitive, PrimitiveKind};
pub use rectangle::Rectangle;
pub use renderer::{
    color_to_rgba, linear_to_gamma, render, render_into, render_pixel, FrameSink, ImageBuffer,
    Progress,
};
pub use scene::{Scene, SceneSummary};
pub use settings::RenderSettings;
pub use sphere::Sphere;
pub use tracer::{reflect, refract, schlick, shadow_transmission, trace_ray, Transmission, SHADOW_CUTOFF};
pub use triangle::{Barycentric, Triangle};

/// Re-export Vec3 and common math types from whitted_math
pub use whitted_math::{Aabb, Interval, Ray, Vec3};
