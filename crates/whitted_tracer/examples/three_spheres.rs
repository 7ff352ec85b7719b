//! Whitted ray tracer example.
//!
//! Renders three spheres (matte, mirror, glass) on a floor with a glass cube
//! and a back wall, and saves the result in PPM format.
//!
//! Run with `RUST_LOG=info`. An optional first argument is a render-settings
//! JSON file, e.g. `{ "max_recursion_depth": 5, "row_stride": 2 }`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Context;
use whitted_tracer::{
    color_to_rgba, mesh, refractive_index, AmbientLight, Attenuation, Camera, Color, ImageBuffer,
    Light, Material, Plane, Rectangle, RenderSettings, Scene, Sphere, Vec3,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            RenderSettings::from_json(&json).with_context(|| format!("parsing {path}"))?
        }
        None => RenderSettings::default(),
    };

    let camera = Camera::new()
        .with_resolution(800, 450)
        .with_position(Vec3::new(0.0, 2.0, 6.0), Vec3::new(0.0, 0.8, -2.0), Vec3::Y)
        .with_fov(50.0)
        .with_samples(4);

    let mut scene = build_scene(camera).with_settings(settings);
    scene.build_bvh();

    // Report every tenth of the way.
    let last_decile = AtomicU32::new(0);
    let progress = |fraction: f32| {
        let decile = (fraction * 10.0) as u32;
        if last_decile.fetch_max(decile, Ordering::Relaxed) < decile {
            log::info!("{}% done", decile * 10);
        }
    };
    let image = scene.render(Some(&progress))?;

    let filename = "output.ppm";
    save_ppm(&image, filename).with_context(|| format!("writing {filename}"))?;
    log::info!("Saved to {filename}");
    Ok(())
}

fn build_scene(camera: Camera) -> Scene {
    let mut scene = Scene::new(camera)
        .with_background(Color::new(0.05, 0.05, 0.1))
        .with_ambient(AmbientLight::new(0.15));

    // Floor
    scene.add_primitive(Plane::new(
        Vec3::ZERO,
        Vec3::Y,
        Material::new(Color::new(0.6, 0.6, 0.55)).with_reflectivity(0.2),
    ));

    // Three main spheres
    scene.add_primitive(Sphere::new(
        Vec3::new(-2.2, 1.0, -2.0),
        1.0,
        Material::new(Color::new(0.8, 0.2, 0.15)).with_specular(Color::ONE, 40.0),
    ));
    scene.add_primitive(Sphere::new(Vec3::new(0.0, 1.0, -2.5), 1.0, Material::mirror()));
    scene.add_primitive(Sphere::new(
        Vec3::new(2.2, 1.0, -2.0),
        1.0,
        Material::glass(Color::new(0.9, 1.0, 0.9), refractive_index::GLASS),
    ));

    // Glass cube in front
    scene.add_primitives(mesh::cuboid(
        Vec3::new(0.9, 0.4, 0.5),
        0.8,
        Vec3::new(0.0, 30.0, 0.0),
        Material::glass(Color::new(0.7, 0.8, 1.0), refractive_index::WATER),
    ));

    // Back wall with a thin panel on it
    scene.add_primitives(mesh::slab(
        Vec3::new(0.0, 2.5, -6.0),
        Vec3::Z,
        Vec3::Y,
        12.0,
        5.0,
        0.2,
        Material::new(Color::new(0.3, 0.4, 0.6)),
    ));
    scene.add_primitive(Rectangle::facing(
        Vec3::new(-3.0, 3.0, -5.85),
        Vec3::Z,
        Vec3::Y,
        1.5,
        1.0,
        Material::new(Color::new(0.9, 0.8, 0.2)).with_emissive(Color::splat(0.3)),
    ));

    scene.add_light(
        Light::point(Vec3::new(-4.0, 6.0, 4.0), Color::ONE)
            .with_attenuation(Attenuation::new(0.0, 0.02, 1.0)),
    );
    scene.add_light(Light::point(Vec3::new(5.0, 4.0, 2.0), Color::new(0.4, 0.4, 0.5)));

    scene
}

fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let rgba = color_to_rgba(image.get(x, y));
            writeln!(writer, "{} {} {}", rgba[0], rgba[1], rgba[2])?;
        }
    }

    writer.flush()
}
