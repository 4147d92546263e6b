//! Simple ray tracer example.
//!
//! Renders two cubes on a floor with ambient occlusion and saves a PNG.

use std::sync::atomic::AtomicBool;

use lumen_core::{Material, Mesh};
use lumen_math::{Mat4, Mat4Ext};
use lumen_renderer::{render, Camera, RenderConfig, Scene, Triangle, Vec3};

fn main() {
    println!("Lumen Ray Tracer - Simple Example");
    println!("=================================");

    // Build the scene
    let start = std::time::Instant::now();
    let scene = build_scene();
    println!("Scene built in {:?} ({} triangles)", start.elapsed(), scene.triangle_count());

    // Set up camera
    let mut camera = Camera::orbit(Vec3::new(0.0, 0.5, 0.0), 6.0);
    camera.position.y += 2.5;

    // Render configuration
    let config = RenderConfig {
        width: 400,
        height: 300,
        ao_samples: 32,
        shadows: true,
        light: Some([3.0, 6.0, 4.0]),
        background: [0.05, 0.05, 0.08, 1.0],
        ..RenderConfig::default()
    };

    println!(
        "Rendering {}x{} @ {} AO samples...",
        config.width, config.height, config.ao_samples
    );

    // Render
    let start = std::time::Instant::now();
    let image = render(&scene, &camera, &config, &AtomicBool::new(false));
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.png";
    image.save_png(filename).expect("Failed to save image");
    println!("Saved to {}", filename);
}

fn build_scene() -> Scene {
    let materials = vec![
        Material::new("floor", Vec3::new(0.6, 0.6, 0.6)),
        Material::new("red", Vec3::new(0.8, 0.2, 0.1)),
        Material::new("blue", Vec3::new(0.1, 0.3, 0.8)),
    ];

    // Ground
    let size = 10.0;
    let mut triangles = vec![
        Triangle::new(
            Vec3::new(-size, 0.0, -size),
            Vec3::new(-size, 0.0, size),
            Vec3::new(size, 0.0, size),
            0,
        ),
        Triangle::new(
            Vec3::new(-size, 0.0, -size),
            Vec3::new(size, 0.0, size),
            Vec3::new(size, 0.0, -size),
            0,
        ),
    ];

    // Two cubes resting on the ground
    let placements = [
        (Mat4::placement(Vec3::ONE, 20.0, Vec3::new(-0.8, 0.5, 0.0)), 1),
        (Mat4::placement(Vec3::new(0.7, 1.6, 0.7), -35.0, Vec3::new(1.2, 0.5, -0.6)), 2),
    ];
    for (matrix, material) in placements {
        let mut cube = Mesh::cube(0.5);
        cube.transform(&matrix);
        triangles.extend((0..cube.triangle_count()).map(|i| Triangle::from_data(cube.triangle(i), material)));
    }

    Scene::new(triangles, materials)
}
