//! Example: Load and inspect an OBJ file.
//!
//! Run with: cargo run --example inspect_mesh -- data/cornell.obj

use std::env;

use lumen_core::load_obj;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_mesh <path-to-obj-file>");
        println!("\nExample:");
        println!("  cargo run --example inspect_mesh -- data/cornell.obj");
        return;
    }

    let path = &args[1];
    println!("Loading OBJ file: {}", path);

    match load_obj(path) {
        Ok(mesh) => {
            println!("\n=== Mesh ===");
            println!("Vertices: {}", mesh.vertex_count());
            println!("Triangles: {}", mesh.triangle_count());
            println!("Has normals: {}", mesh.has_normals());
            println!(
                "Bounds: ({:.2}, {:.2}, {:.2}) to ({:.2}, {:.2}, {:.2})",
                mesh.bounds.min.x,
                mesh.bounds.min.y,
                mesh.bounds.min.z,
                mesh.bounds.max.x,
                mesh.bounds.max.y,
                mesh.bounds.max.z
            );

            println!("\n--- Materials ---");
            for (id, material) in mesh.materials.iter().enumerate() {
                let used = mesh.material_ids.iter().filter(|&&m| m == id).count();
                println!(
                    "  [{}] {} - diffuse ({:.2}, {:.2}, {:.2}), {} triangles{}",
                    id,
                    material.name,
                    material.diffuse.x,
                    material.diffuse.y,
                    material.diffuse.z,
                    used,
                    if material.is_emissive() { ", emissive" } else { "" }
                );
            }
        }
        Err(e) => {
            eprintln!("Error loading OBJ: {}", e);
            std::process::exit(1);
        }
    }
}
