//! Wavefront OBJ + MTL loading.
//!
//! All models in the file are merged into a single [`Mesh`]. Faces are
//! triangulated by `tobj`. Emission is read from the MTL `Ke` statement.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use lumen_math::Vec3;
use thiserror::Error;

use crate::material::Material;
use crate::mesh::Mesh;

/// Errors that can occur during OBJ loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OBJ parse error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("No triangles found in {0}")]
    NoGeometry(PathBuf),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load an OBJ file and its material library into a single mesh.
///
/// Material libraries are resolved relative to the OBJ file. A missing or
/// broken MTL file is not fatal: the faces get the default material.
///
/// # Example
///
/// ```ignore
/// use lumen_core::load_obj;
///
/// let mesh = load_obj("data/cornell.obj")?;
/// println!("Loaded {} triangles", mesh.triangle_count());
/// ```
pub fn load_obj<P: AsRef<Path>>(path: P) -> LoadResult<Mesh> {
    let path = path.as_ref();
    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut reader = BufReader::new(File::open(path)?);

    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    let (models, materials) =
        tobj::load_obj_buf(&mut reader, &options, |mtl| tobj::load_mtl(base.join(mtl)))?;

    let materials = match materials {
        Ok(materials) => materials,
        Err(err) => {
            log::warn!("{}: no usable material library ({}), using default material", path.display(), err);
            Vec::new()
        }
    };

    let mesh = mesh_from_models(&models, &materials);
    if mesh.triangle_count() == 0 {
        return Err(LoadError::NoGeometry(path.to_path_buf()));
    }

    log::info!(
        "Loaded {}: {} models, {} vertices, {} triangles, {} materials",
        path.display(),
        models.len(),
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.materials.len()
    );
    Ok(mesh)
}

/// Merge `tobj` models into one mesh, remapping indices and material ids.
fn mesh_from_models(models: &[tobj::Model], materials: &[tobj::Material]) -> Mesh {
    let mut table: Vec<Material> = materials.iter().map(convert_material).collect();
    // Faces without a (valid) material use a default appended to the table.
    let fallback = table.len();
    let mut needs_fallback = false;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();
    let mut material_ids = Vec::new();
    let mut missing_normals = 0;

    for model in models {
        let mesh = &model.mesh;
        let base = positions.len() as u32;
        let vertex_count = mesh.positions.len() / 3;

        positions.extend(mesh.positions.chunks_exact(3).map(|p| Vec3::new(p[0], p[1], p[2])));
        if mesh.normals.len() == mesh.positions.len() {
            normals.extend(mesh.normals.chunks_exact(3).map(|n| Vec3::new(n[0], n[1], n[2])));
        } else {
            // Zero normals make the mesh fall back to face normals.
            missing_normals += 1;
            normals.extend(std::iter::repeat(Vec3::ZERO).take(vertex_count));
        }

        let material_id = match mesh.material_id {
            Some(id) if id < fallback => id,
            _ => {
                needs_fallback = true;
                fallback
            }
        };

        indices.extend(mesh.indices.iter().map(|&i| base + i));
        material_ids.extend(std::iter::repeat(material_id).take(mesh.indices.len() / 3));
    }

    if missing_normals > 0 {
        log::debug!("{} models without normals, using face normals", missing_normals);
    }
    if needs_fallback {
        table.push(Material::default());
    }

    let normals = (missing_normals < models.len()).then_some(normals);
    Mesh::with_materials(positions, indices, normals, table, material_ids)
}

fn convert_material(material: &tobj::Material) -> Material {
    let diffuse = material.diffuse.map(Vec3::from_array).unwrap_or(Vec3::ZERO);
    // tobj parses `Ke` itself; a raw `Ke` entry is only a fallback.
    let emission = material
        .emissive
        .map(Vec3::from_array)
        .or_else(|| material.unknown_param.get("Ke").and_then(|value| parse_rgb(value)))
        .unwrap_or(Vec3::ZERO);

    Material {
        name: material.name.clone(),
        diffuse,
        emission,
    }
}

/// Parse an MTL color such as `"1 0.5 0"`. A single value is a grey.
fn parse_rgb(value: &str) -> Option<Vec3> {
    let components = value
        .split_whitespace()
        .map(str::parse::<f32>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    match components.as_slice() {
        [v] => Some(Vec3::splat(*v)),
        [r, g, b] => Some(Vec3::new(*r, *g, *b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lumen_obj_{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join(name);
        fs::write(&path, contents).expect("write temp file");
        path
    }

    const MTL: &str = "\
newmtl white
Kd 0.7 0.7 0.7

newmtl lamp
Kd 0 0 0
Ke 4 4 3
";

    #[test]
    fn test_load_obj_with_materials() {
        write_temp("lamp.mtl", MTL);
        let path = write_temp(
            "lamp.obj",
            "\
mtllib lamp.mtl
o floor
v -1 0 -1
v 1 0 -1
v 1 0 1
v -1 0 1
usemtl white
f 1 4 3 2
o light
v 0 2 0
v 0.5 2 0
v 0 2 0.5
usemtl lamp
f 5 6 7
",
        );

        let mesh = load_obj(&path).expect("obj loads");

        // The quad is triangulated.
        assert_eq!(mesh.triangle_count(), 3);
        assert_eq!(mesh.vertex_count(), 7);
        assert_eq!(mesh.triangle_material(0).name, "white");
        assert_eq!(mesh.triangle_material(1).diffuse, Vec3::splat(0.7));

        let lamp = mesh.triangle_material(2);
        assert_eq!(lamp.name, "lamp");
        assert_eq!(lamp.emission, Vec3::new(4.0, 4.0, 3.0));
        assert!(lamp.is_emissive());

        // Light triangle indices point at its own vertices.
        let light = mesh.triangle(2);
        assert_eq!(light.positions[0], Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_load_obj_missing_mtl_uses_default_material() {
        let path = write_temp(
            "nomtl.obj",
            "\
mtllib does_not_exist.mtl
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
",
        );

        let mesh = load_obj(&path).expect("obj loads without its mtl");
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangle_material(0), &Material::default());
    }

    #[test]
    fn test_load_obj_with_normals() {
        let path = write_temp(
            "normals.obj",
            "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1
",
        );

        let mesh = load_obj(&path).expect("obj loads");
        assert!(mesh.has_normals());
        assert_eq!(mesh.triangle(0).normals, [Vec3::Z; 3]);
    }

    #[test]
    fn test_load_obj_missing_file() {
        let result = load_obj(std::env::temp_dir().join("lumen_missing_mesh.obj"));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_load_obj_without_faces() {
        let path = write_temp("empty.obj", "v 0 0 0\nv 1 0 0\n");
        let result = load_obj(&path);
        assert!(matches!(result, Err(LoadError::NoGeometry(_))));
    }

    #[test]
    fn test_convert_material_reads_emissive() {
        let material = tobj::Material {
            name: "glow".to_string(),
            diffuse: Some([0.5, 0.5, 0.5]),
            emissive: Some([1.0, 2.0, 3.0]),
            ..Default::default()
        };
        let converted = convert_material(&material);
        assert_eq!(converted.emission, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(converted.surface_color(), Vec3::new(1.5, 2.5, 3.5));
    }

    #[test]
    fn test_convert_material_unknown_ke_fallback() {
        let mut material = tobj::Material::default();
        material.unknown_param.insert("Ke".to_string(), "0.5".to_string());
        assert_eq!(convert_material(&material).emission, Vec3::splat(0.5));
        assert_eq!(convert_material(&tobj::Material::default()).emission, Vec3::ZERO);
    }

    #[test]
    fn test_parse_rgb() {
        assert_eq!(parse_rgb("1 0.5 0"), Some(Vec3::new(1.0, 0.5, 0.0)));
        assert_eq!(parse_rgb(" 2 "), Some(Vec3::splat(2.0)));
        assert_eq!(parse_rgb("1 2"), None);
        assert_eq!(parse_rgb("a b c"), None);
    }
}
