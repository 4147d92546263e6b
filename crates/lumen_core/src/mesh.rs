//! Triangle mesh with per-triangle materials.
//!
//! This is the geometry handed to the renderer: indexed positions, optional
//! per-vertex normals and a material table indexed per triangle. It can be
//! populated from OBJ files (see [`crate::obj`]) or built procedurally.

use lumen_math::{Aabb, Mat4, Mat4Ext, Vec3};

use crate::material::Material;

/// A mesh consisting of vertex positions, optional normals, and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional; face normals are used where missing)
    pub normals: Option<Vec<Vec3>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Material table, never empty
    pub materials: Vec<Material>,

    /// Index into `materials` for each triangle
    pub material_ids: Vec<usize>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

/// Vertex attributes of one triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleData {
    pub positions: [Vec3; 3],
    pub normals: [Vec3; 3],
}

impl Mesh {
    /// Create a mesh using the default material for every triangle.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        Self::with_materials(positions, indices, normals, Vec::new(), Vec::new())
    }

    /// Create a mesh with a material table and a material index per triangle.
    ///
    /// Triangles referencing missing vertices are dropped with a warning.
    /// Missing or out-of-range material ids fall back to material 0, and an
    /// empty table gets the default material.
    pub fn with_materials(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        normals: Option<Vec<Vec3>>,
        mut materials: Vec<Material>,
        material_ids: Vec<usize>,
    ) -> Self {
        if materials.is_empty() {
            materials.push(Material::default());
        }

        let vertex_count = positions.len();
        let mut kept_indices = Vec::with_capacity(indices.len());
        let mut kept_ids = Vec::with_capacity(indices.len() / 3);

        for (triangle, face) in indices.chunks_exact(3).enumerate() {
            if face.iter().any(|&i| i as usize >= vertex_count) {
                log::warn!(
                    "Invalid triangle indices: [{}, {}, {}], vertex count: {}",
                    face[0],
                    face[1],
                    face[2],
                    vertex_count
                );
                continue;
            }

            kept_indices.extend_from_slice(face);
            kept_ids.push(
                material_ids
                    .get(triangle)
                    .copied()
                    .filter(|&id| id < materials.len())
                    .unwrap_or(0),
            );
        }

        if indices.len() % 3 != 0 {
            log::warn!("Ignoring {} trailing indices", indices.len() % 3);
        }

        let normals = normals.filter(|normals| {
            let matches = normals.len() == vertex_count;
            if !matches {
                log::debug!(
                    "Normals array length ({}) doesn't match vertex count ({}), using face normals",
                    normals.len(),
                    vertex_count
                );
            }
            matches
        });

        let bounds = Aabb::from_points(positions.iter().copied());
        Self {
            positions,
            normals,
            indices: kept_indices,
            materials,
            material_ids: kept_ids,
            bounds,
        }
    }

    /// Axis-aligned cube centered at the origin, faces wound outward with flat normals.
    pub fn cube(half_size: f32) -> Self {
        // (normal, u, v) with u x v = normal
        let faces = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y, Vec3::X),
        ];

        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = positions.len() as u32;
            let center = normal * half_size;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                positions.push(center + (u * su + v * sv) * half_size);
                normals.push(normal);
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(positions, indices, Some(normals))
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Faces are counter-clockwise when seen from the side the normal points to.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];

        for face in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
            let face_normal =
                (self.positions[i1] - self.positions[i0]).cross(self.positions[i2] - self.positions[i0]);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }

        self.normals = Some(normals);
    }

    /// Check if the mesh has normals.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Get the mesh center (center of bounding box).
    pub fn center(&self) -> Vec3 {
        self.bounds.centroid()
    }

    /// Get the mesh size (diagonal length of bounding box).
    pub fn size(&self) -> f32 {
        self.bounds.extent().length()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Positions and normals of triangle `index`.
    ///
    /// Vertices without a usable normal get the geometric face normal.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.triangle_count()`.
    pub fn triangle(&self, index: usize) -> TriangleData {
        let face = &self.indices[3 * index..3 * index + 3];
        let ids = [face[0] as usize, face[1] as usize, face[2] as usize];
        let positions = ids.map(|i| self.positions[i]);

        let face_normal = (positions[1] - positions[0])
            .cross(positions[2] - positions[0])
            .normalize_or_zero();

        let normals = match &self.normals {
            Some(normals) => ids.map(|i| normals[i].try_normalize().unwrap_or(face_normal)),
            None => [face_normal; 3],
        };

        TriangleData { positions, normals }
    }

    /// Material of triangle `index`.
    pub fn triangle_material(&self, index: usize) -> &Material {
        &self.materials[self.material_ids[index]]
    }

    /// Apply a model matrix to positions and normals, then refresh the bounds.
    pub fn transform(&mut self, matrix: &Mat4) {
        for p in &mut self.positions {
            *p = matrix.transform_point3(*p);
        }
        if let Some(normals) = &mut self.normals {
            for n in normals.iter_mut() {
                *n = matrix.transform_normal(*n);
            }
        }
        self.bounds = Aabb::from_points(self.positions.iter().copied());
    }
}
