//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use lumen_core::TriangleData;
use lumen_math::{Aabb, Ray, Vec3};

/// Determinant and hit-distance tolerance.
pub const EPSILON: f32 = 1e-5;

/// Padding added around triangle bounds so flat triangles never produce
/// zero-width boxes.
const BOUNDS_PADDING: f32 = 0.0001;

/// An immutable scene triangle with per-vertex normals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertices
    pub positions: [Vec3; 3],
    /// Vertex normals (unit length)
    pub normals: [Vec3; 3],
    /// Index into the scene material table
    pub material: usize,
}

impl Triangle {
    /// Create a triangle with flat shading from three vertices.
    pub fn new(a: Vec3, b: Vec3, c: Vec3, material: usize) -> Self {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        Self {
            positions: [a, b, c],
            normals: [normal; 3],
            material,
        }
    }

    /// Create a triangle from mesh vertex data.
    pub fn from_data(data: TriangleData, material: usize) -> Self {
        Self {
            positions: data.positions,
            normals: data.normals,
            material,
        }
    }

    /// Möller-Trumbore ray-triangle intersection.
    ///
    /// Returns `(t, u, v)` for a hit with `t` in `(EPSILON, t_max]`, where
    /// `(u, v)` are the barycentric weights of the second and third vertex.
    pub fn intersect(&self, ray: &Ray, t_max: f32) -> Option<(f32, f32, f32)> {
        let [a, b, c] = self.positions;
        let edge1 = b - a;
        let edge2 = c - a;

        let pvec = ray.direction().cross(edge2);
        let det = edge1.dot(pvec);

        // Ray is parallel to the triangle plane
        if det.abs() <= EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let tvec = ray.origin() - a;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(edge1);
        let v = ray.direction().dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(qvec) * inv_det;
        if t <= EPSILON || t > t_max {
            return None;
        }

        Some((t, u, v))
    }

    /// Surface point at barycentric coordinates `(u, v)`.
    pub fn point(&self, u: f32, v: f32) -> Vec3 {
        let [a, b, c] = self.positions;
        a * (1.0 - u - v) + b * u + c * v
    }

    /// Interpolated shading normal at `(u, v)`, normalized.
    pub fn normal(&self, u: f32, v: f32) -> Vec3 {
        let [na, nb, nc] = self.normals;
        (na * (1.0 - u - v) + nb * u + nc * v)
            .try_normalize()
            .unwrap_or_else(|| self.face_normal())
    }

    /// Geometric normal following the vertex winding.
    pub fn face_normal(&self) -> Vec3 {
        let [a, b, c] = self.positions;
        (b - a).cross(c - a).normalize_or_zero()
    }

    pub fn area(&self) -> f32 {
        let [a, b, c] = self.positions;
        0.5 * (b - a).cross(c - a).length()
    }

    /// Padded bounding box of the three vertices.
    pub fn bounds(&self) -> Aabb {
        let bounds = Aabb::from_points(self.positions);
        Aabb::new(
            bounds.min - Vec3::splat(BOUNDS_PADDING),
            bounds.max + Vec3::splat(BOUNDS_PADDING),
        )
    }
}
