//! Nearest-hit record filled by scene queries.

use lumen_math::{Ray, Vec3};

/// Record of a ray-triangle intersection.
///
/// `object_id` is `None` until a triangle is hit; `t` then holds the
/// ray's far bound and shrinks with every closer hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Point of intersection
    pub p: Vec3,
    /// Interpolated unit normal at the intersection
    pub n: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Barycentric coordinates of the hit
    pub u: f32,
    pub v: f32,
    /// Index of the hit triangle
    pub object_id: Option<usize>,
}

impl Default for Hit {
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            n: Vec3::ZERO,
            t: f32::MAX,
            u: 0.0,
            v: 0.0,
            object_id: None,
        }
    }
}

impl Hit {
    /// An empty hit bounded by the ray's `t_max`.
    pub fn for_ray(ray: &Ray) -> Self {
        Self {
            t: ray.t_max,
            ..Self::default()
        }
    }

    /// Whether a triangle was hit.
    pub fn is_hit(&self) -> bool {
        self.object_id.is_some()
    }
}
