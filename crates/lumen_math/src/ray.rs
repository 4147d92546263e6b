use crate::Vec3;

/// A ray in 3D space with origin, direction, and a far bound.
///
/// Points along the ray are `origin + t * direction` for `t` up to `t_max`.
/// The direction is not normalized: a point-to-point ray built with
/// [`Ray::between`] spans its segment for `t` in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    inv_direction: Vec3,
    /// Largest accepted hit parameter.
    pub t_max: f32,
}

impl Ray {
    /// Create a directional ray, unbounded in `t`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: direction.recip(),
            t_max: f32::MAX,
        }
    }

    /// Create a ray from `origin` to `end`, with `t_max = 1` at `end`.
    pub fn between(origin: Vec3, end: Vec3) -> Self {
        Self::new(origin, end - origin).with_t_max(1.0)
    }

    /// Return the same ray with a different far bound.
    pub fn with_t_max(mut self, t_max: f32) -> Self {
        self.t_max = t_max;
        self
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Per-axis `1 / direction`. A zero component yields an infinity.
    #[inline]
    pub fn inv_direction(&self) -> Vec3 {
        self.inv_direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
