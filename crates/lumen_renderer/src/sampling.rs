//! Hemisphere sampling helpers.

use lumen_math::Vec3;

/// (√5 + 1) / 2
pub const GOLDEN_RATIO: f32 = 1.618_034;

/// Build an orthonormal basis `(tangent, bitangent)` around a unit normal.
///
/// Branch-free construction from Duff et al., "Building an Orthonormal
/// Basis, Revisited" (2017). Valid for every unit normal including -Z.
pub fn orthonormal_basis(n: Vec3) -> (Vec3, Vec3) {
    let sign = if n.z >= 0.0 { 1.0 } else { -1.0 };
    let a = -1.0 / (sign + n.z);
    let b = n.x * n.y * a;

    let tangent = Vec3::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);
    let bitangent = Vec3::new(b, sign + n.y * n.y * a, -n.y);

    (tangent, bitangent)
}

/// Direction `i` of `count` on a Fibonacci spiral over the +Z hemisphere.
///
/// `cos θ` is stratified uniformly: `1 - (2i + 1) / 2count`. The azimuth
/// follows the golden ratio, rotated by `jitter` in `[0, 1)`.
pub fn fibonacci_direction(i: u32, count: u32, jitter: f32) -> Vec3 {
    let cos_theta = 1.0 - (2 * i + 1) as f32 / (2 * count) as f32;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = std::f32::consts::TAU * ((i as f32 + jitter) / GOLDEN_RATIO).fract();

    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta)
}

/// Map a +Z hemisphere direction into the frame `(tangent, bitangent, normal)`.
pub fn to_world(local: Vec3, (tangent, bitangent): (Vec3, Vec3), normal: Vec3) -> Vec3 {
    local.x * tangent + local.y * bitangent + local.z * normal
}
