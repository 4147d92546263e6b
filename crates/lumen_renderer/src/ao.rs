//! Ambient occlusion by Fibonacci-spiral hemisphere sampling.
//!
//! Sample directions are stratified uniformly in `cos θ`, so the hemisphere
//! pdf is `1 / 2π` and `2 · mean(cos θ · V)` estimates the cosine-weighted
//! visibility normalized to 1 for an unoccluded point.

use lumen_math::{Ray, Vec3};
use rand::Rng;

use crate::sampling::{fibonacci_direction, orthonormal_basis, to_world};
use crate::Scene;

/// Distance along the normal that occlusion rays start from the surface.
pub const RAY_OFFSET: f32 = 1e-3;

/// Normalized ambient visibility at `point` around the unit `normal`.
///
/// Returns a value in `[0, 1]`: 1 when nothing occludes the hemisphere and
/// 0 when every sample is blocked. Zero samples means no occlusion.
pub fn estimate<R: Rng>(
    scene: &Scene,
    point: Vec3,
    normal: Vec3,
    samples: u32,
    rng: &mut R,
) -> f32 {
    if samples == 0 {
        return 1.0;
    }

    let origin = point + normal * RAY_OFFSET;
    let basis = orthonormal_basis(normal);
    let mut visible = 0.0;
    for i in 0..samples {
        let local = fibonacci_direction(i, samples, rng.gen::<f32>());
        let ray = Ray::new(origin, to_world(local, basis, normal));
        if !scene.occluded(&ray) {
            visible += local.z;
        }
    }

    (2.0 * visible / samples as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Triangle;
    use lumen_core::{Material, Mesh};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn floor() -> Triangle {
        Triangle::new(
            Vec3::new(-50.0, 0.0, -50.0),
            Vec3::new(0.0, 0.0, 50.0),
            Vec3::new(50.0, 0.0, -50.0),
            0,
        )
    }

    /// Floor plus a wall in the plane x = 0.5 covering x > 0 directions.
    fn wall_scene() -> Scene {
        let wall = [
            Triangle::new(Vec3::new(0.5, 0.0, -100.0), Vec3::new(0.5, 0.0, 100.0), Vec3::new(0.5, 100.0, 100.0), 0),
            Triangle::new(Vec3::new(0.5, 0.0, -100.0), Vec3::new(0.5, 100.0, 100.0), Vec3::new(0.5, 100.0, -100.0), 0),
        ];
        Scene::new(
            std::iter::once(floor()).chain(wall).collect(),
            vec![Material::default()],
        )
    }

    fn variance(values: &[f32]) -> f32 {
        let mean = values.iter().sum::<f32>() / values.len() as f32;
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / values.len() as f32
    }

    #[test]
    fn test_open_hemisphere_is_fully_visible() {
        let scene = Scene::new(vec![floor()], vec![Material::default()]);
        let mut rng = StdRng::seed_from_u64(7);

        for samples in [1, 4, 16, 64] {
            let ao = estimate(&scene, Vec3::ZERO, Vec3::Y, samples, &mut rng);
            assert!((ao - 1.0).abs() < 1e-5, "{samples} samples gave {ao}");
        }
    }

    #[test]
    fn test_enclosed_point_is_occluded() {
        let scene = Scene::from_mesh(&Mesh::cube(1.0));
        let mut rng = StdRng::seed_from_u64(11);

        let ao = estimate(&scene, Vec3::new(0.1, -0.2, 0.3), Vec3::Y, 64, &mut rng);
        assert!(ao.abs() < 1e-6);
    }

    #[test]
    fn test_zero_samples_means_unoccluded() {
        let scene = Scene::from_mesh(&Mesh::cube(1.0));
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(estimate(&scene, Vec3::ZERO, Vec3::Y, 0, &mut rng), 1.0);
    }

    #[test]
    fn test_wall_occludes_part_of_hemisphere() {
        let scene = wall_scene();
        let mut rng = StdRng::seed_from_u64(5);

        let ao = estimate(&scene, Vec3::ZERO, Vec3::Y, 256, &mut rng);
        assert!(ao > 0.2 && ao < 0.9, "ao = {ao}");
    }

    #[test]
    fn test_variance_drops_with_more_samples() {
        let scene = wall_scene();
        let mut rng = StdRng::seed_from_u64(1234);

        let run = |samples: u32, rng: &mut StdRng| -> Vec<f32> {
            (0..200)
                .map(|_| estimate(&scene, Vec3::ZERO, Vec3::Y, samples, rng))
                .collect()
        };
        let coarse = run(16, &mut rng);
        let fine = run(64, &mut rng);

        assert!(variance(&fine) < variance(&coarse));
    }
}
