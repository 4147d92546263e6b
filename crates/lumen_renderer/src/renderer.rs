//! Frame driver: per-pixel ray casting, direct lighting and ambient occlusion.
//!
//! Implements:
//! - One point-to-point camera ray per pixel center
//! - A single point light with optional shadow rays
//! - Optional ambient occlusion on the visible surface
//! - Parallel buckets with cooperative cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use lumen_math::{Camera, Frame, Ray, Vec3, Vec4};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::{ao, ImageBuffer, Scene};

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Ambient occlusion samples per visible point (0 disables it)
    pub ao_samples: u32,
    /// Trace a shadow ray toward the light
    pub shadows: bool,
    /// RGBA written where camera rays miss the scene
    pub background: [f32; 4],
    /// Light position; the camera position when unset
    pub light: Option<[f32; 3]>,
    /// Seed of the per-bucket random streams
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            ao_samples: 0,
            shadows: false,
            background: [0.0, 0.0, 0.0, 0.0],
            light: None,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    pub fn background(&self) -> Vec4 {
        Vec4::from_array(self.background)
    }

    /// Configured light position, or `camera` when none is set.
    pub fn light_position(&self, camera: Vec3) -> Vec3 {
        self.light.map(Vec3::from_array).unwrap_or(camera)
    }
}

/// Color seen along a camera ray, or `None` when it misses.
///
/// The surface color (diffuse + emission) is scaled by the cosine between
/// the normal and the direction to the light, then by ambient visibility.
pub fn shade<R: Rng>(scene: &Scene, ray: &Ray, light: Vec3, config: &RenderConfig, rng: &mut R) -> Option<Vec3> {
    let hit = scene.intersect(ray);
    let id = hit.object_id?;

    let light_dir = (hit.p - light).normalize_or_zero();
    let mut direct = (-light_dir).dot(hit.n).max(0.0);

    if config.shadows && direct > 0.0 {
        let shadow = Ray::between(hit.p + hit.n * ao::RAY_OFFSET, light);
        if scene.occluded(&shadow) {
            direct = 0.0;
        }
    }

    let visibility = if config.ao_samples > 0 {
        ao::estimate(scene, hit.p, hit.n, config.ao_samples, rng)
    } else {
        1.0
    };

    Some(scene.material(id).surface_color() * direct * visibility)
}

/// Render a single pixel: the background on a miss, an opaque color on a hit.
pub fn render_pixel<R: Rng>(
    scene: &Scene,
    frame: &Frame,
    light: Vec3,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut R,
) -> Vec4 {
    let ray = frame.ray(x, y);
    match shade(scene, &ray, light, config, rng) {
        Some(color) => color.extend(1.0),
        None => config.background(),
    }
}

/// Render the scene seen from `camera` to an image buffer.
///
/// Buckets are rendered in parallel. When `cancel` is set, buckets not yet
/// started are skipped and keep the background color.
pub fn render(scene: &Scene, camera: &Camera, config: &RenderConfig, cancel: &AtomicBool) -> ImageBuffer {
    let mut image = ImageBuffer::filled(config.width, config.height, config.background());
    if config.width == 0 || config.height == 0 {
        return image;
    }

    let frame = camera.frame(config.width, config.height);
    let light = config.light_position(camera.position());
    let buckets = generate_buckets(config.width, config.height, config.bucket_size);

    log::info!(
        "Rendering {}x{} in {} buckets, {} AO samples, shadows {}",
        config.width,
        config.height,
        buckets.len(),
        config.ao_samples,
        if config.shadows { "on" } else { "off" }
    );

    let start = Instant::now();
    let results: Vec<BucketResult> = buckets
        .par_iter()
        .filter_map(|bucket| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let pixels = render_bucket(bucket, scene, &frame, light, config);
            Some(BucketResult::new(*bucket, pixels))
        })
        .collect();

    for result in &results {
        image.blit(result.bucket.x, result.bucket.y, result.bucket.width, &result.pixels);
    }

    if results.len() < buckets.len() {
        log::warn!(
            "Render cancelled after {}/{} buckets",
            results.len(),
            buckets.len()
        );
    } else {
        log::info!("Rendered in {:.2?}", start.elapsed());
    }

    image
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a linear color to gamma-corrected 8-bit RGBA. Alpha stays linear.
pub fn color_to_rgba(color: Vec4) -> [u8; 4] {
    let r = (255.0 * clamp_01(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * clamp_01(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * clamp_01(linear_to_gamma(color.z))) as u8;
    let a = (255.0 * clamp_01(color.w)) as u8;
    [r, g, b, a]
}
