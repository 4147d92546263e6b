//! Lumen Renderer - CPU ray tracing with a BVH
//!
//! Casts one ray per pixel against an immutable triangle scene,
//! accelerated by a bounding volume hierarchy, and shades hits with a
//! point light and optional ambient occlusion.

pub mod ao;
mod bucket;
mod bvh;
mod hit;
mod output;
mod renderer;
pub mod sampling;
mod scene;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::{Bvh, BvhNode, BvhStats};
pub use hit::Hit;
pub use output::{ImageBuffer, OutputError, OutputResult};
pub use renderer::{color_to_rgba, linear_to_gamma, render, render_pixel, shade, RenderConfig};
pub use scene::{Scene, Source};
pub use triangle::{Triangle, EPSILON};

/// Re-export common math types from lumen_math
pub use lumen_math::{Aabb, Camera, Frame, Interval, Ray, Vec3, Vec4};
