//! Lumen Core - Scene geometry and asset loading for the offline renderer.
//!
//! This crate provides:
//!
//! - **Geometry types**: `Mesh`, `TriangleData`, `Material`
//! - **OBJ support**: Wavefront OBJ + MTL loading into a single mesh
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::load_obj;
//!
//! let mesh = load_obj("data/cornell.obj")?;
//! println!("Loaded {} triangles, {} materials",
//!     mesh.triangle_count(),
//!     mesh.materials.len());
//! ```

pub mod material;
pub mod mesh;
pub mod obj;

// Re-export commonly used types
pub use material::Material;
pub use mesh::{Mesh, TriangleData};
pub use obj::{load_obj, LoadError, LoadResult};
