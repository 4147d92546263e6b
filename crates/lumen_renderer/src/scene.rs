//! Immutable render scene: triangles, materials, emissive sources and the BVH.
//!
//! A `Scene` is built once and then shared by reference across render
//! threads. Nothing in it is mutated after construction.

use std::time::Instant;

use lumen_core::{Material, Mesh};
use lumen_math::{Aabb, Ray, Vec3};

use crate::{Bvh, Hit, Triangle};

/// An emissive triangle and the color it emits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Source {
    pub triangle: usize,
    pub emission: Vec3,
}

pub struct Scene {
    triangles: Vec<Triangle>,
    materials: Vec<Material>,
    sources: Vec<Source>,
    bvh: Bvh,
}

impl Scene {
    /// Build a scene from triangles and the material table they index.
    ///
    /// Out-of-range material indices are redirected to material 0.
    pub fn new(mut triangles: Vec<Triangle>, mut materials: Vec<Material>) -> Self {
        if materials.is_empty() {
            materials.push(Material::default());
        }
        for triangle in &mut triangles {
            if triangle.material >= materials.len() {
                log::warn!(
                    "Triangle material {} out of range ({} materials), using material 0",
                    triangle.material,
                    materials.len()
                );
                triangle.material = 0;
            }
        }

        let sources: Vec<Source> = triangles
            .iter()
            .enumerate()
            .filter(|(_, triangle)| materials[triangle.material].is_emissive())
            .map(|(index, triangle)| Source {
                triangle: index,
                emission: materials[triangle.material].emission,
            })
            .collect();

        let start = Instant::now();
        let bvh = Bvh::build(&triangles);
        let stats = bvh.stats();
        log::info!(
            "BVH: {} triangles, {} nodes, {} leaves, depth {}, built in {:.2?}",
            triangles.len(),
            stats.nodes,
            stats.leaves,
            stats.max_depth,
            start.elapsed()
        );
        log::info!(
            "Scene: {} triangles, {} sources, {} materials",
            triangles.len(),
            sources.len(),
            materials.len()
        );

        Self {
            triangles,
            materials,
            sources,
            bvh,
        }
    }

    /// Build a scene from every triangle of a mesh.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let triangles = (0..mesh.triangle_count())
            .map(|i| Triangle::from_data(mesh.triangle(i), mesh.material_ids[i]))
            .collect();
        Self::new(triangles, mesh.materials.clone())
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.bvh.bounds()
    }

    /// Material of triangle `triangle`.
    pub fn material(&self, triangle: usize) -> &Material {
        &self.materials[self.triangles[triangle].material]
    }

    /// Nearest hit along the ray, up to `ray.t_max`.
    pub fn intersect(&self, ray: &Ray) -> Hit {
        let mut hit = Hit::for_ray(ray);
        self.bvh.intersect(&self.triangles, ray, &mut hit);
        hit
    }

    /// Nearest hit by testing every triangle. Same result as [`Scene::intersect`].
    pub fn intersect_linear(&self, ray: &Ray) -> Hit {
        let mut hit = Hit::for_ray(ray);
        for (index, triangle) in self.triangles.iter().enumerate() {
            if let Some((t, u, v)) = triangle.intersect(ray, hit.t) {
                hit = Hit {
                    p: triangle.point(u, v),
                    n: triangle.normal(u, v),
                    t,
                    u,
                    v,
                    object_id: Some(index),
                };
            }
        }
        hit
    }

    /// Whether anything blocks the ray before `ray.t_max`.
    pub fn occluded(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_hit()
    }

    /// Whether the ray reaches any emissive triangle before `ray.t_max`.
    ///
    /// Sources are few, so this is a linear scan without the BVH.
    pub fn hits_source(&self, ray: &Ray) -> bool {
        self.sources
            .iter()
            .any(|source| self.triangles[source.triangle].intersect(ray, ray.t_max).is_some())
    }
}
