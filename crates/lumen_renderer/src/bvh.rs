//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over scene triangles, stored as an arena of nodes that
//! refer to their children by index. Built once per scene by recursive
//! centroid partitioning down to single-triangle leaves, then only read.

use lumen_math::{Aabb, Ray, Vec3};

use crate::{Hit, Triangle};

/// BVH node - either an internal node with two children or a single-triangle leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BvhNode {
    /// Internal node; `bounds` is the union of both children's bounds.
    Internal {
        bounds: Aabb,
        left: usize,
        right: usize,
    },
    /// Leaf node holding one triangle index.
    Leaf { bounds: Aabb, triangle: usize },
}

impl BvhNode {
    pub fn bounds(&self) -> &Aabb {
        match self {
            BvhNode::Internal { bounds, .. } | BvhNode::Leaf { bounds, .. } => bounds,
        }
    }
}

/// Build-time record for one triangle.
#[derive(Debug, Clone, Copy)]
struct Primitive {
    triangle: usize,
    bounds: Aabb,
    centroid: Vec3,
}

/// Shape of a built tree, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BvhStats {
    pub nodes: usize,
    pub leaves: usize,
    pub max_depth: usize,
}

/// Node arena plus the root index. An empty scene has no root.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    root: Option<usize>,
}

impl Bvh {
    /// Build a BVH over all triangles.
    pub fn build(triangles: &[Triangle]) -> Self {
        let mut primitives: Vec<Primitive> = triangles
            .iter()
            .enumerate()
            .map(|(index, triangle)| {
                let bounds = triangle.bounds();
                Primitive {
                    triangle: index,
                    bounds,
                    centroid: bounds.centroid(),
                }
            })
            .collect();

        if primitives.is_empty() {
            return Self::default();
        }

        // Every primitive ends up in exactly one leaf: 2n - 1 nodes.
        let mut nodes = Vec::with_capacity(2 * primitives.len() - 1);
        let root = Self::build_node(&mut nodes, &mut primitives);

        Self {
            nodes,
            root: Some(root),
        }
    }

    /// Recursive construction over a slice of primitives, reordered in place.
    ///
    /// Children are appended before their parent, so the returned index is
    /// always the last node pushed.
    fn build_node(nodes: &mut Vec<BvhNode>, primitives: &mut [Primitive]) -> usize {
        if let [primitive] = &*primitives {
            nodes.push(BvhNode::Leaf {
                bounds: primitive.bounds,
                triangle: primitive.triangle,
            });
            return nodes.len() - 1;
        }

        // Split the centroid bounds in half along their longest axis
        let centroid_bounds = Aabb::from_points(primitives.iter().map(|p| p.centroid));
        let axis = centroid_bounds.longest_axis();
        let split = centroid_bounds.axis_interval(axis).midpoint();

        let mut mid = partition(primitives, |p| p.centroid[axis] < split);

        // All centroids on one side: split by count instead
        if mid == 0 || mid == primitives.len() {
            mid = primitives.len() / 2;
        }

        let (left_primitives, right_primitives) = primitives.split_at_mut(mid);
        let left = Self::build_node(nodes, left_primitives);
        let right = Self::build_node(nodes, right_primitives);

        let bounds = Aabb::surrounding(nodes[left].bounds(), nodes[right].bounds());
        nodes.push(BvhNode::Internal { bounds, left, right });
        nodes.len() - 1
    }

    /// Find the nearest triangle hit closer than `hit.t`.
    ///
    /// `triangles` must be the slice the BVH was built from. Returns true
    /// and overwrites `hit` if a closer intersection was found.
    pub fn intersect(&self, triangles: &[Triangle], ray: &Ray, hit: &mut Hit) -> bool {
        match self.root {
            Some(root) => self.intersect_node(triangles, ray, hit, root),
            None => false,
        }
    }

    fn intersect_node(&self, triangles: &[Triangle], ray: &Ray, hit: &mut Hit, index: usize) -> bool {
        match self.nodes[index] {
            BvhNode::Leaf { triangle, .. } => {
                let Some((t, u, v)) = triangles[triangle].intersect(ray, hit.t) else {
                    return false;
                };
                let triangle_ref = &triangles[triangle];
                *hit = Hit {
                    p: triangle_ref.point(u, v),
                    n: triangle_ref.normal(u, v),
                    t,
                    u,
                    v,
                    object_id: Some(triangle),
                };
                true
            }
            BvhNode::Internal { bounds, left, right } => {
                if !bounds.hit(ray, hit.t) {
                    return false;
                }
                // Both children are visited; the right one sees the left one's hit as its bound.
                let hit_left = self.intersect_node(triangles, ray, hit, left);
                let hit_right = self.intersect_node(triangles, ray, hit, right);
                hit_left || hit_right
            }
        }
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// Bounds of the whole tree, if it has any triangles.
    pub fn bounds(&self) -> Option<Aabb> {
        self.root.map(|root| *self.nodes[root].bounds())
    }

    /// Count nodes and leaves and measure the deepest leaf (root = depth 1).
    pub fn stats(&self) -> BvhStats {
        let Some(root) = self.root else {
            return BvhStats::default();
        };

        let mut stats = BvhStats {
            nodes: self.nodes.len(),
            ..BvhStats::default()
        };
        let mut stack = vec![(root, 1)];
        while let Some((index, depth)) = stack.pop() {
            stats.max_depth = stats.max_depth.max(depth);
            match self.nodes[index] {
                BvhNode::Leaf { .. } => stats.leaves += 1,
                BvhNode::Internal { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        stats
    }
}

/// Unstable in-place partition. Returns the number of items satisfying `pred`,
/// which are moved to the front.
fn partition<T>(items: &mut [T], pred: impl Fn(&T) -> bool) -> usize {
    let mut first = 0;
    for i in 0..items.len() {
        if pred(&items[i]) {
            items.swap(first, i);
            first += 1;
        }
    }
    first
}
