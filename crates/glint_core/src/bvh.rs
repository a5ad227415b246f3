//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of axis-aligned bounding boxes over a mesh's face list.
//! Construction partitions the face list in place, so the post-build face
//! order is authoritative; every node addresses its triangles as a
//! `[face_index, face_index + face_count)` range of that list.

use glint_math::Vec3;

use crate::Hit;

/// Maximum faces per leaf node before splitting.
const LEAF_SIZE: usize = 4;

/// Intersection epsilon shared by the parallel-ray and t-range rejections.
pub const EPSILON: f32 = 1e-6;

/// A BVH node. A node is a leaf iff both children are absent.
#[derive(Debug)]
pub struct BvhNode {
    pub bound_min: Vec3,
    pub bound_max: Vec3,

    pub face_index: usize,
    pub face_count: usize,

    pub left: Option<Box<BvhNode>>,
    pub right: Option<Box<BvhNode>>,
}

impl BvhNode {
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Build a tree over `faces`, reordering the slice in place.
    ///
    /// `face_offset` is the position of `faces` within the mesh's full face
    /// list; children inherit offsets reflecting the partition.
    pub fn build(vertices: &[Vec3], faces: &mut [[usize; 3]], face_offset: usize) -> Box<BvhNode> {
        let (bound_min, bound_max) = compute_bounds(vertices, faces);

        let mut node = Box::new(BvhNode {
            bound_min,
            bound_max,
            face_index: face_offset,
            face_count: faces.len(),
            left: None,
            right: None,
        });

        if faces.len() <= LEAF_SIZE {
            return node;
        }

        // Choose the axis with the largest extent, split at its midpoint.
        let extent = bound_max - bound_min;
        let mut axis = 0;
        if extent[1] > extent[axis] {
            axis = 1;
        }
        if extent[2] > extent[axis] {
            axis = 2;
        }

        let split = (bound_min[axis] + bound_max[axis]) * 0.5;

        let mid = partition_faces(vertices, faces, axis, split);

        // If the partition puts everything on one side, keep a leaf.
        if mid == 0 || mid == faces.len() {
            return node;
        }

        let (left_faces, right_faces) = faces.split_at_mut(mid);
        node.left = Some(Self::build(vertices, left_faces, face_offset));
        node.right = Some(Self::build(vertices, right_faces, face_offset + mid));

        node
    }

    /// Recursive traversal accumulating the nearest triangle hit.
    ///
    /// Both children of an interior node are always visited; hits at or
    /// beyond `best_distance` are rejected by the distance compare in the
    /// leaf loop.
    pub fn intersect(
        &self,
        vertices: &[Vec3],
        faces: &[[usize; 3]],
        origin: Vec3,
        direction: Vec3,
        direction_inv: Vec3,
        best_distance: &mut f32,
        best_hit: &mut Option<Hit>,
    ) -> bool {
        if intersect_aabb(origin, direction_inv, self.bound_min, self.bound_max).is_none() {
            return false;
        }

        let mut hit_any = false;

        if self.is_leaf() {
            for face in &faces[self.face_index..self.face_index + self.face_count] {
                let candidate = intersect_triangle(
                    origin,
                    direction,
                    vertices[face[0]],
                    vertices[face[1]],
                    vertices[face[2]],
                );

                if let Some(hit) = candidate {
                    if hit.distance < *best_distance {
                        *best_distance = hit.distance;
                        *best_hit = Some(hit);
                        hit_any = true;
                    }
                }
            }
        } else {
            if let Some(left) = &self.left {
                hit_any |= left.intersect(
                    vertices,
                    faces,
                    origin,
                    direction,
                    direction_inv,
                    best_distance,
                    best_hit,
                );
            }
            if let Some(right) = &self.right {
                hit_any |= right.intersect(
                    vertices,
                    faces,
                    origin,
                    direction,
                    direction_inv,
                    best_distance,
                    best_hit,
                );
            }
        }

        hit_any
    }
}

/// AABB over every vertex referenced by `faces`.
fn compute_bounds(vertices: &[Vec3], faces: &[[usize; 3]]) -> (Vec3, Vec3) {
    let mut bound_min = Vec3::splat(f32::INFINITY);
    let mut bound_max = Vec3::splat(f32::NEG_INFINITY);

    for face in faces {
        for &index in face {
            bound_min = bound_min.min(vertices[index]);
            bound_max = bound_max.max(vertices[index]);
        }
    }

    (bound_min, bound_max)
}

/// Hoare-style partition of `faces` by centroid against the split plane.
/// Returns the number of faces below the split.
fn partition_faces(vertices: &[Vec3], faces: &mut [[usize; 3]], axis: usize, split: f32) -> usize {
    let mut i = 0;
    let mut j = faces.len();

    while i < j {
        let face = faces[i];
        let centroid = (vertices[face[0]] + vertices[face[1]] + vertices[face[2]]) / 3.0;

        if centroid[axis] < split {
            i += 1;
        } else {
            j -= 1;
            faces.swap(i, j);
        }
    }

    i
}

/// Slab test. Returns the clipped `[tmin, tmax]` interval, or `None` when
/// the ray misses the box.
pub fn intersect_aabb(
    origin: Vec3,
    direction_inv: Vec3,
    bound_min: Vec3,
    bound_max: Vec3,
) -> Option<(f32, f32)> {
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;

    for axis in 0..3 {
        let mut t0 = (bound_min[axis] - origin[axis]) * direction_inv[axis];
        let mut t1 = (bound_max[axis] - origin[axis]) * direction_inv[axis];
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        tmin = tmin.max(t0);
        tmax = tmax.min(t1);

        if tmax < tmin {
            return None;
        }
    }

    Some((tmin, tmax))
}

/// Möller-Trumbore ray-triangle intersection.
///
/// Triangles are two-sided: only near-parallel rays are rejected, not back
/// faces, so the normal points to whichever side `e1 x e2` picks.
pub fn intersect_triangle(origin: Vec3, direction: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<Hit> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;

    let pvec = direction.cross(e2);
    let det = e1.dot(pvec);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = origin - v0;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(e1);
    let v = direction.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(qvec) * inv_det;
    if t < EPSILON {
        return None;
    }

    Some(Hit {
        origin: origin + direction * t,
        normal: e1.cross(e2).normalize(),
        distance: t,
        material_index: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A flat grid of `n x n` quads (two triangles each) in the XY plane.
    fn grid_mesh(n: usize) -> (Vec<Vec3>, Vec<[usize; 3]>) {
        let mut vertices = Vec::new();
        for y in 0..=n {
            for x in 0..=n {
                vertices.push(Vec3::new(x as f32, y as f32, 0.0));
            }
        }

        let stride = n + 1;
        let mut faces = Vec::new();
        for y in 0..n {
            for x in 0..n {
                let a = y * stride + x;
                let b = a + 1;
                let c = a + stride;
                let d = c + 1;
                faces.push([a, b, d]);
                faces.push([a, d, c]);
            }
        }

        (vertices, faces)
    }

    fn collect_leaves<'a>(node: &'a BvhNode, leaves: &mut Vec<&'a BvhNode>) {
        if node.is_leaf() {
            leaves.push(node);
        } else {
            collect_leaves(node.left.as_ref().unwrap(), leaves);
            collect_leaves(node.right.as_ref().unwrap(), leaves);
        }
    }

    #[test]
    fn test_leaves_partition_face_range() {
        let (vertices, mut faces) = grid_mesh(8);
        let face_count = faces.len();
        let root = BvhNode::build(&vertices, &mut faces, 0);

        let mut leaves = Vec::new();
        collect_leaves(&root, &mut leaves);

        let mut ranges: Vec<_> = leaves
            .iter()
            .map(|leaf| (leaf.face_index, leaf.face_index + leaf.face_count))
            .collect();
        ranges.sort();

        // Consecutive leaf ranges tile [0, face_count) exactly once.
        let mut cursor = 0;
        for (start, end) in ranges {
            assert_eq!(start, cursor);
            assert!(end > start);
            cursor = end;
        }
        assert_eq!(cursor, face_count);
    }

    #[test]
    fn test_node_bounds_contain_subtree_vertices() {
        fn check(node: &BvhNode, vertices: &[Vec3], faces: &[[usize; 3]]) {
            for face in &faces[node.face_index..node.face_index + node.face_count] {
                for &index in face {
                    let v = vertices[index];
                    for axis in 0..3 {
                        assert!(v[axis] >= node.bound_min[axis]);
                        assert!(v[axis] <= node.bound_max[axis]);
                    }
                }
            }
            if let Some(left) = &node.left {
                check(left, vertices, faces);
            }
            if let Some(right) = &node.right {
                check(right, vertices, faces);
            }
        }

        let (vertices, mut faces) = grid_mesh(6);
        let root = BvhNode::build(&vertices, &mut faces, 0);
        check(&root, &vertices, &faces);
    }

    #[test]
    fn test_small_face_set_stays_leaf() {
        let (vertices, mut faces) = grid_mesh(1);
        assert_eq!(faces.len(), 2);
        let root = BvhNode::build(&vertices, &mut faces, 0);
        assert!(root.is_leaf());
        assert_eq!(root.face_count, 2);
    }

    #[test]
    fn test_traversal_finds_nearest_face() {
        let (vertices, mut faces) = grid_mesh(8);
        let root = BvhNode::build(&vertices, &mut faces, 0);

        let origin = Vec3::new(4.25, 4.25, -3.0);
        let direction = Vec3::Z;
        let mut best_distance = f32::MAX;
        let mut best_hit = None;

        assert!(root.intersect(
            &vertices,
            &faces,
            origin,
            direction,
            direction.recip(),
            &mut best_distance,
            &mut best_hit,
        ));

        let hit = best_hit.unwrap();
        assert!((hit.distance - 3.0).abs() < 1e-5);
        assert!((hit.origin - Vec3::new(4.25, 4.25, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_triangle_is_two_sided() {
        let v0 = Vec3::ZERO;
        let v1 = Vec3::X;
        let v2 = Vec3::Y;

        let front = intersect_triangle(Vec3::new(0.25, 0.25, -1.0), Vec3::Z, v0, v1, v2).unwrap();
        let back = intersect_triangle(Vec3::new(0.25, 0.25, 1.0), -Vec3::Z, v0, v1, v2).unwrap();

        assert!((front.distance - 1.0).abs() < 1e-6);
        assert!((back.distance - 1.0).abs() < 1e-6);

        // Both hits report the e1 x e2 normal, regardless of approach side.
        assert!((front.normal - Vec3::Z).length() < 1e-6);
        assert!((back.normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_triangle_rejects_parallel_ray() {
        let v0 = Vec3::ZERO;
        let v1 = Vec3::X;
        let v2 = Vec3::Y;

        assert!(intersect_triangle(Vec3::new(0.25, 0.25, -1.0), Vec3::X, v0, v1, v2).is_none());
    }

    #[test]
    fn test_aabb_slab_rejects_misses() {
        let bound_min = Vec3::splat(-1.0);
        let bound_max = Vec3::splat(1.0);

        let toward = Vec3::Z;
        assert!(intersect_aabb(Vec3::new(0.0, 0.0, -5.0), toward.recip(), bound_min, bound_max)
            .is_some());

        let offset = Vec3::new(5.0, 0.0, -5.0);
        assert!(intersect_aabb(offset, toward.recip(), bound_min, bound_max).is_none());
    }
}
