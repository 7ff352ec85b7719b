//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary median-split tree over indices into a primitive list owned by the
//! caller. Nearest-hit queries return exactly what a linear scan over the
//! same primitives would.

use std::time::Instant;

use whitted_math::{Aabb, Ray};

use crate::hit::{unit_ray, Hit, Shape, HIT_EPSILON};
use crate::Primitive;

/// Maximum primitives per leaf node before splitting.
pub const LEAF_MAX_SIZE: usize = 6;

/// BVH node - either a branch with two children or a leaf with primitive
/// indices.
#[derive(Debug)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with at most [`LEAF_MAX_SIZE`] indices.
    Leaf { indices: Vec<usize>, bbox: Aabb },
}

impl BvhNode {
    /// Recursive construction.
    ///
    /// Median split: sort by centroid along the axis where the primitive
    /// bounds are widest, split in half, recurse.
    fn build(primitives: &[Primitive], mut indices: Vec<usize>) -> Self {
        let bbox = indices
            .iter()
            .map(|&i| primitives[i].bounds())
            .reduce(|acc, b| Aabb::union(&acc, &b))
            .unwrap_or(Aabb::ZERO);

        if indices.len() <= LEAF_MAX_SIZE {
            return BvhNode::Leaf { indices, bbox };
        }

        let axis = bbox.longest_axis();

        // Stable, so equal centroids keep insertion order.
        indices.sort_by(|&a, &b| {
            primitives[a].centroid()[axis].total_cmp(&primitives[b].centroid()[axis])
        });

        let mid = indices.len() / 2;
        let right_indices = indices.split_off(mid);

        let left = Self::build(primitives, indices);
        let right = Self::build(primitives, right_indices);
        log::trace!("branch on axis {axis} with bounds {bbox:?}");

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Ray distance at which this node's box is entered, or `None` if the
    /// box is missed or lies entirely behind the origin.
    #[inline]
    fn entry(&self, ray: &Ray) -> Option<f32> {
        let t = self.bounding_box().intersect(ray)?;
        if t.max < 0.0 {
            return None;
        }
        Some(t.min.max(0.0))
    }

    /// Search below this node, keeping `best` as the closest hit so far.
    ///
    /// `ray` must have a unit direction so that box parameters and hit
    /// lambdas share one scale.
    fn nearest<'a>(&self, primitives: &'a [Primitive], ray: &Ray, best: &mut Option<Hit<'a>>) {
        match self {
            BvhNode::Leaf { indices, .. } => {
                for &i in indices {
                    if let Some(hit) = primitives[i].try_intersect(ray) {
                        if best.map_or(true, |b| hit.lambda < b.lambda) {
                            *best = Some(hit);
                        }
                    }
                }
            }

            BvhNode::Branch { left, right, .. } => {
                let mut children = [(left, left.entry(ray)), (right, right.entry(ray))];
                if let (Some(l), Some(r)) = (children[0].1, children[1].1) {
                    if r < l {
                        children.swap(0, 1);
                    }
                }

                for (child, entry) in children {
                    let Some(entry) = entry else { continue };
                    // Hits are pulled back by up to HIT_EPSILON from the box
                    // surface, so only prune boxes that are clearly farther.
                    if best.is_some_and(|b| entry - HIT_EPSILON > b.lambda) {
                        continue;
                    }
                    child.nearest(primitives, ray, best);
                }
            }
        }
    }
}

/// A built hierarchy plus statistics about its shape.
///
/// The tree stores indices only; queries take the primitive slice it was
/// built from.
#[derive(Debug)]
pub struct Bvh {
    root: BvhNode,
    depth: usize,
    leaf_count: usize,
    node_count: usize,
    primitive_count: usize,
}

impl Bvh {
    /// Build a BVH over `primitives`. An empty list yields a single empty leaf.
    pub fn new(primitives: &[Primitive]) -> Self {
        let start = Instant::now();
        let primitive_count = primitives.len();
        let root = BvhNode::build(primitives, (0..primitive_count).collect());

        let (depth, leaf_count, node_count) = Self::measure(&root);
        log::info!(
            "Built BVH over {} primitives: depth {}, {} leaves, {} nodes in {:.2?}",
            primitive_count,
            depth,
            leaf_count,
            node_count,
            start.elapsed()
        );

        Self {
            root,
            depth,
            leaf_count,
            node_count,
            primitive_count,
        }
    }

    /// (depth, leaves, nodes) of the subtree.
    fn measure(node: &BvhNode) -> (usize, usize, usize) {
        match node {
            BvhNode::Leaf { .. } => (1, 1, 1),
            BvhNode::Branch { left, right, .. } => {
                let (ld, ll, ln) = Self::measure(left);
                let (rd, rl, rn) = Self::measure(right);
                (1 + ld.max(rd), ll + rl, 1 + ln + rn)
            }
        }
    }

    /// Closest hit along `ray`, identical to
    /// [`nearest_hit_linear`](crate::nearest_hit_linear) over `primitives`.
    ///
    /// `primitives` must be the slice the BVH was built from. A slice of a
    /// different length gives no hits.
    pub fn nearest_hit<'a>(&self, primitives: &'a [Primitive], ray: &Ray) -> Option<Hit<'a>> {
        if primitives.len() != self.primitive_count {
            log::debug!(
                "BVH built over {} primitives queried with {}",
                self.primitive_count,
                primitives.len()
            );
            return None;
        }
        let ray = unit_ray(ray)?;
        self.root.entry(&ray)?;

        let mut best = None;
        self.root.nearest(primitives, &ray, &mut best);
        best
    }

    pub fn root(&self) -> &BvhNode {
        &self.root
    }

    pub fn bounds(&self) -> Aabb {
        self.root.bounding_box()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of primitives indexed by the leaves.
    pub fn len(&self) -> usize {
        self.primitive_count
    }

    pub fn is_empty(&self) -> bool {
        self.primitive_count == 0
    }

    /// Primitive indices in leaf order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        let mut stack = vec![&self.root];
        let mut leaves = Vec::with_capacity(self.leaf_count);
        while let Some(node) = stack.pop() {
            match node {
                BvhNode::Leaf { indices, .. } => leaves.push(indices),
                BvhNode::Branch { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        leaves.into_iter().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{nearest_hit_linear, Material, Plane, Rectangle, Sphere, Triangle};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use whitted_math::Vec3;

    fn random_unit(rng: &mut StdRng) -> Vec3 {
        loop {
            let v = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if v.length_squared() > 1e-4 && v.length_squared() <= 1.0 {
                return v.normalize();
            }
        }
    }

    /// Spheres on a jittered grid so none of them overlap.
    fn random_spheres(rng: &mut StdRng) -> Vec<Primitive> {
        let mut spheres = Vec::new();
        for x in 0..6 {
            for y in 0..6 {
                for z in 0..6 {
                    let cell = Vec3::new(x as f32, y as f32, z as f32) * 2.0 - Vec3::splat(5.0);
                    let jitter = Vec3::new(
                        rng.gen_range(-0.3..0.3),
                        rng.gen_range(-0.3..0.3),
                        rng.gen_range(-0.3..0.3),
                    );
                    let radius = rng.gen_range(0.1..0.6);
                    let color = Vec3::new(rng.gen(), rng.gen(), rng.gen());
                    spheres.push(Sphere::new(cell + jitter, radius, Material::new(color)).into());
                }
            }
        }
        spheres
    }

    fn assert_same_hit(bvh: Option<Hit<'_>>, linear: Option<Hit<'_>>, ray: &Ray) {
        match (bvh, linear) {
            (None, None) => {}
            (Some(a), Some(b)) => {
                assert_eq!(a.lambda, b.lambda, "lambda differs for {ray:?}");
                assert_eq!(a.position, b.position, "position differs for {ray:?}");
                assert_eq!(a.normal, b.normal, "normal differs for {ray:?}");
                assert_eq!(a.material, b.material, "material differs for {ray:?}");
            }
            (a, b) => panic!(
                "bvh hit {} but linear scan hit {} for {ray:?}",
                a.is_some(),
                b.is_some()
            ),
        }
    }

    fn assert_invariants(node: &BvhNode, primitives: &[Primitive]) -> usize {
        match node {
            BvhNode::Leaf { indices, bbox } => {
                assert!(indices.len() <= LEAF_MAX_SIZE);
                let expected = indices
                    .iter()
                    .map(|&i| primitives[i].bounds())
                    .reduce(|a, b| Aabb::union(&a, &b))
                    .unwrap_or(Aabb::ZERO);
                assert_eq!(*bbox, expected);
                indices.len()
            }
            BvhNode::Branch { left, right, bbox } => {
                let expected = Aabb::union(&left.bounding_box(), &right.bounding_box());
                assert_eq!(*bbox, expected);
                assert_invariants(left, primitives) + assert_invariants(right, primitives)
            }
        }
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = Bvh::new(&[]);
        assert!(bvh.is_empty());
        assert_eq!(bvh.bounds(), Aabb::ZERO);
        assert!(matches!(bvh.root(), BvhNode::Leaf { .. }));
        assert!(bvh.nearest_hit(&[], &Ray::new(Vec3::ZERO, Vec3::X)).is_none());
    }

    #[test]
    fn test_bvh_single_sphere() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Material::default());
        let primitives = [Primitive::from(sphere)];
        let bvh = Bvh::new(&primitives);

        // Should create a leaf
        assert!(matches!(bvh.root(), BvhNode::Leaf { .. }));
        assert_eq!(bvh.depth(), 1);

        let hit = bvh
            .nearest_hit(&primitives, &Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0)))
            .expect("ray points at sphere");
        assert!((hit.lambda - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres: Vec<Primitive> = (0..10)
            .map(|i| Sphere::new(Vec3::new(i as f32, 0.0, -5.0), 0.5, Material::default()).into())
            .collect();
        let bvh = Bvh::new(&spheres);

        assert_eq!(bvh.len(), 10);
        assert!(bvh.depth() > 1);
        let mut indices: Vec<usize> = bvh.indices().collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..10).collect::<Vec<_>>());

        // Test ray that hits sphere at x=5
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = bvh.nearest_hit(&spheres, &ray).expect("hits sphere at x=5");

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        assert!((hit.position.z - (-4.5)).abs() < 0.01);
    }

    #[test]
    fn test_bvh_structure_invariants() {
        let mut rng = StdRng::seed_from_u64(42);
        let primitives = random_spheres(&mut rng);
        let bvh = Bvh::new(&primitives);

        assert_eq!(assert_invariants(bvh.root(), &primitives), bvh.len());
        assert_eq!(bvh.node_count(), 2 * bvh.leaf_count() - 1);
    }

    #[test]
    fn test_bvh_matches_linear_scan_on_random_rays() {
        let mut rng = StdRng::seed_from_u64(42);
        let primitives = random_spheres(&mut rng);
        let bvh = Bvh::new(&primitives);

        let mut hits = 0;
        for _ in 0..1000 {
            let origin = Vec3::new(
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
            );
            let ray = Ray::new(origin, random_unit(&mut rng) * rng.gen_range(0.5..3.0));

            let expected = nearest_hit_linear(&primitives, &ray);
            hits += usize::from(expected.is_some());
            assert_same_hit(bvh.nearest_hit(&primitives, &ray), expected, &ray);
        }
        // Make sure the comparison is not vacuous.
        assert!(hits > 100, "only {hits} rays hit anything");
    }

    #[test]
    fn test_bvh_matches_linear_scan_mixed_primitives() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut primitives = random_spheres(&mut rng);
        primitives.truncate(40);
        primitives.push(Plane::new(Vec3::new(0.0, -7.0, 0.0), Vec3::Y, Material::default()).into());
        primitives.push(
            Plane::new(Vec3::new(0.0, 0.0, -9.0), Vec3::new(0.2, 0.1, 1.0), Material::default())
                .into(),
        );
        primitives.push(
            Rectangle::facing(
                Vec3::new(0.0, 0.0, 6.5),
                -Vec3::Z,
                Vec3::Y,
                6.0,
                4.0,
                Material::default(),
            )
            .into(),
        );
        for i in 0..8 {
            let base = Vec3::new(i as f32 - 4.0, 6.5, -2.0);
            primitives.push(
                Triangle::from_vertices(base, base + Vec3::X, base + Vec3::Z, Material::default())
                    .into(),
            );
        }
        let bvh = Bvh::new(&primitives);
        assert_eq!(assert_invariants(bvh.root(), &primitives), primitives.len());

        for _ in 0..1000 {
            let origin = Vec3::new(
                rng.gen_range(-6.0..6.0),
                rng.gen_range(-6.0..6.0),
                rng.gen_range(-6.0..6.0),
            );
            let ray = Ray::new(origin, random_unit(&mut rng));
            assert_same_hit(
                bvh.nearest_hit(&primitives, &ray),
                nearest_hit_linear(&primitives, &ray),
                &ray,
            );
        }
    }

    #[test]
    fn test_bvh_rejects_mismatched_primitives() {
        let spheres: Vec<Primitive> = (0..3)
            .map(|i| Sphere::new(Vec3::new(i as f32, 0.0, -5.0), 0.5, Material::default()).into())
            .collect();
        let bvh = Bvh::new(&spheres);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!(bvh.nearest_hit(&spheres, &ray).is_some());
        assert!(bvh.nearest_hit(&spheres[..2], &ray).is_none());
    }
}
