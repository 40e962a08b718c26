/*
 * World Module
 *
 * This module defines the World struct that owns every boid, the toroidal
 * domain they live in, and the kinds (species) they belong to.
 *
 * All boids share one vector. Each kind owns a contiguous subrange of it,
 * and the subranges appear in kind order and cover the vector exactly.
 * Population changes happen only between frames, through reconcile and
 * reset, which keep the subranges consistent.
 */

use rand::Rng;
use std::ops::Range;

use crate::boid::Boid;
use crate::params::FlockParams;
use crate::vector::FlockVector;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KindId(usize);

impl KindId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

// One species of boid and the slice of the world it occupies
#[derive(Clone, Debug, PartialEq)]
pub struct Kind {
    pub params: FlockParams,
    range: Range<usize>,
}

impl Kind {
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

pub struct World<V> {
    domain_size: V,
    boids: Vec<Boid<V>>,
    kinds: Vec<Kind>,
}

impl<V: FlockVector> World<V> {
    // Create an empty world. Every axis of `domain_size` must be positive.
    pub fn new(domain_size: V) -> Self {
        Self {
            domain_size,
            boids: Vec::new(),
            kinds: Vec::new(),
        }
    }

    pub fn with_kinds<I>(domain_size: V, kinds: I) -> Self
    where
        I: IntoIterator<Item = FlockParams>,
    {
        let mut world = Self::new(domain_size);
        for params in kinds {
            world.add_kind(params);
        }
        world
    }

    // Register a new kind with no boids yet
    pub fn add_kind(&mut self, params: FlockParams) -> KindId {
        let end = self.boids.len();
        self.kinds.push(Kind {
            params,
            range: end..end,
        });
        KindId(self.kinds.len() - 1)
    }

    #[inline]
    pub fn domain_size(&self) -> V {
        self.domain_size
    }

    #[inline]
    pub fn agents(&self) -> &[Boid<V>] {
        &self.boids
    }

    #[inline]
    pub fn kinds(&self) -> &[Kind] {
        &self.kinds
    }

    pub fn kind_ids(&self) -> impl Iterator<Item = KindId> {
        (0..self.kinds.len()).map(KindId)
    }

    #[inline]
    pub fn kind(&self, kind: KindId) -> &Kind {
        &self.kinds[kind.0]
    }

    // Changes to `count` take effect at the next reconcile
    pub fn params_mut(&mut self, kind: KindId) -> &mut FlockParams {
        &mut self.kinds[kind.0].params
    }

    pub fn kind_agents(&self, kind: KindId) -> &[Boid<V>] {
        &self.boids[self.kinds[kind.0].range.clone()]
    }

    // Parameters and mutable boids of one kind, borrowed together
    pub fn kind_parts_mut(&mut self, kind: KindId) -> (&FlockParams, &mut [Boid<V>]) {
        let kind = &self.kinds[kind.0];
        (&kind.params, &mut self.boids[kind.range.clone()])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.boids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    // Wrap a position into [0, domain_size) on every axis
    #[inline]
    pub fn wrap(&self, position: V) -> V {
        position.wrap(self.domain_size)
    }

    // Append a boid to the end of a kind, wrapping its position into the domain
    pub fn push(&mut self, kind: KindId, mut boid: Boid<V>) {
        boid.position = self.wrap(boid.position);
        let range = self.kinds[kind.0].range.clone();
        self.boids.insert(range.end, boid);
        self.resize_range(kind.0, range.len(), range.len() + 1);
    }

    // Bring one kind to exactly `target_count` boids: surplus boids are cut
    // from the tail, missing ones are spawned at the end of the kind.
    // Existing boids are left untouched.
    pub fn reconcile<R: Rng + ?Sized>(&mut self, kind: KindId, target_count: usize, rng: &mut R) {
        let range = self.kinds[kind.0].range.clone();
        let current = range.len();

        if current == target_count {
            return;
        }

        if current > target_count {
            self.boids.drain(range.start + target_count..range.end);
        } else {
            let domain_size = self.domain_size;
            let params = &self.kinds[kind.0].params;
            let spawned: Vec<Boid<V>> = (current..target_count)
                .map(|_| {
                    // Scaling can round a coordinate up onto the far edge
                    let mut boid = Boid::spawn(&mut *rng, domain_size, params);
                    boid.position = boid.position.wrap(domain_size);
                    boid
                })
                .collect();
            self.boids.splice(range.end..range.end, spawned);
        }

        self.resize_range(kind.0, current, target_count);

        tracing::trace!(
            kind = kind.0,
            from = current,
            to = target_count,
            "reconciled kind population"
        );
    }

    // Reconcile every kind to its configured count, in kind order
    pub fn reconcile_all<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for index in 0..self.kinds.len() {
            let target = self.kinds[index].params.count;
            self.reconcile(KindId(index), target, rng);
        }
    }

    // Remove every boid of every kind
    pub fn reset(&mut self) {
        self.boids.clear();
        for kind in &mut self.kinds {
            kind.range = 0..0;
        }
    }

    // Remove every boid of one kind
    pub fn reset_kind(&mut self, kind: KindId) {
        let range = self.kinds[kind.0].range.clone();
        self.boids.drain(range.clone());
        self.resize_range(kind.0, range.len(), 0);
    }

    // Update one kind's range after its length changed and shift the kinds
    // after it
    fn resize_range(&mut self, index: usize, old_len: usize, new_len: usize) {
        let start = self.kinds[index].range.start;
        self.kinds[index].range = start..start + new_len;

        for later in &mut self.kinds[index + 1..] {
            let shifted_start = later.range.start - old_len + new_len;
            later.range = shifted_start..shifted_start + later.range.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn two_kind_world() -> (World<Vec2>, KindId, KindId) {
        let mut world = World::new(Vec2::new(100.0, 100.0));
        let a = world.add_kind(FlockParams::default());
        let b = world.add_kind(FlockParams {
            agent_size: 2.0,
            ..FlockParams::default()
        });
        (world, a, b)
    }

    fn assert_ranges_cover(world: &World<Vec2>) {
        let mut expected_start = 0;
        for kind in world.kinds() {
            assert_eq!(kind.range().start, expected_start);
            expected_start = kind.range().end;
        }
        assert_eq!(expected_start, world.len());
    }

    #[test]
    fn reconcile_grows_and_shrinks() {
        let (mut world, a, _) = two_kind_world();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        world.reconcile(a, 10, &mut rng);
        assert_eq!(world.kind_agents(a).len(), 10);

        world.reconcile(a, 4, &mut rng);
        assert_eq!(world.kind_agents(a).len(), 4);

        world.reconcile(a, 0, &mut rng);
        assert!(world.is_empty());
    }

    #[test]
    fn shrinking_keeps_the_head() {
        let (mut world, a, _) = two_kind_world();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        world.reconcile(a, 8, &mut rng);
        let head: Vec<_> = world.kind_agents(a)[..3].to_vec();

        world.reconcile(a, 3, &mut rng);
        assert_eq!(world.kind_agents(a), head.as_slice());
    }

    #[test]
    fn resizing_one_kind_shifts_the_next() {
        let (mut world, a, b) = two_kind_world();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        world.reconcile(a, 5, &mut rng);
        world.reconcile(b, 7, &mut rng);
        assert_ranges_cover(&world);

        let b_before = world.kind_agents(b).to_vec();
        world.reconcile(a, 12, &mut rng);
        assert_ranges_cover(&world);
        assert_eq!(world.kind(b).range(), 12..19);
        assert_eq!(world.kind_agents(b), b_before.as_slice());

        world.reconcile(a, 2, &mut rng);
        assert_ranges_cover(&world);
        assert_eq!(world.kind_agents(b), b_before.as_slice());
        assert!(world.kind_agents(b).iter().all(|boid| boid.size == 2.0));
    }

    #[test]
    fn reconcile_all_uses_configured_counts() {
        let mut world = World::with_kinds(
            Vec2::new(50.0, 50.0),
            [
                FlockParams {
                    count: 3,
                    ..FlockParams::default()
                },
                FlockParams {
                    count: 9,
                    ..FlockParams::default()
                },
            ],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        world.reconcile_all(&mut rng);

        assert_eq!(world.len(), 12);
        assert_eq!(world.kinds()[0].len(), 3);
        assert_eq!(world.kinds()[1].len(), 9);
    }

    #[test]
    fn reset_is_idempotent() {
        let (mut world, a, b) = two_kind_world();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        world.reconcile(a, 4, &mut rng);
        world.reconcile(b, 4, &mut rng);

        world.reset();
        assert!(world.is_empty());
        assert!(world.kinds().iter().all(Kind::is_empty));

        world.reset();
        assert!(world.is_empty());
        assert_ranges_cover(&world);
    }

    #[test]
    fn reset_kind_leaves_others() {
        let (mut world, a, b) = two_kind_world();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        world.reconcile(a, 4, &mut rng);
        world.reconcile(b, 6, &mut rng);

        world.reset_kind(a);

        assert!(world.kind(a).is_empty());
        assert_eq!(world.kind(b).range(), 0..6);
        assert_ranges_cover(&world);
    }

    #[test]
    fn push_wraps_and_appends_to_kind() {
        let (mut world, a, b) = two_kind_world();
        world.push(b, Boid::new(Vec2::new(5.0, 5.0), Vec2::ZERO, 1.0));
        world.push(a, Boid::new(Vec2::new(-10.0, 130.0), Vec2::ZERO, 1.0));

        assert_eq!(world.kind(a).range(), 0..1);
        assert_eq!(world.kind(b).range(), 1..2);
        assert_eq!(world.kind_agents(a)[0].position, Vec2::new(90.0, 30.0));
    }

    #[test]
    fn wrap_keeps_positions_in_domain() {
        let world: World<Vec2> = World::new(Vec2::new(100.0, 50.0));
        assert_eq!(world.wrap(Vec2::new(-1.0, 51.0)), Vec2::new(99.0, 1.0));
        assert_eq!(world.wrap(Vec2::new(100.0, 0.0)), Vec2::new(0.0, 0.0));
    }
}
