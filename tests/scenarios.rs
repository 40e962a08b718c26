use flocking::{Boid, FlockParams, FlockStepper, FlockVector, World};
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn pair_world(separation: f32) -> World<Vec2> {
    let mut world = World::new(Vec2::new(100.0, 100.0));
    let kind = world.add_kind(FlockParams {
        count: 2,
        ..FlockParams::default()
    });
    // Both face +y; the second boid sits straight ahead of the first
    world.push(kind, Boid::new(Vec2::new(50.0, 50.0), Vec2::ZERO, 1.0));
    world.push(kind, Boid::new(Vec2::new(50.0, 50.0 + separation), Vec2::ZERO, 1.0));
    world
}

#[test]
fn test_close_pair_repels() {
    let mut world = pair_world(3.0);
    let info = FlockStepper::new().step(&mut world, 1.0 / 60.0);

    let trailing = &world.agents()[0];
    assert!(trailing.last_avoid.length() > 0.0);
    assert!(trailing.last_avoid.y < 0.0, "avoidance should point away from the leader");
    assert_eq!(info.avoiding_pairs, 1);
}

#[test]
fn test_distant_pair_ignores_each_other() {
    let mut world = pair_world(30.0);
    let info = FlockStepper::new().step(&mut world, 1.0 / 60.0);

    for boid in world.agents() {
        assert_eq!(boid.last_avoid, Vec2::ZERO);
        assert_eq!(boid.last_align, Vec2::ZERO);
        assert_eq!(boid.last_center, Vec2::ZERO);
    }
    assert_eq!(info.sensed_pairs, 0);
}

#[test]
fn test_reconcile_preserves_existing_boids() {
    let mut world = World::new(Vec2::new(80.0, 80.0));
    let kind = world.add_kind(FlockParams::default());
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    world.reconcile(kind, 20, &mut rng);
    let mut stepper = FlockStepper::new();
    stepper.step(&mut world, 0.05);
    let stepped = world.agents().to_vec();

    world.reconcile(kind, 20, &mut rng);
    assert_eq!(world.agents(), stepped.as_slice(), "reconcile at target is a no-op");

    world.reconcile(kind, 30, &mut rng);
    assert_eq!(&world.agents()[..20], stepped.as_slice());
    assert_eq!(world.len(), 30);
}

#[test]
fn test_spawned_boids_start_inside_domain_at_low_speed() {
    let domain = Vec2::new(64.0, 48.0);
    let params = FlockParams {
        agent_size: 2.5,
        ..FlockParams::default()
    };
    let mut world = World::with_kinds(domain, [params.clone()]);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    world.reconcile_all(&mut rng);

    assert_eq!(world.len(), params.count);
    for boid in world.agents() {
        assert!(boid.position.cmpge(Vec2::ZERO).all());
        assert!(boid.position.cmplt(domain).all());
        assert!(boid.speed() <= params.speed_target * 0.2 + 1e-4);
        assert_eq!(boid.size, 2.5);
        assert_eq!(boid.heading, Vec2::FORWARD);
        assert!((0.0..1.0).contains(&boid.color_tag));
    }
}

#[test]
fn test_each_kind_uses_its_own_parameters() {
    let mut world = World::new(Vec2::new(200.0, 200.0));
    let slow = world.add_kind(FlockParams {
        speed_target: 5.0,
        ..FlockParams::default()
    });
    let fast = world.add_kind(FlockParams {
        speed_target: 40.0,
        ..FlockParams::default()
    });
    world.push(slow, Boid::new(Vec2::new(20.0, 20.0), Vec2::new(0.0, 1.0), 1.0));
    world.push(fast, Boid::new(Vec2::new(150.0, 150.0), Vec2::new(0.0, 1.0), 1.0));

    let mut stepper = FlockStepper::new();
    for _ in 0..1500 {
        stepper.step(&mut world, 1.0 / 60.0);
    }

    assert!((world.kind_agents(slow)[0].speed() - 5.0).abs() < 0.1);
    assert!((world.kind_agents(fast)[0].speed() - 40.0).abs() < 0.1);
}

#[test]
fn test_empty_world_steps_cleanly() {
    let mut world: World<Vec2> = World::new(Vec2::new(10.0, 10.0));
    world.add_kind(FlockParams::default());

    let info = FlockStepper::with_modes(true, true).step(&mut world, 0.1);

    assert_eq!(info.boids, 0);
    assert!(world.is_empty());
}
