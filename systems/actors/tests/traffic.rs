use std::f32::consts::TAU;

use los_gemini_core::{Color, Landmark, LandmarkKind, Lane, TrafficActor, WorldPosition};
use los_gemini_system_actors::{
    advance, spawn_traffic, tick, tick_landmarks, traffic_count, LANE_HALF_LENGTH, WHEEL_STEP,
};
use los_gemini_system_generation::LANDMARKS;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(0x5eed_cafe)
}

fn actor(lane: Lane, z: f32, speed: f32) -> TrafficActor {
    TrafficActor {
        index: 0,
        lane,
        position: WorldPosition::new(lane.sign() * 25.0, 0.75, z),
        speed,
        color: Color::from_hex(0xffffff),
    }
}

#[test]
fn spawn_count_follows_density() {
    assert_eq!(spawn_traffic(0.8, &mut rng()).len(), 64);
    assert_eq!(spawn_traffic(0.0, &mut rng()).len(), 0);
    assert_eq!(spawn_traffic(1.0, &mut rng()).len(), 80);

    for tenth in 0..=10 {
        let density = f64::from(tenth) / 10.0;
        let expected = (80.0 * density).floor() as usize;
        assert_eq!(traffic_count(density), expected, "density {density}");
        assert_eq!(spawn_traffic(density, &mut rng()).len(), expected);
    }
}

#[test]
fn out_of_range_density_is_clamped() {
    assert_eq!(traffic_count(-0.5), 0);
    assert_eq!(traffic_count(3.0), 80);
}

#[test]
fn lanes_split_by_index_parity() {
    for count_density in [0.0125, 0.5, 0.8, 0.9875] {
        let actors = spawn_traffic(count_density, &mut rng());
        let forward = actors.iter().filter(|a| a.lane == Lane::Forward).count();
        let reverse = actors.len() - forward;
        assert_eq!(forward, actors.len().div_ceil(2));
        assert_eq!(reverse, actors.len() / 2);
        for actor in &actors {
            assert_eq!(actor.lane, Lane::for_index(actor.index));
        }
    }
}

#[test]
fn spawned_actors_have_bounded_speed_and_evenly_spaced_offsets() {
    let actors = spawn_traffic(1.0, &mut rng());
    for actor in &actors {
        assert!(
            (0.2..0.5).contains(&actor.speed),
            "speed {} out of range",
            actor.speed
        );
        let expected = (actor.index as f32 * 25.5) % 500.0 - 250.0;
        assert_eq!(actor.position.z, expected);
        assert_eq!(actor.position.y, 0.75);
        let expected_x = if actor.lane == Lane::Forward { 25.0 } else { -25.0 };
        assert_eq!(actor.position.x, expected_x);
    }
}

#[test]
fn spawning_is_deterministic_for_a_seeded_stream() {
    assert_eq!(spawn_traffic(0.8, &mut rng()), spawn_traffic(0.8, &mut rng()));
}

#[test]
fn forward_actor_wraps_to_exact_lower_bound() {
    let mut car = actor(Lane::Forward, 249.9, 0.3);
    assert!(advance(&mut car));
    assert_eq!(car.position.z, -LANE_HALF_LENGTH);
}

#[test]
fn reverse_actor_wraps_to_exact_upper_bound() {
    let mut car = actor(Lane::Reverse, -249.9, 0.3);
    assert!(advance(&mut car));
    assert_eq!(car.position.z, LANE_HALF_LENGTH);
}

#[test]
fn actor_reaching_bound_exactly_does_not_wrap() {
    let mut car = actor(Lane::Forward, 249.5, 0.5);
    assert!(!advance(&mut car));
    assert_eq!(car.position.z, 250.0);
}

#[test]
fn positions_never_leave_the_loop() {
    let mut actors = spawn_traffic(1.0, &mut rng());
    let mut wrapped = Vec::new();

    for _ in 0..5_000 {
        let before: Vec<f32> = actors.iter().map(|a| a.position.z).collect();
        wrapped.clear();
        tick(&mut actors, 1, &mut wrapped);

        for (actor, previous) in actors.iter().zip(before) {
            let z = actor.position.z;
            assert!(
                (-LANE_HALF_LENGTH..=LANE_HALF_LENGTH).contains(&z),
                "actor {} escaped the loop at {z}",
                actor.index
            );
            let moved_backwards = match actor.lane {
                Lane::Forward => z < previous,
                Lane::Reverse => z > previous,
            };
            if moved_backwards {
                let reset = -actor.lane.sign() * LANE_HALF_LENGTH;
                assert_eq!(z, reset, "actor {} wrapped to {z}", actor.index);
                assert!(wrapped.contains(&actor.index));
            }
        }
    }
}

#[test]
fn multi_step_tick_matches_repeated_single_steps() {
    let mut batched = spawn_traffic(0.5, &mut rng());
    let mut stepped = batched.clone();
    let mut wrapped = Vec::new();

    tick(&mut batched, 120, &mut wrapped);
    let batched_wraps = wrapped.len();

    wrapped.clear();
    for _ in 0..120 {
        tick(&mut stepped, 1, &mut wrapped);
    }

    assert_eq!(batched, stepped);
    assert_eq!(batched_wraps, wrapped.len());
}

#[test]
fn lane_assignment_survives_ticking() {
    let mut actors = spawn_traffic(0.8, &mut rng());
    let lanes: Vec<Lane> = actors.iter().map(|a| a.lane).collect();
    let mut wrapped = Vec::new();
    tick(&mut actors, 3_000, &mut wrapped);
    assert_eq!(actors.iter().map(|a| a.lane).collect::<Vec<_>>(), lanes);
}

fn angular_distance(a: f32, b: f32) -> f32 {
    let delta = (a - b).rem_euclid(TAU);
    delta.min(TAU - delta)
}

#[test]
fn ferris_wheel_accumulates_fixed_increment() {
    let mut landmarks: Vec<Landmark> = LANDMARKS.iter().copied().map(Landmark::from_spec).collect();

    let ticks = 1_500;
    for _ in 0..ticks {
        tick_landmarks(&mut landmarks, 1);
    }

    for landmark in &landmarks {
        if landmark.spec.kind == LandmarkKind::FerrisWheel {
            let expected = WHEEL_STEP * ticks as f32;
            assert!(
                angular_distance(landmark.spin, expected) < 1e-3,
                "spin {} expected {expected}",
                landmark.spin
            );
            assert!((0.0..TAU).contains(&landmark.spin));
        } else {
            assert_eq!(landmark.spin, 0.0, "{:?} should not rotate", landmark.spec.kind);
        }
    }
}

#[test]
fn batched_landmark_ticks_match_single_steps() {
    let mut batched: Vec<Landmark> = LANDMARKS.iter().copied().map(Landmark::from_spec).collect();
    let mut stepped = batched.clone();

    tick_landmarks(&mut batched, 40);
    for _ in 0..40 {
        tick_landmarks(&mut stepped, 1);
    }

    for (a, b) in batched.iter().zip(&stepped) {
        assert!(angular_distance(a.spin, b.spin) < 1e-4);
    }
}
