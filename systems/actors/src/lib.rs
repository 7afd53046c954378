#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Dynamic actor updater that spawns traffic and advances per-tick animation.
//!
//! Traffic runs on two opposing one-way lanes forming an endless 500-unit
//! loop. Actors never interact; overlapping vehicles are accepted.

use std::f32::consts::TAU;

use los_gemini_core::{Color, Landmark, Lane, TrafficActor, WorldPosition};
use rand::Rng;

/// Number of vehicles spawned at full traffic density.
pub const MAX_TRAFFIC: f64 = 80.0;

/// Longitudinal bound of each lane; actors wrap when crossing it.
pub const LANE_HALF_LENGTH: f32 = 250.0;

/// Angle added to the Ferris wheel each simulation step, in radians.
pub const WHEEL_STEP: f32 = 0.005;

const LOOP_LENGTH: f32 = 2.0 * LANE_HALF_LENGTH;
const SPAWN_SPACING: f32 = 25.5;
const LANE_OFFSET: f32 = 20.0;
const LANE_SHOULDER: f32 = 5.0;
const CAR_RIDE_HEIGHT: f32 = 0.75;
const MIN_SPEED: f32 = 0.2;
const SPEED_RANGE: f32 = 0.3;

const TRAFFIC_PALETTE: [Color; 6] = [
    Color::from_hex(0xff0000),
    Color::from_hex(0xffffff),
    Color::from_hex(0x111111),
    Color::from_hex(0x0044ff),
    Color::from_hex(0xffff00),
    Color::from_hex(0x44ff44),
];

/// Number of actors spawned for the provided density, clamped to `0.0..=1.0`.
#[must_use]
pub fn traffic_count(density: f64) -> usize {
    let density = if density.is_nan() {
        0.0
    } else {
        density.clamp(0.0, 1.0)
    };
    (MAX_TRAFFIC * density).floor() as usize
}

/// Spawns a fresh traffic list for the provided density.
///
/// Even indices travel the forward lane and odd indices the reverse lane.
/// Actors start evenly spaced along the loop. Each actor draws its speed and
/// then its color from `rng`, in index order.
pub fn spawn_traffic<R>(density: f64, rng: &mut R) -> Vec<TrafficActor>
where
    R: Rng + ?Sized,
{
    let count = traffic_count(density);
    let actors: Vec<TrafficActor> = (0..count)
        .map(|index| {
            let lane = Lane::for_index(index);
            let speed = MIN_SPEED + rng.gen::<f32>() * SPEED_RANGE;
            let color = TRAFFIC_PALETTE[rng.gen_range(0..TRAFFIC_PALETTE.len())];
            TrafficActor {
                index,
                lane,
                position: spawn_position(index, lane),
                speed,
                color,
            }
        })
        .collect();

    log::debug!("spawned {} traffic actors (density={density})", actors.len());
    actors
}

fn spawn_position(index: usize, lane: Lane) -> WorldPosition {
    let lateral = lane.sign() * LANE_OFFSET + lane.sign() * LANE_SHOULDER;
    let longitudinal = (index as f32 * SPAWN_SPACING) % LOOP_LENGTH - LANE_HALF_LENGTH;
    WorldPosition::new(lateral, CAR_RIDE_HEIGHT, longitudinal)
}

/// Advances every actor by `steps` simulation steps.
///
/// Indices of actors that wrapped around are appended to `wrapped`, once per
/// wrap.
pub fn tick(actors: &mut [TrafficActor], steps: u32, wrapped: &mut Vec<usize>) {
    for _ in 0..steps {
        for actor in actors.iter_mut() {
            if advance(actor) {
                wrapped.push(actor.index);
            }
        }
    }
}

/// Advances a single actor by one step, returning `true` when it wrapped.
pub fn advance(actor: &mut TrafficActor) -> bool {
    actor.position.z += actor.speed * actor.lane.sign();
    match actor.lane {
        Lane::Forward if actor.position.z > LANE_HALF_LENGTH => {
            actor.position.z = -LANE_HALF_LENGTH;
            true
        }
        Lane::Reverse if actor.position.z < -LANE_HALF_LENGTH => {
            actor.position.z = LANE_HALF_LENGTH;
            true
        }
        _ => false,
    }
}

/// Advances landmark animation by `steps` simulation steps.
pub fn tick_landmarks(landmarks: &mut [Landmark], steps: u32) {
    for landmark in landmarks
        .iter_mut()
        .filter(|landmark| landmark.spec.kind.is_animated())
    {
        landmark.spin = (landmark.spin + WHEEL_STEP * steps as f32).rem_euclid(TAU);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_sit_on_opposite_shoulders() {
        assert_eq!(spawn_position(0, Lane::Forward).x, 25.0);
        assert_eq!(spawn_position(1, Lane::Reverse).x, -25.0);
    }

    #[test]
    fn spawn_positions_wrap_around_loop() {
        assert_eq!(spawn_position(0, Lane::Forward).z, -250.0);
        assert_eq!(spawn_position(2, Lane::Forward).z, -199.0);
        // 20 * 25.5 = 510, which wraps past the 500-unit loop.
        assert_eq!(spawn_position(20, Lane::Forward).z, -240.0);
    }

    #[test]
    fn nan_density_spawns_nothing() {
        assert_eq!(traffic_count(f64::NAN), 0);
    }
}
