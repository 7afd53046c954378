#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic city generator producing the static layout of Los Gemini.
//!
//! The generator walks the square cell grid in a fixed order and consumes a
//! single seeded random stream, so the same `(grid_size, seed)` pair always
//! yields the same layout bit for bit.

use los_gemini_core::{
    BuildingPlacement, CityLayout, Color, GridCoord, LandmarkKind, LandmarkSpec,
    PalmTreePlacement, Rotation, WorldPosition,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Grid half extent used by the shipped city.
pub const DEFAULT_GRID_SIZE: i32 = 15;

const BUILDING_THRESHOLD: f64 = 0.4;
const PALM_TREE_THRESHOLD: f64 = 0.9;
const MIN_BUILDING_HEIGHT: f64 = 20.0;
const BUILDING_HEIGHT_RANGE: f64 = 60.0;
const FACADE_SATURATION: f32 = 0.8;
const FACADE_LIGHTNESS: f32 = 0.4;
const PALM_TREE_OFFSET: f32 = 10.0;

/// Hand-placed landmarks; identical for every seed.
pub const LANDMARKS: [LandmarkSpec; 7] = [
    LandmarkSpec::at(LandmarkKind::Spire, WorldPosition::new(0.0, 50.0, -180.0)),
    LandmarkSpec::rotated(
        LandmarkKind::Sign,
        WorldPosition::new(120.0, 60.0, -250.0),
        Rotation::new(0.0, -0.3, 0.0),
    ),
    LandmarkSpec::at(LandmarkKind::FerrisWheel, WorldPosition::new(-150.0, 25.0, 80.0)),
    LandmarkSpec::at(LandmarkKind::Observatory, WorldPosition::new(180.0, 0.0, 180.0)),
    LandmarkSpec::at(LandmarkKind::Cathedral, WorldPosition::new(-180.0, 0.0, -180.0)),
    LandmarkSpec::at(LandmarkKind::Plaza, WorldPosition::new(80.0, 0.0, 150.0)),
    LandmarkSpec::at(LandmarkKind::Boardwalk, WorldPosition::new(-220.0, 0.0, 150.0)),
];

/// Generates the static city layout for the provided grid half extent and seed.
///
/// Cells are visited with `i` ascending over `-grid_size..grid_size` and `j`
/// ascending within each row. Cells inside the spawn exclusion zone are
/// skipped without consuming random draws. For every other cell the building
/// draw is taken first (followed by its height and hue draws when a building
/// is placed), then the palm tree draw.
#[must_use]
pub fn generate(grid_size: i32, seed: u64) -> CityLayout {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut layout = CityLayout {
        buildings: Vec::new(),
        palm_trees: Vec::new(),
        landmarks: LANDMARKS.to_vec(),
    };

    let extent = grid_size.max(0);
    for i in -extent..extent {
        for j in -extent..extent {
            let cell = GridCoord::new(i, j);
            if cell.in_exclusion_zone() {
                continue;
            }

            if let Some(building) = place_building(cell, &mut rng) {
                layout.buildings.push(building);
            }

            if rng.gen::<f64>() > PALM_TREE_THRESHOLD {
                layout.palm_trees.push(PalmTreePlacement {
                    cell,
                    position: cell.anchor().offset(PALM_TREE_OFFSET, 0.0, PALM_TREE_OFFSET),
                });
            }
        }
    }

    log::debug!(
        "generated city (grid_size={grid_size}, seed={seed}): {} buildings, {} palm trees",
        layout.buildings.len(),
        layout.palm_trees.len()
    );
    layout
}

fn place_building(cell: GridCoord, rng: &mut ChaCha8Rng) -> Option<BuildingPlacement> {
    if rng.gen::<f64>() <= BUILDING_THRESHOLD {
        return None;
    }

    let height = (MIN_BUILDING_HEIGHT + rng.gen::<f64>() * BUILDING_HEIGHT_RANGE) as f32;
    let hue = rng.gen::<f64>() as f32;
    Some(BuildingPlacement {
        cell,
        position: cell.anchor().offset(0.0, height / 2.0, 0.0),
        height,
        color: Color::from_hsl(hue, FACADE_SATURATION, FACADE_LIGHTNESS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid_still_carries_landmarks() {
        let layout = generate(0, 7);
        assert!(layout.buildings.is_empty());
        assert!(layout.palm_trees.is_empty());
        assert_eq!(layout.landmarks.len(), LANDMARKS.len());
    }

    #[test]
    fn negative_grid_size_is_treated_as_empty() {
        assert_eq!(generate(-4, 7), generate(0, 7));
    }
}
