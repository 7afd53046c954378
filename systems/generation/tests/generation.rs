use std::collections::HashSet;

use los_gemini_core::{GridCoord, LandmarkKind, Rotation, WorldPosition, CELL_SPACING};
use los_gemini_system_generation::{generate, DEFAULT_GRID_SIZE, LANDMARKS};

#[test]
fn identical_inputs_produce_identical_layouts() {
    let first = generate(DEFAULT_GRID_SIZE, 42);
    let second = generate(DEFAULT_GRID_SIZE, 42);
    assert_eq!(first, second, "layout diverged between runs");
}

#[test]
fn different_seeds_produce_different_layouts() {
    let first = generate(DEFAULT_GRID_SIZE, 1);
    let second = generate(DEFAULT_GRID_SIZE, 999_999);
    assert_ne!(first.buildings, second.buildings);
}

#[test]
fn exclusion_zone_is_never_populated() {
    for seed in 0..64 {
        let layout = generate(DEFAULT_GRID_SIZE, seed);
        assert!(
            layout.buildings.iter().all(|b| !b.cell.in_exclusion_zone()),
            "building inside spawn area for seed {seed}"
        );
        assert!(
            layout.palm_trees.iter().all(|t| !t.cell.in_exclusion_zone()),
            "palm tree inside spawn area for seed {seed}"
        );
    }
}

#[test]
fn origin_cell_holds_no_building() {
    let layout = generate(15, 42);
    let origin = GridCoord::new(0, 0);
    assert!(layout.buildings.iter().all(|b| b.cell != origin));
    assert!(layout.palm_trees.iter().all(|t| t.cell != origin));
}

#[test]
fn cells_stay_within_half_open_grid() {
    let layout = generate(4, 11);
    for building in &layout.buildings {
        let cell = building.cell;
        assert!((-4..4).contains(&cell.i()), "column out of range: {cell:?}");
        assert!((-4..4).contains(&cell.j()), "row out of range: {cell:?}");
    }
}

#[test]
fn buildings_follow_cell_geometry() {
    let layout = generate(DEFAULT_GRID_SIZE, 42);
    assert!(!layout.buildings.is_empty());

    let mut seen = HashSet::new();
    for building in &layout.buildings {
        assert!(seen.insert(building.cell), "two buildings in {:?}", building.cell);
        assert!(
            (20.0..80.0).contains(&building.height),
            "height {} out of range",
            building.height
        );
        assert_eq!(building.position.x, building.cell.i() as f32 * CELL_SPACING);
        assert_eq!(building.position.z, building.cell.j() as f32 * CELL_SPACING);
        assert_eq!(building.position.y, building.height / 2.0);
    }
}

#[test]
fn facade_colors_keep_fixed_saturation_and_lightness() {
    let layout = generate(DEFAULT_GRID_SIZE, 3);
    for building in &layout.buildings {
        let color = building.color;
        let channels = [color.red(), color.green(), color.blue()];
        let max = f32::from(*channels.iter().max().expect("three channels")) / 255.0;
        let min = f32::from(*channels.iter().min().expect("three channels")) / 255.0;
        let lightness = (max + min) / 2.0;
        assert!(
            (lightness - 0.4).abs() < 0.01,
            "lightness {lightness} for {color:?}"
        );
        assert!(((max - min) - 0.64).abs() < 0.01, "chroma off for {color:?}");
    }
}

#[test]
fn palm_trees_are_offset_from_cell_anchor() {
    let layout = generate(DEFAULT_GRID_SIZE, 42);
    for tree in &layout.palm_trees {
        let anchor = tree.cell.anchor();
        assert_eq!(tree.position, anchor.offset(10.0, 0.0, 10.0));
    }
}

#[test]
fn building_and_palm_tree_rates_are_plausible() {
    let layout = generate(DEFAULT_GRID_SIZE, 42);
    let populated_cells = 30 * 30 - 25;
    let building_rate = layout.buildings.len() as f64 / f64::from(populated_cells);
    let tree_rate = layout.palm_trees.len() as f64 / f64::from(populated_cells);
    assert!((0.5..0.7).contains(&building_rate), "building rate {building_rate}");
    assert!((0.04..0.16).contains(&tree_rate), "tree rate {tree_rate}");
}

#[test]
fn landmark_table_is_fixed() {
    let layout = generate(DEFAULT_GRID_SIZE, 42);
    assert_eq!(layout.landmarks, LANDMARKS.to_vec());
    assert_eq!(layout.landmarks, generate(DEFAULT_GRID_SIZE, 7).landmarks);

    let kinds: Vec<LandmarkKind> = layout.landmarks.iter().map(|l| l.kind).collect();
    assert_eq!(kinds, LandmarkKind::ALL.to_vec());

    let sign = layout
        .landmarks
        .iter()
        .find(|l| l.kind == LandmarkKind::Sign)
        .expect("sign landmark");
    assert_eq!(sign.position, WorldPosition::new(120.0, 60.0, -250.0));
    assert_eq!(sign.rotation, Some(Rotation::new(0.0, -0.3, 0.0)));
    assert!(layout
        .landmarks
        .iter()
        .filter(|l| l.kind != LandmarkKind::Sign)
        .all(|l| l.rotation.is_none()));
}
