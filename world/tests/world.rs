use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use los_gemini_core::{Command, Event, GraphicsSettings, LandmarkKind};
use los_gemini_world::{self as world, query, World, WorldConfig};

#[test]
fn deterministic_replay_produces_identical_snapshots() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());
    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn ticking_moves_traffic_and_spins_the_wheel() {
    let mut world = World::default();
    let before: Vec<f32> = query::traffic(&world).iter().map(|a| a.position.z).collect();

    let mut events = Vec::new();
    world::apply(&mut world, Command::Tick { steps: 10 }, &mut events);

    assert_eq!(events.first(), Some(&Event::TimeAdvanced { steps: 10 }));
    assert_eq!(query::tick_index(&world), 10);
    for (actor, z) in query::traffic(&world).iter().zip(before) {
        assert_ne!(actor.position.z, z, "actor {} did not move", actor.index);
    }

    let wheel = query::landmarks(&world)
        .iter()
        .find(|l| l.spec.kind == LandmarkKind::FerrisWheel)
        .expect("ferris wheel");
    assert!((wheel.spin - 0.05).abs() < 1e-5);
}

#[test]
fn long_runs_report_wraps() {
    let mut world = World::default();
    let mut events = Vec::new();
    world::apply(&mut world, Command::Tick { steps: 2_000 }, &mut events);

    let wraps = events
        .iter()
        .filter(|event| matches!(event, Event::TrafficWrapped { .. }))
        .count();
    assert!(wraps > 0, "expected at least one wrap in 2000 steps");
}

#[test]
fn density_change_respawns_traffic() {
    let mut world = World::default();
    let mut wrapped = Vec::new();
    world::apply(&mut world, Command::Tick { steps: 50 }, &mut wrapped);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ApplyGraphics {
            settings: GraphicsSettings {
                traffic_density: 0.25,
                ..GraphicsSettings::default()
            },
        },
        &mut events,
    );

    assert_eq!(events[0], Event::TrafficRespawned { count: 20 });
    assert!(matches!(events[1], Event::GraphicsApplied { .. }));
    let traffic = query::traffic(&world);
    assert_eq!(traffic.len(), 20);
    assert_eq!(traffic[0].position.z, -250.0, "respawned actors restart at spawn offsets");
}

#[test]
fn unrelated_setting_changes_keep_traffic() {
    let mut world = World::default();
    let mut events = Vec::new();
    world::apply(&mut world, Command::Tick { steps: 50 }, &mut events);
    let before = query::traffic(&world).to_vec();

    events.clear();
    world::apply(
        &mut world,
        Command::ApplyGraphics {
            settings: GraphicsSettings {
                bloom: false,
                reflections: false,
                vignette: 1.8,
                ..GraphicsSettings::default()
            },
        },
        &mut events,
    );

    assert_eq!(events.len(), 1);
    assert_eq!(query::traffic(&world), before.as_slice());
    assert!(query::render_params(&world).bloom.is_none());
    assert_eq!(query::render_params(&world).vignette.darkness, 1.8);
}

#[test]
fn reconfiguring_city_regenerates_layout() {
    let mut world = World::new(WorldConfig {
        seed: 1,
        ..WorldConfig::default()
    });
    let original = query::layout(&world).clone();

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureCity {
            grid_size: 15,
            seed: 2,
        },
        &mut events,
    );

    assert_eq!(query::seed(&world), 2);
    assert_eq!(query::grid_size(&world), 15);
    assert_ne!(query::layout(&world).buildings, original.buildings);
    assert!(matches!(events[0], Event::CityGenerated { .. }));
    assert_eq!(events[1], Event::TrafficRespawned { count: 64 });
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::default();
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        log.extend(events.iter().map(EventRecord::from));
    }

    let traffic = query::traffic(&world)
        .iter()
        .map(|actor| (actor.index, actor.position.z.to_bits(), actor.speed.to_bits()))
        .collect();
    let spins = query::landmarks(&world)
        .iter()
        .map(|landmark| landmark.spin.to_bits())
        .collect();

    ReplayOutcome {
        traffic,
        spins,
        events: log,
    }
}

fn scripted_commands() -> Vec<Command> {
    vec![
        Command::ConfigureCity {
            grid_size: 10,
            seed: 7,
        },
        Command::Tick { steps: 30 },
        Command::ApplyGraphics {
            settings: GraphicsSettings {
                traffic_density: 0.5,
                ..GraphicsSettings::default()
            },
        },
        Command::Tick { steps: 900 },
        Command::ApplyGraphics {
            settings: GraphicsSettings {
                traffic_density: 0.9,
                ..GraphicsSettings::default()
            },
        },
        Command::Tick { steps: 600 },
    ]
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    traffic: Vec<(usize, u32, u32)>,
    spins: Vec<u32>,
    events: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    CityGenerated { buildings: usize, palm_trees: usize },
    TimeAdvanced { steps: u32 },
    TrafficWrapped { actor: usize },
    TrafficRespawned { count: usize },
    GraphicsApplied,
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        match event {
            Event::CityGenerated {
                buildings,
                palm_trees,
            } => Self::CityGenerated {
                buildings: *buildings,
                palm_trees: *palm_trees,
            },
            Event::TimeAdvanced { steps } => Self::TimeAdvanced { steps: *steps },
            Event::TrafficWrapped { actor, .. } => Self::TrafficWrapped { actor: *actor },
            Event::TrafficRespawned { count } => Self::TrafficRespawned { count: *count },
            Event::GraphicsApplied { .. } => Self::GraphicsApplied,
        }
    }
}
