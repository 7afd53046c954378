#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Los Gemini.

use los_gemini_core::{CityLayout, Command, Event, GraphicsSettings, Landmark, TrafficActor};
use los_gemini_system_actors as actors;
use los_gemini_system_generation::{self as generation, DEFAULT_GRID_SIZE};
use los_gemini_system_graphics::requires_traffic_respawn;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DEFAULT_SEED: u64 = 42;
const TRAFFIC_STREAM: u64 = 1;

/// Parameters required to construct a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Half extent of the city grid.
    pub grid_size: i32,
    /// Seed for layout generation and traffic sampling.
    pub seed: u64,
    /// Graphics settings active at boot.
    pub graphics: GraphicsSettings,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            seed: DEFAULT_SEED,
            graphics: GraphicsSettings::default(),
        }
    }
}

/// Represents the authoritative Los Gemini world state.
#[derive(Debug)]
pub struct World {
    grid_size: i32,
    seed: u64,
    layout: CityLayout,
    landmarks: Vec<Landmark>,
    traffic: Vec<TrafficActor>,
    traffic_rng: ChaCha8Rng,
    graphics: GraphicsSettings,
    tick_index: u64,
}

impl World {
    /// Creates a new world using the provided configuration.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        let mut world = Self {
            grid_size: config.grid_size,
            seed: config.seed,
            layout: CityLayout::default(),
            landmarks: Vec::new(),
            traffic: Vec::new(),
            traffic_rng: traffic_rng(config.seed),
            graphics: config.graphics.clamped(),
            tick_index: 0,
        };
        world.regenerate();
        world
    }

    fn regenerate(&mut self) {
        self.layout = generation::generate(self.grid_size, self.seed);
        self.landmarks = self
            .layout
            .landmarks
            .iter()
            .copied()
            .map(Landmark::from_spec)
            .collect();
        self.traffic_rng = traffic_rng(self.seed);
        self.respawn_traffic();
    }

    fn respawn_traffic(&mut self) {
        self.traffic = actors::spawn_traffic(self.graphics.traffic_density, &mut self.traffic_rng);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

fn traffic_rng(seed: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(TRAFFIC_STREAM);
    rng
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureCity { grid_size, seed } => {
            world.grid_size = grid_size;
            world.seed = seed;
            world.regenerate();
            log::debug!("city reconfigured (grid_size={grid_size}, seed={seed})");
            out_events.push(Event::CityGenerated {
                buildings: world.layout.buildings.len(),
                palm_trees: world.layout.palm_trees.len(),
            });
            out_events.push(Event::TrafficRespawned {
                count: world.traffic.len(),
            });
        }
        Command::Tick { steps } => {
            world.tick_index = world.tick_index.saturating_add(u64::from(steps));
            out_events.push(Event::TimeAdvanced { steps });

            let mut wrapped = Vec::new();
            actors::tick(&mut world.traffic, steps, &mut wrapped);
            actors::tick_landmarks(&mut world.landmarks, steps);

            for actor in wrapped {
                let lane = world.traffic[actor].lane;
                out_events.push(Event::TrafficWrapped { actor, lane });
            }
        }
        Command::ApplyGraphics { settings } => {
            let settings = settings.clamped();
            let respawn = requires_traffic_respawn(&world.graphics, &settings);
            world.graphics = settings;
            if respawn {
                world.respawn_traffic();
                log::debug!("traffic respawned with {} actors", world.traffic.len());
                out_events.push(Event::TrafficRespawned {
                    count: world.traffic.len(),
                });
            }
            out_events.push(Event::GraphicsApplied { settings });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use los_gemini_core::{CityLayout, GraphicsSettings, Landmark, TrafficActor};
    use los_gemini_system_graphics::{to_render_params, RenderParams};

    /// Provides read-only access to the generated static layout.
    #[must_use]
    pub fn layout(world: &World) -> &CityLayout {
        &world.layout
    }

    /// Landmark instances including their animation state.
    #[must_use]
    pub fn landmarks(world: &World) -> &[Landmark] {
        &world.landmarks
    }

    /// Traffic actors in spawn order.
    #[must_use]
    pub fn traffic(world: &World) -> &[TrafficActor] {
        &world.traffic
    }

    /// Graphics settings currently in effect.
    #[must_use]
    pub fn graphics(world: &World) -> &GraphicsSettings {
        &world.graphics
    }

    /// Renderer parameters derived from the active graphics settings.
    #[must_use]
    pub fn render_params(world: &World) -> RenderParams {
        to_render_params(&world.graphics)
    }

    /// Seed the current layout was generated from.
    #[must_use]
    pub fn seed(world: &World) -> u64 {
        world.seed
    }

    /// Half extent of the current city grid.
    #[must_use]
    pub fn grid_size(world: &World) -> i32 {
        world.grid_size
    }

    /// Total number of simulation steps processed.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_world_is_populated() {
        let world = World::default();
        assert!(!query::layout(&world).buildings.is_empty());
        assert_eq!(query::landmarks(&world).len(), 7);
        assert_eq!(query::traffic(&world).len(), 64);
        assert_eq!(query::tick_index(&world), 0);
    }

    #[test]
    fn boot_settings_are_clamped() {
        let world = World::new(WorldConfig {
            graphics: GraphicsSettings {
                traffic_density: 4.0,
                ..GraphicsSettings::default()
            },
            ..WorldConfig::default()
        });
        assert_eq!(query::graphics(&world).traffic_density, 1.0);
        assert_eq!(query::traffic(&world).len(), 80);
    }
}
