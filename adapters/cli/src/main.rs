#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Los Gemini experience.

mod config;
mod headless;
mod script;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use los_gemini_core::{CityLayout, Command, Event};
use los_gemini_narrative::{NarrativeDispatcher, Narrator};
use los_gemini_rendering::{Color, FrameInput, Presentation, RenderingBackend, Scene};
use los_gemini_system_session::{reduce, Effect, KeyPress, SessionEvent, SessionState};
use los_gemini_world::{self as world, query, World};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    headless::HeadlessBackend,
    script::{Script, DEFAULT_SCRIPT},
};

const DEFAULT_LOG_FILTER: &str = "los_gemini=info";
const WINDOW_TITLE: &str = "Los Gemini";
const CLEAR_COLOR: u32 = 0x050308;

#[derive(Parser, Debug)]
#[command(name = "los-gemini", about = "Los Gemini open-city simulation", version)]
struct Args {
    /// TOML configuration file
    #[arg(long, env = "LOS_GEMINI_CONFIG")]
    config: Option<PathBuf>,

    /// Layout and traffic seed, overriding the config file
    #[arg(long, env = "LOS_GEMINI_SEED")]
    seed: Option<u64>,

    /// Half extent of the city grid, overriding the config file
    #[arg(long)]
    grid_size: Option<i32>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Scripted input, e.g. "240:start,300:phone,320:mission"
    #[arg(long, default_value = DEFAULT_SCRIPT)]
    script: String,

    /// Writes the generated city layout as JSON
    #[arg(long)]
    dump_city: Option<PathBuf>,

    /// Gemini API key; without one the narrative runs offline
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

/// Entry point for the Los Gemini command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.world.seed = seed;
    }
    if let Some(grid_size) = args.grid_size {
        config.world.grid_size = grid_size;
    }
    let script = Script::parse(&args.script).context("invalid --script")?;

    let world = World::new(config.world_config());
    log::info!(
        "Los Gemini city ready (seed={}, grid_size={}, buildings={}, trees={})",
        query::seed(&world),
        query::grid_size(&world),
        query::layout(&world).buildings.len(),
        query::layout(&world).palm_trees.len(),
    );

    if let Some(path) = &args.dump_city {
        dump_city(&world, path)?;
    }

    let narrator = Narrator::from_config(config.gemini_config(args.api_key))
        .context("failed to create narrative client")?;
    log::info!(
        "narrative source: {}",
        if narrator.is_online() { "gemini" } else { "offline" }
    );
    let dispatcher =
        NarrativeDispatcher::new(narrator).context("failed to start narrative runtime")?;

    let scene = Scene::assemble(
        query::layout(&world),
        query::landmarks(&world),
        query::traffic(&world),
        &query::render_params(&world),
    );
    let presentation = Presentation::new(WINDOW_TITLE, Color::from_hex(CLEAR_COLOR), scene);
    let backend = HeadlessBackend::new(args.frames, config.frame_time(), &script);

    let mut app = App {
        world,
        session: SessionState::new(config.session_config(), config.graphics),
        dispatcher,
        script,
        frame: 0,
        frames: args.frames,
        ticks_per_frame: config.headless.ticks_per_frame,
        narrative_timeout: config.narrative_timeout(),
        events: Vec::new(),
        effects: Vec::new(),
        world_events: Vec::new(),
    };
    backend.run(presentation, move |dt, input, scene| {
        app.on_frame(dt, input, scene)
    })
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[derive(Serialize)]
struct CityExport<'a> {
    seed: u64,
    grid_size: i32,
    layout: &'a CityLayout,
}

fn dump_city(world: &World, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(
        &mut writer,
        &CityExport {
            seed: query::seed(world),
            grid_size: query::grid_size(world),
            layout: query::layout(world),
        },
    )
    .with_context(|| format!("failed to write city layout to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    log::info!("city layout written to {}", path.display());
    Ok(())
}

/// Frame loop state shared by every frame of a run.
struct App {
    world: World,
    session: SessionState,
    dispatcher: NarrativeDispatcher<Narrator>,
    script: Script,
    frame: u64,
    frames: u64,
    ticks_per_frame: u32,
    narrative_timeout: Duration,
    events: Vec<SessionEvent>,
    effects: Vec<Effect>,
    world_events: Vec<Event>,
}

impl App {
    fn on_frame(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        self.script
            .session_events_at(self.frame, self.session.graphics, &mut self.events);
        for (pressed, key) in [
            (input.phone, KeyPress::Phone),
            (input.radio, KeyPress::Radio),
            (input.escape, KeyPress::Escape),
        ] {
            if pressed {
                self.events.push(SessionEvent::KeyPressed(key));
            }
        }
        self.events.push(SessionEvent::Elapsed { dt });
        self.dispatcher.drain(&mut self.events);

        let mut events = std::mem::take(&mut self.events);
        for event in events.drain(..) {
            self.handle(event, scene);
        }
        self.events = events;

        world::apply(
            &mut self.world,
            Command::Tick {
                steps: self.ticks_per_frame,
            },
            &mut self.world_events,
        );
        for event in self.world_events.drain(..) {
            log::trace!("{event:?}");
        }
        scene.refresh_dynamic(query::landmarks(&self.world), query::traffic(&self.world));

        self.frame += 1;
        if self.frame == self.frames {
            self.finish(scene);
        }
    }

    fn handle(&mut self, event: SessionEvent, scene: &mut Scene) {
        let screen = self.session.screen;
        let transcript = self.session.radio_transcript.clone();
        let dialogue_len = self.session.dialogue.len();

        let state = std::mem::take(&mut self.session);
        self.session = reduce(state, event, &mut self.effects);

        if self.session.screen != screen {
            log::info!("screen: {:?}", self.session.screen);
        }
        if self.session.radio_transcript != transcript {
            log::info!(
                "radio [{}]: {}",
                self.session.station.label(),
                self.session.radio_transcript
            );
        }
        for line in &self.session.dialogue[dialogue_len..] {
            log::info!("phone: {line}");
        }

        for effect in std::mem::take(&mut self.effects) {
            match effect {
                Effect::ApplyGraphics(settings) => {
                    world::apply(
                        &mut self.world,
                        Command::ApplyGraphics { settings },
                        &mut self.world_events,
                    );
                    scene.apply_params(&query::render_params(&self.world));
                }
                narrative => {
                    let _ = self.dispatcher.dispatch(&narrative);
                }
            }
        }
    }

    fn finish(&mut self, scene: &mut Scene) {
        while self.dispatcher.outstanding() > 0 {
            let Some(event) = self.dispatcher.wait_next(self.narrative_timeout) else {
                log::warn!(
                    "{} narrative requests still outstanding at shutdown",
                    self.dispatcher.outstanding()
                );
                break;
            };
            self.handle(event, scene);
        }

        let stats = self.session.stats;
        log::info!(
            "run finished after {} ticks: screen={:?} wanted={} money={} mission={}",
            query::tick_index(&self.world),
            self.session.screen,
            stats.wanted_level,
            stats.money,
            self.session
                .current_mission
                .as_ref()
                .map_or("none", |mission| mission.title.as_str()),
        );
    }
}
