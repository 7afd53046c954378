#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Application session state and the pure reducer that advances it.
//!
//! [`reduce`] consumes one [`SessionEvent`] and returns the next
//! [`SessionState`]. Work that must happen outside the reducer, such as
//! narrative requests or installing graphics settings in the world, is
//! requested by appending [`Effect`] values. Outcomes of that work come back
//! as further events, so the reducer never blocks and never fails.

use std::time::Duration;

use los_gemini_core::{GraphicsSettings, Mission, PlayerStats, RadioStation, Screen};

/// Greeting the fixer sends the first time the phone is opened.
pub const FIXER_GREETING: &str =
    "The city is yours for the taking. Call me when you want to make some noise.";

/// Dialogue line appended when a mission request fails.
pub const SIGNAL_LOST: &str = "Signal's dropping. Try again in a minute.";

/// Transcript shown before the first broadcast arrives.
pub const BOOT_TRANSCRIPT: &str = "Waking up in Los Gemini... checking the feed.";

const FIXER: &str = "Fixer";
const ASKING_FOR_WORK: &str = "called asking for work";
const TOOK_THE_JOB: &str = "took the job";

const NEWS_TUNING_TRANSCRIPT: &str = "Tuning to live AI news...";
const MUSIC_TUNING_TRANSCRIPT: &str = "Switching waves...";

/// Timing knobs of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long the boot splash stays up before the main menu appears.
    pub loading_duration: Duration,
    /// Period of the automatic broadcast refresh while playing.
    pub broadcast_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            loading_duration: Duration::from_millis(3_500),
            broadcast_interval: Duration::from_secs(60),
        }
    }
}

/// Keyboard shortcuts recognised while playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyPress {
    /// `P` toggles the phone.
    Phone,
    /// `R` tunes to the next station.
    Radio,
    /// `Escape` closes the phone or returns to the menu.
    Escape,
}

/// Inputs to the session reducer.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// Wall-clock time passed.
    Elapsed {
        /// Time since the previous `Elapsed` event.
        dt: Duration,
    },
    /// Main menu "start" was chosen.
    StartGame,
    /// Main menu "display config" was chosen.
    OpenSettings,
    /// Settings "apply & return" was chosen.
    BackToMenu,
    /// A keyboard shortcut was pressed.
    KeyPressed(KeyPress),
    /// The HUD phone button was clicked.
    TogglePhone,
    /// The HUD radio button was clicked.
    CycleRadio,
    /// The radio feed was switched on or off.
    SetRadioPower(bool),
    /// The phone's "get work" button was clicked.
    RequestMission,
    /// The phone's "talk" button was clicked.
    TalkToNpc,
    /// The settings screen produced a new configuration.
    UpdateGraphics(GraphicsSettings),
    /// The narrative service delivered a mission.
    MissionGenerated(Mission),
    /// The narrative service failed to deliver a mission.
    MissionFailed,
    /// The narrative service delivered a broadcast transcript.
    BroadcastReceived(String),
    /// The narrative service failed to deliver a broadcast.
    BroadcastFailed,
    /// The narrative service delivered an NPC reaction.
    DialogueReceived {
        /// Who is speaking.
        npc_kind: String,
        /// What they said.
        line: String,
    },
    /// The narrative service failed to deliver an NPC reaction.
    DialogueFailed,
}

/// Side effects requested by the reducer.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Ask the narrative service for a mission.
    GenerateMission {
        /// Player reputation used to frame the mission.
        reputation: u32,
    },
    /// Ask the narrative service for a news broadcast.
    GenerateBroadcast {
        /// Current wanted level.
        wanted_level: u32,
        /// Title of the current mission, if any.
        mission_title: Option<String>,
    },
    /// Ask the narrative service for an NPC reaction.
    GenerateDialogue {
        /// Who is reacting.
        npc_kind: String,
        /// What the player did.
        player_action: String,
    },
    /// Install new graphics settings in the world.
    ApplyGraphics(GraphicsSettings),
}

/// Complete application state owned by the frame loop.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    /// Timing knobs.
    pub config: SessionConfig,
    /// HUD statistics.
    pub stats: PlayerStats,
    /// Screen currently shown.
    pub screen: Screen,
    /// Mission most recently received, if any.
    pub current_mission: Option<Mission>,
    /// Whether `current_mission` is in progress.
    pub mission_active: bool,
    /// Whether the phone overlay is open.
    pub phone_open: bool,
    /// Whether the radio feed is on.
    pub radio_on: bool,
    /// Station currently tuned.
    pub station: RadioStation,
    /// Text shown in the radio ticker.
    pub radio_transcript: String,
    /// Items carried by the player.
    pub inventory: Vec<String>,
    /// Active graphics settings.
    pub graphics: GraphicsSettings,
    /// Messages exchanged with the fixer, oldest first.
    pub dialogue: Vec<String>,
    /// Whether a mission request is in flight.
    pub mission_pending: bool,
    loading_elapsed: Duration,
    broadcast_elapsed: Duration,
}

impl SessionState {
    /// Creates the boot state with the provided timing and graphics settings.
    #[must_use]
    pub fn new(config: SessionConfig, graphics: GraphicsSettings) -> Self {
        Self {
            config,
            stats: PlayerStats::default(),
            screen: Screen::Loading,
            current_mission: None,
            mission_active: false,
            phone_open: false,
            radio_on: true,
            station: RadioStation::LosGeminiNews,
            radio_transcript: BOOT_TRANSCRIPT.to_owned(),
            inventory: vec!["Pistol".to_owned(), "Phone".to_owned()],
            graphics: graphics.clamped(),
            dialogue: Vec::new(),
            mission_pending: false,
            loading_elapsed: Duration::ZERO,
            broadcast_elapsed: Duration::ZERO,
        }
    }

    fn broadcast_request(&self) -> Effect {
        Effect::GenerateBroadcast {
            wanted_level: self.stats.wanted_level,
            mission_title: self
                .current_mission
                .as_ref()
                .map(|mission| mission.title.clone()),
        }
    }

    fn dialogue_request(&self) -> Effect {
        let (npc_kind, player_action) = match &self.current_mission {
            Some(mission) if self.mission_active => (mission.giver.as_str(), TOOK_THE_JOB),
            _ => (FIXER, ASKING_FOR_WORK),
        };
        Effect::GenerateDialogue {
            npc_kind: npc_kind.to_owned(),
            player_action: player_action.to_owned(),
        }
    }

    fn request_broadcast(&self, out: &mut Vec<Effect>) {
        if self.radio_on {
            out.push(self.broadcast_request());
        }
    }

    fn enter(&mut self, screen: Screen) {
        log::debug!("screen {:?} -> {screen:?}", self.screen);
        self.screen = screen;
        self.broadcast_elapsed = Duration::ZERO;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(SessionConfig::default(), GraphicsSettings::default())
    }
}

/// Advances the session by a single event.
#[must_use]
pub fn reduce(mut state: SessionState, event: SessionEvent, out: &mut Vec<Effect>) -> SessionState {
    match event {
        SessionEvent::Elapsed { dt } => elapse(&mut state, dt, out),
        SessionEvent::StartGame => {
            if state.screen == Screen::Menu {
                state.enter(Screen::Game);
                state.request_broadcast(out);
            }
        }
        SessionEvent::OpenSettings => {
            if state.screen == Screen::Menu {
                state.enter(Screen::Settings);
            }
        }
        SessionEvent::BackToMenu => {
            if state.screen == Screen::Settings {
                state.enter(Screen::Menu);
            }
        }
        SessionEvent::KeyPressed(key) => {
            if state.screen == Screen::Game {
                match key {
                    KeyPress::Phone => toggle_phone(&mut state),
                    KeyPress::Radio => cycle_radio(&mut state, out),
                    KeyPress::Escape if state.phone_open => state.phone_open = false,
                    KeyPress::Escape => state.enter(Screen::Menu),
                }
            }
        }
        SessionEvent::TogglePhone => {
            if state.screen == Screen::Game {
                toggle_phone(&mut state);
            }
        }
        SessionEvent::CycleRadio => {
            if state.screen == Screen::Game {
                cycle_radio(&mut state, out);
            }
        }
        SessionEvent::SetRadioPower(on) => {
            let switched_on = on && !state.radio_on;
            state.radio_on = on;
            state.broadcast_elapsed = Duration::ZERO;
            if switched_on && state.screen == Screen::Game && state.station.is_generated() {
                state.request_broadcast(out);
            }
        }
        SessionEvent::RequestMission => {
            if state.screen == Screen::Game && state.phone_open && !state.mission_pending {
                state.mission_pending = true;
                out.push(Effect::GenerateMission {
                    reputation: state.stats.reputation,
                });
            }
        }
        SessionEvent::TalkToNpc => {
            if state.screen == Screen::Game {
                out.push(state.dialogue_request());
            }
        }
        SessionEvent::UpdateGraphics(settings) => {
            let settings = settings.clamped();
            state.graphics = settings;
            out.push(Effect::ApplyGraphics(settings));
        }
        SessionEvent::MissionGenerated(mission) => {
            log::info!("mission accepted: {}", mission.title);
            state
                .dialogue
                .push(format!("Job's live. Head to {}. Be fast.", mission.destination_hint()));
            state.current_mission = Some(mission);
            state.mission_active = true;
            state.stats.wanted_level =
                (state.stats.wanted_level + 1).min(PlayerStats::MAX_WANTED_LEVEL);
            state.mission_pending = false;
        }
        SessionEvent::MissionFailed => {
            state.dialogue.push(SIGNAL_LOST.to_owned());
            state.mission_pending = false;
        }
        SessionEvent::BroadcastReceived(transcript) => state.radio_transcript = transcript,
        SessionEvent::BroadcastFailed | SessionEvent::DialogueFailed => {}
        SessionEvent::DialogueReceived { npc_kind, line } => {
            state.dialogue.push(format!("{npc_kind}: {line}"));
        }
    }
    state
}

fn elapse(state: &mut SessionState, dt: Duration, out: &mut Vec<Effect>) {
    match state.screen {
        Screen::Loading => {
            state.loading_elapsed = state.loading_elapsed.saturating_add(dt);
            if state.loading_elapsed >= state.config.loading_duration {
                state.enter(Screen::Menu);
            }
        }
        Screen::Game if state.radio_on => {
            let interval = state.config.broadcast_interval;
            if interval.is_zero() {
                return;
            }
            state.broadcast_elapsed = state.broadcast_elapsed.saturating_add(dt);
            if state.broadcast_elapsed < interval {
                return;
            }
            let remainder = state.broadcast_elapsed.as_nanos() % interval.as_nanos();
            state.broadcast_elapsed = Duration::from_nanos(remainder as u64);
            state.request_broadcast(out);
        }
        Screen::Menu | Screen::Settings | Screen::Game => {}
    }
}

fn toggle_phone(state: &mut SessionState) {
    let opening = !state.phone_open;
    state.phone_open = opening;
    if opening && state.dialogue.is_empty() {
        state.dialogue.push(FIXER_GREETING.to_owned());
    }
}

fn cycle_radio(state: &mut SessionState, out: &mut Vec<Effect>) {
    state.station = state.station.next();
    if state.station.is_generated() {
        state.radio_transcript = NEWS_TUNING_TRANSCRIPT.to_owned();
        state.request_broadcast(out);
    } else {
        state.radio_transcript = MUSIC_TUNING_TRANSCRIPT.to_owned();
    }
}
