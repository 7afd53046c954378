#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Los Gemini city simulation.
//!
//! This crate defines the value types and message surface that connect the
//! adapters, the authoritative world, and the pure systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values.
//! Systems operate on the plain data defined here and never touch rendering
//! or network APIs directly.

use serde::{Deserialize, Serialize};

/// Distance in world units between the anchors of neighbouring grid cells.
pub const CELL_SPACING: f32 = 25.0;

/// Half extent of the square spawn area kept free of procedural content.
pub const EXCLUSION_RADIUS: i32 = 2;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Regenerates the static city layout from the provided grid and seed.
    ConfigureCity {
        /// Half extent of the square cell grid.
        grid_size: i32,
        /// Seed of the deterministic layout stream.
        seed: u64,
    },
    /// Advances every dynamic actor by the provided number of simulation steps.
    Tick {
        /// Number of fixed simulation steps that elapsed since the previous tick.
        steps: u32,
    },
    /// Installs a new graphics configuration.
    ApplyGraphics {
        /// Settings that should become active.
        settings: GraphicsSettings,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the static layout was regenerated.
    CityGenerated {
        /// Number of buildings placed by the generator.
        buildings: usize,
        /// Number of decorative palm trees placed by the generator.
        palm_trees: usize,
    },
    /// Indicates that the simulation advanced.
    TimeAdvanced {
        /// Number of simulation steps processed.
        steps: u32,
    },
    /// Reports that a traffic actor reached the end of its lane and wrapped around.
    TrafficWrapped {
        /// Index of the actor within the traffic list.
        actor: usize,
        /// Lane the actor travels along.
        lane: Lane,
    },
    /// Confirms that the traffic list was discarded and re-created.
    TrafficRespawned {
        /// Number of actors in the new traffic list.
        count: usize,
    },
    /// Confirms that a graphics configuration became active.
    GraphicsApplied {
        /// Settings now in effect.
        settings: GraphicsSettings,
    },
}

/// Position expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    /// Lateral axis.
    pub x: f32,
    /// Vertical axis.
    pub y: f32,
    /// Longitudinal axis; traffic travels along it.
    pub z: f32,
}

impl WorldPosition {
    /// Creates a new world position.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Returns a copy translated by the provided offsets.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32, dz: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// Euler rotation in radians applied in XYZ order.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    /// Rotation about the X axis.
    pub x: f32,
    /// Rotation about the Y axis.
    pub y: f32,
    /// Rotation about the Z axis.
    pub z: f32,
}

impl Rotation {
    /// Creates a new rotation.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Integer coordinates of a single cell in the city grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    i: i32,
    j: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Cell index along the X axis.
    #[must_use]
    pub const fn i(&self) -> i32 {
        self.i
    }

    /// Cell index along the Z axis.
    #[must_use]
    pub const fn j(&self) -> i32 {
        self.j
    }

    /// Reports whether the cell lies inside the spawn area reserved for the player.
    #[must_use]
    pub const fn in_exclusion_zone(&self) -> bool {
        self.i.abs() <= EXCLUSION_RADIUS && self.j.abs() <= EXCLUSION_RADIUS
    }

    /// World-space anchor of the cell at ground level.
    #[must_use]
    pub fn anchor(&self) -> WorldPosition {
        WorldPosition::new(
            self.i as f32 * CELL_SPACING,
            0.0,
            self.j as f32 * CELL_SPACING,
        )
    }
}

/// Opaque display color expressed as 8-bit sRGB channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Creates a color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            red: ((hex >> 16) & 0xff) as u8,
            green: ((hex >> 8) & 0xff) as u8,
            blue: (hex & 0xff) as u8,
        }
    }

    /// Converts hue, saturation and lightness (all in `0.0..=1.0`) into a display color.
    ///
    /// Hue wraps around the unit interval; saturation and lightness are clamped.
    #[must_use]
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let hue = hue.rem_euclid(1.0);
        let saturation = saturation.clamp(0.0, 1.0);
        let lightness = lightness.clamp(0.0, 1.0);

        if saturation == 0.0 {
            let grey = unit_to_byte(lightness);
            return Self::from_rgb(grey, grey, grey);
        }

        let upper = if lightness <= 0.5 {
            lightness * (1.0 + saturation)
        } else {
            lightness + saturation - lightness * saturation
        };
        let lower = 2.0 * lightness - upper;

        Self::from_rgb(
            unit_to_byte(hue_to_channel(lower, upper, hue + 1.0 / 3.0)),
            unit_to_byte(hue_to_channel(lower, upper, hue)),
            unit_to_byte(hue_to_channel(lower, upper, hue - 1.0 / 3.0)),
        )
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Packs the color into a `0xRRGGBB` value.
    #[must_use]
    pub const fn hex(&self) -> u32 {
        ((self.red as u32) << 16) | ((self.green as u32) << 8) | self.blue as u32
    }

    /// CSS style string (`rgb(r,g,b)`) understood by web renderers.
    #[must_use]
    pub fn css(&self) -> String {
        format!("rgb({},{},{})", self.red, self.green, self.blue)
    }
}

fn hue_to_channel(lower: f32, upper: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return lower + (upper - lower) * 6.0 * t;
    }
    if t < 0.5 {
        return upper;
    }
    if t < 2.0 / 3.0 {
        return lower + (upper - lower) * 6.0 * (2.0 / 3.0 - t);
    }
    lower
}

fn unit_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Procedurally placed building occupying a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingPlacement {
    /// Cell that owns the building.
    pub cell: GridCoord,
    /// Center of the building volume; `y` equals half the height.
    pub position: WorldPosition,
    /// Height of the building in world units.
    pub height: f32,
    /// Facade color.
    pub color: Color,
}

/// Decorative palm tree placed next to a cell anchor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PalmTreePlacement {
    /// Cell that owns the tree.
    pub cell: GridCoord,
    /// Base of the trunk.
    pub position: WorldPosition,
}

/// Closed set of hand-placed landmark structures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandmarkKind {
    /// Translucent glass tower with a glowing core.
    Spire,
    /// Floating neon billboard.
    Sign,
    /// Rotating Ferris wheel.
    FerrisWheel,
    /// Mirrored dome on a plinth.
    Observatory,
    /// Dark nave with an illuminated bell tower.
    Cathedral,
    /// Open square ringed by palm trees.
    Plaza,
    /// Long pier lined with lamps.
    Boardwalk,
}

impl LandmarkKind {
    /// Every landmark variant in declaration order.
    pub const ALL: [LandmarkKind; 7] = [
        LandmarkKind::Spire,
        LandmarkKind::Sign,
        LandmarkKind::FerrisWheel,
        LandmarkKind::Observatory,
        LandmarkKind::Cathedral,
        LandmarkKind::Plaza,
        LandmarkKind::Boardwalk,
    ];

    /// Reports whether the landmark carries per-tick animation state.
    #[must_use]
    pub const fn is_animated(self) -> bool {
        match self {
            Self::FerrisWheel => true,
            Self::Spire
            | Self::Sign
            | Self::Observatory
            | Self::Cathedral
            | Self::Plaza
            | Self::Boardwalk => false,
        }
    }
}

/// Static description of a landmark: what it is and where it stands.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSpec {
    /// Variant of the landmark.
    pub kind: LandmarkKind,
    /// Anchor position in world space.
    pub position: WorldPosition,
    /// Optional orientation; only the sign is rotated.
    pub rotation: Option<Rotation>,
}

impl LandmarkSpec {
    /// Creates an unrotated landmark.
    #[must_use]
    pub const fn at(kind: LandmarkKind, position: WorldPosition) -> Self {
        Self {
            kind,
            position,
            rotation: None,
        }
    }

    /// Creates a rotated landmark.
    #[must_use]
    pub const fn rotated(kind: LandmarkKind, position: WorldPosition, rotation: Rotation) -> Self {
        Self {
            kind,
            position,
            rotation: Some(rotation),
        }
    }
}

/// Live landmark instance combining its static spec with animation state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Static description of the landmark.
    pub spec: LandmarkSpec,
    /// Accumulated rotation of the animated assembly in radians, kept in `0..TAU`.
    pub spin: f32,
}

impl Landmark {
    /// Creates a landmark instance at rest.
    #[must_use]
    pub const fn from_spec(spec: LandmarkSpec) -> Self {
        Self { spec, spin: 0.0 }
    }
}

/// Output of the world generator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CityLayout {
    /// Buildings in traversal order.
    pub buildings: Vec<BuildingPlacement>,
    /// Palm trees in traversal order.
    pub palm_trees: Vec<PalmTreePlacement>,
    /// Fixed landmark table.
    pub landmarks: Vec<LandmarkSpec>,
}

/// One of the two opposing one-way traffic lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    /// Travels towards increasing `z`.
    Forward,
    /// Travels towards decreasing `z`.
    Reverse,
}

impl Lane {
    /// Lane assigned to the actor at the provided spawn index.
    #[must_use]
    pub const fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Self::Forward
        } else {
            Self::Reverse
        }
    }

    /// Direction multiplier applied to the actor's speed.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Reverse => -1.0,
        }
    }
}

/// Mutable state of a single traffic vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrafficActor {
    /// Spawn index within the traffic list.
    pub index: usize,
    /// Lane the actor travels along; never changes after spawning.
    pub lane: Lane,
    /// Current world position of the vehicle.
    pub position: WorldPosition,
    /// Distance travelled per simulation step.
    pub speed: f32,
    /// Body paint.
    pub color: Color,
}

/// User-adjustable rendering options.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsSettings {
    /// Enables the bloom post-process stage.
    pub bloom: bool,
    /// Selects the reflective ground material.
    pub reflections: bool,
    /// Fraction of the maximum traffic population, in `0.0..=1.0`.
    pub traffic_density: f64,
    /// Vignette darkness, in `0.0..=2.0`.
    pub vignette: f64,
}

impl GraphicsSettings {
    /// Upper bound of the vignette slider.
    pub const MAX_VIGNETTE: f64 = 2.0;

    /// Returns a copy with every continuous value clamped to its slider range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            traffic_density: self.traffic_density.clamp(0.0, 1.0),
            vignette: self.vignette.clamp(0.0, Self::MAX_VIGNETTE),
            ..self
        }
    }
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            bloom: true,
            reflections: true,
            traffic_density: 0.8,
            vignette: 1.0,
        }
    }
}

/// Difficulty rating attached to a mission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Low-risk job.
    Easy,
    /// Standard job.
    Medium,
    /// High-risk job.
    Hard,
    /// Job that is expected to go wrong.
    Extreme,
}

/// Mission offered to the player by the fixer on the phone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    /// Headline shown on the HUD.
    pub title: String,
    /// Briefing text.
    pub description: String,
    /// GPS objective shown on the HUD.
    pub objective: String,
    /// Cash reward.
    pub reward: f64,
    /// Difficulty rating.
    pub difficulty: Difficulty,
    /// Character who offered the job.
    pub giver: String,
}

impl Mission {
    /// Last two words of the objective, used as a destination hint in dialogue.
    #[must_use]
    pub fn destination_hint(&self) -> String {
        let words: Vec<&str> = self.objective.split(' ').collect();
        let start = words.len().saturating_sub(2);
        words[start..].join(" ")
    }
}

/// Player statistics shown on the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Health in percent.
    pub health: u32,
    /// Armor in percent.
    pub armor: u32,
    /// Cash on hand.
    pub money: u64,
    /// Police attention, `0..=MAX_WANTED_LEVEL`.
    pub wanted_level: u32,
    /// Street reputation.
    pub reputation: u32,
}

impl PlayerStats {
    /// Highest attainable wanted level.
    pub const MAX_WANTED_LEVEL: u32 = 5;
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            health: 100,
            armor: 100,
            money: 250_000,
            wanted_level: 0,
            reputation: 50,
        }
    }
}

/// Top-level screen currently presented to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    /// Boot splash shown while assets stream in.
    Loading,
    /// Main menu.
    Menu,
    /// Display settings.
    Settings,
    /// In-game HUD.
    Game,
}

/// Radio stations available from the HUD, in cycling order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RadioStation {
    /// Talk station whose transcript is generated live.
    LosGeminiNews,
    /// Music station.
    PromptPunk,
    /// Music station.
    LlmLofi,
    /// Music station.
    FlashCore,
}

impl RadioStation {
    /// Every station in cycling order.
    pub const ALL: [RadioStation; 4] = [
        RadioStation::LosGeminiNews,
        RadioStation::PromptPunk,
        RadioStation::LlmLofi,
        RadioStation::FlashCore,
    ];

    /// Station that follows this one, wrapping at the end of the dial.
    #[must_use]
    pub fn next(self) -> Self {
        let position = Self::ALL
            .iter()
            .position(|station| *station == self)
            .unwrap_or(0);
        Self::ALL[(position + 1) % Self::ALL.len()]
    }

    /// Name displayed on the HUD.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LosGeminiNews => "Los Gemini News (AI)",
            Self::PromptPunk => "Prompt Punk",
            Self::LlmLofi => "LLM Lofi",
            Self::FlashCore => "Flash Core",
        }
    }

    /// Reports whether the station's transcript comes from the narrative service.
    #[must_use]
    pub const fn is_generated(self) -> bool {
        matches!(self, Self::LosGeminiNews)
    }
}
