//! TOML configuration file for the command-line adapter.
//!
//! Every section is optional; missing keys fall back to their defaults.
//!
//! ```toml
//! [world]
//! grid_size = 15
//! seed = 42
//!
//! [graphics]
//! bloom = true
//! reflections = false
//! traffic_density = 0.5
//! vignette = 1.2
//!
//! [session]
//! loading_millis = 3500
//! broadcast_interval_secs = 60
//!
//! [narrative]
//! timeout_secs = 30
//!
//! [headless]
//! frame_millis = 16
//! ticks_per_frame = 1
//! ```

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use los_gemini_core::GraphicsSettings;
use los_gemini_narrative::GeminiConfig;
use los_gemini_system_session::SessionConfig;
use los_gemini_world::WorldConfig;
use serde::Deserialize;

/// Fully resolved adapter configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AppConfig {
    /// City generation parameters.
    pub(crate) world: WorldSection,
    /// Graphics settings active at boot.
    pub(crate) graphics: GraphicsSettings,
    /// Session timing.
    pub(crate) session: SessionSection,
    /// Narrative service connection.
    pub(crate) narrative: NarrativeSection,
    /// Headless frame pacing.
    pub(crate) headless: HeadlessSection,
}

/// `[world]` section.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WorldSection {
    /// Half extent of the city grid.
    pub(crate) grid_size: i32,
    /// Layout and traffic seed.
    pub(crate) seed: u64,
}

impl Default for WorldSection {
    fn default() -> Self {
        let world = WorldConfig::default();
        Self {
            grid_size: world.grid_size,
            seed: world.seed,
        }
    }
}

/// `[session]` section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionSection {
    /// Boot splash duration in milliseconds.
    pub(crate) loading_millis: u64,
    /// Automatic broadcast period in seconds; zero disables it.
    pub(crate) broadcast_interval_secs: u64,
}

impl Default for SessionSection {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            loading_millis: duration_millis(session.loading_duration),
            broadcast_interval_secs: session.broadcast_interval.as_secs(),
        }
    }
}

/// `[narrative]` section.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct NarrativeSection {
    /// API root.
    pub(crate) endpoint: String,
    /// Model used for missions.
    pub(crate) mission_model: String,
    /// Model used for broadcasts and NPC chatter.
    pub(crate) chatter_model: String,
    /// Request timeout in seconds.
    pub(crate) timeout_secs: u64,
    /// API key; the command line and environment take precedence.
    pub(crate) api_key: Option<String>,
}

impl Default for NarrativeSection {
    fn default() -> Self {
        let gemini = GeminiConfig::default();
        Self {
            endpoint: gemini.endpoint,
            mission_model: gemini.mission_model,
            chatter_model: gemini.chatter_model,
            timeout_secs: gemini.timeout.as_secs(),
            api_key: None,
        }
    }
}

/// `[headless]` section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct HeadlessSection {
    /// Simulated duration of one frame in milliseconds.
    pub(crate) frame_millis: u64,
    /// Simulation steps advanced per frame.
    pub(crate) ticks_per_frame: u32,
}

impl Default for HeadlessSection {
    fn default() -> Self {
        Self {
            frame_millis: 16,
            ticks_per_frame: 1,
        }
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl AppConfig {
    /// Loads the configuration at `path`, or the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// World construction parameters.
    pub(crate) fn world_config(&self) -> WorldConfig {
        WorldConfig {
            grid_size: self.world.grid_size,
            seed: self.world.seed,
            graphics: self.graphics,
        }
    }

    /// Session timing.
    pub(crate) fn session_config(&self) -> SessionConfig {
        SessionConfig {
            loading_duration: Duration::from_millis(self.session.loading_millis),
            broadcast_interval: Duration::from_secs(self.session.broadcast_interval_secs),
        }
    }

    /// Narrative client settings; `api_key` overrides the file's key.
    pub(crate) fn gemini_config(&self, api_key: Option<String>) -> GeminiConfig {
        GeminiConfig {
            endpoint: self.narrative.endpoint.clone(),
            api_key: api_key
                .or_else(|| self.narrative.api_key.clone())
                .unwrap_or_default(),
            mission_model: self.narrative.mission_model.clone(),
            chatter_model: self.narrative.chatter_model.clone(),
            timeout: self.narrative_timeout(),
        }
    }

    /// Upper bound for a single narrative request.
    pub(crate) fn narrative_timeout(&self) -> Duration {
        Duration::from_secs(self.narrative.timeout_secs.max(1))
    }

    /// Simulated frame duration.
    pub(crate) fn frame_time(&self) -> Duration {
        Duration::from_millis(self.headless.frame_millis)
    }
}
