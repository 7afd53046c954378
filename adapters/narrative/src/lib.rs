#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Generative narrative for Los Gemini: missions, radio news and NPC chatter.
//!
//! Content comes from a [`NarrativeSource`]. The [`NarrativeDispatcher`] runs
//! requests on a background runtime and hands outcomes back to the frame loop
//! as session events, so a slow or failing service never stalls a frame.

mod dispatcher;
mod gemini;
pub mod prompts;

use std::future::Future;

use los_gemini_core::Mission;
use thiserror::Error;

pub use dispatcher::NarrativeDispatcher;
pub use gemini::{GeminiClient, GeminiConfig};

/// Failures reported by narrative sources.
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// The HTTP request could not be completed.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },
    /// The service answered without any text.
    #[error("service returned no text")]
    EmptyResponse,
    /// The returned text was not the expected JSON document.
    #[error("malformed JSON payload: {0}")]
    MalformedJson(#[from] serde_json::Error),
    /// No credentials are configured.
    #[error("narrative service is not configured")]
    Unconfigured,
}

/// Producer of generated story content.
pub trait NarrativeSource {
    /// Generates a mission framed for the provided reputation.
    fn generate_mission(
        &self,
        reputation: u32,
    ) -> impl Future<Output = Result<Mission, NarrativeError>> + Send;

    /// Generates a short news broadcast for the current situation.
    fn generate_broadcast(
        &self,
        wanted_level: u32,
        mission_title: Option<&str>,
    ) -> impl Future<Output = Result<String, NarrativeError>> + Send;

    /// Generates a one-sentence NPC reaction to a player action.
    fn npc_dialogue(
        &self,
        npc_kind: &str,
        player_action: &str,
    ) -> impl Future<Output = Result<String, NarrativeError>> + Send;
}

/// Source used when no credentials are available; every request fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OfflineSource;

impl NarrativeSource for OfflineSource {
    async fn generate_mission(&self, _reputation: u32) -> Result<Mission, NarrativeError> {
        Err(NarrativeError::Unconfigured)
    }

    async fn generate_broadcast(
        &self,
        _wanted_level: u32,
        _mission_title: Option<&str>,
    ) -> Result<String, NarrativeError> {
        Err(NarrativeError::Unconfigured)
    }

    async fn npc_dialogue(
        &self,
        _npc_kind: &str,
        _player_action: &str,
    ) -> Result<String, NarrativeError> {
        Err(NarrativeError::Unconfigured)
    }
}

/// Source selected at startup from the available credentials.
#[derive(Clone, Debug)]
pub enum Narrator {
    /// Live service.
    Gemini(GeminiClient),
    /// No service available.
    Offline(OfflineSource),
}

impl Narrator {
    /// Chooses the live client when an API key is present.
    pub fn from_config(config: GeminiConfig) -> Result<Self, NarrativeError> {
        if config.api_key.trim().is_empty() {
            log::info!("no narrative API key configured; running offline");
            return Ok(Self::Offline(OfflineSource));
        }
        Ok(Self::Gemini(GeminiClient::new(config)?))
    }

    /// Reports whether requests reach a live service.
    #[must_use]
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Gemini(_))
    }
}

impl NarrativeSource for Narrator {
    async fn generate_mission(&self, reputation: u32) -> Result<Mission, NarrativeError> {
        match self {
            Self::Gemini(client) => client.generate_mission(reputation).await,
            Self::Offline(source) => source.generate_mission(reputation).await,
        }
    }

    async fn generate_broadcast(
        &self,
        wanted_level: u32,
        mission_title: Option<&str>,
    ) -> Result<String, NarrativeError> {
        match self {
            Self::Gemini(client) => client.generate_broadcast(wanted_level, mission_title).await,
            Self::Offline(source) => source.generate_broadcast(wanted_level, mission_title).await,
        }
    }

    async fn npc_dialogue(
        &self,
        npc_kind: &str,
        player_action: &str,
    ) -> Result<String, NarrativeError> {
        match self {
            Self::Gemini(client) => client.npc_dialogue(npc_kind, player_action).await,
            Self::Offline(source) => source.npc_dialogue(npc_kind, player_action).await,
        }
    }
}
