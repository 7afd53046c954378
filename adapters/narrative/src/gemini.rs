//! Gemini `generateContent` REST client.

use std::{sync::Arc, time::Duration};

use los_gemini_core::Mission;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{prompts, NarrativeError, NarrativeSource};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const MISSION_MODEL: &str = "gemini-3-pro-preview";
const FLASH_MODEL: &str = "gemini-3-flash-preview";
const MISSION_THINKING_BUDGET: u32 = 4_000;
const BROADCAST_TEMPERATURE: f32 = 1.0;
const DIALOGUE_TEMPERATURE: f32 = 0.9;
const ERROR_BODY_LIMIT: usize = 512;

/// Connection settings for [`GeminiClient`].
#[derive(Clone, Debug, PartialEq)]
pub struct GeminiConfig {
    /// API root, without a trailing `/models`.
    pub endpoint: String,
    /// API key sent with every request.
    pub api_key: String,
    /// Model used for missions.
    pub mission_model: String,
    /// Model used for broadcasts and NPC dialogue.
    pub chatter_model: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            api_key: String::new(),
            mission_model: MISSION_MODEL.to_owned(),
            chatter_model: FLASH_MODEL.to_owned(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Narrative source backed by the Gemini API.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: Arc<GeminiConfig>,
}

impl GeminiClient {
    /// Creates a client; fails only if the HTTP stack cannot be initialised.
    pub fn new(config: GeminiConfig) -> Result<Self, NarrativeError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<Option<String>, NarrativeError> {
        let url = format!(
            "{}/models/{model}:generateContent",
            self.config.endpoint.trim_end_matches('/')
        );
        log::debug!("POST {url}");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(NarrativeError::Status {
                status: status.as_u16(),
                body: truncate(body, ERROR_BODY_LIMIT),
            });
        }

        let payload: GenerateContentResponse = serde_json::from_str(&body)?;
        Ok(payload.text())
    }
}

impl NarrativeSource for GeminiClient {
    async fn generate_mission(&self, reputation: u32) -> Result<Mission, NarrativeError> {
        let text = self
            .generate(&self.config.mission_model, &mission_request(reputation))
            .await?;
        prompts::parse_mission(text.as_deref().unwrap_or_default())
    }

    async fn generate_broadcast(
        &self,
        wanted_level: u32,
        mission_title: Option<&str>,
    ) -> Result<String, NarrativeError> {
        let request = broadcast_request(wanted_level, mission_title);
        let text = self.generate(&self.config.chatter_model, &request).await?;
        Ok(prompts::broadcast_text(text))
    }

    async fn npc_dialogue(
        &self,
        npc_kind: &str,
        player_action: &str,
    ) -> Result<String, NarrativeError> {
        let request = dialogue_request(npc_kind, player_action);
        let text = self.generate(&self.config.chatter_model, &request).await?;
        Ok(text.unwrap_or_default().trim().to_owned())
    }
}

fn truncate(mut body: String, limit: usize) -> String {
    if body.len() > limit {
        let mut cut = limit;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

fn mission_request(reputation: u32) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(prompts::mission_prompt(reputation))],
        system_instruction: None,
        generation_config: GenerationConfig {
            response_mime_type: Some("application/json".to_owned()),
            response_schema: Some(prompts::mission_schema()),
            thinking_config: Some(ThinkingConfig {
                thinking_budget: MISSION_THINKING_BUDGET,
            }),
            ..GenerationConfig::default()
        },
    }
}

fn broadcast_request(wanted_level: u32, mission_title: Option<&str>) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(prompts::broadcast_prompt(
            wanted_level,
            mission_title,
        ))],
        system_instruction: Some(Content::system(prompts::BROADCAST_PERSONA)),
        generation_config: GenerationConfig {
            temperature: Some(BROADCAST_TEMPERATURE),
            ..GenerationConfig::default()
        },
    }
}

fn dialogue_request(npc_kind: &str, player_action: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(prompts::dialogue_prompt(
            npc_kind,
            player_action,
        ))],
        system_instruction: None,
        generation_config: GenerationConfig {
            temperature: Some(DIALOGUE_TEMPERATURE),
            ..GenerationConfig::default()
        },
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn user(text: String) -> Self {
        Self {
            role: Some("user".to_owned()),
            parts: vec![Part {
                text: Some(text),
                thought: None,
            }],
        }
    }

    fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part {
                text: Some(text.to_owned()),
                thought: None,
            }],
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated answer text of the first candidate, skipping thought parts.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter(|part| part.thought != Some(true))
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }
}
