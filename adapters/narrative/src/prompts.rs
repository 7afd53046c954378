//! Prompt text and response parsing shared by narrative sources.

use los_gemini_core::Mission;
use serde_json::{json, Value};

use crate::NarrativeError;

/// Persona applied to every radio broadcast.
pub const BROADCAST_PERSONA: &str = "Be edgy, satirical, and very LA.";

/// Transcript used when the broadcast model answers with nothing.
pub const FALLBACK_BROADCAST: &str = "Coming to you live from Los Gemini...";

/// Prompt asking for a single mission.
#[must_use]
pub fn mission_prompt(reputation: u32) -> String {
    format!(
        "Generate a GTA Los Angeles style mission for a player in \"Los Gemini\" with \
         reputation {reputation}. Make it feel like a crime thriller. Use LA slang."
    )
}

/// JSON schema the mission response must follow.
#[must_use]
pub fn mission_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "objective": { "type": "STRING" },
            "reward": { "type": "NUMBER" },
            "difficulty": {
                "type": "STRING",
                "enum": ["Easy", "Medium", "Hard", "Extreme"]
            },
            "giver": { "type": "STRING" }
        },
        "required": ["title", "description", "objective", "reward", "difficulty", "giver"]
    })
}

/// Situation summary fed to the radio host.
///
/// Police attention outranks an active mission, which outranks a quiet day.
#[must_use]
pub fn broadcast_context(wanted_level: u32, mission_title: Option<&str>) -> String {
    match (wanted_level, mission_title) {
        (level, _) if level > 0 => format!(
            "The city is in chaos. Police are chasing a suspect (Wanted Level {level})."
        ),
        (_, Some(title)) => format!("A major event is happening: {title}."),
        (_, None) => "Just a typical sunny day in Los Gemini.".to_owned(),
    }
}

/// Prompt asking the radio host for a news update.
#[must_use]
pub fn broadcast_prompt(wanted_level: u32, mission_title: Option<&str>) -> String {
    format!(
        "You are a radio host in Los Gemini (a version of Los Angeles). Context: {}. \
         Give a short, punchy, satirical 2-sentence news update.",
        broadcast_context(wanted_level, mission_title)
    )
}

/// Prompt asking an NPC to react to the player.
#[must_use]
pub fn dialogue_prompt(npc_kind: &str, player_action: &str) -> String {
    format!(
        "Character Type: {npc_kind}. Player just: {player_action}. Give a 1-sentence reaction."
    )
}

/// Parses the model's mission answer.
///
/// Models occasionally wrap JSON in a Markdown code fence; the fence is
/// ignored.
pub fn parse_mission(text: &str) -> Result<Mission, NarrativeError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(NarrativeError::EmptyResponse);
    }
    Ok(serde_json::from_str(body)?)
}

/// Final broadcast transcript for the model's answer.
#[must_use]
pub fn broadcast_text(text: Option<String>) -> String {
    match text {
        Some(text) if !text.trim().is_empty() => text.trim().to_owned(),
        _ => FALLBACK_BROADCAST.to_owned(),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
