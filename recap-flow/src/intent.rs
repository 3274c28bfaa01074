//! Free-text query interpretation.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::DEFAULT_INTENT_MODEL;
use crate::error::{RecapError, Result};
use crate::llm::{CompletionRequest, LanguageModel};
use crate::models::{Intent, RecapType};

const INTENT_PREAMBLE: &str = r#"You are a TV show query parser. Extract the TV show name and episode information from user input.

Return a JSON object with these fields:
- "show": The TV show name (expand abbreviations like GOT to "Game of Thrones", BB to "Breaking Bad")
- "type": One of "before", "single", "range", or "season"
  - "before": User wants recap of everything BEFORE a specific episode (e.g., "I'm on S3E5" means recap S1E1 through S3E4)
  - "single": User wants recap of just ONE specific episode
  - "range": User wants recap of a range of episodes (e.g., "episodes 5-10")
  - "season": User wants recap of an entire season
- "season": The season number (default to 1 if not specified)
- "episode": The episode number (required for "before", "single", and "range" types)
- "endSeason": End season for ranges that span seasons (optional)
- "endEpisode": End episode for range type (required for "range")

Examples:
- "I'm on season 3 episode 5 of Game of Thrones" → {"show":"Game of Thrones","type":"before","season":3,"episode":5}
- "recap GOT s2e3" → {"show":"Game of Thrones","type":"single","season":2,"episode":3}
- "what happened in season 2 of breaking bad" → {"show":"Breaking Bad","type":"season","season":2}
- "recap episodes 5-10 of stranger things season 1" → {"show":"Stranger Things","type":"range","season":1,"episode":5,"endEpisode":10}
- "I forgot what happened before episode 8 of The Office" → {"show":"The Office","type":"before","season":1,"episode":8}

Common abbreviations:
- GOT = Game of Thrones
- BB = Breaking Bad
- BCS = Better Call Saul
- HIMYM = How I Met Your Mother
- TBBT = The Big Bang Theory
- TWD = The Walking Dead"#;

/// The parser's reply before defaults are applied.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIntent {
    show: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    season: Option<u32>,
    episode: Option<u32>,
    end_season: Option<u32>,
    end_episode: Option<u32>,
}

impl RawIntent {
    fn into_intent(self) -> Result<Intent> {
        let show = self
            .show
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RecapError::ParseFailure("Could not identify the TV show name".into()))?;

        let kind = self
            .kind
            .filter(|k| !k.trim().is_empty())
            .map(RecapType::from)
            .unwrap_or(RecapType::Before);

        Ok(Intent {
            show,
            kind,
            season: self.season.filter(|&s| s > 0).unwrap_or(1),
            episode: self.episode,
            end_season: self.end_season,
            end_episode: self.end_episode,
        })
    }
}

/// Strip a Markdown code fence some models wrap around JSON output.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|body| body.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim()
}

/// Turns a viewer's request into an [`Intent`] with one language-model call.
#[derive(Clone)]
pub struct IntentParser {
    model: Arc<dyn LanguageModel>,
    model_name: String,
}

impl IntentParser {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self::with_model_name(model, DEFAULT_INTENT_MODEL)
    }

    pub fn with_model_name(model: Arc<dyn LanguageModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }

    /// Interpret `query`.
    ///
    /// Only the show name is mandatory. A missing type reads as `before` and
    /// a missing or zero season as season 1; episode bounds are passed through
    /// untouched for validation to judge.
    pub async fn parse(&self, query: &str) -> Result<Intent> {
        let raw = self
            .model
            .complete(CompletionRequest {
                model: self.model_name.clone(),
                preamble: INTENT_PREAMBLE.to_string(),
                message: query.to_string(),
                temperature: 0.0,
                max_tokens: None,
                json_output: true,
            })
            .await?;

        if raw.trim().is_empty() {
            return Err(RecapError::ParseFailure(
                "Failed to parse query - no response from language model".into(),
            ));
        }
        debug!(reply = %raw, "Intent parser replied");

        let parsed: RawIntent = serde_json::from_str(strip_code_fence(&raw)).map_err(|e| {
            RecapError::ParseFailure(format!("Could not parse query interpretation: {e}"))
        })?;
        let intent = parsed.into_intent()?;

        info!(show = %intent.show, kind = %intent.kind, season = intent.season, "Parsed query");
        Ok(intent)
    }
}
