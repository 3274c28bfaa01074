//! Recap prose generation.

use std::sync::Arc;

use tracing::info;

use crate::config::DEFAULT_RECAP_MODEL;
use crate::error::{RecapError, Result};
use crate::llm::{CompletionRequest, LanguageModel};
use crate::models::{EpisodeRecord, RecapType};

pub const NO_EPISODES_TEXT: &str = "No episodes found to recap.";

const RECAP_TEMPERATURE: f64 = 0.7;
const RECAP_MAX_TOKENS: u64 = 1500;

const RECAP_PREAMBLE: &str = "You are a TV recap expert who helps viewers remember what happened in shows they're catching up on.

Your task is to generate a spoiler-free recap that:
- Summarizes the major plot points and story progression
- Highlights important character developments and relationships
- Mentions key events that will be relevant going forward
- Is conversational and engaging, like reminding a friend what happened
- Does NOT spoil anything that happens AFTER these episodes
- Is organized and easy to follow

Keep the recap concise but comprehensive - aim for 2-4 paragraphs depending on how many episodes are being covered.";

const CATCH_UP_FRAMING: &str = "This is a \"catch-up\" recap - the viewer is about to watch the next episode and needs to remember what happened previously.";

const SINGLE_EPISODE_FRAMING: &str =
    "This is a single episode recap - focus on the main events of just this one episode.";

fn preamble_for(kind: &RecapType) -> String {
    match kind {
        RecapType::Before => format!("{RECAP_PREAMBLE}\n\n{CATCH_UP_FRAMING}"),
        RecapType::Single => format!("{RECAP_PREAMBLE}\n\n{SINGLE_EPISODE_FRAMING}"),
        _ => RECAP_PREAMBLE.to_string(),
    }
}

fn episode_listing(episodes: &[EpisodeRecord]) -> String {
    episodes
        .iter()
        .map(|ep| {
            let overview = if ep.overview.trim().is_empty() {
                "No overview available."
            } else {
                ep.overview.as_str()
            };
            format!("{} \"{}\": {overview}", ep.code(), ep.name)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `S1E1` for one episode, `S1E1 to S2E3` for several.
fn span_label(episodes: &[EpisodeRecord]) -> String {
    match episodes {
        [] => String::new(),
        [only] => only.code(),
        [first, .., last] => format!("{} to {}", first.code(), last.code()),
    }
}

fn user_message(show_name: &str, episodes: &[EpisodeRecord]) -> String {
    let count = episodes.len();
    let plural = if count == 1 { "" } else { "s" };
    format!(
        "Show: {show_name}\nEpisodes covered: {} ({count} episode{plural})\n\nEpisode details:\n{}\n\nPlease generate a recap of these episodes.",
        span_label(episodes),
        episode_listing(episodes),
    )
}

/// Writes the spoiler-free recap for an ordered episode list.
#[derive(Clone)]
pub struct RecapComposer {
    model: Arc<dyn LanguageModel>,
    model_name: String,
}

impl RecapComposer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self::with_model_name(model, DEFAULT_RECAP_MODEL)
    }

    pub fn with_model_name(model: Arc<dyn LanguageModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }

    /// Compose a recap of `episodes` for `show_name`.
    ///
    /// An empty list returns [`NO_EPISODES_TEXT`] without calling the model.
    pub async fn compose(
        &self,
        show_name: &str,
        episodes: &[EpisodeRecord],
        kind: &RecapType,
    ) -> Result<String> {
        if episodes.is_empty() {
            return Ok(NO_EPISODES_TEXT.to_string());
        }

        info!(show = %show_name, episodes = episodes.len(), kind = %kind, "Composing recap");

        let recap = self
            .model
            .complete(CompletionRequest {
                model: self.model_name.clone(),
                preamble: preamble_for(kind),
                message: user_message(show_name, episodes),
                temperature: RECAP_TEMPERATURE,
                max_tokens: Some(RECAP_MAX_TOKENS),
                json_output: false,
            })
            .await?;

        if recap.trim().is_empty() {
            return Err(RecapError::CompositionFailure(
                "Failed to generate recap - no response from language model".into(),
            ));
        }

        Ok(recap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::fakes::ScriptedModel;

    fn record(season: u32, episode: u32, name: &str, overview: &str) -> EpisodeRecord {
        EpisodeRecord {
            season,
            episode,
            name: name.to_string(),
            overview: overview.to_string(),
            still_path: None,
            air_date: None,
            runtime: None,
        }
    }

    #[tokio::test]
    async fn empty_episode_list_skips_the_model() {
        let model = Arc::new(ScriptedModel::replying(&["should not be used"]));
        let composer = RecapComposer::new(model.clone());

        let text = composer.compose("Lost", &[], &RecapType::Season).await.unwrap();

        assert_eq!(text, NO_EPISODES_TEXT);
        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn multi_episode_request_lists_every_episode() {
        let model = Arc::new(ScriptedModel::replying(&["Walt cooks. Things escalate."]));
        let composer = RecapComposer::new(model.clone());
        let episodes = vec![
            record(1, 6, "Crazy Handful of Nothin'", "Walt becomes Heisenberg."),
            record(1, 7, "A No-Rough-Stuff-Type Deal", ""),
            record(2, 1, "Seven Thirty-Seven", "Tuco is dangerous."),
        ];

        let text = composer
            .compose("Breaking Bad", &episodes, &RecapType::Range)
            .await
            .unwrap();
        assert_eq!(text, "Walt cooks. Things escalate.");

        let request = &model.requests()[0];
        assert_eq!(request.model, DEFAULT_RECAP_MODEL);
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, Some(1500));
        assert!(!request.json_output);
        assert_eq!(request.preamble, RECAP_PREAMBLE);
        assert_eq!(
            request.message,
            "Show: Breaking Bad\n\
             Episodes covered: S1E6 to S2E1 (3 episodes)\n\n\
             Episode details:\n\
             S1E6 \"Crazy Handful of Nothin'\": Walt becomes Heisenberg.\n\n\
             S1E7 \"A No-Rough-Stuff-Type Deal\": No overview available.\n\n\
             S2E1 \"Seven Thirty-Seven\": Tuco is dangerous.\n\n\
             Please generate a recap of these episodes."
        );
    }

    #[tokio::test]
    async fn single_episode_gets_singular_label_and_framing() {
        let model = Arc::new(ScriptedModel::replying(&["One episode recap."]));
        let composer = RecapComposer::new(model.clone());

        composer
            .compose(
                "Game of Thrones",
                &[record(2, 3, "What Is Dead May Never Die", "Theon.")],
                &RecapType::Single,
            )
            .await
            .unwrap();

        let request = &model.requests()[0];
        assert!(request.message.contains("Episodes covered: S2E3 (1 episode)\n"));
        assert!(request.preamble.ends_with(SINGLE_EPISODE_FRAMING));
    }

    #[tokio::test]
    async fn before_recap_gets_catch_up_framing() {
        let model = Arc::new(ScriptedModel::replying(&["Previously..."]));
        let composer = RecapComposer::new(model.clone());

        composer
            .compose("Lost", &[record(1, 1, "Pilot", "A plane crashes.")], &RecapType::Before)
            .await
            .unwrap();

        assert!(model.requests()[0].preamble.ends_with(CATCH_UP_FRAMING));
    }

    #[tokio::test]
    async fn blank_reply_is_a_composition_failure() {
        let composer = RecapComposer::new(Arc::new(ScriptedModel::replying(&["  \n"])));

        let err = composer
            .compose("Lost", &[record(1, 1, "Pilot", "A plane crashes.")], &RecapType::Season)
            .await
            .unwrap_err();

        assert!(matches!(err, RecapError::CompositionFailure(_)));
    }
}
