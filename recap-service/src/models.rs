use recap_flow::providers::{PosterSize, StillSize, poster_url, still_url};
use recap_flow::{EpisodeRecord, RecapResult, ShowIdentity};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RecapRequest {
    /// Kept loose so a non-string value is reported like a missing one.
    #[serde(default)]
    pub query: Option<Value>,
}

impl RecapRequest {
    pub fn query_text(&self) -> &str {
        self.query.as_ref().and_then(Value::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowSummary {
    pub id: u64,
    pub name: String,
    pub overview: String,
    pub poster_url: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: f64,
    pub number_of_seasons: Option<u32>,
}

impl From<ShowIdentity> for ShowSummary {
    fn from(show: ShowIdentity) -> Self {
        Self {
            poster_url: poster_url(show.poster_path.as_deref(), PosterSize::default()),
            id: show.id,
            name: show.name,
            overview: show.overview,
            first_air_date: show.first_air_date,
            vote_average: show.vote_average,
            number_of_seasons: show.number_of_seasons,
        }
    }
}

/// The parser's reading of the query, plus the human label for the span.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSummary {
    #[serde(rename = "type")]
    pub kind: String,
    pub season: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_episode: Option<u32>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub season: u32,
    pub episode: u32,
    pub name: String,
    pub overview: String,
    pub still_url: Option<String>,
    pub air_date: Option<String>,
    pub runtime: Option<u32>,
}

impl From<EpisodeRecord> for EpisodeSummary {
    fn from(ep: EpisodeRecord) -> Self {
        Self {
            still_url: still_url(ep.still_path.as_deref(), StillSize::default()),
            season: ep.season,
            episode: ep.episode,
            name: ep.name,
            overview: ep.overview,
            air_date: ep.air_date,
            runtime: ep.runtime,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecapResponse {
    pub show: ShowSummary,
    pub parsed: ParsedSummary,
    pub episodes: Vec<EpisodeSummary>,
    pub recap: String,
    #[serde(rename = "episodeCount")]
    pub episode_count: usize,
}

impl From<RecapResult> for RecapResponse {
    fn from(result: RecapResult) -> Self {
        let parsed = ParsedSummary {
            kind: result.intent.kind.to_string(),
            season: result.intent.season,
            episode: result.intent.episode,
            end_season: result.intent.end_season,
            end_episode: result.intent.end_episode,
            description: result.description,
        };

        Self {
            show: result.show.into(),
            parsed,
            episode_count: result.episodes.len(),
            episodes: result.episodes.into_iter().map(EpisodeSummary::from).collect(),
            recap: result.recap_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recap_flow::{Intent, RecapType};
    use serde_json::json;

    #[test]
    fn request_query_must_be_a_string() {
        let request: RecapRequest = serde_json::from_value(json!({ "query": 42 })).unwrap();
        assert_eq!(request.query_text(), "");

        let request: RecapRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request.query_text(), "");

        let request: RecapRequest =
            serde_json::from_value(json!({ "query": "recap GOT s2e3" })).unwrap();
        assert_eq!(request.query_text(), "recap GOT s2e3");
    }

    #[test]
    fn response_uses_wire_names_and_image_urls() {
        let result = RecapResult {
            show: ShowIdentity {
                id: 1399,
                name: "Game of Thrones".into(),
                overview: "Seven noble families fight.".into(),
                poster_path: Some("/got.jpg".into()),
                first_air_date: Some("2011-04-17".into()),
                vote_average: 8.4,
                number_of_seasons: Some(8),
            },
            intent: Intent {
                show: "Game of Thrones".into(),
                kind: RecapType::Single,
                season: 2,
                episode: Some(3),
                end_season: None,
                end_episode: None,
            },
            description: "S2E3".into(),
            episodes: vec![EpisodeRecord {
                season: 2,
                episode: 3,
                name: "What Is Dead May Never Die".into(),
                overview: "Theon returns home.".into(),
                still_path: None,
                air_date: Some("2012-04-15".into()),
                runtime: Some(53),
            }],
            recap_text: "Theon picks a side.".into(),
        };

        let body = serde_json::to_value(RecapResponse::from(result)).unwrap();

        assert_eq!(body["show"]["poster_url"], "https://image.tmdb.org/t/p/w500/got.jpg");
        assert_eq!(body["parsed"]["type"], "single");
        assert_eq!(body["parsed"]["description"], "S2E3");
        assert!(body["parsed"].get("endEpisode").is_none());
        assert_eq!(body["episodes"][0]["still_url"], Value::Null);
        assert_eq!(body["episodeCount"], 1);
        assert_eq!(body["recap"], "Theon picks a side.");
    }
}
