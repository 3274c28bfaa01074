use serde::{Deserialize, Serialize};
use std::fmt;

/// Which slice of a show the viewer wants recapped.
///
/// The parser may hand back a type string we don't know; it is kept as
/// [`RecapType::Unrecognized`] so validation can reject it with the original text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecapType {
    Before,
    Single,
    Range,
    Season,
    Unrecognized(String),
}

impl RecapType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Before => "before",
            Self::Single => "single",
            Self::Range => "range",
            Self::Season => "season",
            Self::Unrecognized(other) => other,
        }
    }
}

impl From<String> for RecapType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "before" => Self::Before,
            "single" => Self::Single,
            "range" => Self::Range,
            "season" => Self::Season,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<RecapType> for String {
    fn from(value: RecapType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RecapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured reading of a user's free-text request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub show: String,
    #[serde(rename = "type")]
    pub kind: RecapType,
    pub season: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_episode: Option<u32>,
}

/// A show as resolved by the metadata provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowIdentity {
    pub id: u64,
    pub name: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: f64,
    /// Only known once the show has been enriched with its detail record.
    pub number_of_seasons: Option<u32>,
}

/// One episode, stamped with the season it was fetched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub season: u32,
    pub episode: u32,
    pub name: String,
    pub overview: String,
    pub still_path: Option<String>,
    pub air_date: Option<String>,
    pub runtime: Option<u32>,
}

impl EpisodeRecord {
    /// `S{season}E{episode}`
    pub fn code(&self) -> String {
        format!("S{}E{}", self.season, self.episode)
    }
}

/// Everything the service hands back for a completed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecapResult {
    pub show: ShowIdentity,
    pub intent: Intent,
    pub description: String,
    pub episodes: Vec<EpisodeRecord>,
    pub recap_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn intent_reads_parser_field_names() {
        let intent: Intent = serde_json::from_value(json!({
            "show": "Breaking Bad",
            "type": "range",
            "season": 1,
            "episode": 8,
            "endSeason": 2,
            "endEpisode": 3
        }))
        .unwrap();

        assert_eq!(intent.kind, RecapType::Range);
        assert_eq!(intent.end_season, Some(2));
        assert_eq!(intent.end_episode, Some(3));
    }

    #[test]
    fn unknown_recap_type_is_preserved() {
        let kind: RecapType = serde_json::from_value(json!("trailer")).unwrap();
        assert_eq!(kind, RecapType::Unrecognized("trailer".to_string()));
        assert_eq!(serde_json::to_value(&kind).unwrap(), json!("trailer"));
    }
}
