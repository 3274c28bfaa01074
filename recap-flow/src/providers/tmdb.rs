//! TMDB (The Movie Database) metadata provider.
//!
//! Implements [`MetadataProvider`] against the TMDB v3 REST API: title
//! search, show details and season listings. A 404 on a season is reported
//! as a missing season; every other non-success status is an error.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::catalog::{MetadataProvider, SeasonEpisode};
use crate::config::{DEFAULT_TMDB_BASE_URL, DEFAULT_TMDB_LANGUAGE};
use crate::error::{RecapError, Result};
use crate::models::ShowIdentity;

pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

// ---------------------------------------------------------------------------
// Image references
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PosterSize {
    W200,
    #[default]
    W500,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StillSize {
    #[default]
    W300,
    W500,
}

impl PosterSize {
    fn token(self) -> &'static str {
        match self {
            Self::W200 => "w200",
            Self::W500 => "w500",
        }
    }
}

impl StillSize {
    fn token(self) -> &'static str {
        match self {
            Self::W300 => "w300",
            Self::W500 => "w500",
        }
    }
}

fn image_url(path: Option<&str>, size: &str) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{TMDB_IMAGE_BASE}/{size}{p}"))
}

/// Displayable poster URL for a TMDB `poster_path`.
pub fn poster_url(path: Option<&str>, size: PosterSize) -> Option<String> {
    image_url(path, size.token())
}

/// Displayable still URL for a TMDB episode `still_path`.
pub fn still_url(path: Option<&str>, size: StillSize) -> Option<String> {
    image_url(path, size.token())
}

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    results: Vec<TmdbShow>,
}

/// Shared shape of a search hit and a detail record; search hits simply
/// lack `number_of_seasons`.
#[derive(Debug, Deserialize)]
struct TmdbShow {
    id: u64,
    #[serde(default)]
    name: String,
    overview: Option<String>,
    poster_path: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f64>,
    number_of_seasons: Option<u32>,
}

impl From<TmdbShow> for ShowIdentity {
    fn from(show: TmdbShow) -> Self {
        Self {
            id: show.id,
            name: show.name,
            overview: show.overview.unwrap_or_default(),
            poster_path: show.poster_path,
            first_air_date: show.first_air_date,
            vote_average: show.vote_average.unwrap_or_default(),
            number_of_seasons: show.number_of_seasons,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TmdbSeason {
    #[serde(default)]
    episodes: Vec<TmdbEpisode>,
}

#[derive(Debug, Deserialize)]
struct TmdbEpisode {
    episode_number: u32,
    #[serde(default)]
    name: String,
    overview: Option<String>,
    still_path: Option<String>,
    air_date: Option<String>,
    runtime: Option<u32>,
}

impl From<TmdbEpisode> for SeasonEpisode {
    fn from(episode: TmdbEpisode) -> Self {
        Self {
            episode_number: episode.episode_number,
            name: episode.name,
            overview: episode.overview.unwrap_or_default(),
            still_path: episode.still_path,
            air_date: episode.air_date,
            runtime: episode.runtime,
        }
    }
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// TMDB metadata provider.
///
/// ```no_run
/// use recap_flow::providers::TmdbProvider;
///
/// let provider = TmdbProvider::new(Some("your-api-key".into()), "en-US");
/// ```
pub struct TmdbProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    language: String,
    base_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: Option<String>, language: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            language: language.into(),
            base_url: DEFAULT_TMDB_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// GET `path` and decode the body; `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        operation: &str,
    ) -> Result<Option<T>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(RecapError::NotConfigured("TMDB_API_KEY"))?;

        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "TMDB {operation}");

        let resp = self
            .client
            .get(&url)
            .query(&[("api_key", api_key), ("language", self.language.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                RecapError::upstream("TMDB", format!("{operation} failed: {}", e.without_url()))
            })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(RecapError::upstream(
                "TMDB",
                format!("{operation} failed: {}", status.as_u16()),
            ));
        }

        // reqwest errors print the request URL, which carries the api key
        let body = resp.json::<T>().await.map_err(|e| {
            RecapError::upstream(
                "TMDB",
                format!("{operation} returned an unreadable body: {}", e.without_url()),
            )
        })?;
        Ok(Some(body))
    }
}

impl Default for TmdbProvider {
    fn default() -> Self {
        Self::new(None, DEFAULT_TMDB_LANGUAGE)
    }
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    async fn search_tv(&self, title: &str) -> Result<Vec<ShowIdentity>> {
        let resp: TmdbSearchResponse = self
            .get_json("/search/tv", &[("query", title), ("page", "1")], "search")
            .await?
            .ok_or_else(|| RecapError::upstream("TMDB", "search failed: 404"))?;

        Ok(resp.results.into_iter().map(ShowIdentity::from).collect())
    }

    async fn tv_details(&self, show_id: u64) -> Result<ShowIdentity> {
        let show: TmdbShow = self
            .get_json(&format!("/tv/{show_id}"), &[], "details lookup")
            .await?
            .ok_or_else(|| RecapError::upstream("TMDB", "details lookup failed: 404"))?;

        Ok(show.into())
    }

    async fn season(
        &self,
        show_id: u64,
        season_number: u32,
    ) -> Result<Option<Vec<SeasonEpisode>>> {
        let season: Option<TmdbSeason> = self
            .get_json(
                &format!("/tv/{show_id}/season/{season_number}"),
                &[],
                "season fetch",
            )
            .await?;

        Ok(season.map(|s| s.episodes.into_iter().map(SeasonEpisode::from).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> TmdbProvider {
        TmdbProvider::new(Some("test-key".into()), "en-US").with_base_url(server.uri())
    }

    #[test]
    fn image_urls() {
        assert_eq!(
            poster_url(Some("/abc.jpg"), PosterSize::default()).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(
            poster_url(Some("/abc.jpg"), PosterSize::W200).as_deref(),
            Some("https://image.tmdb.org/t/p/w200/abc.jpg")
        );
        assert_eq!(
            still_url(Some("/still.jpg"), StillSize::default()).as_deref(),
            Some("https://image.tmdb.org/t/p/w300/still.jpg")
        );
        assert_eq!(still_url(None, StillSize::W500), None);
        assert_eq!(still_url(Some(""), StillSize::W500), None);
    }

    #[tokio::test]
    async fn transport_error_does_not_expose_api_key() {
        // Bind then drop to get a port nothing listens on.
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let provider = TmdbProvider::new(Some("SECRET-TMDB-KEY".into()), "en-US")
            .with_base_url(format!("http://{addr}"));

        let err = provider.search_tv("Lost").await.unwrap_err();
        let message = err.to_string();

        assert!(message.starts_with("TMDB search failed: "), "{message}");
        assert!(!message.contains("SECRET-TMDB-KEY"), "{message}");
        assert!(!message.contains("api_key"), "{message}");
    }

    #[tokio::test]
    async fn unreadable_body_does_not_expose_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/1396"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;
        let provider = TmdbProvider::new(Some("SECRET-TMDB-KEY".into()), "en-US")
            .with_base_url(server.uri());

        let err = provider.tv_details(1396).await.unwrap_err();
        let message = err.to_string();

        assert!(
            message.starts_with("TMDB details lookup returned an unreadable body"),
            "{message}"
        );
        assert!(!message.contains("SECRET-TMDB-KEY"), "{message}");
    }

    #[tokio::test]
    async fn search_sends_key_language_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/tv"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("language", "en-US"))
            .and(query_param("query", "Breaking Bad"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [
                    {
                        "id": 1396,
                        "name": "Breaking Bad",
                        "overview": "A chemist turns to crime.",
                        "poster_path": "/bb.jpg",
                        "first_air_date": "2008-01-20",
                        "vote_average": 8.9
                    },
                    { "id": 99999, "name": "Breaking Bad Habits" }
                ]
            })))
            .mount(&server)
            .await;

        let results = provider(&server).search_tv("Breaking Bad").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 1396);
        assert_eq!(results[0].number_of_seasons, None);
        assert_eq!(results[1].overview, "");
        assert_eq!(results[1].vote_average, 0.0);
    }

    #[tokio::test]
    async fn details_carry_season_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/1396"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1396,
                "name": "Breaking Bad",
                "overview": "A chemist turns to crime.",
                "poster_path": "/bb.jpg",
                "first_air_date": "2008-01-20",
                "vote_average": 8.9,
                "number_of_seasons": 5
            })))
            .mount(&server)
            .await;

        let show = provider(&server).tv_details(1396).await.unwrap();

        assert_eq!(show.number_of_seasons, Some(5));
        assert_eq!(show.first_air_date.as_deref(), Some("2008-01-20"));
    }

    #[tokio::test]
    async fn season_listing_maps_episodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/1396/season/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "season_number": 2,
                "episodes": [
                    {
                        "episode_number": 1,
                        "name": "Seven Thirty-Seven",
                        "overview": "",
                        "still_path": null,
                        "air_date": "2009-03-08",
                        "runtime": 47
                    },
                    {
                        "episode_number": 2,
                        "name": "Grilled",
                        "overview": "Tuco holds Walt and Jesse.",
                        "still_path": "/grilled.jpg",
                        "air_date": "2009-03-15",
                        "runtime": null
                    }
                ]
            })))
            .mount(&server)
            .await;

        let episodes = provider(&server).season(1396, 2).await.unwrap().unwrap();

        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].overview, "");
        assert_eq!(episodes[0].still_path, None);
        assert_eq!(episodes[1].runtime, None);
        assert_eq!(episodes[1].still_path.as_deref(), Some("/grilled.jpg"));
    }

    #[tokio::test]
    async fn season_404_is_missing_but_500_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/1396/season/9"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tv/1396/season/3"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = provider(&server);
        assert_eq!(provider.season(1396, 9).await.unwrap(), None);

        let err = provider.season(1396, 3).await.unwrap_err();
        assert_eq!(err.to_string(), "TMDB season fetch failed: 500");
    }

    #[tokio::test]
    async fn search_failure_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/tv"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = provider(&server).search_tv("Lost").await.unwrap_err();
        assert_eq!(err.to_string(), "TMDB search failed: 401");
    }

    #[tokio::test]
    async fn missing_key_never_hits_the_network() {
        let server = MockServer::start().await;
        let provider = TmdbProvider::new(None, "en-US").with_base_url(server.uri());

        let err = provider.search_tv("Lost").await.unwrap_err();

        assert!(matches!(err, RecapError::NotConfigured("TMDB_API_KEY")));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
