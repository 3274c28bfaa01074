//! Show lookup and per-season episode listing on top of a [`MetadataProvider`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{EpisodeRecord, ShowIdentity};

/// An episode as the provider lists it inside a season.
///
/// The provider does not repeat the season number on each episode; the
/// catalog stamps it when converting to an [`EpisodeRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonEpisode {
    pub episode_number: u32,
    pub name: String,
    pub overview: String,
    pub still_path: Option<String>,
    pub air_date: Option<String>,
    pub runtime: Option<u32>,
}

impl SeasonEpisode {
    fn into_record(self, season: u32) -> EpisodeRecord {
        EpisodeRecord {
            season,
            episode: self.episode_number,
            name: self.name,
            overview: self.overview,
            still_path: self.still_path,
            air_date: self.air_date,
            runtime: self.runtime,
        }
    }
}

/// A media-metadata backend (TMDB in production, fakes in tests).
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Search TV shows by title, in the provider's own ranking order.
    async fn search_tv(&self, title: &str) -> Result<Vec<ShowIdentity>>;

    /// Full detail record for one show.
    async fn tv_details(&self, show_id: u64) -> Result<ShowIdentity>;

    /// Episodes of one season in provider order, or `None` when the provider
    /// reports that the season does not exist.
    async fn season(&self, show_id: u64, season_number: u32)
    -> Result<Option<Vec<SeasonEpisode>>>;
}

/// Resolves show names and fetches season listings.
#[derive(Clone)]
pub struct ShowCatalog {
    provider: Arc<dyn MetadataProvider>,
}

impl ShowCatalog {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    /// Resolve `name` to a show.
    ///
    /// The provider's first search hit is taken as the match, with no
    /// disambiguation, so a common title can resolve to the wrong show. A
    /// second lookup enriches it with detail fields such as the season count;
    /// if that lookup fails the search hit is returned as-is.
    pub async fn find_show(&self, name: &str) -> Result<Option<ShowIdentity>> {
        let results = self.provider.search_tv(name).await?;
        debug!(
            provider = self.provider.name(),
            query = %name,
            hits = results.len(),
            "Show search finished"
        );

        let Some(first) = results.into_iter().next() else {
            return Ok(None);
        };

        match self.provider.tv_details(first.id).await {
            Ok(details) => {
                info!(show_id = details.id, show = %details.name, "Resolved show");
                Ok(Some(details))
            }
            Err(e) => {
                warn!(
                    show_id = first.id,
                    error = %e,
                    "Show details lookup failed, using search result"
                );
                Ok(Some(first))
            }
        }
    }

    /// All episodes of one season, each stamped with `season_number`.
    ///
    /// A season the provider does not know yields an empty list.
    pub async fn fetch_season(
        &self,
        show_id: u64,
        season_number: u32,
    ) -> Result<Vec<EpisodeRecord>> {
        let Some(episodes) = self.provider.season(show_id, season_number).await? else {
            debug!(show_id, season = season_number, "Season not found");
            return Ok(Vec::new());
        };

        Ok(episodes
            .into_iter()
            .map(|episode| episode.into_record(season_number))
            .collect())
    }
}
