//! Episode-range resolution.
//!
//! A validated [`RecapScope`] decides which seasons to fetch and which of
//! their episodes to keep. Seasons are fetched one at a time in ascending
//! order and concatenated, so the result is always in `(season, episode)`
//! order as long as the provider lists each season in episode order.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::ShowCatalog;
use crate::error::{RecapError, Result};
use crate::models::{EpisodeRecord, Intent, RecapType};

/// An [`Intent`] whose recap type has every bound it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecapScope {
    /// Everything that aired before `episode` of `season`.
    Before { season: u32, episode: u32 },
    Single { season: u32, episode: u32 },
    /// Inclusive on both ends; may span seasons.
    Range {
        start_season: u32,
        start_episode: u32,
        end_season: u32,
        end_episode: u32,
    },
    Season { season: u32 },
}

fn positive(value: Option<u32>) -> Option<u32> {
    value.filter(|&n| n > 0)
}

impl TryFrom<&Intent> for RecapScope {
    type Error = RecapError;

    fn try_from(intent: &Intent) -> Result<Self> {
        let season = intent.season;
        match &intent.kind {
            RecapType::Before => {
                let episode = positive(intent.episode).ok_or_else(|| {
                    RecapError::InvalidInput(
                        "Episode number required for 'before' type recap".to_string(),
                    )
                })?;
                Ok(Self::Before { season, episode })
            }
            RecapType::Single => {
                let episode = positive(intent.episode).ok_or_else(|| {
                    RecapError::InvalidInput(
                        "Episode number required for single episode recap".to_string(),
                    )
                })?;
                Ok(Self::Single { season, episode })
            }
            RecapType::Range => {
                let (Some(start_episode), Some(end_episode)) =
                    (positive(intent.episode), positive(intent.end_episode))
                else {
                    return Err(RecapError::InvalidInput(
                        "Start and end episode required for range recap".to_string(),
                    ));
                };
                Ok(Self::Range {
                    start_season: season,
                    start_episode,
                    end_season: positive(intent.end_season).unwrap_or(season),
                    end_episode,
                })
            }
            RecapType::Season => Ok(Self::Season { season }),
            RecapType::Unrecognized(other) => Err(RecapError::InvalidInput(format!(
                "Unknown recap type: {other}"
            ))),
        }
    }
}

impl RecapScope {
    /// Seasons to fetch, in fetch order. Empty for an inverted range.
    pub fn season_span(&self) -> RangeInclusive<u32> {
        match *self {
            Self::Before { season, .. } => 1..=season,
            Self::Single { season, .. } | Self::Season { season } => season..=season,
            Self::Range {
                start_season,
                end_season,
                ..
            } => start_season..=end_season,
        }
    }

    /// Whether episode `episode` of season `season` belongs to the recap.
    pub fn includes(&self, season: u32, episode: u32) -> bool {
        match *self {
            Self::Season { season: s } => season == s,
            Self::Single {
                season: s,
                episode: e,
            } => season == s && episode == e,
            Self::Before {
                season: s,
                episode: e,
            } => season < s || (season == s && episode < e),
            Self::Range {
                start_season,
                start_episode,
                end_season,
                end_episode,
            } => {
                let after_start =
                    season > start_season || (season == start_season && episode >= start_episode);
                let before_end =
                    season < end_season || (season == end_season && episode <= end_episode);
                after_start && before_end
            }
        }
    }

    /// Keep the episodes of one fetched season that belong to the recap,
    /// preserving provider order.
    pub fn select(&self, season: u32, episodes: Vec<EpisodeRecord>) -> Vec<EpisodeRecord> {
        let selected = episodes
            .into_iter()
            .filter(|record| self.includes(season, record.episode));

        match self {
            Self::Single { .. } => selected.take(1).collect(),
            _ => selected.collect(),
        }
    }

    /// Human label for the requested span, e.g. `Everything before S3E5`.
    pub fn description(&self) -> String {
        match *self {
            Self::Before { season, episode } => format!("Everything before S{season}E{episode}"),
            Self::Single { season, episode } => format!("S{season}E{episode}"),
            Self::Season { season } => format!("Season {season}"),
            Self::Range {
                start_season,
                start_episode,
                end_season,
                end_episode,
            } if start_season == end_season => {
                format!("S{start_season}E{start_episode}-E{end_episode}")
            }
            Self::Range {
                start_season,
                start_episode,
                end_season,
                end_episode,
            } => format!("S{start_season}E{start_episode} to S{end_season}E{end_episode}"),
        }
    }
}

/// Turns a [`RecapScope`] into the ordered episodes a recap must cover.
#[derive(Clone)]
pub struct EpisodeRangeResolver {
    catalog: ShowCatalog,
}

impl EpisodeRangeResolver {
    pub fn new(catalog: ShowCatalog) -> Self {
        Self { catalog }
    }

    /// Fetch every season in the scope's span, one after another, and keep
    /// the episodes the scope includes.
    ///
    /// A season the provider does not know contributes nothing; any other
    /// fetch failure aborts the resolution.
    pub async fn resolve(&self, show_id: u64, scope: &RecapScope) -> Result<Vec<EpisodeRecord>> {
        let mut resolved = Vec::new();
        let mut seen = HashSet::new();

        for season in scope.season_span() {
            let episodes = self.catalog.fetch_season(show_id, season).await?;
            let fetched = episodes.len();
            let before = resolved.len();

            resolved.extend(
                scope
                    .select(season, episodes)
                    .into_iter()
                    .filter(|record| seen.insert((record.season, record.episode))),
            );

            debug!(
                show_id,
                season,
                fetched,
                kept = resolved.len() - before,
                "Season filtered"
            );
        }

        info!(
            show_id,
            scope = %scope.description(),
            episodes = resolved.len(),
            "Resolved episode range"
        );
        Ok(resolved)
    }
}
