use async_trait::async_trait;
use tracing::info;

use crate::context::Context;
use crate::error::{RecapError, Result};
use crate::models::ShowIdentity;
use crate::resolver::{EpisodeRangeResolver, RecapScope};
use crate::task::{NextAction, Task, TaskResult};

use super::session_keys;

/// Fetches the episodes the validated scope covers.
pub struct ResolveEpisodesTask {
    resolver: EpisodeRangeResolver,
}

impl ResolveEpisodesTask {
    pub fn new(resolver: EpisodeRangeResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Task for ResolveEpisodesTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let show: ShowIdentity = context.require(session_keys::SHOW)?;
        let scope: RecapScope = context.require(session_keys::SCOPE)?;

        let episodes = self.resolver.resolve(show.id, &scope).await?;
        if episodes.is_empty() {
            return Err(RecapError::NotFound(
                "No episodes found for the specified criteria".into(),
            ));
        }

        info!(
            task_id = %self.id(),
            show_id = show.id,
            episodes = episodes.len(),
            "Episodes resolved"
        );
        let status = format!("{} episodes", episodes.len());
        context.set(session_keys::EPISODES, &episodes).await?;

        Ok(TaskResult::new_with_status(
            None,
            NextAction::Continue,
            Some(status),
        ))
    }
}
