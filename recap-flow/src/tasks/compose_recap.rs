use async_trait::async_trait;
use tracing::info;

use crate::composer::RecapComposer;
use crate::context::Context;
use crate::error::Result;
use crate::models::{EpisodeRecord, Intent, ShowIdentity};
use crate::task::{NextAction, Task, TaskResult};

use super::session_keys;

/// Final stage: writes the recap and ends the graph with it as the response.
pub struct ComposeRecapTask {
    composer: RecapComposer,
}

impl ComposeRecapTask {
    pub fn new(composer: RecapComposer) -> Self {
        Self { composer }
    }
}

#[async_trait]
impl Task for ComposeRecapTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let show: ShowIdentity = context.require(session_keys::SHOW)?;
        let intent: Intent = context.require(session_keys::INTENT)?;
        let episodes: Vec<EpisodeRecord> = context.require(session_keys::EPISODES)?;

        let recap = self
            .composer
            .compose(&show.name, &episodes, &intent.kind)
            .await?;
        info!(task_id = %self.id(), chars = recap.len(), "Recap composed");

        context.set(session_keys::RECAP, &recap).await?;
        Ok(TaskResult::new(Some(recap), NextAction::End))
    }
}
