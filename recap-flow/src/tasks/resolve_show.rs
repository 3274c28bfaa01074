use async_trait::async_trait;
use tracing::info;

use crate::catalog::ShowCatalog;
use crate::context::Context;
use crate::error::{RecapError, Result};
use crate::models::Intent;
use crate::task::{NextAction, Task, TaskResult};

use super::session_keys;

/// Looks the parsed show name up in the metadata catalog.
pub struct ResolveShowTask {
    catalog: ShowCatalog,
}

impl ResolveShowTask {
    pub fn new(catalog: ShowCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Task for ResolveShowTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let intent: Intent = context.require(session_keys::INTENT)?;
        info!(task_id = %self.id(), show = %intent.show, "Resolving show");

        let show = self
            .catalog
            .find_show(&intent.show)
            .await?
            .ok_or_else(|| {
                RecapError::NotFound(format!("Could not find TV show: \"{}\"", intent.show))
            })?;

        let status = format!("{} (id {})", show.name, show.id);
        context.set(session_keys::SHOW, &show).await?;

        Ok(TaskResult::new_with_status(
            None,
            NextAction::Continue,
            Some(status),
        ))
    }
}
