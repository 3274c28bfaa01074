use async_trait::async_trait;
use tracing::info;

use crate::context::Context;
use crate::error::Result;
use crate::models::Intent;
use crate::resolver::RecapScope;
use crate::task::{NextAction, Task, TaskResult};

use super::session_keys;

/// Checks that the intent carries the bounds its recap type needs.
///
/// Runs after show resolution, so an unknown show is reported before a
/// malformed episode request.
pub struct ValidateIntentTask;

#[async_trait]
impl Task for ValidateIntentTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let intent: Intent = context.require(session_keys::INTENT)?;

        let scope = RecapScope::try_from(&intent)?;
        let description = scope.description();
        info!(task_id = %self.id(), scope = %description, "Intent validated");

        context.set(session_keys::SCOPE, scope).await?;
        context.set(session_keys::DESCRIPTION, &description).await?;

        Ok(TaskResult::new_with_status(
            None,
            NextAction::Continue,
            Some(description),
        ))
    }
}
