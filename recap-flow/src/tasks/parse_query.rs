use async_trait::async_trait;
use tracing::info;

use crate::context::Context;
use crate::error::Result;
use crate::intent::IntentParser;
use crate::task::{NextAction, Task, TaskResult};

use super::session_keys;

/// Interprets the raw query into an [`crate::models::Intent`].
pub struct ParseQueryTask {
    parser: IntentParser,
}

impl ParseQueryTask {
    pub fn new(parser: IntentParser) -> Self {
        Self { parser }
    }
}

#[async_trait]
impl Task for ParseQueryTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let query: String = context.require(session_keys::QUERY)?;
        info!(task_id = %self.id(), query = %query, "Parsing query");

        let intent = self.parser.parse(&query).await?;
        let status = format!("{} ({}, season {})", intent.show, intent.kind, intent.season);
        context.set(session_keys::INTENT, &intent).await?;

        Ok(TaskResult::new_with_status(
            None,
            NextAction::Continue,
            Some(status),
        ))
    }
}
