use async_trait::async_trait;

use crate::{context::Context, error::Result};

/// Result of a task execution
#[derive(Debug, Clone)]
pub struct TaskResult {
    /// Output of the stage, if it produces one for the caller
    pub response: Option<String>,
    /// Next action to take
    pub next_action: NextAction,
    /// Short human-readable note about what the stage did
    pub status_message: Option<String>,
}

impl TaskResult {
    pub fn new(response: Option<String>, next_action: NextAction) -> Self {
        Self::new_with_status(response, next_action, None)
    }

    pub fn new_with_status(
        response: Option<String>,
        next_action: NextAction,
        status_message: Option<String>,
    ) -> Self {
        Self {
            response,
            next_action,
            status_message,
        }
    }
}

/// Defines what should happen after a task completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Run the task on this task's outgoing edge
    Continue,
    /// Stop the graph; the task's response is the graph's response
    End,
}

/// One stage of a workflow
#[async_trait]
pub trait Task: Send + Sync {
    /// Unique identifier for this task
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Execute the task with the given context
    async fn run(&self, context: Context) -> Result<TaskResult>;
}
