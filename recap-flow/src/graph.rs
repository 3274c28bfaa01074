use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    context::Context,
    error::{RecapError, Result},
    task::{NextAction, Task, TaskResult},
};

/// Edge between tasks in the graph
#[derive(Debug, Clone)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

/// A graph of tasks executed one at a time, following edges until a task ends it.
pub struct Graph {
    pub id: String,
    tasks: HashMap<String, Arc<dyn Task>>,
    edges: Vec<Edge>,
    start_task_id: Option<String>,
}

impl Graph {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tasks: HashMap::new(),
            edges: Vec::new(),
            start_task_id: None,
        }
    }

    /// Execute the graph from its start task.
    ///
    /// Tasks run strictly in sequence; the first error aborts the remaining
    /// tasks and is returned unchanged.
    pub async fn execute(&self, context: Context) -> Result<ExecutionResult> {
        let mut task_id = self
            .start_task_id
            .clone()
            .ok_or_else(|| RecapError::Context(format!("graph {} has no start task", self.id)))?;
        let mut completed_tasks = Vec::new();

        loop {
            if completed_tasks.len() >= self.tasks.len() {
                return Err(RecapError::Context(format!(
                    "graph {} revisited task {task_id}",
                    self.id
                )));
            }

            let result = self.execute_single_task(&task_id, context.clone()).await?;
            completed_tasks.push(task_id.clone());

            match result.next_action {
                NextAction::End => {
                    info!(graph = %self.id, tasks = completed_tasks.len(), "Graph completed");
                    return Ok(ExecutionResult {
                        response: result.response,
                        completed_tasks,
                    });
                }
                NextAction::Continue => {
                    task_id = self.find_next_task(&task_id).ok_or_else(|| {
                        RecapError::Context(format!("no edge leaves task {task_id}"))
                    })?;
                }
            }
        }
    }

    async fn execute_single_task(&self, task_id: &str, context: Context) -> Result<TaskResult> {
        let task = self
            .tasks
            .get(task_id)
            .ok_or_else(|| RecapError::Context(format!("Task not found: {task_id}")))?;

        debug!(task_id = %task_id, "Running task");
        let result = task.run(context).await?;

        if let Some(status) = &result.status_message {
            info!(task_id = %task_id, status = %status, "Task finished");
        }

        Ok(result)
    }

    /// Find the next task from the outgoing edge of `current_task_id`
    pub fn find_next_task(&self, current_task_id: &str) -> Option<String> {
        self.edges
            .iter()
            .find(|edge| edge.from == current_task_id)
            .map(|edge| edge.to.clone())
    }

    pub fn start_task_id(&self) -> Option<&str> {
        self.start_task_id.as_deref()
    }
}

/// Builder for creating graphs
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            graph: Graph::new(id),
        }
    }

    /// Add a task; the first task added becomes the start task.
    pub fn add_task(mut self, task: Arc<dyn Task>) -> Self {
        let task_id = task.id().to_string();
        if self.graph.start_task_id.is_none() {
            self.graph.start_task_id = Some(task_id.clone());
        }
        self.graph.tasks.insert(task_id, task);
        self
    }

    pub fn add_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.graph.edges.push(Edge {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn set_start_task(mut self, task_id: impl Into<String>) -> Self {
        let task_id = task_id.into();
        if self.graph.tasks.contains_key(&task_id) {
            self.graph.start_task_id = Some(task_id);
        }
        self
    }

    pub fn build(self) -> Graph {
        self.graph
    }
}

/// Outcome of a completed graph execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub response: Option<String>,
    /// Task ids in the order they ran
    pub completed_tasks: Vec<String>,
}
