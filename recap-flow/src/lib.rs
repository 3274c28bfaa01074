//! Turns a free-text TV recap request into a resolved show, the episodes it
//! covers, and a spoiler-free recap of them.
//!
//! The work runs as a small graph of [`Task`]s sharing a per-request
//! [`Context`]; [`RecapWorkflow`] wires the stages together.

pub mod catalog;
pub mod composer;
pub mod config;
pub mod context;
pub mod error;
pub mod graph;
pub mod intent;
pub mod llm;
pub mod models;
pub mod providers;
pub mod resolver;
pub mod task;
pub mod tasks;
pub mod workflow;

// Re-export commonly used types
pub use catalog::{MetadataProvider, SeasonEpisode, ShowCatalog};
pub use composer::{NO_EPISODES_TEXT, RecapComposer};
pub use config::RecapConfig;
pub use context::Context;
pub use error::{ErrorKind, RecapError, Result};
pub use graph::{ExecutionResult, Graph, GraphBuilder};
pub use intent::IntentParser;
pub use llm::{CompletionRequest, LanguageModel};
pub use models::{EpisodeRecord, Intent, RecapResult, RecapType, ShowIdentity};
pub use resolver::{EpisodeRangeResolver, RecapScope};
pub use task::{NextAction, Task, TaskResult};
pub use workflow::{RecapWorkflow, build_recap_graph};
