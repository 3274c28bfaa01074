//! The end-to-end recap pipeline.
//!
//! ```text
//! ParseQuery -> ResolveShow -> ValidateIntent -> ResolveEpisodes -> ComposeRecap
//! ```
//!
//! Each request gets a fresh [`Context`]; the stages share nothing else, so
//! one [`RecapWorkflow`] can serve concurrent requests.

use std::sync::Arc;

use tracing::info;

use crate::catalog::{MetadataProvider, ShowCatalog};
use crate::composer::RecapComposer;
use crate::config::RecapConfig;
use crate::context::Context;
use crate::error::{RecapError, Result};
use crate::graph::{Graph, GraphBuilder};
use crate::intent::IntentParser;
use crate::llm::LanguageModel;
use crate::models::RecapResult;
use crate::resolver::EpisodeRangeResolver;
use crate::task::Task;
use crate::tasks::*;

pub fn build_recap_graph(
    parser: IntentParser,
    catalog: ShowCatalog,
    composer: RecapComposer,
) -> Graph {
    let parse_query_task = Arc::new(ParseQueryTask::new(parser));
    let parse_query_id = parse_query_task.id().to_string();

    let resolve_show_task = Arc::new(ResolveShowTask::new(catalog.clone()));
    let resolve_show_id = resolve_show_task.id().to_string();

    let validate_intent_task = Arc::new(ValidateIntentTask);
    let validate_intent_id = validate_intent_task.id().to_string();

    let resolve_episodes_task =
        Arc::new(ResolveEpisodesTask::new(EpisodeRangeResolver::new(catalog)));
    let resolve_episodes_id = resolve_episodes_task.id().to_string();

    let compose_recap_task = Arc::new(ComposeRecapTask::new(composer));
    let compose_recap_id = compose_recap_task.id().to_string();

    GraphBuilder::new("recap_workflow")
        .add_task(parse_query_task)
        .add_task(resolve_show_task)
        .add_task(validate_intent_task)
        .add_task(resolve_episodes_task)
        .add_task(compose_recap_task)
        .add_edge(&parse_query_id, &resolve_show_id)
        .add_edge(&resolve_show_id, &validate_intent_id)
        .add_edge(&validate_intent_id, &resolve_episodes_id)
        .add_edge(&resolve_episodes_id, &compose_recap_id)
        .set_start_task(&parse_query_id)
        .build()
}

/// Runs one recap request through the stage graph.
pub struct RecapWorkflow {
    graph: Graph,
}

impl RecapWorkflow {
    pub fn new(parser: IntentParser, catalog: ShowCatalog, composer: RecapComposer) -> Self {
        Self {
            graph: build_recap_graph(parser, catalog, composer),
        }
    }

    /// Wire the pipeline from explicit backends, using the configured model names.
    pub fn with_backends(
        config: &RecapConfig,
        metadata: Arc<dyn MetadataProvider>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self::new(
            IntentParser::with_model_name(model.clone(), config.intent_model.clone()),
            ShowCatalog::new(metadata),
            RecapComposer::with_model_name(model, config.recap_model.clone()),
        )
    }

    /// Production wiring: TMDB for metadata, OpenRouter for both model calls.
    ///
    /// Missing credentials are not an error here; the first request that
    /// needs one fails with [`RecapError::NotConfigured`].
    #[cfg(feature = "rig")]
    pub fn from_config(config: &RecapConfig) -> Self {
        use crate::providers::{OpenRouterModel, TmdbProvider};

        let metadata = TmdbProvider::new(config.tmdb_api_key.clone(), config.tmdb_language.clone())
            .with_base_url(config.tmdb_base_url.clone());
        let model = OpenRouterModel::new(config.openrouter_api_key.clone());
        Self::with_backends(config, Arc::new(metadata), Arc::new(model))
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Produce a recap for `query`.
    pub async fn run(&self, query: &str) -> Result<RecapResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RecapError::InvalidInput("Query is required".into()));
        }

        let context = Context::new();
        context.set(session_keys::QUERY, query).await?;

        let execution = self.graph.execute(context.clone()).await?;
        info!(stages = execution.completed_tasks.len(), "Recap workflow finished");
        let recap_text = execution
            .response
            .ok_or_else(|| RecapError::Context("recap workflow ended without a recap".into()))?;

        Ok(RecapResult {
            show: context.require(session_keys::SHOW)?,
            intent: context.require(session_keys::INTENT)?,
            description: context.require(session_keys::DESCRIPTION)?,
            episodes: context.require(session_keys::EPISODES)?,
            recap_text,
        })
    }
}
