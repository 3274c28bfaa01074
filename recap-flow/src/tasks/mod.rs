// Recap workflow stages, in execution order
pub mod parse_query;
pub mod resolve_show;
pub mod validate_intent;
pub mod resolve_episodes;
pub mod compose_recap;

pub mod types;

pub use compose_recap::ComposeRecapTask;
pub use parse_query::ParseQueryTask;
pub use resolve_episodes::ResolveEpisodesTask;
pub use resolve_show::ResolveShowTask;
pub use validate_intent::ValidateIntentTask;

pub use types::session_keys;
