use async_trait::async_trait;

use crate::error::Result;

/// One single-turn completion: a fixed persona plus the user's message.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub preamble: String,
    pub message: String,
    pub temperature: f64,
    pub max_tokens: Option<u64>,
    /// Ask the model for a single JSON object instead of prose.
    pub json_output: bool,
}

/// A text-completion backend.
///
/// Implementations return the model's text unmodified; an empty string means
/// the model produced nothing usable and callers decide how to fail.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Mutex;

    use super::*;

    /// Replays canned replies in order and records every request.
    #[derive(Default)]
    pub struct ScriptedModel {
        replies: Mutex<Vec<String>>,
        pub requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedModel {
        pub fn replying(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect()),
                requests: Mutex::default(),
            }
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn complete(&self, request: CompletionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request);
            Ok(self.replies.lock().unwrap().pop().unwrap_or_default())
        }
    }
}
