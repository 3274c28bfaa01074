use dashmap::DashMap;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;

use crate::error::{RecapError, Result};

/// Request-scoped state shared between the stages of one recap.
///
/// Values are stored as JSON so each stage can read what earlier stages
/// produced without the graph knowing their concrete types. A context is
/// created per request and dropped with it.
#[derive(Clone, Debug)]
pub struct Context {
    data: Arc<DashMap<String, Value>>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    pub async fn set(&self, key: impl Into<String>, value: impl Serialize) -> Result<()> {
        let key = key.into();
        let value = serde_json::to_value(value)
            .map_err(|e| RecapError::Context(format!("failed to store {key}: {e}")))?;
        self.data.insert(key, value);
        Ok(())
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_sync(key)
    }

    pub fn get_sync<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Like [`Context::get_sync`], but a missing value is an error.
    pub fn require<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.get_sync(key)
            .ok_or_else(|| RecapError::Context(format!("{key} not found in context")))
    }

    pub async fn remove(&self, key: &str) -> Option<Value> {
        self.data.remove(key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Intent, RecapType};

    #[tokio::test]
    async fn round_trips_typed_values() {
        let context = Context::new();
        let intent = Intent {
            show: "The Office".to_string(),
            kind: RecapType::Before,
            season: 1,
            episode: Some(8),
            end_season: None,
            end_episode: None,
        };
        context.set("intent", &intent).await.unwrap();

        let stored: Intent = context.get("intent").await.unwrap();
        assert_eq!(stored, intent);
    }

    #[tokio::test]
    async fn require_reports_missing_key() {
        let context = Context::new();
        let err = context.require::<String>("query").unwrap_err();
        assert_eq!(err.to_string(), "Context error: query not found in context");
    }

    #[tokio::test]
    async fn clones_share_state() {
        let context = Context::new();
        let other = context.clone();
        other.set("recap", "text").await.unwrap();

        assert!(context.contains("recap"));
        assert_eq!(context.remove("recap").await, Some(Value::from("text")));
        assert!(!other.contains("recap"));
    }
}
