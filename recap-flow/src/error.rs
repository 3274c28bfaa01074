use thiserror::Error;

/// Errors produced anywhere in the recap pipeline.
///
/// Every stage returns this type so the service boundary can translate a
/// failure exactly once, using [`RecapError::kind`].
#[derive(Error, Debug)]
pub enum RecapError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("{0}")]
    ParseFailure(String),

    #[error("{0}")]
    CompositionFailure(String),

    #[error("{service} {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    #[error("Context error: {0}")]
    Context(String),
}

/// Coarse classification used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ClientInput,
    NotFound,
    Configuration,
    Upstream,
    Internal,
}

impl RecapError {
    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::ClientInput,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NotConfigured(_) => ErrorKind::Configuration,
            Self::ParseFailure(_) | Self::CompositionFailure(_) | Self::Upstream { .. } => {
                ErrorKind::Upstream
            }
            Self::Context(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, RecapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_configured_message_keeps_marker() {
        let err = RecapError::NotConfigured("TMDB_API_KEY");
        assert_eq!(err.to_string(), "TMDB_API_KEY is not configured");
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn upstream_failures_share_a_kind() {
        assert_eq!(
            RecapError::ParseFailure("no content".into()).kind(),
            ErrorKind::Upstream
        );
        assert_eq!(
            RecapError::upstream("TMDB", "search failed: 503").kind(),
            ErrorKind::Upstream
        );
        assert_eq!(
            RecapError::upstream("TMDB", "search failed: 503").to_string(),
            "TMDB search failed: 503"
        );
    }
}
