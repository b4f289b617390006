//! Error types for charm refresh

use thiserror::Error;

/// Charm refresh error type
#[derive(Error, Debug)]
pub enum RefreshError {
    /// The refresher could not serve the request; the chain moves on
    #[error("refresher exhausted")]
    Exhausted,

    /// No refresher in the chain could serve the request
    #[error("unable to refresh {0:?}")]
    Unable(String),

    /// The application's current charm URL is unknown
    #[error("unexpected charm URL")]
    UnexpectedCharmUrl,

    /// The deployed series is not supported by the resolved charm
    #[error(
        "cannot upgrade from single series {series:?} charm to a charm supporting [{}]. Use --force-series to override.",
        quoted(.supported)
    )]
    SeriesMismatch {
        /// Series the application runs on
        series: String,
        /// Series the resolved charm supports
        supported: Vec<String>,
    },

    /// The resolved charm is the one already running
    #[error("already running latest charm {name:?}")]
    AlreadyLatest {
        /// Charm name
        name: String,
    },

    /// The requested revision is the one already running
    #[error("already running specified charm {name:?}, revision {revision}")]
    AlreadySpecified {
        /// Charm name
        name: String,
        /// Requested revision
        revision: i64,
    },

    /// A local path exists but holds no charm
    #[error("no charm found at {0:?}")]
    NoCharmFound(String),

    /// The charm reference could not be parsed
    #[error("invalid charm reference: {0}")]
    InvalidReference(#[from] model_store::Error),

    /// A collaborator (controller API, repository) failed
    #[error("{0}")]
    Collaborator(String),
}

impl RefreshError {
    /// Create a collaborator error
    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }

    /// Whether the chain should try the next refresher
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

fn quoted(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("{v:?}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Result type alias
pub type Result<T> = std::result::Result<T, RefreshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_mismatch_message() {
        let err = RefreshError::SeriesMismatch {
            series: "bionic".to_string(),
            supported: vec!["focal".to_string(), "jammy".to_string()],
        };
        assert_eq!(
            err.to_string(),
            r#"cannot upgrade from single series "bionic" charm to a charm supporting ["focal" "jammy"]. Use --force-series to override."#
        );
    }

    #[test]
    fn test_unable_message() {
        let err = RefreshError::Unable("meshuggah".to_string());
        assert_eq!(err.to_string(), r#"unable to refresh "meshuggah""#);
    }
}
