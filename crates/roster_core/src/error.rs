use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::validator::Invalid;

/// Transport failure category, used to pick a generic user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Connectivity,
    Timeout,
}

impl TransportKind {
    /// Classifies a failure description by its wording. Returns `None` when
    /// the description names neither a connectivity nor a timeout problem.
    pub fn classify(description: &str) -> Option<Self> {
        let lowered = description.to_ascii_lowercase();
        if lowered.contains("timeout") || lowered.contains("timed out") {
            return Some(Self::Timeout);
        }
        const CONNECTIVITY: [&str; 5] = ["connect", "dns", "network", "fetch", "unreachable"];
        if CONNECTIVITY.iter().any(|needle| lowered.contains(needle)) {
            return Some(Self::Connectivity);
        }
        None
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Connectivity => write!(f, "connectivity"),
            TransportKind::Timeout => write!(f, "timeout"),
        }
    }
}

/// Connectivity or timeout failure of the underlying transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} failure: {detail}")]
pub struct TransportError {
    pub kind: TransportKind,
    pub detail: String,
}

impl TransportError {
    pub fn new(kind: TransportKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Unsuccessful read of positions, users or a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("http status {status}")]
    HttpStatus { status: u16, message: Option<String> },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("service reported failure: {}", message.as_deref().unwrap_or("no message"))]
    Unsuccessful { message: Option<String> },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("local store: {0}")]
    Storage(String),
}

impl FetchError {
    pub fn transport_kind(&self) -> Option<TransportKind> {
        match self {
            FetchError::Transport(err) => Some(err.kind),
            _ => None,
        }
    }
}

/// The registration credential could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("registration token unavailable: {0}")]
pub struct TokenError(#[from] pub FetchError);

/// Field name to the messages the service attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldFailures(pub BTreeMap<String, Vec<String>>);

impl FieldFailures {
    /// All messages in field-name order, then service order within a field.
    pub fn flatten(&self) -> Vec<String> {
        self.0.values().flatten().cloned().collect()
    }

    /// Flattened messages joined for a single display line.
    pub fn joined(&self) -> String {
        self.flatten().join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

/// The service rejected the upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("rejected fields: {}", .0.joined())]
    Rejected(FieldFailures),
    #[error("service error{}: {}", status.map(|s| format!(" {s}")).unwrap_or_default(), message.as_deref().unwrap_or("registration failed"))]
    Service {
        status: Option<u16>,
        message: Option<String>,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Terminal failure of one submission run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationFailure {
    #[error("invalid draft: {0}")]
    Invalid(Invalid),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl RegistrationFailure {
    pub fn transport_kind(&self) -> Option<TransportKind> {
        match self {
            RegistrationFailure::Token(TokenError(fetch)) => fetch.transport_kind(),
            RegistrationFailure::Submission(SubmissionError::Transport(err)) => Some(err.kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_matches_wording() {
        assert_eq!(
            TransportKind::classify("operation timed out"),
            Some(TransportKind::Timeout)
        );
        assert_eq!(
            TransportKind::classify("error sending request: Connection refused"),
            Some(TransportKind::Connectivity)
        );
        assert_eq!(
            TransportKind::classify("Failed to fetch"),
            Some(TransportKind::Connectivity)
        );
        assert_eq!(TransportKind::classify("invalid header value"), None);
    }

    #[test]
    fn field_failures_flatten_in_field_order() {
        let mut map = BTreeMap::new();
        map.insert(
            "phone".to_owned(),
            vec!["The phone field is required.".to_owned()],
        );
        map.insert(
            "email".to_owned(),
            vec!["The email must be a valid email address.".to_owned()],
        );
        let failures = FieldFailures(map);
        assert_eq!(
            failures.joined(),
            "The email must be a valid email address. The phone field is required."
        );
    }
}
