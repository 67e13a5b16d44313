//! The tagged result of one source invocation.

use std::fmt;

use serde::Serialize;

/// Why a source produced no usable payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// External binary is missing or cannot be executed.
    ToolUnavailable,
    /// Connection, DNS or protocol level failure.
    TransportError,
    /// The source or the whole scan ran out of time.
    Timeout,
    /// Non-success HTTP status or non-zero exit code.
    BadStatus,
    /// The source answered but had nothing to say.
    NoData,
    /// The response body could not be understood.
    MalformedResponse,
    /// The source task panicked.
    Panicked,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ToolUnavailable => "tool unavailable",
            FailureKind::TransportError => "transport error",
            FailureKind::Timeout => "timeout",
            FailureKind::BadStatus => "bad status",
            FailureKind::NoData => "no data",
            FailureKind::MalformedResponse => "malformed response",
            FailureKind::Panicked => "panicked",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success { payload: String },
    Failure { kind: FailureKind, message: String },
}

impl Outcome {
    pub fn success(payload: impl Into<String>) -> Self {
        Outcome::Success {
            payload: payload.into(),
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Outcome::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            Outcome::Success { payload } => Some(payload),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Short label for displays: `success` or the failure kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Outcome::Success { .. } => "success",
            Outcome::Failure { kind, .. } => kind.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_status_tag() {
        let ok = serde_json::to_value(Outcome::success("open ports: 80")).unwrap();
        assert_eq!(ok["status"], "success");
        assert_eq!(ok["payload"], "open ports: 80");

        let failed =
            serde_json::to_value(Outcome::failure(FailureKind::NoData, "empty index")).unwrap();
        assert_eq!(failed["status"], "failure");
        assert_eq!(failed["kind"], "no_data");
        assert_eq!(failed["message"], "empty index");
    }

    #[test]
    fn accessors_match_variant() {
        let failed = Outcome::failure(FailureKind::Timeout, "slow");
        assert!(!failed.is_success());
        assert_eq!(failed.payload(), None);
        assert_eq!(failed.failure_kind(), Some(FailureKind::Timeout));
        assert_eq!(failed.tag(), "timeout");
        assert_eq!(Outcome::success("x").tag(), "success");
    }
}
