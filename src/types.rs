use serde::{Serialize, Serializer};
use std::{collections::HashMap, fmt::Display};

/// Outcome of one checked document: one entry per distinct link target.
///
/// Every submitted target shows up exactly once, with one exception: targets
/// that produced no response at all (`Status::Error`) are dropped by the
/// batch coordinator. Iteration order is unspecified.
pub type CheckResult = HashMap<String, Status>;

/// Terminal outcome of a single link probe
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum Status {
    /// The server answered with a non-error status code
    Ok(http::StatusCode),
    /// The server answered with a client or server error code
    Failed(http::StatusCode),
    /// The probe did not finish within the batch deadline
    Timeout,
    /// The server kept throttling past the configured attempt ceiling
    RetriesExhausted,
    /// The origin was unreachable; no response to report
    Error(String),
}

impl Status {
    /// Classify a received status code. Anything in the 4xx/5xx range counts
    /// as a failed link; everything else means the target was reachable.
    pub fn new(statuscode: http::StatusCode) -> Self {
        if statuscode.is_client_error() || statuscode.is_server_error() {
            Status::Failed(statuscode)
        } else {
            Status::Ok(statuscode)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Ok(_))
    }

    /// The numeric status code behind this outcome, where one exists.
    /// `Timeout` reports 408 and `RetriesExhausted` reports 429, the codes
    /// their conditions correspond to; `Error` carries none.
    pub fn code(&self) -> Option<http::StatusCode> {
        match self {
            Status::Ok(code) | Status::Failed(code) => Some(*code),
            Status::Timeout => Some(http::StatusCode::REQUEST_TIMEOUT),
            Status::RetriesExhausted => Some(http::StatusCode::TOO_MANY_REQUESTS),
            Status::Error(_) => None,
        }
    }

    pub fn icon(&self) -> &str {
        match self {
            Status::Ok(_) => "✅",
            Status::Failed(_) => "🚫",
            Status::Timeout => "⌛",
            Status::RetriesExhausted => "🐌",
            Status::Error(_) => "⚡",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let out = match self {
            Status::Ok(code) => format!("OK ({})", code),
            Status::Failed(code) => format!("Failed ({})", code),
            Status::Timeout => "Timeout".to_string(),
            Status::RetriesExhausted => "Too many retries".to_string(),
            Status::Error(e) => format!("Unreachable ({})", e),
        };
        write!(f, "{}", out)
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl From<reqwest::Error> for Status {
    fn from(e: reqwest::Error) -> Self {
        Status::Error(e.to_string())
    }
}
