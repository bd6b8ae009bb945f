use std::str::FromStr;
use serde::Deserialize;

/// Behaviour of a submission when the bounded queue is at capacity.
///
/// - `Wait`: park the submitter until a slot frees up (default behaviour).
///   Uploads slow down under load but are never lost.
/// - `Reject`: fail the submission immediately so the caller can report a
///   queue-full error instead of blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhenFull {
    Wait,
    Reject,
}

impl Default for WhenFull {
    fn default() -> Self {
        WhenFull::Wait
    }
}

impl FromStr for WhenFull {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wait" => Ok(WhenFull::Wait),
            "reject" => Ok(WhenFull::Reject),
            other => Err(format!(
                "invalid when_full: {other} (expected \"wait\" or \"reject\")"
            )),
        }
    }
}
