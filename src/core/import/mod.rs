//! Import pipeline
//!
//! [`ImportCoordinator`] drives a run: it locates files, maps each one to
//! records, makes sure the container exists, and hands the records to the
//! [`UpsertOrchestrator`]. Files are processed one at a time in locator order
//! and records in file order.

pub mod coordinator;
pub mod orchestrator;
pub mod retry;
pub mod summary;

pub use coordinator::{ImportCoordinator, ImportObserver, SilentObserver};
pub use orchestrator::{BatchOutcome, RecordOutcome, UpsertOrchestrator};
pub use retry::RetryPolicy;
pub use summary::{FileReport, FileStatus, ImportSummary};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What happens to the rest of a file once a record fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and keep going
    #[default]
    Continue,
    /// Stop the current file; remaining records are reported as skipped
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" => Ok(Self::Abort),
            other => Err(format!(
                "invalid failure policy '{other}'. Expected 'continue' or 'abort'"
            )),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => f.write_str("continue"),
            Self::Abort => f.write_str("abort"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_policy_from_str() {
        assert_eq!("abort".parse::<FailurePolicy>(), Ok(FailurePolicy::Abort));
        assert_eq!(" Continue ".parse::<FailurePolicy>(), Ok(FailurePolicy::Continue));
        assert!("stop".parse::<FailurePolicy>().is_err());
    }
}
