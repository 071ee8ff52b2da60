//! Mock report service for unit testing.
//!
//! Records every operation and supports scripted outcomes so lifecycle
//! and dev-loop behavior can be asserted without a network.
//!
//! # Example
//!
//! ```rust,ignore
//! use vizreg::report::mock::{MockService, Operation};
//! use vizreg::report::{ReportMeta, ReportService};
//!
//! let mock = MockService::new();
//! mock.upload("abc123", &[], &ReportMeta::default()).unwrap();
//!
//! assert_eq!(mock.upload_shas(), vec!["abc123"]);
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use tracing::trace;

use super::{ComparisonResult, ReportMeta, ReportService, Snapshot, Uploaded};
use crate::error::{Result, VizError};

/// Recorded operation for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Upload {
        sha: String,
        snapshot_count: usize,
    },
    Compare {
        sha1: String,
        sha2: String,
    },
    Exists {
        sha: String,
    },
}

/// Scripted outcome for one upload call.
#[derive(Debug, Clone)]
enum UploadOutcome {
    Ok(Option<String>),
    Err(String),
}

/// Scripted outcome for one compare call.
#[derive(Debug, Clone)]
enum CompareOutcome {
    Ok(ComparisonResult),
    Err(String),
}

/// Mock service that records operations and replays scripted outcomes.
///
/// Outcomes are consumed front-to-back; when the queue is empty the
/// default is success (uploads get a derived URL, comparisons report
/// equality, existence checks report present).
#[derive(Default)]
pub struct MockService {
    operation_log: Mutex<Vec<Operation>>,
    upload_outcomes: Mutex<VecDeque<UploadOutcome>>,
    compare_outcomes: Mutex<VecDeque<CompareOutcome>>,
    exists_outcomes: Mutex<VecDeque<bool>>,
}

impl MockService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Scripting ===

    /// Queue a successful upload returning the given URL.
    pub fn queue_upload_url(&self, url: &str) {
        self.upload_outcomes
            .lock()
            .unwrap()
            .push_back(UploadOutcome::Ok(Some(url.to_string())));
    }

    /// Queue an upload failure with the given message.
    pub fn queue_upload_failure(&self, message: &str) {
        self.upload_outcomes
            .lock()
            .unwrap()
            .push_back(UploadOutcome::Err(message.to_string()));
    }

    /// Queue a default-success upload (derived URL). Useful for spacing
    /// out a later scripted failure.
    pub fn queue_upload_success(&self) {
        self.upload_outcomes
            .lock()
            .unwrap()
            .push_back(UploadOutcome::Ok(None));
    }

    /// Queue a comparison outcome.
    pub fn queue_comparison(&self, equal: bool, summary: &str) {
        self.compare_outcomes
            .lock()
            .unwrap()
            .push_back(CompareOutcome::Ok(ComparisonResult {
                equal,
                summary: summary.to_string(),
            }));
    }

    /// Queue a comparison failure with the given message.
    pub fn queue_comparison_failure(&self, message: &str) {
        self.compare_outcomes
            .lock()
            .unwrap()
            .push_back(CompareOutcome::Err(message.to_string()));
    }

    /// Queue an existence response.
    pub fn queue_exists(&self, exists: bool) {
        self.exists_outcomes.lock().unwrap().push_back(exists);
    }

    // === Assertions ===

    /// All recorded operations, in call order.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.operation_log.lock().unwrap().clone()
    }

    /// SHAs of recorded uploads, in call order.
    #[must_use]
    pub fn upload_shas(&self) -> Vec<String> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                Operation::Upload { sha, .. } => Some(sha),
                _ => None,
            })
            .collect()
    }

    /// `(sha1, sha2)` pairs of recorded comparisons, in call order.
    #[must_use]
    pub fn compare_pairs(&self) -> Vec<(String, String)> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                Operation::Compare { sha1, sha2 } => Some((sha1, sha2)),
                _ => None,
            })
            .collect()
    }

    /// Assert the exact operation sequence.
    pub fn assert_operations(&self, expected: &[Operation]) {
        let actual = self.operations();
        assert_eq!(
            actual, expected,
            "operation log mismatch:\n  actual: {actual:?}\n  expected: {expected:?}"
        );
    }

    fn record(&self, op: Operation) {
        trace!(?op, "mock service operation");
        self.operation_log.lock().unwrap().push(op);
    }
}

impl ReportService for MockService {
    fn upload(&self, sha: &str, snapshots: &[Snapshot], _meta: &ReportMeta) -> Result<Uploaded> {
        self.record(Operation::Upload {
            sha: sha.to_string(),
            snapshot_count: snapshots.len(),
        });

        match self.upload_outcomes.lock().unwrap().pop_front() {
            Some(UploadOutcome::Err(message)) => Err(VizError::Upload(message)),
            Some(UploadOutcome::Ok(Some(url))) => Ok(Uploaded { url }),
            Some(UploadOutcome::Ok(None)) | None => Ok(Uploaded {
                url: format!("https://mock.test/reports/{sha}"),
            }),
        }
    }

    fn compare(&self, sha1: &str, sha2: &str, _meta: &ReportMeta) -> Result<ComparisonResult> {
        self.record(Operation::Compare {
            sha1: sha1.to_string(),
            sha2: sha2.to_string(),
        });

        match self.compare_outcomes.lock().unwrap().pop_front() {
            Some(CompareOutcome::Err(message)) => Err(VizError::Compare(message)),
            Some(CompareOutcome::Ok(result)) => Ok(result),
            None => Ok(ComparisonResult {
                equal: true,
                summary: "No differences found".to_string(),
            }),
        }
    }

    fn exists(&self, sha: &str) -> Result<bool> {
        self.record(Operation::Exists {
            sha: sha.to_string(),
        });
        Ok(self.exists_outcomes.lock().unwrap().pop_front().unwrap_or(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_operations_in_order() {
        let mock = MockService::new();
        let meta = ReportMeta::default();

        mock.upload("a", &[], &meta).unwrap();
        mock.compare("a", "b", &meta).unwrap();
        mock.exists("b").unwrap();

        mock.assert_operations(&[
            Operation::Upload {
                sha: "a".to_string(),
                snapshot_count: 0,
            },
            Operation::Compare {
                sha1: "a".to_string(),
                sha2: "b".to_string(),
            },
            Operation::Exists {
                sha: "b".to_string(),
            },
        ]);
    }

    #[test]
    fn test_scripted_upload_failure_then_default_success() {
        let mock = MockService::new();
        let meta = ReportMeta::default();

        mock.queue_upload_failure("503 from service");

        assert!(mock.upload("a", &[], &meta).is_err());
        let uploaded = mock.upload("b", &[], &meta).unwrap();
        assert_eq!(uploaded.url, "https://mock.test/reports/b");
    }

    #[test]
    fn test_scripted_comparison() {
        let mock = MockService::new();
        mock.queue_comparison(false, "Button differs");

        let result = mock
            .compare("a", "b", &ReportMeta::default())
            .unwrap();
        assert!(!result.equal);
        assert_eq!(result.summary, "Button differs");
    }

    #[test]
    fn test_exists_defaults_to_present() {
        let mock = MockService::new();
        mock.queue_exists(false);

        assert!(!mock.exists("a").unwrap());
        assert!(mock.exists("b").unwrap());
    }
}
