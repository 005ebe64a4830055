//! Operation audit records.
//!
//! When operation tracking is enabled, the transport emits one
//! [`AuditRecord`] per logical call (including calls rejected client-side)
//! to the configured [`AuditSink`].

use chrono::{DateTime, Utc};

/// Outcome of an audited operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The exchange completed with the given HTTP status code.
    Success(u16),
    /// The operation failed; carries the SDK error code.
    Failure(String),
    /// The operation was rejected before any network call was made.
    Rejected(String),
    /// Client-side lifecycle event with no network exchange (e.g. logout).
    Local,
}

impl AuditOutcome {
    /// Returns true for the success variant.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Structured record of one SDK operation.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    /// Operation name, e.g. `devices.list`.
    pub operation: String,

    /// HTTP method.
    pub method: String,

    /// Request path relative to the base URL.
    pub path: String,

    /// Query parameters sent with the request.
    pub params: Vec<(String, String)>,

    /// How the operation ended.
    pub outcome: AuditOutcome,

    /// Number of retries spent on this operation.
    pub retries: u32,

    /// When the record was created.
    pub timestamp: DateTime<Utc>,

    /// Free-form caller context threaded through the client configuration.
    pub user_context: Option<serde_json::Value>,
}

/// Receiver for audit records.
///
/// Implementations must be cheap and non-blocking; the transport calls
/// [`AuditSink::record`] synchronously on the request path.
#[cfg_attr(test, mockall::automock)]
pub trait AuditSink: Send + Sync {
    /// Consume one audit record.
    fn record(&self, record: &AuditRecord);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CollectingSink {
        records: Mutex<Vec<AuditRecord>>,
    }

    impl AuditSink for CollectingSink {
        fn record(&self, record: &AuditRecord) {
            self.records.lock().unwrap().push(record.clone());
        }
    }

    fn sample_record(outcome: AuditOutcome) -> AuditRecord {
        AuditRecord {
            operation: "devices.list".to_string(),
            method: "GET".to_string(),
            path: "/v2/devices".to_string(),
            params: vec![("provisionStatus".to_string(), "provisioned".to_string())],
            outcome,
            retries: 0,
            timestamp: Utc::now(),
            user_context: None,
        }
    }

    #[test]
    fn test_outcome_is_success() {
        assert!(AuditOutcome::Success(200).is_success());
        assert!(!AuditOutcome::Failure("NOT_FOUND".to_string()).is_success());
        assert!(!AuditOutcome::Rejected("read-only".to_string()).is_success());
    }

    #[test]
    fn test_collecting_sink_receives_records() {
        let sink = CollectingSink {
            records: Mutex::new(Vec::new()),
        };

        sink.record(&sample_record(AuditOutcome::Success(200)));
        sink.record(&sample_record(AuditOutcome::Rejected("read-only".to_string())));

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].operation, "devices.list");
        assert!(matches!(records[1].outcome, AuditOutcome::Rejected(_)));
    }

    #[test]
    fn test_mock_sink_expectation() {
        let mut mock = MockAuditSink::new();
        mock.expect_record()
            .withf(|record| record.operation == "devices.list")
            .times(1)
            .return_const(());

        mock.record(&sample_record(AuditOutcome::Success(200)));
    }
}
