//! Failure taxonomy for the reporting core.
//!
//! Every variant is caught at the cycle boundary and logged; none of them
//! stop a scheduler from firing again.

use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Fine location access was not granted at startup.
    #[error("location permission denied")]
    PermissionDenied,

    /// The provider did not produce a fix within the caller's bound.
    #[error("position acquisition timed out after {timeout_secs}s")]
    AcquisitionTimeout { timeout_secs: u64 },

    /// The provider failed for any other reason (no fix, hardware off).
    #[error("position unavailable: {0}")]
    AcquisitionUnavailable(String),

    /// Timeout, DNS, refused connection or an unreadable response.
    #[error("delivery network failure: {0}")]
    DeliveryNetworkFailure(String),

    /// The collector answered with a non-2xx status.
    #[error("delivery rejected with HTTP {status}: {body}")]
    DeliveryRejected { status: u16, body: String },
}

impl ReportError {
    /// The cycle stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            ReportError::PermissionDenied
            | ReportError::AcquisitionTimeout { .. }
            | ReportError::AcquisitionUnavailable(_) => Stage::Acquire,
            ReportError::DeliveryNetworkFailure(_) | ReportError::DeliveryRejected { .. } => {
                Stage::Deliver
            }
        }
    }
}

/// Which part of a sample-and-deliver cycle failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Acquire,
    Deliver,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Acquire => "acquire",
            Stage::Deliver => "deliver",
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_rejected_includes_status_and_body() {
        let err = ReportError::DeliveryRejected {
            status: 400,
            body: r#"{"error":"All fields are required"}"#.into(),
        };
        assert_eq!(
            err.to_string(),
            r#"delivery rejected with HTTP 400: {"error":"All fields are required"}"#
        );
    }

    #[test]
    fn display_timeout() {
        let err = ReportError::AcquisitionTimeout { timeout_secs: 30 };
        assert_eq!(err.to_string(), "position acquisition timed out after 30s");
    }

    #[test]
    fn acquisition_errors_map_to_acquire_stage() {
        assert_eq!(ReportError::PermissionDenied.stage(), Stage::Acquire);
        assert_eq!(
            ReportError::AcquisitionUnavailable("no fix".into()).stage(),
            Stage::Acquire
        );
        assert_eq!(
            ReportError::DeliveryNetworkFailure("refused".into()).stage(),
            Stage::Deliver
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReportError>();
    }
}
