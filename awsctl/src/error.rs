//! Command errors and their structured stderr record
//!
//! `SdkError`, `ProvideErrorMetadata` and `DisplayErrorContext` are smithy runtime types. Every service
//! crate re-exports the same definitions from its `error` module, so the EBS path serves Fraud Detector
//! errors as well. The rest of the crate imports them from here.
use std::error::Error as StdError;

pub use aws_sdk_ebs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use serde::Serialize;
use thiserror::Error;

/// Fragments that identify a failed DNS lookup somewhere in an error's source chain
///
/// hyper reports these as `dns error: ...` and the underlying resolver message differs per platform
const NAME_RESOLUTION_MARKERS: &[&str] = &[
  "dns error",
  "failed to lookup address",
  "name or service not known",
  "nodename nor servname",
  "no such host is known",
  "temporary failure in name resolution",
];

#[derive(Debug, Error)]
pub enum CommandError {
  #[error("{operation}: {message}")]
  Service {
    operation: &'static str,
    code: Option<String>,
    message: String,
    request_id: Option<String>,
  },

  #[error(
    "{operation}: Name resolution failure attempting to reach service in region {region} (as supplied to the \
     --region parameter or from configured shell default)"
  )]
  NameResolution { operation: &'static str, region: String },

  #[error("{operation}: {message}")]
  Transport { operation: &'static str, message: String },

  #[error("{0}")]
  Validation(String),

  #[error("{operation}: operation cancelled")]
  Cancelled { operation: &'static str },

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Serialization(#[from] serde_json::Error),
}

/// The structured form of a failed command, written to stderr
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorRecord {
  pub operation: Option<&'static str>,
  pub category: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error_code: Option<String>,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request_id: Option<String>,
}

impl CommandError {
  /// Convert an SDK error into a command error
  ///
  /// DNS failures are rewritten to point at the region in use since they almost always mean the
  /// region (or endpoint) is wrong for the service
  pub fn from_sdk<E, R>(operation: &'static str, region: Option<&str>, err: SdkError<E, R>) -> Self
  where
    E: ProvideErrorMetadata + StdError + 'static,
    R: std::fmt::Debug + 'static,
  {
    if let SdkError::DispatchFailure(_) = &err {
      if is_name_resolution_failure(&err) {
        return CommandError::NameResolution {
          operation,
          region: region.unwrap_or("<unset>").to_owned(),
        };
      }
    }

    match &err {
      SdkError::ServiceError(_) => CommandError::Service {
        operation,
        code: err.code().map(str::to_owned),
        message: err
          .message()
          .map(str::to_owned)
          .unwrap_or_else(|| DisplayErrorContext(&err).to_string()),
        request_id: err.meta().extra("aws_request_id").map(str::to_owned),
      },
      _ => CommandError::Transport {
        operation,
        message: DisplayErrorContext(&err).to_string(),
      },
    }
  }

  pub fn category(&self) -> &'static str {
    match self {
      CommandError::Service { .. } => "ServiceError",
      CommandError::NameResolution { .. } => "NameResolutionFailure",
      CommandError::Transport { .. } => "TransportError",
      CommandError::Validation(_) => "ValidationError",
      CommandError::Cancelled { .. } => "OperationStopped",
      CommandError::Io(_) => "IoError",
      CommandError::Serialization(_) => "SerializationError",
    }
  }

  pub fn operation(&self) -> Option<&'static str> {
    match self {
      CommandError::Service { operation, .. }
      | CommandError::NameResolution { operation, .. }
      | CommandError::Transport { operation, .. }
      | CommandError::Cancelled { operation } => Some(*operation),
      _ => None,
    }
  }

  pub fn to_record(&self) -> ErrorRecord {
    let (error_code, request_id, message) = match self {
      CommandError::Service {
        code,
        message,
        request_id,
        ..
      } => (code.clone(), request_id.clone(), message.clone()),
      CommandError::Transport { message, .. } => (None, None, message.clone()),
      _ => (None, None, self.to_string()),
    };

    ErrorRecord {
      operation: self.operation(),
      category: self.category(),
      error_code,
      message,
      request_id,
    }
  }
}

/// Walk the source chain looking for a DNS lookup failure
pub fn is_name_resolution_failure(err: &(dyn StdError + 'static)) -> bool {
  let mut current = Some(err);
  while let Some(e) = current {
    let msg = e.to_string().to_lowercase();
    if NAME_RESOLUTION_MARKERS.iter().any(|m| msg.contains(m)) {
      return true;
    }
    current = e.source();
  }
  false
}

#[cfg(test)]
mod tests {
  use std::{fmt, io};

  use rstest::*;

  use super::*;

  #[derive(Debug)]
  struct Wrapped {
    msg: &'static str,
    inner: io::Error,
  }

  impl fmt::Display for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "{}", self.msg)
    }
  }

  impl StdError for Wrapped {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
      Some(&self.inner)
    }
  }

  #[rstest]
  #[case("dns error: failed to lookup address information: Name or service not known", true)]
  #[case("nodename nor servname provided, or not known", true)]
  #[case("Temporary failure in name resolution", true)]
  #[case("connection refused", false)]
  #[case("operation timed out", false)]
  fn name_resolution_in_source_chain(#[case] inner: &str, #[case] expected: bool) {
    let err = Wrapped {
      msg: "dispatch failure",
      inner: io::Error::new(io::ErrorKind::Other, inner.to_owned()),
    };
    assert_eq!(is_name_resolution_failure(&err), expected);
  }

  #[test]
  fn name_resolution_message_names_region() {
    let err = CommandError::NameResolution {
      operation: "ListSnapshotBlocks",
      region: "us-nowhere-1".to_owned(),
    };
    let record = err.to_record();

    assert_eq!(record.category, "NameResolutionFailure");
    assert_eq!(record.operation, Some("ListSnapshotBlocks"));
    assert!(record.message.contains("region us-nowhere-1"));
  }

  #[test]
  fn service_record_keeps_code_and_request_id() {
    let err = CommandError::Service {
      operation: "CreateRule",
      code: Some("ValidationException".to_owned()),
      message: "Rule expression is invalid".to_owned(),
      request_id: Some("abc-123".to_owned()),
    };
    let record = serde_json::to_value(err.to_record()).unwrap();

    assert_eq!(record["Category"], "ServiceError");
    assert_eq!(record["ErrorCode"], "ValidationException");
    assert_eq!(record["Message"], "Rule expression is invalid");
    assert_eq!(record["RequestId"], "abc-123");
  }

  #[test]
  fn converts_errors_from_both_services() {
    let ebs = SdkError::<aws_sdk_ebs::operation::list_snapshot_blocks::ListSnapshotBlocksError, ()>::timeout_error(
      io::Error::new(io::ErrorKind::TimedOut, "read timed out"),
    );
    let fd = SdkError::<aws_sdk_frauddetector::operation::get_rules::GetRulesError, ()>::timeout_error(
      io::Error::new(io::ErrorKind::TimedOut, "read timed out"),
    );

    for err in [
      CommandError::from_sdk("ListSnapshotBlocks", Some("us-east-1"), ebs),
      CommandError::from_sdk("GetRules", Some("us-east-1"), fd),
    ] {
      assert_eq!(err.category(), "TransportError");
    }
  }

  #[test]
  fn validation_record_omits_code() {
    let record = serde_json::to_value(CommandError::Validation("bad tag".to_owned()).to_record()).unwrap();

    assert_eq!(record["Category"], "ValidationError");
    assert!(record.get("ErrorCode").is_none());
    assert_eq!(record["Operation"], serde_json::Value::Null);
  }
}
