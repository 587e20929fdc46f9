//! Error types for the nodectl-connect crate

use nodectl_interface::{RemoteCode, ServiceError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("gRPC status error: {0}")]
    Status(#[from] tonic::Status),

    #[error("Invalid API key metadata: {0}")]
    InvalidMetadata(#[from] tonic::metadata::errors::InvalidMetadataValue),

    #[error("Invalid server address {address}: {reason}")]
    InvalidEndpoint { address: String, reason: String },

    #[error("Connection to {address} failed: {reason}")]
    ConnectionFailed { address: String, reason: String },

    #[error("Invalid timestamp in response (seconds={seconds}, nanos={nanos})")]
    InvalidTimestamp { seconds: i64, nanos: i32 },

    #[error("Response is missing the {0} field")]
    MissingField(&'static str),
}

/// Map a gRPC status code onto the service-level code
pub fn remote_code(code: tonic::Code) -> RemoteCode {
    match code {
        tonic::Code::NotFound => RemoteCode::NotFound,
        tonic::Code::AlreadyExists => RemoteCode::AlreadyExists,
        tonic::Code::PermissionDenied => RemoteCode::PermissionDenied,
        tonic::Code::InvalidArgument | tonic::Code::FailedPrecondition => {
            RemoteCode::InvalidArgument
        }
        tonic::Code::Unauthenticated => RemoteCode::Unauthenticated,
        tonic::Code::Unavailable => RemoteCode::Unavailable,
        tonic::Code::DeadlineExceeded => RemoteCode::DeadlineExceeded,
        _ => RemoteCode::Other,
    }
}

impl From<ConnectError> for ServiceError {
    fn from(err: ConnectError) -> Self {
        match err {
            ConnectError::Status(status) => ServiceError::Remote {
                code: remote_code(status.code()),
                message: status.message().to_string(),
            },
            ConnectError::InvalidTimestamp { .. } | ConnectError::MissingField(_) => {
                ServiceError::Decode(err.to_string())
            }
            other => ServiceError::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_is_unwrapped() {
        let err = ConnectError::Status(tonic::Status::not_found("Machine not found"));
        let service_err: ServiceError = err.into();

        assert_eq!(service_err.code(), Some(RemoteCode::NotFound));
        assert_eq!(service_err.remote_message(), "Machine not found");
    }

    #[test]
    fn test_decode_failures_map_to_decode() {
        let err: ServiceError = ConnectError::MissingField("machine").into();
        assert!(matches!(err, ServiceError::Decode(ref msg) if msg.contains("machine")));
    }

    #[test]
    fn test_connection_failures_map_to_transport() {
        let err: ServiceError = ConnectError::ConnectionFailed {
            address: "http://127.0.0.1:1".to_string(),
            reason: "refused".to_string(),
        }
        .into();
        assert!(matches!(err, ServiceError::Transport(_)));
    }

    #[test]
    fn test_remote_code_mapping() {
        assert_eq!(remote_code(tonic::Code::AlreadyExists), RemoteCode::AlreadyExists);
        assert_eq!(remote_code(tonic::Code::FailedPrecondition), RemoteCode::InvalidArgument);
        assert_eq!(remote_code(tonic::Code::Internal), RemoteCode::Other);
    }
}
