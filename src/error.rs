#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the spotlight crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Two families live here. [`Error`] covers failures that end an operation:
//! only [`Error::SourceUnavailable`] is produced by the pipeline itself, the
//! remaining variants describe single requests, configuration and output.
//! [`Degradation`] covers failures that merely shrink the result set and are
//! reported next to it instead of replacing it.

use std::path::{Path, PathBuf};

/// Unified error type returned by the pipeline, configuration loader and CLI.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// The user's own repositories could not be fetched; fatal to the
    /// pipeline.
    #[error("GitHub API error: {detail}")]
    SourceUnavailable {
        /// HTTP status reported by the API, when a response was received.
        status: Option<u16>,
        /// Status code or transport failure rendered for display.
        detail: String
    },
    /// A single API request failed.
    #[error("{operation} failed: {message}")]
    Request {
        /// Short description of the request, e.g. `list repositories`.
        operation: String,
        /// HTTP status reported by the API, when a response was received.
        status:    Option<u16>,
        /// Human readable failure description.
        message:   String
    },
    /// A single API request did not complete within the configured bound.
    #[error("{operation} timed out after {seconds}s")]
    Timeout {
        /// Short description of the request.
        operation: String,
        /// Configured request timeout in seconds.
        seconds:   u64
    },
    /// The HTTP client could not be constructed.
    #[error("failed to initialize GitHub client: {message}")]
    Client {
        /// Human readable message describing the failure.
        message: String
    },
    /// Wraps I/O errors that occur while reading configuration or writing
    /// rendered output.
    #[error("I/O failure at {path:?}: {source}")]
    Io {
        /// Location of the file being accessed.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Wraps serialization errors when writing JSON output.
    #[error("failed to serialize output: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Returned when input or configuration violates invariants.
    #[error("invalid input: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a request error without an HTTP status.
    pub fn request<O, M>(operation: O, message: M) -> Self
    where
        O: Into<String>,
        M: Into<String>
    {
        Self::Request {
            operation: operation.into(),
            status:    None,
            message:   message.into()
        }
    }

    /// Converts any request-level failure into the fatal
    /// [`Error::SourceUnavailable`] variant.
    ///
    /// The display detail is the bare status code when one is known so the
    /// rendered message reads `GitHub API error: 403`.
    pub fn source_unavailable(cause: &Error) -> Self {
        let status = cause.status();
        let detail = match status {
            Some(code) => code.to_string(),
            None => cause.to_string()
        };

        Self::SourceUnavailable {
            status,
            detail
        }
    }

    /// Returns the HTTP status associated with the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SourceUnavailable {
                status, ..
            }
            | Self::Request {
                status, ..
            } => *status,
            _ => None
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation
    /// and is what the CLI and the widget error state show.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Non-fatal failure observed while discovering contributed repositories.
///
/// Degradations reduce the number of results but never fail the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, masterror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// The public event stream could not be read; no repositories were
    /// discovered.
    #[error("event stream for {username} unavailable: {reason}")]
    DiscoveryDegraded {
        /// Queried account.
        username: String,
        /// Display form of the underlying request error.
        reason:   String
    },
    /// Details for a single candidate repository could not be fetched.
    #[error("details for {repository} unavailable: {reason}")]
    CandidateDetailFailure {
        /// Owner-qualified repository name.
        repository: String,
        /// Display form of the underlying request error.
        reason:     String
    }
}

#[cfg(test)]
mod tests {
    use super::{Degradation, Error};

    #[test]
    fn validation_constructor_populates_message() {
        let error = Error::validation("username must not be empty");
        match error {
            Error::Validation {
                ref message
            } => {
                assert_eq!(message, "username must not be empty");
            }
            other => panic!("expected validation error, got {other:?}")
        }
    }

    #[test]
    fn source_unavailable_renders_bare_status() {
        let cause = Error::Request {
            operation: "list repositories".to_owned(),
            status:    Some(403),
            message:   "API rate limit exceeded".to_owned()
        };
        let error = Error::source_unavailable(&cause);

        assert_eq!(error.status(), Some(403));
        assert_eq!(error.to_display_string(), "GitHub API error: 403");
    }

    #[test]
    fn source_unavailable_without_status_keeps_cause_text() {
        let cause = Error::Timeout {
            operation: "list repositories".to_owned(),
            seconds:   10
        };
        let error = Error::source_unavailable(&cause);

        assert_eq!(error.status(), None);
        assert_eq!(
            error.to_string(),
            "GitHub API error: list repositories timed out after 10s"
        );
    }

    #[test]
    fn to_display_string_matches_display() {
        let error = Error::request("fetch events", "connection reset");
        assert_eq!(error.to_string(), error.to_display_string());
        assert_eq!(error.to_string(), "fetch events failed: connection reset");
    }

    #[test]
    fn io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/spotlight.yaml");
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = super::io_error(path, io_error);

        match error {
            Error::Io {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected io error, got {other:?}")
        }
    }

    #[test]
    fn serde_yaml_conversion_maps_to_parse_variant() {
        let error = serde_yaml::from_str::<usize>("not-a-number").unwrap_err();
        let mapped: Error = error.into();
        assert!(matches!(mapped, Error::Parse { .. }));
    }

    #[test]
    fn degradation_serializes_with_kind_tag() {
        let degradation = Degradation::CandidateDetailFailure {
            repository: "org/repo".to_owned(),
            reason:     "fetch repository failed: Not Found".to_owned()
        };

        let json = serde_json::to_value(&degradation).expect("serialization failed");
        assert_eq!(json["kind"], "candidate_detail_failure");
        assert_eq!(json["repository"], "org/repo");
        assert_eq!(
            degradation.to_string(),
            "details for org/repo unavailable: fetch repository failed: Not Found"
        );
    }
}
