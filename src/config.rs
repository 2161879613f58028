//! Configuration document describing how the widget pipeline talks to GitHub.
//!
//! Every field is optional in the YAML document; absent values fall back to
//! the defaults below. The loader validates the merged result so downstream
//! code can rely on non-zero limits and a sane page size.

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{self, Error};

/// Public GitHub REST endpoint used when no override is supplied.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Page size requested from the repository and event listings.
const DEFAULT_PER_PAGE: u8 = 100;
/// Largest page size accepted by the GitHub REST API.
const MAX_PER_PAGE: u8 = 100;
const DEFAULT_CANDIDATE_LIMIT: usize = 20;
const DEFAULT_RESULT_LIMIT: usize = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DESCRIPTION_LIMIT: usize = 120;

/// Runtime configuration for a pipeline run.
///
/// # Examples
///
/// ```
/// use spotlight::SpotlightConfig;
///
/// let config = spotlight::parse_config("result_limit: 3\n")?;
/// assert_eq!(config.result_limit, 3);
/// assert_eq!(config.candidate_limit, 20);
/// assert_eq!(SpotlightConfig::default().result_limit, 5);
/// # Ok::<(), spotlight::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpotlightConfig {
    /// Base URL of the repository hosting REST API.
    #[serde(alias = "api-base", alias = "apiBase")]
    pub api_base: String,

    /// Page size used for the repository and event listings.
    #[serde(alias = "per-page")]
    pub per_page: u8,

    /// Upper bound on discovered candidate names resolved per run. Zero
    /// disables detail fetching.
    #[serde(alias = "candidate-limit")]
    pub candidate_limit: usize,

    /// Number of repositories kept in the ranked result.
    #[serde(alias = "result-limit")]
    pub result_limit: usize,

    /// Bound applied to each HTTP request, in seconds.
    #[serde(alias = "request-timeout-secs", alias = "timeout")]
    pub request_timeout_secs: u64,

    /// Maximum number of description characters shown on a card.
    #[serde(alias = "description-limit")]
    pub description_limit: usize
}

impl Default for SpotlightConfig {
    fn default() -> Self {
        Self {
            api_base:             DEFAULT_API_BASE.to_owned(),
            per_page:             DEFAULT_PER_PAGE,
            candidate_limit:      DEFAULT_CANDIDATE_LIMIT,
            result_limit:         DEFAULT_RESULT_LIMIT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            description_limit:    DEFAULT_DESCRIPTION_LIMIT
        }
    }
}

impl SpotlightConfig {
    /// Returns the per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks the invariants relied upon by the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](Error::Validation) describing the first
    /// violated constraint.
    pub fn validate(&self) -> Result<(), Error> {
        let api_base = self.api_base.trim();
        if api_base.is_empty() {
            return Err(Error::validation("api_base must not be empty"));
        }
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(Error::validation(format!(
                "api_base must be an http(s) URL, got '{api_base}'"
            )));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(Error::validation(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        if self.result_limit == 0 {
            return Err(Error::validation("result_limit must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::validation("request_timeout_secs must be at least 1"));
        }
        if self.description_limit == 0 {
            return Err(Error::validation("description_limit must be at least 1"));
        }

        Ok(())
    }
}

/// Loads and validates configuration from the provided YAML file path.
///
/// # Errors
///
/// Returns [`Error::Io`](Error::Io) when the file cannot be read,
/// [`Error::Parse`](Error::Parse) when the YAML cannot be decoded and
/// [`Error::Validation`](Error::Validation) when values are out of range.
pub fn load_config(path: &Path) -> Result<SpotlightConfig, Error> {
    let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
    parse_config(&contents)
}

/// Parses and validates configuration from a YAML document string.
///
/// An empty document yields the defaults.
///
/// # Errors
///
/// Propagates [`Error::Parse`](Error::Parse) and
/// [`Error::Validation`](Error::Validation).
pub fn parse_config(contents: &str) -> Result<SpotlightConfig, Error> {
    let config = if contents.trim().is_empty() {
        SpotlightConfig::default()
    } else {
        serde_yaml::from_str::<SpotlightConfig>(contents)?
    };

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{SpotlightConfig, load_config, parse_config};
    use crate::Error;

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config("  \n").expect("expected defaults");
        assert_eq!(config, SpotlightConfig::default());
        assert_eq!(config.api_base, "https://api.github.com");
        assert_eq!(config.per_page, 100);
        assert_eq!(config.candidate_limit, 20);
        assert_eq!(config.result_limit, 5);
        assert_eq!(config.request_timeout().as_secs(), 10);
    }

    #[test]
    fn partial_document_keeps_remaining_defaults() {
        let config = parse_config("candidate-limit: 5\ntimeout: 3\n").expect("expected config");
        assert_eq!(config.candidate_limit, 5);
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.result_limit, 5);
    }

    #[test]
    fn rejects_unknown_fields() {
        let error = parse_config("colour: blue\n").expect_err("expected parse error");
        assert!(matches!(error, Error::Parse { .. }));
    }

    #[test]
    fn rejects_oversized_page() {
        let error = parse_config("per_page: 101\n").expect_err("expected validation error");
        match error {
            Error::Validation {
                message
            } => assert_eq!(message, "per_page must be between 1 and 100"),
            other => panic!("expected validation error, got {other:?}")
        }
    }

    #[test]
    fn rejects_zero_result_limit() {
        let error = parse_config("result_limit: 0\n").expect_err("expected validation error");
        assert!(matches!(error, Error::Validation { .. }));
    }

    #[test]
    fn rejects_non_http_api_base() {
        let error = parse_config("api_base: ftp://example.com\n").expect_err("expected error");
        match error {
            Error::Validation {
                message
            } => assert!(message.contains("ftp://example.com")),
            other => panic!("expected validation error, got {other:?}")
        }
    }

    #[test]
    fn zero_candidate_limit_is_allowed() {
        let config = parse_config("candidate_limit: 0\n").expect("expected config");
        assert_eq!(config.candidate_limit, 0);
    }

    #[test]
    fn load_config_reads_file() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("spotlight.yaml");
        fs::write(&path, "api_base: http://127.0.0.1:9000\nresult_limit: 2\n")
            .expect("failed to write config");

        let config = load_config(&path).expect("expected config");
        assert_eq!(config.api_base, "http://127.0.0.1:9000");
        assert_eq!(config.result_limit, 2);
    }

    #[test]
    fn load_config_reports_missing_file() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("absent.yaml");

        let error = load_config(&path).expect_err("expected io error");
        assert!(matches!(error, Error::Io { .. }));
    }
}
