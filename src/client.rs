// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Access to the three GitHub REST endpoints the pipeline consumes.
//!
//! [`RepositorySource`] is the seam the fetch stages are written against;
//! [`OctocrabSource`] implements it over HTTP with an unauthenticated
//! Octocrab client. Every request is bounded by the configured timeout and
//! never retried.
use std::{future::Future, time::Duration};

use octocrab::{Octocrab, service::middleware::retry::RetryConfig};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::{Position, Url};

use crate::{
    config::SpotlightConfig,
    error::Error,
    models::{ActivityEvent, Repository, split_full_name},
};

/// Placeholder origin used only to encode routes; the client supplies the
/// real API base.
const ROUTE_ORIGIN: &str = "http://api.invalid/";

/// Read-only view of the repository hosting API.
///
/// Implementations return request-level errors ([`Error::Request`] or
/// [`Error::Timeout`]); the calling stage decides whether a failure is fatal.
pub trait RepositorySource: Sync
{
    /// Lists public repositories owned by `username`, most recently updated
    /// first.
    fn user_repositories(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Vec<Repository,>, Error,>,> + Send;

    /// Lists the most recent public events of `username`.
    fn user_events(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Vec<ActivityEvent,>, Error,>,> + Send;

    /// Fetches details for the repository identified by `owner/name`.
    fn repository(
        &self,
        full_name: &str,
    ) -> impl Future<Output = Result<Repository, Error,>,> + Send;
}

/// Octocrab-backed [`RepositorySource`].
#[derive(Debug, Clone,)]
pub struct OctocrabSource
{
    client:   Octocrab,
    per_page: String,
    timeout:  Duration,
}

impl OctocrabSource
{
    /// Builds an unauthenticated client for the configured API base.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Client`] when the base URL is invalid or the client
    /// cannot be constructed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use spotlight::{OctocrabSource, SpotlightConfig};
    ///
    /// # async fn example() -> Result<(), spotlight::Error> {
    /// let source = OctocrabSource::from_config(&SpotlightConfig::default(),)?;
    /// # let _ = source;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_config(config: &SpotlightConfig,) -> Result<Self, Error,>
    {
        let client = Octocrab::builder()
            .base_uri(config.api_base.trim(),)
            .map_err(|e| Error::Client {
                message: format!("invalid API base '{}': {e}", config.api_base),
            },)?
            .add_retry_config(RetryConfig::None,)
            .build()
            .map_err(|e| Error::Client {
                message: e.to_string(),
            },)?;

        Ok(Self::new(client, config,),)
    }

    /// Wraps an existing Octocrab client.
    pub fn new(client: Octocrab, config: &SpotlightConfig,) -> Self
    {
        Self {
            client,
            per_page: config.per_page.to_string(),
            timeout: config.request_timeout(),
        }
    }

    async fn get_json<T,>(&self, operation: &str, route: String,) -> Result<T, Error,>
    where
        T: DeserializeOwned,
    {
        debug!("GET {} ({})", route, operation);

        let exchange = async {
            let response = self
                .client
                ._get(route.as_str(),)
                .await
                .map_err(|error| map_octocrab_error(operation, &error,),)?;

            let status = response.status();
            if !status.is_success() {
                let body = self.client.body_to_string(response,).await.unwrap_or_default();
                return Err(status_error(operation, status.as_u16(), status.canonical_reason(), &body,),);
            }

            let body = self
                .client
                .body_to_string(response,)
                .await
                .map_err(|error| map_octocrab_error(operation, &error,),)?;
            serde_json::from_str::<T,>(&body,).map_err(|error| {
                Error::request(operation, format!("undecodable response body: {error}"),)
            },)
        };

        match tokio::time::timeout(self.timeout, exchange,).await {
            Ok(outcome,) => outcome,
            Err(_elapsed,) => Err(Error::Timeout {
                operation: operation.to_owned(),
                seconds:   self.timeout.as_secs(),
            },),
        }
    }
}

impl RepositorySource for OctocrabSource
{
    async fn user_repositories(&self, username: &str,) -> Result<Vec<Repository,>, Error,>
    {
        let route = api_route(
            &["users", username, "repos"],
            &[("type", "public",), ("sort", "updated",), ("per_page", self.per_page.as_str(),)],
        )?;
        self.get_json("list repositories", route,).await
    }

    async fn user_events(&self, username: &str,) -> Result<Vec<ActivityEvent,>, Error,>
    {
        let route = api_route(
            &["users", username, "events", "public"],
            &[("per_page", self.per_page.as_str(),)],
        )?;
        self.get_json("list events", route,).await
    }

    async fn repository(&self, full_name: &str,) -> Result<Repository, Error,>
    {
        let route = match split_full_name(full_name,) {
            Some((owner, name,),) => api_route(&["repos", owner, name], &[],)?,
            None => api_route(&["repos", full_name], &[],)?,
        };
        self.get_json("fetch repository", route,).await
    }
}

/// Builds an origin-relative route with every path segment percent-encoded.
fn api_route(segments: &[&str], query: &[(&str, &str,)],) -> Result<String, Error,>
{
    let mut url = Url::parse(ROUTE_ORIGIN,).map_err(|e| Error::Client {
        message: format!("route origin: {e}"),
    },)?;
    url.path_segments_mut()
        .map_err(|()| Error::Client {
            message: "route origin cannot carry a path".to_owned(),
        },)?
        .clear()
        .extend(segments,);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query,);
    }

    Ok(url[Position::BeforePath..].to_owned(),)
}

/// Maps a non-success response onto [`Error::Request`], preferring the
/// GitHub `message` field and falling back to the status reason.
fn status_error(operation: &str, status: u16, reason: Option<&str,>, body: &str,) -> Error
{
    let message = serde_json::from_str::<serde_json::Value,>(body,)
        .ok()
        .and_then(|value| value.get("message",)?.as_str().map(str::to_owned,),)
        .or_else(|| reason.map(str::to_owned,),)
        .unwrap_or_else(|| "request failed".to_owned(),);

    Error::Request {
        operation: operation.to_owned(),
        status:    Some(status,),
        message:   format!("GitHub returned {status}: {message}"),
    }
}

/// Maps transport-level Octocrab failures onto [`Error::Request`].
fn map_octocrab_error(operation: &str, error: &octocrab::Error,) -> Error
{
    Error::request(operation, error.to_string(),)
}
