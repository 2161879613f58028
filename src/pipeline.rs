// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! End-to-end pipeline run and the widget state it feeds.
//!
//! [`run_pipeline`] executes the three stages once. [`WidgetController`] owns
//! the observable [`WidgetState`] and applies pipeline outcomes through a
//! single guarded mutation point: every activation receives an
//! [`Invocation`] ticket and only the most recent ticket may commit, so a
//! slow, superseded run can never overwrite the state of a later one.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::{
    client::RepositorySource,
    config::SpotlightConfig,
    discover::discover_contributions,
    error::{Degradation, Error},
    fetch::fetch_direct_repositories,
    models::Repository,
    rank::rank_repositories
};

/// Bounded, ordered repositories produced by one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankedResult {
    /// At most `result_limit` repositories, best first.
    pub repositories: Vec<Repository>,
    /// Non-fatal failures observed while discovering contributions.
    pub degradations: Vec<Degradation>
}

/// Runs the fetch, discover and rank stages for `username`.
///
/// The direct listing is requested first; its failure aborts the run before
/// the event stream is touched. Discovery failures only shrink the result.
///
/// # Errors
///
/// Returns [`Error::Validation`] for a blank username and
/// [`Error::SourceUnavailable`] when the direct listing fails.
pub async fn run_pipeline<S>(
    source: &S,
    username: &str,
    config: &SpotlightConfig
) -> Result<RankedResult, Error>
where
    S: RepositorySource
{
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::validation("username must not be empty"));
    }

    let direct = fetch_direct_repositories(source, username).await?;
    let discovery = discover_contributions(source, username, config.candidate_limit).await;

    let repositories = rank_repositories(direct, discovery.repositories, config.result_limit);
    info!("Ranked {} repositories for {}", repositories.len(), username);

    Ok(RankedResult {
        repositories,
        degradations: discovery.degradations
    })
}

/// Observable state of the widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WidgetState {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    /// A pipeline run is in flight.
    Loading,
    /// The latest run finished.
    Success(RankedResult),
    /// The latest run failed; the message is shown to the user.
    Failed {
        /// Display form of the failure.
        message: String
    }
}

impl WidgetState {
    /// Returns `true` for [`WidgetState::Success`] and
    /// [`WidgetState::Failed`].
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Failed { .. })
    }
}

/// Identity of one activation, handed out by [`WidgetController::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation(u64);

impl Invocation {
    /// Monotonic generation number of the activation.
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Owner of the widget state and its stale-response guard.
#[derive(Debug)]
pub struct WidgetController {
    generation: AtomicU64,
    state:      watch::Sender<WidgetState>
}

impl Default for WidgetController {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetController {
    /// Creates a controller in the [`WidgetState::Idle`] state.
    pub fn new() -> Self {
        let (state, _) = watch::channel(WidgetState::Idle);
        Self {
            generation: AtomicU64::new(0),
            state
        }
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.state.subscribe()
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> WidgetState {
        self.state.borrow().clone()
    }

    /// Starts a new activation, superseding any in-flight one, and moves the
    /// state to [`WidgetState::Loading`].
    pub fn begin(&self) -> Invocation {
        let mut invocation = Invocation(0);
        self.state.send_modify(|state| {
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            invocation = Invocation(generation);
            *state = WidgetState::Loading;
        });
        debug!("Widget activation {} started", invocation.0);
        invocation
    }

    /// Applies the outcome of `invocation` if it is still the latest
    /// activation.
    ///
    /// Returns `false`, leaving the state untouched, when a later activation
    /// has begun in the meantime.
    pub fn commit(&self, invocation: Invocation, outcome: Result<RankedResult, Error>) -> bool {
        let mut outcome = Some(outcome);
        let applied = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != invocation.0 {
                return false;
            }
            *state = match outcome.take() {
                Some(Ok(result)) => WidgetState::Success(result),
                Some(Err(error)) => WidgetState::Failed {
                    message: error.to_display_string()
                },
                None => return false
            };
            true
        });

        if !applied {
            debug!("Discarded stale result of activation {}", invocation.0);
        }
        applied
    }

    /// Runs the pipeline for `username` as a new activation and commits the
    /// outcome.
    ///
    /// Returns whether the outcome was applied; `false` means another
    /// activation superseded this one while it was in flight.
    pub async fn refresh<S>(&self, source: &S, username: &str, config: &SpotlightConfig) -> bool
    where
        S: RepositorySource
    {
        let invocation = self.begin();
        let outcome = run_pipeline(source, username, config).await;
        self.commit(invocation, outcome)
    }
}
