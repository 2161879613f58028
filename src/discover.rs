// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Discovers repositories outside the user's namespace that the user pushed
//! to, based on the public event stream.
//!
//! The stage never fails: an unreadable event stream or an unresolvable
//! candidate is recorded as a [`Degradation`] and simply contributes nothing.

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::{
    client::RepositorySource,
    error::Degradation,
    models::{ActivityEvent, Repository, split_full_name},
};

/// Repositories found by [`discover_contributions`] and the failures that
/// reduced the set.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct Discovery
{
    /// Public repositories resolved from candidate names, in no particular
    /// order.
    pub repositories: Vec<Repository,>,
    /// Non-fatal failures observed during discovery.
    pub degradations: Vec<Degradation,>,
}

/// Derives the candidate name set from an event stream.
///
/// Only push events naming an `owner/name` repository are considered. Names
/// owned by `username` (compared ASCII case-insensitively) are skipped since
/// the direct listing already covers them. Distinct names are kept in
/// first-seen order and the set is cut at `limit`.
///
/// # Example
///
/// ```
/// use spotlight::{ActivityEvent, collect_candidates};
///
/// let events: Vec<ActivityEvent,> = serde_json::from_str(
///     r#"[{"type":"PushEvent","repo":{"name":"orgname/repo1"}},
///        {"type":"PushEvent","repo":{"name":"alice/repo2"}}]"#,
/// )
/// .expect("valid events",);
/// assert_eq!(collect_candidates(&events, "alice", 20,), vec!["orgname/repo1".to_owned()]);
/// ```
pub fn collect_candidates(events: &[ActivityEvent], username: &str, limit: usize,) -> Vec<String,>
{
    let mut candidates = Vec::with_capacity(limit.min(events.len(),),);
    let mut seen = HashSet::with_capacity(limit.min(events.len(),),);

    for event in events.iter().filter(|event| event.is_push(),) {
        if candidates.len() >= limit {
            break;
        }

        let Some(name,) = event.repository_name() else {
            continue;
        };
        let Some((owner, _,),) = split_full_name(name,) else {
            continue;
        };
        if owner.eq_ignore_ascii_case(username,) {
            continue;
        }

        if seen.insert(name,) {
            candidates.push(name.to_owned(),);
        }
    }

    candidates
}

/// Finds public repositories outside `username`'s namespace that the user
/// recently pushed to.
///
/// Detail requests for all candidates are issued concurrently and joined;
/// each one settles independently, so a single failure never cancels the
/// others.
pub async fn discover_contributions<S,>(
    source: &S,
    username: &str,
    candidate_limit: usize,
) -> Discovery
where
    S: RepositorySource,
{
    debug!("Fetching public events for {}", username);

    let events = match source.user_events(username,).await {
        Ok(events,) => events,
        Err(error,) => {
            let degradation = Degradation::DiscoveryDegraded {
                username: username.to_owned(),
                reason:   error.to_string(),
            };
            warn!("{}", degradation);
            return Discovery {
                repositories: Vec::new(),
                degradations: vec![degradation],
            };
        }
    };

    let candidates = collect_candidates(&events, username, candidate_limit,);
    debug!("{} contribution candidates for {}", candidates.len(), username);

    let lookups = candidates.iter().map(|name| async move {
        (name, source.repository(name,).await,)
    },);
    let settled = join_all(lookups,).await;

    let mut discovery = Discovery {
        repositories: Vec::with_capacity(settled.len(),),
        degradations: Vec::new(),
    };

    for (name, outcome,) in settled {
        match outcome {
            Ok(repository,) if repository.private => {
                debug!("Skipping private repository {}", name);
            }
            Ok(repository,) => discovery.repositories.push(repository,),
            Err(error,) => {
                let degradation = Degradation::CandidateDetailFailure {
                    repository: name.clone(),
                    reason:     error.to_string(),
                };
                warn!("{}", degradation);
                discovery.degradations.push(degradation,);
            }
        }
    }

    info!(
        "Discovered {} contributed repositories for {} ({} candidates)",
        discovery.repositories.len(),
        username,
        candidates.len()
    );

    discovery
}
