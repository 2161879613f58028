// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Direct-repository stage: the queried user's own public repositories.

use tracing::{debug, info, warn};

use crate::{client::RepositorySource, error::Error, models::Repository};

/// Fetches the public repositories owned by `username`.
///
/// # Errors
///
/// Any failure of the listing request is fatal and surfaces as
/// [`Error::SourceUnavailable`], carrying the HTTP status when GitHub
/// answered.
pub async fn fetch_direct_repositories<S,>(
    source: &S,
    username: &str,
) -> Result<Vec<Repository,>, Error,>
where
    S: RepositorySource,
{
    debug!("Fetching repositories owned by {}", username);

    let repositories = source.user_repositories(username,).await.map_err(|error| {
        warn!("Repository listing for {} failed: {}", username, error);
        Error::source_unavailable(&error,)
    },)?;

    info!("Found {} direct repositories for {}", repositories.len(), username);

    Ok(repositories,)
}
