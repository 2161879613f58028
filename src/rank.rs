// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Merges direct and discovered repositories into the bounded ranked list.

use std::{cmp::Ordering, collections::HashSet};

use crate::models::Repository;

/// Produces the ranked result from both repository sources.
///
/// Direct repositories are scanned before discovered ones. Entries without a
/// last-push timestamp are dropped, the first occurrence of each identifier
/// wins, the remainder is ordered by stars then last push (both descending),
/// and at most `limit` entries are kept.
///
/// # Example
///
/// ```
/// use spotlight::{Repository, rank_repositories};
///
/// let repo = |id: u64, stars: u64, pushed: &str| -> Repository {
///     serde_json::from_value(serde_json::json!({
///         "id": id, "stargazers_count": stars, "pushed_at": pushed,
///     }))
///     .expect("valid repository",)
/// };
///
/// let direct = vec![repo(1, 10, "2024-01-01T00:00:00Z",), repo(2, 50, "2023-01-01T00:00:00Z",)];
/// let discovered = vec![repo(3, 50, "2024-06-01T00:00:00Z",)];
///
/// let ranked = rank_repositories(direct, discovered, 5,);
/// let ids: Vec<u64,> = ranked.iter().map(|repo| repo.id,).collect();
/// assert_eq!(ids, vec![3, 2, 1]);
/// ```
pub fn rank_repositories(
    direct: Vec<Repository,>,
    discovered: Vec<Repository,>,
    limit: usize,
) -> Vec<Repository,>
{
    let mut seen = HashSet::with_capacity(direct.len() + discovered.len(),);
    let mut ranked: Vec<Repository,> = direct
        .into_iter()
        .chain(discovered,)
        .filter(|repo| repo.pushed_at.is_some(),)
        .filter(|repo| seen.insert(repo.id,),)
        .collect();

    ranked.sort_by(compare_rank,);
    ranked.truncate(limit,);
    ranked
}

/// Stars descending, then last push descending.
fn compare_rank(a: &Repository, b: &Repository,) -> Ordering
{
    b.stargazers_count
        .cmp(&a.stargazers_count,)
        .then_with(|| b.pushed_at.cmp(&a.pushed_at,),)
}
