// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Wire models for the GitHub REST responses consumed by the pipeline.
//!
//! Decoding is lenient: apart from the repository identifier every field may
//! be absent, and absent values resolve to defaults here rather than at the
//! point of use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Event type tag identifying a code push.
pub const PUSH_EVENT: &str = "PushEvent";

/// A single GitHub repository as returned by the listing and detail
/// endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct Repository
{
    /// Globally unique numeric identifier.
    pub id:               u64,
    /// Repository name without the owner.
    #[serde(default)]
    pub name:             String,
    /// Owner-qualified name, `owner/name`.
    #[serde(default)]
    pub full_name:        String,
    #[serde(default)]
    pub description:      Option<String,>,
    /// Canonical web URL.
    #[serde(default)]
    pub html_url:         String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count:      u64,
    /// Primary language label.
    #[serde(default)]
    pub language:         Option<String,>,
    /// Last metadata update.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub updated_at:       Option<DateTime<Utc,>,>,
    /// Last push; repositories without one never reach the ranked result.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub pushed_at:        Option<DateTime<Utc,>,>,
    /// Visibility flag reported by the detail endpoint.
    #[serde(default)]
    pub private:          bool,
}

impl Repository
{
    /// Returns the owner segment of [`full_name`](Self::full_name).
    pub fn owner(&self,) -> Option<&str,>
    {
        split_full_name(&self.full_name,).map(|(owner, _,)| owner,)
    }

    /// Returns the repository name, preferring the segment after the owner in
    /// [`full_name`](Self::full_name) and falling back to
    /// [`name`](Self::name).
    pub fn short_name(&self,) -> &str
    {
        match split_full_name(&self.full_name,) {
            Some((_, name,),) => name,
            None if !self.name.is_empty() => &self.name,
            None => &self.full_name,
        }
    }
}

/// One entry of a user's public event stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize,)]
pub struct ActivityEvent
{
    /// Event type tag, e.g. `PushEvent`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub repo: Option<EventRepository,>,
}

/// Repository reference embedded in an [`ActivityEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize,)]
pub struct EventRepository
{
    #[serde(default)]
    pub name: Option<String,>,
}

impl ActivityEvent
{
    /// Returns `true` for push events.
    pub fn is_push(&self,) -> bool
    {
        self.kind == PUSH_EVENT
    }

    /// Returns the non-empty owner-qualified repository name, if present.
    pub fn repository_name(&self,) -> Option<&str,>
    {
        self.repo
            .as_ref()
            .and_then(|repo| repo.name.as_deref(),)
            .map(str::trim,)
            .filter(|name| !name.is_empty(),)
    }
}

/// Splits `owner/name` into its two non-empty segments.
pub fn split_full_name(full_name: &str,) -> Option<(&str, &str,),>
{
    let (owner, name,) = full_name.split_once('/',)?;
    if owner.is_empty() || name.is_empty() || name.contains('/',) {
        return None;
    }
    Some((owner, name,),)
}

/// Accepts RFC 3339 strings, treating `null`, blank and unparseable values as
/// absent.
fn deserialize_timestamp<'de, D,>(deserializer: D,) -> Result<Option<DateTime<Utc,>,>, D::Error,>
where
    D: Deserializer<'de,>,
{
    let raw = Option::<String,>::deserialize(deserializer,)?;
    Ok(raw
        .as_deref()
        .map(str::trim,)
        .filter(|value| !value.is_empty(),)
        .and_then(|value| DateTime::parse_from_rfc3339(value,).ok(),)
        .map(|value| value.with_timezone(&Utc,),),)
}
