//! Scripted in-memory [`RepositorySource`] and fixtures shared by unit tests.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering}
    },
    time::Duration
};

use chrono::{NaiveDate, TimeZone, Utc};

use crate::{
    client::RepositorySource,
    error::Error,
    models::{ActivityEvent, EventRepository, Repository}
};

/// Response script: `Err` carries the HTTP status the fake API answers with.
type Scripted<T> = Result<T, u16>;

pub(crate) struct ScriptedSource {
    repositories:  Scripted<Vec<Repository>>,
    events:        Scripted<Vec<ActivityEvent>>,
    details:       HashMap<String, Scripted<Repository>>,
    listing_delay: Option<Duration>,
    detail_delay:  Option<Duration>,
    listing_calls: AtomicUsize,
    event_calls:   AtomicUsize,
    detail_calls:  Mutex<Vec<String>>,
    in_flight:     AtomicUsize,
    peak_details:  AtomicUsize
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self {
            repositories:  Ok(Vec::new()),
            events:        Ok(Vec::new()),
            details:       HashMap::new(),
            listing_delay: None,
            detail_delay:  None,
            listing_calls: AtomicUsize::new(0),
            event_calls:   AtomicUsize::new(0),
            detail_calls:  Mutex::new(Vec::new()),
            in_flight:     AtomicUsize::new(0),
            peak_details:  AtomicUsize::new(0)
        }
    }

    pub(crate) fn with_repositories(mut self, repositories: Scripted<Vec<Repository>>) -> Self {
        self.repositories = repositories;
        self
    }

    pub(crate) fn with_events(mut self, events: Scripted<Vec<ActivityEvent>>) -> Self {
        self.events = events;
        self
    }

    pub(crate) fn with_detail(mut self, full_name: &str, detail: Scripted<Repository>) -> Self {
        self.details.insert(full_name.to_owned(), detail);
        self
    }

    pub(crate) fn with_listing_delay(mut self, delay: Duration) -> Self {
        self.listing_delay = Some(delay);
        self
    }

    pub(crate) fn with_detail_delay(mut self, delay: Duration) -> Self {
        self.detail_delay = Some(delay);
        self
    }

    /// Largest number of detail lookups observed in flight at once.
    pub(crate) fn peak_detail_concurrency(&self) -> usize {
        self.peak_details.load(Ordering::SeqCst)
    }

    pub(crate) fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn event_calls(&self) -> usize {
        self.event_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn detail_calls(&self) -> Vec<String> {
        self.detail_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

fn status_error(operation: &str, status: u16) -> Error {
    Error::Request {
        operation: operation.to_owned(),
        status:    Some(status),
        message:   format!("GitHub returned {status}")
    }
}

impl RepositorySource for ScriptedSource {
    async fn user_repositories(&self, _username: &str) -> Result<Vec<Repository>, Error> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.listing_delay {
            tokio::time::sleep(delay).await;
        }
        self.repositories
            .clone()
            .map_err(|status| status_error("list repositories", status))
    }

    async fn user_events(&self, _username: &str) -> Result<Vec<ActivityEvent>, Error> {
        self.event_calls.fetch_add(1, Ordering::SeqCst);
        self.events
            .clone()
            .map_err(|status| status_error("list events", status))
    }

    async fn repository(&self, full_name: &str) -> Result<Repository, Error> {
        if let Ok(mut calls) = self.detail_calls.lock() {
            calls.push(full_name.to_owned());
        }
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_details.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.detail_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match self.details.get(full_name) {
            Some(detail) => detail
                .clone()
                .map_err(|status| status_error("fetch repository", status)),
            None => Err(status_error("fetch repository", 404))
        }
    }
}

/// Builds a public repository; `pushed` is a `YYYY-MM-DD` date at midnight
/// UTC.
pub(crate) fn repo(id: u64, full_name: &str, stars: u64, pushed: Option<&str>) -> Repository {
    let name = full_name
        .split_once('/')
        .map_or(full_name, |(_, name)| name)
        .to_owned();
    let pushed_at = pushed.map(|date| {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("fixture date");
        Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0).expect("midnight"))
    });

    Repository {
        id,
        name,
        full_name: full_name.to_owned(),
        description: None,
        html_url: format!("https://github.com/{full_name}"),
        stargazers_count: stars,
        forks_count: 0,
        language: None,
        updated_at: pushed_at,
        pushed_at,
        private: false
    }
}

pub(crate) fn event(kind: &str, repository: Option<&str>) -> ActivityEvent {
    ActivityEvent {
        kind: kind.to_owned(),
        repo: Some(EventRepository {
            name: repository.map(str::to_owned)
        })
    }
}

pub(crate) fn push(repository: &str) -> ActivityEvent {
    event(crate::models::PUSH_EVENT, Some(repository))
}
