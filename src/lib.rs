//! Top-repositories widget for GitHub accounts.
//!
//! The library fetches a user's own public repositories, discovers
//! repositories the user pushed to in other namespaces through the public
//! event stream, and ranks the merged set into a short list suitable for a
//! profile widget. Rendering helpers turn the resulting state into terminal
//! text, JSON or a standalone SVG.

mod client;
mod config;
mod discover;
mod error;
mod fetch;
mod models;
mod pipeline;
mod rank;
mod render;
#[cfg(test)]
mod test_support;

pub use client::{OctocrabSource, RepositorySource};
pub use config::{DEFAULT_API_BASE, SpotlightConfig, load_config, parse_config};
pub use discover::{Discovery, collect_candidates, discover_contributions};
pub use error::{Degradation, Error, io_error};
pub use fetch::fetch_direct_repositories;
pub use models::{ActivityEvent, EventRepository, PUSH_EVENT, Repository, split_full_name};
pub use pipeline::{Invocation, RankedResult, WidgetController, WidgetState, run_pipeline};
pub use rank::rank_repositories;
pub use render::{
    LanguageLabel, NEUTRAL_LANGUAGE_COLOR, RepositoryCard, WidgetView, format_date,
    language_color, render_json, render_svg, render_text, truncate_description, widget_view,
    write_output,
};
