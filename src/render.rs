// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Presentation of the widget state.
//!
//! The pipeline hands over a [`WidgetState`]; this module maps it to a
//! [`WidgetView`] of display-ready [`RepositoryCard`]s and serializes that
//! view as terminal text, JSON or a self-contained SVG widget. The SVG output
//! is deterministic so it can be committed next to a profile README.

use std::{
    borrow::Cow,
    fmt::Write as _,
    fs::File,
    io::{BufWriter, Write},
    path::Path
};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::{self, Error},
    models::Repository,
    pipeline::WidgetState
};

/// Swatch used for unknown or absent languages.
pub const NEUTRAL_LANGUAGE_COLOR: &str = "#6b7280";
const LOADING_MESSAGE: &str = "Loading repositories…";
const EMPTY_MESSAGE: &str = "No repositories found";
const SUBTITLE: &str = "Top repositories";

const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("TypeScript", "#2b7489"),
    ("Python", "#3572A5"),
    ("Java", "#b07219"),
    ("C++", "#f34b7d"),
    ("C", "#555555"),
    ("C#", "#239120"),
    ("PHP", "#4F5D95"),
    ("Ruby", "#701516"),
    ("Go", "#00ADD8"),
    ("Rust", "#dea584"),
    ("Swift", "#ffac45"),
    ("Kotlin", "#F18E33"),
    ("Dart", "#00B4AB"),
    ("HTML", "#e34c26"),
    ("CSS", "#1572B6"),
    ("Shell", "#89e051"),
    ("Vue", "#2c3e50"),
    ("React", "#61dafb")
];

/// Display-ready projection of a single repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryCard {
    /// Repository name without the owner.
    pub title:       String,
    /// Owner, present only when it differs from the queried user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner:       Option<String>,
    /// Star count, absent when zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars:       Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language:    Option<LanguageLabel>,
    /// Description shortened to the configured limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Human readable last update date, e.g. `Jun 1, 2024`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated:     Option<String>,
    /// Canonical repository URL the card links to.
    pub url:         String
}

/// Language name with its swatch color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageLabel {
    pub name:  String,
    pub color: &'static str
}

/// Renderable form of a [`WidgetState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
pub enum WidgetView {
    /// Progress indicator.
    Loading,
    /// Failure message.
    Error(String),
    /// Successful run without qualifying repositories.
    Empty,
    /// Successful run with at least one repository.
    Cards(Vec<RepositoryCard>)
}

/// Maps the pipeline state onto the view shown for `username`.
pub fn widget_view(state: &WidgetState, username: &str, description_limit: usize) -> WidgetView {
    match state {
        WidgetState::Idle | WidgetState::Loading => WidgetView::Loading,
        WidgetState::Failed {
            message
        } => WidgetView::Error(message.clone()),
        WidgetState::Success(result) if result.repositories.is_empty() => WidgetView::Empty,
        WidgetState::Success(result) => WidgetView::Cards(
            result
                .repositories
                .iter()
                .map(|repository| RepositoryCard::new(repository, username, description_limit))
                .collect()
        )
    }
}

impl RepositoryCard {
    /// Builds the card for `repository` as seen by `username`.
    pub fn new(repository: &Repository, username: &str, description_limit: usize) -> Self {
        let owner = repository
            .owner()
            .filter(|owner| !owner.eq_ignore_ascii_case(username))
            .map(str::to_owned);
        let language = repository
            .language
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| LanguageLabel {
                name:  name.to_owned(),
                color: language_color(Some(name))
            });
        let description = repository
            .description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(|text| truncate_description(text, description_limit).into_owned());

        Self {
            title: repository.short_name().to_owned(),
            owner,
            stars: Some(repository.stargazers_count).filter(|stars| *stars > 0),
            language,
            description,
            updated: repository
                .updated_at
                .or(repository.pushed_at)
                .map(format_date),
            url: repository.html_url.clone()
        }
    }
}

/// Returns the swatch color for a language label.
///
/// # Examples
///
/// ```
/// use spotlight::language_color;
///
/// assert_eq!(language_color(Some("Rust")), "#dea584");
/// assert_eq!(language_color(Some("COBOL")), "#6b7280");
/// assert_eq!(language_color(None), "#6b7280");
/// ```
pub fn language_color(language: Option<&str>) -> &'static str {
    language
        .and_then(|name| {
            LANGUAGE_COLORS
                .iter()
                .find(|(candidate, _)| *candidate == name)
        })
        .map_or(NEUTRAL_LANGUAGE_COLOR, |(_, color)| *color)
}

/// Formats a timestamp as `Mon D, YYYY`.
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %Y").to_string()
}

/// Shortens `text` to at most `limit` characters, ending with an ellipsis
/// when cut.
pub fn truncate_description(text: &str, limit: usize) -> Cow<'_, str> {
    if text.chars().count() <= limit {
        return Cow::Borrowed(text);
    }

    let kept: String = text.chars().take(limit.saturating_sub(1)).collect();
    let mut shortened = kept.trim_end().to_owned();
    shortened.push('…');
    Cow::Owned(shortened)
}

/// Renders the widget as plain terminal text.
pub fn render_text(view: &WidgetView, username: &str) -> String {
    let mut buffer = String::with_capacity(512);
    let _ = writeln!(buffer, "{username} · {SUBTITLE}\n");

    match view {
        WidgetView::Loading => {
            let _ = writeln!(buffer, "  {LOADING_MESSAGE}");
        }
        WidgetView::Error(message) => {
            let _ = writeln!(buffer, "  {message}");
        }
        WidgetView::Empty => {
            let _ = writeln!(buffer, "  {EMPTY_MESSAGE}");
        }
        WidgetView::Cards(cards) => {
            for card in cards {
                let mut heading = card.title.clone();
                if let Some(owner) = &card.owner {
                    let _ = write!(heading, " ({owner})");
                }
                if let Some(stars) = card.stars {
                    let _ = write!(heading, "  ★ {stars}");
                }
                if let Some(language) = &card.language {
                    let _ = write!(heading, "  ● {}", language.name);
                }
                let _ = writeln!(buffer, "  {heading}");
                if let Some(description) = &card.description {
                    let _ = writeln!(buffer, "    {description}");
                }
                match &card.updated {
                    Some(updated) => {
                        let _ = writeln!(buffer, "    {updated} · {}", card.url);
                    }
                    None => {
                        let _ = writeln!(buffer, "    {}", card.url);
                    }
                }
                buffer.push('\n');
            }
        }
    }

    buffer
}

/// Serializes the view as pretty JSON.
///
/// # Errors
///
/// Returns [`Error::Serialize`](Error::Serialize) if encoding fails.
pub fn render_json(view: &WidgetView) -> Result<String, Error> {
    let mut json = serde_json::to_string_pretty(view)?;
    json.push('\n');
    Ok(json)
}

const SVG_WIDTH: u32 = 400;
const SVG_HEIGHT: u32 = 350;
const CARD_TOP: u32 = 62;
const CARD_HEIGHT: u32 = 52;
const CARD_GAP: u32 = 5;
const CARD_RIGHT: u32 = 376;
const SWATCH_GAP: u32 = 8;
/// Approximate advance of one 11px glyph.
const STAT_GLYPH_WIDTH: u32 = 6;
const FONT_FAMILY: &str = "'Segoe UI', 'SF Pro Display', sans-serif";

/// Renders the widget as a standalone 400×350 SVG document.
///
/// Each card is wrapped in a link to the repository that opens in a new
/// browsing context.
pub fn render_svg(view: &WidgetView, username: &str) -> String {
    let mut buffer = String::with_capacity(2048);
    let escaped_user = escape_xml(username);

    let _ = writeln!(
        buffer,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" role=\"img\" aria-label=\"{escaped_user} top repositories\" width=\"{SVG_WIDTH}\" height=\"{SVG_HEIGHT}\" viewBox=\"0 0 {SVG_WIDTH} {SVG_HEIGHT}\">",
    );
    let _ = writeln!(
        buffer,
        "  <rect width=\"{SVG_WIDTH}\" height=\"{SVG_HEIGHT}\" fill=\"#ffffff\"/>"
    );
    let _ = writeln!(
        buffer,
        "  <text x=\"200\" y=\"30\" text-anchor=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"18\" font-weight=\"600\" fill=\"#111827\">{escaped_user}</text>",
    );
    let _ = writeln!(
        buffer,
        "  <text x=\"200\" y=\"48\" text-anchor=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"12\" fill=\"#6b7280\">{SUBTITLE}</text>",
    );

    match view {
        WidgetView::Loading => push_notice(&mut buffer, LOADING_MESSAGE, "#f3f4f6", "#6b7280"),
        WidgetView::Error(message) => push_notice(&mut buffer, message, "#fef2f2", "#dc2626"),
        WidgetView::Empty => push_notice(&mut buffer, EMPTY_MESSAGE, "#f3f4f6", "#6b7280"),
        WidgetView::Cards(cards) => {
            let mut top = CARD_TOP;
            for card in cards {
                if top + CARD_HEIGHT > SVG_HEIGHT {
                    break;
                }
                push_card(&mut buffer, card, top);
                top += CARD_HEIGHT + CARD_GAP;
            }
        }
    }

    buffer.push_str("</svg>\n");
    buffer
}

fn push_notice(buffer: &mut String, message: &str, background: &str, foreground: &str) {
    let escaped = escape_xml(message);
    let _ = writeln!(
        buffer,
        "  <rect x=\"12\" y=\"{CARD_TOP}\" width=\"376\" height=\"40\" rx=\"8\" fill=\"{background}\"/>",
    );
    let _ = writeln!(
        buffer,
        "  <text x=\"200\" y=\"{}\" text-anchor=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"12\" fill=\"{foreground}\">{escaped}</text>",
        CARD_TOP + 24,
    );
}

fn push_card(buffer: &mut String, card: &RepositoryCard, top: u32) {
    let url = escape_xml(&card.url);
    let title = escape_xml(&card.title);

    let _ = writeln!(
        buffer,
        "  <a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">"
    );
    let _ = writeln!(
        buffer,
        "    <rect x=\"12\" y=\"{top}\" width=\"376\" height=\"{CARD_HEIGHT}\" rx=\"8\" fill=\"#f9fafb\" stroke=\"#e5e7eb\"/>",
    );

    let _ = write!(
        buffer,
        "    <text x=\"24\" y=\"{}\" font-family=\"{FONT_FAMILY}\" font-size=\"13\" font-weight=\"500\" fill=\"#111827\">{title}",
        top + 18,
    );
    if let Some(owner) = &card.owner {
        let _ = write!(
            buffer,
            "<tspan font-size=\"11\" font-weight=\"400\" fill=\"#6b7280\"> · {}</tspan>",
            escape_xml(owner)
        );
    }
    buffer.push_str("</text>\n");

    let mut right = CARD_RIGHT;
    if let Some(language) = &card.language {
        let _ = writeln!(
            buffer,
            "    <text x=\"{right}\" y=\"{}\" text-anchor=\"end\" font-family=\"{FONT_FAMILY}\" font-size=\"11\" fill=\"#6b7280\">{}</text>",
            top + 18,
            escape_xml(&language.name)
        );
        let swatch_x = right.saturating_sub(text_width(&language.name) + SWATCH_GAP);
        let _ = writeln!(
            buffer,
            "    <circle cx=\"{swatch_x}\" cy=\"{}\" r=\"4\" fill=\"{}\"/>",
            top + 14,
            language.color
        );
        right = swatch_x.saturating_sub(SWATCH_GAP + 2);
    }
    if let Some(stars) = card.stars {
        let _ = writeln!(
            buffer,
            "    <text x=\"{right}\" y=\"{}\" text-anchor=\"end\" font-family=\"{FONT_FAMILY}\" font-size=\"11\" fill=\"#6b7280\">★ {stars}</text>",
            top + 18,
        );
    }

    if let Some(description) = &card.description {
        let _ = writeln!(
            buffer,
            "    <text x=\"24\" y=\"{}\" font-family=\"{FONT_FAMILY}\" font-size=\"11\" fill=\"#4b5563\">{}</text>",
            top + 33,
            escape_xml(description)
        );
    }
    if let Some(updated) = &card.updated {
        let _ = writeln!(
            buffer,
            "    <text x=\"24\" y=\"{}\" font-family=\"{FONT_FAMILY}\" font-size=\"10\" fill=\"#9ca3af\">{}</text>",
            top + 46,
            escape_xml(updated)
        );
    }

    buffer.push_str("  </a>\n");
}

fn text_width(text: &str) -> u32 {
    u32::try_from(text.chars().count())
        .unwrap_or(u32::MAX)
        .saturating_mul(STAT_GLYPH_WIDTH)
}

fn escape_xml(value: &str) -> Cow<'_, str> {
    if value
        .chars()
        .any(|character| matches!(character, '&' | '<' | '>' | '\"' | '\''))
    {
        let mut escaped = String::with_capacity(value.len());
        for character in value.chars() {
            match character {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '\"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                other => escaped.push(other)
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(value)
    }
}

/// Writes rendered output to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`Error::Io`](Error::Io) when the file cannot be created or
/// written.
pub fn write_output(path: &Path, contents: &str) -> Result<(), Error> {
    let file = File::create(path).map_err(|source| error::io_error(path, source))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents.as_bytes())
        .map_err(|source| error::io_error(path, source))?;
    writer
        .flush()
        .map_err(|source| error::io_error(path, source))
}
