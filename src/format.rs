//! How messages are presented, independent of the UI toolkit.

use crate::types::{Message, Source};
use comrak::plugins::syntect::SyntectAdapter;
use comrak::{ComrakOptions, ComrakPlugins, markdown_to_html_with_plugins};
use once_cell::sync::Lazy;
use regex::Regex;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

/// Shown in place of an answer the backend left empty.
pub const EMPTY_ANSWER: &str = "—";

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

static HTTP_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^https?://\S+$").expect("valid regex"));

static MARKDOWN_OPTIONS: Lazy<ComrakOptions> = Lazy::new(|| {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.footnotes = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    options
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceDisplay {
    Link { href: String, label: String },
    Code(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssistantView {
    Answer {
        text: String,
        sources: Vec<SourceDisplay>,
    },
    Error(String),
}

pub fn is_http_url(candidate: &str) -> bool {
    HTTP_URL.is_match(candidate)
}

pub fn source_display(source: &Source) -> SourceDisplay {
    let label = if source.key.trim().is_empty() {
        source.id.clone()
    } else {
        source.key.clone()
    };
    if is_http_url(&label) {
        SourceDisplay::Link {
            href: label.clone(),
            label,
        }
    } else {
        SourceDisplay::Code(label)
    }
}

/// Resolve what an assistant bubble shows. An error wins over any answer
/// text or sources the message may also carry.
pub fn assistant_view(message: &Message) -> Option<AssistantView> {
    let Message::Assistant { text, sources, .. } = message else {
        return None;
    };

    if let Some(err) = message.error() {
        return Some(AssistantView::Error(format!("Error: {err}")));
    }

    let text = if text.trim().is_empty() {
        EMPTY_ANSWER.to_string()
    } else {
        text.clone()
    };
    let sources = sources
        .iter()
        .flatten()
        .map(source_display)
        .collect();
    Some(AssistantView::Answer { text, sources })
}

/// Local wall-clock time of a message, e.g. `03:07 PM`.
pub fn format_timestamp(millis: i64) -> Option<String> {
    let nanos = i128::from(millis) * 1_000_000;
    let mut datetime = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

pub fn markdown_to_html(md: &str) -> String {
    let adapter = SyntectAdapter::new(Some("base16-ocean.dark"));
    let mut plugins = ComrakPlugins::default();
    plugins.render.codefence_syntax_highlighter = Some(&adapter);
    markdown_to_html_with_plugins(md, &MARKDOWN_OPTIONS, &plugins)
}
