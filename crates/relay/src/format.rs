//! Telegram message rendering.
//!
//! Messages use Telegram's legacy `Markdown` parse mode: `*bold*` titles and
//! `[label](url)` links.

use crate::alert::Alert;
use crate::config::{Config, LinkConfig};

pub const GLYPH_RESOLVED: &str = "🟢";
pub const GLYPH_INFO: &str = "🔵";
pub const GLYPH_WARNING: &str = "🟡";
pub const GLYPH_CRITICAL: &str = "🔴";
pub const GLYPH_UNKNOWN: &str = "⚪️";

pub fn glyph_for(alert: &Alert) -> &'static str {
    if alert.is_resolved() {
        return GLYPH_RESOLVED;
    }
    match alert.severity() {
        "info" => GLYPH_INFO,
        "warning" => GLYPH_WARNING,
        "critical" => GLYPH_CRITICAL,
        _ => GLYPH_UNKNOWN,
    }
}

/// Backslash-escapes the characters legacy Markdown treats as markup.
///
/// Only valid outside an entity.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Wraps `text` in a bold entity.
///
/// Legacy Markdown forbids escapes inside an entity, so each `*` closes the
/// bold, is emitted escaped, and the bold is reopened. Other characters are
/// literal inside the entity.
pub fn bold_markdown(text: &str) -> String {
    if text.is_empty() {
        return "**".to_string();
    }
    text.split('*')
        .map(|segment| {
            if segment.is_empty() {
                String::new()
            } else {
                format!("*{}*", segment)
            }
        })
        .collect::<Vec<_>>()
        .join("\\*")
}

#[derive(Debug, Clone)]
pub struct MessageFormatter {
    alertmanager_url: String,
    grafana_url: String,
    escape_markdown: bool,
}

impl MessageFormatter {
    pub fn new(links: &LinkConfig, escape_markdown: bool) -> Self {
        Self {
            alertmanager_url: links.alertmanager_url.clone(),
            grafana_url: links.grafana_url.clone(),
            escape_markdown,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.links, config.telegram.escape_markdown)
    }

    pub fn format(&self, alert: &Alert) -> String {
        let (title, description) = if self.escape_markdown {
            (
                bold_markdown(alert.annotation("title")),
                escape_markdown(alert.annotation("description")),
            )
        } else {
            (
                format!("*{}*", alert.annotation("title")),
                alert.annotation("description").to_string(),
            )
        };

        format!(
            "{} {}\n{}\n[Query]({}) / [Mute]({}) / [Grafana]({})",
            glyph_for(alert),
            title,
            description,
            alert.generator_url,
            self.alertmanager_url,
            self.grafana_url,
        )
    }
}
