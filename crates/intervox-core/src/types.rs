//! Core domain types shared across the Intervox crates.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Messages
// =============================================================================

/// Who authored a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// A single entry in the conversation log.
///
/// Messages are immutable once created; the log is an append-only sequence
/// whose insertion order is the render order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: Uuid,
    /// Message text.
    pub content: String,
    /// Who authored the message.
    pub sender: Sender,
    /// When the message was appended to the log.
    pub timestamp: DateTime<Utc>,
    /// Whether the content was produced by speech capture.
    pub is_voice: bool,
}

impl Message {
    /// Create a user message, optionally flagged as voice-originated.
    pub fn user(content: impl Into<String>, is_voice: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            is_voice,
        }
    }

    /// Create a bot message.
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
            is_voice: false,
        }
    }
}

// =============================================================================
// Languages
// =============================================================================

/// A selectable capture/playback language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// BCP 47 locale tag, e.g. "en-US".
    pub code: String,
    /// Native display name, e.g. "Español".
    pub display_name: String,
    /// Flag glyph shown next to the name.
    pub glyph: String,
}

/// The static language catalog. Order matters only for display.
const LANGUAGE_CATALOG: &[(&str, &str, &str)] = &[
    ("en-US", "English", "\u{1F1FA}\u{1F1F8}"),
    ("es-ES", "Español", "\u{1F1EA}\u{1F1F8}"),
    ("fr-FR", "Français", "\u{1F1EB}\u{1F1F7}"),
    ("de-DE", "Deutsch", "\u{1F1E9}\u{1F1EA}"),
    ("it-IT", "Italiano", "\u{1F1EE}\u{1F1F9}"),
    ("pt-BR", "Português", "\u{1F1E7}\u{1F1F7}"),
    ("zh-CN", "中文", "\u{1F1E8}\u{1F1F3}"),
    ("ja-JP", "日本語", "\u{1F1EF}\u{1F1F5}"),
    ("ko-KR", "한국어", "\u{1F1F0}\u{1F1F7}"),
    ("ar-SA", "العربية", "\u{1F1F8}\u{1F1E6}"),
    ("hi-IN", "हिन्दी", "\u{1F1EE}\u{1F1F3}"),
    ("ru-RU", "Русский", "\u{1F1F7}\u{1F1FA}"),
];

impl Language {
    /// All supported languages, in catalog order.
    pub fn catalog() -> Vec<Language> {
        LANGUAGE_CATALOG
            .iter()
            .map(|(code, name, glyph)| Language {
                code: (*code).to_string(),
                display_name: (*name).to_string(),
                glyph: (*glyph).to_string(),
            })
            .collect()
    }

    /// Look up a catalog language by locale code.
    pub fn by_code(code: &str) -> Option<Language> {
        Self::catalog().into_iter().find(|l| l.code == code)
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::by_code("en-US").expect("en-US is always in the catalog")
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.glyph, self.display_name)
    }
}

// =============================================================================
// Tests
// =============================================================================
