//! Core types for the question importer.

use serde::{Deserialize, Serialize};

/// Line break used when joining the lines of one field.
pub const LINE_BREAK: &str = "<br>";

/// Identifier of the deck a note is added to.
pub type DeckId = i64;

/// Markers that drive line classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Substring tested against every line.
    pub qa_marker: String,
    /// When true, lines containing `qa_marker` are questions; otherwise
    /// lines containing it are answers.
    pub question_marker: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_marker: Option<String>,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            qa_marker: "?".to_string(),
            question_marker: true,
            chapter_marker: None,
            extra_marker: None,
        }
    }
}

impl MarkerConfig {
    /// Create a config with only the question/answer marker set.
    pub fn new(qa_marker: impl Into<String>, question_marker: bool) -> Self {
        Self {
            qa_marker: qa_marker.into(),
            question_marker,
            chapter_marker: None,
            extra_marker: None,
        }
    }

    pub fn with_chapter_marker(mut self, marker: impl Into<String>) -> Self {
        self.chapter_marker = Some(marker.into());
        self
    }

    pub fn with_extra_marker(mut self, marker: impl Into<String>) -> Self {
        self.extra_marker = Some(marker.into());
        self
    }

    /// Chapter marker, if set and non-empty.
    pub fn chapter(&self) -> Option<&str> {
        self.chapter_marker.as_deref().filter(|m| !m.is_empty())
    }

    /// Extra-note marker, if set and non-empty.
    pub fn extra(&self) -> Option<&str> {
        self.extra_marker.as_deref().filter(|m| !m.is_empty())
    }
}

/// Kind assigned to a single normalized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Chapter,
    Question,
    Answer,
    Extra,
}

/// One question/answer unit produced by segmentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub question: String,
    pub answer: String,
    pub chapter: String,
    pub extra: String,
}
