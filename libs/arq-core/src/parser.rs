//! Parser for pasted question sets.
//!
//! # Format
//! ```text
//! # Arithmetic
//! What is 2+2?
//! 4
//! -- counted on fingers
//! What is 3+3?
//! 6
//! ```
//!
//! With `?` as the question marker, `# ` as the chapter marker and `-- ` as
//! the extra marker this yields two records, both in chapter "Arithmetic";
//! the first one carries the extra note "counted on fingers".
//!
//! Question and answer lines keep their text verbatim. Chapter and extra
//! lines have their marker prefix stripped.

use crate::error::ParseError;
use crate::types::{LineKind, MarkerConfig, Record, LINE_BREAK};

/// Every boundary `str::splitlines`-style editors treat as a line break.
/// `\r\n` splits into a line and an empty piece, which is dropped as blank.
const LINE_SEPARATORS: &[char] = &[
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Normalize raw pasted text into trimmed, non-blank lines.
pub fn cleanse_text(text: &str) -> Result<Vec<String>, ParseError> {
    let lines: Vec<String> = text
        .split(LINE_SEPARATORS)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if lines.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    Ok(lines)
}

/// Classify one line.
///
/// `previous` is the kind of the line before it. It only matters when the
/// marker is an answer marker: a line then looks like both a question and an
/// extra note, and counts as an extra note only right after an answer or
/// another extra note.
pub fn classify_line(line: &str, markers: &MarkerConfig, previous: Option<LineKind>) -> LineKind {
    if is_chapter(line, markers) {
        return LineKind::Chapter;
    }

    let question = is_question(line, markers);
    if is_extra(line, markers)
        && (!question || matches!(previous, Some(LineKind::Answer | LineKind::Extra)))
    {
        return LineKind::Extra;
    }

    if question {
        LineKind::Question
    } else {
        LineKind::Answer
    }
}

/// Group normalized lines into records.
///
/// Each record is a run of chapter lines, then question lines, then answer
/// lines, then extra lines, any of which may be empty. The chapter carries
/// over into later records until another chapter run replaces it.
pub fn parse_questions<S: AsRef<str>>(lines: &[S], markers: &MarkerConfig) -> Vec<Record> {
    Segmenter::new(lines, markers).run()
}

fn is_chapter(line: &str, markers: &MarkerConfig) -> bool {
    markers.chapter().is_some_and(|m| line.starts_with(m))
}

fn is_question(line: &str, markers: &MarkerConfig) -> bool {
    line.contains(markers.qa_marker.as_str()) == markers.question_marker
}

fn is_extra(line: &str, markers: &MarkerConfig) -> bool {
    markers
        .extra()
        .is_some_and(|m| line.starts_with(m) && !line.contains(markers.qa_marker.as_str()))
}

fn strip_marker<'a>(line: &'a str, marker: Option<&str>) -> &'a str {
    marker
        .and_then(|m| line.strip_prefix(m))
        .unwrap_or(line)
        .trim()
}

struct Segmenter<'a, S> {
    lines: &'a [S],
    kinds: Vec<LineKind>,
    markers: &'a MarkerConfig,
    pos: usize,
}

impl<'a, S: AsRef<str>> Segmenter<'a, S> {
    fn new(lines: &'a [S], markers: &'a MarkerConfig) -> Self {
        let mut kinds = Vec::with_capacity(lines.len());
        let mut previous = None;
        for line in lines {
            let kind = classify_line(line.as_ref(), markers, previous);
            kinds.push(kind);
            previous = Some(kind);
        }

        Self {
            lines,
            kinds,
            markers,
            pos: 0,
        }
    }

    fn run(mut self) -> Vec<Record> {
        let markers = self.markers;
        let mut records = Vec::new();
        let mut chapter = String::new();

        // Every pass consumes the line at `pos`, whatever its kind.
        while self.pos < self.lines.len() {
            if self.kinds[self.pos] == LineKind::Chapter {
                let marker = markers.chapter();
                chapter = self.take_run(LineKind::Chapter, |line| strip_marker(line, marker));
            }
            let question = self.take_run(LineKind::Question, |line| line);
            let answer = self.take_run(LineKind::Answer, |line| line);
            let marker = markers.extra();
            let extra = self.take_run(LineKind::Extra, |line| strip_marker(line, marker));

            records.push(Record {
                question,
                answer,
                chapter: chapter.clone(),
                extra,
            });
        }

        records
    }

    fn take_run(&mut self, kind: LineKind, clean: impl Fn(&str) -> &str) -> String {
        let start = self.pos;
        while self.pos < self.lines.len() && self.kinds[self.pos] == kind {
            self.pos += 1;
        }

        self.lines[start..self.pos]
            .iter()
            .map(|line| clean(line.as_ref()))
            .collect::<Vec<_>>()
            .join(LINE_BREAK)
    }
}
