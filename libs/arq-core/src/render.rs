//! Rendering of a whole question set into the media script every card of
//! the set links to.

use crate::types::{Record, LINE_BREAK};

/// Prefix shown before each question in the rendered set ("Q:").
const QUESTION_LABEL: &str = "س: ";
/// Prefix shown before each answer in the rendered set ("A:").
const ANSWER_LABEL: &str = "ج: ";

/// Name of the media file holding the rendered set for `title`.
pub fn media_filename(title: &str) -> String {
    format!("_{title}.js")
}

/// Render records as one paragraph each, numbered from 1 in document order.
pub fn render_question_set(records: &[Record]) -> String {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            format!(
                r#"<p id="arq-{}">{QUESTION_LABEL}{}{LINE_BREAK}{ANSWER_LABEL}{}</p>"#,
                idx + 1,
                record.question,
                record.answer
            )
        })
        .collect()
}

/// Wrap the rendered set in the script assignment read by the card template.
pub fn question_set_script(records: &[Record]) -> String {
    let text = render_question_set(records);
    // A JSON string literal is always a valid JS string literal.
    let literal = serde_json::Value::String(text).to_string();
    format!("var ARQText = {literal};")
}
