//! The ARQ note type: fields, card template, styling and version upgrades.

use crate::error::{ImportError, Result};
use crate::render::media_filename;
use crate::types::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version reported by collections created before note types were versioned.
pub const UNVERSIONED: &str = "none";

/// Field names of the ARQ note type.
pub mod fields {
    pub const QUESTION: &str = "سؤال";
    pub const ANSWER: &str = "جواب";
    pub const NUMBER: &str = "رقم السؤال";
    pub const TITLE: &str = "عنوان";
    pub const CHAPTER: &str = "باب";
    pub const ALL_QUESTIONS: &str = "كل الأسئلة";
    pub const EXTRA: &str = "إضافي";
    pub const SOURCES: &str = "مصادر";
}

const FRONT: &str = r#"
<div class="arq-header"><span class="arq-title">{{عنوان}}</span> <span class="arq-number">{{رقم السؤال}}</span></div>
{{#باب}}<div class="arq-chapter">{{باب}}</div>{{/باب}}
<div class="arq-question">{{سؤال}}</div>
"#;

const BACK: &str = r#"
{{FrontSide}}
<hr id="answer">
<div class="arq-answer">{{جواب}}</div>
{{#إضافي}}<div class="arq-extra">{{إضافي}}</div>{{/إضافي}}
{{#مصادر}}<div class="arq-sources">{{مصادر}}</div>{{/مصادر}}
<div class="arq-all" hidden>{{كل الأسئلة}}</div>
"#;

const STYLING: &str = r#"
.card {
    font-family: "Amiri", "Traditional Arabic", serif;
    font-size: 24px;
    direction: rtl;
    text-align: right;
}
.arq-header { font-size: 16px; color: #777; }
.arq-chapter { font-size: 18px; color: #555; margin-bottom: 8px; }
.arq-extra { font-size: 18px; color: #3a6ea5; margin-top: 12px; }
.arq-sources { font-size: 14px; color: #999; margin-top: 12px; }
"#;

/// One field of a stored note type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteField {
    pub name: String,
    pub rtl: bool,
}

/// One card template of a stored note type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub name: String,
    pub front: String,
    pub back: String,
}

/// Note type as stored in a collection. Users may edit it, so it can drift
/// from the definition it was created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteTypeSchema {
    pub name: String,
    pub fields: Vec<NoteField>,
    pub sort_field: usize,
    pub templates: Vec<CardTemplate>,
    pub css: String,
}

impl NoteTypeSchema {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// One upgrade step: mutates a schema at version `from` into version `to`.
#[derive(Debug, Clone, Copy)]
pub struct Upgrade {
    pub from: &'static str,
    pub to: &'static str,
    pub apply: fn(&mut NoteTypeSchema) -> std::result::Result<(), String>,
}

/// Definition a note type is built from.
#[derive(Debug)]
pub struct NoteTypeDefinition {
    pub name: &'static str,
    pub version: &'static str,
    pub fields: &'static [&'static str],
    pub sort_field: &'static str,
    pub template_name: &'static str,
    pub front: &'static str,
    pub back: &'static str,
    pub styling: &'static str,
    /// Upgrade steps in chronological order.
    pub upgrades: &'static [Upgrade],
}

/// The note type every imported question becomes.
pub static ARQ_NOTE_TYPE: NoteTypeDefinition = NoteTypeDefinition {
    name: "ARQ 1.0",
    version: "1.1.0",
    fields: &[
        fields::QUESTION,
        fields::ANSWER,
        fields::NUMBER,
        fields::TITLE,
        fields::CHAPTER,
        fields::ALL_QUESTIONS,
        fields::EXTRA,
        fields::SOURCES,
    ],
    sort_field: fields::QUESTION,
    template_name: "ARQ1",
    front: FRONT,
    back: BACK,
    styling: STYLING,
    upgrades: &[],
};

impl NoteTypeDefinition {
    /// Build a fresh schema. Every field is right-to-left.
    pub fn to_schema(&self) -> NoteTypeSchema {
        NoteTypeSchema {
            name: self.name.to_string(),
            fields: self
                .fields
                .iter()
                .map(|name| NoteField {
                    name: name.to_string(),
                    rtl: true,
                })
                .collect(),
            sort_field: self
                .fields
                .iter()
                .position(|f| *f == self.sort_field)
                .unwrap_or(0),
            templates: vec![CardTemplate {
                name: self.template_name.to_string(),
                front: self.front.trim().to_string(),
                back: self.back.trim().to_string(),
            }],
            css: self.styling.trim().to_string(),
        }
    }

    pub fn is_at_version(&self, version: &str) -> bool {
        version == self.version
    }

    /// True if a known upgrade starts at `version`.
    pub fn can_upgrade(&self, version: &str) -> bool {
        !self.is_at_version(version) && self.upgrades.iter().any(|u| u.from == version)
    }

    /// Run every applicable upgrade step on `schema`, starting at `version`.
    /// Returns the version the schema ends up at.
    pub fn upgrade_from(&self, schema: &mut NoteTypeSchema, version: &str) -> Result<String> {
        let mut at = version.to_string();
        for upgrade in self.upgrades {
            if at == upgrade.from {
                (upgrade.apply)(schema).map_err(|reason| ImportError::UpgradeFailed {
                    from: upgrade.from.to_string(),
                    to: upgrade.to.to_string(),
                    reason,
                })?;
                at = upgrade.to.to_string();
            }
        }
        Ok(at)
    }

    /// Fail unless `version` is the current version.
    pub fn ensure_current(&self, version: &str) -> Result<()> {
        if self.is_at_version(version) {
            Ok(())
        } else {
            Err(ImportError::OutdatedNoteType {
                name: self.name.to_string(),
                found: version.to_string(),
                expected: self.version.to_string(),
            })
        }
    }
}

/// Field values for the note created from `record`, keyed by field name.
///
/// Every field the importer writes must exist in `schema`; the first one
/// missing is reported. Fields the importer does not write stay empty.
pub fn note_fields(
    schema: &NoteTypeSchema,
    record: &Record,
    seq: usize,
    title: &str,
) -> Result<BTreeMap<String, String>> {
    let mut values: BTreeMap<String, String> = schema
        .field_names()
        .map(|name| (name.to_string(), String::new()))
        .collect();

    let assignments = [
        (fields::QUESTION, record.question.clone()),
        (fields::ANSWER, record.answer.clone()),
        (fields::CHAPTER, record.chapter.clone()),
        (fields::TITLE, title.to_string()),
        (fields::NUMBER, seq.to_string()),
        (
            fields::ALL_QUESTIONS,
            format!(r#"<img src="{}">"#, media_filename(title)),
        ),
        (fields::EXTRA, record.extra.clone()),
    ];

    for (field, value) in assignments {
        match values.get_mut(field) {
            Some(slot) => *slot = value,
            None => {
                return Err(ImportError::MissingField {
                    field: field.to_string(),
                    note_type: schema.name.clone(),
                })
            }
        }
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn add_sources(schema: &mut NoteTypeSchema) -> std::result::Result<(), String> {
        schema.fields.push(NoteField {
            name: "sources".to_string(),
            rtl: true,
        });
        Ok(())
    }

    fn rename_template(schema: &mut NoteTypeSchema) -> std::result::Result<(), String> {
        let template = schema.templates.first_mut().ok_or("no templates")?;
        template.name = "renamed".to_string();
        Ok(())
    }

    fn broken(_: &mut NoteTypeSchema) -> std::result::Result<(), String> {
        Err("template missing".to_string())
    }

    static VERSIONED: NoteTypeDefinition = NoteTypeDefinition {
        name: "Versioned",
        version: "3",
        fields: &["q", "a"],
        sort_field: "a",
        template_name: "card",
        front: "{{q}}",
        back: "{{a}}",
        styling: "",
        upgrades: &[
            Upgrade { from: "none", to: "2", apply: add_sources },
            Upgrade { from: "2", to: "3", apply: rename_template },
        ],
    };

    static BROKEN: NoteTypeDefinition = NoteTypeDefinition {
        name: "Broken",
        version: "2",
        fields: &["q"],
        sort_field: "q",
        template_name: "card",
        front: "",
        back: "",
        styling: "",
        upgrades: &[Upgrade { from: "1", to: "2", apply: broken }],
    };

    #[test]
    fn schema_has_all_fields_rtl() {
        let schema = ARQ_NOTE_TYPE.to_schema();
        assert_eq!(schema.name, "ARQ 1.0");
        assert_eq!(schema.fields.len(), 8);
        assert!(schema.fields.iter().all(|f| f.rtl));
        assert_eq!(schema.sort_field, 0);
        assert_eq!(schema.templates.len(), 1);
        assert!(schema.templates[0].front.starts_with("<div"));
    }

    #[test]
    fn sort_field_index_follows_definition() {
        assert_eq!(VERSIONED.to_schema().sort_field, 1);
    }

    #[test]
    fn version_checks() {
        assert!(ARQ_NOTE_TYPE.is_at_version("1.1.0"));
        assert!(!ARQ_NOTE_TYPE.can_upgrade("1.1.0"));
        assert!(!ARQ_NOTE_TYPE.can_upgrade(UNVERSIONED));
        assert!(VERSIONED.can_upgrade(UNVERSIONED));
        assert!(VERSIONED.can_upgrade("2"));
        assert!(!VERSIONED.can_upgrade("3"));
        assert!(!VERSIONED.can_upgrade("1"));
    }

    #[test]
    fn upgrade_chains_steps_in_order() {
        let mut schema = VERSIONED.to_schema();
        let version = VERSIONED.upgrade_from(&mut schema, UNVERSIONED).unwrap();
        assert_eq!(version, "3");
        assert!(schema.has_field("sources"));
        assert_eq!(schema.templates[0].name, "renamed");
    }

    #[test]
    fn upgrade_from_unknown_version_is_noop() {
        let mut schema = VERSIONED.to_schema();
        let before = schema.clone();
        let version = VERSIONED.upgrade_from(&mut schema, "0.9").unwrap();
        assert_eq!(version, "0.9");
        assert_eq!(schema, before);
    }

    #[test]
    fn upgrade_failure_names_versions() {
        let mut schema = BROKEN.to_schema();
        let err = BROKEN.upgrade_from(&mut schema, "1").unwrap_err();
        assert!(matches!(
            err,
            ImportError::UpgradeFailed { ref from, ref to, .. } if from == "1" && to == "2"
        ));
    }

    #[test]
    fn ensure_current_rejects_old_version() {
        assert!(ARQ_NOTE_TYPE.ensure_current("1.1.0").is_ok());
        let err = ARQ_NOTE_TYPE.ensure_current(UNVERSIONED).unwrap_err();
        assert_eq!(
            err.to_string(),
            "note type ARQ 1.0 is at version none, expected 1.1.0"
        );
    }

    #[test]
    fn note_fields_fill_schema() {
        let schema = ARQ_NOTE_TYPE.to_schema();
        let record = Record {
            question: "Q?".to_string(),
            answer: "A".to_string(),
            chapter: "Ch".to_string(),
            extra: "note".to_string(),
        };
        let values = note_fields(&schema, &record, 7, "Set").unwrap();
        assert_eq!(values.len(), 8);
        assert_eq!(values[fields::QUESTION], "Q?");
        assert_eq!(values[fields::ANSWER], "A");
        assert_eq!(values[fields::CHAPTER], "Ch");
        assert_eq!(values[fields::EXTRA], "note");
        assert_eq!(values[fields::TITLE], "Set");
        assert_eq!(values[fields::NUMBER], "7");
        assert_eq!(values[fields::ALL_QUESTIONS], r#"<img src="_Set.js">"#);
        assert_eq!(values[fields::SOURCES], "");
    }

    #[test]
    fn note_fields_report_missing_field() {
        let mut schema = ARQ_NOTE_TYPE.to_schema();
        schema.fields.retain(|f| f.name != fields::CHAPTER);
        let err = note_fields(&schema, &Record::default(), 1, "Set").unwrap_err();
        match err {
            ImportError::MissingField { field, note_type } => {
                assert_eq!(field, fields::CHAPTER);
                assert_eq!(note_type, "ARQ 1.0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
