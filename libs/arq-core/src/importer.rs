//! Turning parsed records into notes through host-provided collaborators.

use crate::error::{ImportError, Result};
use crate::render::{media_filename, question_set_script};
use crate::types::{DeckId, Record};

/// Storage backend that turns one record into a note.
pub trait RecordSink {
    fn materialize(
        &mut self,
        record: &Record,
        seq: usize,
        title: &str,
        tags: &[String],
        destination: DeckId,
    ) -> Result<()>;
}

/// Media folder of the host collection.
pub trait MediaStore {
    /// Fail if `name` cannot be stored. Called before any note is added.
    fn check_name(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    /// Remove files, ignoring names that do not exist.
    fn trash_files(&mut self, names: &[String]) -> Result<()>;

    /// Write a file and return the name it was stored under.
    fn write_data(&mut self, name: &str, data: &[u8]) -> Result<String>;
}

/// Parameters shared by every note of one import.
#[derive(Debug, Clone, Default)]
pub struct ImportRequest {
    pub title: String,
    pub tags: Vec<String>,
    pub deck_id: DeckId,
    /// Number of leading records already present in the collection.
    pub previously_imported: usize,
}

/// Split a tag string the way the tag editor does: on whitespace.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Add one note per record not yet imported and refresh the media script.
///
/// Sequence numbers are positions in the full record list, so a resumed
/// import continues where the previous one stopped. The media script always
/// covers every record. The script name is checked before the first note
/// is added, so a name the media store refuses leaves the sink untouched.
/// Returns the number of notes added.
pub fn add_notes<S, M>(
    sink: &mut S,
    media: Option<&mut M>,
    request: &ImportRequest,
    records: &[Record],
) -> Result<usize>
where
    S: RecordSink + ?Sized,
    M: MediaStore + ?Sized,
{
    let skip = request.previously_imported;
    if skip > records.len() {
        return Err(ImportError::PreviousCountExceeds {
            declared: skip,
            parsed: records.len(),
        });
    }
    if let Some(media) = media.as_deref() {
        media.check_name(&media_filename(&request.title))?;
    }

    let mut added = 0;
    for (idx, record) in records.iter().enumerate().skip(skip) {
        sink.materialize(record, idx + 1, &request.title, &request.tags, request.deck_id)?;
        added += 1;
    }

    if let Some(media) = media {
        write_question_set(media, records, &request.title)?;
    }

    Ok(added)
}

/// Replace the media script for `title` with one rendering `records`.
pub fn write_question_set<M: MediaStore + ?Sized>(
    media: &mut M,
    records: &[Record],
    title: &str,
) -> Result<String> {
    let name = media_filename(title);
    media.trash_files(std::slice::from_ref(&name))?;
    media.write_data(&name, question_set_script(records).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemorySink {
        notes: Vec<(usize, String, Vec<String>, DeckId, Record)>,
        fail_at: Option<usize>,
    }

    impl RecordSink for MemorySink {
        fn materialize(
            &mut self,
            record: &Record,
            seq: usize,
            title: &str,
            tags: &[String],
            destination: DeckId,
        ) -> Result<()> {
            if self.fail_at == Some(seq) {
                return Err(ImportError::Storage("disk full".to_string()));
            }
            self.notes
                .push((seq, title.to_string(), tags.to_vec(), destination, record.clone()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryMedia {
        files: HashMap<String, Vec<u8>>,
        trashed: Vec<String>,
        refused: Option<String>,
    }

    impl MediaStore for MemoryMedia {
        fn check_name(&self, name: &str) -> Result<()> {
            match &self.refused {
                Some(refused) if refused == name => Err(ImportError::Media(name.to_string())),
                _ => Ok(()),
            }
        }

        fn trash_files(&mut self, names: &[String]) -> Result<()> {
            for name in names {
                if self.files.remove(name).is_some() {
                    self.trashed.push(name.clone());
                }
            }
            Ok(())
        }

        fn write_data(&mut self, name: &str, data: &[u8]) -> Result<String> {
            self.files.insert(name.to_string(), data.to_vec());
            Ok(name.to_string())
        }
    }

    fn records(n: usize) -> Vec<Record> {
        (1..=n)
            .map(|i| Record {
                question: format!("Q{i}?"),
                answer: format!("A{i}"),
                ..Default::default()
            })
            .collect()
    }

    fn request(previously_imported: usize) -> ImportRequest {
        ImportRequest {
            title: "Set".to_string(),
            tags: split_tags("math  basics"),
            deck_id: 3,
            previously_imported,
        }
    }

    #[test]
    fn split_tags_on_whitespace() {
        assert_eq!(split_tags("  a b\tc\n"), vec!["a", "b", "c"]);
        assert!(split_tags("   ").is_empty());
    }

    #[test]
    fn add_notes_numbers_from_one() {
        let mut sink = MemorySink::default();
        let added =
            add_notes::<_, MemoryMedia>(&mut sink, None, &request(0), &records(3)).unwrap();
        assert_eq!(added, 3);
        let seqs: Vec<usize> = sink.notes.iter().map(|n| n.0).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        assert_eq!(sink.notes[0].1, "Set");
        assert_eq!(sink.notes[0].2, vec!["math", "basics"]);
        assert_eq!(sink.notes[0].3, 3);
    }

    #[test]
    fn add_notes_skips_previously_imported() {
        let mut sink = MemorySink::default();
        let added =
            add_notes::<_, MemoryMedia>(&mut sink, None, &request(2), &records(5)).unwrap();
        assert_eq!(added, 3);
        assert_eq!(sink.notes[0].0, 3);
        assert_eq!(sink.notes[0].4.question, "Q3?");
    }

    #[test]
    fn add_notes_accepts_all_previously_imported() {
        let mut sink = MemorySink::default();
        let added =
            add_notes::<_, MemoryMedia>(&mut sink, None, &request(2), &records(2)).unwrap();
        assert_eq!(added, 0);
    }

    #[test]
    fn add_notes_rejects_excess_previous_count() {
        let mut sink = MemorySink::default();
        let err =
            add_notes::<_, MemoryMedia>(&mut sink, None, &request(4), &records(3)).unwrap_err();
        assert!(matches!(
            err,
            ImportError::PreviousCountExceeds { declared: 4, parsed: 3 }
        ));
        assert!(sink.notes.is_empty());
    }

    #[test]
    fn add_notes_stops_on_sink_error() {
        let mut sink = MemorySink {
            fail_at: Some(2),
            ..Default::default()
        };
        let mut media = MemoryMedia::default();
        let err = add_notes(&mut sink, Some(&mut media), &request(0), &records(3)).unwrap_err();
        assert!(matches!(err, ImportError::Storage(_)));
        assert_eq!(sink.notes.len(), 1);
        assert!(media.files.is_empty());
    }

    #[test]
    fn add_notes_writes_full_question_set() {
        let mut sink = MemorySink::default();
        let mut media = MemoryMedia::default();
        media.files.insert("_Set.js".to_string(), b"old".to_vec());

        add_notes(&mut sink, Some(&mut media), &request(1), &records(2)).unwrap();

        assert_eq!(media.trashed, vec!["_Set.js"]);
        let script = String::from_utf8(media.files["_Set.js"].clone()).unwrap();
        assert!(script.contains("arq-1"));
        assert!(script.contains("arq-2"));
    }

    #[test]
    fn add_notes_checks_script_name_before_adding() {
        let mut sink = MemorySink::default();
        let mut media = MemoryMedia {
            refused: Some("_Set.js".to_string()),
            ..Default::default()
        };
        let err = add_notes(&mut sink, Some(&mut media), &request(0), &records(2)).unwrap_err();
        assert!(matches!(err, ImportError::Media(ref name) if name == "_Set.js"));
        assert!(sink.notes.is_empty());
        assert!(media.files.is_empty());
    }
}
