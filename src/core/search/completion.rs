//! Prefix completion
//!
//! Each completion field keeps its values in a sorted vector. A
//! lookup binary-searches to the first value not less than the
//! prefix and walks forward while values still start with it, so
//! options come out ordered by value and then by corpus position.

use serde::{Deserialize, Serialize};

use super::projector::VerseDocument;

/// Fields that support completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestField {
    /// Verse diacritic-free text
    CleanText,
    /// Chapter diacritic-free name
    Chapter,
}

impl SuggestField {
    pub const ALL: [SuggestField; 2] = [SuggestField::CleanText, SuggestField::Chapter];

    pub fn name(&self) -> &'static str {
        match self {
            SuggestField::CleanText => "clean_text",
            SuggestField::Chapter => "chapter",
        }
    }

    /// Field for a request name; `sora` is accepted for `chapter`
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "sora" {
            return Some(SuggestField::Chapter);
        }
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// One matching completion value
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    /// Index into the generation's document list
    pub doc: usize,
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    doc: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CompletionIndex {
    clean_text: Vec<Entry>,
    chapter: Vec<Entry>,
}

impl CompletionIndex {
    /// Build from documents given in corpus order
    pub fn build(documents: &[VerseDocument]) -> Self {
        let mut clean_text = Vec::with_capacity(documents.len());
        let mut chapter = Vec::with_capacity(documents.len());

        for (doc, verse) in documents.iter().enumerate() {
            clean_text.push(Entry {
                value: verse.clean_text.clone(),
                doc,
            });
            chapter.push(Entry {
                value: verse.chapter.clean_name_ar.clone(),
                doc,
            });
        }

        let order = |a: &Entry, b: &Entry| a.value.cmp(&b.value).then(a.doc.cmp(&b.doc));
        clean_text.sort_by(order);
        chapter.sort_by(order);

        Self {
            clean_text,
            chapter,
        }
    }

    fn entries(&self, field: SuggestField) -> &[Entry] {
        match field {
            SuggestField::CleanText => &self.clean_text,
            SuggestField::Chapter => &self.chapter,
        }
    }

    /// Distinct values starting with `prefix`, at most `cap` of them
    pub fn lookup(&self, field: SuggestField, prefix: &str, cap: usize) -> Vec<Completion> {
        let entries = self.entries(field);
        let start = entries.partition_point(|e| e.value.as_str() < prefix);

        let mut out: Vec<Completion> = Vec::new();
        for entry in entries[start..]
            .iter()
            .take_while(|e| e.value.starts_with(prefix))
        {
            if out.len() == cap {
                break;
            }
            if out.last().is_some_and(|last| last.text == entry.value) {
                continue;
            }
            out.push(Completion {
                text: entry.value.clone(),
                doc: entry.doc,
            });
        }
        out
    }

    pub fn len(&self, field: SuggestField) -> usize {
        self.entries(field).len()
    }
}
