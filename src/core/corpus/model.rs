//! Corpus entities
//!
//! Ordinals (part number, chapter number, verse number) are the
//! external identity of every entity. The UUID ids are surrogate keys
//! derived from those ordinals, so seeding the same dataset twice
//! yields the same ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Parts in the reference corpus
pub const PART_COUNT: usize = 30;

/// Chapters in the reference corpus
pub const CHAPTER_COUNT: usize = 114;

/// Verses in the reference corpus
pub const VERSE_COUNT: usize = 6236;

/// Longest chapter (Al-Baqarah) has 286 verses
pub const MAX_VERSE_NUMBER: u16 = 286;

/// Pages in the Madani mushaf layout
pub const MAX_PAGE: u16 = 604;

/// Lines per mushaf page
pub const MAX_LINE: u16 = 15;

fn derive_id(kind: &str, ordinal: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("furqan:{kind}:{ordinal}").as_bytes())
}

/// A thirtieth division of the corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: Uuid,
    pub number: u16,
    pub number_worded_ar: Option<String>,
    pub number_worded_en: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Part {
    pub fn new(number: u16) -> Self {
        let now = Utc::now();
        Self {
            id: derive_id("part", &number.to_string()),
            number,
            number_worded_ar: None,
            number_worded_en: None,
            created: now,
            updated: now,
        }
    }

    /// Attach the worded ordinal labels
    pub fn with_labels(mut self, ar: Option<String>, en: Option<String>) -> Self {
        self.number_worded_ar = ar;
        self.number_worded_en = en;
        self
    }
}

/// A chapter (sura)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: Uuid,
    pub number: u16,
    pub name_en: String,
    /// Arabic name with diacritics
    pub name_ar: String,
    /// Arabic name restricted to the diacritic-free letter set
    pub clean_name_ar: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Chapter {
    pub fn new(
        number: u16,
        name_en: impl Into<String>,
        name_ar: impl Into<String>,
        clean_name_ar: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: derive_id("chapter", &number.to_string()),
            number,
            name_en: name_en.into(),
            name_ar: name_ar.into(),
            clean_name_ar: clean_name_ar.into(),
            created: now,
            updated: now,
        }
    }
}

/// Position of a verse within the corpus: (chapter, verse number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VerseKey {
    pub chapter: u16,
    pub number: u16,
}

impl VerseKey {
    pub fn new(chapter: u16, number: u16) -> Self {
        Self { chapter, number }
    }
}

impl std::fmt::Display for VerseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.chapter, self.number)
    }
}

/// A verse (aya) with its mushaf layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    pub id: Uuid,
    /// Chapter number
    pub chapter: u16,
    /// Part number
    pub part: u16,
    pub number: u16,
    pub text: String,
    pub clean_text: String,
    pub page: u16,
    pub line_start: u16,
    pub line_end: u16,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Verse {
    /// Create a verse placed on the first line of the first page
    pub fn new(
        key: VerseKey,
        part: u16,
        text: impl Into<String>,
        clean_text: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: derive_id("verse", &key.to_string()),
            chapter: key.chapter,
            part,
            number: key.number,
            text: text.into(),
            clean_text: clean_text.into(),
            page: 1,
            line_start: 1,
            line_end: 1,
            created: now,
            updated: now,
        }
    }

    /// Set the mushaf page and line span
    pub fn on_page(mut self, page: u16, line_start: u16, line_end: u16) -> Self {
        self.page = page;
        self.line_start = line_start;
        self.line_end = line_end;
        self
    }

    pub fn key(&self) -> VerseKey {
        VerseKey::new(self.chapter, self.number)
    }
}
