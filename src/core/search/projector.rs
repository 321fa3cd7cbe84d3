//! Text projector
//!
//! Flattens a verse and the chapter and part it belongs to into the
//! denormalised document the search index stores. Purely structural:
//! text is copied as-is and analysis happens in the index.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::corpus::{Chapter, CorpusStore, Part, Verse};
use crate::core::error::{FurqanError, Result};

/// Chapter fields embedded in every verse document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterSummary {
    pub id: Uuid,
    pub name_en: String,
    pub name_ar: String,
    pub clean_name_ar: String,
    pub number: u16,
}

/// Part fields embedded in every verse document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSummary {
    pub id: Uuid,
    pub number_worded_ar: Option<String>,
    pub number_worded_en: Option<String>,
    pub number: u16,
}

/// Searchable projection of one verse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseDocument {
    pub id: Uuid,
    pub text: String,
    pub clean_text: String,
    pub number: u16,
    pub chapter: ChapterSummary,
    pub part: PartSummary,
}

/// Multiplier separating chapters in [`VerseDocument::position`]
pub const POSITION_STRIDE: u64 = 1000;

impl VerseDocument {
    /// Canonical corpus position: `chapter * 1000 + verse`
    pub fn position(&self) -> u64 {
        u64::from(self.chapter.number) * POSITION_STRIDE + u64::from(self.number)
    }
}

/// Split a position back into (chapter, verse number)
pub fn split_position(position: u64) -> (u16, u16) {
    (
        (position / POSITION_STRIDE) as u16,
        (position % POSITION_STRIDE) as u16,
    )
}

/// Project a single verse
pub fn project(verse: &Verse, chapter: &Chapter, part: &Part) -> VerseDocument {
    VerseDocument {
        id: verse.id,
        text: verse.text.clone(),
        clean_text: verse.clean_text.clone(),
        number: verse.number,
        chapter: ChapterSummary {
            id: chapter.id,
            name_en: chapter.name_en.clone(),
            name_ar: chapter.name_ar.clone(),
            clean_name_ar: chapter.clean_name_ar.clone(),
            number: chapter.number,
        },
        part: PartSummary {
            id: part.id,
            number_worded_ar: part.number_worded_ar.clone(),
            number_worded_en: part.number_worded_en.clone(),
            number: part.number,
        },
    }
}

/// Project every verse of the store in corpus order
pub fn project_corpus(store: &CorpusStore) -> Result<Vec<VerseDocument>> {
    store
        .verses()
        .into_iter()
        .map(|verse| {
            let chapter = store.chapter(verse.chapter).map_err(|_| {
                FurqanError::Integrity(format!(
                    "verse {} references missing chapter {}",
                    verse.key(),
                    verse.chapter
                ))
            })?;
            let part = store.part(verse.part).map_err(|_| {
                FurqanError::Integrity(format!(
                    "verse {} references missing part {}",
                    verse.key(),
                    verse.part
                ))
            })?;
            Ok(project(verse, chapter, part))
        })
        .collect()
}
