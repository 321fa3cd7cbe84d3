//! In-memory corpus store
//!
//! Entities live in ordinal-keyed `BTreeMap`s so every listing comes
//! out in canonical order without sorting. Verse counts per chapter
//! and per part are maintained on every insert and delete; they back
//! both the chapter `verse_count` field and the deletion guards.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use uuid::Uuid;

use super::model::{Chapter, Part, Verse, VerseKey, CHAPTER_COUNT, PART_COUNT, VERSE_COUNT};
use super::validate::{validate_chapter, validate_part, validate_verse};
use crate::core::error::{FurqanError, Result};

/// Entity counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Census {
    pub parts: usize,
    pub chapters: usize,
    pub verses: usize,
}

impl Census {
    /// Counts of the complete reference corpus
    pub const REFERENCE: Census = Census {
        parts: PART_COUNT,
        chapters: CHAPTER_COUNT,
        verses: VERSE_COUNT,
    };
}

/// Entities ingested together
#[derive(Debug, Clone, Default)]
pub struct CorpusBatch {
    pub parts: Vec<Part>,
    pub chapters: Vec<Chapter>,
    pub verses: Vec<Verse>,
}

#[derive(Debug, Clone, Default)]
pub struct CorpusStore {
    parts: BTreeMap<u16, Part>,
    chapters: BTreeMap<u16, Chapter>,
    verses: BTreeMap<VerseKey, Verse>,
    verse_ids: HashMap<Uuid, VerseKey>,
    chapter_verse_counts: HashMap<u16, usize>,
    part_verse_counts: HashMap<u16, usize>,
}

impl CorpusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a batch, failing on the first invalid entity
    pub fn from_batch(batch: CorpusBatch) -> Result<Self> {
        let mut store = Self::new();
        store.ingest(batch)?;
        Ok(store)
    }

    /// Apply a batch all-or-nothing
    ///
    /// The batch is applied to a copy of the store, which replaces the
    /// current contents only if every entity was accepted.
    pub fn ingest(&mut self, batch: CorpusBatch) -> Result<()> {
        let mut staged = self.clone();
        for part in batch.parts {
            staged.insert_part(part)?;
        }
        for chapter in batch.chapters {
            staged.insert_chapter(chapter)?;
        }
        for verse in batch.verses {
            staged.insert_verse(verse)?;
        }
        *self = staged;
        Ok(())
    }

    pub fn insert_part(&mut self, part: Part) -> Result<()> {
        validate_part(&part)?;
        if self.parts.contains_key(&part.number) {
            return Err(FurqanError::Integrity(format!(
                "part {} already exists",
                part.number
            )));
        }
        self.parts.insert(part.number, part);
        Ok(())
    }

    pub fn insert_chapter(&mut self, chapter: Chapter) -> Result<()> {
        validate_chapter(&chapter)?;
        if self.chapters.contains_key(&chapter.number) {
            return Err(FurqanError::Integrity(format!(
                "chapter {} already exists",
                chapter.number
            )));
        }
        for existing in self.chapters.values() {
            let clash = if existing.name_en == chapter.name_en {
                Some("name_en")
            } else if existing.name_ar == chapter.name_ar {
                Some("name_ar")
            } else if existing.clean_name_ar == chapter.clean_name_ar {
                Some("clean_name_ar")
            } else {
                None
            };
            if let Some(field) = clash {
                return Err(FurqanError::Integrity(format!(
                    "chapter {} has the same {field} as chapter {}",
                    chapter.number, existing.number
                )));
            }
        }
        self.chapters.insert(chapter.number, chapter);
        Ok(())
    }

    pub fn insert_verse(&mut self, verse: Verse) -> Result<()> {
        validate_verse(&verse)?;
        let key = verse.key();
        if !self.chapters.contains_key(&verse.chapter) {
            return Err(FurqanError::Integrity(format!(
                "verse {key} references missing chapter {}",
                verse.chapter
            )));
        }
        if !self.parts.contains_key(&verse.part) {
            return Err(FurqanError::Integrity(format!(
                "verse {key} references missing part {}",
                verse.part
            )));
        }
        if self.verses.contains_key(&key) {
            return Err(FurqanError::Integrity(format!("verse {key} already exists")));
        }
        if let Some(other) = self.verse_ids.get(&verse.id) {
            return Err(FurqanError::Integrity(format!(
                "verse {key} reuses the id of verse {other}"
            )));
        }

        *self.chapter_verse_counts.entry(verse.chapter).or_default() += 1;
        *self.part_verse_counts.entry(verse.part).or_default() += 1;
        self.verse_ids.insert(verse.id, key);
        self.verses.insert(key, verse);
        Ok(())
    }

    /// Remove a part that no verse references
    pub fn delete_part(&mut self, number: u16) -> Result<Part> {
        if !self.parts.contains_key(&number) {
            return Err(FurqanError::NotFound(format!("part {number}")));
        }
        let references = self.part_verse_count(number);
        if references > 0 {
            return Err(FurqanError::ProtectedReference {
                entity: "part",
                number,
                references,
            });
        }
        self.part_verse_counts.remove(&number);
        self.parts
            .remove(&number)
            .ok_or_else(|| FurqanError::NotFound(format!("part {number}")))
    }

    /// Remove a chapter that no verse references
    pub fn delete_chapter(&mut self, number: u16) -> Result<Chapter> {
        if !self.chapters.contains_key(&number) {
            return Err(FurqanError::NotFound(format!("chapter {number}")));
        }
        let references = self.chapter_verse_count(number);
        if references > 0 {
            return Err(FurqanError::ProtectedReference {
                entity: "chapter",
                number,
                references,
            });
        }
        self.chapter_verse_counts.remove(&number);
        self.chapters
            .remove(&number)
            .ok_or_else(|| FurqanError::NotFound(format!("chapter {number}")))
    }

    pub fn delete_verse(&mut self, key: VerseKey) -> Result<Verse> {
        let verse = self
            .verses
            .remove(&key)
            .ok_or_else(|| FurqanError::NotFound(format!("verse {key}")))?;
        self.verse_ids.remove(&verse.id);
        decrement(&mut self.chapter_verse_counts, verse.chapter);
        decrement(&mut self.part_verse_counts, verse.part);
        Ok(verse)
    }

    pub fn part(&self, number: u16) -> Result<&Part> {
        self.parts
            .get(&number)
            .ok_or_else(|| FurqanError::NotFound(format!("part {number}")))
    }

    pub fn chapter(&self, number: u16) -> Result<&Chapter> {
        self.chapters
            .get(&number)
            .ok_or_else(|| FurqanError::NotFound(format!("chapter {number}")))
    }

    pub fn verse(&self, key: VerseKey) -> Result<&Verse> {
        self.verses
            .get(&key)
            .ok_or_else(|| FurqanError::NotFound(format!("verse {key}")))
    }

    pub fn verse_by_id(&self, id: &Uuid) -> Result<&Verse> {
        self.verse_ids
            .get(id)
            .and_then(|key| self.verses.get(key))
            .ok_or_else(|| FurqanError::NotFound(format!("verse {id}")))
    }

    /// Parts ordered by number
    pub fn parts(&self) -> Vec<&Part> {
        self.parts.values().collect()
    }

    /// Chapters ordered by number
    pub fn chapters(&self) -> Vec<&Chapter> {
        self.chapters.values().collect()
    }

    /// Verses ordered by (chapter, verse number)
    pub fn verses(&self) -> Vec<&Verse> {
        self.verses.values().collect()
    }

    /// Verses of one chapter ordered by verse number
    pub fn chapter_verses(&self, chapter: u16) -> Result<Vec<&Verse>> {
        self.chapter(chapter)?;
        Ok(self
            .verses
            .range(VerseKey::new(chapter, 0)..=VerseKey::new(chapter, u16::MAX))
            .map(|(_, verse)| verse)
            .collect())
    }

    pub fn chapter_verse_count(&self, chapter: u16) -> usize {
        self.chapter_verse_counts
            .get(&chapter)
            .copied()
            .unwrap_or(0)
    }

    pub fn part_verse_count(&self, part: u16) -> usize {
        self.part_verse_counts.get(&part).copied().unwrap_or(0)
    }

    pub fn census(&self) -> Census {
        Census {
            parts: self.parts.len(),
            chapters: self.chapters.len(),
            verses: self.verses.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty() && self.chapters.is_empty() && self.parts.is_empty()
    }

    /// Fail unless the store holds exactly the reference corpus counts
    pub fn ensure_reference_counts(&self) -> Result<()> {
        let census = self.census();
        if census != Census::REFERENCE {
            return Err(FurqanError::Integrity(format!(
                "expected {} parts, {} chapters, {} verses; found {}, {}, {}",
                PART_COUNT,
                CHAPTER_COUNT,
                VERSE_COUNT,
                census.parts,
                census.chapters,
                census.verses
            )));
        }
        Ok(())
    }
}

fn decrement(counts: &mut HashMap<u16, usize>, key: u16) {
    if let Some(count) = counts.get_mut(&key) {
        *count = count.saturating_sub(1);
        if *count == 0 {
            counts.remove(&key);
        }
    }
}
