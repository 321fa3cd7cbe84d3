//! Dataset ingestion and snapshot persistence
//!
//! The seed dataset is a flat list of verse records that repeat their
//! chapter and part on every row. Parts and chapters are created the
//! first time they are seen and reused afterwards. Once ingested the
//! corpus is written to a versioned JSON snapshot; later starts load
//! the snapshot instead of the dataset.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::model::{Chapter, Part, Verse, VerseKey};
use super::store::{CorpusBatch, CorpusStore};
use crate::core::config::{Config, CorpusConfig};
use crate::core::error::{FurqanError, Result};

/// Snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// One row of the verse dataset
#[derive(Debug, Clone, Deserialize)]
pub struct VerseRecord {
    pub jozz: u16,
    pub sora: u16,
    pub sora_name_en: String,
    pub sora_name_ar: String,
    pub aya_no: u16,
    pub aya_text: String,
    pub aya_text_emlaey: String,
    pub page: u16,
    pub line_start: u16,
    pub line_end: u16,
}

/// Worded labels for a part number
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartLabel {
    #[serde(default)]
    pub ar: Option<String>,
    #[serde(default)]
    pub en: Option<String>,
}

/// Raw seed inputs
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub verses: Vec<VerseRecord>,
    /// Arabic chapter name (with diacritics) to its diacritic-free form
    pub chapter_names: HashMap<String, String>,
    /// Part labels keyed by the part number as a string
    pub part_labels: HashMap<String, PartLabel>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = fs::File::open(path).map_err(|e| {
        FurqanError::StorageError(format!("Failed to open {}: {e}", path.display()))
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        FurqanError::StorageError(format!("Failed to parse {}: {e}", path.display()))
    })
}

impl Dataset {
    /// Read the dataset files
    pub fn from_files(
        verses: &Path,
        chapter_names: &Path,
        part_labels: Option<&Path>,
    ) -> Result<Self> {
        let part_labels = match part_labels {
            Some(path) => read_json(path)?,
            None => HashMap::new(),
        };
        Ok(Self {
            verses: read_json(verses)?,
            chapter_names: read_json(chapter_names)?,
            part_labels,
        })
    }

    /// Read the dataset files named in the configuration
    pub fn from_config(corpus: &CorpusConfig) -> Result<Self> {
        let (Some(verses), Some(names)) = (&corpus.verses_file, &corpus.chapter_names_file)
        else {
            return Err(FurqanError::ConfigError(
                "corpus.verses_file and corpus.chapter_names_file must be set to seed the corpus"
                    .to_string(),
            ));
        };
        Self::from_files(verses, names, corpus.part_names_file.as_deref())
    }

    /// Turn the flat records into parts, chapters and verses
    pub fn into_batch(self) -> Result<CorpusBatch> {
        let mut parts: BTreeMap<u16, Part> = BTreeMap::new();
        let mut chapters: BTreeMap<u16, Chapter> = BTreeMap::new();
        let mut verses = Vec::with_capacity(self.verses.len());

        for record in self.verses {
            parts.entry(record.jozz).or_insert_with(|| {
                let label = self
                    .part_labels
                    .get(&record.jozz.to_string())
                    .cloned()
                    .unwrap_or_default();
                Part::new(record.jozz).with_labels(label.ar, label.en)
            });

            let name_en = record.sora_name_en.trim();
            let name_ar = record.sora_name_ar.trim();
            match chapters.get(&record.sora) {
                Some(chapter) if chapter.name_en != name_en || chapter.name_ar != name_ar => {
                    return Err(FurqanError::Integrity(format!(
                        "chapter {} is named both {:?} and {:?}",
                        record.sora, chapter.name_en, name_en
                    )));
                }
                Some(_) => {}
                None => {
                    let clean_name = self.chapter_names.get(name_ar).ok_or_else(|| {
                        FurqanError::validation(
                            "chapter",
                            "clean_name_ar",
                            format!("no diacritic-free name mapped for {name_ar:?}"),
                        )
                    })?;
                    chapters.insert(
                        record.sora,
                        Chapter::new(record.sora, name_en, name_ar, clean_name.trim()),
                    );
                }
            }

            verses.push(
                Verse::new(
                    VerseKey::new(record.sora, record.aya_no),
                    record.jozz,
                    record.aya_text.trim(),
                    record.aya_text_emlaey.trim(),
                )
                .on_page(record.page, record.line_start, record.line_end),
            );
        }

        Ok(CorpusBatch {
            parts: parts.into_values().collect(),
            chapters: chapters.into_values().collect(),
            verses,
        })
    }
}

/// Ingest a dataset into a fresh store
pub fn seed_store(dataset: Dataset, require_complete: bool) -> Result<CorpusStore> {
    let store = CorpusStore::from_batch(dataset.into_batch()?)?;
    if require_complete {
        store.ensure_reference_counts()?;
    }
    let census = store.census();
    info!(
        "Seeded corpus: {} parts, {} chapters, {} verses",
        census.parts, census.chapters, census.verses
    );
    Ok(store)
}

/// Persisted form of the corpus store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSnapshot {
    pub version: u32,
    pub written_at: DateTime<Utc>,
    pub parts: Vec<Part>,
    pub chapters: Vec<Chapter>,
    pub verses: Vec<Verse>,
}

impl CorpusSnapshot {
    pub fn from_store(store: &CorpusStore) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            written_at: Utc::now(),
            parts: store.parts().into_iter().cloned().collect(),
            chapters: store.chapters().into_iter().cloned().collect(),
            verses: store.verses().into_iter().cloned().collect(),
        }
    }

    /// Rebuild a store, re-running every integrity check
    pub fn into_store(self) -> Result<CorpusStore> {
        if self.version != SNAPSHOT_VERSION {
            return Err(FurqanError::StorageError(format!(
                "Snapshot version {} is not supported (expected {SNAPSHOT_VERSION}); re-run `furqan seed`",
                self.version
            )));
        }
        CorpusStore::from_batch(CorpusBatch {
            parts: self.parts,
            chapters: self.chapters,
            verses: self.verses,
        })
    }

    pub fn read(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// Write the snapshot via a temporary file and rename
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                FurqanError::StorageError(format!(
                    "Failed to create {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let tmp: PathBuf = path.with_extension("json.tmp");
        {
            let file = fs::File::create(&tmp).map_err(|e| {
                FurqanError::StorageError(format!("Failed to create {}: {e}", tmp.display()))
            })?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path).map_err(|e| {
            FurqanError::StorageError(format!(
                "Failed to move snapshot into {}: {e}",
                path.display()
            ))
        })?;

        info!("Wrote corpus snapshot to {:?}", path);
        Ok(())
    }
}

/// Load the corpus from its snapshot, seeding it from the configured
/// dataset when no snapshot exists yet
pub fn load_corpus(config: &Config) -> Result<CorpusStore> {
    let snapshot_path = config.storage.snapshot_path();
    if snapshot_path.exists() {
        let store = CorpusSnapshot::read(&snapshot_path)?.into_store()?;
        if config.corpus.require_complete {
            store.ensure_reference_counts()?;
        }
        info!("Loaded corpus snapshot from {:?}", snapshot_path);
        return Ok(store);
    }

    info!(
        "No corpus snapshot at {:?}; seeding from dataset",
        snapshot_path
    );
    let dataset = Dataset::from_config(&config.corpus)?;
    let store = seed_store(dataset, config.corpus.require_complete)?;
    CorpusSnapshot::from_store(&store).write(&snapshot_path)?;
    Ok(store)
}
