//! Tantivy schema for verse documents
//!
//! Every free-text field comes in two forms: a tokenized one analysed
//! by the verse tokenizer (positions kept for phrase queries) and an
//! untokenized `_raw` twin for exact matching. The whole projected
//! document is stored as JSON in `source` and returned with hits.

use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, FAST, INDEXED, STORED,
    STRING,
};
use tantivy::TantivyDocument;

use super::projector::VerseDocument;
use super::tokenizer::VERSE_TOKENIZER;
use crate::core::error::Result;

/// Current schema version, reported by `/health` and `furqan info`
pub const SCHEMA_VERSION: u32 = 1;

/// Fast field holding `chapter * 1000 + verse`
pub const POSITION_FIELD: &str = "position";

/// Handles to every schema field
#[derive(Debug, Clone)]
pub struct IndexSchema {
    pub schema: Schema,
    pub id: Field,
    pub text: Field,
    pub text_raw: Field,
    pub clean_text: Field,
    pub clean_text_raw: Field,
    pub number: Field,
    pub position: Field,
    pub chapter_id: Field,
    pub chapter_name_en: Field,
    pub chapter_name_ar: Field,
    pub chapter_clean_name_ar: Field,
    pub chapter_clean_name_ar_raw: Field,
    pub chapter_number: Field,
    pub part_id: Field,
    pub part_number_worded_ar: Field,
    pub part_number_worded_en: Field,
    pub part_number: Field,
    pub source: Field,
}

fn analysed() -> TextOptions {
    TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(VERSE_TOKENIZER)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    )
}

impl IndexSchema {
    /// Create the verse schema
    ///
    /// Fields:
    /// - id, number, *_raw, chapter_id, part_id: exact terms (STRING)
    /// - text, clean_text, chapter names, part labels: verse analyzer
    /// - position, chapter_number, part_number: u64 (INDEXED | FAST)
    /// - source: projected document as JSON (STORED)
    pub fn build() -> Self {
        let mut builder = Schema::builder();

        let id = builder.add_text_field("id", STRING);
        let text = builder.add_text_field("text", analysed());
        let text_raw = builder.add_text_field("text_raw", STRING);
        let clean_text = builder.add_text_field("clean_text", analysed());
        let clean_text_raw = builder.add_text_field("clean_text_raw", STRING);
        let number = builder.add_text_field("number", STRING);
        let position = builder.add_u64_field(POSITION_FIELD, INDEXED | FAST);

        let chapter_id = builder.add_text_field("chapter_id", STRING);
        let chapter_name_en = builder.add_text_field("chapter_name_en", analysed());
        let chapter_name_ar = builder.add_text_field("chapter_name_ar", analysed());
        let chapter_clean_name_ar = builder.add_text_field("chapter_clean_name_ar", analysed());
        let chapter_clean_name_ar_raw =
            builder.add_text_field("chapter_clean_name_ar_raw", STRING);
        let chapter_number = builder.add_u64_field("chapter_number", INDEXED | FAST);

        let part_id = builder.add_text_field("part_id", STRING);
        let part_number_worded_ar = builder.add_text_field("part_number_worded_ar", analysed());
        let part_number_worded_en = builder.add_text_field("part_number_worded_en", analysed());
        let part_number = builder.add_u64_field("part_number", INDEXED | FAST);

        let source = builder.add_text_field("source", STORED);

        Self {
            schema: builder.build(),
            id,
            text,
            text_raw,
            clean_text,
            clean_text_raw,
            number,
            position,
            chapter_id,
            chapter_name_en,
            chapter_name_ar,
            chapter_clean_name_ar,
            chapter_clean_name_ar_raw,
            chapter_number,
            part_id,
            part_number_worded_ar,
            part_number_worded_en,
            part_number,
            source,
        }
    }

    /// Convert a projected verse into an index document
    pub fn document(&self, verse: &VerseDocument) -> Result<TantivyDocument> {
        let mut doc = TantivyDocument::default();

        doc.add_text(self.id, verse.id.to_string());
        doc.add_text(self.text, &verse.text);
        doc.add_text(self.text_raw, &verse.text);
        doc.add_text(self.clean_text, &verse.clean_text);
        doc.add_text(self.clean_text_raw, &verse.clean_text);
        doc.add_text(self.number, verse.number.to_string());
        doc.add_u64(self.position, verse.position());

        doc.add_text(self.chapter_id, verse.chapter.id.to_string());
        doc.add_text(self.chapter_name_en, &verse.chapter.name_en);
        doc.add_text(self.chapter_name_ar, &verse.chapter.name_ar);
        doc.add_text(self.chapter_clean_name_ar, &verse.chapter.clean_name_ar);
        doc.add_text(self.chapter_clean_name_ar_raw, &verse.chapter.clean_name_ar);
        doc.add_u64(self.chapter_number, u64::from(verse.chapter.number));

        doc.add_text(self.part_id, verse.part.id.to_string());
        if let Some(ar) = &verse.part.number_worded_ar {
            doc.add_text(self.part_number_worded_ar, ar);
        }
        if let Some(en) = &verse.part.number_worded_en {
            doc.add_text(self.part_number_worded_en, en);
        }
        doc.add_u64(self.part_number, u64::from(verse.part.number));

        doc.add_text(self.source, serde_json::to_string(verse)?);
        Ok(doc)
    }
}
