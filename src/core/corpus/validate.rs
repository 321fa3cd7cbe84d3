//! Field-level validation for corpus entities
//!
//! Lengths are counted in characters, not bytes.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use super::model::{
    Chapter, Part, Verse, CHAPTER_COUNT, MAX_LINE, MAX_PAGE, MAX_VERSE_NUMBER, PART_COUNT,
};
use crate::core::error::{FurqanError, Result};

/// Diacritic-free Arabic letters allowed in clean text
pub const LETTERS: &str = "ءآأؤإئابةتثجحخدذرزسشصضطظعغفقكلمنهوىي";

static LETTER_SET: Lazy<HashSet<char>> = Lazy::new(|| LETTERS.chars().collect());

pub const MAX_CHAPTER_NAME_LEN: usize = 14;
pub const MAX_WORDED_AR_LEN: usize = 25;
pub const MAX_WORDED_EN_LEN: usize = 14;

/// True when every non-space character is in the diacritic-free letter set
pub fn is_clean_arabic(text: &str) -> bool {
    text.chars()
        .filter(|c| *c != ' ')
        .all(|c| LETTER_SET.contains(&c))
}

fn check_range(entity: &'static str, field: &'static str, value: u16, max: u16) -> Result<()> {
    if value == 0 || value > max {
        return Err(FurqanError::validation(
            entity,
            field,
            format!("{value} is outside 1..={max}"),
        ));
    }
    Ok(())
}

fn check_len(entity: &'static str, field: &'static str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(FurqanError::validation(
            entity,
            field,
            format!("{len} characters exceeds the limit of {max}"),
        ));
    }
    Ok(())
}

fn check_required(entity: &'static str, field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FurqanError::validation(entity, field, "must not be empty"));
    }
    Ok(())
}

fn check_clean(entity: &'static str, field: &'static str, value: &str) -> Result<()> {
    if let Some(bad) = value
        .chars()
        .find(|c| *c != ' ' && !LETTER_SET.contains(c))
    {
        return Err(FurqanError::validation(
            entity,
            field,
            format!("contains {bad:?} (U+{:04X}) outside the letter set", bad as u32),
        ));
    }
    Ok(())
}

pub fn validate_part(part: &Part) -> Result<()> {
    check_range("part", "number", part.number, PART_COUNT as u16)?;
    if let Some(ar) = &part.number_worded_ar {
        check_len("part", "number_worded_ar", ar, MAX_WORDED_AR_LEN)?;
    }
    if let Some(en) = &part.number_worded_en {
        check_len("part", "number_worded_en", en, MAX_WORDED_EN_LEN)?;
    }
    Ok(())
}

pub fn validate_chapter(chapter: &Chapter) -> Result<()> {
    check_range("chapter", "number", chapter.number, CHAPTER_COUNT as u16)?;
    for (field, value) in [
        ("name_en", &chapter.name_en),
        ("name_ar", &chapter.name_ar),
        ("clean_name_ar", &chapter.clean_name_ar),
    ] {
        check_required("chapter", field, value)?;
        check_len("chapter", field, value, MAX_CHAPTER_NAME_LEN)?;
    }
    check_clean("chapter", "clean_name_ar", &chapter.clean_name_ar)
}

pub fn validate_verse(verse: &Verse) -> Result<()> {
    check_range("verse", "chapter", verse.chapter, CHAPTER_COUNT as u16)?;
    check_range("verse", "part", verse.part, PART_COUNT as u16)?;
    check_range("verse", "number", verse.number, MAX_VERSE_NUMBER)?;
    check_range("verse", "page", verse.page, MAX_PAGE)?;
    check_range("verse", "line_start", verse.line_start, MAX_LINE)?;
    check_range("verse", "line_end", verse.line_end, MAX_LINE)?;
    check_required("verse", "text", &verse.text)?;
    check_required("verse", "clean_text", &verse.clean_text)?;
    check_clean("verse", "clean_text", &verse.clean_text)
}
