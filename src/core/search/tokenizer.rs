//! Verse text analysis
//!
//! Arabic diacritics are Unicode combining marks. A plain
//! alphanumeric splitter would cut `ٱلرَّحِيمِ` at every haraka, so
//! the verse tokenizer treats combining marks as word characters and
//! keeps each vocalised word whole.

use std::str::CharIndices;

use tantivy::tokenizer::{
    LowerCaser, RemoveLongFilter, TextAnalyzer, Token, TokenStream, Tokenizer,
};
use tantivy::Index;
use unicode_normalization::char::is_combining_mark;

/// Name the verse analyzer is registered under
pub const VERSE_TOKENIZER: &str = "verse";

/// Tokens longer than this many bytes are dropped
const MAX_TOKEN_BYTES: usize = 80;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || is_combining_mark(c)
}

/// Splits on anything that is neither alphanumeric nor a combining mark
#[derive(Clone, Default)]
pub struct VerseTokenizer {
    token: Token,
}

pub struct VerseTokenStream<'a> {
    text: &'a str,
    chars: CharIndices<'a>,
    token: &'a mut Token,
}

impl Tokenizer for VerseTokenizer {
    type TokenStream<'a> = VerseTokenStream<'a>;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> VerseTokenStream<'a> {
        self.token.reset();
        VerseTokenStream {
            text,
            chars: text.char_indices(),
            token: &mut self.token,
        }
    }
}

impl<'a> VerseTokenStream<'a> {
    fn search_token_end(&mut self) -> usize {
        (&mut self.chars)
            .find(|(_, c)| !is_word_char(*c))
            .map(|(offset, _)| offset)
            .unwrap_or(self.text.len())
    }
}

impl<'a> TokenStream for VerseTokenStream<'a> {
    fn advance(&mut self) -> bool {
        self.token.text.clear();
        self.token.position = self.token.position.wrapping_add(1);
        while let Some((offset_from, c)) = self.chars.next() {
            if is_word_char(c) {
                let offset_to = self.search_token_end();
                self.token.offset_from = offset_from;
                self.token.offset_to = offset_to;
                self.token.text.push_str(&self.text[offset_from..offset_to]);
                return true;
            }
        }
        false
    }

    fn token(&self) -> &Token {
        self.token
    }

    fn token_mut(&mut self) -> &mut Token {
        self.token
    }
}

/// Analyzer used for the tokenized text fields
pub fn verse_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(VerseTokenizer::default())
        .filter(RemoveLongFilter::limit(MAX_TOKEN_BYTES))
        .filter(LowerCaser)
        .build()
}

/// Register the verse analyzer on an index
pub fn register(index: &Index) {
    index.tokenizers().register(VERSE_TOKENIZER, verse_analyzer());
}

/// Run text through an analyzer and collect the token texts
pub fn analyze(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
    let mut stream = analyzer.token_stream(text);
    let mut tokens = Vec::new();
    while stream.advance() {
        tokens.push(stream.token().text.clone());
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        analyze(&mut verse_analyzer(), text)
    }

    #[test]
    fn test_clean_text_splits_on_spaces() {
        assert_eq!(
            tokens("بسم الله الرحمن الرحيم"),
            vec!["بسم", "الله", "الرحمن", "الرحيم"]
        );
    }

    #[test]
    fn test_diacritics_stay_inside_words() {
        let words = tokens("بِسۡمِ ٱللَّهِ ٱلرَّحۡمَٰنِ ٱلرَّحِيمِ");
        assert_eq!(words.len(), 4);
        assert_eq!(words[1], "ٱللَّهِ");
    }

    #[test]
    fn test_punctuation_and_latin() {
        assert_eq!(tokens("Al-Fātiḥah, the Opening"), vec!["al", "fātiḥah", "the", "opening"]);
    }

    #[test]
    fn test_positions_are_sequential() {
        let mut analyzer = verse_analyzer();
        let mut stream = analyzer.token_stream("الحمد لله رب العالمين");
        let mut positions = Vec::new();
        while stream.advance() {
            positions.push(stream.token().position);
        }
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_empty_text() {
        assert!(tokens("  ،  ").is_empty());
    }
}
