//! Placeholder markers shared by templates and answers.
//!
//! In a template a marker is a wildcard; in an answer it is a slot to fill.

/// One of the two placeholder kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `_`: exactly one word-like token / a random single insert.
    Word,
    /// `$`: zero or more words / a random group insert.
    Phrase,
}

impl Marker {
    pub const fn symbol(self) -> char {
        match self {
            Marker::Word => '_',
            Marker::Phrase => '$',
        }
    }

    /// Regex fragment replacing this marker in a template.
    ///
    /// `word_class` is the body of a character class such as `а-я0-9`. The phrase
    /// form additionally admits spaces.
    pub fn expression(self, word_class: &str) -> String {
        match self {
            Marker::Word => format!("[{}]*", word_class),
            Marker::Phrase => format!("[{} ]*", word_class),
        }
    }
}
