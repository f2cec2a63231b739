use serde::{Deserialize, Serialize};

/// Glyph shown for a wildcard that has not been pinned to a letter yet
pub const WILDCARD_GLYPH: char = '*';

/// Languages with a letter table and a dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
    Ru,
}

impl Language {
    /// Parse a language tag such as `"en"` or `"de-AT"`.
    /// Unknown tags fall back to English rather than erroring.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "de" => Language::De,
            "ru" => Language::Ru,
            "en" => Language::En,
            other => {
                tracing::warn!("Unknown language tag '{}', falling back to English", other);
                Language::En
            }
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Ru => "ru",
        }
    }
}

/// An immutable letter tile as it comes out of the bag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LetterTile {
    /// Face letter. For a wildcard this is [`WILDCARD_GLYPH`] until it is pinned.
    pub letter: char,
    pub value: u8,
    /// Number of copies of this tile in a full bag
    pub weight: u8,
    pub is_wildcard: bool,
    pub language: Language,
}

impl LetterTile {
    pub fn new(letter: char, value: u8, weight: u8, language: Language) -> Self {
        Self {
            letter,
            value,
            weight,
            is_wildcard: false,
            language,
        }
    }

    pub fn wildcard(weight: u8, language: Language) -> Self {
        Self {
            letter: WILDCARD_GLYPH,
            value: 0,
            weight,
            is_wildcard: true,
            language,
        }
    }

    /// Pin a wildcard to the letter the player chose for it.
    /// Regular tiles are returned unchanged.
    pub fn pinned(self, letter: char) -> Self {
        if !self.is_wildcard {
            return self;
        }
        Self {
            letter: letter.to_uppercase().next().unwrap_or(letter),
            ..self
        }
    }

    /// Undo [`LetterTile::pinned`], used when a wildcard goes back to the rack
    pub fn unpinned(self) -> Self {
        if !self.is_wildcard {
            return self;
        }
        Self {
            letter: WILDCARD_GLYPH,
            ..self
        }
    }

    /// True for a wildcard still waiting for its letter
    pub fn needs_letter(&self) -> bool {
        self.is_wildcard && self.letter == WILDCARD_GLYPH
    }
}
