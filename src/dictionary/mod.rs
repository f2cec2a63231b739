use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use crate::models::Language;

/// Normalized answer from any legality source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub is_valid: bool,
    pub definition: Option<String>,
}

impl LookupResult {
    pub fn valid(definition: Option<String>) -> Self {
        Self {
            is_valid: true,
            definition,
        }
    }

    pub fn invalid() -> Self {
        Self {
            is_valid: false,
            definition: None,
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum LookupError {
    #[error("dictionary service unavailable: {0}")]
    Unavailable(String),

    #[error("dictionary response could not be read: {0}")]
    Malformed(String),

    #[error("no dictionary for language '{}'", .0.tag())]
    UnsupportedLanguage(Language),

    #[error("dictionary lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// Word legality source. Implementations turn whatever their backend
/// returns into a [`LookupResult`].
#[async_trait]
pub trait WordLookup: Send + Sync {
    async fn check_word(&self, text: &str, language: Language) -> Result<LookupResult, LookupError>;
}

/// Word list held in memory.
///
/// Lines are either `WORD` or `WORD<TAB>definition`.
pub struct Dictionary {
    language: Language,
    words: HashMap<String, Option<String>>,
}

impl Dictionary {
    /// Load dictionary from a file
    pub async fn load<P: AsRef<Path>>(path: P, language: Language) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("reading dictionary {}", path.display()))?;
        let dictionary = Self::parse(&content, language);

        tracing::info!(
            "Loaded {} {} words into dictionary",
            dictionary.len(),
            language.tag()
        );

        Ok(dictionary)
    }

    pub fn parse(content: &str, language: Language) -> Self {
        let words = content
            .lines()
            .filter_map(|line| {
                let (word, definition) = match line.split_once('\t') {
                    Some((word, definition)) => (word, Some(definition.trim())),
                    None => (line, None),
                };
                let word = word.trim().to_uppercase();
                if word.chars().count() < 2 {
                    return None;
                }
                let definition = definition.filter(|d| !d.is_empty()).map(str::to_string);
                Some((word, definition))
            })
            .collect();

        Self { language, words }
    }

    /// Build from a plain word list (for testing and embedding)
    pub fn from_words<I, S>(language: Language, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            language,
            words: words
                .into_iter()
                .map(|w| (w.as_ref().trim().to_uppercase(), None))
                .collect(),
        }
    }

    /// Create an empty dictionary (for testing)
    pub fn empty(language: Language) -> Self {
        Self {
            language,
            words: HashMap::new(),
        }
    }

    pub fn with_definition(mut self, word: &str, definition: &str) -> Self {
        self.words
            .insert(word.to_uppercase(), Some(definition.to_string()));
        self
    }

    /// Check if a word exists in the dictionary
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(&word.to_uppercase())
    }

    pub fn definition(&self, word: &str) -> Option<&str> {
        self.words
            .get(&word.to_uppercase())
            .and_then(|d| d.as_deref())
    }

    /// Get the number of words in the dictionary
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[async_trait]
impl WordLookup for Dictionary {
    async fn check_word(&self, text: &str, language: Language) -> Result<LookupResult, LookupError> {
        if language != self.language {
            return Err(LookupError::UnsupportedLanguage(language));
        }

        Ok(match self.words.get(&text.to_uppercase()) {
            Some(definition) => LookupResult::valid(definition.clone()),
            None => LookupResult::invalid(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dictionary() {
        let dict = Dictionary::empty(Language::En);
        assert!(dict.is_empty());
        assert!(!dict.contains("TEST"));
    }

    #[test]
    fn test_parse_with_definitions() {
        let dict = Dictionary::parse(
            "cat\tsmall domesticated feline\n  dog \nA\n\nzax\t\n",
            Language::En,
        );
        assert_eq!(dict.len(), 3);
        assert!(dict.contains("Cat"));
        assert!(dict.contains("DOG"));
        assert!(!dict.contains("A"));
        assert_eq!(dict.definition("cat"), Some("small domesticated feline"));
        assert_eq!(dict.definition("zax"), None);
    }

    #[tokio::test]
    async fn test_lookup_normalizes_case() {
        let dict = Dictionary::from_words(Language::En, ["cat"]).with_definition("cat", "feline");
        let result = dict.check_word("cAt", Language::En).await.unwrap();
        assert_eq!(result, LookupResult::valid(Some("feline".to_string())));

        let missing = dict.check_word("xyzzy", Language::En).await.unwrap();
        assert!(!missing.is_valid);
    }

    #[tokio::test]
    async fn test_wrong_language_is_an_error() {
        let dict = Dictionary::from_words(Language::De, ["KATZE"]);
        let err = dict.check_word("KATZE", Language::En).await.unwrap_err();
        assert!(matches!(err, LookupError::UnsupportedLanguage(Language::En)));
    }

    #[tokio::test]
    async fn test_load_missing_file_errors() {
        let result = Dictionary::load("/definitely/not/here.txt", Language::En).await;
        assert!(result.is_err());
    }
}
