use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures::future::join_all;

use crate::{
    dictionary::{LookupError, LookupResult, WordLookup},
    error::MoveRejection,
    models::{Language, Move, Word},
};

/// Lookup results shared by every validation in one game session.
/// Keys are upper-cased word text.
#[derive(Default)]
pub struct SessionCache {
    legality: DashMap<String, bool>,
    definitions: DashMap<String, Option<String>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn legality(&self, word: &str) -> Option<bool> {
        self.legality.get(word).map(|entry| *entry)
    }

    pub fn definition(&self, word: &str) -> Option<Option<String>> {
        self.definitions.get(word).map(|entry| entry.clone())
    }

    fn record(&self, word: &str, result: &LookupResult) {
        self.legality.insert(word.to_string(), result.is_valid);
        if result.is_valid {
            self.definitions
                .insert(word.to_string(), result.definition.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.legality.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legality.is_empty()
    }
}

/// Letter strings that occur more than once in the same move
pub fn repeated_in_move(words: &[Word]) -> Vec<Word> {
    let mut seen = HashSet::new();
    let mut repeated = Vec::new();
    for word in words {
        if !seen.insert(word.letters.as_str()) {
            repeated.push(word.clone());
        }
    }
    repeated
}

/// Letter strings already formed by any earlier move of the game
pub fn repeated_in_history(words: &[Word], history: &[Move]) -> Vec<Word> {
    let played: HashSet<&str> = history
        .iter()
        .flat_map(|mv| mv.words.iter())
        .map(|word| word.letters.as_str())
        .collect();

    words
        .iter()
        .filter(|word| played.contains(word.letters.as_str()))
        .cloned()
        .collect()
}

/// Both duplicate checks, within the move first
pub fn check_duplicates(words: &[Word], history: &[Move]) -> Result<(), MoveRejection> {
    let repeated = repeated_in_move(words);
    if !repeated.is_empty() {
        return Err(MoveRejection::RepeatedWords(repeated));
    }

    let repeated = repeated_in_history(words, history);
    if !repeated.is_empty() {
        return Err(MoveRejection::RepeatedWords(repeated));
    }

    Ok(())
}

/// Checks words against the dictionary for one game session
#[derive(Clone)]
pub struct WordValidator {
    lookup: Arc<dyn WordLookup>,
    cache: Arc<SessionCache>,
    language: Language,
    timeout: Duration,
}

impl WordValidator {
    pub fn new(lookup: Arc<dyn WordLookup>, language: Language, timeout: Duration) -> Self {
        Self {
            lookup,
            cache: Arc::new(SessionCache::new()),
            language,
            timeout,
        }
    }

    pub fn cache(&self) -> &Arc<SessionCache> {
        &self.cache
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Check one word, going to the lookup only on a cache miss.
    /// Failed lookups are not cached so a later attempt can retry.
    pub async fn is_valid_word(&self, word: &str) -> Result<bool, LookupError> {
        let key = word.to_uppercase();
        if let Some(valid) = self.cache.legality(&key) {
            return Ok(valid);
        }

        let result = self.fetch(&key).await?;
        self.cache.record(&key, &result);
        Ok(result.is_valid)
    }

    async fn fetch(&self, key: &str) -> Result<LookupResult, LookupError> {
        match tokio::time::timeout(self.timeout, self.lookup.check_word(key, self.language)).await
        {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout(self.timeout)),
        }
    }

    /// Check every word concurrently and attach definitions.
    ///
    /// A word whose lookup fails counts as invalid: an unverified word must
    /// never score.
    pub async fn check_legality(&self, mut words: Vec<Word>) -> Result<Vec<Word>, MoveRejection> {
        let checks = words.iter().map(|word| self.is_valid_word(&word.letters));
        let outcomes = join_all(checks).await;

        let mut invalid = Vec::new();
        for (word, outcome) in words.iter_mut().zip(outcomes) {
            match outcome {
                Ok(true) => {
                    word.definition = self
                        .cache
                        .definition(&word.letters.to_uppercase())
                        .flatten();
                }
                Ok(false) => invalid.push(word.clone()),
                Err(e) => {
                    tracing::warn!("Lookup for '{}' failed: {}", word.letters, e);
                    invalid.push(word.clone());
                }
            }
        }

        if invalid.is_empty() {
            Ok(words)
        } else {
            Err(MoveRejection::InvalidWords(invalid))
        }
    }

    /// Definition for display, through the session's definition cache
    pub async fn definition_for(&self, word: &str) -> Option<String> {
        let key = word.to_uppercase();
        if let Some(definition) = self.cache.definition(&key) {
            return definition;
        }

        match self.fetch(&key).await {
            Ok(result) => {
                self.cache.record(&key, &result);
                result.definition
            }
            Err(e) => {
                tracing::debug!("No definition for '{}': {}", key, e);
                None
            }
        }
    }
}
