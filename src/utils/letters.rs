use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::{Language, LetterTile};

/// (letter, point value, copies in a full bag)
type LetterRow = (char, u8, u8);

/// Standard English crossword-game distribution, 100 tiles with two wildcards
const ENGLISH: &[LetterRow] = &[
    ('A', 1, 9),
    ('B', 3, 2),
    ('C', 3, 2),
    ('D', 2, 4),
    ('E', 1, 12),
    ('F', 4, 2),
    ('G', 2, 3),
    ('H', 4, 2),
    ('I', 1, 9),
    ('J', 8, 1),
    ('K', 5, 1),
    ('L', 1, 4),
    ('M', 3, 2),
    ('N', 1, 6),
    ('O', 1, 8),
    ('P', 3, 2),
    ('Q', 10, 1),
    ('R', 1, 6),
    ('S', 1, 4),
    ('T', 1, 6),
    ('U', 1, 4),
    ('V', 4, 2),
    ('W', 4, 2),
    ('X', 8, 1),
    ('Y', 4, 2),
    ('Z', 10, 1),
];

const GERMAN: &[LetterRow] = &[
    ('A', 1, 5),
    ('B', 3, 2),
    ('C', 4, 2),
    ('D', 1, 4),
    ('E', 1, 15),
    ('F', 4, 2),
    ('G', 2, 3),
    ('H', 2, 4),
    ('I', 1, 6),
    ('J', 6, 1),
    ('K', 4, 2),
    ('L', 2, 3),
    ('M', 3, 4),
    ('N', 1, 9),
    ('O', 2, 3),
    ('P', 4, 1),
    ('Q', 10, 1),
    ('R', 1, 6),
    ('S', 1, 7),
    ('T', 1, 6),
    ('U', 1, 6),
    ('V', 6, 1),
    ('W', 3, 1),
    ('X', 8, 1),
    ('Y', 10, 1),
    ('Z', 3, 1),
    ('Ä', 6, 1),
    ('Ö', 8, 1),
    ('Ü', 6, 1),
];

const RUSSIAN: &[LetterRow] = &[
    ('А', 1, 8),
    ('Б', 3, 2),
    ('В', 1, 4),
    ('Г', 3, 2),
    ('Д', 2, 4),
    ('Е', 1, 8),
    ('Ж', 5, 1),
    ('З', 5, 2),
    ('И', 1, 5),
    ('Й', 4, 1),
    ('К', 2, 4),
    ('Л', 2, 4),
    ('М', 2, 3),
    ('Н', 1, 5),
    ('О', 1, 10),
    ('П', 2, 4),
    ('Р', 1, 5),
    ('С', 1, 5),
    ('Т', 1, 5),
    ('У', 2, 4),
    ('Ф', 10, 1),
    ('Х', 5, 1),
    ('Ц', 5, 1),
    ('Ч', 5, 1),
    ('Ш', 8, 1),
    ('Щ', 10, 1),
    ('Ъ', 10, 1),
    ('Ы', 4, 2),
    ('Ь', 3, 2),
    ('Э', 8, 1),
    ('Ю', 8, 1),
    ('Я', 3, 2),
];

fn rows(language: Language) -> (&'static [LetterRow], u8) {
    match language {
        Language::En => (ENGLISH, 2),
        Language::De => (GERMAN, 2),
        Language::Ru => (RUSSIAN, 3),
    }
}

/// One distinct tile per letter plus the wildcard, per language
pub static TILE_TABLES: Lazy<HashMap<Language, Vec<LetterTile>>> = Lazy::new(|| {
    [Language::En, Language::De, Language::Ru]
        .into_iter()
        .map(|language| {
            let (letters, wildcards) = rows(language);
            let mut tiles: Vec<LetterTile> = letters
                .iter()
                .map(|&(letter, value, weight)| LetterTile::new(letter, value, weight, language))
                .collect();
            tiles.push(LetterTile::wildcard(wildcards, language));
            (language, tiles)
        })
        .collect()
});

/// Distinct tiles for a language, English if the table is missing
pub fn tile_table(language: Language) -> &'static [LetterTile] {
    TILE_TABLES
        .get(&language)
        .or_else(|| TILE_TABLES.get(&Language::En))
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Look up the tile for a letter, used by tests and fixtures to build boards
pub fn tile_for(language: Language, letter: char) -> Option<LetterTile> {
    let upper = letter.to_uppercase().next().unwrap_or(letter);
    tile_table(language)
        .iter()
        .find(|tile| !tile.is_wildcard && tile.letter == upper)
        .copied()
}
