use std::collections::BTreeMap;

use crate::aggregate::UNSPECIFIED;
use crate::models::cover_letter::CoverLetter;

/// Trimmed language tag, or `Unspecified` when absent or blank.
pub fn normalize_language(language: Option<&str>) -> &str {
    match language.map(str::trim) {
        Some(tag) if !tag.is_empty() => tag,
        _ => UNSPECIFIED,
    }
}

/// Cover letters per normalized language tag.
pub fn language_tally(letters: &[CoverLetter]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for letter in letters {
        let label = normalize_language(letter.language.as_deref());
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }
    counts
}
