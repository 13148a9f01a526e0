//! Duplicate detection for submitted clues.
//!
//! Clues are sorted by a base collation key so that clues differing only in
//! case or accents end up next to each other, then every clue that matches a
//! neighbour case-insensitively is flagged as a duplicate. The flags seed the
//! approver's default selection.

use std::cmp::Ordering;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::error::domain_error::DomainError;

#[derive(Clone, Debug, PartialEq)]
pub struct ReviewedClue {
    pub author: String,
    pub text: String,
    pub unique: bool,
}

/// Lower-cased text with accents stripped, used as the primary sort key.
pub fn base_key(text: &str) -> String {
    text.nfd()
        .filter(|char| !is_combining_mark(*char))
        .collect::<String>()
        .to_lowercase()
}

pub fn compare_clues(left: &str, right: &str) -> Ordering {
    base_key(left)
        .cmp(&base_key(right))
        .then_with(|| left.to_lowercase().cmp(&right.to_lowercase()))
}

/// `clues` are `(author, text)` pairs in submission order. The sort is stable,
/// so exact ties keep that order.
pub fn review_clues(clues: Vec<(String, String)>) -> Vec<ReviewedClue> {
    let mut clues = clues;
    clues.sort_by(|(_, left), (_, right)| compare_clues(left, right));

    let lowered: Vec<String> = clues.iter().map(|(_, text)| text.to_lowercase()).collect();
    clues
        .into_iter()
        .enumerate()
        .map(|(index, (author, text))| {
            let same_as_previous = index > 0 && lowered[index - 1] == lowered[index];
            let same_as_next = index + 1 < lowered.len() && lowered[index + 1] == lowered[index];
            ReviewedClue {
                author,
                text,
                unique: !same_as_previous && !same_as_next,
            }
        })
        .collect()
}

pub fn suggested_selection(review: &[ReviewedClue]) -> Vec<String> {
    review
        .iter()
        .filter(|clue| clue.unique)
        .map(|clue| clue.text.to_string())
        .collect()
}

/// Resolves the approver's selection against the submitted clues. Every
/// selected string is trimmed and matched case-insensitively against a clue not
/// matched yet, and replaced by the submitted text. The result is sorted for
/// display.
pub fn resolve_selection(
    review: &[ReviewedClue],
    selection: &[String],
) -> Result<Vec<String>, DomainError> {
    let mut taken = vec![false; review.len()];
    let mut approved = Vec::with_capacity(selection.len());

    for selected in selection {
        let selected = selected.trim().to_lowercase();
        let position = review
            .iter()
            .enumerate()
            .position(|(index, clue)| !taken[index] && clue.text.to_lowercase() == selected)
            .ok_or_else(|| DomainError::UnknownApprovedClue(selected.to_string()))?;
        taken[position] = true;
        approved.push(review[position].text.to_string());
    }

    sort_for_display(&mut approved);
    Ok(approved)
}

pub fn sort_for_display(clues: &mut [String]) {
    clues.sort_by(|left, right| compare_clues(left, right));
}
