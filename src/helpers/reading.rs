//! Reading time estimate

use crate::content::ContentSection;
use crate::richtext::as_text;

/// Words per minute used by the estimate
pub const WORDS_PER_MINUTE: usize = 200;

/// Words in a post body, counted by splitting each section's plain text on
/// single spaces.
///
/// This mirrors a naive `split(' ')`: an empty section counts as one word
/// and runs of spaces count as extra words.
pub fn word_count(sections: &[ContentSection]) -> usize {
    sections
        .iter()
        .map(|section| as_text(&section.body, " ").split(' ').count())
        .sum()
}

/// Estimated reading time in whole minutes, rounded up
pub fn reading_time(sections: &[ContentSection]) -> usize {
    word_count(sections).div_ceil(WORDS_PER_MINUTE)
}
