//! Scoring module - fixed line clear table
//!
//! Points depend only on how many rows a single lock clears. There is no
//! level multiplier, combo or drop bonus.

use crate::types::LINE_SCORES;

/// Points for clearing `lines` rows with one lock.
///
/// Counts outside `1..=4` are not scored.
pub fn line_clear_score(lines: usize) -> u32 {
    if lines == 0 || lines >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[lines]
}
