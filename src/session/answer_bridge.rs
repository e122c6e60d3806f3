use crate::puzzle::Pos;
use crate::session::navigator::Navigator;

/// Letters of an answer as they map onto grid cells: hyphens, spaces and
/// other punctuation from multi-word enumerations are dropped.
pub fn answer_letters(answer: &str) -> Vec<char> {
    answer
        .chars()
        .filter(|ch| ch.is_ascii_alphabetic())
        .map(|ch| ch.to_ascii_uppercase())
        .collect()
}

/// Write `answer` into `cells` position by position. Stops at whichever
/// runs out first, so a short answer under-fills and a long one is cut.
/// Returns the cells whose contents changed.
pub fn apply(nav: &mut Navigator, cells: &[Pos], answer: &str) -> Vec<Pos> {
    let letters = answer_letters(answer);
    let mut mutated = Vec::new();
    for (&pos, &ch) in cells.iter().zip(letters.iter()) {
        if nav.set_cell(pos, ch) {
            mutated.push(pos);
        }
    }
    if letters.len() != cells.len() {
        log::debug!(
            "answer has {} letters for a {}-cell word",
            letters.len(),
            cells.len()
        );
    }
    mutated
}
