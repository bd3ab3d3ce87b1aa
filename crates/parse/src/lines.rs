/// Split raw extracted text into trimmed, non-empty lines.
///
/// Original order is preserved; section tracking in the sectioned-ledger
/// parser depends on it. Blank lines are dropped.
pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}
