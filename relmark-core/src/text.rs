//! Character-offset helpers.
//!
//! Annotation offsets count `char`s. These helpers translate them to byte
//! offsets so slices stay on UTF-8 boundaries.

use crate::model::TextRange;

/// Number of characters in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offsets for an ascending list of character positions.
///
/// Positions past the end of `text` map to `text.len()`.
pub(crate) fn byte_offsets(text: &str, char_positions: &[usize]) -> Vec<usize> {
    let mut bytes = text
        .char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(text.len()));
    let mut next_char = 0;
    let mut last = 0;

    char_positions
        .iter()
        .map(|&pos| {
            if pos >= next_char {
                last = bytes.nth(pos - next_char).unwrap_or(text.len());
                next_char = pos + 1;
            }
            last
        })
        .collect()
}

/// Slice of `text` covered by a character range, clamped to the text
pub fn char_slice<'a>(text: &'a str, range: &TextRange) -> &'a str {
    let offsets = byte_offsets(text, &[range.start_index, range.end_index.max(range.start_index)]);
    &text[offsets[0]..offsets[1]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_len_counts_scalars() {
        assert_eq!(char_len(""), 0);
        assert_eq!(char_len("héllo"), 5);
    }

    #[test]
    fn test_byte_offsets_multibyte() {
        // 'é' is two bytes, '→' is three
        let text = "aé→b";
        assert_eq!(byte_offsets(text, &[0, 1, 2, 3, 4]), vec![0, 1, 3, 6, 7]);
        assert_eq!(byte_offsets(text, &[2, 2, 9]), vec![3, 3, 7]);
    }

    #[test]
    fn test_char_slice() {
        let text = "naïve café";
        assert_eq!(char_slice(text, &TextRange::new(0, 5)), "naïve");
        assert_eq!(char_slice(text, &TextRange::new(6, 10)), "café");
        assert_eq!(char_slice(text, &TextRange::new(6, 50)), "café");
    }
}
