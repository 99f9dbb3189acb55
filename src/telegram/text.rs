//! Message text helpers

/// Split text into consecutive pieces of at most `limit` characters.
///
/// Pieces are cut on character boundaries only, so concatenating the result
/// gives back `text` exactly. Empty input yields no pieces.
pub fn split_message(text: &str, limit: usize) -> Vec<&str> {
    let limit = limit.max(1);
    let mut chunks = Vec::with_capacity(text.len() / limit + 1);
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == limit {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_single_chunk() {
        assert_eq!(split_message("hello", 4096), vec!["hello"]);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(split_message("", 10).is_empty());
    }

    #[test]
    fn test_exact_multiple_of_limit() {
        assert_eq!(split_message("abcdef", 3), vec!["abc", "def"]);
    }

    #[test]
    fn test_long_text_reassembles() {
        let text = "x".repeat(4096 * 2 + 17);
        let chunks = split_message(&text, 4096);

        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 4096));
        assert_eq!(chunks[2].len(), 17);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_multibyte_characters_are_not_split() {
        let text = "🏃é漢".repeat(5);
        let chunks = split_message(&text, 4);

        assert!(chunks.iter().all(|c| c.chars().count() <= 4));
        assert_eq!(chunks.concat(), text);
        assert_eq!(chunks[0], "🏃é漢🏃");
    }
}
