//! Derived preview text.

/// Maximum preview length, in characters.
pub const PREVIEW_MAX_CHARS: usize = 300;

/// First [`PREVIEW_MAX_CHARS`] characters of `content` (fewer if `content`
/// is shorter, empty if empty).  Pure; counts characters, not bytes, so a
/// multi-byte boundary can never be split.
pub fn derive_preview(content: &str) -> String {
    content.chars().take(PREVIEW_MAX_CHARS).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn short_content_is_returned_whole() {
        assert_eq!(derive_preview("a few words"), "a few words");
    }

    #[test]
    fn empty_content_gives_empty_preview() {
        assert_eq!(derive_preview(""), "");
    }

    #[test]
    fn long_content_is_capped_at_300_chars() {
        let content = "A".repeat(500);
        let preview = derive_preview(&content);
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS);
        assert!(content.starts_with(&preview));
    }

    #[test]
    fn preview_is_always_a_prefix() {
        for len in [0usize, 1, 299, 300, 301, 1000] {
            let content: String = "xyz".chars().cycle().take(len).collect();
            let preview = derive_preview(&content);
            assert_eq!(preview.chars().count(), len.min(PREVIEW_MAX_CHARS));
            assert!(content.starts_with(&preview));
        }
    }

    #[test]
    fn multibyte_content_is_not_split() {
        let content = "é".repeat(400);
        let preview = derive_preview(&content);
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS);
        assert!(content.starts_with(&preview));
    }
}
