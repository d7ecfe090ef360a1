//! Shared utility functions.

/// Longest prefix of `s` that fits in `max_bytes` without splitting a UTF-8
/// character.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Single-line preview for log fields
pub fn preview(s: &str, max_bytes: usize) -> String {
    let flat = s.replace(['\n', '\r'], " ");
    let cut = truncate_str(&flat, max_bytes);
    if cut.len() < flat.len() {
        format!("{}...", cut)
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_str("print('hi')", 5), "print");
        assert_eq!(truncate_str("hi", 10), "hi");
        assert_eq!(truncate_str("", 10), "");
    }

    #[test]
    fn truncate_backs_off_inside_multibyte_char() {
        // '📄' is 4 bytes
        let s = "a📄b";
        assert_eq!(truncate_str(s, 3), "a");
        assert_eq!(truncate_str(s, 5), "a📄");
    }

    #[test]
    fn preview_flattens_and_marks_cut() {
        assert_eq!(preview("line one\nline two", 100), "line one line two");
        assert_eq!(preview("abcdefgh", 3), "abc...");
    }
}
