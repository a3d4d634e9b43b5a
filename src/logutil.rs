//! Keep user-entered text on one line when it ends up in a log record.

const MAX_PREVIEW: usize = 80;

/// Shorten `s` for a log line, escaping backslashes and control characters.
///
/// Game names and descriptions are free text, and inline images make some
/// fields very long.
pub fn preview(s: &str) -> String {
    let mut chars = s.chars();
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 4);
    for ch in chars.by_ref().take(MAX_PREVIEW) {
        if ch == '\\' || ch.is_control() {
            out.extend(ch.escape_default());
        } else {
            out.push(ch);
        }
    }
    if chars.next().is_some() {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{preview, MAX_PREVIEW};

    #[test]
    fn escapes_breaks() {
        assert_eq!(preview("Catan\nSeafarers\t2"), "Catan\\nSeafarers\\t2");
        assert_eq!(preview("bell\u{7}"), "bell\\u{7}");
        assert_eq!(preview(r"C:\games"), r"C:\\games");
    }

    #[test]
    fn truncates_long_values() {
        let long = "x".repeat(500);
        let out = preview(&long);
        assert_eq!(out.chars().count(), 81);
        assert!(out.ends_with('…'));
        assert_eq!(preview(&"y".repeat(MAX_PREVIEW)), "y".repeat(MAX_PREVIEW));
    }
}
