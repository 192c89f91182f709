use std::borrow::Cow;

/// Entity-encodes angle brackets so embedded tags render as text.
///
/// Quotes and ampersands are left alone: outside a tag they cannot start
/// markup.
pub fn escape_markup(input: &str) -> Cow<'_, str> {
    if !input.contains(['<', '>']) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_tag_is_encoded() {
        assert_eq!(
            escape_markup(r#"Sally <script>alert("xss");</script>"#),
            r#"Sally &lt;script&gt;alert("xss");&lt;/script&gt;"#
        );
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        let out = escape_markup("Jon & Jane \"quoted\"");
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, "Jon & Jane \"quoted\"");
    }

    #[test]
    fn test_unicode_preserved() {
        assert_eq!(escape_markup("<ü>"), "&lt;ü&gt;");
    }
}
