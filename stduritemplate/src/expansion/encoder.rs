//! Percent-encoding
//!
//! Characters outside the allowed set are encoded one UTF-8 byte at a time with
//! uppercase hex. When reserved passthrough is on, reserved characters and existing
//! `%XX` triplets are copied unchanged.

/// `ALPHA / DIGIT / "-" / "." / "_" / "~"`
pub fn is_unreserved(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '~')
}

/// gen-delims and sub-delims
pub fn is_reserved(ch: char) -> bool {
    matches!(
        ch,
        ':' | '/'
            | '?'
            | '#'
            | '['
            | ']'
            | '@'
            | '!'
            | '$'
            | '&'
            | '\''
            | '('
            | ')'
            | '*'
            | '+'
            | ','
            | ';'
            | '='
    )
}

/// True when `text` starts with `%` followed by two hex digits
pub fn starts_with_triplet(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 3
        && bytes[0] == b'%'
        && bytes[1].is_ascii_hexdigit()
        && bytes[2].is_ascii_hexdigit()
}

/// The first `max_chars` Unicode scalar values of `text`, or all of it
pub fn truncate(text: &str, max_chars: Option<usize>) -> &str {
    match max_chars.and_then(|max| text.char_indices().nth(max)) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Truncate then encode `text`, appending to `out`
pub fn encode_into(out: &mut String, text: &str, max_chars: Option<usize>, allow_reserved: bool) {
    let mut rest = truncate(text, max_chars);

    while let Some(ch) = rest.chars().next() {
        if allow_reserved && starts_with_triplet(rest) {
            out.push_str(&rest[..3]);
            rest = &rest[3..];
            continue;
        }

        if is_unreserved(ch) || (allow_reserved && is_reserved(ch)) {
            out.push(ch);
        } else {
            let mut buf = [0u8; 4];
            out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
        }
        rest = &rest[ch.len_utf8()..];
    }
}

pub fn encode(text: &str, max_chars: Option<usize>, allow_reserved: bool) -> String {
    let mut out = String::with_capacity(text.len());
    encode_into(&mut out, text, max_chars, allow_reserved);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreserved_passthrough() {
        assert_eq!(encode("AZaz09-._~", None, false), "AZaz09-._~");
    }

    #[test]
    fn test_reserved_characters() {
        assert_eq!(encode("Hello World!", None, false), "Hello%20World%21");
        assert_eq!(encode("Hello World!", None, true), "Hello%20World!");
        assert_eq!(encode("/foo/bar", None, false), "%2Ffoo%2Fbar");
        assert_eq!(encode("/foo/bar", None, true), "/foo/bar");
        assert_eq!(
            encode(":/?#[]@!$&'()*+,;=", None, false),
            "%3A%2F%3F%23%5B%5D%40%21%24%26%27%28%29%2A%2B%2C%3B%3D"
        );
    }

    #[test]
    fn test_non_reserved_ascii_always_encoded() {
        assert_eq!(encode("a<b>\"c\"", None, true), "a%3Cb%3E%22c%22");
        assert_eq!(encode("{x}", None, true), "%7Bx%7D");
    }

    #[test]
    fn test_utf8_bytes_uppercase_hex() {
        assert_eq!(encode("é", None, false), "%C3%A9");
        assert_eq!(encode("\u{1F600}", None, true), "%F0%9F%98%80");
    }

    #[test]
    fn test_percent_handling() {
        assert_eq!(encode("50%", None, false), "50%25");
        assert_eq!(encode("50%", None, true), "50%25");
        assert_eq!(encode("%41", None, false), "%2541");
        assert_eq!(encode("%41", None, true), "%41");
        assert_eq!(encode("%ee%2f", None, true), "%ee%2f");
        assert_eq!(encode("%4", None, true), "%254");
        assert_eq!(encode("%G1", None, true), "%25G1");
        assert_eq!(encode("%4 ", None, true), "%254%20");
    }

    #[test]
    fn test_triplet_is_passed_through_once() {
        assert_eq!(encode("%2541", None, true), "%2541");
        assert_eq!(encode("a%20b%20c", None, true), "a%20b%20c");
    }

    #[test]
    fn test_truncation_counts_chars() {
        assert_eq!(truncate("Hello World!", Some(3)), "Hel");
        assert_eq!(truncate("héllo", Some(2)), "hé");
        assert_eq!(truncate("abc", Some(10)), "abc");
        assert_eq!(truncate("abc", Some(0)), "");
        assert_eq!(truncate("abc", None), "abc");
        assert_eq!(encode("ééé", Some(2), false), "%C3%A9%C3%A9");
    }

    #[test]
    fn test_truncation_before_triplet_detection() {
        assert_eq!(encode("%41", Some(2), true), "%254");
    }
}
