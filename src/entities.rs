//! Character reference decoding.
//!
//! Handles the five XML named references (`&lt;` `&gt;` `&amp;` `&quot;`
//! `&apos;`) plus decimal (`&#NNN;`) and hexadecimal (`&#xHHHH;`) numeric
//! references. Anything else is passed through verbatim.

use std::borrow::Cow;

use memchr::memchr;

/// Named references understood by [`unescape`].
pub const NAMED_ENTITIES: &[(&str, char)] = &[
    ("lt", '<'),
    ("gt", '>'),
    ("amp", '&'),
    ("quot", '"'),
    ("apos", '\''),
];

/// Decode character references in `input`.
///
/// Never fails: a reference that is unknown, unterminated or names an
/// invalid code point is kept as written. Returns the input unchanged
/// (borrowed) when nothing was decoded.
///
/// ```
/// use tagsoup::entities::unescape;
///
/// assert_eq!(unescape("Hi &amp; bye"), "Hi & bye");
/// assert_eq!(unescape("&#72;&#x69;"), "Hi");
/// assert_eq!(unescape("&nbsp;&amp"), "&nbsp;&amp");
/// ```
pub fn unescape(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let Some(mut pos) = memchr(b'&', bytes) else {
        return Cow::Borrowed(input);
    };

    let mut out = String::new();
    let mut copied = 0;

    loop {
        let mut resume = pos + 1;
        if let Some((ch, len)) = decode_reference(&input[pos + 1..]) {
            if out.is_empty() {
                out.reserve(input.len());
            }
            out.push_str(&input[copied..pos]);
            out.push(ch);
            copied = pos + 1 + len;
            resume = copied;
        }

        match memchr(b'&', &bytes[resume..]) {
            Some(offset) => pos = resume + offset,
            None => break,
        }
    }

    if copied == 0 {
        return Cow::Borrowed(input);
    }
    out.push_str(&input[copied..]);
    Cow::Owned(out)
}

/// Decode one reference body (the text after `&`).
///
/// Returns the character and the number of bytes consumed, including the
/// terminating `;`.
fn decode_reference(rest: &str) -> Option<(char, usize)> {
    let bytes = rest.as_bytes();
    let len = bytes
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_' || **b == b'#')
        .count();
    if bytes.get(len) != Some(&b';') {
        return None;
    }

    let body = &rest[..len];
    let ch = match body.strip_prefix('#') {
        Some(numeric) => match numeric.strip_prefix('x') {
            Some(hex) => code_point(hex, 16)?,
            None => code_point(numeric, 10)?,
        },
        None => NAMED_ENTITIES
            .iter()
            .find(|(name, _)| *name == body)
            .map(|(_, ch)| *ch)?,
    };
    Some((ch, len + 1))
}

fn code_point(digits: &str, radix: u32) -> Option<char> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_references_borrows() {
        assert!(matches!(unescape("plain text"), Cow::Borrowed(_)));
        assert!(matches!(unescape("a & b"), Cow::Borrowed(_)));
        assert!(matches!(unescape("&unknown;"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_named_references() {
        assert_eq!(
            unescape("&lt;p&gt; &quot;x&quot; &apos;y&apos; &amp;"),
            "<p> \"x\" 'y' &"
        );
    }

    #[test]
    fn test_named_references_are_case_sensitive() {
        assert_eq!(unescape("&AMP; &Lt;"), "&AMP; &Lt;");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(unescape("&#65;&#x42;&#x6a;"), "ABj");
        assert_eq!(unescape("&#x1F600;"), "\u{1F600}");
        assert_eq!(unescape("&#0065;"), "A");
    }

    #[test]
    fn test_bad_numeric_references_pass_through() {
        // Hex digits in a decimal reference.
        assert_eq!(unescape("&#1a;"), "&#1a;");
        // Non-hex after x.
        assert_eq!(unescape("&#xZZ;"), "&#xZZ;");
        // Empty digits.
        assert_eq!(unescape("&#;&#x;"), "&#;&#x;");
        // Surrogate and out of range.
        assert_eq!(unescape("&#xD800;"), "&#xD800;");
        assert_eq!(unescape("&#x110000;"), "&#x110000;");
        // Overflows u32.
        assert_eq!(unescape("&#99999999999;"), "&#99999999999;");
        // Uppercase X is not a hex marker.
        assert_eq!(unescape("&#X41;"), "&#X41;");
    }

    #[test]
    fn test_unterminated_reference() {
        assert_eq!(unescape("&amp"), "&amp");
        assert_eq!(unescape("&amp &lt;"), "&amp <");
    }

    #[test]
    fn test_adjacent_and_nested_ampersands() {
        assert_eq!(unescape("&&amp;&"), "&&&");
        assert_eq!(unescape("&amp;amp;"), "&amp;");
        assert_eq!(unescape("&a&lt;"), "&a<");
    }

    #[test]
    fn test_preserves_surrounding_unicode() {
        assert_eq!(unescape("café &amp; crème"), "café & crème");
    }
}
