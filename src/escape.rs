//! Character-literal escape sequences.
//!
//! Literal text and formatter options may contain sequences such as `\n` or `\u00A9`.
//! They are stored as written and converted on demand, so deriving the converted
//! text twice always gives the same result.

use std::borrow::Cow;

/// The character introducing a character-literal escape sequence.
pub const CHAR_LITERAL_ESCAPE: char = '\\';

/// Characters that may be escaped inside formatter options in addition to the
/// regular character literals.
const OPTION_CHARS: &[char] = &['(', ')', '{', '}', ':', ',', '|'];

/// Returns the length in bytes of the escape sequence starting at `input[0]`,
/// which must be [`CHAR_LITERAL_ESCAPE`]. A trailing lone escape has length 1.
pub(crate) fn sequence_len(input: &str) -> usize {
    let mut chars = input.chars();
    chars.next();
    match chars.next() {
        Some('u') => {
            let hex = input[2..].chars().take(4).take_while(char::is_ascii_hexdigit);
            2 + hex.count()
        }
        Some(ch) => 1 + ch.len_utf8(),
        None => 1,
    }
}

fn convert(sequence: &str, include_option_chars: bool) -> Option<char> {
    let mut chars = sequence.chars().skip(1);
    let ch = chars.next()?;
    let converted = match ch {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        'a' => '\u{0007}',
        'b' => '\u{0008}',
        'f' => '\u{000C}',
        'v' => '\u{000B}',
        '\\' | '\'' | '"' | '{' | '}' => ch,
        'u' => {
            let hex = &sequence[2..];
            if hex.len() != 4 {
                return None;
            }
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }
        other if include_option_chars && OPTION_CHARS.contains(&other) => other,
        _ => return None,
    };
    Some(converted)
}

/// Converts every escape sequence in `input`.
///
/// Unknown or incomplete sequences are kept verbatim. When `include_option_chars`
/// is set, escaped option delimiters (`\(`, `\)`, `\|`, …) are unescaped as well.
///
/// # Examples
///
/// ```rust
/// use smart_format::escape::unescape_char_literals;
///
/// assert_eq!(unescape_char_literals(r"a\tb", false), "a\tb");
/// assert_eq!(unescape_char_literals(r"A\\", false), "A\\");
/// assert_eq!(unescape_char_literals(r"\(x\)", true), "(x)");
/// assert_eq!(unescape_char_literals(r"\(x\)", false), r"\(x\)");
/// ```
#[must_use]
pub fn unescape_char_literals(input: &str, include_option_chars: bool) -> Cow<'_, str> {
    if !input.contains(CHAR_LITERAL_ESCAPE) {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(index) = rest.find(CHAR_LITERAL_ESCAPE) {
        result.push_str(&rest[..index]);
        let len = sequence_len(&rest[index..]);
        let sequence = &rest[index..index + len];
        match convert(sequence, include_option_chars) {
            Some(ch) => result.push(ch),
            None => result.push_str(sequence),
        }
        rest = &rest[index + len..];
    }
    result.push_str(rest);
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_escape_borrows() {
        assert!(matches!(
            unescape_char_literals("plain text", false),
            Cow::Borrowed("plain text")
        ));
    }

    #[test]
    fn test_common_sequences() {
        assert_eq!(unescape_char_literals(r"\n\r\t\0", false), "\n\r\t\0");
        assert_eq!(unescape_char_literals(r#"\'\""#, false), "'\"");
        assert_eq!(unescape_char_literals(r"\{\}", false), "{}");
    }

    #[test]
    fn test_unicode_sequence() {
        assert_eq!(unescape_char_literals(r"\u00A9 2024", false), "\u{00A9} 2024");
        // Incomplete sequences stay as written
        assert_eq!(unescape_char_literals(r"\u00", false), r"\u00");
    }

    #[test]
    fn test_unknown_and_trailing() {
        assert_eq!(unescape_char_literals(r"\q", false), r"\q");
        assert_eq!(unescape_char_literals("end\\", false), "end\\");
    }

    #[test]
    fn test_idempotent_derivation() {
        let raw = r"1\|2\|3";
        let first = unescape_char_literals(raw, true).into_owned();
        let second = unescape_char_literals(raw, true).into_owned();
        assert_eq!(first, "1|2|3");
        assert_eq!(first, second);
    }

    #[test]
    fn test_sequence_len() {
        assert_eq!(sequence_len(r"\n"), 2);
        assert_eq!(sequence_len(r"\u0041rest"), 6);
        assert_eq!(sequence_len(r"\u00"), 4);
        assert_eq!(sequence_len("\\"), 1);
        assert_eq!(sequence_len("\\é"), 3);
    }
}
