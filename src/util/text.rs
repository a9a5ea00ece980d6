use std::borrow::Cow;

/// Strips HTML markup from a fragment, keeping only its text content.
///
/// Removes start tags, end tags, comments (`<!-- ... -->`), doctype
/// declarations and processing instructions. Quoted attribute values may
/// contain `>` without ending the tag. A `<` that is not followed by a letter,
/// `/`, `!` or `?` is ordinary text and is kept (e.g. `a < b`).
///
/// Character references are NOT decoded: `&nbsp;` and `&amp;` pass through
/// unchanged. An unterminated tag swallows the rest of the input.
///
/// Returns `Cow::Borrowed` when the input contains no markup (common case for
/// plain-text descriptions).
///
/// # Examples
///
/// ```
/// use gnews::util::strip_tags;
///
/// assert_eq!(strip_tags("<p>Hello <b>World</b></p>"), "Hello World");
/// assert_eq!(strip_tags("1 < 2"), "1 < 2");
/// assert_eq!(strip_tags("<p>a&nbsp;b</p>"), "a&nbsp;b");
/// ```
pub fn strip_tags(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let len = bytes.len();

    // Fast path: nothing that could open a tag
    if !bytes.windows(2).any(|w| opens_markup(w[0], w[1])) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        if i + 1 < len && opens_markup(bytes[i], bytes[i + 1]) {
            i = skip_markup(bytes, i);
        } else {
            // Copy the run of text up to the next tag opener
            let start = i;
            i += 1;
            while i < len && !(i + 1 < len && opens_markup(bytes[i], bytes[i + 1])) {
                i += 1;
            }
            // Runs only ever end on an ASCII `<` or at the end of input, so
            // s[start..i] sits on char boundaries.
            out.push_str(&s[start..i]);
        }
    }

    Cow::Owned(out)
}

fn opens_markup(b: u8, next: u8) -> bool {
    b == b'<' && (next.is_ascii_alphabetic() || matches!(next, b'/' | b'!' | b'?'))
}

/// Returns the index just past the markup construct starting at `start`.
fn skip_markup(bytes: &[u8], start: usize) -> usize {
    if bytes[start..].starts_with(b"<!--") {
        return bytes[start + 4..]
            .windows(3)
            .position(|w| w == b"-->")
            .map_or(bytes.len(), |pos| start + 4 + pos + 3);
    }

    let mut quote: Option<u8> = None;
    let mut i = start + 1;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return i + 1,
            None => {}
        }
        i += 1;
    }

    bytes.len()
}
