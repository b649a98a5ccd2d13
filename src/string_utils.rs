use memchr::{memchr, memchr2};

/// Outcome of scanning a quoted literal ahead of decoding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QuotedSpan {
    /// Byte index of the closing quote.
    pub end: usize,
    /// Whether the body holds a doubled quote or a backslash escape.
    pub has_escape: bool,
}

/// Find the closing quote of a literal whose body starts at `start`.
///
/// A doubled quote is an escaped quote. With `backslash`, `\x` is skipped as
/// a unit. Returns `None` when the literal is unterminated.
pub(crate) fn scan_quoted(bytes: &[u8], start: usize, quote: u8, backslash: bool) -> Option<QuotedSpan> {
    let mut has_escape = false;
    let mut j = start;
    while j < bytes.len() {
        let offset = if backslash {
            memchr2(quote, b'\\', &bytes[j..])?
        } else {
            memchr(quote, &bytes[j..])?
        };
        let at = j + offset;
        if bytes[at] == b'\\' {
            has_escape = true;
            j = at + 2;
            continue;
        }
        if bytes.get(at + 1) == Some(&quote) {
            has_escape = true;
            j = at + 2;
            continue;
        }
        return Some(QuotedSpan { end: at, has_escape });
    }
    None
}

/// Decode the body of a single-quoted literal into `out`.
///
/// `\%` and `\_` keep their backslash when `like_escapes` is set so that LIKE
/// patterns survive decoding.
pub(crate) fn decode_string(body: &str, quote: char, backslash: bool, like_escapes: bool, out: &mut String) {
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == quote {
            // Doubled quote.
            if chars.peek() == Some(&quote) {
                chars.next();
            }
            out.push(quote);
            continue;
        }
        if c == '\\' && backslash {
            let Some(esc) = chars.next() else {
                out.push('\\');
                break;
            };
            match esc {
                '%' | '_' if like_escapes => {
                    out.push('\\');
                    out.push(esc);
                }
                other => out.push(unescape(other)),
            }
            continue;
        }
        out.push(c);
    }
}

/// Decode a double-quoted name, keeping its quotes. Doubled quotes and
/// escaped quotes are written back with a backslash, and `\\` stays doubled.
pub(crate) fn decode_alias(body: &str, quote: char, out: &mut String) {
    out.push(quote);
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == quote {
            if chars.peek() == Some(&quote) {
                chars.next();
            }
            out.push('\\');
            out.push(quote);
            continue;
        }
        if c == '\\' {
            match chars.next() {
                Some(q) if q == quote => {
                    out.push('\\');
                    out.push(q);
                }
                Some('\\') => out.push_str("\\\\"),
                Some(other) => out.push(unescape(other)),
                None => out.push('\\'),
            }
            continue;
        }
        out.push(c);
    }
    out.push(quote);
}

#[inline]
fn unescape(c: char) -> char {
    match c {
        '0' => '\0',
        'b' => '\u{8}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'Z' => '\u{1A}',
        other => other,
    }
}

/// Strip one layer of name quotes (`"x"`, `` `x` `` or `'x'`).
pub fn remove_name_quotes(name: &str) -> &str {
    let bytes = name.as_bytes();
    if bytes.len() < 2 {
        return name;
    }
    match (bytes[0], bytes[bytes.len() - 1]) {
        (b'"', b'"') | (b'`', b'`') | (b'\'', b'\'') => &name[1..name.len() - 1],
        _ => name,
    }
}
