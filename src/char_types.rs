//! Per-character classification tables.
//!
//! ASCII classes are resolved through 128-entry const tables. Anything above
//! ASCII falls back to the `char` predicates, except the fullwidth punctuation
//! that the scanner maps onto ASCII tokens.

const fn build_table(extra: &[u8], alpha: bool, digits: bool) -> [bool; 128] {
    let mut table = [false; 128];
    let mut c = 0;
    while c < 128 {
        let b = c as u8;
        if alpha && (b.is_ascii_alphabetic() || b == b'_') {
            table[c] = true;
        }
        if digits && b.is_ascii_digit() {
            table[c] = true;
        }
        c += 1;
    }
    let mut i = 0;
    while i < extra.len() {
        table[extra[i] as usize] = true;
        i += 1;
    }
    table
}

static IDENT_START: [bool; 128] = build_table(b"$", true, false);
static IDENT_PART: [bool; 128] = build_table(b"$", true, true);
static WHITESPACE: [bool; 128] = build_table(b" \t\n\r\x0b\x0c", false, false);
static OPERATOR_START: [bool; 128] = build_table(b"+-*/&|^%=<>!~?", false, false);
static HEX_DIGIT: [bool; 128] = build_table(b"abcdefABCDEF", false, true);

pub const FULLWIDTH_COMMA: char = '\u{FF0C}';
pub const FULLWIDTH_LPAREN: char = '\u{FF08}';
pub const FULLWIDTH_RPAREN: char = '\u{FF09}';
const IDEOGRAPHIC_SPACE: char = '\u{3000}';

#[inline]
fn is_fullwidth_punct(ch: char) -> bool {
    matches!(ch, FULLWIDTH_COMMA | FULLWIDTH_LPAREN | FULLWIDTH_RPAREN)
}

#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    if ch.is_ascii() {
        IDENT_START[ch as usize]
    } else {
        !is_fullwidth_punct(ch) && ch.is_alphabetic()
    }
}

#[inline]
pub fn is_identifier_char(ch: char) -> bool {
    if ch.is_ascii() {
        IDENT_PART[ch as usize]
    } else {
        !is_fullwidth_punct(ch) && ch.is_alphanumeric()
    }
}

#[inline]
pub fn is_whitespace(ch: char) -> bool {
    if ch.is_ascii() {
        WHITESPACE[ch as usize]
    } else {
        ch == IDEOGRAPHIC_SPACE || ch == '\u{00A0}'
    }
}

#[inline]
pub fn is_operator_start(ch: char) -> bool {
    ch.is_ascii() && OPERATOR_START[ch as usize]
}

#[inline]
pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii() && HEX_DIGIT[ch as usize]
}
