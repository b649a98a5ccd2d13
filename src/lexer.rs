use std::num::IntErrorKind;
use std::sync::Arc;

use compact_str::CompactString;
use memchr::{memchr, memchr2, memchr_iter, memmem, memrchr};
use tracing::debug;

use crate::char_types::{
    is_hex_digit, is_identifier_char, is_identifier_start, is_operator_start, is_whitespace,
    FULLWIDTH_COMMA, FULLWIDTH_LPAREN, FULLWIDTH_RPAREN,
};
use crate::comment::{is_safe_comment, CommentHandler, Comments};
use crate::dialect::Dialect;
use crate::error::{ErrorContext, Result, ScanError};
use crate::fnv::{fnv1a_64, fnv1a_64_lower, fold, mix, OFFSET_BASIS};
use crate::keywords::KeywordTable;
use crate::mode::Mode;
use crate::string_utils::{decode_alias, decode_string, scan_quoted};
use crate::symbol_table::SymbolTable;
use crate::token::Token;

/// Lookahead value once the cursor has run past the input.
pub const EOI: char = '\u{1A}';

/// Decoded value of the current token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Lexeme<'a> {
    /// No decoded value; the text is sliced from the source on demand.
    #[default]
    None,
    /// A zero-copy view of the source.
    Borrowed(&'a str),
    /// An interned symbol or an escape-decoded literal.
    Shared(Arc<str>),
}

impl Lexeme<'_> {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Lexeme::None => None,
            Lexeme::Borrowed(s) => Some(*s),
            Lexeme::Shared(s) => Some(s.as_ref()),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Lexeme::None)
    }
}

/// Value of an integer literal in the narrowest type that holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Integer {
    Int(i32),
    Long(i64),
    Big(i128),
    /// Wider than `i128`: the literal's digits in `radix`, without leading zeros.
    Huge { digits: CompactString, radix: u32 },
}

impl Integer {
    fn narrow(value: i128) -> Self {
        if let Ok(v) = i32::try_from(value) {
            Integer::Int(v)
        } else if let Ok(v) = i64::try_from(value) {
            Integer::Long(v)
        } else {
            Integer::Big(value)
        }
    }

    /// `None` when `digits` is empty or not in `radix`.
    fn parse(digits: &str, radix: u32) -> Option<Self> {
        match i128::from_str_radix(digits, radix) {
            Ok(value) => Some(Integer::narrow(value)),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(Integer::Huge {
                digits: CompactString::from(digits.trim_start_matches('0')),
                radix,
            }),
            Err(_) => None,
        }
    }

    /// The value as `i128`, or `None` for [`Integer::Huge`].
    pub fn to_i128(&self) -> Option<i128> {
        match *self {
            Integer::Int(v) => Some(v.into()),
            Integer::Long(v) => Some(v.into()),
            Integer::Big(v) => Some(v),
            Integer::Huge { .. } => None,
        }
    }
}

/// Pull-based SQL scanner over a borrowed source string.
///
/// Call [`Lexer::next_token`] to advance, then read the current token through
/// the accessors. The lexer never resynchronises after a fault.
pub struct Lexer<'a> {
    pub(crate) text: &'a str,
    pub(crate) dialect: Dialect,
    keywords: &'static KeywordTable,
    symbols: &'a SymbolTable,
    quote_symbols: &'a SymbolTable,

    /// Byte offset of `ch`.
    pub(crate) pos: usize,
    pub(crate) ch: char,
    /// Start of the current token's text span.
    pub(crate) mark: usize,
    pub(crate) start_pos: usize,
    /// Length of the current token's value.
    pub(crate) buf_pos: usize,
    scratch: String,

    pub(crate) token: Token,
    pub(crate) lexeme: Lexeme<'a>,
    pub(crate) hash: u64,
    pub(crate) hash_lower: u64,
    pub(crate) line: usize,
    /// Line on which the last produced token ended.
    pub(crate) token_line: Option<usize>,

    keep_comments: bool,
    skip_comments: bool,
    allow_comments: bool,
    safe_comments_only: bool,
    comment_handler: Option<Box<dyn CommentHandler + 'a>>,
    comments: Comments,
    comment_count: usize,
    var_index: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str, dialect: Dialect) -> Self {
        let mut lexer = Self {
            text,
            dialect,
            keywords: dialect.keywords(),
            symbols: SymbolTable::global(),
            quote_symbols: SymbolTable::quote(),
            pos: 0,
            ch: EOI,
            mark: 0,
            start_pos: 0,
            buf_pos: 0,
            scratch: String::new(),
            token: Token::Eof,
            lexeme: Lexeme::None,
            hash: 0,
            hash_lower: 0,
            line: 1,
            token_line: None,
            keep_comments: false,
            skip_comments: true,
            allow_comments: true,
            safe_comments_only: false,
            comment_handler: None,
            comments: Comments::default(),
            comment_count: 0,
            var_index: 0,
        };
        lexer.ch = lexer.char_at(0);
        lexer
    }

    /// Build a lexer with the dialect and comment policy of `mode`.
    pub fn with_mode(text: &'a str, mode: &Mode) -> Result<Self> {
        let mut lexer = Self::new(text, mode.dialect()?);
        lexer.keep_comments = mode.keep_comments;
        lexer.skip_comments = mode.skip_comments;
        lexer.allow_comments = mode.allow_comments;
        lexer.safe_comments_only = mode.safe_comments_only;
        debug!(
            dialect = %lexer.dialect,
            keep_comments = lexer.keep_comments,
            skip_comments = lexer.skip_comments,
            allow_comments = lexer.allow_comments,
            safe_comments_only = lexer.safe_comments_only,
            "lexer created"
        );
        Ok(lexer)
    }

    /// Intern into the given tables instead of the process-wide ones.
    pub fn with_symbol_tables(mut self, symbols: &'a SymbolTable, quote_symbols: &'a SymbolTable) -> Self {
        self.symbols = symbols;
        self.quote_symbols = quote_symbols;
        self
    }

    pub fn set_keep_comments(&mut self, keep: bool) {
        self.keep_comments = keep;
    }

    pub fn set_skip_comments(&mut self, skip: bool) {
        self.skip_comments = skip;
    }

    pub fn set_allow_comments(&mut self, allow: bool) {
        self.allow_comments = allow;
    }

    pub fn set_safe_comments_only(&mut self, safe: bool) {
        self.safe_comments_only = safe;
    }

    pub fn set_comment_handler(&mut self, handler: impl CommentHandler + 'a) {
        self.comment_handler = Some(Box::new(handler));
    }

    // ---- Cursor ----

    #[inline]
    pub(crate) fn char_at(&self, i: usize) -> char {
        match self.text.as_bytes().get(i) {
            None => EOI,
            Some(&b) if b < 0x80 => b as char,
            Some(_) => self
                .text
                .get(i..)
                .and_then(|s| s.chars().next())
                .unwrap_or(EOI),
        }
    }

    /// The char `n` bytes past the cursor. Only meaningful after ASCII.
    #[inline]
    pub(crate) fn peek(&self, n: usize) -> char {
        self.char_at(self.pos + n)
    }

    #[inline]
    pub(crate) fn scan_char(&mut self) {
        if self.pos < self.text.len() {
            self.pos += self.ch.len_utf8();
        }
        self.ch = self.char_at(self.pos);
    }

    #[inline]
    pub(crate) fn jump_to(&mut self, pos: usize) {
        self.pos = pos.min(self.text.len());
        self.ch = self.char_at(self.pos);
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Move the cursor to `pos` without scanning. Lines skipped over are counted.
    pub fn seek(&mut self, pos: usize) {
        let pos = pos.min(self.text.len());
        if pos > self.pos {
            self.line += memchr_iter(b'\n', &self.text.as_bytes()[self.pos..pos]).count();
        }
        self.jump_to(pos);
    }

    pub fn skip_to_eof(&mut self) {
        self.jump_to(self.text.len());
        self.mark = self.pos;
        self.buf_pos = 0;
        self.lexeme = Lexeme::None;
        self.token = Token::Eof;
    }

    // ---- Token loop ----

    /// Consume the current token and scan the next one.
    pub fn next_token(&mut self) -> Result<()> {
        self.begin_token();
        self.scan_token()?;
        self.finish_token();
        Ok(())
    }

    pub(crate) fn begin_token(&mut self) {
        self.lexeme = Lexeme::None;
        self.hash = 0;
        self.hash_lower = 0;
        self.buf_pos = 0;
        if !self.comments.is_empty() {
            self.comments = Comments::default();
        }
        self.mark = self.pos;
        self.start_pos = self.pos;
    }

    pub(crate) fn finish_token(&mut self) {
        if self.lexeme.is_none() {
            self.buf_pos = self.pos - self.mark;
        }
        self.token_line = Some(self.line);
    }

    /// Mark the token start at the cursor.
    #[inline]
    pub(crate) fn start_here(&mut self) {
        self.mark = self.pos;
        self.start_pos = self.pos;
    }

    pub(crate) fn scan_token(&mut self) -> Result<()> {
        loop {
            if self.is_eof() {
                self.start_here();
                self.token = Token::Eof;
                return Ok(());
            }

            let ch = self.ch;
            if is_whitespace(ch) {
                if ch == '\n' {
                    self.line += 1;
                }
                self.scan_char();
                continue;
            }

            self.start_here();
            match ch {
                '$' if self.peek(1) == '{' => return self.scan_variable(),
                'N' | 'n' if self.peek(1) == '\'' => {
                    self.scan_char();
                    self.scan_string()?;
                    self.token = Token::LiteralNChars;
                    return Ok(());
                }
                c if is_identifier_start(c) => {
                    self.scan_identifier();
                    return Ok(());
                }
                '0' if matches!(self.peek(1), 'x' | 'X') => {
                    self.scan_char();
                    self.scan_char();
                    self.scan_hex();
                    return Ok(());
                }
                '0'..='9' => {
                    self.scan_number();
                    return Ok(());
                }
                ',' | FULLWIDTH_COMMA => self.single(Token::Comma),
                '(' | FULLWIDTH_LPAREN => self.single(Token::LParen),
                ')' | FULLWIDTH_RPAREN => self.single(Token::RParen),
                '[' => self.single(Token::LBracket),
                ']' => self.single(Token::RBracket),
                '{' => self.single(Token::LBrace),
                '}' => self.single(Token::RBrace),
                ';' => self.single(Token::Semi),
                ':' => match self.peek(1) {
                    '=' => self.double(Token::ColonEq),
                    ':' => self.double(Token::ColonColon),
                    _ => return self.scan_variable(),
                },
                '#' if self.dialect.hash_comments() && self.peek(1) != '{' => {
                    if self.scan_comment()? {
                        continue;
                    }
                }
                '#' => return self.scan_variable(),
                '.' => self.scan_dot(),
                '\'' => return self.scan_string(),
                '"' => return self.scan_alias(),
                '`' if self.dialect.backtick_identifiers() => return self.scan_backtick_identifier(),
                '?' => self.scan_question(),
                '@' => self.scan_variable_at(),
                '-' if self.peek(1) == '-' => {
                    if self.scan_comment()? {
                        continue;
                    }
                }
                '/' if matches!(self.peek(1), '/' | '*') => {
                    if self.scan_comment()? {
                        continue;
                    }
                }
                '\\' if self.dialect.backslash_null() && self.peek(1) == 'N' => {
                    self.double(Token::Null)
                }
                c if is_operator_start(c) => self.scan_operator(),
                _ => {
                    // Illegal character: report it and move past.
                    self.single(Token::Error);
                }
            }
            return Ok(());
        }
    }

    #[inline]
    fn single(&mut self, token: Token) {
        self.scan_char();
        self.token = token;
    }

    #[inline]
    fn double(&mut self, token: Token) {
        self.scan_char();
        self.scan_char();
        self.token = token;
    }

    fn scan_dot(&mut self) {
        let prev_is_ident = self.text[..self.pos]
            .chars()
            .next_back()
            .is_some_and(is_identifier_char);
        let next = self.peek(1);
        if next.is_ascii_digit() && !prev_is_ident {
            self.scan_number();
        } else if next == '.' {
            if self.peek(2) == '.' {
                self.scan_char();
                self.double(Token::DotDotDot);
            } else {
                self.double(Token::DotDot);
            }
        } else {
            self.single(Token::Dot);
        }
    }

    fn scan_question(&mut self) {
        self.scan_char();
        self.token = Token::Ques;
        if !self.dialect.pg_operators() {
            return;
        }
        match self.ch {
            '?' => {
                self.scan_char();
                if self.ch == '|' {
                    self.single(Token::QuesBar);
                } else {
                    self.token = Token::QuesQues;
                }
            }
            // `?||` stays `?` followed by `||`.
            '|' if self.peek(1) != '|' => self.single(Token::QuesBar),
            '&' => self.single(Token::QuesAmp),
            _ => {}
        }
    }

    fn scan_operator(&mut self) {
        let first = self.ch;
        self.scan_char();
        let token = match first {
            '+' => Token::Plus,
            '-' => match self.ch {
                '>' => {
                    self.scan_char();
                    if self.ch == '>' {
                        self.scan_char();
                        Token::SubGtGt
                    } else {
                        Token::SubGt
                    }
                }
                _ => Token::Sub,
            },
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '&' => self.follow('&', Token::AmpAmp, Token::Amp),
            '|' => match self.ch {
                '|' => {
                    self.scan_char();
                    self.follow('/', Token::BarBarSlash, Token::BarBar)
                }
                '/' => {
                    self.scan_char();
                    Token::BarSlash
                }
                _ => Token::Bar,
            },
            '^' => self.follow('=', Token::CaretEq, Token::Caret),
            '=' => match self.ch {
                '=' => self.take(Token::EqEq),
                '>' => self.take(Token::EqGt),
                _ => Token::Eq,
            },
            '>' => match self.ch {
                '=' => self.take(Token::GtEq),
                '>' => self.take(Token::GtGt),
                _ => Token::Gt,
            },
            '<' => match self.ch {
                '=' => {
                    self.scan_char();
                    self.follow('>', Token::LtEqGt, Token::LtEq)
                }
                '>' => self.take(Token::LtGt),
                '<' => self.take(Token::LtLt),
                '@' if self.dialect.pg_operators() => self.take(Token::LtMonkeysAt),
                '-' if self.dialect.pg_operators() && self.peek(1) == '>' => {
                    self.scan_char();
                    self.take(Token::LtSubGt)
                }
                _ => Token::Lt,
            },
            '!' => {
                self.skip_whitespace();
                match self.ch {
                    '=' => self.take(Token::BangEq),
                    '>' => self.take(Token::BangGt),
                    '<' => self.take(Token::BangLt),
                    '!' => self.take(Token::BangBang),
                    '~' => {
                        self.scan_char();
                        self.follow('*', Token::BangTildeStar, Token::BangTilde)
                    }
                    _ => Token::Bang,
                }
            }
            '~' => match self.ch {
                '*' => self.take(Token::TildeStar),
                '=' => self.take(Token::TildeEq),
                _ => Token::Tilde,
            },
            _ => Token::Error,
        };
        self.token = token;
    }

    #[inline]
    fn take(&mut self, token: Token) -> Token {
        self.scan_char();
        token
    }

    #[inline]
    fn follow(&mut self, next: char, matched: Token, otherwise: Token) -> Token {
        if self.ch == next {
            self.take(matched)
        } else {
            otherwise
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.is_eof() && is_whitespace(self.ch) {
            if self.ch == '\n' {
                self.line += 1;
            }
            self.scan_char();
        }
    }

    // ---- Identifiers ----

    pub(crate) fn scan_identifier(&mut self) {
        let text = self.text;
        let start = self.pos;
        let mut hash = OFFSET_BASIS;
        let mut hash_lower = OFFSET_BASIS;
        let mut end = text.len();
        let mut count = 0usize;
        for (i, c) in text[start..].char_indices() {
            if i > 0 && !is_identifier_char(c) {
                end = start + i;
                break;
            }
            hash = mix(hash, c);
            hash_lower = mix(hash_lower, fold(c));
            count += 1;
        }

        let word = &text[start..end];
        self.mark = start;
        self.hash = hash;
        self.hash_lower = hash_lower;
        self.jump_to(end);

        if count == 1 {
            self.token = Token::Identifier;
            self.lexeme = Lexeme::Borrowed(word);
            return;
        }

        match self.keywords.get_keyword(hash_lower) {
            Some(token) => {
                self.token = token;
                self.lexeme = Lexeme::None;
            }
            None => {
                self.token = Token::Identifier;
                self.lexeme = Lexeme::Shared(self.symbols.add_symbol(word, hash));
            }
        }
    }

    /// Produce keyword `token` spanning `len` ASCII bytes at the cursor, with
    /// the same hashes the identifier scan would compute.
    pub(crate) fn keyword_at(&mut self, len: usize, token: Token) {
        let start = self.pos;
        let word = &self.text[start..start + len];
        self.mark = start;
        self.hash = fnv1a_64(word);
        self.hash_lower = fnv1a_64_lower(word);
        self.lexeme = Lexeme::None;
        self.jump_to(start + len);
        self.token = token;
    }

    fn scan_backtick_identifier(&mut self) -> Result<()> {
        let text = self.text;
        let start = self.pos;
        let body_start = start + 1;
        let Some(offset) = memchr(b'`', &text.as_bytes()[body_start..]) else {
            return Err(self.lex_error("illegal identifier, unclosed quote"));
        };
        let end = body_start + offset;
        let body = &text[body_start..end];
        let quoted = &text[start..=end];

        self.hash = fnv1a_64(body);
        self.hash_lower = fnv1a_64_lower(body);
        self.lexeme = Lexeme::Shared(self.quote_symbols.add_symbol(quoted, self.hash));
        self.jump_to(end + 1);
        self.token = Token::Identifier;
        Ok(())
    }

    // ---- Numbers ----

    pub(crate) fn scan_number(&mut self) {
        self.mark = self.pos;
        while self.ch.is_ascii_digit() {
            self.scan_char();
        }

        let mut is_float = false;
        if self.ch == '.' {
            if self.peek(1) == '.' {
                // `1..2` is INT DOTDOT INT.
                self.token = Token::LiteralInt;
                return;
            }
            self.scan_char();
            is_float = true;
            while self.ch.is_ascii_digit() {
                self.scan_char();
            }
        }

        if matches!(self.ch, 'e' | 'E') {
            let sign = usize::from(matches!(self.peek(1), '+' | '-'));
            if self.peek(1 + sign).is_ascii_digit() {
                for _ in 0..=sign {
                    self.scan_char();
                }
                while self.ch.is_ascii_digit() {
                    self.scan_char();
                }
                is_float = true;
            }
        }

        self.token = if is_float {
            Token::LiteralFloat
        } else {
            Token::LiteralInt
        };
    }

    pub(crate) fn scan_hex(&mut self) {
        self.mark = self.pos;
        while is_hex_digit(self.ch) {
            self.scan_char();
        }
        self.token = Token::LiteralHex;
    }

    // ---- Strings ----

    pub(crate) fn scan_string(&mut self) -> Result<()> {
        let text = self.text;
        let prev = self.token;
        let quote_pos = self.pos;
        let backslash = self.dialect.backslash_escapes();

        let Some(span) = scan_quoted(text.as_bytes(), quote_pos + 1, b'\'', backslash) else {
            return Err(self.lex_error("unclosed str"));
        };
        let body = &text[quote_pos + 1..span.end];

        self.mark = quote_pos;
        self.lexeme = if !span.has_escape {
            if prev == Token::As {
                Lexeme::Borrowed(&text[quote_pos..=span.end])
            } else {
                Lexeme::Borrowed(body)
            }
        } else {
            self.scratch.clear();
            decode_string(
                body,
                '\'',
                backslash,
                self.dialect.preserves_like_escapes(),
                &mut self.scratch,
            );
            Lexeme::Shared(Arc::from(self.scratch.as_str()))
        };
        self.buf_pos = self.lexeme.as_str().map_or(0, str::len);
        self.seek(span.end + 1);
        self.token = Token::LiteralChars;
        Ok(())
    }

    fn scan_alias(&mut self) -> Result<()> {
        let text = self.text;
        let quote_pos = self.pos;

        let Some(span) = scan_quoted(text.as_bytes(), quote_pos + 1, b'"', true) else {
            return Err(self.lex_error("unclosed str"));
        };

        self.mark = quote_pos;
        self.lexeme = if !span.has_escape {
            Lexeme::Borrowed(&text[quote_pos..=span.end])
        } else {
            self.scratch.clear();
            decode_alias(&text[quote_pos + 1..span.end], '"', &mut self.scratch);
            Lexeme::Shared(Arc::from(self.scratch.as_str()))
        };
        self.buf_pos = self.lexeme.as_str().map_or(0, str::len);
        self.seek(span.end + 1);
        self.token = Token::LiteralAlias;
        Ok(())
    }

    // ---- Variables ----

    /// `:name`, `#name`, `${...}`, `#{...}`, `:{...}`.
    fn scan_variable(&mut self) -> Result<()> {
        let text = self.text;
        let start = self.pos;
        self.mark = start;

        let end = if self.peek(1) == '{' {
            let body_start = start + 2;
            match memchr(b'}', &text.as_bytes()[body_start..]) {
                Some(offset) => body_start + offset + 1,
                None => return Err(self.lex_error("unclosed variable")),
            }
        } else {
            self.scan_char();
            while is_identifier_char(self.ch) {
                self.scan_char();
            }
            self.pos
        };

        self.lexeme = Lexeme::Borrowed(&text[start..end]);
        self.jump_to(end);
        self.token = Token::Variant;
        Ok(())
    }

    /// `@name`, `@@name`, and `@>` in PostgreSQL.
    fn scan_variable_at(&mut self) {
        if self.dialect.pg_operators() && self.peek(1) == '>' {
            self.double(Token::MonkeysAtGt);
            return;
        }
        let text = self.text;
        let start = self.pos;
        self.scan_char();
        if self.ch == '@' {
            self.scan_char();
        }
        while is_identifier_char(self.ch) {
            self.scan_char();
        }
        self.lexeme = Lexeme::Borrowed(&text[start..self.pos]);
        self.token = Token::Variant;
    }

    // ---- Comments ----

    /// Scan a comment at the cursor. Returns `true` when the comment is
    /// skipped and scanning should continue.
    fn scan_comment(&mut self) -> Result<bool> {
        if !self.allow_comments {
            self.token = self.comment_kind();
            debug!(pos = self.pos, "comment rejected: comments not allowed");
            return Err(self.security_error("comment not allowed"));
        }

        let text = self.text;
        let bytes = text.as_bytes();
        let start = self.pos;
        let start_line = self.line;
        let kind = self.comment_kind();

        let (body_start, body_end, resume) = if kind == Token::MultiLineComment {
            let body_start = start + 2;
            let Some(offset) = memmem::find(&bytes[body_start..], b"*/") else {
                return Err(self.lex_error("unterminated /* comment"));
            };
            let body_end = body_start + offset;
            (body_start, body_end, body_end + 2)
        } else {
            let body_start = start + if self.ch == '#' { 1 } else { 2 };
            let body_end = memchr2(b'\n', b'\r', &bytes[body_start..])
                .map_or(bytes.len(), |offset| body_start + offset);
            (body_start, body_end, body_end)
        };

        let body = &text[body_start..body_end];
        let trailing = self.token_line == Some(start_line);
        let prev = self.token;
        // Newlines inside a block comment are counted by `seek`.
        self.seek(resume);

        self.comment_count += 1;
        if self.keep_comments {
            self.comments.push(body, trailing);
        }

        let handled = match self.comment_handler.as_mut() {
            Some(handler) => handler.handle(prev, body),
            None => false,
        };

        if !handled && self.safe_comments_only && !is_safe_comment(body) {
            self.mark = body_start;
            self.start_pos = start;
            self.token = kind;
            self.lexeme = Lexeme::Borrowed(body);
            debug!(pos = start, comment = body, "comment rejected: unsafe text");
            return Err(self.security_error("unsafe comment"));
        }

        if self.skip_comments {
            return Ok(true);
        }
        self.mark = body_start;
        self.lexeme = Lexeme::Borrowed(body);
        self.buf_pos = body.len();
        self.token = kind;
        Ok(false)
    }

    fn comment_kind(&self) -> Token {
        if self.ch == '/' && self.peek(1) == '*' {
            Token::MultiLineComment
        } else {
            Token::LineComment
        }
    }

    // ---- Accessors ----

    pub fn token(&self) -> Token {
        self.token
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn source(&self) -> &'a str {
        self.text
    }

    /// Byte offset of the cursor, just past the current token.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Byte offset where the current token starts.
    pub fn start_pos(&self) -> usize {
        self.start_pos
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn lexeme(&self) -> &Lexeme<'a> {
        &self.lexeme
    }

    /// Decoded text of the current token, or its source text when the token
    /// carries no decoded value.
    pub fn string_val(&self) -> &str {
        match &self.lexeme {
            Lexeme::None => self
                .text
                .get(self.mark..self.mark + self.buf_pos)
                .unwrap_or(""),
            Lexeme::Borrowed(s) => s,
            Lexeme::Shared(s) => s,
        }
    }

    pub fn number_string(&self) -> &str {
        self.text
            .get(self.mark..self.mark + self.buf_pos)
            .unwrap_or("")
    }

    /// Digits of a hex literal, without the `0x` prefix.
    pub fn hex_string(&self) -> &str {
        self.number_string()
    }

    pub fn integer_value(&self) -> Result<Integer> {
        let digits = self.number_string();
        Integer::parse(digits, 10)
            .ok_or_else(|| self.lex_error(format!("{} is not an integer", digits)))
    }

    pub fn decimal_value(&self) -> Result<f64> {
        let digits = self.number_string();
        match digits.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.lex_error(format!("{} is not a number", digits))),
        }
    }

    pub fn hex_value(&self) -> Result<Integer> {
        let digits = self.hex_string();
        Integer::parse(digits, 16)
            .ok_or_else(|| self.lex_error(format!("0x{} is not a valid hex literal", digits)))
    }

    /// Case-sensitive hash of the current token's text.
    pub fn hash(&self) -> u64 {
        if self.hash != 0 {
            self.hash
        } else {
            fnv1a_64(self.string_val())
        }
    }

    /// Case-folded hash of the current token's text.
    pub fn hash_lower(&self) -> u64 {
        if self.hash_lower != 0 {
            self.hash_lower
        } else {
            fnv1a_64_lower(self.string_val())
        }
    }

    pub fn identifier_equals(&self, text: &str) -> bool {
        self.token == Token::Identifier && self.string_val().eq_ignore_ascii_case(text)
    }

    pub fn identifier_equals_hash(&self, hash_lower: u64) -> bool {
        self.token == Token::Identifier && self.hash_lower() == hash_lower
    }

    /// Comments collected since the current token started.
    pub fn read_and_reset_comments(&mut self) -> Comments {
        std::mem::take(&mut self.comments)
    }

    pub fn comment_count(&self) -> usize {
        self.comment_count
    }

    pub fn has_comment(&self) -> bool {
        !self.comments.is_empty()
    }

    pub fn next_var_index(&mut self) -> usize {
        self.var_index += 1;
        self.var_index
    }

    // ---- Errors ----

    pub fn error_context(&self) -> ErrorContext {
        let (line, column) = self.line_column(self.start_pos);
        let text = self
            .token
            .carries_text()
            .then(|| self.string_val().to_string());
        ErrorContext {
            pos: self.pos,
            line,
            column,
            token: self.token,
            text,
            around: self.around().to_string(),
        }
    }

    /// Human-readable position summary of the current token.
    pub fn info(&self) -> String {
        self.error_context().to_string()
    }

    fn line_column(&self, offset: usize) -> (usize, usize) {
        let before = self.text.get(..offset).unwrap_or(self.text);
        let bytes = before.as_bytes();
        let line = memchr_iter(b'\n', bytes).count() + 1;
        let line_start = memrchr(b'\n', bytes).map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }

    fn around(&self) -> &'a str {
        let text = self.text;
        let mut start = self.mark.saturating_sub(5);
        while !text.is_char_boundary(start) {
            start -= 1;
        }
        let mut end = (self.mark + 30).min(text.len());
        while !text.is_char_boundary(end) {
            end += 1;
        }
        &text[start..end]
    }

    pub(crate) fn lex_error(&self, message: impl Into<String>) -> ScanError {
        ScanError::Lexical {
            message: message.into(),
            context: Box::new(self.error_context()),
        }
    }

    pub(crate) fn syntax_error(&self, message: impl Into<String>) -> ScanError {
        ScanError::Syntax {
            message: message.into(),
            context: Box::new(self.error_context()),
        }
    }

    fn security_error(&self, message: impl Into<String>) -> ScanError {
        ScanError::Security {
            message: message.into(),
            context: Box::new(self.error_context()),
        }
    }
}
