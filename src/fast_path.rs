//! Context-specific shortcuts for the parser's hottest call sites.
//!
//! Each entry point recognises a few likely tokens with a byte comparison and
//! otherwise falls through to the general scanner. Whichever branch is taken,
//! the lexer ends in the same state `next_token` would have produced.

use crate::char_types::{
    is_identifier_char, is_identifier_start, is_whitespace, FULLWIDTH_COMMA, FULLWIDTH_LPAREN,
    FULLWIDTH_RPAREN,
};
use crate::error::Result;
use crate::lexer::Lexer;
use crate::token::Token;

impl<'a> Lexer<'a> {
    /// Skip plain spaces and mark the next token's start.
    fn begin_fast(&mut self) {
        self.begin_token();
        while self.ch == ' ' {
            self.scan_char();
        }
        self.start_here();
    }

    /// Whether `word` (lowercase ASCII) sits at the cursor in any case and is
    /// followed by a char accepted by `boundary`.
    fn at_word(&self, word: &[u8], boundary: impl Fn(char) -> bool) -> bool {
        let bytes = self.text.as_bytes();
        let end = self.pos + word.len();
        end <= bytes.len()
            && bytes[self.pos..end].eq_ignore_ascii_case(word)
            && boundary(self.char_at(end))
    }

    fn at_nchars(&self) -> bool {
        matches!(self.ch, 'N' | 'n') && self.peek(1) == '\''
    }

    fn fast_single(&mut self, token: Token) {
        self.scan_char();
        self.token = token;
    }

    fn fallback(&mut self) -> Result<()> {
        self.scan_token()?;
        self.finish_token();
        Ok(())
    }

    fn done(&mut self) -> Result<()> {
        self.finish_token();
        Ok(())
    }

    /// After a select item: `,`, `)` or `AS`.
    pub fn next_token_comma(&mut self) -> Result<()> {
        self.begin_fast();
        match self.ch {
            ',' | FULLWIDTH_COMMA => self.fast_single(Token::Comma),
            ')' | FULLWIDTH_RPAREN => self.fast_single(Token::RParen),
            'a' | 'A' if self.at_word(b"as", |c| c == ' ') => self.keyword_at(2, Token::As),
            _ => return self.fallback(),
        }
        self.done()
    }

    /// After a value in a VALUES list: `,`, `)` or `AS`, else another value.
    pub fn next_token_comma_value(&mut self) -> Result<()> {
        self.begin_fast();
        match self.ch {
            ',' | FULLWIDTH_COMMA => self.fast_single(Token::Comma),
            ')' | FULLWIDTH_RPAREN => self.fast_single(Token::RParen),
            'a' | 'A' if self.at_word(b"as", |c| c == ' ') => self.keyword_at(2, Token::As),
            _ => return self.scan_value(),
        }
        self.done()
    }

    /// After a column in a SET list: `=` or `AS`.
    pub fn next_token_eq(&mut self) -> Result<()> {
        self.begin_fast();
        match self.ch {
            '=' if !matches!(self.peek(1), '=' | '>') => self.fast_single(Token::Eq),
            'a' | 'A' if self.at_word(b"as", |c| c == ' ') => self.keyword_at(2, Token::As),
            _ => return self.fallback(),
        }
        self.done()
    }

    /// Before an argument list.
    pub fn next_token_lparen(&mut self) -> Result<()> {
        self.begin_fast();
        match self.ch {
            '(' | FULLWIDTH_LPAREN => self.fast_single(Token::LParen),
            _ => return self.fallback(),
        }
        self.done()
    }

    /// Where a literal value is expected.
    pub fn next_token_value(&mut self) -> Result<()> {
        self.begin_fast();
        self.scan_value()
    }

    fn scan_value(&mut self) -> Result<()> {
        match self.ch {
            '\'' => self.scan_string()?,
            '0' if matches!(self.peek(1), 'x' | 'X') => {
                self.scan_char();
                self.scan_char();
                self.scan_hex();
            }
            '0'..='9' => self.scan_number(),
            ')' | FULLWIDTH_RPAREN => self.fast_single(Token::RParen),
            '$' if self.peek(1) == '{' => return self.fallback(),
            'n' | 'N' if self.at_nchars() => return self.fallback(),
            'n' | 'N' if self.at_word(b"null", |c| !is_identifier_char(c)) => {
                self.keyword_at(4, Token::Null)
            }
            c if is_identifier_start(c) => self.scan_identifier(),
            _ => return self.fallback(),
        }
        self.done()
    }

    /// After GROUP or ORDER.
    pub fn next_token_by(&mut self) -> Result<()> {
        self.begin_fast();
        if matches!(self.ch, 'b' | 'B') && self.at_word(b"by", |c| c == ' ') {
            self.keyword_at(2, Token::By);
            return self.done();
        }
        self.fallback()
    }

    /// After a column type: `NOT` or `NULL`.
    pub fn next_token_not_or_null(&mut self) -> Result<()> {
        self.begin_fast();
        if matches!(self.ch, 'n' | 'N') {
            if self.at_word(b"not", is_whitespace) {
                self.keyword_at(3, Token::Not);
                return self.done();
            }
            if self.at_word(b"null", is_whitespace) {
                self.keyword_at(4, Token::Null);
                return self.done();
            }
        }
        self.fallback()
    }

    /// Where a name is expected.
    pub fn next_token_ident(&mut self) -> Result<()> {
        self.begin_fast();
        match self.ch {
            ')' | FULLWIDTH_RPAREN => self.fast_single(Token::RParen),
            '$' if self.peek(1) == '{' => return self.fallback(),
            c if is_identifier_start(c) && !self.at_nchars() => self.scan_identifier(),
            _ => return self.fallback(),
        }
        self.done()
    }
}
