use tracing::trace;

use crate::lexer::{Lexeme, Lexer};
use crate::token::Token;

/// Snapshot of a lexer's cursor and current token.
///
/// Restoring a save point makes subsequent scanning behave exactly as it did
/// after the snapshot was taken. Comments collected in between are not rolled
/// back.
#[derive(Debug, Clone)]
pub struct SavePoint<'a> {
    source: usize,
    pos: usize,
    ch: char,
    mark: usize,
    start_pos: usize,
    buf_pos: usize,
    line: usize,
    token_line: Option<usize>,
    token: Token,
    lexeme: Lexeme<'a>,
    hash: u64,
    hash_lower: u64,
}

impl SavePoint<'_> {
    pub fn token(&self) -> Token {
        self.token
    }

    pub fn pos(&self) -> usize {
        self.pos
    }
}

impl<'a> Lexer<'a> {
    /// Capture the current state for a later [`Lexer::reset`].
    pub fn mark(&self) -> SavePoint<'a> {
        SavePoint {
            source: self.text.as_ptr() as usize,
            pos: self.pos,
            ch: self.ch,
            mark: self.mark,
            start_pos: self.start_pos,
            buf_pos: self.buf_pos,
            line: self.line,
            token_line: self.token_line,
            token: self.token,
            lexeme: self.lexeme.clone(),
            hash: self.hash,
            hash_lower: self.hash_lower,
        }
    }

    /// Restore a save point taken from this lexer.
    pub fn reset(&mut self, savepoint: &SavePoint<'a>) {
        debug_assert_eq!(
            savepoint.source,
            self.text.as_ptr() as usize,
            "save point belongs to another source"
        );
        trace!(from = self.pos, to = savepoint.pos, "lexer reset");
        self.pos = savepoint.pos;
        self.ch = savepoint.ch;
        self.mark = savepoint.mark;
        self.start_pos = savepoint.start_pos;
        self.buf_pos = savepoint.buf_pos;
        self.line = savepoint.line;
        self.token_line = savepoint.token_line;
        self.token = savepoint.token;
        self.lexeme = savepoint.lexeme.clone();
        self.hash = savepoint.hash;
        self.hash_lower = savepoint.hash_lower;
    }
}
