use std::sync::Arc;

use compact_str::CompactString;

use crate::dialect::Dialect;
use crate::error::{Result, ScanError};
use crate::fnv::constants;
use crate::fnv::{fnv1a_64, mix};
use crate::insert_columns_cache::InsertColumnsCache;
use crate::lexer::{Integer, Lexer};
use crate::mode::Mode;
use crate::string_utils::remove_name_quotes;
use crate::token::Token;

/// One item of a select list: the expression's source text and its alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
    pub expr: String,
    pub alias: Option<String>,
}

/// The token-level contract a recursive-descent parser builds on.
///
/// Wraps a [`Lexer`] that is always positioned on the next unconsumed token.
pub struct SqlParser<'a> {
    lexer: Lexer<'a>,
    strip_name_quotes: bool,
    use_insert_columns_cache: bool,
    columns_cache: &'a InsertColumnsCache,
}

impl<'a> SqlParser<'a> {
    pub fn new(sql: &'a str, dialect: Dialect) -> Result<Self> {
        Self::from_lexer(Lexer::new(sql, dialect))
    }

    pub fn with_mode(sql: &'a str, mode: &Mode) -> Result<Self> {
        let mut parser = Self::from_lexer(Lexer::with_mode(sql, mode)?)?;
        parser.strip_name_quotes = mode.strip_name_quotes;
        parser.use_insert_columns_cache = mode.use_insert_columns_cache;
        Ok(parser)
    }

    /// Take over `lexer` and scan its first token.
    pub fn from_lexer(mut lexer: Lexer<'a>) -> Result<Self> {
        lexer.next_token()?;
        Ok(Self {
            lexer,
            strip_name_quotes: false,
            use_insert_columns_cache: false,
            columns_cache: InsertColumnsCache::global(),
        })
    }

    pub fn set_strip_name_quotes(&mut self, strip: bool) {
        self.strip_name_quotes = strip;
    }

    /// Cache INSERT column lists in `cache`.
    pub fn with_insert_columns_cache(mut self, cache: &'a InsertColumnsCache) -> Self {
        self.columns_cache = cache;
        self.use_insert_columns_cache = true;
        self
    }

    pub fn lexer(&self) -> &Lexer<'a> {
        &self.lexer
    }

    pub fn lexer_mut(&mut self) -> &mut Lexer<'a> {
        &mut self.lexer
    }

    pub fn token(&self) -> Token {
        self.lexer.token()
    }

    // ---- Token contract ----

    /// Consume `token` or fail with a syntax error.
    pub fn accept(&mut self, token: Token) -> Result<()> {
        if self.lexer.token() == token {
            return self.lexer.next_token();
        }
        Err(self.unexpected(token.name()))
    }

    /// Consume `token` if it is current.
    pub fn match_token(&mut self, token: Token) -> Result<bool> {
        if self.lexer.token() != token {
            return Ok(false);
        }
        self.lexer.next_token()?;
        Ok(true)
    }

    pub fn identifier_equals(&self, text: &str) -> bool {
        self.lexer.identifier_equals(text)
    }

    /// Consume the identifier `text` (any case) or fail.
    pub fn accept_identifier(&mut self, text: &str) -> Result<()> {
        if self.lexer.identifier_equals(text) {
            return self.lexer.next_token();
        }
        Err(self.unexpected(text))
    }

    pub fn accept_integer(&mut self) -> Result<Integer> {
        if self.lexer.token() != Token::LiteralInt {
            return Err(self.unexpected(Token::LiteralInt.name()));
        }
        let value = self.lexer.integer_value()?;
        self.lexer.next_token()?;
        Ok(value)
    }

    /// Run `f` speculatively. A syntax error rewinds to where `f` started and
    /// yields `None`; other errors propagate.
    pub fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<Option<T>> {
        let savepoint = self.lexer.mark();
        match f(self) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_syntax() => {
                self.lexer.reset(&savepoint);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn unexpected(&self, expected: &str) -> ScanError {
        self.lexer.syntax_error(format!(
            "expect {}, actual {}",
            expected,
            self.lexer.token()
        ))
    }

    // ---- Aliases ----

    /// Alias after a table reference or select item.
    ///
    /// With `must`, a missing alias or a clause keyword in alias position is a
    /// syntax error.
    pub fn table_alias(&mut self, must: bool) -> Result<Option<String>> {
        let token = self.lexer.token();
        if matches!(token, Token::Select | Token::From | Token::Where) {
            if must {
                return Err(self.unexpected("alias"));
            }
            return Ok(None);
        }

        if token == Token::Identifier {
            let mut ident = self.lexer.string_val().to_string();
            if self.strip_name_quotes && ident.len() > 1 {
                ident = remove_name_quotes(&ident).to_string();
            }
            let hash = self.lexer.hash_lower();

            if matches!(
                hash,
                constants::START
                    | constants::CONNECT
                    | constants::NATURAL
                    | constants::CROSS
                    | constants::OFFSET
                    | constants::LIMIT
            ) {
                if must {
                    return Err(self.unexpected("alias"));
                }
                let savepoint = self.lexer.mark();
                self.lexer.next_token()?;
                if matches!(
                    self.lexer.token(),
                    Token::Eof | Token::Comma | Token::Where | Token::Inner
                ) {
                    return Ok(Some(ident));
                }
                self.lexer.reset(&savepoint);
                return Ok(None);
            }

            if !must {
                let savepoint = self.lexer.mark();
                let clause_follows = match hash {
                    constants::MODEL => {
                        self.lexer.next_token()?;
                        matches!(self.lexer.token(), Token::Partition | Token::Union)
                            || self.lexer.identifier_equals_hash(constants::DIMENSION)
                            || self.lexer.identifier_equals_hash(constants::IGNORE)
                            || self.lexer.identifier_equals_hash(constants::KEEP)
                    }
                    constants::WINDOW => {
                        self.lexer.next_token()?;
                        self.lexer.token() == Token::Identifier
                    }
                    constants::DISTRIBUTE | constants::SORT | constants::CLUSTER => {
                        self.lexer.next_token()?;
                        self.lexer.token() == Token::By
                    }
                    _ => {
                        self.lexer.next_token()?;
                        return self.trailing_key_alias(Some(ident));
                    }
                };
                if clause_follows {
                    self.lexer.reset(&savepoint);
                    return Ok(None);
                }
                return Ok(Some(ident));
            }

            self.lexer.next_token()?;
            return self.trailing_key_alias(Some(ident));
        }

        self.as_alias()
    }

    /// `AS name`, or an alias-shaped token.
    ///
    /// A `KEY`, `INTERVAL` or `CONSTRAINT` in alias position replaces whatever
    /// alias preceded it.
    pub fn as_alias(&mut self) -> Result<Option<String>> {
        let alias = match self.lexer.token() {
            Token::Comma => return Ok(None),
            Token::As => return self.after_as(),
            Token::LiteralAlias | Token::Identifier => Some(self.lexer.string_val().to_string()),
            Token::LiteralChars => Some(format!("'{}'", self.lexer.string_val())),
            Token::Case | Token::User | Token::End | Token::Outer | Token::Do | Token::Mod => {
                Some(self.lexer.string_val().to_string())
            }
            _ => None,
        };
        if alias.is_some() {
            self.lexer.next_token()?;
        }
        self.trailing_key_alias(alias)
    }

    fn trailing_key_alias(&mut self, alias: Option<String>) -> Result<Option<String>> {
        match self.lexer.token() {
            Token::Key | Token::Interval | Token::Constraint => {
                let name = self.lexer.token().name().to_string();
                self.lexer.next_token()?;
                Ok(Some(name))
            }
            _ => Ok(alias),
        }
    }

    fn after_as(&mut self) -> Result<Option<String>> {
        self.lexer.next_token()?;
        match self.lexer.token() {
            // `AS (` opens a column list, not an alias.
            Token::LParen => return Ok(None),
            Token::Eof
            | Token::Error
            | Token::Comma
            | Token::RParen
            | Token::Semi
            | Token::Dot
            | Token::LBracket
            | Token::RBracket
            | Token::LBrace
            | Token::RBrace => return Err(self.unexpected("alias")),
            _ => {}
        }

        let mut alias = self.lexer.string_val().to_string();
        self.lexer.next_token()?;
        while self.lexer.token() == Token::Dot {
            self.lexer.next_token()?;
            alias.push('.');
            match self.lexer.token() {
                Token::Identifier | Token::LiteralAlias => alias.push_str(self.lexer.string_val()),
                other => alias.push_str(other.name()),
            }
            self.lexer.next_token()?;
        }
        Ok(Some(alias))
    }

    /// Alias in DDL positions, where many keywords double as names.
    pub fn alias(&mut self) -> Result<Option<String>> {
        let alias = match self.lexer.token() {
            Token::LiteralAlias | Token::Identifier => self.lexer.string_val().to_string(),
            Token::LiteralChars => format!("'{}'", self.lexer.string_val()),
            Token::Key
            | Token::Index
            | Token::Case
            | Token::End
            | Token::Comment
            | Token::Enable
            | Token::Disable
            | Token::Sequence
            | Token::User
            | Token::Analyze
            | Token::Optimize
            | Token::Grant
            | Token::Revoke
            | Token::Full
            | Token::To
            | Token::Interval
            | Token::Lock
            | Token::Limit
            | Token::Identified
            | Token::Password
            | Token::Binary
            | Token::Window
            | Token::Offset => self.lexer.string_val().to_string(),
            Token::Ques => "?".to_string(),
            _ => return Ok(None),
        };
        self.lexer.next_token()?;
        Ok(Some(alias))
    }

    // ---- Clauses ----

    /// Consume a select list up to the first token that cannot continue it.
    pub fn parse_select_items(&mut self) -> Result<Vec<SelectItem>> {
        let mut items = Vec::new();
        loop {
            let expr = self.skip_expression()?;
            let alias = self.table_alias(false)?;
            items.push(SelectItem { expr, alias });
            if !self.match_token(Token::Comma)? {
                return Ok(items);
            }
        }
    }

    /// Consume one expression and return its source text.
    fn skip_expression(&mut self) -> Result<String> {
        let source = self.lexer.source();
        let start = self.lexer.start_pos();
        let mut end = start;
        let mut depth = 0usize;
        let mut expect_operand = true;

        loop {
            let token = self.lexer.token();
            // `*` in operand position is a wildcard, not a multiplication.
            let wildcard = expect_operand && token == Token::Star;
            match token {
                Token::Eof => break,
                Token::LParen | Token::Case => depth += 1,
                Token::RParen | Token::End if depth > 0 => depth -= 1,
                Token::RParen => break,
                _ if depth > 0 => {}
                _ if expect_operand => {
                    if matches!(token, Token::Comma | Token::From | Token::Semi) {
                        return Err(self.unexpected("expression"));
                    }
                }
                _ if is_binary_operator(token) => {}
                _ => break,
            }
            expect_operand = depth > 0
                || (!wildcard
                    && (is_binary_operator(token)
                        || matches!(token, Token::Not | Token::Plus | Token::Sub | Token::Tilde)));
            end = self.lexer.pos();
            self.lexer.next_token()?;
        }

        if end == start {
            return Err(self.unexpected("expression"));
        }
        Ok(source[start..end].to_string())
    }

    /// Consume `( col, ... )` after `INSERT INTO t`.
    pub fn parse_insert_columns(&mut self) -> Result<Arc<[CompactString]>> {
        if self.lexer.token() != Token::LParen {
            return Err(self.unexpected(Token::LParen.name()));
        }
        if !self.use_insert_columns_cache {
            return self.parse_column_list();
        }

        let source = self.lexer.source();
        let start = self.lexer.start_pos();
        let Some(end) = find_list_end(source.as_bytes(), self.lexer.pos()) else {
            return self.parse_column_list();
        };
        let raw = &source[start..=end];
        let hash = insert_columns_key(raw, self.lexer.dialect(), self.strip_name_quotes);

        if let Some(entry) = self.columns_cache.get(hash) {
            if &*entry.raw == raw {
                let columns = entry.columns.clone();
                self.lexer.seek(end + 1);
                self.lexer.next_token()?;
                return Ok(columns);
            }
        }

        let columns = self.parse_column_list()?;
        self.columns_cache.put(hash, raw, columns.clone());
        Ok(columns)
    }

    fn parse_column_list(&mut self) -> Result<Arc<[CompactString]>> {
        self.accept(Token::LParen)?;
        let mut columns = Vec::new();
        if self.lexer.token() != Token::RParen {
            loop {
                let token = self.lexer.token();
                if !(matches!(token, Token::Identifier | Token::LiteralAlias) || token.is_keyword()) {
                    return Err(self.unexpected("column"));
                }
                let mut name = CompactString::from(self.column_name());
                self.lexer.next_token_comma()?;
                while self.lexer.token() == Token::Dot {
                    self.lexer.next_token_ident()?;
                    name.push('.');
                    name.push_str(self.column_name());
                    self.lexer.next_token_comma()?;
                }
                columns.push(name);
                if self.lexer.token() != Token::Comma {
                    break;
                }
                self.lexer.next_token_ident()?;
            }
        }
        self.accept(Token::RParen)?;
        Ok(columns.into())
    }

    fn column_name(&self) -> &str {
        let name = self.lexer.string_val();
        if self.strip_name_quotes {
            remove_name_quotes(name)
        } else {
            name
        }
    }
}

fn is_binary_operator(token: Token) -> bool {
    matches!(
        token,
        Token::Plus
            | Token::Sub
            | Token::SubGt
            | Token::SubGtGt
            | Token::Star
            | Token::Slash
            | Token::Percent
            | Token::Amp
            | Token::AmpAmp
            | Token::Bar
            | Token::BarBar
            | Token::Caret
            | Token::Eq
            | Token::EqEq
            | Token::Gt
            | Token::GtEq
            | Token::GtGt
            | Token::Lt
            | Token::LtEq
            | Token::LtEqGt
            | Token::LtGt
            | Token::LtLt
            | Token::LtMonkeysAt
            | Token::MonkeysAtGt
            | Token::BangEq
            | Token::Tilde
            | Token::TildeStar
            | Token::BangTilde
            | Token::BangTildeStar
            | Token::Dot
            | Token::ColonColon
            | Token::And
            | Token::Or
            | Token::Xor
            | Token::Div
            | Token::Mod
            | Token::Not
            | Token::Is
            | Token::In
            | Token::Like
            | Token::Ilike
            | Token::Rlike
            | Token::Regexp
            | Token::Similar
            | Token::Between
            | Token::Escape
    )
}

/// Cache key of an INSERT column list.
///
/// Parsed names depend on the dialect and on quote stripping, so both are
/// mixed into the hash of the raw text.
pub fn insert_columns_key(raw: &str, dialect: Dialect, strip_name_quotes: bool) -> u64 {
    let hash = dialect.name().chars().fold(mix(fnv1a_64(raw), '\0'), mix);
    if strip_name_quotes {
        mix(hash, '"')
    } else {
        hash
    }
}

/// Byte index of the `)` closing a flat list whose body starts at `from`.
/// Returns `None` for nested parentheses, comments or an unterminated list.
fn find_list_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote = None;
    let mut prev = 0u8;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'`' | b'\'' => quote = Some(b),
                b'(' | b'#' => return None,
                b'*' if prev == b'/' => return None,
                b'-' if prev == b'-' => return None,
                b')' => return Some(i),
                _ => {}
            },
        }
        prev = b;
    }
    None
}
