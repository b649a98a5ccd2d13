use std::fmt;

/// Declares the token enum together with its canonical upper-case names.
macro_rules! tokens {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)*) => {
        /// All terminal kinds produced by the scanner.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Token {
            $($(#[$doc])* $variant,)*
        }

        impl Token {
            /// Canonical upper-case name, e.g. `LITERAL_INT` or `SELECT`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Token::$variant => $name,)*
                }
            }
        }
    };
}

tokens! {
    Eof => "EOF",
    /// An illegal character. Not a fault: the scanner moves past it.
    Error => "ERROR",
    Identifier => "IDENTIFIER",

    LiteralInt => "LITERAL_INT",
    LiteralFloat => "LITERAL_FLOAT",
    LiteralHex => "LITERAL_HEX",
    LiteralChars => "LITERAL_CHARS",
    LiteralNChars => "LITERAL_NCHARS",
    /// A double-quoted name. The value keeps its quotes.
    LiteralAlias => "LITERAL_ALIAS",
    /// Placeholders and variables: `:x`, `#{x}`, `${x}`, `@x`, `@@x`.
    Variant => "VARIANT",

    LineComment => "LINE_COMMENT",
    MultiLineComment => "MULTI_LINE_COMMENT",

    // Keywords
    All => "ALL",
    Alter => "ALTER",
    Analyze => "ANALYZE",
    And => "AND",
    Any => "ANY",
    As => "AS",
    Asc => "ASC",
    Between => "BETWEEN",
    Binary => "BINARY",
    By => "BY",
    Case => "CASE",
    Cast => "CAST",
    Check => "CHECK",
    Column => "COLUMN",
    Comment => "COMMENT",
    Constraint => "CONSTRAINT",
    Create => "CREATE",
    Database => "DATABASE",
    Declare => "DECLARE",
    Default => "DEFAULT",
    Delete => "DELETE",
    Desc => "DESC",
    Disable => "DISABLE",
    Distinct => "DISTINCT",
    Div => "DIV",
    Do => "DO",
    Drop => "DROP",
    Dual => "DUAL",
    Else => "ELSE",
    Enable => "ENABLE",
    End => "END",
    Escape => "ESCAPE",
    Except => "EXCEPT",
    Exists => "EXISTS",
    Explain => "EXPLAIN",
    False => "FALSE",
    Fetch => "FETCH",
    For => "FOR",
    Foreign => "FOREIGN",
    From => "FROM",
    Full => "FULL",
    Function => "FUNCTION",
    Grant => "GRANT",
    Group => "GROUP",
    Having => "HAVING",
    Identified => "IDENTIFIED",
    Ilike => "ILIKE",
    In => "IN",
    Index => "INDEX",
    Inner => "INNER",
    Insert => "INSERT",
    Intersect => "INTERSECT",
    Interval => "INTERVAL",
    Into => "INTO",
    Is => "IS",
    Join => "JOIN",
    Key => "KEY",
    Kill => "KILL",
    Left => "LEFT",
    Like => "LIKE",
    Limit => "LIMIT",
    Lock => "LOCK",
    Minus => "MINUS",
    Mod => "MOD",
    Not => "NOT",
    Null => "NULL",
    Offset => "OFFSET",
    On => "ON",
    Only => "ONLY",
    Optimize => "OPTIMIZE",
    Or => "OR",
    Order => "ORDER",
    Outer => "OUTER",
    Over => "OVER",
    Partition => "PARTITION",
    Password => "PASSWORD",
    Primary => "PRIMARY",
    Procedure => "PROCEDURE",
    References => "REFERENCES",
    Regexp => "REGEXP",
    Replace => "REPLACE",
    Returning => "RETURNING",
    Revoke => "REVOKE",
    Right => "RIGHT",
    Rlike => "RLIKE",
    Schema => "SCHEMA",
    Select => "SELECT",
    Sequence => "SEQUENCE",
    Set => "SET",
    Show => "SHOW",
    Similar => "SIMILAR",
    Some => "SOME",
    Table => "TABLE",
    Tablespace => "TABLESPACE",
    Then => "THEN",
    To => "TO",
    Trigger => "TRIGGER",
    True => "TRUE",
    Truncate => "TRUNCATE",
    Union => "UNION",
    Unique => "UNIQUE",
    Update => "UPDATE",
    Use => "USE",
    User => "USER",
    Using => "USING",
    Values => "VALUES",
    View => "VIEW",
    When => "WHEN",
    Where => "WHERE",
    Window => "WINDOW",
    With => "WITH",
    Xor => "XOR",

    // Punctuation
    LParen => "LPAREN",
    RParen => "RPAREN",
    LBrace => "LBRACE",
    RBrace => "RBRACE",
    LBracket => "LBRACKET",
    RBracket => "RBRACKET",
    Semi => "SEMI",
    Comma => "COMMA",
    Dot => "DOT",
    DotDot => "DOTDOT",
    DotDotDot => "DOTDOTDOT",
    ColonEq => "COLONEQ",
    ColonColon => "COLONCOLON",

    // Operators
    Plus => "PLUS",
    Sub => "SUB",
    SubGt => "SUBGT",
    SubGtGt => "SUBGTGT",
    Star => "STAR",
    Slash => "SLASH",
    Amp => "AMP",
    AmpAmp => "AMPAMP",
    Bar => "BAR",
    BarBar => "BARBAR",
    BarSlash => "BARSLASH",
    BarBarSlash => "BARBARSLASH",
    Caret => "CARET",
    CaretEq => "CARETEQ",
    Percent => "PERCENT",
    Eq => "EQ",
    EqEq => "EQEQ",
    EqGt => "EQGT",
    Gt => "GT",
    GtEq => "GTEQ",
    GtGt => "GTGT",
    Lt => "LT",
    LtEq => "LTEQ",
    LtEqGt => "LTEQGT",
    LtGt => "LTGT",
    LtLt => "LTLT",
    LtMonkeysAt => "LT_MONKEYS_AT",
    LtSubGt => "LT_SUB_GT",
    Bang => "BANG",
    BangEq => "BANGEQ",
    BangGt => "BANGGT",
    BangLt => "BANGLT",
    BangBang => "BANGBANG",
    BangTilde => "BANG_TILDE",
    BangTildeStar => "BANG_TILDE_STAR",
    Tilde => "TILDE",
    TildeStar => "TILDE_STAR",
    TildeEq => "TILDE_EQ",
    Ques => "QUES",
    QuesQues => "QUESQUES",
    QuesBar => "QUESBAR",
    QuesAmp => "QUESAMP",
    MonkeysAtGt => "MONKEYS_AT_GT",
}

impl Token {
    /// Literal tokens that `parameterize` replaces with `?`.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::LiteralInt
                | Self::LiteralFloat
                | Self::LiteralHex
                | Self::LiteralChars
                | Self::LiteralNChars
                | Self::LiteralAlias
        )
    }

    /// Reserved and non-reserved words, `ALL` through `WITH`.
    pub fn is_keyword(self) -> bool {
        (Self::All as u16..=Self::With as u16).contains(&(self as u16))
    }

    pub fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::MultiLineComment)
    }

    /// Tokens whose decoded value is meaningful text (as opposed to a fixed spelling).
    pub fn carries_text(self) -> bool {
        matches!(
            self,
            Self::Identifier | Self::LiteralAlias | Self::LiteralChars | Self::LiteralNChars
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(Token::LiteralInt.name(), "LITERAL_INT");
        assert_eq!(Token::Select.name(), "SELECT");
        assert_eq!(Token::BangTildeStar.name(), "BANG_TILDE_STAR");
        assert_eq!(Token::Eof.to_string(), "EOF");
    }

    #[test]
    fn test_literal_classification() {
        assert!(Token::LiteralHex.is_literal());
        assert!(Token::LiteralAlias.is_literal());
        assert!(!Token::Identifier.is_literal());
        assert!(!Token::Variant.is_literal());
    }

    #[test]
    fn test_keyword_classification() {
        assert!(Token::All.is_keyword());
        assert!(Token::Select.is_keyword());
        assert!(Token::With.is_keyword());
        assert!(!Token::Identifier.is_keyword());
        assert!(!Token::LParen.is_keyword());
        assert!(!Token::MultiLineComment.is_keyword());
    }

    #[test]
    fn test_comment_classification() {
        assert!(Token::LineComment.is_comment());
        assert!(Token::MultiLineComment.is_comment());
        assert!(!Token::Slash.is_comment());
    }

    #[test]
    fn test_carries_text() {
        assert!(Token::Identifier.carries_text());
        assert!(Token::LiteralChars.carries_text());
        assert!(!Token::Select.carries_text());
    }
}
