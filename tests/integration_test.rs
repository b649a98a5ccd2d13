use pretty_assertions::assert_eq;
use sqlscan::fnv::{fnv1a_64, fnv1a_64_lower};
use sqlscan::{
    tokenize, Dialect, HintCollector, Integer, Lexeme, Lexer, Mode, SelectItem, SqlParser,
    SymbolTable, Token,
};

fn default_mode() -> Mode {
    Mode::default()
}

fn tokens(sql: &str, dialect: Dialect) -> Vec<Token> {
    let mut lexer = Lexer::new(sql, dialect);
    let mut out = Vec::new();
    loop {
        lexer.next_token().unwrap();
        out.push(lexer.token());
        if lexer.token() == Token::Eof {
            return out;
        }
    }
}

/// `line:pos NAME text`, one token per line.
fn dump(sql: &str, mode: &Mode) -> String {
    tokenize(sql, mode)
        .unwrap()
        .iter()
        .map(|r| format!("{}:{} {} {}", r.line, r.pos, r.token, r.text))
        .collect::<Vec<_>>()
        .join("\n")
}

// ─── End-to-end scenarios ───

#[test]
fn test_select_arithmetic() {
    assert_eq!(
        tokens("SELECT 1+2", Dialect::Ansi),
        vec![
            Token::Select,
            Token::LiteralInt,
            Token::Plus,
            Token::LiteralInt,
            Token::Eof
        ]
    );

    let mut lexer = Lexer::new("SELECT 1+2", Dialect::Ansi);
    lexer.next_token().unwrap();
    lexer.next_token().unwrap();
    assert_eq!(lexer.integer_value().unwrap(), Integer::Int(1));
    lexer.next_token().unwrap();
    lexer.next_token().unwrap();
    assert_eq!(lexer.integer_value().unwrap(), Integer::Int(2));
}

#[test]
fn test_doubled_quote_string() {
    let records = tokenize("SELECT 'it''s'", &default_mode()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].token, Token::LiteralChars);
    assert_eq!(records[1].text, "it's");
}

#[test]
fn test_leading_comment_skipped() {
    let records = tokenize("-- c\nSELECT 1", &default_mode()).unwrap();
    let kinds: Vec<Token> = records.iter().map(|r| r.token).collect();
    assert_eq!(kinds, vec![Token::Select, Token::LiteralInt]);
}

#[test]
fn test_leading_comment_retained() {
    let mode = Mode {
        keep_comments: true,
        ..default_mode()
    };
    let mut lexer = Lexer::with_mode("-- c\nSELECT 1", &mode).unwrap();
    lexer.next_token().unwrap();
    assert_eq!(lexer.token(), Token::Select);
    let comments = lexer.read_and_reset_comments();
    assert_eq!(comments.iter().collect::<Vec<_>>(), vec![" c"]);
    assert_eq!(comments.before.len(), 1);
    assert!(comments.after.is_empty());
    assert_eq!(lexer.comment_count(), 1);
}

#[test]
fn test_injected_comment_rejected() {
    let mode = Mode {
        safe_comments_only: true,
        ..default_mode()
    };
    let err = tokenize("SELECT 1 -- ' OR 1=1", &mode).unwrap_err();
    assert!(err.is_security());
    let context = err.context().unwrap();
    assert_eq!(context.line, 1);
    assert_eq!(context.token, Token::LineComment);

    // Benign comments pass the same gate.
    assert!(tokenize("SELECT 1 -- nightly job", &mode).is_ok());
}

#[test]
fn test_hex_literal() {
    let mut lexer = Lexer::new("0x1F", Dialect::Ansi);
    lexer.next_token().unwrap();
    assert_eq!(lexer.token(), Token::LiteralHex);
    assert_eq!(lexer.hex_value().unwrap(), Integer::Int(31));
}

#[test]
fn test_dots_and_ranges() {
    assert_eq!(
        tokens("a.b..c", Dialect::Ansi),
        vec![
            Token::Identifier,
            Token::Dot,
            Token::Identifier,
            Token::DotDot,
            Token::Identifier,
            Token::Eof
        ]
    );
}

// ─── Properties ───

#[test]
fn test_plain_literal_is_zero_copy() {
    let sql = "SELECT 'plain'";
    let mut lexer = Lexer::new(sql, Dialect::Ansi);
    lexer.next_token().unwrap();
    lexer.next_token().unwrap();
    match lexer.lexeme() {
        Lexeme::Borrowed(s) => {
            assert_eq!(*s, "plain");
            assert_eq!(s.as_ptr(), sql[8..].as_ptr());
        }
        other => panic!("expected a borrowed lexeme, got {:?}", other),
    }
}

#[test]
fn test_case_variants_share_hash_lower() {
    let mut lexer = Lexer::new("Orders ORDERS orders", Dialect::Ansi);
    let mut seen = Vec::new();
    for _ in 0..3 {
        lexer.next_token().unwrap();
        seen.push((lexer.hash(), lexer.hash_lower()));
    }
    assert!(seen.iter().all(|&(_, lower)| lower == fnv1a_64_lower("orders")));
    assert_eq!(seen[2].0, fnv1a_64("orders"));
    assert_ne!(seen[0].0, seen[1].0);

    // Same input, same hashes, across lexers.
    let mut again = Lexer::new("Orders", Dialect::MySql);
    again.next_token().unwrap();
    assert_eq!((again.hash(), again.hash_lower()), seen[0]);
}

#[test]
fn test_interned_identifiers_are_shared() {
    let symbols = SymbolTable::new(64);
    let quotes = SymbolTable::new(16);
    let sql = "SELECT customer_name FROM t";

    let mut first = Lexer::new(sql, Dialect::Ansi).with_symbol_tables(&symbols, &quotes);
    first.next_token().unwrap();
    first.next_token().unwrap();
    let mut second = Lexer::new(sql, Dialect::PostgreSql).with_symbol_tables(&symbols, &quotes);
    second.next_token().unwrap();
    second.next_token().unwrap();

    match (first.lexeme(), second.lexeme()) {
        (Lexeme::Shared(a), Lexeme::Shared(b)) => assert!(std::sync::Arc::ptr_eq(a, b)),
        other => panic!("expected interned lexemes, got {:?}", other),
    }
    assert!(symbols.find_symbol(fnv1a_64("customer_name")).is_some());
}

#[test]
fn test_savepoint_round_trip() {
    let sql = "SELECT a /* x */, 'b''c' FROM t WHERE n = 0x1F";
    let mut lexer = Lexer::new(sql, Dialect::Ansi);
    lexer.next_token().unwrap();
    lexer.next_token().unwrap();
    let sp = lexer.mark();
    let before = (lexer.token(), lexer.string_val().to_string(), lexer.pos(), lexer.hash());

    let mut first = Vec::new();
    while lexer.token() != Token::Eof {
        lexer.next_token().unwrap();
        first.push((lexer.token(), lexer.string_val().to_string(), lexer.pos()));
    }

    lexer.reset(&sp);
    assert_eq!(
        (lexer.token(), lexer.string_val().to_string(), lexer.pos(), lexer.hash()),
        before
    );

    let mut second = Vec::new();
    while lexer.token() != Token::Eof {
        lexer.next_token().unwrap();
        second.push((lexer.token(), lexer.string_val().to_string(), lexer.pos()));
    }
    assert_eq!(first, second);
}

// ─── Alias policy ───

fn select_items(sql: &str, dialect: Dialect) -> Vec<SelectItem> {
    let mut parser = SqlParser::new(sql, dialect).unwrap();
    parser.accept(Token::Select).unwrap();
    parser.parse_select_items().unwrap()
}

#[test]
fn test_limit_never_aliases_a_select_item() {
    for dialect in [Dialect::Ansi, Dialect::MySql, Dialect::PostgreSql, Dialect::Sqlite] {
        let items = select_items("SELECT a, b LIMIT 10", dialect);
        assert!(items.iter().all(|i| i.alias.is_none()), "{:?}", dialect);
        assert_eq!(items.len(), 2);
    }
}

#[test]
fn test_limit_after_as_is_an_alias() {
    for dialect in [Dialect::Ansi, Dialect::MySql, Dialect::PostgreSql, Dialect::Sqlite] {
        let items = select_items("SELECT a AS LIMIT", dialect);
        assert_eq!(items[0].alias.as_deref(), Some("LIMIT"), "{:?}", dialect);
    }
}

#[test]
fn test_wildcard_select_items() {
    for dialect in [Dialect::Ansi, Dialect::MySql, Dialect::PostgreSql, Dialect::Sqlite] {
        let mut parser = SqlParser::new("SELECT *, t.* FROM t", dialect).unwrap();
        parser.accept(Token::Select).unwrap();
        let items = parser.parse_select_items().unwrap();
        let exprs: Vec<&str> = items.iter().map(|i| i.expr.as_str()).collect();
        assert_eq!(exprs, vec!["*", "t.*"], "{:?}", dialect);
        assert_eq!(parser.token(), Token::From);
    }
}

#[test]
fn test_parser_with_mode() {
    let mode = Mode {
        dialect_name: "mysql".to_string(),
        strip_name_quotes: true,
        ..default_mode()
    };
    let mut parser = SqlParser::with_mode("SELECT `Total` `t`, x FROM y", &mode).unwrap();
    parser.accept(Token::Select).unwrap();
    let items = parser.parse_select_items().unwrap();
    assert_eq!(items[0].expr, "`Total`");
    assert_eq!(items[0].alias.as_deref(), Some("t"));
    assert_eq!(parser.token(), Token::From);
}

// ─── Dialects and comments ───

#[test]
fn test_dialect_specific_lexing() {
    assert_eq!(
        tokens("x::int", Dialect::PostgreSql),
        vec![Token::Identifier, Token::ColonColon, Token::Identifier, Token::Eof]
    );
    assert_eq!(
        tokens("SELECT `a` FROM t # trailing", Dialect::MySql),
        vec![
            Token::Select,
            Token::Identifier,
            Token::From,
            Token::Identifier,
            Token::Eof
        ]
    );
    // LIMIT is a keyword in MySQL but a plain name in ANSI.
    assert_eq!(tokens("limit", Dialect::MySql)[0], Token::Limit);
    assert_eq!(tokens("limit", Dialect::Ansi)[0], Token::Identifier);
}

#[test]
fn test_optimizer_hints_are_collected() {
    let hints = HintCollector::new();
    let mut lexer = Lexer::new("SELECT /*+ INDEX(t idx) */ a FROM t", Dialect::MySql);
    lexer.set_safe_comments_only(true);
    lexer.set_comment_handler(hints.clone());
    loop {
        lexer.next_token().unwrap();
        if lexer.token() == Token::Eof {
            break;
        }
    }
    let hints: Vec<String> = hints.hints().iter().map(|h| h.to_string()).collect();
    assert_eq!(hints, vec!["INDEX(t idx)".to_string()]);
}

#[test]
fn test_token_dump_snapshot() {
    let sql = "SELECT id, 'it''s' AS v\nFROM t WHERE n >= 0x1F";
    insta::assert_snapshot!(dump(sql, &default_mode()), @r"
    1:0 SELECT SELECT
    1:7 IDENTIFIER id
    1:9 COMMA ,
    1:11 LITERAL_CHARS it's
    1:19 AS AS
    1:22 IDENTIFIER v
    2:24 FROM FROM
    2:29 IDENTIFIER t
    2:31 WHERE WHERE
    2:37 IDENTIFIER n
    2:39 GTEQ >=
    2:42 LITERAL_HEX 1F
    ");
}
