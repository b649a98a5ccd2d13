use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sqlscan::{tokenize, Dialect, Lexer, Mode, SqlParser, Token};

const SMALL: &str = "SELECT a, b, c FROM my_table WHERE x = 1 AND y > 2 ORDER BY a\n";

const STATEMENT: &str = "\
-- nightly rollup
SELECT o.id, o.customer_id AS cust, SUM(l.amount) total, 'it''s' note
FROM orders o
INNER JOIN order_lines l ON l.order_id = o.id
WHERE o.created_at >= '2024-01-01' AND o.status IN ('paid', 'shipped')
GROUP BY o.id, o.customer_id
ORDER BY total DESC;
INSERT INTO audit (id, customer_id, amount, note) VALUES (1, 42, 3.14, 'ok'), (2, 43, 0x1F, NULL);
";

fn large_input() -> String {
    STATEMENT.repeat(500)
}

/// Count tokens with the general entry point only.
fn scan_general(sql: &str) -> usize {
    let mut lexer = Lexer::new(sql, Dialect::Ansi);
    let mut n = 0;
    loop {
        lexer.next_token().unwrap();
        if lexer.token() == Token::Eof {
            return n;
        }
        n += 1;
    }
}

/// Count tokens the way a parser walking a VALUES list would, using the
/// context-specific entry points.
fn scan_values_fast(sql: &str) -> usize {
    let mut lexer = Lexer::new(sql, Dialect::Ansi);
    let mut n = 0;
    lexer.next_token().unwrap();
    while lexer.token() != Token::Eof {
        n += 1;
        match lexer.token() {
            Token::LParen | Token::Comma => lexer.next_token_value().unwrap(),
            Token::LiteralInt | Token::LiteralChars | Token::LiteralFloat | Token::LiteralHex | Token::Null => {
                lexer.next_token_comma_value().unwrap()
            }
            _ => lexer.next_token().unwrap(),
        }
    }
    n
}

fn values_input() -> String {
    let mut sql = String::from("INSERT INTO t (a, b, c, d) VALUES ");
    for i in 0..2000 {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&format!("({}, 'name {}', {}.5, NULL)", i, i, i));
    }
    sql
}

fn bench_scan_small(c: &mut Criterion) {
    c.bench_function("scan_small", |b| b.iter(|| scan_general(black_box(SMALL))));
}

fn bench_scan_large(c: &mut Criterion) {
    let sql = large_input();
    c.bench_function("scan_large", |b| b.iter(|| scan_general(black_box(&sql))));
}

fn bench_tokenize_large(c: &mut Criterion) {
    let sql = large_input();
    let mode = Mode::default();
    c.bench_function("tokenize_large", |b| {
        b.iter(|| tokenize(black_box(&sql), black_box(&mode)).unwrap())
    });
}

/// Fast path and general path side by side over the same VALUES list.
fn bench_fast_path(c: &mut Criterion) {
    let sql = values_input();
    assert_eq!(scan_general(&sql), scan_values_fast(&sql));

    let mut group = c.benchmark_group("values_list");
    group.bench_function("general", |b| b.iter(|| scan_general(black_box(&sql))));
    group.bench_function("fast_path", |b| {
        b.iter(|| scan_values_fast(black_box(&sql)))
    });
    group.finish();
}

fn bench_select_items(c: &mut Criterion) {
    let sql = "SELECT a, b AS bee, count(*) n, CASE WHEN x THEN 1 END flag FROM t LIMIT 10";
    c.bench_function("select_items", |b| {
        b.iter(|| {
            let mut parser = SqlParser::new(black_box(sql), Dialect::Ansi).unwrap();
            parser.accept(Token::Select).unwrap();
            parser.parse_select_items().unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_scan_small,
    bench_scan_large,
    bench_tokenize_large,
    bench_fast_path,
    bench_select_items
);
criterion_main!(benches);
