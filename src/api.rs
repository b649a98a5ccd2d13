use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::dialect::Dialect;
use crate::error::Result;
use crate::lexer::Lexer;
use crate::mode::Mode;
use crate::report::{FileResult, FileStatus, Report};
use crate::token::Token;

/// One scanned token, detached from the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub token: Token,
    pub text: String,
    /// Byte offset of the token start.
    pub pos: usize,
    /// 1-based line the token ends on.
    pub line: usize,
}

/// Tokenize a SQL string according to the given mode, up to and excluding EOF.
pub fn tokenize(source: &str, mode: &Mode) -> Result<Vec<TokenRecord>> {
    let mut lexer = Lexer::with_mode(source, mode)?;
    let mut records = Vec::new();
    loop {
        lexer.next_token()?;
        if lexer.token() == Token::Eof {
            return Ok(records);
        }
        records.push(TokenRecord {
            token: lexer.token(),
            text: lexer.string_val().to_string(),
            pos: lexer.start_pos(),
            line: lexer.line(),
        });
    }
}

/// Replace every literal and variable with `?`.
///
/// Double-quoted text counts as a literal. Input that does not scan cleanly
/// is returned unchanged.
pub fn parameterize(sql: &str, dialect: Dialect) -> String {
    let mut lexer = Lexer::new(sql, dialect);
    let mut out = String::with_capacity(sql.len());
    let mut copied = 0;
    loop {
        if lexer.next_token().is_err() {
            return sql.to_string();
        }
        match lexer.token() {
            Token::Eof => break,
            Token::Error => return sql.to_string(),
            token if token.is_literal() || token == Token::Variant => {
                out.push_str(&sql[copied..lexer.start_pos()]);
                out.push('?');
                copied = lexer.pos();
            }
            _ => {}
        }
    }
    out.push_str(&sql[copied..]);
    out
}

/// Scan a collection of files.
pub fn run(files: &[PathBuf], mode: &Mode) -> Report {
    let matching_paths = get_matching_paths(files, mode);
    let mut report = Report::new();

    if mode.single_process || matching_paths.len() <= 1 {
        for path in &matching_paths {
            report.add(scan_file(path, mode));
        }
        return report;
    }

    use rayon::prelude::*;

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(mode.threads)
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            debug!(error = %e, "thread pool unavailable, scanning sequentially");
            for path in &matching_paths {
                report.add(scan_file(path, mode));
            }
            return report;
        }
    };

    let results: Vec<FileResult> = pool.install(|| {
        matching_paths
            .par_iter()
            .map(|path| scan_file(path, mode))
            .collect()
    });
    for result in results {
        report.add(result);
    }
    report
}

/// Scan a single file.
fn scan_file(path: &Path, mode: &Mode) -> FileResult {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            return FileResult {
                path: path.to_path_buf(),
                status: FileStatus::Error,
                tokens: 0,
                error: Some(format!("Read error: {}", e)),
            };
        }
    };

    let result = match tokenize(&source, mode) {
        Ok(records) => FileResult {
            path: path.to_path_buf(),
            status: FileStatus::Scanned,
            tokens: records.len(),
            error: None,
        },
        Err(e) => FileResult {
            path: path.to_path_buf(),
            status: if e.is_security() {
                FileStatus::Rejected
            } else {
                FileStatus::Error
            },
            tokens: 0,
            error: Some(e.to_string()),
        },
    };
    debug!(
        path = %path.display(),
        status = ?result.status,
        tokens = result.tokens,
        "file scanned"
    );
    result
}

/// Get all SQL file paths that match the given inputs.
pub fn get_matching_paths(paths: &[PathBuf], mode: &Mode) -> Vec<PathBuf> {
    let extensions = mode.sql_extensions();
    let exclude: Vec<glob::Pattern> = mode
        .exclude
        .iter()
        .filter_map(|pattern| glob::Pattern::new(pattern).ok())
        .collect();
    let mut result = HashSet::new();

    for path in paths {
        if path.is_file() {
            if is_sql_file(path, extensions) {
                result.insert(path.clone());
            }
        } else if path.is_dir() {
            collect_sql_files(path, extensions, &exclude, &mut result);
        }
    }

    let mut sorted: Vec<PathBuf> = result.into_iter().collect();
    sorted.sort();
    sorted
}

/// Check if a file has a SQL extension.
fn is_sql_file(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext.as_str()))
}

/// Recursively collect SQL files from a directory.
fn collect_sql_files(
    dir: &Path,
    extensions: &[&str],
    exclude: &[glob::Pattern],
    result: &mut HashSet<PathBuf>,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        // Skip hidden directories and excluded patterns
        if name.starts_with('.') {
            continue;
        }
        if exclude
            .iter()
            .any(|p| p.matches(&name) || p.matches_path(&path))
        {
            continue;
        }

        if path.is_dir() {
            collect_sql_files(&path, extensions, exclude, result);
        } else if is_sql_file(&path, extensions) {
            result.insert(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple_select() {
        let records = tokenize("SELECT a\nFROM t", &Mode::default()).unwrap();
        let tokens: Vec<Token> = records.iter().map(|r| r.token).collect();
        assert_eq!(
            tokens,
            vec![Token::Select, Token::Identifier, Token::From, Token::Identifier]
        );
        assert_eq!(records[2].pos, 9);
        assert_eq!(records[2].line, 2);
        assert_eq!(records[1].text, "a");
    }

    #[test]
    fn test_tokenize_empty_string() {
        assert!(tokenize("  \n", &Mode::default()).unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_surfaces_comments_when_not_skipped() {
        let mode = Mode {
            skip_comments: false,
            ..Mode::default()
        };
        let records = tokenize("-- hi\nSELECT 1", &mode).unwrap();
        assert_eq!(records[0].token, Token::LineComment);
        assert_eq!(records[0].text, " hi");
    }

    #[test]
    fn test_tokenize_invalid_dialect() {
        let mode = Mode {
            dialect_name: "oracle".to_string(),
            ..Mode::default()
        };
        assert!(tokenize("SELECT 1", &mode).is_err());
    }

    #[test]
    fn test_parameterize() {
        assert_eq!(
            parameterize(
                "SELECT * FROM t WHERE id = 42 AND name = 'bob' AND x IN (:a, 0x1F)",
                Dialect::Ansi
            ),
            "SELECT * FROM t WHERE id = ? AND name = ? AND x IN (?, ?)"
        );
        assert_eq!(
            parameterize("SELECT a FROM t -- 1\nWHERE n = N'x' AND m = \"y\"", Dialect::Ansi),
            "SELECT a FROM t -- 1\nWHERE n = ? AND m = ?"
        );
    }

    #[test]
    fn test_parameterize_returns_input_on_failure() {
        assert_eq!(parameterize("SELECT 'open", Dialect::Ansi), "SELECT 'open");
        assert_eq!(parameterize("SELECT 1 ` 2", Dialect::Ansi), "SELECT 1 ` 2");
    }

    #[test]
    fn test_is_sql_file() {
        let extensions = &["sql", "ddl"];
        assert!(is_sql_file(Path::new("test.sql"), extensions));
        assert!(is_sql_file(Path::new("TEST.SQL"), extensions));
        assert!(is_sql_file(Path::new("schema.ddl"), extensions));
        assert!(!is_sql_file(Path::new("test.py"), extensions));
        assert!(!is_sql_file(Path::new("mysql"), extensions));
    }

    #[test]
    fn test_get_matching_paths_with_exclude() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.sql"), "select 1").unwrap();
        std::fs::write(dir.path().join("b.txt"), "select 1").unwrap();
        std::fs::create_dir(dir.path().join("vendor")).unwrap();
        std::fs::write(dir.path().join("vendor").join("c.sql"), "select 1").unwrap();
        std::fs::create_dir(dir.path().join(".hidden")).unwrap();
        std::fs::write(dir.path().join(".hidden").join("d.sql"), "select 1").unwrap();

        let mode = Mode::default();
        let all = get_matching_paths(&[dir.path().to_path_buf()], &mode);
        assert_eq!(all.len(), 2);

        let mode = Mode {
            exclude: vec!["vendor".to_string()],
            ..Mode::default()
        };
        let some = get_matching_paths(&[dir.path().to_path_buf()], &mode);
        assert_eq!(some, vec![dir.path().join("a.sql")]);
    }

    #[test]
    fn test_run_classifies_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ok.sql"), "SELECT 1").unwrap();
        std::fs::write(dir.path().join("bad.sql"), "SELECT 'x").unwrap();
        std::fs::write(dir.path().join("evil.sql"), "SELECT 1 -- ' or 1=1").unwrap();

        let mode = Mode {
            safe_comments_only: true,
            threads: 2,
            ..Mode::default()
        };
        let report = run(&[dir.path().to_path_buf()], &mode);
        assert_eq!(report.total(), 3);
        assert_eq!(report.scanned(), 1);
        assert_eq!(report.rejected(), 1);
        assert_eq!(report.errors(), 1);
    }
}
