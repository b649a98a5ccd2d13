use std::fmt;
use std::str::FromStr;

use crate::error::ScanError;
use crate::keywords::{self, KeywordTable};

/// A SQL dialect selects the keyword table and the lexical rules that differ
/// between database families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// The default dialect: standard keywords, no backslash escapes.
    #[default]
    Ansi,
    MySql,
    PostgreSql,
    /// Reduced keyword set.
    Sqlite,
}

impl Dialect {
    pub fn keywords(self) -> &'static KeywordTable {
        match self {
            Dialect::Ansi => &keywords::ANSI,
            Dialect::MySql => &keywords::MYSQL,
            Dialect::PostgreSql => &keywords::POSTGRES,
            Dialect::Sqlite => &keywords::SQLITE,
        }
    }

    /// Whether `\` starts an escape sequence inside string literals.
    pub fn backslash_escapes(self) -> bool {
        matches!(self, Dialect::MySql)
    }

    /// Whether `\%` and `\_` keep their backslash when decoded.
    pub fn preserves_like_escapes(self) -> bool {
        matches!(self, Dialect::MySql)
    }

    pub fn backtick_identifiers(self) -> bool {
        matches!(self, Dialect::MySql | Dialect::Sqlite)
    }

    /// Whether `#` starts a line comment (unless followed by `{`).
    pub fn hash_comments(self) -> bool {
        matches!(self, Dialect::MySql)
    }

    /// Whether `\N` is the NULL literal.
    pub fn backslash_null(self) -> bool {
        matches!(self, Dialect::MySql)
    }

    /// Whether `??`, `?|`, `?&` and `@>` are operators.
    pub fn pg_operators(self) -> bool {
        matches!(self, Dialect::PostgreSql)
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Ansi => "ansi",
            Dialect::MySql => "mysql",
            Dialect::PostgreSql => "postgresql",
            Dialect::Sqlite => "sqlite",
        }
    }

    /// Resolve a dialect from its name or a common alias.
    pub fn from_name(name: &str) -> Result<Self, ScanError> {
        match name.to_ascii_lowercase().as_str() {
            "ansi" | "default" | "sql" => Ok(Dialect::Ansi),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "postgresql" | "postgres" | "pg" => Ok(Dialect::PostgreSql),
            "sqlite" => Ok(Dialect::Sqlite),
            _ => Err(ScanError::Config(format!("Unknown dialect: {}", name))),
        }
    }
}

impl FromStr for Dialect {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Dialect::from_name("MySQL").unwrap(), Dialect::MySql);
        assert_eq!(Dialect::from_name("mariadb").unwrap(), Dialect::MySql);
        assert_eq!(Dialect::from_name("pg").unwrap(), Dialect::PostgreSql);
        assert_eq!("postgres".parse::<Dialect>().unwrap(), Dialect::PostgreSql);
        assert_eq!(Dialect::from_name("default").unwrap(), Dialect::Ansi);
        assert_eq!(Dialect::from_name("sqlite").unwrap(), Dialect::Sqlite);
        assert!(matches!(
            Dialect::from_name("oracle"),
            Err(ScanError::Config(_))
        ));
    }

    #[test]
    fn test_default_is_ansi() {
        assert_eq!(Dialect::default(), Dialect::Ansi);
        assert!(!Dialect::default().backslash_escapes());
    }

    #[test]
    fn test_lexical_rules() {
        assert!(Dialect::MySql.backslash_escapes());
        assert!(Dialect::MySql.hash_comments());
        assert!(Dialect::MySql.backtick_identifiers());
        assert!(Dialect::Sqlite.backtick_identifiers());
        assert!(!Dialect::PostgreSql.backtick_identifiers());
        assert!(Dialect::PostgreSql.pg_operators());
        assert!(!Dialect::Ansi.pg_operators());
    }

    #[test]
    fn test_name_round_trip() {
        for d in [Dialect::Ansi, Dialect::MySql, Dialect::PostgreSql, Dialect::Sqlite] {
            assert_eq!(Dialect::from_name(d.name()).unwrap(), d);
            assert_eq!(d.to_string(), d.name());
        }
    }
}
