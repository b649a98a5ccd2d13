use serde::Deserialize;

use crate::dialect::Dialect;
use crate::error::ScanError;

/// Mode holds every scanner and runner setting for sqlscan.
#[derive(Debug, Clone, Deserialize)]
pub struct Mode {
    #[serde(default = "default_dialect")]
    pub dialect_name: String,

    /// Record comment text so the parser can attach it to tokens.
    #[serde(default)]
    pub keep_comments: bool,

    /// Discard comments instead of surfacing them as tokens.
    #[serde(default = "default_true")]
    pub skip_comments: bool,

    /// When false, any comment is a security violation.
    #[serde(default = "default_true")]
    pub allow_comments: bool,

    /// Reject comments whose text looks like injected SQL.
    #[serde(default)]
    pub safe_comments_only: bool,

    /// Remove name quotes from identifiers used as aliases.
    #[serde(default)]
    pub strip_name_quotes: bool,

    #[serde(default)]
    pub use_insert_columns_cache: bool,

    /// Glob patterns to exclude.
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub quiet: bool,

    #[serde(default)]
    pub no_color: bool,

    #[serde(default)]
    pub force_color: bool,

    /// Number of threads for parallel processing (0 = all cores).
    #[serde(default)]
    pub threads: usize,

    #[serde(default)]
    pub single_process: bool,
}

fn default_dialect() -> String {
    "ansi".to_string()
}

fn default_true() -> bool {
    true
}

impl Mode {
    /// Resolve the configured dialect_name.
    pub fn dialect(&self) -> Result<Dialect, ScanError> {
        Dialect::from_name(&self.dialect_name)
    }

    /// Whether color output is enabled.
    pub fn color(&self) -> bool {
        if self.force_color {
            return true;
        }
        if self.no_color {
            return false;
        }
        std::env::var_os("NO_COLOR").is_none()
    }

    /// SQL file extensions to process.
    pub fn sql_extensions(&self) -> &[&str] {
        &["sql", "ddl", "dml"]
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self {
            dialect_name: default_dialect(),
            keep_comments: false,
            skip_comments: true,
            allow_comments: true,
            safe_comments_only: false,
            strip_name_quotes: false,
            use_insert_columns_cache: false,
            exclude: Vec::new(),
            verbose: false,
            quiet: false,
            no_color: false,
            force_color: false,
            threads: 0,
            single_process: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode() {
        let mode = Mode::default();
        assert_eq!(mode.dialect_name, "ansi");
        assert!(mode.skip_comments);
        assert!(mode.allow_comments);
        assert!(!mode.keep_comments);
        assert!(!mode.safe_comments_only);
        assert!(!mode.use_insert_columns_cache);
    }

    #[test]
    fn test_dialect_resolution() {
        let mode = Mode::default();
        assert_eq!(mode.dialect().unwrap(), Dialect::Ansi);

        let mode = Mode {
            dialect_name: "mysql".to_string(),
            ..Mode::default()
        };
        assert_eq!(mode.dialect().unwrap(), Dialect::MySql);

        let mode = Mode {
            dialect_name: "cobol".to_string(),
            ..Mode::default()
        };
        assert!(mode.dialect().is_err());
    }

    #[test]
    fn test_color_logic() {
        let mut mode = Mode {
            force_color: true,
            ..Mode::default()
        };
        assert!(mode.color());

        mode.force_color = false;
        mode.no_color = true;
        assert!(!mode.color());

        mode.force_color = true;
        assert!(mode.color()); // force_color overrides no_color
    }

    #[test]
    fn test_deserialize_defaults() {
        let mode: Mode = toml::from_str("dialect_name = \"pg\"\nsafe_comments_only = true").unwrap();
        assert_eq!(mode.dialect().unwrap(), Dialect::PostgreSql);
        assert!(mode.safe_comments_only);
        assert!(mode.skip_comments);
    }
}
