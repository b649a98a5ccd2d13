use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::dialect::Dialect;
use crate::error::ScanError;
use crate::mode::Mode;

const CONFIG_NAME: &str = "sqlscan.toml";

/// Load sqlscan configuration.
///
/// With no explicit path, the parents of the input files are searched for
/// `sqlscan.toml` (top-level keys) or `pyproject.toml` (`[tool.sqlscan]`),
/// then the user config directory.
pub fn load_config(files: &[PathBuf], config_path: Option<&Path>) -> Result<Mode, ScanError> {
    let mut mode = Mode::default();

    let config_file = match config_path {
        Some(path) => {
            if path.exists() {
                Some(path.to_path_buf())
            } else {
                return Err(ScanError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }
        None => find_config_file(files).or_else(user_config_file),
    };

    if let Some(path) = config_file {
        debug!(path = %path.display(), "loading config");
        let raw = load_config_from_path(&path)?;
        apply_config(&mut mode, &raw)?;
    }

    Ok(mode)
}

/// Search the parent directories of the given files, nearest first.
fn find_config_file(files: &[PathBuf]) -> Option<PathBuf> {
    for parent in get_common_parents(files) {
        let config = parent.join(CONFIG_NAME);
        if config.exists() {
            return Some(config);
        }
        let config = parent.join("pyproject.toml");
        if config.exists() && has_tool_section(&config) {
            return Some(config);
        }
    }
    None
}

fn user_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("sqlscan").join(CONFIG_NAME);
    path.exists().then_some(path)
}

fn has_tool_section(path: &Path) -> bool {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| content.parse::<toml::Value>().ok())
        .is_some_and(|value| value.get("tool").and_then(|t| t.get("sqlscan")).is_some())
}

/// Parent directories of the given file paths, ordered from most specific
/// to least specific.
fn get_common_parents(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut parents = Vec::new();

    for file in files {
        let parent = if file.is_dir() {
            file.clone()
        } else {
            file.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        };

        let mut current = Some(parent.as_path());
        while let Some(dir) = current {
            let dir_buf = dir.to_path_buf();
            if !parents.contains(&dir_buf) {
                parents.push(dir_buf);
            }
            current = dir.parent();
        }
    }

    parents
}

/// Load and parse a TOML config file.
fn load_config_from_path(path: &Path) -> Result<HashMap<String, toml::Value>, ScanError> {
    let content = std::fs::read_to_string(path)?;
    let parsed: toml::Value = content.parse()?;

    let is_own_file = path
        .file_name()
        .map(|n| n == CONFIG_NAME)
        .unwrap_or(false);
    let section = if is_own_file {
        Some(&parsed)
    } else {
        parsed.get("tool").and_then(|t| t.get("sqlscan"))
    };

    match section {
        Some(toml::Value::Table(table)) => Ok(table
            .iter()
            .map(|(k, v)| (k.to_lowercase().replace('-', "_"), v.clone()))
            .collect()),
        _ => Ok(HashMap::new()),
    }
}

const KNOWN_KEYS: &[&str] = &[
    "dialect",
    "keep_comments",
    "skip_comments",
    "allow_comments",
    "safe_comments_only",
    "strip_name_quotes",
    "use_insert_columns_cache",
    "exclude",
    "threads",
    "single_process",
];

fn expect_bool(config: &HashMap<String, toml::Value>, key: &str) -> Result<Option<bool>, ScanError> {
    match config.get(key) {
        None => Ok(None),
        Some(toml::Value::Boolean(b)) => Ok(Some(*b)),
        Some(other) => Err(ScanError::Config(format!(
            "Expected a boolean for {}, got {}",
            key,
            other.type_str()
        ))),
    }
}

/// Apply configuration values to a Mode.
fn apply_config(mode: &mut Mode, config: &HashMap<String, toml::Value>) -> Result<(), ScanError> {
    for key in config.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            return Err(ScanError::Config(format!("Unknown config option: {}", key)));
        }
    }

    if let Some(toml::Value::String(d)) = config.get("dialect") {
        Dialect::from_name(d)?;
        mode.dialect_name = d.clone();
    }

    if let Some(toml::Value::Array(arr)) = config.get("exclude") {
        mode.exclude = arr
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect();
    }

    if let Some(toml::Value::Integer(n)) = config.get("threads") {
        mode.threads = usize::try_from(*n)
            .map_err(|_| ScanError::Config(format!("Invalid thread count: {}", n)))?;
    }

    let flags: [(&str, &mut bool); 7] = [
        ("keep_comments", &mut mode.keep_comments),
        ("skip_comments", &mut mode.skip_comments),
        ("allow_comments", &mut mode.allow_comments),
        ("safe_comments_only", &mut mode.safe_comments_only),
        ("strip_name_quotes", &mut mode.strip_name_quotes),
        ("use_insert_columns_cache", &mut mode.use_insert_columns_cache),
        ("single_process", &mut mode.single_process),
    ];
    for (key, slot) in flags {
        if let Some(b) = expect_bool(config, key)? {
            *slot = b;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_config() {
        let mut mode = Mode::default();
        let mut config = HashMap::new();
        config.insert(
            "dialect".to_string(),
            toml::Value::String("mysql".to_string()),
        );
        config.insert("safe_comments_only".to_string(), toml::Value::Boolean(true));
        config.insert("threads".to_string(), toml::Value::Integer(4));

        apply_config(&mut mode, &config).unwrap();
        assert_eq!(mode.dialect_name, "mysql");
        assert!(mode.safe_comments_only);
        assert_eq!(mode.threads, 4);
    }

    #[test]
    fn test_unknown_config_key_error() {
        let mut mode = Mode::default();
        let mut config = HashMap::new();
        config.insert("line_length".to_string(), toml::Value::Integer(88));

        assert!(matches!(
            apply_config(&mut mode, &config),
            Err(ScanError::Config(_))
        ));
    }

    #[test]
    fn test_bad_types_and_dialects() {
        let mut mode = Mode::default();
        let mut config = HashMap::new();
        config.insert(
            "keep_comments".to_string(),
            toml::Value::String("yes".to_string()),
        );
        assert!(apply_config(&mut mode, &config).is_err());

        let mut config = HashMap::new();
        config.insert(
            "dialect".to_string(),
            toml::Value::String("oracle".to_string()),
        );
        assert!(apply_config(&mut mode, &config).is_err());
    }

    #[test]
    fn test_load_from_sqlscan_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_NAME),
            "dialect = \"postgres\"\nkeep-comments = true\n",
        )
        .unwrap();
        let file = dir.path().join("q.sql");
        std::fs::write(&file, "select 1").unwrap();

        let mode = load_config(&[file], None).unwrap();
        assert_eq!(mode.dialect_name, "postgres");
        assert!(mode.keep_comments);
    }

    #[test]
    fn test_load_from_pyproject() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pyproject.toml");
        std::fs::write(&path, "[tool.sqlscan]\nallow_comments = false\n").unwrap();

        let mode = load_config(&[], Some(&path)).unwrap();
        assert!(!mode.allow_comments);
    }

    #[test]
    fn test_missing_explicit_config() {
        let err = load_config(&[], Some(Path::new("/nonexistent/sqlscan.toml"))).unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }
}
