use std::fmt;

use thiserror::Error;

use crate::token::Token;

/// Where a fault happened, rendered into every scanner and parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Byte offset of the cursor when the fault was raised.
    pub pos: usize,
    /// 1-based line of the start of the offending token.
    pub line: usize,
    /// 1-based column of the start of the offending token.
    pub column: usize,
    pub token: Token,
    /// Decoded text of the current token, for identifiers and literals.
    pub text: Option<String>,
    /// A short window of source text around the token start.
    pub around: String,
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pos {}, line {}, column {}, token {}",
            self.pos, self.line, self.column, self.token
        )?;
        if let Some(ref text) = self.text {
            write!(f, " {}", text)?;
        }
        if !self.around.is_empty() {
            write!(f, ", near '{}'", self.around)?;
        }
        Ok(())
    }
}

/// User-facing errors.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Input that cannot be tokenized: unterminated literals or comments,
    /// malformed numbers. Always fatal to the current parse.
    #[error("sqlscan lexical error: {message}. {context}")]
    Lexical {
        message: String,
        context: Box<ErrorContext>,
    },

    /// Token mismatch against an expected production.
    #[error("sqlscan syntax error: {message}. {context}")]
    Syntax {
        message: String,
        context: Box<ErrorContext>,
    },

    /// A comment rejected by the active comment-safety policy.
    #[error("sqlscan security violation: {message}. {context}")]
    Security {
        message: String,
        context: Box<ErrorContext>,
    },

    #[error("sqlscan config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ScanError {
    pub fn is_lexical(&self) -> bool {
        matches!(self, Self::Lexical { .. })
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    pub fn is_security(&self) -> bool {
        matches!(self, Self::Security { .. })
    }

    /// Position context for scanner and parser faults.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Lexical { context, .. }
            | Self::Syntax { context, .. }
            | Self::Security { context, .. } => Some(context),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ErrorContext {
        ErrorContext {
            pos: 12,
            line: 2,
            column: 3,
            token: Token::Identifier,
            text: Some("foo".to_string()),
            around: "x foo".to_string(),
        }
    }

    #[test]
    fn test_context_display() {
        assert_eq!(
            context().to_string(),
            "pos 12, line 2, column 3, token IDENTIFIER foo, near 'x foo'"
        );
    }

    #[test]
    fn test_error_kinds() {
        let err = ScanError::Security {
            message: "comment not allowed".to_string(),
            context: Box::new(context()),
        };
        assert!(err.is_security());
        assert!(!err.is_lexical());
        assert_eq!(err.context().map(|c| c.line), Some(2));
        assert!(err.to_string().starts_with("sqlscan security violation"));

        let err = ScanError::Config("bad".to_string());
        assert!(err.context().is_none());
    }
}
