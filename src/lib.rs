pub mod api;
pub mod char_types;
pub mod comment;
pub mod config;
pub mod dialect;
pub mod error;
pub mod fast_path;
pub mod fnv;
pub mod insert_columns_cache;
pub mod keywords;
pub mod lexer;
pub mod logging;
pub mod mode;
pub mod parser;
pub mod report;
pub mod savepoint;
pub mod string_utils;
pub mod symbol_table;
pub mod token;

// Re-export the main public API
pub use api::{get_matching_paths, parameterize, run, tokenize, TokenRecord};
pub use comment::{CommentHandler, Comments, HintCollector};
pub use config::load_config;
pub use dialect::Dialect;
pub use error::{ErrorContext, Result, ScanError};
pub use insert_columns_cache::InsertColumnsCache;
pub use keywords::KeywordTable;
pub use lexer::{Integer, Lexeme, Lexer};
pub use mode::Mode;
pub use parser::{SelectItem, SqlParser};
pub use savepoint::SavePoint;
pub use symbol_table::SymbolTable;
pub use token::Token;
