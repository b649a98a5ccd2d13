use std::collections::HashMap;
use std::hash::{BuildHasherDefault, Hasher};
use std::sync::LazyLock;

use phf::phf_map;

use crate::fnv::fnv1a_64_lower;
use crate::token::Token;

/// Keys are already FNV hashes, so the map hashes them as-is.
#[derive(Default)]
pub struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (self.0 << 8) | u64::from(b);
        }
    }

    fn write_u64(&mut self, n: u64) {
        self.0 = n;
    }
}

type HashKeyed = HashMap<u64, Token, BuildHasherDefault<IdentityHasher>>;

/// Immutable keyword lookup keyed by the case-folded FNV hash of the word.
#[derive(Debug)]
pub struct KeywordTable {
    map: HashKeyed,
}

impl KeywordTable {
    fn build(lists: &[&phf::Map<&'static str, Token>]) -> Self {
        let mut map = HashKeyed::default();
        for list in lists {
            for (word, token) in list.entries() {
                map.insert(fnv1a_64_lower(word), *token);
            }
        }
        Self { map }
    }

    /// Single probe. `None` means the word is an identifier.
    #[inline]
    pub fn get_keyword(&self, hash_lower: u64) -> Option<Token> {
        self.map.get(&hash_lower).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.map.contains_key(&fnv1a_64_lower(word))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

static ANSI_WORDS: phf::Map<&'static str, Token> = phf_map! {
    "all" => Token::All,
    "alter" => Token::Alter,
    "and" => Token::And,
    "any" => Token::Any,
    "as" => Token::As,
    "asc" => Token::Asc,
    "between" => Token::Between,
    "by" => Token::By,
    "case" => Token::Case,
    "cast" => Token::Cast,
    "check" => Token::Check,
    "column" => Token::Column,
    "comment" => Token::Comment,
    "constraint" => Token::Constraint,
    "create" => Token::Create,
    "database" => Token::Database,
    "declare" => Token::Declare,
    "default" => Token::Default,
    "delete" => Token::Delete,
    "desc" => Token::Desc,
    "disable" => Token::Disable,
    "distinct" => Token::Distinct,
    "do" => Token::Do,
    "drop" => Token::Drop,
    "else" => Token::Else,
    "enable" => Token::Enable,
    "end" => Token::End,
    "escape" => Token::Escape,
    "except" => Token::Except,
    "exists" => Token::Exists,
    "explain" => Token::Explain,
    "false" => Token::False,
    "fetch" => Token::Fetch,
    "for" => Token::For,
    "foreign" => Token::Foreign,
    "from" => Token::From,
    "full" => Token::Full,
    "function" => Token::Function,
    "grant" => Token::Grant,
    "group" => Token::Group,
    "having" => Token::Having,
    "in" => Token::In,
    "index" => Token::Index,
    "inner" => Token::Inner,
    "insert" => Token::Insert,
    "intersect" => Token::Intersect,
    "interval" => Token::Interval,
    "into" => Token::Into,
    "is" => Token::Is,
    "join" => Token::Join,
    "key" => Token::Key,
    "left" => Token::Left,
    "like" => Token::Like,
    "lock" => Token::Lock,
    "minus" => Token::Minus,
    "not" => Token::Not,
    "null" => Token::Null,
    "on" => Token::On,
    "or" => Token::Or,
    "order" => Token::Order,
    "outer" => Token::Outer,
    "over" => Token::Over,
    "partition" => Token::Partition,
    "primary" => Token::Primary,
    "procedure" => Token::Procedure,
    "references" => Token::References,
    "replace" => Token::Replace,
    "revoke" => Token::Revoke,
    "right" => Token::Right,
    "schema" => Token::Schema,
    "select" => Token::Select,
    "sequence" => Token::Sequence,
    "set" => Token::Set,
    "some" => Token::Some,
    "table" => Token::Table,
    "tablespace" => Token::Tablespace,
    "then" => Token::Then,
    "to" => Token::To,
    "trigger" => Token::Trigger,
    "true" => Token::True,
    "truncate" => Token::Truncate,
    "union" => Token::Union,
    "unique" => Token::Unique,
    "update" => Token::Update,
    "use" => Token::Use,
    "user" => Token::User,
    "using" => Token::Using,
    "values" => Token::Values,
    "view" => Token::View,
    "when" => Token::When,
    "where" => Token::Where,
    "with" => Token::With,
};

static MYSQL_WORDS: phf::Map<&'static str, Token> = phf_map! {
    "analyze" => Token::Analyze,
    "binary" => Token::Binary,
    "div" => Token::Div,
    "dual" => Token::Dual,
    "identified" => Token::Identified,
    "kill" => Token::Kill,
    "limit" => Token::Limit,
    "mod" => Token::Mod,
    "optimize" => Token::Optimize,
    "password" => Token::Password,
    "regexp" => Token::Regexp,
    "rlike" => Token::Rlike,
    "show" => Token::Show,
    "xor" => Token::Xor,
};

static POSTGRES_WORDS: phf::Map<&'static str, Token> = phf_map! {
    "analyze" => Token::Analyze,
    "ilike" => Token::Ilike,
    "limit" => Token::Limit,
    "offset" => Token::Offset,
    "only" => Token::Only,
    "returning" => Token::Returning,
    "similar" => Token::Similar,
    "window" => Token::Window,
};

static SQLITE_WORDS: phf::Map<&'static str, Token> = phf_map! {
    "all" => Token::All,
    "alter" => Token::Alter,
    "and" => Token::And,
    "as" => Token::As,
    "asc" => Token::Asc,
    "between" => Token::Between,
    "by" => Token::By,
    "case" => Token::Case,
    "cast" => Token::Cast,
    "check" => Token::Check,
    "constraint" => Token::Constraint,
    "create" => Token::Create,
    "default" => Token::Default,
    "delete" => Token::Delete,
    "desc" => Token::Desc,
    "distinct" => Token::Distinct,
    "drop" => Token::Drop,
    "else" => Token::Else,
    "end" => Token::End,
    "escape" => Token::Escape,
    "except" => Token::Except,
    "exists" => Token::Exists,
    "explain" => Token::Explain,
    "foreign" => Token::Foreign,
    "from" => Token::From,
    "group" => Token::Group,
    "having" => Token::Having,
    "in" => Token::In,
    "index" => Token::Index,
    "inner" => Token::Inner,
    "insert" => Token::Insert,
    "intersect" => Token::Intersect,
    "into" => Token::Into,
    "is" => Token::Is,
    "join" => Token::Join,
    "key" => Token::Key,
    "left" => Token::Left,
    "like" => Token::Like,
    "limit" => Token::Limit,
    "not" => Token::Not,
    "null" => Token::Null,
    "offset" => Token::Offset,
    "on" => Token::On,
    "or" => Token::Or,
    "order" => Token::Order,
    "outer" => Token::Outer,
    "primary" => Token::Primary,
    "references" => Token::References,
    "replace" => Token::Replace,
    "select" => Token::Select,
    "set" => Token::Set,
    "table" => Token::Table,
    "then" => Token::Then,
    "trigger" => Token::Trigger,
    "union" => Token::Union,
    "unique" => Token::Unique,
    "update" => Token::Update,
    "using" => Token::Using,
    "values" => Token::Values,
    "view" => Token::View,
    "when" => Token::When,
    "where" => Token::Where,
    "with" => Token::With,
};

pub static ANSI: LazyLock<KeywordTable> = LazyLock::new(|| KeywordTable::build(&[&ANSI_WORDS]));
pub static MYSQL: LazyLock<KeywordTable> =
    LazyLock::new(|| KeywordTable::build(&[&ANSI_WORDS, &MYSQL_WORDS]));
pub static POSTGRES: LazyLock<KeywordTable> =
    LazyLock::new(|| KeywordTable::build(&[&ANSI_WORDS, &POSTGRES_WORDS]));
pub static SQLITE: LazyLock<KeywordTable> =
    LazyLock::new(|| KeywordTable::build(&[&SQLITE_WORDS]));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        for word in ["select", "SELECT", "SeLeCt"] {
            assert_eq!(ANSI.get_keyword(fnv1a_64_lower(word)), Some(Token::Select));
        }
        assert_eq!(ANSI.get_keyword(fnv1a_64_lower("orders")), None);
    }

    #[test]
    fn test_dialect_extras() {
        let limit = fnv1a_64_lower("limit");
        assert_eq!(ANSI.get_keyword(limit), None);
        assert_eq!(MYSQL.get_keyword(limit), Some(Token::Limit));
        assert_eq!(POSTGRES.get_keyword(limit), Some(Token::Limit));
        assert_eq!(SQLITE.get_keyword(limit), Some(Token::Limit));

        assert!(MYSQL.contains("dual"));
        assert!(!POSTGRES.contains("dual"));
        assert!(POSTGRES.contains("ILIKE"));
        assert!(!MYSQL.contains("ilike"));
    }

    #[test]
    fn test_sqlite_is_reduced() {
        assert!(SQLITE.len() < ANSI.len());
        assert!(!SQLITE.contains("grant"));
        assert!(SQLITE.contains("select"));
    }

    #[test]
    fn test_tables_are_superset() {
        for (word, token) in ANSI_WORDS.entries() {
            assert_eq!(MYSQL.get_keyword(fnv1a_64_lower(word)), Some(*token));
        }
        assert_eq!(MYSQL.len(), ANSI_WORDS.len() + MYSQL_WORDS.len());
    }
}
