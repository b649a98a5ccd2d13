use std::cell::RefCell;
use std::rc::Rc;

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::token::Token;

/// Fragments that make a comment unsafe under `safe_comments_only`.
const UNSAFE_FRAGMENTS: &[&str] = &[
    "select", "delete", "insert", "update", "into", "where", "or", "and", "union", "'", "=",
    ">", "<", "&", "|", "^",
];

pub type CommentList = SmallVec<[CompactString; 2]>;

/// Comments collected since the last read, split by where they attach.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
    /// Comments that precede the current token.
    pub before: CommentList,
    /// Comments on the same line as the previous token, trailing it.
    pub after: CommentList,
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }

    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub(crate) fn push(&mut self, text: &str, trailing: bool) {
        let text = CompactString::from(text);
        if trailing {
            self.after.push(text);
        } else {
            self.before.push(text);
        }
    }

    /// All comments in source order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.after.iter().chain(self.before.iter()).map(|c| c.as_str())
    }
}

/// Observes every comment before the safety gate runs.
///
/// `prev` is the last token produced before the comment and `text` excludes
/// the comment markers. Returning `true` accepts the comment and skips the
/// remaining checks for it.
pub trait CommentHandler {
    fn handle(&mut self, prev: Token, text: &str) -> bool;
}

impl<F> CommentHandler for F
where
    F: FnMut(Token, &str) -> bool,
{
    fn handle(&mut self, prev: Token, text: &str) -> bool {
        self(prev, text)
    }
}

/// Whether a comment's text is free of SQL-looking fragments.
pub fn is_safe_comment(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    !UNSAFE_FRAGMENTS.iter().any(|frag| lower.contains(frag))
}

/// Collects `/*+ ... */` optimizer hints.
///
/// Clones share the same hint list, so one copy can be installed on a lexer
/// while another reads the hints back.
#[derive(Debug, Clone, Default)]
pub struct HintCollector {
    hints: Rc<RefCell<Vec<CompactString>>>,
}

impl HintCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hints(&self) -> Vec<CompactString> {
        self.hints.borrow().clone()
    }
}

impl CommentHandler for HintCollector {
    fn handle(&mut self, _prev: Token, text: &str) -> bool {
        match text.strip_prefix('+') {
            Some(hint) => {
                self.hints.borrow_mut().push(CompactString::from(hint.trim()));
                true
            }
            None => false,
        }
    }
}
