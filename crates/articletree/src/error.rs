use crate::model::ArticleId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Cannot insert an empty block")]
    EmptyBlock,

    #[error("Article {0} is already a member of this outline")]
    AlreadyMember(ArticleId),

    #[error("Parent {0} is not a member of this outline")]
    UnknownParent(ArticleId),

    #[error("Article {0} is not a member of this outline")]
    UnknownArticle(ArticleId),

    #[error("Index {index} is not a valid insertion point{}", fmt_parent(.parent))]
    MisplacedIndex {
        index: usize,
        parent: Option<ArticleId>,
    },

    #[error("Index 0 is reserved for the existing root")]
    RootReplacement,

    #[error("The root can only be removed when it is the last article")]
    RootRemovalDenied,

    #[error("Identity {0} is already in use")]
    DuplicateIdentity(ArticleId),

    #[error("Index {index} is out of bounds (len {len})")]
    OutOfBounds { index: usize, len: usize },

    #[error("Block head states parent {found:?}, expected {expected:?}")]
    ParentMismatch {
        expected: Option<ArticleId>,
        found: Option<ArticleId>,
    },

    #[error("Block is not a contiguous subtree (position {position})")]
    MalformedBlock { position: usize },

    #[error("Invalid depth {depth} at position {position}")]
    InvalidDepth { position: usize, depth: usize },

    #[error("Cannot move article {0} under itself or one of its descendants")]
    CyclicMove(ArticleId),

    #[error("Outline is inconsistent: {0}")]
    Inconsistent(String),

    #[error("History is out of sync with the outline: {0}")]
    StaleHistory(String),

    #[error("Config error: {0}")]
    Config(String),
}

fn fmt_parent(parent: &Option<ArticleId>) -> String {
    match parent {
        Some(id) => format!(" under {}", id),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;
