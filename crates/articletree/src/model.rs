//! # Domain Model: Articles
//!
//! An [`Article`] is a single content-bearing unit of an outline document. Structurally it
//! is nothing more than an identity ([`ArticleId`]) and a parent relation; everything a
//! user actually sees lives in the opaque [`ArticleData`] payload.
//!
//! ## Parent Links Are Relations, Not Ownership
//!
//! `Article::parent` stores the parent's *id*, never a pointer. Children are not stored at
//! all: they are derived from the pre-order layout of the owning [`crate::store::Outline`].
//! This keeps an article trivially movable between stores and between the store and an
//! undo log or clipboard.
//!
//! ## Lifecycle
//!
//! ```text
//! detached ──insert_subtree──▶ owned by an Outline ──remove_subtree──▶ detached
//! ```
//!
//! A detached article is a plain value. Inserting it moves it into the store; removing it
//! moves it back out, with the head of the removed block losing its parent link while the
//! links inside the block are kept intact.
//!
//! ## Titles
//!
//! Titles are trimmed on the way in. For list displays, [`ArticleData::display_title`]
//! truncates to 60 characters (59 chars + ellipsis `…`), the full title is kept as is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const DISPLAY_TITLE_LIMIT: usize = 60;

/// Globally unique article identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(Uuid);

impl ArticleId {
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Deterministic id built from a counter value.
    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ArticleId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The payload carried by an article. Opaque to the structural algorithms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleData {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ArticleData {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            title: normalize_title(&title.into()),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self::new(title, String::new())
    }

    /// Title truncated for list and tree displays.
    pub fn display_title(&self) -> String {
        if self.title.chars().count() > DISPLAY_TITLE_LIMIT {
            let truncated: String = self.title.chars().take(DISPLAY_TITLE_LIMIT - 1).collect();
            format!("{}…", truncated)
        } else {
            self.title.clone()
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = normalize_title(title);
        self.touch();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Titles are single-line: the first non-empty line, trimmed.
pub fn normalize_title(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub(crate) id: ArticleId,
    pub(crate) parent: Option<ArticleId>,
    pub data: ArticleData,
}

impl Article {
    /// Creates a detached article.
    pub fn new(id: ArticleId, data: ArticleData) -> Self {
        Self {
            id,
            parent: None,
            data,
        }
    }

    /// Creates a detached article that states `parent` as its parent. Used to assemble
    /// blocks for `insert_subtree` outside of a store.
    pub fn with_parent(id: ArticleId, parent: ArticleId, data: ArticleData) -> Self {
        Self {
            id,
            parent: Some(parent),
            data,
        }
    }

    /// Builder-style variant of [`Article::with_parent`] for an existing detached article.
    pub fn child_of(mut self, parent: ArticleId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn id(&self) -> ArticleId {
        self.id
    }

    pub fn parent(&self) -> Option<ArticleId> {
        self.parent
    }

    pub fn title(&self) -> &str {
        &self.data.title
    }

    /// Clears the parent link of a detached article, e.g. the head of a clipboard block
    /// before it is pasted somewhere else.
    pub fn detach(&mut self) {
        self.parent = None;
    }
}
