//! # Command Layer
//!
//! Structural edits an outline editor offers, each composed only of the two store
//! primitives (`remove_subtree` / `insert_subtree`). Commands:
//!
//! - take an `&mut Outline` and plain ids, never positions chosen by a UI
//! - record every primitive they run into a [`Transaction`], so the caller can hand it to
//!   a [`crate::history::History`]
//! - are atomic: when a later step fails, the steps already applied are reverted before
//!   the error is returned
//! - return a [`CmdResult`] with the affected ids and structured messages. They never
//!   print, and a no-op (e.g. moving the first child up) is an info message, not an error.
//!
//! ## Command Modules
//!
//! - [`create`]: Add a root, a child or a sibling
//! - [`delete`]: Remove a subtree
//! - [`moves`]: Move up/down, indent/outdent, reparent
//! - [`sort`]: Reorder the children of an article
//! - [`clipboard`]: Copy, cut, paste and duplicate subtrees
//! - [`helpers`]: Shared lookups (sibling lists, title formatting)

use crate::error::Result;
use crate::history::Transaction;
use crate::model::ArticleId;
use crate::store::Outline;
use serde::Serialize;
use tracing::warn;

pub mod clipboard;
pub mod create;
pub mod delete;
pub mod helpers;
pub mod moves;
pub mod sort;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug)]
pub struct CmdResult {
    /// Primitives the command ran, ready to be recorded for undo. Empty for no-ops.
    pub transaction: Transaction,
    pub affected: Vec<ArticleId>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn new(transaction: Transaction) -> Self {
        Self {
            transaction,
            affected: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// A result that changed nothing, with a single info message explaining why.
    pub fn unchanged(label: &str, message: impl Into<String>) -> Self {
        let mut result = Self::new(Transaction::new(label));
        result.add_message(CmdMessage::info(message));
        result
    }

    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, affected: Vec<ArticleId>) -> Self {
        self.affected = affected;
        self
    }

    pub fn is_noop(&self) -> bool {
        self.transaction.is_empty()
    }
}

/// Runs `edit`, recording into a fresh transaction. If `edit` fails, whatever it already
/// applied is reverted and the outline is back to where it started.
pub(crate) fn atomic<T, F>(outline: &mut Outline, label: &str, edit: F) -> Result<(Transaction, T)>
where
    F: FnOnce(&mut Outline, &mut Transaction) -> Result<T>,
{
    let mut transaction = Transaction::new(label);
    match edit(outline, &mut transaction) {
        Ok(value) => Ok((transaction, value)),
        Err(err) => {
            if !transaction.is_empty() {
                warn!(label, error = %err, "command failed midway, rolling back");
                transaction.rollback(outline);
            }
            Err(err)
        }
    }
}
