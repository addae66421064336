//! # Undo / Redo
//!
//! History is built strictly on the two structural primitives. Every structural command
//! records what it did as a [`Transaction`]: an ordered list of [`EditStep`]s, each being
//! either "these nodes were inserted at `(parent, at)`" or "this block was
//! removed from `(parent, at)`".
//!
//! ## Symmetry
//!
//! Reverting a step performs the inverse primitive and yields the inverse step:
//!
//! ```text
//! Inserted { parent, at, ids }    ──revert──▶  Removed { parent, at, nodes }
//! Removed  { parent, at, nodes }  ──revert──▶  Inserted { parent, at, ids }
//! ```
//!
//! Reverting a transaction reverts its steps last-to-first and yields the inverse
//! transaction, so undo and redo are the same operation moving a transaction between
//! the two stacks of [`History`].
//!
//! ## Staleness
//!
//! Each step is checked against the current outline before anything is mutated. If the
//! outline was changed behind the history's back, the revert fails with
//! [`TreeError::StaleHistory`], the steps already reverted are re-applied, and the
//! transaction is dropped.

use crate::config::OutlineConfig;
use crate::error::{Result, TreeError};
use crate::model::{Article, ArticleId};
use crate::store::Outline;
use std::collections::VecDeque;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditStep {
    /// `ids` now occupy `at..at + ids.len()`, in order, as one or more sibling subtrees
    /// under `parent`.
    Inserted {
        parent: Option<ArticleId>,
        at: usize,
        ids: Vec<ArticleId>,
    },
    /// `nodes` used to start at `at` under `parent`.
    Removed {
        parent: Option<ArticleId>,
        at: usize,
        nodes: Vec<Article>,
    },
}

impl EditStep {
    /// Applies the inverse primitive and returns the inverse step. The outline is left
    /// unchanged on error.
    pub fn revert(self, outline: &mut Outline) -> Result<EditStep> {
        match self {
            EditStep::Inserted { parent, at, ids } => {
                let heads = inserted_heads(outline, parent, at, &ids)?;
                let mut nodes = Vec::with_capacity(ids.len());
                for _ in 0..heads {
                    nodes.extend(outline.remove_subtree(at)?);
                }
                Ok(EditStep::Removed { parent, at, nodes })
            }
            EditStep::Removed {
                parent,
                at,
                mut nodes,
            } => {
                // Blocks removed head by head come back as a forest: every top-level
                // head lost its parent link on the way out.
                if let Some(parent) = parent {
                    for node in nodes.iter_mut().skip(1) {
                        if node.parent.is_none() {
                            node.parent = Some(parent);
                        }
                    }
                }
                outline
                    .check_insert(parent, at, &nodes)
                    .map_err(|err| TreeError::StaleHistory(err.to_string()))?;
                let ids = nodes.iter().map(Article::id).collect();
                outline.insert_subtree(parent, at, nodes)?;
                Ok(EditStep::Inserted { parent, at, ids })
            }
        }
    }
}

/// Number of sibling subtrees making up `at..at + ids.len()`, after checking that the
/// range still holds exactly `ids`, as whole subtrees under `parent`.
fn inserted_heads(
    outline: &Outline,
    parent: Option<ArticleId>,
    at: usize,
    ids: &[ArticleId],
) -> Result<usize> {
    let end = at + ids.len();
    if ids.is_empty() || end > outline.len() {
        return Err(TreeError::StaleHistory(format!(
            "expected {} inserted nodes at {}, outline has {}",
            ids.len(),
            at,
            outline.len()
        )));
    }
    for (offset, expected) in ids.iter().enumerate() {
        if outline.id_at(at + offset) != Some(*expected) {
            return Err(TreeError::StaleHistory(format!(
                "article {} is no longer at {}",
                expected,
                at + offset
            )));
        }
    }
    if parent.is_none() && (at != 0 || ids.len() != outline.len()) {
        return Err(TreeError::StaleHistory(
            "inserted root no longer spans the outline".to_string(),
        ));
    }

    let mut heads = 0;
    let mut position = at;
    while position < end {
        let found = outline.at(position).and_then(Article::parent);
        if found != parent {
            return Err(TreeError::StaleHistory(format!(
                "node at {} no longer sits under the recorded parent",
                position
            )));
        }
        position = outline.subtree_range(position)?.end;
        heads += 1;
    }
    if position != end {
        return Err(TreeError::StaleHistory(format!(
            "inserted range {}..{} no longer ends on a subtree boundary",
            at, end
        )));
    }
    Ok(heads)
}

/// One user-visible edit: a label and the primitive steps that make it up, in the order
/// they were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub label: String,
    pub steps: Vec<EditStep>,
}

impl Transaction {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            steps: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Inserts through the outline and records the step.
    pub fn insert(
        &mut self,
        outline: &mut Outline,
        parent: Option<ArticleId>,
        at: usize,
        nodes: Vec<Article>,
    ) -> Result<()> {
        let ids = nodes.iter().map(Article::id).collect();
        outline.insert_subtree(parent, at, nodes)?;
        self.steps.push(EditStep::Inserted { parent, at, ids });
        Ok(())
    }

    /// Removes through the outline and records the step. The recorded block is a copy of
    /// the returned one, so the caller is free to re-insert what it gets back.
    pub fn remove(&mut self, outline: &mut Outline, position: usize) -> Result<Vec<Article>> {
        let parent = outline
            .parent_position(position)?
            .and_then(|p| outline.id_at(p));
        let nodes = outline.remove_subtree(position)?;
        self.steps.push(EditStep::Removed {
            parent,
            at: position,
            nodes: nodes.clone(),
        });
        Ok(nodes)
    }

    /// Reverts every step, last first, and returns the inverse transaction. On failure the
    /// steps already reverted are re-applied before the error is returned.
    pub fn revert(self, outline: &mut Outline) -> Result<Transaction> {
        let Transaction { label, mut steps } = self;
        let mut inverse = Vec::with_capacity(steps.len());
        while let Some(step) = steps.pop() {
            match step.revert(outline) {
                Ok(step) => inverse.push(step),
                Err(err) => {
                    warn!(label = %label, error = %err, "revert failed, restoring");
                    Transaction {
                        label,
                        steps: inverse,
                    }
                    .rollback(outline);
                    return Err(err);
                }
            }
        }
        Ok(Transaction {
            label,
            steps: inverse,
        })
    }

    /// Best-effort revert used to keep commands atomic. Failures are logged, not returned.
    pub(crate) fn rollback(self, outline: &mut Outline) {
        let label = self.label;
        for step in self.steps.into_iter().rev() {
            if let Err(err) = step.revert(outline) {
                warn!(label = %label, error = %err, "rollback step failed");
            }
        }
    }
}

/// Bounded undo stack plus redo stack.
#[derive(Debug)]
pub struct History {
    undo: VecDeque<Transaction>,
    redo: Vec<Transaction>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(OutlineConfig::default().history_limit)
    }
}

impl History {
    /// A `limit` of 0 disables recording.
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    pub fn from_config(config: &OutlineConfig) -> Self {
        Self::new(config.history_limit)
    }

    /// Records a completed edit. Clears the redo stack; empty transactions are ignored.
    pub fn record(&mut self, transaction: Transaction) {
        if transaction.is_empty() {
            return;
        }
        self.redo.clear();
        self.push_undo(transaction);
    }

    fn push_undo(&mut self, transaction: Transaction) {
        if self.limit == 0 {
            return;
        }
        self.undo.push_back(transaction);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }

    /// Reverts the latest edit. Returns its label, or `None` if there is nothing to undo.
    pub fn undo(&mut self, outline: &mut Outline) -> Result<Option<String>> {
        let Some(transaction) = self.undo.pop_back() else {
            return Ok(None);
        };
        let inverse = transaction.revert(outline).map_err(stale)?;
        let label = inverse.label.clone();
        debug!(label = %label, "undo");
        self.redo.push(inverse);
        Ok(Some(label))
    }

    /// Re-applies the latest undone edit.
    pub fn redo(&mut self, outline: &mut Outline) -> Result<Option<String>> {
        let Some(transaction) = self.redo.pop() else {
            return Ok(None);
        };
        let inverse = transaction.revert(outline).map_err(stale)?;
        let label = inverse.label.clone();
        debug!(label = %label, "redo");
        self.push_undo(inverse);
        Ok(Some(label))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo.back().map(|t| t.label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo.last().map(|t| t.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

fn stale(err: TreeError) -> TreeError {
    match err {
        TreeError::StaleHistory(_) => err,
        other => TreeError::StaleHistory(other.to_string()),
    }
}
