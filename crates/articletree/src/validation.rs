//! # Validation Layer
//!
//! Every structural mutation calls into this module *before* touching state. A failed check
//! leaves the outline untouched, there is never anything to roll back.
//!
//! ## Insertion Rules
//!
//! For `insert_subtree(parent, at, nodes)`:
//!
//! | Situation | Error |
//! |-----------|-------|
//! | `nodes` empty | `EmptyBlock` |
//! | empty store, `parent` given | `UnknownParent` |
//! | empty store, `at != 0` | `OutOfBounds` |
//! | `at > len` | `OutOfBounds` |
//! | non-empty store, `at == 0` or no parent | `RootReplacement` |
//! | `parent` not a member | `UnknownParent` |
//! | `at` outside `(pos(parent), end(parent)]` | `MisplacedIndex` |
//! | `at` lands inside a child's subtree | `MisplacedIndex` |
//! | head states a different parent | `ParentMismatch` |
//! | a node is already indexed | `AlreadyMember` |
//! | block is not a pre-order subtree | `DuplicateIdentity` / `UnknownParent` / `MalformedBlock` |
//!
//! ## Blocks
//!
//! A block is one or more sibling subtrees in pre-order. The head may or may not state a
//! parent; every later node must state a parent that is either an open ancestor inside the
//! block or, for further top-level siblings, the insertion parent itself. The root can only
//! be inserted as a single tree.
//!
//! The "inside a child's subtree" rule is the contiguity check: inserting between a node and
//! its own descendants would silently re-home those descendants under the new block.

use crate::error::{Result, TreeError};
use crate::model::{Article, ArticleId};
use crate::store::Outline;
use std::collections::HashSet;
use std::ops::Range;

/// Checks an insertion and returns the absolute depth of every node in the block.
pub(crate) fn plan_insertion(
    outline: &Outline,
    parent: Option<ArticleId>,
    at: usize,
    nodes: &[Article],
) -> Result<Vec<usize>> {
    if nodes.is_empty() {
        return Err(TreeError::EmptyBlock);
    }

    let len = outline.len();
    let base_depth = if outline.is_empty() {
        if let Some(parent_id) = parent {
            return Err(TreeError::UnknownParent(parent_id));
        }
        if at != 0 {
            return Err(TreeError::OutOfBounds { index: at, len });
        }
        0
    } else {
        if at > len {
            return Err(TreeError::OutOfBounds { index: at, len });
        }
        if at == 0 {
            return Err(TreeError::RootReplacement);
        }
        // A second parentless node would compete with the root.
        let parent_id = parent.ok_or(TreeError::RootReplacement)?;
        let parent_pos = outline
            .position_of(&parent_id)
            .ok_or(TreeError::UnknownParent(parent_id))?;
        let range = outline.subtree_range(parent_pos)?;
        if at <= parent_pos || at > range.end {
            return Err(TreeError::MisplacedIndex { index: at, parent });
        }
        let child_depth = outline.depth_at(parent_pos).unwrap_or(0) + 1;
        if at < range.end && outline.depth_at(at) != Some(child_depth) {
            return Err(TreeError::MisplacedIndex { index: at, parent });
        }
        if let Some(found) = nodes[0].parent {
            if found != parent_id {
                return Err(TreeError::ParentMismatch {
                    expected: parent,
                    found: Some(found),
                });
            }
        }
        child_depth
    };

    if let Some(member) = nodes.iter().find(|node| outline.contains(&node.id)) {
        return Err(TreeError::AlreadyMember(member.id));
    }

    let relative = block_layout(nodes, parent.filter(|_| !outline.is_empty()))?;
    Ok(relative.into_iter().map(|depth| depth + base_depth).collect())
}

/// Verifies that `nodes` is a self-contained pre-order block and returns each node's
/// depth relative to the top level of the block. Nodes stating `outer` as their parent
/// start a new top-level sibling.
pub(crate) fn block_layout(nodes: &[Article], outer: Option<ArticleId>) -> Result<Vec<usize>> {
    let mut seen: HashSet<ArticleId> = HashSet::with_capacity(nodes.len());
    // Chain of ancestors still open at the current position, head first.
    let mut open: Vec<ArticleId> = Vec::new();
    let mut depths = Vec::with_capacity(nodes.len());

    for (position, node) in nodes.iter().enumerate() {
        if !seen.insert(node.id) {
            return Err(TreeError::DuplicateIdentity(node.id));
        }
        if position == 0 {
            open.push(node.id);
            depths.push(0);
            continue;
        }

        let parent = node.parent.ok_or(TreeError::MalformedBlock { position })?;
        if Some(parent) == outer {
            open.clear();
            open.push(node.id);
            depths.push(0);
            continue;
        }
        if !seen.contains(&parent) {
            return Err(TreeError::UnknownParent(parent));
        }
        while open.last().is_some_and(|top| *top != parent) {
            open.pop();
        }
        if open.is_empty() {
            return Err(TreeError::MalformedBlock { position });
        }
        depths.push(open.len());
        open.push(node.id);
    }

    Ok(depths)
}

pub(crate) fn check_removal(outline: &Outline, position: usize) -> Result<Range<usize>> {
    let len = outline.len();
    if position >= len {
        return Err(TreeError::OutOfBounds {
            index: position,
            len,
        });
    }
    if position == 0 && len > 1 {
        return Err(TreeError::RootRemovalDenied);
    }
    outline.subtree_range(position)
}

/// A bulk-loaded depth sequence must start at 0 and never jump more than one level down.
pub(crate) fn check_depth_sequence(depths: impl IntoIterator<Item = usize>) -> Result<()> {
    let mut previous: Option<usize> = None;
    for (position, depth) in depths.into_iter().enumerate() {
        let valid = match previous {
            None => depth == 0,
            Some(prev) => depth >= 1 && depth <= prev + 1,
        };
        if !valid {
            return Err(TreeError::InvalidDepth { position, depth });
        }
        previous = Some(depth);
    }
    Ok(())
}
