//! Relocating subtrees. Every move is "remove the block, insert it somewhere else", so the
//! moved article keeps its identity and its whole subtree travels with it.

use crate::commands::helpers::{fmt_title, siblings_of};
use crate::commands::{atomic, CmdResult};
use crate::error::{Result, TreeError};
use crate::model::ArticleId;
use crate::store::Outline;
use tracing::debug;

/// Swaps the article with its previous sibling.
pub fn move_up(outline: &mut Outline, id: &ArticleId) -> Result<CmdResult> {
    let position = outline.require_position(id)?;
    let siblings = siblings_of(outline, position)?;
    let Some(previous) = siblings.previous() else {
        return Ok(CmdResult::unchanged(
            "Move up",
            format!("{} is already the first child", fmt_title(outline, id)),
        ));
    };

    relocate(outline, "Move up", id, position, siblings.parent, |_| previous)
}

/// Swaps the article with its next sibling.
pub fn move_down(outline: &mut Outline, id: &ArticleId) -> Result<CmdResult> {
    let position = outline.require_position(id)?;
    let siblings = siblings_of(outline, position)?;
    let Some(next) = siblings.next() else {
        return Ok(CmdResult::unchanged(
            "Move down",
            format!("{} is already the last child", fmt_title(outline, id)),
        ));
    };
    let next_end = outline.subtree_range(next)?.end;

    // The next sibling's subtree shifts left by the size of the removed block.
    relocate(outline, "Move down", id, position, siblings.parent, |size| {
        next_end - size
    })
}

/// Makes the article the last child of its previous sibling.
pub fn indent(outline: &mut Outline, id: &ArticleId) -> Result<CmdResult> {
    let position = outline.require_position(id)?;
    let siblings = siblings_of(outline, position)?;
    let Some(previous) = siblings.previous() else {
        return Ok(CmdResult::unchanged(
            "Indent",
            format!(
                "{} has no previous sibling to indent under",
                fmt_title(outline, id)
            ),
        ));
    };
    let new_parent = outline.id_at(previous).ok_or(TreeError::OutOfBounds {
        index: previous,
        len: outline.len(),
    })?;

    // The previous sibling's subtree ends exactly where the moved block started.
    relocate(outline, "Indent", id, position, new_parent, |_| position)
}

/// Makes the article the next sibling of its parent. Later siblings stay where they are.
pub fn outdent(outline: &mut Outline, id: &ArticleId) -> Result<CmdResult> {
    let position = outline.require_position(id)?;
    let siblings = siblings_of(outline, position)?;
    let Some(grandparent) = outline
        .parent_position(siblings.parent_position)?
        .and_then(|p| outline.id_at(p))
    else {
        return Ok(CmdResult::unchanged(
            "Outdent",
            format!("{} is already at the top level", fmt_title(outline, id)),
        ));
    };
    let parent_end = outline.subtree_range(siblings.parent_position)?.end;

    relocate(outline, "Outdent", id, position, grandparent, |size| {
        parent_end - size
    })
}

/// Reparents the article as the last child of `new_parent`.
pub fn move_to(
    outline: &mut Outline,
    id: &ArticleId,
    new_parent: &ArticleId,
) -> Result<CmdResult> {
    let position = outline.require_position(id)?;
    if position == 0 {
        return Err(TreeError::RootRemovalDenied);
    }
    if !outline.contains(new_parent) {
        return Err(TreeError::UnknownParent(*new_parent));
    }
    if outline.is_ancestor(id, new_parent) {
        return Err(TreeError::CyclicMove(*id));
    }

    let siblings = siblings_of(outline, position)?;
    if siblings.parent == *new_parent && siblings.is_last() {
        return Ok(CmdResult::unchanged(
            "Move",
            format!("{} is already at destination", fmt_title(outline, id)),
        ));
    }

    let (tx, _) = atomic(outline, "Move", |outline, tx| {
        let block = tx.remove(outline, position)?;
        let target = outline.require_position(new_parent)?;
        let at = outline.subtree_range(target)?.end;
        tx.insert(outline, Some(*new_parent), at, block)
    })?;
    debug!(id = %id, parent = %new_parent, "moved article");
    Ok(CmdResult::new(tx).with_affected(vec![*id]))
}

/// Removes the block at `position` and re-inserts it under `parent`, at the index computed
/// by `destination` from the size of the block.
fn relocate<F>(
    outline: &mut Outline,
    label: &str,
    id: &ArticleId,
    position: usize,
    parent: ArticleId,
    destination: F,
) -> Result<CmdResult>
where
    F: FnOnce(usize) -> usize,
{
    let (tx, _) = atomic(outline, label, |outline, tx| {
        let block = tx.remove(outline, position)?;
        let at = destination(block.len());
        tx.insert(outline, Some(parent), at, block)
    })?;
    debug!(id = %id, label, "relocated article");
    Ok(CmdResult::new(tx).with_affected(vec![*id]))
}
