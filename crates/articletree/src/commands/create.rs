use crate::commands::helpers::{fmt_title, parent_id_at};
use crate::commands::{atomic, CmdMessage, CmdResult};
use crate::error::{Result, TreeError};
use crate::history::Transaction;
use crate::model::ArticleId;
use crate::store::Outline;

/// Creates the root of an empty outline.
pub fn add_root(outline: &mut Outline, title: Option<&str>) -> Result<CmdResult> {
    if !outline.is_empty() {
        return Err(TreeError::RootReplacement);
    }
    let article = outline.create_article(title);
    let id = article.id();
    let (tx, _) = atomic(outline, "Add article", |outline, tx| {
        tx.insert(outline, None, 0, vec![article])
    })?;
    Ok(created(outline, tx, id))
}

/// Appends a new last child to `parent`.
pub fn add_child(
    outline: &mut Outline,
    parent: &ArticleId,
    title: Option<&str>,
) -> Result<CmdResult> {
    let position = outline
        .position_of(parent)
        .ok_or(TreeError::UnknownParent(*parent))?;
    let at = outline.subtree_range(position)?.end;
    let article = outline.create_article(title);
    let id = article.id();
    let (tx, _) = atomic(outline, "Add child article", |outline, tx| {
        tx.insert(outline, Some(*parent), at, vec![article])
    })?;
    Ok(created(outline, tx, id))
}

/// Inserts a new article right after `target` and its descendants, under the same parent.
pub fn add_sibling(
    outline: &mut Outline,
    target: &ArticleId,
    title: Option<&str>,
) -> Result<CmdResult> {
    let position = outline.require_position(target)?;
    let parent = parent_id_at(outline, position)?.ok_or(TreeError::RootReplacement)?;
    let at = outline.subtree_range(position)?.end;
    let article = outline.create_article(title);
    let id = article.id();
    let (tx, _) = atomic(outline, "Add article", |outline, tx| {
        tx.insert(outline, Some(parent), at, vec![article])
    })?;
    Ok(created(outline, tx, id))
}

fn created(outline: &Outline, tx: Transaction, id: ArticleId) -> CmdResult {
    let mut result = CmdResult::new(tx).with_affected(vec![id]);
    result.add_message(CmdMessage::success(format!(
        "Article created: {}",
        fmt_title(outline, &id)
    )));
    result
}
