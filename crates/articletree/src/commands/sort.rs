use crate::commands::helpers::fmt_title;
use crate::commands::{atomic, CmdMessage, CmdResult};
use crate::error::{Result, TreeError};
use crate::model::{Article, ArticleId};
use crate::store::Outline;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Case-insensitive title order.
    Title,
    CreatedAt,
}

impl SortKey {
    fn compare(self, a: &Article, b: &Article) -> Ordering {
        match self {
            SortKey::Title => a.title().to_lowercase().cmp(&b.title().to_lowercase()),
            SortKey::CreatedAt => a.data.created_at.cmp(&b.data.created_at),
        }
    }
}

/// Reorders the direct children of `parent`. Equal keys keep their current order, and each
/// child moves together with its own subtree.
pub fn sort_children(
    outline: &mut Outline,
    parent: &ArticleId,
    key: SortKey,
) -> Result<CmdResult> {
    let parent_position = outline
        .position_of(parent)
        .ok_or(TreeError::UnknownParent(*parent))?;
    let children = outline.children_of(parent_position)?;

    let mut order: Vec<usize> = (0..children.len()).collect();
    order.sort_by(|&a, &b| match (outline.at(children[a]), outline.at(children[b])) {
        (Some(a), Some(b)) => key.compare(a, b),
        _ => Ordering::Equal,
    });
    if order.iter().enumerate().all(|(rank, &i)| rank == i) {
        return Ok(CmdResult::unchanged(
            "Sort",
            format!("Children of {} are already sorted", fmt_title(outline, parent)),
        ));
    }

    let (tx, _) = atomic(outline, "Sort", |outline, tx| {
        // Detach every child, last first so earlier positions stay valid.
        let mut blocks = Vec::with_capacity(children.len());
        for &position in children.iter().rev() {
            blocks.push(Some(tx.remove(outline, position)?));
        }
        blocks.reverse();

        let mut at = parent_position + 1;
        for i in order {
            let block = blocks[i].take().unwrap_or_default();
            let size = block.len();
            tx.insert(outline, Some(*parent), at, block)?;
            at += size;
        }
        Ok(())
    })?;

    let affected = outline.children_ids(parent)?;
    let mut result = CmdResult::new(tx).with_affected(affected);
    result.add_message(CmdMessage::success(format!(
        "Sorted children of {}",
        fmt_title(outline, parent)
    )));
    Ok(result)
}
