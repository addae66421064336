//! Copy, cut and paste of whole subtrees.
//!
//! The [`Clipboard`] holds a detached template block. Every paste clones the template with
//! fresh identities, so the same block can be pasted any number of times without two
//! members ever sharing an id.

use crate::commands::helpers::{fmt_title, parent_id_at};
use crate::commands::{atomic, CmdMessage, CmdResult};
use crate::error::{Result, TreeError};
use crate::history::Transaction;
use crate::model::{Article, ArticleId};
use crate::store::Outline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PastePosition {
    /// As the last child of the target.
    AsChild,
    /// Right after the target's subtree, under the same parent.
    AsSibling,
}

#[derive(Debug, Default, Clone)]
pub struct Clipboard {
    block: Option<Vec<Article>>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_none()
    }

    /// Number of articles a paste would insert.
    pub fn len(&self) -> usize {
        self.block.as_ref().map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.block = None;
    }

    fn store(&mut self, mut block: Vec<Article>) {
        if let Some(head) = block.first_mut() {
            head.detach();
        }
        self.block = Some(block);
    }

    fn template(&self) -> Option<&[Article]> {
        self.block.as_deref()
    }
}

/// Puts a copy of the subtree on the clipboard. The outline is not changed.
pub fn copy(
    outline: &mut Outline,
    clipboard: &mut Clipboard,
    id: &ArticleId,
) -> Result<CmdResult> {
    let position = outline.require_position(id)?;
    let block = outline.copy_subtree(position)?;
    let count = block.len();
    clipboard.store(block);

    let mut result = CmdResult::new(Transaction::new("Copy"));
    result.add_message(CmdMessage::info(format!(
        "Copied {} ({} article(s))",
        fmt_title(outline, id),
        count
    )));
    Ok(result)
}

/// Removes the subtree and puts it on the clipboard.
pub fn cut(
    outline: &mut Outline,
    clipboard: &mut Clipboard,
    id: &ArticleId,
) -> Result<CmdResult> {
    let position = outline.require_position(id)?;
    let title = fmt_title(outline, id);
    let (tx, block) = atomic(outline, "Cut", |outline, tx| tx.remove(outline, position))?;
    let affected = block.iter().map(Article::id).collect();
    clipboard.store(block);

    let mut result = CmdResult::new(tx).with_affected(affected);
    result.add_message(CmdMessage::success(format!("Cut {}", title)));
    Ok(result)
}

/// Inserts a fresh clone of the clipboard block relative to `target`.
pub fn paste(
    outline: &mut Outline,
    clipboard: &Clipboard,
    target: &ArticleId,
    placement: PastePosition,
) -> Result<CmdResult> {
    let Some(template) = clipboard.template() else {
        return Ok(CmdResult::unchanged("Paste", "Clipboard is empty"));
    };
    let position = outline.require_position(target)?;
    let parent = match placement {
        PastePosition::AsChild => *target,
        PastePosition::AsSibling => {
            parent_id_at(outline, position)?.ok_or(TreeError::RootReplacement)?
        }
    };
    let at = outline.subtree_range(position)?.end;
    let copies = outline.clone_block(template);
    insert_copies(outline, "Paste", parent, at, copies)
}

/// Inserts a copy of the subtree right after the original.
pub fn duplicate(outline: &mut Outline, id: &ArticleId) -> Result<CmdResult> {
    let position = outline.require_position(id)?;
    let parent = parent_id_at(outline, position)?.ok_or(TreeError::RootReplacement)?;
    let at = outline.subtree_range(position)?.end;
    let copies = outline.copy_subtree(position)?;
    insert_copies(outline, "Duplicate", parent, at, copies)
}

fn insert_copies(
    outline: &mut Outline,
    label: &str,
    parent: ArticleId,
    at: usize,
    copies: Vec<Article>,
) -> Result<CmdResult> {
    let affected: Vec<ArticleId> = copies.iter().map(Article::id).collect();
    let (tx, _) = atomic(outline, label, |outline, tx| {
        tx.insert(outline, Some(parent), at, copies)
    })?;
    let mut result = CmdResult::new(tx);
    if let Some(head) = affected.first() {
        result.add_message(CmdMessage::success(format!(
            "Inserted {}",
            fmt_title(outline, head)
        )));
    }
    Ok(result.with_affected(affected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::History;
    use crate::test_utils::{assert_invariants, OutlineFixture};

    fn fixture() -> OutlineFixture {
        OutlineFixture::from_layout(&[(0, "Root"), (1, "A"), (2, "A1"), (1, "B")])
    }

    #[test]
    fn test_copy_leaves_outline_untouched() {
        let mut f = fixture();
        let before = f.layout();
        let mut clipboard = Clipboard::new();
        let a = f.id("A");

        let result = copy(&mut f.outline, &mut clipboard, &a).unwrap();

        assert!(result.is_noop());
        assert_eq!(clipboard.len(), 2);
        assert_eq!(f.layout(), before);
        assert_eq!(f.outline.len(), 4);
    }

    #[test]
    fn test_copy_paste_as_child() {
        let mut f = fixture();
        let mut clipboard = Clipboard::new();
        let (a, b) = (f.id("A"), f.id("B"));

        copy(&mut f.outline, &mut clipboard, &a).unwrap();
        let result = paste(&mut f.outline, &clipboard, &b, PastePosition::AsChild).unwrap();

        assert_eq!(
            f.layout(),
            vec!["Root", "  A", "    A1", "  B", "    A", "      A1"]
        );
        assert_eq!(result.affected.len(), 2);
        assert_ne!(result.affected[0], a);
        assert_eq!(f.outline.get(&result.affected[0]).unwrap().parent(), Some(b));
        assert_invariants(&f.outline);
    }

    #[test]
    fn test_paste_twice_gives_distinct_identities() {
        let mut f = fixture();
        let mut clipboard = Clipboard::new();
        let (a1, b) = (f.id("A1"), f.id("B"));

        copy(&mut f.outline, &mut clipboard, &a1).unwrap();
        let first = paste(&mut f.outline, &clipboard, &b, PastePosition::AsChild).unwrap();
        let second = paste(&mut f.outline, &clipboard, &b, PastePosition::AsChild).unwrap();

        assert_ne!(first.affected, second.affected);
        assert_eq!(f.outline.children_ids(&b).unwrap().len(), 2);
        assert_eq!(f.outline.index().len(), f.outline.len());
        assert_invariants(&f.outline);
    }

    #[test]
    fn test_cut_paste_as_sibling() {
        let mut f = fixture();
        let mut clipboard = Clipboard::new();
        let (a, b) = (f.id("A"), f.id("B"));

        let cut_result = cut(&mut f.outline, &mut clipboard, &a).unwrap();
        assert_eq!(cut_result.affected, vec![a, f.id("A1")]);
        assert_eq!(f.layout(), vec!["Root", "  B"]);

        paste(&mut f.outline, &clipboard, &b, PastePosition::AsSibling).unwrap();

        assert_eq!(f.layout(), vec!["Root", "  B", "  A", "    A1"]);
        assert_invariants(&f.outline);
    }

    #[test]
    fn test_paste_as_sibling_of_root_fails() {
        let mut f = fixture();
        let mut clipboard = Clipboard::new();
        let (a, root) = (f.id("A"), f.id("Root"));
        copy(&mut f.outline, &mut clipboard, &a).unwrap();

        assert_eq!(
            paste(&mut f.outline, &clipboard, &root, PastePosition::AsSibling).unwrap_err(),
            TreeError::RootReplacement
        );
        assert_eq!(f.outline.len(), 4);
    }

    #[test]
    fn test_paste_empty_clipboard_is_noop() {
        let mut f = fixture();
        let root = f.id("Root");
        let clipboard = Clipboard::new();
        let result = paste(&mut f.outline, &clipboard, &root, PastePosition::AsChild).unwrap();
        assert!(result.is_noop());
        assert_eq!(result.messages, vec![CmdMessage::info("Clipboard is empty")]);
    }

    #[test]
    fn test_duplicate_inserts_after_original() {
        let mut f = fixture();
        let a = f.id("A");
        let result = duplicate(&mut f.outline, &a).unwrap();

        assert_eq!(
            f.layout(),
            vec!["Root", "  A", "    A1", "  A", "    A1", "  B"]
        );
        assert_eq!(f.outline.position_of(&result.affected[0]), Some(3));
        assert_invariants(&f.outline);
    }

    #[test]
    fn test_duplicate_root_fails() {
        let mut f = fixture();
        let root = f.id("Root");
        assert_eq!(
            duplicate(&mut f.outline, &root).unwrap_err(),
            TreeError::RootReplacement
        );
    }

    #[test]
    fn test_cut_and_paste_undo() {
        let mut f = fixture();
        let before = f.layout();
        let mut clipboard = Clipboard::new();
        let mut history = History::new(10);
        let (a, b) = (f.id("A"), f.id("B"));

        history.record(cut(&mut f.outline, &mut clipboard, &a).unwrap().transaction);
        history.record(
            paste(&mut f.outline, &clipboard, &b, PastePosition::AsChild)
                .unwrap()
                .transaction,
        );
        history.undo(&mut f.outline).unwrap();
        history.undo(&mut f.outline).unwrap();

        assert_eq!(f.layout(), before);
        assert!(f.outline.contains(&a));
        assert_invariants(&f.outline);
    }
}
