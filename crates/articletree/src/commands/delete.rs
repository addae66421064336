use crate::commands::helpers::fmt_title;
use crate::commands::{atomic, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::ArticleId;
use crate::store::Outline;

/// Removes an article together with its descendants. The root can only be deleted when it
/// is the last article left.
pub fn run(outline: &mut Outline, id: &ArticleId) -> Result<CmdResult> {
    let position = outline.require_position(id)?;
    let title = fmt_title(outline, id);
    let (tx, removed) = atomic(outline, "Delete article", |outline, tx| {
        tx.remove(outline, position)
    })?;

    let affected: Vec<ArticleId> = removed.iter().map(|article| article.id()).collect();
    let mut result = CmdResult::new(tx);
    let message = match affected.len() {
        1 => format!("Deleted {}", title),
        n => format!("Deleted {} and {} nested article(s)", title, n - 1),
    };
    result.add_message(CmdMessage::success(message));
    if outline.is_empty() {
        result.add_message(CmdMessage::warning("The outline is now empty"));
    }
    Ok(result.with_affected(affected))
}
