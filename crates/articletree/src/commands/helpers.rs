use crate::error::{Result, TreeError};
use crate::model::ArticleId;
use crate::store::Outline;

/// Where an article sits among its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Siblings {
    pub parent: ArticleId,
    pub parent_position: usize,
    /// Positions of every sibling, the article itself included.
    pub positions: Vec<usize>,
    pub rank: usize,
}

impl Siblings {
    pub fn previous(&self) -> Option<usize> {
        self.rank
            .checked_sub(1)
            .and_then(|rank| self.positions.get(rank).copied())
    }

    pub fn next(&self) -> Option<usize> {
        self.positions.get(self.rank + 1).copied()
    }

    pub fn is_last(&self) -> bool {
        self.rank + 1 == self.positions.len()
    }
}

/// Sibling context of a non-root article. The root has no siblings and cannot leave
/// position 0, so asking for them is `RootRemovalDenied`.
pub fn siblings_of(outline: &Outline, position: usize) -> Result<Siblings> {
    let parent_position = outline
        .parent_position(position)?
        .ok_or(TreeError::RootRemovalDenied)?;
    let parent = outline
        .id_at(parent_position)
        .ok_or(TreeError::OutOfBounds {
            index: parent_position,
            len: outline.len(),
        })?;
    let positions = outline.children_of(parent_position)?;
    let rank = positions
        .iter()
        .position(|&p| p == position)
        .unwrap_or_default();
    Ok(Siblings {
        parent,
        parent_position,
        positions,
        rank,
    })
}

/// Id of the parent of the article at `position`, `None` for the root.
pub fn parent_id_at(outline: &Outline, position: usize) -> Result<Option<ArticleId>> {
    Ok(outline
        .parent_position(position)?
        .and_then(|p| outline.id_at(p)))
}

/// Quoted display title for messages.
pub fn fmt_title(outline: &Outline, id: &ArticleId) -> String {
    match outline.get(id) {
        Some(article) => format!("'{}'", article.data.display_title()),
        None => id.to_string(),
    }
}
