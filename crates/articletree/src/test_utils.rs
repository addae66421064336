use crate::identity::SequentialGenerator;
use crate::model::{ArticleData, ArticleId};
use crate::store::Outline;
use std::collections::HashMap;

/// An outline built from a `(depth, title)` layout, with titles doubling as handles.
///
/// Ids come from a [`SequentialGenerator`], so the fixture is fully deterministic.
/// Titles must be unique within a layout.
pub struct OutlineFixture {
    pub outline: Outline,
    ids: HashMap<String, ArticleId>,
}

impl OutlineFixture {
    pub fn from_layout(layout: &[(usize, &str)]) -> Self {
        let items = layout
            .iter()
            .map(|(depth, title)| (*depth, ArticleData::titled(*title)));
        let outline = Outline::from_depths(Box::new(SequentialGenerator::new()), items)
            .expect("fixture layout must be a valid depth sequence");
        let ids = outline
            .iter()
            .map(|(_, article)| (article.title().to_string(), article.id()))
            .collect();
        Self { outline, ids }
    }

    /// Id of the article that was created with `title`.
    pub fn id(&self, title: &str) -> ArticleId {
        *self
            .ids
            .get(title)
            .unwrap_or_else(|| panic!("no article titled {:?} in fixture", title))
    }

    /// Titles in pre-order, indented two spaces per level.
    pub fn layout(&self) -> Vec<String> {
        self.outline
            .iter()
            .map(|(depth, article)| format!("{}{}", "  ".repeat(depth), article.title()))
            .collect()
    }
}

/// Panics with the violated invariant if the outline is not consistent.
pub fn assert_invariants(outline: &Outline) {
    if let Err(err) = outline.verify() {
        panic!("outline invariants violated: {}\n{:#?}", err, outline);
    }
}
