use super::Outline;
use crate::error::{Result, TreeError};
use crate::events::StructureEvent;
use crate::identity::IdGenerator;
use crate::model::{Article, ArticleData, ArticleId};
use crate::validation;
use std::collections::HashSet;
use tracing::{debug, instrument};

impl Outline {
    /// Builds an outline from a pre-order `(depth, data)` listing, the shape a depth-tagged
    /// document format decodes to. The whole depth sequence is validated once up front.
    pub fn from_depths<I>(generator: Box<dyn IdGenerator>, items: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, ArticleData)>,
    {
        let items: Vec<(usize, ArticleData)> = items.into_iter().collect();
        validation::check_depth_sequence(items.iter().map(|(depth, _)| *depth))?;

        let mut outline = Outline::with_generator(generator);
        let mut open: Vec<ArticleId> = Vec::new();
        let mut nodes = Vec::with_capacity(items.len());
        for (depth, data) in items {
            open.truncate(depth);
            let id = outline.fresh_id();
            let article = match open.last() {
                Some(parent) => Article::with_parent(id, *parent, data),
                None => Article::new(id, data),
            };
            nodes.push(article);
            open.push(id);
        }

        if !nodes.is_empty() {
            outline.load_block(nodes)?;
        }
        Ok(outline)
    }

    /// Loads a complete tree into an empty outline in one step. Observers get a single
    /// `StructureReset` instead of per-node insertions.
    #[instrument(level = "trace", skip(self, nodes), fields(count = nodes.len()))]
    pub fn load_block(&mut self, nodes: Vec<Article>) -> Result<()> {
        if !self.is_empty() {
            return Err(TreeError::RootReplacement);
        }
        let depths = validation::plan_insertion(self, None, 0, &nodes)?;
        let count = nodes.len();
        self.splice_block(0, None, nodes, depths)?;
        self.notify(StructureEvent::StructureReset);
        debug!(count, "loaded outline");
        Ok(())
    }

    /// Drops every article and hands them back in pre-order.
    pub fn clear(&mut self) -> Vec<Article> {
        let slots = std::mem::take(&mut self.sequence);
        let articles = slots
            .iter()
            .filter_map(|slot| self.index.remove(&slot.id))
            .collect();
        self.index.clear();
        self.notify(StructureEvent::StructureReset);
        articles
    }

    /// Checks every structural invariant against the actual contents:
    ///
    /// 1. Sequence and identity index hold the same ids, each exactly once.
    /// 2. Position 0 is the root: depth 0, no parent.
    /// 3. No other node has depth 0, and depth never jumps down by more than one level.
    /// 4. Each node's stated parent is the nearest preceding node one level up.
    pub fn verify(&self) -> Result<()> {
        if self.sequence.len() != self.index.len() {
            return Err(TreeError::Inconsistent(format!(
                "sequence holds {} entries but index holds {}",
                self.sequence.len(),
                self.index.len()
            )));
        }

        let mut seen = HashSet::with_capacity(self.sequence.len());
        // open[d] is the most recent node at depth d
        let mut open: Vec<ArticleId> = Vec::new();
        for (position, slot) in self.sequence.iter().enumerate() {
            if !seen.insert(slot.id) {
                return Err(TreeError::DuplicateIdentity(slot.id));
            }
            let article = self
                .index
                .lookup(&slot.id)
                .ok_or(TreeError::UnknownArticle(slot.id))?;

            let depth_ok = if position == 0 {
                slot.depth == 0
            } else {
                slot.depth >= 1 && slot.depth <= open.len()
            };
            if !depth_ok {
                return Err(TreeError::InvalidDepth {
                    position,
                    depth: slot.depth,
                });
            }

            open.truncate(slot.depth);
            if article.parent != open.last().copied() {
                return Err(TreeError::MalformedBlock { position });
            }
            open.push(slot.id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::TreeError;
    use crate::events::{EventLog, StructureEvent};
    use crate::identity::SequentialGenerator;
    use crate::model::{Article, ArticleData, ArticleId};
    use crate::store::{Outline, Slot};

    fn items(layout: &[(usize, &str)]) -> Vec<(usize, ArticleData)> {
        layout
            .iter()
            .map(|(depth, title)| (*depth, ArticleData::titled(*title)))
            .collect()
    }

    #[test]
    fn test_from_depths_builds_parent_links() {
        let outline = Outline::from_depths(
            Box::new(SequentialGenerator::new()),
            items(&[(0, "Root"), (1, "A"), (2, "A1"), (1, "B")]),
        )
        .unwrap();

        assert_eq!(outline.len(), 4);
        let root = outline.id_at(0).unwrap();
        let a = outline.id_at(1).unwrap();
        assert_eq!(outline.at(1).unwrap().parent(), Some(root));
        assert_eq!(outline.at(2).unwrap().parent(), Some(a));
        assert_eq!(outline.at(3).unwrap().parent(), Some(root));
        outline.verify().unwrap();
    }

    #[test]
    fn test_from_depths_rejects_bad_sequence() {
        let err = Outline::from_depths(
            Box::new(SequentialGenerator::new()),
            items(&[(0, "Root"), (2, "Deep")]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            TreeError::InvalidDepth {
                position: 1,
                depth: 2
            }
        );
    }

    #[test]
    fn test_from_depths_rejects_second_root() {
        let err = Outline::from_depths(
            Box::new(SequentialGenerator::new()),
            items(&[(0, "Root"), (0, "Other")]),
        )
        .unwrap_err();
        assert!(matches!(err, TreeError::InvalidDepth { position: 1, .. }));
    }

    #[test]
    fn test_from_depths_empty() {
        let outline =
            Outline::from_depths(Box::new(SequentialGenerator::new()), Vec::new()).unwrap();
        assert!(outline.is_empty());
    }

    #[test]
    fn test_load_block_fires_reset() {
        let mut outline = Outline::with_generator(Box::new(SequentialGenerator::new()));
        let log = EventLog::new();
        outline.subscribe(Box::new(log.clone()));

        let root = ArticleId::from_u128(100);
        outline
            .load_block(vec![
                Article::new(root, ArticleData::titled("Root")),
                Article::with_parent(ArticleId::from_u128(101), root, ArticleData::titled("A")),
            ])
            .unwrap();

        assert_eq!(outline.len(), 2);
        assert_eq!(log.structure_events(), vec![StructureEvent::StructureReset]);
    }

    #[test]
    fn test_load_block_requires_empty_store() {
        let mut outline = Outline::with_generator(Box::new(SequentialGenerator::new()));
        let first = outline.create_article(Some("First"));
        outline.load_block(vec![first]).unwrap();

        let second = outline.create_article(Some("Second"));
        assert_eq!(
            outline.load_block(vec![second]).unwrap_err(),
            TreeError::RootReplacement
        );
    }

    #[test]
    fn test_clear_returns_articles_in_order() {
        let mut outline = Outline::from_depths(
            Box::new(SequentialGenerator::new()),
            items(&[(0, "Root"), (1, "A"), (1, "B")]),
        )
        .unwrap();

        let articles = outline.clear();

        let titles: Vec<&str> = articles.iter().map(|a| a.title()).collect();
        assert_eq!(titles, vec!["Root", "A", "B"]);
        assert!(outline.is_empty());
        assert!(outline.index().is_empty());
        outline.verify().unwrap();
    }

    // 0 Root, 1 A, 2 A1, 3 B
    fn sample() -> Outline {
        Outline::from_depths(
            Box::new(SequentialGenerator::new()),
            items(&[(0, "Root"), (1, "A"), (2, "A1"), (1, "B")]),
        )
        .unwrap()
    }

    fn stray(n: u128) -> Article {
        Article::new(ArticleId::from_u128(n), ArticleData::titled("Stray"))
    }

    #[test]
    fn test_verify_reports_index_size_mismatch() {
        let mut outline = sample();
        outline.index.put(stray(99)).unwrap();

        assert!(matches!(outline.verify(), Err(TreeError::Inconsistent(_))));
    }

    #[test]
    fn test_verify_reports_duplicate_slot() {
        let mut outline = sample();
        let a = outline.id_at(1).unwrap();
        outline.sequence.push(Slot { id: a, depth: 1 });
        outline.index.put(stray(99)).unwrap();

        assert_eq!(outline.verify(), Err(TreeError::DuplicateIdentity(a)));
    }

    #[test]
    fn test_verify_reports_slot_missing_from_index() {
        let mut outline = sample();
        let foreign = ArticleId::from_u128(99);
        outline.sequence[3].id = foreign;

        assert_eq!(outline.verify(), Err(TreeError::UnknownArticle(foreign)));
    }

    #[test]
    fn test_verify_reports_depth_jump() {
        let mut outline = sample();
        outline.sequence[2].depth = 3;

        assert_eq!(
            outline.verify(),
            Err(TreeError::InvalidDepth {
                position: 2,
                depth: 3
            })
        );
    }

    #[test]
    fn test_verify_reports_second_depth_zero() {
        let mut outline = sample();
        outline.sequence[3].depth = 0;

        assert_eq!(
            outline.verify(),
            Err(TreeError::InvalidDepth {
                position: 3,
                depth: 0
            })
        );
    }

    #[test]
    fn test_verify_reports_parent_link_disagreeing_with_depth() {
        let mut outline = sample();
        // Depth 2 puts B under A, but its parent link still names Root
        outline.sequence[3].depth = 2;

        assert_eq!(
            outline.verify(),
            Err(TreeError::MalformedBlock { position: 3 })
        );
    }

    #[test]
    fn test_doctor_reports_every_violation_as_inconsistent() {
        use crate::api::OutlineApi;
        use crate::history::History;

        let mut outline = sample();
        outline.sequence[2].depth = 3;
        let api = OutlineApi::new(outline, History::new(1));

        match api.doctor() {
            Err(TreeError::Inconsistent(message)) => {
                assert!(message.contains("Invalid depth 3 at position 2"));
            }
            other => panic!("Expected Inconsistent, got {:?}", other),
        }
        assert!(OutlineApi::new(sample(), History::new(1)).doctor().is_ok());
    }
}
