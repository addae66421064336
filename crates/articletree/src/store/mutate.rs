use super::{Outline, Slot};
use crate::error::{Result, TreeError};
use crate::events::{ContentEvent, StructureEvent};
use crate::model::{Article, ArticleData, ArticleId};
use crate::validation;
use std::collections::HashMap;
use tracing::{debug, error, instrument};

impl Outline {
    /// Runs the full insertion validation without mutating anything.
    ///
    /// Callers that must not lose `nodes` on failure (undo logs, clipboards) check first,
    /// since `insert_subtree` consumes the block.
    pub fn check_insert(
        &self,
        parent: Option<ArticleId>,
        at: usize,
        nodes: &[Article],
    ) -> Result<()> {
        validation::plan_insertion(self, parent, at, nodes).map(|_| ())
    }

    /// Splices a pre-order block into the sequence at `at`, under `parent`.
    ///
    /// The head of the block is re-parented to `parent` (or becomes the root when the
    /// store is empty); links inside the block are taken as they are. Fires one
    /// `NodeInserted` per node, in order.
    #[instrument(level = "trace", skip(self, nodes), fields(count = nodes.len()))]
    pub fn insert_subtree(
        &mut self,
        parent: Option<ArticleId>,
        at: usize,
        nodes: Vec<Article>,
    ) -> Result<()> {
        let depths = validation::plan_insertion(self, parent, at, &nodes)?;
        let becomes_root = self.is_empty();
        let ids = self.splice_block(at, if becomes_root { None } else { parent }, nodes, depths)?;

        for (offset, id) in ids.iter().enumerate() {
            self.notify(StructureEvent::NodeInserted {
                position: at + offset,
                id: *id,
            });
        }
        debug!(at, count = ids.len(), root = becomes_root, "inserted subtree");
        Ok(())
    }

    /// Writes an already validated block. Only called after `plan_insertion`.
    pub(super) fn splice_block(
        &mut self,
        at: usize,
        head_parent: Option<ArticleId>,
        nodes: Vec<Article>,
        depths: Vec<usize>,
    ) -> Result<Vec<ArticleId>> {
        let mut slots = Vec::with_capacity(nodes.len());
        for (offset, (mut node, depth)) in nodes.into_iter().zip(depths).enumerate() {
            if offset == 0 {
                node.parent = head_parent;
            }
            slots.push(Slot { id: node.id, depth });
            self.index.put(node)?;
        }
        let ids = slots.iter().map(|slot| slot.id).collect();
        self.sequence.splice(at..at, slots);
        Ok(ids)
    }

    /// Detaches the subtree rooted at `position` and hands it back in its original order.
    ///
    /// The head loses its parent link; every other node keeps its link to a node inside
    /// the returned block, so the block can be re-inserted verbatim. The root can only be
    /// removed when it is the last article.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_subtree(&mut self, position: usize) -> Result<Vec<Article>> {
        let range = validation::check_removal(self, position)?;
        let head_rank = self.rank_at(position)?;
        if let Some(slot) = self.sequence[range.clone()]
            .iter()
            .find(|slot| !self.index.contains(&slot.id))
        {
            error!(id = %slot.id, "sequence entry missing from identity index");
            return Err(TreeError::Inconsistent(format!(
                "article {} is in the sequence but not in the index",
                slot.id
            )));
        }

        let slots: Vec<Slot> = self.sequence.drain(range.clone()).collect();
        let mut removed = Vec::with_capacity(slots.len());
        let mut events = Vec::with_capacity(slots.len());
        let mut sibling_counts: HashMap<ArticleId, usize> = HashMap::new();

        for (offset, slot) in slots.into_iter().enumerate() {
            let mut article = self
                .index
                .remove(&slot.id)
                .ok_or_else(|| TreeError::Inconsistent(format!("article {} vanished", slot.id)))?;
            let child_rank = if offset == 0 {
                article.parent = None;
                head_rank
            } else {
                // Descendants' siblings are all inside the block, so counting is enough.
                let count = article
                    .parent
                    .map(|parent| sibling_counts.entry(parent).or_insert(0))
                    .map(|count| {
                        let rank = *count;
                        *count += 1;
                        rank
                    });
                count.unwrap_or(0)
            };
            events.push(StructureEvent::NodeRemoved {
                id: article.id,
                position: range.start + offset,
                child_rank,
            });
            removed.push(article);
        }

        for event in events {
            self.notify(event);
        }
        debug!(position, count = removed.len(), "removed subtree");
        Ok(removed)
    }

    /// Fresh copies of the subtree at `position`, with new identities and the same
    /// internal topology. The store is not modified.
    #[instrument(level = "trace", skip(self))]
    pub fn copy_subtree(&mut self, position: usize) -> Result<Vec<Article>> {
        let range = self.subtree_range(position)?;
        let originals: Vec<Article> = self.sequence[range]
            .iter()
            .filter_map(|slot| self.index.lookup(&slot.id).cloned())
            .collect();
        Ok(self.clone_block(&originals))
    }

    /// Clones a block with fresh identities. The head keeps its stated parent, every other
    /// node is pointed at the copy of its original parent.
    pub fn clone_block(&mut self, nodes: &[Article]) -> Vec<Article> {
        let mut mapping: HashMap<ArticleId, ArticleId> = HashMap::with_capacity(nodes.len());
        let mut copies = Vec::with_capacity(nodes.len());

        for (offset, node) in nodes.iter().enumerate() {
            let fresh = self.fresh_id();
            mapping.insert(node.id, fresh);
            let parent = if offset == 0 {
                node.parent
            } else {
                node.parent
                    .map(|parent| mapping.get(&parent).copied().unwrap_or(parent))
            };
            copies.push(Article {
                id: fresh,
                parent,
                data: node.data.clone(),
            });
        }
        copies
    }

    /// Next generated id that is not already a member.
    pub fn fresh_id(&mut self) -> ArticleId {
        loop {
            let id = self.generator.next_id();
            if !self.index.contains(&id) {
                return id;
            }
        }
    }

    /// A detached article with a fresh id. Blank titles get a synthetic
    /// "New Article N" name from the store's own counter.
    pub fn create_article(&mut self, title: Option<&str>) -> Article {
        let id = self.fresh_id();
        let data = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => ArticleData::titled(title),
            None => {
                self.untitled_count += 1;
                ArticleData::titled(format!("{} {}", self.default_title, self.untitled_count))
            }
        };
        Article::new(id, data)
    }

    /// Renames a member. Its position does not change; its children are re-pointed.
    #[instrument(level = "trace", skip(self))]
    pub fn reidentify(&mut self, id: ArticleId, new_id: ArticleId) -> Result<()> {
        let position = self.require_position(&id)?;
        if id == new_id {
            return Ok(());
        }
        let children = self.children_of(position)?;
        self.index.reassign(id, new_id)?;
        self.sequence[position].id = new_id;
        for child in children {
            let child_id = self.sequence[child].id;
            if let Some(article) = self.index.lookup_mut(&child_id) {
                article.parent = Some(new_id);
            }
        }
        self.notify(StructureEvent::IdentityChanged { old: id, new: new_id });
        debug!(old = %id, new = %new_id, "reidentified article");
        Ok(())
    }

    /// Edits an article's payload and notifies content observers.
    pub fn update_data<F>(&mut self, id: &ArticleId, edit: F) -> Result<()>
    where
        F: FnOnce(&mut ArticleData),
    {
        let article = self
            .index
            .lookup_mut(id)
            .ok_or(TreeError::UnknownArticle(*id))?;
        edit(&mut article.data);
        let event = ContentEvent::DataChanged { id: *id };
        for observer in self.content_observers.iter_mut() {
            observer.on_content_event(&event);
        }
        Ok(())
    }
}
