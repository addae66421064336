//! # Ordered Sequence Store
//!
//! [`Outline`] stores a tree as a **pre-order flattened sequence**: every node is followed
//! immediately by its whole descendant block, and only then by its next sibling.
//!
//! ```text
//! Root          position 0, depth 0
//! ├── A         position 1, depth 1
//! │   └── A1    position 2, depth 2
//! └── B         position 3, depth 1
//! ```
//!
//! ## Invariants
//!
//! - The root, if any, sits at position 0 and is the only node without a parent.
//! - A node's subtree is the contiguous range starting at the node and ending at the last
//!   following position whose depth is strictly greater than the node's depth.
//! - A node is in the identity index iff it is in the sequence, exactly once.
//! - `depth(child) == depth(parent) + 1`, and the parent of the node at `i` is the nearest
//!   preceding position with depth `depth(i) - 1`.
//!
//! ## Derived, Never Stored
//!
//! Children lists are not stored. Everything structural (children, child rank, branch
//! depth, cut, copy) is computed from [`Outline::subtree_range`], the single depth-scanning
//! primitive. The sequence holds ids and cached depths; the [`IdentityIndex`] owns the
//! articles themselves.
//!
//! ## Mutation Primitives
//!
//! Only two operations change the shape of the tree: `insert_subtree` and
//! `remove_subtree` (see `mutate.rs`). Moves, sorting and paste are compositions of those
//! two, living in [`crate::commands`].
//!
//! ## Concurrency
//!
//! The store is single-writer and fully synchronous. Mutations take `&mut self`, so the
//! borrow checker serializes them; reads may interleave freely.

use crate::config::OutlineConfig;
use crate::error::{Result, TreeError};
use crate::events::{ContentObserver, StructureEvent, StructureObserver};
use crate::identity::{generator_for, IdGenerator, IdentityIndex, UuidGenerator};
use crate::model::{Article, ArticleId};
use std::fmt;
use std::ops::Range;

mod load;
mod mutate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot {
    pub(crate) id: ArticleId,
    pub(crate) depth: usize,
}

pub struct Outline {
    sequence: Vec<Slot>,
    index: IdentityIndex,
    generator: Box<dyn IdGenerator>,
    default_title: String,
    untitled_count: u32,
    observers: Vec<Box<dyn StructureObserver>>,
    content_observers: Vec<Box<dyn ContentObserver>>,
}

impl Default for Outline {
    fn default() -> Self {
        Self::with_generator(Box::new(UuidGenerator))
    }
}

impl fmt::Debug for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outline")
            .field("sequence", &self.sequence)
            .field("index", &self.index)
            .field("observers", &self.observers.len())
            .field("content_observers", &self.content_observers.len())
            .finish()
    }
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_generator(generator: Box<dyn IdGenerator>) -> Self {
        Self {
            sequence: Vec::new(),
            index: IdentityIndex::new(),
            generator,
            default_title: OutlineConfig::default().default_title,
            untitled_count: 0,
            observers: Vec::new(),
            content_observers: Vec::new(),
        }
    }

    pub fn from_config(config: &OutlineConfig) -> Self {
        let mut outline = Self::with_generator(generator_for(config.id_strategy));
        outline.default_title = config.default_title().to_string();
        outline
    }

    pub fn subscribe(&mut self, observer: Box<dyn StructureObserver>) {
        self.observers.push(observer);
    }

    pub fn subscribe_content(&mut self, observer: Box<dyn ContentObserver>) {
        self.content_observers.push(observer);
    }

    pub(crate) fn notify(&mut self, event: StructureEvent) {
        for observer in self.observers.iter_mut() {
            observer.on_structure_event(&event);
        }
    }

    // --- Queries ---

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn root(&self) -> Option<&Article> {
        self.at(0)
    }

    pub fn get(&self, id: &ArticleId) -> Option<&Article> {
        self.index.lookup(id)
    }

    pub fn contains(&self, id: &ArticleId) -> bool {
        self.index.contains(id)
    }

    pub fn index(&self) -> &IdentityIndex {
        &self.index
    }

    pub fn at(&self, position: usize) -> Option<&Article> {
        self.sequence
            .get(position)
            .and_then(|slot| self.index.lookup(&slot.id))
    }

    pub fn id_at(&self, position: usize) -> Option<ArticleId> {
        self.sequence.get(position).map(|slot| slot.id)
    }

    pub fn depth_at(&self, position: usize) -> Option<usize> {
        self.sequence.get(position).map(|slot| slot.depth)
    }

    pub fn depth_of(&self, id: &ArticleId) -> Option<usize> {
        self.position_of(id).and_then(|position| self.depth_at(position))
    }

    /// Sequence position of a member, `None` if not a member.
    pub fn position_of(&self, id: &ArticleId) -> Option<usize> {
        if !self.index.contains(id) {
            return None;
        }
        self.sequence.iter().position(|slot| slot.id == *id)
    }

    pub fn require_position(&self, id: &ArticleId) -> Result<usize> {
        self.position_of(id).ok_or(TreeError::UnknownArticle(*id))
    }

    fn check_bounds(&self, position: usize) -> Result<()> {
        if position >= self.sequence.len() {
            return Err(TreeError::OutOfBounds {
                index: position,
                len: self.sequence.len(),
            });
        }
        Ok(())
    }

    /// The node at `position` and all of its descendants, as `[position, end)`.
    pub fn subtree_range(&self, position: usize) -> Result<Range<usize>> {
        self.check_bounds(position)?;
        let depth = self.sequence[position].depth;
        let end = self.sequence[position + 1..]
            .iter()
            .position(|slot| slot.depth <= depth)
            .map_or(self.sequence.len(), |offset| position + 1 + offset);
        Ok(position..end)
    }

    /// Positions of the direct children of the node at `position`, in order.
    pub fn children_of(&self, position: usize) -> Result<Vec<usize>> {
        let range = self.subtree_range(position)?;
        let child_depth = self.sequence[position].depth + 1;
        Ok(range
            .skip(1)
            .filter(|&i| self.sequence[i].depth == child_depth)
            .collect())
    }

    pub fn children_ids(&self, id: &ArticleId) -> Result<Vec<ArticleId>> {
        let position = self.require_position(id)?;
        Ok(self
            .children_of(position)?
            .into_iter()
            .map(|i| self.sequence[i].id)
            .collect())
    }

    /// 0-based rank of the article among its siblings (0 for the root).
    pub fn child_rank(&self, id: &ArticleId) -> Result<usize> {
        let position = self.require_position(id)?;
        self.rank_at(position)
    }

    pub(crate) fn rank_at(&self, position: usize) -> Result<usize> {
        match self.parent_position(position)? {
            Some(parent) => Ok(self
                .children_of(parent)?
                .iter()
                .position(|&i| i == position)
                .unwrap_or(0)),
            None => Ok(0),
        }
    }

    /// Maximum depth difference between the node and any of its descendants.
    pub fn branch_depth(&self, position: usize) -> Result<usize> {
        let range = self.subtree_range(position)?;
        let depth = self.sequence[position].depth;
        Ok(self.sequence[range]
            .iter()
            .map(|slot| slot.depth - depth)
            .max()
            .unwrap_or(0))
    }

    pub fn has_children(&self, id: &ArticleId) -> bool {
        self.position_of(id)
            .and_then(|position| self.subtree_range(position).ok())
            .is_some_and(|range| range.len() > 1)
    }

    /// Position of the parent: the nearest preceding slot one level up.
    pub fn parent_position(&self, position: usize) -> Result<Option<usize>> {
        self.check_bounds(position)?;
        let depth = self.sequence[position].depth;
        if depth == 0 {
            return Ok(None);
        }
        Ok(self.sequence[..position]
            .iter()
            .rposition(|slot| slot.depth == depth - 1))
    }

    /// Whether `id` lies in the subtree of `ancestor` (an article is its own ancestor).
    pub fn is_ancestor(&self, ancestor: &ArticleId, id: &ArticleId) -> bool {
        match (self.position_of(ancestor), self.position_of(id)) {
            (Some(a), Some(i)) => self
                .subtree_range(a)
                .is_ok_and(|range| range.contains(&i)),
            _ => false,
        }
    }

    /// Pre-order traversal as `(depth, article)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Article)> + '_ {
        self.sequence.iter().filter_map(|slot| {
            self.index
                .lookup(&slot.id)
                .map(|article| (slot.depth, article))
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = ArticleId> + '_ {
        self.sequence.iter().map(|slot| slot.id)
    }
}
