//! # Identities
//!
//! Two concerns live here:
//!
//! 1. **Generation**: where fresh [`ArticleId`]s come from. Generators are injected into an
//!    [`crate::store::Outline`] at construction, there is no hidden global counter.
//!    - [`UuidGenerator`]: random v4 UUIDs (production default).
//!    - [`SequentialGenerator`]: monotonically increasing, deterministic ids. Handy for
//!      tests and reproducible documents.
//! 2. **Lookup**: the [`IdentityIndex`], an `id → Article` map that owns the articles of a
//!    store. The ordered sequence only holds ids; the index holds the values.

use crate::config::IdStrategy;
use crate::error::{Result, TreeError};
use crate::model::{Article, ArticleId};
use std::collections::HashMap;
use uuid::Uuid;

/// Source of fresh article identities.
pub trait IdGenerator {
    fn next_id(&mut self) -> ArticleId;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> ArticleId {
        ArticleId::new(Uuid::new_v4())
    }
}

#[derive(Debug, Clone)]
pub struct SequentialGenerator {
    next: u128,
}

impl Default for SequentialGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl SequentialGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: u128) -> Self {
        Self { next: first }
    }
}

impl IdGenerator for SequentialGenerator {
    fn next_id(&mut self) -> ArticleId {
        let id = ArticleId::from_u128(self.next);
        self.next += 1;
        id
    }
}

pub fn generator_for(strategy: IdStrategy) -> Box<dyn IdGenerator> {
    match strategy {
        IdStrategy::Uuid => Box::new(UuidGenerator),
        IdStrategy::Sequential => Box::new(SequentialGenerator::new()),
    }
}

/// Owning `id → Article` map.
#[derive(Debug, Default, Clone)]
pub struct IdentityIndex {
    articles: HashMap<ArticleId, Article>,
}

impl IdentityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, id: &ArticleId) -> Option<&Article> {
        self.articles.get(id)
    }

    pub(crate) fn lookup_mut(&mut self, id: &ArticleId) -> Option<&mut Article> {
        self.articles.get_mut(id)
    }

    pub fn contains(&self, id: &ArticleId) -> bool {
        self.articles.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Adds an article under its own id. Fails if the id is already taken.
    pub fn put(&mut self, article: Article) -> Result<()> {
        if self.articles.contains_key(&article.id) {
            return Err(TreeError::DuplicateIdentity(article.id));
        }
        self.articles.insert(article.id, article);
        Ok(())
    }

    /// Removes and returns the mapping. No-op if absent.
    pub fn remove(&mut self, id: &ArticleId) -> Option<Article> {
        self.articles.remove(id)
    }

    /// Renames `old_id` to `new_id`, updating the article's own id.
    pub fn reassign(&mut self, old_id: ArticleId, new_id: ArticleId) -> Result<()> {
        if old_id == new_id {
            return if self.articles.contains_key(&old_id) {
                Ok(())
            } else {
                Err(TreeError::UnknownArticle(old_id))
            };
        }
        if self.articles.contains_key(&new_id) {
            return Err(TreeError::DuplicateIdentity(new_id));
        }
        let mut article = self
            .articles
            .remove(&old_id)
            .ok_or(TreeError::UnknownArticle(old_id))?;
        article.id = new_id;
        self.articles.insert(new_id, article);
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.articles.clear();
    }
}
