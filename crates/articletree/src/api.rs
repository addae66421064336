//! # API Facade
//!
//! [`OutlineApi`] bundles what an editor front end needs for one open document: the
//! [`Outline`], its undo [`History`] and a [`Clipboard`]. Each method dispatches to a
//! command and records the resulting transaction, so front ends never have to thread
//! transactions through by hand.
//!
//! The facade holds no logic of its own. Command behavior is tested in `commands/*.rs`;
//! tests here only check dispatch and recording.

use crate::commands::clipboard::{self, Clipboard, PastePosition};
use crate::commands::sort::{self, SortKey};
use crate::commands::{create, delete, moves, CmdResult};
use crate::config::OutlineConfig;
use crate::error::{Result, TreeError};
use crate::history::History;
use crate::model::{ArticleData, ArticleId};
use crate::store::Outline;

#[derive(Debug, Default)]
pub struct OutlineApi {
    outline: Outline,
    history: History,
    clipboard: Clipboard,
}

impl OutlineApi {
    pub fn new(outline: Outline, history: History) -> Self {
        Self {
            outline,
            history,
            clipboard: Clipboard::new(),
        }
    }

    pub fn from_config(config: &OutlineConfig) -> Self {
        Self::new(Outline::from_config(config), History::from_config(config))
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// Direct access for observers and bulk loads. Structural edits made through this
    /// handle bypass the history, and undoing across them may fail with `StaleHistory`.
    pub fn outline_mut(&mut self) -> &mut Outline {
        &mut self.outline
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    fn record(&mut self, result: Result<CmdResult>) -> Result<CmdResult> {
        let result = result?;
        self.history.record(result.transaction.clone());
        Ok(result)
    }

    pub fn add_root(&mut self, title: Option<&str>) -> Result<CmdResult> {
        let result = create::add_root(&mut self.outline, title);
        self.record(result)
    }

    pub fn add_child(&mut self, parent: &ArticleId, title: Option<&str>) -> Result<CmdResult> {
        let result = create::add_child(&mut self.outline, parent, title);
        self.record(result)
    }

    pub fn add_sibling(&mut self, target: &ArticleId, title: Option<&str>) -> Result<CmdResult> {
        let result = create::add_sibling(&mut self.outline, target, title);
        self.record(result)
    }

    pub fn delete(&mut self, id: &ArticleId) -> Result<CmdResult> {
        let result = delete::run(&mut self.outline, id);
        self.record(result)
    }

    pub fn move_up(&mut self, id: &ArticleId) -> Result<CmdResult> {
        let result = moves::move_up(&mut self.outline, id);
        self.record(result)
    }

    pub fn move_down(&mut self, id: &ArticleId) -> Result<CmdResult> {
        let result = moves::move_down(&mut self.outline, id);
        self.record(result)
    }

    pub fn indent(&mut self, id: &ArticleId) -> Result<CmdResult> {
        let result = moves::indent(&mut self.outline, id);
        self.record(result)
    }

    pub fn outdent(&mut self, id: &ArticleId) -> Result<CmdResult> {
        let result = moves::outdent(&mut self.outline, id);
        self.record(result)
    }

    pub fn move_to(&mut self, id: &ArticleId, new_parent: &ArticleId) -> Result<CmdResult> {
        let result = moves::move_to(&mut self.outline, id, new_parent);
        self.record(result)
    }

    pub fn sort_children(&mut self, parent: &ArticleId, key: SortKey) -> Result<CmdResult> {
        let result = sort::sort_children(&mut self.outline, parent, key);
        self.record(result)
    }

    pub fn copy(&mut self, id: &ArticleId) -> Result<CmdResult> {
        clipboard::copy(&mut self.outline, &mut self.clipboard, id)
    }

    pub fn cut(&mut self, id: &ArticleId) -> Result<CmdResult> {
        let result = clipboard::cut(&mut self.outline, &mut self.clipboard, id);
        self.record(result)
    }

    pub fn paste(&mut self, target: &ArticleId, placement: PastePosition) -> Result<CmdResult> {
        let result = clipboard::paste(&mut self.outline, &self.clipboard, target, placement);
        self.record(result)
    }

    pub fn duplicate(&mut self, id: &ArticleId) -> Result<CmdResult> {
        let result = clipboard::duplicate(&mut self.outline, id);
        self.record(result)
    }

    /// Content edits go to content observers and are not part of the structural history.
    pub fn edit<F>(&mut self, id: &ArticleId, edit: F) -> Result<()>
    where
        F: FnOnce(&mut ArticleData),
    {
        self.outline.update_data(id, edit)
    }

    pub fn undo(&mut self) -> Result<Option<String>> {
        self.history.undo(&mut self.outline)
    }

    pub fn redo(&mut self) -> Result<Option<String>> {
        self.history.redo(&mut self.outline)
    }

    /// Runs the structural consistency check.
    pub fn doctor(&self) -> Result<()> {
        self.outline.verify().map_err(|err| match err {
            TreeError::Inconsistent(_) => err,
            other => TreeError::Inconsistent(other.to_string()),
        })
    }
}
