//! Text renderings of an outline for debugging, logs and simple front ends.

use crate::store::Outline;
use std::fmt;
use termtree::Tree;

impl Outline {
    /// Renders the titles as a box-drawing tree, in one pass over the sequence.
    pub fn to_tree(&self) -> Tree<String> {
        // open[d] is the unfinished tree of the latest article at depth d
        let mut open: Vec<Tree<String>> = Vec::new();
        for (depth, article) in self.iter() {
            close_deeper(&mut open, depth);
            open.push(Tree::new(article.data.display_title()));
        }
        close_deeper(&mut open, 1);
        open.pop().unwrap_or_else(|| Tree::new("(empty outline)".to_string()))
    }

    /// One title per line, indented two spaces per level.
    pub fn to_outline_text(&self) -> String {
        let mut text = String::new();
        for (depth, article) in self.iter() {
            text.push_str(&"  ".repeat(depth));
            text.push_str(&article.data.display_title());
            text.push('\n');
        }
        text
    }
}

/// Folds every open tree at `depth` or deeper into its parent. The root is never folded.
fn close_deeper(open: &mut Vec<Tree<String>>, depth: usize) {
    while open.len() > depth.max(1) {
        if let Some(done) = open.pop() {
            if let Some(parent) = open.last_mut() {
                parent.push(done);
            }
        }
    }
}

impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_tree())
    }
}
