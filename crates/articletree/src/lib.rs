//! # Articletree Architecture
//!
//! Articletree is the **document store behind an outline editor**: one document holds a
//! tree of articles, and the editor reorders, reparents, cuts, copies and pastes whole
//! subtrees of it, with undo.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Facade (api.rs)                                        │
//! │  - Outline + History + Clipboard for one open document      │
//! │  - Dispatches to commands, records transactions             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs, history.rs)                  │
//! │  - Moves, sorting, clipboard: compositions of primitives    │
//! │  - Atomic, return structured CmdResult + Transaction        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (store/, validation.rs, identity.rs, events.rs)      │
//! │  - Pre-order flattened sequence + identity index            │
//! │  - insert_subtree / remove_subtree, validated up front      │
//! │  - Change notifications to observers                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Two Primitives
//!
//! The only operations that change the shape of the tree are `insert_subtree` and
//! `remove_subtree`. Reinserting a removed block at its original `(parent, index)`
//! restores the previous state exactly; the undo history relies on nothing else.
//!
//! ## No I/O
//!
//! Nothing in this crate prints, prompts or touches the filesystem, except
//! [`config::OutlineConfig::load`]. Commands return data; front ends decide how to show it.
//! Diagnostics go through `tracing`; installing a subscriber is up to the application.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade for one open document
//! - [`commands`]: Structural edits built on the primitives
//! - [`history`]: Transactions and the undo/redo stacks
//! - [`store`]: The ordered sequence store ([`Outline`])
//! - [`identity`]: Identity index and id generators
//! - [`events`]: Structure and content observers
//! - [`model`]: `Article`, `ArticleId`, `ArticleData`
//! - [`config`]: Layered configuration
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
mod display;
pub mod error;
pub mod events;
pub mod history;
pub mod identity;
pub mod model;
pub mod store;
mod validation;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use api::OutlineApi;
pub use error::{Result, TreeError};
pub use model::{Article, ArticleData, ArticleId};
pub use store::Outline;
