//! # pod-actions
//!
//! A browser for a Solid pod that edits the schema.org actions (bookmarks, likes, follows) stored in
//! it as linked data.
//!
//! ## Overview
//!
//! After login the user lands on a folder of their pod (the storage root declared in their profile,
//! or a configured start URI). Folders list their children; files open in an editor. When a file's
//! content parses as RDF and contains `schema:Action` resources, the editor shows them as a table
//! whose action type can be changed in place. Everything else is edited as raw text.
//!
//! ## Architecture
//!
//! - **[`rdf`]**: content-type dispatch, parsing into a [`rdf::TripleStore`], N-Triples output
//! - **[`action`]**: reading and rewriting actions in a store
//! - **[`storage`]**: the host-supplied authenticated fetch and session, plus in-memory versions
//! - **[`bridge`]** and **[`memo`]**: memoized tasks and the loading / success / error view states
//! - **[`folder`]**, **[`editor`]**, **[`navigator`]**, **[`app`]**: the components
//! - **[`view`]** and **[`event`]**: the rendered view tree and the events it dispatches
//!
//! Components are single threaded. A component's `render` observes its tasks, and when one settles
//! the [`bridge::RenderContext`] asks the host to render again.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//! use futures::executor::LocalPool;
//! use pod_actions::{
//!     app::App,
//!     bridge::RenderContext,
//!     config::BrowserConfig,
//!     storage::memory::{MemoryStorage, StaticSession},
//! };
//!
//! let storage = MemoryStorage::new();
//! storage.insert_container("https://alice.pod.example/", &["notes.txt", "music/"]);
//!
//! let mut pool = LocalPool::new();
//! let renders = Rc::new(Cell::new(0));
//! let counter = renders.clone();
//! let ctx = RenderContext::new(pool.spawner(), Rc::new(move || counter.set(counter.get() + 1)));
//!
//! let config = BrowserConfig {
//!     start_uri: Some("https://alice.pod.example/".to_string()),
//!     ..Default::default()
//! };
//! let session = StaticSession::logged_in("https://alice.pod.example/profile/card#me");
//! let mut app = App::new(config, Rc::new(storage), Rc::new(session), ctx);
//!
//! assert!(app.render().text_content().contains("Loading ..."));
//! pool.run_until_stalled();
//! assert_eq!(renders.get(), 1);
//! assert!(app.render().text_content().contains("music/"));
//! ```
//!
//! ## Features
//!
//! - **default**: components, RDF handling, in-memory storage
//! - **wasm**: [`wasm::BrowserApp`] bindings for the browser host page

pub mod action;
pub mod app;
pub mod bridge;
pub mod config;
pub mod editor;
pub mod error;
pub mod event;
pub mod folder;
pub mod memo;
pub mod navigator;
pub mod rdf;
pub mod storage;
#[cfg(test)]
mod tests;
pub mod view;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::*;
