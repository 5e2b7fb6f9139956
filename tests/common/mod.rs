//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::{cell::Cell, cell::RefCell, rc::Rc};

use futures::executor::LocalPool;
use pod_actions::{
    app::App,
    bridge::RenderContext,
    config::BrowserConfig,
    editor::EditorWidget,
    storage::memory::{MemoryStorage, StaticSession},
};

#[allow(dead_code)]
pub const POD: &str = "https://alice.pod.example/";
#[allow(dead_code)]
pub const WEB_ID: &str = "https://alice.pod.example/profile/card#me";
#[allow(dead_code)]
pub const PROFILE: &str = "https://alice.pod.example/profile/card";

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// A listening history with one liked track and one bookmark without an object.
#[allow(dead_code)]
pub const HISTORY_TTL: &str = r#"@prefix schema: <https://schema.org/> .
<#play1> a schema:Action ;
    schema:additionalType schema:LikeAction ;
    schema:startTime "2024-01-01" ;
    schema:object <#track1> .
<#track1> schema:name "Blue in Green" .
<#play2> a schema:Action ;
    schema:additionalType schema:BookmarkAction ;
    schema:startTime "2024-01-02" .
"#;

/// An app over in-memory storage, driven by a local executor.
#[allow(dead_code)]
pub struct TestApp {
    pub app: App,
    pub storage: MemoryStorage,
    pub pool: LocalPool,
    pub renders: Rc<Cell<usize>>,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new(storage: MemoryStorage, session: StaticSession, start_uri: Option<&str>) -> Self {
        init_logging();
        let pool = LocalPool::new();
        let renders = Rc::new(Cell::new(0));
        let counter = renders.clone();
        let ctx = RenderContext::new(
            pool.spawner(),
            Rc::new(move || counter.set(counter.get() + 1)),
        );
        let config = BrowserConfig {
            start_uri: start_uri.map(str::to_string),
            ..Default::default()
        };
        let app = App::new(
            config,
            Rc::new(storage.clone()),
            Rc::new(session),
            ctx,
        );
        TestApp {
            app,
            storage,
            pool,
            renders,
        }
    }

    /// Logged-in app opened at `start_uri`.
    pub fn at(storage: MemoryStorage, start_uri: &str) -> Self {
        TestApp::new(storage, StaticSession::logged_in(WEB_ID), Some(start_uri))
    }

    /// Render, let every pending task settle, and render again.
    pub fn settle(&mut self) -> pod_actions::view::View {
        self.app.render();
        self.pool.run_until_stalled();
        self.app.render()
    }
}

/// Records every text pushed into the editor widget.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingWidget {
    pub pushed: RefCell<Vec<(String, Option<String>)>>,
}

impl EditorWidget for RecordingWidget {
    fn set_text(&self, text: &str, language: Option<&str>) {
        self.pushed
            .borrow_mut()
            .push((text.to_string(), language.map(str::to_string)));
    }
}
