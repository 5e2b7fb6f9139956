//! Resource browser: decides what to show and dispatches to the folder or file view.
//!
//! ```text
//! Unresolved ──(explicit uri)──────────────────────────► Resolved(uri)
//!     │                                                     │   ▲
//!     └─(identity)─► Resolving ──(profile pim:storage)──────┘   │
//!                        │                               select / parent
//!                        └─(no storage root, or error)─► Unresolved
//! ```
//!
//! A resolved URI is shown as a [`FolderView`] when the storage considers it a container and as a
//! [`FileEditor`] otherwise. Navigating while the profile is still being resolved supersedes the
//! resolution; its late outcome is discarded by the bridge.

use std::rc::Rc;

use crate::{
    bridge::{render_state, PromiseTracker, RenderContext, Task, ViewState},
    editor::{EditorWidget, FileEditor},
    error::BrowserError,
    event::BrowserEvent,
    folder::{FolderView, CONTAINER_ICON, RESOURCE_ICON},
    storage::{parent_of, resolve_storage_root, Session, StorageClient},
    view::{Element, View},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavState {
    Unresolved,
    Resolving,
    Resolved(String),
}

enum Target {
    Folder(FolderView),
    File(FileEditor),
}

pub struct ResourceBrowser {
    storage: Rc<dyn StorageClient>,
    ctx: RenderContext,
    content_types: Vec<String>,
    state: NavState,
    resolving: Option<Task<Option<String>>>,
    resolver: PromiseTracker<Option<String>>,
    resolve_error: Option<BrowserError>,
    target: Option<Target>,
    widget: Option<Rc<dyn EditorWidget>>,
}

impl ResourceBrowser {
    /// Start at `uri` if given, otherwise at the storage root declared in the session identity's
    /// profile.
    pub fn new(
        uri: Option<String>,
        session: &dyn Session,
        storage: Rc<dyn StorageClient>,
        ctx: RenderContext,
        content_types: Vec<String>,
    ) -> Self {
        let resolver = PromiseTracker::new(ctx.clone());
        let mut browser = ResourceBrowser {
            storage,
            ctx,
            content_types,
            state: NavState::Unresolved,
            resolving: None,
            resolver,
            resolve_error: None,
            target: None,
            widget: None,
        };

        match (uri, session.web_id()) {
            (Some(uri), _) => browser.select(uri),
            (None, Some(web_id)) => {
                tracing::debug!("[ResourceBrowser] resolving storage root of {web_id}");
                browser.state = NavState::Resolving;
                browser.resolving = Some(Task::new(resolve_storage_root(
                    browser.storage.as_ref(),
                    &web_id,
                )));
            }
            (None, None) => {
                tracing::debug!("[ResourceBrowser] no start uri and no identity");
            }
        }
        browser
    }

    pub fn state(&mut self) -> &NavState {
        self.sync();
        &self.state
    }

    pub fn current_uri(&mut self) -> Option<&str> {
        match self.state() {
            NavState::Resolved(uri) => Some(uri.as_str()),
            _ => None,
        }
    }

    pub fn is_folder(&mut self) -> bool {
        self.sync();
        matches!(self.target, Some(Target::Folder(_)))
    }

    pub fn folder_mut(&mut self) -> Option<&mut FolderView> {
        self.sync();
        match &mut self.target {
            Some(Target::Folder(folder)) => Some(folder),
            _ => None,
        }
    }

    pub fn file_mut(&mut self) -> Option<&mut FileEditor> {
        self.sync();
        match &mut self.target {
            Some(Target::File(editor)) => Some(editor),
            _ => None,
        }
    }

    fn sync(&mut self) {
        if self.state != NavState::Resolving {
            return;
        }
        match self.resolver.observe(self.resolving.as_ref()) {
            ViewState::Pending => {}
            ViewState::Settled(Ok(Some(root))) => self.select(root),
            ViewState::Settled(Ok(None)) => {
                tracing::warn!("[ResourceBrowser] profile declares no storage root");
                self.resolving = None;
                self.state = NavState::Unresolved;
            }
            ViewState::Settled(Err(err)) => {
                self.resolving = None;
                self.resolve_error = Some(err);
                self.state = NavState::Unresolved;
            }
        }
    }

    pub fn select(&mut self, uri: String) {
        tracing::debug!("[ResourceBrowser] select {uri}");
        if self.resolving.take().is_some() {
            self.resolver.observe(None);
        }
        self.resolve_error = None;

        let target = if self.storage.is_container(&uri) {
            Target::Folder(FolderView::new(
                uri.clone(),
                self.storage.clone(),
                self.ctx.clone(),
            ))
        } else {
            let mut editor = FileEditor::new(
                uri.clone(),
                self.storage.clone(),
                self.ctx.clone(),
                self.content_types.clone(),
            );
            if let Some(widget) = &self.widget {
                editor.attach_editor(widget.clone());
            }
            Target::File(editor)
        };
        self.target = Some(target);
        self.state = NavState::Resolved(uri);
    }

    pub fn navigate_parent(&mut self) -> Result<(), BrowserError> {
        self.sync();
        if let NavState::Resolved(uri) = &self.state {
            let parent = parent_of(uri)?;
            self.select(parent);
        }
        Ok(())
    }

    pub fn attach_editor(&mut self, widget: Rc<dyn EditorWidget>) {
        self.widget = Some(widget.clone());
        if let Some(Target::File(editor)) = &mut self.target {
            editor.attach_editor(widget);
        }
    }

    pub fn update(&mut self, event: BrowserEvent) -> Result<(), BrowserError> {
        self.sync();
        match event {
            BrowserEvent::Select(uri) => self.select(uri),
            BrowserEvent::NavigateParent => self.navigate_parent()?,
            other => match &mut self.target {
                Some(Target::File(editor)) => editor.update(other)?,
                _ => tracing::debug!("[ResourceBrowser] no file open, ignoring {other}"),
            },
        }
        Ok(())
    }

    pub fn render(&mut self) -> View {
        self.sync();

        let header = match &self.state {
            NavState::Resolved(uri) => {
                let icon = if matches!(self.target, Some(Target::Folder(_))) {
                    CONTAINER_ICON
                } else {
                    RESOURCE_ICON
                };
                Element::new("h3")
                    .child(
                        Element::new("a")
                            .attr("href", "#")
                            .on_click(BrowserEvent::NavigateParent)
                            .child("[..]"),
                    )
                    .child(format!(" {icon} {uri}"))
                    .into()
            }
            _ => View::Empty,
        };

        let body = match (&self.state, &mut self.target) {
            (NavState::Resolving, _) => render_state(&ViewState::<()>::Pending, |_| View::Empty),
            (NavState::Unresolved, _) => match &self.resolve_error {
                Some(err) => render_state(&ViewState::<()>::Settled(Err(err.clone())), |_| {
                    View::Empty
                }),
                None => View::Empty,
            },
            (NavState::Resolved(_), Some(Target::Folder(folder))) => folder.render(),
            (NavState::Resolved(_), Some(Target::File(editor))) => editor.render(),
            (NavState::Resolved(_), None) => View::Empty,
        };

        Element::new("div").child(header).child(body).into()
    }
}
