//! Editing a single (non-container) resource.
//!
//! The editor fetches the resource, keeps an editable `{text, content_type}` buffer and tries to read
//! the buffer as linked data. When the parsed store holds schema.org actions, the actions are shown as
//! a table whose type column is editable; otherwise (or on request) the raw text goes to the external
//! editor widget.
//!
//! Action edits change the store in place, then the store is written back into the buffer as
//! N-Triples. The buffer is only persisted when the user saves.

use std::rc::Rc;

use crate::{
    action::{ActionGraph, ActionRecord, ActionType},
    bridge::{
        render_state, render_state_with, Fallbacks, PromiseTracker, RenderContext, Task, TaskId,
        TaskSlot, ViewState,
    },
    deps,
    error::BrowserError,
    event::{BrowserEvent, ChangeEvent},
    memo::Memo,
    rdf::{parse::media_type_essence, parse_rdf, Node, RdfContentType, TripleStore},
    storage::{Fetched, StorageClient, DEFAULT_CONTENT_TYPE},
    view::{EditorMount, Element, View},
};

/// The external text editor.
pub trait EditorWidget {
    /// Replace the widget's text. Called whenever the buffer changes from outside the widget.
    fn set_text(&self, text: &str, language: Option<&str>);
}

/// Syntax highlighting hint for the widget.
pub fn editor_language(content_type: &str) -> Option<&'static str> {
    match media_type_essence(content_type).as_str() {
        "text/turtle" => Some("turtle"),
        "application/json" => Some("json"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub text: String,
    pub content_type: String,
}

pub struct FileEditor {
    file_uri: String,
    storage: Rc<dyn StorageClient>,
    content_types: Vec<String>,
    file: TaskSlot<Fetched>,
    loaded_from: Option<TaskId>,
    content: Option<FileContent>,
    /// Bumped on every buffer change; the parsed store is memoized on it
    revision: u64,
    dirty: bool,
    graph: Memo<Option<TripleStore>>,
    show_actions: Option<bool>,
    save: PromiseTracker<()>,
    /// In-flight or last save, with the revision it wrote
    save_task: Option<(Task<()>, u64)>,
    widget: Option<Rc<dyn EditorWidget>>,
}

impl FileEditor {
    pub fn new(
        file_uri: String,
        storage: Rc<dyn StorageClient>,
        ctx: RenderContext,
        content_types: Vec<String>,
    ) -> Self {
        FileEditor {
            file_uri,
            storage,
            content_types,
            file: TaskSlot::new(ctx.clone()),
            loaded_from: None,
            content: None,
            revision: 0,
            dirty: false,
            graph: Memo::default(),
            show_actions: None,
            save: PromiseTracker::new(ctx),
            save_task: None,
            widget: None,
        }
    }

    pub fn file_uri(&self) -> &str {
        &self.file_uri
    }

    pub fn content(&self) -> Option<&FileContent> {
        self.content.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Attach the text widget and push the current buffer into it.
    pub fn attach_editor(&mut self, widget: Rc<dyn EditorWidget>) {
        self.widget = Some(widget);
        self.push_to_widget();
    }

    pub fn detach_editor(&mut self) {
        self.widget = None;
    }

    fn push_to_widget(&self) {
        if let (Some(widget), Some(content)) = (&self.widget, &self.content) {
            widget.set_text(&content.text, editor_language(&content.content_type));
        }
    }

    /// Fold settled fetch and save outcomes into the editor state.
    fn sync(&mut self) -> ViewState<Fetched> {
        let storage = &self.storage;
        let file_uri = &self.file_uri;
        let state = self.file.observe(
            || Some(Task::new(storage.fetch(file_uri))),
            deps![file_uri, storage],
        );

        let task_id = self.file.task().map(Task::id);
        match &state {
            ViewState::Settled(Ok(fetched)) if self.loaded_from != task_id => {
                tracing::debug!(
                    "[FileEditor] loaded {} ({})",
                    self.file_uri,
                    fetched.media_type()
                );
                self.loaded_from = task_id;
                self.content = Some(FileContent {
                    text: fetched.text(),
                    content_type: fetched.media_type().to_string(),
                });
                self.revision += 1;
                self.dirty = false;
                self.push_to_widget();
            }
            ViewState::Pending => {
                self.content = None;
            }
            _ => {}
        }

        let save_state = self.save.observe(self.save_task.as_ref().map(|(task, _)| task));
        if let (ViewState::Settled(Ok(())), Some((_, saved_revision))) =
            (&save_state, &self.save_task)
        {
            if *saved_revision == self.revision && self.dirty {
                tracing::debug!("[FileEditor] saved {}", self.file_uri);
                self.dirty = false;
            }
        }

        state
    }

    fn graph(&mut self) -> Option<&mut TripleStore> {
        let content = &self.content;
        let file_uri = &self.file_uri;
        self.graph.get(
            || {
                content
                    .as_ref()
                    .and_then(|c| parse_rdf(&c.text, file_uri, &c.content_type))
            },
            deps![self.revision],
        );
        self.graph.value_mut().and_then(Option::as_mut)
    }

    pub fn has_actions(&mut self) -> bool {
        self.sync();
        self.graph().is_some_and(|graph| graph.has_actions())
    }

    /// Whether the action table replaces the text editor. Defaults to shown when the buffer holds
    /// actions, until the user toggles it. Without actions the text editor is always shown.
    pub fn show_actions_editor(&mut self) -> bool {
        self.has_actions() && self.show_actions.unwrap_or(true)
    }

    pub fn action_records(&mut self) -> Option<Vec<ActionRecord>> {
        self.sync();
        self.graph().map(|graph| graph.action_records())
    }

    pub fn update(&mut self, event: BrowserEvent) -> Result<(), BrowserError> {
        self.sync();
        match event {
            BrowserEvent::EditContent(text) => self.modify_content(Some(text), None),
            BrowserEvent::ChangeContentType(content_type) => {
                self.modify_content(None, Some(content_type))
            }
            BrowserEvent::SaveFile => self.save()?,
            BrowserEvent::ToggleActionsEditor => {
                let shown = self.show_actions_editor();
                self.show_actions = Some(!shown);
            }
            BrowserEvent::SetActionType { subject, type_iri } => {
                self.set_action_type(&subject, &type_iri)?
            }
            other => tracing::debug!("[FileEditor] ignoring {other}"),
        }
        Ok(())
    }

    fn modify_content(&mut self, text: Option<String>, content_type: Option<String>) {
        let previous = self.content.take();
        let text = text
            .or_else(|| previous.as_ref().map(|c| c.text.clone()))
            .unwrap_or_default();
        let content_type = content_type
            .or_else(|| previous.map(|c| c.content_type))
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        self.content = Some(FileContent { text, content_type });
        self.revision += 1;
        self.dirty = true;
    }

    fn set_action_type(&mut self, subject: &Node, type_iri: &str) -> Result<(), BrowserError> {
        let Some(graph) = self.graph() else {
            return Err(BrowserError::NotFound(format!(
                "no linked data loaded to update action {subject}"
            )));
        };
        graph.set_action_type(subject, type_iri);
        let serialized = graph.to_ntriples()?;

        // N-Triples is valid Turtle; any other serialization is relabelled
        let content_type = self
            .content
            .as_ref()
            .map(|c| c.content_type.as_str())
            .and_then(RdfContentType::from_media_type)
            .filter(|t| matches!(t, RdfContentType::Turtle | RdfContentType::NTriples))
            .map(|t| t.media_type())
            .unwrap_or(RdfContentType::NTriples.media_type());

        self.modify_content(Some(serialized), Some(content_type.to_string()));
        self.push_to_widget();
        Ok(())
    }

    fn save(&mut self) -> Result<(), BrowserError> {
        let Some(content) = &self.content else {
            return Err(BrowserError::NotFound(format!(
                "nothing loaded to save for {}",
                self.file_uri
            )));
        };
        tracing::debug!("[FileEditor] saving {}", self.file_uri);
        let task = Task::new(self.storage.put(
            &self.file_uri,
            content.text.clone(),
            &content.content_type,
        ));
        self.save_task = Some((task, self.revision));
        Ok(())
    }

    pub fn render(&mut self) -> View {
        let file_state = self.sync();
        let has_actions = self.has_actions();
        let show_actions = self.show_actions_editor();

        let current_type = self
            .content
            .as_ref()
            .map(|c| c.content_type.clone())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let mut root = Element::new("div").child(select(
            &self.content_types,
            &current_type,
            ChangeEvent::ContentType,
        ));

        if self.dirty {
            root = root.child(
                Element::new("button")
                    .on_click(BrowserEvent::SaveFile)
                    .child("Save"),
            );
        }
        if has_actions {
            root = root.child(
                Element::new("button")
                    .on_click(BrowserEvent::ToggleActionsEditor)
                    .child("Toggle Editor"),
            );
        }
        if let Some((task, _)) = &self.save_task {
            root = root.child(render_state_with(
                &self.save.observe(Some(task)),
                |_| View::Empty,
                Fallbacks {
                    loading: Some(Box::new(|| {
                        View::from(Element::new("span").child("Saving ..."))
                    })),
                    ..Default::default()
                },
            ));
        }

        let table = if show_actions {
            self.graph().map(|graph| actions_table(&graph.action_records()))
        } else {
            None
        };
        let body = match table {
            Some(table) => table,
            None => match &self.content {
                Some(content) => View::Editor(EditorMount {
                    text: content.text.clone(),
                    language: editor_language(&content.content_type).map(str::to_string),
                }),
                None => render_state(&file_state, |_| View::Empty),
            }
        };
        root.child(body).into()
    }
}

fn select(options: &[String], current: &str, on_change: ChangeEvent) -> Element {
    let mut choices: Vec<&str> = options.iter().map(String::as_str).collect();
    if !choices.contains(&current) {
        choices.push(current);
    }
    Element::new("select")
        .attr("value", current)
        .on_change(on_change)
        .children(choices.into_iter().map(|choice| {
            let option = Element::new("option").attr("value", choice);
            let option = if choice == current {
                option.attr("selected", "selected")
            } else {
                option
            };
            option.child(choice)
        }))
}

fn actions_table(records: &[ActionRecord]) -> View {
    let type_options: Vec<String> = ActionType::ALL
        .iter()
        .map(|t| t.iri().to_string())
        .collect();

    let header = Element::new("tr").children(
        ["Type", "Time", "Object"]
            .into_iter()
            .map(|title| Element::new("th").child(title)),
    );
    let rows = records.iter().map(|record| {
        let type_cell = match &record.action_type {
            Some(current) => select(
                &type_options,
                current,
                ChangeEvent::ActionType {
                    subject: record.subject.clone(),
                },
            ),
            None => select(
                &type_options,
                ActionType::Bookmark.iri(),
                ChangeEvent::ActionType {
                    subject: record.subject.clone(),
                },
            )
            .attr("data-unset", "true"),
        };
        Element::new("tr")
            .attr("data-subject", record.subject.value())
            .child(Element::new("td").child(type_cell))
            .child(Element::new("td").child(record.start_time.clone()))
            .child(Element::new("td").child(record.object.name.clone()))
    });

    Element::new("table")
        .child(Element::new("tbody").child(header).children(rows))
        .into()
}
