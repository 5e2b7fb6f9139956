use std::rc::Rc;

use crate::{
    bridge::{RenderContext, Task, TaskSlot, ViewState},
    deps,
    event::BrowserEvent,
    storage::StorageClient,
    view::{Element, View},
};

pub const CONTAINER_ICON: &str = "📁";
pub const RESOURCE_ICON: &str = "📄";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub uri: String,
    /// URI relative to the listed folder
    pub label: String,
    pub is_container: bool,
}

/// Listing of one container. Each child is a selectable entry.
pub struct FolderView {
    folder_uri: String,
    storage: Rc<dyn StorageClient>,
    children: TaskSlot<Vec<String>>,
}

impl FolderView {
    pub fn new(folder_uri: String, storage: Rc<dyn StorageClient>, ctx: RenderContext) -> Self {
        FolderView {
            folder_uri,
            storage,
            children: TaskSlot::new(ctx),
        }
    }

    pub fn folder_uri(&self) -> &str {
        &self.folder_uri
    }

    fn observe(&mut self) -> ViewState<Vec<String>> {
        let storage = &self.storage;
        let folder_uri = &self.folder_uri;
        self.children.observe(
            || Some(Task::new(storage.list_container(folder_uri))),
            deps![folder_uri, storage],
        )
    }

    /// Entries in the order the storage listed them, once the listing has arrived.
    pub fn entries(&mut self) -> Option<Vec<FolderEntry>> {
        self.observe().result().map(|children| self.to_entries(children))
    }

    fn to_entries(&self, children: &[String]) -> Vec<FolderEntry> {
        children
            .iter()
            .map(|child| FolderEntry {
                uri: child.clone(),
                label: child
                    .strip_prefix(self.folder_uri.as_str())
                    .unwrap_or(child)
                    .to_string(),
                is_container: self.storage.is_container(child),
            })
            .collect()
    }

    pub fn render(&mut self) -> View {
        let state = self.observe();
        let body = crate::bridge::render_state(&state, |children| {
            View::Fragment(
                self.to_entries(children)
                    .into_iter()
                    .map(|entry| {
                        let icon = if entry.is_container {
                            CONTAINER_ICON
                        } else {
                            RESOURCE_ICON
                        };
                        Element::new("div")
                            .attr("class", "entry")
                            .child(format!("{icon} "))
                            .child(
                                Element::new("a")
                                    .attr("href", "#")
                                    .on_click(BrowserEvent::Select(entry.uri))
                                    .child(entry.label),
                            )
                            .into()
                    })
                    .collect(),
            )
        });
        Element::new("div").child(body).into()
    }
}
