//! Declarative view tree produced by every component's `render`.
//!
//! Views are plain data: event handlers are [`BrowserEvent`] / [`ChangeEvent`] payloads that the
//! host dispatches back into the app. The browser host consumes [`View::to_html`], where the payloads
//! travel as JSON in `data-on-click` / `data-on-change` attributes.

use pulldown_cmark_escape::{escape_html, FmtWriter};
use std::fmt::Write;

use crate::event::{BrowserEvent, ChangeEvent};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    Empty,
    Text(String),
    Element(Element),
    Fragment(Vec<View>),
    /// Mount point for the external text editor widget.
    Editor(EditorMount),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorMount {
    pub text: String,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub on_click: Option<BrowserEvent>,
    pub on_change: Option<ChangeEvent>,
    pub children: Vec<View>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Element {
            tag,
            attrs: Vec::new(),
            on_click: None,
            on_change: None,
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn child(mut self, child: impl Into<View>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, V>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<View>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn on_click(mut self, event: BrowserEvent) -> Self {
        self.on_click = Some(event);
        self
    }

    pub fn on_change(mut self, event: ChangeEvent) -> Self {
        self.on_change = Some(event);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| *attr == name)
            .map(|(_, value)| value.as_str())
    }
}

impl From<Element> for View {
    fn from(element: Element) -> Self {
        View::Element(element)
    }
}

impl From<&str> for View {
    fn from(text: &str) -> Self {
        View::Text(text.to_string())
    }
}

impl From<String> for View {
    fn from(text: String) -> Self {
        View::Text(text)
    }
}

impl From<Vec<View>> for View {
    fn from(views: Vec<View>) -> Self {
        View::Fragment(views)
    }
}

impl<V: Into<View>> From<Option<V>> for View {
    fn from(view: Option<V>) -> Self {
        view.map(Into::into).unwrap_or_default()
    }
}

impl View {
    /// Concatenated text content, editor mounts included.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            View::Empty => {}
            View::Text(text) => out.push_str(text),
            View::Element(element) => element
                .children
                .iter()
                .for_each(|child| child.collect_text(out)),
            View::Fragment(views) => views.iter().for_each(|child| child.collect_text(out)),
            View::Editor(mount) => out.push_str(&mount.text),
        }
    }

    /// Depth-first list of elements matching `pred`.
    pub fn find_all<P>(&self, pred: P) -> Vec<&Element>
    where
        P: Fn(&Element) -> bool,
    {
        let mut found = Vec::new();
        self.visit(&pred, &mut found);
        found
    }

    fn visit<'a, P>(&'a self, pred: &P, found: &mut Vec<&'a Element>)
    where
        P: Fn(&Element) -> bool,
    {
        match self {
            View::Element(element) => {
                if pred(element) {
                    found.push(element);
                }
                for child in element.children.iter() {
                    child.visit(pred, found);
                }
            }
            View::Fragment(views) => {
                for child in views.iter() {
                    child.visit(pred, found);
                }
            }
            _ => {}
        }
    }

    /// All elements that emit an event when clicked, in document order.
    pub fn clickables(&self) -> Vec<&Element> {
        self.find_all(|element| element.on_click.is_some())
    }

    pub fn editor(&self) -> Option<&EditorMount> {
        match self {
            View::Editor(mount) => Some(mount),
            View::Element(element) => element.children.iter().find_map(View::editor),
            View::Fragment(views) => views.iter().find_map(View::editor),
            _ => None,
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            View::Empty => {}
            View::Text(text) => out.push_str(&escape(text)),
            View::Fragment(views) => views.iter().for_each(|view| view.write_html(out)),
            View::Editor(mount) => {
                out.push_str("<div class=\"Editor\" data-editor");
                if let Some(language) = &mount.language {
                    let _ = write!(out, " data-language=\"{}\"", escape(language));
                }
                out.push_str("></div>");
            }
            View::Element(element) => {
                let _ = write!(out, "<{}", element.tag);
                for (name, value) in element.attrs.iter() {
                    let _ = write!(out, " {}=\"{}\"", name, escape(value));
                }
                if let Some(event) = &element.on_click {
                    if let Ok(json) = serde_json::to_string(event) {
                        let _ = write!(out, " data-on-click=\"{}\"", escape(&json));
                    }
                }
                if let Some(event) = &element.on_change {
                    if let Ok(json) = serde_json::to_string(event) {
                        let _ = write!(out, " data-on-change=\"{}\"", escape(&json));
                    }
                }
                out.push('>');
                for child in element.children.iter() {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let _ = escape_html(FmtWriter(&mut escaped), text);
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escapes_text_and_events() {
        let view: View = Element::new("a")
            .on_click(BrowserEvent::Select("https://pod.example/<b>/".to_string()))
            .child("<b>/")
            .into();
        let html = view.to_html();
        assert!(html.starts_with("<a data-on-click=\""));
        assert!(html.contains("&lt;b&gt;/</a>"));
        assert!(html.contains("&quot;Select&quot;"));
    }

    #[test]
    fn test_queries() {
        let view: View = Element::new("div")
            .child(Element::new("a").on_click(BrowserEvent::NavigateParent).child("[..]"))
            .child(" ")
            .child(View::Editor(EditorMount {
                text: "hello".to_string(),
                language: None,
            }))
            .into();
        assert_eq!(view.clickables().len(), 1);
        assert_eq!(view.text_content(), "[..] hello");
        assert_eq!(view.editor().map(|m| m.text.as_str()), Some("hello"));
    }
}
