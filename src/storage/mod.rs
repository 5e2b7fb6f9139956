//! Storage and session collaborators.
//!
//! The crate never speaks HTTP or authentication itself. It consumes a [`StorageClient`] (an
//! authenticated fetch plus container helpers) and a [`Session`] (login flag and identity), both
//! supplied by the host. [`memory`] provides in-process implementations.

use futures::future::{FutureExt, LocalBoxFuture};
use url::Url;

use crate::{
    error::BrowserError,
    rdf::{parse_rdf, vocab, Node},
};

pub mod memory;

pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Raw content of a fetched resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fetched {
    pub bytes: Vec<u8>,
    /// The declared `Content-Type`, as sent by the server
    pub content_type: Option<String>,
}

impl Fetched {
    pub fn new(bytes: impl Into<Vec<u8>>, content_type: Option<String>) -> Self {
        Fetched {
            bytes: bytes.into(),
            content_type,
        }
    }

    /// Content decoded as UTF-8. Invalid sequences are replaced rather than rejected, so binary
    /// resources still open in the text editor.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn media_type(&self) -> &str {
        self.content_type
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

pub trait StorageClient {
    /// Authenticated fetch of a resource's bytes and declared content type.
    fn fetch(&self, locator: &str) -> LocalBoxFuture<'static, Result<Fetched, BrowserError>>;

    /// Replace a resource's content.
    fn put(
        &self,
        locator: &str,
        body: String,
        content_type: &str,
    ) -> LocalBoxFuture<'static, Result<(), BrowserError>>;

    /// Immediate children of a container, in the order the server lists them.
    fn list_container(
        &self,
        locator: &str,
    ) -> LocalBoxFuture<'static, Result<Vec<String>, BrowserError>> {
        let fetch = self.fetch(locator);
        let locator = locator.to_string();
        async move {
            let fetched = fetch.await?;
            Ok(contained_resources(&fetched, &locator))
        }
        .boxed_local()
    }

    fn is_container(&self, locator: &str) -> bool {
        is_container(locator)
    }
}

pub trait Session {
    fn is_logged_in(&self) -> bool;

    /// The authenticated identity (WebID), if any.
    fn web_id(&self) -> Option<String>;
}

/// A container is a resource whose URL path ends with a slash.
pub fn is_container(locator: &str) -> bool {
    match Url::parse(locator) {
        Ok(url) => url.path().ends_with('/'),
        Err(_) => locator
            .split(['?', '#'])
            .next()
            .is_some_and(|path| path.ends_with('/')),
    }
}

/// The container of `locator`: `..` for a container, `.` for a leaf resource.
pub fn parent_of(locator: &str) -> Result<String, BrowserError> {
    let url = Url::parse(locator)?;
    let relative = if is_container(locator) { ".." } else { "." };
    Ok(url.join(relative)?.to_string())
}

/// `ldp:contains` objects of a container listing. The listing is read as Turtle when no content
/// type is declared.
pub fn contained_resources(listing: &Fetched, container: &str) -> Vec<String> {
    let content_type = listing.content_type.as_deref().unwrap_or("text/turtle");
    let Some(store) = parse_rdf(&listing.text(), container, content_type) else {
        tracing::warn!("[contained_resources] {container} listing is not linked data");
        return Vec::new();
    };
    let container = Node::iri(container);
    store
        .statements_matching(Some(&container), Some(vocab::LDP_CONTAINS), None)
        .filter(|st| st.object.is_iri())
        .map(|st| st.object.value().to_string())
        .collect()
}

/// Find the storage root declared in the profile document of `web_id`. The fragment is dropped
/// before fetching.
pub fn resolve_storage_root(
    storage: &dyn StorageClient,
    web_id: &str,
) -> LocalBoxFuture<'static, Result<Option<String>, BrowserError>> {
    let profile_document = web_id.split('#').next().unwrap_or(web_id);
    let fetch = storage.fetch(profile_document);
    let base = profile_document.to_string();
    let web_id = web_id.to_string();
    async move {
        let profile = fetch.await?;
        let root = parse_rdf(&profile.text(), &base, "text/turtle").and_then(|graph| {
            graph
                .any_statement_matching(None, Some(vocab::PIM_STORAGE), None)
                .map(|st| st.object.value().to_string())
        });
        tracing::debug!("[resolve_storage_root] {web_id} -> {root:?}");
        Ok(root)
    }
    .boxed_local()
}
