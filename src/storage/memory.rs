//! In-process storage and session, used by tests and native demos.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::{
    error::BrowserError,
    storage::{Fetched, Session, StorageClient},
};

#[derive(Debug, Default)]
struct MemoryInner {
    resources: BTreeMap<String, Fetched>,
    failures: BTreeMap<String, BrowserError>,
    writes: Vec<(String, String, String)>,
    fetches: Vec<String>,
}

/// Resources held in memory. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage(Rc<RefCell<MemoryInner>>);

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    pub fn insert(&self, locator: &str, bytes: impl Into<Vec<u8>>, content_type: &str) -> &Self {
        self.0.borrow_mut().resources.insert(
            locator.to_string(),
            Fetched::new(bytes, Some(content_type.to_string())),
        );
        self
    }

    /// Store a container whose listing declares `children` (relative or absolute) in that order.
    pub fn insert_container(&self, locator: &str, children: &[&str]) -> &Self {
        let mut listing = String::from("@prefix ldp: <http://www.w3.org/ns/ldp#> .\n");
        for child in children {
            listing.push_str(&format!("<> ldp:contains <{child}> .\n"));
        }
        self.insert(locator, listing, "text/turtle")
    }

    /// Make every request for `locator` fail with `error`.
    pub fn fail(&self, locator: &str, error: BrowserError) -> &Self {
        self.0
            .borrow_mut()
            .failures
            .insert(locator.to_string(), error);
        self
    }

    pub fn get(&self, locator: &str) -> Option<Fetched> {
        self.0.borrow().resources.get(locator).cloned()
    }

    /// `(locator, body, content_type)` of every successful `put`, oldest first.
    pub fn writes(&self) -> Vec<(String, String, String)> {
        self.0.borrow().writes.clone()
    }

    /// Locators fetched so far, oldest first.
    pub fn fetches(&self) -> Vec<String> {
        self.0.borrow().fetches.clone()
    }
}

impl StorageClient for MemoryStorage {
    fn fetch(&self, locator: &str) -> LocalBoxFuture<'static, Result<Fetched, BrowserError>> {
        let mut inner = self.0.borrow_mut();
        inner.fetches.push(locator.to_string());
        let outcome = if let Some(err) = inner.failures.get(locator) {
            Err(err.clone())
        } else {
            inner
                .resources
                .get(locator)
                .cloned()
                .ok_or_else(|| BrowserError::from_status(404, locator))
        };
        future::ready(outcome).boxed_local()
    }

    fn put(
        &self,
        locator: &str,
        body: String,
        content_type: &str,
    ) -> LocalBoxFuture<'static, Result<(), BrowserError>> {
        let mut inner = self.0.borrow_mut();
        if let Some(err) = inner.failures.get(locator) {
            return future::ready(Err(err.clone())).boxed_local();
        }
        inner.resources.insert(
            locator.to_string(),
            Fetched::new(body.clone(), Some(content_type.to_string())),
        );
        inner
            .writes
            .push((locator.to_string(), body, content_type.to_string()));
        future::ready(Ok(())).boxed_local()
    }
}

/// A session with a fixed login state and identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticSession {
    pub logged_in: bool,
    pub web_id: Option<String>,
}

impl StaticSession {
    pub fn logged_in(web_id: &str) -> Self {
        StaticSession {
            logged_in: true,
            web_id: Some(web_id.to_string()),
        }
    }

    pub fn anonymous() -> Self {
        StaticSession::default()
    }
}

impl Session for StaticSession {
    fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    fn web_id(&self) -> Option<String> {
        self.web_id.clone()
    }
}
