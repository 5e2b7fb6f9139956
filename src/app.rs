use std::rc::Rc;

use crate::{
    bridge::RenderContext,
    config::BrowserConfig,
    editor::EditorWidget,
    error::BrowserError,
    event::BrowserEvent,
    navigator::ResourceBrowser,
    storage::{Session, StorageClient},
    view::{Element, View},
};

pub const TITLE: &str = "Solid browser for media actions";

/// Top-level component: a heading plus either the login prompt or the resource browser.
pub struct App {
    config: BrowserConfig,
    storage: Rc<dyn StorageClient>,
    session: Rc<dyn Session>,
    ctx: RenderContext,
    browser: Option<ResourceBrowser>,
    widget: Option<Rc<dyn EditorWidget>>,
}

impl App {
    pub fn new(
        config: BrowserConfig,
        storage: Rc<dyn StorageClient>,
        session: Rc<dyn Session>,
        ctx: RenderContext,
    ) -> Self {
        App {
            config,
            storage,
            session,
            ctx,
            browser: None,
            widget: None,
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// The resource browser, created on first use once the session is logged in.
    pub fn browser(&mut self) -> Option<&mut ResourceBrowser> {
        if !self.session.is_logged_in() {
            self.browser = None;
            return None;
        }
        if self.browser.is_none() {
            let mut browser = ResourceBrowser::new(
                self.config.start_uri.clone(),
                self.session.as_ref(),
                self.storage.clone(),
                self.ctx.clone(),
                self.config.content_types.clone(),
            );
            if let Some(widget) = &self.widget {
                browser.attach_editor(widget.clone());
            }
            self.browser = Some(browser);
        }
        self.browser.as_mut()
    }

    pub fn attach_editor(&mut self, widget: Rc<dyn EditorWidget>) {
        self.widget = Some(widget.clone());
        if let Some(browser) = &mut self.browser {
            browser.attach_editor(widget);
        }
    }

    pub fn update(&mut self, event: BrowserEvent) -> Result<(), BrowserError> {
        tracing::debug!("[App] {event}");
        if event == BrowserEvent::Login {
            // The host performs the redirect; nothing changes until it reports a new session
            tracing::info!("[App] login requested at {}", self.config.oidc_issuer);
            return Ok(());
        }
        match self.browser() {
            Some(browser) => browser.update(event),
            None => {
                tracing::debug!("[App] not logged in, ignoring {event}");
                Ok(())
            }
        }
    }

    pub fn render(&mut self) -> View {
        let heading = Element::new("h2").child(TITLE);
        let issuer = self.config.oidc_issuer.clone();
        let redirect = self.config.redirect_url.clone();
        let body = match self.browser() {
            Some(browser) => browser.render(),
            None => Element::new("button")
                .attr("data-oidc-issuer", issuer)
                .attr("data-redirect-url", redirect)
                .on_click(BrowserEvent::Login)
                .child("Log in")
                .into(),
        };
        Element::new("div").child(heading).child(body).into()
    }
}
