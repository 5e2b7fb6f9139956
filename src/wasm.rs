//! WASM bindings for pod-actions
//!
//! The host page owns everything the crate cannot do itself: the authenticated `fetch` (from the
//! Solid authentication client), the login redirect and the text editor widget. It hands those in as
//! JavaScript functions and mirrors [`View::to_html`](crate::view::View::to_html) into the DOM.
//!
//! ## Usage
//!
//! ```javascript,ignore
//! import init, { BrowserApp } from './pod_actions.js';
//!
//! async function main() {
//!     await init();
//!     const session = getDefaultSession();
//!     const root = document.getElementById('app');
//!     let app;
//!     const rerender = () => requestAnimationFrame(() => {
//!         root.innerHTML = app.render();
//!     });
//!     app = new BrowserApp(session.fetch, session.info.isLoggedIn, session.info.webId, rerender);
//!
//!     root.addEventListener('click', (e) => {
//!         const target = e.target.closest('[data-on-click]');
//!         if (target) app.dispatch(JSON.parse(target.dataset.onClick));
//!     });
//!     root.addEventListener('change', (e) => {
//!         const target = e.target.closest('[data-on-change]');
//!         if (target) app.dispatchChange(JSON.parse(target.dataset.onChange), e.target.value);
//!     });
//!     rerender();
//! }
//! ```
//!
//! Event payloads cross the boundary through `serde_wasm_bindgen`, so `dispatch` takes the parsed
//! object rather than the attribute string.

use std::rc::Rc;

use futures::{
    future::{FutureExt, LocalBoxFuture, LocalFutureObj},
    task::{LocalSpawn, SpawnError},
};
use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, Response};

use crate::{
    app::App,
    bridge::RenderContext,
    config::BrowserConfig,
    editor::EditorWidget,
    error::BrowserError,
    event::{BrowserEvent, ChangeEvent},
    storage::{memory::StaticSession, Fetched, StorageClient},
};

/// Route `tracing` output to the browser console. Safe to call more than once.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(tracing_wasm::set_as_global_default);
}

/// Runs settlement subscribers as microtasks of the page's event loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

fn fetch_error(locator: &str, err: JsValue) -> BrowserError {
    BrowserError::Fetch {
        locator: locator.to_string(),
        message: err.as_string().unwrap_or_else(|| format!("{err:?}")),
    }
}

async fn await_response(
    locator: &str,
    call: Result<JsValue, JsValue>,
) -> Result<Response, BrowserError> {
    let promise: Promise = call
        .and_then(|value| value.dyn_into::<Promise>())
        .map_err(|err| fetch_error(locator, err))?;
    let response: Response = JsFuture::from(promise)
        .await
        .and_then(|value| value.dyn_into::<Response>())
        .map_err(|err| fetch_error(locator, err))?;
    if !response.ok() {
        return Err(BrowserError::from_status(response.status(), locator));
    }
    Ok(response)
}

/// [`StorageClient`] over the host's authenticated `fetch(url, init)`.
#[derive(Debug, Clone)]
pub struct JsFetchStorage {
    fetch: Function,
}

impl JsFetchStorage {
    pub fn new(fetch: Function) -> Self {
        JsFetchStorage { fetch }
    }
}

impl StorageClient for JsFetchStorage {
    fn fetch(&self, locator: &str) -> LocalBoxFuture<'static, Result<Fetched, BrowserError>> {
        let call = self
            .fetch
            .call1(&JsValue::NULL, &JsValue::from_str(locator));
        let locator = locator.to_string();
        async move {
            let response = await_response(&locator, call).await?;
            let content_type = response
                .headers()
                .get("content-type")
                .map_err(|err| fetch_error(&locator, err))?;
            let text = response.text().map_err(|err| fetch_error(&locator, err))?;
            let text = JsFuture::from(text)
                .await
                .map_err(|err| fetch_error(&locator, err))?
                .as_string()
                .unwrap_or_default();
            Ok(Fetched::new(text, content_type))
        }
        .boxed_local()
    }

    fn put(
        &self,
        locator: &str,
        body: String,
        content_type: &str,
    ) -> LocalBoxFuture<'static, Result<(), BrowserError>> {
        let call = put_init(&body, content_type).and_then(|init| {
            self.fetch
                .call2(&JsValue::NULL, &JsValue::from_str(locator), &init)
        });
        let locator = locator.to_string();
        async move {
            await_response(&locator, call).await?;
            Ok(())
        }
        .boxed_local()
    }
}

fn put_init(body: &str, content_type: &str) -> Result<JsValue, JsValue> {
    let headers = Object::new();
    Reflect::set(&headers, &"Content-Type".into(), &content_type.into())?;
    let init = Object::new();
    Reflect::set(&init, &"method".into(), &"PUT".into())?;
    Reflect::set(&init, &"body".into(), &body.into())?;
    Reflect::set(&init, &"headers".into(), &headers)?;
    Ok(init.into())
}

/// [`EditorWidget`] over a host callback `setText(text, language)`.
struct JsEditorWidget {
    set_text: Function,
}

impl EditorWidget for JsEditorWidget {
    fn set_text(&self, text: &str, language: Option<&str>) {
        let language = language.map(JsValue::from_str).unwrap_or(JsValue::NULL);
        if let Err(err) = self
            .set_text
            .call2(&JsValue::NULL, &JsValue::from_str(text), &language)
        {
            tracing::warn!("[JsEditorWidget] setText failed: {err:?}");
        }
    }
}

fn to_js_error(err: BrowserError) -> JsValue {
    let msg = format!("❌ {err}");
    console::error_1(&msg.clone().into());
    JsValue::from_str(&msg)
}

#[wasm_bindgen]
pub struct BrowserApp {
    app: App,
}

#[wasm_bindgen]
impl BrowserApp {
    /// Create the app.
    ///
    /// # Arguments
    /// * `fetch` - authenticated `fetch(url, init)` returning a `Promise<Response>`
    /// * `logged_in`, `web_id` - the host session's state
    /// * `on_rerender` - called with no arguments whenever an async result arrives
    /// * `config_toml` - optional TOML overriding [`BrowserConfig`] defaults
    #[wasm_bindgen(constructor)]
    pub fn new(
        fetch: Function,
        logged_in: bool,
        web_id: Option<String>,
        on_rerender: Function,
        config_toml: Option<String>,
    ) -> Result<BrowserApp, JsValue> {
        init_logging();
        let config = match config_toml {
            Some(toml) => BrowserConfig::from_toml_str(&toml).map_err(to_js_error)?,
            None => BrowserConfig::default(),
        };
        let rerender = Rc::new(move || {
            if let Err(err) = on_rerender.call0(&JsValue::NULL) {
                tracing::warn!("[BrowserApp] rerender callback failed: {err:?}");
            }
        });
        let session = StaticSession { logged_in, web_id };
        console::log_1(&format!("✅ BrowserApp created (logged in: {logged_in})").into());
        Ok(BrowserApp {
            app: App::new(
                config,
                Rc::new(JsFetchStorage::new(fetch)),
                Rc::new(session),
                RenderContext::new(BrowserSpawner, rerender),
            ),
        })
    }

    /// Current view as HTML.
    pub fn render(&mut self) -> String {
        self.app.render().to_html()
    }

    /// Dispatch a parsed `data-on-click` payload.
    pub fn dispatch(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event: BrowserEvent = serde_wasm_bindgen::from_value(event)
            .map_err(|err| to_js_error(BrowserError::from(err)))?;
        self.app.update(event).map_err(to_js_error)
    }

    /// Dispatch a parsed `data-on-change` payload together with the control's new value.
    #[wasm_bindgen(js_name = dispatchChange)]
    pub fn dispatch_change(&mut self, change: JsValue, value: String) -> Result<(), JsValue> {
        let change: ChangeEvent = serde_wasm_bindgen::from_value(change)
            .map_err(|err| to_js_error(BrowserError::from(err)))?;
        self.app.update(change.with_value(value)).map_err(to_js_error)
    }

    /// Register the text editor widget's `setText(text, language)` callback.
    #[wasm_bindgen(js_name = attachEditor)]
    pub fn attach_editor(&mut self, set_text: Function) {
        self.app.attach_editor(Rc::new(JsEditorWidget { set_text }));
    }
}
