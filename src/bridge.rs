//! Asynchronous state to view bridge.
//!
//! Every view that waits on the network goes through the same three states: loading, success or
//! error. This module turns an in-flight [`Task`] into a [`ViewState`] and asks the host to rerender
//! when the task settles.
//!
//! ## Identity and supersession
//!
//! A [`PromiseTracker`] follows one task identity at a time. Observing a different task (or none)
//! resets the state to [`ViewState::Pending`] before anything is returned, so a render can never
//! pair the previous result with the new identity. The previous task is not cancelled: its
//! settlement subscriber still runs, notices that it is no longer current and drops the outcome.
//!
//! ## Scheduling
//!
//! Everything runs on one event loop. Settlement subscribers are spawned on the
//! [`RenderContext`]'s [`LocalSpawn`] implementation (`wasm_bindgen_futures::spawn_local` in the
//! browser, [`futures::executor::LocalPool`] in tests). There is no polling, no retry and no
//! timeout; a task that never settles leaves its view loading.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
    sync::atomic::{AtomicU64, Ordering},
};

use futures::{
    future::{FutureExt, LocalBoxFuture, Shared},
    task::{LocalSpawn, LocalSpawnExt},
    Future,
};

use crate::{
    error::BrowserError,
    memo::{Deps, Memo},
    view::{Element, View},
};

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

impl From<TaskId> for crate::memo::Dep {
    fn from(id: TaskId) -> Self {
        crate::memo::Dep::from(id.0)
    }
}

/// A shareable asynchronous computation with a stable identity.
pub struct Task<R> {
    id: TaskId,
    future: Shared<LocalBoxFuture<'static, Result<R, BrowserError>>>,
}

impl<R> Clone for Task<R> {
    fn clone(&self) -> Self {
        Task {
            id: self.id,
            future: self.future.clone(),
        }
    }
}

impl<R> fmt::Debug for Task<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").field("id", &self.id).finish()
    }
}

impl<R: Clone + 'static> Task<R> {
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<R, BrowserError>> + 'static,
    {
        Task {
            id: TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed)),
            future: future.boxed_local().shared(),
        }
    }

    /// A task that is already settled.
    pub fn ready(outcome: Result<R, BrowserError>) -> Self {
        Task::new(futures::future::ready(outcome))
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// The outcome, if the task has already settled and been polled to completion.
    pub fn peek(&self) -> Option<&Result<R, BrowserError>> {
        self.future.peek()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<R> {
    Pending,
    Settled(Result<R, BrowserError>),
}

impl<R> Default for ViewState<R> {
    fn default() -> Self {
        ViewState::Pending
    }
}

impl<R> ViewState<R> {
    pub fn is_pending(&self) -> bool {
        matches!(self, ViewState::Pending)
    }

    pub fn result(&self) -> Option<&R> {
        match self {
            ViewState::Settled(Ok(result)) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&BrowserError> {
        match self {
            ViewState::Settled(Err(err)) => Some(err),
            _ => None,
        }
    }
}

pub type Rerender = Rc<dyn Fn()>;

/// Scheduling capabilities shared by every component of one app instance.
#[derive(Clone)]
pub struct RenderContext {
    spawner: Rc<dyn LocalSpawn>,
    rerender: Rerender,
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext").finish_non_exhaustive()
    }
}

impl RenderContext {
    pub fn new<S>(spawner: S, rerender: Rerender) -> Self
    where
        S: LocalSpawn + 'static,
    {
        RenderContext {
            spawner: Rc::new(spawner),
            rerender,
        }
    }

    pub fn spawn<F>(&self, future: F) -> Result<(), BrowserError>
    where
        F: Future<Output = ()> + 'static,
    {
        self.spawner
            .as_ref()
            .spawn_local(future)
            .map_err(|err| BrowserError::Spawn(format!("{err}")))
    }

    pub fn request_render(&self) {
        (self.rerender)()
    }
}

struct TrackerInner<R> {
    current: Option<TaskId>,
    // Bumped on every identity switch; a subscriber applies its outcome only under its own generation.
    generation: u64,
    state: ViewState<R>,
}

/// Follows one task identity at a time and exposes its [`ViewState`].
pub struct PromiseTracker<R> {
    inner: Rc<RefCell<TrackerInner<R>>>,
    ctx: RenderContext,
}

impl<R: Clone + 'static> PromiseTracker<R> {
    pub fn new(ctx: RenderContext) -> Self {
        PromiseTracker {
            inner: Rc::new(RefCell::new(TrackerInner {
                current: None,
                generation: 0,
                state: ViewState::Pending,
            })),
            ctx,
        }
    }

    /// Current state for `task`. Switching identity resets to pending and subscribes to the new task.
    pub fn observe(&self, task: Option<&Task<R>>) -> ViewState<R> {
        let id = task.map(Task::id);
        let generation = {
            let mut inner = self.inner.borrow_mut();
            if inner.current != id {
                inner.current = id;
                inner.generation += 1;
                inner.state = ViewState::Pending;
                Some(inner.generation)
            } else {
                None
            }
        };

        if let (Some(generation), Some(task)) = (generation, task) {
            self.subscribe(task.clone(), generation);
        }

        self.inner.borrow().state.clone()
    }

    fn subscribe(&self, task: Task<R>, generation: u64) {
        let id = task.id;
        tracing::debug!("[PromiseTracker] subscribing to {id} (generation {generation})");
        let weak: Weak<RefCell<TrackerInner<R>>> = Rc::downgrade(&self.inner);
        let ctx = self.ctx.clone();
        let subscriber = async move {
            let outcome = task.future.await;
            let Some(inner) = weak.upgrade() else {
                tracing::debug!("[PromiseTracker] {id} settled after its view was dropped");
                return;
            };
            let applied = {
                let mut inner = inner.borrow_mut();
                if inner.generation == generation {
                    inner.state = ViewState::Settled(outcome);
                    true
                } else {
                    false
                }
            };
            if applied {
                ctx.request_render();
            } else {
                tracing::debug!("[PromiseTracker] discarding outcome of superseded {id}");
            }
        };

        if let Err(err) = self.ctx.spawn(subscriber) {
            tracing::warn!("[PromiseTracker] could not subscribe to {id}: {err}");
            self.inner.borrow_mut().state = ViewState::Settled(Err(err));
        }
    }

    /// Identity currently followed.
    pub fn current(&self) -> Option<TaskId> {
        self.inner.borrow().current
    }

    pub fn render<C>(&self, task: Option<&Task<R>>, children: C) -> View
    where
        C: FnOnce(&R) -> View,
    {
        render_state(&self.observe(task), children)
    }
}

/// A task rebuilt whenever its dependencies change, paired with the tracker rendering it.
pub struct TaskSlot<R> {
    memo: Memo<Option<Task<R>>>,
    tracker: PromiseTracker<R>,
}

impl<R: Clone + 'static> TaskSlot<R> {
    pub fn new(ctx: RenderContext) -> Self {
        TaskSlot {
            memo: Memo::default(),
            tracker: PromiseTracker::new(ctx),
        }
    }

    pub fn observe<F>(&mut self, create: F, deps: Deps) -> ViewState<R>
    where
        F: FnOnce() -> Option<Task<R>>,
    {
        let task = self.memo.get(create, deps).clone();
        self.tracker.observe(task.as_ref())
    }

    pub fn render<F, C>(&mut self, create: F, deps: Deps, children: C) -> View
    where
        F: FnOnce() -> Option<Task<R>>,
        C: FnOnce(&R) -> View,
    {
        render_state(&self.observe(create, deps), children)
    }

    /// The memoized task, if any has been built.
    pub fn task(&self) -> Option<&Task<R>> {
        self.memo.value().and_then(Option::as_ref)
    }

    /// Forget the memoized task so the next observation rebuilds it.
    pub fn reset(&mut self) {
        self.memo.invalidate();
    }
}

/// Custom renderers for the loading and error states.
#[derive(Default)]
pub struct Fallbacks<'a> {
    pub error: Option<Box<dyn FnOnce(&str) -> View + 'a>>,
    pub loading: Option<Box<dyn FnOnce() -> View + 'a>>,
}

pub fn render_state<R, C>(state: &ViewState<R>, children: C) -> View
where
    C: FnOnce(&R) -> View,
{
    render_state_with(state, children, Fallbacks::default())
}

pub fn render_state_with<R, C>(state: &ViewState<R>, children: C, fallbacks: Fallbacks<'_>) -> View
where
    C: FnOnce(&R) -> View,
{
    match state {
        ViewState::Settled(Ok(result)) => children(result),
        ViewState::Settled(Err(err)) => {
            tracing::warn!("{err}");
            let msg = err.message();
            match fallbacks.error {
                Some(error_fn) => error_fn(&msg),
                None => Element::new("div").child(format!("Error: {msg}")).into(),
            }
        }
        ViewState::Pending => match fallbacks.loading {
            Some(loading_fn) => loading_fn(),
            None => Element::new("div").child("Loading ...").into(),
        },
    }
}
