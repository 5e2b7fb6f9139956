//! Shared test utilities for component tests

use std::{cell::Cell, rc::Rc};

use futures::{
    channel::oneshot,
    executor::LocalPool,
    future::FutureExt,
};

use crate::{
    bridge::{RenderContext, Task},
    error::BrowserError,
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// A local executor plus a render context that counts rerender requests.
pub struct Harness {
    pub pool: LocalPool,
    pub renders: Rc<Cell<usize>>,
    pub ctx: RenderContext,
}

impl Harness {
    pub fn new() -> Self {
        init_logging();
        let pool = LocalPool::new();
        let renders = Rc::new(Cell::new(0));
        let counter = renders.clone();
        let ctx = RenderContext::new(
            pool.spawner(),
            Rc::new(move || counter.set(counter.get() + 1)),
        );
        Harness { pool, renders, ctx }
    }

    /// Run every spawned subscriber that can make progress.
    pub fn run(&mut self) {
        self.pool.run_until_stalled();
    }

    pub fn renders(&self) -> usize {
        self.renders.get()
    }
}

/// A task settled by hand through the returned sender. Dropping the sender fails the task.
pub fn manual_task<R: Clone + 'static>() -> (oneshot::Sender<Result<R, BrowserError>>, Task<R>) {
    let (tx, rx) = oneshot::channel();
    let task = Task::new(rx.map(|received| {
        received.unwrap_or_else(|_| Err(BrowserError::Custom("sender dropped".to_string())))
    }));
    (tx, task)
}
