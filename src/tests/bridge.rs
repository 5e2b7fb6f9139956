//! Tests for task supersession and view-state rendering

use super::helpers::*;
use crate::{
    bridge::{render_state, render_state_with, Fallbacks, PromiseTracker, Task, TaskSlot, ViewState},
    deps,
    error::BrowserError,
    view::{Element, View},
};
use std::rc::Rc;
use test_log::test;

#[test]
fn test_pending_then_settled_rerenders_once() {
    let mut harness = Harness::new();
    let tracker = PromiseTracker::new(harness.ctx.clone());
    let (tx, task) = manual_task::<String>();

    assert_eq!(tracker.observe(Some(&task)), ViewState::Pending);
    harness.run();
    assert_eq!(harness.renders(), 0);
    assert_eq!(tracker.observe(Some(&task)), ViewState::Pending);

    tx.send(Ok("done".to_string())).unwrap();
    harness.run();
    assert_eq!(harness.renders(), 1);
    assert_eq!(
        tracker.observe(Some(&task)),
        ViewState::Settled(Ok("done".to_string()))
    );

    // Observing the same identity again neither resubscribes nor rerenders
    tracker.observe(Some(&task));
    harness.run();
    assert_eq!(harness.renders(), 1);
}

#[test]
fn test_superseded_task_settling_late_is_discarded() {
    let mut harness = Harness::new();
    let tracker = PromiseTracker::new(harness.ctx.clone());
    let (old_tx, old_task) = manual_task::<&'static str>();
    let (new_tx, new_task) = manual_task::<&'static str>();

    tracker.observe(Some(&old_task));
    harness.run();
    assert_eq!(tracker.observe(Some(&new_task)), ViewState::Pending);
    assert_eq!(tracker.current(), Some(new_task.id()));

    new_tx.send(Ok("new")).unwrap();
    harness.run();
    assert_eq!(harness.renders(), 1);

    old_tx.send(Ok("old")).unwrap();
    harness.run();
    assert_eq!(harness.renders(), 1);
    assert_eq!(tracker.observe(Some(&new_task)), ViewState::Settled(Ok("new")));
}

#[test]
fn test_returning_to_earlier_task_applies_its_outcome_once() {
    let mut harness = Harness::new();
    let tracker = PromiseTracker::new(harness.ctx.clone());
    let (a_tx, a_task) = manual_task::<u32>();
    let (_b_tx, b_task) = manual_task::<u32>();

    tracker.observe(Some(&a_task));
    tracker.observe(Some(&b_task));
    assert_eq!(tracker.observe(Some(&a_task)), ViewState::Pending);

    a_tx.send(Ok(1)).unwrap();
    harness.run();
    assert_eq!(harness.renders(), 1);
    assert_eq!(tracker.observe(Some(&a_task)), ViewState::Settled(Ok(1)));
}

#[test]
fn test_superseded_task_settling_first_is_discarded() {
    let mut harness = Harness::new();
    let tracker = PromiseTracker::new(harness.ctx.clone());
    let (old_tx, old_task) = manual_task::<u32>();
    let (new_tx, new_task) = manual_task::<u32>();

    tracker.observe(Some(&old_task));
    tracker.observe(Some(&new_task));
    old_tx.send(Ok(1)).unwrap();
    harness.run();
    assert_eq!(harness.renders(), 0);
    assert_eq!(tracker.observe(Some(&new_task)), ViewState::Pending);

    new_tx
        .send(Err(BrowserError::NotFound("x".to_string())))
        .unwrap();
    harness.run();
    assert_eq!(harness.renders(), 1);
    assert_eq!(
        tracker.observe(Some(&new_task)).error(),
        Some(&BrowserError::NotFound("x".to_string()))
    );
}

#[test]
fn test_switching_to_no_task_resets() {
    let mut harness = Harness::new();
    let tracker = PromiseTracker::new(harness.ctx.clone());
    let task = Task::ready(Ok(7u8));

    tracker.observe(Some(&task));
    harness.run();
    assert_eq!(tracker.observe(Some(&task)).result(), Some(&7));

    assert!(tracker.observe(None).is_pending());
    assert_eq!(tracker.current(), None);
}

#[test]
fn test_dropped_tracker_does_not_rerender() {
    let mut harness = Harness::new();
    let (tx, task) = manual_task::<()>();
    {
        let tracker = PromiseTracker::new(harness.ctx.clone());
        tracker.observe(Some(&task));
    }
    tx.send(Ok(())).unwrap();
    harness.run();
    assert_eq!(harness.renders(), 0);
}

#[test]
fn test_task_slot_rebuilds_on_dependency_change() {
    let mut harness = Harness::new();
    let mut slot: TaskSlot<String> = TaskSlot::new(harness.ctx.clone());
    let mut builds = 0;

    for locator in ["https://pod.example/a", "https://pod.example/a", "https://pod.example/b"] {
        slot.observe(
            || {
                builds += 1;
                Some(Task::ready(Ok(locator.to_string())))
            },
            deps![locator],
        );
    }
    assert_eq!(builds, 2);

    harness.run();
    let state = slot.observe(|| unreachable!(), deps!["https://pod.example/b"]);
    assert_eq!(state.result().map(String::as_str), Some("https://pod.example/b"));

    slot.reset();
    let state = slot.observe(
        || Some(Task::ready(Ok("again".to_string()))),
        deps!["https://pod.example/b"],
    );
    assert!(state.is_pending());
}

#[test]
fn test_task_slot_shares_identity_for_same_reference() {
    let harness = Harness::new();
    let mut slot: TaskSlot<()> = TaskSlot::new(harness.ctx.clone());
    let shared = Rc::new(String::from("storage"));
    let other = Rc::new(String::from("storage"));

    slot.observe(|| Some(Task::ready(Ok(()))), deps![&shared]);
    let first = slot.task().map(Task::id);
    slot.observe(|| Some(Task::ready(Ok(()))), deps![&shared]);
    assert_eq!(slot.task().map(Task::id), first);

    slot.observe(|| Some(Task::ready(Ok(()))), deps![&other]);
    assert_ne!(slot.task().map(Task::id), first);
}

#[test]
fn test_default_fallbacks() {
    let loading = render_state(&ViewState::<()>::Pending, |_| View::Empty);
    assert_eq!(loading.text_content(), "Loading ...");

    let failed = render_state(
        &ViewState::<()>::Settled(Err(BrowserError::Fetch {
            locator: "https://pod.example/x".to_string(),
            message: "connection reset".to_string(),
        })),
        |_| View::Empty,
    );
    assert_eq!(failed.text_content(), "Error: connection reset");

    let done = render_state(&ViewState::Settled(Ok(3)), |n| {
        View::Text(format!("{n} items"))
    });
    assert_eq!(done.text_content(), "3 items");
}

#[test]
fn test_custom_fallbacks() {
    let failed = render_state_with(
        &ViewState::<()>::Settled(Err(BrowserError::PermissionDenied)),
        |_| View::Empty,
        Fallbacks {
            error: Some(Box::new(|msg| {
                View::from(Element::new("p").child(format!("Denied: {msg}")))
            })),
            ..Default::default()
        },
    );
    assert_eq!(
        failed.text_content(),
        "Denied: You do not have permission to access this resource"
    );

    let loading = render_state_with(
        &ViewState::<()>::Pending,
        |_| View::Empty,
        Fallbacks {
            loading: Some(Box::new(|| View::Text("...".to_string()))),
            ..Default::default()
        },
    );
    assert_eq!(loading.text_content(), "...");
}
