// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for `IncrementalLoader`'s load-more state machine.
//!
//! Loads are driven with `pollster` where they settle immediately, and polled
//! by hand with a no-op waker where a test needs a load to stay in flight.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use understory_windowing::{Footer, IncrementalLoader, LoadState, LoaderConfig};

const VIEWPORT: f64 = 400.0;
const CONTENT: f64 = 1000.0;
/// 50px from the end of the content.
const NEAR_END: f64 = 550.0;

/// A future that stays pending until its gate is opened.
struct Gate {
    open: Rc<Cell<bool>>,
}

impl Future for Gate {
    type Output = Result<usize, &'static str>;

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.open.get() {
            Poll::Ready(Ok(20))
        } else {
            Poll::Pending
        }
    }
}

fn poll_once<F: Future + Unpin>(future: &mut F) -> Poll<F::Output> {
    Pin::new(future).poll(&mut Context::from_waker(Waker::noop()))
}

#[test]
fn one_load_per_crossing() {
    let calls = Rc::new(Cell::new(0));
    let mut feed = IncrementalLoader::new(LoaderConfig::default());

    let load = {
        let calls = Rc::clone(&calls);
        feed.trigger(NEAR_END, VIEWPORT, CONTENT, move || {
            calls.set(calls.get() + 1);
            async { Ok::<usize, &str>(20) }
        })
    }
    .unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(feed.state(), LoadState::LoadingMore);

    // Crossing again while the first load is in flight fires nothing.
    for scroll in [NEAR_END, 560.0, 600.0] {
        let calls = Rc::clone(&calls);
        let again = feed.trigger(scroll, VIEWPORT, CONTENT, move || {
            calls.set(calls.get() + 1);
            async { Ok::<usize, &str>(20) }
        });
        assert!(again.is_none());
    }
    assert_eq!(calls.get(), 1);

    assert_eq!(pollster::block_on(load), Ok(20));
    assert_eq!(feed.state(), LoadState::Idle);

    // After settling, the next crossing fires again.
    let load = {
        let calls = Rc::clone(&calls);
        feed.trigger(NEAR_END, VIEWPORT, CONTENT, move || {
            calls.set(calls.get() + 1);
            async { Ok::<usize, &str>(20) }
        })
    };
    assert!(load.is_some());
    assert_eq!(calls.get(), 2);
}

#[test]
fn rejected_load_returns_to_idle_and_passes_the_error_through() {
    let mut feed = IncrementalLoader::default();

    let load = feed
        .trigger(NEAR_END, VIEWPORT, CONTENT, || async {
            Err::<Vec<u32>, &str>("network unreachable")
        })
        .unwrap();
    assert_eq!(feed.footer(), Footer::Loading);

    assert_eq!(pollster::block_on(load), Err("network unreachable"));
    assert_eq!(feed.state(), LoadState::Idle);
    assert_eq!(feed.footer(), Footer::None);

    // The user can scroll to retry.
    let retry = feed.trigger(NEAR_END, VIEWPORT, CONTENT, || async {
        Ok::<Vec<u32>, &str>(vec![1, 2])
    });
    assert_eq!(pollster::block_on(retry.unwrap()), Ok(vec![1, 2]));
}

#[test]
fn far_from_the_end_does_not_load() {
    let calls = Cell::new(0);
    let mut feed = IncrementalLoader::default();
    let load = feed.trigger(0.0, VIEWPORT, CONTENT, || {
        calls.set(calls.get() + 1);
        async {}
    });
    assert!(load.is_none());
    assert_eq!(calls.get(), 0);
    assert_eq!(feed.state(), LoadState::Idle);
}

#[test]
fn exhausted_feed_shows_end_marker() {
    let calls = Cell::new(0);
    let mut feed = IncrementalLoader::default();
    feed.set_has_more(false);
    let load = feed.trigger(NEAR_END, VIEWPORT, CONTENT, || {
        calls.set(calls.get() + 1);
        async {}
    });
    assert!(load.is_none());
    assert_eq!(calls.get(), 0);
    assert_eq!(feed.footer(), Footer::EndOfContent);
}

#[test]
fn pending_load_keeps_loading_until_it_settles() {
    let open = Rc::new(Cell::new(false));
    let mut feed = IncrementalLoader::default();
    let gate = Gate {
        open: Rc::clone(&open),
    };
    let mut load = feed.trigger(NEAR_END, VIEWPORT, CONTENT, || gate).unwrap();

    assert!(poll_once(&mut load).is_pending());
    assert!(feed.is_loading());

    open.set(true);
    assert_eq!(poll_once(&mut load), Poll::Ready(Ok(20)));
    assert!(!feed.is_loading());
}

#[test]
fn dropping_an_unsettled_load_returns_to_idle() {
    let mut feed = IncrementalLoader::default();
    let gate = Gate {
        open: Rc::new(Cell::new(false)),
    };
    let mut load = feed.trigger(NEAR_END, VIEWPORT, CONTENT, || gate).unwrap();
    assert!(poll_once(&mut load).is_pending());

    drop(load);
    assert_eq!(feed.state(), LoadState::Idle);
}

#[test]
fn load_settling_after_teardown_is_ignored() {
    let open = Rc::new(Cell::new(false));
    let mut feed = IncrementalLoader::default();
    let gate = Gate {
        open: Rc::clone(&open),
    };
    let mut load = feed.trigger(NEAR_END, VIEWPORT, CONTENT, || gate).unwrap();
    assert!(poll_once(&mut load).is_pending());

    // The list is torn down while the host's request is still out.
    drop(feed);

    open.set(true);
    assert_eq!(poll_once(&mut load), Poll::Ready(Ok(20)));
}

#[test]
fn reset_ignores_loads_from_the_previous_collection() {
    let open = Rc::new(Cell::new(false));
    let mut feed = IncrementalLoader::default();
    let gate = Gate {
        open: Rc::clone(&open),
    };
    let mut stale = feed.trigger(NEAR_END, VIEWPORT, CONTENT, || gate).unwrap();
    assert!(poll_once(&mut stale).is_pending());

    feed.reset();
    let fresh = feed.on_scroll(NEAR_END, VIEWPORT, CONTENT).unwrap();

    open.set(true);
    assert!(poll_once(&mut stale).is_ready());
    assert!(feed.is_loading());

    fresh.finish();
    assert!(!feed.is_loading());
}

#[test]
fn threshold_is_configurable() {
    let mut feed = IncrementalLoader::new(LoaderConfig::default().with_threshold(0.0));
    assert!(feed.on_scroll(NEAR_END, VIEWPORT, CONTENT).is_none());
    let ticket = feed.on_scroll(600.0, VIEWPORT, CONTENT).unwrap();
    ticket.finish();

    feed.set_config(LoaderConfig::default().with_threshold(500.0));
    assert!(feed.on_scroll(100.0, VIEWPORT, CONTENT).is_some());
}
