// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental loading for infinite-scroll feeds.
//!
//! [`IncrementalLoader`] is not windowed: it renders every loaded item and
//! asks the host for more when the scroll position comes within a threshold
//! of the end of the content. It is a two-state machine:
//!
//! - `Idle -> LoadingMore` when the viewport is near the end, the host says
//!   more items exist, and no load is in flight.
//! - `LoadingMore -> Idle` when the host's load settles, whether it succeeded
//!   or failed.
//!
//! The second transition is owned by a [`LoadTicket`], which runs it when the
//! ticket is finished or dropped. A ticket only holds a weak handle to the
//! loader, so a load that settles after the loader was torn down does
//! nothing.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_windowing::{Footer, IncrementalLoader, LoadState, LoaderConfig};
//!
//! let mut feed = IncrementalLoader::new(LoaderConfig::default());
//!
//! // 1000px of content, 400px viewport, scrolled to 550: 50px from the end.
//! let load = feed
//!     .trigger(550.0, 400.0, 1000.0, || async { Ok::<_, &str>(vec![1, 2, 3]) })
//!     .expect("near the end with more to load");
//! assert_eq!(feed.state(), LoadState::LoadingMore);
//! assert_eq!(feed.footer(), Footer::Loading);
//!
//! // A second crossing while loading does nothing.
//! let again = feed.trigger(560.0, 400.0, 1000.0, || async { Ok::<Vec<i32>, &str>(vec![]) });
//! assert!(again.is_none());
//!
//! let page = pollster::block_on(load);
//! assert_eq!(page, Ok(vec![1, 2, 3]));
//! assert_eq!(feed.state(), LoadState::Idle);
//! ```

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, ready};

use crate::Scalar;

/// Default distance from the end of the content that triggers a load.
pub const DEFAULT_THRESHOLD: f64 = 100.0;

/// Configuration for an [`IncrementalLoader`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoaderConfig {
    /// Distance from the end of the content, in logical pixels, at which a
    /// load is requested.
    pub threshold: f64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl LoaderConfig {
    /// Returns a copy with the given threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Loading state of an [`IncrementalLoader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No load is in flight.
    #[default]
    Idle,
    /// A load is in flight; further triggers are ignored.
    LoadingMore,
}

/// What to show after the last loaded item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Footer {
    /// Nothing: more items may be loaded on demand.
    None,
    /// A loading indicator.
    Loading,
    /// An end-of-content marker.
    EndOfContent,
}

#[derive(Debug, Default)]
struct Shared {
    state: Cell<LoadState>,
    generation: Cell<u64>,
}

/// Infinite-scroll controller that requests more items near the end.
#[derive(Debug)]
pub struct IncrementalLoader {
    config: LoaderConfig,
    has_more: bool,
    shared: Rc<Shared>,
}

impl Default for IncrementalLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl IncrementalLoader {
    /// Creates an idle loader that assumes more items are available.
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            has_more: true,
            shared: Rc::new(Shared::default()),
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Replaces the configuration.
    pub fn set_config(&mut self, config: LoaderConfig) {
        self.config = config;
    }

    /// Whether the host reported that more items exist.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Records whether more items exist, typically after each page arrives.
    pub fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }

    /// Current loading state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.shared.state.get()
    }

    /// Returns `true` while a load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state() == LoadState::LoadingMore
    }

    /// Returns `true` if the bottom of the viewport is within the threshold of
    /// the end of the content.
    ///
    /// Content shorter than the viewport is always near the end.
    #[must_use]
    pub fn is_near_end(
        &self,
        scroll_offset: f64,
        viewport_extent: f64,
        content_extent: f64,
    ) -> bool {
        let visible_end =
            scroll_offset.finite_non_negative() + viewport_extent.finite_non_negative();
        let remaining = content_extent.finite_non_negative() - visible_end;
        remaining <= self.config.threshold.finite_non_negative()
    }

    /// Handles a scroll event, starting a load if one is due.
    ///
    /// Returns a ticket when the loader moved to [`LoadState::LoadingMore`].
    /// The host runs its load and then finishes or drops the ticket; either
    /// one moves the loader back to [`LoadState::Idle`].
    pub fn on_scroll(
        &mut self,
        scroll_offset: f64,
        viewport_extent: f64,
        content_extent: f64,
    ) -> Option<LoadTicket> {
        if !self.has_more
            || self.is_loading()
            || !self.is_near_end(scroll_offset, viewport_extent, content_extent)
        {
            return None;
        }
        self.shared.state.set(LoadState::LoadingMore);
        let generation = self.shared.generation.get();
        log::debug!("load more started (generation {generation})");
        Some(LoadTicket {
            shared: Rc::downgrade(&self.shared),
            generation,
            settled: false,
        })
    }

    /// Handles a scroll event and, if a load is due, calls `load_more` once.
    ///
    /// The returned future resolves to whatever `load_more`'s future resolves
    /// to; errors are passed through untouched. The loader returns to
    /// [`LoadState::Idle`] as soon as that future settles, or if the returned
    /// future is dropped first.
    pub fn trigger<F, Fut>(
        &mut self,
        scroll_offset: f64,
        viewport_extent: f64,
        content_extent: f64,
        load_more: F,
    ) -> Option<LoadMore<Fut>>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let ticket = self.on_scroll(scroll_offset, viewport_extent, content_extent)?;
        Some(LoadMore {
            future: Box::pin(load_more()),
            ticket: Some(ticket),
        })
    }

    /// Footer to render after the last item.
    #[must_use]
    pub fn footer(&self) -> Footer {
        if self.is_loading() {
            Footer::Loading
        } else if self.has_more {
            Footer::None
        } else {
            Footer::EndOfContent
        }
    }

    /// Renders every loaded item, with its index.
    pub fn render<'a, T, R>(
        &self,
        items: &'a [T],
        mut render_item: impl FnMut(&'a T, usize) -> R,
    ) -> Vec<R> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| render_item(item, index))
            .collect()
    }

    /// Abandons any in-flight load and returns to [`LoadState::Idle`].
    ///
    /// Tickets issued before the reset no longer affect the loader, so a
    /// stale load settling later cannot end a newer one. Hosts call this when
    /// they replace the collection, for example on a new search.
    pub fn reset(&mut self) {
        let generation = self.shared.generation.get().wrapping_add(1);
        self.shared.generation.set(generation);
        self.shared.state.set(LoadState::Idle);
        log::debug!("loader reset (generation {generation})");
    }
}

/// Finalizer for one in-flight load.
///
/// Finishing or dropping the ticket moves its loader back to
/// [`LoadState::Idle`], unless the loader has been dropped or reset since the
/// ticket was issued.
#[must_use = "dropping a ticket immediately returns the loader to idle"]
#[derive(Debug)]
pub struct LoadTicket {
    shared: Weak<Shared>,
    generation: u64,
    settled: bool,
}

impl LoadTicket {
    /// Marks the load as settled.
    pub fn finish(mut self) {
        self.settle();
    }

    /// Returns `true` if settling this ticket would still affect its loader.
    #[must_use]
    pub fn is_current(&self) -> bool {
        !self.settled
            && self
                .shared
                .upgrade()
                .is_some_and(|shared| shared.generation.get() == self.generation)
    }

    fn settle(&mut self) {
        if self.settled {
            return;
        }
        self.settled = true;
        match self.shared.upgrade() {
            Some(shared) if shared.generation.get() == self.generation => {
                shared.state.set(LoadState::Idle);
                log::debug!("load more settled (generation {})", self.generation);
            }
            Some(_) => log::debug!("stale load settled after reset; ignored"),
            None => log::debug!("load settled after loader teardown; ignored"),
        }
    }
}

impl Drop for LoadTicket {
    fn drop(&mut self) {
        self.settle();
    }
}

/// Future returned by [`IncrementalLoader::trigger`].
///
/// Resolves to the output of the host's load and settles its [`LoadTicket`]
/// on the way out.
#[must_use = "futures do nothing unless polled"]
pub struct LoadMore<Fut> {
    future: Pin<Box<Fut>>,
    ticket: Option<LoadTicket>,
}

impl<Fut> fmt::Debug for LoadMore<Fut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadMore")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

impl<Fut: Future> Future for LoadMore<Fut> {
    type Output = Fut::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let output = ready!(this.future.as_mut().poll(cx));
        if let Some(ticket) = this.ticket.take() {
            ticket.finish();
        }
        Poll::Ready(output)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{Footer, IncrementalLoader, LoadState, LoaderConfig};

    #[test]
    fn threshold_defaults_to_one_hundred() {
        assert_eq!(LoaderConfig::default().threshold, 100.0);
        let feed = IncrementalLoader::default();
        assert!(feed.has_more());
        assert_eq!(feed.state(), LoadState::Idle);
        assert_eq!(feed.footer(), Footer::None);
    }

    #[test]
    fn near_end_uses_the_threshold() {
        let feed = IncrementalLoader::new(LoaderConfig::default().with_threshold(50.0));
        assert!(!feed.is_near_end(0.0, 400.0, 1000.0));
        assert!(!feed.is_near_end(549.0, 400.0, 1000.0));
        assert!(feed.is_near_end(550.0, 400.0, 1000.0));
        assert!(feed.is_near_end(600.0, 400.0, 1000.0));
        // Content shorter than the viewport.
        assert!(feed.is_near_end(0.0, 400.0, 100.0));
    }

    #[test]
    fn ticket_finish_returns_to_idle() {
        let mut feed = IncrementalLoader::default();
        let ticket = feed.on_scroll(900.0, 100.0, 1000.0).unwrap();
        assert!(feed.is_loading());
        assert!(ticket.is_current());
        assert!(feed.on_scroll(900.0, 100.0, 1000.0).is_none());
        ticket.finish();
        assert_eq!(feed.state(), LoadState::Idle);
    }

    #[test]
    fn dropping_a_ticket_returns_to_idle() {
        let mut feed = IncrementalLoader::default();
        {
            let _ticket = feed.on_scroll(900.0, 100.0, 1000.0).unwrap();
            assert!(feed.is_loading());
        }
        assert_eq!(feed.state(), LoadState::Idle);
    }

    #[test]
    fn no_load_without_more_items() {
        let mut feed = IncrementalLoader::default();
        feed.set_has_more(false);
        assert!(feed.on_scroll(900.0, 100.0, 1000.0).is_none());
        assert_eq!(feed.footer(), Footer::EndOfContent);
    }

    #[test]
    fn footer_prefers_loading_indicator() {
        let mut feed = IncrementalLoader::default();
        let ticket = feed.on_scroll(900.0, 100.0, 1000.0).unwrap();
        feed.set_has_more(false);
        assert_eq!(feed.footer(), Footer::Loading);
        drop(ticket);
        assert_eq!(feed.footer(), Footer::EndOfContent);
    }

    #[test]
    fn reset_detaches_stale_tickets() {
        let mut feed = IncrementalLoader::default();
        let stale = feed.on_scroll(900.0, 100.0, 1000.0).unwrap();
        feed.reset();
        assert!(!stale.is_current());
        assert_eq!(feed.state(), LoadState::Idle);

        let fresh = feed.on_scroll(900.0, 100.0, 1000.0).unwrap();
        stale.finish();
        assert!(feed.is_loading(), "stale ticket must not end the fresh load");
        fresh.finish();
        assert_eq!(feed.state(), LoadState::Idle);
    }

    #[test]
    fn teardown_turns_settlement_into_a_no_op() {
        let mut feed = IncrementalLoader::default();
        let ticket = feed.on_scroll(900.0, 100.0, 1000.0).unwrap();
        drop(feed);
        assert!(!ticket.is_current());
        ticket.finish();
    }

    #[test]
    fn render_covers_every_loaded_item() {
        let feed = IncrementalLoader::default();
        let items = vec!["a", "b", "c"];
        let rendered: Vec<(usize, &str)> = feed.render(&items, |item, index| (index, *item));
        assert_eq!(rendered, [(0, "a"), (1, "b"), (2, "c")]);
    }
}
