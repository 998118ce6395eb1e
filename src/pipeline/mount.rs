//! Mount API - Card stack lifecycle and render effect.
//!
//! Mounting a card stack creates ONE effect that watches the props signal.
//! Every time the props change the effect reconciles scenes, computes the
//! cards and hands them to the [`CardRenderer`].
//!
//! The renderer runs untracked: signals it reads do not become dependencies
//! of the stack pass. Cards look up their focused route in the props signal,
//! so a card kept between passes reports the current focus.
//!
//! # Example
//!
//! ```ignore
//! use spark_signals::signal;
//! use spark_stack::{mount_stack, StackProps, NavigationState};
//!
//! let props = signal(StackProps::new(NavigationState::new(routes, 0), descriptors));
//!
//! let handle = mount_stack(props.clone(), |cards: Vec<CardProps>| {
//!     for card in &cards {
//!         present_card(card);
//!     }
//! });
//!
//! // Push a route: the effect reconciles and renders again
//! props.set(next_props);
//!
//! // Clean up
//! handle.unmount();
//! ```

use std::cell::Cell;
use std::rc::Rc;

use spark_signals::{effect, untrack, Signal};

use crate::scene::SceneCache;
use crate::stack::{render_with_focus, CardProps, FocusedRouteFn, StackProps};
use crate::types::{duplicate_keys, RouteKeys};

// =============================================================================
// Card Renderer
// =============================================================================

/// Presents the cards of a render pass.
///
/// This is where cards become visible: containers, headers, transitions.
/// The card stack itself never draws anything.
pub trait CardRenderer {
    fn render_cards(&mut self, cards: Vec<CardProps>);
}

impl<F> CardRenderer for F
where
    F: FnMut(Vec<CardProps>),
{
    fn render_cards(&mut self, cards: Vec<CardProps>) {
        self(cards)
    }
}

// =============================================================================
// Stack Handle
// =============================================================================

/// Handle returned by [`mount_stack`] that allows unmounting.
pub struct StackHandle {
    stop_effect: Option<Box<dyn FnOnce()>>,
    running: Rc<Cell<bool>>,
    render_count: Rc<Cell<usize>>,
}

impl StackHandle {
    /// Stop the render effect.
    pub fn unmount(mut self) {
        self.running.set(false);

        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }

    /// Check if still mounted.
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Number of render passes handed to the card renderer so far.
    pub fn render_count(&self) -> usize {
        self.render_count.get()
    }
}

impl Drop for StackHandle {
    fn drop(&mut self) {
        self.running.set(false);

        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount a card stack.
///
/// The scene cache is seeded with the descriptors the props hold at mount
/// time. A pass whose props break the container's contract is logged and
/// skipped; the renderer keeps the previous pass.
pub fn mount_stack<R>(props: Signal<StackProps>, mut renderer: R) -> StackHandle
where
    R: CardRenderer + 'static,
{
    let mut cache = SceneCache::new(props.get().descriptors);

    let live_props = props.clone();
    let focus: FocusedRouteFn =
        Rc::new(move || live_props.get().navigation.focused_route().cloned());

    let running = Rc::new(Cell::new(true));
    let render_count = Rc::new(Cell::new(0usize));

    let running_for_effect = running.clone();
    let count_for_effect = render_count.clone();

    let stop_fn = effect(move || {
        if !running_for_effect.get() {
            return;
        }

        // Read props (creates dependency)
        let props = props.get();

        let duplicates = duplicate_keys(&props.routes);
        if !duplicates.is_empty() {
            tracing::warn!(
                ?duplicates,
                routes = %RouteKeys(&props.routes),
                "duplicate route keys in card stack"
            );
        }

        let reconciled = cache.update(&props.routes, &props.descriptors);

        match render_with_focus(cache.scenes(), &props, focus.clone()) {
            Ok(cards) => {
                tracing::debug!(cards = cards.len(), reconciled, "card stack pass");
                untrack(|| renderer.render_cards(cards));
                count_for_effect.set(count_for_effect.get() + 1);
            }
            Err(err) => {
                tracing::error!(%err, routes = %RouteKeys(&props.routes), "skipping card stack pass");
            }
        }
    });

    StackHandle {
        stop_effect: Some(Box::new(stop_fn)),
        running,
        render_count,
    }
}

// =============================================================================
// Tests
// =============================================================================
