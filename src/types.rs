//! Core types for spark-stack.
//!
//! These are the values the navigation container hands to the card stack:
//! routes, per-route descriptors and the navigation state. All of them are
//! shared through `Rc` and compared by identity, never by value. The card
//! stack never mutates any of them.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

// =============================================================================
// Route
// =============================================================================

/// Stable unique key of a route.
pub type RouteKey = String;

/// One navigable screen instance.
///
/// Owned by the navigation container. Two routes are "the same" for the
/// card stack only when they are the same `Rc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub key: RouteKey,
    pub name: String,
}

impl Route {
    /// Create a shared route.
    pub fn new(key: impl Into<RouteKey>, name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            key: key.into(),
            name: name.into(),
        })
    }
}

/// Ordered list of routes, bottom of the stack first.
///
/// A new list is a new `Rc`; reusing the same `Rc` tells the card stack that
/// nothing about the ordering changed.
pub type RouteList = Rc<[Rc<Route>]>;

/// Build a route list from shared routes.
pub fn route_list(routes: impl IntoIterator<Item = Rc<Route>>) -> RouteList {
    routes.into_iter().collect()
}

// =============================================================================
// Options
// =============================================================================

/// Card surface styling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardStyle {
    /// Background color of the card (CSS color string).
    pub background: Option<String>,
    /// Card opacity, 0.0 ..= 1.0.
    pub opacity: Option<f32>,
}

/// Per-route rendering options.
///
/// Every field is optional; `None` means "use the stack default".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackNavigationOptions {
    /// Header title. The header falls back to the route name.
    pub title: Option<String>,
    /// Whether the header is rendered for this card.
    pub header_shown: Option<bool>,
    /// Style applied to the card container.
    pub card_style: Option<CardStyle>,
}

// =============================================================================
// Descriptor
// =============================================================================

/// Configuration attached to a route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descriptor {
    pub options: StackNavigationOptions,
}

impl Descriptor {
    /// Create a shared descriptor from options.
    pub fn new(options: StackNavigationOptions) -> Rc<Self> {
        Rc::new(Self { options })
    }
}

/// Descriptors keyed by route key.
pub type DescriptorMap = Rc<HashMap<RouteKey, Rc<Descriptor>>>;

/// Build a descriptor map from `(key, descriptor)` pairs.
pub fn descriptor_map<K: Into<RouteKey>>(
    entries: impl IntoIterator<Item = (K, Rc<Descriptor>)>,
) -> DescriptorMap {
    Rc::new(entries.into_iter().map(|(k, d)| (k.into(), d)).collect())
}

thread_local! {
    /// Frozen empty-options descriptor. Handed out by reference so every
    /// fallback on this thread is the same `Rc`.
    static FALLBACK_DESCRIPTOR: Rc<Descriptor> = Rc::new(Descriptor::default());
}

/// The shared empty-options descriptor used when a route has none.
pub fn fallback_descriptor() -> Rc<Descriptor> {
    FALLBACK_DESCRIPTOR.with(Rc::clone)
}

/// Check whether a descriptor is the shared fallback.
pub fn is_fallback_descriptor(descriptor: &Rc<Descriptor>) -> bool {
    FALLBACK_DESCRIPTOR.with(|fallback| Rc::ptr_eq(fallback, descriptor))
}

// =============================================================================
// Navigation State
// =============================================================================

/// Navigation state of the driving container.
///
/// `index` must point into `routes`; that is the producer's contract.
#[derive(Debug, Clone)]
pub struct NavigationState {
    pub routes: RouteList,
    pub index: usize,
}

impl NavigationState {
    pub fn new(routes: RouteList, index: usize) -> Self {
        Self { routes, index }
    }

    /// The route at `index`, looked up on every call.
    pub fn focused_route(&self) -> Option<&Rc<Route>> {
        self.routes.get(self.index)
    }
}

impl PartialEq for NavigationState {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.routes, &other.routes) && self.index == other.index
    }
}

// =============================================================================
// Card Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Per-card status computed on every render pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CardFlags: u8 {
        const NONE = 0;
        /// Topmost card; the only one that receives input.
        const ACTIVE = 1 << 0;
        /// Card of the route the navigation state focuses.
        const FOCUSED = 1 << 1;
        /// Route is in a close transition.
        const CLOSING = 1 << 2;
        /// Route is in an open transition.
        const OPENING = 1 << 3;
    }
}

// =============================================================================
// Cleanup
// =============================================================================

/// What a render function returns: the closure that tears down whatever it
/// rendered.
pub type Cleanup = Box<dyn FnOnce()>;

/// A cleanup that does nothing.
pub fn noop_cleanup() -> Cleanup {
    Box::new(|| {})
}

// =============================================================================
// Debug helpers
// =============================================================================

/// Formats a route list as its keys, e.g. `[home, details]`.
pub struct RouteKeys<'a>(pub &'a [Rc<Route>]);

impl fmt::Display for RouteKeys<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, route) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&route.key)?;
        }
        f.write_str("]")
    }
}

/// Keys that appear more than once in `routes`, in first-duplicate order.
pub fn duplicate_keys(routes: &[Rc<Route>]) -> Vec<RouteKey> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for route in routes {
        if !seen.insert(route.key.as_str()) && !duplicates.contains(&route.key) {
            duplicates.push(route.key.clone());
        }
    }
    duplicates
}

// =============================================================================
// Tests
// =============================================================================
