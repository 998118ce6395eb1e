//! Scene reconciliation.
//!
//! # Descriptor Resolution
//!
//! For the route at index `i` the descriptor is the first of:
//! 1. the new descriptor map entry for the route key
//! 2. the previous descriptor map entry for the route key
//! 3. the descriptor of the previous scene at the same index `i`
//! 4. the shared fallback descriptor
//!
//! Step 3 is positional, not keyed: after a reorder the scene now at `i`
//! may inherit the descriptor of a different route. Neighbour descriptors
//! use only steps 1 and 2 and may be `None`.
//!
//! # Memoization
//!
//! Each scene remembers `(route, descriptor, next, previous)`. When all four
//! are the same `Rc`s as the memo of the old scene at the same index, the old
//! `Rc<Scene>` is returned as-is.

use std::rc::Rc;

use crate::types::{fallback_descriptor, Descriptor, DescriptorMap, Route, RouteList};

// =============================================================================
// Scene
// =============================================================================

/// Inputs a scene was built from. Only used for change detection.
#[derive(Clone)]
struct SceneMemo {
    route: Rc<Route>,
    descriptor: Rc<Descriptor>,
    next_descriptor: Option<Rc<Descriptor>>,
    previous_descriptor: Option<Rc<Descriptor>>,
}

impl SceneMemo {
    /// Pairwise pointer comparison of all four inputs.
    fn same_as(&self, other: &SceneMemo) -> bool {
        Rc::ptr_eq(&self.route, &other.route)
            && Rc::ptr_eq(&self.descriptor, &other.descriptor)
            && same_optional(&self.next_descriptor, &other.next_descriptor)
            && same_optional(&self.previous_descriptor, &other.previous_descriptor)
    }
}

fn same_optional<T>(a: &Option<Rc<T>>, b: &Option<Rc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// A route paired with its resolved descriptor.
pub struct Scene {
    pub route: Rc<Route>,
    pub descriptor: Rc<Descriptor>,
    memo: SceneMemo,
}

impl Scene {
    fn new(memo: SceneMemo) -> Rc<Self> {
        Rc::new(Self {
            route: memo.route.clone(),
            descriptor: memo.descriptor.clone(),
            memo,
        })
    }

    /// Key of the scene's route.
    pub fn key(&self) -> &str {
        &self.route.key
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("route", &self.route.key)
            .field("descriptor", &self.descriptor.options)
            .finish()
    }
}

// =============================================================================
// Reconciliation State
// =============================================================================

/// Result of the last reconciliation.
///
/// Replaced as a whole on every change, never edited in place.
#[derive(Debug, Clone)]
pub struct ReconciliationState {
    pub routes: RouteList,
    pub descriptors: DescriptorMap,
    pub scenes: Rc<[Rc<Scene>]>,
}

impl ReconciliationState {
    /// Initial state: no routes, no scenes, the initial descriptor map.
    pub fn new(descriptors: DescriptorMap) -> Rc<Self> {
        Rc::new(Self {
            routes: Rc::from(Vec::new()),
            descriptors,
            scenes: Rc::from(Vec::new()),
        })
    }

    /// Resolve the descriptor of `route` from the new map, then from this
    /// state's map.
    fn lookup(&self, descriptors: &DescriptorMap, route: &Route) -> Option<Rc<Descriptor>> {
        descriptors
            .get(&route.key)
            .or_else(|| self.descriptors.get(&route.key))
            .cloned()
    }
}

/// Outcome of [`reconcile`].
#[derive(Debug, Clone)]
pub enum Reconciled {
    /// Inputs were the same `Rc`s; carries the previous state back.
    Unchanged(Rc<ReconciliationState>),
    /// A new state was built.
    Changed(Rc<ReconciliationState>),
}

impl Reconciled {
    pub fn is_changed(&self) -> bool {
        matches!(self, Reconciled::Changed(_))
    }

    pub fn into_state(self) -> Rc<ReconciliationState> {
        match self {
            Reconciled::Unchanged(state) | Reconciled::Changed(state) => state,
        }
    }
}

// =============================================================================
// reconcile()
// =============================================================================

/// Reconcile a new route list and descriptor map against the previous state.
///
/// Returns [`Reconciled::Unchanged`] when both `routes` and `descriptors`
/// are the same `Rc`s the previous state was built from. Otherwise every
/// route gets a scene, in order, reusing old scenes whose memo matches.
pub fn reconcile(
    prev: &Rc<ReconciliationState>,
    routes: &RouteList,
    descriptors: &DescriptorMap,
) -> Reconciled {
    if Rc::ptr_eq(routes, &prev.routes) && Rc::ptr_eq(descriptors, &prev.descriptors) {
        return Reconciled::Unchanged(prev.clone());
    }

    let mut reused = 0usize;

    let scenes: Rc<[Rc<Scene>]> = routes
        .iter()
        .enumerate()
        .map(|(index, route)| {
            let previous_route = index.checked_sub(1).and_then(|i| routes.get(i));
            let next_route = routes.get(index + 1);

            let old_scene = prev.scenes.get(index);

            let descriptor = prev
                .lookup(descriptors, route)
                .or_else(|| old_scene.map(|scene| scene.descriptor.clone()))
                .unwrap_or_else(fallback_descriptor);

            let next_descriptor = next_route.and_then(|r| prev.lookup(descriptors, r));
            let previous_descriptor = previous_route.and_then(|r| prev.lookup(descriptors, r));

            let memo = SceneMemo {
                route: route.clone(),
                descriptor,
                next_descriptor,
                previous_descriptor,
            };

            match old_scene {
                Some(old) if old.memo.same_as(&memo) => {
                    reused += 1;
                    old.clone()
                }
                _ => Scene::new(memo),
            }
        })
        .collect();

    tracing::trace!(
        routes = routes.len(),
        reused,
        rebuilt = routes.len() - reused,
        "reconciled scenes"
    );

    Reconciled::Changed(Rc::new(ReconciliationState {
        routes: routes.clone(),
        descriptors: descriptors.clone(),
        scenes,
    }))
}

// =============================================================================
// Tests
// =============================================================================
