//! Stack props - everything the container passes to one card stack.

use std::collections::HashSet;
use std::rc::Rc;

use super::callbacks::StackCallbacks;
use crate::types::{DescriptorMap, NavigationState, RouteKey, RouteList};

/// Set of route keys in a transition.
pub type RouteKeySet = Rc<HashSet<RouteKey>>;

/// Build a key set.
pub fn route_keys<K: Into<RouteKey>>(keys: impl IntoIterator<Item = K>) -> RouteKeySet {
    Rc::new(keys.into_iter().map(Into::into).collect())
}

/// Props of a card stack.
///
/// `routes` is the authoritative ordering for a render pass. It is usually
/// `navigation.routes`, but a container may keep closing routes in it after
/// they left the navigation state.
///
/// Equality is identity on every field, so an unchanged props value never
/// triggers a pass when held in a signal.
#[derive(Debug, Clone)]
pub struct StackProps {
    pub navigation: NavigationState,
    pub routes: RouteList,
    pub descriptors: DescriptorMap,
    pub opening_route_keys: RouteKeySet,
    pub closing_route_keys: RouteKeySet,
    pub callbacks: StackCallbacks,
}

impl StackProps {
    /// Props rendering exactly the navigation state's routes, with nothing
    /// in transition and default callbacks.
    pub fn new(navigation: NavigationState, descriptors: DescriptorMap) -> Self {
        Self {
            routes: navigation.routes.clone(),
            navigation,
            descriptors,
            opening_route_keys: route_keys(Vec::<RouteKey>::new()),
            closing_route_keys: route_keys(Vec::<RouteKey>::new()),
            callbacks: StackCallbacks::default(),
        }
    }
}

impl PartialEq for StackProps {
    fn eq(&self, other: &Self) -> bool {
        self.navigation == other.navigation
            && Rc::ptr_eq(&self.routes, &other.routes)
            && Rc::ptr_eq(&self.descriptors, &other.descriptors)
            && Rc::ptr_eq(&self.opening_route_keys, &other.opening_route_keys)
            && Rc::ptr_eq(&self.closing_route_keys, &other.closing_route_keys)
            && self.callbacks == other.callbacks
    }
}
