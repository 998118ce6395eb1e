//! Scene cache - recompute scenes only when inputs change.
//!
//! Hosts call [`SceneCache::update`] right before every render pass with
//! the current props. The cached state is swapped for a new one only when
//! the route list or the descriptor map is a different `Rc`.

use std::rc::Rc;

use super::reconcile::{reconcile, Reconciled, ReconciliationState, Scene};
use crate::types::{DescriptorMap, RouteList};

/// Holds the latest [`ReconciliationState`].
#[derive(Debug, Clone)]
pub struct SceneCache {
    state: Rc<ReconciliationState>,
}

impl SceneCache {
    /// Create a cache seeded with the initial descriptor map.
    pub fn new(descriptors: DescriptorMap) -> Self {
        Self {
            state: ReconciliationState::new(descriptors),
        }
    }

    /// Reconcile against new inputs. Returns true if the state was replaced.
    pub fn update(&mut self, routes: &RouteList, descriptors: &DescriptorMap) -> bool {
        match reconcile(&self.state, routes, descriptors) {
            Reconciled::Unchanged(_) => false,
            Reconciled::Changed(state) => {
                self.state = state;
                true
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> &Rc<ReconciliationState> {
        &self.state
    }

    /// Current scenes, one per route.
    pub fn scenes(&self) -> &[Rc<Scene>] {
        &self.state.scenes
    }
}

// =============================================================================
// Tests
// =============================================================================
