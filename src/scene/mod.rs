//! Scene Reconciler - Route list to scene list.
//!
//! A scene pairs a route with its resolved descriptor. Reconciliation turns
//! a new `(routes, descriptors)` pair plus the previous result into a new
//! scene list, reusing every scene whose inputs are unchanged so downstream
//! consumers can skip work with a pointer comparison.
//!
//! - [`reconcile`] - Pure reconciliation step
//! - [`SceneCache`] - Keeps the last result, recomputes only when inputs change
//!
//! ```text
//! routes + descriptors ──reconcile──▶ scenes ──render──▶ cards
//!        ▲                               │
//!        └──────── previous state ◀──────┘
//! ```

mod cache;
mod reconcile;

pub use cache::*;
pub use reconcile::*;
