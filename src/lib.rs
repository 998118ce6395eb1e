//! # spark-stack
//!
//! Card stack for stack navigators.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! A navigation container owns the routes. The card stack turns them into a
//! visually stacked set of cards and works out, for every card, which card
//! it logically follows (transition direction, header back button).
//!
//! ```text
//! routes + descriptors → reconcile → scenes → render → CardProps → CardRenderer
//! ```
//!
//! Scenes are memoized by identity: a scene whose route, descriptor and
//! neighbour descriptors are the same `Rc`s as last time is the same
//! `Rc<Scene>`, so card renderers can skip work with `Rc::ptr_eq`.
//!
//! Everything is single-threaded and synchronous. Shared values are `Rc`.
//!
//! ## Modules
//!
//! - [`types`] - Routes, descriptors, navigation state, card flags
//! - [`scene`] - Scene reconciliation and the scene cache
//! - [`stack`] - Stack props, callbacks and the render pass
//! - [`pipeline`] - Reactive mount driven by a props signal
//! - [`error`] - Render pass errors

pub mod error;
pub mod pipeline;
pub mod scene;
pub mod stack;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::StackError;

pub use scene::{reconcile, Reconciled, ReconciliationState, Scene, SceneCache};

pub use stack::{
    find_previous_scene, render, render_with_focus, route_keys, CardProps, HeaderProps,
    RouteKeySet, StackCallbacks, StackProps,
    // Callback types
    FocusedRouteFn, PreviousRouteFn, RenderHeaderFn, RenderSceneFn, RouteCallback, TransitionCallback,
};

pub use pipeline::{mount_stack, CardRenderer, StackHandle};
