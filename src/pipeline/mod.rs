//! Reactive Pipeline
//!
//! Connects a props signal to a card renderer.
//!
//! ```text
//! Signal<StackProps> → SceneCache::update → render → CardRenderer
//! ```
//!
//! ## Key Design Principles
//!
//! - **One Effect**: reconciliation and the render pass run inside a single
//!   effect, so scenes are always reconciled before cards are computed
//! - **Pure Steps**: `reconcile` and `render` have no side effects; only the
//!   card renderer does

pub mod mount;

pub use mount::{mount_stack, CardRenderer, StackHandle};
