//! Stack Renderer - Scenes to per-card props.
//!
//! - [`StackProps`] - What the navigation container passes in
//! - [`StackCallbacks`] - Resolver, renderers and lifecycle callbacks
//! - [`render`] - One pass over the routes, one [`CardProps`] per route
//!
//! Per route the card stack only reads state. Entering, closing and removal
//! are driven by the container through `routes` and the key sets:
//!
//! ```text
//! entering ──▶ present ──▶ closing ──▶ removed
//! ```

mod callbacks;
mod props;
mod render;

pub use callbacks::*;
pub use props::*;
pub use render::*;
