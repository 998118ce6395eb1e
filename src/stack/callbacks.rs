//! Stack callbacks - collaborators supplied by the navigation container.
//!
//! The card stack never renders screen content or header chrome itself and
//! never decides when a transition starts. It forwards these closures to
//! every card unchanged; cloning [`StackCallbacks`] shares the same `Rc`s.

use std::rc::Rc;

use crate::scene::Scene;
use crate::types::{noop_cleanup, Cleanup, Route};

/// Resolves the logical previous route ("go back" target) of a route.
pub type PreviousRouteFn = Rc<dyn Fn(&Rc<Route>) -> Option<Rc<Route>>>;

/// Renders the header of one card.
pub type RenderHeaderFn = Rc<dyn Fn(HeaderProps) -> Cleanup>;

/// Renders the screen content of a route.
pub type RenderSceneFn = Rc<dyn Fn(&Rc<Route>) -> Cleanup>;

/// Open/close notification for a route.
pub type RouteCallback = Rc<dyn Fn(&Rc<Route>)>;

/// Transition start/end notification; the flag is true when closing.
pub type TransitionCallback = Rc<dyn Fn(&Rc<Route>, bool)>;

/// Inputs for the header renderer.
#[derive(Debug, Clone)]
pub struct HeaderProps {
    pub scene: Rc<Scene>,
    pub previous_scene: Option<Rc<Scene>>,
    pub focused: bool,
    /// `options.title`, or the route name.
    pub title: String,
}

/// All closures the container hands to the card stack.
#[derive(Clone)]
pub struct StackCallbacks {
    pub get_previous_route: PreviousRouteFn,
    pub render_header: RenderHeaderFn,
    pub render_scene: RenderSceneFn,
    pub on_open_route: RouteCallback,
    pub on_close_route: RouteCallback,
    pub on_transition_start: TransitionCallback,
    pub on_transition_end: TransitionCallback,
}

impl Default for StackCallbacks {
    fn default() -> Self {
        Self {
            get_previous_route: Rc::new(|_: &Rc<Route>| None::<Rc<Route>>),
            render_header: Rc::new(|_: HeaderProps| noop_cleanup()),
            render_scene: Rc::new(|_: &Rc<Route>| noop_cleanup()),
            on_open_route: Rc::new(|_: &Rc<Route>| {}),
            on_close_route: Rc::new(|_: &Rc<Route>| {}),
            on_transition_start: Rc::new(|_: &Rc<Route>, _: bool| {}),
            on_transition_end: Rc::new(|_: &Rc<Route>, _: bool| {}),
        }
    }
}

impl StackCallbacks {
    pub fn with_previous_route(
        mut self,
        f: impl Fn(&Rc<Route>) -> Option<Rc<Route>> + 'static,
    ) -> Self {
        self.get_previous_route = Rc::new(f);
        self
    }

    pub fn with_render_header(mut self, f: impl Fn(HeaderProps) -> Cleanup + 'static) -> Self {
        self.render_header = Rc::new(f);
        self
    }

    pub fn with_render_scene(mut self, f: impl Fn(&Rc<Route>) -> Cleanup + 'static) -> Self {
        self.render_scene = Rc::new(f);
        self
    }

    pub fn with_on_open_route(mut self, f: impl Fn(&Rc<Route>) + 'static) -> Self {
        self.on_open_route = Rc::new(f);
        self
    }

    pub fn with_on_close_route(mut self, f: impl Fn(&Rc<Route>) + 'static) -> Self {
        self.on_close_route = Rc::new(f);
        self
    }

    pub fn with_on_transition_start(mut self, f: impl Fn(&Rc<Route>, bool) + 'static) -> Self {
        self.on_transition_start = Rc::new(f);
        self
    }

    pub fn with_on_transition_end(mut self, f: impl Fn(&Rc<Route>, bool) + 'static) -> Self {
        self.on_transition_end = Rc::new(f);
        self
    }
}

impl PartialEq for StackCallbacks {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.get_previous_route, &other.get_previous_route)
            && Rc::ptr_eq(&self.render_header, &other.render_header)
            && Rc::ptr_eq(&self.render_scene, &other.render_scene)
            && Rc::ptr_eq(&self.on_open_route, &other.on_open_route)
            && Rc::ptr_eq(&self.on_close_route, &other.on_close_route)
            && Rc::ptr_eq(&self.on_transition_start, &other.on_transition_start)
            && Rc::ptr_eq(&self.on_transition_end, &other.on_transition_end)
    }
}

impl std::fmt::Debug for StackCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackCallbacks").finish_non_exhaustive()
    }
}
