//! Stack render pass.
//!
//! Walks the live route list once and emits one [`CardProps`] per route, in
//! order. Nothing is skipped or merged.
//!
//! # Previous Scene Lookup
//!
//! The container decides which route a card logically returns to. That route
//! always sits below the card, so only `scenes[0..index]` is scanned,
//! nearest first. If the resolver has no answer, or its answer is not in
//! that prefix, the card below (`scenes[index - 1]`) is used.
//!
//! # Focus Lookup
//!
//! The `FOCUSED` flag is fixed for the pass. [`CardProps::focused_route`]
//! asks a [`FocusedRouteFn`] instead, so a card kept by the renderer after
//! the pass still sees where focus is now.

use std::fmt;
use std::rc::Rc;

use super::callbacks::{HeaderProps, StackCallbacks};
use super::props::StackProps;
use crate::error::StackError;
use crate::scene::Scene;
use crate::types::{CardFlags, CardStyle, Cleanup, Route};

// =============================================================================
// CardProps
// =============================================================================

/// Looks up the route the navigation state focuses at call time.
pub type FocusedRouteFn = Rc<dyn Fn() -> Option<Rc<Route>>>;

/// Everything the card collaborator needs to present one card.
#[derive(Clone)]
pub struct CardProps {
    pub index: usize,
    pub flags: CardFlags,
    pub scene: Rc<Scene>,
    pub previous_scene: Option<Rc<Scene>>,
    pub header_shown: Option<bool>,
    pub card_style: Option<CardStyle>,
    pub callbacks: StackCallbacks,
    focus: FocusedRouteFn,
}

impl fmt::Debug for CardProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardProps")
            .field("index", &self.index)
            .field("flags", &self.flags)
            .field("scene", &self.scene)
            .field("previous_scene", &self.previous_scene.as_ref().map(|s| s.key()))
            .field("header_shown", &self.header_shown)
            .field("card_style", &self.card_style)
            .finish_non_exhaustive()
    }
}

impl CardProps {
    pub fn key(&self) -> &str {
        self.scene.key()
    }

    pub fn route(&self) -> &Rc<Route> {
        &self.scene.route
    }

    /// Topmost card.
    pub fn is_active(&self) -> bool {
        self.flags.contains(CardFlags::ACTIVE)
    }

    pub fn is_focused(&self) -> bool {
        self.flags.contains(CardFlags::FOCUSED)
    }

    pub fn is_closing(&self) -> bool {
        self.flags.contains(CardFlags::CLOSING)
    }

    pub fn is_opening(&self) -> bool {
        self.flags.contains(CardFlags::OPENING)
    }

    /// Render the screen content of this card.
    pub fn render_scene(&self) -> Cleanup {
        (self.callbacks.render_scene)(&self.scene.route)
    }

    /// Render this card's header. `None` when the options hide it.
    pub fn render_header(&self) -> Option<Cleanup> {
        if self.header_shown == Some(false) {
            return None;
        }

        let title = self
            .scene
            .descriptor
            .options
            .title
            .clone()
            .unwrap_or_else(|| self.scene.route.name.clone());

        Some((self.callbacks.render_header)(HeaderProps {
            scene: self.scene.clone(),
            previous_scene: self.previous_scene.clone(),
            focused: self.is_focused(),
            title,
        }))
    }

    /// Logical previous route of this card, as the container resolves it.
    pub fn previous_route(&self) -> Option<Rc<Route>> {
        (self.callbacks.get_previous_route)(&self.scene.route)
    }

    /// Route focused right now. Unlike [`is_focused`](Self::is_focused), this
    /// follows the navigation state after the pass that built the card.
    pub fn focused_route(&self) -> Option<Rc<Route>> {
        (self.focus)()
    }

    pub fn open(&self) {
        (self.callbacks.on_open_route)(&self.scene.route)
    }

    pub fn close(&self) {
        (self.callbacks.on_close_route)(&self.scene.route)
    }

    pub fn transition_start(&self, closing: bool) {
        (self.callbacks.on_transition_start)(&self.scene.route, closing)
    }

    pub fn transition_end(&self, closing: bool) {
        (self.callbacks.on_transition_end)(&self.scene.route, closing)
    }
}

// =============================================================================
// Previous Scene Lookup
// =============================================================================

/// Find the scene a card at `index` logically follows.
///
/// Scans `scenes[index-1]` down to `scenes[0]` for `previous_route`'s key and
/// stops at the first match. Falls back to `scenes[index-1]`, which is `None`
/// at index 0.
pub fn find_previous_scene(
    scenes: &[Rc<Scene>],
    index: usize,
    previous_route: Option<&Route>,
) -> Option<Rc<Scene>> {
    let below = index.checked_sub(1).and_then(|i| scenes.get(i));

    previous_route
        .and_then(|previous| {
            scenes[..index.min(scenes.len())]
                .iter()
                .rev()
                .find(|scene| scene.route.key == previous.key)
        })
        .or(below)
        .cloned()
}

// =============================================================================
// render()
// =============================================================================

/// Compute the cards of one render pass.
///
/// `scenes` must come from reconciling `props.routes`; the navigation index
/// must point at a route. Both are the caller's contract and are reported as
/// [`StackError`] rather than handled.
///
/// The cards' [`CardProps::focused_route`] reads `props.navigation` as it is
/// now. Use [`render_with_focus`] to point it at live state.
pub fn render(scenes: &[Rc<Scene>], props: &StackProps) -> Result<Vec<CardProps>, StackError> {
    let navigation = props.navigation.clone();
    render_with_focus(
        scenes,
        props,
        Rc::new(move || navigation.focused_route().cloned()),
    )
}

/// [`render`] with the lookup behind [`CardProps::focused_route`].
pub fn render_with_focus(
    scenes: &[Rc<Scene>],
    props: &StackProps,
    focus: FocusedRouteFn,
) -> Result<Vec<CardProps>, StackError> {
    if props.routes.is_empty() {
        return Ok(Vec::new());
    }

    let focused_route = props.navigation.focused_route().cloned().ok_or(
        StackError::FocusedIndexOutOfRange {
            index: props.navigation.index,
            len: props.navigation.routes.len(),
        },
    )?;

    let last = props.routes.len() - 1;

    props
        .routes
        .iter()
        .enumerate()
        .map(|(index, route)| {
            let scene = scenes
                .get(index)
                .filter(|scene| Rc::ptr_eq(&scene.route, route))
                .ok_or_else(|| StackError::MissingScene {
                    index,
                    key: route.key.clone(),
                })?;

            let mut flags = CardFlags::NONE;
            if index == last {
                flags |= CardFlags::ACTIVE;
            }
            if focused_route.key == route.key {
                flags |= CardFlags::FOCUSED;
            }
            if props.closing_route_keys.contains(&route.key) {
                flags |= CardFlags::CLOSING;
            }
            if props.opening_route_keys.contains(&route.key) {
                flags |= CardFlags::OPENING;
            }

            let previous_route = (props.callbacks.get_previous_route)(&scene.route);
            let previous_scene = find_previous_scene(scenes, index, previous_route.as_deref());

            let options = &scene.descriptor.options;

            Ok(CardProps {
                index,
                flags,
                scene: scene.clone(),
                previous_scene,
                header_shown: options.header_shown,
                card_style: options.card_style.clone(),
                callbacks: props.callbacks.clone(),
                focus: focus.clone(),
            })
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::scene::SceneCache;
    use crate::stack::props::route_keys;
    use crate::types::{
        descriptor_map, route_list, Descriptor, DescriptorMap, NavigationState, RouteList,
        StackNavigationOptions,
    };

    fn routes(keys: &[&str]) -> RouteList {
        route_list(keys.iter().map(|k| Route::new(*k, k.to_uppercase())))
    }

    fn empty_map() -> DescriptorMap {
        descriptor_map(Vec::<(String, Rc<Descriptor>)>::new())
    }

    /// Reconcile and render in one go.
    fn pass(props: &StackProps) -> Vec<CardProps> {
        let mut cache = SceneCache::new(props.descriptors.clone());
        cache.update(&props.routes, &props.descriptors);
        render(cache.scenes(), props).unwrap()
    }

    /// Resolver built from a `key -> previous key` table.
    fn resolver(routes: &RouteList, table: &[(&str, &str)]) -> StackCallbacks {
        let by_key: HashMap<String, Rc<Route>> =
            routes.iter().map(|r| (r.key.clone(), r.clone())).collect();
        let table: HashMap<String, String> = table
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        StackCallbacks::default().with_previous_route(move |route| {
            table.get(&route.key).and_then(|k| by_key.get(k)).cloned()
        })
    }

    fn previous_key(card: &CardProps) -> Option<&str> {
        card.previous_scene.as_ref().map(|s| s.key())
    }

    #[test]
    fn test_single_route() {
        let r = routes(&["home"]);
        let props = StackProps::new(NavigationState::new(r, 0), empty_map());

        let cards = pass(&props);
        assert_eq!(cards.len(), 1);
        assert!(cards[0].is_active());
        assert!(cards[0].is_focused());
        assert!(!cards[0].is_closing());
        assert!(cards[0].previous_scene.is_none());
        assert_eq!(cards[0].header_shown, None);
        assert_eq!(cards[0].card_style, None);
    }

    #[test]
    fn test_active_and_focused() {
        let r = routes(&["a", "b", "c"]);
        let props = StackProps::new(NavigationState::new(r, 1), empty_map());

        let cards = pass(&props);
        let focused: Vec<bool> = cards.iter().map(|c| c.is_focused()).collect();
        let active: Vec<bool> = cards.iter().map(|c| c.is_active()).collect();
        assert_eq!(focused, vec![false, true, false]);
        assert_eq!(active, vec![false, false, true]);
        assert!(cards
            .iter()
            .all(|c| c.focused_route().is_some_and(|r| r.key == "b")));
    }

    #[test]
    fn test_focused_route_follows_live_state() {
        let r = routes(&["a", "b"]);
        let props = StackProps::new(NavigationState::new(r.clone(), 1), empty_map());
        let live = Rc::new(RefCell::new(props.navigation.clone()));

        let mut cache = SceneCache::new(empty_map());
        cache.update(&r, &props.descriptors);
        let state = live.clone();
        let cards = render_with_focus(
            cache.scenes(),
            &props,
            Rc::new(move || state.borrow().focused_route().cloned()),
        )
        .unwrap();

        assert_eq!(cards[0].focused_route().map(|r| r.key.clone()), Some("b".to_string()));

        // Back pressed after the pass: the held card sees the new focus.
        *live.borrow_mut() = NavigationState::new(r.clone(), 0);
        assert_eq!(cards[0].focused_route().map(|r| r.key.clone()), Some("a".to_string()));
        // The pass flags stay as rendered.
        assert!(!cards[0].is_focused());
        assert!(cards[1].is_focused());

        *live.borrow_mut() = NavigationState::new(r, 5);
        assert!(cards[1].focused_route().is_none());
    }

    #[test]
    fn test_closing_and_opening_keys() {
        let r = routes(&["a", "b", "c"]);
        let props = StackProps {
            closing_route_keys: route_keys(["b"]),
            opening_route_keys: route_keys(["c"]),
            ..StackProps::new(NavigationState::new(r, 2), empty_map())
        };

        let cards = pass(&props);
        let closing: Vec<bool> = cards.iter().map(|c| c.is_closing()).collect();
        let opening: Vec<bool> = cards.iter().map(|c| c.is_opening()).collect();
        assert_eq!(closing, vec![false, true, false]);
        assert_eq!(opening, vec![false, false, true]);
    }

    #[test]
    fn test_positional_previous_scene_without_resolver() {
        let r = routes(&["a", "b", "c"]);
        let props = StackProps::new(NavigationState::new(r, 2), empty_map());

        let cards = pass(&props);
        let previous: Vec<Option<&str>> = cards.iter().map(previous_key).collect();
        assert_eq!(previous, vec![None, Some("a"), Some("b")]);
    }

    #[test]
    fn test_backward_scan_finds_logical_previous() {
        let r = routes(&["a", "b", "c", "d"]);
        let props = StackProps {
            callbacks: resolver(&r, &[("d", "b")]),
            ..StackProps::new(NavigationState::new(r.clone(), 3), empty_map())
        };

        let cards = pass(&props);
        assert_eq!(previous_key(&cards[3]), Some("b"));
        assert!(Rc::ptr_eq(
            cards[3].previous_scene.as_ref().unwrap(),
            &cards[1].scene
        ));
        // Others fall back to the card below.
        assert_eq!(previous_key(&cards[2]), Some("b"));
        assert_eq!(previous_key(&cards[1]), Some("a"));
    }

    #[test]
    fn test_backward_scan_stops_at_nearest_match() {
        // Two scenes share a key; the one closest below wins.
        let r = route_list([
            Route::new("a", "A"),
            Route::new("x", "X1"),
            Route::new("x", "X2"),
            Route::new("b", "B"),
        ]);
        let scenes_source = r.clone();
        let props = StackProps {
            callbacks: StackCallbacks::default().with_previous_route(move |route| {
                (route.key == "b").then(|| scenes_source[1].clone())
            }),
            ..StackProps::new(NavigationState::new(r, 3), empty_map())
        };

        let cards = pass(&props);
        let found = cards[3].previous_scene.as_ref().unwrap();
        assert_eq!(found.route.name, "X2");
    }

    #[test]
    fn test_previous_route_above_falls_back() {
        // "b" claims to go back to "c", which sits above it.
        let r = routes(&["a", "b", "c"]);
        let props = StackProps {
            callbacks: resolver(&r, &[("b", "c")]),
            ..StackProps::new(NavigationState::new(r.clone(), 2), empty_map())
        };

        let cards = pass(&props);
        assert_eq!(previous_key(&cards[1]), Some("a"));
    }

    #[test]
    fn test_previous_route_not_in_stack_falls_back() {
        let r = routes(&["a", "b"]);
        let stranger = Route::new("zzz", "Stranger");
        let props = StackProps {
            callbacks: StackCallbacks::default()
                .with_previous_route(move |_| Some(stranger.clone())),
            ..StackProps::new(NavigationState::new(r, 1), empty_map())
        };

        let cards = pass(&props);
        assert_eq!(previous_key(&cards[0]), None);
        assert_eq!(previous_key(&cards[1]), Some("a"));
    }

    #[test]
    fn test_find_previous_scene_at_index_zero() {
        let r = routes(&["a"]);
        let mut cache = SceneCache::new(empty_map());
        cache.update(&r, &empty_map());

        assert!(find_previous_scene(cache.scenes(), 0, Some(&r[0])).is_none());
        assert!(find_previous_scene(cache.scenes(), 0, None).is_none());
    }

    #[test]
    fn test_options_are_extracted() {
        let r = routes(&["home", "details"]);
        let style = CardStyle {
            background: Some("#fff".to_string()),
            opacity: Some(0.5),
        };
        let descriptors = descriptor_map([(
            "details",
            Descriptor::new(StackNavigationOptions {
                header_shown: Some(false),
                card_style: Some(style.clone()),
                ..Default::default()
            }),
        )]);
        let props = StackProps::new(NavigationState::new(r, 1), descriptors);

        let cards = pass(&props);
        assert_eq!(cards[0].header_shown, None);
        assert_eq!(cards[1].header_shown, Some(false));
        assert_eq!(cards[1].card_style, Some(style));
    }

    #[test]
    fn test_empty_routes_render_nothing() {
        let r = routes(&[]);
        let props = StackProps::new(NavigationState::new(r, 0), empty_map());
        assert!(render(&[], &props).unwrap().is_empty());
    }

    #[test]
    fn test_focus_out_of_range_is_an_error() {
        let r = routes(&["a"]);
        let props = StackProps::new(NavigationState::new(r.clone(), 4), empty_map());
        let mut cache = SceneCache::new(empty_map());
        cache.update(&r, &props.descriptors);

        assert_eq!(
            render(cache.scenes(), &props).unwrap_err(),
            StackError::FocusedIndexOutOfRange { index: 4, len: 1 }
        );
    }

    #[test]
    fn test_stale_scenes_are_an_error() {
        let r = routes(&["a", "b"]);
        let props = StackProps::new(NavigationState::new(r, 0), empty_map());
        let mut cache = SceneCache::new(empty_map());
        cache.update(&routes(&["a"]), &props.descriptors);

        assert_eq!(
            render(cache.scenes(), &props).unwrap_err(),
            StackError::MissingScene {
                index: 1,
                key: "b".to_string()
            }
        );
    }

    #[test]
    fn test_scenes_of_other_routes_are_an_error() {
        // Same length, different routes.
        let mut cache = SceneCache::new(empty_map());
        cache.update(&routes(&["x", "y"]), &empty_map());

        let props = StackProps::new(NavigationState::new(routes(&["a", "b"]), 1), empty_map());
        assert_eq!(
            render(cache.scenes(), &props).unwrap_err(),
            StackError::MissingScene {
                index: 0,
                key: "a".to_string()
            }
        );

        // Same keys, but not the route list that was reconciled.
        let props = StackProps::new(NavigationState::new(routes(&["x", "y"]), 1), empty_map());
        assert!(matches!(
            render(cache.scenes(), &props),
            Err(StackError::MissingScene { index: 0, .. })
        ));
    }

    #[test]
    fn test_callbacks_are_forwarded() {
        let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

        let open_log = log.clone();
        let close_log = log.clone();
        let start_log = log.clone();
        let end_log = log.clone();
        let scene_log = log.clone();
        let header_log = log.clone();

        let callbacks = StackCallbacks::default()
            .with_on_open_route(move |r| open_log.borrow_mut().push(format!("open {}", r.key)))
            .with_on_close_route(move |r| close_log.borrow_mut().push(format!("close {}", r.key)))
            .with_on_transition_start(move |r, closing| {
                start_log
                    .borrow_mut()
                    .push(format!("start {} {}", r.key, closing))
            })
            .with_on_transition_end(move |r, closing| {
                end_log.borrow_mut().push(format!("end {} {}", r.key, closing))
            })
            .with_render_scene(move |r| {
                let log = scene_log.clone();
                log.borrow_mut().push(format!("scene {}", r.key));
                let key = r.key.clone();
                Box::new(move || log.borrow_mut().push(format!("unmount {key}")))
            })
            .with_render_header(move |header| {
                header_log.borrow_mut().push(format!(
                    "header {} back={:?}",
                    header.title,
                    header.previous_scene.as_ref().map(|s| s.key().to_string())
                ));
                Box::new(|| {})
            });

        let r = routes(&["home", "details"]);
        let props = StackProps {
            callbacks: callbacks.clone(),
            ..StackProps::new(NavigationState::new(r, 1), empty_map())
        };
        let cards = pass(&props);
        assert_eq!(cards[1].callbacks, callbacks);

        let card = &cards[1];
        card.transition_start(false);
        card.transition_end(false);
        card.open();
        let cleanup = card.render_scene();
        assert!(card.render_header().is_some());
        card.close();
        cleanup();

        assert_eq!(
            *log.borrow(),
            vec![
                "start details false",
                "end details false",
                "open details",
                "scene details",
                "header DETAILS back=Some(\"home\")",
                "close details",
                "unmount details",
            ]
        );
    }

    #[test]
    fn test_hidden_header_is_not_rendered() {
        let rendered = Rc::new(RefCell::new(0));
        let rendered_clone = rendered.clone();

        let r = routes(&["home"]);
        let descriptors = descriptor_map([(
            "home",
            Descriptor::new(StackNavigationOptions {
                header_shown: Some(false),
                ..Default::default()
            }),
        )]);
        let props = StackProps {
            callbacks: StackCallbacks::default().with_render_header(move |_| {
                *rendered_clone.borrow_mut() += 1;
                Box::new(|| {})
            }),
            ..StackProps::new(NavigationState::new(r, 0), descriptors)
        };

        let cards = pass(&props);
        assert!(cards[0].render_header().is_none());
        assert_eq!(*rendered.borrow(), 0);
    }

    #[test]
    fn test_header_title_prefers_options() {
        let title = Rc::new(RefCell::new(String::new()));
        let title_clone = title.clone();

        let r = routes(&["home"]);
        let descriptors = descriptor_map([(
            "home",
            Descriptor::new(StackNavigationOptions {
                title: Some("Welcome".to_string()),
                ..Default::default()
            }),
        )]);
        let props = StackProps {
            callbacks: StackCallbacks::default().with_render_header(move |header| {
                *title_clone.borrow_mut() = header.title;
                Box::new(|| {})
            }),
            ..StackProps::new(NavigationState::new(r, 0), descriptors)
        };

        let cards = pass(&props);
        assert!(cards[0].render_header().is_some());
        assert_eq!(*title.borrow(), "Welcome");
    }

    #[test]
    fn test_card_previous_route_uses_resolver() {
        let r = routes(&["a", "b", "c"]);
        let props = StackProps {
            callbacks: resolver(&r, &[("c", "a")]),
            ..StackProps::new(NavigationState::new(r.clone(), 2), empty_map())
        };

        let cards = pass(&props);
        assert_eq!(cards[2].previous_route().map(|r| r.key.clone()), Some("a".to_string()));
        assert!(cards[0].previous_route().is_none());
    }
}
