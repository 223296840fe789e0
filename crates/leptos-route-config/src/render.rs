use std::fmt;
use std::sync::Arc;

use crate::descriptor::{RouteDescriptor, RouteKey, RouteKind, ViewFn};
use crate::matcher::RouteMatch;
use crate::path::{generate_path, PathError};
use crate::props::{merge_props, Prop, Props};
use crate::switch::{RenderFn, RouteEntry, RouteOutput, RouteSwitch};

/// Prop name under which the child-rendering callback is injected by default.
pub const DEFAULT_RENDER_CHILD_PROP: &str = "renderChild";

/// Replacement for [`render_routes`] when rendering nested routes.
pub type RenderRoutesFn<V> =
    Arc<dyn Fn(&[Arc<RouteDescriptor<V>>], RenderOptions<V>) -> Option<RouteSwitch<V>> + Send + Sync>;

/// Result of the child callback for a route without nested routes.
pub enum NoChildren<V> {
    /// Nothing to render.
    Disabled,
    /// A placeholder view, handed back untouched.
    View(ViewFn<V>),
}

impl<V> Default for NoChildren<V> {
    fn default() -> Self {
        Self::Disabled
    }
}

impl<V> Clone for NoChildren<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Disabled => Self::Disabled,
            Self::View(view) => Self::View(view.clone()),
        }
    }
}

impl<V> PartialEq for NoChildren<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Disabled, Self::Disabled) => true,
            (Self::View(a), Self::View(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl<V> fmt::Debug for NoChildren<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::View(view) => f.debug_tuple("View").field(view).finish(),
        }
    }
}

/// Options for one [`render_routes`] invocation.
pub struct RenderOptions<V> {
    /// Merged into every component's props above the route's own props and the match.
    pub extra_props: Props<V>,
    /// Handed to the [`RouteSwitch`] unchanged.
    pub switch_props: Props<V>,
    /// `None` or an empty name disables the child callback.
    pub render_child_prop: Option<String>,
    /// What the child callback returns for a route without nested routes.
    pub no_render_child: NoChildren<V>,
    /// Used instead of [`render_routes`] for nested levels; receives the
    /// nested routes and the propagated options.
    pub override_render_routes: Option<RenderRoutesFn<V>>,
}

impl<V> RenderOptions<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_props(mut self, props: Props<V>) -> Self {
        self.extra_props = props;
        self
    }

    pub fn with_switch_props(mut self, props: Props<V>) -> Self {
        self.switch_props = props;
        self
    }

    pub fn with_render_child_prop(mut self, name: impl Into<String>) -> Self {
        self.render_child_prop = Some(name.into());
        self
    }

    pub fn without_render_child(mut self) -> Self {
        self.render_child_prop = None;
        self
    }

    pub fn with_no_render_child(mut self, no_children: NoChildren<V>) -> Self {
        self.no_render_child = no_children;
        self
    }

    pub fn with_override_render_routes<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Arc<RouteDescriptor<V>>], RenderOptions<V>) -> Option<RouteSwitch<V>>
            + Send
            + Sync
            + 'static,
    {
        self.override_render_routes = Some(Arc::new(f));
        self
    }

    fn render_child_name(&self) -> Option<&str> {
        self.render_child_prop.as_deref().filter(|name| !name.is_empty())
    }
}

impl<V> Default for RenderOptions<V> {
    fn default() -> Self {
        Self {
            extra_props: Props::new(),
            switch_props: Props::new(),
            render_child_prop: Some(DEFAULT_RENDER_CHILD_PROP.to_string()),
            no_render_child: NoChildren::Disabled,
            override_render_routes: None,
        }
    }
}

impl<V> Clone for RenderOptions<V> {
    fn clone(&self) -> Self {
        Self {
            extra_props: self.extra_props.clone(),
            switch_props: self.switch_props.clone(),
            render_child_prop: self.render_child_prop.clone(),
            no_render_child: self.no_render_child.clone(),
            override_render_routes: self.override_render_routes.clone(),
        }
    }
}

impl<V> fmt::Debug for RenderOptions<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("extra_props", &self.extra_props)
            .field("switch_props", &self.switch_props)
            .field("render_child_prop", &self.render_child_prop)
            .field("no_render_child", &self.no_render_child)
            .field("override_render_routes", &self.override_render_routes.is_some())
            .finish()
    }
}

/// What calling a [`ChildRenderer`] produced.
pub enum ChildRender<V> {
    /// The nested routes, rendered with the caller's props as `extra_props`.
    Routes(Option<RouteSwitch<V>>),
    /// The route has no nested routes; carries `no_render_child` as configured.
    NoChildren(NoChildren<V>),
}

impl<V> ChildRender<V> {
    pub fn into_switch(self) -> Option<RouteSwitch<V>> {
        match self {
            Self::Routes(switch) => switch,
            Self::NoChildren(_) => None,
        }
    }
}

impl<V> fmt::Debug for ChildRender<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Routes(switch) => f.debug_tuple("Routes").field(switch).finish(),
            Self::NoChildren(no_children) => f.debug_tuple("NoChildren").field(no_children).finish(),
        }
    }
}

/// Callback injected into a matched component so it can render its own
/// nested routes on demand.
pub struct ChildRenderer<V> {
    route: Arc<RouteDescriptor<V>>,
    route_match: RouteMatch,
    options: RenderOptions<V>,
}

impl<V: 'static> ChildRenderer<V> {
    /// Renders the route's nested routes with `extra_props` replaced by
    /// `extra`; every other option carries over from the parent render.
    /// Pathless nested entries match with the parent route's match.
    pub fn render(&self, extra: Props<V>) -> ChildRender<V> {
        if !self.route.has_routes() {
            return ChildRender::NoChildren(self.options.no_render_child.clone());
        }

        let options = RenderOptions {
            extra_props: extra,
            ..self.options.clone()
        };
        let switch = match &self.options.override_render_routes {
            Some(override_render_routes) => override_render_routes(self.route.routes.as_slice(), options),
            None => render_routes(Some(self.route.routes.as_slice()), &options),
        };
        ChildRender::Routes(switch.map(|switch| switch.with_parent_match(self.route_match.clone())))
    }
}

impl<V> ChildRenderer<V> {
    pub fn route(&self) -> &Arc<RouteDescriptor<V>> {
        &self.route
    }

    /// The match of the route owning the nested routes.
    pub fn route_match(&self) -> &RouteMatch {
        &self.route_match
    }
}

impl<V> Clone for ChildRenderer<V> {
    fn clone(&self) -> Self {
        Self {
            route: Arc::clone(&self.route),
            route_match: self.route_match.clone(),
            options: self.options.clone(),
        }
    }
}

impl<V> fmt::Debug for ChildRenderer<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildRenderer")
            .field("path", &self.route.path)
            .field("url", &self.route_match.url)
            .field("routes", &self.route.routes.len())
            .finish_non_exhaustive()
    }
}

/// Renders a route table into an exclusive-match [`RouteSwitch`].
///
/// `None` renders nothing. Each descriptor becomes one entry, keyed by its
/// `key` or its position. Entries render lazily: a redirect route yields
/// [`RouteOutput::Redirect`] with its template filled from the match params,
/// any other route instantiates its component with props merged in this
/// order, later layers winning:
///
/// 1. the route's `props`
/// 2. `"match"` and `"location"`
/// 3. `options.extra_props`
/// 4. `"route"`, the descriptor itself
/// 5. the [`ChildRenderer`] under `options.render_child_prop`, if named
/// 6. the route's `forced_props`
///
/// ```
/// use leptos_route_config::prelude::*;
///
/// let routes = route_table([
///     RouteDescriptor::component("/", |_props: Props<String>| "home".to_string()).exact(),
///     RouteDescriptor::redirect("/old/:id", "/new/:id"),
/// ]);
/// let switch = render_routes(Some(routes.as_slice()), &RenderOptions::default()).unwrap();
///
/// assert_eq!(
///     switch.resolve("/old/7", &SegmentMatcher),
///     Some(Ok(RouteOutput::Redirect {
///         from: Some("/old/:id".to_string()),
///         to: "/new/7".to_string(),
///     }))
/// );
/// assert!(render_routes::<String>(None, &RenderOptions::default()).is_none());
/// ```
pub fn render_routes<V: 'static>(
    routes: Option<&[Arc<RouteDescriptor<V>>]>,
    options: &RenderOptions<V>,
) -> Option<RouteSwitch<V>> {
    let routes = routes?;
    let entries = routes
        .iter()
        .enumerate()
        .map(|(index, route)| route_entry(index, route, options))
        .collect();
    Some(RouteSwitch::new(options.switch_props.clone(), entries))
}

fn route_entry<V: 'static>(
    index: usize,
    route: &Arc<RouteDescriptor<V>>,
    options: &RenderOptions<V>,
) -> RouteEntry<V> {
    let key = route
        .key
        .clone()
        .filter(|key| !key.is_empty())
        .map_or(RouteKey::Index(index), RouteKey::Key);
    log::trace!("building route entry `{key}` for {:?}", route.path);

    let render = {
        let route = Arc::clone(route);
        let options = options.clone();
        RenderFn::new(move |route_match: &RouteMatch, location: &str| {
            render_matched(&route, &options, route_match, location)
        })
    };

    RouteEntry {
        key,
        path: route.path.clone(),
        exact: route.exact,
        strict: route.strict,
        render,
    }
}

fn render_matched<V: 'static>(
    route: &Arc<RouteDescriptor<V>>,
    options: &RenderOptions<V>,
    route_match: &RouteMatch,
    location: &str,
) -> Result<RouteOutput<V>, PathError> {
    match &route.kind {
        RouteKind::Redirect(template) => {
            let to = generate_path(template, &route_match.params)?;
            log::debug!("redirecting {:?} to `{to}`", route.path);
            Ok(RouteOutput::Redirect {
                from: route.path.clone(),
                to,
            })
        }
        RouteKind::Component(component) => {
            let props = component_props(route, options, route_match, location);
            Ok(RouteOutput::View(component.render(props)))
        }
    }
}

/// Assembles the props a matched component receives.
pub fn component_props<V: 'static>(
    route: &Arc<RouteDescriptor<V>>,
    options: &RenderOptions<V>,
    route_match: &RouteMatch,
    location: &str,
) -> Props<V> {
    let matched = Props::new()
        .with("match", Prop::Match(route_match.clone()))
        .with("location", location);
    let descriptor = Props::new().with("route", Prop::Route(Arc::clone(route)));
    let child = match options.render_child_name() {
        Some(name) => Props::new().with(
            name,
            Prop::RenderChild(ChildRenderer {
                route: Arc::clone(route),
                route_match: route_match.clone(),
                options: options.clone(),
            }),
        ),
        None => Props::new(),
    };

    merge_props([
        route.props.clone(),
        matched,
        options.extra_props.clone(),
        descriptor,
        child,
        route.forced_props.clone(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::route_table;
    use crate::matcher::{PathMatcher, SegmentMatcher};

    /// Components in these tests render to the props they received.
    type Captured = Props<()>;

    fn echo(path: &str) -> RouteDescriptor<Captured> {
        RouteDescriptor::component(path, |props: Props<Captured>| {
            props
                .iter()
                .filter_map(|(k, v)| match v {
                    Prop::Bool(b) => Some((k.clone(), Prop::Bool(*b))),
                    Prop::Int(i) => Some((k.clone(), Prop::Int(*i))),
                    Prop::Text(s) => Some((k.clone(), Prop::Text(s.clone()))),
                    Prop::Match(m) => Some((k.clone(), Prop::Match(m.clone()))),
                    Prop::RenderChild(_) => Some((k.clone(), Prop::Text("<renderChild>".into()))),
                    Prop::Route(_) => Some((k.clone(), Prop::Text("<route>".into()))),
                    _ => None,
                })
                .collect()
        })
    }

    fn view_at(routes: &[Arc<RouteDescriptor<Captured>>], options: &RenderOptions<Captured>, location: &str) -> Captured {
        render_routes(Some(routes), options)
            .unwrap()
            .resolve(location, &SegmentMatcher)
            .unwrap()
            .unwrap()
            .into_view()
            .unwrap()
    }

    #[test]
    fn absent_routes_render_nothing() {
        assert!(render_routes::<Captured>(None, &RenderOptions::default()).is_none());
    }

    #[test]
    fn one_entry_per_route_in_order() {
        let routes = route_table([echo("/a"), echo("/b").with_key("bee"), echo("/c").with_key("")]);
        let switch = render_routes(Some(routes.as_slice()), &RenderOptions::default()).unwrap();

        let keys: Vec<_> = switch.entries().iter().map(|e| e.key.clone()).collect();
        assert_eq!(
            keys,
            vec![RouteKey::Index(0), RouteKey::Key("bee".into()), RouteKey::Index(2)]
        );
        let paths: Vec<_> = switch.entries().iter().map(|e| e.path.as_deref()).collect();
        assert_eq!(paths, vec![Some("/a"), Some("/b"), Some("/c")]);
    }

    #[test]
    fn matching_flags_pass_through() {
        let routes = route_table([echo("/a").exact().strict()]);
        let switch = render_routes(Some(routes.as_slice()), &RenderOptions::default()).unwrap();
        let entry = &switch.entries()[0];
        assert!(entry.exact && entry.strict);
    }

    #[test]
    fn switch_props_pass_through() {
        let options = RenderOptions::default().with_switch_props(Props::new().with("location", "/a"));
        let routes = route_table([echo("/a")]);
        let switch = render_routes(Some(routes.as_slice()), &options).unwrap();
        assert_eq!(switch.props(), &options.switch_props);
    }

    #[test]
    fn redirect_fills_template_from_match() {
        let routes = route_table([RouteDescriptor::<Captured>::redirect("/from/:id", "/to/:id")]);
        let switch = render_routes(Some(routes.as_slice()), &RenderOptions::default()).unwrap();
        assert_eq!(
            switch.resolve("/from/7", &SegmentMatcher),
            Some(Ok(RouteOutput::Redirect {
                from: Some("/from/:id".to_string()),
                to: "/to/7".to_string(),
            }))
        );
    }

    #[test]
    fn redirect_template_errors_propagate() {
        let routes = route_table([RouteDescriptor::<Captured>::redirect("/from", "/to/:id")]);
        let switch = render_routes(Some(routes.as_slice()), &RenderOptions::default()).unwrap();
        assert_eq!(
            switch.resolve("/from", &SegmentMatcher),
            Some(Err(PathError::MissingParam {
                name: "id".to_string(),
                template: "/to/:id".to_string(),
            }))
        );
    }

    #[test]
    fn forced_props_win_over_props() {
        let routes = route_table([echo("/a").with_prop("a", 1).with_forced_prop("a", 2)]);
        let view = view_at(&routes, &RenderOptions::default(), "/a");
        assert_eq!(view.get("a"), Some(&Prop::Int(2)));
    }

    #[test]
    fn precedence_chain_is_fixed() {
        let routes = route_table([echo("/a")
            .with_prop("location", "from-props")
            .with_prop("match", "from-props")
            .with_prop("only_props", true)
            .with_prop("route", "from-props")
            .with_prop("renderChild", "from-props")
            .with_forced_prop("forced", true)]);
        let options = RenderOptions::default().with_extra_props(
            Props::new()
                .with("location", "from-extra")
                .with("route", "from-extra")
                .with("renderChild", "from-extra"),
        );
        let view = view_at(&routes, &options, "/a");

        assert_eq!(view.text("location"), Some("from-extra"));
        assert!(matches!(view.get("match"), Some(Prop::Match(_))));
        assert_eq!(view.text("route"), Some("<route>"));
        assert_eq!(view.text("renderChild"), Some("<renderChild>"));
        assert_eq!(view.get("only_props"), Some(&Prop::Bool(true)));
        assert_eq!(view.get("forced"), Some(&Prop::Bool(true)));
    }

    #[test]
    fn forced_props_override_injected_keys() {
        let routes = route_table([echo("/a")
            .with_forced_prop("route", "forced")
            .with_forced_prop("renderChild", "forced")]);
        let view = view_at(&routes, &RenderOptions::default(), "/a");
        assert_eq!(view.text("route"), Some("forced"));
        assert_eq!(view.text("renderChild"), Some("forced"));
    }

    #[test]
    fn match_props_carry_params() {
        let routes = route_table([echo("/users/:id")]);
        let view = view_at(&routes, &RenderOptions::default(), "/users/42");
        let route_match = view.route_match().unwrap();
        assert_eq!(route_match.params.get("id"), Some("42"));
        assert_eq!(view.text("location"), Some("/users/42"));
    }

    #[test]
    fn empty_or_disabled_child_prop_injects_nothing() {
        let routes = route_table([echo("/a")]);

        let view = view_at(&routes, &RenderOptions::default().with_render_child_prop(""), "/a");
        assert!(!view.contains_key("renderChild"));
        assert!(!view.contains_key(""));

        let view = view_at(&routes, &RenderOptions::default().without_render_child(), "/a");
        assert!(!view.contains_key("renderChild"));
    }

    #[test]
    fn child_prop_name_is_configurable() {
        let routes = route_table([echo("/a")]);
        let view = view_at(&routes, &RenderOptions::default().with_render_child_prop("outlet"), "/a");
        assert_eq!(view.text("outlet"), Some("<renderChild>"));
        assert!(!view.contains_key("renderChild"));
    }

    fn child_renderer_for(route: RouteDescriptor<Captured>, options: &RenderOptions<Captured>) -> ChildRenderer<Captured> {
        let route = Arc::new(route);
        let props = component_props(&route, options, &RouteMatch::root("/"), "/");
        props.render_child(DEFAULT_RENDER_CHILD_PROP).unwrap().clone()
    }

    #[test]
    fn child_renderer_equals_direct_render_with_extra_props() {
        let parent = echo("/parent").with_route(echo("/parent/child").with_key("child"));
        let options = RenderOptions::default().with_switch_props(Props::new().with("tag", "sw"));
        let renderer = child_renderer_for(parent.clone(), &options);

        let extra = Props::new().with("depth", 1);
        let via_callback = renderer.render(extra.clone()).into_switch().unwrap();
        let direct = render_routes(Some(parent.routes.as_slice()), &options.clone().with_extra_props(extra)).unwrap();

        assert_eq!(via_callback.props(), direct.props());
        assert_eq!(via_callback.len(), direct.len());
        assert_eq!(via_callback.entries()[0].key, direct.entries()[0].key);
        assert_eq!(
            via_callback.resolve("/parent/child", &SegmentMatcher),
            direct.resolve("/parent/child", &SegmentMatcher)
        );
        let view = via_callback
            .resolve("/parent/child", &SegmentMatcher)
            .unwrap()
            .unwrap()
            .into_view()
            .unwrap();
        assert_eq!(view.get("depth"), Some(&Prop::Int(1)));
    }

    #[test]
    fn pathless_nested_routes_see_the_parent_params() {
        let parent = Arc::new(
            echo("/users/:id")
                .with_route(RouteDescriptor::new(RouteKind::Redirect("/users/:id/profile".to_string()))),
        );
        let parent_match = SegmentMatcher.match_path("/users/7", "/users/:id", false, false).unwrap();
        let renderer = component_props(&parent, &RenderOptions::default(), &parent_match, "/users/7")
            .render_child(DEFAULT_RENDER_CHILD_PROP)
            .unwrap()
            .clone();
        assert_eq!(renderer.route_match(), &parent_match);

        let switch = renderer.render(Props::new()).into_switch().unwrap();
        assert_eq!(
            switch.resolve("/users/7", &SegmentMatcher),
            Some(Ok(RouteOutput::Redirect {
                from: None,
                to: "/users/7/profile".to_string(),
            }))
        );
    }

    #[test]
    fn pathless_nested_component_receives_the_parent_match() {
        let pathless = RouteDescriptor {
            path: None,
            ..echo("/")
        };
        let parent = Arc::new(echo("/teams/:team").with_route(pathless));
        let parent_match = SegmentMatcher.match_path("/teams/red/x", "/teams/:team", false, false).unwrap();
        let renderer = component_props(&parent, &RenderOptions::default(), &parent_match, "/teams/red/x")
            .render_child(DEFAULT_RENDER_CHILD_PROP)
            .unwrap()
            .clone();

        let view = renderer
            .render(Props::new())
            .into_switch()
            .unwrap()
            .resolve("/teams/red/x", &SegmentMatcher)
            .unwrap()
            .unwrap()
            .into_view()
            .unwrap();
        assert_eq!(view.route_match(), Some(&parent_match));
    }

    #[test]
    fn childless_route_yields_no_render_child_value() {
        let renderer = child_renderer_for(echo("/leaf"), &RenderOptions::default());
        assert!(matches!(
            renderer.render(Props::new()),
            ChildRender::NoChildren(NoChildren::Disabled)
        ));

        let placeholder = ViewFn::new(Props::<()>::new);
        let options = RenderOptions::default().with_no_render_child(NoChildren::View(placeholder.clone()));
        let renderer = child_renderer_for(echo("/leaf"), &options);
        match renderer.render(Props::new()) {
            ChildRender::NoChildren(no_children) => {
                assert_eq!(no_children, NoChildren::View(placeholder))
            }
            other => panic!("expected NoChildren, got {other:?}"),
        }
    }

    #[test]
    fn override_renderer_receives_propagated_options() {
        use std::sync::Mutex;

        let seen: Arc<Mutex<Vec<(usize, Option<String>)>>> = Arc::default();
        let recorder = Arc::clone(&seen);
        let options = RenderOptions::default()
            .with_render_child_prop("children")
            .with_override_render_routes(move |routes: &[Arc<RouteDescriptor<Captured>>], options: RenderOptions<Captured>| {
                if let Ok(mut seen) = recorder.lock() {
                    seen.push((routes.len(), options.render_child_prop.clone()));
                }
                assert!(options.override_render_routes.is_some());
                assert_eq!(options.extra_props.text("from"), Some("parent"));
                None
            });

        let parent = echo("/p").with_routes([echo("/p/a"), echo("/p/b")]);
        let renderer = {
            let route = Arc::new(parent);
            component_props(&route, &options, &RouteMatch::root("/"), "/")
                .render_child("children")
                .unwrap()
                .clone()
        };

        assert!(matches!(
            renderer.render(Props::new().with("from", "parent")),
            ChildRender::Routes(None)
        ));
        assert_eq!(
            seen.lock().map(|s| s.clone()).unwrap_or_default(),
            vec![(2, Some("children".to_string()))]
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let routes = route_table([
            echo("/").exact(),
            echo("/users/:id").with_prop("kind", "user"),
            RouteDescriptor::redirect("/old/:id", "/users/:id"),
        ]);
        let options = RenderOptions::default();
        let first = render_routes(Some(routes.as_slice()), &options).unwrap();
        let second = render_routes(Some(routes.as_slice()), &options).unwrap();

        let shape = |s: &RouteSwitch<Captured>| {
            s.entries()
                .iter()
                .map(|e| (e.key.clone(), e.path.clone(), e.exact, e.strict))
                .collect::<Vec<_>>()
        };
        assert_eq!(shape(&first), shape(&second));
        for location in ["/", "/users/3", "/old/9", "/none"] {
            assert_eq!(
                first.resolve(location, &SegmentMatcher),
                second.resolve(location, &SegmentMatcher)
            );
        }
    }
}
