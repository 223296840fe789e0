use std::fmt;
use std::sync::Arc;

use crate::props::{Prop, Props};

/// A view factory taking the merged props of a matched route.
pub struct Component<V>(Arc<dyn Fn(Props<V>) -> V + Send + Sync>);

impl<V> Component<V> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Props<V>) -> V + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn render(&self, props: Props<V>) -> V {
        (self.0)(props)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<V, F> From<F> for Component<V>
where
    F: Fn(Props<V>) -> V + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

impl<V> Clone for Component<V> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<V> fmt::Debug for Component<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Component(..)")
    }
}

/// A shared, argument-less view factory.
pub struct ViewFn<V>(Arc<dyn Fn() -> V + Send + Sync>);

impl<V> ViewFn<V> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn run(&self) -> V {
        (self.0)()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<V> Clone for ViewFn<V> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<V> fmt::Debug for ViewFn<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ViewFn(..)")
    }
}

/// What a route does once matched.
pub enum RouteKind<V> {
    /// Redirect to a path template filled from the match params.
    Redirect(String),
    Component(Component<V>),
}

impl<V> Clone for RouteKind<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Redirect(to) => Self::Redirect(to.clone()),
            Self::Component(component) => Self::Component(component.clone()),
        }
    }
}

impl<V> fmt::Debug for RouteKind<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redirect(to) => f.debug_tuple("Redirect").field(to).finish(),
            Self::Component(component) => f.debug_tuple("Component").field(component).finish(),
        }
    }
}

/// Identity of a rendered entry: an explicit key or the route's position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteKey {
    Key(String),
    Index(usize),
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// One node of a declarative route table.
///
/// ```
/// use leptos_route_config::prelude::*;
///
/// let users: RouteDescriptor<String> = RouteDescriptor::component("/users", |_props: Props<String>| {
///     "users".to_string()
/// })
/// .with_route(RouteDescriptor::redirect("/users/old/:id", "/users/:id").exact())
/// .with_prop("title", "Users");
///
/// assert!(users.has_routes());
/// assert!(!users.is_redirect());
/// ```
pub struct RouteDescriptor<V> {
    /// `None` matches whatever location reaches the enclosing switch.
    pub path: Option<String>,
    pub exact: bool,
    pub strict: bool,
    pub kind: RouteKind<V>,
    /// Lowest-precedence props.
    pub props: Props<V>,
    /// Highest-precedence props; nothing overrides them.
    pub forced_props: Props<V>,
    pub routes: Vec<Arc<RouteDescriptor<V>>>,
    pub key: Option<String>,
}

impl<V> RouteDescriptor<V> {
    pub fn new(kind: RouteKind<V>) -> Self {
        Self {
            path: None,
            exact: false,
            strict: false,
            kind,
            props: Props::new(),
            forced_props: Props::new(),
            routes: Vec::new(),
            key: None,
        }
    }

    pub fn component(path: impl Into<String>, component: impl Into<Component<V>>) -> Self {
        Self::new(RouteKind::Component(component.into())).with_path(path)
    }

    pub fn redirect(path: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(RouteKind::Redirect(to.into())).with_path(path)
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn exact(mut self) -> Self {
        self.exact = true;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_props(mut self, props: Props<V>) -> Self {
        self.props = props;
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Prop<V>>) -> Self {
        self.props.insert(key, value);
        self
    }

    pub fn with_forced_props(mut self, props: Props<V>) -> Self {
        self.forced_props = props;
        self
    }

    pub fn with_forced_prop(mut self, key: impl Into<String>, value: impl Into<Prop<V>>) -> Self {
        self.forced_props.insert(key, value);
        self
    }

    pub fn with_route(mut self, route: RouteDescriptor<V>) -> Self {
        self.routes.push(Arc::new(route));
        self
    }

    pub fn with_routes<I>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = RouteDescriptor<V>>,
    {
        self.routes.extend(routes.into_iter().map(Arc::new));
        self
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self.kind, RouteKind::Redirect(_))
    }

    pub fn redirect_template(&self) -> Option<&str> {
        match &self.kind {
            RouteKind::Redirect(to) => Some(to),
            RouteKind::Component(_) => None,
        }
    }

    pub fn has_routes(&self) -> bool {
        !self.routes.is_empty()
    }
}

impl<V> Clone for RouteDescriptor<V> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            exact: self.exact,
            strict: self.strict,
            kind: self.kind.clone(),
            props: self.props.clone(),
            forced_props: self.forced_props.clone(),
            routes: self.routes.clone(),
            key: self.key.clone(),
        }
    }
}

impl<V> fmt::Debug for RouteDescriptor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("path", &self.path)
            .field("exact", &self.exact)
            .field("strict", &self.strict)
            .field("kind", &self.kind)
            .field("props", &self.props)
            .field("forced_props", &self.forced_props)
            .field("routes", &self.routes)
            .field("key", &self.key)
            .finish()
    }
}

/// Wraps top-level descriptors for [`render_routes`](crate::render::render_routes).
pub fn route_table<V, I>(routes: I) -> Vec<Arc<RouteDescriptor<V>>>
where
    I: IntoIterator<Item = RouteDescriptor<V>>,
{
    routes.into_iter().map(Arc::new).collect()
}
