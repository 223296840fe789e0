use std::any::Any;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::descriptor::{RouteDescriptor, ViewFn};
use crate::matcher::RouteMatch;
use crate::render::ChildRenderer;

/// A single property value handed to a route component.
pub enum Prop<V> {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Prop<V>>),
    /// The match that selected the route.
    Match(RouteMatch),
    /// The descriptor of the rendered route.
    Route(Arc<RouteDescriptor<V>>),
    /// Callback rendering the route's nested routes.
    RenderChild(ChildRenderer<V>),
    View(ViewFn<V>),
    /// Anything else, shared by reference.
    Any(Arc<dyn Any + Send + Sync>),
}

impl<V> Prop<V> {
    pub fn any<T: Any + Send + Sync>(value: T) -> Self {
        Self::Any(Arc::new(value))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_match(&self) -> Option<&RouteMatch> {
        match self {
            Self::Match(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_route(&self) -> Option<&Arc<RouteDescriptor<V>>> {
        match self {
            Self::Route(route) => Some(route),
            _ => None,
        }
    }

    pub fn as_render_child(&self) -> Option<&ChildRenderer<V>> {
        match self {
            Self::RenderChild(renderer) => Some(renderer),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Any(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl<V> Clone for Prop<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Bool(b) => Self::Bool(*b),
            Self::Int(i) => Self::Int(*i),
            Self::Float(f) => Self::Float(*f),
            Self::Text(s) => Self::Text(s.clone()),
            Self::List(items) => Self::List(items.clone()),
            Self::Match(m) => Self::Match(m.clone()),
            Self::Route(route) => Self::Route(Arc::clone(route)),
            Self::RenderChild(renderer) => Self::RenderChild(renderer.clone()),
            Self::View(view) => Self::View(view.clone()),
            Self::Any(value) => Self::Any(Arc::clone(value)),
        }
    }
}

/// Values compare structurally; shared values (routes, callbacks, views,
/// `Any`) compare by identity.
impl<V> PartialEq for Prop<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Match(a), Self::Match(b)) => a == b,
            (Self::Route(a), Self::Route(b)) => Arc::ptr_eq(a, b),
            (Self::RenderChild(a), Self::RenderChild(b)) => Arc::ptr_eq(a.route(), b.route()),
            (Self::View(a), Self::View(b)) => a.ptr_eq(b),
            (Self::Any(a), Self::Any(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<V> fmt::Debug for Prop<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Match(m) => f.debug_tuple("Match").field(m).finish(),
            Self::Route(route) => f.debug_tuple("Route").field(&route.path).finish(),
            Self::RenderChild(renderer) => f.debug_tuple("RenderChild").field(renderer).finish(),
            Self::View(_) => f.write_str("View(..)"),
            Self::Any(_) => f.write_str("Any(..)"),
        }
    }
}

impl<V> From<bool> for Prop<V> {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<V> From<i32> for Prop<V> {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl<V> From<i64> for Prop<V> {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl<V> From<f64> for Prop<V> {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<V> From<&str> for Prop<V> {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl<V> From<String> for Prop<V> {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<V> From<RouteMatch> for Prop<V> {
    fn from(value: RouteMatch) -> Self {
        Self::Match(value)
    }
}

/// Named properties for a route component. Keys are unique; inserting an
/// existing key replaces its value.
pub struct Props<V>(BTreeMap<String, Prop<V>>);

impl<V> Props<V> {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder form of [`Props::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Prop<V>>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Prop<V>>) -> Option<Prop<V>> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Prop<V>> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Prop<V>> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Prop<V>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copies every entry of `other` over `self`; `other` wins on collisions.
    pub fn merge(&mut self, other: Props<V>) {
        self.0.extend(other.0);
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Prop::as_text)
    }

    /// The descriptor injected under `"route"`.
    pub fn route(&self) -> Option<&Arc<RouteDescriptor<V>>> {
        self.get("route").and_then(Prop::as_route)
    }

    /// The match injected under `"match"`.
    pub fn route_match(&self) -> Option<&RouteMatch> {
        self.get("match").and_then(Prop::as_match)
    }

    pub fn render_child(&self, key: &str) -> Option<&ChildRenderer<V>> {
        self.get(key).and_then(Prop::as_render_child)
    }
}

/// Merges `layers` left to right; a later layer overrides earlier ones on
/// identical keys.
pub fn merge_props<V, I>(layers: I) -> Props<V>
where
    I: IntoIterator<Item = Props<V>>,
{
    layers.into_iter().fold(Props::new(), |mut merged, layer| {
        merged.merge(layer);
        merged
    })
}

impl<V> Default for Props<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for Props<V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<V> PartialEq for Props<V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<V> fmt::Debug for Props<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl<V, K, P> FromIterator<(K, P)> for Props<V>
where
    K: Into<String>,
    P: Into<Prop<V>>,
{
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'a, V> IntoIterator for &'a Props<V> {
    type Item = (&'a String, &'a Prop<V>);
    type IntoIter = btree_map::Iter<'a, String, Prop<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
