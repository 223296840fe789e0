use std::fmt;
use std::sync::Arc;

use crate::descriptor::RouteKey;
use crate::matcher::{PathMatcher, RouteMatch};
use crate::path::PathError;
use crate::props::Props;

/// What a matched entry renders to.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutput<V> {
    Redirect { from: Option<String>, to: String },
    View(V),
}

impl<V> RouteOutput<V> {
    pub fn into_view(self) -> Option<V> {
        match self {
            Self::View(view) => Some(view),
            Self::Redirect { .. } => None,
        }
    }
}

type RenderCallback<V> = dyn Fn(&RouteMatch, &str) -> Result<RouteOutput<V>, PathError> + Send + Sync;

/// Deferred render callback of an entry; runs only once the entry matched.
pub struct RenderFn<V>(Arc<RenderCallback<V>>);

impl<V> RenderFn<V> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&RouteMatch, &str) -> Result<RouteOutput<V>, PathError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }
}

impl<V> Clone for RenderFn<V> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

/// A matchable entry of a [`RouteSwitch`].
pub struct RouteEntry<V> {
    pub key: RouteKey,
    pub path: Option<String>,
    pub exact: bool,
    pub strict: bool,
    pub(crate) render: RenderFn<V>,
}

impl<V> RouteEntry<V> {
    /// Matches `location` against the entry's path. A pathless entry always
    /// matches and inherits `enclosing`, or the root match at the top level.
    pub fn match_location<M>(
        &self,
        location: &str,
        matcher: &M,
        enclosing: Option<&RouteMatch>,
    ) -> Option<RouteMatch>
    where
        M: PathMatcher + ?Sized,
    {
        match &self.path {
            Some(pattern) => matcher.match_path(location, pattern, self.exact, self.strict),
            None => Some(enclosing.cloned().unwrap_or_else(|| RouteMatch::root(location))),
        }
    }

    /// Runs the entry's render callback for `route_match`.
    pub fn render(&self, route_match: &RouteMatch, location: &str) -> Result<RouteOutput<V>, PathError> {
        (self.render.0)(route_match, location)
    }
}

impl<V> Clone for RouteEntry<V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            path: self.path.clone(),
            exact: self.exact,
            strict: self.strict,
            render: self.render.clone(),
        }
    }
}

impl<V> fmt::Debug for RouteEntry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("key", &self.key)
            .field("path", &self.path)
            .field("exact", &self.exact)
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}

/// Exclusive-match container: entries are tried in order and only the first
/// match renders.
pub struct RouteSwitch<V> {
    props: Props<V>,
    entries: Vec<RouteEntry<V>>,
    parent_match: Option<RouteMatch>,
}

impl<V> RouteSwitch<V> {
    pub fn new(props: Props<V>, entries: Vec<RouteEntry<V>>) -> Self {
        Self {
            props,
            entries,
            parent_match: None,
        }
    }

    /// Sets the match of the route owning these entries; pathless entries
    /// inherit it.
    pub fn with_parent_match(mut self, parent_match: RouteMatch) -> Self {
        self.parent_match = Some(parent_match);
        self
    }

    pub fn parent_match(&self) -> Option<&RouteMatch> {
        self.parent_match.as_ref()
    }

    pub fn props(&self) -> &Props<V> {
        &self.props
    }

    pub fn entries(&self) -> &[RouteEntry<V>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The location to match: a `"location"` text prop overrides `current`.
    pub fn location<'a>(&'a self, current: &'a str) -> &'a str {
        self.props.text("location").unwrap_or(current)
    }

    /// Position and match of the first entry matching `location`.
    pub fn matched_index<M>(&self, location: &str, matcher: &M) -> Option<(usize, RouteMatch)>
    where
        M: PathMatcher + ?Sized,
    {
        let location = self.location(location);
        self.entries.iter().enumerate().find_map(|(index, entry)| {
            entry
                .match_location(location, matcher, self.parent_match.as_ref())
                .map(|route_match| (index, route_match))
        })
    }

    /// Finds the first entry matching `location`.
    pub fn matched<M>(&self, location: &str, matcher: &M) -> Option<(&RouteEntry<V>, RouteMatch)>
    where
        M: PathMatcher + ?Sized,
    {
        let (index, route_match) = self.matched_index(location, matcher)?;
        self.entries.get(index).map(|entry| (entry, route_match))
    }

    /// Renders the first entry matching `location`, or `None` when nothing matches.
    pub fn resolve<M>(&self, location: &str, matcher: &M) -> Option<Result<RouteOutput<V>, PathError>>
    where
        M: PathMatcher + ?Sized,
    {
        let (entry, route_match) = self.matched(location, matcher)?;
        log::trace!("switch selected entry `{}` for `{}`", entry.key, route_match.url);
        Some(entry.render(&route_match, self.location(location)))
    }
}

impl<V> Clone for RouteSwitch<V> {
    fn clone(&self) -> Self {
        Self {
            props: self.props.clone(),
            entries: self.entries.clone(),
            parent_match: self.parent_match.clone(),
        }
    }
}

impl<V> fmt::Debug for RouteSwitch<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSwitch")
            .field("props", &self.props)
            .field("entries", &self.entries)
            .field("parent_match", &self.parent_match)
            .finish()
    }
}
