use crate::params::Params;
use crate::path::{has_trailing_slash, parse_segments, Segment};

/// The result of matching a location against a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Pattern that produced this match, `None` for the root match.
    pub path: Option<String>,
    /// Portion of the location consumed by the pattern.
    pub url: String,
    pub is_exact: bool,
    pub params: Params,
}

impl RouteMatch {
    /// The match handed to entries without a path.
    pub fn root(location: &str) -> Self {
        Self {
            path: None,
            url: "/".to_string(),
            is_exact: location.is_empty() || location == "/",
            params: Params::new(),
        }
    }
}

/// Tests a location against a single route pattern.
pub trait PathMatcher {
    fn match_path(
        &self,
        location: &str,
        pattern: &str,
        exact: bool,
        strict: bool,
    ) -> Option<RouteMatch>;
}

impl<F> PathMatcher for F
where
    F: Fn(&str, &str, bool, bool) -> Option<RouteMatch>,
{
    fn match_path(
        &self,
        location: &str,
        pattern: &str,
        exact: bool,
        strict: bool,
    ) -> Option<RouteMatch> {
        (self)(location, pattern, exact, strict)
    }
}

/// Segment-by-segment matcher for `:param`, `:param?` and `*rest` patterns.
///
/// Without `exact` a pattern matches any location it is a segment prefix of.
/// With `strict` a trailing slash on the pattern must also be present on the
/// location, and an exact pattern without one rejects a trailing slash.
/// Static segments compare ASCII case-insensitively.
#[derive(Debug, Default, Clone, Copy)]
pub struct SegmentMatcher;

impl PathMatcher for SegmentMatcher {
    fn match_path(
        &self,
        location: &str,
        pattern: &str,
        exact: bool,
        strict: bool,
    ) -> Option<RouteMatch> {
        let segments = parse_segments(pattern);
        let spans = part_spans(location);
        let parts: Vec<&str> = spans.iter().map(|&(_, part)| part).collect();

        let mut params = Params::new();
        let consumed = match_segments(&segments, &parts, &mut params)?;
        let fully_consumed = consumed == parts.len();

        if exact && !fully_consumed {
            return None;
        }

        if strict {
            let location_slash = has_trailing_slash(location);
            if has_trailing_slash(pattern) {
                if fully_consumed && !location_slash {
                    return None;
                }
            } else if exact && location_slash {
                return None;
            }
        }

        let url = match consumed.checked_sub(1).and_then(|last| spans.get(last)) {
            Some(&(start, part)) => location[..start + part.len()].to_string(),
            None => "/".to_string(),
        };

        log::trace!("`{pattern}` matched `{location}` as `{url}`");
        Some(RouteMatch {
            path: Some(pattern.to_string()),
            url,
            is_exact: fully_consumed,
            params,
        })
    }
}

/// Non-empty `/`-separated parts of `location` with their byte offsets.
fn part_spans(location: &str) -> Vec<(usize, &str)> {
    let mut offset = 0;
    let mut spans = Vec::new();
    for part in location.split('/') {
        if !part.is_empty() {
            spans.push((offset, part));
        }
        offset += part.len() + 1;
    }
    spans
}

/// Returns how many location parts the pattern consumed.
fn match_segments(segments: &[Segment<'_>], parts: &[&str], params: &mut Params) -> Option<usize> {
    let mut consumed = 0;

    for (idx, segment) in segments.iter().enumerate() {
        match *segment {
            Segment::Static(text) => {
                let part = parts.get(consumed)?;
                if !part.eq_ignore_ascii_case(text) {
                    return None;
                }
                consumed += 1;
            }
            Segment::Param(name) => {
                let part = parts.get(consumed)?;
                params.insert(name, *part);
                consumed += 1;
            }
            Segment::OptionalParam(name) => {
                if let Some(part) = parts.get(consumed) {
                    let belongs_to_next = matches!(
                        segments.get(idx + 1),
                        Some(Segment::Static(next)) if next.eq_ignore_ascii_case(part)
                    );
                    if !belongs_to_next {
                        params.insert(name, *part);
                        consumed += 1;
                    }
                }
            }
            Segment::Wildcard(name) => {
                params.insert(name, parts[consumed..].join("/"));
                consumed = parts.len();
            }
        }
    }

    Some(consumed)
}
