use std::borrow::Cow;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::params::Params;

/// Bytes a generated path escapes in a param value: everything `encodeURI`
/// escapes, plus `/`, `?` and `#`.
const PARAM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b',')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$');

/// Wildcard values span several segments, so `/` stays.
const WILDCARD: &AsciiSet = &PARAM.remove(b'/');

/// Errors raised while substituting parameters into a path template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("expected param `{name}` to be defined for `{template}`")]
    MissingParam { name: String, template: String },
    #[error("invalid path template: {0}")]
    InvalidTemplate(String),
}

/// One `/`-separated piece of a path pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Static(&'a str),
    /// `:name`
    Param(&'a str),
    /// `:name?`
    OptionalParam(&'a str),
    /// `*name`; a bare `*` is named `"0"`.
    Wildcard(&'a str),
}

pub fn parse_segments(pattern: &str) -> Vec<Segment<'_>> {
    pattern
        .trim_start_matches('/')
        .split('/')
        .filter(|part| !part.is_empty())
        .map(|part| {
            if let Some(name) = part.strip_prefix(':') {
                match name.strip_suffix('?') {
                    Some(optional) => Segment::OptionalParam(optional),
                    None => Segment::Param(name),
                }
            } else if let Some(name) = part.strip_prefix('*') {
                Segment::Wildcard(if name.is_empty() { "0" } else { name })
            } else {
                Segment::Static(part)
            }
        })
        .collect()
}

pub(crate) fn has_trailing_slash(pattern: &str) -> bool {
    pattern.len() > 1 && pattern.ends_with('/')
}

/// Builds a concrete path by substituting `params` into `template`.
///
/// Absent optional params drop their segment. A required param that is
/// absent fails with [`PathError::MissingParam`].
///
/// ```
/// use leptos_route_config::prelude::*;
///
/// let params: Params = [("id", "7")].into_iter().collect();
/// assert_eq!(generate_path("/to/:id", &params).unwrap(), "/to/7");
/// ```
pub fn generate_path(template: &str, params: &Params) -> Result<String, PathError> {
    let mut path = String::new();

    for segment in parse_segments(template) {
        let piece = match segment {
            Segment::Static(text) => Cow::Borrowed(text),
            Segment::Param(name) => {
                if name.is_empty() {
                    return Err(PathError::InvalidTemplate(template.to_string()));
                }
                match params.get(name) {
                    Some(value) if !value.is_empty() => encode_param(value, PARAM),
                    _ => {
                        return Err(PathError::MissingParam {
                            name: name.to_string(),
                            template: template.to_string(),
                        })
                    }
                }
            }
            Segment::OptionalParam(name) => {
                if name.is_empty() {
                    return Err(PathError::InvalidTemplate(template.to_string()));
                }
                match params.get(name) {
                    Some(value) if !value.is_empty() => encode_param(value, PARAM),
                    _ => continue,
                }
            }
            Segment::Wildcard(name) => match params.get(name) {
                Some(value) => encode_param(value.trim_matches('/'), WILDCARD),
                None => {
                    return Err(PathError::MissingParam {
                        name: name.to_string(),
                        template: template.to_string(),
                    })
                }
            },
        };

        if piece.is_empty() {
            continue;
        }
        path.push('/');
        path.push_str(&piece);
    }

    if path.is_empty() {
        path.push('/');
    } else if has_trailing_slash(template) {
        path.push('/');
    }
    Ok(path)
}

fn encode_param<'a>(value: &'a str, set: &'static AsciiSet) -> Cow<'a, str> {
    utf8_percent_encode(value, set).into()
}
