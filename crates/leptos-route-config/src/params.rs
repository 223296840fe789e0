use std::collections::BTreeMap;
use std::str::FromStr;

/// Holds the parsed state of a matched path parameter.
/// It may be missing, unparseable, or a valid value of type [`T`].
#[derive(Debug, PartialEq, Clone, Eq)]
pub enum ParamValue<T>
where
    T: FromStr + Clone + PartialEq + Eq,
{
    /// The parameter was not captured or is an empty string.
    Missing,
    /// A value was present but failed to parse as [`T`]. The inner string is the raw value.
    ParseError(String),
    /// A successfully parsed [`T`].
    Value(T),
}

impl<T> ParamValue<T>
where
    T: FromStr + Clone + PartialEq + Eq,
{
    /// Returns `Some(T)` if this is a valid parsed value, or [`None`] otherwise.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Missing | Self::ParseError(_) => None,
        }
    }

    /// Returns the parsed value if valid, falling back to [`default`] otherwise.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Value(v) => v,
            Self::Missing | Self::ParseError(_) => default,
        }
    }
}

/// Reports a parameter that was required but missing, or that failed to parse.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("missing param: {0}")]
    Missing(String),
    #[error("failed to parse param: {0}")]
    ParseError(String),
}

/// Path parameters captured by a match, keyed by parameter name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses the named parameter as [`T`] without failing.
    pub fn value<T>(&self, name: &str) -> ParamValue<T>
    where
        T: FromStr + Clone + PartialEq + Eq,
    {
        match self.get(name) {
            None | Some("") => ParamValue::Missing,
            Some(raw) => match raw.parse::<T>() {
                Ok(parsed) => ParamValue::Value(parsed),
                Err(_) => ParamValue::ParseError(raw.to_string()),
            },
        }
    }

    /// Parses the named parameter as [`T`], treating absence as an error.
    pub fn require<T>(&self, name: &str) -> Result<T, ParamError>
    where
        T: FromStr + Clone + PartialEq + Eq,
    {
        match self.value::<T>(name) {
            ParamValue::Value(v) => Ok(v),
            ParamValue::Missing => Err(ParamError::Missing(name.to_string())),
            ParamValue::ParseError(raw) => Err(ParamError::ParseError(raw)),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
