//! Structured history token.

use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::token::codec;

/// One URL-history state: a route id plus ordered parameters.
///
/// A parameter without an explicit value is stored as the empty string,
/// which is distinct from an absent parameter.
#[derive(Debug, Clone, Default)]
pub struct Token {
    id: String,
    parameters: Vec<(String, String)>,
}

impl Token {
    /// Create a token with the given id and no parameters.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parameters: Vec::new(),
        }
    }

    /// Parse a raw history string.
    pub fn parse(raw: &str) -> Self {
        codec::parse(raw)
    }

    /// The route identifier (empty when unset).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Look up a parameter value. `None` means absent, `Some("")` means present without value.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set a parameter, returning the previous value if there was one.
    ///
    /// Overwriting an existing key keeps its position in the serialized form.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.parameters.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.parameters.push((name, value));
                None
            }
        }
    }

    /// Builder-style variant of [`Token::set_parameter`].
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_parameter(name, value);
        self
    }

    /// Remove a parameter, returning its value.
    pub fn remove_parameter(&mut self, name: &str) -> Option<String> {
        let index = self.parameters.iter().position(|(key, _)| key == name)?;
        Some(self.parameters.remove(index).1)
    }

    /// Iterate parameters in insertion order.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Parse a parameter into any `FromStr` type.
    pub fn parameter_as<T: FromStr>(&self, name: &str) -> Option<T> {
        self.parameter(name).and_then(|value| value.trim().parse().ok())
    }

    pub fn parameter_as_int(&self, name: &str, default: i64) -> i64 {
        self.parameter_as(name).unwrap_or(default)
    }

    pub fn parameter_as_f64(&self, name: &str, default: f64) -> f64 {
        self.parameter_as(name).unwrap_or(default)
    }

    /// `true` only when the value is `true` (case-insensitive).
    pub fn parameter_as_bool(&self, name: &str) -> bool {
        self.parameter(name)
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::serialize(self))
    }
}

impl FromStr for Token {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(codec::parse(s))
    }
}

impl From<&str> for Token {
    fn from(raw: &str) -> Self {
        codec::parse(raw)
    }
}

// Route matching and cache keys compare canonical strings, not fields.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        codec::serialize(self) == codec::serialize(other)
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        codec::serialize(self).hash(state);
    }
}

struct OrderedParameters<'a>(&'a [(String, String)]);

impl Serialize for OrderedParameters<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Token", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("canonical", &codec::serialize(self))?;
        state.serialize_field("parameters", &OrderedParameters(&self.parameters))?;
        state.end()
    }
}
