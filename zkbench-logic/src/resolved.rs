//! Resolved Configuration
//!
//! One concrete point of a configuration space: every axis bound to a single
//! value. Nested spaces resolve to nested configurations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value bound to one axis of a resolved configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    /// Leaf value
    Scalar(String),
    /// Nested configuration
    Nested(ResolvedConfiguration),
}

impl AxisValue {
    /// Scalar value, if this is a leaf
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AxisValue::Scalar(s) => Some(s),
            AxisValue::Nested(_) => None,
        }
    }
}

/// Mapping from axis name to exactly one value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedConfiguration {
    values: BTreeMap<String, AxisValue>,
}

impl ResolvedConfiguration {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a flat configuration from `(axis, value)` pairs.
    ///
    /// Axis names containing `.` are placed in nested configurations.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::new();
        for (key, value) in pairs {
            config.set(key.as_ref(), value);
        }
        config
    }

    /// Bind `value` at a dotted path (`proving.scheme`), creating nested levels as needed
    pub fn set(&mut self, path: &str, value: impl Into<String>) {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        self.insert_at(&segments, value.into());
    }

    pub(crate) fn insert_at(&mut self, path: &[String], value: String) {
        match path {
            [] => {}
            [last] => {
                self.values.insert(last.clone(), AxisValue::Scalar(value));
            }
            [head, rest @ ..] => {
                let entry = self
                    .values
                    .entry(head.clone())
                    .or_insert_with(|| AxisValue::Nested(ResolvedConfiguration::new()));
                if let AxisValue::Scalar(_) = entry {
                    *entry = AxisValue::Nested(ResolvedConfiguration::new());
                }
                if let AxisValue::Nested(inner) = entry {
                    inner.insert_at(rest, value);
                }
            }
        }
    }

    /// Look up a value by dotted path
    pub fn get(&self, path: &str) -> Option<&AxisValue> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.values.get(first)?;
        for segment in segments {
            match current {
                AxisValue::Nested(inner) => current = inner.values.get(segment)?,
                AxisValue::Scalar(_) => return None,
            }
        }
        Some(current)
    }

    /// Look up a scalar by dotted path
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(AxisValue::as_str)
    }

    /// Restrict the configuration to the given top-level axes.
    ///
    /// Axes that are not bound are silently left out.
    pub fn project(&self, axes: &[&str]) -> ResolvedConfiguration {
        let values = self
            .values
            .iter()
            .filter(|(name, _)| axes.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        ResolvedConfiguration { values }
    }

    /// Whether no axis is bound
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of top-level axes
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate top-level axes in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AxisValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten into `(dotted path, value)` pairs in axis order
    pub fn flatten(&self) -> Vec<(String, &str)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a str)>) {
        for (name, value) in &self.values {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", prefix, name)
            };
            match value {
                AxisValue::Scalar(s) => out.push((path, s.as_str())),
                AxisValue::Nested(inner) => inner.flatten_into(&path, out),
            }
        }
    }
}

impl fmt::Display for ResolvedConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{}");
        }
        let parts: Vec<String> = self
            .flatten()
            .into_iter()
            .map(|(path, value)| format!("{}={}", path, value))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_lookup() {
        let mut config = ResolvedConfiguration::new();
        config.set("curve", "bn254");
        config.set("proving.scheme", "g16");
        config.set("proving.backend", "ark");

        assert_eq!(config.get_str("curve"), Some("bn254"));
        assert_eq!(config.get_str("proving.scheme"), Some("g16"));
        assert_eq!(config.get_str("proving"), None);
        assert!(matches!(config.get("proving"), Some(AxisValue::Nested(_))));
        assert_eq!(config.get_str("curve.inner"), None);
        assert_eq!(config.get_str("missing"), None);
    }

    #[test]
    fn test_projection() {
        let config =
            ResolvedConfiguration::from_pairs([("curve", "bn254"), ("scheme", "g16"), ("backend", "ark")]);

        let provider = config.project(&["backend"]);
        assert_eq!(provider.len(), 1);
        assert_eq!(provider.get_str("backend"), Some("ark"));

        assert!(config.project(&[]).is_empty());
        assert!(config.project(&["unknown"]).is_empty());
    }

    #[test]
    fn test_display_flattens_in_axis_order() {
        let config = ResolvedConfiguration::from_pairs([("scheme", "g16"), ("a.b", "x"), ("curve", "bn254")]);
        assert_eq!(config.to_string(), "a.b=x, curve=bn254, scheme=g16");
        assert_eq!(ResolvedConfiguration::new().to_string(), "{}");
    }
}
