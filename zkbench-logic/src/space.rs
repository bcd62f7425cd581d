//! Configuration Space
//!
//! A declarative space maps axis names to lists of allowed values or to
//! nested spaces. Enumeration yields the Cartesian product of every leaf axis.
//!
//! ```text
//! { curve: [A, B], proving: { scheme: [X, Y] } }
//!        │
//!        ▼  enumerate()
//! { curve: A, proving: { scheme: X } }
//! { curve: A, proving: { scheme: Y } }
//! { curve: B, proving: { scheme: X } }
//! { curve: B, proving: { scheme: Y } }
//! ```
//!
//! Axes are visited in name order, values in declaration order, and the last
//! leaf axis varies fastest. Validity filtering is not done here.

use crate::resolved::ResolvedConfiguration;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from configuration-space construction
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpaceError {
    /// A leaf axis has no allowed values
    #[error("Axis `{0}` has no values")]
    EmptyAxis(String),

    /// An axis name is empty or contains a `.`
    #[error("Invalid axis name `{0}`")]
    InvalidAxisName(String),
}

/// One axis of a configuration space
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Axis {
    /// Allowed values, in declaration order
    Values(Vec<String>),
    /// Nested space placed under this axis name
    Nested(ConfigurationSpace),
}

/// Declarative configuration space
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationSpace {
    axes: BTreeMap<String, Axis>,
}

impl ConfigurationSpace {
    /// Create an empty space
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leaf axis
    pub fn with_axis<I, V>(mut self, name: &str, values: I) -> Result<Self, SpaceError>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        check_axis_name(name)?;
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(SpaceError::EmptyAxis(name.to_string()));
        }
        self.axes.insert(name.to_string(), Axis::Values(values));
        Ok(self)
    }

    /// Add a nested space
    pub fn with_nested(mut self, name: &str, space: ConfigurationSpace) -> Result<Self, SpaceError> {
        check_axis_name(name)?;
        self.axes.insert(name.to_string(), Axis::Nested(space));
        Ok(self)
    }

    /// Axes in name order
    pub fn axes(&self) -> impl Iterator<Item = (&str, &Axis)> {
        self.axes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether the space declares no axes
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Number of configurations `enumerate` yields, without enumerating
    pub fn combinations(&self) -> usize {
        self.axes
            .values()
            .map(|axis| match axis {
                Axis::Values(values) => values.len(),
                Axis::Nested(inner) => inner.combinations(),
            })
            .product()
    }

    /// Lazily enumerate every configuration in the space
    pub fn enumerate(&self) -> Combinations<'_> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut Vec::new(), &mut leaves);
        let cursor = if leaves.iter().any(|leaf| leaf.values.is_empty()) {
            None
        } else {
            Some(vec![0; leaves.len()])
        };
        Combinations { leaves, cursor }
    }

    fn collect_leaves<'a>(&'a self, prefix: &mut Vec<String>, out: &mut Vec<Leaf<'a>>) {
        for (name, axis) in &self.axes {
            prefix.push(name.clone());
            match axis {
                Axis::Values(values) => out.push(Leaf {
                    path: prefix.clone(),
                    values,
                }),
                Axis::Nested(inner) => inner.collect_leaves(prefix, out),
            }
            prefix.pop();
        }
    }
}

fn check_axis_name(name: &str) -> Result<(), SpaceError> {
    if name.is_empty() || name.contains('.') {
        return Err(SpaceError::InvalidAxisName(name.to_string()));
    }
    Ok(())
}

struct Leaf<'a> {
    path: Vec<String>,
    values: &'a [String],
}

/// Iterator over the Cartesian product of a configuration space
pub struct Combinations<'a> {
    leaves: Vec<Leaf<'a>>,
    /// Per-leaf value index; `None` once exhausted
    cursor: Option<Vec<usize>>,
}

impl Iterator for Combinations<'_> {
    type Item = ResolvedConfiguration;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;

        let mut config = ResolvedConfiguration::new();
        for (leaf, &index) in self.leaves.iter().zip(cursor.iter()) {
            config.insert_at(&leaf.path, leaf.values[index].clone());
        }

        // Odometer step, last leaf fastest
        let mut exhausted = true;
        for position in (0..cursor.len()).rev() {
            cursor[position] += 1;
            if cursor[position] < self.leaves[position].values.len() {
                exhausted = false;
                break;
            }
            cursor[position] = 0;
        }
        if exhausted {
            self.cursor = None;
        }

        Some(config)
    }
}

impl Serialize for ConfigurationSpace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.axes.serialize(serializer)
    }
}

/// Scalars accepted as axis values; everything is stored as its string form
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<RawScalar> for String {
    fn from(raw: RawScalar) -> Self {
        match raw {
            RawScalar::Str(s) => s,
            RawScalar::Int(i) => i.to_string(),
            RawScalar::Float(f) => f.to_string(),
            RawScalar::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAxis {
    List(Vec<RawScalar>),
    Nested(BTreeMap<String, RawAxis>),
    Single(RawScalar),
}

impl TryFrom<BTreeMap<String, RawAxis>> for ConfigurationSpace {
    type Error = SpaceError;

    fn try_from(raw: BTreeMap<String, RawAxis>) -> Result<Self, Self::Error> {
        let mut space = ConfigurationSpace::new();
        for (name, axis) in raw {
            space = match axis {
                RawAxis::List(values) => space.with_axis(&name, values.into_iter().map(String::from))?,
                RawAxis::Single(value) => space.with_axis(&name, [String::from(value)])?,
                RawAxis::Nested(inner) => space.with_nested(&name, ConfigurationSpace::try_from(inner)?)?,
            };
        }
        Ok(space)
    }
}

impl<'de> Deserialize<'de> for ConfigurationSpace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, RawAxis>::deserialize(deserializer)?;
        ConfigurationSpace::try_from(raw).map_err(<D::Error as serde::de::Error>::custom)
    }
}
