//! Configuration labels
//!
//! A label names one benchmarked configuration, e.g. `mimc.zok/ark/g16/bn254`.
//! It is the `config` column of every result table and, split on `/`, the
//! directory holding that configuration's artifacts and logs.

use std::fmt;
use std::path::PathBuf;

/// Immutable, path-like configuration label
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigLabel {
    segments: Vec<String>,
}

impl ConfigLabel {
    /// Build a label from its segments.
    ///
    /// Separators and parent references inside a segment are replaced so
    /// every segment maps to exactly one directory level.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments = segments
            .into_iter()
            .map(|s| sanitize(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        Self { segments }
    }

    /// Label segments, outermost first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Relative directory for this label
    pub fn to_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

fn sanitize(segment: &str) -> String {
    let replaced = segment.replace(['/', '\\'], "_");
    if replaced == "." || replaced == ".." {
        replaced.replace('.', "_")
    } else {
        replaced
    }
}

impl fmt::Display for ConfigLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
