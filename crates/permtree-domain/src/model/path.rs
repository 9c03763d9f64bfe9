//! Materialized-path keys for the node hierarchy.
//!
//! A key is the ordered list of ancestor segments joined by `:`
//! (e.g. `"1:3:8"`). Every segment is a positive integer without leading
//! zeros, so two keys denote the same position iff they are byte-equal and
//! ancestry reduces to a prefix test on `key + ":"`.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Separator between path segments.
pub const SEPARATOR: char = ':';

/// Position of a node in the hierarchy.
///
/// Keys order segment by segment, numerically, with ancestors before their
/// descendants: `"2:5:9" < "2:5:10" < "12"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PathKey(String);

impl PathKey {
    /// Parses and validates a key such as `"2:5:9"`.
    pub fn parse(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::inconsistent_key(value, "key cannot be empty"));
        }
        for segment in value.split(SEPARATOR) {
            if let Err(reason) = validate_segment(segment) {
                return Err(DomainError::inconsistent_key(value, reason));
            }
        }
        Ok(Self(value))
    }

    /// Creates a single-segment (root) key.
    pub fn root(segment: u64) -> DomainResult<Self> {
        if segment == 0 {
            return Err(DomainError::inconsistent_key(
                "0",
                "segments must be positive integers",
            ));
        }
        Ok(Self(segment.to_string()))
    }

    /// Returns the key extended by one segment.
    pub fn child(&self, segment: u64) -> DomainResult<Self> {
        if segment == 0 {
            return Err(DomainError::inconsistent_key(
                format!("{}{}0", self.0, SEPARATOR),
                "segments must be positive integers",
            ));
        }
        Ok(Self(format!("{}{}{}", self.0, SEPARATOR, segment)))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the segments from the outermost ancestor inward.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }

    /// Number of segments; roots have depth 1.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    pub fn is_root(&self) -> bool {
        !self.0.contains(SEPARATOR)
    }

    /// Key of the parent node, or `None` for roots.
    pub fn parent(&self) -> Option<PathKey> {
        self.0
            .rfind(SEPARATOR)
            .map(|idx| PathKey(self.0[..idx].to_string()))
    }

    /// Key of the outermost ancestor (the first segment).
    pub fn root_key(&self) -> PathKey {
        match self.0.find(SEPARATOR) {
            Some(idx) => PathKey(self.0[..idx].to_string()),
            None => self.clone(),
        }
    }

    /// Strict descendant test: `self` starts with `ancestor + ":"`.
    ///
    /// A plain prefix test would let `"12"` match `"1"`.
    pub fn is_descendant_of(&self, ancestor: &PathKey) -> bool {
        self.0.len() > ancestor.0.len()
            && self.0.starts_with(ancestor.as_str())
            && self.0[ancestor.0.len()..].starts_with(SEPARATOR)
    }

    pub fn is_self_or_descendant_of(&self, ancestor: &PathKey) -> bool {
        self == ancestor || self.is_descendant_of(ancestor)
    }

    pub fn is_ancestor_of(&self, descendant: &PathKey) -> bool {
        descendant.is_descendant_of(self)
    }

    /// Two distinct keys sharing the same parent (roots are siblings of
    /// each other).
    pub fn is_sibling_of(&self, other: &PathKey) -> bool {
        self != other && self.parent() == other.parent()
    }

    /// For a strict descendant `self` of `ancestor`, returns the key of the
    /// child of `ancestor` that lies on the path toward `self`.
    ///
    /// `"2:5:9".next_segment_after("2")` is `"2:5"`; returns `None` when
    /// `self` is not strictly below `ancestor`.
    pub fn next_segment_after(&self, ancestor: &PathKey) -> Option<PathKey> {
        if !self.is_descendant_of(ancestor) {
            return None;
        }
        let start = ancestor.0.len() + 1;
        let end = self.0[start..]
            .find(SEPARATOR)
            .map_or(self.0.len(), |offset| start + offset);
        Some(PathKey(self.0[..end].to_string()))
    }
}

/// Reduces a key set to the keys that have no ancestor in the same set.
///
/// Subtree queries over the result cover exactly the same nodes as over the
/// input, without visiting any subtree twice.
pub fn minimal_cover<'a, I>(keys: I) -> BTreeSet<PathKey>
where
    I: IntoIterator<Item = &'a PathKey>,
{
    let sorted: BTreeSet<&PathKey> = keys.into_iter().collect();
    let mut cover: BTreeSet<PathKey> = BTreeSet::new();
    for key in sorted {
        let covered = std::iter::successors(key.parent(), PathKey::parent)
            .any(|ancestor| cover.contains(&ancestor));
        if !covered {
            cover.insert(key.clone());
        }
    }
    cover
}

fn validate_segment(segment: &str) -> Result<(), &'static str> {
    if segment.is_empty() {
        return Err("empty segment (leading, trailing or doubled separator)");
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err("segments must be positive integers");
    }
    if segment.starts_with('0') {
        return Err("segments must be positive integers without leading zeros");
    }
    Ok(())
}

impl TryFrom<String> for PathKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PathKey::parse(value)
    }
}

impl From<PathKey> for String {
    fn from(key: PathKey) -> Self {
        key.0
    }
}

impl std::str::FromStr for PathKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathKey::parse(s)
    }
}

impl Ord for PathKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut left = self.segments();
        let mut right = other.segments();
        loop {
            match (left.next(), right.next()) {
                (Some(a), Some(b)) => {
                    // No leading zeros: a longer segment is a larger number.
                    let ord = a.len().cmp(&b.len()).then_with(|| a.cmp(b));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (None, None) => return Ordering::Equal,
            }
        }
    }
}

impl PartialOrd for PathKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> PathKey {
        PathKey::parse(s).unwrap()
    }

    #[test]
    fn test_parse_accepts_well_formed_keys() {
        assert_eq!(key("1").as_str(), "1");
        assert_eq!(key("1:3:8").depth(), 3);
        assert_eq!(key("10:200").segments().collect::<Vec<_>>(), vec!["10", "200"]);
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        for bad in ["", ":", "1:", ":1", "1::2", "a:1", "1:0", "01", "1:-2", "1 :2"] {
            let err = PathKey::parse(bad).unwrap_err();
            assert!(
                matches!(err, DomainError::InconsistentKey { .. }),
                "expected InconsistentKey for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_descendant_requires_separator_boundary() {
        assert!(key("1:2").is_descendant_of(&key("1")));
        assert!(key("1:2:3").is_descendant_of(&key("1")));
        assert!(!key("12").is_descendant_of(&key("1")));
        assert!(!key("12:3").is_descendant_of(&key("1")));
        assert!(!key("1").is_descendant_of(&key("1")));
        assert!(key("1").is_self_or_descendant_of(&key("1")));
        assert!(key("1").is_ancestor_of(&key("1:9")));
    }

    #[test]
    fn test_parent_and_root_key() {
        assert_eq!(key("2:5:9").parent(), Some(key("2:5")));
        assert_eq!(key("2").parent(), None);
        assert_eq!(key("2:5:9").root_key(), key("2"));
        assert_eq!(key("7").root_key(), key("7"));
        assert!(key("7").is_root());
    }

    #[test]
    fn test_siblings_share_parent() {
        assert!(key("1:2").is_sibling_of(&key("1:3")));
        assert!(key("1").is_sibling_of(&key("4")));
        assert!(!key("1:2").is_sibling_of(&key("1:2")));
        assert!(!key("1:2").is_sibling_of(&key("2:2")));
    }

    #[test]
    fn test_next_segment_after() {
        assert_eq!(key("2:5:9").next_segment_after(&key("2")), Some(key("2:5")));
        assert_eq!(key("2:5:9").next_segment_after(&key("2:5")), Some(key("2:5:9")));
        assert_eq!(key("2:5").next_segment_after(&key("2:5")), None);
        assert_eq!(key("25:1").next_segment_after(&key("2")), None);
    }

    #[test]
    fn test_child_builds_nested_key() {
        assert_eq!(key("3").child(14).unwrap(), key("3:14"));
        assert_eq!(PathKey::root(6).unwrap(), key("6"));
        assert!(PathKey::root(0).is_err());
        assert!(key("3").child(0).is_err());
    }

    #[test]
    fn test_minimal_cover_drops_nested_keys() {
        let keys = [key("1:2"), key("1"), key("1:2:3"), key("12"), key("4:5")];
        let cover = minimal_cover(keys.iter());
        assert_eq!(
            cover.into_iter().collect::<Vec<_>>(),
            vec![key("1"), key("4:5"), key("12")]
        );
    }

    #[test]
    fn test_keys_order_numerically_by_segment() {
        let mut keys = vec![key("12"), key("2:5:10"), key("2:5"), key("2:5:9"), key("2"), key("10:1")];
        keys.sort();
        let got: Vec<&str> = keys.iter().map(PathKey::as_str).collect();
        assert_eq!(got, vec!["2", "2:5", "2:5:9", "2:5:10", "10:1", "12"]);
        assert!(key("1") < key("1:1"));
        assert_eq!(key("3:4").cmp(&key("3:4")), Ordering::Equal);
    }

    #[test]
    fn test_serde_validates_keys() {
        let parsed: PathKey = serde_json::from_str("\"1:2\"").unwrap();
        assert_eq!(parsed, key("1:2"));
        assert!(serde_json::from_str::<PathKey>("\"1::2\"").is_err());
        assert_eq!(serde_json::to_string(&key("8:1")).unwrap(), "\"8:1\"");
    }
}
