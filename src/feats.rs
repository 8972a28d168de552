//! Feature-set comparison
//!
//! Flat key→value attribute maps in the CoNLL-U FEATS style, parsed
//! from the `key1=value1|key2=value2` encoding, with a per-key edit
//! distance: a key only on the right is an insertion, only on the left
//! a deletion, present on both with different values a substitution.
//! Values are atomic strings; every operation has unit weight.

use rustc_hash::{FxHashMap, FxHashSet};
use std::str::FromStr;
use thiserror::Error;

/// Error raised for a malformed feature string
#[derive(Debug, Error, PartialEq)]
pub enum FeatsParseError {
    #[error("feature pair without '=': {0}")]
    MissingSeparator(String),
}

/// An edit operation on a feature set, keyed by attribute name
///
/// Feature sets are unordered, so a comparison yields a set of these
/// rather than an ordered script.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatOp {
    Delete(String),
    Insert(String),
    Substitute(String),
}

/// A flat key→value feature set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Features {
    map: FxHashMap<String, String>,
}

impl Features {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|v| v.as_str())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.map.insert(key.into(), value.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromStr for Features {
    type Err = FeatsParseError;

    /// Parse `key1=value1|key2=value2|...`; the empty string is the
    /// empty feature set
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut map = FxHashMap::default();
        if s.is_empty() {
            return Ok(Self { map });
        }
        for pair in s.split('|') {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| FeatsParseError::MissingSeparator(pair.to_string()))?;
            map.insert(key.to_string(), value.to_string());
        }
        Ok(Self { map })
    }
}

impl From<FxHashMap<String, String>> for Features {
    fn from(map: FxHashMap<String, String>) -> Self {
        Self { map }
    }
}

impl FromIterator<(String, String)> for Features {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

/// Number of per-key edits between two feature sets
///
/// With `normalize` set, the count is divided by the size of the union
/// of the two key sets (0 when both sets are empty).
pub fn dict_edit_distance(left: &Features, right: &Features, normalize: bool) -> f64 {
    let (raw, union) = classify(left, right, None);
    if normalize {
        if union == 0 { 0.0 } else { raw / union as f64 }
    } else {
        raw
    }
}

/// Per-key edits between two feature sets, as an unordered set
pub fn dict_edits(left: &Features, right: &Features) -> (f64, FxHashSet<FeatOp>) {
    let mut ops = FxHashSet::default();
    let (raw, _) = classify(left, right, Some(&mut ops));
    (raw, ops)
}

fn classify(left: &Features, right: &Features, mut ops: Option<&mut FxHashSet<FeatOp>>) -> (f64, usize) {
    let mut raw = 0.0;
    let mut union = left.len();
    for (key, value) in left.iter() {
        match right.get(key) {
            None => {
                raw += 1.0;
                if let Some(ops) = ops.as_mut() {
                    ops.insert(FeatOp::Delete(key.to_string()));
                }
            }
            Some(other) if other != value => {
                raw += 1.0;
                if let Some(ops) = ops.as_mut() {
                    ops.insert(FeatOp::Substitute(key.to_string()));
                }
            }
            Some(_) => {}
        }
    }
    for (key, _) in right.iter() {
        if left.get(key).is_none() {
            union += 1;
            raw += 1.0;
            if let Some(ops) = ops.as_mut() {
                ops.insert(FeatOp::Insert(key.to_string()));
            }
        }
    }
    (raw, union)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feats(s: &str) -> Features {
        s.parse().unwrap()
    }

    #[test]
    fn test_parsing() {
        let f = feats("Case=Nom|Number=Sing");
        assert_eq!(f.len(), 2);
        assert_eq!(f.get("Case"), Some("Nom"));
        assert_eq!(f.get("Number"), Some("Sing"));
        assert_eq!(f.get("Gender"), None);
        assert!(feats("").is_empty());
    }

    #[test]
    fn test_parsing_rejects_bad_pair() {
        assert_eq!(
            "a=a|b".parse::<Features>(),
            Err(FeatsParseError::MissingSeparator("b".to_string()))
        );
    }

    #[test]
    fn test_distance() {
        assert_eq!(dict_edit_distance(&feats("a=a|b=b|c=c"), &feats("a=a|b=b|c=c"), false), 0.0);
        assert_eq!(dict_edit_distance(&feats(""), &feats(""), false), 0.0);
        assert_eq!(dict_edit_distance(&feats("a=a|b=b|c=c"), &feats("b=b"), false), 2.0);
        assert_eq!(dict_edit_distance(&feats("b=b"), &feats("a=a|b=b|c=c"), false), 2.0);
        assert_eq!(dict_edit_distance(&feats("a=a|b=b"), &feats("a=x|b=b"), false), 1.0);
        assert_eq!(dict_edit_distance(&feats("a=a"), &feats("b=b"), false), 2.0);
    }

    #[test]
    fn test_edits() {
        let (cost, ops) = dict_edits(&feats("a=a|b=b|c=c"), &feats("b=b"));
        assert_eq!(cost, 2.0);
        let expected: FxHashSet<FeatOp> = [
            FeatOp::Delete("a".to_string()),
            FeatOp::Delete("c".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(ops, expected);

        let (cost, ops) = dict_edits(&feats("a=a|b=b"), &feats("a=x|c=c"));
        assert_eq!(cost, 3.0);
        assert!(ops.contains(&FeatOp::Substitute("a".to_string())));
        assert!(ops.contains(&FeatOp::Delete("b".to_string())));
        assert!(ops.contains(&FeatOp::Insert("c".to_string())));
    }

    #[test]
    fn test_identity_has_no_edits() {
        let f = feats("a=a|b=b");
        let (cost, ops) = dict_edits(&f, &f);
        assert_eq!(cost, 0.0);
        assert!(ops.is_empty());
    }

    #[test]
    fn test_normalize() {
        // union {a, b, c}, two edits
        assert_eq!(
            dict_edit_distance(&feats("a=a|b=b|c=c"), &feats("b=b"), true),
            2.0 / 3.0
        );
        assert_eq!(dict_edit_distance(&feats(""), &feats(""), true), 0.0);
        let d = dict_edit_distance(&feats("a=a"), &feats("b=b"), true);
        assert_eq!(d, 1.0); // fully disjoint
    }

    #[test]
    fn test_from_map() {
        let mut map = FxHashMap::default();
        map.insert("Case".to_string(), "Nom".to_string());
        let f = Features::from(map);
        assert_eq!(f.get("Case"), Some("Nom"));
    }
}
