//! Semantic value model for configuration attributes.
//!
//! This module defines [`ConfigValue`], the tagged representation of one
//! attribute value in a normalized configuration tree, and the equality
//! relation used by the comparators. The relation is deliberately not the
//! derived structural equality:
//!
//! - two scalars that both parse as JSON documents are compared as parsed
//!   documents, so key reordering inside a JSON-encoded string is immaterial
//! - lists are order-sensitive
//! - repeated blocks of the same type are matched order-independently
//!   (greedy first-fit bijection)

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Sentinel emitted for expressions whose value cannot be determined
/// statically (interpolations, function calls, references).
pub const OPAQUE_SENTINEL: &str = "<complex_expression>";

/// Reserved body key under which repeatable nested blocks are folded as a
/// [`ConfigValue::BlockSet`].
pub const NESTED_BLOCKS_KEY: &str = "_blocks";

/// Policy for comparing two [`ConfigValue::Opaque`] values.
///
/// Unknown cannot be proven equal to unknown, so two opaque values are
/// treated as different. Flipping this constant is the only sanctioned way
/// to change that behavior.
pub const OPAQUE_VALUES_COMPARE_EQUAL: bool = false;

/// Attribute map used for bodies and block instances.
///
/// `BTreeMap` keeps iteration deterministic, which the renderer and the
/// JSON output rely on.
pub type AttrMap = BTreeMap<String, ConfigValue>;

/// Repeatable nested blocks, grouped by block type.
pub type BlockMap = BTreeMap<String, Vec<AttrMap>>;

/// One semantic value found in a configuration attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// A literal or unresolved-but-textual value.
    Scalar(String),

    /// An expression whose value could not be evaluated.
    Opaque,

    /// Ordered sequence; order is significant.
    List(Vec<ConfigValue>),

    /// Unordered key/value container with unique keys.
    Object(AttrMap),

    /// Repeatable nested blocks (e.g. multiple `ingress {}` blocks).
    /// Order among blocks of one type is not significant.
    BlockSet(BlockMap),
}

impl ConfigValue {
    /// Semantic equality between two values.
    ///
    /// Mismatched shapes are never equal; the JSON-in-string rule only
    /// applies when both sides are scalars.
    #[must_use]
    pub fn semantic_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => scalars_eq(a, b),
            (Self::Opaque, Self::Opaque) => OPAQUE_VALUES_COMPARE_EQUAL,
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.semantic_eq(y))
            }
            (Self::Object(a), Self::Object(b)) => attr_maps_eq(a, b),
            (Self::BlockSet(a), Self::BlockSet(b)) => block_maps_eq(a, b),
            _ => false,
        }
    }

    /// Returns true for the opaque sentinel.
    #[must_use]
    pub const fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque)
    }

    /// Returns true for values that carry no content (empty scalar, empty
    /// containers). Used by the renderer to suppress noise lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(s) => s.is_empty(),
            Self::Opaque => false,
            Self::List(items) => items.is_empty(),
            Self::Object(map) => map.is_empty(),
            Self::BlockSet(blocks) => blocks.is_empty(),
        }
    }

}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(s) => serializer.serialize_str(s),
            Self::Opaque => serializer.serialize_str(OPAQUE_SENTINEL),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Self::BlockSet(blocks) => {
                let mut out = serializer.serialize_map(Some(blocks.len()))?;
                for (block_type, instances) in blocks {
                    out.serialize_entry(block_type, instances)?;
                }
                out.end()
            }
        }
    }
}

/// Compare two scalar strings, upgrading to a structural comparison when
/// both sides parse as JSON documents.
fn scalars_eq(left: &str, right: &str) -> bool {
    if let (Ok(left_doc), Ok(right_doc)) = (
        serde_json::from_str::<serde_json::Value>(left),
        serde_json::from_str::<serde_json::Value>(right),
    ) {
        return left_doc == right_doc;
    }
    left == right
}

/// Two attribute maps are equal iff they have the same key set and every
/// value pair is semantically equal.
///
/// This is the body-equality relation for entity `config`/`args` bags.
#[must_use]
pub fn attr_maps_eq(left: &AttrMap, right: &AttrMap) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter().all(|(key, left_value)| {
        right
            .get(key)
            .is_some_and(|right_value| left_value.semantic_eq(right_value))
    })
}

/// Two block maps are equal iff every block type has the same cardinality
/// on both sides and a bijective order-independent match exists between the
/// instances.
fn block_maps_eq(left: &BlockMap, right: &BlockMap) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter().all(|(block_type, left_instances)| {
        right
            .get(block_type)
            .is_some_and(|right_instances| block_instances_eq(left_instances, right_instances))
    })
}

/// Greedy first-fit bijection between block instances of one type.
///
/// Every left instance must claim a not-yet-matched equal right instance.
/// Greedy matching is sufficient for the block shapes seen in practice;
/// with partially-overlapping duplicates any valid bijection is accepted.
fn block_instances_eq(left: &[AttrMap], right: &[AttrMap]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    let mut matched = vec![false; right.len()];
    for left_instance in left {
        let claim = right.iter().enumerate().position(|(idx, right_instance)| {
            !matched[idx] && attr_maps_eq(left_instance, right_instance)
        });
        match claim {
            Some(idx) => matched[idx] = true,
            None => return false,
        }
    }
    true
}
