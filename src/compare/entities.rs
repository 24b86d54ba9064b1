//! Per-kind entity comparators.
//!
//! Each entity kind shares the same classification shape: build a lookup
//! from identity key to entity on both sides, then report keys only on the
//! right as added, keys only on the left as removed, and keys on both sides
//! whose entities are not equal as modified. The kind-specific part is the
//! identity key and the equality relation, expressed through
//! [`DiffableEntity`].

use crate::types::{
    ComparisonConfig, DataSource, Diff, DiffKind, Entity, EntityKind, ModuleCall, Output, Resource,
    Variable,
};
use crate::value::attr_maps_eq;
use std::collections::HashMap;

/// An entity kind that can be classified into added/removed/modified diffs.
pub(crate) trait DiffableEntity: Clone + Into<Entity> {
    /// The diff level this entity kind reports under.
    const KIND: EntityKind;

    /// Stable identity key used to match entities across the two trees.
    fn identity_key(&self) -> String;

    /// Entity-level equality: header fields exact-match and, when argument
    /// comparison is enabled, body equality through the value model.
    fn matches(&self, other: &Self, config: &ComparisonConfig) -> bool;
}

impl DiffableEntity for ModuleCall {
    const KIND: EntityKind = EntityKind::ModuleCall;

    fn identity_key(&self) -> String {
        self.name.clone()
    }

    fn matches(&self, other: &Self, config: &ComparisonConfig) -> bool {
        if self.name != other.name || self.source != other.source || self.version != other.version {
            return false;
        }
        config.ignore_arguments || attr_maps_eq(&self.args, &other.args)
    }
}

impl DiffableEntity for Output {
    const KIND: EntityKind = EntityKind::Output;

    fn identity_key(&self) -> String {
        self.name.clone()
    }

    fn matches(&self, other: &Self, _config: &ComparisonConfig) -> bool {
        // All output fields are headers, compared unconditionally.
        self.name == other.name
            && self.sensitive == other.sensitive
            && self.description == other.description
            && self.value == other.value
    }
}

impl DiffableEntity for Resource {
    const KIND: EntityKind = EntityKind::Resource;

    fn identity_key(&self) -> String {
        self.address()
    }

    fn matches(&self, other: &Self, config: &ComparisonConfig) -> bool {
        if self.resource_type != other.resource_type || self.name != other.name {
            return false;
        }
        config.ignore_arguments || attr_maps_eq(&self.config, &other.config)
    }
}

impl DiffableEntity for DataSource {
    const KIND: EntityKind = EntityKind::DataSource;

    fn identity_key(&self) -> String {
        self.address()
    }

    fn matches(&self, other: &Self, config: &ComparisonConfig) -> bool {
        if self.source_type != other.source_type || self.name != other.name {
            return false;
        }
        config.ignore_arguments || attr_maps_eq(&self.config, &other.config)
    }
}

impl DiffableEntity for Variable {
    const KIND: EntityKind = EntityKind::Variable;

    fn identity_key(&self) -> String {
        self.name.clone()
    }

    fn matches(&self, other: &Self, config: &ComparisonConfig) -> bool {
        if self.name != other.name
            || self.variable_type != other.variable_type
            || self.description != other.description
        {
            return false;
        }
        if config.ignore_arguments {
            return true;
        }
        match (&self.default_value, &other.default_value) {
            (None, None) => true,
            (Some(left), Some(right)) => left.semantic_eq(right),
            _ => false,
        }
    }
}

/// Classify one entity kind into a diff set.
///
/// Duplicate identity keys within one side are resolved last-write-wins in
/// the lookup stage. The returned diffs are unordered; the orchestrator
/// imposes the final sort.
pub(crate) fn classify<T: DiffableEntity>(
    left: &[T],
    right: &[T],
    config: &ComparisonConfig,
) -> Vec<Diff> {
    let left_map: HashMap<String, &T> = left.iter().map(|e| (e.identity_key(), e)).collect();
    let right_map: HashMap<String, &T> = right.iter().map(|e| (e.identity_key(), e)).collect();

    let mut diffs = Vec::new();

    for (key, right_entity) in &right_map {
        if !left_map.contains_key(key) {
            diffs.push(Diff {
                kind: DiffKind::Added,
                level: T::KIND,
                element: key.clone(),
                before: None,
                after: Some((*right_entity).clone().into()),
                message: format!("{} '{key}' was added", T::KIND.label()),
            });
        }
    }

    for (key, left_entity) in &left_map {
        match right_map.get(key) {
            None => diffs.push(Diff {
                kind: DiffKind::Removed,
                level: T::KIND,
                element: key.clone(),
                before: Some((*left_entity).clone().into()),
                after: None,
                message: format!("{} '{key}' was removed", T::KIND.label()),
            }),
            Some(right_entity) if !left_entity.matches(right_entity, config) => {
                diffs.push(Diff {
                    kind: DiffKind::Modified,
                    level: T::KIND,
                    element: key.clone(),
                    before: Some((*left_entity).clone().into()),
                    after: Some((*right_entity).clone().into()),
                    message: format!("{} '{key}' was modified", T::KIND.label()),
                });
            }
            Some(_) => {}
        }
    }

    diffs
}
