//! Resolver maps and the merged, immutable registry

use indexmap::IndexMap;

use crate::config::MergePolicy;
use crate::core::error::DuplicateResolverError;
use crate::core::resolver::{FieldCoordinate, Resolver};

/// Partial resolver table supplied by one part of the application
///
/// Within a single map, registering a coordinate twice replaces the earlier
/// resolver. Conflicts between maps are detected by [`Registry::merge`].
#[derive(Debug, Clone, Default)]
pub struct ResolverMap {
    entries: IndexMap<FieldCoordinate, Resolver>,
}

impl ResolverMap {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Add a resolver for `type_name.field_name`
    pub fn resolver(
        mut self,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        resolver: Resolver,
    ) -> Self {
        self.insert(type_name, field_name, resolver);
        self
    }

    pub fn insert(
        &mut self,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        resolver: Resolver,
    ) {
        self.entries
            .insert(FieldCoordinate::new(type_name, field_name), resolver);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldCoordinate, &Resolver)> {
        self.entries.iter()
    }
}

/// Lookup table from `(type, field)` to resolver
///
/// Built once at startup and never modified afterwards, so it can be shared
/// across concurrent operations behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    types: IndexMap<String, IndexMap<String, Resolver>>,
}

impl Registry {
    /// Merge partial maps, failing on the first conflicting coordinate
    pub fn merge(
        maps: impl IntoIterator<Item = ResolverMap>,
    ) -> Result<Self, DuplicateResolverError> {
        Self::merge_with_policy(maps, MergePolicy::FailFast)
    }

    /// Merge partial maps in order under the given conflict policy
    ///
    /// The same resolver handle registered in several maps is never a conflict.
    pub fn merge_with_policy(
        maps: impl IntoIterator<Item = ResolverMap>,
        policy: MergePolicy,
    ) -> Result<Self, DuplicateResolverError> {
        let mut types: IndexMap<String, IndexMap<String, Resolver>> = IndexMap::new();

        for map in maps {
            for (coordinate, resolver) in map.entries {
                let FieldCoordinate {
                    type_name,
                    field_name,
                } = coordinate;
                let fields = types.entry(type_name.clone()).or_default();

                let conflict = fields
                    .get(&field_name)
                    .map(|existing| !existing.same_as(&resolver));

                match conflict {
                    Some(false) => {}
                    Some(true) if policy == MergePolicy::FailFast => {
                        return Err(DuplicateResolverError::new(type_name, field_name));
                    }
                    Some(true) => {
                        tracing::debug!(
                            type_name = %type_name,
                            field_name = %field_name,
                            "Replacing resolver from an earlier map"
                        );
                        fields.insert(field_name, resolver);
                    }
                    None => {
                        fields.insert(field_name, resolver);
                    }
                }
            }
        }

        let registry = Self { types };
        tracing::info!(
            resolvers = registry.len(),
            types = registry.types.len(),
            ?policy,
            "Resolver registry built"
        );
        Ok(registry)
    }

    pub fn lookup(&self, type_name: &str, field_name: &str) -> Option<&Resolver> {
        self.types.get(type_name)?.get(field_name)
    }

    pub fn contains(&self, type_name: &str, field_name: &str) -> bool {
        self.lookup(type_name, field_name).is_some()
    }

    /// Number of registered resolvers
    pub fn len(&self) -> usize {
        self.types.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All registered coordinates, in merge order
    pub fn coordinates(&self) -> impl Iterator<Item = FieldCoordinate> + '_ {
        self.types.iter().flat_map(|(type_name, fields)| {
            fields
                .keys()
                .map(move |field_name| FieldCoordinate::new(type_name.clone(), field_name.clone()))
        })
    }
}
