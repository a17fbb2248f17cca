//! The interaction store: keyed by unordered endpoint pair, indexed by
//! node, with load/query/statistics operations (§3, §4.5).

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{Entity, EntityKey};
use crate::evidences::EvidenceFilter;
use crate::interaction::{DirSelector, DirectionKey, EffectSelector, Interaction};
use crate::reference::Reference;

/// The canonical, orderable key for an unordered endpoint pair. Always
/// constructed so `a <= b` under [`EntityKey`]'s ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    pub a: EntityKey,
    pub b: EntityKey,
}

impl PairKey {
    pub fn new(x: EntityKey, y: EntityKey) -> Self {
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }
}

/// Direction of traversal relative to the queried node, for
/// [`Network::partners`] and [`crate::pathfinder::find_paths`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerMode {
    In,
    Out,
    All,
}

/// External reference-list collaborator consulted by
/// [`Network::organisms_check`] (§6, §4.5).
pub trait ReferenceList {
    fn check(&self, identifier: &str, id_type: &str, taxon: i32) -> bool;
}

/// The in-memory interaction multigraph (§3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Network {
    interactions: HashMap<PairKey, Interaction>,
    nodes: HashMap<EntityKey, Entity>,
    nodes_by_label: HashMap<String, EntityKey>,
    interactions_by_nodes: HashMap<EntityKey, HashSet<PairKey>>,
    /// Insertion order of `interactions` keys, for `make_df` (§5 Ordering).
    /// `HashMap` does not preserve insertion order, so it's tracked
    /// explicitly here rather than relying on iteration order.
    insertion_order: Vec<PairKey>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.interactions.clear();
        self.nodes.clear();
        self.nodes_by_label.clear();
        self.interactions_by_nodes.clear();
        self.insertion_order.clear();
    }

    pub fn vcount(&self) -> usize {
        self.nodes.len()
    }

    pub fn ecount(&self) -> usize {
        self.interactions.len()
    }

    pub fn node(&self, key: &EntityKey) -> Option<&Entity> {
        self.nodes.get(key)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Entity> {
        self.nodes.values()
    }

    pub fn entity_by_label(&self, label: &str) -> Option<&Entity> {
        self.nodes_by_label.get(label).and_then(|k| self.nodes.get(k))
    }

    pub fn interaction(&self, a: &EntityKey, b: &EntityKey) -> Option<&Interaction> {
        self.interactions.get(&PairKey::new(a.clone(), b.clone()))
    }

    pub fn interaction_by_label(&self, label_a: &str, label_b: &str) -> Option<&Interaction> {
        let a = self.nodes_by_label.get(label_a)?;
        let b = self.nodes_by_label.get(label_b)?;
        self.interaction(a, b)
    }

    /// Iterates interactions in insertion order (§5 Ordering), for
    /// [`crate::dataframe`] projection and anything else order-sensitive.
    pub fn interactions_in_order(&self) -> impl Iterator<Item = (&PairKey, &Interaction)> {
        self.insertion_order
            .iter()
            .filter_map(move |k| self.interactions.get(k).map(|ia| (k, ia)))
    }

    pub fn interactions(&self) -> impl Iterator<Item = (&PairKey, &Interaction)> {
        self.interactions.iter()
    }

    /// The set of distinct taxa currently represented among `nodes`.
    pub fn organisms(&self) -> HashSet<i32> {
        self.nodes.values().map(|e| e.taxon).collect()
    }

    fn upsert_node(&mut self, entity: Entity) -> EntityKey {
        let key = entity.key();
        match self.nodes.get_mut(&key) {
            Some(existing) => existing.merge(&entity),
            None => {
                self.nodes.insert(key.clone(), entity.clone());
            }
        }
        if let Some(label) = self.nodes.get(&key).and_then(|e| e.label.clone()) {
            self.nodes_by_label.insert(label, key.clone());
        }
        key
    }

    fn link_adjacency(&mut self, pair: &PairKey) {
        self.interactions_by_nodes.entry(pair.a.clone()).or_default().insert(pair.clone());
        self.interactions_by_nodes.entry(pair.b.clone()).or_default().insert(pair.clone());
    }

    /// Merges `ia` into the store, creating its nodes as needed and
    /// updating the adjacency index atomically (§4.2 Emission, §4.5).
    ///
    /// When `only_directions` is set, an interaction is only *updated*
    /// if its pair already exists; a genuinely new pair is dropped
    /// rather than created (§4.2 `only_directions` mode). Additionally,
    /// if none of `ia`'s evidence resources share an interaction type
    /// with the existing interaction's evidence, the merge is skipped.
    pub fn add_interaction(&mut self, a: Entity, b: Entity, ia: Interaction, only_directions: bool) {
        let pair = PairKey::new(a.key(), b.key());

        if only_directions {
            let Some(existing) = self.interactions.get(&pair) else {
                debug!(?pair, "only_directions: no existing interaction, dropping");
                return;
            };
            let existing_types: HashSet<String> = existing
                .get_resources(DirSelector::All, EffectSelector::None, &EvidenceFilter::default())
                .into_iter()
                .map(|r| r.interaction_type)
                .collect();
            let incoming_types: HashSet<String> = ia
                .get_resources(DirSelector::All, EffectSelector::None, &EvidenceFilter::default())
                .into_iter()
                .map(|r| r.interaction_type)
                .collect();
            if existing_types.is_disjoint(&incoming_types) {
                debug!(?pair, "only_directions: disjoint interaction types, skipping");
                return;
            }
        }

        self.upsert_node(a);
        self.upsert_node(b);

        match self.interactions.get_mut(&pair) {
            Some(existing) => existing.merge(&ia),
            None => {
                self.interactions.insert(pair.clone(), ia);
                self.insertion_order.push(pair.clone());
            }
        }
        self.link_adjacency(&pair);
    }

    /// Removes `key` and cascades to every incident interaction; any
    /// other endpoint left at zero degree is removed too (§4.5).
    pub fn remove_node(&mut self, key: &EntityKey) {
        let Some(pairs) = self.interactions_by_nodes.remove(key) else {
            return;
        };
        self.nodes.remove(key);
        self.nodes_by_label.retain(|_, v| v != key);

        let mut others_to_check = Vec::new();
        for pair in pairs {
            self.interactions.remove(&pair);
            self.insertion_order.retain(|p| p != &pair);
            let other = if &pair.a == key { pair.b.clone() } else { pair.a.clone() };
            if let Some(set) = self.interactions_by_nodes.get_mut(&other) {
                set.remove(&pair);
            }
            others_to_check.push(other);
        }

        for other in others_to_check {
            if self
                .interactions_by_nodes
                .get(&other)
                .map(|s| s.is_empty())
                .unwrap_or(true)
            {
                self.interactions_by_nodes.remove(&other);
                self.nodes.remove(&other);
                self.nodes_by_label.retain(|_, v| v != &other);
            }
        }
    }

    /// Removes one interaction by its endpoints and cascades isolated
    /// endpoints, same as [`Network::remove_node`] but scoped to a
    /// single pair (§4.5).
    pub fn remove_interaction(&mut self, a: &EntityKey, b: &EntityKey) {
        let pair = PairKey::new(a.clone(), b.clone());
        if self.interactions.remove(&pair).is_none() {
            return;
        }
        self.insertion_order.retain(|p| p != &pair);

        for endpoint in [&pair.a, &pair.b] {
            if let Some(set) = self.interactions_by_nodes.get_mut(endpoint) {
                set.remove(&pair);
            }
        }
        for endpoint in [pair.a, pair.b] {
            if self
                .interactions_by_nodes
                .get(&endpoint)
                .map(|s| s.is_empty())
                .unwrap_or(true)
            {
                self.interactions_by_nodes.remove(&endpoint);
                self.nodes.remove(&endpoint);
                self.nodes_by_label.retain(|_, v| v != &endpoint);
            }
        }
    }

    pub fn remove_zero_degree(&mut self) {
        let empty: Vec<EntityKey> = self
            .interactions_by_nodes
            .iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k.clone())
            .collect();
        for key in empty {
            self.interactions_by_nodes.remove(&key);
            self.nodes.remove(&key);
            self.nodes_by_label.retain(|_, v| v != &key);
        }
    }

    /// Drops nodes failing any of the organism constraints (§4.5).
    /// `entity_type ∈ {complex, lncrna}` is exempt from the
    /// mismatch check (those identifiers aren't taxon-specific).
    pub fn organisms_check(
        &mut self,
        organisms: Option<&HashSet<i32>>,
        remove_mismatches: bool,
        remove_nonspecific: bool,
        reference_list: Option<&dyn ReferenceList>,
    ) {
        use crate::entity::entity_type;

        let to_remove: Vec<EntityKey> = self
            .nodes
            .values()
            .filter(|e| {
                if let Some(orgs) = organisms {
                    if !orgs.contains(&e.taxon) {
                        return true;
                    }
                }
                if remove_mismatches
                    && e.entity_type != entity_type::COMPLEX
                    && e.entity_type != entity_type::LNCRNA
                {
                    if let Some(rl) = reference_list
                        && !rl.check(&e.identifier, &e.id_type, e.taxon)
                    {
                        return true;
                    }
                }
                if remove_nonspecific && e.taxon == 0 {
                    return true;
                }
                false
            })
            .map(|e| e.key())
            .collect();

        for key in to_remove {
            self.remove_node(&key);
        }
    }

    fn directed_slot_for(is_query_a: bool, out: bool) -> DirectionKey {
        match (is_query_a, out) {
            (true, true) => DirectionKey::Forward,
            (true, false) => DirectionKey::Reverse,
            (false, true) => DirectionKey::Reverse,
            (false, false) => DirectionKey::Forward,
        }
    }

    /// Partner lookup (§4.5): for each interaction incident to `entity`,
    /// determine the other endpoint under `mode` (relative to `entity`,
    /// so it's inverted against the interaction's own canonical `(a,
    /// b)` labeling when `entity == b`). `direction`, when given,
    /// overrides `mode`'s entity-relative slot and restricts evidence to
    /// that exact canonical direction instead, mirroring the source's
    /// `partners`/`get_degrees` taking `mode` and `direction` as
    /// independent arguments.
    pub fn partners(
        &self,
        entity: &EntityKey,
        mode: PartnerMode,
        direction: Option<DirectionKey>,
        effect: EffectSelector,
        filter: &EvidenceFilter,
    ) -> Vec<Entity> {
        let Some(pairs) = self.interactions_by_nodes.get(entity) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for pair in pairs {
            let Some(ia) = self.interactions.get(pair) else { continue };
            let is_a = &pair.a == entity;
            let other_key = if is_a { &pair.b } else { &pair.a };

            let dir_selector = match direction {
                Some(d) => DirSelector::Specific(d),
                None => match mode {
                    PartnerMode::All => DirSelector::All,
                    PartnerMode::Out => DirSelector::Specific(Self::directed_slot_for(is_a, true)),
                    PartnerMode::In => DirSelector::Specific(Self::directed_slot_for(is_a, false)),
                },
            };

            let evidences = ia.get_evidences(dir_selector, effect, filter);
            if evidences.is_empty() {
                continue;
            }
            if seen.insert(other_key.clone())
                && let Some(other) = self.nodes.get(other_key)
            {
                out.push(other.clone());
            }
        }
        out
    }

    /// Count, for each reference, how many distinct interactions cite
    /// it (§4.5 `remove_htp`, §B).
    pub fn numof_interactions_per_reference(&self) -> HashMap<Reference, usize> {
        let mut counts: HashMap<Reference, usize> = HashMap::new();
        for ia in self.interactions.values() {
            for r in ia.get_references(DirSelector::All, EffectSelector::None, &EvidenceFilter::default()) {
                *counts.entry(r).or_insert(0) += 1;
            }
        }
        counts
    }

    /// The inverse of [`Network::numof_interactions_per_reference`]:
    /// which interactions (by pair key) cite each reference (§B).
    pub fn interactions_by_reference(&self) -> HashMap<Reference, HashSet<PairKey>> {
        let mut out: HashMap<Reference, HashSet<PairKey>> = HashMap::new();
        for (pair, ia) in &self.interactions {
            for r in ia.get_references(DirSelector::All, EffectSelector::None, &EvidenceFilter::default()) {
                out.entry(r).or_default().insert(pair.clone());
            }
        }
        out
    }

    /// Drops interactions whose references are *all* high-throughput
    /// (cited by more than `threshold` interactions), subject to
    /// `keep_directed` sparing directed interactions (§4.5, §GLOSSARY).
    pub fn remove_htp(&mut self, threshold: usize, keep_directed: bool) {
        let per_reference = self.numof_interactions_per_reference();
        let is_htp = |r: &Reference| per_reference.get(r).copied().unwrap_or(0) > threshold;

        let to_remove: Vec<PairKey> = self
            .interactions
            .iter()
            .filter(|(_, ia)| {
                let refs = ia.get_references(DirSelector::All, EffectSelector::None, &EvidenceFilter::default());
                if refs.is_empty() {
                    return false;
                }
                let all_htp = refs.iter().all(is_htp);
                all_htp && (!keep_directed || !ia.is_directed(None))
            })
            .map(|(k, _)| k.clone())
            .collect();

        for pair in to_remove {
            self.remove_interaction(&pair.a, &pair.b);
        }
    }

    /// Drops undirected interactions, optionally sparing those with at
    /// least `min_refs` references (§4.5).
    pub fn remove_undirected(&mut self, min_refs: Option<usize>) {
        let to_remove: Vec<PairKey> = self
            .interactions
            .iter()
            .filter(|(_, ia)| {
                if ia.is_directed(None) {
                    return false;
                }
                match min_refs {
                    None => true,
                    Some(min) => {
                        let refs = ia.get_references(DirSelector::All, EffectSelector::None, &EvidenceFilter::default());
                        refs.len() < min
                    }
                }
            })
            .map(|(k, _)| k.clone())
            .collect();

        for pair in to_remove {
            self.remove_interaction(&pair.a, &pair.b);
        }
    }

    /// Resource names that supply any evidence in the network, keyed
    /// by the entity that carries it (§B `entities_by_resource`).
    pub fn entities_by_resource(&self) -> HashMap<String, HashSet<EntityKey>> {
        let mut out: HashMap<String, HashSet<EntityKey>> = HashMap::new();
        for (pair, ia) in &self.interactions {
            for name in ia.get_resource_names(DirSelector::All, EffectSelector::None, &EvidenceFilter::default()) {
                let entry = out.entry(name).or_default();
                entry.insert(pair.a.clone());
                entry.insert(pair.b.clone());
            }
        }
        out
    }
}
