//! Group-by statistics: shared/unique sets, subtotals, and percentages
//! across `(interaction_type, data_model, resource)` (§4.5, §9).
//!
//! The source represents these groupings as dict-of-dicts keyed by
//! tuples of varying arity (2- and 3-tuples interchangeably). Here
//! every grouping level is the same tagged key, [`StatKey`], with
//! `None` fields marking a collapsed (subtotal) level rather than a
//! different tuple shape.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::evidences::EvidenceFilter;
use crate::interaction::{DirSelector, DirectionKey, EffectSelector, Interaction};
use crate::network::{Network, PairKey};
use crate::reference::Reference;

/// A grouping key at one of three levels: full `(interaction_type,
/// data_model, resource)`, the `(interaction_type, data_model)`
/// subtotal, or the bare `interaction_type` total.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatKey {
    pub interaction_type: String,
    pub data_model: Option<String>,
    pub resource: Option<String>,
}

impl StatKey {
    pub fn leaf(interaction_type: impl Into<String>, data_model: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            interaction_type: interaction_type.into(),
            data_model: Some(data_model.into()),
            resource: Some(resource.into()),
        }
    }

    /// The key one level up (resource dropped, then data_model
    /// dropped), or `None` if this key is already the top-level total.
    pub fn parent(&self) -> Option<StatKey> {
        if self.resource.is_some() {
            Some(StatKey {
                interaction_type: self.interaction_type.clone(),
                data_model: self.data_model.clone(),
                resource: None,
            })
        } else if self.data_model.is_some() {
            Some(StatKey {
                interaction_type: self.interaction_type.clone(),
                data_model: None,
                resource: None,
            })
        } else {
            None
        }
    }
}

/// A projection's result set, grouped by [`StatKey`].
#[derive(Debug, Clone)]
pub struct GroupedStats<T> {
    pub values: HashMap<StatKey, HashSet<T>>,
}

impl<T: Clone + Eq + Hash> GroupedStats<T> {
    /// For every leaf key, `shared` = the intersection across every
    /// sibling under the same parent; `unique` = this key's values
    /// minus the union of every sibling's values (§4.5).
    pub fn shared_unique(&self) -> HashMap<StatKey, (HashSet<T>, HashSet<T>)> {
        let mut by_parent: HashMap<StatKey, Vec<&StatKey>> = HashMap::new();
        for key in self.values.keys() {
            if let Some(parent) = key.parent() {
                by_parent.entry(parent).or_default().push(key);
            }
        }

        let mut out = HashMap::new();
        for siblings in by_parent.values() {
            for key in siblings {
                let value = &self.values[*key];
                let mut shared = value.clone();
                let mut peers_union = HashSet::new();
                for other in siblings {
                    if other == key {
                        continue;
                    }
                    let peer = &self.values[*other];
                    shared = shared.intersection(peer).cloned().collect();
                    peers_union.extend(peer.iter().cloned());
                }
                let unique: HashSet<T> = value.difference(&peers_union).cloned().collect();
                out.insert((*key).clone(), (shared, unique));
            }
        }
        out
    }

    /// Unions each key's children into its parent, one level up.
    pub fn subtotals(&self) -> HashMap<StatKey, HashSet<T>> {
        let mut out: HashMap<StatKey, HashSet<T>> = HashMap::new();
        for (key, set) in &self.values {
            if let Some(parent) = key.parent() {
                out.entry(parent).or_default().extend(set.iter().cloned());
            }
        }
        out
    }

    /// Each key's share of its parent's (subtotal) set, as a percentage.
    pub fn percentages(&self) -> HashMap<StatKey, f64> {
        let subtotals = self.subtotals();
        let mut out = HashMap::new();
        for (key, set) in &self.values {
            if let Some(parent) = key.parent()
                && let Some(parent_set) = subtotals.get(&parent)
            {
                let pct = if parent_set.is_empty() {
                    0.0
                } else {
                    (set.len() as f64 / parent_set.len() as f64) * 100.0
                };
                out.insert(key.clone(), pct);
            }
        }
        out
    }
}

fn leaf_keys_for(ia: &Interaction) -> Vec<StatKey> {
    ia.get_resources(DirSelector::All, EffectSelector::None, &EvidenceFilter::default())
        .into_iter()
        .map(|r| StatKey::leaf(r.interaction_type, r.data_model, r.name))
        .collect()
}

/// Groups every interaction's endpoint keys by resource (§4.5 `collect_*`).
pub fn collect_entities(network: &Network) -> GroupedStats<crate::entity::EntityKey> {
    let mut values: HashMap<StatKey, HashSet<crate::entity::EntityKey>> = HashMap::new();
    for (pair, ia) in network.interactions() {
        for key in leaf_keys_for(ia) {
            let entry = values.entry(key).or_default();
            entry.insert(pair.a.clone());
            entry.insert(pair.b.clone());
        }
    }
    GroupedStats { values }
}

/// Groups every interaction's references by resource.
pub fn collect_references(network: &Network) -> GroupedStats<Reference> {
    let mut values: HashMap<StatKey, HashSet<Reference>> = HashMap::new();
    for (_, ia) in network.interactions() {
        for key in leaf_keys_for(ia) {
            let refs = ia.get_references(DirSelector::All, EffectSelector::None, &EvidenceFilter::default());
            values.entry(key).or_default().extend(refs);
        }
    }
    GroupedStats { values }
}

/// Groups distinct `(reference, resource)` curation-effort pairs by resource.
pub fn collect_curation_effort(network: &Network) -> GroupedStats<(Reference, String)> {
    let mut values: HashMap<StatKey, HashSet<(Reference, String)>> = HashMap::new();
    for (_, ia) in network.interactions() {
        for evidence in ia.get_evidences(DirSelector::All, EffectSelector::None, &EvidenceFilter::default()).iter() {
            let key = StatKey::leaf(
                evidence.resource.interaction_type.clone(),
                evidence.resource.data_model.clone(),
                evidence.resource.name.clone(),
            );
            let entry = values.entry(key).or_default();
            for r in &evidence.references {
                entry.insert((r.clone(), evidence.resource.name.clone()));
            }
        }
    }
    GroupedStats { values }
}

/// Groups interactions themselves by resource.
pub fn collect_interactions(network: &Network) -> GroupedStats<PairKey> {
    let mut values: HashMap<StatKey, HashSet<PairKey>> = HashMap::new();
    for (pair, ia) in network.interactions() {
        for key in leaf_keys_for(ia) {
            values.entry(key).or_default().insert(pair.clone());
        }
    }
    GroupedStats { values }
}

/// Like [`collect_interactions`] but restricted to interactions with
/// at least one directed (or mutual, positive, negative) sub-assertion
/// per resource, selected by `select`.
pub fn collect_interactions_where(
    network: &Network,
    select: impl Fn(&Interaction) -> bool,
) -> GroupedStats<PairKey> {
    let mut values: HashMap<StatKey, HashSet<PairKey>> = HashMap::new();
    for (pair, ia) in network.interactions() {
        if !select(ia) {
            continue;
        }
        for key in leaf_keys_for(ia) {
            values.entry(key).or_default().insert(pair.clone());
        }
    }
    GroupedStats { values }
}

/// One row of [`summary_table`]: per-resource entity/reference/interaction
/// counts alongside their shared/unique share within the resource's
/// data model (§B `summaries_tab`).
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub interaction_type: String,
    pub data_model: String,
    pub resource: String,
    pub entities_n: usize,
    pub entities_unique_pct: f64,
    pub references_n: usize,
    pub references_unique_pct: f64,
    pub interactions_n: usize,
    pub interactions_unique_pct: f64,
}

/// Tabular, row-per-resource projection of the entity/reference/
/// interaction group-by statistics, standing in for the source's
/// `summaries_tab` (§B). Unlike the source, this returns the table
/// directly rather than also supporting a file-writing side effect —
/// writing it out is the embedding application's job.
pub fn summary_table(network: &Network) -> Vec<SummaryRow> {
    let entities = collect_entities(network);
    let references = collect_references(network);
    let interactions = collect_interactions(network);

    let entity_pct = entities.percentages();
    let reference_pct = references.percentages();
    let interaction_pct = interactions.percentages();

    let mut keys: Vec<&StatKey> = entities.values.keys().filter(|k| k.resource.is_some()).collect();
    keys.sort_by(|a, b| (&a.interaction_type, &a.data_model, &a.resource).cmp(&(&b.interaction_type, &b.data_model, &b.resource)));

    keys.into_iter()
        .map(|key| SummaryRow {
            interaction_type: key.interaction_type.clone(),
            data_model: key.data_model.clone().unwrap_or_default(),
            resource: key.resource.clone().unwrap_or_default(),
            entities_n: entities.values.get(key).map(|s| s.len()).unwrap_or(0),
            entities_unique_pct: entity_pct.get(key).copied().unwrap_or(0.0),
            references_n: references.values.get(key).map(|s| s.len()).unwrap_or(0),
            references_unique_pct: reference_pct.get(key).copied().unwrap_or(0.0),
            interactions_n: interactions.values.get(key).map(|s| s.len()).unwrap_or(0),
            interactions_unique_pct: interaction_pct.get(key).copied().unwrap_or(0.0),
        })
        .collect()
}

pub fn is_directed(ia: &Interaction) -> bool {
    ia.is_directed(None)
}

pub fn is_mutual(ia: &Interaction) -> bool {
    ia.is_mutual(None)
}

pub fn is_stimulation(ia: &Interaction) -> bool {
    ia.is_stimulation(None, None)
}

pub fn is_inhibition(ia: &Interaction) -> bool {
    ia.is_inhibition(None, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{entity_type, Entity};
    use crate::resource::{Evidence, NetworkResource};

    fn entity(id: &str) -> Entity {
        Entity::new(id, "uniprot", entity_type::PROTEIN, 9606)
    }

    fn network_with_two_resources() -> Network {
        let mut net = Network::new();
        let a = entity("A");
        let b = entity("B");
        let c = entity("C");

        let mut ia1 = Interaction::new(a.clone(), b.clone());
        ia1.add_evidence(
            Evidence::new(
                NetworkResource::primary("r1", "post_translational", "activity_flow"),
                HashSet::from([Reference::new("1").unwrap()]),
            ),
            DirectionKey::Forward,
            None,
        );
        net.add_interaction(a.clone(), b.clone(), ia1, false);

        let mut ia2 = Interaction::new(a.clone(), c.clone());
        ia2.add_evidence(
            Evidence::new(
                NetworkResource::primary("r2", "post_translational", "activity_flow"),
                HashSet::from([Reference::new("1").unwrap(), Reference::new("2").unwrap()]),
            ),
            DirectionKey::Forward,
            None,
        );
        net.add_interaction(a.clone(), c.clone(), ia2, false);

        net
    }

    #[test]
    fn collect_references_groups_by_resource() {
        let net = network_with_two_resources();
        let stats = collect_references(&net);
        let r1_key = StatKey::leaf("post_translational", "activity_flow", "r1");
        let r2_key = StatKey::leaf("post_translational", "activity_flow", "r2");
        assert_eq!(stats.values[&r1_key].len(), 1);
        assert_eq!(stats.values[&r2_key].len(), 2);
    }

    #[test]
    fn shared_and_unique_references_between_siblings() {
        let net = network_with_two_resources();
        let stats = collect_references(&net);
        let r1_key = StatKey::leaf("post_translational", "activity_flow", "r1");
        let r2_key = StatKey::leaf("post_translational", "activity_flow", "r2");

        let shared_unique = stats.shared_unique();
        let (r1_shared, r1_unique) = &shared_unique[&r1_key];
        assert_eq!(*r1_shared, HashSet::from([Reference::new("1").unwrap()]));
        assert!(r1_unique.is_empty());

        let (_, r2_unique) = &shared_unique[&r2_key];
        assert_eq!(*r2_unique, HashSet::from([Reference::new("2").unwrap()]));
    }

    #[test]
    fn summary_table_has_one_row_per_resource_with_counts() {
        let net = network_with_two_resources();
        let table = summary_table(&net);
        assert_eq!(table.len(), 2);
        let r1 = table.iter().find(|r| r.resource == "r1").unwrap();
        assert_eq!(r1.entities_n, 2);
        assert_eq!(r1.references_n, 1);
        assert_eq!(r1.interactions_n, 1);
        let r2 = table.iter().find(|r| r.resource == "r2").unwrap();
        assert_eq!(r2.references_n, 2);
        assert_eq!(r2.references_unique_pct, 100.0);
    }

    #[test]
    fn subtotal_unions_children_and_percentage_is_share_of_it() {
        let net = network_with_two_resources();
        let stats = collect_references(&net);
        let subtotals = stats.subtotals();
        let parent_key = StatKey {
            interaction_type: "post_translational".to_string(),
            data_model: Some("activity_flow".to_string()),
            resource: None,
        };
        assert_eq!(subtotals[&parent_key].len(), 2);

        let pct = stats.percentages();
        let r2_key = StatKey::leaf("post_translational", "activity_flow", "r2");
        assert_eq!(pct[&r2_key], 100.0);
    }
}
