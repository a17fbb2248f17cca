//! Tabular projection of a [`Network`] (§6.4).

use crate::entity::Entity;
use crate::evidences::EvidenceFilter;
use crate::interaction::{DirSelector, DirectionKey, EffectSelector, Interaction};
use crate::network::Network;
use crate::reference::Reference;
use crate::resource::Evidence;

/// `per_source`: one row per contributing resource, `dmodel`/`sources`
/// scalar. `merged`: one row per (direction, sign) assertion across all
/// contributing resources, `dmodel`/`sources` serialized sets (§6.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFrameMode {
    PerSource,
    Merged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id_a: String,
    pub id_b: String,
    pub type_a: String,
    pub type_b: String,
    pub effect: i8,
    pub interaction_type: String,
    pub data_model: String,
    pub sources: String,
    pub references: String,
}

fn join_sorted<I: IntoIterator<Item = String>>(items: I) -> String {
    let mut v: Vec<String> = items.into_iter().collect();
    v.sort();
    v.dedup();
    v.join("|")
}

fn references_field(refs: &[Reference]) -> String {
    let mut v: Vec<String> = refs.iter().map(|r| r.as_str().to_string()).collect();
    v.sort();
    v.join(",")
}

fn rows_for_direction(ia: &Interaction, a: &Entity, b: &Entity, d: DirectionKey, mode: DataFrameMode, rows: &mut Vec<Row>) {
    let (id_a, id_b, type_a, type_b) = match d {
        DirectionKey::Forward | DirectionKey::Undirected => {
            (a.identifier.clone(), b.identifier.clone(), a.entity_type.clone(), b.entity_type.clone())
        }
        DirectionKey::Reverse => (b.identifier.clone(), a.identifier.clone(), b.entity_type.clone(), a.entity_type.clone()),
    };

    let all = ia.get_evidences(DirSelector::Specific(d), EffectSelector::None, &EvidenceFilter::default());
    if all.is_empty() {
        return;
    }

    let (pos_names, neg_names) = if matches!(d, DirectionKey::Undirected) {
        (Default::default(), Default::default())
    } else {
        (
            ia.get_evidences(DirSelector::Specific(d), EffectSelector::Positive, &EvidenceFilter::default())
                .resource_names(),
            ia.get_evidences(DirSelector::Specific(d), EffectSelector::Negative, &EvidenceFilter::default())
                .resource_names(),
        )
    };

    let mut by_effect: std::collections::HashMap<i8, Vec<Evidence>> = std::collections::HashMap::new();
    for ev in all.iter() {
        let signed_pos = pos_names.contains(&ev.resource.name);
        let signed_neg = neg_names.contains(&ev.resource.name);
        if signed_pos {
            by_effect.entry(1).or_default().push(ev.clone());
        }
        if signed_neg {
            by_effect.entry(-1).or_default().push(ev.clone());
        }
        if !signed_pos && !signed_neg {
            by_effect.entry(0).or_default().push(ev);
        }
    }

    for (effect, evs) in by_effect {
        match mode {
            DataFrameMode::PerSource => {
                for ev in evs {
                    rows.push(Row {
                        id_a: id_a.clone(),
                        id_b: id_b.clone(),
                        type_a: type_a.clone(),
                        type_b: type_b.clone(),
                        effect,
                        interaction_type: ev.resource.interaction_type.clone(),
                        data_model: ev.resource.data_model.clone(),
                        sources: ev.resource.name.clone(),
                        references: references_field(&ev.references.into_iter().collect::<Vec<_>>()),
                    });
                }
            }
            DataFrameMode::Merged => {
                let interaction_type = join_sorted(evs.iter().map(|e| e.resource.interaction_type.clone()));
                let data_model = join_sorted(evs.iter().map(|e| e.resource.data_model.clone()));
                let sources = join_sorted(evs.iter().map(|e| e.resource.name.clone()));
                let references: Vec<Reference> = evs.iter().flat_map(|e| e.references.iter().cloned()).collect();
                rows.push(Row {
                    id_a: id_a.clone(),
                    id_b: id_b.clone(),
                    type_a: type_a.clone(),
                    type_b: type_b.clone(),
                    effect,
                    interaction_type,
                    data_model,
                    sources,
                    references: references_field(&references),
                });
            }
        }
    }
}

/// Projects `network` into rows, iterating interactions in insertion
/// order (§5 Ordering) and, for each, one record per (direction, sign)
/// assertion (§6.4).
pub fn to_rows(network: &Network, mode: DataFrameMode) -> Vec<Row> {
    let mut rows = Vec::new();
    for (_, ia) in network.interactions_in_order() {
        for d in [DirectionKey::Forward, DirectionKey::Reverse, DirectionKey::Undirected] {
            rows_for_direction(ia, ia.a(), ia.b(), d, mode, &mut rows);
        }
    }
    rows
}
