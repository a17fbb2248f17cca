//! Depth-bounded path search over a [`Network`]'s adjacency index (§4.5).

use crate::entity::EntityKey;
use crate::evidences::EvidenceFilter;
use crate::interaction::{DirectionKey, EffectSelector};
use crate::network::{Network, PartnerMode};

/// Parameters for [`find_paths`]. The `*_per_hop` vectors give one
/// constraint per hop; a vector shorter than `maxlen` has its last
/// element repeated for the remaining hops, and a longer one is
/// truncated (§4.5).
pub struct PathQuery {
    pub start: EntityKey,
    pub end: Option<EntityKey>,
    pub loops: bool,
    pub mode: PartnerMode,
    pub maxlen: usize,
    pub minlen: usize,
    pub effect_per_hop: Vec<EffectSelector>,
    pub filter_per_hop: Vec<EvidenceFilter>,
    pub direction_per_hop: Vec<Option<DirectionKey>>,
}

impl PathQuery {
    fn effect_at(&self, hop: usize) -> EffectSelector {
        at_hop(&self.effect_per_hop, hop, EffectSelector::None)
    }

    fn filter_at(&self, hop: usize) -> EvidenceFilter {
        at_hop(&self.filter_per_hop, hop, EvidenceFilter::default())
    }

    fn direction_at(&self, hop: usize) -> Option<DirectionKey> {
        at_hop(&self.direction_per_hop, hop, None)
    }
}

fn at_hop<T: Clone>(v: &[T], hop: usize, default: T) -> T {
    if v.is_empty() {
        return default;
    }
    if hop < v.len() {
        v[hop].clone()
    } else {
        v[v.len() - 1].clone()
    }
}

fn should_yield(path: &[EntityKey], query: &PathQuery) -> bool {
    let length = path.len() - 1;
    if length < query.minlen || length > query.maxlen {
        return false;
    }
    if let Some(end) = &query.end {
        return path.last() == Some(end);
    }
    if !query.loops {
        return length == query.maxlen;
    }
    path.first() == path.last()
}

fn dfs(network: &Network, query: &PathQuery, path: &mut Vec<EntityKey>, out: &mut Vec<Vec<EntityKey>>) {
    if should_yield(path, query) {
        out.push(path.clone());
    }

    let length = path.len() - 1;
    if length >= query.maxlen {
        return;
    }

    let current = path.last().unwrap().clone();
    let filter = query.filter_at(length);
    let effect = query.effect_at(length);
    let direction = query.direction_at(length);
    let neighbors = network.partners(&current, query.mode, direction, effect, &filter);

    for neighbor in neighbors {
        let key = neighbor.key();
        if !query.loops && path.contains(&key) {
            continue;
        }
        path.push(key);
        dfs(network, query, path, out);
        path.pop();
    }
}

/// Runs [`PathQuery`] from its `start` node, returning every path
/// (as a sequence of [`EntityKey`]) matching the yield conditions (§4.5).
pub fn find_paths(network: &Network, query: &PathQuery) -> Vec<Vec<EntityKey>> {
    let mut out = Vec::new();
    let mut path = vec![query.start.clone()];
    dfs(network, query, &mut path, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{entity_type, Entity};
    use crate::interaction::{DirectionKey, Interaction};
    use crate::reference::Reference;
    use crate::resource::{Evidence, NetworkResource};

    fn entity(id: &str) -> Entity {
        Entity::new(id, "uniprot", entity_type::PROTEIN, 9606)
    }

    fn directed_ia(a: Entity, b: Entity) -> Interaction {
        let mut ia = Interaction::new(a, b);
        ia.add_evidence(
            Evidence::new(
                NetworkResource::primary("r1", "post_translational", "activity_flow"),
                std::collections::HashSet::from([Reference::new("1").unwrap()]),
            ),
            DirectionKey::Forward,
            None,
        );
        ia
    }

    /// S5: A->B->C->A all directed; find_paths(A, loops=true, minlen=2,
    /// maxlen=3) yields [A,B,C,A] and no shorter loop.
    #[test]
    fn scenario_s5_loop_path_search() {
        let mut net = Network::new();
        let a = entity("A");
        let b = entity("B");
        let c = entity("C");
        net.add_interaction(a.clone(), b.clone(), directed_ia(a.clone(), b.clone()), false);
        net.add_interaction(b.clone(), c.clone(), directed_ia(b.clone(), c.clone()), false);
        net.add_interaction(c.clone(), a.clone(), directed_ia(c.clone(), a.clone()), false);

        let query = PathQuery {
            start: a.key(),
            end: None,
            loops: true,
            mode: PartnerMode::Out,
            maxlen: 3,
            minlen: 2,
            effect_per_hop: vec![],
            filter_per_hop: vec![],
            direction_per_hop: vec![],
        };
        let paths = find_paths(&net, &query);

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0], vec![a.key(), b.key(), c.key(), a.key()]);
    }

    #[test]
    fn loops_false_excludes_already_visited_nodes() {
        let mut net = Network::new();
        let a = entity("A");
        let b = entity("B");
        let c = entity("C");
        net.add_interaction(a.clone(), b.clone(), directed_ia(a.clone(), b.clone()), false);
        net.add_interaction(b.clone(), c.clone(), directed_ia(b.clone(), c.clone()), false);
        net.add_interaction(c.clone(), a.clone(), directed_ia(c.clone(), a.clone()), false);

        let query = PathQuery {
            start: a.key(),
            end: None,
            loops: false,
            mode: PartnerMode::Out,
            maxlen: 3,
            minlen: 1,
            effect_per_hop: vec![],
            filter_per_hop: vec![],
            direction_per_hop: vec![],
        };
        let paths = find_paths(&net, &query);
        assert!(paths.iter().all(|p| {
            let mut seen = std::collections::HashSet::new();
            p.iter().all(|k| seen.insert(k.clone()))
        }));
    }

    /// An explicit `direction_per_hop` restricts traversal to only the
    /// named canonical direction, independent of `mode`.
    #[test]
    fn direction_per_hop_restricts_to_canonical_direction() {
        let mut net = Network::new();
        let a = entity("A");
        let b = entity("B");
        net.add_interaction(a.clone(), b.clone(), directed_ia(a.clone(), b.clone()), false);

        let query = PathQuery {
            start: a.key(),
            end: None,
            loops: false,
            mode: PartnerMode::In,
            maxlen: 1,
            minlen: 1,
            effect_per_hop: vec![],
            filter_per_hop: vec![],
            direction_per_hop: vec![Some(DirectionKey::Forward)],
        };
        let paths = find_paths(&net, &query);
        assert_eq!(paths, vec![vec![a.key(), b.key()]]);
    }
}
