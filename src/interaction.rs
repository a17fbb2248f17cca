//! The merged edge: one unordered endpoint pair with direction- and
//! sign-resolved evidence slots (§3, §4.4).

use std::collections::{HashMap, HashSet};
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::evidences::{EvidenceFilter, Evidences};
use crate::resource::Evidence;

/// One of the three directed "slots" an interaction can file evidence
/// under. `Forward`/`Reverse` are relative to the interaction's
/// canonical `(a, b)` ordering, not to any particular query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionKey {
    Forward,
    Reverse,
    Undirected,
}

impl DirectionKey {
    pub fn opposite(self) -> Option<DirectionKey> {
        match self {
            DirectionKey::Forward => Some(DirectionKey::Reverse),
            DirectionKey::Reverse => Some(DirectionKey::Forward),
            DirectionKey::Undirected => None,
        }
    }
}

/// Stimulatory/inhibitory tag attached to an [`Evidence`] when adding it
/// (§4.4 `add_evidence`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Positive,
    Negative,
}

/// Direction argument to [`Interaction::get_evidences`] and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirSelector {
    All,
    Directed,
    Specific(DirectionKey),
}

/// Effect (sign) argument to [`Interaction::get_evidences`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectSelector {
    None,
    Any,
    Positive,
    Negative,
}

/// Parameters shared by [`Interaction::majority_dir`], `majority_sign`,
/// and `consensus` (§4.4). Counting-method precedence:
/// `by_reference_resource_pairs` > `by_references` > resource count.
#[derive(Debug, Clone, Default)]
pub struct MajorityOptions {
    pub by_references: bool,
    pub by_reference_resource_pairs: bool,
    pub only_primary: bool,
    pub only_interaction_type: Option<HashSet<String>>,
}

impl MajorityOptions {
    fn evidence_filter(&self) -> EvidenceFilter {
        EvidenceFilter {
            via: self.only_primary.then_some(crate::evidences::ViaFilter::PrimaryOnly),
            interaction_type: self.only_interaction_type.clone(),
            ..Default::default()
        }
    }

    fn count(&self, evidences: &Evidences) -> usize {
        let filtered = evidences.filter(&self.evidence_filter());
        if self.by_reference_resource_pairs {
            filtered.count_curation_effort(&EvidenceFilter::default())
        } else if self.by_references {
            filtered.count_references(&EvidenceFilter::default())
        } else {
            filtered.count_resources(&EvidenceFilter::default())
        }
    }
}

/// Result of [`Interaction::majority_dir`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MajorityDirection {
    Forward,
    Reverse,
    /// Neither direction carries any (filtered) directed evidence.
    Undirected,
    /// Forward and reverse counts tie and are both non-zero.
    Tie,
}

/// `[positive, negative]` majority flags for one direction, per
/// `majority_sign` (§4.4): a flag is true iff that sign's count is
/// `>0` and `>=` the other sign's count in the same direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignFlags {
    pub positive: bool,
    pub negative: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsensusSign {
    Positive,
    Negative,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsensusDirected {
    Directed,
    Undirected,
}

/// One row of [`Interaction::consensus`]'s output: `[src, tgt,
/// directed|undirected, positive|negative|unknown]`.
#[derive(Debug, Clone)]
pub struct ConsensusRow {
    pub src: Entity,
    pub tgt: Entity,
    pub directed: ConsensusDirected,
    pub sign: ConsensusSign,
}

/// The merged edge for one unordered endpoint pair (§3). `a` and `b`
/// are fixed at construction in canonical order (`a <= b`) and never
/// mutated afterward (I4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    a: Entity,
    b: Entity,
    evidences: Evidences,
    direction: HashMap<DirectionKey, Evidences>,
    positive: HashMap<DirectionKey, Evidences>,
    negative: HashMap<DirectionKey, Evidences>,
}

impl Interaction {
    /// Builds the (empty) interaction for `x` and `y`, canonicalizing
    /// their order. Returns the canonical `(a, b)` alongside so callers
    /// can tell whether their row's `(src, tgt)` was forward or
    /// reversed relative to it.
    pub fn new(x: Entity, y: Entity) -> Self {
        let (a, b) = if x <= y { (x, y) } else { (y, x) };
        Self {
            a,
            b,
            evidences: Evidences::new(),
            direction: HashMap::new(),
            positive: HashMap::new(),
            negative: HashMap::new(),
        }
    }

    pub fn a(&self) -> &Entity {
        &self.a
    }

    pub fn b(&self) -> &Entity {
        &self.b
    }

    /// True if `(x, y)` in that raw order is the interaction's forward
    /// direction; false if it's the reverse. Panics if neither `x` nor
    /// `y` matches an endpoint — callers are expected to have already
    /// looked this interaction up by its canonical key.
    pub fn raw_order_is_forward(&self, x: &Entity, y: &Entity) -> bool {
        x.key() == self.a.key() && y.key() == self.b.key()
    }

    /// Records one evidence into the direction slot (and, if `effect`
    /// is given, the matching sign slot) plus the top-level `evidences`
    /// index (I1). Sign evidence filed against [`DirectionKey::Undirected`]
    /// is logged and dropped — the data model has no undirected sign slot.
    pub fn add_evidence(&mut self, evidence: Evidence, direction: DirectionKey, effect: Option<Effect>) {
        self.evidences.add(evidence.clone());
        self.direction.entry(direction).or_default().add(evidence.clone());

        match (effect, direction) {
            (Some(_), DirectionKey::Undirected) => {
                tracing::warn!(
                    resource = %evidence.resource.name,
                    "dropping signed evidence filed against the undirected slot"
                );
            }
            (Some(Effect::Positive), d) => {
                self.positive.entry(d).or_default().add(evidence);
            }
            (Some(Effect::Negative), d) => {
                self.negative.entry(d).or_default().add(evidence);
            }
            (None, _) => {}
        }
    }

    /// Unions every slot of `other` into `self`. A no-op (logged) if
    /// `other`'s endpoints don't match (§7 invariant-violation policy).
    pub fn merge(&mut self, other: &Interaction) {
        if self.a.key() != other.a.key() || self.b.key() != other.b.key() {
            tracing::warn!(
                self_a = %self.a.identifier,
                self_b = %self.b.identifier,
                other_a = %other.a.identifier,
                other_b = %other.b.identifier,
                "ignoring merge of interaction with mismatched endpoints"
            );
            return;
        }
        self.evidences += &other.evidences;
        for (k, v) in &other.direction {
            self.direction.entry(*k).or_default().add_assign(v);
        }
        for (k, v) in &other.positive {
            self.positive.entry(*k).or_default().add_assign(v);
        }
        for (k, v) in &other.negative {
            self.negative.entry(*k).or_default().add_assign(v);
        }
    }

    fn slot(&self, map: &HashMap<DirectionKey, Evidences>, key: DirectionKey) -> Evidences {
        map.get(&key).cloned().unwrap_or_default()
    }

    /// §4.3/§4.4: filtered evidence lookup combining a direction
    /// selector with an effect (sign) selector.
    pub fn get_evidences(&self, dir: DirSelector, effect: EffectSelector, filter: &EvidenceFilter) -> Evidences {
        let considered: Vec<DirectionKey> = match dir {
            DirSelector::All | DirSelector::Directed => vec![DirectionKey::Forward, DirectionKey::Reverse],
            DirSelector::Specific(DirectionKey::Undirected) => vec![],
            DirSelector::Specific(k) => vec![k],
        };

        let base = match effect {
            EffectSelector::None => match dir {
                DirSelector::All => self.evidences.clone(),
                DirSelector::Directed => {
                    let mut out = self.slot(&self.direction, DirectionKey::Forward);
                    out += &self.slot(&self.direction, DirectionKey::Reverse);
                    out
                }
                DirSelector::Specific(k) => self.slot(&self.direction, k),
            },
            // Effect "any" is unconditional: union of positive and negative
            // across both directions regardless of `dir` (unlike
            // Positive/Negative below, which do honor `dir`).
            EffectSelector::Any => {
                let mut out = Evidences::new();
                for d in [DirectionKey::Forward, DirectionKey::Reverse] {
                    out += &self.slot(&self.positive, d);
                    out += &self.slot(&self.negative, d);
                }
                out
            }
            EffectSelector::Positive => {
                let mut out = Evidences::new();
                for d in &considered {
                    out += &self.slot(&self.positive, *d);
                }
                out
            }
            EffectSelector::Negative => {
                let mut out = Evidences::new();
                for d in &considered {
                    out += &self.slot(&self.negative, *d);
                }
                out
            }
        };

        base.filter(filter)
    }

    pub fn get_references(&self, dir: DirSelector, effect: EffectSelector, filter: &EvidenceFilter) -> HashSet<crate::reference::Reference> {
        self.get_evidences(dir, effect, filter).references()
    }

    pub fn get_resources(&self, dir: DirSelector, effect: EffectSelector, filter: &EvidenceFilter) -> HashSet<crate::resource::NetworkResource> {
        self.get_evidences(dir, effect, filter).resources()
    }

    pub fn get_resource_names(&self, dir: DirSelector, effect: EffectSelector, filter: &EvidenceFilter) -> HashSet<String> {
        self.get_evidences(dir, effect, filter).resource_names()
    }

    pub fn get_curation_effort(&self, dir: DirSelector, effect: EffectSelector, filter: &EvidenceFilter) -> usize {
        self.get_evidences(dir, effect, filter)
            .count_curation_effort(&EvidenceFilter::default())
    }

    fn resources_intersect(evidences: &Evidences, resources: Option<&HashSet<String>>) -> bool {
        match resources {
            None => !evidences.is_empty(),
            Some(names) => !evidences.resource_names().is_disjoint(names),
        }
    }

    /// True if either directed slot carries evidence (OR semantics when
    /// `resources` is given, per §4.4).
    pub fn is_directed(&self, resources: Option<&HashSet<String>>) -> bool {
        Self::resources_intersect(&self.slot(&self.direction, DirectionKey::Forward), resources)
            || Self::resources_intersect(&self.slot(&self.direction, DirectionKey::Reverse), resources)
    }

    /// True if both directed slots carry evidence (AND semantics when
    /// `resources` is given, per §4.4).
    pub fn is_mutual(&self, resources: Option<&HashSet<String>>) -> bool {
        Self::resources_intersect(&self.slot(&self.direction, DirectionKey::Forward), resources)
            && Self::resources_intersect(&self.slot(&self.direction, DirectionKey::Reverse), resources)
    }

    fn directions_for(direction: Option<DirectionKey>) -> Vec<DirectionKey> {
        match direction {
            Some(d) => vec![d],
            None => vec![DirectionKey::Forward, DirectionKey::Reverse],
        }
    }

    /// True if any considered direction has positive (stimulatory)
    /// evidence. `direction`, when given, restricts to that slot only.
    pub fn is_stimulation(&self, direction: Option<DirectionKey>, resources: Option<&HashSet<String>>) -> bool {
        Self::directions_for(direction)
            .iter()
            .any(|d| Self::resources_intersect(&self.slot(&self.positive, *d), resources))
    }

    /// True if any considered direction has negative (inhibitory)
    /// evidence. `direction`, when given, restricts to that slot only.
    pub fn is_inhibition(&self, direction: Option<DirectionKey>, resources: Option<&HashSet<String>>) -> bool {
        Self::directions_for(direction)
            .iter()
            .any(|d| Self::resources_intersect(&self.slot(&self.negative, *d), resources))
    }

    /// `is_stimulation(direction) || is_inhibition(direction)`, forwarding
    /// `direction` identically to both (the canonical, direction-consistent
    /// form per the resolved ambiguity in the sign-filter call sites).
    pub fn has_sign(&self, direction: Option<DirectionKey>, resources: Option<&HashSet<String>>) -> bool {
        self.is_stimulation(direction, resources) || self.is_inhibition(direction, resources)
    }

    /// Picks the larger of the forward/reverse (filtered) counts.
    /// Ties (both non-zero and equal) resolve to [`MajorityDirection::Tie`];
    /// both zero resolves to [`MajorityDirection::Undirected`].
    pub fn majority_dir(&self, opts: &MajorityOptions) -> MajorityDirection {
        let fwd = opts.count(&self.slot(&self.direction, DirectionKey::Forward));
        let rev = opts.count(&self.slot(&self.direction, DirectionKey::Reverse));
        match fwd.cmp(&rev) {
            std::cmp::Ordering::Greater => MajorityDirection::Forward,
            std::cmp::Ordering::Less => MajorityDirection::Reverse,
            std::cmp::Ordering::Equal if fwd == 0 => MajorityDirection::Undirected,
            std::cmp::Ordering::Equal => MajorityDirection::Tie,
        }
    }

    /// Per-direction `[positive, negative]` majority flags (§4.4).
    pub fn majority_sign(&self, opts: &MajorityOptions) -> HashMap<DirectionKey, SignFlags> {
        let mut out = HashMap::new();
        for d in [DirectionKey::Forward, DirectionKey::Reverse] {
            let pos = opts.count(&self.slot(&self.positive, d));
            let neg = opts.count(&self.slot(&self.negative, d));
            out.insert(
                d,
                SignFlags {
                    positive: pos > 0 && pos >= neg,
                    negative: neg > 0 && neg >= pos,
                },
            );
        }
        out
    }

    /// Combines `majority_dir` and `majority_sign` into explicit rows.
    /// On a direction tie, rows are emitted for *both* directions
    /// (mirroring the documented behavior of emitting both sign rows on
    /// a `majority_sign` tie, rather than silently picking one).
    pub fn consensus(&self, opts: &MajorityOptions) -> Vec<ConsensusRow> {
        let dir = self.majority_dir(opts);
        let directions: Vec<DirectionKey> = match dir {
            MajorityDirection::Forward => vec![DirectionKey::Forward],
            MajorityDirection::Reverse => vec![DirectionKey::Reverse],
            MajorityDirection::Tie => vec![DirectionKey::Forward, DirectionKey::Reverse],
            MajorityDirection::Undirected => vec![],
        };

        if directions.is_empty() {
            return vec![ConsensusRow {
                src: self.a.clone(),
                tgt: self.b.clone(),
                directed: ConsensusDirected::Undirected,
                sign: ConsensusSign::Unknown,
            }];
        }

        let signs = self.majority_sign(opts);
        let mut rows = Vec::new();
        for d in directions {
            let (src, tgt) = match d {
                DirectionKey::Forward => (self.a.clone(), self.b.clone()),
                _ => (self.b.clone(), self.a.clone()),
            };
            let flags = signs.get(&d).copied().unwrap_or_default();
            if !flags.positive && !flags.negative {
                rows.push(ConsensusRow {
                    src,
                    tgt,
                    directed: ConsensusDirected::Directed,
                    sign: ConsensusSign::Unknown,
                });
                continue;
            }
            if flags.positive {
                rows.push(ConsensusRow {
                    src: src.clone(),
                    tgt: tgt.clone(),
                    directed: ConsensusDirected::Directed,
                    sign: ConsensusSign::Positive,
                });
            }
            if flags.negative {
                rows.push(ConsensusRow {
                    src,
                    tgt,
                    directed: ConsensusDirected::Directed,
                    sign: ConsensusSign::Negative,
                });
            }
        }
        rows
    }
}
