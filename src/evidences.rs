//! The evidence algebra: union, filter, and count operations over sets
//! of [`Evidence`] (§4.3).

use std::collections::{HashMap, HashSet};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::reference::Reference;
use crate::resource::{Evidence, NetworkResource};

/// Constrains [`Evidences::filter`]'s `via` dimension (§4.3):
/// unconstrained, primary-only, secondary-only, or secondary-via-named-primary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViaFilter {
    PrimaryOnly,
    SecondaryOnly,
    Named(String),
}

/// The constraints accepted by [`Evidences::filter`]. Every field
/// defaults to "unconstrained"; `Default` gives the no-op filter.
#[derive(Debug, Clone, Default)]
pub struct EvidenceFilter {
    pub resources: Option<HashSet<String>>,
    pub interaction_type: Option<HashSet<String>>,
    pub data_model: Option<HashSet<String>>,
    pub references: Option<HashSet<Reference>>,
    pub via: Option<ViaFilter>,
}

impl EvidenceFilter {
    pub fn is_empty(&self) -> bool {
        self.resources.is_none()
            && self.interaction_type.is_none()
            && self.data_model.is_none()
            && self.references.is_none()
            && self.via.is_none()
    }

    fn matches(&self, ev: &Evidence) -> bool {
        if let Some(resources) = &self.resources
            && !resources.contains(&ev.resource.name)
        {
            return false;
        }
        if let Some(itypes) = &self.interaction_type
            && !itypes.contains(&ev.resource.interaction_type)
        {
            return false;
        }
        if let Some(dmodels) = &self.data_model
            && !dmodels.contains(&ev.resource.data_model)
        {
            return false;
        }
        if let Some(refs) = &self.references
            && ev.references.is_disjoint(refs)
        {
            return false;
        }
        match &self.via {
            None => {}
            Some(ViaFilter::PrimaryOnly) => {
                if ev.resource.via.is_some() {
                    return false;
                }
            }
            Some(ViaFilter::SecondaryOnly) => {
                if ev.resource.via.is_none() {
                    return false;
                }
            }
            Some(ViaFilter::Named(primary)) => {
                if ev.resource.via.as_deref() != Some(primary.as_str()) {
                    return false;
                }
            }
        }
        true
    }
}

/// A set of [`Evidence`], indexed by resource for O(1) merge (§3). At
/// most one `Evidence` per distinct [`NetworkResource`] value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Evidences {
    by_resource: HashMap<NetworkResource, HashSet<Reference>>,
}

impl Evidences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_evidence(ev: Evidence) -> Self {
        let mut out = Self::new();
        out.add(ev);
        out
    }

    pub fn is_empty(&self) -> bool {
        self.by_resource.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_resource.len()
    }

    /// Adds one evidence, unioning references if its resource already
    /// has an entry.
    pub fn add(&mut self, ev: Evidence) {
        self.by_resource
            .entry(ev.resource)
            .or_default()
            .extend(ev.references);
    }

    pub fn iter(&self) -> impl Iterator<Item = Evidence> + '_ {
        self.by_resource.iter().map(|(resource, refs)| Evidence {
            resource: resource.clone(),
            references: refs.clone(),
        })
    }

    /// Returns a new `Evidences` keeping only evidences matching every
    /// supplied constraint.
    pub fn filter(&self, f: &EvidenceFilter) -> Evidences {
        if f.is_empty() {
            return self.clone();
        }
        let mut out = Evidences::new();
        for ev in self.iter() {
            if f.matches(&ev) {
                out.add(ev);
            }
        }
        out
    }

    pub fn count_resources(&self, f: &EvidenceFilter) -> usize {
        self.filter(f).by_resource.len()
    }

    pub fn count_references(&self, f: &EvidenceFilter) -> usize {
        self.filter(f)
            .by_resource
            .values()
            .flat_map(|refs| refs.iter())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Cardinality of distinct `(reference, resource)` pairs (§GLOSSARY).
    pub fn count_curation_effort(&self, f: &EvidenceFilter) -> usize {
        self.filter(f)
            .by_resource
            .values()
            .map(|refs| refs.len())
            .sum()
    }

    pub fn resource_names(&self) -> HashSet<String> {
        self.by_resource.keys().map(|r| r.name.clone()).collect()
    }

    pub fn resources(&self) -> HashSet<NetworkResource> {
        self.by_resource.keys().cloned().collect()
    }

    pub fn references(&self) -> HashSet<Reference> {
        self.by_resource
            .values()
            .flat_map(|refs| refs.iter().cloned())
            .collect()
    }
}

impl AddAssign<Evidence> for Evidences {
    fn add_assign(&mut self, rhs: Evidence) {
        self.add(rhs);
    }
}

impl AddAssign<&Evidences> for Evidences {
    fn add_assign(&mut self, rhs: &Evidences) {
        for ev in rhs.iter() {
            self.add(ev);
        }
    }
}

impl AddAssign<Evidences> for Evidences {
    fn add_assign(&mut self, rhs: Evidences) {
        *self += &rhs;
    }
}

impl Add for Evidences {
    type Output = Evidences;
    fn add(mut self, rhs: Evidences) -> Evidences {
        self += rhs;
        self
    }
}

impl Add<&Evidences> for Evidences {
    type Output = Evidences;
    fn add(mut self, rhs: &Evidences) -> Evidences {
        self += rhs;
        self
    }
}

impl Sum for Evidences {
    fn sum<I: Iterator<Item = Evidences>>(iter: I) -> Evidences {
        iter.fold(Evidences::new(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Evidences> for Evidences {
    fn sum<I: Iterator<Item = &'a Evidences>>(iter: I) -> Evidences {
        iter.fold(Evidences::new(), |acc, x| acc + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(name: &str, refs: &[&str]) -> Evidence {
        Evidence::new(
            NetworkResource::primary(name, "post_translational", "activity_flow"),
            refs.iter().map(|r| Reference::new(r).unwrap()).collect(),
        )
    }

    #[test]
    fn add_same_resource_unions_references() {
        let mut es = Evidences::new();
        es.add(ev("DB", &["1"]));
        es.add(ev("DB", &["2"]));
        assert_eq!(es.len(), 1);
        assert_eq!(es.count_references(&EvidenceFilter::default()), 2);
    }

    #[test]
    fn distinct_resources_stay_separate() {
        let mut es = Evidences::new();
        es.add(ev("A", &["1"]));
        es.add(ev("B", &["1"]));
        assert_eq!(es.len(), 2);
        assert_eq!(es.count_curation_effort(&EvidenceFilter::default()), 2);
    }

    #[test]
    fn filter_by_resource_name() {
        let mut es = Evidences::new();
        es.add(ev("A", &["1"]));
        es.add(ev("B", &["2"]));
        let f = EvidenceFilter {
            resources: Some(HashSet::from(["A".to_string()])),
            ..Default::default()
        };
        let filtered = es.filter(&f);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.resource_names(), HashSet::from(["A".to_string()]));
    }

    #[test]
    fn via_filters_select_primary_secondary_and_named() {
        let mut es = Evidences::new();
        es.add(Evidence::new(
            NetworkResource::primary("Prim", "post_translational", "activity_flow"),
            HashSet::from([Reference::new("1").unwrap()]),
        ));
        es.add(Evidence::new(
            NetworkResource::secondary("Sec", "post_translational", "activity_flow", "Prim"),
            HashSet::from([Reference::new("2").unwrap()]),
        ));

        let primary_only = es.filter(&EvidenceFilter {
            via: Some(ViaFilter::PrimaryOnly),
            ..Default::default()
        });
        assert_eq!(primary_only.resource_names(), HashSet::from(["Prim".to_string()]));

        let secondary_only = es.filter(&EvidenceFilter {
            via: Some(ViaFilter::SecondaryOnly),
            ..Default::default()
        });
        assert_eq!(secondary_only.resource_names(), HashSet::from(["Sec".to_string()]));

        let named = es.filter(&EvidenceFilter {
            via: Some(ViaFilter::Named("Prim".to_string())),
            ..Default::default()
        });
        assert_eq!(named.resource_names(), HashSet::from(["Sec".to_string()]));
    }

    #[test]
    fn sum_over_iterator_unions_all() {
        let mut a = Evidences::new();
        a.add(ev("A", &["1"]));
        let mut b = Evidences::new();
        b.add(ev("B", &["2"]));
        let total: Evidences = vec![a, b].into_iter().sum();
        assert_eq!(total.len(), 2);
    }
}
