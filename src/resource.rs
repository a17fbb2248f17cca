//! Provenance: which curated resource backs an assertion, and with what
//! literature support.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::reference::Reference;

/// A provenance descriptor for one curated resource contributing to the
/// network. Equal iff `(name, interaction_type, data_model, via)` are
/// all equal (§3). A resource with `via = Some(primary)` is secondary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkResource {
    pub name: String,
    pub interaction_type: String,
    pub data_model: String,
    pub via: Option<String>,
}

impl NetworkResource {
    pub fn primary(
        name: impl Into<String>,
        interaction_type: impl Into<String>,
        data_model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            interaction_type: interaction_type.into(),
            data_model: data_model.into(),
            via: None,
        }
    }

    pub fn secondary(
        name: impl Into<String>,
        interaction_type: impl Into<String>,
        data_model: impl Into<String>,
        via: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            interaction_type: interaction_type.into(),
            data_model: data_model.into(),
            via: Some(via.into()),
        }
    }

    pub fn is_secondary(&self) -> bool {
        self.via.is_some()
    }
}

/// One `(resource, references)` pair. Equality and hashing are on
/// `resource` alone (§3) — two `Evidence`s for the same resource are
/// "the same evidence" regardless of which references they carry,
/// which is what lets [`Evidences`](crate::evidences::Evidences) index
/// by resource for O(1) merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub resource: NetworkResource,
    pub references: HashSet<Reference>,
}

impl Evidence {
    pub fn new(resource: NetworkResource, references: HashSet<Reference>) -> Self {
        Self {
            resource,
            references,
        }
    }

    /// Unions `other`'s references into `self`. Callers are expected to
    /// have already checked `self.resource == other.resource`; this is
    /// purely a references merge, mirroring the Python `Evidence.__iadd__`.
    pub fn merge_references(&mut self, other: &Evidence) {
        self.references.extend(other.references.iter().cloned());
    }
}

impl PartialEq for Evidence {
    fn eq(&self, other: &Self) -> bool {
        self.resource == other.resource
    }
}

impl Eq for Evidence {}

impl Hash for Evidence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resource.hash(state);
    }
}
