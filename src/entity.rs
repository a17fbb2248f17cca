//! Molecular entities: the nodes of the interaction network.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The identifying, immutable fields of an [`Entity`].
///
/// Two entities are equal, hashed, and ordered solely by this tuple;
/// `label` and `attrs` never participate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityKey {
    pub identifier: String,
    pub id_type: String,
    pub entity_type: String,
    pub taxon: i32,
}

/// Well-known `entity_type` values. The set is open — any string is a
/// valid entity type — these are just the ones this crate treats
/// specially in a few places (`organisms_check`'s complex/lncrna
/// carve-out).
pub mod entity_type {
    pub const PROTEIN: &str = "protein";
    pub const COMPLEX: &str = "complex";
    pub const MIRNA: &str = "mirna";
    pub const LNCRNA: &str = "lncrna";
    pub const SMALL_MOLECULE: &str = "small_molecule";
}

/// A molecular node: a protein, complex, miRNA, lncRNA, small molecule, etc.
///
/// Equality and hashing are defined on `(identifier, id_type,
/// entity_type, taxon)` only (§3); `label` and `attrs` are mutable and
/// merged on collision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub identifier: String,
    pub id_type: String,
    pub entity_type: String,
    pub taxon: i32,
    pub label: Option<String>,
    pub attrs: HashMap<String, Value>,
}

impl Entity {
    pub fn new(
        identifier: impl Into<String>,
        id_type: impl Into<String>,
        entity_type: impl Into<String>,
        taxon: i32,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            id_type: id_type.into(),
            entity_type: entity_type.into(),
            taxon,
            label: None,
            attrs: HashMap::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_attrs(mut self, attrs: HashMap<String, Value>) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn key(&self) -> EntityKey {
        EntityKey {
            identifier: self.identifier.clone(),
            id_type: self.id_type.clone(),
            entity_type: self.entity_type.clone(),
            taxon: self.taxon,
        }
    }

    /// Merges `other` into `self`. Attribute maps are unioned, preferring
    /// non-null values already present; `label` is stable once set (§3).
    pub fn merge(&mut self, other: &Entity) {
        if self.label.is_none() {
            self.label = other.label.clone();
        }
        for (k, v) in &other.attrs {
            match self.attrs.get(k) {
                Some(existing) if !existing.is_null() => {}
                _ => {
                    self.attrs.insert(k.clone(), v.clone());
                }
            }
        }
    }

    pub fn is_loop_partner(&self, other: &Entity) -> bool {
        self.key() == other.key()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
            && self.id_type == other.id_type
            && self.entity_type == other.entity_type
            && self.taxon == other.taxon
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
        self.id_type.hash(state);
        self.entity_type.hash(state);
        self.taxon.hash(state);
    }
}

impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}
