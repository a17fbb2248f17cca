//! Ambient configuration (§A.3). No file/env loader is bundled here —
//! constructing a `NetworkConfig` from whatever source the embedding
//! application prefers is the caller's job.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Knobs that affect ingest policy uniformly across resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Globally overrides every schema's `must_have_references`,
    /// letting reference-free rows through when set.
    pub keep_noref: bool,
    /// Default `to_type` passed to the identifier mapper, keyed by
    /// `entity_type` (§4.2 `default_name_type[entity_type]`).
    pub default_name_types: HashMap<String, String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let mut default_name_types = HashMap::new();
        default_name_types.insert(crate::entity::entity_type::PROTEIN.to_string(), "uniprot".to_string());
        default_name_types.insert(crate::entity::entity_type::COMPLEX.to_string(), "complex".to_string());
        default_name_types.insert(crate::entity::entity_type::MIRNA.to_string(), "mirbase".to_string());
        default_name_types.insert(crate::entity::entity_type::LNCRNA.to_string(), "ensembl".to_string());
        default_name_types.insert(crate::entity::entity_type::SMALL_MOLECULE.to_string(), "pubchem".to_string());

        Self {
            keep_noref: false,
            default_name_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_builtin_entity_type() {
        let cfg = NetworkConfig::default();
        assert!(!cfg.keep_noref);
        assert_eq!(cfg.default_name_types.len(), 5);
    }
}
