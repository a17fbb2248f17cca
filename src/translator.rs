//! Adapter over the external identifier-mapping collaborator (§6.2).

use std::collections::HashSet;

/// External identifier-mapping collaborator. Implementations wrap
/// whatever lookup table or service resolves one raw identifier to a
/// set of canonical identifiers. Contract (§6.2): returns the empty set
/// on failure; never panics.
pub trait IdentifierMapper {
    fn map_name(
        &self,
        name: &str,
        from_type: &str,
        to_type: &str,
        taxon: i32,
        expand_complexes: bool,
    ) -> HashSet<String>;
}

/// One fully expanded endpoint pair, produced by [`expand_pair`]'s
/// cartesian product.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedPair {
    pub id_a: String,
    pub id_b: String,
}

/// Result of translating one row's two raw endpoints. `unmapped` lists
/// which raw identifiers (if any) failed to resolve — populated when
/// `pairs` is empty, per §4.2.
#[derive(Debug, Clone, Default)]
pub struct TranslationOutcome {
    pub pairs: Vec<ExpandedPair>,
    pub unmapped: Vec<String>,
}

/// Resolves both endpoints independently and emits one [`ExpandedPair`]
/// per element of the cartesian product (§4.2). If either endpoint's
/// mapped set is empty, the raw id is recorded in `unmapped` and no
/// pairs are produced — a row can't be half-translated.
#[allow(clippy::too_many_arguments)]
pub fn expand_pair(
    mapper: &dyn IdentifierMapper,
    raw_a: &str,
    from_type_a: &str,
    to_type_a: &str,
    taxon_a: i32,
    raw_b: &str,
    from_type_b: &str,
    to_type_b: &str,
    taxon_b: i32,
    expand_complexes: bool,
) -> TranslationOutcome {
    let mapped_a = mapper.map_name(raw_a, from_type_a, to_type_a, taxon_a, expand_complexes);
    let mapped_b = mapper.map_name(raw_b, from_type_b, to_type_b, taxon_b, expand_complexes);

    let mut outcome = TranslationOutcome::default();
    if mapped_a.is_empty() {
        outcome.unmapped.push(raw_a.to_string());
    }
    if mapped_b.is_empty() {
        outcome.unmapped.push(raw_b.to_string());
    }
    if mapped_a.is_empty() || mapped_b.is_empty() {
        return outcome;
    }

    for a in &mapped_a {
        for b in &mapped_b {
            outcome.pairs.push(ExpandedPair {
                id_a: a.clone(),
                id_b: b.clone(),
            });
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticMapper;
    impl IdentifierMapper for StaticMapper {
        fn map_name(&self, name: &str, _from: &str, _to: &str, _taxon: i32, _expand: bool) -> HashSet<String> {
            match name {
                "CPX1" => HashSet::from(["P1".to_string(), "P2".to_string()]),
                "P3" => HashSet::from(["P3".to_string()]),
                _ => HashSet::new(),
            }
        }
    }

    /// S3: complex expansion, id_a -> {P1,P2}, id_b -> {P3}.
    #[test]
    fn scenario_s3_complex_expansion() {
        let mapper = StaticMapper;
        let outcome = expand_pair(&mapper, "CPX1", "uniprot", "uniprot", 9606, "P3", "uniprot", "uniprot", 9606, true);
        assert!(outcome.unmapped.is_empty());
        let mut pairs: Vec<(String, String)> = outcome.pairs.into_iter().map(|p| (p.id_a, p.id_b)).collect();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![("P1".to_string(), "P3".to_string()), ("P2".to_string(), "P3".to_string())]
        );
    }

    #[test]
    fn unmapped_endpoint_yields_no_pairs() {
        let mapper = StaticMapper;
        let outcome = expand_pair(&mapper, "???", "uniprot", "uniprot", 9606, "P3", "uniprot", "uniprot", 9606, true);
        assert!(outcome.pairs.is_empty());
        assert_eq!(outcome.unmapped, vec!["???".to_string()]);
    }
}
