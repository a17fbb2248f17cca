//! Row-to-edge ingest pipeline (§4.2). Implements `_read_resource`,
//! the per-row filter/extract stages, identifier translation, and
//! emission into a target [`Network`].

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::NetworkConfig;
use crate::entity::Entity;
use crate::interaction::{DirectionKey, Effect, Interaction};
use crate::network::Network;
use crate::reference::Reference;
use crate::resource::{Evidence, NetworkResource};
use crate::schema::{AttrTransform, InputSchema, IsDirected, RefsSpec, ResourceSpec, TaxonLookup, TaxonSpec};
use crate::translator::{expand_pair, IdentifierMapper};

/// Per-resource ingest counters (§7). Ingest failures are non-fatal by
/// policy — they're tallied here, not returned as `Err`.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub rows_seen: usize,
    pub schema_errors: usize,
    pub parse_errors: usize,
    pub filtered: usize,
    pub missing_references: usize,
    pub dropped_taxon: usize,
    pub unmapped: usize,
    pub edges_emitted: usize,
}

/// Resolves a single named attribute transform to a JSON value.
/// Callers supply the table; an unresolved `Named` transform logs a
/// warning and yields `Value::Null` rather than failing the row.
pub type AttrTransformFn = dyn Fn(&str) -> Value;

pub struct Ingestor<'a> {
    mapper: &'a dyn IdentifierMapper,
    config: &'a NetworkConfig,
    attr_transforms: HashMap<String, Box<AttrTransformFn>>,
}

fn split_values(cell: &str, inner_separator: Option<&str>) -> HashSet<String> {
    match inner_separator {
        Some(sep) => cell.split(sep).map(|s| s.trim().to_string()).collect(),
        None => HashSet::from([cell.trim().to_string()]),
    }
}

impl<'a> Ingestor<'a> {
    pub fn new(mapper: &'a dyn IdentifierMapper, config: &'a NetworkConfig) -> Self {
        Self {
            mapper,
            config,
            attr_transforms: HashMap::new(),
        }
    }

    pub fn with_attr_transform(mut self, name: impl Into<String>, f: Box<AttrTransformFn>) -> Self {
        self.attr_transforms.insert(name.into(), f);
        self
    }

    fn resolve_attr(&self, cell: &str, transform: &AttrTransform) -> Value {
        match transform {
            AttrTransform::Verbatim => Value::String(cell.trim().to_string()),
            AttrTransform::Split { separator } => {
                Value::Array(cell.split(separator.as_str()).map(|s| Value::String(s.trim().to_string())).collect())
            }
            AttrTransform::Named(name) => match self.attr_transforms.get(name) {
                Some(f) => f(cell),
                None => {
                    warn!(transform = %name, "no registered attribute transform; defaulting to null");
                    Value::Null
                }
            },
        }
    }

    fn passes_filters(row: &[String], schema: &InputSchema) -> bool {
        for rule in &schema.negative_filters {
            let Some(cell) = row.get(rule.column) else { return false };
            if !split_values(cell, rule.inner_separator.as_deref()).is_disjoint(&rule.values) {
                return false;
            }
        }
        for rule in &schema.positive_filters {
            let Some(cell) = row.get(rule.column) else { return false };
            if split_values(cell, rule.inner_separator.as_deref()).is_disjoint(&rule.values) {
                return false;
            }
        }
        true
    }

    fn extract_directed(row: &[String], schema: &InputSchema) -> Option<bool> {
        match &schema.is_directed {
            IsDirected::Bool(b) => Some(*b),
            IsDirected::Column {
                column,
                positive_values,
                inner_separator,
            } => {
                let cell = row.get(*column)?;
                Some(!split_values(cell, inner_separator.as_deref()).is_disjoint(positive_values))
            }
        }
    }

    fn extract_signs(row: &[String], schema: &InputSchema) -> (bool, bool, Option<bool>) {
        let Some(sign) = &schema.sign else {
            return (false, false, None);
        };
        let Some(cell) = row.get(sign.column) else {
            return (false, false, None);
        };
        let values = split_values(cell, sign.inner_separator.as_deref());
        let positive = !values.is_disjoint(&sign.positive_values);
        let negative = !values.is_disjoint(&sign.negative_values);
        let directed = if positive || negative { Some(true) } else { None };
        (positive, negative, directed)
    }

    fn extract_references(row: &[String], schema: &InputSchema) -> HashSet<Reference> {
        let spec = match &schema.refs {
            None => return HashSet::new(),
            Some(s) => s,
        };
        let (column, separator) = match spec {
            RefsSpec::Column(c) => (*c, None),
            RefsSpec::ColumnSplit { column, separator } => (*column, Some(separator.as_str())),
        };
        let Some(cell) = row.get(column) else { return HashSet::new() };
        split_values(cell, separator).into_iter().filter_map(|v| Reference::new(&v)).collect()
    }

    fn resolve_taxon(row: &[String], lookup: &TaxonLookup) -> Option<i32> {
        let cell = row.get(lookup.column)?;
        let taxon = match &lookup.dict {
            Some(dict) => *dict.get(cell.trim())?,
            None => cell.trim().parse::<i32>().ok()?,
        };
        if let Some(include) = &lookup.include
            && !include.contains(&taxon)
        {
            return None;
        }
        if let Some(exclude) = &lookup.exclude
            && exclude.contains(&taxon)
        {
            return None;
        }
        Some(taxon)
    }

    fn extract_taxa(row: &[String], schema: &InputSchema) -> Option<(i32, i32)> {
        match &schema.ncbi_tax_id {
            TaxonSpec::Fixed(t) => Some((*t, *t)),
            TaxonSpec::PerEndpoint { a, b } => {
                let ta = Self::resolve_taxon(row, a)?;
                let tb = Self::resolve_taxon(row, b)?;
                Some((ta, tb))
            }
        }
    }

    fn resource_names(row: &[String], schema: &InputSchema) -> Vec<String> {
        match &schema.resource {
            ResourceSpec::Name(_) => Vec::new(),
            ResourceSpec::Column(c) => row.get(*c).map(|cell| vec![cell.trim().to_string()]).unwrap_or_default(),
            ResourceSpec::ColumnSplit { column, separator } => row
                .get(*column)
                .map(|cell| split_values(cell, Some(separator.as_str())).into_iter().collect())
                .unwrap_or_default(),
        }
    }

    /// Runs the full row pipeline (§4.2) over `lines` for `schema`,
    /// merging every accepted row's interaction into `network`.
    pub fn ingest_resource(
        &self,
        schema: &InputSchema,
        lines: impl Iterator<Item = String>,
        network: &mut Network,
        only_directions: bool,
    ) -> IngestReport {
        let mut report = IngestReport::default();

        let Some(separator) = &schema.separator else {
            report.schema_errors += 1;
            warn!(resource = %schema.name, "schema has no separator for line input");
            return report;
        };

        for (index, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            if schema.header && index == 0 {
                continue;
            }
            report.rows_seen += 1;

            let row: Vec<String> = line.split(separator.as_str()).map(|s| s.to_string()).collect();

            if !Self::passes_filters(&row, schema) {
                report.filtered += 1;
                continue;
            }

            let (sign_pos, sign_neg, sign_directed) = Self::extract_signs(&row, schema);
            // `sign` only supplies directedness when `is_directed` is the
            // literal `false` (schema.rs's `IsDirected::Bool(false)`); a
            // column-based `is_directed` is authoritative and is never
            // overridden by a sign match on the same row.
            let directed = match &schema.is_directed {
                IsDirected::Bool(false) => sign_directed.unwrap_or(false),
                _ => match Self::extract_directed(&row, schema) {
                    Some(d) => d,
                    None => {
                        report.parse_errors += 1;
                        continue;
                    }
                },
            };

            let refs = Self::extract_references(&row, schema);
            let must_have_refs = schema.must_have_references && !self.config.keep_noref;
            if must_have_refs && refs.is_empty() {
                report.missing_references += 1;
                continue;
            }

            let Some((taxon_a, taxon_b)) = Self::extract_taxa(&row, schema) else {
                report.dropped_taxon += 1;
                continue;
            };

            let Some(raw_a) = row.get(schema.id_col_a).map(|s| s.trim().to_string()) else {
                report.parse_errors += 1;
                continue;
            };
            let Some(raw_b) = row.get(schema.id_col_b).map(|s| s.trim().to_string()) else {
                report.parse_errors += 1;
                continue;
            };

            let primary = NetworkResource::primary(&schema.name, &schema.interaction_type, &schema.data_model);
            let secondaries: Vec<NetworkResource> = Self::resource_names(&row, schema)
                .into_iter()
                .filter(|name| name != &schema.name && !name.is_empty())
                .map(|name| NetworkResource::secondary(name, &schema.interaction_type, &schema.data_model, &schema.name))
                .collect();

            let to_type_a = self
                .config
                .default_name_types
                .get(&schema.entity_type_a)
                .cloned()
                .unwrap_or_else(|| schema.id_type_a.clone());
            let to_type_b = self
                .config
                .default_name_types
                .get(&schema.entity_type_b)
                .cloned()
                .unwrap_or_else(|| schema.id_type_b.clone());

            let outcome = expand_pair(
                self.mapper,
                &raw_a,
                &schema.id_type_a,
                &to_type_a,
                taxon_a,
                &raw_b,
                &schema.id_type_b,
                &to_type_b,
                taxon_b,
                schema.expand_complexes,
            );
            if outcome.pairs.is_empty() {
                report.unmapped += outcome.unmapped.len();
                debug!(resource = %schema.name, unmapped = ?outcome.unmapped, "endpoint(s) failed identifier mapping");
                continue;
            }

            let node_attrs_a = self.extract_node_attrs(&row, &schema.extra_node_attrs_a);
            let node_attrs_b = self.extract_node_attrs(&row, &schema.extra_node_attrs_b);

            for pair in outcome.pairs {
                let entity_a = Entity::new(pair.id_a, to_type_a.clone(), schema.entity_type_a.clone(), taxon_a)
                    .with_attrs(node_attrs_a.clone());
                let entity_b = Entity::new(pair.id_b, to_type_b.clone(), schema.entity_type_b.clone(), taxon_b)
                    .with_attrs(node_attrs_b.clone());

                let mut ia = Interaction::new(entity_a.clone(), entity_b.clone());
                let forward = ia.raw_order_is_forward(&entity_a, &entity_b);
                let slot = if !directed {
                    DirectionKey::Undirected
                } else if forward {
                    DirectionKey::Forward
                } else {
                    DirectionKey::Reverse
                };

                for resource in std::iter::once(primary.clone()).chain(secondaries.iter().cloned()) {
                    let evidence = Evidence::new(resource, refs.clone());
                    if sign_pos {
                        ia.add_evidence(evidence.clone(), slot, Some(Effect::Positive));
                    }
                    if sign_neg {
                        ia.add_evidence(evidence.clone(), slot, Some(Effect::Negative));
                    }
                    if !sign_pos && !sign_neg {
                        ia.add_evidence(evidence, slot, None);
                    }
                }

                network.add_interaction(entity_a, entity_b, ia, only_directions);
                report.edges_emitted += 1;
            }
        }

        report
    }

    fn extract_node_attrs(&self, row: &[String], specs: &HashMap<String, crate::schema::AttrSpec>) -> HashMap<String, Value> {
        let mut out = HashMap::new();
        for (name, spec) in specs {
            if let Some(cell) = row.get(spec.column) {
                out.insert(name.clone(), self.resolve_attr(cell, &spec.transform));
            }
        }
        out
    }
}
