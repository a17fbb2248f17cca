//! Per-resource declarative input schema (§4.1).
//!
//! The source system overloads several fields with "bool, or a tuple"
//! / "name, or column index, or (column, separator)" shapes. Each is
//! modeled here as an explicit tagged enum rather than carried through
//! as untyped data (§9 REDESIGN FLAGS).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A 0-based column index into a tokenized row.
pub type ColumnIndex = usize;

/// `is_directed` (§4.1): either every row is (un)directed, or
/// directedness is derived from a column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IsDirected {
    Bool(bool),
    Column {
        column: ColumnIndex,
        positive_values: HashSet<String>,
        inner_separator: Option<String>,
    },
}

/// `sign` (§4.1): absent, or a column yielding positive/negative value
/// sets. The same column may double as the direction source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignSpec {
    pub column: ColumnIndex,
    pub positive_values: HashSet<String>,
    pub negative_values: HashSet<String>,
    pub inner_separator: Option<String>,
}

/// `refs` (§4.1): absent, a single column, or `(column, separator)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RefsSpec {
    Column(ColumnIndex),
    ColumnSplit { column: ColumnIndex, separator: String },
}

/// One endpoint's half of `ncbi_tax_id` (§4.1): a column to read, an
/// optional raw-value -> taxon lookup table (absent means "parse the
/// cell as an integer directly"), and optional include/exclude taxon
/// allow/deny lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonLookup {
    pub column: ColumnIndex,
    pub dict: Option<std::collections::HashMap<String, i32>>,
    pub include: Option<HashSet<i32>>,
    pub exclude: Option<HashSet<i32>>,
}

/// `ncbi_tax_id` (§4.1): one fixed taxon for both endpoints, or a
/// per-endpoint lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TaxonSpec {
    Fixed(i32),
    PerEndpoint { a: TaxonLookup, b: TaxonLookup },
}

/// `resource` (§4.1): the row's secondary-resource name source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResourceSpec {
    Name(String),
    Column(ColumnIndex),
    ColumnSplit { column: ColumnIndex, separator: String },
}

/// One entry of `positive_filters` / `negative_filters` (§4.1): a row
/// is examined by splitting `column` on `inner_separator` and checking
/// the resulting set against `values`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRule {
    pub column: ColumnIndex,
    pub values: HashSet<String>,
    pub inner_separator: Option<String>,
}

/// How to derive one extra attribute's value from a cell (§4.1):
/// verbatim, split into a list, or run through a named transform
/// resolved by the caller (the schema only carries the transform's
/// name — evaluating it is an ingest-time concern, §4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AttrTransform {
    Verbatim,
    Split { separator: String },
    Named(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttrSpec {
    pub column: ColumnIndex,
    pub transform: AttrTransform,
}

/// The full per-resource declarative schema (§4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSchema {
    pub id_col_a: ColumnIndex,
    pub id_col_b: ColumnIndex,
    pub id_type_a: String,
    pub id_type_b: String,
    pub entity_type_a: String,
    pub entity_type_b: String,
    /// Field separator for raw-line input; unused when rows arrive
    /// pre-tokenized.
    pub separator: Option<String>,
    pub header: bool,
    pub is_directed: IsDirected,
    pub sign: Option<SignSpec>,
    pub refs: Option<RefsSpec>,
    pub ncbi_tax_id: TaxonSpec,
    pub resource: ResourceSpec,
    pub positive_filters: Vec<FilterRule>,
    pub negative_filters: Vec<FilterRule>,
    pub extra_edge_attrs: std::collections::HashMap<String, AttrSpec>,
    pub extra_node_attrs_a: std::collections::HashMap<String, AttrSpec>,
    pub extra_node_attrs_b: std::collections::HashMap<String, AttrSpec>,
    pub expand_complexes: bool,
    pub must_have_references: bool,
    pub huge: bool,
    /// The interaction type this resource's rows are tagged with
    /// (§GLOSSARY); carried on the schema rather than inferred so
    /// `NetworkResource` construction never needs a side lookup.
    pub interaction_type: String,
    pub data_model: String,
    /// The resource's own name; secondary names from `resource`, when
    /// column-derived, are filed with `via = Some(name)`.
    pub name: String,
}

impl InputSchema {
    pub fn is_undirected_only(&self) -> bool {
        matches!(self.is_directed, IsDirected::Bool(false)) && self.sign.is_none()
    }
}
