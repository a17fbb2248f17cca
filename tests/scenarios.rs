//! End-to-end scenarios exercising ingest, merge, and query together.

use std::collections::HashSet;

use interaction_network::dataframe::{to_rows, DataFrameMode};
use interaction_network::entity::{entity_type, Entity};
use interaction_network::evidences::EvidenceFilter;
use interaction_network::ingest::Ingestor;
use interaction_network::interaction::{DirSelector, DirectionKey, EffectSelector};
use interaction_network::network::Network;
use interaction_network::schema::{InputSchema, IsDirected, RefsSpec, ResourceSpec, SignSpec, TaxonSpec};
use interaction_network::translator::IdentifierMapper;
use interaction_network::NetworkConfig;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

struct IdentityMapper;
impl IdentifierMapper for IdentityMapper {
    fn map_name(&self, name: &str, _from: &str, _to: &str, _taxon: i32, _expand: bool) -> HashSet<String> {
        if name.is_empty() {
            HashSet::new()
        } else {
            HashSet::from([name.to_string()])
        }
    }
}

struct ComplexMapper;
impl IdentifierMapper for ComplexMapper {
    fn map_name(&self, name: &str, _from: &str, _to: &str, _taxon: i32, _expand: bool) -> HashSet<String> {
        match name {
            "CPX1" => HashSet::from(["P1".to_string(), "P2".to_string()]),
            other => HashSet::from([other.to_string()]),
        }
    }
}

fn undirected_schema(name: &str, refs_col: usize) -> InputSchema {
    InputSchema {
        id_col_a: 0,
        id_col_b: 1,
        id_type_a: "uniprot".into(),
        id_type_b: "uniprot".into(),
        entity_type_a: entity_type::PROTEIN.into(),
        entity_type_b: entity_type::PROTEIN.into(),
        separator: Some("\t".into()),
        header: false,
        is_directed: IsDirected::Bool(false),
        sign: None,
        refs: Some(RefsSpec::Column(refs_col)),
        ncbi_tax_id: TaxonSpec::Fixed(9606),
        resource: ResourceSpec::Name(name.into()),
        positive_filters: vec![],
        negative_filters: vec![],
        extra_edge_attrs: Default::default(),
        extra_node_attrs_a: Default::default(),
        extra_node_attrs_b: Default::default(),
        expand_complexes: true,
        must_have_references: false,
        huge: false,
        interaction_type: "post_translational".into(),
        data_model: "activity_flow".into(),
        name: name.into(),
    }
}

fn directed_schema(name: &str, refs_col: usize) -> InputSchema {
    InputSchema {
        is_directed: IsDirected::Bool(true),
        ..undirected_schema(name, refs_col)
    }
}

/// S1: two resources, one directed, one undirected, same pair.
#[test]
fn scenario_s1_two_resources_mixed_direction() {
    init_tracing();
    let mapper = IdentityMapper;
    let config = NetworkConfig::default();
    let ingestor = Ingestor::new(&mapper, &config);
    let mut net = Network::new();

    let r1 = directed_schema("r1", 2);
    ingestor.ingest_resource(&r1, vec!["A\tB\t100".to_string()].into_iter(), &mut net, false);

    let r2 = undirected_schema("r2", 2);
    ingestor.ingest_resource(&r2, vec!["A\tB\t200".to_string()].into_iter(), &mut net, false);

    assert_eq!(net.vcount(), 2);
    assert_eq!(net.ecount(), 1);

    let a = Entity::new("A", "uniprot", entity_type::PROTEIN, 9606);
    let b = Entity::new("B", "uniprot", entity_type::PROTEIN, 9606);
    let ia = net.interaction(&a.key(), &b.key()).unwrap();
    assert!(ia.is_directed(None));
    assert!(!ia.is_mutual(None));

    let fwd_refs = ia.get_references(DirSelector::Specific(DirectionKey::Forward), EffectSelector::None, &EvidenceFilter::default());
    assert_eq!(fwd_refs.len(), 1);
    assert_eq!(fwd_refs.iter().next().unwrap().as_str(), "100");

    let undirected_refs = ia.get_references(
        DirSelector::Specific(DirectionKey::Undirected),
        EffectSelector::None,
        &EvidenceFilter::default(),
    );
    assert_eq!(undirected_refs.len(), 1);
    assert_eq!(undirected_refs.iter().next().unwrap().as_str(), "200");
}

/// S2: sign disagreement between two resources on the same direction.
#[test]
fn scenario_s2_sign_disagreement() {
    init_tracing();
    let mapper = IdentityMapper;
    let config = NetworkConfig::default();
    let ingestor = Ingestor::new(&mapper, &config);
    let mut net = Network::new();

    let mut r1 = directed_schema("r1", 3);
    r1.sign = Some(SignSpec {
        column: 2,
        positive_values: HashSet::from(["stimulation".to_string()]),
        negative_values: HashSet::from(["inhibition".to_string()]),
        inner_separator: None,
    });
    ingestor.ingest_resource(&r1, vec!["A\tB\tstimulation\t1".to_string()].into_iter(), &mut net, false);

    let mut r2 = directed_schema("r2", 3);
    r2.sign = Some(SignSpec {
        column: 2,
        positive_values: HashSet::from(["stimulation".to_string()]),
        negative_values: HashSet::from(["inhibition".to_string()]),
        inner_separator: None,
    });
    ingestor.ingest_resource(&r2, vec!["A\tB\tinhibition\t2".to_string()].into_iter(), &mut net, false);

    let a = Entity::new("A", "uniprot", entity_type::PROTEIN, 9606);
    let b = Entity::new("B", "uniprot", entity_type::PROTEIN, 9606);
    let ia = net.interaction(&a.key(), &b.key()).unwrap();

    assert!(ia.has_sign(None, None));
    assert!(ia.is_stimulation(None, None));
    assert!(ia.is_inhibition(None, None));

    let signs = ia.majority_sign(&Default::default());
    let fwd = signs.get(&DirectionKey::Forward).copied().unwrap();
    assert!(fwd.positive && fwd.negative);

    let rows = ia.consensus(&Default::default());
    assert!(rows.iter().any(|r| r.sign == interaction_network::interaction::ConsensusSign::Positive));
    assert!(rows.iter().any(|r| r.sign == interaction_network::interaction::ConsensusSign::Negative));
}

/// S3: complex expansion produces two interactions from one row.
#[test]
fn scenario_s3_complex_expansion() {
    init_tracing();
    let mapper = ComplexMapper;
    let config = NetworkConfig::default();
    let ingestor = Ingestor::new(&mapper, &config);
    let mut net = Network::new();

    let schema = directed_schema("r1", 2);
    ingestor.ingest_resource(&schema, vec!["CPX1\tP3\t1".to_string()].into_iter(), &mut net, false);

    assert_eq!(net.ecount(), 2);
    let p1 = Entity::new("P1", "uniprot", entity_type::PROTEIN, 9606);
    let p2 = Entity::new("P2", "uniprot", entity_type::PROTEIN, 9606);
    let p3 = Entity::new("P3", "uniprot", entity_type::PROTEIN, 9606);
    assert!(net.interaction(&p1.key(), &p3.key()).is_some());
    assert!(net.interaction(&p2.key(), &p3.key()).is_some());
}

/// S6: only_directions augments an existing undirected interaction
/// without creating any new ones.
#[test]
fn scenario_s6_only_directions() {
    init_tracing();
    let mapper = IdentityMapper;
    let config = NetworkConfig::default();
    let ingestor = Ingestor::new(&mapper, &config);
    let mut net = Network::new();

    let r1 = undirected_schema("r1", 2);
    ingestor.ingest_resource(&r1, vec!["A\tB\t1".to_string()].into_iter(), &mut net, false);

    let r3 = directed_schema("r3", 2);
    ingestor.ingest_resource(&r3, vec!["A\tB\t2".to_string()].into_iter(), &mut net, true);

    assert_eq!(net.vcount(), 2);
    assert_eq!(net.ecount(), 1);

    let a = Entity::new("A", "uniprot", entity_type::PROTEIN, 9606);
    let b = Entity::new("B", "uniprot", entity_type::PROTEIN, 9606);
    let ia = net.interaction(&a.key(), &b.key()).unwrap();
    assert!(ia.is_directed(None));
    let fwd_resources = ia.get_resource_names(DirSelector::Specific(DirectionKey::Forward), EffectSelector::None, &EvidenceFilter::default());
    assert_eq!(fwd_resources, HashSet::from(["r3".to_string()]));
}

/// Dataframe projection round-trips through ingest without panicking
/// and produces one row per signed directed assertion.
#[test]
fn dataframe_projection_covers_signed_rows() {
    init_tracing();
    let mapper = IdentityMapper;
    let config = NetworkConfig::default();
    let ingestor = Ingestor::new(&mapper, &config);
    let mut net = Network::new();

    let mut schema = directed_schema("r1", 3);
    schema.sign = Some(SignSpec {
        column: 2,
        positive_values: HashSet::from(["up".to_string()]),
        negative_values: HashSet::from(["down".to_string()]),
        inner_separator: None,
    });
    ingestor.ingest_resource(&schema, vec!["A\tB\tup\t1".to_string()].into_iter(), &mut net, false);

    let rows = to_rows(&net, DataFrameMode::PerSource);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].effect, 1);
    assert_eq!(rows[0].sources, "r1");
}
