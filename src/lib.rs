//! In-memory, directed-and-signed molecular-interaction multigraph:
//! ingest heterogeneous curated resources under a declarative per-resource
//! schema, merge them into evidence-annotated edges, and query the
//! result by partner lookup, bounded-length path search, and
//! resource/data-model/interaction-type group-by statistics.
//!
//! External collaborators the core consumes rather than implements:
//! identifier mapping ([`translator::IdentifierMapper`]) and reference-list
//! lookup ([`network::ReferenceList`]). Fetching raw resource blobs,
//! tabular export beyond [`dataframe`], and configuration loading are
//! the embedding application's job.

pub mod config;
pub mod dataframe;
pub mod entity;
pub mod error;
pub mod evidences;
pub mod ingest;
pub mod interaction;
pub mod network;
pub mod pathfinder;
pub mod reference;
pub mod resource;
pub mod schema;
pub mod snapshot;
pub mod stats;
pub mod translator;

pub use config::NetworkConfig;
pub use entity::{Entity, EntityKey};
pub use error::{NetworkError, Result};
pub use evidences::{EvidenceFilter, Evidences, ViaFilter};
pub use ingest::{IngestReport, Ingestor};
pub use interaction::Interaction;
pub use network::{Network, PairKey, PartnerMode, ReferenceList};
pub use reference::Reference;
pub use resource::{Evidence, NetworkResource};
pub use schema::InputSchema;
pub use stats::{summary_table, SummaryRow};
pub use translator::IdentifierMapper;
