//! Opaque binary snapshot of a [`Network`]'s core maps (§6.3).

use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKey};
use crate::error::{NetworkError, Result};
use crate::interaction::Interaction;
use crate::network::{Network, PairKey};

const MAGIC: u32 = 0x4e_45_54_31; // "NET1"

/// The `(interactions, nodes, nodes_by_label)` triple that gets
/// serialized (§6.3). No format-stability guarantee is promised beyond
/// self round-trip; `MAGIC` lets [`load`] reject foreign blobs early.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotBody {
    magic: u32,
    interactions: std::collections::HashMap<PairKey, Interaction>,
    nodes: std::collections::HashMap<EntityKey, Entity>,
    nodes_by_label: std::collections::HashMap<String, EntityKey>,
    insertion_order: Vec<PairKey>,
}

/// Serializes `network`'s core maps to `path` via `bincode`.
pub fn save(network: &Network, path: impl AsRef<Path>) -> Result<()> {
    let body = SnapshotBody {
        magic: MAGIC,
        interactions: network.interactions().map(|(k, v)| (k.clone(), v.clone())).collect(),
        nodes: network.nodes().map(|e| (e.key(), e.clone())).collect(),
        nodes_by_label: network
            .nodes()
            .filter_map(|e| e.label.clone().map(|label| (label, e.key())))
            .collect(),
        insertion_order: network.interactions_in_order().map(|(k, _)| k.clone()).collect(),
    };

    let bytes = bincode::serialize(&body)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(&bytes)?;
    Ok(())
}

/// Deserializes a snapshot previously written by [`save`] into a fresh
/// [`Network`]. A magic-number or shape mismatch is a fatal, typed
/// error (§6.3, §7) — never a silently-empty network.
pub fn load(path: impl AsRef<Path>) -> Result<Network> {
    let mut file = std::fs::File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let body: SnapshotBody = bincode::deserialize(&bytes)?;
    if body.magic != MAGIC {
        return Err(NetworkError::SnapshotMismatch {
            message: format!("expected magic {MAGIC:#x}, found {:#x}", body.magic),
        });
    }

    let mut network = Network::new();
    for pair in &body.insertion_order {
        let Some(ia) = body.interactions.get(pair) else {
            return Err(NetworkError::SnapshotMismatch {
                message: format!("insertion order references missing pair {pair:?}"),
            });
        };
        let Some(a) = body.nodes.get(&pair.a) else {
            return Err(NetworkError::SnapshotMismatch {
                message: format!("missing node for endpoint {:?}", pair.a),
            });
        };
        let Some(b) = body.nodes.get(&pair.b) else {
            return Err(NetworkError::SnapshotMismatch {
                message: format!("missing node for endpoint {:?}", pair.b),
            });
        };
        network.add_interaction(a.clone(), b.clone(), ia.clone(), false);
    }
    Ok(network)
}
