//! Deduplicated, classified edges for rendering a laid-out region.

use crate::model::ConstellationLayouts;
use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use starchart_core::{ConstellationId, RawConnection, RegionData, SystemId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// Both endpoints in the same constellation.
    Intra,
    Inter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub system_id: SystemId,
    pub const_id: ConstellationId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedConnection {
    pub from: Endpoint,
    pub to: Endpoint,
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionDiagnostics {
    pub total: usize,
    pub malformed: usize,
    pub out_of_region: usize,
    pub self_loops: usize,
    pub duplicates: usize,
    /// In-region edges dropped because an endpoint has no layout entry.
    pub unresolved: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConnectionSet {
    pub edges: Vec<ResolvedConnection>,
    pub diagnostics: ConnectionDiagnostics,
}

impl ConnectionSet {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn count(&self, kind: ConnectionKind) -> usize {
        self.edges.iter().filter(|e| e.kind == kind).count()
    }
}

/// Filters `connections` to the region, drops self-loops and repeated unordered pairs, and tags
/// each surviving edge with the constellations its endpoints were laid out in.
///
/// Edges keep the order and the endpoint orientation of their first occurrence.
pub fn resolve_connections(
    region: &RegionData,
    connections: &[RawConnection],
    layouts: &ConstellationLayouts,
) -> ConnectionSet {
    let systems = region.system_ids();
    let mut membership: FxHashMap<SystemId, ConstellationId> = FxHashMap::default();
    for layout in layouts.values() {
        for m in &layout.members {
            membership.entry(m.id).or_insert(layout.id);
        }
    }

    let mut set = ConnectionSet::default();
    let mut seen: IndexSet<(SystemId, SystemId)> = IndexSet::new();

    for conn in connections {
        set.diagnostics.total += 1;
        let Some((a, b)) = conn.endpoints() else {
            set.diagnostics.malformed += 1;
            continue;
        };
        if !(systems.contains(&a) && systems.contains(&b)) {
            set.diagnostics.out_of_region += 1;
            continue;
        }
        if a == b {
            set.diagnostics.self_loops += 1;
            continue;
        }
        if !seen.insert((a.min(b), a.max(b))) {
            set.diagnostics.duplicates += 1;
            continue;
        }

        let (Some(&ca), Some(&cb)) = (membership.get(&a), membership.get(&b)) else {
            set.diagnostics.unresolved += 1;
            tracing::warn!(
                from = %a,
                to = %b,
                "dropping edge with an endpoint missing from the layout"
            );
            continue;
        };
        set.edges.push(ResolvedConnection {
            from: Endpoint {
                system_id: a,
                const_id: ca,
            },
            to: Endpoint {
                system_id: b,
                const_id: cb,
            },
            kind: if ca == cb {
                ConnectionKind::Intra
            } else {
                ConnectionKind::Inter
            },
        });
    }

    tracing::debug!(
        edges = set.edges.len(),
        duplicates = set.diagnostics.duplicates,
        out_of_region = set.diagnostics.out_of_region,
        unresolved = set.diagnostics.unresolved,
        "resolved connections"
    );
    set
}
