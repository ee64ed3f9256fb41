//! Canonical node list and symmetric adjacency for one region.

use crate::geom::{Octant, Point};
use crate::model::{HUB_MIN_DEGREE, RadiusClass};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use serde::Serialize;
use starchart_core::{ConstellationId, RawConnection, RegionData, SystemId};

#[derive(Debug, Clone, PartialEq)]
pub struct SystemNode {
    pub id: SystemId,
    pub constellation_id: ConstellationId,
    pub position: Point,
    pub degree: usize,
    pub radius_class: RadiusClass,
    pub on_main_route: bool,
    /// Quantized mean direction toward the node's neighbours. Advisory only.
    pub direction: Option<Octant>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphDiagnostics {
    pub systems: usize,
    pub duplicate_systems: usize,
    pub connections_seen: usize,
    pub malformed_connections: usize,
    pub out_of_region_connections: usize,
    pub self_loops: usize,
    pub duplicate_connections: usize,
    pub edges: usize,
    pub isolated: usize,
    pub hubs: usize,
}

#[derive(Debug, Clone)]
pub struct GraphModel {
    pub nodes: Vec<SystemNode>,
    index: FxHashMap<SystemId, usize>,
    pub system_to_constellation: FxHashMap<SystemId, ConstellationId>,
    adjacency: IndexMap<SystemId, IndexSet<SystemId>>,
    pub diagnostics: GraphDiagnostics,
}

impl GraphModel {
    /// Builds the region graph. Connections with a malformed or out-of-region endpoint and
    /// self-loops are dropped and counted; a system listed twice keeps its first constellation.
    pub fn build(region: &RegionData, connections: &[RawConnection]) -> Self {
        let mut diagnostics = GraphDiagnostics::default();
        let mut nodes: Vec<SystemNode> = Vec::with_capacity(region.system_count());
        let mut index: FxHashMap<SystemId, usize> = FxHashMap::default();
        let mut system_to_constellation: FxHashMap<SystemId, ConstellationId> =
            FxHashMap::default();
        let mut adjacency: IndexMap<SystemId, IndexSet<SystemId>> = IndexMap::new();

        for c in &region.constellations {
            for s in &c.systems {
                if index.contains_key(&s.id) {
                    diagnostics.duplicate_systems += 1;
                    tracing::warn!(
                        system = %s.id,
                        constellation = %c.id,
                        "system listed in more than one constellation; keeping the first"
                    );
                    continue;
                }
                index.insert(s.id, nodes.len());
                system_to_constellation.insert(s.id, c.id);
                adjacency.insert(s.id, IndexSet::new());
                nodes.push(SystemNode {
                    id: s.id,
                    constellation_id: c.id,
                    position: Point::default(),
                    degree: 0,
                    radius_class: RadiusClass::Terminal,
                    on_main_route: false,
                    direction: None,
                });
            }
        }

        for conn in connections {
            diagnostics.connections_seen += 1;
            let Some((a, b)) = conn.endpoints() else {
                diagnostics.malformed_connections += 1;
                continue;
            };
            if !(index.contains_key(&a) && index.contains_key(&b)) {
                diagnostics.out_of_region_connections += 1;
                continue;
            }
            if a == b {
                diagnostics.self_loops += 1;
                continue;
            }
            let fresh = adjacency.get_mut(&a).is_some_and(|set| set.insert(b));
            if let Some(set) = adjacency.get_mut(&b) {
                set.insert(a);
            }
            if fresh {
                diagnostics.edges += 1;
            } else {
                diagnostics.duplicate_connections += 1;
            }
        }

        for n in &mut nodes {
            n.degree = adjacency.get(&n.id).map_or(0, IndexSet::len);
        }

        diagnostics.systems = nodes.len();
        diagnostics.isolated = nodes.iter().filter(|n| n.degree == 0).count();
        diagnostics.hubs = nodes
            .iter()
            .filter(|n| n.degree >= HUB_MIN_DEGREE)
            .count();

        tracing::debug!(
            systems = diagnostics.systems,
            edges = diagnostics.edges,
            isolated = diagnostics.isolated,
            hubs = diagnostics.hubs,
            malformed = diagnostics.malformed_connections,
            out_of_region = diagnostics.out_of_region_connections,
            "built region graph"
        );

        Self {
            nodes,
            index,
            system_to_constellation,
            adjacency,
            diagnostics,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: SystemId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn node(&self, id: SystemId) -> Option<&SystemNode> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn degree(&self, id: SystemId) -> usize {
        self.adjacency.get(&id).map_or(0, IndexSet::len)
    }

    /// Neighbours in the order their connections were first seen.
    pub fn neighbors(&self, id: SystemId) -> impl Iterator<Item = SystemId> + '_ {
        self.adjacency.get(&id).into_iter().flatten().copied()
    }

    pub fn adjacency(&self) -> &IndexMap<SystemId, IndexSet<SystemId>> {
        &self.adjacency
    }

    /// Each undirected edge once, as `(lower node index, higher node index)`.
    pub fn edge_indices(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(self.diagnostics.edges);
        for (a, set) in &self.adjacency {
            let Some(ia) = self.index_of(*a) else {
                continue;
            };
            for b in set {
                let Some(ib) = self.index_of(*b) else {
                    continue;
                };
                if ia < ib {
                    out.push((ia, ib));
                }
            }
        }
        out
    }

    pub fn position(&self, id: SystemId) -> Option<Point> {
        self.node(id).map(|n| n.position)
    }

    pub fn set_position(&mut self, id: SystemId, p: Point) {
        if let Some(i) = self.index_of(id) {
            self.nodes[i].position = p;
        }
    }
}
