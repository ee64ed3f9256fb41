//! Hub detection and bounded main-route tracing.
//!
//! Hubs are visited in descending degree order and each runs a capped BFS over a single shared
//! visited set, so a node belongs to the first (highest-degree) hub that reaches it. A hub that an
//! earlier hub already claimed traces nothing of its own.

use crate::config::RouteConfig;
use crate::graph::GraphModel;
use crate::model::HUB_MIN_DEGREE;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use starchart_core::SystemId;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub hub: SystemId,
    /// BFS visitation order, starting with the hub.
    pub nodes: Vec<SystemId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSet {
    /// Hub candidates considered, in processing order.
    pub hubs: Vec<SystemId>,
    pub routes: Vec<Route>,
    /// Claimed node -> owning hub, in claim order.
    owner: IndexMap<SystemId, SystemId>,
}

impl RouteSet {
    pub fn contains(&self, id: SystemId) -> bool {
        self.owner.contains_key(&id)
    }

    pub fn owner_of(&self, id: SystemId) -> Option<SystemId> {
        self.owner.get(&id).copied()
    }

    /// Union of all routes, in claim order.
    pub fn main_route(&self) -> impl Iterator<Item = SystemId> + '_ {
        self.owner.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.owner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
    }
}

/// Hubs sorted by degree (descending), ties broken by id, truncated to `max_hubs`.
pub fn hub_candidates(graph: &GraphModel, max_hubs: usize) -> Vec<SystemId> {
    let mut hubs: Vec<(usize, SystemId)> = graph
        .nodes
        .iter()
        .filter(|n| n.degree >= HUB_MIN_DEGREE)
        .map(|n| (n.degree, n.id))
        .collect();
    hubs.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    hubs.truncate(max_hubs);
    hubs.into_iter().map(|(_, id)| id).collect()
}

pub fn detect_routes(graph: &GraphModel, cfg: &RouteConfig) -> RouteSet {
    let mut set = RouteSet {
        hubs: hub_candidates(graph, cfg.max_hubs),
        ..Default::default()
    };
    let cap = cfg.max_route_nodes.max(1);

    for &hub in &set.hubs {
        if set.owner.contains_key(&hub) {
            continue;
        }

        let mut nodes = vec![hub];
        set.owner.insert(hub, hub);
        let mut queue = VecDeque::from([hub]);

        'bfs: while let Some(cur) = queue.pop_front() {
            for next in graph.neighbors(cur) {
                if nodes.len() >= cap {
                    break 'bfs;
                }
                if set.owner.contains_key(&next) {
                    continue;
                }
                set.owner.insert(next, hub);
                nodes.push(next);
                queue.push_back(next);
            }
        }

        set.routes.push(Route { hub, nodes });
    }

    tracing::debug!(
        hubs = set.hubs.len(),
        routes = set.routes.len(),
        main_route = set.owner.len(),
        "traced main routes"
    );
    set
}
