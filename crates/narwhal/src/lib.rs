#![forbid(unsafe_code)]

//! Headless subway-map layout for one region of a clustered star map.
//!
//! A region is laid out in a fixed pipeline: graph build, force-directed placement, viewport fit,
//! hub route tracing, grid/45° constraints, route straightening and per-constellation
//! aggregation. Every stage is deterministic, so the same input always yields the same layout.

pub mod aggregate;
pub mod config;
pub mod connections;
pub mod constraints;
pub mod error;
pub mod geom;
pub mod graph;
pub mod model;
pub mod routes;
pub mod solver;
pub mod straighten;
pub mod viewport;

pub use config::{
    BoundsConfig, GridConfig, LayoutConfig, RouteConfig, SolverConfig, StraightenConfig,
    ViewportConfig,
};
pub use connections::{
    ConnectionDiagnostics, ConnectionKind, ConnectionSet, Endpoint, ResolvedConnection,
};
pub use error::{Error, Result};
pub use geom::{Grid, Octant, Point, Rect};
pub use graph::{GraphDiagnostics, GraphModel, SystemNode};
pub use model::{
    ConstellationLayout, ConstellationLayouts, HUB_MIN_DEGREE, LayoutDiagnostics, MemberLayout,
    RadiusClass, RegionLayout,
};
pub use routes::{Route, RouteSet};
pub use viewport::ViewportFit;

use starchart_core::{ConnectionSource, RawConnection, RegionData};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lays out `region` with the default configuration.
pub fn layout_region(
    region: &RegionData,
    connections: &[RawConnection],
    max_width: f64,
    max_height: f64,
) -> RegionLayout {
    layout_region_with_config(
        region,
        connections,
        max_width,
        max_height,
        &LayoutConfig::default(),
    )
}

pub fn layout_region_with_config(
    region: &RegionData,
    connections: &[RawConnection],
    max_width: f64,
    max_height: f64,
    cfg: &LayoutConfig,
) -> RegionLayout {
    let mut graph = GraphModel::build(region, connections);
    solver::solve(&mut graph, &cfg.solver);
    let fit = viewport::fit_to_viewport(&mut graph, max_width, max_height, &cfg.viewport);

    let route_set = routes::detect_routes(&graph, &cfg.routes);
    // The grid is sized in solver units, so it shrinks with the layout.
    constraints::apply_subway_constraints(&mut graph, &route_set, &fit.grid(cfg.grid.size));
    straighten::straighten_routes(&mut graph, &route_set.routes, &cfg.straighten);

    let constellations = aggregate::aggregate_constellations(&graph, region, &cfg.bounds);

    RegionLayout {
        constellations,
        main_route: route_set.main_route().collect(),
        diagnostics: LayoutDiagnostics {
            ingest: region.ingest,
            graph: graph.diagnostics,
            hubs_traced: route_set.routes.len(),
            main_route_nodes: route_set.len(),
        },
        routes: route_set.routes,
    }
}

/// [`layout_region_with_config`] over any connection dataset.
pub fn layout_region_from<S: ConnectionSource + ?Sized>(
    region: &RegionData,
    source: &S,
    max_width: f64,
    max_height: f64,
    cfg: &LayoutConfig,
) -> RegionLayout {
    layout_region_with_config(region, source.connections(), max_width, max_height, cfg)
}

/// Edges between the region's systems, classified against already computed layouts.
pub fn calculate_connections(
    region: &RegionData,
    connections: &[RawConnection],
    constellations: &ConstellationLayouts,
) -> ConnectionSet {
    connections::resolve_connections(region, connections, constellations)
}

pub fn calculate_connections_from<S: ConnectionSource + ?Sized>(
    region: &RegionData,
    source: &S,
    constellations: &ConstellationLayouts,
) -> ConnectionSet {
    calculate_connections(region, source.connections(), constellations)
}
