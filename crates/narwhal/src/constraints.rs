//! Subway-map constraints: grid snapping, advisory 45° directions and radius classes.

use crate::geom::{Grid, Octant, Point};
use crate::graph::GraphModel;
use crate::model::RadiusClass;
use crate::routes::RouteSet;
use nalgebra as na;
use rustc_hash::FxHashSet;

/// How many rings of neighbouring cells are searched for a free grid point.
const MAX_SNAP_RINGS: i64 = 4;

/// Mean unit vector from node `idx` toward its neighbours, quantized to an octant.
///
/// Neighbours sitting on the node itself contribute nothing. `None` when the vectors cancel out.
pub fn neighbor_direction(graph: &GraphModel, idx: usize) -> Option<Octant> {
    let node = graph.nodes.get(idx)?;
    let origin = node.position.to_vector();
    let mut sum = na::Vector2::<f64>::zeros();
    let mut count = 0usize;
    for other in graph.neighbors(node.id) {
        let Some(p) = graph.position(other) else {
            continue;
        };
        let delta = p.to_vector() - origin;
        let len = delta.norm();
        if len > f64::EPSILON {
            sum += delta / len;
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }
    Octant::from_vector(sum / count as f64)
}

/// Nearest free grid point to `p`, claiming it in `occupied`.
///
/// Taken cells are skipped by searching outward ring by ring in octant order (E first). When
/// every searched cell is taken the plain snap is returned. An unusable grid returns `p`.
pub fn snap_free(grid: &Grid, p: Point, occupied: &mut FxHashSet<(i64, i64)>) -> Point {
    if !grid.is_usable() {
        return p;
    }
    let preferred = grid.cell(p);
    if occupied.insert(preferred) {
        return grid.point(preferred);
    }
    for ring in 1..=MAX_SNAP_RINGS {
        for k in 0..8 {
            let u = Octant::new(k).unit();
            let cell = (
                preferred.0 + u.x.round() as i64 * ring,
                preferred.1 + u.y.round() as i64 * ring,
            );
            if occupied.insert(cell) {
                return grid.point(cell);
            }
        }
    }
    grid.point(preferred)
}

pub fn apply_subway_constraints(graph: &mut GraphModel, routes: &RouteSet, grid: &Grid) {
    // Directions are read from the unsnapped positions of every neighbour.
    let directions: Vec<Option<Octant>> = (0..graph.len())
        .map(|i| {
            if graph.nodes[i].degree == 0 {
                None
            } else {
                neighbor_direction(graph, i)
            }
        })
        .collect();

    let mut occupied = FxHashSet::default();
    let mut displaced = 0usize;
    let mut on_route = 0usize;
    for (node, direction) in graph.nodes.iter_mut().zip(directions) {
        node.radius_class = RadiusClass::from_degree(node.degree);
        let snapped = snap_free(grid, node.position, &mut occupied);
        if grid.is_usable() && snapped != grid.snap(node.position) {
            displaced += 1;
        }
        node.position = snapped;
        if node.degree == 0 {
            node.on_main_route = false;
            node.direction = None;
            continue;
        }
        node.direction = direction;
        node.on_main_route = routes.contains(node.id);
        on_route += usize::from(node.on_main_route);
    }

    tracing::debug!(
        nodes = graph.len(),
        on_main_route = on_route,
        grid = grid.size,
        displaced,
        "applied subway constraints"
    );
}
