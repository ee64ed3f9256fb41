use crate::config::StraightenConfig;
use crate::geom::{Octant, Point};
use crate::graph::GraphModel;
use crate::routes::Route;

/// Pulls each interior route node onto a 45° line from its predecessor.
///
/// Nodes are rewritten in route order and each one reads its predecessor's already-updated
/// position, so running this twice does not give the same result as running it once. Route
/// endpoints never move.
pub fn straighten_routes(graph: &mut GraphModel, routes: &[Route], cfg: &StraightenConfig) {
    let min_len = cfg.min_route_len.max(3);
    let mut moved = 0usize;

    for route in routes.iter().filter(|r| r.nodes.len() >= min_len) {
        for w in 1..route.nodes.len() - 1 {
            let (Some(prev), Some(next)) = (
                graph.position(route.nodes[w - 1]),
                graph.position(route.nodes[w + 1]),
            ) else {
                continue;
            };
            let d = next.to_vector() - prev.to_vector();
            let len = d.norm();
            if !len.is_finite() {
                continue;
            }
            let q = Octant::from_angle(d.y.atan2(d.x));
            let p = prev.to_vector() + q.unit() * (len * cfg.blend);
            graph.set_position(route.nodes[w], Point::from_vector(p));
            moved += 1;
        }
    }

    tracing::debug!(routes = routes.len(), moved, "straightened routes");
}

#[cfg(test)]
mod tests {
    use super::straighten_routes;
    use crate::config::StraightenConfig;
    use crate::geom::Point;
    use crate::graph::GraphModel;
    use crate::routes::Route;
    use starchart_core::{ConstellationData, RegionData, SystemId};

    fn graph(points: &[(f64, f64)]) -> (GraphModel, Route) {
        let n = points.len() as i64;
        let region = RegionData::new(vec![ConstellationData::new(1, 1..=n)]);
        let mut g = GraphModel::build(&region, &[]);
        for (i, (x, y)) in points.iter().enumerate() {
            g.nodes[i].position = Point::new(*x, *y);
        }
        let route = Route {
            hub: SystemId(1),
            nodes: (1..=n).map(SystemId).collect(),
        };
        (g, route)
    }

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn interior_node_moves_onto_the_snapped_line() {
        let (mut g, route) = graph(&[(0.0, 0.0), (30.0, 80.0), (100.0, 10.0)]);
        straighten_routes(&mut g, &[route], &StraightenConfig::default());

        // d = (100, 10) snaps to 0°, |d| * 0.5 along +x.
        let half = (100.0f64.powi(2) + 10.0f64.powi(2)).sqrt() * 0.5;
        assert!(close(g.nodes[1].position, Point::new(half, 0.0)));
        assert_eq!(g.nodes[0].position, Point::new(0.0, 0.0));
        assert_eq!(g.nodes[2].position, Point::new(100.0, 10.0));
    }

    #[test]
    fn diagonal_segments_snap_to_45_degrees() {
        let (mut g, route) = graph(&[(0.0, 0.0), (0.0, 0.0), (90.0, 110.0)]);
        straighten_routes(&mut g, &[route], &StraightenConfig::default());
        let p = g.nodes[1].position;
        assert!((p.x - p.y).abs() < 1e-9);
        assert!(p.x > 0.0);
    }

    #[test]
    fn short_routes_are_untouched() {
        let (mut g, route) = graph(&[(0.0, 0.0), (30.0, 80.0)]);
        straighten_routes(&mut g, &[route], &StraightenConfig::default());
        assert_eq!(g.nodes[1].position, Point::new(30.0, 80.0));
    }

    #[test]
    fn interior_nodes_read_updated_predecessors() {
        let (mut g, route) = graph(&[(0.0, 0.0), (50.0, 50.0), (100.0, 0.0), (100.0, 100.0)]);
        straighten_routes(&mut g, std::slice::from_ref(&route), &StraightenConfig::default());

        // Node 2 is placed relative to the updated node 1 at (50, 0).
        assert!(close(g.nodes[1].position, Point::new(50.0, 0.0)));
        let d = (100.0 - 50.0f64, 100.0 - 0.0f64);
        let len = (d.0 * d.0 + d.1 * d.1).sqrt();
        // atan2(100, 50) is about 63.4°, which rounds to 45°.
        let step = len * 0.5 / 2.0f64.sqrt();
        assert!(close(g.nodes[2].position, Point::new(50.0 + step, step)));
    }

    #[test]
    fn a_second_pass_moves_nodes_again() {
        let (mut g, route) = graph(&[(0.0, 0.0), (50.0, 50.0), (100.0, 0.0), (100.0, 100.0)]);
        let cfg = StraightenConfig::default();
        straighten_routes(&mut g, std::slice::from_ref(&route), &cfg);
        let once = g.nodes[1].position;
        straighten_routes(&mut g, std::slice::from_ref(&route), &cfg);
        let twice = g.nodes[1].position;

        assert!(close(once, Point::new(50.0, 0.0)));
        // Node 1 now aims at the moved node 2 and swings onto the 45° diagonal.
        assert!(!close(once, twice));
        assert!((twice.x - twice.y).abs() < 1e-9);
    }
}
