//! Deterministic force-directed placement.
//!
//! Nodes start on a square grid and the simulation runs a fixed number of iterations; there is no
//! randomness and no convergence check, so identical inputs always produce identical output.

use crate::config::SolverConfig;
use crate::geom::Point;
use crate::graph::GraphModel;
use nalgebra as na;
use std::f64::consts::FRAC_PI_4;

type Vec2 = na::Vector2<f64>;

/// Grid placement with `ceil(sqrt(n))` columns.
pub fn initial_positions(n: usize, spacing: f64) -> Vec<Vec2> {
    if n == 0 {
        return Vec::new();
    }
    let cols = ((n as f64).sqrt().ceil() as usize).max(1);
    (0..n)
        .map(|i| Vec2::new((i % cols) as f64 * spacing, (i / cols) as f64 * spacing))
        .collect()
}

#[derive(Debug, Clone)]
pub struct ForceSimulation {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    forces: Vec<Vec2>,
    edges: Vec<(usize, usize)>,
    cfg: SolverConfig,
}

impl ForceSimulation {
    pub fn new(positions: Vec<Vec2>, edges: Vec<(usize, usize)>, cfg: &SolverConfig) -> Self {
        let n = positions.len();
        Self {
            positions,
            velocities: vec![Vec2::zeros(); n],
            forces: vec![Vec2::zeros(); n],
            edges,
            cfg: cfg.clone(),
        }
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn run(&mut self) {
        for _ in 0..self.cfg.iterations {
            self.step();
        }
    }

    pub fn step(&mut self) {
        for f in &mut self.forces {
            *f = Vec2::zeros();
        }
        self.accumulate_repulsion();
        self.accumulate_springs();
        self.integrate();
    }

    fn accumulate_repulsion(&mut self) {
        let n = self.positions.len();
        let min_distance = self.cfg.min_distance.max(f64::EPSILON);
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.positions[i] - self.positions[j];
                let raw = delta.norm();
                if raw > self.cfg.repulsion_cutoff {
                    continue;
                }
                let dir = if raw > min_distance {
                    delta / raw
                } else {
                    coincident_direction(i, j)
                };
                let d = raw.max(min_distance);
                let f = dir * (self.cfg.repulsion / (d * d));
                self.forces[i] += f;
                self.forces[j] -= f;
            }
        }
    }

    fn accumulate_springs(&mut self) {
        for &(a, b) in &self.edges {
            let delta = self.positions[b] - self.positions[a];
            let d = delta.norm();
            // Springs only pull; nodes already closer than ideal feel nothing.
            if d <= self.cfg.ideal_edge_length {
                continue;
            }
            let f = delta / d * (self.cfg.spring * (d - self.cfg.ideal_edge_length));
            self.forces[a] += f;
            self.forces[b] -= f;
        }
    }

    fn integrate(&mut self) {
        let max_step = self.cfg.max_displacement;
        for ((p, v), f) in self
            .positions
            .iter_mut()
            .zip(self.velocities.iter_mut())
            .zip(self.forces.iter())
        {
            *v = (*v + *f) * self.cfg.damping;
            if max_step.is_finite() && max_step > 0.0 {
                let speed = v.norm();
                if speed > max_step {
                    *v *= max_step / speed;
                }
            }
            if !(v.x.is_finite() && v.y.is_finite()) {
                *v = Vec2::zeros();
            }
            *p += *v;
        }
    }
}

/// Stable push direction for two nodes sitting on the same spot.
fn coincident_direction(i: usize, j: usize) -> Vec2 {
    let a = ((i * 31 + j * 17) % 8) as f64 * FRAC_PI_4;
    Vec2::new(a.cos(), a.sin())
}

/// Runs the full simulation and writes the result into the graph's node positions.
pub fn solve(graph: &mut GraphModel, cfg: &SolverConfig) {
    if graph.is_empty() {
        return;
    }
    let mut sim = ForceSimulation::new(
        initial_positions(graph.len(), cfg.spacing),
        graph.edge_indices(),
        cfg,
    );
    sim.run();
    for (node, p) in graph.nodes.iter_mut().zip(sim.positions()) {
        node.position = Point::from_vector(*p);
    }
    tracing::debug!(
        nodes = graph.len(),
        iterations = cfg.iterations,
        "force simulation finished"
    );
}

#[cfg(test)]
mod tests {
    use super::{ForceSimulation, Vec2, initial_positions};
    use crate::config::SolverConfig;

    #[test]
    fn initial_positions_fill_a_square_grid() {
        let p = initial_positions(5, 10.0);
        assert_eq!(p.len(), 5);
        // cols = ceil(sqrt(5)) = 3
        assert_eq!(p[0], Vec2::new(0.0, 0.0));
        assert_eq!(p[2], Vec2::new(20.0, 0.0));
        assert_eq!(p[3], Vec2::new(0.0, 10.0));
        assert_eq!(p[4], Vec2::new(10.0, 10.0));
        assert!(initial_positions(0, 10.0).is_empty());
    }

    #[test]
    fn springs_do_not_compress_nodes_closer_than_ideal() {
        let cfg = SolverConfig {
            repulsion: 0.0,
            ..SolverConfig::default()
        };
        let start = vec![Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0)];
        let mut sim = ForceSimulation::new(start.clone(), vec![(0, 1)], &cfg);
        sim.step();
        assert_eq!(sim.positions(), start.as_slice());
    }

    #[test]
    fn springs_pull_stretched_edges_together() {
        let cfg = SolverConfig {
            repulsion: 0.0,
            ..SolverConfig::default()
        };
        let mut sim = ForceSimulation::new(
            vec![Vec2::new(0.0, 0.0), Vec2::new(400.0, 0.0)],
            vec![(0, 1)],
            &cfg,
        );
        sim.step();
        let d = (sim.positions()[1] - sim.positions()[0]).norm();
        assert!(d < 400.0, "distance should shrink: {d}");
    }

    #[test]
    fn repulsion_pushes_nodes_apart_and_respects_cutoff() {
        let cfg = SolverConfig::default();
        let mut near = ForceSimulation::new(
            vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)],
            Vec::new(),
            &cfg,
        );
        near.step();
        assert!(near.positions()[0].x < 0.0);
        assert!(near.positions()[1].x > 10.0);

        let far_start = vec![Vec2::new(0.0, 0.0), Vec2::new(cfg.repulsion_cutoff + 1.0, 0.0)];
        let mut far = ForceSimulation::new(far_start.clone(), Vec::new(), &cfg);
        far.step();
        assert_eq!(far.positions(), far_start.as_slice());
    }

    #[test]
    fn a_step_never_moves_a_node_farther_than_the_cap() {
        let cfg = SolverConfig::default();
        let start = vec![Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.0)];
        let mut sim = ForceSimulation::new(start.clone(), Vec::new(), &cfg);
        sim.step();
        for (before, after) in start.iter().zip(sim.positions()) {
            let moved = (after - before).norm();
            assert!(moved > 1.0, "moved {moved}");
            assert!(moved <= cfg.max_displacement + 1e-9, "moved {moved}");
        }
    }

    #[test]
    fn coincident_nodes_separate_without_non_finite_values() {
        let cfg = SolverConfig::default();
        let mut sim = ForceSimulation::new(vec![Vec2::new(5.0, 5.0); 3], Vec::new(), &cfg);
        for _ in 0..10 {
            sim.step();
        }
        let p = sim.positions();
        assert!(p.iter().all(|v| v.x.is_finite() && v.y.is_finite()));
        assert!((p[0] - p[1]).norm() > 1.0);
    }

    #[test]
    fn simulation_is_deterministic() {
        let cfg = SolverConfig::default();
        let edges = vec![(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)];
        let mut a = ForceSimulation::new(initial_positions(6, cfg.spacing), edges.clone(), &cfg);
        let mut b = ForceSimulation::new(initial_positions(6, cfg.spacing), edges, &cfg);
        a.run();
        b.run();
        assert_eq!(a.positions(), b.positions());
    }
}
