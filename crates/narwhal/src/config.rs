use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Tuning knobs for every pipeline stage.
///
/// Every section deserializes with defaults, so a partial JSON document only overrides the fields
/// it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub solver: SolverConfig,
    pub viewport: ViewportConfig,
    pub routes: RouteConfig,
    pub grid: GridConfig,
    pub straighten: StraightenConfig,
    pub bounds: BoundsConfig,
}

impl LayoutConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Distance between neighbouring cells of the initial placement grid.
    pub spacing: f64,
    pub iterations: usize,
    /// Numerator of the `repulsion / d^2` pairwise force.
    pub repulsion: f64,
    /// Pairs farther apart than this do not repel.
    pub repulsion_cutoff: f64,
    /// Lower bound for `d` in the repulsion term.
    pub min_distance: f64,
    pub ideal_edge_length: f64,
    pub spring: f64,
    pub damping: f64,
    /// Per-iteration cap on a node's travel.
    pub max_displacement: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            spacing: 150.0,
            iterations: 300,
            repulsion: 20_000.0,
            repulsion_cutoff: 600.0,
            min_distance: 0.01,
            ideal_edge_length: 120.0,
            spring: 0.05,
            damping: 0.85,
            max_displacement: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub margin: f64,
    /// Floor for the shrink factor, reached only on canvases far smaller than the layout.
    pub min_scale: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            margin: 50.0,
            min_scale: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    pub max_hubs: usize,
    /// BFS visit cap per hub, the hub itself included.
    pub max_route_nodes: usize,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            max_hubs: 5,
            max_route_nodes: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub size: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { size: 50.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StraightenConfig {
    pub blend: f64,
    /// Routes shorter than this are left alone.
    pub min_route_len: usize,
}

impl Default for StraightenConfig {
    fn default() -> Self {
        Self {
            blend: 0.5,
            min_route_len: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsConfig {
    pub padding: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            padding: 100.0,
            min_width: 200.0,
            min_height: 200.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LayoutConfig;

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let cfg =
            LayoutConfig::from_json_str(r#"{"solver": {"iterations": 10}, "grid": {"size": 25}}"#)
                .expect("config");
        assert_eq!(cfg.solver.iterations, 10);
        assert_eq!(cfg.solver.spacing, 150.0);
        assert_eq!(cfg.grid.size, 25.0);
        assert_eq!(cfg.routes.max_hubs, 5);
        assert_eq!(cfg.bounds.min_width, 200.0);
    }

    #[test]
    fn invalid_config_is_reported() {
        assert!(LayoutConfig::from_json_str(r#"{"solver": {"iterations": "many"}}"#).is_err());
    }
}
