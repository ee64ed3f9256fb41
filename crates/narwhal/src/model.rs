use crate::geom::{Point, Rect};
use crate::graph::GraphDiagnostics;
use crate::routes::Route;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use starchart_core::{ConstellationId, IngestDiagnostics, SystemId};

/// Minimum degree for a node to count as a hub.
pub const HUB_MIN_DEGREE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadiusClass {
    Hub,
    Standard,
    Terminal,
}

impl RadiusClass {
    pub fn from_degree(degree: usize) -> Self {
        match degree {
            0 | 1 => Self::Terminal,
            d if d >= HUB_MIN_DEGREE => Self::Hub,
            _ => Self::Standard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberLayout {
    pub id: SystemId,
    pub position: Point,
    pub radius_class: RadiusClass,
    pub on_main_route: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationLayout {
    pub id: ConstellationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub center: Point,
    pub bounds: Rect,
    pub members: Vec<MemberLayout>,
}

impl ConstellationLayout {
    pub fn width(&self) -> f64 {
        self.bounds.width
    }

    pub fn height(&self) -> f64 {
        self.bounds.height
    }
}

pub type ConstellationLayouts = IndexMap<ConstellationId, ConstellationLayout>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutDiagnostics {
    pub ingest: IngestDiagnostics,
    pub graph: GraphDiagnostics,
    pub hubs_traced: usize,
    pub main_route_nodes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionLayout {
    pub constellations: ConstellationLayouts,
    /// Main-route members in claim order.
    pub main_route: Vec<SystemId>,
    pub routes: Vec<Route>,
    pub diagnostics: LayoutDiagnostics,
}

impl RegionLayout {
    pub fn members(&self) -> impl Iterator<Item = (ConstellationId, &MemberLayout)> + '_ {
        self.constellations
            .values()
            .flat_map(|c| c.members.iter().map(move |m| (c.id, m)))
    }

    pub fn member(&self, id: SystemId) -> Option<&MemberLayout> {
        self.members().map(|(_, m)| m).find(|m| m.id == id)
    }

    pub fn positions(&self) -> IndexMap<SystemId, Point> {
        self.members().map(|(_, m)| (m.id, m.position)).collect()
    }
}
