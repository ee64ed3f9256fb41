use crate::config::BoundsConfig;
use crate::geom::{Extent, Point, Rect};
use crate::graph::GraphModel;
use crate::model::{ConstellationLayout, ConstellationLayouts, MemberLayout};
use rustc_hash::FxHashSet;
use starchart_core::{RegionData, SystemId};

/// Groups the final node positions into one padded bounding box per constellation.
///
/// Constellations keep their input order. A system dropped as a duplicate only appears under the
/// constellation that kept it.
pub fn aggregate_constellations(
    graph: &GraphModel,
    region: &RegionData,
    cfg: &BoundsConfig,
) -> ConstellationLayouts {
    let mut out = ConstellationLayouts::with_capacity(region.constellations.len());
    let mut placed: FxHashSet<SystemId> = FxHashSet::default();

    for c in &region.constellations {
        let members: Vec<MemberLayout> = c
            .systems
            .iter()
            .filter(|s| graph.system_to_constellation.get(&s.id) == Some(&c.id))
            .filter(|s| placed.insert(s.id))
            .filter_map(|s| graph.node(s.id))
            .map(|n| MemberLayout {
                id: n.id,
                position: n.position,
                radius_class: n.radius_class,
                on_main_route: n.on_main_route,
            })
            .collect();

        // A constellation id listed twice merges into the first entry.
        if let Some(existing) = out.get_mut(&c.id) {
            existing.members.extend(members);
            (existing.center, existing.bounds) = member_box(&existing.members, cfg);
            continue;
        }

        let (center, bounds) = member_box(&members, cfg);
        out.insert(
            c.id,
            ConstellationLayout {
                id: c.id,
                name: c.name.clone(),
                center,
                bounds,
                members,
            },
        );
    }

    tracing::debug!(constellations = out.len(), "aggregated constellations");
    out
}

/// Member midpoint and the padded box around it; no members gives a minimum box at the origin.
fn member_box(members: &[MemberLayout], cfg: &BoundsConfig) -> (Point, Rect) {
    let (center, w, h) = match Extent::from_points(members.iter().map(|m| m.position)) {
        Some(e) => (e.center(), e.width(), e.height()),
        None => (Point::default(), 0.0, 0.0),
    };
    let width = (w + 2.0 * cfg.padding).max(cfg.min_width);
    let height = (h + 2.0 * cfg.padding).max(cfg.min_height);
    (center, Rect::centered(center, width, height))
}
