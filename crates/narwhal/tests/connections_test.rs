use narwhal::{
    ConnectionKind, ConstellationLayouts, calculate_connections, calculate_connections_from,
    layout_region,
};
use serde_json::json;
use starchart_core::{
    ConnectionSource, ConstellationData, ConstellationId, RawConnection, RegionData, RegionId,
    SystemId, Universe, connections_from_value,
};
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .join("fixtures")
        .join("universe")
        .join(name)
}

fn region() -> RegionData {
    RegionData::new(vec![
        ConstellationData::new(10, [1, 2, 3]),
        ConstellationData::new(20, [4, 5]),
    ])
}

fn layouts(region: &RegionData, conns: &[RawConnection]) -> ConstellationLayouts {
    layout_region(region, conns, 1200.0, 800.0).constellations
}

#[test]
fn reversed_duplicates_collapse_into_one_edge() {
    let region = region();
    let conns = vec![RawConnection::new(1, 2), RawConnection::new(2, 1)];
    let set = calculate_connections(&region, &conns, &layouts(&region, &conns));

    assert_eq!(set.len(), 1);
    assert_eq!(set.diagnostics.duplicates, 1);
    let edge = set.edges[0];
    assert_eq!(edge.from.system_id, SystemId(1));
    assert_eq!(edge.to.system_id, SystemId(2));
    assert_eq!(edge.kind, ConnectionKind::Intra);
}

#[test]
fn duplicates_match_across_id_encodings() {
    let region = region();
    let (conns, skipped) = connections_from_value(&json!([
        {"from": "4", "to": {"system_id": 1}},
        {"from": 1, "to": 4},
        [4, "1"]
    ]));
    assert_eq!(skipped, 0);
    let set = calculate_connections(&region, &conns, &layouts(&region, &conns));
    assert_eq!(set.len(), 1);
    assert_eq!(set.diagnostics.duplicates, 2);
    // First occurrence keeps its orientation.
    assert_eq!(set.edges[0].from.system_id, SystemId(4));
}

#[test]
fn edges_leaving_the_region_or_looping_are_dropped() {
    let region = region();
    let conns = vec![
        RawConnection::new(1, 99),
        RawConnection::new(99, 98),
        RawConnection::new(3, 3),
        RawConnection::new(json!(null), 1),
        RawConnection::new(2, 3),
    ];
    let set = calculate_connections(&region, &conns, &layouts(&region, &conns));
    assert_eq!(set.len(), 1);
    assert_eq!(set.diagnostics.total, 5);
    assert_eq!(set.diagnostics.out_of_region, 2);
    assert_eq!(set.diagnostics.self_loops, 1);
    assert_eq!(set.diagnostics.malformed, 1);
}

#[test]
fn edges_are_classified_by_constellation() {
    let region = region();
    let conns = vec![
        RawConnection::new(1, 2),
        RawConnection::new(3, 4),
        RawConnection::new(4, 5),
        RawConnection::new(2, 5),
    ];
    let set = calculate_connections(&region, &conns, &layouts(&region, &conns));

    let kinds: Vec<_> = set.edges.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ConnectionKind::Intra,
            ConnectionKind::Inter,
            ConnectionKind::Intra,
            ConnectionKind::Inter
        ]
    );
    let cross = set.edges[1];
    assert_eq!(cross.from.const_id, ConstellationId(10));
    assert_eq!(cross.to.const_id, ConstellationId(20));
    assert_eq!(set.count(ConnectionKind::Inter), 2);
}

#[test]
fn membership_comes_from_the_layouts() {
    let region = region();
    let conns = vec![RawConnection::new(1, 4), RawConnection::new(1, 2)];
    let mut partial = layouts(&region, &conns);
    partial.shift_remove(&ConstellationId(20));

    let set = calculate_connections(&region, &conns, &partial);
    assert_eq!(set.len(), 1);
    assert_eq!(set.edges[0].to.system_id, SystemId(2));
    assert_eq!(set.diagnostics.unresolved, 1);
}

#[test]
fn universe_connections_resolve_for_a_region() {
    let text = std::fs::read_to_string(fixture("small.json")).expect("read fixture");
    let universe = Universe::from_json_str(&text).expect("parse universe");
    let region = universe.region(RegionId(10000001)).expect("region");
    let layout = layout_region(&region, universe.connections(), 1200.0, 800.0);
    let set = calculate_connections_from(&region, &universe, &layout.constellations);

    assert_eq!(set.len(), 8);
    assert_eq!(set.count(ConnectionKind::Intra), 5);
    assert_eq!(set.count(ConnectionKind::Inter), 3);
    assert_eq!(set.diagnostics.duplicates, 1);
    assert_eq!(set.diagnostics.out_of_region, 2);
    assert_eq!(set.diagnostics.unresolved, 0);

    let v = serde_json::to_value(&set).expect("serialize");
    assert_eq!(v["edges"][0]["type"], json!("intra"));
    assert_eq!(v["edges"][0]["from"]["const_id"], json!(20000001));
}
