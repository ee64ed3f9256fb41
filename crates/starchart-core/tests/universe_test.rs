use serde_json::json;
use starchart_core::{ConnectionSource, ConstellationId, Error, RegionId, SystemId, Universe};
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

fn small_universe() -> Universe {
    let text = std::fs::read_to_string(fixture("small.json")).expect("read fixture");
    Universe::from_json_str(&text).expect("parse universe")
}

#[test]
fn universe_reads_metadata_and_connections() {
    let u = small_universe();
    assert_eq!(u.metadata.version.as_deref(), Some("1.0"));
    assert_eq!(u.metadata.total_systems, 8);
    assert_eq!(u.connections().len(), 12);
    assert_eq!(u.skipped_connections(), 1);
}

#[test]
fn universe_region_keeps_listed_order_and_enriches_systems() {
    let u = small_universe();
    let region = u.region(RegionId(10000001)).expect("region");
    assert_eq!(region.name.as_deref(), Some("Derelik"));

    let const_ids: Vec<_> = region.constellations.iter().map(|c| c.id).collect();
    assert_eq!(
        const_ids,
        vec![ConstellationId(20000001), ConstellationId(20000002)]
    );

    let first = &region.constellations[0];
    assert_eq!(first.name.as_deref(), Some("Kalevala"));
    assert_eq!(first.systems[0].id, SystemId(30000001));
    assert_eq!(first.systems[0].name.as_deref(), Some("Tanoo"));
    assert_eq!(region.system_count(), 6);
}

#[test]
fn universe_reports_unknown_regions() {
    let u = small_universe();
    assert!(u.region(RegionId(1)).is_none());
    let err = u.require_region(RegionId(1)).unwrap_err();
    assert!(matches!(err, Error::UnknownRegion { region_id } if region_id == RegionId(1)));
}

#[test]
fn universe_region_summaries_are_sorted_by_id() {
    let u = small_universe();
    let summaries = u.region_summaries();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, RegionId(10000001));
    assert_eq!(summaries[0].constellation_count, 2);
    assert_eq!(summaries[0].system_count, 6);
    assert_eq!(summaries[1].name.as_deref(), Some("The Forge"));
    assert_eq!(summaries[1].system_count, 2);
}

#[test]
fn universe_falls_back_to_record_keys_for_ids() {
    let u = Universe::from_value(&json!({
        "regions": {"7": {"name": "Keyed", "constellations": ["70"]}},
        "constellations": {"70": {"name": "Only", "systems": [700, "701"]}},
    }))
    .expect("universe");
    let region = u.region(RegionId(7)).expect("region");
    assert_eq!(region.constellations[0].id, ConstellationId(70));
    assert_eq!(region.system_count(), 2);
    assert!(u.system_record(SystemId(700)).is_none());
}

#[test]
fn universe_rejects_non_object_roots() {
    assert!(matches!(
        Universe::from_value(&json!([1, 2])),
        Err(Error::UniverseRoot)
    ));
    assert!(matches!(Universe::from_json_str("{"), Err(Error::Json(_))));
}
