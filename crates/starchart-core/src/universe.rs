//! Static universe cache (`universe_static_cache.json`).
//!
//! The cache is a snapshot of every known-space region, constellation and system plus the
//! deduplicated stargate connection list. Record maps are keyed by stringified ids; records may
//! also carry their own `id`, which wins over the key when both are present.

use crate::connection::{ConnectionSource, RawConnection, connections_from_value};
use crate::error::{Error, Result};
use crate::id::{ConstellationId, RegionId, SystemId, normalize_id};
use crate::region::{ConstellationData, RegionData, SystemData};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseMetadata {
    pub generated_at: Option<String>,
    pub version: Option<String>,
    pub total_regions: usize,
    pub total_constellations: usize,
    pub total_systems: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position3 {
    fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            x: value.get("x")?.as_f64()?,
            y: value.get("y")?.as_f64()?,
            z: value.get("z")?.as_f64()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionRecord {
    pub id: RegionId,
    pub name: Option<String>,
    pub constellations: Vec<ConstellationId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationRecord {
    pub id: ConstellationId,
    pub name: Option<String>,
    pub region_id: Option<RegionId>,
    pub systems: Vec<SystemId>,
    pub position: Option<Position3>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemRecord {
    pub id: SystemId,
    pub name: Option<String>,
    pub constellation_id: Option<ConstellationId>,
    pub region_id: Option<RegionId>,
    pub security_status: Option<f64>,
    pub position: Option<Position3>,
    pub stargates: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub id: RegionId,
    pub name: Option<String>,
    pub constellation_count: usize,
    pub system_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Universe {
    pub metadata: UniverseMetadata,
    regions: BTreeMap<RegionId, RegionRecord>,
    constellations: FxHashMap<ConstellationId, ConstellationRecord>,
    systems: FxHashMap<SystemId, SystemRecord>,
    connections: Vec<RawConnection>,
    skipped_connections: usize,
}

impl Universe {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(root) = value.as_object() else {
            return Err(Error::UniverseRoot);
        };

        let metadata = root
            .get("metadata")
            .cloned()
            .and_then(|m| serde_json::from_value::<UniverseMetadata>(m).ok())
            .unwrap_or_default();

        let mut universe = Self {
            metadata,
            ..Default::default()
        };

        for (key, raw) in records(root.get("regions")) {
            let Some(id) = record_id(key, raw).map(RegionId) else {
                continue;
            };
            universe.regions.insert(
                id,
                RegionRecord {
                    id,
                    name: string_field(raw, "name"),
                    constellations: id_list(raw.get("constellations"))
                        .map(ConstellationId)
                        .collect(),
                },
            );
        }

        for (key, raw) in records(root.get("constellations")) {
            let Some(id) = record_id(key, raw).map(ConstellationId) else {
                continue;
            };
            universe.constellations.insert(
                id,
                ConstellationRecord {
                    id,
                    name: string_field(raw, "name"),
                    region_id: raw.get("region_id").and_then(RegionId::from_value),
                    systems: id_list(raw.get("systems")).map(SystemId).collect(),
                    position: raw.get("position").and_then(Position3::from_value),
                },
            );
        }

        for (key, raw) in records(root.get("systems")) {
            let Some(id) = record_id(key, raw).map(SystemId) else {
                continue;
            };
            universe.systems.insert(
                id,
                SystemRecord {
                    id,
                    name: string_field(raw, "name"),
                    constellation_id: raw
                        .get("constellation_id")
                        .and_then(ConstellationId::from_value),
                    region_id: raw.get("region_id").and_then(RegionId::from_value),
                    security_status: raw.get("security_status").and_then(Value::as_f64),
                    position: raw.get("position").and_then(Position3::from_value),
                    stargates: id_list(raw.get("stargates")).collect(),
                },
            );
        }

        if let Some(list) = root.get("connections") {
            let (connections, skipped) = connections_from_value(list);
            universe.connections = connections;
            universe.skipped_connections = skipped;
        }

        tracing::debug!(
            regions = universe.regions.len(),
            constellations = universe.constellations.len(),
            systems = universe.systems.len(),
            connections = universe.connections.len(),
            skipped_connections = universe.skipped_connections,
            "loaded universe cache"
        );

        Ok(universe)
    }

    pub fn region_record(&self, id: RegionId) -> Option<&RegionRecord> {
        self.regions.get(&id)
    }

    pub fn constellation_record(&self, id: ConstellationId) -> Option<&ConstellationRecord> {
        self.constellations.get(&id)
    }

    pub fn system_record(&self, id: SystemId) -> Option<&SystemRecord> {
        self.systems.get(&id)
    }

    pub fn skipped_connections(&self) -> usize {
        self.skipped_connections
    }

    /// Assembles the layout input for one region, constellations in the region's listed order.
    ///
    /// Constellations missing from the cache are skipped. Systems keep the constellation's listed
    /// order and pick up name/security from their own record when one exists.
    pub fn region(&self, id: RegionId) -> Option<RegionData> {
        let record = self.regions.get(&id)?;
        let mut region = RegionData {
            id: Some(record.id),
            name: record.name.clone(),
            ..Default::default()
        };

        for const_id in &record.constellations {
            let Some(c) = self.constellations.get(const_id) else {
                tracing::debug!(
                    region = %id,
                    constellation = %const_id,
                    "constellation missing from cache"
                );
                continue;
            };
            let systems = c
                .systems
                .iter()
                .map(|sys_id| match self.systems.get(sys_id) {
                    Some(s) => SystemData {
                        id: s.id,
                        name: s.name.clone(),
                        security_status: s.security_status,
                    },
                    None => SystemData::new(*sys_id),
                })
                .collect();
            region.constellations.push(ConstellationData {
                id: c.id,
                name: c.name.clone(),
                systems,
            });
        }

        Some(region)
    }

    /// Same as [`Self::region`], reporting an unknown id as an error.
    pub fn require_region(&self, id: RegionId) -> Result<RegionData> {
        self.region(id).ok_or(Error::UnknownRegion { region_id: id })
    }

    pub fn region_summaries(&self) -> Vec<RegionSummary> {
        self.regions
            .values()
            .map(|r| {
                let system_count = r
                    .constellations
                    .iter()
                    .filter_map(|c| self.constellations.get(c))
                    .map(|c| c.systems.len())
                    .sum();
                RegionSummary {
                    id: r.id,
                    name: r.name.clone(),
                    constellation_count: r.constellations.len(),
                    system_count,
                }
            })
            .collect()
    }
}

impl ConnectionSource for Universe {
    fn connections(&self) -> &[RawConnection] {
        &self.connections
    }
}

/// Iterates `(key, record)` pairs of an id-keyed object, or `("", record)` for an array.
fn records(value: Option<&Value>) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
    match value {
        Some(Value::Object(map)) => Box::new(map.iter().map(|(k, v)| (k.as_str(), v))),
        Some(Value::Array(list)) => Box::new(list.iter().map(|v| ("", v))),
        _ => Box::new(std::iter::empty()),
    }
}

fn record_id(key: &str, raw: &Value) -> Option<i64> {
    raw.get("id")
        .and_then(normalize_id)
        .or_else(|| normalize_id(&Value::String(key.to_string())))
}

fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

fn id_list(value: Option<&Value>) -> impl Iterator<Item = i64> + '_ {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(normalize_id)
}
