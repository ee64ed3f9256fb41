use crate::id::{ConstellationId, RegionId, SystemId};
use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemData {
    pub id: SystemId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_status: Option<f64>,
}

impl SystemData {
    pub fn new(id: SystemId) -> Self {
        Self {
            id,
            name: None,
            security_status: None,
        }
    }

    /// Accepts either a bare id or an object carrying `id` (plus optional metadata).
    pub fn from_value(value: &Value) -> Option<Self> {
        let id = SystemId::from_value(value)?;
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string);
        let security_status = value.get("security_status").and_then(Value::as_f64);
        Some(Self {
            id,
            name,
            security_status,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstellationData {
    pub id: ConstellationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub systems: Vec<SystemData>,
}

impl ConstellationData {
    /// Constellation with bare system ids.
    pub fn new(id: i64, systems: impl IntoIterator<Item = i64>) -> Self {
        Self {
            id: ConstellationId(id),
            name: None,
            systems: systems
                .into_iter()
                .map(|s| SystemData::new(SystemId(s)))
                .collect(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Counters for entries dropped while ingesting loosely-typed region JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestDiagnostics {
    pub malformed_constellations: usize,
    pub malformed_systems: usize,
}

impl IngestDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.malformed_constellations == 0 && self.malformed_systems == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RegionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub constellations: Vec<ConstellationData>,
    #[serde(skip)]
    pub ingest: IngestDiagnostics,
}

impl RegionData {
    pub fn new(constellations: Vec<ConstellationData>) -> Self {
        Self {
            constellations,
            ..Default::default()
        }
    }

    /// Builds a region from `{ "constellations": [{ "id", "systems": [...] }] }`.
    ///
    /// Never fails: a non-object root or a missing `constellations` array yields an empty region,
    /// and entries whose ids cannot be normalized are dropped and counted in [`Self::ingest`].
    pub fn from_value(value: &Value) -> Self {
        let mut region = Self {
            id: value.get("id").and_then(RegionId::from_value),
            name: value
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string),
            ..Default::default()
        };

        let constellations = value
            .get("constellations")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for raw in constellations {
            let Some(id) = raw.get("id").and_then(ConstellationId::from_value) else {
                region.ingest.malformed_constellations += 1;
                continue;
            };
            let mut constellation = ConstellationData {
                id,
                name: raw.get("name").and_then(Value::as_str).map(str::to_string),
                systems: Vec::new(),
            };
            let systems = raw
                .get("systems")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            for s in systems {
                match SystemData::from_value(s) {
                    Some(system) => constellation.systems.push(system),
                    None => region.ingest.malformed_systems += 1,
                }
            }
            region.constellations.push(constellation);
        }

        if !region.ingest.is_clean() {
            tracing::debug!(
                malformed_constellations = region.ingest.malformed_constellations,
                malformed_systems = region.ingest.malformed_systems,
                "dropped malformed region entries"
            );
        }
        region
    }

    /// Distinct system ids in first-occurrence order.
    pub fn system_ids(&self) -> IndexSet<SystemId> {
        self.constellations
            .iter()
            .flat_map(|c| c.systems.iter().map(|s| s.id))
            .collect()
    }

    pub fn system_count(&self) -> usize {
        self.constellations.iter().map(|c| c.systems.len()).sum()
    }
}
