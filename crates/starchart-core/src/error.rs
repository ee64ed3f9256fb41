use crate::id::RegionId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("universe document root must be a JSON object")]
    UniverseRoot,

    #[error("unknown region: {region_id}")]
    UnknownRegion { region_id: RegionId },
}
