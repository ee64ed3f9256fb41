#![forbid(unsafe_code)]

//! Input model for starchart region layouts.
//!
//! Upstream data (the universe cache and the connection list served next to it) encodes ids
//! inconsistently: plain numbers, numeric strings, or objects wrapping an id. Everything in this
//! crate normalizes those once, at ingestion, so layout code only ever sees typed ids.

pub mod connection;
pub mod error;
pub mod id;
pub mod region;
pub mod universe;

pub use connection::{ConnectionSource, RawConnection, connections_from_value};
pub use error::{Error, Result};
pub use id::{ConstellationId, RegionId, SystemId, normalize_id};
pub use region::{ConstellationData, IngestDiagnostics, RegionData, SystemData};
pub use universe::{RegionSummary, Universe, UniverseMetadata};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
