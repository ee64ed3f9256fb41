#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
