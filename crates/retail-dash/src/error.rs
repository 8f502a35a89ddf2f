use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("sku collision: '{sku}' is produced by both '{first}' and '{second}'")]
    SkuCollision {
        sku: String,
        first: String,
        second: String,
    },
}

pub type DashResult<T> = Result<T, DashError>;
