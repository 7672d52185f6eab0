use thiserror::Error;

/// Errors surfaced by decimation cycles and point codecs.
///
/// Degenerate inputs and ineligible datasets are not errors; they are
/// handled as ordinary outcomes of a cycle.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured algorithm name does not match any known strategy.
    #[error("unsupported decimation algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A point record could be read but not interpreted.
    #[error("bad point record: {0}")]
    Record(String),
}

pub type Result<T> = std::result::Result<T, Error>;
