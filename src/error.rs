use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("spawn_interval_ms must be greater than zero")]
    ZeroInterval,
    #[error("{field} must be within [0, 1], got {value}")]
    Probability { field: &'static str, value: f64 },
    #[error("{field} is not a valid range: [{min}, {max}]")]
    InvertedRange { field: &'static str, min: f64, max: f64 },
}

/// Neither container id resolved on the stage
#[derive(Debug, Error)]
#[error("no animation area found (tried '{primary}' and '{fallback}')")]
pub struct MountError {
    pub primary: String,
    pub fallback: String,
}
