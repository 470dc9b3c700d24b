use thiserror::Error;

/// Failures adapting externally supplied candidates at the system boundary.
///
/// Business-level problems (over budget, out of stock, empty bundles) are
/// never errors; they surface as structured result values.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AdapterError {
    #[error("candidate has an empty product id")]
    EmptyProductId,
    #[error("candidate {product_id} has a non-positive price")]
    NonPositivePrice { product_id: String },
}

/// Failures loading or validating pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
