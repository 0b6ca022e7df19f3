//! Error types for camsup-core

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in camsup-core
#[derive(Debug, Error)]
pub enum Error {
    /// Source payload is not valid UTF-8
    #[error("'{source_name}' is not valid UTF-8: {message}")]
    InvalidUtf8 {
        source_name: String,
        message: String,
    },

    /// Failed to parse cameras.xml
    #[error("failed to parse '{source_name}': {source}")]
    Xml {
        source_name: String,
        #[source]
        source: quick_xml::Error,
    },

    /// Failed to parse a JSON preset dataset
    #[error("unable to unmarshal '{source_name}': {source}")]
    Json {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// CSV parsing error from the csv crate
    #[error("cannot read '{source_name}': {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    /// The LibRaw model map block was never found in the source
    #[error("no LibRaw cameras found in '{source_name}'")]
    LibrawBlockNotFound { source_name: String },

    /// An overlay row referenced a camera not present in the registry
    #[error("rawspeed-dng: {maker} {model} not found in cameras")]
    OverlayUnknownCamera { maker: String, model: String },

    /// Unrecognized output format value
    #[error("invalid output format '{0}', must be \"md\", \"tsv\" or \"none\"")]
    InvalidFormat(String),

    /// Malformed header-statistics format template
    #[error("invalid header format template '{template}': {message}")]
    InvalidTemplate { template: String, message: String },
}
