pub type Result<T> = std::result::Result<T, TunerError>;

/// Initialization failures. Every variant is fatal to the session being
/// opened and to nothing else; a failed open leaves no session behind.
#[derive(Debug, thiserror::Error)]
pub enum TunerError {
    #[error("invalid topology: {num_ranks} ranks across {num_nodes} nodes")]
    InvalidTopology { num_ranks: u32, num_nodes: u32 },

    #[error("invalid model parameters: {reason}")]
    InvalidParams { reason: String },

    #[error("cannot read params file {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse params file {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
