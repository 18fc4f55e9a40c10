pub mod collective;
pub mod config;
pub mod cost;
pub mod error;
pub mod interconnect;
pub mod selection;
pub mod session;
pub mod topology;

pub use collective::{Algorithm, CollOp, Protocol};
pub use error::{Result, TunerError};
pub use interconnect::ModelParams;
pub use selection::{CollRequest, Recommendation};
pub use session::{LogCallback, LogLevel, TunerSession, PLUGIN_NAME};
pub use topology::JobTopology;
