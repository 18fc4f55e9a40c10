/// Session lifecycle: one tuner instance per communicator.
///
/// `open` freezes the topology and link constants for the communicator's
/// lifetime; `recommend` answers per-collective queries against that frozen
/// model. The session is immutable after open, so concurrent `recommend`
/// calls from multiple threads need no locking.
use tracing::debug;

use crate::config::load_params;
use crate::error::{Result, TunerError};
use crate::interconnect::ModelParams;
use crate::selection::{select_best, CollRequest, Recommendation};
use crate::topology::JobTopology;

/// Name this tuner reports to host logs.
pub const PLUGIN_NAME: &str = "commtune";

// ---------------------------------------------------------------------------
// Host logging
// ---------------------------------------------------------------------------

/// Verbosity of a diagnostic line handed to the host logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Info,
    Warn,
}

/// Host-provided sink for diagnostic text. Opaque to the tuner: it only
/// ever receives formatted messages, never influences behavior.
pub type LogCallback = Box<dyn Fn(LogLevel, &str) + Send + Sync>;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An open tuning session for one communicator.
pub struct TunerSession {
    topology: JobTopology,
    params: ModelParams,
    logger: Option<LogCallback>,
}

impl std::fmt::Debug for TunerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TunerSession")
            .field("topology", &self.topology)
            .field("params", &self.params)
            .field("logger", &self.logger.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl TunerSession {
    /// Open a session for a communicator of `num_ranks` ranks over
    /// `num_nodes` nodes. Link constants come from the defaults plus any
    /// `COMMTUNE_` overrides.
    ///
    /// Fails with [`TunerError`] on an invalid topology or unusable
    /// parameters; a failed open constructs nothing.
    pub fn open(num_ranks: u32, num_nodes: u32, logger: Option<LogCallback>) -> Result<Self> {
        let params = load_params()?;
        Self::open_with_params(num_ranks, num_nodes, params, logger)
    }

    /// Open a session with explicit link constants, bypassing the ambient
    /// configuration. Hosts that calibrate their own fabric use this.
    pub fn open_with_params(
        num_ranks: u32,
        num_nodes: u32,
        params: ModelParams,
        logger: Option<LogCallback>,
    ) -> Result<Self> {
        params
            .validate()
            .map_err(|reason| TunerError::InvalidParams { reason })?;
        let topology = JobTopology::new(num_ranks, num_nodes)?;

        let session = TunerSession { topology, params, logger };
        session.log(
            LogLevel::Info,
            &format!("{PLUGIN_NAME}: initialized for {}", session.topology),
        );
        Ok(session)
    }

    /// The frozen topology this session was opened with.
    pub fn topology(&self) -> &JobTopology {
        &self.topology
    }

    /// The frozen link constants this session evaluates against.
    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Recommend {algorithm, protocol, channel count} for one collective
    /// call, or `None` to defer to the runtime's default tuning.
    pub fn recommend(&self, req: &CollRequest) -> Option<Recommendation> {
        let choice = select_best(&self.params, &self.topology, req);

        match &choice {
            Some(rec) => {
                debug!(op = %req.op, bytes = req.bytes, recommendation = %rec, "selected");
                self.log(
                    LogLevel::Info,
                    &format!(
                        "{PLUGIN_NAME}: {} of {} bytes -> {}",
                        req.op, req.bytes, rec
                    ),
                );
            }
            None => {
                debug!(op = %req.op, bytes = req.bytes, "no recommendation");
                self.log(
                    LogLevel::Trace,
                    &format!(
                        "{PLUGIN_NAME}: no recommendation for {} of {} bytes, deferring",
                        req.op, req.bytes
                    ),
                );
            }
        }

        choice
    }

    /// Release the session. Dropping it is equivalent; taking `self` by
    /// value makes a second close unrepresentable.
    pub fn close(self) {}

    fn log(&self, level: LogLevel, msg: &str) {
        if let Some(cb) = &self.logger {
            cb(level, msg);
        }
    }
}
