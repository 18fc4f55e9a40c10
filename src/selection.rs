/// Exhaustive search for the cheapest (algorithm, protocol) pair.
///
/// Enumerates every admissible combination for a collective call, prices
/// each one with the cost model and keeps the minimum. Pairs without a cost
/// model drop out of the search silently; if nothing admissible is
/// computable the caller falls back to the runtime's own defaults.
use tracing::trace;

use crate::collective::{Algorithm, CollOp, Protocol};
use crate::cost::predict_cost_us;
use crate::interconnect::ModelParams;
use crate::topology::JobTopology;

/// Jobs on fewer nodes than this are left to the runtime's default tuning;
/// the two-tier model only separates from it at scale.
pub const MIN_MODELED_NODES: u32 = 3;

// ---------------------------------------------------------------------------
// Request / recommendation
// ---------------------------------------------------------------------------

/// Everything the runtime knows about one collective call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollRequest {
    /// Which collective is being performed.
    pub op: CollOp,
    /// Payload size in bytes.
    pub bytes: u64,
    /// Whether in-network (CollNet) reduction is available for this call.
    pub collnet_capable: bool,
    /// Whether NVLink-switch fabric reduction is available for this call.
    pub nvls_capable: bool,
    /// Number of overlapped operations in the group, >= 1.
    pub pipe_ops: u32,
}

impl CollRequest {
    /// An all-reduce request with no offload capabilities and depth 1.
    pub fn all_reduce(bytes: u64) -> Self {
        CollRequest {
            op: CollOp::AllReduce,
            bytes,
            collnet_capable: false,
            nvls_capable: false,
            pipe_ops: 1,
        }
    }
}

/// The tuner's answer for one collective call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    pub algorithm: Algorithm,
    pub protocol: Protocol,
    /// Parallel channels to devote to the transfer.
    pub num_channels: u32,
    /// Predicted completion time of the winning pair, µs.
    pub predicted_us: f64,
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} on {} channels (predicted {:.2}us)",
            self.algorithm, self.protocol, self.num_channels, self.predicted_us
        )
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// True when `cost` beats the incumbent. Strict comparison: a later pair
/// that ties the incumbent does not replace it.
fn improves(cost: f64, incumbent: Option<f64>) -> bool {
    incumbent.is_none_or(|best| cost < best)
}

/// Pick the cheapest admissible (algorithm, protocol) pair for `req`.
///
/// Returns `None` when the job is below the modeled node count or no
/// admissible pair is computable; the runtime then applies its own default
/// tuning. The channel count in a recommendation is always the configured
/// budget.
pub fn select_best(
    params: &ModelParams,
    topo: &JobTopology,
    req: &CollRequest,
) -> Option<Recommendation> {
    if topo.num_nodes() < MIN_MODELED_NODES {
        return None;
    }

    let mut best: Option<Recommendation> = None;

    for algo in Algorithm::ALL {
        if algo.intra_node_only() {
            continue;
        }
        if !req.nvls_capable && algo.requires_nvls_fabric() {
            continue;
        }
        if !req.collnet_capable && algo.requires_collnet() {
            continue;
        }

        for proto in Protocol::ALL {
            if !algo.supports_protocol(proto) {
                continue;
            }

            let Some(cost) =
                predict_cost_us(params, topo, req.op, algo, proto, req.pipe_ops, req.bytes)
            else {
                trace!(op = %req.op, algorithm = %algo, protocol = %proto,
                       "pair has no cost model, skipping");
                continue;
            };

            if improves(cost, best.map(|b| b.predicted_us)) {
                best = Some(Recommendation {
                    algorithm: algo,
                    protocol: proto,
                    num_channels: params.num_channels,
                    predicted_us: cost,
                });
            }
        }
    }

    best
}
