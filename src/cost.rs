/// Closed-form completion-time model for collective operations.
///
/// Each modeled (operation, algorithm) pair has its own formula for step
/// counts and effective bandwidth over the two-tier network; the predicted
/// cost is the pipelined fixed latency plus payload serialization:
///
///   cost_µs = latency_µs · pipe_ops + bytes / effective_bw
///
/// Pairs without a model yield `None`; the caller skips them and keeps
/// searching.
use crate::collective::{Algorithm, CollOp, Protocol};
use crate::interconnect::{base_latency, nvlink_latency, transfer_time_us, ModelParams};
use crate::topology::JobTopology;

/// Integer floor of log2(n). Returns 0 for n <= 1.
pub(crate) fn log2i(n: u32) -> u32 {
    if n <= 1 { 0 } else { n.ilog2() }
}

/// Predict the completion time of one collective call, in µs.
///
/// Returns `None` when the (operation, algorithm) pair has no model or the
/// (algorithm, protocol) pair has no calibrated latency. `pipe_ops` below 1
/// is treated as 1.
pub fn predict_cost_us(
    params: &ModelParams,
    topo: &JobTopology,
    op: CollOp,
    algo: Algorithm,
    proto: Protocol,
    pipe_ops: u32,
    bytes: u64,
) -> Option<f64> {
    let base = base_latency(algo, proto).us()?;
    let intra_lat = nvlink_latency(algo, proto).us()?;
    let inter_lat = params.net_lat_us;

    let (step_lat, raw_bw) = match (op, algo) {
        (CollOp::AllReduce, Algorithm::Ring) => {
            // Reduce-scatter + all-gather: 2(N-1) steps total, of which
            // 2·nodes cross the fabric and the rest stay on NVLink. The cap
            // covers the one-rank-per-node shape, where every step is
            // inter-node.
            let total_steps = 2 * (topo.num_ranks() as u64 - 1);
            let internode_steps = (2 * topo.num_nodes() as u64).min(total_steps);
            let intranode_steps = total_steps - internode_steps;
            (
                internode_steps as f64 * inter_lat + intranode_steps as f64 * intra_lat,
                params.internode_bw * params.num_channels as f64,
            )
        }

        (CollOp::AllReduce, Algorithm::Tree) => {
            // Up + down phases: NVLink hops within the node, log2(nodes)
            // fabric hops across. Bandwidth halves for the two phases.
            let intra_hops = (topo.ranks_per_node() - 1) as f64;
            (
                2.0 * (intra_hops * intra_lat + log2i(topo.num_nodes()) as f64 * inter_lat),
                params.internode_bw * params.num_channels as f64 / 2.0,
            )
        }

        (CollOp::AllReduce, Algorithm::NvlsTree) => {
            // One in-fabric reduction per node, tree across nodes.
            (
                intra_lat + 2.0 * log2i(topo.num_nodes()) as f64 * inter_lat,
                params.internode_bw * params.num_channels as f64 / 2.0,
            )
        }

        _ => return None,
    };

    let bw = raw_bw * proto.bandwidth_factor();
    let latency = base + step_lat;

    Some(transfer_time_us(bytes as f64, bw, latency * pipe_ops.max(1) as f64))
}
