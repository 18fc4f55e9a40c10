/// Link models for the two-tier network the tuner reasons about.
///
/// Intra-node traffic rides NVLink (via NVSwitch), inter-node traffic rides
/// an InfiniBand fabric. The cost model works from per-channel bandwidth
/// constants in bytes/µs plus per-(algorithm, protocol) base latencies
/// calibrated separately for the two regimes.
///
/// Bandwidth reference:
///   NDR InfiniBand   — 400 Gb/s = 50 GB/s per link
///   HDR InfiniBand   — 200 Gb/s = 25 GB/s per link
///   Hopper NVLink    — 900 GB/s bidirectional per GPU over 18 links;
///                      20 GB/s effective per link after fabric overhead
///   Ampere NVLink    — 600 GB/s bidirectional per GPU, 12 links
use serde::{Deserialize, Serialize};

use crate::collective::{Algorithm, Protocol};

// ---------------------------------------------------------------------------
// Model parameters
// ---------------------------------------------------------------------------

/// Convert a GiB/s link speed into the model's bytes/µs unit.
/// 1 GiB/s = 2³⁰ bytes / 10⁶ µs.
pub const fn gib_per_s_to_bytes_per_us(gib_s: f64) -> f64 {
    gib_s * 1024.0 * 1024.0 * 1024.0 * 1e-6
}

/// Fixed link constants the cost model evaluates against.
///
/// Frozen at session construction; all latencies in µs, all bandwidths in
/// bytes/µs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// End-to-end network latency per inter-node hop.
    pub net_lat_us: f64,
    /// Inter-node bandwidth per channel.
    pub internode_bw: f64,
    /// Intra-node (NVLink) bandwidth per link.
    pub intranode_bw: f64,
    /// Parallel transfer channel budget.
    pub num_channels: u32,
}

impl ModelParams {
    /// Hopper-class nodes on an NDR InfiniBand fabric.
    pub fn hopper_ndr() -> Self {
        ModelParams {
            net_lat_us: 3.0,
            internode_bw: gib_per_s_to_bytes_per_us(50.0),
            intranode_bw: gib_per_s_to_bytes_per_us(20.0),
            num_channels: 16,
        }
    }

    /// Ampere-class nodes on an HDR InfiniBand fabric.
    pub fn ampere_hdr() -> Self {
        ModelParams {
            net_lat_us: 3.0,
            internode_bw: gib_per_s_to_bytes_per_us(25.0),
            intranode_bw: gib_per_s_to_bytes_per_us(12.5),
            num_channels: 16,
        }
    }

    /// Check that every constant is usable by the cost model.
    /// Rejecting zero bandwidth and a zero channel budget here is what
    /// keeps the cost formulas from ever dividing by zero.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.net_lat_us >= 0.0) {
            return Err(format!("net_lat_us must be non-negative, got {}", self.net_lat_us));
        }
        if !(self.internode_bw > 0.0) {
            return Err(format!("internode_bw must be positive, got {}", self.internode_bw));
        }
        if !(self.intranode_bw > 0.0) {
            return Err(format!("intranode_bw must be positive, got {}", self.intranode_bw));
        }
        if self.num_channels == 0 {
            return Err("num_channels must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for ModelParams {
    fn default() -> Self {
        ModelParams::hopper_ndr()
    }
}

// ---------------------------------------------------------------------------
// Base latency tables
// ---------------------------------------------------------------------------

/// Base latency of an (algorithm, protocol) pair on one link regime.
///
/// `Unsupported` marks pairs with no calibrated constant, so a missing entry
/// can never be mistaken for a free transfer. A genuine zero base latency is
/// `Supported(0.0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkLatency {
    Supported(f64),
    Unsupported,
}

impl LinkLatency {
    /// The latency in µs, or None for an unsupported pair.
    pub fn us(self) -> Option<f64> {
        match self {
            LinkLatency::Supported(us) => Some(us),
            LinkLatency::Unsupported => None,
        }
    }
}

use LinkLatency::{Supported as S, Unsupported as U};

/// Base algorithm latencies over the inter-node fabric, µs.
/// Rows: Tree, Ring, CollNetDirect, CollNetChain, NVLS, NVLSTree.
/// Columns: LL, LL128, Simple.
const BASE_LAT_US: [[LinkLatency; 3]; 6] = [
    [S(6.8), S(14.0), S(0.0)], // Tree
    [S(6.6), S(14.0), S(8.4)], // Ring
    [U, U, U],                 // CollNetDirect
    [U, U, U],                 // CollNetChain
    [U, U, U],                 // NVLS
    [U, U, S(0.0)],            // NVLSTree
];

/// Per-hop latencies over the NVLink regime, µs. Same row/column order.
const NVLINK_LAT_US: [[LinkLatency; 3]; 6] = [
    [S(0.6), S(1.25), S(28.0)], // Tree
    [S(0.6), S(1.9), S(3.4)],   // Ring
    [U, U, S(3.7)],             // CollNetDirect
    [U, U, S(2.8)],             // CollNetChain
    [U, U, S(25.0)],            // NVLS
    [U, U, S(25.0)],            // NVLSTree
];

/// Base latency of the pair over the inter-node fabric.
pub fn base_latency(algo: Algorithm, proto: Protocol) -> LinkLatency {
    BASE_LAT_US[algo as usize][proto as usize]
}

/// Per-hop latency of the pair over NVLink.
pub fn nvlink_latency(algo: Algorithm, proto: Protocol) -> LinkLatency {
    NVLINK_LAT_US[algo as usize][proto as usize]
}

// ---------------------------------------------------------------------------
// Transfer time
// ---------------------------------------------------------------------------

/// Completion time in µs of moving `bytes` over a link:
/// fixed latency plus serialization at `bw_bytes_us`.
pub fn transfer_time_us(bytes: f64, bw_bytes_us: f64, latency_us: f64) -> f64 {
    latency_us + bytes / bw_bytes_us
}
