/// Collective operation vocabulary for the tuning model.
///
/// Covers the collective kinds a communicator can issue, the structural
/// algorithms that realize them (Ring, Tree, CollNet offload, NVLS fabric)
/// and the wire protocols that frame the data (LL, LL128, Simple).
///
/// Protocol trade-off:
///   LL     — 8B frames, 4B data + 4B flags: lowest latency, half bandwidth
///   LL128  — 128B frames, 120B data + 8B flags: low latency, 6.25% overhead
///   Simple — full payload frames: full bandwidth, highest latency

// ---------------------------------------------------------------------------
// Collective operations
// ---------------------------------------------------------------------------

/// Collective operation kinds the tuner can be asked about.
///
/// Only AllReduce currently has a cost model; the others are recognized but
/// reported as not computable so they are never silently mis-costed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollOp {
    Broadcast,
    Reduce,
    AllGather,
    ReduceScatter,
    AllReduce,
}

impl std::fmt::Display for CollOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollOp::Broadcast     => write!(f, "Broadcast"),
            CollOp::Reduce        => write!(f, "Reduce"),
            CollOp::AllGather     => write!(f, "AllGather"),
            CollOp::ReduceScatter => write!(f, "ReduceScatter"),
            CollOp::AllReduce     => write!(f, "AllReduce"),
        }
    }
}

// ---------------------------------------------------------------------------
// Algorithms
// ---------------------------------------------------------------------------

/// Structural strategy for realizing a collective.
///
/// Discriminants fix the row order of the latency tables in `interconnect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Binary-tree reduce + broadcast. Latency-optimal: O(log N) inter-node hops.
    Tree = 0,
    /// Ring reduce-scatter + all-gather. Bandwidth-optimal for large payloads.
    Ring = 1,
    /// In-network reduction offload, direct topology.
    CollnetDirect = 2,
    /// In-network reduction offload, chained topology.
    CollnetChain = 3,
    /// NVLink-switch in-fabric reduction. Single-node only.
    Nvls = 4,
    /// NVLink-switch reduction within nodes, tree across nodes.
    NvlsTree = 5,
}

impl Algorithm {
    /// All variants, in latency-table row order.
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Tree,
        Algorithm::Ring,
        Algorithm::CollnetDirect,
        Algorithm::CollnetChain,
        Algorithm::Nvls,
        Algorithm::NvlsTree,
    ];

    /// True for algorithms that only make sense inside a single node.
    pub fn intra_node_only(self) -> bool {
        self == Algorithm::Nvls
    }

    /// True for algorithms that offload reduction into the network and
    /// therefore need CollNet support advertised by the call.
    pub fn requires_collnet(self) -> bool {
        matches!(self, Algorithm::CollnetDirect | Algorithm::CollnetChain)
    }

    /// True for algorithms that need the NVLink-switch reduction fabric.
    pub fn requires_nvls_fabric(self) -> bool {
        matches!(self, Algorithm::Nvls | Algorithm::NvlsTree)
    }

    /// Whether this algorithm is defined under the given protocol.
    /// NVLSTree only exists with full-payload framing.
    pub fn supports_protocol(self, proto: Protocol) -> bool {
        match self {
            Algorithm::NvlsTree => proto == Protocol::Simple,
            _ => true,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Tree          => write!(f, "Tree"),
            Algorithm::Ring          => write!(f, "Ring"),
            Algorithm::CollnetDirect => write!(f, "CollNetDirect"),
            Algorithm::CollnetChain  => write!(f, "CollNetChain"),
            Algorithm::Nvls          => write!(f, "NVLS"),
            Algorithm::NvlsTree      => write!(f, "NVLSTree"),
        }
    }
}

// ---------------------------------------------------------------------------
// Protocols
// ---------------------------------------------------------------------------

/// Wire-level framing protocol. Discriminants fix the latency-table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Low-latency 8B frames.
    LL = 0,
    /// Low-latency 128B frames.
    LL128 = 1,
    /// Full-payload frames.
    Simple = 2,
}

impl Protocol {
    /// All variants, in latency-table column order.
    pub const ALL: [Protocol; 3] = [Protocol::LL, Protocol::LL128, Protocol::Simple];

    /// Fraction of raw link bandwidth left after framing overhead.
    pub fn bandwidth_factor(self) -> f64 {
        match self {
            // 8B frames carry 4B data + 4B flags
            Protocol::LL => 0.5,
            // 128B frames carry 120B data + 8B flags
            Protocol::LL128 => 0.9375,
            Protocol::Simple => 1.0,
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::LL     => write!(f, "LL"),
            Protocol::LL128  => write!(f, "LL128"),
            Protocol::Simple => write!(f, "Simple"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nvls_tree_is_simple_only() {
        assert!(Algorithm::NvlsTree.supports_protocol(Protocol::Simple));
        assert!(!Algorithm::NvlsTree.supports_protocol(Protocol::LL));
        assert!(!Algorithm::NvlsTree.supports_protocol(Protocol::LL128));
    }

    #[test]
    fn test_ring_and_tree_support_all_protocols() {
        for proto in Protocol::ALL {
            assert!(Algorithm::Ring.supports_protocol(proto));
            assert!(Algorithm::Tree.supports_protocol(proto));
        }
    }

    #[test]
    fn test_capability_predicates() {
        assert!(Algorithm::Nvls.intra_node_only());
        assert!(!Algorithm::NvlsTree.intra_node_only());
        assert!(Algorithm::CollnetDirect.requires_collnet());
        assert!(Algorithm::CollnetChain.requires_collnet());
        assert!(!Algorithm::Ring.requires_collnet());
        assert!(Algorithm::NvlsTree.requires_nvls_fabric());
    }

    #[test]
    fn test_bandwidth_factors() {
        assert_eq!(Protocol::LL.bandwidth_factor(), 0.5);
        assert_eq!(Protocol::LL128.bandwidth_factor(), 0.9375);
        assert_eq!(Protocol::Simple.bandwidth_factor(), 1.0);
    }
}
