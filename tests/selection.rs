//! End-to-end tuning scenarios through the public session API.

use commtune::{
    Algorithm, CollOp, CollRequest, ModelParams, Protocol, TunerSession,
};

fn open(num_ranks: u32, num_nodes: u32) -> TunerSession {
    TunerSession::open_with_params(num_ranks, num_nodes, ModelParams::default(), None).unwrap()
}

#[test]
fn dgx_pod_allreduce_picks_the_cheaper_of_ring_and_tree() {
    // 8 nodes of 8 ranks, 1 MiB all-reduce, no offload capabilities:
    // only Ring and Tree are in play, and Tree/LL wins at this size.
    let session = open(64, 8);
    let rec = session
        .recommend(&CollRequest {
            op: CollOp::AllReduce,
            bytes: 1 << 20,
            collnet_capable: false,
            nvls_capable: false,
            pipe_ops: 1,
        })
        .unwrap();

    assert_eq!(rec.algorithm, Algorithm::Tree);
    assert_eq!(rec.protocol, Protocol::LL);
    assert_eq!(rec.num_channels, 16);
    assert!(rec.predicted_us >= 0.0);
    assert!((rec.predicted_us - 38.0828125).abs() < 1e-6);
}

#[test]
fn two_node_jobs_always_defer() {
    let session = open(16, 2);
    for bytes in [0u64, 1 << 10, 1 << 20, 1 << 30] {
        for (collnet, nvls) in [(false, false), (true, false), (false, true), (true, true)] {
            let req = CollRequest {
                op: CollOp::AllReduce,
                bytes,
                collnet_capable: collnet,
                nvls_capable: nvls,
                pipe_ops: 1,
            };
            assert_eq!(session.recommend(&req), None);
        }
    }
}

#[test]
fn unmodeled_collectives_defer_without_error() {
    let session = open(64, 8);
    for op in [CollOp::Broadcast, CollOp::Reduce, CollOp::AllGather, CollOp::ReduceScatter] {
        let req = CollRequest {
            op,
            bytes: 1 << 20,
            collnet_capable: true,
            nvls_capable: true,
            pipe_ops: 1,
        };
        assert_eq!(session.recommend(&req), None);
    }
}

#[test]
fn any_admissible_computable_pair_yields_a_recommendation() {
    for (ranks, nodes) in [(24, 3), (32, 4), (64, 8), (1024, 128), (4096, 512)] {
        let session = open(ranks, nodes);
        for bytes in [0u64, 1, 1 << 16, 1 << 24, 1 << 32] {
            let rec = session.recommend(&CollRequest::all_reduce(bytes)).unwrap();
            assert!(rec.predicted_us >= 0.0);
            assert!(rec.predicted_us.is_finite());
        }
    }
}

#[test]
fn recommendations_are_deterministic() {
    let session = open(128, 16);
    let req = CollRequest {
        op: CollOp::AllReduce,
        bytes: 987654,
        collnet_capable: false,
        nvls_capable: true,
        pipe_ops: 4,
    };
    let first = session.recommend(&req);
    for _ in 0..10 {
        assert_eq!(session.recommend(&req), first);
    }
}

#[test]
fn deeper_pipelines_never_get_cheaper() {
    let session = open(64, 8);
    let mut last = 0.0;
    for pipe_ops in [1u32, 2, 8, 32] {
        let rec = session
            .recommend(&CollRequest {
                op: CollOp::AllReduce,
                bytes: 1 << 20,
                collnet_capable: false,
                nvls_capable: false,
                pipe_ops,
            })
            .unwrap();
        assert!(rec.predicted_us >= last);
        last = rec.predicted_us;
    }
}

#[test]
fn bigger_payloads_never_get_cheaper() {
    let session = open(64, 8);
    let mut last = 0.0;
    for shift in 0..34 {
        let rec = session.recommend(&CollRequest::all_reduce(1u64 << shift)).unwrap();
        assert!(rec.predicted_us >= last, "cost fell at 1<<{shift}");
        last = rec.predicted_us;
    }
}

#[test]
fn ring_takes_over_for_bandwidth_bound_payloads() {
    let session = open(64, 8);
    let small = session.recommend(&CollRequest::all_reduce(1 << 12)).unwrap();
    let large = session.recommend(&CollRequest::all_reduce(1 << 33)).unwrap();
    assert_eq!(small.algorithm, Algorithm::Tree);
    assert_eq!(large.algorithm, Algorithm::Ring);
    assert_eq!(large.protocol, Protocol::Simple);
}

#[test]
fn capability_flags_only_widen_the_search() {
    let session = open(64, 8);
    for bytes in [1u64 << 10, 1 << 20, 1 << 26, 1 << 30] {
        let base = session
            .recommend(&CollRequest::all_reduce(bytes))
            .unwrap()
            .predicted_us;
        for (collnet, nvls) in [(true, false), (false, true), (true, true)] {
            let widened = session
                .recommend(&CollRequest {
                    op: CollOp::AllReduce,
                    bytes,
                    collnet_capable: collnet,
                    nvls_capable: nvls,
                    pipe_ops: 1,
                })
                .unwrap()
                .predicted_us;
            assert!(widened <= base);
        }
    }
}

#[test]
fn custom_fabric_constants_change_the_crossover() {
    // A fabric with 100x the inter-node latency pushes latency-sensitive
    // sizes even harder toward Tree; a near-zero-latency fabric lets Ring
    // compete much earlier.
    let mut slow = ModelParams::default();
    slow.net_lat_us = 300.0;
    let slow_session = TunerSession::open_with_params(64, 8, slow, None).unwrap();
    let rec = slow_session.recommend(&CollRequest::all_reduce(1 << 24)).unwrap();
    assert_eq!(rec.algorithm, Algorithm::Tree);

    let mut fast = ModelParams::default();
    fast.net_lat_us = 0.0;
    let fast_session = TunerSession::open_with_params(64, 8, fast, None).unwrap();
    let rec = fast_session.recommend(&CollRequest::all_reduce(1 << 33)).unwrap();
    assert_eq!(rec.algorithm, Algorithm::Ring);
}
