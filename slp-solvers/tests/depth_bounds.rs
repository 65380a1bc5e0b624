//! Depth-limit enforcement and the SBP program-length cutoff.

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use slp_matrix::GfMatrix;
use slp_solvers::{boyar, sbp, Line, RunControl, SolveError, DEFAULT_PROGRAM_CAP};

#[path = "common/eval.rs"]
mod eval;

fn random_matrix(rng: &mut ChaCha20Rng, height: usize, width: usize) -> GfMatrix {
    let rows: Vec<Vec<u8>> = (0..height)
        .map(|_| (0..width).map(|_| rng.random_range(0..=1)).collect())
        .collect();
    GfMatrix::from_bits(&rows).unwrap()
}

fn max_line_depth(program: &[Line]) -> u32 {
    program
        .iter()
        .filter_map(|l| match l {
            Line::Intermediate { depth, .. } => *depth,
            Line::TargetIntermediate { depth, .. } => Some(*depth),
            _ => None,
        })
        .max()
        .unwrap_or(0)
}

#[test]
fn boyar_never_exceeds_the_depth_limit() {
    let mut rng = ChaCha20Rng::from_seed([3; 32]);
    let ctl = RunControl::new();

    for limit in [3u32, 4, 5] {
        for _ in 0..10 {
            let m = random_matrix(&mut rng, 5, 6);
            match boyar(&m, limit, &ctl) {
                Ok(s) => {
                    assert!(s.depth <= limit, "depth {} over limit {limit}", s.depth);
                    assert_eq!(s.depth, max_line_depth(&s.program));
                    eval::check_program(&m, &s);
                }
                // A tight limit may make progress impossible.
                Err(SolveError::CapacityExceeded) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
    }
}

#[test]
fn sbp_respects_the_depth_limit() {
    let mut rng = ChaCha20Rng::from_seed([9; 32]);
    let ctl = RunControl::new();

    for _ in 0..10 {
        let m = random_matrix(&mut rng, 4, 6);
        match sbp(&m, 4, DEFAULT_PROGRAM_CAP, &ctl) {
            Ok(s) => {
                assert!(s.depth <= 4);
                if s.is_complete() {
                    eval::check_program(&m, &s);
                }
            }
            Err(SolveError::DepthInfeasible { .. } | SolveError::CapacityExceeded) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}

#[test]
fn sbp_program_cap_truncates_gracefully() {
    // Four easy moves are needed; a cap of 2 stops the run after the
    // third line without failing it.
    let m = GfMatrix::from_bits(&[
        vec![1, 1, 0, 0],
        vec![0, 1, 1, 0],
        vec![0, 0, 1, 1],
        vec![1, 0, 0, 1],
    ])
    .unwrap();

    let s = sbp(&m, 10, 2, &RunControl::new()).unwrap();
    assert!(!s.is_complete());
    assert_eq!(s.targets_found, 3);
    assert_eq!(s.xor_count, 3);
    eval::check_program(&m, &s);
    eval::check_bp_counts(&s);

    let full = sbp(&m, 10, DEFAULT_PROGRAM_CAP, &RunControl::new()).unwrap();
    assert!(full.is_complete());
    assert_eq!(full.xor_count, 4);
}
