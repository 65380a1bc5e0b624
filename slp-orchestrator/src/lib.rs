//! Uniform driver over the four SLP solvers, with bulk evaluation.
//!
//! One matrix, one algorithm, one call: [`solve`] runs the solver and
//! times it. [`evaluate`] fans one matrix out across algorithms and
//! aggregates the smallest XOR count; [`evaluate_all`] does that for a
//! batch in parallel; [`evaluate_with_inverse`] chains the GF(2)
//! inverse of a square matrix through the same pipeline.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use slp_matrix::{invert, GfMatrix, MatrixError, MAX_WIDTH};
use slp_solvers::{
    boyar, paar, sbp, slp_heuristic, RunControl, SolveError, Solution, DEFAULT_DEPTH_LIMIT,
    DEFAULT_PROGRAM_CAP,
};

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error(transparent)]
    Solve(#[from] SolveError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Boyar,
    Paar,
    Slp,
    Sbp,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [Algorithm::Boyar, Algorithm::Paar, Algorithm::Slp, Algorithm::Sbp];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Boyar => "boyar",
            Algorithm::Paar => "paar",
            Algorithm::Slp => "slp",
            Algorithm::Sbp => "sbp",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "boyar" => Ok(Algorithm::Boyar),
            "paar" => Ok(Algorithm::Paar),
            "slp" => Ok(Algorithm::Slp),
            "sbp" => Ok(Algorithm::Sbp),
            other => Err(format!("unknown algorithm '{other}' (expected boyar, paar, slp or sbp)")),
        }
    }
}

/// Knobs for the depth-aware solvers.
#[derive(Clone, Copy, Debug)]
pub struct SolveConfig {
    pub depth_limit: u32,
    pub program_cap: usize,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self { depth_limit: DEFAULT_DEPTH_LIMIT, program_cap: DEFAULT_PROGRAM_CAP }
    }
}

/// Timing and size metrics returned alongside a solution.
#[derive(Clone, Debug, Serialize)]
pub struct Metrics {
    pub solve_ms: f64,
    pub program_lines: usize,
}

/// Run one solver over one matrix.
pub fn solve(
    algorithm: Algorithm,
    matrix: &GfMatrix,
    config: &SolveConfig,
    ctl: &RunControl,
) -> Result<(Solution, Metrics), SolveError> {
    let t0 = Instant::now();
    let solution = match algorithm {
        Algorithm::Boyar => boyar(matrix, config.depth_limit, ctl),
        Algorithm::Paar => paar(matrix, ctl),
        Algorithm::Slp => slp_heuristic(matrix, ctl),
        Algorithm::Sbp => sbp(matrix, config.depth_limit, config.program_cap, ctl),
    }?;
    let metrics = Metrics {
        solve_ms: t0.elapsed().as_secs_f64() * 1000.0,
        program_lines: solution.program.len(),
    };
    debug!(
        algorithm = algorithm.name(),
        xor_count = solution.xor_count,
        depth = solution.depth,
        solve_ms = metrics.solve_ms,
        "solve finished"
    );
    Ok((solution, metrics))
}

/// Parse raw `{0,1}` entries, then solve. Shape problems surface before
/// any solver work.
pub fn solve_entries<S: AsRef<str>>(
    algorithm: Algorithm,
    entries: &[Vec<S>],
    config: &SolveConfig,
    ctl: &RunControl,
) -> Result<(Solution, Metrics), OrchestratorError> {
    let matrix = GfMatrix::parse_entries(entries).map_err(|e| match e {
        MatrixError::WidthTooLarge { width } => {
            OrchestratorError::Solve(SolveError::WidthTooLarge { width, max: MAX_WIDTH })
        }
        other => OrchestratorError::Matrix(other),
    })?;
    solve(algorithm, &matrix, config, ctl).map_err(OrchestratorError::Solve)
}

/// One algorithm's outcome within a [`MatrixReport`].
#[derive(Clone, Debug, Serialize)]
pub struct AlgorithmResult {
    pub algorithm: Algorithm,
    pub solution: Option<Solution>,
    pub metrics: Option<Metrics>,
    pub error: Option<String>,
}

/// All requested algorithms over one matrix.
#[derive(Clone, Debug, Serialize)]
pub struct MatrixReport {
    pub index: usize,
    pub ham_xor: i64,
    pub results: Vec<AlgorithmResult>,
    /// Best XOR count among algorithms that realised every target.
    pub smallest_xor: Option<usize>,
}

/// Run `algorithms` over `matrix`, tolerating per-algorithm failures.
pub fn evaluate(
    index: usize,
    matrix: &GfMatrix,
    algorithms: &[Algorithm],
    config: &SolveConfig,
    ctl: &RunControl,
) -> MatrixReport {
    let mut results = Vec::with_capacity(algorithms.len());
    let mut smallest_xor: Option<usize> = None;

    for &algorithm in algorithms {
        match solve(algorithm, matrix, config, ctl) {
            Ok((solution, metrics)) => {
                if solution.is_complete() {
                    smallest_xor = Some(smallest_xor.map_or(solution.xor_count, |s| s.min(solution.xor_count)));
                }
                results.push(AlgorithmResult {
                    algorithm,
                    solution: Some(solution),
                    metrics: Some(metrics),
                    error: None,
                });
            }
            Err(e) => {
                warn!(algorithm = algorithm.name(), error = %e, "algorithm failed");
                results.push(AlgorithmResult {
                    algorithm,
                    solution: None,
                    metrics: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    MatrixReport { index, ham_xor: matrix.ham_xor(), results, smallest_xor }
}

/// Evaluate a batch of matrices in parallel. Reports come back in input
/// order; each matrix still runs its solvers sequentially.
pub fn evaluate_all(
    matrices: &[GfMatrix],
    algorithms: &[Algorithm],
    config: &SolveConfig,
    ctl: &RunControl,
) -> Vec<MatrixReport> {
    info!(count = matrices.len(), "bulk evaluation started");
    let reports: Vec<MatrixReport> = matrices
        .par_iter()
        .enumerate()
        .map(|(index, matrix)| evaluate(index, matrix, algorithms, config, ctl))
        .collect();
    info!(count = reports.len(), "bulk evaluation finished");
    reports
}

/// A matrix evaluated together with its GF(2) inverse.
#[derive(Clone, Debug, Serialize)]
pub struct InverseReport {
    pub original: MatrixReport,
    pub inverse: Option<MatrixReport>,
    pub inverse_error: Option<String>,
}

/// Evaluate `matrix` and, when it is invertible, its inverse under the
/// same algorithms.
pub fn evaluate_with_inverse(
    index: usize,
    matrix: &GfMatrix,
    algorithms: &[Algorithm],
    config: &SolveConfig,
    ctl: &RunControl,
) -> InverseReport {
    let original = evaluate(index, matrix, algorithms, config, ctl);
    match invert(matrix) {
        Ok(inverse) => InverseReport {
            original,
            inverse: Some(evaluate(index, &inverse, algorithms, config, ctl)),
            inverse_error: None,
        },
        Err(e) => {
            warn!(index, error = %e, "inverse not available");
            InverseReport { original, inverse: None, inverse_error: Some(e.to_string()) }
        }
    }
}
