//! Error types shared by all solver drivers.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The matrix has no rows or no columns.
    #[error("empty matrix")]
    EmptyMatrix,

    /// More columns than a row vector can carry.
    #[error("matrix width {width} exceeds the supported maximum of {max}")]
    WidthTooLarge { width: usize, max: usize },

    /// More rows than the solver tables can carry.
    #[error("matrix height {height} exceeds the supported maximum of {max}")]
    HeightTooLarge { height: usize, max: usize },

    /// A target needs more XOR inputs than the depth budget can ever
    /// combine (SBP pre-check).
    #[error("depth limit {depth_limit} cannot realise a target at distance {max_dist}")]
    DepthInfeasible { max_dist: usize, depth_limit: u32 },

    /// Base or iteration capacity exhausted, or no candidate base
    /// element can make further progress.
    #[error("solver capacity exceeded")]
    CapacityExceeded,

    /// The caller cancelled the run or its deadline passed.
    #[error("solve aborted by caller")]
    Aborted,
}
