//! Heuristic straight-line-program solvers for GF(2) matrix-vector
//! products.
//!
//! Given a binary matrix M, each solver emits a sequence of two-operand
//! XOR assignments realising every row of M over the input bits, trying
//! to keep the XOR count (and, for the depth-aware drivers, the circuit
//! depth) small. Runs are deterministic, single-threaded, and share
//! nothing; cancellation is cooperative through [`RunControl`].

mod base;
mod bp;
pub mod control;
pub mod error;
mod paar;
pub mod program;

pub use base::BASE_CAP;
pub use bp::{boyar, sbp, slp_heuristic, DEFAULT_DEPTH_LIMIT, DEFAULT_PROGRAM_CAP};
pub use control::{CancelFlag, RunControl};
pub use error::SolveError;
pub use paar::paar;
pub use program::{Line, Operand, Solution};
