//! Paar's greedy common-subexpression elimination.
//!
//! Works column-wise: column `j` is the height-indexed bit-vector of
//! the rows using input `x_j`. The pair of columns sharing the most
//! rows is repeatedly factored into a fresh column until no pair shares
//! more than one row, then each row is emitted as the sum of its
//! surviving columns.

use slp_matrix::{GfMatrix, MAX_WIDTH};

use crate::base::BASE_CAP;
use crate::control::RunControl;
use crate::error::SolveError;
use crate::program::{Line, Solution};

pub fn paar(matrix: &GfMatrix, ctl: &RunControl) -> Result<Solution, SolveError> {
    let num_rows = matrix.height();
    let num_inputs = matrix.width();
    if num_rows == 0 || num_inputs == 0 {
        return Err(SolveError::EmptyMatrix);
    }
    // Columns are indexed by row number, so the height must fit a word.
    if num_rows > MAX_WIDTH {
        return Err(SolveError::HeightTooLarge { height: num_rows, max: MAX_WIDTH });
    }

    let mut columns = matrix.columns();
    let nonzero_rows = matrix.rows().iter().filter(|r| !r.is_zero()).count();
    // Cost of the naive row-by-row evaluation; zero rows cost nothing.
    let mut xor_count = matrix.popcount() as usize - nonzero_rows;
    let mut program = Vec::new();

    loop {
        ctl.check()?;

        let mut hw_max = 0;
        let mut best = (0usize, 0usize);
        for i in 0..columns.len() {
            for j in (i + 1)..columns.len() {
                let hw = (columns[i] & columns[j]).popcount();
                if hw > hw_max {
                    hw_max = hw;
                    best = (i, j);
                }
            }
        }
        if hw_max <= 1 {
            break;
        }

        if columns.len() >= BASE_CAP {
            return Err(SolveError::CapacityExceeded);
        }
        let (i, j) = best;
        let merged = columns[i] & columns[j];
        columns[i] = columns[i] & !merged;
        columns[j] = columns[j] & !merged;
        columns.push(merged);
        // One XOR builds the merged column, each shared row saves one.
        xor_count -= hw_max as usize - 1;
        program.push(Line::ColumnXor { index: columns.len() - 1, a: i, b: j });
    }

    for r in 0..num_rows {
        let terms: Vec<usize> = (0..columns.len()).filter(|&c| columns[c].bit(r)).collect();
        if !terms.is_empty() {
            program.push(Line::OutputSum { target: r, terms });
        }
    }

    Ok(Solution {
        xor_count,
        depth: 0,
        program,
        targets_found: num_rows,
        num_targets: num_rows,
    })
}
