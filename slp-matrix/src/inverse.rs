//! GF(2) matrix inversion by Gauss-Jordan elimination.

use crate::{GfMatrix, MatrixError, Row};

/// Invert a square binary matrix over GF(2).
///
/// Works on the augmented system `[M | I]`: rows are swapped to find a
/// pivot in each column, then cleared above and below with XOR row
/// operations. A column without a pivot means the matrix is singular.
pub fn invert(m: &GfMatrix) -> Result<GfMatrix, MatrixError> {
    let n = m.height();
    if !m.is_square() {
        return Err(MatrixError::NotSquare { height: n, width: m.width() });
    }

    let mut left: Vec<Row> = m.rows().to_vec();
    let mut right: Vec<Row> = (0..n).map(Row::unit).collect();

    for col in 0..n {
        let pivot = (col..n).find(|&r| left[r].bit(col)).ok_or(MatrixError::Singular)?;
        left.swap(col, pivot);
        right.swap(col, pivot);

        for r in 0..n {
            if r != col && left[r].bit(col) {
                let (lc, rc) = (left[col], right[col]);
                left[r] ^= lc;
                right[r] ^= rc;
            }
        }
    }

    GfMatrix::new(n, right)
}
