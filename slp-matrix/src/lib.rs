//! Binary matrices over GF(2), bit-packed per row.

use std::fmt;
use std::ops::{BitAnd, BitXor, BitXorAssign, Not};

use thiserror::Error;

pub mod archive;
pub mod inverse;

pub use archive::{parse_archive, ArchiveEntry};
pub use inverse::invert;

/// Widest matrix a `Row` can carry.
pub const MAX_WIDTH: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    #[error("matrix width {width} exceeds the supported maximum of {MAX_WIDTH}")]
    WidthTooLarge { width: usize },

    #[error("row {row} has {len} entries, expected {width}")]
    RaggedRow { row: usize, len: usize, width: usize },

    #[error("matrix is not square: {height}x{width}")]
    NotSquare { height: usize, width: usize },

    #[error("matrix is singular over GF(2)")]
    Singular,
}

/// One row (or column) of a binary matrix, packed into a machine word.
/// Bit `j` carries the coefficient of input `x_j`; the low bit is column 0.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Row(u128);

impl Row {
    pub const ZERO: Row = Row(0);

    /// The unit vector with only bit `j` set.
    pub fn unit(j: usize) -> Self {
        debug_assert!(j < MAX_WIDTH);
        Row(1u128 << j)
    }

    pub fn bit(&self, j: usize) -> bool {
        j < MAX_WIDTH && (self.0 >> j) & 1 == 1
    }

    pub fn set_bit(&mut self, j: usize) {
        debug_assert!(j < MAX_WIDTH);
        self.0 |= 1u128 << j;
    }

    /// Hamming weight.
    pub fn popcount(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn as_u128(&self) -> u128 {
        self.0
    }
}

impl BitXor for Row {
    type Output = Row;
    fn bitxor(self, rhs: Row) -> Row {
        Row(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Row {
    fn bitxor_assign(&mut self, rhs: Row) {
        self.0 ^= rhs.0;
    }
}

impl BitAnd for Row {
    type Output = Row;
    fn bitand(self, rhs: Row) -> Row {
        Row(self.0 & rhs.0)
    }
}

impl Not for Row {
    type Output = Row;
    fn not(self) -> Row {
        Row(!self.0)
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row({:#x})", self.0)
    }
}

/// A binary matrix stored as bit-packed rows.
///
/// Construction validates width and rectangularity only; emptiness and
/// height limits are the concern of whoever consumes the matrix, so that
/// degenerate inputs surface where the caller can name them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GfMatrix {
    width: usize,
    rows: Vec<Row>,
}

impl GfMatrix {
    pub fn new(width: usize, rows: Vec<Row>) -> Result<Self, MatrixError> {
        if width > MAX_WIDTH {
            return Err(MatrixError::WidthTooLarge { width });
        }
        Ok(Self { width, rows })
    }

    /// Build from rows of 0/1 values.
    pub fn from_bits(bits: &[Vec<u8>]) -> Result<Self, MatrixError> {
        let width = bits.first().map_or(0, |r| r.len());
        if width > MAX_WIDTH {
            return Err(MatrixError::WidthTooLarge { width });
        }
        let mut rows = Vec::with_capacity(bits.len());
        for (i, r) in bits.iter().enumerate() {
            if r.len() != width {
                return Err(MatrixError::RaggedRow { row: i, len: r.len(), width });
            }
            let mut row = Row::ZERO;
            for (j, &b) in r.iter().enumerate() {
                if b == 1 {
                    row.set_bit(j);
                }
            }
            rows.push(row);
        }
        Ok(Self { width, rows })
    }

    /// Tolerant entry parsing: whitespace is trimmed and exactly the
    /// string `"1"` counts as a set bit, anything else as zero.
    pub fn parse_entries<S: AsRef<str>>(entries: &[Vec<S>]) -> Result<Self, MatrixError> {
        let width = entries.first().map_or(0, |r| r.len());
        if width > MAX_WIDTH {
            return Err(MatrixError::WidthTooLarge { width });
        }
        let mut rows = Vec::with_capacity(entries.len());
        for (i, r) in entries.iter().enumerate() {
            if r.len() != width {
                return Err(MatrixError::RaggedRow { row: i, len: r.len(), width });
            }
            let mut row = Row::ZERO;
            for (j, e) in r.iter().enumerate() {
                if e.as_ref().trim() == "1" {
                    row.set_bit(j);
                }
            }
            rows.push(row);
        }
        Ok(Self { width, rows })
    }

    pub fn identity(n: usize) -> Self {
        assert!(n <= MAX_WIDTH);
        Self {
            width: n,
            rows: (0..n).map(Row::unit).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_square(&self) -> bool {
        self.width == self.rows.len()
    }

    pub fn row(&self, i: usize) -> Row {
        self.rows[i]
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn bit(&self, i: usize, j: usize) -> bool {
        self.rows[i].bit(j)
    }

    /// Column `j` as a height-indexed bit-vector: bit `i` is `M[i][j]`.
    /// Only meaningful while the height fits a `Row`.
    pub fn column(&self, j: usize) -> Row {
        debug_assert!(self.rows.len() <= MAX_WIDTH);
        let mut col = Row::ZERO;
        for (i, row) in self.rows.iter().enumerate() {
            if row.bit(j) {
                col.set_bit(i);
            }
        }
        col
    }

    pub fn columns(&self) -> Vec<Row> {
        (0..self.width).map(|j| self.column(j)).collect()
    }

    /// Total number of set entries.
    pub fn popcount(&self) -> u32 {
        self.rows.iter().map(Row::popcount).sum()
    }

    /// Hamming-XOR lower-bound proxy: total popcount minus the column
    /// count (the cost of the naive row-by-row evaluation).
    pub fn ham_xor(&self) -> i64 {
        i64::from(self.popcount()) - self.width as i64
    }

    /// Row-wise hex rendering, each row padded to a 4-bit boundary,
    /// rows joined with commas.
    pub fn to_hex(&self) -> String {
        let padded = self.width.div_ceil(4) * 4;
        let mut out = String::new();
        for (k, row) in self.rows.iter().enumerate() {
            if k > 0 {
                out.push(',');
            }
            for nibble_start in (0..padded).step_by(4) {
                let mut val = 0u8;
                for offset in 0..4 {
                    val <<= 1;
                    if row.bit(nibble_start + offset) {
                        val |= 1;
                    }
                }
                out.push(char::from_digit(u32::from(val), 16).unwrap().to_ascii_uppercase());
            }
        }
        out
    }

    /// Bracketed text form, one `[1 0 1]` line per row. Round-trips with
    /// the archive parser.
    pub fn to_binary_text(&self) -> String {
        let mut out = String::new();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push('[');
            for j in 0..self.width {
                if j > 0 {
                    out.push(' ');
                }
                out.push(if row.bit(j) { '1' } else { '0' });
            }
            out.push(']');
        }
        out
    }
}
