//! Typed program lines and their canonical text rendering.
//!
//! The operation list is the primary output; the `x0`/`t1`/`y0` string
//! forms are a formatting concern layered on top via `Display`.

use std::fmt;

use serde::Serialize;

/// A reference to an already-realised signal: an input bit or a
/// synthesised intermediate (1-based, so the first `t` line is `t1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Operand {
    Input(usize),
    Temp(usize),
}

impl Operand {
    /// Name the base element at `index`, where the first `num_inputs`
    /// base slots are the inputs.
    pub(crate) fn from_base_index(index: usize, num_inputs: usize) -> Self {
        if index < num_inputs {
            Operand::Input(index)
        } else {
            Operand::Temp(index - num_inputs + 1)
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Input(i) => write!(f, "x{i}"),
            Operand::Temp(k) => write!(f, "t{k}"),
        }
    }
}

/// One assignment of a straight-line program.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Line {
    /// `y{target} = x{input}`: the target row is a bare input.
    Unit { target: usize, input: usize },

    /// `y{target} = a + b`: an easy move in the unbounded driver.
    TargetXor { target: usize, a: Operand, b: Operand },

    /// `t{index} = a + b`: a new intermediate, depth-tagged by the
    /// depth-aware drivers.
    Intermediate {
        index: usize,
        a: Operand,
        b: Operand,
        depth: Option<u32>,
    },

    /// `t{index} = a + b * y{target} (depth)`: a depth-variant easy
    /// move, an intermediate that is also target `target`.
    TargetIntermediate {
        index: usize,
        a: Operand,
        b: Operand,
        target: usize,
        depth: u32,
    },

    /// `x{index} = x{a} + x{b}`: a merged column introduced by Paar.
    ColumnXor { index: usize, a: usize, b: usize },

    /// `y{target} = x{c1} + x{c2} + ...`: a Paar output equation over
    /// the surviving columns.
    OutputSum { target: usize, terms: Vec<usize> },
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Unit { target, input } => write!(f, "y{target} = x{input}"),
            Line::TargetXor { target, a, b } => write!(f, "y{target} = {a} + {b}"),
            Line::Intermediate { index, a, b, depth: None } => {
                write!(f, "t{index} = {a} + {b}")
            }
            Line::Intermediate { index, a, b, depth: Some(d) } => {
                write!(f, "t{index} = {a} + {b} ({d})")
            }
            Line::TargetIntermediate { index, a, b, target, depth } => {
                write!(f, "t{index} = {a} + {b} * y{target} ({depth})")
            }
            Line::ColumnXor { index, a, b } => write!(f, "x{index} = x{a} + x{b}"),
            Line::OutputSum { target, terms } => {
                write!(f, "y{target} = ")?;
                for (k, c) in terms.iter().enumerate() {
                    if k > 0 {
                        write!(f, " + ")?;
                    }
                    write!(f, "x{c}")?;
                }
                Ok(())
            }
        }
    }
}

/// The outcome of one solver run.
///
/// `targets_found < num_targets` marks a run the SBP program cap cut
/// short; the partial program is still valid as far as it goes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Solution {
    /// Synthesised two-operand XORs (degenerate `y = x` lines excluded).
    pub xor_count: usize,
    /// Largest circuit depth of any synthesised signal; 0 for the
    /// depth-unaware drivers.
    pub depth: u32,
    pub program: Vec<Line>,
    pub targets_found: usize,
    pub num_targets: usize,
}

impl Solution {
    pub fn is_complete(&self) -> bool {
        self.targets_found == self.num_targets
    }

    /// The program as display strings, one per line.
    pub fn render(&self) -> Vec<String> {
        self.program.iter().map(ToString::to_string).collect()
    }
}
