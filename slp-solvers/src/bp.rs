//! The Boyar-Peralta family of drivers.
//!
//! Three entry points share one state machine: `slp_heuristic` (no
//! depth bound), `boyar` (depth-bounded), and `sbp` (depth-bounded with
//! a program-length cap and a feasibility pre-check). The loop
//! alternates `easy_move` (finish a target at distance 1) with
//! `pick_new_base_element` (greedy total-distance minimisation over all
//! XOR pairs of the current base).

use slp_matrix::{GfMatrix, Row};

use crate::base::{BaseSet, BASE_CAP};
use crate::control::RunControl;
use crate::error::SolveError;
use crate::program::{Line, Operand, Solution};

pub const DEFAULT_DEPTH_LIMIT: u32 = 10;
pub const DEFAULT_PROGRAM_CAP: usize = 1000;

/// Hard bound on loop iterations; reaching it means the run failed to
/// make progress and surfaces `CapacityExceeded`.
const MAX_ITERATIONS: usize = 50_000;

/// Geometric depth weight `2^d`, saturated at the word width.
fn pow2(d: u32) -> u64 {
    1u64 << d.min(63)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Variant {
    /// SLP-Heuristic: depth recorded but never bounded.
    Unbounded,
    /// BoyarSLP: pairs that would reach the depth limit are skipped.
    DepthBounded,
    /// SBP: depth-bounded plus a program-length cutoff.
    LengthCapped,
}

impl Variant {
    fn depth_aware(self) -> bool {
        matches!(self, Variant::DepthBounded | Variant::LengthCapped)
    }
}

/// Unbounded Boyar-Peralta heuristic.
pub fn slp_heuristic(matrix: &GfMatrix, ctl: &RunControl) -> Result<Solution, SolveError> {
    Driver::new(matrix, Variant::Unbounded, DEFAULT_DEPTH_LIMIT, None)?.run(ctl)
}

/// Depth-bounded Boyar-Peralta: every synthesised signal stays below
/// `depth_limit`.
pub fn boyar(matrix: &GfMatrix, depth_limit: u32, ctl: &RunControl) -> Result<Solution, SolveError> {
    Driver::new(matrix, Variant::DepthBounded, depth_limit, None)?.run(ctl)
}

/// Depth-bounded Boyar-Peralta with a program-length cap: once more
/// than `program_cap` XORs have been emitted the run stops and returns
/// the partial program (`targets_found < num_targets` in the result).
/// Instances whose largest initial distance cannot fit the depth budget
/// are rejected up front with `DepthInfeasible`.
pub fn sbp(
    matrix: &GfMatrix,
    depth_limit: u32,
    program_cap: usize,
    ctl: &RunControl,
) -> Result<Solution, SolveError> {
    let driver = Driver::new(matrix, Variant::LengthCapped, depth_limit, Some(program_cap))?;
    let max_dist = driver.dist.iter().copied().max().unwrap_or(0);
    if max_dist as u64 + 1 > pow2(depth_limit) {
        return Err(SolveError::DepthInfeasible { max_dist, depth_limit });
    }
    driver.run(ctl)
}

struct Driver {
    variant: Variant,
    depth_limit: u32,
    program_cap: Option<usize>,
    num_inputs: usize,
    targets: Vec<Row>,
    dist: Vec<usize>,
    ndist: Vec<usize>,
    base: BaseSet,
    found: Vec<bool>,
    targets_found: usize,
    program: Vec<Line>,
    program_size: usize,
    max_depth: u32,
}

impl Driver {
    fn new(
        matrix: &GfMatrix,
        variant: Variant,
        depth_limit: u32,
        program_cap: Option<usize>,
    ) -> Result<Self, SolveError> {
        let num_targets = matrix.height();
        let num_inputs = matrix.width();
        if num_targets == 0 || num_inputs == 0 {
            return Err(SolveError::EmptyMatrix);
        }
        if num_targets > BASE_CAP {
            return Err(SolveError::HeightTooLarge { height: num_targets, max: BASE_CAP });
        }

        let targets: Vec<Row> = matrix.rows().to_vec();
        // popcount - 1 is the lower bound on XORs for a p-input sum;
        // zero rows start (and stay) at distance 0.
        let dist: Vec<usize> = targets
            .iter()
            .map(|t| (t.popcount() as usize).saturating_sub(1))
            .collect();

        let mut driver = Self {
            variant,
            depth_limit,
            program_cap,
            num_inputs,
            ndist: vec![0; num_targets],
            base: BaseSet::with_inputs(num_inputs),
            found: vec![false; num_targets],
            targets_found: 0,
            program: Vec::new(),
            program_size: 0,
            max_depth: 0,
            targets,
            dist,
        };
        driver.init_found();
        Ok(driver)
    }

    /// Count targets realised by the inputs alone. The depth-aware
    /// drivers emit a `y = x` line per unit row; zero rows count as
    /// found and emit nothing.
    fn init_found(&mut self) {
        for i in 0..self.targets.len() {
            if self.dist[i] != 0 {
                continue;
            }
            self.found[i] = true;
            self.targets_found += 1;
            if self.variant.depth_aware() && !self.targets[i].is_zero() {
                if let Some(j) = (0..self.num_inputs).find(|&j| self.base.value(j) == self.targets[i]) {
                    self.program.push(Line::Unit { target: i, input: j });
                }
            }
        }
    }

    /// Record every not-yet-found target index the new element realises.
    /// Counting per index keeps duplicate rows from stalling the loop.
    fn mark_found(&mut self, row: Row) {
        for u in 0..self.targets.len() {
            if !self.found[u] && self.targets[u] == row {
                self.found[u] = true;
                self.targets_found += 1;
            }
        }
    }

    fn run(mut self, ctl: &RunControl) -> Result<Solution, SolveError> {
        let num_targets = self.targets.len();
        let mut iterations = 0usize;

        while self.targets_found < num_targets {
            ctl.check()?;
            if iterations >= MAX_ITERATIONS {
                return Err(SolveError::CapacityExceeded);
            }
            if self.program_cap.is_some_and(|cap| self.program_size > cap) {
                break;
            }
            if !self.easy_move()? {
                self.pick_new_base_element()?;
            }
            iterations += 1;
        }

        Ok(Solution {
            xor_count: self.program_size,
            depth: self.max_depth,
            program: self.program,
            targets_found: self.targets_found,
            num_targets,
        })
    }

    /// Can `t` be written as the XOR of exactly `k` base elements drawn
    /// from index `s` onward, their summed depth weights within
    /// `budget`? `None` budget disables the depth accounting.
    fn reachable(&self, t: Row, k: usize, s: usize, budget: Option<u64>) -> bool {
        if self.base.len() - s < k {
            return false;
        }
        if budget.is_some_and(|b| b < 1) {
            return false;
        }
        if k == 0 {
            return false;
        }
        if k == 1 {
            return (s..self.base.len()).any(|i| {
                self.base.value(i) == t
                    && budget.is_none_or(|b| pow2(self.base.depth(i)) <= b)
            });
        }

        // Either element s participates (spending its depth weight, when
        // the remaining budget can afford it) or it does not.
        let with_s = match budget {
            None => Some(None),
            Some(b) => b.checked_sub(pow2(self.base.depth(s))).map(Some),
        };
        if let Some(rem) = with_s {
            if self.reachable(t ^ self.base.value(s), k - 1, s + 1, rem) {
                return true;
            }
        }
        self.reachable(t, k, s + 1, budget)
    }

    /// Distance of target `u` if `new_base` joined the base, given the
    /// depth budget remaining after paying for `new_base` itself.
    fn new_distance(&self, u: usize, new_base: Row, budget: Option<u64>) -> usize {
        let t = self.targets[u];
        if self.dist[u] == 0 || t == new_base || self.base.contains(t) {
            return 0;
        }
        if self.reachable(t ^ new_base, self.dist[u] - 1, 0, budget) {
            self.dist[u] - 1
        } else {
            self.dist[u]
        }
    }

    /// Sum of `new_distance` over all targets; records the per-target
    /// values in `ndist` for the norm tie-break.
    fn total_distance(&mut self, new_base: Row, budget: Option<u64>) -> usize {
        let mut total = 0;
        for u in 0..self.targets.len() {
            let d = self.new_distance(u, new_base, budget);
            self.ndist[u] = d;
            total += d;
        }
        total
    }

    /// Budget left under the depth limit after spending `tag` on the
    /// candidate element. `None` for the unbounded driver.
    fn remaining_budget(&self, tag: u64) -> Option<u64> {
        if self.variant.depth_aware() {
            Some(pow2(self.depth_limit).saturating_sub(tag))
        } else {
            None
        }
    }

    /// Finish the first target at distance 1, if any.
    fn easy_move(&mut self) -> Result<bool, SolveError> {
        let Some(t) = (0..self.targets.len()).find(|&i| self.dist[i] == 1) else {
            return Ok(false);
        };
        let new_base = self.targets[t];

        // Distance 1 guarantees some base pair XORs to the target.
        let (pi, pj) = self
            .parent_pair(new_base)
            .ok_or(SolveError::CapacityExceeded)?;
        let new_depth = self.base.depth(pi).max(self.base.depth(pj)) + 1;

        // The depth weight charged for the new element: BoyarSLP takes
        // the cheapest realisation over all parent pairs, SBP the
        // recorded pair.
        let tag = match self.variant {
            Variant::DepthBounded => self.min_pair_tag(new_base),
            _ => pow2(new_depth),
        };
        let budget = self.remaining_budget(tag);

        match self.variant {
            Variant::Unbounded => {
                // Distances are refreshed against the base as it stands,
                // then the element is appended.
                for u in 0..self.targets.len() {
                    self.dist[u] = self.new_distance(u, new_base, budget);
                }
                self.push_element(new_base, new_depth)?;
                self.program_size += 1;
                self.program.push(Line::TargetXor {
                    target: t,
                    a: self.operand(pi),
                    b: self.operand(pj),
                });
            }
            Variant::DepthBounded | Variant::LengthCapped => {
                // Append first so the refreshed distances may route
                // through the new element.
                self.push_element(new_base, new_depth)?;
                for u in 0..self.targets.len() {
                    self.dist[u] = self.new_distance(u, new_base, budget);
                }
                self.program_size += 1;
                self.program.push(Line::TargetIntermediate {
                    index: self.program_size,
                    a: self.operand(pi),
                    b: self.operand(pj),
                    target: t,
                    depth: new_depth,
                });
            }
        }
        self.mark_found(new_base);
        Ok(true)
    }

    /// Greedily add the XOR pair minimising the total distance, ties
    /// broken towards the larger squared-distance norm, further ties
    /// towards the first pair in scan order.
    fn pick_new_base_element(&mut self) -> Result<(), SolveError> {
        let size = self.base.len();
        let num_targets = self.targets.len();
        let depth_aware = self.variant.depth_aware();

        let mut best: Option<(usize, usize, Row)> = None;
        let mut min_distance = size * num_targets;
        let mut old_norm = 0usize;
        let mut best_dist = vec![0usize; num_targets];

        for i in 0..size {
            if depth_aware && self.base.depth(i) + 1 >= self.depth_limit {
                continue;
            }
            for j in (i + 1)..size {
                if depth_aware && self.base.depth(j) + 1 >= self.depth_limit {
                    continue;
                }
                let cand = self.base.value(i) ^ self.base.value(j);
                if cand.is_zero() || self.base.contains(cand) {
                    continue;
                }

                let tag = pow2(self.base.depth(i).max(self.base.depth(j)) + 1);
                let budget = self.remaining_budget(tag);
                let this_dist = self.total_distance(cand, budget);
                if this_dist <= min_distance {
                    let this_norm: usize = self.ndist.iter().map(|d| d * d).sum();
                    if this_dist < min_distance || this_norm > old_norm {
                        best = Some((i, j, cand));
                        best_dist.copy_from_slice(&self.ndist);
                        min_distance = this_dist;
                        old_norm = this_norm;
                    }
                }
            }
        }

        // Nothing survived the filters: no further progress is possible.
        let Some((bi, bj, cand)) = best else {
            return Err(SolveError::CapacityExceeded);
        };

        self.dist.copy_from_slice(&best_dist);
        let new_depth = self.base.depth(bi).max(self.base.depth(bj)) + 1;
        self.push_element(cand, new_depth)?;
        self.program_size += 1;
        self.program.push(Line::Intermediate {
            index: self.program_size,
            a: self.operand(bi),
            b: self.operand(bj),
            depth: depth_aware.then_some(new_depth),
        });
        self.mark_found(cand);
        Ok(())
    }

    fn push_element(&mut self, row: Row, depth: u32) -> Result<(), SolveError> {
        self.base.push(row, depth)?;
        if depth > self.max_depth {
            self.max_depth = depth;
        }
        Ok(())
    }

    fn operand(&self, base_index: usize) -> Operand {
        Operand::from_base_index(base_index, self.num_inputs)
    }

    /// First base pair (i < j) XORing to `row`, in scan order.
    fn parent_pair(&self, row: Row) -> Option<(usize, usize)> {
        let size = self.base.len();
        for i in 0..size {
            for j in (i + 1)..size {
                if self.base.value(i) ^ self.base.value(j) == row {
                    return Some((i, j));
                }
            }
        }
        None
    }

    /// Cheapest depth weight over every parent pair realising `row`;
    /// falls back to the full depth budget when no pair exists.
    fn min_pair_tag(&self, row: Row) -> u64 {
        let size = self.base.len();
        let mut tag = pow2(self.depth_limit);
        for i in 0..size {
            for j in (i + 1)..size {
                if self.base.value(i) ^ self.base.value(j) == row {
                    let d = self.base.depth(i).max(self.base.depth(j)) + 1;
                    tag = tag.min(pow2(d));
                }
            }
        }
        tag
    }
}
