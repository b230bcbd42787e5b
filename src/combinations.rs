//! Combination tables: every 3-, 4- and 5-subset of the canonical lines whose
//! union fits within the cell budget.
//!
//! Candidate counts are C(12,3)=220, C(12,4)=495 and C(12,5)=792. With the
//! default budget of 16 cells, 220 / 344 / 8 survive the filter.
//!
//! The tables depend only on geometry and the budget, never on the board, so
//! the default-budget tables are built once per process ([`CombinationTables::shared`])
//! and every [`OracleContext`](crate::types::OracleContext) holds an `Arc` to them.
//! A context with a non-default budget builds its own set once at construction.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use crate::catalog::{canonical_lines, CanonicalLine};
use crate::constants::{COMBINATION_ARITIES, MAX_CELLS};
use crate::error::OracleError;

/// A set of distinct canonical lines and the union of their cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Combination {
    /// Canonical line ids, ascending.
    pub lines: Vec<u8>,
    pub union: u32,
}

impl Combination {
    #[inline(always)]
    pub fn union_size(&self) -> usize {
        self.union.count_ones() as usize
    }

    /// Cells of the union not present in `occupied`.
    #[inline(always)]
    pub fn missing(&self, occupied: u32) -> usize {
        (self.union & !occupied).count_ones() as usize
    }
}

#[derive(Clone, Debug)]
pub struct CombinationTable {
    pub arity: usize,
    pub combinations: Vec<Combination>,
}

impl CombinationTable {
    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Combination> {
        self.combinations.iter()
    }
}

/// Visit every k-subset of `0..n` in lexicographic order.
fn for_each_subset(n: usize, k: usize, mut f: impl FnMut(&[usize])) {
    if k == 0 || k > n {
        return;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        f(&idx);
        // Rightmost position that can still advance.
        let mut i = k;
        while i > 0 && idx[i - 1] == n - k + (i - 1) {
            i -= 1;
        }
        if i == 0 {
            return;
        }
        idx[i - 1] += 1;
        for j in i..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

/// Enumerate all `arity`-subsets of `lines` and keep those whose union has at
/// most `budget` cells.
pub fn build_table(lines: &[CanonicalLine], arity: usize, budget: usize) -> CombinationTable {
    let mut combinations = Vec::new();
    for_each_subset(lines.len(), arity, |subset| {
        let union = subset.iter().fold(0u32, |u, &i| u | lines[i].mask);
        if union.count_ones() as usize <= budget {
            combinations.push(Combination {
                lines: subset.iter().map(|&i| lines[i].id).collect(),
                union,
            });
        }
    });
    CombinationTable {
        arity,
        combinations,
    }
}

/// The three combination tables for one budget, indexed by arity.
#[derive(Debug)]
pub struct CombinationTables {
    budget: usize,
    tables: [CombinationTable; 3],
}

static SHARED: OnceLock<Arc<CombinationTables>> = OnceLock::new();

impl CombinationTables {
    pub fn build(budget: usize) -> Self {
        let start = Instant::now();
        let lines = canonical_lines();
        let tables = COMBINATION_ARITIES.map(|arity| build_table(lines, arity, budget));
        log::debug!(
            "combination tables (budget {}): {} / {} / {} in {:.2?}",
            budget,
            tables[0].len(),
            tables[1].len(),
            tables[2].len(),
            start.elapsed()
        );
        Self { budget, tables }
    }

    /// Process-wide tables for the default budget.
    pub fn shared() -> Arc<CombinationTables> {
        SHARED
            .get_or_init(|| Arc::new(CombinationTables::build(MAX_CELLS)))
            .clone()
    }

    /// Shared tables when `budget` is the default, otherwise a fresh build.
    pub fn for_budget(budget: usize) -> Arc<CombinationTables> {
        if budget == MAX_CELLS {
            Self::shared()
        } else {
            Arc::new(Self::build(budget))
        }
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Table for arity 3, 4 or 5.
    pub fn table(&self, arity: usize) -> Option<&CombinationTable> {
        self.tables.iter().find(|t| t.arity == arity)
    }

    /// Tables in arity order (3, 4, 5).
    pub fn iter(&self) -> impl Iterator<Item = &CombinationTable> {
        self.tables.iter()
    }

    /// Report the first arity whose table came out empty under this budget.
    /// An empty table is not fatal: that arity simply contributes nothing.
    pub fn check_feasible(&self) -> Result<(), OracleError> {
        match self.tables.iter().find(|t| t.is_empty()) {
            Some(t) => Err(OracleError::EnumerationInfeasible {
                arity: t.arity,
                budget: self.budget,
            }),
            None => Ok(()),
        }
    }
}
