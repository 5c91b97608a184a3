use crate::{Position, RegionId, RegionMap};
use serde::{Deserialize, Serialize};

/// A single violated placement constraint.
///
/// Returned as data, never as an error: a wrong placement is an
/// expected outcome, and the caller decides how to present it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Violation {
    /// A row holds more than one bean.
    RowCount { row: usize, count: usize },
    /// A column holds more than one bean.
    ColumnCount { col: usize, count: usize },
    /// A region holds more than one bean.
    RegionCount { region: RegionId, count: usize },
    /// Two beans touch, including diagonally. Normalized so `a <= b`,
    /// which keeps reports independent of input order.
    Adjacent { a: Position, b: Position },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::RowCount { row, count } => {
                write!(f, "row {} holds {} beans", row, count)
            }
            Violation::ColumnCount { col, count } => {
                write!(f, "column {} holds {} beans", col, count)
            }
            Violation::RegionCount { region, count } => {
                write!(f, "region {} holds {} beans", region, count)
            }
            Violation::Adjacent { a, b } => {
                write!(
                    f,
                    "beans at ({},{}) and ({},{}) are touching",
                    a.row, a.col, b.row, b.col
                )
            }
        }
    }
}

/// Outcome of validating a candidate placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
}

/// Check a candidate placement against every placement constraint.
///
/// Reports all violations rather than stopping at the first. Rows,
/// columns and regions holding no bean are not violations, so a
/// partially filled board validates clean while the player is still
/// placing. Positions must lie on the board.
pub fn validate_placement(placement: &[Position], regions: &RegionMap) -> ValidationReport {
    let size = regions.size();
    debug_assert!(placement.iter().all(|p| p.row < size && p.col < size));

    let mut row_counts = vec![0usize; size];
    let mut col_counts = vec![0usize; size];
    let mut region_counts = vec![0usize; size];
    for pos in placement {
        row_counts[pos.row] += 1;
        col_counts[pos.col] += 1;
        region_counts[regions.region(*pos) as usize] += 1;
    }

    let mut violations = Vec::new();
    for (row, &count) in row_counts.iter().enumerate() {
        if count > 1 {
            violations.push(Violation::RowCount { row, count });
        }
    }
    for (col, &count) in col_counts.iter().enumerate() {
        if count > 1 {
            violations.push(Violation::ColumnCount { col, count });
        }
    }
    for (region, &count) in region_counts.iter().enumerate() {
        if count > 1 {
            violations.push(Violation::RegionCount {
                region: region as RegionId,
                count,
            });
        }
    }

    let mut adjacent = Vec::new();
    for (i, a) in placement.iter().enumerate() {
        for b in &placement[i + 1..] {
            if a.is_adjacent(*b) {
                let (a, b) = if a <= b { (*a, *b) } else { (*b, *a) };
                adjacent.push((a, b));
            }
        }
    }
    adjacent.sort_unstable();
    adjacent.dedup();
    violations.extend(
        adjacent
            .into_iter()
            .map(|(a, b)| Violation::Adjacent { a, b }),
    );

    ValidationReport {
        is_valid: violations.is_empty(),
        violations,
    }
}

/// Whether the placement is complete and violation-free.
pub fn is_solution(placement: &[Position], regions: &RegionMap) -> bool {
    placement.len() == regions.size() && validate_placement(placement, regions).is_valid
}
