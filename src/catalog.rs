//! Line catalog: the 12 canonical 5-cell lines and their sub-lines.
//!
//! The catalog depends only on board geometry, so it is built once per
//! process behind a [`OnceLock`] and handed out as `&'static`.
//!
//! | Kind | Count | Derivation |
//! |------|-------|------------|
//! | five-cell | 12 | rows 0-4, columns 5-9, diagonals 12-13 |
//! | four-cell | 60 | each canonical line minus one cell |
//! | three-cell | 120 | each canonical line minus two cells, C(5,2) per line |

use std::sync::OnceLock;

use crate::constants::*;

/// One of the 12 fixed winning lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanonicalLine {
    pub id: u8,
    /// Cells in ascending index order.
    pub cells: [u8; LINE_LEN],
    pub mask: u32,
}

impl CanonicalLine {
    fn new(id: u8, cells: [u8; LINE_LEN]) -> Self {
        let mask = cells.iter().fold(0u32, |m, &c| m | cell_bit(c));
        Self { id, cells, mask }
    }

    #[inline(always)]
    pub fn contains(&self, cell: u8) -> bool {
        self.mask & cell_bit(cell) != 0
    }

    /// Number of this line's cells set in `occupied`.
    #[inline(always)]
    pub fn filled(&self, occupied: u32) -> u32 {
        (self.mask & occupied).count_ones()
    }
}

/// A line from the full catalog: a canonical line or one of its sub-lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineSegment {
    /// Id of the canonical line this segment was cut from.
    pub parent: u8,
    pub mask: u32,
}

impl LineSegment {
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Cells in ascending order.
    pub fn cells(&self) -> impl Iterator<Item = u8> + '_ {
        (0..BOARD_CELLS as u8).filter(move |&c| self.mask & cell_bit(c) != 0)
    }
}

pub struct LineCatalog {
    canonical: [CanonicalLine; NUM_LINES],
    four_cell: Vec<LineSegment>,
    three_cell: Vec<LineSegment>,
    /// Per cell: indices into `canonical` of the lines through it.
    through: [Vec<usize>; BOARD_CELLS],
}

static CATALOG: OnceLock<LineCatalog> = OnceLock::new();

/// The process-wide catalog.
pub fn catalog() -> &'static LineCatalog {
    CATALOG.get_or_init(LineCatalog::build)
}

/// Convenience for `catalog().canonical()`.
#[inline]
pub fn canonical_lines() -> &'static [CanonicalLine; NUM_LINES] {
    catalog().canonical()
}

fn canonical_cells(id: u8) -> [u8; LINE_LEN] {
    let id = id as usize;
    std::array::from_fn(|i| match id {
        0..=4 => cell_index(id, i),
        5..=9 => cell_index(i, id - 5),
        12 => cell_index(i, i),
        // Anti-diagonal, listed in ascending cell order: 4, 8, 12, 16, 20.
        13 => cell_index(i, BOARD_SIDE - 1 - i),
        _ => unreachable!("no canonical line with id {id}"),
    })
}

impl LineCatalog {
    fn build() -> Self {
        let canonical: [CanonicalLine; NUM_LINES] =
            std::array::from_fn(|i| CanonicalLine::new(LINE_IDS[i], canonical_cells(LINE_IDS[i])));

        let mut four_cell = Vec::with_capacity(NUM_LINES * LINE_LEN);
        let mut three_cell = Vec::with_capacity(NUM_LINES * 10);
        for line in &canonical {
            for i in 0..LINE_LEN {
                four_cell.push(LineSegment {
                    parent: line.id,
                    mask: line.mask & !cell_bit(line.cells[i]),
                });
            }
            for i in 0..LINE_LEN - 1 {
                for j in i + 1..LINE_LEN {
                    three_cell.push(LineSegment {
                        parent: line.id,
                        mask: line.mask & !cell_bit(line.cells[i]) & !cell_bit(line.cells[j]),
                    });
                }
            }
        }

        let through: [Vec<usize>; BOARD_CELLS] = std::array::from_fn(|cell| {
            canonical
                .iter()
                .enumerate()
                .filter(|(_, l)| l.contains(cell as u8))
                .map(|(i, _)| i)
                .collect()
        });

        log::debug!(
            "line catalog: {} canonical, {} four-cell, {} three-cell lines",
            canonical.len(),
            four_cell.len(),
            three_cell.len()
        );

        Self {
            canonical,
            four_cell,
            three_cell,
            through,
        }
    }

    pub fn canonical(&self) -> &[CanonicalLine; NUM_LINES] {
        &self.canonical
    }

    pub fn four_cell_lines(&self) -> &[LineSegment] {
        &self.four_cell
    }

    pub fn three_cell_lines(&self) -> &[LineSegment] {
        &self.three_cell
    }

    /// Canonical lines passing through `cell` (2 to 4 of them); none for
    /// off-board cells.
    pub fn lines_through(&self, cell: u8) -> impl Iterator<Item = &CanonicalLine> + '_ {
        self.through
            .get(cell as usize)
            .into_iter()
            .flatten()
            .map(|&i| &self.canonical[i])
    }

    /// The full 192-line catalog: five-cell, then four-cell, then three-cell lines.
    pub fn all_lines(&self) -> impl Iterator<Item = LineSegment> + '_ {
        self.canonical
            .iter()
            .map(|l| LineSegment {
                parent: l.id,
                mask: l.mask,
            })
            .chain(self.four_cell.iter().copied())
            .chain(self.three_cell.iter().copied())
    }

    pub fn by_id(&self, id: u8) -> Option<&CanonicalLine> {
        self.canonical.iter().find(|l| l.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_lines() {
        let lines = canonical_lines();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0].cells, [0, 1, 2, 3, 4]);
        assert_eq!(lines[5].cells, [0, 5, 10, 15, 20]);
        assert_eq!(lines[9].cells, [4, 9, 14, 19, 24]);
        assert_eq!(lines[10].id, MAIN_DIAGONAL_ID);
        assert_eq!(lines[10].cells, [0, 6, 12, 18, 24]);
        assert_eq!(lines[11].id, ANTI_DIAGONAL_ID);
        assert_eq!(lines[11].cells, [4, 8, 12, 16, 20]);
        for l in lines {
            assert_eq!(l.mask.count_ones(), 5);
        }
    }

    #[test]
    fn test_sub_line_counts() {
        let cat = catalog();
        assert_eq!(cat.four_cell_lines().len(), 60);
        assert_eq!(cat.three_cell_lines().len(), 120);
        assert!(cat.four_cell_lines().iter().all(|s| s.len() == 4));
        assert!(cat.three_cell_lines().iter().all(|s| s.len() == 3));
        assert_eq!(cat.all_lines().count(), 192);
    }

    #[test]
    fn test_sub_lines_are_inside_parent() {
        let cat = catalog();
        for seg in cat.all_lines() {
            let parent = cat.by_id(seg.parent).unwrap();
            assert_eq!(seg.mask & !parent.mask, 0);
        }
    }

    #[test]
    fn test_lines_through_cell() {
        let cat = catalog();
        let ids = |c: u8| cat.lines_through(c).map(|l| l.id).collect::<Vec<_>>();
        assert_eq!(ids(12), vec![2, 7, 12, 13]);
        assert_eq!(ids(0), vec![0, 5, 12]);
        assert_eq!(ids(1), vec![0, 6]);
        assert_eq!(ids(4), vec![0, 9, 13]);
        assert!(ids(25).is_empty());
        assert!(ids(255).is_empty());
    }

    #[test]
    fn test_segment_cells_ascending() {
        let seg = catalog().three_cell_lines()[0];
        assert_eq!(seg.cells().collect::<Vec<_>>(), vec![2, 3, 4]);
    }
}
