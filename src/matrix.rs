//! Sparse square boolean matrices over the existential (boolean) semiring.

use std::collections::btree_map::{self, BTreeMap, Entry};
use std::fmt;

use roaring::{bitmap, RoaringBitmap};

use crate::error::{CfpqError, Result};

/// A square `n×n` boolean matrix. Only rows that hold a true cell are stored,
/// each as a compressed set of columns, so memory follows the number of true
/// cells rather than `n`.
///
/// Vertex indices must fit in a `u32`. All binary operations require both
/// operands to have the same dimension.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoolMatrix {
    size: usize,
    // No row is stored empty.
    rows: BTreeMap<u32, RoaringBitmap>,
}

/// An iterator over the coordinates of true cells, in row-major order.
pub struct Iter<'a> {
    rows: btree_map::Iter<'a, u32, RoaringBitmap>,
    row: Option<(u32, bitmap::Iter<'a>)>,
}

impl BoolMatrix {
    /// Creates the all-false matrix of dimension `size`. Allocates nothing.
    pub fn new(size: usize) -> Self {
        BoolMatrix {
            size,
            rows: BTreeMap::new(),
        }
    }

    /// Creates a diagonal matrix with `(v, v)` set for every given vertex.
    pub fn diagonal<I>(size: usize, vertices: I) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut diagonal = Self::new(size);
        for v in vertices {
            diagonal.set(v, v, true)?;
        }
        Ok(diagonal)
    }

    /// Returns the dimension of this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    fn check(&self, index: usize) -> Result<u32> {
        match u32::try_from(index) {
            Ok(narrow) if index < self.size => Ok(narrow),
            _ => Err(CfpqError::IndexOutOfRange {
                index,
                size: self.size,
            }),
        }
    }

    fn contains(&self, row: u32, col: u32) -> bool {
        self.rows.get(&row).map_or(false, |cols| cols.contains(col))
    }

    fn remove(&mut self, row: u32, col: u32) {
        if let Entry::Occupied(mut entry) = self.rows.entry(row) {
            entry.get_mut().remove(col);
            if entry.get().is_empty() {
                entry.remove();
            }
        }
    }

    /// Reads a cell.
    pub fn get(&self, row: usize, col: usize) -> Result<bool> {
        let row = self.check(row)?;
        let col = self.check(col)?;
        Ok(self.contains(row, col))
    }

    /// Writes a cell.
    pub fn set(&mut self, row: usize, col: usize, value: bool) -> Result<()> {
        let row = self.check(row)?;
        let col = self.check(col)?;
        if value {
            self.rows.entry(row).or_default().insert(col);
        } else {
            self.remove(row, col);
        }
        Ok(())
    }

    /// Unions `other` into `self`. Returns `true` if any cell changed.
    pub fn accumulate(&mut self, other: &BoolMatrix) -> bool {
        assert_eq!(self.size, other.size, "matrix dimensions differ");
        let mut changed = false;
        for (&i, other_row) in &other.rows {
            match self.rows.entry(i) {
                Entry::Vacant(entry) => {
                    entry.insert(other_row.clone());
                    changed = true;
                }
                Entry::Occupied(mut entry) => {
                    let row = entry.get_mut();
                    let before = row.len();
                    *row |= other_row;
                    changed |= row.len() != before;
                }
            }
        }
        changed
    }

    /// Computes the boolean semiring product `self @ other`: `(i, k)` is set
    /// whenever some `j` has `(i, j)` in `self` and `(j, k)` in `other`.
    pub fn mxm(&self, other: &BoolMatrix) -> BoolMatrix {
        assert_eq!(self.size, other.size, "matrix dimensions differ");
        let mut product = BoolMatrix::new(self.size);
        for (&i, row) in &self.rows {
            let mut product_row = RoaringBitmap::new();
            for j in row {
                if let Some(other_row) = other.rows.get(&j) {
                    product_row |= other_row;
                }
            }
            if !product_row.is_empty() {
                product.rows.insert(i, product_row);
            }
        }
        product
    }

    /// Returns the number of true cells.
    pub fn nnz(&self) -> usize {
        self.rows.values().map(|row| row.len() as usize).sum()
    }

    /// Checks whether every cell is false.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Checks whether all true cells lie on the diagonal.
    pub fn is_diagonal(&self) -> bool {
        self.iter().all(|(i, j)| i == j)
    }

    /// Iterates over the coordinates of true cells.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            rows: self.rows.iter(),
            row: None,
        }
    }

    /// Collects the coordinates of true cells, sorted by row, then column.
    pub fn to_pairs(&self) -> Vec<(usize, usize)> {
        self.iter().collect()
    }

    /// Returns the set of columns that hold at least one true cell.
    pub fn nonempty_columns(&self) -> RoaringBitmap {
        let mut columns = RoaringBitmap::new();
        for row in self.rows.values() {
            columns |= row;
        }
        columns
    }

    /// Returns a copy of this matrix that keeps only the rows `i` for which
    /// `(i, i)` is set in the diagonal `mask`.
    pub fn restrict_rows(&self, mask: &BoolMatrix) -> BoolMatrix {
        assert_eq!(self.size, mask.size, "matrix dimensions differ");
        let mut restricted = BoolMatrix::new(self.size);
        for (&i, row) in &self.rows {
            if mask.contains(i, i) {
                restricted.rows.insert(i, row.clone());
            }
        }
        restricted
    }

    /// Sets `(j, j)` for every column `j` that holds a true cell in `src`.
    /// Returns `true` if any cell changed.
    pub fn mark_diagonal_from_columns(&mut self, src: &BoolMatrix) -> bool {
        assert_eq!(self.size, src.size, "matrix dimensions differ");
        self.mark_diagonal(&src.nonempty_columns())
    }

    /// Sets `(j, j)` for every `j` in `vertices`. Returns `true` if any cell
    /// changed.
    pub fn mark_diagonal(&mut self, vertices: &RoaringBitmap) -> bool {
        let mut changed = false;
        for j in vertices {
            debug_assert!((j as usize) < self.size, "vertex out of range");
            changed |= self.rows.entry(j).or_default().insert(j);
        }
        changed
    }

    /// Clears `(v, v)` for every diagonal cell set in `mask`.
    pub fn clear_diagonal_from(&mut self, mask: &BoolMatrix) {
        assert_eq!(self.size, mask.size, "matrix dimensions differ");
        for (&v, row) in &mask.rows {
            if row.contains(v) {
                self.remove(v, v);
            }
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((i, cols)) = &mut self.row {
                if let Some(j) = cols.next() {
                    return Some((*i as usize, j as usize));
                }
            }
            let (&i, row) = self.rows.next()?;
            self.row = Some((i, row.iter()));
        }
    }
}

impl<'a> IntoIterator for &'a BoolMatrix {
    type Item = (usize, usize);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl fmt::Debug for BoolMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BoolMatrix")
            .field("size", &self.size)
            .field("nonzeros", &self.to_pairs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(size: usize, cells: &[(usize, usize)]) -> BoolMatrix {
        let mut m = BoolMatrix::new(size);
        for &(i, j) in cells {
            m.set(i, j, true).unwrap();
        }
        m
    }

    #[test]
    fn test_mxm_composes_paths() {
        let a = matrix(4, &[(0, 1), (2, 3)]);
        let b = matrix(4, &[(1, 2), (1, 3), (3, 0)]);
        assert_eq!(a.mxm(&b).to_pairs(), vec![(0, 2), (0, 3), (2, 0)]);
    }

    #[test]
    fn test_accumulate_reports_change() {
        let mut a = matrix(3, &[(0, 0)]);
        let b = matrix(3, &[(0, 0), (1, 2)]);
        assert!(a.accumulate(&b));
        assert!(!a.accumulate(&b));
        assert_eq!(a.nnz(), 2);
    }

    #[test]
    fn test_nnz_counts_wide_rows() {
        let size = 130;
        let mut m = BoolMatrix::new(size);
        for j in 0..size {
            m.set(7, j, true).unwrap();
        }
        assert_eq!(m.nnz(), size);
        assert_eq!(m.iter().count(), size);
    }

    #[test]
    fn test_out_of_range() {
        let mut m = BoolMatrix::new(2);
        assert!(matches!(
            m.set(2, 0, true),
            Err(CfpqError::IndexOutOfRange { index: 2, size: 2 })
        ));
        assert!(m.get(0, 5).is_err());
        assert!(BoolMatrix::diagonal(2, [0, 3]).is_err());
    }

    #[test]
    fn test_diagonal_markers() {
        let src = matrix(5, &[(0, 3), (4, 1), (2, 3)]);
        let mut markers = BoolMatrix::new(5);
        assert!(markers.mark_diagonal_from_columns(&src));
        assert_eq!(markers.to_pairs(), vec![(1, 1), (3, 3)]);
        assert!(!markers.mark_diagonal_from_columns(&src));
        assert!(markers.is_diagonal());

        let known = BoolMatrix::diagonal(5, [3]).unwrap();
        markers.clear_diagonal_from(&known);
        assert_eq!(markers.to_pairs(), vec![(1, 1)]);
    }

    #[test]
    fn test_huge_dimension_stays_sparse() {
        let last = u32::MAX as usize;
        let mut m = BoolMatrix::new(last + 1);
        m.set(0, last, true).unwrap();
        m.set(last, 0, true).unwrap();
        assert_eq!(m.mxm(&m).to_pairs(), vec![(0, 0), (last, last)]);
        assert_eq!(m.nnz(), 2);

        let wider = BoolMatrix::new(usize::MAX);
        assert!(matches!(
            wider.get(last + 1, 0),
            Err(CfpqError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_cleared_rows_compare_equal() {
        let mut m = matrix(3, &[(1, 2)]);
        m.set(1, 2, false).unwrap();
        assert!(m.is_empty());
        assert_eq!(m, BoolMatrix::new(3));
    }

    #[test]
    fn test_restrict_rows() {
        let m = matrix(3, &[(0, 1), (1, 2), (2, 0)]);
        let mask = BoolMatrix::diagonal(3, [0, 2]).unwrap();
        assert_eq!(m.restrict_rows(&mask).to_pairs(), vec![(0, 1), (2, 0)]);
    }
}
