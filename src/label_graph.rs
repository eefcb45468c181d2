//! Maps labels to square boolean matrices of one fixed dimension.

use std::borrow::Borrow;
use std::collections::btree_map::{self, BTreeMap};
use std::ops;

use crate::error::{CfpqError, Result};
use crate::matrix::BoolMatrix;

/// A collection of `n×n` boolean matrices keyed by label.
///
/// Used both for edge-labeled graphs (`LabelGraph<String>`) and for the
/// per-nonterminal relations computed by the engines. Reading an absent label
/// yields the all-false matrix; writing to it creates that matrix first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelGraph<L: Ord> {
    matrices_size: usize,
    matrices: BTreeMap<L, BoolMatrix>,
    zero: BoolMatrix,
}

impl<L: Ord> LabelGraph<L> {
    /// Creates an empty collection of matrices of dimension `matrices_size`.
    pub fn with_size(matrices_size: usize) -> Self {
        LabelGraph {
            matrices_size,
            matrices: BTreeMap::new(),
            zero: BoolMatrix::new(matrices_size),
        }
    }

    /// Returns the dimension shared by every matrix.
    pub fn matrices_size(&self) -> usize {
        self.matrices_size
    }

    /// Returns the matrix for `label`, creating the all-false matrix if absent.
    pub fn matrix_mut(&mut self, label: L) -> &mut BoolMatrix {
        let size = self.matrices_size;
        self.matrices
            .entry(label)
            .or_insert_with(|| BoolMatrix::new(size))
    }

    /// Returns the matrix for `label`, if it was ever written.
    pub fn get<Q>(&self, label: &Q) -> Option<&BoolMatrix>
    where
        L: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.matrices.get(label)
    }

    /// Unions `matrix` into the entry for `label`. Returns `true` if the entry
    /// changed.
    pub fn accumulate(&mut self, label: L, matrix: &BoolMatrix) -> bool {
        self.matrix_mut(label).accumulate(matrix)
    }

    /// Sets the cell `(from, to)` of the matrix for `label`.
    pub fn add_edge(&mut self, from: usize, label: L, to: usize) -> Result<()> {
        for vertex in [from, to] {
            if vertex >= self.matrices_size {
                return Err(CfpqError::IndexOutOfRange {
                    index: vertex,
                    size: self.matrices_size,
                });
            }
        }
        self.matrix_mut(label).set(from, to, true)
    }

    /// Iterates over labels that have a matrix.
    pub fn labels(&self) -> btree_map::Keys<'_, L, BoolMatrix> {
        self.matrices.keys()
    }

    /// Iterates over labels together with their matrices.
    pub fn iter(&self) -> btree_map::Iter<'_, L, BoolMatrix> {
        self.matrices.iter()
    }

    /// Returns the number of true cells summed over every matrix.
    pub fn total_nnz(&self) -> usize {
        self.matrices.values().map(BoolMatrix::nnz).sum()
    }
}

impl<'a, L, Q> ops::Index<&'a Q> for LabelGraph<L>
where
    L: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = BoolMatrix;

    fn index(&self, label: &'a Q) -> &BoolMatrix {
        self.matrices.get(label).unwrap_or(&self.zero)
    }
}

impl<'a, L: Ord> IntoIterator for &'a LabelGraph<L> {
    type Item = (&'a L, &'a BoolMatrix);
    type IntoIter = btree_map::Iter<'a, L, BoolMatrix>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
