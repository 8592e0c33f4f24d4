/**
 * itemsim
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{Axis, Error, Result};
use crate::types::LabelIndex;

/// Dense matrix whose rows and columns are addressed by labels instead of integer positions.
///
/// The grid is allocated once with the declared dimensions and filled with `V::default()`, which
/// stands for "no value". Labels receive positions in the order in which they are first written.
#[derive(Debug, Clone)]
pub struct NamedAxisMatrix<R, C, V = f64> {
    row_index: LabelIndex<R>,
    column_index: LabelIndex<C>,
    num_columns: usize,
    values: Vec<V>,
}

impl<R, C, V> NamedAxisMatrix<R, C, V>
    where R: Eq + Hash + Clone + Debug,
          C: Eq + Hash + Clone + Debug,
          V: Copy + Default {

    pub fn new(num_rows: usize, num_columns: usize) -> Self {
        NamedAxisMatrix {
            row_index: LabelIndex::new(Axis::Row, num_rows),
            column_index: LabelIndex::new(Axis::Column, num_columns),
            num_columns,
            values: vec![V::default(); num_rows * num_columns],
        }
    }

    pub fn num_rows(&self) -> usize {
        self.row_index.capacity()
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn row_labels(&self) -> &[R] {
        self.row_index.labels()
    }

    pub fn column_labels(&self) -> &[C] {
        self.column_index.labels()
    }

    pub fn row_index(&self) -> &LabelIndex<R> {
        &self.row_index
    }

    pub fn column_index(&self) -> &LabelIndex<C> {
        &self.column_index
    }

    pub fn row_position(&self, row: &R) -> Result<usize> {
        self.row_index.position(row).ok_or_else(|| Error::unknown_label(Axis::Row, row))
    }

    pub fn column_position(&self, column: &C) -> Result<usize> {
        self.column_index.position(column)
            .ok_or_else(|| Error::unknown_label(Axis::Column, column))
    }

    /// The whole grid in row-major order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Writes `value` into the cell for `row` and `column`, indexing unseen labels first. Both
    /// labels are checked before either is indexed, so a failing write leaves the matrix as is.
    pub fn set(&mut self, row: &R, column: &C, value: V) -> Result<()> {

        if !self.row_index.can_assign(row) {
            return Err(Error::IndexOverflow { axis: Axis::Row, capacity: self.num_rows() });
        }

        if !self.column_index.can_assign(column) {
            return Err(Error::IndexOverflow { axis: Axis::Column, capacity: self.num_columns });
        }

        let (i, j) = self.assign(row, column)?;
        self.values[i * self.num_columns + j] = value;

        Ok(())
    }

    /// Indexes `row` and `column` without writing a value.
    pub(crate) fn assign(&mut self, row: &R, column: &C) -> Result<(usize, usize)> {
        let i = self.row_index.assign(row)?;
        let j = self.column_index.assign(column)?;

        Ok((i, j))
    }

    pub fn get(&self, row: &R, column: &C) -> Result<V> {
        let i = self.row_position(row)?;
        let j = self.column_position(column)?;

        Ok(self.values[i * self.num_columns + j])
    }

    /// All values of a row, ordered by column position.
    pub fn get_row(&self, row: &R) -> Result<&[V]> {
        let i = self.row_position(row)?;
        Ok(self.row_at(i))
    }

    /// All values of a column, ordered by row position.
    pub fn get_column(&self, column: &C) -> Result<Vec<V>> {
        let j = self.column_position(column)?;

        let column_values = (0..self.num_rows())
            .map(|i| self.values[i * self.num_columns + j])
            .collect();

        Ok(column_values)
    }

    pub(crate) fn row_at(&self, i: usize) -> &[V] {
        let offset = i * self.num_columns;
        &self.values[offset..(offset + self.num_columns)]
    }

    pub(crate) fn row_at_mut(&mut self, i: usize) -> &mut [V] {
        let offset = i * self.num_columns;
        &mut self.values[offset..(offset + self.num_columns)]
    }
}
