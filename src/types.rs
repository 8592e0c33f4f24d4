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

use std::hash::Hash;

use fnv::FnvHashMap;

use crate::error::{Axis, Error, Result};

/// Maps arbitrary labels to consecutive positions in first-seen order and back. Positions are
/// never reassigned, and at most `capacity` labels can be indexed.
#[derive(Debug, Clone)]
pub struct LabelIndex<L> {
    axis: Axis,
    capacity: usize,
    positions: FnvHashMap<L, usize>,
    labels: Vec<L>,
}

impl<L: Eq + Hash + Clone> LabelIndex<L> {

    pub fn new(axis: Axis, capacity: usize) -> Self {
        LabelIndex {
            axis,
            capacity,
            positions: FnvHashMap::with_capacity_and_hasher(capacity, Default::default()),
            labels: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn position(&self, label: &L) -> Option<usize> {
        self.positions.get(label).cloned()
    }

    pub fn label(&self, position: usize) -> Option<&L> {
        self.labels.get(position)
    }

    /// Labels ordered by their position.
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// True if `label` already has a position or there is still room for it.
    pub fn can_assign(&self, label: &L) -> bool {
        self.positions.contains_key(label) || self.labels.len() < self.capacity
    }

    /// Returns the position of `label`, assigning the next free one on first use.
    pub fn assign(&mut self, label: &L) -> Result<usize> {
        if let Some(position) = self.positions.get(label) {
            return Ok(*position);
        }

        if self.labels.len() >= self.capacity {
            return Err(Error::IndexOverflow { axis: self.axis, capacity: self.capacity });
        }

        let position = self.labels.len();
        self.positions.insert(label.clone(), position);
        self.labels.push(label.clone());

        Ok(position)
    }
}
