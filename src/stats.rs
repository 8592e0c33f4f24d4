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

use fnv::FnvHashSet;

/// Basic statistics of a rating dataset, gathered in a first pass so that matrices can be
/// allocated with their final dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingStats {
    num_users: usize,
    num_items: usize,
    num_ratings: u64,
}

impl RatingStats {

    pub fn num_users(&self) -> usize {
        self.num_users
    }

    pub fn num_items(&self) -> usize {
        self.num_items
    }

    pub fn num_ratings(&self) -> u64 {
        self.num_ratings
    }
}

impl RatingStats {

    pub fn from_pairs<'a, U, I, T>(pairs: T) -> Self
        where U: 'a + Eq + Hash,
              I: 'a + Eq + Hash,
              T: Iterator<Item=(&'a U, &'a I)> {

        let mut users: FnvHashSet<&U> =
            FnvHashSet::with_capacity_and_hasher(100, Default::default());

        let mut items: FnvHashSet<&I> =
            FnvHashSet::with_capacity_and_hasher(100, Default::default());

        let mut num_ratings: u64 = 0;

        for (user, item) in pairs {
            users.insert(user);
            items.insert(item);
            num_ratings += 1;
        }

        RatingStats { num_users: users.len(), num_items: items.len(), num_ratings }
    }
}
