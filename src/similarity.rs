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
use std::time::Instant;

use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::error::{Axis, Error, Result};
use crate::matrix::NamedAxisMatrix;
use crate::ratings::RatingMatrix;

/// Similarity of two items. `Undefined` marks pairs without a single user who rated both items,
/// which is not the same as a similarity of zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Similarity {
    Defined(f64),
    Undefined,
}

impl Similarity {

    pub fn value(&self) -> Option<f64> {
        match *self {
            Similarity::Defined(value) => Some(value),
            Similarity::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        *self == Similarity::Undefined
    }
}

impl Default for Similarity {
    fn default() -> Self {
        Similarity::Undefined
    }
}

/// Serialized as a plain number, or `null` if undefined.
impl Serialize for Similarity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            Similarity::Defined(value) => serializer.serialize_f64(value),
            Similarity::Undefined => serializer.serialize_none(),
        }
    }
}

/// Adjusted cosine similarity of two (mean-centered) rating vectors, restricted to the co-rated
/// positions, i.e. the positions where both vectors are non-zero. Both the dot product and the
/// norms only look at these positions. Without any co-rated position the similarity is
/// `Undefined`, as is any result that is not a finite number.
pub fn adjusted_cosine(ratings_a: &[f64], ratings_b: &[f64]) -> Similarity {

    let co_rated = || {
        ratings_a.iter()
            .zip(ratings_b.iter())
            .filter(|&(rating_a, rating_b)| *rating_a != 0.0 && *rating_b != 0.0)
    };

    // Both vectors are scaled by their largest co-rated magnitude, so that the squared norms
    // neither overflow for huge nor underflow for tiny ratings
    let (scale_a, scale_b) = co_rated()
        .fold((0.0_f64, 0.0_f64), |(scale_a, scale_b), (rating_a, rating_b)| {
            (scale_a.max(rating_a.abs()), scale_b.max(rating_b.abs()))
        });

    if scale_a == 0.0 || scale_b == 0.0 || !scale_a.is_finite() || !scale_b.is_finite() {
        return Similarity::Undefined;
    }

    let mut dot_product = 0.0;
    let mut squared_norm_a = 0.0;
    let mut squared_norm_b = 0.0;

    for (rating_a, rating_b) in co_rated() {
        let scaled_a = rating_a / scale_a;
        let scaled_b = rating_b / scale_b;

        dot_product += scaled_a * scaled_b;
        squared_norm_a += scaled_a * scaled_a;
        squared_norm_b += scaled_b * scaled_b;
    }

    let similarity = dot_product / (f64::sqrt(squared_norm_a) * f64::sqrt(squared_norm_b));

    if similarity.is_finite() {
        Similarity::Defined(similarity)
    } else {
        Similarity::Undefined
    }
}

/// Symmetric matrix of item-to-item similarities. Every write also sets the mirrored cell, and
/// items share the same position on both axes.
#[derive(Debug, Clone)]
pub struct ItemSimilarityMatrix<I> {
    matrix: NamedAxisMatrix<I, I, Similarity>,
}

impl<I: Eq + Hash + Clone + Debug> ItemSimilarityMatrix<I> {

    pub fn new(num_items: usize) -> Self {
        ItemSimilarityMatrix { matrix: NamedAxisMatrix::new(num_items, num_items) }
    }

    /// Computes the similarities of all pairs of items (including each item with itself) from the
    /// rating columns of `ratings`. Ratings are used as they are, callers who want adjusted cosine
    /// similarities have to normalize the matrix beforehand.
    pub fn build_from_ratings<U>(ratings: &RatingMatrix<U, I>) -> Result<Self>
        where U: Eq + Hash + Clone + Debug {

        let items = ratings.items();
        let num_items = items.len();

        let item_ratings = items.iter()
            .map(|item| ratings.ratings_for_item(item))
            .collect::<Result<Vec<_>>>()?;

        let mut similarities = ItemSimilarityMatrix::new(num_items);

        let build_start = Instant::now();

        // The matrix is symmetric, so each unordered pair is computed once
        for (index_a, item_a) in items.iter().enumerate() {
            for index_b in index_a..num_items {
                let item_b = &items[index_b];

                let similarity = adjusted_cosine(&item_ratings[index_a], &item_ratings[index_b]);
                debug!("Similarity between {:?} and {:?} is {:?}", item_a, item_b, similarity);

                similarities.set(item_a, item_b, similarity)?;
            }
        }

        info!(
            "Computed {} item similarities for {} items in {}ms",
            num_items * (num_items + 1) / 2,
            num_items,
            build_start.elapsed().as_millis(),
        );

        Ok(similarities)
    }

    /// Sets the similarity of `item_a` and `item_b` in both directions.
    pub fn set(&mut self, item_a: &I, item_b: &I, similarity: Similarity) -> Result<()> {

        let index = self.matrix.row_index();
        let num_unseen = if item_a == item_b {
            index.position(item_a).is_none() as usize
        } else {
            index.position(item_a).is_none() as usize + index.position(item_b).is_none() as usize
        };

        if index.len() + num_unseen > index.capacity() {
            return Err(Error::IndexOverflow { axis: Axis::Row, capacity: index.capacity() });
        }

        // Index both items on both axes in the same order before writing
        self.matrix.assign(item_a, item_a)?;
        self.matrix.assign(item_b, item_b)?;

        self.matrix.set(item_a, item_b, similarity)?;
        self.matrix.set(item_b, item_a, similarity)
    }

    /// Like `set`, for callers holding the pair as a slice. Anything but exactly two items is
    /// rejected.
    pub fn set_pair(&mut self, key: &[I], similarity: Similarity) -> Result<()> {
        match key {
            [item_a, item_b] => self.set(item_a, item_b, similarity),
            _ => Err(Error::InvalidKey { len: key.len() }),
        }
    }

    pub fn similarity(&self, item_a: &I, item_b: &I) -> Result<Similarity> {
        self.matrix.get(item_a, item_b)
    }

    /// Similarities of `item` to all items, ordered by item position.
    pub fn row(&self, item: &I) -> Result<&[Similarity]> {
        self.matrix.get_row(item)
    }

    pub fn items(&self) -> &[I] {
        self.matrix.row_labels()
    }

    pub fn item_position(&self, item: &I) -> Result<usize> {
        self.matrix.row_position(item)
    }

    pub fn item_at(&self, position: usize) -> Option<&I> {
        self.matrix.row_index().label(position)
    }

    pub fn as_matrix(&self) -> &NamedAxisMatrix<I, I, Similarity> {
        &self.matrix
    }
}
