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

use std::time::Instant;

use tracing::info;

pub mod error;
pub mod io;
pub mod matrix;
pub mod ratings;
pub mod similarity;
pub mod stats;
mod types;

pub use error::{Axis, Error, Result};
pub use matrix::NamedAxisMatrix;
pub use ratings::{RatingColumns, RatingMatrix, RatingRow, Record};
pub use similarity::{adjusted_cosine, ItemSimilarityMatrix, Similarity};
pub use types::LabelIndex;


/// Computes the item-to-item similarity matrix for records carrying a user, an item and a
/// rating in the fields named by `columns`. With `normalize` set, every user's mean rating is
/// removed first, which turns the cosine into an adjusted cosine. The (possibly normalized)
/// rating matrix is handed back together with the similarities.
pub fn item_similarities<R: Record>(
    rows: &[R],
    columns: &RatingColumns,
    normalize: bool,
) -> Result<(RatingMatrix<String, String>, ItemSimilarityMatrix<String>)> {

    let start = Instant::now();

    let mut ratings = RatingMatrix::build_from_rows(rows, columns)?;

    if normalize {
        info!("Subtracting mean ratings per user");
        ratings.normalize();
    }

    let similarities = ItemSimilarityMatrix::build_from_ratings(&ratings)?;

    info!(
        "Similarities for {} items from {} users, {}ms in total",
        ratings.items().len(),
        ratings.users().len(),
        start.elapsed().as_millis(),
    );

    Ok((ratings, similarities))
}
