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

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::matrix::NamedAxisMatrix;
use crate::stats::RatingStats;

/// Names of the record fields holding the user, the item and the rating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingColumns {
    pub user: String,
    pub item: String,
    pub rating: String,
}

impl Default for RatingColumns {
    fn default() -> Self {
        RatingColumns {
            user: String::from("user"),
            item: String::from("item"),
            rating: String::from("rating"),
        }
    }
}

/// An input record whose fields can be looked up by name.
pub trait Record {
    fn field(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> Record for HashMap<String, String, S> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(|value| value.as_str())
    }
}

/// A single observed rating of an item by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRow<U, I> {
    pub user: U,
    pub item: I,
    pub rating: f64,
}

/// Ratings with users as rows and items as columns. A zero entry means the user did not rate the
/// item, so a rating of exactly zero cannot be told apart from a missing one.
#[derive(Debug, Clone)]
pub struct RatingMatrix<U, I> {
    matrix: NamedAxisMatrix<U, I>,
}

impl<U, I> RatingMatrix<U, I>
    where U: Eq + Hash + Clone + Debug,
          I: Eq + Hash + Clone + Debug {

    pub fn new(num_users: usize, num_items: usize) -> Self {
        RatingMatrix { matrix: NamedAxisMatrix::new(num_users, num_items) }
    }

    /// Builds the matrix from already parsed ratings. The ratings are scanned once to size the
    /// matrix and then inserted in input order, later ratings for the same pair win.
    pub fn build_from_interactions<T>(interactions: T) -> Result<Self>
        where T: IntoIterator<Item=RatingRow<U, I>> {

        let interactions: Vec<RatingRow<U, I>> = interactions.into_iter().collect();

        let stats = RatingStats::from_pairs(
            interactions.iter().map(|row| (&row.user, &row.item)));

        info!(
            "Found {} ratings from {} users for {} items.",
            stats.num_ratings(),
            stats.num_users(),
            stats.num_items(),
        );

        let mut ratings = RatingMatrix::new(stats.num_users(), stats.num_items());

        for row in interactions.iter() {
            ratings.insert(&row.user, &row.item, row.rating)?;
        }

        Ok(ratings)
    }

    /// Stores the rating of `user` for `item`. NaN and infinite ratings are refused.
    pub fn insert(&mut self, user: &U, item: &I, rating: f64) -> Result<()> {
        if !rating.is_finite() {
            return Err(Error::NonFiniteRating {
                user: format!("{:?}", user),
                item: format!("{:?}", item),
                value: rating,
            });
        }

        self.matrix.set(user, item, rating)
    }

    pub fn rating(&self, user: &U, item: &I) -> Result<f64> {
        self.matrix.get(user, item)
    }

    /// Users in the order in which they were first seen.
    pub fn users(&self) -> &[U] {
        self.matrix.row_labels()
    }

    /// Items in the order in which they were first seen.
    pub fn items(&self) -> &[I] {
        self.matrix.column_labels()
    }

    pub fn user_position(&self, user: &U) -> Result<usize> {
        self.matrix.row_position(user)
    }

    pub fn item_position(&self, item: &I) -> Result<usize> {
        self.matrix.column_position(item)
    }

    /// The ratings of all users for `item`, with zeros for users who did not rate it.
    pub fn ratings_for_item(&self, item: &I) -> Result<Vec<f64>> {
        self.matrix.get_column(item)
    }

    pub fn ratings_of_user(&self, user: &U) -> Result<&[f64]> {
        self.matrix.get_row(user)
    }

    pub fn as_matrix(&self) -> &NamedAxisMatrix<U, I> {
        &self.matrix
    }

    /// Subtracts each user's mean rating from their ratings. Only non-zero entries count towards
    /// the mean and only those are shifted, so missing ratings stay missing. Users with fewer than
    /// two ratings are left alone, centering a single rating would wipe it out.
    pub fn normalize(&mut self) -> &mut Self {

        let num_users = self.matrix.row_index().len();

        for user_index in 0..num_users {
            let ratings = self.matrix.row_at_mut(user_index);

            // Running mean, a plain sum overflows for ratings close to f64::MAX
            let (mean, count) = ratings.iter()
                .filter(|rating| **rating != 0.0)
                .fold((0.0, 0_usize), |(mean, count), rating| {
                    (mean + (*rating - mean) / (count + 1) as f64, count + 1)
                });

            if count < 2 {
                debug!("Not normalizing user at position {} with {} rating(s)", user_index, count);
                continue;
            }

            for rating in ratings.iter_mut().filter(|rating| **rating != 0.0) {
                *rating -= mean;
            }
        }

        self
    }
}

impl RatingMatrix<String, String> {

    /// Builds the matrix from records addressed by field name, such as the rows of a CSV file
    /// with a header line.
    pub fn build_from_rows<R: Record>(rows: &[R], columns: &RatingColumns) -> Result<Self> {

        let interactions = rows.iter()
            .enumerate()
            .map(|(record, row)| parse_row(record, row, columns))
            .collect::<Result<Vec<_>>>()?;

        RatingMatrix::build_from_interactions(interactions)
    }
}

fn parse_row<R: Record>(
    record: usize,
    row: &R,
    columns: &RatingColumns,
) -> Result<RatingRow<String, String>> {

    let field = |name: &str| {
        row.field(name)
            .ok_or_else(|| Error::MissingField { record, field: name.to_string() })
    };

    let user = field(&columns.user)?;
    let item = field(&columns.item)?;
    let raw_rating = field(&columns.rating)?;

    let invalid_rating = || Error::InvalidRating {
        record,
        field: columns.rating.clone(),
        value: raw_rating.to_string(),
    };

    let rating = raw_rating.trim().parse::<f64>().map_err(|_| invalid_rating())?;

    // "NaN", "inf" and out of range values like "1e400" parse, but are no ratings
    if !rating.is_finite() {
        return Err(invalid_rating());
    }

    Ok(RatingRow { user: user.to_string(), item: item.to_string(), rating })
}


#[cfg(test)]
mod tests {

    use fnv::FnvHashMap;
    use proptest::prelude::*;

    use crate::error::Error;
    use super::{RatingColumns, RatingMatrix, RatingRow};

    fn record(fields: &[(&str, &str)]) -> FnvHashMap<String, String> {
        fields.iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    fn close_enough_to(value: f64, expected: f64) -> bool {
        (value - expected).abs() < 1e-9
    }

    fn small_example() -> RatingMatrix<&'static str, &'static str> {
        RatingMatrix::build_from_interactions(vec![
            RatingRow { user: "U1", item: "I1", rating: 4.0 },
            RatingRow { user: "U1", item: "I2", rating: 2.0 },
            RatingRow { user: "U2", item: "I1", rating: 5.0 },
            RatingRow { user: "U2", item: "I2", rating: 5.0 },
        ]).unwrap()
    }

    #[test]
    fn build_from_rows() {
        let rows = vec![
            record(&[("user", "alice"), ("item", "apple"), ("rating", "4")]),
            record(&[("user", "alice"), ("item", "pony"), ("rating", "2.5")]),
            record(&[("user", "bob"), ("item", "pony"), ("rating", " 1 ")]),
        ];

        let ratings = RatingMatrix::build_from_rows(&rows, &RatingColumns::default()).unwrap();

        assert_eq!(ratings.users(), &["alice".to_string(), "bob".to_string()]);
        assert_eq!(ratings.items(), &["apple".to_string(), "pony".to_string()]);
        assert_eq!(ratings.rating(&"alice".to_string(), &"pony".to_string()).unwrap(), 2.5);
        assert_eq!(ratings.ratings_for_item(&"pony".to_string()).unwrap(), vec![2.5, 1.0]);
    }

    #[test]
    fn build_with_custom_columns() {
        let rows = vec![
            record(&[("UserID", "7"), ("WineID", "merlot"), ("Rating", "3")]),
        ];

        let columns = RatingColumns {
            user: String::from("UserID"),
            item: String::from("WineID"),
            rating: String::from("Rating"),
        };

        let ratings = RatingMatrix::build_from_rows(&rows, &columns).unwrap();
        assert_eq!(ratings.rating(&"7".to_string(), &"merlot".to_string()).unwrap(), 3.0);
    }

    #[test]
    fn last_rating_wins() {
        let ratings = RatingMatrix::build_from_interactions(vec![
            RatingRow { user: "alice", item: "apple", rating: 1.0 },
            RatingRow { user: "alice", item: "apple", rating: 5.0 },
        ]).unwrap();

        assert_eq!(ratings.rating(&"alice", &"apple").unwrap(), 5.0);
        assert_eq!(ratings.as_matrix().num_rows(), 1);
        assert_eq!(ratings.as_matrix().num_columns(), 1);
    }

    #[test]
    fn missing_field_aborts_build() {
        let rows = vec![
            record(&[("user", "alice"), ("item", "apple"), ("rating", "4")]),
            record(&[("user", "bob"), ("rating", "2")]),
        ];

        match RatingMatrix::build_from_rows(&rows, &RatingColumns::default()) {
            Err(Error::MissingField { record, field }) => {
                assert_eq!(record, 1);
                assert_eq!(field, "item");
            },
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[test]
    fn non_numeric_rating() {
        let rows = vec![record(&[("user", "alice"), ("item", "apple"), ("rating", "great")])];

        match RatingMatrix::build_from_rows(&rows, &RatingColumns::default()) {
            Err(Error::InvalidRating { record, value, .. }) => {
                assert_eq!(record, 0);
                assert_eq!(value, "great");
            },
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[test]
    fn non_finite_ratings_are_refused() {
        for value in &["NaN", "inf", "-inf", "1e400"] {
            let rows = vec![record(&[("user", "alice"), ("item", "apple"), ("rating", *value)])];

            match RatingMatrix::build_from_rows(&rows, &RatingColumns::default()) {
                Err(Error::InvalidRating { record, value: rejected, .. }) => {
                    assert_eq!(record, 0);
                    assert_eq!(rejected, *value);
                },
                other => panic!("Unexpected result {:?}", other),
            }
        }

        let mut ratings: RatingMatrix<&str, &str> = RatingMatrix::new(1, 1);

        match ratings.insert(&"alice", &"apple", std::f64::NAN) {
            Err(Error::NonFiniteRating { .. }) => (),
            other => panic!("Unexpected result {:?}", other),
        }

        assert!(ratings.users().is_empty());
    }

    #[test]
    fn normalize_huge_ratings() {
        let mut ratings = RatingMatrix::build_from_interactions(vec![
            RatingRow { user: "alice", item: "apple", rating: 1e300 },
            RatingRow { user: "alice", item: "pony", rating: 3e300 },
        ]).unwrap();

        ratings.normalize();

        let alice = ratings.ratings_of_user(&"alice").unwrap();
        assert!(alice.iter().all(|rating| rating.is_finite()));
        assert!(((alice[0] + 1e300) / 1e300).abs() < 1e-9);
        assert!(((alice[1] - 1e300) / 1e300).abs() < 1e-9);
    }

    #[test]
    fn unknown_item() {
        let ratings = small_example();

        match ratings.ratings_for_item(&"I3") {
            Err(Error::UnknownLabel { .. }) => (),
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[test]
    fn users_keep_first_seen_positions() {
        let ratings = RatingMatrix::build_from_interactions(vec![
            RatingRow { user: "U2", item: "I1", rating: 3.0 },
            RatingRow { user: "U1", item: "I1", rating: 4.0 },
        ]).unwrap();

        assert_eq!(ratings.user_position(&"U2").unwrap(), 0);
        assert_eq!(ratings.user_position(&"U1").unwrap(), 1);
    }

    #[test]
    fn normalize_centers_user_ratings() {
        let mut ratings = small_example();
        ratings.normalize();

        assert_eq!(ratings.ratings_of_user(&"U1").unwrap(), &[1.0, -1.0]);
        assert_eq!(ratings.ratings_of_user(&"U2").unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn normalize_skips_single_ratings_and_keeps_gaps() {
        let mut ratings = RatingMatrix::build_from_interactions(vec![
            RatingRow { user: "alice", item: "apple", rating: 4.0 },
            RatingRow { user: "bob", item: "apple", rating: 1.0 },
            RatingRow { user: "bob", item: "dog", rating: 3.0 },
            RatingRow { user: "bob", item: "bike", rating: 5.0 },
            RatingRow { user: "charles", item: "pony", rating: 2.0 },
        ]).unwrap();

        ratings.normalize().normalize();

        assert_eq!(ratings.ratings_of_user(&"alice").unwrap(), &[4.0, 0.0, 0.0, 0.0]);
        assert_eq!(ratings.ratings_of_user(&"charles").unwrap(), &[0.0, 0.0, 0.0, 2.0]);

        let bob = ratings.ratings_of_user(&"bob").unwrap();
        assert!(close_enough_to(bob[0], -2.0));
        assert!(close_enough_to(bob[1], 0.0));
        assert!(close_enough_to(bob[2], 2.0));
        assert_eq!(bob[3], 0.0);
    }

    proptest! {
        #[test]
        fn normalized_rows_sum_to_zero(
            ratings in prop::collection::vec(prop::option::of(1u8..6), 1..12)
        ) {
            let interactions: Vec<RatingRow<u32, usize>> = ratings.iter()
                .enumerate()
                .filter_map(|(item, rating)| {
                    rating.map(|rating| RatingRow { user: 1, item, rating: rating as f64 })
                })
                .collect();

            prop_assume!(!interactions.is_empty());

            let mut matrix = RatingMatrix::build_from_interactions(interactions.clone()).unwrap();
            let before: Vec<f64> = matrix.ratings_of_user(&1).unwrap().to_vec();

            matrix.normalize();
            let after = matrix.ratings_of_user(&1).unwrap();

            if interactions.len() < 2 {
                prop_assert_eq!(&before[..], after);
            } else {
                let sum: f64 = after.iter().sum();
                prop_assert!(sum.abs() < 1e-9);

                for (old, new) in before.iter().zip(after.iter()) {
                    if *old == 0.0 {
                        prop_assert_eq!(*new, 0.0);
                    }
                }
            }
        }
    }
}
