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

use std::fmt;
use std::io;

use thiserror::Error;

/// Which side of a matrix a label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("The {axis} label {label} has not been found in the index.")]
    UnknownLabel { axis: Axis, label: String },

    #[error("Record {record} has no field named '{field}'.")]
    MissingField { record: usize, field: String },

    #[error("Record {record} has a non-numeric value '{value}' in field '{field}'.")]
    InvalidRating { record: usize, field: String, value: String },

    #[error("The rating {value} of user {user} for item {item} is not a finite number.")]
    NonFiniteRating { user: String, item: String, value: f64 },

    #[error("A pairwise key needs exactly two items, got {len}.")]
    InvalidKey { len: usize },

    #[error("All {capacity} {axis} positions are taken, cannot index another label.")]
    IndexOverflow { axis: Axis, capacity: usize },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {

    pub(crate) fn unknown_label<L: fmt::Debug>(axis: Axis, label: &L) -> Self {
        Error::UnknownLabel { axis, label: format!("{:?}", label) }
    }
}
