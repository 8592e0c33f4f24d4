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

use std::fmt::{Debug, Display};
use std::fs::File;
use std::hash::Hash;
use std::io::prelude::*;
use std::io::stdout;
use std::path::Path;

use fnv::FnvHashMap;
use serde_derive::Serialize;

use crate::error::Result;
use crate::matrix::NamedAxisMatrix;
use crate::similarity::{ItemSimilarityMatrix, Similarity};

/// Options for reading delimited rating files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions { delimiter: b',' }
    }
}

/// Reads a CSV input file. We expect a header line, as fields are looked up by their names.
pub fn csv_reader(file: &str, options: &CsvOptions) -> Result<csv::Reader<File>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .from_path(file)?;

    Ok(reader)
}

/// All records of `reader`, keyed by header name.
pub fn read_rows<R: Read>(reader: &mut csv::Reader<R>) -> Result<Vec<FnvHashMap<String, String>>> {
    let rows = reader.deserialize()
        .collect::<std::result::Result<Vec<FnvHashMap<String, String>>, csv::Error>>()?;

    Ok(rows)
}

/// Struct used for JSON serialization of computed similarities. Field names will be used in JSON.
#[derive(Serialize)]
struct Similarities<'a, I: serde::Serialize> {
    for_item: &'a I,
    similarities: Vec<SimilarItem<'a, I>>,
}

#[derive(Serialize)]
struct SimilarItem<'a, I: serde::Serialize> {
    item: &'a I,
    similarity: Similarity,
}

/// Output the computed similarities in JSON format, one line per item. Undefined similarities
/// are written as `null`. If a `similarities_path` is supplied, we write to a file at the
/// specified path, otherwise, we output to stdout.
pub fn write_similarities<I>(
    similarities: &ItemSimilarityMatrix<I>,
    similarities_path: Option<String>,
) -> Result<()>
    where I: Eq + Hash + Clone + Debug + serde::Serialize {

    let mut out: Box<dyn Write> = match similarities_path {
        Some(path) => Box::new(File::create(&Path::new(&path))?),
        _ => Box::new(stdout())
    };

    for for_item in similarities.items() {

        let row = similarities.row(for_item)?;

        let similar_items = similarities.items().iter()
            .zip(row.iter())
            .map(|(item, similarity)| SimilarItem { item, similarity: *similarity })
            .collect();

        let line = serde_json::to_string(&Similarities { for_item, similarities: similar_items })?;

        writeln!(out, "{}", line)?;
    }

    out.flush()?;

    Ok(())
}

/// How a matrix cell is rendered in a table, absent values show up as `-`.
pub trait TableCell {
    fn render(&self) -> String;
}

impl TableCell for f64 {
    fn render(&self) -> String {
        if *self == 0.0 {
            String::from("-")
        } else {
            format!("{:.2}", self)
        }
    }
}

impl TableCell for Similarity {
    fn render(&self) -> String {
        match *self {
            Similarity::Defined(value) => format!("{:.2}", value),
            Similarity::Undefined => String::from("-"),
        }
    }
}

/// Writes `matrix` as a tab-separated table under a `title` line, with the column labels as
/// header and the row label in front of every row.
pub fn write_table<R, C, V>(
    matrix: &NamedAxisMatrix<R, C, V>,
    title: &str,
    out: &mut dyn Write,
) -> Result<()>
    where R: Eq + Hash + Clone + Debug + Display,
          C: Eq + Hash + Clone + Debug + Display,
          V: Copy + Default + TableCell {

    writeln!(out, "{}", title)?;

    let columns = matrix.column_labels();

    for column in columns {
        write!(out, "\t{}", column)?;
    }
    writeln!(out)?;

    for row in matrix.row_labels() {
        write!(out, "{}", row)?;

        for value in matrix.get_row(row)?.iter().take(columns.len()) {
            write!(out, "\t{}", value.render())?;
        }
        writeln!(out)?;
    }

    Ok(())
}
