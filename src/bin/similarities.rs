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

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{stdout, Write};
use std::path::Path;
use std::process;

use getopts::Options;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use itemsim::io::{self, CsvOptions};
use itemsim::RatingColumns;

struct Settings {
    ratings_path: String,
    similarities_path: Option<String>,
    columns: RatingColumns,
    csv_options: CsvOptions,
    normalize: bool,
    table: bool,
}

fn main() {

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("i", "inputfile", "Input file name (required). The input consists of ratings of \
        items by users, one rating per line, with a header line naming the fields.", "PATH");
    opts.optopt("o", "outputfile", "Output file name (optional, output will be written to stdout \
        by default).", "PATH");
    opts.optopt("u", "user-column", "Name of the field holding the user (optional, defaults to \
        'user').", "NAME");
    opts.optopt("t", "item-column", "Name of the field holding the item (optional, defaults to \
        'item').", "NAME");
    opts.optopt("r", "rating-column", "Name of the field holding the rating (optional, defaults \
        to 'rating').", "NAME");
    opts.optopt("d", "delimiter", "Field delimiter of the input file, use '\\t' for tabs \
        (optional, defaults to ',').", "CHAR");
    opts.optflag("", "no-normalize", "Do not subtract the users' mean ratings before computing \
        similarities.");
    opts.optflag("", "table", "Write tab-separated tables of the ratings and similarities \
        instead of JSON.");
    opts.optflag("v", "verbose", "Log every computed similarity");
    opts.optflag("h", "help", "Print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if matches.opt_present("h") {
        return print_usage_and_exit(&program, opts, None);
    }

    let ratings_path = match matches.opt_str("i") {
        Some(path) => path,
        None => return print_usage_and_exit(
            &program,
            opts,
            Some("Please specify an inputfile via --inputfile."),
        ),
    };

    let delimiter = match matches.opt_str("d") {
        None => CsvOptions::default().delimiter,
        Some(ref delimiter) if delimiter == "\\t" => b'\t',
        Some(ref delimiter) if delimiter.len() == 1 => delimiter.as_bytes()[0],
        Some(_) => return print_usage_and_exit(
            &program,
            opts,
            Some("Problem with option 'd': the delimiter must be a single ASCII character."),
        ),
    };

    let defaults = RatingColumns::default();

    let settings = Settings {
        ratings_path,
        similarities_path: matches.opt_str("o"),
        columns: RatingColumns {
            user: matches.opt_str("u").unwrap_or(defaults.user),
            item: matches.opt_str("t").unwrap_or(defaults.item),
            rating: matches.opt_str("r").unwrap_or(defaults.rating),
        },
        csv_options: CsvOptions { delimiter },
        normalize: !matches.opt_present("no-normalize"),
        table: matches.opt_present("table"),
    };

    let level = if matches.opt_present("v") { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(failure) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Unable to install logging: {}", failure);
    }

    if let Err(failure) = compute_similarities(&settings) {
        eprintln!("\n{}\n", failure);
        process::exit(1);
    }
}

fn print_usage_and_exit(
    program: &str,
    opts: Options,
    hint: Option<&str>
) -> ! {

    if let Some(hint) = hint {
        eprintln!("\n{}\n", hint);
    }

    let brief = format!("Usage: {} [options]", program);
    eprint!("{}", opts.usage(&brief));

    process::exit(usage_exit_code(hint))
}

/// Asking for help is a success, a usage hint means the invocation was wrong.
fn usage_exit_code(hint: Option<&str>) -> i32 {
    match hint {
        Some(_) => 1,
        None => 0,
    }
}

fn compute_similarities(settings: &Settings) -> Result<(), Box<dyn Error>> {

    info!("Reading ratings from {}", settings.ratings_path);

    let mut reader = io::csv_reader(&settings.ratings_path, &settings.csv_options)?;
    let rows = io::read_rows(&mut reader)?;

    let (ratings, similarities) =
        itemsim::item_similarities(&rows, &settings.columns, settings.normalize)?;

    info!("Writing similarities...");

    if settings.table {
        let mut out: Box<dyn Write> = match settings.similarities_path {
            Some(ref path) => Box::new(File::create(&Path::new(path))?),
            _ => Box::new(stdout())
        };

        io::write_table(ratings.as_matrix(), "Ratings", &mut out)?;
        writeln!(out)?;
        io::write_table(similarities.as_matrix(), "Item similarities", &mut out)?;
        out.flush()?;
    } else {
        io::write_similarities(&similarities, settings.similarities_path.clone())?;
    }

    Ok(())
}
