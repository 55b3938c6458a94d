// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Utilities surrounding sync point databases.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use super::{common::InfoPrinter, SkyalignError};
use crate::database::AlignmentDatabase;

/// Print a summary of a sync point database.
#[derive(Parser, Debug)]
pub(super) struct DatabaseInfoArgs {
    /// Path to the database.
    #[clap(name = "DATABASE", parse(from_os_str))]
    database: PathBuf,
}

impl DatabaseInfoArgs {
    pub(super) fn run(&self) -> Result<(), SkyalignError> {
        let db = AlignmentDatabase::read_file(&self.database)?;

        let mut printer = InfoPrinter::new(format!("{}", self.database.display()).into());
        match db.reference_position() {
            Some(pos) => printer.push_line(
                format!(
                    "Reference position: {:.4}° latitude, {:.4}° longitude",
                    pos.latitude, pos.longitude
                )
                .into(),
            ),
            None => printer.push_line("No reference position".into()),
        }
        printer.push_line(format!("{} sync points", db.len()).into());
        for (i, entry) in db.entries().iter().enumerate() {
            let d = entry.telescope_direction;
            let mut block = vec![
                format!(
                    "#{}: JD {:.6}, RA {:.6} h, Dec {:.6}°",
                    i + 1,
                    entry.observation_julian_date,
                    entry.right_ascension,
                    entry.declination
                )
                .into(),
                format!("    telescope direction ({:.6}, {:.6}, {:.6})", d.x, d.y, d.z).into(),
            ];
            if !entry.private_data.is_empty() {
                block.push(
                    format!("    {} bytes of private data", entry.private_data.len()).into(),
                );
            }
            printer.push_block(block);
        }
        printer.display();
        Ok(())
    }
}

/// Convert a sync point database from one format to another.
#[derive(Parser, Debug)]
pub(super) struct DatabaseConvertArgs {
    /// Path to the database to be converted.
    #[clap(name = "INPUT_DATABASE", parse(from_os_str))]
    input: PathBuf,

    /// Path to the output database. Its type is determined by its extension.
    #[clap(name = "OUTPUT_DATABASE", parse(from_os_str))]
    output: PathBuf,
}

impl DatabaseConvertArgs {
    pub(super) fn run(&self) -> Result<(), SkyalignError> {
        let db = AlignmentDatabase::read_file(&self.input)?;
        db.write_file(&self.output)?;
        info!(
            "Converted {} sync points from {} to {}",
            db.len(),
            self.input.display(),
            self.output.display()
        );
        Ok(())
    }
}
